use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

/// Operators that can appear in module-level code handled by this crate. The
/// transform itself only ever synthesizes `Assignment`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Drive, DriveMut, Serialize)]
pub enum OperatorName {
  Addition,
  Assignment,
  Comma,
  Division,
  Equality,
  In,
  Inequality,
  LogicalAnd,
  LogicalOr,
  Multiplication,
  Not,
  StrictEquality,
  StrictInequality,
  Subtraction,
  Typeof,
}
