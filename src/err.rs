use crate::loc::Loc;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Formatter;
use std::error::Error;
use std::fmt::Display;

/// An internal-consistency failure of the module transform.
///
/// These are programming-contract violations of the extraction pass, never
/// malformed-input conditions: upstream validation owns user-facing errors,
/// and this crate assumes a well-formed module tree. Each variant aborts the
/// current module's transform; retrying cannot succeed without a code fix.
///
/// Diagnostic codes (prefix `RG`) are assigned per variant and are stable:
/// - `RG0001`: [`TransformError::MissingDeferredEmission`]
/// - `RG0002`: [`TransformError::UnknownExportBinding`]
/// - `RG0003`: [`TransformError::UnsupportedPattern`]
/// - `RG0004`: [`TransformError::UnknownTemplate`]
/// - `RG0005`: [`TransformError::UnboundTemplateSlot`]
#[derive(Clone, PartialEq, Eq)]
pub enum TransformError {
  /// A deferred-initializer patch found no emission recorded for the binding.
  MissingDeferredEmission { binding: String },
  /// An export specifier references a top-level binding never declared in the module.
  UnknownExportBinding { binding: String, loc: Loc },
  /// An exported declaration binds through a destructuring pattern, which cannot
  /// be represented as a single export emission.
  UnsupportedPattern { loc: Loc },
  /// No template is registered under this name.
  UnknownTemplate { name: String },
  /// An expression slot of a template was consumed twice or never.
  UnboundTemplateSlot {
    template: &'static str,
    slot: String,
  },
}

pub type TransformResult<T> = Result<T, TransformError>;

impl TransformError {
  /// Stable diagnostic code for this failure variant.
  pub fn code(&self) -> &'static str {
    match self {
      TransformError::MissingDeferredEmission { .. } => "RG0001",
      TransformError::UnknownExportBinding { .. } => "RG0002",
      TransformError::UnsupportedPattern { .. } => "RG0003",
      TransformError::UnknownTemplate { .. } => "RG0004",
      TransformError::UnboundTemplateSlot { .. } => "RG0005",
    }
  }

  /// Human-readable message describing this failure.
  pub fn message(&self) -> String {
    match self {
      TransformError::MissingDeferredEmission { binding } => format!(
        "no export emission recorded for deferred binding `{}`",
        binding
      ),
      TransformError::UnknownExportBinding { binding, .. } => format!(
        "export specifier references binding `{}` which is never declared",
        binding
      ),
      TransformError::UnsupportedPattern { .. } => {
        "exported declaration binds through a destructuring pattern".into()
      }
      TransformError::UnknownTemplate { name } => format!("no template named `{}`", name),
      TransformError::UnboundTemplateSlot { template, slot } => format!(
        "template `{}` slot `{}` was not consumed exactly once",
        template, slot
      ),
    }
  }

  fn loc(&self) -> Option<Loc> {
    match self {
      TransformError::UnknownExportBinding { loc, .. }
      | TransformError::UnsupportedPattern { loc } => Some(*loc),
      _ => None,
    }
  }
}

impl Debug for TransformError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self.loc() {
      Some(loc) => write!(f, "{} around loc [{}:{}]", self, loc.0, loc.1),
      None => write!(f, "{}", self),
    }
  }
}

impl Display for TransformError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.code(), self.message())
  }
}

impl Error for TransformError {}
