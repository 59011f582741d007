//! Rewrites an ES module's top level into a single `System.register(...)`
//! registration call.
//!
//! The transform is purely syntactic: imports become dependency positions with
//! setter callbacks, exports become calls through the registration's export
//! callback, and everything else runs inside the returned `execute` function.
//! Bindings whose exported value is produced by a non-hoisting declaration get
//! deferred-initializer treatment, so the export call observes the value at
//! the declaration's original position.
//!
//! ```
//! use register_js::ast::node::Node;
//! use register_js::ast::stx::TopLevel;
//! use register_js::loc::Loc;
//!
//! let mut top_level = Node::new(Loc::synthetic(), TopLevel { body: vec![] });
//! register_js::to_register(&mut top_level, "src/math.esm.js").unwrap();
//! // The body is now exactly one `System.register("math", [], ...)` call.
//! assert_eq!(top_level.stx.body.len(), 1);
//! ```

pub mod ast;
pub mod err;
pub mod loc;
pub mod num;
pub mod operator;
pub mod template;
pub mod uid;

mod register;
#[cfg(test)]
mod tests;

use ast::node::Node;
use ast::stx::TopLevel;
use err::TransformResult;

/// Options for one transform invocation.
pub struct RegisterOptions<'a> {
  /// Source filename; the registration name is derived from its base name.
  pub filename: &'a str,
  /// Receives one line per transformed module summarizing what was
  /// registered.
  pub diagnostic: Option<&'a dyn Fn(&str)>,
}

impl<'a> RegisterOptions<'a> {
  pub fn new(filename: &'a str) -> Self {
    Self {
      filename,
      diagnostic: None,
    }
  }

  pub fn with_diagnostic(mut self, diagnostic: &'a dyn Fn(&str)) -> Self {
    self.diagnostic = Some(diagnostic);
    self
  }
}

/// Transforms the module in place with the given options.
///
/// On failure the tree must be considered corrupted, the same way a panicking
/// mutation would leave it; callers should discard it.
pub fn to_register_with_options(
  top_level: &mut Node<TopLevel>,
  options: &RegisterOptions,
) -> TransformResult<()> {
  register::transform(top_level, options)
}

/// Transforms the module in place, deriving the registration name from
/// `filename`.
pub fn to_register(top_level: &mut Node<TopLevel>, filename: &str) -> TransformResult<()> {
  to_register_with_options(top_level, &RegisterOptions::new(filename))
}
