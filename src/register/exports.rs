use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::err::{TransformError, TransformResult};
use crate::loc::Loc;
use ahash::HashMap;

/// The public name of a `default` export.
pub const DEFAULT_EXPORT_NAME: &str = "default";

/// A single exported binding, realized in the execute body as one
/// export-callback call.
#[derive(Debug)]
pub struct ExportEmission {
  /// The name under which consumers observe the binding (`default` for the
  /// default export).
  pub exported_name: String,
  /// The local identifier whose value is exported.
  pub bound_identifier: String,
  /// If present, evaluated and assigned to `bound_identifier` as part of the
  /// export call: `<export>(name, <bound> = <init>)`.
  pub deferred_initializer: Option<Node<Expr>>,
  pub loc: Loc,
}

/// Handle to one recorded emission, valid for the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmissionId(usize);

/// Accumulates export emissions in declaration order and patches in deferred
/// initializers after extraction.
///
/// Exported-name uniqueness is an upstream guarantee and is not re-validated
/// here. Lookup for patching is keyed by the bound identifier's name and finds
/// the most recently recorded emission for that name.
#[derive(Default)]
pub struct ExportRegistry {
  emissions: Vec<ExportEmission>,
  latest_by_binding: HashMap<String, usize>,
}

impl ExportRegistry {
  pub fn record_export(
    &mut self,
    exported_name: impl Into<String>,
    bound_identifier: impl Into<String>,
    loc: Loc,
  ) -> EmissionId {
    let bound_identifier = bound_identifier.into();
    let id = self.emissions.len();
    self.latest_by_binding.insert(bound_identifier.clone(), id);
    self.emissions.push(ExportEmission {
      exported_name: exported_name.into(),
      bound_identifier,
      deferred_initializer: None,
      loc,
    });
    EmissionId(id)
  }

  /// Splices a stripped initializer into the most recent emission for the
  /// binding. Failure means the extraction pass recorded nothing for a binding
  /// it later marked deferred, which is a defect in this crate.
  pub fn patch_deferred_initializer(
    &mut self,
    binding: &str,
    initializer: Node<Expr>,
  ) -> TransformResult<()> {
    let id = self
      .latest_by_binding
      .get(binding)
      .copied()
      .ok_or_else(|| TransformError::MissingDeferredEmission {
        binding: binding.to_string(),
      })?;
    self.emissions[id].deferred_initializer = Some(initializer);
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.emissions.len()
  }

  pub fn emission(&self, id: EmissionId) -> &ExportEmission {
    &self.emissions[id.0]
  }

  /// Consumes the registry for wrapper assembly; index by [`EmissionId`].
  pub fn into_emissions(self) -> Vec<ExportEmission> {
    self.emissions
  }
}

impl EmissionId {
  pub(crate) fn index(self) -> usize {
    self.0
  }
}
