//! The module-to-registration transform: one classification sweep feeding the
//! dependency and export registries, a patch sweep for deferred initializers,
//! then wrapper assembly replacing the whole body with a registration call.

use crate::ast::node::Node;
use crate::ast::stx::TopLevel;
use crate::err::TransformResult;
use crate::uid::UidGenerator;
use crate::RegisterOptions;

pub(crate) mod deps;
pub(crate) mod exports;
pub(crate) mod extract;
pub(crate) mod wrap;

/// Registration name derived from a filename: everything through the last `/`
/// is dropped, then everything from the first `.` of what remains.
pub(crate) fn registration_name(filename: &str) -> String {
  let base = match filename.rfind('/') {
    Some(at) => &filename[at + 1..],
    None => filename,
  };
  let base = match base.find('.') {
    Some(at) => &base[..at],
    None => base,
  };
  base.to_string()
}

pub(crate) fn transform(
  top_level: &mut Node<TopLevel>,
  options: &RegisterOptions,
) -> TransformResult<()> {
  let loc = top_level.loc;
  let module_name = registration_name(options.filename);

  // All fresh names are allocated against the whole module's identifiers,
  // collected before any rewriting.
  let mut uids = UidGenerator::for_top_level(top_level);
  let export_cb = uids.fresh("export");

  let mut deps = deps::DepRegistry::default();
  let mut exports = exports::ExportRegistry::default();
  let body = std::mem::take(&mut top_level.stx.body);
  let mut extraction = extract::extract(body, &mut deps, &mut exports, &mut uids)?;
  extract::apply_deferred_patches(&mut extraction.retained, &extraction.deferred, &mut exports)?;

  if let Some(diagnostic) = options.diagnostic {
    diagnostic(&format!(
      "registering {} with {} dependencies and {} exports",
      module_name,
      deps.len(),
      exports.len(),
    ));
  }

  let wrapper = wrap::assemble(
    loc,
    &module_name,
    extraction.retained,
    deps,
    exports,
    &export_cb,
    &mut uids,
  )?;
  top_level.stx.body = vec![wrapper];
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::registration_name;

  #[test]
  fn registration_name_strips_directories_and_extensions() {
    assert_eq!(registration_name("src/lib/mod.esm.js"), "mod");
    assert_eq!(registration_name("plain"), "plain");
    assert_eq!(registration_name("a/b/"), "");
    assert_eq!(registration_name(".hidden.js"), "");
  }
}
