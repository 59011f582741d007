//! Assembles the registration call from the extraction's outputs: materializes
//! export emissions, builds the setter callbacks, and instantiates the
//! `System.register` wrapper around the factory.

use crate::ast::build;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::err::TransformResult;
use crate::loc::Loc;
use crate::register::deps::{DepRegistry, SetterAction};
use crate::register::exports::{ExportEmission, ExportRegistry};
use crate::register::extract::RetainedStmt;
use crate::template::{instantiate, TemplateSlot, EXPORTS_WILDCARD, REGISTER};
use crate::uid::UidGenerator;
use ahash::HashMap;
use itertools::Itertools;

/// `<export>("<name>", <bound>)`, with the deferred initializer folded into an
/// assignment when one was patched in.
fn materialize_emission(emission: ExportEmission, export_cb: &str) -> Node<Stmt> {
  let loc = emission.loc;
  let bound = build::id(loc, emission.bound_identifier);
  let value = match emission.deferred_initializer {
    Some(initializer) => build::assign_expr(loc, bound, initializer),
    None => bound,
  };
  build::call_stmt(loc, build::id(loc, export_cb), vec![
    build::string(loc, emission.exported_name),
    value,
  ])
}

// Directives ("use strict" and friends) must stay a prologue, so they move to
// the top of the factory rather than into execute.
fn split_directive_prologue(retained: &mut Vec<RetainedStmt>) -> Vec<Node<Stmt>> {
  let mut prologue = Vec::new();
  loop {
    let is_directive = match retained.first() {
      Some(RetainedStmt::Plain(stmt)) => match stmt.stx.as_ref() {
        Stmt::Expr(expr) => matches!(expr.stx.expr.stx.as_ref(), Expr::LitStr(_)),
        _ => false,
      },
      _ => false,
    };
    if !is_directive {
      break;
    }
    match retained.remove(0) {
      RetainedStmt::Plain(stmt) => prologue.push(stmt),
      RetainedStmt::Emission(_) => unreachable!("checked to be a plain statement"),
    }
  }
  prologue
}

fn setter_action_stmt(
  action: SetterAction,
  ns: &str,
  export_cb: &str,
  uids: &mut UidGenerator,
) -> TransformResult<Node<Stmt>> {
  Ok(match action {
    SetterAction::RebindOne { loc, local, member } => build::expr_stmt(
      loc,
      build::assign_expr(
        loc,
        build::id(loc, local),
        build::member(loc, build::id(loc, ns), member),
      ),
    ),
    SetterAction::RebindBatch { loc, local } => build::expr_stmt(
      loc,
      build::assign_expr(loc, build::id(loc, local), build::id(loc, ns)),
    ),
    SetterAction::ReexportNamed {
      loc,
      exported,
      member,
    } => {
      let value = match member {
        Some(member) => build::member(loc, build::id(loc, ns), member),
        None => build::id(loc, ns),
      };
      build::call_stmt(loc, build::id(loc, export_cb), vec![
        build::string(loc, exported),
        value,
      ])
    }
    SetterAction::ReexportWildcard { loc: _ } => {
      let key = uids.fresh("key");
      instantiate(
        EXPORTS_WILDCARD,
        [
          ("KEY", TemplateSlot::Id(key)),
          ("OBJECT", TemplateSlot::Id(ns.to_string())),
          ("EXPORT", TemplateSlot::Id(export_cb.to_string())),
        ]
        .into_iter()
        .collect(),
      )?
    }
  })
}

/// Builds the single `System.register(...)` statement that replaces the whole
/// module body.
pub(crate) fn assemble(
  loc: Loc,
  module_name: &str,
  mut retained: Vec<RetainedStmt>,
  deps: DepRegistry,
  exports: ExportRegistry,
  export_cb: &str,
  uids: &mut UidGenerator,
) -> TransformResult<Node<Stmt>> {
  let prologue = split_directive_prologue(&mut retained);

  // Emissions are taken by id; extraction issues each id exactly once.
  let mut emissions: Vec<Option<ExportEmission>> =
    exports.into_emissions().into_iter().map(Some).collect();
  let mut execute_body = Vec::with_capacity(retained.len());
  for item in retained {
    execute_body.push(match item {
      RetainedStmt::Plain(stmt) => stmt,
      RetainedStmt::Emission(id) => {
        let emission = emissions[id.index()]
          .take()
          .unwrap_or_else(|| unreachable!("emission consumed twice"));
        materialize_emission(emission, export_cb)
      }
    });
  }

  let ns = uids.fresh("m");
  let mut dependencies = Vec::new();
  let mut setters = Vec::new();
  let mut setter_locals: Vec<String> = Vec::new();
  for (specifier, actions) in deps.into_entries() {
    dependencies.push(build::string(loc, specifier));
    if actions.is_empty() {
      // A side-effect-only dependency still occupies a setters position.
      setters.push(build::null(loc));
      continue;
    }
    let mut body = Vec::with_capacity(actions.len());
    for action in actions {
      if let Some(local) = action.local() {
        setter_locals.push(local.to_string());
      }
      body.push(setter_action_stmt(action, &ns, export_cb, uids)?);
    }
    setters.push(build::func_expr(loc, [ns.clone()], body));
  }

  let mut factory_body = prologue;
  factory_body.push(build::var_decl_stmt(
    loc,
    crate::ast::stmt::decl::VarDeclMode::Var,
    "__moduleName",
    Some(build::string(loc, module_name)),
  ));
  // Setter-assigned locals live in factory scope so both the setters and the
  // execute body observe rebinds.
  let hoisted: Vec<String> = setter_locals.into_iter().unique().collect();
  if !hoisted.is_empty() {
    factory_body.push(build::uninit_var_stmt(loc, hoisted));
  }
  factory_body.push(build::return_stmt(
    loc,
    build::object(loc, vec![
      ("setters", build::array(loc, setters)),
      ("execute", build::func_expr(loc, [], execute_body)),
    ]),
  ));

  let factory = build::func_expr(loc, [export_cb.to_string()], factory_body);
  let bindings: HashMap<&'static str, TemplateSlot> = [
    ("MODULE_NAME", TemplateSlot::Expr(build::string(loc, module_name))),
    (
      "MODULE_DEPENDENCIES",
      TemplateSlot::Expr(build::array(loc, dependencies)),
    ),
    ("MODULE_BODY", TemplateSlot::Expr(factory)),
  ]
  .into_iter()
  .collect();
  instantiate(REGISTER, bindings)
}
