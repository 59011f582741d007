//! Single left-to-right sweep over the top-level statement list: classifies
//! each statement's import/export shape, removes module syntax, and feeds the
//! dependency and export registries. A second sweep splices stripped
//! initializers into their emissions.

use crate::ast::class_or_object::ClassMember;
use crate::ast::expr::pat::{ClassOrFuncName, IdPat, Pat};
use crate::ast::expr::{ClassExpr, Expr};
use crate::ast::func::Func;
use crate::ast::import_export::{ExportName, ExportNames, ImportNames};
use crate::ast::node::Node;
use crate::ast::stmt::decl::{ClassDecl, FuncDecl, PatDecl, VarDecl, VarDeclMode};
use crate::ast::stmt::{ExportListStmt, ImportStmt, Stmt};
use crate::err::{TransformError, TransformResult};
use crate::loc::Loc;
use crate::register::deps::{DepRegistry, SetterAction};
use crate::register::exports::{EmissionId, ExportRegistry, DEFAULT_EXPORT_NAME};
use crate::uid::UidGenerator;
use ahash::HashSet;

/// One item of the body retained for the execute function.
#[derive(Debug)]
pub(crate) enum RetainedStmt {
  Plain(Node<Stmt>),
  /// Materialized as an export-callback call during wrapper assembly.
  Emission(EmissionId),
}

/// Everything the classification sweep produces besides registry contents.
#[derive(Debug)]
pub(crate) struct Extraction {
  pub retained: Vec<RetainedStmt>,
  /// Positions in `retained` of the declarations needing deferred-initializer
  /// treatment. Keyed by position, not binding name, so a redeclaration of an
  /// exported name elsewhere in the body is left alone. Consulted only by the
  /// patch sweep.
  pub deferred: HashSet<usize>,
}

/// The import/export shape of one top-level statement. Classification is
/// total: every statement maps to exactly one variant.
enum ModuleStmtShape {
  /// `export default <expr>` where the expression is not a declarable.
  DefaultValue {
    loc: Loc,
    expression: Node<Expr>,
  },
  /// `export default function [name]() {}` (as declaration or expression).
  DefaultFunction {
    loc: Loc,
    name: Option<Node<ClassOrFuncName>>,
    function: Node<Func>,
  },
  /// `export default class [Name] {}` (as declaration or expression).
  DefaultClass {
    loc: Loc,
    name: Option<Node<ClassOrFuncName>>,
    extends: Option<Node<Expr>>,
    members: Vec<Node<ClassMember>>,
  },
  /// `export var|let|const ... = ...;`
  VarExport { loc: Loc, decl: Node<VarDecl> },
  /// `export function f() {}`
  FuncExport {
    loc: Loc,
    name: Option<Node<ClassOrFuncName>>,
    function: Node<Func>,
  },
  /// `export class Name {}`
  ClassExport {
    loc: Loc,
    name: Option<Node<ClassOrFuncName>>,
    extends: Option<Node<Expr>>,
    members: Vec<Node<ClassMember>>,
  },
  /// `export {a, b as c};`
  SpecifierExport {
    loc: Loc,
    names: Vec<Node<ExportName>>,
  },
  /// `export * from "X";` / `export * as ns from "X";`
  WildcardFromExport {
    loc: Loc,
    source: String,
    alias: Option<Node<IdPat>>,
  },
  /// `export {a as b} from "X";`
  NamedFromExport {
    loc: Loc,
    source: String,
    names: Vec<Node<ExportName>>,
  },
  /// `import a, {b as c}, * as ns from "X";`
  SpecifierImport {
    loc: Loc,
    default: Option<Node<PatDecl>>,
    names: Option<ImportNames>,
    module: String,
  },
  /// `import "X";`
  SideEffectImport { loc: Loc, module: String },
  /// Not module syntax; retained unmodified.
  Other(Node<Stmt>),
}

fn classify(stmt: Node<Stmt>) -> ModuleStmtShape {
  let loc = stmt.loc;
  match *stmt.stx {
    Stmt::ExportDefaultExpr(n) => {
      let expression = n.stx.expression;
      let expression_loc = expression.loc;
      match *expression.stx {
        // Arrows are not named declarables; they take the value form.
        Expr::Func(func) if !func.stx.func.stx.arrow => ModuleStmtShape::DefaultFunction {
          loc,
          name: func.stx.name,
          function: func.stx.func,
        },
        Expr::Class(class) => ModuleStmtShape::DefaultClass {
          loc,
          name: class.stx.name,
          extends: class.stx.extends,
          members: class.stx.members,
        },
        other => ModuleStmtShape::DefaultValue {
          loc,
          expression: Node::new(expression_loc, other),
        },
      }
    }
    Stmt::FunctionDecl(n) => {
      let FuncDecl {
        export,
        export_default,
        name,
        function,
      } = *n.stx;
      if export_default {
        ModuleStmtShape::DefaultFunction { loc, name, function }
      } else if export {
        ModuleStmtShape::FuncExport { loc, name, function }
      } else {
        ModuleStmtShape::Other(Node::new(loc, Stmt::FunctionDecl(Node::new(loc, FuncDecl {
          export,
          export_default,
          name,
          function,
        }))))
      }
    }
    Stmt::ClassDecl(n) => {
      let ClassDecl {
        export,
        export_default,
        name,
        extends,
        members,
      } = *n.stx;
      if export_default {
        ModuleStmtShape::DefaultClass {
          loc,
          name,
          extends,
          members,
        }
      } else if export {
        ModuleStmtShape::ClassExport {
          loc,
          name,
          extends,
          members,
        }
      } else {
        ModuleStmtShape::Other(Node::new(loc, Stmt::ClassDecl(Node::new(loc, ClassDecl {
          export,
          export_default,
          name,
          extends,
          members,
        }))))
      }
    }
    Stmt::VarDecl(n) => {
      if n.stx.export {
        ModuleStmtShape::VarExport { loc, decl: n }
      } else {
        ModuleStmtShape::Other(Node::new(loc, Stmt::VarDecl(n)))
      }
    }
    Stmt::ExportList(n) => {
      let ExportListStmt { names, from } = *n.stx;
      match (names, from) {
        (ExportNames::All(alias), Some(source)) => ModuleStmtShape::WildcardFromExport {
          loc,
          source,
          alias,
        },
        (ExportNames::Specific(names), Some(source)) => ModuleStmtShape::NamedFromExport {
          loc,
          source,
          names,
        },
        (ExportNames::Specific(names), None) => ModuleStmtShape::SpecifierExport { loc, names },
        // `export *` without a source is not well-formed; upstream validation
        // owns rejecting it, so it carries no exports here.
        (ExportNames::All(_), None) => ModuleStmtShape::SpecifierExport {
          loc,
          names: Vec::new(),
        },
      }
    }
    Stmt::Import(n) => {
      let ImportStmt {
        default,
        names,
        module,
      } = *n.stx;
      if default.is_none() && names.is_none() {
        ModuleStmtShape::SideEffectImport { loc, module }
      } else {
        ModuleStmtShape::SpecifierImport {
          loc,
          default,
          names,
          module,
        }
      }
    }
    other => ModuleStmtShape::Other(Node::new(loc, other)),
  }
}

fn pattern_binding_names(pat: &Node<Pat>, out: &mut HashSet<String>) {
  match pat.stx.as_ref() {
    Pat::Id(id) => {
      out.insert(id.stx.name.clone());
    }
    Pat::Arr(arr) => {
      for elem in arr.stx.elements.iter().flatten() {
        pattern_binding_names(&elem.target, out);
      }
      if let Some(rest) = &arr.stx.rest {
        pattern_binding_names(rest, out);
      }
    }
    Pat::Obj(obj) => {
      for prop in &obj.stx.properties {
        pattern_binding_names(&prop.stx.target, out);
      }
      if let Some(rest) = &obj.stx.rest {
        out.insert(rest.stx.name.clone());
      }
    }
  }
}

// Exported bindings may be declared after the export statement that names
// them, so specifier exports are validated against the whole module's
// top-level bindings, collected up front.
fn top_level_binding_names(body: &[Node<Stmt>]) -> HashSet<String> {
  let mut names = HashSet::default();
  for stmt in body {
    match stmt.stx.as_ref() {
      Stmt::VarDecl(decl) => {
        for declarator in &decl.stx.declarators {
          pattern_binding_names(&declarator.pattern.stx.pat, &mut names);
        }
      }
      Stmt::FunctionDecl(decl) => {
        if let Some(name) = &decl.stx.name {
          names.insert(name.stx.name.clone());
        }
      }
      Stmt::ClassDecl(decl) => {
        if let Some(name) = &decl.stx.name {
          names.insert(name.stx.name.clone());
        }
      }
      Stmt::Import(import) => {
        if let Some(default) = &import.stx.default {
          pattern_binding_names(&default.stx.pat, &mut names);
        }
        match &import.stx.names {
          Some(ImportNames::All(alias)) => pattern_binding_names(&alias.stx.pat, &mut names),
          Some(ImportNames::Specific(specific)) => {
            for name in specific {
              pattern_binding_names(&name.stx.alias.stx.pat, &mut names);
            }
          }
          None => {}
        }
      }
      _ => {}
    }
  }
  names
}

fn pat_decl_name(decl: &Node<PatDecl>) -> TransformResult<String> {
  match decl.stx.pat.stx.as_ref() {
    Pat::Id(id) => Ok(id.stx.name.clone()),
    _ => Err(TransformError::UnsupportedPattern { loc: decl.loc }),
  }
}

fn named_or_fresh(
  name: Option<Node<ClassOrFuncName>>,
  loc: Loc,
  uids: &mut UidGenerator,
) -> Node<ClassOrFuncName> {
  name.unwrap_or_else(|| {
    Node::new(loc, ClassOrFuncName {
      name: uids.fresh(DEFAULT_EXPORT_NAME),
    })
  })
}

/// `var <name> = class <name> <extends> { <members> };`
///
/// The class body still executes in its original statement position; the
/// initializer is stripped into the emission by the patch sweep.
fn class_as_var_decl(
  loc: Loc,
  name: Node<ClassOrFuncName>,
  extends: Option<Node<Expr>>,
  members: Vec<Node<ClassMember>>,
) -> (String, Node<Stmt>) {
  let local = name.stx.name.clone();
  let class_expr = Node::new(
    loc,
    Expr::Class(Node::new(loc, ClassExpr {
      name: Some(name),
      extends,
      members,
    })),
  );
  let stmt = crate::ast::build::var_decl_stmt(loc, VarDeclMode::Var, local.clone(), Some(class_expr));
  (local, stmt)
}

pub(crate) fn extract(
  body: Vec<Node<Stmt>>,
  deps: &mut DepRegistry,
  exports: &mut ExportRegistry,
  uids: &mut UidGenerator,
) -> TransformResult<Extraction> {
  let declared = top_level_binding_names(&body);
  let mut retained = Vec::new();
  let mut deferred: HashSet<usize> = HashSet::default();

  for stmt in body {
    match classify(stmt) {
      ModuleStmtShape::DefaultValue { loc, expression } => {
        let local = uids.fresh(DEFAULT_EXPORT_NAME);
        retained.push(RetainedStmt::Plain(crate::ast::build::var_decl_stmt(
          loc,
          VarDeclMode::Var,
          local.clone(),
          Some(expression),
        )));
        let id = exports.record_export(DEFAULT_EXPORT_NAME, local, loc);
        retained.push(RetainedStmt::Emission(id));
      }
      ModuleStmtShape::DefaultFunction { loc, name, function } => {
        let name = named_or_fresh(name, loc, uids);
        let local = name.stx.name.clone();
        retained.push(RetainedStmt::Plain(Node::new(
          loc,
          Stmt::FunctionDecl(Node::new(loc, FuncDecl {
            export: false,
            export_default: false,
            name: Some(name),
            function,
          })),
        )));
        // Function declarations hoist, so the emission is not deferred.
        let id = exports.record_export(DEFAULT_EXPORT_NAME, local, loc);
        retained.push(RetainedStmt::Emission(id));
      }
      ModuleStmtShape::DefaultClass {
        loc,
        name,
        extends,
        members,
      } => {
        let name = named_or_fresh(name, loc, uids);
        let (local, decl) = class_as_var_decl(loc, name, extends, members);
        deferred.insert(retained.len());
        retained.push(RetainedStmt::Plain(decl));
        let id = exports.record_export(DEFAULT_EXPORT_NAME, local, loc);
        retained.push(RetainedStmt::Emission(id));
      }
      ModuleStmtShape::VarExport { loc, decl } => {
        let VarDecl {
          mode, declarators, ..
        } = *decl.stx;
        let mut locals = Vec::new();
        for declarator in &declarators {
          locals.push(pat_decl_name(&declarator.pattern)?);
        }
        deferred.insert(retained.len());
        retained.push(RetainedStmt::Plain(Node::new(
          loc,
          Stmt::VarDecl(Node::new(loc, VarDecl {
            export: false,
            mode,
            declarators,
          })),
        )));
        for local in locals {
          let id = exports.record_export(local.clone(), local, loc);
          retained.push(RetainedStmt::Emission(id));
        }
      }
      ModuleStmtShape::FuncExport { loc, name, function } => {
        let name = named_or_fresh(name, loc, uids);
        let local = name.stx.name.clone();
        retained.push(RetainedStmt::Plain(Node::new(
          loc,
          Stmt::FunctionDecl(Node::new(loc, FuncDecl {
            export: false,
            export_default: false,
            name: Some(name),
            function,
          })),
        )));
        let id = exports.record_export(local.clone(), local, loc);
        retained.push(RetainedStmt::Emission(id));
      }
      ModuleStmtShape::ClassExport {
        loc,
        name,
        extends,
        members,
      } => {
        let name = named_or_fresh(name, loc, uids);
        let (local, decl) = class_as_var_decl(loc, name, extends, members);
        deferred.insert(retained.len());
        retained.push(RetainedStmt::Plain(decl));
        let id = exports.record_export(local.clone(), local, loc);
        retained.push(RetainedStmt::Emission(id));
      }
      ModuleStmtShape::SpecifierExport { loc, names } => {
        for name in names {
          let ExportName { exportable, alias } = *name.stx;
          let local = exportable.as_str().to_string();
          if !declared.contains(&local) {
            return Err(TransformError::UnknownExportBinding {
              binding: local,
              loc: name.loc,
            });
          }
          let id = exports.record_export(alias.stx.name, local, loc);
          retained.push(RetainedStmt::Emission(id));
        }
      }
      ModuleStmtShape::WildcardFromExport { loc, source, alias } => {
        deps.record_dependency(&source);
        match alias {
          None => deps.add_setter_action(&source, SetterAction::ReexportWildcard { loc }),
          Some(ns) => deps.add_setter_action(&source, SetterAction::ReexportNamed {
            loc,
            exported: ns.stx.name.clone(),
            member: None,
          }),
        }
      }
      ModuleStmtShape::NamedFromExport { loc, source, names } => {
        deps.record_dependency(&source);
        for name in names {
          let ExportName { exportable, alias } = *name.stx;
          deps.add_setter_action(&source, SetterAction::ReexportNamed {
            loc,
            exported: alias.stx.name,
            member: Some(exportable.as_str().to_string()),
          });
        }
      }
      ModuleStmtShape::SpecifierImport {
        loc,
        default,
        names,
        module,
      } => {
        deps.record_dependency(&module);
        if let Some(default) = default {
          let local = pat_decl_name(&default)?;
          deps.add_setter_action(&module, SetterAction::RebindOne {
            loc,
            local,
            member: DEFAULT_EXPORT_NAME.to_string(),
          });
        }
        match names {
          Some(ImportNames::All(alias)) => {
            let local = pat_decl_name(&alias)?;
            deps.add_setter_action(&module, SetterAction::RebindBatch { loc, local });
          }
          Some(ImportNames::Specific(specific)) => {
            for name in specific {
              let local = pat_decl_name(&name.stx.alias)?;
              deps.add_setter_action(&module, SetterAction::RebindOne {
                loc,
                local,
                member: name.stx.importable.as_str().to_string(),
              });
            }
          }
          None => {}
        }
      }
      ModuleStmtShape::SideEffectImport { loc: _, module } => {
        deps.record_dependency(&module);
      }
      ModuleStmtShape::Other(stmt) => retained.push(RetainedStmt::Plain(stmt)),
    }
  }

  Ok(Extraction { retained, deferred })
}

/// Second sweep: strips initializers of deferred bindings out of the retained
/// declarations and splices them into the matching emissions.
pub(crate) fn apply_deferred_patches(
  retained: &mut [RetainedStmt],
  deferred: &HashSet<usize>,
  exports: &mut ExportRegistry,
) -> TransformResult<()> {
  if deferred.is_empty() {
    return Ok(());
  }
  for (index, item) in retained.iter_mut().enumerate() {
    if !deferred.contains(&index) {
      continue;
    }
    let RetainedStmt::Plain(stmt) = item else {
      continue;
    };
    let Stmt::VarDecl(decl) = stmt.stx.as_mut() else {
      continue;
    };
    let mut stripped = false;
    for declarator in &mut decl.stx.declarators {
      let Pat::Id(id) = declarator.pattern.stx.pat.stx.as_ref() else {
        continue;
      };
      if let Some(initializer) = declarator.initializer.take() {
        exports.patch_deferred_initializer(&id.stx.name, initializer)?;
        stripped = true;
      }
    }
    // A stripped `let`/`const` declarator would be left without an
    // initializer, so the whole declaration falls back to `var`.
    if stripped {
      decl.stx.mode = VarDeclMode::Var;
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::build;

  fn import_stmt(
    loc: Loc,
    default: Option<&str>,
    names: Option<ImportNames>,
    module: &str,
  ) -> Node<Stmt> {
    Node::new(
      loc,
      Stmt::Import(Node::new(loc, ImportStmt {
        default: default.map(|name| build::pat_decl(loc, name)),
        names,
        module: module.to_string(),
      })),
    )
  }

  #[test]
  fn side_effect_import_occupies_a_dependency_position() {
    let loc = Loc::synthetic();
    let mut deps = DepRegistry::default();
    let mut exports = ExportRegistry::default();
    let top = Node::new(loc, crate::ast::stx::TopLevel { body: vec![] });
    let mut uids = UidGenerator::for_top_level(&top);

    let body = vec![import_stmt(loc, None, None, "effects")];
    let extraction = extract(body, &mut deps, &mut exports, &mut uids).unwrap();
    assert!(extraction.retained.is_empty());
    let entries = deps.into_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "effects");
    assert!(entries[0].1.is_empty());
  }

  #[test]
  fn specifier_export_of_unknown_binding_fails() {
    let loc = Loc(10, 20);
    let mut deps = DepRegistry::default();
    let mut exports = ExportRegistry::default();
    let top = Node::new(loc, crate::ast::stx::TopLevel { body: vec![] });
    let mut uids = UidGenerator::for_top_level(&top);

    let body = vec![Node::new(
      loc,
      Stmt::ExportList(Node::new(loc, ExportListStmt {
        names: ExportNames::Specific(vec![Node::new(loc, ExportName {
          exportable: crate::ast::import_export::ModuleExportImportName::Ident("ghost".into()),
          alias: Node::new(loc, IdPat {
            name: "ghost".into(),
          }),
        })]),
        from: None,
      })),
    )];
    let err = extract(body, &mut deps, &mut exports, &mut uids).unwrap_err();
    assert_eq!(err.code(), "RG0002");
  }

  #[test]
  fn patch_sweep_strips_marked_initializers_only() {
    let loc = Loc::synthetic();
    let mut exports = ExportRegistry::default();
    exports.record_export("x", "x", loc);

    let mut deferred = HashSet::default();
    deferred.insert(0);

    let mut retained = vec![
      RetainedStmt::Plain(build::var_decl_stmt(
        loc,
        VarDeclMode::Const,
        "x",
        Some(build::string(loc, "v")),
      )),
      RetainedStmt::Plain(build::var_decl_stmt(
        loc,
        VarDeclMode::Let,
        "y",
        Some(build::string(loc, "w")),
      )),
    ];
    apply_deferred_patches(&mut retained, &deferred, &mut exports).unwrap();

    let RetainedStmt::Plain(first) = &retained[0] else {
      panic!("expected statement");
    };
    let Stmt::VarDecl(first) = first.stx.as_ref() else {
      panic!("expected var decl");
    };
    assert!(first.stx.declarators[0].initializer.is_none());
    assert_eq!(first.stx.mode, VarDeclMode::Var);

    let RetainedStmt::Plain(second) = &retained[1] else {
      panic!("expected statement");
    };
    let Stmt::VarDecl(second) = second.stx.as_ref() else {
      panic!("expected var decl");
    };
    assert!(second.stx.declarators[0].initializer.is_some());
    assert_eq!(second.stx.mode, VarDeclMode::Let);
  }
}
