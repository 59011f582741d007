use crate::ast::build;
use crate::ast::class_or_object::{ClassOrObjKey, ClassOrObjVal, ObjMemberType};
use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::pat::{IdPat, ObjPat, Pat};
use crate::ast::expr::{Expr, FuncExpr, MemberExpr};
use crate::ast::func::{Func, FuncBody};
use crate::ast::import_export::{
  ExportName, ExportNames, ImportName, ImportNames, ModuleExportImportName,
};
use crate::ast::node::Node;
use crate::ast::stmt::decl::{ClassDecl, FuncDecl, VarDecl, VarDeclMode, VarDeclarator};
use crate::ast::stmt::{ExportDefaultExprStmt, ExportListStmt, ImportStmt, Stmt};
use crate::ast::stx::TopLevel;
use crate::err::TransformError;
use crate::loc::Loc;
use crate::operator::OperatorName;
use crate::{to_register, to_register_with_options, RegisterOptions};
use std::cell::RefCell;

fn loc() -> Loc {
  Loc::synthetic()
}

fn module(body: Vec<Node<Stmt>>) -> Node<TopLevel> {
  Node::new(loc(), TopLevel { body })
}

fn import_stmt(default: Option<&str>, names: Option<ImportNames>, module: &str) -> Node<Stmt> {
  Node::new(
    loc(),
    Stmt::Import(Node::new(loc(), ImportStmt {
      default: default.map(|name| build::pat_decl(loc(), name)),
      names,
      module: module.to_string(),
    })),
  )
}

/// `(importable, alias)` pairs of `import {a as b}`.
fn named_imports(pairs: &[(&str, &str)]) -> ImportNames {
  ImportNames::Specific(
    pairs
      .iter()
      .map(|(importable, alias)| {
        Node::new(loc(), ImportName {
          importable: ModuleExportImportName::Ident(importable.to_string()),
          alias: build::pat_decl(loc(), *alias),
        })
      })
      .collect(),
  )
}

fn namespace_import(alias: &str) -> ImportNames {
  ImportNames::All(build::pat_decl(loc(), alias))
}

/// `(local, exported)` pairs of `export {a as b} [from]`.
fn export_list(pairs: &[(&str, &str)], from: Option<&str>) -> Node<Stmt> {
  let names = pairs
    .iter()
    .map(|(local, exported)| {
      Node::new(loc(), ExportName {
        exportable: ModuleExportImportName::Ident(local.to_string()),
        alias: Node::new(loc(), IdPat {
          name: exported.to_string(),
        }),
      })
    })
    .collect();
  Node::new(
    loc(),
    Stmt::ExportList(Node::new(loc(), ExportListStmt {
      names: ExportNames::Specific(names),
      from: from.map(str::to_string),
    })),
  )
}

fn export_star(alias: Option<&str>, from: &str) -> Node<Stmt> {
  Node::new(
    loc(),
    Stmt::ExportList(Node::new(loc(), ExportListStmt {
      names: ExportNames::All(alias.map(|name| {
        Node::new(loc(), IdPat {
          name: name.to_string(),
        })
      })),
      from: Some(from.to_string()),
    })),
  )
}

fn var_stmt(export: bool, mode: VarDeclMode, name: &str, initializer: Option<Node<Expr>>) -> Node<Stmt> {
  Node::new(
    loc(),
    Stmt::VarDecl(Node::new(loc(), VarDecl {
      export,
      mode,
      declarators: vec![VarDeclarator {
        pattern: build::pat_decl(loc(), name),
        initializer,
      }],
    })),
  )
}

fn func_decl(export: bool, export_default: bool, name: Option<&str>) -> Node<Stmt> {
  Node::new(
    loc(),
    Stmt::FunctionDecl(Node::new(loc(), FuncDecl {
      export,
      export_default,
      name: name.map(|name| build::class_or_func_name(loc(), name)),
      function: Node::new(loc(), Func {
        arrow: false,
        async_: false,
        generator: false,
        parameters: vec![],
        body: FuncBody::Block(vec![]),
      }),
    })),
  )
}

fn class_decl(export: bool, export_default: bool, name: Option<&str>) -> Node<Stmt> {
  Node::new(
    loc(),
    Stmt::ClassDecl(Node::new(loc(), ClassDecl {
      export,
      export_default,
      name: name.map(|name| build::class_or_func_name(loc(), name)),
      extends: None,
      members: vec![],
    })),
  )
}

fn export_default_value(expression: Node<Expr>) -> Node<Stmt> {
  Node::new(
    loc(),
    Stmt::ExportDefaultExpr(Node::new(loc(), ExportDefaultExprStmt { expression })),
  )
}

enum Setter {
  Null,
  Fn { param: String, body: Vec<Node<Stmt>> },
}

struct Factory {
  directives: Vec<String>,
  module_name: String,
  hoisted: Vec<String>,
  setters: Vec<Setter>,
  execute: Vec<Node<Stmt>>,
}

struct Registration {
  name: String,
  dependencies: Vec<String>,
  export_param: String,
  factory: Factory,
}

fn lit_str(expr: Node<Expr>) -> String {
  let Expr::LitStr(lit) = *expr.stx else {
    panic!("expected string literal");
  };
  lit.stx.value
}

fn pat_name(pat: Node<Pat>) -> String {
  let Pat::Id(id) = *pat.stx else {
    panic!("expected identifier pattern");
  };
  id.stx.name
}

fn func_block(expr: Node<Expr>) -> (Vec<String>, Vec<Node<Stmt>>) {
  let Expr::Func(func) = *expr.stx else {
    panic!("expected function expression");
  };
  let Func {
    parameters, body, ..
  } = *func.stx.func.stx;
  let params = parameters
    .into_iter()
    .map(|param| pat_name(param.stx.pattern.stx.pat))
    .collect();
  let FuncBody::Block(body) = body else {
    panic!("expected block body");
  };
  (params, body)
}

fn open_factory(body: Vec<Node<Stmt>>) -> Factory {
  let mut directives = Vec::new();
  let mut module_name = None;
  let mut hoisted = Vec::new();
  let mut setters = None;
  let mut execute = None;
  for stmt in body {
    match *stmt.stx {
      Stmt::Expr(expr) => {
        assert!(module_name.is_none(), "directive must precede __moduleName");
        directives.push(lit_str(expr.stx.expr));
      }
      Stmt::VarDecl(decl) => {
        let mut declarators = decl.stx.declarators.into_iter();
        let first = declarators.next().unwrap();
        let first_name = pat_name(first.pattern.stx.pat);
        if first_name == "__moduleName" {
          assert!(module_name.is_none());
          module_name = Some(lit_str(first.initializer.unwrap()));
          assert!(declarators.next().is_none());
        } else {
          assert!(module_name.is_some(), "__moduleName must precede hoisted locals");
          assert!(first.initializer.is_none());
          hoisted.push(first_name);
          for declarator in declarators {
            assert!(declarator.initializer.is_none());
            hoisted.push(pat_name(declarator.pattern.stx.pat));
          }
        }
      }
      Stmt::Return(ret) => {
        let Expr::LitObj(obj) = *ret.stx.value.expect("return must carry a value").stx else {
          panic!("expected object literal");
        };
        for member in obj.stx.members {
          let ObjMemberType::Valued {
            key: ClassOrObjKey::Direct(key),
            val: ClassOrObjVal::Prop(Some(value)),
          } = member.stx.typ
          else {
            panic!("expected plain valued member");
          };
          match key.stx.key.as_str() {
            "setters" => {
              let Expr::LitArr(arr) = *value.stx else {
                panic!("expected setters array");
              };
              let parsed = arr
                .stx
                .elements
                .into_iter()
                .map(|elem| {
                  let LitArrElem::Single(value) = elem else {
                    panic!("expected plain array element");
                  };
                  if matches!(value.stx.as_ref(), Expr::LitNull(_)) {
                    return Setter::Null;
                  }
                  let (params, body) = func_block(value);
                  Setter::Fn {
                    param: params.into_iter().next().expect("setter takes the namespace"),
                    body,
                  }
                })
                .collect();
              setters = Some(parsed);
            }
            "execute" => {
              let (params, body) = func_block(value);
              assert!(params.is_empty());
              execute = Some(body);
            }
            other => panic!("unexpected factory member {}", other),
          }
        }
      }
      _ => panic!("unexpected statement in factory body"),
    }
  }
  Factory {
    directives,
    module_name: module_name.expect("factory declares __moduleName"),
    hoisted,
    setters: setters.expect("factory returns setters"),
    execute: execute.expect("factory returns execute"),
  }
}

fn open_registration(mut top_level: Node<TopLevel>) -> Registration {
  assert_eq!(top_level.stx.body.len(), 1);
  let stmt = top_level.stx.body.pop().unwrap();
  let Stmt::Expr(stmt) = *stmt.stx else {
    panic!("expected expression statement");
  };
  let Expr::Call(call) = *stmt.stx.expr.stx else {
    panic!("expected call");
  };
  let Expr::Member(callee) = *call.stx.callee.stx else {
    panic!("expected member callee");
  };
  let MemberExpr { left, right, .. } = *callee.stx;
  assert_eq!(right, "register");
  let Expr::Id(system) = *left.stx else {
    panic!("expected identifier receiver");
  };
  assert_eq!(system.stx.name, "System");

  let mut arguments = call.stx.arguments.into_iter();
  let name = lit_str(arguments.next().unwrap().stx.value);
  let Expr::LitArr(deps) = *arguments.next().unwrap().stx.value.stx else {
    panic!("expected dependency array");
  };
  let dependencies = deps
    .stx
    .elements
    .into_iter()
    .map(|elem| {
      let LitArrElem::Single(value) = elem else {
        panic!("expected plain array element");
      };
      lit_str(value)
    })
    .collect();
  let (params, body) = func_block(arguments.next().unwrap().stx.value);
  assert!(arguments.next().is_none());
  let export_param = params.into_iter().next().expect("factory takes the export callback");
  Registration {
    name,
    dependencies,
    export_param,
    factory: open_factory(body),
  }
}

fn registered(body: Vec<Node<Stmt>>, filename: &str) -> Registration {
  let mut top_level = module(body);
  to_register(&mut top_level, filename).unwrap();
  open_registration(top_level)
}

fn transform_err(body: Vec<Node<Stmt>>) -> TransformError {
  let mut top_level = module(body);
  to_register(&mut top_level, "mod.js").unwrap_err()
}

/// Asserts `<export_cb>("<name>", ...)` and yields the value argument.
fn export_call(stmt: Node<Stmt>, export_cb: &str, exported: &str) -> Node<Expr> {
  let Stmt::Expr(stmt) = *stmt.stx else {
    panic!("expected expression statement");
  };
  let Expr::Call(call) = *stmt.stx.expr.stx else {
    panic!("expected call");
  };
  let Expr::Id(callee) = *call.stx.callee.stx else {
    panic!("expected identifier callee");
  };
  assert_eq!(callee.stx.name, export_cb);
  let mut arguments = call.stx.arguments.into_iter();
  assert_eq!(lit_str(arguments.next().unwrap().stx.value), exported);
  let value = arguments.next().unwrap().stx.value;
  assert!(arguments.next().is_none());
  value
}

fn assert_id(expr: Node<Expr>, name: &str) {
  let Expr::Id(id) = *expr.stx else {
    panic!("expected identifier");
  };
  assert_eq!(id.stx.name, name);
}

/// Asserts `<local> = <value>` and yields the value.
fn assign_to(stmt: Node<Stmt>, local: &str) -> Node<Expr> {
  let Stmt::Expr(stmt) = *stmt.stx else {
    panic!("expected expression statement");
  };
  let Expr::Binary(binary) = *stmt.stx.expr.stx else {
    panic!("expected assignment");
  };
  assert_eq!(binary.stx.operator, OperatorName::Assignment);
  assert_id(binary.stx.left, local);
  binary.stx.right
}

fn assert_member(expr: Node<Expr>, object: &str, name: &str) {
  let Expr::Member(member) = *expr.stx else {
    panic!("expected member expression");
  };
  assert_eq!(member.stx.right, name);
  assert_id(member.stx.left, object);
}

#[test]
fn empty_module_registers_under_its_derived_name() {
  let reg = registered(vec![], "src/util/math.esm.js");
  assert_eq!(reg.name, "math");
  assert_eq!(reg.factory.module_name, "math");
  assert_eq!(reg.export_param, "_export");
  assert!(reg.dependencies.is_empty());
  assert!(reg.factory.setters.is_empty());
  assert!(reg.factory.execute.is_empty());
  assert!(reg.factory.hoisted.is_empty());
}

#[test]
fn dependencies_keep_first_encounter_order_without_duplicates() {
  let reg = registered(
    vec![
      import_stmt(None, Some(named_imports(&[("x", "x")])), "b"),
      import_stmt(None, Some(named_imports(&[("y", "y")])), "a"),
      import_stmt(None, Some(named_imports(&[("z", "z")])), "b"),
      import_stmt(None, None, "c"),
    ],
    "mod.js",
  );
  assert_eq!(reg.dependencies, vec!["b", "a", "c"]);
  assert_eq!(reg.factory.setters.len(), 3);
  let Setter::Fn { body, .. } = &reg.factory.setters[0] else {
    panic!("expected setter function");
  };
  // Both imports of "b" fold into its one setter.
  assert_eq!(body.len(), 2);
  assert!(matches!(reg.factory.setters[2], Setter::Null));
}

#[test]
fn named_import_rebinds_through_the_namespace_parameter() {
  let reg = registered(
    vec![import_stmt(None, Some(named_imports(&[("x", "y")])), "dep")],
    "mod.js",
  );
  assert_eq!(reg.factory.hoisted, vec!["y"]);
  let mut setters = reg.factory.setters;
  let Setter::Fn { param, body } = setters.remove(0) else {
    panic!("expected setter function");
  };
  assert_eq!(param, "_m");
  let mut body = body.into_iter();
  let value = assign_to(body.next().unwrap(), "y");
  assert_member(value, "_m", "x");
}

#[test]
fn default_and_namespace_imports_rebind_in_declaration_order() {
  let reg = registered(
    vec![import_stmt(Some("d"), Some(namespace_import("ns")), "dep")],
    "mod.js",
  );
  assert_eq!(reg.factory.hoisted, vec!["d", "ns"]);
  let mut setters = reg.factory.setters;
  let Setter::Fn { param, body } = setters.remove(0) else {
    panic!("expected setter function");
  };
  let mut body = body.into_iter();
  let value = assign_to(body.next().unwrap(), "d");
  assert_member(value, &param, "default");
  let value = assign_to(body.next().unwrap(), "ns");
  assert_id(value, &param);
}

#[test]
fn exported_var_splits_into_declaration_and_deferred_emission() {
  let reg = registered(
    vec![
      var_stmt(true, VarDeclMode::Var, "x", Some(build::string(loc(), "v"))),
      build::call_stmt(loc(), build::id(loc(), "log"), vec![build::id(loc(), "x")]),
    ],
    "mod.js",
  );
  assert_eq!(reg.factory.execute.len(), 3);
  let mut execute = reg.factory.execute.into_iter();
  let Stmt::VarDecl(decl) = *execute.next().unwrap().stx else {
    panic!("expected declaration");
  };
  assert!(decl.stx.declarators[0].initializer.is_none());
  let value = export_call(execute.next().unwrap(), "_export", "x");
  let value = {
    let Expr::Binary(binary) = *value.stx else {
      panic!("expected assignment argument");
    };
    assert_eq!(binary.stx.operator, OperatorName::Assignment);
    assert_id(binary.stx.left, "x");
    binary.stx.right
  };
  assert_eq!(lit_str(value), "v");
}

#[test]
fn exported_const_declaration_falls_back_to_var() {
  let reg = registered(
    vec![var_stmt(
      true,
      VarDeclMode::Const,
      "x",
      Some(build::null(loc())),
    )],
    "mod.js",
  );
  let Stmt::VarDecl(decl) = reg.factory.execute[0].stx.as_ref() else {
    panic!("expected declaration");
  };
  assert_eq!(decl.stx.mode, VarDeclMode::Var);
}

#[test]
fn redeclared_exported_var_keeps_both_initializers() {
  let reg = registered(
    vec![
      var_stmt(true, VarDeclMode::Var, "x", Some(build::string(loc(), "one"))),
      var_stmt(false, VarDeclMode::Var, "x", Some(build::string(loc(), "two"))),
    ],
    "mod.js",
  );
  assert_eq!(reg.factory.execute.len(), 3);
  let mut execute = reg.factory.execute.into_iter();
  let Stmt::VarDecl(decl) = *execute.next().unwrap().stx else {
    panic!("expected declaration");
  };
  assert!(decl.stx.declarators[0].initializer.is_none());
  let value = export_call(execute.next().unwrap(), "_export", "x");
  let Expr::Binary(binary) = *value.stx else {
    panic!("expected assignment argument");
  };
  assert_eq!(lit_str(binary.stx.right), "one");
  // The second declaration of the same name is plain code; its
  // initializer stays where it was written.
  let Stmt::VarDecl(decl) = *execute.next().unwrap().stx else {
    panic!("expected declaration");
  };
  let mut declarators = decl.stx.declarators.into_iter();
  let declarator = declarators.next().unwrap();
  assert_eq!(lit_str(declarator.initializer.unwrap()), "two");
}

#[test]
fn default_value_export_binds_a_fresh_name() {
  let reg = registered(
    vec![export_default_value(build::string(loc(), "v"))],
    "mod.js",
  );
  let mut execute = reg.factory.execute.into_iter();
  let Stmt::VarDecl(decl) = *execute.next().unwrap().stx else {
    panic!("expected declaration");
  };
  let mut declarators = decl.stx.declarators.into_iter();
  let declarator = declarators.next().unwrap();
  assert_eq!(pat_name(declarator.pattern.stx.pat), "_default");
  assert_eq!(lit_str(declarator.initializer.unwrap()), "v");
  // The value evaluated at the declaration; the emission reads the binding.
  let value = export_call(execute.next().unwrap(), "_export", "default");
  assert_id(value, "_default");
}

#[test]
fn default_arrow_export_takes_the_value_form() {
  let arrow = Node::new(
    loc(),
    Expr::Func(Node::new(loc(), FuncExpr {
      name: None,
      func: Node::new(loc(), Func {
        arrow: true,
        async_: false,
        generator: false,
        parameters: vec![],
        body: FuncBody::Expression(build::null(loc())),
      }),
    })),
  );
  let reg = registered(vec![export_default_value(arrow)], "mod.js");
  let mut execute = reg.factory.execute.into_iter();
  let Stmt::VarDecl(decl) = *execute.next().unwrap().stx else {
    panic!("expected declaration");
  };
  let mut declarators = decl.stx.declarators.into_iter();
  let declarator = declarators.next().unwrap();
  assert_eq!(pat_name(declarator.pattern.stx.pat), "_default");
  let Expr::Func(func) = *declarator.initializer.unwrap().stx else {
    panic!("expected function expression");
  };
  assert!(func.stx.func.stx.arrow);
  let value = export_call(execute.next().unwrap(), "_export", "default");
  assert_id(value, "_default");
}

#[test]
fn default_function_export_stays_a_declaration() {
  let reg = registered(vec![func_decl(false, true, Some("f"))], "mod.js");
  let mut execute = reg.factory.execute.into_iter();
  assert!(matches!(
    execute.next().unwrap().stx.as_ref(),
    Stmt::FunctionDecl(decl) if !decl.stx.export_default
  ));
  let value = export_call(execute.next().unwrap(), "_export", "default");
  assert_id(value, "f");
}

#[test]
fn default_class_export_gets_deferred_treatment() {
  let reg = registered(vec![class_decl(false, true, Some("Foo"))], "mod.js");
  let mut execute = reg.factory.execute.into_iter();
  let Stmt::VarDecl(decl) = *execute.next().unwrap().stx else {
    panic!("expected declaration");
  };
  assert!(decl.stx.declarators[0].initializer.is_none());
  let value = export_call(execute.next().unwrap(), "_export", "default");
  let Expr::Binary(binary) = *value.stx else {
    panic!("expected assignment argument");
  };
  assert_id(binary.stx.left, "Foo");
  assert!(matches!(binary.stx.right.stx.as_ref(), Expr::Class(_)));
}

#[test]
fn unnamed_default_class_uses_a_fresh_name() {
  let reg = registered(vec![class_decl(false, true, None)], "mod.js");
  let mut execute = reg.factory.execute.into_iter();
  let Stmt::VarDecl(decl) = *execute.next().unwrap().stx else {
    panic!("expected declaration");
  };
  let mut declarators = decl.stx.declarators.into_iter();
  assert_eq!(pat_name(declarators.next().unwrap().pattern.stx.pat), "_default");
}

#[test]
fn exported_named_class_emits_under_its_own_name() {
  let reg = registered(vec![class_decl(true, false, Some("A"))], "mod.js");
  let mut execute = reg.factory.execute.into_iter();
  execute.next().unwrap();
  let value = export_call(execute.next().unwrap(), "_export", "A");
  let Expr::Binary(binary) = *value.stx else {
    panic!("expected assignment argument");
  };
  assert_id(binary.stx.left, "A");
}

#[test]
fn specifier_export_emits_at_the_statement_position() {
  let reg = registered(
    vec![
      export_list(&[("a", "b")], None),
      var_stmt(false, VarDeclMode::Var, "a", Some(build::null(loc()))),
    ],
    "mod.js",
  );
  let mut execute = reg.factory.execute.into_iter();
  // The export statement preceded the declaration; the emission keeps its
  // position and reads the hoisted binding.
  let value = export_call(execute.next().unwrap(), "_export", "b");
  assert_id(value, "a");
  assert!(matches!(execute.next().unwrap().stx.as_ref(), Stmt::VarDecl(_)));
}

#[test]
fn specifier_export_of_unknown_binding_is_rejected() {
  let err = transform_err(vec![export_list(&[("ghost", "ghost")], None)]);
  assert_eq!(err.code(), "RG0002");
}

#[test]
fn destructured_export_declaration_is_rejected() {
  let pattern = Node::new(
    loc(),
    Pat::Obj(Node::new(loc(), ObjPat {
      properties: vec![],
      rest: None,
    })),
  );
  let stmt = Node::new(
    loc(),
    Stmt::VarDecl(Node::new(loc(), VarDecl {
      export: true,
      mode: VarDeclMode::Var,
      declarators: vec![VarDeclarator {
        pattern: Node::new(loc(), crate::ast::stmt::decl::PatDecl { pat: pattern }),
        initializer: Some(build::null(loc())),
      }],
    })),
  );
  assert_eq!(transform_err(vec![stmt]).code(), "RG0003");
}

#[test]
fn named_reexport_runs_inside_the_setter() {
  let reg = registered(vec![export_list(&[("x", "y")], Some("dep"))], "mod.js");
  assert_eq!(reg.dependencies, vec!["dep"]);
  assert!(reg.factory.execute.is_empty());
  assert!(reg.factory.hoisted.is_empty());
  let mut setters = reg.factory.setters;
  let Setter::Fn { param, body } = setters.remove(0) else {
    panic!("expected setter function");
  };
  let mut body = body.into_iter();
  let value = export_call(body.next().unwrap(), "_export", "y");
  assert_member(value, &param, "x");
}

#[test]
fn namespace_reexport_forwards_the_whole_namespace() {
  let reg = registered(vec![export_star(Some("ns"), "dep")], "mod.js");
  let mut setters = reg.factory.setters;
  let Setter::Fn { param, body } = setters.remove(0) else {
    panic!("expected setter function");
  };
  let mut body = body.into_iter();
  let value = export_call(body.next().unwrap(), "_export", "ns");
  assert_id(value, &param);
}

#[test]
fn wildcard_reexport_loops_over_the_namespace() {
  let reg = registered(vec![export_star(None, "dep")], "mod.js");
  let mut setters = reg.factory.setters;
  let Setter::Fn { param, body } = setters.remove(0) else {
    panic!("expected setter function");
  };
  let mut body = body.into_iter();
  let Stmt::ForIn(for_in) = *body.next().unwrap().stx else {
    panic!("expected for-in loop");
  };
  let json = serde_json::to_string(&for_in).unwrap();
  assert!(json.contains(&param));
  assert!(json.contains("_export"));
  assert!(json.contains("_key"));
}

#[test]
fn fresh_names_avoid_module_identifiers() {
  let reg = registered(
    vec![
      build::expr_stmt(loc(), build::id(loc(), "_export")),
      export_default_value(build::id(loc(), "_default")),
    ],
    "mod.js",
  );
  assert_eq!(reg.export_param, "_export2");
  let mut execute = reg.factory.execute.into_iter();
  execute.next().unwrap();
  let Stmt::VarDecl(decl) = *execute.next().unwrap().stx else {
    panic!("expected declaration");
  };
  let mut declarators = decl.stx.declarators.into_iter();
  assert_eq!(pat_name(declarators.next().unwrap().pattern.stx.pat), "_default2");
  export_call(execute.next().unwrap(), "_export2", "default");
}

#[test]
fn identifiers_matching_placeholder_names_pass_through() {
  // Module code is spliced into the wrapper scaffold, so bindings that
  // happen to share a placeholder's name must not be rewritten.
  let reg = registered(
    vec![
      var_stmt(false, VarDeclMode::Var, "MODULE_NAME", Some(build::null(loc()))),
      export_list(&[("MODULE_NAME", "MODULE_NAME")], None),
    ],
    "mod.js",
  );
  let mut execute = reg.factory.execute.into_iter();
  let Stmt::VarDecl(decl) = *execute.next().unwrap().stx else {
    panic!("expected declaration");
  };
  let mut declarators = decl.stx.declarators.into_iter();
  let declarator = declarators.next().unwrap();
  assert_eq!(pat_name(declarator.pattern.stx.pat), "MODULE_NAME");
  let value = export_call(execute.next().unwrap(), "_export", "MODULE_NAME");
  assert_id(value, "MODULE_NAME");
}

#[test]
fn directive_prologue_stays_at_the_top_of_the_factory() {
  let reg = registered(
    vec![
      build::expr_stmt(loc(), build::string(loc(), "use strict")),
      build::expr_stmt(loc(), build::id(loc(), "sideEffect")),
    ],
    "mod.js",
  );
  assert_eq!(reg.factory.directives, vec!["use strict"]);
  assert_eq!(reg.factory.execute.len(), 1);
}

#[test]
fn plain_statements_keep_their_order_in_execute() {
  let reg = registered(
    vec![
      build::expr_stmt(loc(), build::id(loc(), "first")),
      var_stmt(false, VarDeclMode::Let, "second", None),
      build::expr_stmt(loc(), build::id(loc(), "third")),
    ],
    "mod.js",
  );
  assert_eq!(reg.factory.execute.len(), 3);
  assert!(matches!(reg.factory.execute[1].stx.as_ref(), Stmt::VarDecl(_)));
}

#[test]
fn identical_modules_differ_only_by_name() {
  let body = || {
    vec![
      import_stmt(Some("d"), None, "dep"),
      var_stmt(true, VarDeclMode::Var, "x", Some(build::null(loc()))),
    ]
  };
  let mut first = module(body());
  let mut second = module(body());
  to_register(&mut first, "a/alphamod.js").unwrap();
  to_register(&mut second, "b/betamod.js").unwrap();
  let first = serde_json::to_string(&first).unwrap().replace("alphamod", "*");
  let second = serde_json::to_string(&second).unwrap().replace("betamod", "*");
  assert_eq!(first, second);
}

#[test]
fn diagnostic_reports_the_registration_summary() {
  let lines = RefCell::new(Vec::new());
  let diagnostic = |line: &str| lines.borrow_mut().push(line.to_string());
  let mut top_level = module(vec![
    import_stmt(None, None, "dep"),
    var_stmt(true, VarDeclMode::Var, "x", Some(build::null(loc()))),
  ]);
  let options = RegisterOptions::new("a/b.js").with_diagnostic(&diagnostic);
  to_register_with_options(&mut top_level, &options).unwrap();
  let lines = lines.into_inner();
  assert_eq!(lines.len(), 1);
  assert!(lines[0].contains("registering b"));
  assert!(lines[0].contains("1 dependencies"));
  assert!(lines[0].contains("1 exports"));
}
