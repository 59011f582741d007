//! Constructors for the synthetic nodes the transform emits.

use crate::ast::class_or_object::{
  ClassOrObjKey, ClassOrObjMemberDirectKey, ClassOrObjVal, ObjMember, ObjMemberType,
};
use crate::ast::expr::lit::{LitArrElem, LitArrExpr, LitNullExpr, LitObjExpr, LitStrExpr};
use crate::ast::expr::pat::{ClassOrFuncName, IdPat, Pat};
use crate::ast::expr::{
  BinaryExpr, CallArg, CallExpr, ComputedMemberExpr, Expr, FuncExpr, IdExpr, MemberExpr,
};
use crate::ast::func::{Func, FuncBody};
use crate::ast::node::Node;
use crate::ast::stmt::decl::{ParamDecl, PatDecl, VarDecl, VarDeclMode, VarDeclarator};
use crate::ast::stmt::{ExprStmt, ForBody, ForInOfLhs, ForInStmt, ReturnStmt, Stmt};
use crate::loc::Loc;
use crate::operator::OperatorName;

pub fn id(loc: Loc, name: impl Into<String>) -> Node<Expr> {
  Node::new(loc, Expr::Id(Node::new(loc, IdExpr { name: name.into() })))
}

pub fn id_pat(loc: Loc, name: impl Into<String>) -> Node<Pat> {
  Node::new(loc, Pat::Id(Node::new(loc, IdPat { name: name.into() })))
}

pub fn pat_decl(loc: Loc, name: impl Into<String>) -> Node<PatDecl> {
  Node::new(loc, PatDecl {
    pat: id_pat(loc, name),
  })
}

pub fn class_or_func_name(loc: Loc, name: impl Into<String>) -> Node<ClassOrFuncName> {
  Node::new(loc, ClassOrFuncName { name: name.into() })
}

pub fn string(loc: Loc, value: impl Into<String>) -> Node<Expr> {
  Node::new(
    loc,
    Expr::LitStr(Node::new(loc, LitStrExpr {
      value: value.into(),
    })),
  )
}

pub fn null(loc: Loc) -> Node<Expr> {
  Node::new(loc, Expr::LitNull(Node::new(loc, LitNullExpr {})))
}

pub fn array(loc: Loc, elements: Vec<Node<Expr>>) -> Node<Expr> {
  Node::new(
    loc,
    Expr::LitArr(Node::new(loc, LitArrExpr {
      elements: elements.into_iter().map(LitArrElem::Single).collect(),
    })),
  )
}

/// Object literal with plain identifier keys and non-shorthand values.
pub fn object(loc: Loc, props: Vec<(&str, Node<Expr>)>) -> Node<Expr> {
  let members = props
    .into_iter()
    .map(|(key, value)| {
      Node::new(loc, ObjMember {
        typ: ObjMemberType::Valued {
          key: ClassOrObjKey::Direct(Node::new(loc, ClassOrObjMemberDirectKey {
            key: key.to_string(),
          })),
          val: ClassOrObjVal::Prop(Some(value)),
        },
      })
    })
    .collect();
  Node::new(loc, Expr::LitObj(Node::new(loc, LitObjExpr { members })))
}

pub fn expr_stmt(loc: Loc, expr: Node<Expr>) -> Node<Stmt> {
  Node::new(loc, Stmt::Expr(Node::new(loc, ExprStmt { expr })))
}

pub fn binary_expr(
  loc: Loc,
  operator: OperatorName,
  left: Node<Expr>,
  right: Node<Expr>,
) -> Node<Expr> {
  Node::new(
    loc,
    Expr::Binary(Node::new(loc, BinaryExpr {
      operator,
      left,
      right,
    })),
  )
}

pub fn assign_expr(loc: Loc, left: Node<Expr>, right: Node<Expr>) -> Node<Expr> {
  binary_expr(loc, OperatorName::Assignment, left, right)
}

pub fn member(loc: Loc, object: Node<Expr>, name: impl Into<String>) -> Node<Expr> {
  Node::new(
    loc,
    Expr::Member(Node::new(loc, MemberExpr {
      optional_chaining: false,
      left: object,
      right: name.into(),
    })),
  )
}

pub fn computed_member(loc: Loc, object: Node<Expr>, key: Node<Expr>) -> Node<Expr> {
  Node::new(
    loc,
    Expr::ComputedMember(Node::new(loc, ComputedMemberExpr {
      optional_chaining: false,
      object,
      member: key,
    })),
  )
}

pub fn call(loc: Loc, callee: Node<Expr>, arguments: Vec<Node<Expr>>) -> Node<Expr> {
  let arguments = arguments
    .into_iter()
    .map(|value| {
      Node::new(loc, CallArg {
        spread: false,
        value,
      })
    })
    .collect();
  Node::new(
    loc,
    Expr::Call(Node::new(loc, CallExpr {
      optional_chaining: false,
      callee,
      arguments,
    })),
  )
}

pub fn call_stmt(loc: Loc, callee: Node<Expr>, arguments: Vec<Node<Expr>>) -> Node<Stmt> {
  expr_stmt(loc, call(loc, callee, arguments))
}

pub fn var_decl_stmt(
  loc: Loc,
  mode: VarDeclMode,
  name: impl Into<String>,
  initializer: Option<Node<Expr>>,
) -> Node<Stmt> {
  let declarator = VarDeclarator {
    pattern: pat_decl(loc, name),
    initializer,
  };
  Node::new(
    loc,
    Stmt::VarDecl(Node::new(loc, VarDecl {
      export: false,
      mode,
      declarators: vec![declarator],
    })),
  )
}

/// One `var a, b, c;` statement declaring every name uninitialized.
pub fn uninit_var_stmt(loc: Loc, names: impl IntoIterator<Item = String>) -> Node<Stmt> {
  let declarators = names
    .into_iter()
    .map(|name| VarDeclarator {
      pattern: pat_decl(loc, name),
      initializer: None,
    })
    .collect();
  Node::new(
    loc,
    Stmt::VarDecl(Node::new(loc, VarDecl {
      export: false,
      mode: VarDeclMode::Var,
      declarators,
    })),
  )
}

pub fn return_stmt(loc: Loc, value: Node<Expr>) -> Node<Stmt> {
  Node::new(loc, Stmt::Return(Node::new(loc, ReturnStmt { value: Some(value) })))
}

/// Anonymous non-arrow function expression with plain identifier parameters.
pub fn func_expr(
  loc: Loc,
  params: impl IntoIterator<Item = String>,
  body: Vec<Node<Stmt>>,
) -> Node<Expr> {
  let parameters = params
    .into_iter()
    .map(|name| {
      Node::new(loc, ParamDecl {
        rest: false,
        pattern: pat_decl(loc, name),
        default_value: None,
      })
    })
    .collect();
  let func = Func {
    arrow: false,
    async_: false,
    generator: false,
    parameters,
    body: FuncBody::Block(body),
  };
  Node::new(
    loc,
    Expr::Func(Node::new(loc, FuncExpr {
      name: None,
      func: Node::new(loc, func),
    })),
  )
}

/// `for (var <key> in <object>) { <body> }`
pub fn for_in_var_stmt(
  loc: Loc,
  key: impl Into<String>,
  object: Node<Expr>,
  body: Vec<Node<Stmt>>,
) -> Node<Stmt> {
  Node::new(
    loc,
    Stmt::ForIn(Node::new(loc, ForInStmt {
      lhs: ForInOfLhs::Decl((VarDeclMode::Var, pat_decl(loc, key))),
      rhs: object,
      body: Node::new(loc, ForBody { body }),
    })),
  )
}
