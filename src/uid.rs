//! Per-module synthetic-identifier allocation.

use crate::ast::expr::pat::{ClassOrFuncName, IdPat};
use crate::ast::expr::IdExpr;
use crate::ast::node::Node;
use crate::ast::stx::TopLevel;
use ahash::HashSet;
use derive_visitor::{Drive, Visitor};

type IdExprNode = Node<IdExpr>;
type IdPatNode = Node<IdPat>;
type ClassOrFuncNameNode = Node<ClassOrFuncName>;

#[derive(Visitor)]
#[visitor(IdExprNode(enter), IdPatNode(enter), ClassOrFuncNameNode(enter))]
struct NameCollector {
  names: HashSet<String>,
}

impl NameCollector {
  fn enter_id_expr_node(&mut self, node: &IdExprNode) {
    self.names.insert(node.stx.name.clone());
  }

  fn enter_id_pat_node(&mut self, node: &IdPatNode) {
    self.names.insert(node.stx.name.clone());
  }

  fn enter_class_or_func_name_node(&mut self, node: &ClassOrFuncNameNode) {
    self.names.insert(node.stx.name.clone());
  }
}

/// Allocates identifiers guaranteed distinct from every other identifier,
/// user-written or synthetic, within one module.
///
/// Each module transform owns one generator; nothing is shared across
/// invocations. Allocation is monotonic: `_hint`, `_hint2`, `_hint3`, ...
pub struct UidGenerator {
  used: HashSet<String>,
}

impl UidGenerator {
  /// Collects every identifier appearing anywhere in the module.
  pub fn for_top_level(top_level: &Node<TopLevel>) -> Self {
    let mut collector = NameCollector {
      names: HashSet::default(),
    };
    top_level.drive(&mut collector);
    UidGenerator {
      used: collector.names,
    }
  }

  pub fn fresh(&mut self, hint: &str) -> String {
    let mut n = 1usize;
    loop {
      let candidate = if n == 1 {
        format!("_{}", hint)
      } else {
        format!("_{}{}", hint, n)
      };
      if !self.used.contains(&candidate) {
        self.used.insert(candidate.clone());
        return candidate;
      }
      n += 1;
    }
  }
}
