//! Named-template instantiation.
//!
//! Templates are statement fragments with uppercase placeholder identifiers.
//! [`instantiate`] substitutes each placeholder: an expression slot is a plain
//! expression spliced in exactly once; an identifier slot renames every
//! occurrence of the placeholder (expression and pattern positions both).

use crate::ast::build;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::err::{TransformError, TransformResult};
use crate::loc::Loc;
use ahash::HashMap;
use derive_visitor::{DriveMut, VisitorMut};
use once_cell::sync::Lazy;

/// `REGISTER(MODULE_NAME, MODULE_DEPENDENCIES, MODULE_BODY);`
pub const REGISTER: &str = "register";
/// `for (var KEY in OBJECT) { EXPORT(KEY, OBJECT[KEY]); }`
pub const EXPORTS_WILDCARD: &str = "exports-wildcard";

/// A value bound to one placeholder of a template.
pub enum TemplateSlot {
  /// Spliced in at exactly one expression position.
  Expr(Node<Expr>),
  /// Renames the placeholder identifier at every occurrence.
  Id(String),
}

static TEMPLATES: Lazy<HashMap<&'static str, fn() -> Node<Stmt>>> = Lazy::new(|| {
  let mut templates: HashMap<&'static str, fn() -> Node<Stmt>> = HashMap::default();
  templates.insert(REGISTER, register_template);
  templates.insert(EXPORTS_WILDCARD, exports_wildcard_template);
  templates
});

fn register_template() -> Node<Stmt> {
  let loc = Loc::synthetic();
  build::call_stmt(loc, build::member(loc, build::id(loc, "System"), "register"), vec![
    build::id(loc, "MODULE_NAME"),
    build::id(loc, "MODULE_DEPENDENCIES"),
    build::id(loc, "MODULE_BODY"),
  ])
}

fn exports_wildcard_template() -> Node<Stmt> {
  let loc = Loc::synthetic();
  let emit = build::call_stmt(loc, build::id(loc, "EXPORT"), vec![
    build::id(loc, "KEY"),
    build::computed_member(loc, build::id(loc, "OBJECT"), build::id(loc, "KEY")),
  ]);
  build::for_in_var_stmt(loc, "KEY", build::id(loc, "OBJECT"), vec![emit])
}

enum SlotState {
  // Taken on first use; a second use is a template-author defect.
  Expr(Option<Node<Expr>>),
  Id(String),
}

type IdPatNode = Node<IdPat>;

#[derive(VisitorMut)]
#[visitor(Expr(enter, exit), IdPatNode(enter))]
struct SubstituteVisitor<'a> {
  template: &'static str,
  slots: &'a mut HashMap<&'static str, SlotState>,
  // Expression nesting depth, and the depth at which a replacement was
  // spliced in. The driver descends into spliced expressions, but those are
  // caller-supplied code, not template text: identifiers inside them that
  // happen to match a placeholder name must be left alone.
  depth: usize,
  spliced_at: Option<usize>,
  error: Option<TransformError>,
}

impl SubstituteVisitor<'_> {
  fn fail(&mut self, slot: &str) {
    if self.error.is_none() {
      self.error = Some(TransformError::UnboundTemplateSlot {
        template: self.template,
        slot: slot.to_string(),
      });
    }
  }

  fn enter_expr(&mut self, expr: &mut Expr) {
    self.depth += 1;
    if self.spliced_at.is_some() {
      return;
    }
    let Expr::Id(id) = expr else {
      return;
    };
    let name = id.stx.name.clone();
    match self.slots.get_mut(name.as_str()) {
      Some(SlotState::Expr(replacement)) => match replacement.take() {
        Some(replacement) => {
          *expr = *replacement.stx;
          self.spliced_at = Some(self.depth);
        }
        None => self.fail(&name),
      },
      Some(SlotState::Id(renamed)) => id.stx.name = renamed.clone(),
      None => {}
    }
  }

  fn exit_expr(&mut self, _expr: &mut Expr) {
    if self.spliced_at == Some(self.depth) {
      self.spliced_at = None;
    }
    self.depth -= 1;
  }

  fn enter_id_pat_node(&mut self, node: &mut IdPatNode) {
    if self.spliced_at.is_some() {
      return;
    }
    let name = node.stx.name.clone();
    match self.slots.get(name.as_str()) {
      // An expression cannot substitute into a binding position.
      Some(SlotState::Expr(_)) => self.fail(&name),
      Some(SlotState::Id(renamed)) => node.stx.name = renamed.clone(),
      None => {}
    }
  }
}

/// Instantiates the named template with the given placeholder bindings.
///
/// Fails when the template does not exist or when any expression slot is not
/// consumed exactly once; both indicate a defect in this crate, not bad input.
pub fn instantiate(
  name: &str,
  bindings: HashMap<&'static str, TemplateSlot>,
) -> TransformResult<Node<Stmt>> {
  let (template, build) = TEMPLATES
    .get_key_value(name)
    .map(|(template, build)| (*template, *build))
    .ok_or_else(|| TransformError::UnknownTemplate { name: name.into() })?;
  let mut fragment = build();
  let mut slots: HashMap<&'static str, SlotState> = bindings
    .into_iter()
    .map(|(slot, value)| {
      (slot, match value {
        TemplateSlot::Expr(expr) => SlotState::Expr(Some(expr)),
        TemplateSlot::Id(renamed) => SlotState::Id(renamed),
      })
    })
    .collect();
  let mut visitor = SubstituteVisitor {
    template,
    slots: &mut slots,
    depth: 0,
    spliced_at: None,
    error: None,
  };
  fragment.drive_mut(&mut visitor);
  if let Some(error) = visitor.error {
    return Err(error);
  }
  for (slot, state) in slots {
    if let SlotState::Expr(Some(_)) = state {
      return Err(TransformError::UnboundTemplateSlot {
        template,
        slot: slot.to_string(),
      });
    }
  }
  Ok(fragment)
}
