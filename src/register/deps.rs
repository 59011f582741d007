use crate::loc::Loc;
use ahash::HashMap;

/// One statement to run inside a dependency's setter callback once that
/// dependency's namespace object becomes available.
#[derive(Debug)]
pub enum SetterAction {
  /// `local = <ns>.<member>;`
  RebindOne {
    loc: Loc,
    local: String,
    member: String,
  },
  /// `local = <ns>;`
  RebindBatch { loc: Loc, local: String },
  /// `<export>(<exported>, <ns>.<member>)`, or the whole namespace when
  /// `member` is absent (`export * as name from "..."`).
  ReexportNamed {
    loc: Loc,
    exported: String,
    member: Option<String>,
  },
  /// `for (var key in <ns>) <export>(key, <ns>[key]);`
  ReexportWildcard { loc: Loc },
}

impl SetterAction {
  /// Local binding this action assigns, if any.
  pub fn local(&self) -> Option<&str> {
    match self {
      SetterAction::RebindOne { local, .. } | SetterAction::RebindBatch { local, .. } => {
        Some(local)
      }
      _ => None,
    }
  }
}

/// Accumulates, per imported module specifier, the ordered setter actions to
/// run when that dependency arrives.
///
/// Insertion order is the only order: it is first-encounter order of each
/// specifier scanning the module top to bottom, and becomes both the
/// dependency array and the setters array of the registration call. The list
/// is monotonically built during one pass; there is no removal.
#[derive(Default)]
pub struct DepRegistry {
  order: Vec<String>,
  actions: HashMap<String, Vec<SetterAction>>,
}

impl DepRegistry {
  /// Ensures the specifier has an entry, possibly with no actions (a
  /// side-effect-only import still occupies a setters position).
  pub fn record_dependency(&mut self, specifier: &str) {
    if !self.actions.contains_key(specifier) {
      self.order.push(specifier.to_string());
      self.actions.insert(specifier.to_string(), Vec::new());
    }
  }

  pub fn add_setter_action(&mut self, specifier: &str, action: SetterAction) {
    self.record_dependency(specifier);
    self
      .actions
      .entry(specifier.to_string())
      .or_default()
      .push(action);
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }

  /// Specifiers with their setter actions, in first-encounter order.
  pub fn into_entries(mut self) -> Vec<(String, Vec<SetterAction>)> {
    self
      .order
      .into_iter()
      .map(|specifier| {
        let actions = self.actions.remove(&specifier).unwrap_or_default();
        (specifier, actions)
      })
      .collect()
  }
}
