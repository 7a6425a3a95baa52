//! A minimal before-action filter host.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::GateResult;
use crate::guard::{Filter, GuardHost};

/// Which actions a filter applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ActionScope {
    All,
    Only(Vec<String>),
    Except(Vec<String>),
}

impl ActionScope {
    /// `only` wins when both keys are present.
    fn from_options(options: &Map<String, Value>) -> Self {
        if options.contains_key("only") && options.contains_key("except") {
            tracing::warn!(
                only = %options["only"],
                except = %options["except"],
                "filter scoped with both `only` and `except`; ignoring `except`"
            );
        }

        if let Some(actions) = options.get("only") {
            Self::Only(action_names(actions))
        } else if let Some(actions) = options.get("except") {
            Self::Except(action_names(actions))
        } else {
            Self::All
        }
    }

    fn applies_to(&self, action: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(actions) => actions.iter().any(|a| a == action),
            Self::Except(actions) => !actions.iter().any(|a| a == action),
        }
    }
}

fn action_names(value: &Value) -> Vec<String> {
    match value {
        Value::String(action) => vec![action.clone()],
        Value::Array(actions) => actions
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

struct Registered<C> {
    scope: ActionScope,
    options: Map<String, Value>,
    filter: Filter<C>,
}

/// Runs registered filters, in registration order, before dispatching an
/// action.
///
/// Filters are scoped with the `only` and `except` options, each holding an
/// action name or a list of them. Other options are kept but not
/// interpreted.
pub struct FilterChain<C> {
    filters: Vec<Registered<C>>,
}

impl<C> FilterChain<C> {
    /// A chain with no filters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Number of registered filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether no filter is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Options each filter was registered with, in order.
    pub fn registered_options(&self) -> impl Iterator<Item = &Map<String, Value>> {
        self.filters.iter().map(|r| &r.options)
    }

    /// Run every filter that applies to `action`, stopping at the first
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing filter.
    pub fn run_filters(&self, ctx: &C, action: &str) -> GateResult<()> {
        self.filters
            .iter()
            .filter(|r| r.scope.applies_to(action))
            .try_for_each(|r| (r.filter)(ctx))
    }

    /// Run the filters for `action`, then `op` if they all pass.
    ///
    /// # Errors
    ///
    /// Returns the first filter error; `op` does not run.
    pub fn dispatch<T>(&self, ctx: &C, action: &str, op: impl FnOnce() -> T) -> GateResult<T> {
        if let Err(err) = self.run_filters(ctx, action) {
            tracing::debug!(action, error = %err, "action halted by filter");
            return Err(err);
        }
        Ok(op())
    }
}

impl<C> GuardHost<C> for FilterChain<C> {
    fn before_action(&mut self, options: Map<String, Value>, filter: Filter<C>) {
        self.filters.push(Registered {
            scope: ActionScope::from_options(&options),
            options,
            filter,
        });
    }
}

impl<C> Default for FilterChain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for FilterChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.filters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GateError;
    use crate::gate::AuthorizationGate;
    use crate::guard::{VerifyAccess, verify_access};
    use crate::rights::RightsSpec;
    use bitgrant_capabilities::{Family, FamilyDecl};
    use serde_json::json;
    use std::cell::RefCell;

    fn posts() -> Family {
        FamilyDecl::new(["create", "review", "update", "delete"])
            .on("post")
            .build()
            .unwrap()
    }

    fn options(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_scope_only_and_except() {
        let only = ActionScope::from_options(&options(json!({"only": ["destroy", "update"]})));
        assert!(only.applies_to("destroy"));
        assert!(!only.applies_to("show"));

        let except = ActionScope::from_options(&options(json!({"except": "index"})));
        assert!(!except.applies_to("index"));
        assert!(except.applies_to("show"));

        assert_eq!(ActionScope::from_options(&Map::new()), ActionScope::All);
    }

    #[test]
    fn test_scope_only_wins_over_except() {
        let scope =
            ActionScope::from_options(&options(json!({"only": "destroy", "except": "destroy"})));
        assert_eq!(scope, ActionScope::Only(vec!["destroy".to_owned()]));
        assert!(scope.applies_to("destroy"));
        assert!(!scope.applies_to("show"));
    }

    #[test]
    fn test_guard_stops_side_effects() {
        let mut chain = FilterChain::new();
        verify_access(
            &mut chain,
            options(json!({"can?": {"post": "delete"}, "deny": "No deleting"})),
        )
        .unwrap();

        let mut gate = AuthorizationGate::new();
        gate.grant([("post", posts().for_capabilities(["update"]))]);

        let deleted = RefCell::new(Vec::new());
        let err = chain
            .dispatch(&gate, "destroy", || deleted.borrow_mut().push(1))
            .unwrap_err();
        assert_eq!(err, GateError::forbidden("No deleting"));
        assert!(deleted.borrow().is_empty());
    }

    #[test]
    fn test_guard_allows_when_granted() {
        let mut chain = FilterChain::new();
        VerifyAccess::new(RightsSpec::any([("post", "review"), ("post", "delete")]))
            .register(&mut chain);

        let mut gate = AuthorizationGate::new();
        gate.grant([("post", posts().for_capabilities(["delete"]))]);
        assert_eq!(chain.dispatch(&gate, "destroy", || "gone").unwrap(), "gone");
    }

    #[test]
    fn test_unscoped_actions_skip_guard() {
        let mut chain = FilterChain::new();
        verify_access(
            &mut chain,
            options(json!({"can?": "delete", "except": ["index", "show"]})),
        )
        .unwrap();

        let gate = AuthorizationGate::new();
        assert!(chain.dispatch(&gate, "show", || ()).is_ok());
        assert!(chain.dispatch(&gate, "destroy", || ()).is_err());
    }

    #[test]
    fn test_forwarded_options_exclude_gate_keys() {
        let mut chain: FilterChain<AuthorizationGate> = FilterChain::new();
        verify_access(
            &mut chain,
            options(json!({"can?": "delete", "deny": "x", "only": "destroy", "prepend": true})),
        )
        .unwrap();

        let forwarded: Vec<_> = chain.registered_options().cloned().collect();
        assert_eq!(
            forwarded,
            vec![options(json!({"only": "destroy", "prepend": true}))]
        );
    }

    #[test]
    fn test_invalid_options_register_nothing() {
        let mut chain: FilterChain<AuthorizationGate> = FilterChain::new();
        assert!(verify_access(&mut chain, options(json!({"can?": ""}))).is_err());
        assert!(chain.is_empty());
    }

    #[test]
    fn test_filters_run_in_order() {
        let mut chain: FilterChain<AuthorizationGate> = FilterChain::new();
        VerifyAccess::new("read").deny("first").register(&mut chain);
        VerifyAccess::new("write").deny("second").register(&mut chain);
        assert_eq!(chain.len(), 2);

        let gate = AuthorizationGate::new();
        let err = chain.run_filters(&gate, "show").unwrap_err();
        assert_eq!(err.to_string(), "first");
    }
}
