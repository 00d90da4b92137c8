//! Action router — raw surface interactions in, canonical navigation
//! events out.
//!
//! Single-shot per interaction and stateless across calls; the action
//! registry is the only shared (read-only) table. Rejections are silent
//! from the user's perspective — the notification UI is already gone by
//! the time this runs — so they are logged and dropped, never surfaced.

use firstcrack_core::actions;
use firstcrack_core::{NavigationEvent, RawInteraction};

use crate::bridge;

/// The terminal result of routing one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Dispatched(NavigationEvent),
    Rejected { reason: String },
}

/// Decodes interactions and emits navigation events.
pub struct ActionRouter {
    scheme: String,
}

impl ActionRouter {
    pub fn new() -> Self {
        Self {
            scheme: actions::DEFAULT_SCHEME.into(),
        }
    }

    /// Use a configured deep-link scheme instead of the default.
    pub fn with_scheme(scheme: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
        }
    }

    /// Decode one raw interaction. No side effects; the caller decides
    /// what to do with the outcome.
    pub fn route(&self, raw: &RawInteraction) -> RouteOutcome {
        // No brew correlation id means no valid navigation target: fail
        // safe by not navigating rather than guessing.
        let Some(brew_id) = raw.brew_id.as_deref().filter(|id| !id.is_empty()) else {
            return self.reject(raw, "missing brew id");
        };

        let action = match actions::resolve(&raw.wire_action_id) {
            Ok(action) => action,
            Err(e) => return self.reject(raw, &e.to_string()),
        };

        // Tie-break rule: a non-empty deep link supplied by the delivering
        // surface wins over the locally computed one, since the surface may
        // carry server-supplied overrides.
        let supplied = raw.deep_link.as_deref().filter(|l| !l.is_empty());
        let deep_link = match supplied {
            Some(link) => link.to_string(),
            None => match actions::deep_link_with_scheme(&self.scheme, action, brew_id) {
                Ok(link) => link,
                // Unsafe brew id: degrade to the generic details link
                // rather than dropping the interaction or interpolating
                // the raw string into a navigation target.
                Err(e) => {
                    tracing::warn!("Interaction for brew {brew_id:?} falls back to details: {e}");
                    actions::fallback_deep_link_with_scheme(&self.scheme)
                }
            },
        };

        RouteOutcome::Dispatched(NavigationEvent {
            action,
            brew_id: brew_id.to_string(),
            deep_link,
        })
    }

    /// Decode one raw interaction and, on success, emit the navigation
    /// event on the process-wide bridge. Emission is the router's only
    /// observable side effect; a detached bridge downgrades the event to
    /// a logged drop, same as a rejection.
    pub fn handle(&self, raw: &RawInteraction) -> RouteOutcome {
        let outcome = self.route(raw);
        if let RouteOutcome::Dispatched(event) = &outcome {
            if let Err(e) = bridge::emit(event.clone()) {
                tracing::warn!("Navigation event for {} dropped: {e}", event.brew_id);
            }
        }
        outcome
    }

    fn reject(&self, raw: &RawInteraction, reason: &str) -> RouteOutcome {
        tracing::warn!(
            "Interaction rejected ({reason}): action {:?}, stage {:?}",
            raw.wire_action_id,
            raw.stage
        );
        RouteOutcome::Rejected {
            reason: reason.to_string(),
        }
    }
}

impl Default for ActionRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firstcrack_core::ActionId;

    fn raw(action: &str, brew_id: Option<&str>) -> RawInteraction {
        RawInteraction {
            wire_action_id: action.into(),
            brew_id: brew_id.map(String::from),
            deep_link: None,
            stage: None,
        }
    }

    #[test]
    fn test_stop_shot_routes_to_stop_link() {
        let outcome = ActionRouter::new().route(&raw("stop_shot", Some("brew_1_2")));
        assert_eq!(
            outcome,
            RouteOutcome::Dispatched(NavigationEvent {
                action: ActionId::StopShot,
                brew_id: "brew_1_2".into(),
                deep_link: "firstcrack://brew/brew_1_2/stop".into(),
            })
        );
    }

    #[test]
    fn test_default_tap_sentinels_route_to_details() {
        let router = ActionRouter::new();
        for sentinel in ["default", "com.apple.UNNotificationDefaultActionIdentifier", ""] {
            let outcome = router.route(&raw(sentinel, Some("brew_1_2")));
            let RouteOutcome::Dispatched(event) = outcome else {
                panic!("sentinel {sentinel:?} rejected");
            };
            assert_eq!(event.action, ActionId::Default);
            assert_eq!(event.deep_link, "firstcrack://brew/brew_1_2/details");
        }
    }

    #[test]
    fn test_missing_brew_id_rejected() {
        let router = ActionRouter::new();
        for interaction in [raw("stop_shot", None), raw("stop_shot", Some(""))] {
            assert!(matches!(
                router.route(&interaction),
                RouteOutcome::Rejected { .. }
            ));
        }
    }

    #[test]
    fn test_unknown_action_rejected() {
        let outcome = ActionRouter::new().route(&raw("make_toast", Some("brew_1_2")));
        let RouteOutcome::Rejected { reason } = outcome else {
            panic!("expected rejection");
        };
        assert!(reason.contains("make_toast"));
    }

    #[test]
    fn test_supplied_deep_link_wins_when_non_empty() {
        let mut interaction = raw("view_live", Some("brew_1_2"));
        interaction.deep_link = Some("firstcrack://brew/brew_1_2/live?camera=2".into());
        let RouteOutcome::Dispatched(event) = ActionRouter::new().route(&interaction) else {
            panic!("expected dispatch");
        };
        assert_eq!(event.deep_link, "firstcrack://brew/brew_1_2/live?camera=2");

        // An empty supplied link does not win.
        interaction.deep_link = Some(String::new());
        let RouteOutcome::Dispatched(event) = ActionRouter::new().route(&interaction) else {
            panic!("expected dispatch");
        };
        assert_eq!(event.deep_link, "firstcrack://brew/brew_1_2/live");
    }

    #[test]
    fn test_unsafe_brew_id_falls_back_to_generic_details() {
        let outcome = ActionRouter::new().route(&raw("view_live", Some("abc;rm -rf")));
        let RouteOutcome::Dispatched(event) = outcome else {
            panic!("expected dispatch with fallback link");
        };
        assert_eq!(event.deep_link, "firstcrack://brew/details");
        assert_eq!(event.brew_id, "abc;rm -rf");
    }

    #[test]
    fn test_scheme_override() {
        let outcome =
            ActionRouter::with_scheme("brewlab").route(&raw("view_recipe", Some("brew_1_2")));
        let RouteOutcome::Dispatched(event) = outcome else {
            panic!("expected dispatch");
        };
        assert_eq!(event.deep_link, "brewlab://brew/brew_1_2/recipe");
    }
}
