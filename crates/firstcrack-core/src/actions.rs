//! Action registry — the closed set of notification actions.
//!
//! Every action has a canonical wire id (what the platform surface reports
//! back when a button is pressed) and a deep-link path segment. Platform
//! "default tap" sentinels all resolve to [`ActionId::Default`]; the
//! sentinel set is disjoint from the wire-id set.

use serde::{Deserialize, Serialize};

use crate::error::{FirstCrackError, Result};

/// Deep-link scheme used when no config override is in play.
pub const DEFAULT_SCHEME: &str = "firstcrack";

/// Identifiers a platform surface reports for a tap on the notification
/// body (as opposed to an action button). Chrome reports the empty string,
/// iOS its UNNotification constant.
pub const DEFAULT_TAP_SENTINELS: &[&str] = &[
    "",
    "default",
    "__default__",
    "com.apple.UNNotificationDefaultActionIdentifier",
];

/// A user-invokable notification action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    /// Tap on the notification body itself.
    Default,
    StopShot,
    ViewLive,
    ViewRecipe,
    RateBrew,
}

/// Every registered action, in a stable order. `Default` first.
pub const ALL_ACTIONS: &[ActionId] = &[
    ActionId::Default,
    ActionId::StopShot,
    ActionId::ViewLive,
    ActionId::ViewRecipe,
    ActionId::RateBrew,
];

impl ActionId {
    /// Canonical wire identifier carried in payloads and reported back by
    /// the surface on interaction.
    pub fn wire_id(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::StopShot => "stop_shot",
            Self::ViewLive => "view_live",
            Self::ViewRecipe => "view_recipe",
            Self::RateBrew => "rate_brew",
        }
    }

    /// Deep-link path segment appended to `<scheme>://brew/<brew_id>/`.
    pub fn segment(self) -> &'static str {
        match self {
            Self::Default => "details",
            Self::StopShot => "stop",
            Self::ViewLive => "live",
            Self::ViewRecipe => "recipe",
            Self::RateBrew => "rate",
        }
    }

    /// Button label shown on the notification surface.
    pub fn button_title(self) -> &'static str {
        match self {
            Self::Default => "Open",
            Self::StopShot => "Stop Shot",
            Self::ViewLive => "Watch Live",
            Self::ViewRecipe => "View Recipe",
            Self::RateBrew => "Rate Brew",
        }
    }

    /// Icon locator relative to the media base, for surfaces that render
    /// button icons (web). None for the body tap.
    pub fn icon(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::StopShot => Some("icons/stop.png"),
            Self::ViewLive => Some("icons/live.png"),
            Self::ViewRecipe => Some("icons/recipe.png"),
            Self::RateBrew => Some("icons/rate.png"),
        }
    }

    /// Whether handling this action needs the app brought to the
    /// foreground. Stopping a shot can be serviced in the background.
    pub fn requires_foreground(self) -> bool {
        !matches!(self, Self::StopShot)
    }
}

/// Resolve a wire action id to its registered action.
///
/// Default-tap sentinels resolve to [`ActionId::Default`]; anything else
/// outside the closed set is an error.
pub fn resolve(wire_id: &str) -> Result<ActionId> {
    if DEFAULT_TAP_SENTINELS.contains(&wire_id) {
        return Ok(ActionId::Default);
    }
    ALL_ACTIONS
        .iter()
        .copied()
        .find(|a| a.wire_id() == wire_id)
        .ok_or_else(|| FirstCrackError::UnknownAction(wire_id.to_string()))
}

/// Brew ids are interpolated into navigation targets, so they are held to
/// an allow-listed character class: alphanumeric, hyphen, underscore.
pub fn is_safe_brew_id(brew_id: &str) -> bool {
    !brew_id.is_empty()
        && brew_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Build `<scheme>://brew/<brew_id>/<segment>` after validating the brew id.
pub fn deep_link_with_scheme(scheme: &str, action: ActionId, brew_id: &str) -> Result<String> {
    if !is_safe_brew_id(brew_id) {
        return Err(FirstCrackError::InvalidBrewId(brew_id.to_string()));
    }
    Ok(format!("{scheme}://brew/{brew_id}/{}", action.segment()))
}

/// [`deep_link_with_scheme`] with the default scheme.
pub fn deep_link_for(action: ActionId, brew_id: &str) -> Result<String> {
    deep_link_with_scheme(DEFAULT_SCHEME, action, brew_id)
}

/// Generic details link scoped to no brew. Callers fall back to this when
/// the brew id fails validation, rather than dropping the interaction.
pub fn fallback_deep_link_with_scheme(scheme: &str) -> String {
    format!("{scheme}://brew/details")
}

pub fn fallback_deep_link() -> String {
    fallback_deep_link_with_scheme(DEFAULT_SCHEME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_ids_round_trip() {
        for action in ALL_ACTIONS.iter().copied() {
            if action == ActionId::Default {
                continue;
            }
            assert_eq!(resolve(action.wire_id()).unwrap(), action);
        }
    }

    #[test]
    fn test_wire_ids_unique() {
        let mut ids: Vec<_> = ALL_ACTIONS.iter().map(|a| a.wire_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ALL_ACTIONS.len());
    }

    #[test]
    fn test_sentinels_resolve_to_default() {
        for sentinel in DEFAULT_TAP_SENTINELS {
            assert_eq!(resolve(sentinel).unwrap(), ActionId::Default);
        }
    }

    #[test]
    fn test_sentinels_disjoint_from_button_wire_ids() {
        for action in ALL_ACTIONS.iter().copied() {
            if action == ActionId::Default {
                continue;
            }
            assert!(
                !DEFAULT_TAP_SENTINELS.contains(&action.wire_id()),
                "sentinel collides with {:?}",
                action
            );
        }
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(matches!(
            resolve("make_toast"),
            Err(FirstCrackError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_deep_link_shape() {
        let link = deep_link_for(ActionId::StopShot, "brew_1_2").unwrap();
        assert_eq!(link, "firstcrack://brew/brew_1_2/stop");
    }

    #[test]
    fn test_deep_link_rejects_unsafe_brew_id() {
        let err = deep_link_for(ActionId::ViewLive, "abc;rm -rf").unwrap_err();
        assert!(matches!(err, FirstCrackError::InvalidBrewId(_)));
        assert!(deep_link_for(ActionId::ViewLive, "").is_err());
    }

    #[test]
    fn test_fallback_link_carries_no_brew_id() {
        assert_eq!(fallback_deep_link(), "firstcrack://brew/details");
    }
}
