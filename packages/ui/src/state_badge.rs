//! Queue state badge.

use dioxus::prelude::*;
use portal_core::QueueState;

/// Badge for displaying queue state.
#[component]
pub fn StateBadge(state: QueueState) -> Element {
    let (bg_class, text) = match state {
        QueueState::Active => ("badge-active", "Active"),
        QueueState::Paused => ("badge-paused", "Paused"),
        QueueState::Closed => ("badge-closed", "Closed"),
    };

    rsx! {
        span {
            class: "state-badge {bg_class}",
            {text}
        }
    }
}
