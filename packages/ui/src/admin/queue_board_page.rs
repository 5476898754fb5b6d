//! Queue board page - every queue snapshot at a glance.

use dioxus::prelude::*;
use portal_core::{QueueState, QueueStatus};

use super::QueueRow;

/// Queue board page component.
#[component]
pub fn AdminQueueBoardPage() -> Element {
    let mut statuses = use_signal(Vec::<QueueStatus>::new);
    let mut error = use_signal(|| None::<String>);

    let _refresh = use_coroutine(move |_rx: UnboundedReceiver<()>| async move {
        loop {
            match api::list_queue_statuses().await {
                Ok(s) => statuses.set(s),
                Err(e) => error.set(Some(format!("Failed to load queues: {}", e))),
            }

            crate::wait_refresh_interval().await;
        }
    });

    let active = statuses()
        .iter()
        .filter(|s| s.state == QueueState::Active)
        .count();
    let waiting: u32 = statuses().iter().map(|s| s.waiting()).sum();

    rsx! {
        div { class: "page-container",
            // Page header
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Queues" }
                    p { class: "page-description", "Live counters for every service queue" }
                }
            }

            // Error banner
            if let Some(err) = error() {
                div { class: "error-banner",
                    span { "{err}" }
                    button {
                        onclick: move |_| error.set(None),
                        "×"
                    }
                }
            }

            // Stats summary
            div { class: "stats-grid",
                div { class: "stat-card",
                    div { class: "stat-card-value", "{statuses().len()}" }
                    div { class: "stat-card-label", "Total Queues" }
                }
                div { class: "stat-card",
                    div { class: "stat-card-value", "{active}" }
                    div { class: "stat-card-label", "Active" }
                }
                div { class: "stat-card stat-card-accent",
                    div { class: "stat-card-value", "{waiting}" }
                    div { class: "stat-card-label", "Waiting" }
                }
            }

            // Queues table
            div { class: "card",
                div { class: "card-header",
                    h2 { class: "card-title", "All Queues" }
                }

                if statuses().is_empty() {
                    div { class: "empty-state",
                        div { class: "empty-state-icon", "▦" }
                        p { "No queues found" }
                        p { class: "hint", "Queues appear here once the backend publishes a snapshot" }
                    }
                } else {
                    div { class: "table-container",
                        table { class: "data-table",
                            thead {
                                tr {
                                    th { "Queue" }
                                    th { "State" }
                                    th { class: "text-right", "Now serving" }
                                    th { class: "text-right", "Next number" }
                                    th { class: "text-right", "Waiting" }
                                    th { "Updated" }
                                }
                            }
                            tbody {
                                for status in statuses().into_iter() {
                                    QueueRow { key: "{status.queue_id}", status }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
