//! Card showing one appointment's place in its queue.

use dioxus::prelude::*;
use portal_core::AppointmentProgress;

use super::ProgressBar;

/// Human-readable estimated wait.
pub fn wait_label(minutes: u32) -> String {
    match minutes {
        0 => "Your turn".to_string(),
        m if m < 60 => format!("~{} min", m),
        m if m % 60 == 0 => format!("~{} h", m / 60),
        m => format!("~{} h {} min", m / 60, m % 60),
    }
}

/// Props for QueueProgressCard.
#[derive(Props, Clone, PartialEq)]
pub struct QueueProgressCardProps {
    pub item: AppointmentProgress,
}

#[component]
pub fn QueueProgressCard(props: QueueProgressCardProps) -> Element {
    let appointment = &props.item.appointment;
    let progress = props.item.progress;
    let ticket = appointment.ticket;
    let booked = appointment.booked_at.format("%Y-%m-%d %H:%M").to_string();

    rsx! {
        div { class: "card queue-progress-card",
            div { class: "card-header",
                h2 { class: "card-title", "{appointment.service_name}" }
                span { class: "ticket-number", "Ticket #{ticket.own_ticket_number}" }
            }
            div { class: "card-body",
                if progress.is_active {
                    div { class: "queue-stats",
                        div { class: "stat",
                            span { class: "stat-value", "{progress.current_serving}" }
                            span { class: "stat-label", "Now serving" }
                        }
                        div { class: "stat",
                            span { class: "stat-value", "{progress.patients_ahead}" }
                            span { class: "stat-label", "Ahead of you" }
                        }
                        div { class: "stat",
                            span { class: "stat-value", {wait_label(progress.estimated_wait_minutes)} }
                            span { class: "stat-label", "Estimated wait" }
                        }
                    }
                    ProgressBar { percent: progress.percent() }
                    p { class: "progress-caption", "{progress.percent()}% of the way there" }
                } else {
                    div { class: "queue-stats",
                        div { class: "stat",
                            span { class: "stat-value", "{progress.patients_ahead}" }
                            span { class: "stat-label", "Ahead of you at booking" }
                        }
                    }
                    ProgressBar { percent: 0, active: false }
                    p { class: "hint", "Live queue status is not available right now" }
                }
                p { class: "booked-at tabular-nums", "Booked {booked}" }
            }
        }
    }
}
