//! My Appointments page - live queue progress for each of the user's bookings.

use chrono::{DateTime, Local, Utc};
use dioxus::core::spawn_forever;
use dioxus::prelude::*;
use portal_core::{AppointmentProgress, ProgressReport};

use super::QueueProgressCard;

/// Which body the page renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBody {
    Loading,
    LoadFailed,
    Empty,
    Appointments,
}

/// Everything the page knows from its refreshes so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshState {
    pub items: Vec<AppointmentProgress>,
    pub loaded: bool,
    pub load_failed: bool,
    /// The last refresh call itself failed.
    pub error: Option<String>,
    /// The call succeeded but live queue status could not be read.
    pub notice: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RefreshState {
    /// Fold one refresh outcome into the page state.
    ///
    /// A success clears any earlier error. A failure keeps the last good
    /// items; with none yet, the page shows the load failure instead of an
    /// empty list.
    pub fn record(&mut self, result: Result<ProgressReport, String>, now: DateTime<Utc>) {
        self.loaded = true;
        match result {
            Ok(report) => {
                self.items = report.items;
                self.load_failed = false;
                self.error = None;
                self.notice = report
                    .refresh_error
                    .map(|e| format!("Live queue status is unavailable: {}", e));
                self.updated_at = Some(now);
            }
            Err(e) => {
                self.load_failed = self.updated_at.is_none();
                self.error = Some(format!("Could not refresh queue status: {}", e));
            }
        }
    }

    pub fn banner(&self) -> Option<String> {
        self.error.clone().or_else(|| self.notice.clone())
    }

    pub fn dismiss_banner(&mut self) {
        self.error = None;
        self.notice = None;
    }

    pub fn body(&self) -> PageBody {
        if !self.loaded {
            PageBody::Loading
        } else if self.load_failed {
            PageBody::LoadFailed
        } else if self.items.is_empty() {
            PageBody::Empty
        } else {
            PageBody::Appointments
        }
    }
}

/// Props for MyAppointmentsPage.
#[derive(Props, Clone, PartialEq)]
pub struct MyAppointmentsPageProps {
    pub user_id: String,
}

/// My Appointments page component.
///
/// Refreshes the user's queue progress every 30 seconds while mounted; each
/// tick re-fetches the snapshots on the server. Leaving the page cancels the
/// loop and releases the server-side watcher.
#[component]
pub fn MyAppointmentsPage(props: MyAppointmentsPageProps) -> Element {
    let user_id = props.user_id.clone();

    let mut state = use_signal(RefreshState::default);
    let mut refreshing = use_signal(|| false);

    // Auto-refresh: re-fetch every 30 seconds
    let uid = user_id.clone();
    let _refresh = use_coroutine(move |_rx: UnboundedReceiver<()>| {
        let uid = uid.clone();
        async move {
            loop {
                let result = api::refresh_my_queues(uid.clone()).await.map_err(|e| {
                    tracing::warn!("Queue progress refresh failed: {}", e);
                    e.to_string()
                });
                state.write().record(result, Utc::now());

                crate::wait_refresh_interval().await;
            }
        }
    });

    // Release the watcher when the page goes away
    let uid = user_id.clone();
    use_drop(move || {
        let uid = uid.clone();
        spawn_forever(async move {
            if let Err(e) = api::release_queue_watch(uid).await {
                tracing::debug!("Failed to release queue watch: {}", e);
            }
        });
    });

    // Manual refresh handler
    let uid = user_id.clone();
    let on_refresh = move |_| {
        let uid = uid.clone();
        refreshing.set(true);
        spawn(async move {
            let result = api::refresh_my_queues(uid).await.map_err(|e| e.to_string());
            state.write().record(result, Utc::now());
            refreshing.set(false);
        });
    };

    let current = state();
    let updated = current.updated_at.map(|t| {
        t.with_timezone(&Local).format("%H:%M:%S").to_string()
    });

    rsx! {
        div { class: "page-container",
            // Page header
            div { class: "page-header",
                div { class: "page-header-content",
                    div { class: "page-header-title-row",
                        h1 { class: "page-title", "My Appointments" }
                        span { class: "auto-refresh-indicator", "Auto-refreshing" }
                    }
                    if let Some(updated) = updated {
                        p { class: "page-description tabular-nums", "Updated at {updated}" }
                    }
                }
                div { class: "page-header-actions",
                    button {
                        class: "btn btn-refresh",
                        disabled: refreshing(),
                        onclick: on_refresh,
                        if refreshing() { "Refreshing..." } else { "Refresh" }
                    }
                }
            }

            // Error banner
            if let Some(message) = current.banner() {
                div { class: "error-banner",
                    span { "{message}" }
                    button {
                        onclick: move |_| state.write().dismiss_banner(),
                        "×"
                    }
                }
            }

            match current.body() {
                PageBody::Loading => rsx! {
                    div { class: "loading", "Loading appointments..." }
                },
                PageBody::LoadFailed => rsx! {
                    div { class: "empty-state",
                        p { "Could not load appointments" }
                        p { class: "hint", "We will try again in a moment" }
                    }
                },
                PageBody::Empty => rsx! {
                    div { class: "empty-state",
                        p { "No appointments booked" }
                        p { class: "hint", "Booked appointments will appear here with their queue position" }
                    }
                },
                PageBody::Appointments => rsx! {
                    div { class: "appointment-grid",
                        for item in current.items.iter().cloned() {
                            QueueProgressCard {
                                key: "{item.appointment.id}",
                                item,
                            }
                        }
                    }
                },
            }
        }
    }
}
