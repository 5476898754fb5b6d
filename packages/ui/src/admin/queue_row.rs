//! Table row for one queue snapshot.

use dioxus::prelude::*;
use portal_core::QueueStatus;

use crate::StateBadge;

#[component]
pub fn QueueRow(status: QueueStatus) -> Element {
    let updated = status.last_updated.format("%Y-%m-%d %H:%M:%S UTC").to_string();

    rsx! {
        tr {
            td { class: "mono", "{status.queue_id}" }
            td { StateBadge { state: status.state } }
            td { class: "text-right tabular-nums", "{status.current_serving_number}" }
            td { class: "text-right tabular-nums", "{status.next_number}" }
            td { class: "text-right tabular-nums", "{status.waiting()}" }
            td { class: "tabular-nums", "{updated}" }
        }
    }
}
