use dioxus::prelude::*;

/// Horizontal bar filled to `percent`, as computed by `QueueProgress::percent`.
#[component]
pub fn ProgressBar(percent: u8, #[props(default = true)] active: bool) -> Element {
    let state_class = if active { "progress-live" } else { "progress-idle" };

    rsx! {
        div {
            class: "progress-track {state_class}",
            role: "progressbar",
            "aria-valuemin": "0",
            "aria-valuemax": "100",
            "aria-valuenow": "{percent}",
            div {
                class: "progress-fill",
                style: "width: {percent}%",
            }
        }
    }
}
