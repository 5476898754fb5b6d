//! This crate contains all shared UI for the workspace.

// Dioxus `rsx!` macro expands to unwraps internally; allow to avoid false positives.
#![allow(clippy::disallowed_methods)]

mod navbar;
pub use navbar::Navbar;

mod state_badge;
pub use state_badge::StateBadge;

pub mod admin;
pub mod appointments;

/// Wait between background refreshes, in milliseconds (30 seconds).
pub const REFRESH_INTERVAL_MS: u32 = 30_000;

/// Sleep for one refresh period on the current platform.
pub(crate) async fn wait_refresh_interval() {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new(REFRESH_INTERVAL_MS).await;

    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_millis(REFRESH_INTERVAL_MS as u64)).await;
}
