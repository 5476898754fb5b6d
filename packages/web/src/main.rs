// Dioxus `rsx!` macro expands to unwraps internally; allow to avoid false positives.
#![allow(clippy::disallowed_methods)]

use dioxus::prelude::*;

use ui::Navbar;
use ui::admin::AdminQueueBoardPage;
use ui::appointments::MyAppointmentsPage;

/// User shown from the landing page until sign-in is wired to the hosted provider.
const DEMO_USER: &str = "demo";

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    // Citizen-facing routes
    #[layout(WebNavbar)]
        #[route("/")]
        Home {},
        #[route("/appointments/:user_id")]
        MyAppointments { user_id: String },
    #[end_layout]

    // Admin routes with sidebar navigation
    #[layout(AdminLayout)]
        #[route("/admin")]
        AdminRedirect {},
        #[route("/admin/queues")]
        AdminQueues {},
}

const FAVICON: Asset = asset!("/assets/favicon.svg");
const MAIN_CSS: Asset = asset!("/assets/main.css");
const ADMIN_CSS: Asset = asset!("/assets/admin.css");

fn main() {
    #[cfg(feature = "server")]
    {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        // Global app resources
        document::Link { rel: "icon", href: FAVICON }
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: ADMIN_CSS }

        Router::<Route> {}
    }
}

/// A web-specific Router around the shared `Navbar` component
/// which allows us to use the web-specific `Route` enum.
#[component]
fn WebNavbar() -> Element {
    rsx! {
        Navbar {
            Link {
                to: Route::Home {},
                "Home"
            }
            Link {
                to: Route::MyAppointments { user_id: DEMO_USER.to_string() },
                "My Appointments"
            }
            Link {
                to: Route::AdminQueues {},
                "Admin"
            }
        }

        Outlet::<Route> {}
    }
}

/// Landing page.
#[component]
fn Home() -> Element {
    rsx! {
        div { class: "page-container",
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "City Center Portal" }
                    p { class: "page-description",
                        "Follow your place in line for municipal and medical services."
                    }
                }
            }
            Link {
                to: Route::MyAppointments { user_id: DEMO_USER.to_string() },
                class: "btn btn-primary",
                "Track my appointments"
            }
        }
    }
}

/// My Appointments page.
#[component]
fn MyAppointments(user_id: String) -> Element {
    rsx! {
        MyAppointmentsPage { key: "{user_id}", user_id: user_id.clone() }
    }
}

/// Layout for admin routes with sidebar navigation.
#[component]
fn AdminLayout() -> Element {
    rsx! {
        div { class: "admin-layout",
            // Sidebar navigation
            aside { class: "admin-sidebar",
                div { class: "sidebar-header",
                    h1 { class: "sidebar-logo", "Queue Board" }
                }
                nav { class: "sidebar-nav",
                    div { class: "nav-section",
                        span { class: "nav-section-title", "Menu" }
                        Link {
                            to: Route::AdminQueues {},
                            class: "nav-link",
                            active_class: "active",
                            span { class: "nav-icon", "▦" }
                            span { "Queues" }
                        }
                    }
                }
                div { class: "sidebar-footer",
                    Link {
                        to: Route::Home {},
                        class: "nav-link nav-link-muted",
                        span { class: "nav-icon", "←" }
                        span { "Back to Portal" }
                    }
                }
            }

            // Main content area
            main { class: "admin-main",
                Outlet::<Route> {}
            }
        }
    }
}

/// Redirect /admin to /admin/queues.
#[component]
fn AdminRedirect() -> Element {
    let nav = use_navigator();
    use_effect(move || {
        nav.push(Route::AdminQueues {});
    });
    rsx! {}
}

/// Queue board page.
#[component]
fn AdminQueues() -> Element {
    rsx! {
        AdminQueueBoardPage {}
    }
}
