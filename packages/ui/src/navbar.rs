use dioxus::prelude::*;

#[component]
pub fn Navbar(children: Element) -> Element {
    rsx! {
        nav { id: "navbar",
            span { class: "navbar-brand", "City Center Portal" }
            div { class: "navbar-links", {children} }
        }
    }
}
