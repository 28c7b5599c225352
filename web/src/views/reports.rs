use crate::Route;
use dioxus::prelude::*;
use types::ReportKind;

#[component]
pub fn Reports() -> Element {
    rsx! {
        div {
            div { class: "page-header",
                h1 { class: "page-title", "Reports" }
                p { class: "page-subtitle", "Pick a report to set its criteria and run it." }
            }
            div { class: "dashboard-grid",
                for kind in ReportKind::ALL {
                    Link {
                        key: "{kind.slug()}",
                        to: Route::report(kind),
                        class: "dashboard-card",
                        h3 { class: "dashboard-card-title", "{kind.title()}" }
                        p { class: "dashboard-card-desc", "{kind.description()}" }
                    }
                }
            }
        }
    }
}
