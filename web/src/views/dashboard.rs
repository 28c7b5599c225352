use crate::Route;
use dioxus::prelude::*;
use types::ReportKind;

#[component]
pub fn Dashboard() -> Element {
    rsx! {
        div {
            div { class: "page-header",
                h1 { class: "page-title", "Dashboard" }
                p { class: "page-subtitle", "Welcome to Airdesk - your Wi-Fi management portal." }
            }
            div { class: "dashboard-grid",
                Link {
                    to: Route::reports(),
                    class: "dashboard-card",
                    h3 { class: "dashboard-card-title", "Reports" }
                    p { class: "dashboard-card-desc",
                        "Chart network usage, alerts, policy activity and access point uptime, then export them as PDF."
                    }
                }
                Link {
                    to: Route::report(ReportKind::NetworkUsage),
                    class: "dashboard-card",
                    h3 { class: "dashboard-card-title", "Network Usage" }
                    p { class: "dashboard-card-desc", "Data transferred over the last week." }
                }
                Link {
                    to: Route::report(ReportKind::DeviceInventory),
                    class: "dashboard-card",
                    h3 { class: "dashboard-card-title", "Device Inventory" }
                    p { class: "dashboard-card-desc", "Every managed device, by type." }
                }
            }
        }
    }
}
