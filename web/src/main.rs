use dioxus::prelude::*;

mod download;
mod views;

use types::ReportKind;
use views::{Dashboard, Report, Reports};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(PortalLayout)]
        #[route("/")]
        Dashboard {},
        #[route("/reports")]
        Reports {},
        #[route("/reports/:slug")]
        Report { slug: String },
}

impl Route {
    pub fn reports() -> Self {
        Route::Reports {}
    }

    pub fn report(kind: ReportKind) -> Self {
        Route::Report {
            slug: kind.slug().to_string(),
        }
    }
}

fn main() {
    #[cfg(feature = "server")]
    {
        server::init_tracing();
        dioxus::serve(|| async move {
            server::init()?;

            Ok(dioxus::server::router(App))
        });
    }

    #[cfg(all(feature = "web", not(feature = "server")))]
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Airdesk" }
        document::Link { rel: "icon", href: asset!("/assets/favicon.svg") }
        document::Link { rel: "stylesheet", href: asset!("/assets/main.css") }

        Router::<Route> {}
    }
}

#[component]
fn NavLink(to: Route, children: Element) -> Element {
    let current_route: Route = use_route();
    let is_active = matches!(
        (&current_route, &to),
        (Route::Dashboard {}, Route::Dashboard {})
            | (Route::Reports {}, Route::Reports {})
            | (Route::Report { .. }, Route::Reports {})
    );

    rsx! {
        Link {
            to,
            class: if is_active { "active" },
            {children}
        }
    }
}

/// An error split into its headline and the causes below it.
#[derive(Clone, Debug, Default)]
pub struct ErrorInfo {
    pub message: String,
    pub chain: Vec<String>,
}

impl ErrorInfo {
    fn from_message(message: &str) -> Self {
        let error = types::Error::from(message);
        Self {
            message: message.to_string(),
            chain: error.chain().into_iter().map(String::from).collect(),
        }
    }

    pub fn from_server_error(err: &ServerFnError) -> Self {
        match err {
            ServerFnError::ServerError { message, .. } => Self::from_message(message),
            other => Self::from_message(&other.to_string()),
        }
    }
}

/// The error shown in the banner above every page.
#[derive(Clone, Copy)]
pub struct ErrorState(Signal<Option<ErrorInfo>>);

impl ErrorState {
    pub fn set(&mut self, error: impl Into<String>) {
        let message = error.into();
        self.0.set(Some(ErrorInfo::from_message(&message)));
    }

    pub fn set_server_error(&mut self, err: &ServerFnError) {
        tracing::warn!("server call failed: {err}");
        self.0.set(Some(ErrorInfo::from_server_error(err)));
    }

    pub fn clear(&mut self) {
        self.0.set(None);
    }
}

pub fn use_error() -> ErrorState {
    use_context::<ErrorState>()
}

#[component]
fn ErrorBanner() -> Element {
    let mut error_state = use_context::<ErrorState>();
    let error = error_state.0.read();

    let Some(err) = error.as_ref() else {
        return rsx! {};
    };
    let has_chain = err.chain.len() > 1;

    rsx! {
        div { class: "error-banner",
            div { class: "error-banner-content",
                div { class: "error-banner-header",
                    span { class: "error-banner-message",
                        {err.chain.first().cloned().unwrap_or_else(|| err.message.clone())}
                    }
                    div { class: "error-banner-actions",
                        button {
                            class: "error-banner-close",
                            onclick: move |_| error_state.clear(),
                            "×"
                        }
                    }
                }
                if has_chain {
                    div { class: "error-details",
                        div { class: "error-chain",
                            h4 { class: "error-section-title", "Caused by" }
                            ol { class: "error-chain-list",
                                for (i, msg) in err.chain.iter().skip(1).enumerate() {
                                    li { key: "{i}", class: "error-chain-item", "{msg}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn PortalLayout() -> Element {
    use_context_provider(|| ErrorState(Signal::new(None)));

    rsx! {
        div { class: "app-layout",
            aside { class: "sidebar",
                div { class: "sidebar-header",
                    span { class: "sidebar-logo", "Airdesk" }
                }
                nav { class: "sidebar-nav",
                    NavLink { to: Route::Dashboard {}, "Dashboard" }
                    NavLink { to: Route::reports(), "Reports" }
                }
            }
            main { class: "main-content",
                ErrorBanner {}
                Outlet::<Route> {}
            }
        }
    }
}
