use crate::{Route, download, use_error};
use dioxus::prelude::*;
use types::{
    Criteria, CriteriaValue, ExportRequest, ReportKind, criteria::validate, table::TableView,
};
use ui::{ChartView, CriteriaForm, ReportTable};

#[component]
pub fn Report(slug: String) -> Element {
    match ReportKind::from_slug(&slug) {
        // Keyed so that switching reports starts from fresh criteria.
        Ok(kind) => rsx! {
            ReportPage { key: "{slug}", kind }
        },
        Err(error) => rsx! {
            div { class: "empty-state",
                p { "{error}" }
                Link { to: Route::reports(), class: "btn btn-secondary", "Back to reports" }
            }
        },
    }
}

#[component]
fn ReportPage(kind: ReportKind) -> Element {
    let mut error_state = use_error();
    let today = use_hook(|| jiff::Zoned::now().date());

    let mut criteria = use_signal(|| Criteria::defaults(&kind.fields(), today));
    // What the chart and table currently show.
    let mut applied = use_signal(|| Criteria::defaults(&kind.fields(), today));
    let errors = use_memo(move || validate(&kind.fields(), &criteria.read()));

    let rows = use_memo(move || kind.filter(&applied.read(), kind.sample_rows(today)));
    let table = use_memo(move || TableView::build(&kind.columns(), &rows.read()));
    let chart = use_memo(move || kind.chart(&rows.read()));

    let mut include_chart = use_signal(|| true);
    let mut exporting = use_signal(|| false);

    let has_chart = chart.read().is_some();
    let is_valid = errors.read().is_empty();
    let is_stale = *criteria.read() != *applied.read();

    let export = move |_: Event<MouseData>| {
        let request = ExportRequest {
            report: kind.slug().to_string(),
            criteria: applied(),
            include_chart: has_chart && include_chart(),
        };
        spawn(async move {
            exporting.set(true);
            error_state.clear();
            match api::export_report(request).await {
                Ok(file) => {
                    if let Err(e) = download::save(&file).await {
                        error_state.set(e.message);
                    }
                }
                Err(e) => error_state.set_server_error(&e),
            }
            exporting.set(false);
        });
    };

    rsx! {
        div {
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "{kind.title()}" }
                    p { class: "page-subtitle", "{kind.description()}" }
                }
                div { class: "page-header-actions",
                    if has_chart {
                        label { class: "checkbox-label",
                            input {
                                r#type: "checkbox",
                                checked: include_chart(),
                                onchange: move |e| include_chart.set(e.checked()),
                            }
                            span { "Include chart" }
                        }
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: exporting(),
                        onclick: export,
                        if exporting() { "Exporting..." } else { "Export PDF" }
                    }
                }
            }

            div { class: "grid grid-cols-3",
                div { class: "card",
                    div { class: "card-header",
                        h2 { class: "card-title", "Criteria" }
                    }
                    CriteriaForm {
                        fields: kind.fields(),
                        criteria: criteria(),
                        errors: errors(),
                        today,
                        on_change: move |(name, value): (String, CriteriaValue)| {
                            criteria.write().set(name, value);
                        },
                    }
                    if !kind.fields().is_empty() {
                        div { class: "form-actions",
                            if !is_valid {
                                p { class: "form-hint", "Fix the highlighted fields to run the report." }
                            } else if is_stale {
                                p { class: "form-hint", "Criteria changed since the last run." }
                            }
                            button {
                                class: "btn btn-secondary",
                                disabled: !is_valid,
                                onclick: move |_| applied.set(criteria()),
                                "Run report"
                            }
                        }
                    }
                }

                div { class: "card report-output",
                    if let Some(spec) = chart() {
                        if spec.check().is_ok() {
                            ChartView { spec }
                        }
                    }
                    ReportTable { table: table() }
                }
            }
        }
    }
}
