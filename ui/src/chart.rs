use dioxus::prelude::*;
use types::chart::{ChartSpec, svg};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 400;

/// Inline SVG rendering of a chart, scaled to the container width.
#[component]
pub fn ChartView(spec: ChartSpec) -> Element {
    match svg::render(&spec, WIDTH, HEIGHT) {
        Ok(markup) => rsx! {
            div { class: "chart-view", dangerous_inner_html: markup }
        },
        Err(error) => rsx! {
            p { class: "chart-error", "{error}" }
        },
    }
}
