use dioxus::prelude::*;
use jiff::civil::Date;
use types::period::{DatePreset, DateRange};

use super::FieldShell;

fn input_value(date: Option<Date>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

/// Start and end date inputs with a quick-select of common periods.
///
/// Presets are computed from `today` and emitted as one complete range.
#[component]
pub fn DateRangeField(
    label: String,
    required: bool,
    error: Option<String>,
    value: DateRange,
    today: Date,
    on_change: EventHandler<DateRange>,
) -> Element {
    let start = input_value(value.start);
    let end = input_value(value.end);

    rsx! {
        FieldShell { label, required, error,
            div { class: "range-inputs",
                input {
                    class: "form-input",
                    r#type: "date",
                    value: "{start}",
                    max: "{end}",
                    oninput: move |e| {
                        on_change.call(DateRange {
                            start: e.value().parse().ok(),
                            end: value.end,
                        })
                    },
                }
                span { class: "range-separator", "to" }
                input {
                    class: "form-input",
                    r#type: "date",
                    value: "{end}",
                    min: "{start}",
                    oninput: move |e| {
                        on_change.call(DateRange {
                            start: value.start,
                            end: e.value().parse().ok(),
                        })
                    },
                }
                select {
                    class: "form-input range-preset",
                    value: "",
                    onchange: move |e| {
                        if let Ok(preset) = e.value().parse::<DatePreset>() {
                            on_change.call(preset.range(today));
                        }
                    },
                    option { value: "", "Quick select" }
                    for preset in DatePreset::ALL {
                        option { value: preset.key(), "{preset.label()}" }
                    }
                }
            }
        }
    }
}
