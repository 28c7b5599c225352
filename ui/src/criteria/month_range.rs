use dioxus::prelude::*;
use jiff::civil::Date;
use types::period::{MonthPreset, MonthRange, YearMonth};

use super::FieldShell;

fn input_value(month: Option<YearMonth>) -> String {
    month.map(|m| m.to_string()).unwrap_or_default()
}

/// Start and end `YYYY-MM` inputs. Each bound limits the other.
#[component]
pub fn MonthRangeField(
    label: String,
    required: bool,
    error: Option<String>,
    value: MonthRange,
    today: Date,
    on_change: EventHandler<MonthRange>,
) -> Element {
    let start = input_value(value.start);
    let end = input_value(value.end);

    rsx! {
        FieldShell { label, required, error,
            div { class: "range-inputs",
                input {
                    class: "form-input",
                    r#type: "month",
                    value: "{start}",
                    max: "{end}",
                    oninput: move |e| {
                        on_change.call(MonthRange {
                            start: e.value().parse().ok(),
                            end: value.end,
                        })
                    },
                }
                span { class: "range-separator", "to" }
                input {
                    class: "form-input",
                    r#type: "month",
                    value: "{end}",
                    min: "{start}",
                    oninput: move |e| {
                        on_change.call(MonthRange {
                            start: value.start,
                            end: e.value().parse().ok(),
                        })
                    },
                }
                select {
                    class: "form-input range-preset",
                    value: "",
                    onchange: move |e| {
                        if let Ok(preset) = e.value().parse::<MonthPreset>() {
                            on_change.call(preset.range(today));
                        }
                    },
                    option { value: "", "Quick select" }
                    for preset in MonthPreset::ALL {
                        option { value: preset.key(), "{preset.label()}" }
                    }
                }
            }
        }
    }
}
