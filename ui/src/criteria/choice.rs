use dioxus::prelude::*;
use types::criteria::toggle_selection;

use super::FieldShell;

#[component]
pub fn DropdownField(
    label: String,
    required: bool,
    error: Option<String>,
    options: Vec<String>,
    value: String,
    on_change: EventHandler<String>,
) -> Element {
    rsx! {
        FieldShell { label, required, error,
            select {
                class: "form-input",
                value: "{value}",
                onchange: move |e| on_change.call(e.value()),
                option { value: "", disabled: required, "Select..." }
                for choice in options {
                    option { value: "{choice}", selected: choice == value, "{choice}" }
                }
            }
        }
    }
}

/// One checkbox per option. Every toggle emits the full new selection.
#[component]
pub fn MultiSelectField(
    label: String,
    required: bool,
    error: Option<String>,
    options: Vec<String>,
    value: Vec<String>,
    on_change: EventHandler<Vec<String>>,
) -> Element {
    rsx! {
        FieldShell { label, required, error,
            ul { class: "checkbox-list",
                for choice in options {
                    {
                        let checked = value.contains(&choice);
                        let current = value.clone();
                        rsx! {
                            li { key: "{choice}",
                                label { class: "checkbox-label",
                                    input {
                                        r#type: "checkbox",
                                        checked,
                                        onchange: {
                                            let choice = choice.clone();
                                            move |_| on_change.call(toggle_selection(&current, &choice))
                                        },
                                    }
                                    span { "{choice}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
