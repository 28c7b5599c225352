//! The criteria form: one control per schema field, in schema order.
//!
//! The form owns no state. It renders the values it is given and reports every
//! edit through `on_change` as `(field name, new value)`.

mod choice;
mod date_range;
mod month_range;

use dioxus::prelude::*;
use jiff::civil::Date;
use types::{Criteria, CriteriaValue, FieldKind, FieldSchema, ValidationErrors};

pub use choice::{DropdownField, MultiSelectField};
pub use date_range::DateRangeField;
pub use month_range::MonthRangeField;

pub const DEFAULT_CRITERIA_NOTICE: &str = "This report uses default criteria.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind<'a> {
    DateRange,
    MonthRange,
    Dropdown {
        options: &'a [String],
        default: Option<&'a str>,
    },
    MultiSelect {
        options: &'a [String],
        default: &'a [String],
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPlan<'a> {
    DefaultNotice,
    Controls(Vec<(&'a FieldSchema, ControlKind<'a>)>),
}

pub fn plan_controls(fields: &[FieldSchema]) -> FormPlan<'_> {
    if fields.is_empty() {
        return FormPlan::DefaultNotice;
    }

    FormPlan::Controls(
        fields
            .iter()
            .map(|field| {
                let kind = match &field.kind {
                    FieldKind::DateRange { .. } => ControlKind::DateRange,
                    FieldKind::MonthRange { .. } => ControlKind::MonthRange,
                    FieldKind::Dropdown { options, default } => ControlKind::Dropdown {
                        options,
                        default: default.as_deref(),
                    },
                    FieldKind::MultiSelect { options, default } => {
                        ControlKind::MultiSelect { options, default }
                    }
                };
                (field, kind)
            })
            .collect(),
    )
}

/// The value a dropdown shows: the chosen option, else the field default, else
/// nothing selected.
pub fn dropdown_value(criteria: &Criteria, name: &str, default: Option<&str>) -> String {
    criteria
        .choice(name)
        .or(default)
        .unwrap_or_default()
        .to_string()
}

/// The options a multi-select shows as checked, falling back to the default.
pub fn selection_value(criteria: &Criteria, name: &str, default: &[String]) -> Vec<String> {
    criteria.selection(name).unwrap_or(default).to_vec()
}

fn group_class(error: Option<&str>) -> &'static str {
    match error {
        Some(_) => "form-group has-error",
        None => "form-group",
    }
}

/// Label, required marker and error text around a single control.
#[component]
pub fn FieldShell(
    label: String,
    required: bool,
    error: Option<String>,
    children: Element,
) -> Element {
    let class = group_class(error.as_deref());

    rsx! {
        div { class,
            label { class: "form-label",
                "{label}"
                if required {
                    span { class: "required-marker", " *" }
                }
            }
            {children}
            if let Some(error) = error {
                p { class: "field-error", "{error}" }
            }
        }
    }
}

#[component]
pub fn CriteriaForm(
    fields: Vec<FieldSchema>,
    criteria: Criteria,
    errors: ValidationErrors,
    today: Date,
    on_change: EventHandler<(String, CriteriaValue)>,
) -> Element {
    let controls = match plan_controls(&fields) {
        FormPlan::DefaultNotice => {
            return rsx! {
                p { class: "criteria-notice", "{DEFAULT_CRITERIA_NOTICE}" }
            };
        }
        FormPlan::Controls(controls) => controls,
    };

    rsx! {
        div { class: "criteria-form",
            for (field, kind) in controls {
                {
                    let name = field.name.clone();
                    let label = field.label.clone();
                    let required = field.required;
                    let error = errors.get(&name).map(str::to_string);
                    let emit = move |value: CriteriaValue| on_change.call((name.clone(), value));

                    match kind {
                        ControlKind::DateRange => rsx! {
                            DateRangeField {
                                key: "{field.name}",
                                label,
                                required,
                                error,
                                value: criteria.date_range(&field.name).unwrap_or_default(),
                                today,
                                on_change: move |range| emit(CriteriaValue::DateRange(range)),
                            }
                        },
                        ControlKind::MonthRange => rsx! {
                            MonthRangeField {
                                key: "{field.name}",
                                label,
                                required,
                                error,
                                value: criteria.month_range(&field.name).unwrap_or_default(),
                                today,
                                on_change: move |range| emit(CriteriaValue::MonthRange(range)),
                            }
                        },
                        ControlKind::Dropdown { options, default } => rsx! {
                            DropdownField {
                                key: "{field.name}",
                                label,
                                required,
                                error,
                                options: options.to_vec(),
                                value: dropdown_value(&criteria, &field.name, default),
                                on_change: move |choice| emit(CriteriaValue::Choice(choice)),
                            }
                        },
                        ControlKind::MultiSelect { options, default } => rsx! {
                            MultiSelectField {
                                key: "{field.name}",
                                label,
                                required,
                                error,
                                options: options.to_vec(),
                                value: selection_value(&criteria, &field.name, default),
                                on_change: move |selection| emit(CriteriaValue::Selection(selection)),
                            }
                        },
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::period::{DatePreset, MonthPreset};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn no_fields_means_notice_only() {
        assert_eq!(plan_controls(&[]), FormPlan::DefaultNotice);
    }

    #[test]
    fn one_control_per_field_in_schema_order() {
        let fields = vec![
            FieldSchema::multi_select("severity", "Severity", &["Critical", "Info"], &["Info"]),
            FieldSchema::date_range("period", "Period", Some(DatePreset::Today)),
            FieldSchema::dropdown("site", "Site", &["HQ"], Some("HQ")),
            FieldSchema::month_range("months", "Months", Some(MonthPreset::ThisYear)),
        ];

        let FormPlan::Controls(controls) = plan_controls(&fields) else {
            panic!("expected controls");
        };
        let names: Vec<_> = controls.iter().map(|(f, _)| f.name.as_str()).collect();
        assert_eq!(names, ["severity", "period", "site", "months"]);

        assert!(matches!(
            controls[0].1,
            ControlKind::MultiSelect { options, default } if options.len() == 2 && default == ["Info"]
        ));
        assert_eq!(controls[1].1, ControlKind::DateRange);
        assert!(matches!(
            controls[2].1,
            ControlKind::Dropdown { default: Some("HQ"), .. }
        ));
        assert_eq!(controls[3].1, ControlKind::MonthRange);
    }

    #[test]
    fn dropdown_falls_back_to_default_then_empty() {
        let criteria = Criteria::default().with("site", CriteriaValue::Choice("Branch".into()));
        assert_eq!(dropdown_value(&criteria, "site", Some("HQ")), "Branch");
        assert_eq!(dropdown_value(&criteria, "ssid", Some("Guest")), "Guest");
        assert_eq!(dropdown_value(&criteria, "ssid", None), "");

        // A value of the wrong kind is treated as unset.
        let criteria = Criteria::default().with("site", CriteriaValue::Selection(vec![]));
        assert_eq!(dropdown_value(&criteria, "site", Some("HQ")), "HQ");
    }

    #[test]
    fn selection_falls_back_to_default() {
        let default = strings(&["Info"]);
        let criteria =
            Criteria::default().with("severity", CriteriaValue::Selection(strings(&["Critical"])));
        assert_eq!(selection_value(&criteria, "severity", &default), ["Critical"]);
        assert_eq!(selection_value(&criteria, "other", &default), ["Info"]);
        assert!(selection_value(&criteria, "other", &[]).is_empty());

        // An explicit empty selection is kept.
        let criteria = Criteria::default().with("severity", CriteriaValue::Selection(vec![]));
        assert!(selection_value(&criteria, "severity", &default).is_empty());
    }

    #[test]
    fn error_marks_the_field_group() {
        assert_eq!(group_class(None), "form-group");
        assert_eq!(group_class(Some("Required")), "form-group has-error");
    }
}
