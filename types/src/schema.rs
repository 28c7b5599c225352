use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    Result, err,
    period::{DatePreset, MonthPreset},
};

/// One filterable criterion of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    DateRange {
        #[serde(default, rename = "defaultValue")]
        default: Option<DatePreset>,
    },
    MonthRange {
        #[serde(default, rename = "defaultValue")]
        default: Option<MonthPreset>,
    },
    Dropdown {
        options: Vec<String>,
        #[serde(default, rename = "defaultValue")]
        default: Option<String>,
    },
    MultiSelect {
        options: Vec<String>,
        #[serde(default, rename = "defaultValue")]
        default: Vec<String>,
    },
}

impl FieldKind {
    pub fn options(&self) -> &[String] {
        match self {
            FieldKind::DateRange { .. } | FieldKind::MonthRange { .. } => &[],
            FieldKind::Dropdown { options, .. } | FieldKind::MultiSelect { options, .. } => {
                options
            }
        }
    }
}

impl FieldSchema {
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            required: false,
            kind,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn date_range(name: &str, label: &str, default: Option<DatePreset>) -> Self {
        Self::new(name, label, FieldKind::DateRange { default })
    }

    pub fn month_range(name: &str, label: &str, default: Option<MonthPreset>) -> Self {
        Self::new(name, label, FieldKind::MonthRange { default })
    }

    pub fn dropdown(name: &str, label: &str, options: &[&str], default: Option<&str>) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Dropdown {
                options: options.iter().map(|o| o.to_string()).collect(),
                default: default.map(str::to_string),
            },
        )
    }

    pub fn multi_select(name: &str, label: &str, options: &[&str], default: &[&str]) -> Self {
        Self::new(
            name,
            label,
            FieldKind::MultiSelect {
                options: options.iter().map(|o| o.to_string()).collect(),
                default: default.iter().map(|o| o.to_string()).collect(),
            },
        )
    }
}

/// Checks the invariants of a report's field list.
pub fn check_schema(fields: &[FieldSchema]) -> Result<()> {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(err!("duplicate field name '{}'", field.name));
        }

        match &field.kind {
            FieldKind::DateRange { .. } | FieldKind::MonthRange { .. } => {}
            FieldKind::Dropdown { options, default } => {
                if options.is_empty() {
                    return Err(err!("field '{}' has no options", field.name));
                }
                if let Some(default) = default
                    && !options.contains(default)
                {
                    return Err(err!(
                        "default '{}' of field '{}' is not an option",
                        default,
                        field.name
                    ));
                }
            }
            FieldKind::MultiSelect { options, default } => {
                if options.is_empty() {
                    return Err(err!("field '{}' has no options", field.name));
                }
                if let Some(unknown) = default.iter().find(|d| !options.contains(d)) {
                    return Err(err!(
                        "default '{}' of field '{}' is not an option",
                        unknown,
                        field.name
                    ));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_tagged_fields() {
        let json = r#"[
            {"name": "period", "label": "Period", "type": "dateRange", "required": true, "defaultValue": "last7Days"},
            {"name": "months", "label": "Months", "type": "monthRange"},
            {"name": "site", "label": "Site", "type": "dropdown", "options": ["HQ", "Lab"], "defaultValue": "HQ"},
            {"name": "severity", "label": "Severity", "type": "multiSelect", "options": ["Critical", "Info"]}
        ]"#;
        let fields: Vec<FieldSchema> = serde_json::from_str(json).unwrap();
        assert_eq!(fields.len(), 4);
        assert!(fields[0].required);
        assert_eq!(
            fields[0].kind,
            FieldKind::DateRange {
                default: Some(DatePreset::Last7Days)
            }
        );
        assert_eq!(fields[2].kind.options(), ["HQ", "Lab"]);
        assert_eq!(
            fields[3].kind,
            FieldKind::MultiSelect {
                options: vec!["Critical".into(), "Info".into()],
                default: vec![],
            }
        );
        check_schema(&fields).unwrap();
    }

    #[test]
    fn unknown_type_is_rejected() {
        let json = r#"{"name": "x", "label": "X", "type": "dateRnage"}"#;
        assert!(serde_json::from_str::<FieldSchema>(json).is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let fields = vec![
            FieldSchema::date_range("period", "Period", None),
            FieldSchema::month_range("period", "Months", None),
        ];
        let error = check_schema(&fields).unwrap_err();
        assert!(error.message.contains("duplicate field name 'period'"));
    }

    #[test]
    fn selection_fields_need_options() {
        let fields = vec![FieldSchema::dropdown("site", "Site", &[], None)];
        assert!(check_schema(&fields).is_err());

        let fields = vec![FieldSchema::multi_select("sev", "Severity", &["A"], &["B"])];
        assert!(check_schema(&fields).is_err());
    }

    #[test]
    fn dropdown_default_must_be_an_option() {
        let fields = vec![FieldSchema::dropdown("site", "Site", &["HQ"], Some("Lab"))];
        let error = check_schema(&fields).unwrap_err();
        assert!(error.message.contains("default 'Lab' of field 'site' is not an option"));

        let fields = vec![FieldSchema::dropdown("site", "Site", &["HQ"], Some("HQ"))];
        assert!(check_schema(&fields).is_ok());
        let fields = vec![FieldSchema::dropdown("site", "Site", &["HQ"], None)];
        assert!(check_schema(&fields).is_ok());
    }
}
