//! Criteria values chosen by the user, and their validation against a schema.

use std::collections::BTreeMap;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::{
    period::{DateRange, MonthRange},
    schema::{FieldKind, FieldSchema},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CriteriaValue {
    DateRange(DateRange),
    MonthRange(MonthRange),
    Choice(String),
    Selection(Vec<String>),
}

impl CriteriaValue {
    /// The value a field starts with, derived from its declared default.
    pub fn default_for(kind: &FieldKind, today: Date) -> Self {
        match kind {
            FieldKind::DateRange { default } => CriteriaValue::DateRange(
                default.map(|preset| preset.range(today)).unwrap_or_default(),
            ),
            FieldKind::MonthRange { default } => CriteriaValue::MonthRange(
                default.map(|preset| preset.range(today)).unwrap_or_default(),
            ),
            FieldKind::Dropdown { default, .. } => {
                CriteriaValue::Choice(default.clone().unwrap_or_default())
            }
            FieldKind::MultiSelect { default, .. } => CriteriaValue::Selection(default.clone()),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            CriteriaValue::DateRange(range) => range.start.is_none() || range.end.is_none(),
            CriteriaValue::MonthRange(range) => range.start.is_none() || range.end.is_none(),
            CriteriaValue::Choice(choice) => choice.is_empty(),
            CriteriaValue::Selection(selection) => selection.is_empty(),
        }
    }
}

/// Current criteria of a report, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria(BTreeMap<String, CriteriaValue>);

impl Criteria {
    pub fn defaults(fields: &[FieldSchema], today: Date) -> Self {
        Self(
            fields
                .iter()
                .map(|field| {
                    (
                        field.name.clone(),
                        CriteriaValue::default_for(&field.kind, today),
                    )
                })
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&CriteriaValue> {
        self.0.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: CriteriaValue) {
        self.0.insert(name.into(), value);
    }

    /// Returns a copy with one value replaced.
    pub fn with(&self, name: impl Into<String>, value: CriteriaValue) -> Self {
        let mut next = self.clone();
        next.set(name, value);
        next
    }

    pub fn date_range(&self, name: &str) -> Option<DateRange> {
        match self.get(name)? {
            CriteriaValue::DateRange(range) => Some(*range),
            _ => None,
        }
    }

    pub fn month_range(&self, name: &str) -> Option<MonthRange> {
        match self.get(name)? {
            CriteriaValue::MonthRange(range) => Some(*range),
            _ => None,
        }
    }

    pub fn choice(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            CriteriaValue::Choice(choice) => Some(choice),
            _ => None,
        }
    }

    pub fn selection(&self, name: &str) -> Option<&[String]> {
        match self.get(name)? {
            CriteriaValue::Selection(selection) => Some(selection),
            _ => None,
        }
    }
}

/// Per-field validation messages. A missing key means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.0.insert(name.into(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All messages on one line, in field-name order.
    pub fn summary(&self) -> String {
        self.0.values().cloned().collect::<Vec<_>>().join("; ")
    }
}

/// Adds `option` to the selection, or removes it when already selected.
/// The remaining entries keep their relative order.
pub fn toggle_selection(current: &[String], option: &str) -> Vec<String> {
    if current.iter().any(|selected| selected == option) {
        current
            .iter()
            .filter(|selected| *selected != option)
            .cloned()
            .collect()
    } else {
        let mut next = current.to_vec();
        next.push(option.to_string());
        next
    }
}

pub fn validate(fields: &[FieldSchema], criteria: &Criteria) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    for field in fields {
        let value = criteria.get(&field.name);

        if field.required && value.is_none_or(CriteriaValue::is_blank) {
            errors.insert(&field.name, format!("{} is required", field.label));
            continue;
        }

        let Some(value) = value else {
            continue;
        };

        let message = match (&field.kind, value) {
            (FieldKind::DateRange { .. }, CriteriaValue::DateRange(range)) => range
                .is_inverted()
                .then(|| "Start date must be on or before the end date".to_string()),
            (FieldKind::MonthRange { .. }, CriteriaValue::MonthRange(range)) => range
                .is_inverted()
                .then(|| "Start month must be on or before the end month".to_string()),
            (FieldKind::Dropdown { options, .. }, CriteriaValue::Choice(choice)) => {
                (!choice.is_empty() && !options.contains(choice))
                    .then(|| format!("'{choice}' is not a valid option"))
            }
            (FieldKind::MultiSelect { options, .. }, CriteriaValue::Selection(selection)) => {
                selection
                    .iter()
                    .find(|selected| !options.contains(selected))
                    .map(|unknown| format!("'{unknown}' is not a valid option"))
            }
            _ => Some(format!("{} has a value of the wrong kind", field.label)),
        };

        if let Some(message) = message {
            errors.insert(&field.name, message);
        }
    }

    errors
}
