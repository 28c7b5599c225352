//! The report catalog and its built-in sample data.

use jiff::{ToSpan, civil::Date};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Criteria, Result,
    chart::{self, ChartKind, ChartSpec, palette},
    err,
    period::{DatePreset, MonthPreset, YearMonth},
    schema::FieldSchema,
    table::Column,
};

/// One record of report data. Keys are report specific.
pub type Row = serde_json::Map<String, Value>;

/// Display text of a cell: strings as-is, numbers with at most two decimals,
/// missing or null as empty.
pub fn text(row: &Row, key: &str) -> String {
    match row.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(int) => int.to_string(),
            None => format_decimal(n.as_f64().unwrap_or_default()),
        },
        Some(other) => other.to_string(),
    }
}

/// Numeric value of a cell, accepting numeric strings.
pub fn number(row: &Row, key: &str) -> Option<f64> {
    match row.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn format_decimal(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn row<const N: usize>(cells: [(&str, Value); N]) -> Row {
    cells
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    NetworkUsage,
    AlertsSummary,
    PolicyActiveUsers,
    AccessPointUptime,
    DeviceInventory,
}

const SEVERITIES: [&str; 3] = ["Critical", "Warning", "Info"];
const POLICIES: [&str; 3] = ["Staff", "Guest", "IoT"];
const SITES: [&str; 3] = ["HQ", "Warehouse", "Branch Office"];

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::NetworkUsage,
        ReportKind::AlertsSummary,
        ReportKind::PolicyActiveUsers,
        ReportKind::AccessPointUptime,
        ReportKind::DeviceInventory,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::NetworkUsage => "network-usage",
            ReportKind::AlertsSummary => "alerts-summary",
            ReportKind::PolicyActiveUsers => "policy-active-users",
            ReportKind::AccessPointUptime => "access-point-uptime",
            ReportKind::DeviceInventory => "device-inventory",
        }
    }

    pub fn from_slug(slug: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == slug)
            .ok_or_else(|| err!("unknown report '{slug}'"))
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::NetworkUsage => "Network Usage",
            ReportKind::AlertsSummary => "Alerts Summary",
            ReportKind::PolicyActiveUsers => "Policy Active Users",
            ReportKind::AccessPointUptime => "Access Point Uptime",
            ReportKind::DeviceInventory => "Device Inventory",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReportKind::NetworkUsage => "Daily data transferred across all sites.",
            ReportKind::AlertsSummary => "Alerts raised by type and severity.",
            ReportKind::PolicyActiveUsers => "Average active users per access policy and month.",
            ReportKind::AccessPointUptime => "Uptime of each access point at a site.",
            ReportKind::DeviceInventory => "Managed devices by type.",
        }
    }

    pub fn fields(&self) -> Vec<FieldSchema> {
        match self {
            ReportKind::NetworkUsage => vec![
                FieldSchema::date_range("period", "Period", Some(DatePreset::Last7Days))
                    .required(),
            ],
            ReportKind::AlertsSummary => vec![
                FieldSchema::multi_select("severity", "Severity", &SEVERITIES, &SEVERITIES)
                    .required(),
            ],
            ReportKind::PolicyActiveUsers => vec![
                FieldSchema::month_range("months", "Months", Some(MonthPreset::Last6Months))
                    .required(),
                FieldSchema::multi_select("policies", "Policies", &POLICIES, &[]),
            ],
            ReportKind::AccessPointUptime => {
                vec![FieldSchema::dropdown("site", "Site", &SITES, Some("HQ")).required()]
            }
            ReportKind::DeviceInventory => vec![],
        }
    }

    pub fn columns(&self) -> Vec<Column> {
        let columns: &[(&str, &str)] = match self {
            ReportKind::NetworkUsage => &[("day", "Date"), ("usageGB", "Usage (GB)")],
            ReportKind::AlertsSummary => &[
                ("alertType", "Alert Type"),
                ("severity", "Severity"),
                ("count", "Count"),
            ],
            ReportKind::PolicyActiveUsers => &[
                ("month", "Month"),
                ("policy", "Policy"),
                ("avgActiveUsers", "Avg Active Users"),
            ],
            ReportKind::AccessPointUptime => &[
                ("site", "Site"),
                ("accessPoint", "Access Point"),
                ("uptimePct", "Uptime (%)"),
            ],
            ReportKind::DeviceInventory => &[("deviceType", "Device Type"), ("count", "Count")],
        };
        columns
            .iter()
            .map(|(key, label)| Column::new(key, label))
            .collect()
    }

    /// Chart of already filtered rows, or `None` for table-only reports.
    pub fn chart(&self, rows: &[Row]) -> Option<ChartSpec> {
        match self {
            ReportKind::NetworkUsage => Some(chart::single_series(
                ChartKind::Line,
                rows,
                "day",
                "usageGB",
                "Usage (GB)",
                &palette::ALTERNATING,
            )),
            ReportKind::AlertsSummary => {
                let totals = totals_by(rows, "alertType", "count");
                Some(chart::single_series(
                    ChartKind::Pie,
                    &totals,
                    "alertType",
                    "count",
                    "Alerts",
                    &palette::CATEGORY,
                ))
            }
            ReportKind::PolicyActiveUsers => Some(chart::multi_series(
                ChartKind::Bar,
                rows,
                "month",
                "policy",
                "avgActiveUsers",
                &palette::CATEGORY,
            )),
            ReportKind::AccessPointUptime => Some(chart::single_series(
                ChartKind::Bar,
                rows,
                "accessPoint",
                "uptimePct",
                "Uptime (%)",
                &palette::ALTERNATING,
            )),
            ReportKind::DeviceInventory => None,
        }
    }

    /// Deterministic sample data anchored at `today`.
    pub fn sample_rows(&self, today: Date) -> Vec<Row> {
        match self {
            ReportKind::NetworkUsage => (0..=60_i64)
                .rev()
                .map(|back| {
                    let day = today.saturating_sub(back.days());
                    let seed = i64::from(day.year()) * 400 + i64::from(day.day_of_year());
                    let hundredths = 12_000 + (seed * 37) % 5_000 + (seed * 13) % 4 * 25;
                    row([
                        ("day", Value::from(day.to_string())),
                        ("usageGB", Value::from(hundredths as f64 / 100.0)),
                    ])
                })
                .collect(),
            ReportKind::AlertsSummary => [
                ("Rogue AP", "Critical", 3),
                ("Rogue AP", "Warning", 7),
                ("High CPU", "Warning", 12),
                ("High CPU", "Info", 5),
                ("Auth Failure", "Critical", 4),
                ("Auth Failure", "Warning", 18),
                ("Auth Failure", "Info", 26),
                ("Interference", "Info", 9),
                ("Firmware Outdated", "Warning", 6),
            ]
            .into_iter()
            .map(|(alert, severity, count)| {
                row([
                    ("alertType", Value::from(alert)),
                    ("severity", Value::from(severity)),
                    ("count", Value::from(count)),
                ])
            })
            .collect(),
            ReportKind::PolicyActiveUsers => {
                let current = YearMonth::of(today);
                let mut rows = Vec::new();
                for back in (0..12).rev() {
                    let month = current.shift(-back);
                    for (index, policy) in POLICIES.iter().enumerate() {
                        // IoT devices report only two months out of three.
                        if *policy == "IoT" && month.month() % 3 == 0 {
                            continue;
                        }
                        let base = [180, 60, 35][index];
                        let wobble = (i64::from(month.month()) * 7 + index as i64 * 5) % 15;
                        rows.push(row([
                            ("month", Value::from(month.to_string())),
                            ("policy", Value::from(*policy)),
                            ("avgActiveUsers", Value::from(base + wobble)),
                        ]));
                    }
                }
                rows
            }
            ReportKind::AccessPointUptime => {
                let mut rows = Vec::new();
                for (site_index, (site, prefix, count)) in
                    [("HQ", "HQ", 5), ("Warehouse", "WH", 3), ("Branch Office", "BR", 2)]
                        .into_iter()
                        .enumerate()
                {
                    for ap in 1..=count {
                        let dip = (ap * 17 + site_index * 7) % 40;
                        let hundredths = 9_995 - dip * 5;
                        rows.push(row([
                            ("site", Value::from(site)),
                            ("accessPoint", Value::from(format!("AP-{prefix}-{ap:02}"))),
                            ("uptimePct", Value::from(hundredths as f64 / 100.0)),
                        ]));
                    }
                }
                rows
            }
            ReportKind::DeviceInventory => [
                ("Access Point", 42),
                ("Switch", 8),
                ("Gateway", 2),
                ("Controller", 1),
                ("Sensor", 15),
            ]
            .into_iter()
            .map(|(device, count)| {
                row([
                    ("deviceType", Value::from(device)),
                    ("count", Value::from(count)),
                ])
            })
            .collect(),
        }
    }

    /// Rows matching the criteria. Criteria that are unset match everything.
    pub fn filter(&self, criteria: &Criteria, rows: Vec<Row>) -> Vec<Row> {
        match self {
            ReportKind::NetworkUsage => {
                let Some(period) = criteria.date_range("period") else {
                    return rows;
                };
                rows.into_iter()
                    .filter(|row| {
                        text(row, "day")
                            .parse::<Date>()
                            .is_ok_and(|day| period.contains(day))
                    })
                    .collect()
            }
            ReportKind::AlertsSummary => keep_selected(criteria, "severity", "severity", rows),
            ReportKind::PolicyActiveUsers => {
                let rows = keep_selected(criteria, "policies", "policy", rows);
                let Some(months) = criteria.month_range("months") else {
                    return rows;
                };
                rows.into_iter()
                    .filter(|row| {
                        text(row, "month")
                            .parse::<YearMonth>()
                            .is_ok_and(|month| months.contains(month))
                    })
                    .collect()
            }
            ReportKind::AccessPointUptime => match criteria.choice("site") {
                Some(site) if !site.is_empty() => rows
                    .into_iter()
                    .filter(|row| text(row, "site") == site)
                    .collect(),
                _ => rows,
            },
            ReportKind::DeviceInventory => rows,
        }
    }
}

fn keep_selected(criteria: &Criteria, name: &str, key: &str, rows: Vec<Row>) -> Vec<Row> {
    match criteria.selection(name) {
        Some(selection) if !selection.is_empty() => rows
            .into_iter()
            .filter(|row| selection.contains(&text(row, key)))
            .collect(),
        _ => rows,
    }
}

/// Sums `value_key` per distinct `key`, in first-seen order.
fn totals_by(rows: &[Row], key: &str, value_key: &str) -> Vec<Row> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for row in rows {
        let name = text(row, key);
        let value = number(row, value_key).unwrap_or(0.0);
        match totals.iter_mut().find(|(seen, _)| *seen == name) {
            Some((_, total)) => *total += value,
            None => totals.push((name, value)),
        }
    }
    totals
        .into_iter()
        .map(|(name, total)| {
            row([(key, Value::from(name)), (value_key, Value::from(total))])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CriteriaValue, criteria::validate, period::MonthRange, schema::check_schema};
    use jiff::civil::date;

    const TODAY: Date = date(2026, 10, 18);

    #[test]
    fn every_report_has_a_consistent_catalog_entry() {
        for kind in ReportKind::ALL {
            assert_eq!(ReportKind::from_slug(kind.slug()).unwrap(), kind);
            check_schema(&kind.fields()).unwrap();

            let criteria = Criteria::defaults(&kind.fields(), TODAY);
            assert!(validate(&kind.fields(), &criteria).is_empty(), "{kind:?}");

            let rows = kind.filter(&criteria, kind.sample_rows(TODAY));
            assert!(!rows.is_empty(), "{kind:?}");
            for column in kind.columns() {
                assert!(rows[0].contains_key(&column.key), "{kind:?} {}", column.key);
            }
            if let Some(chart) = kind.chart(&rows) {
                chart.check().unwrap();
            }
        }
        assert!(ReportKind::from_slug("nope").is_err());
    }

    #[test]
    fn sample_rows_are_deterministic() {
        let kind = ReportKind::NetworkUsage;
        assert_eq!(kind.sample_rows(TODAY), kind.sample_rows(TODAY));
    }

    #[test]
    fn network_usage_default_is_the_last_week() {
        let kind = ReportKind::NetworkUsage;
        let criteria = Criteria::defaults(&kind.fields(), TODAY);
        let rows = kind.filter(&criteria, kind.sample_rows(TODAY));
        assert_eq!(rows.len(), 8);
        assert_eq!(text(&rows[0], "day"), "2026-10-11");
        assert_eq!(text(&rows[7], "day"), "2026-10-18");
    }

    #[test]
    fn alerts_pie_sums_by_type() {
        let kind = ReportKind::AlertsSummary;
        let criteria = Criteria::default().with(
            "severity",
            CriteriaValue::Selection(vec!["Warning".into(), "Info".into()]),
        );
        let rows = kind.filter(&criteria, kind.sample_rows(TODAY));
        assert!(rows.iter().all(|row| text(row, "severity") != "Critical"));

        let chart = kind.chart(&rows).unwrap();
        assert_eq!(chart.kind, ChartKind::Pie);
        assert_eq!(
            chart.labels,
            ["Rogue AP", "High CPU", "Auth Failure", "Interference", "Firmware Outdated"]
        );
        assert_eq!(chart.datasets[0].data, [7.0, 17.0, 44.0, 9.0, 6.0]);
    }

    #[test]
    fn policy_report_filters_months_and_policies() {
        let kind = ReportKind::PolicyActiveUsers;
        let criteria = Criteria::default()
            .with(
                "months",
                CriteriaValue::MonthRange(MonthRange::new(
                    "2026-08".parse().unwrap(),
                    "2026-09".parse().unwrap(),
                )),
            )
            .with(
                "policies",
                CriteriaValue::Selection(vec!["IoT".into(), "Guest".into()]),
            );
        let rows = kind.filter(&criteria, kind.sample_rows(TODAY));
        // No IoT sample for September.
        assert_eq!(rows.len(), 3);

        let chart = kind.chart(&rows).unwrap();
        assert_eq!(chart.labels, ["2026-08", "2026-09"]);
        let iot = chart.datasets.iter().find(|d| d.label == "IoT").unwrap();
        assert_eq!(iot.data[1], 0.0);
    }

    #[test]
    fn uptime_filters_by_site() {
        let kind = ReportKind::AccessPointUptime;
        let criteria = Criteria::default().with("site", CriteriaValue::Choice("Warehouse".into()));
        let rows = kind.filter(&criteria, kind.sample_rows(TODAY));
        assert_eq!(rows.len(), 3);
        assert_eq!(text(&rows[0], "accessPoint"), "AP-WH-01");
    }

    #[test]
    fn device_inventory_is_table_only() {
        let kind = ReportKind::DeviceInventory;
        assert!(kind.fields().is_empty());
        assert!(kind.chart(&kind.sample_rows(TODAY)).is_none());
    }

    #[test]
    fn cell_text_formats_numbers() {
        let row = row([
            ("int", Value::from(42)),
            ("float", Value::from(12.5)),
            ("long", Value::from(1.0 / 3.0)),
            ("whole", Value::from(99.0)),
            ("string", Value::from("HQ")),
            ("null", Value::Null),
        ]);
        assert_eq!(text(&row, "int"), "42");
        assert_eq!(text(&row, "float"), "12.5");
        assert_eq!(text(&row, "long"), "0.33");
        assert_eq!(text(&row, "whole"), "99");
        assert_eq!(text(&row, "string"), "HQ");
        assert_eq!(text(&row, "null"), "");
        assert_eq!(text(&row, "missing"), "");
        assert_eq!(number(&row, "string"), None);
    }
}
