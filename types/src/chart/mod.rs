//! Library-independent chart description and the builders that derive it from
//! report rows.

pub mod svg;

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, Row, err, report};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

/// An sRGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
    pub const INK: Rgb = Rgb(0x33, 0x33, 0x33);
    pub const MUTED: Rgb = Rgb(0x6b, 0x72, 0x80);
    pub const GRID: Rgb = Rgb(0xe5, 0xe7, 0xeb);
    pub const STRIPE: Rgb = Rgb(0xf5, 0xf5, 0xf5);

    /// Channels scaled to `0.0..=1.0`.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| err!("color '{s}' must start with '#'"))?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err!("color '{s}' must have six hex digits"));
        }
        let channel = |at: usize| {
            u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| err!("invalid color '{s}'"))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

pub mod palette {
    use super::Rgb;

    /// Two colors alternated by data index.
    pub const ALTERNATING: [Rgb; 2] = [Rgb(0x36, 0xa2, 0xeb), Rgb(0x4b, 0xc0, 0xc0)];

    /// Fixed colors keyed by category position.
    pub const CATEGORY: [Rgb; 6] = [
        Rgb(0xff, 0x63, 0x84),
        Rgb(0x36, 0xa2, 0xeb),
        Rgb(0xff, 0xce, 0x56),
        Rgb(0x4b, 0xc0, 0xc0),
        Rgb(0x99, 0x66, 0xff),
        Rgb(0xff, 0x9f, 0x40),
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    /// One color for the whole series, or one per data point (cycled).
    pub colors: Vec<Rgb>,
}

impl Dataset {
    pub fn color_at(&self, index: usize) -> Rgb {
        if self.colors.is_empty() {
            return Rgb::INK;
        }
        self.colors[index % self.colors.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSpec {
    /// Rejects specs that cannot be drawn.
    pub fn check(&self) -> Result<()> {
        if self.labels.is_empty() {
            return Err(err!("chart has no data points"));
        }
        if self.datasets.is_empty() {
            return Err(err!("chart has no datasets"));
        }
        for dataset in &self.datasets {
            if dataset.data.len() != self.labels.len() {
                return Err(err!(
                    "dataset '{}' has {} values for {} labels",
                    dataset.label,
                    dataset.data.len(),
                    self.labels.len()
                ));
            }
            if dataset.colors.is_empty() {
                return Err(err!("dataset '{}' has no colors", dataset.label));
            }
            if let Some(value) = dataset.data.iter().find(|v| !v.is_finite()) {
                return Err(err!("dataset '{}' contains {value}", dataset.label));
            }
        }
        if self.kind == ChartKind::Pie {
            let slices = &self.datasets[0].data;
            if slices.iter().any(|v| *v < 0.0) {
                return Err(err!("pie slices cannot be negative"));
            }
            if slices.iter().sum::<f64>() <= 0.0 {
                return Err(err!("pie chart has nothing to show"));
            }
        }
        Ok(())
    }
}

fn cycle(palette: &[Rgb], count: usize) -> Vec<Rgb> {
    if palette.is_empty() {
        return vec![Rgb::INK];
    }
    (0..count.max(1)).map(|i| palette[i % palette.len()]).collect()
}

/// One series read straight from the rows, in row order.
pub fn single_series(
    kind: ChartKind,
    rows: &[Row],
    x_key: &str,
    y_key: &str,
    label: &str,
    palette: &[Rgb],
) -> ChartSpec {
    let labels: Vec<String> = rows.iter().map(|row| report::text(row, x_key)).collect();
    let data: Vec<f64> = rows
        .iter()
        .map(|row| report::number(row, y_key).unwrap_or(0.0))
        .collect();

    let colors = match kind {
        ChartKind::Line => cycle(palette, 1),
        ChartKind::Bar | ChartKind::Pie => cycle(palette, labels.len()),
    };

    ChartSpec {
        kind,
        labels,
        datasets: vec![Dataset {
            label: label.to_string(),
            data,
            colors,
        }],
    }
}

fn push_distinct(seen: &mut Vec<String>, value: String) {
    if !seen.contains(&value) {
        seen.push(value);
    }
}

/// One dataset per distinct `series_key`, over the distinct `x_key` axis.
///
/// Sparse rows become a dense grid: a missing `(x, series)` pair is 0, and
/// when a pair repeats the first row wins.
pub fn multi_series(
    kind: ChartKind,
    rows: &[Row],
    x_key: &str,
    series_key: &str,
    value_key: &str,
    palette: &[Rgb],
) -> ChartSpec {
    // First pass: both axes in first-seen order.
    let mut labels = Vec::new();
    let mut series = Vec::new();
    for row in rows {
        push_distinct(&mut labels, report::text(row, x_key));
        push_distinct(&mut series, report::text(row, series_key));
    }

    // Second pass: dense lookup.
    let mut cells: HashMap<(String, String), f64> = HashMap::new();
    for row in rows {
        let key = (report::text(row, x_key), report::text(row, series_key));
        let value = report::number(row, value_key).unwrap_or(0.0);
        cells.entry(key).or_insert(value);
    }

    let colors = cycle(palette, series.len());
    let datasets = series
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let data = labels
                .iter()
                .map(|x| cells.get(&(x.clone(), name.clone())).copied().unwrap_or(0.0))
                .collect();
            Dataset {
                label: name,
                data,
                colors: vec![colors[index]],
            }
        })
        .collect();

    ChartSpec {
        kind,
        labels,
        datasets,
    }
}
