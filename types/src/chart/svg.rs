//! Draws a [`ChartSpec`] as a standalone SVG document with plotters.
//!
//! The same markup is shown inline in the browser and rasterized on the server,
//! so the two never drift apart.

use std::f64::consts::{FRAC_PI_2, TAU};

use anyhow::Context;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use super::{ChartKind, ChartSpec, Rgb};
use crate::Result;

const FONT: &str = "sans-serif";
const MAX_X_LABELS: usize = 12;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Pixel sizes are given for an 800px wide chart and scaled from there.
#[derive(Clone, Copy)]
struct Scale(f64);

impl Scale {
    fn px(self, value: f64) -> i32 {
        (value * self.0).round() as i32
    }

    fn font(self, size: f64) -> f64 {
        size * self.0
    }
}

fn color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

fn text_style(size: f64, rgb: Rgb) -> TextStyle<'static> {
    (FONT, size).into_font().color(&color(rgb))
}

pub fn render(spec: &ChartSpec, width: u32, height: u32) -> Result<String> {
    let scale = Scale((f64::from(width) / 800.0).max(0.5));
    let mut markup = String::new();
    {
        let root = SVGBackend::with_string(&mut markup, (width, height)).into_drawing_area();
        draw(&root, spec, scale)?;
    }
    Ok(markup)
}

fn draw(root: &Area<'_>, spec: &ChartSpec, scale: Scale) -> anyhow::Result<()> {
    root.fill(&color(Rgb::WHITE))?;

    if spec.check().is_err() {
        let (width, height) = root.dim_in_pixel();
        let style = text_style(scale.font(16.0), Rgb::MUTED)
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(
            "No data",
            (width as i32 / 2, height as i32 / 2),
            style,
        ))?;
    } else {
        match spec.kind {
            ChartKind::Line | ChartKind::Bar => cartesian(root, spec, scale)?,
            ChartKind::Pie => pie(root, spec, scale)?,
        }
    }

    root.present().context("failed to finish chart markup")
}

fn cartesian(root: &Area<'_>, spec: &ChartSpec, scale: Scale) -> anyhow::Result<()> {
    let values = spec.datasets.iter().flat_map(|d| d.data.iter().copied());
    let (lo, hi) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let (lo, hi) = if hi - lo > 0.0 {
        (lo * 1.1, hi * 1.1)
    } else {
        (0.0, 1.0)
    };

    // One band per label, centered on its index.
    let count = spec.labels.len();
    let mut chart = ChartBuilder::on(root)
        .margin(scale.px(16.0))
        .margin_top(scale.px(40.0))
        .x_label_area_size(scale.px(36.0))
        .y_label_area_size(scale.px(56.0))
        .build_cartesian_2d(-0.5..count as f64 - 0.5, lo..hi)
        .context("failed to build chart axes")?;

    let step = count.div_ceil(MAX_X_LABELS).max(1);
    let x_label = |x: &f64| {
        let index = x.round();
        if (x - index).abs() > 1e-6 || index < 0.0 || index as usize % step != 0 {
            return String::new();
        }
        spec.labels.get(index as usize).cloned().unwrap_or_default()
    };
    let y_label = |y: &f64| compact(*y);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(count)
        .y_labels(6)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .label_style(text_style(scale.font(11.0), Rgb::INK))
        .light_line_style(color(Rgb::GRID))
        .bold_line_style(color(Rgb::GRID))
        .axis_style(color(Rgb::MUTED))
        .draw()
        .context("failed to draw chart mesh")?;

    let half = scale.px(6.0);
    match spec.kind {
        ChartKind::Bar => {
            let group = 0.8;
            let bar = group / spec.datasets.len() as f64;
            for (series, dataset) in spec.datasets.iter().enumerate() {
                let swatch = color(dataset.color_at(0));
                chart
                    .draw_series(dataset.data.iter().enumerate().map(|(index, value)| {
                        let left = index as f64 - group / 2.0 + bar * series as f64;
                        Rectangle::new(
                            [(left, 0.0), (left + bar, *value)],
                            color(dataset.color_at(index)).filled(),
                        )
                    }))?
                    .label(dataset.label.as_str())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - half), (x + 2 * half, y + half)], swatch.filled())
                    });
            }
        }
        ChartKind::Line => {
            for dataset in &spec.datasets {
                let stroke = color(dataset.color_at(0));
                let points: Vec<(f64, f64)> = dataset
                    .data
                    .iter()
                    .enumerate()
                    .map(|(index, value)| (index as f64, *value))
                    .collect();
                chart
                    .draw_series(LineSeries::new(
                        points.iter().copied(),
                        stroke.stroke_width(scale.px(2.0).max(1) as u32),
                    ))?
                    .label(dataset.label.as_str())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - half), (x + 2 * half, y + half)], stroke.filled())
                    });
                chart.draw_series(
                    points
                        .into_iter()
                        .map(|point| Circle::new(point, scale.px(3.0), stroke.filled())),
                )?;
            }
        }
        ChartKind::Pie => {}
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .margin(scale.px(8.0))
        .label_font(text_style(scale.font(12.0), Rgb::INK))
        .background_style(color(Rgb::WHITE).mix(0.9))
        .border_style(color(Rgb::GRID))
        .draw()
        .context("failed to draw chart legend")?;

    Ok(())
}

fn pie(root: &Area<'_>, spec: &ChartSpec, scale: Scale) -> anyhow::Result<()> {
    let dataset = &spec.datasets[0];
    let total: f64 = dataset.data.iter().sum();

    let (width, height) = root.dim_in_pixel();
    let (width, height) = (f64::from(width), f64::from(height));
    let legend_width = 200.0 * scale.0;
    let (cx, cy) = ((width - legend_width) / 2.0, height / 2.0);
    let radius = ((width - legend_width).min(height) / 2.0 - 24.0 * scale.0).max(1.0);
    let center = (cx.round() as i32, cy.round() as i32);
    let on_arc = |angle: f64| {
        (
            (cx + radius * angle.cos()).round() as i32,
            (cy + radius * angle.sin()).round() as i32,
        )
    };

    let mut angle = -FRAC_PI_2;
    for (index, value) in dataset.data.iter().enumerate() {
        if *value <= 0.0 {
            continue;
        }
        let fill = color(dataset.color_at(index)).filled();
        let share = value / total;
        if share >= 1.0 {
            root.draw(&Circle::new(center, radius.round() as i32, fill))?;
            continue;
        }

        // One vertex per degree of arc.
        let sweep = share * TAU;
        let steps = (sweep.to_degrees().ceil() as usize).max(1);
        let mut vertices = vec![center];
        vertices.extend((0..=steps).map(|step| on_arc(angle + sweep * step as f64 / steps as f64)));
        root.draw(&Polygon::new(vertices, fill))?;
        angle += sweep;
    }

    let size = scale.px(12.0);
    let row = 22.0 * scale.0;
    let x = (width - legend_width + 8.0 * scale.0).round() as i32;
    let mut y = cy - row * spec.labels.len() as f64 / 2.0;
    let style = text_style(scale.font(12.0), Rgb::INK).pos(Pos::new(HPos::Left, VPos::Center));
    for (index, label) in spec.labels.iter().enumerate() {
        let top = y.round() as i32;
        root.draw(&Rectangle::new(
            [(x, top), (x + size, top + size)],
            color(dataset.color_at(index)).filled(),
        ))?;
        let share = dataset.data[index] / total * 100.0;
        root.draw(&Text::new(
            format!("{label} ({share:.0}%)"),
            (x + size + scale.px(6.0), top + size / 2),
            style.clone(),
        ))?;
        y += row;
    }

    Ok(())
}

fn compact(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Dataset, palette};

    fn spec(kind: ChartKind, data: Vec<f64>) -> ChartSpec {
        ChartSpec {
            kind,
            labels: (1..=data.len()).map(|i| format!("L{i}")).collect(),
            datasets: vec![Dataset {
                label: "Usage".into(),
                data,
                colors: palette::ALTERNATING.to_vec(),
            }],
        }
    }

    #[test]
    fn bar_chart_uses_both_alternating_colors() {
        let svg = render(&spec(ChartKind::Bar, vec![1.0, 2.0, 3.0]), 800, 400).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        let lower = svg.to_lowercase();
        assert!(lower.contains("#36a2eb"));
        assert!(lower.contains("#4bc0c0"));
        assert!(svg.contains("Usage"));
        assert!(svg.contains("L2"));
    }

    #[test]
    fn line_chart_draws_a_path_and_markers() {
        let svg = render(&spec(ChartKind::Line, vec![4.0, 1.0]), 800, 400).unwrap();
        assert!(svg.contains("<polyline"));
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn pie_chart_uses_slices_or_full_circle() {
        let svg = render(&spec(ChartKind::Pie, vec![1.0, 3.0]), 800, 400).unwrap();
        assert_eq!(svg.matches("<polygon").count(), 2);
        assert!(svg.contains("L2 (75%)"));

        let svg = render(&spec(ChartKind::Pie, vec![0.0, 3.0]), 800, 400).unwrap();
        assert_eq!(svg.matches("<polygon").count(), 0);
        assert_eq!(svg.matches("<circle").count(), 1);
    }

    #[test]
    fn empty_chart_says_so() {
        let svg = render(&spec(ChartKind::Bar, vec![]), 800, 400).unwrap();
        assert!(svg.contains("No data"));
    }

    #[test]
    fn tick_labels_drop_needless_decimals() {
        assert_eq!(compact(40.0), "40");
        assert_eq!(compact(2.5), "2.5");
    }
}
