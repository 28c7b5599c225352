//! Document layout and PDF serialization.
//!
//! [`compose`] positions everything on pages in points, origin at the top-left
//! corner, without touching any PDF machinery. [`render_pdf`] then writes that
//! model out with printpdf, flipping the y axis.

use jiff::civil::Date;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfLayerReference, Pt, Rect, Rgb as PdfRgb,
    image_crate::{DynamicImage, RgbImage},
};
use thiserror::Error;
use types::{chart::Rgb, table::TableView};

use crate::config::Branding;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub header_height: f32,
    pub row_height: f32,
    /// Where the table resumes on continuation pages.
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub table_gap: f32,
}

impl Default for Layout {
    /// A4 portrait.
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: 40.0,
            header_height: 85.0,
            row_height: 18.0,
            top_margin: 40.0,
            bottom_margin: 50.0,
            table_gap: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Logo,
    Chart,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    /// `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        size: f32,
        text: String,
        color: Rgb,
        bold: bool,
    },
    Image {
        slot: ImageSlot,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub elements: Vec<Element>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|element| match element {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn image(&self, slot: ImageSlot) -> Option<&Element> {
        self.elements
            .iter()
            .find(|element| matches!(element, Element::Image { slot: s, .. } if *s == slot))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub title: String,
    pub layout: Layout,
    pub pages: Vec<Page>,
}

pub struct ComposeInput<'a> {
    pub title: &'a str,
    pub generated_on: Date,
    pub table: &'a TableView,
    pub has_chart: bool,
    pub has_logo: bool,
}

/// Rough Helvetica advance width.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

/// Shortens `text` with a trailing ellipsis until it fits `max_width`.
fn fit(text: &str, size: f32, max_width: f32) -> String {
    if text_width(text, size) <= max_width {
        return text.to_string();
    }
    let room = ((max_width - text_width(ELLIPSIS, size)) / (size * 0.5)).floor();
    let keep = if room > 0.0 { room as usize } else { 0 };
    let mut short: String = text.chars().take(keep).collect();
    short.push_str(ELLIPSIS);
    short
}

struct Composer<'a> {
    layout: &'a Layout,
    branding: &'a Branding,
    pages: Vec<Page>,
    current: Vec<Element>,
}

impl Composer<'_> {
    fn text(&mut self, x: f32, y: f32, size: f32, text: impl Into<String>, color: Rgb, bold: bool) {
        self.current.push(Element::Text {
            x,
            y,
            size,
            text: text.into(),
            color,
            bold,
        });
    }

    /// Centered between the side margins, shortened to fit between them.
    fn centered(&mut self, y: f32, size: f32, text: &str, color: Rgb, bold: bool) {
        let layout = self.layout;
        let text = fit(text, size, layout.page_width - 2.0 * layout.margin);
        let x = (layout.page_width - text_width(&text, size)) / 2.0;
        self.text(x, y, size, text, color, bold);
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.current.push(Element::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn new_page(&mut self) {
        let elements = std::mem::take(&mut self.current);
        self.pages.push(Page {
            number: self.pages.len() + 1,
            elements,
        });
    }

    fn header(&mut self, has_logo: bool) {
        let layout = self.layout;
        let branding = self.branding;
        self.rect(0.0, 0.0, layout.page_width, layout.header_height, branding.brand_color);

        let mut x = 20.0;
        if has_logo {
            self.current.push(Element::Image {
                slot: ImageSlot::Logo,
                x: 20.0,
                y: 12.0,
                width: 60.0,
                height: 60.0,
            });
            x = 92.0;
        }

        let width = layout.page_width - x - 20.0;
        let name = fit(&branding.company_name, 16.0, width);
        self.text(x, 35.0, 16.0, name, Rgb::WHITE, true);
        for (index, line) in branding.address_lines.iter().take(2).enumerate() {
            let line = fit(line, 9.0, width);
            self.text(x, 52.0 + 12.0 * index as f32, 9.0, line, Rgb::WHITE, false);
        }
    }

    fn table_header(&mut self, y: f32, headers: &[String]) {
        let layout = self.layout;
        let width = layout.page_width - 2.0 * layout.margin;
        self.rect(layout.margin, y, width, layout.row_height, self.branding.brand_color);
        self.cells(y, headers, 10.0, Rgb::WHITE, true);
    }

    fn cells(&mut self, y: f32, cells: &[String], size: f32, color: Rgb, bold: bool) {
        let layout = self.layout;
        let column = (layout.page_width - 2.0 * layout.margin) / cells.len().max(1) as f32;
        let baseline = y + layout.row_height * 0.5 + size * 0.35;
        for (index, cell) in cells.iter().enumerate() {
            let cell = fit(cell, size, column - 8.0);
            let left = layout.margin + column * index as f32;
            let x = left + (column - text_width(&cell, size)) / 2.0;
            self.text(x, baseline, size, cell, color, bold);
        }
    }

    fn footers(&mut self) {
        let layout = self.layout;
        let notice = self.branding.confidentiality.clone();
        let y = layout.page_height - 20.0;
        for page in &mut self.pages {
            let label = format!("Page {}", page.number);
            let label_x = layout.page_width - layout.margin - text_width(&label, 8.0);
            if !notice.is_empty() {
                page.elements.push(Element::Text {
                    x: layout.margin,
                    y,
                    size: 8.0,
                    text: fit(&notice, 8.0, label_x - layout.margin - 12.0),
                    color: Rgb::MUTED,
                    bold: false,
                });
            }
            page.elements.push(Element::Text {
                x: label_x,
                y,
                size: 8.0,
                text: label,
                color: Rgb::MUTED,
                bold: false,
            });
        }
    }
}

/// Lays out the whole document. Every page gets a footer with its 1-based
/// number; the table header repeats on each continuation page.
pub fn compose(input: &ComposeInput<'_>, branding: &Branding, layout: &Layout) -> ExportDocument {
    let mut composer = Composer {
        layout,
        branding,
        pages: Vec::new(),
        current: Vec::new(),
    };

    composer.header(input.has_logo);
    composer.centered(115.0, 18.0, input.title, Rgb::INK, true);
    composer.centered(
        133.0,
        10.0,
        &format!("Generated on {}", input.generated_on),
        Rgb::MUTED,
        false,
    );

    let mut y = 150.0;
    if input.has_chart {
        let width = layout.page_width - 2.0 * layout.margin;
        let height = width / 2.0;
        composer.current.push(Element::Image {
            slot: ImageSlot::Chart,
            x: layout.margin,
            y,
            width,
            height,
        });
        y += height + layout.table_gap;
    }

    let table = input.table;
    let limit = layout.page_height - layout.bottom_margin;
    if !table.headers.is_empty() {
        // Header plus at least one row, or start on a fresh page.
        if y + 2.0 * layout.row_height > limit {
            composer.new_page();
            y = layout.top_margin;
        }
        composer.table_header(y, &table.headers);
        y += layout.row_height;

        if table.rows.is_empty() {
            composer.centered(
                y + layout.row_height * 0.7,
                9.0,
                "No data for the selected criteria.",
                Rgb::MUTED,
                false,
            );
        }

        for (index, row) in table.rows.iter().enumerate() {
            if y + layout.row_height > limit {
                composer.new_page();
                y = layout.top_margin;
                composer.table_header(y, &table.headers);
                y += layout.row_height;
            }
            if index % 2 == 1 {
                let width = layout.page_width - 2.0 * layout.margin;
                composer.rect(layout.margin, y, width, layout.row_height, Rgb::STRIPE);
            }
            composer.cells(y, row, 9.0, Rgb::INK, false);
            y += layout.row_height;
        }
    }

    composer.new_page();
    composer.footers();

    ExportDocument {
        title: input.title.to_string(),
        layout: *layout,
        pages: composer.pages,
    }
}

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to write PDF: {0}")]
    Write(#[from] printpdf::Error),
    #[error("PDF worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[derive(Default)]
pub struct Images {
    pub logo: Option<DynamicImage>,
    pub chart: Option<DynamicImage>,
}

impl Images {
    fn get(&self, slot: ImageSlot) -> Option<&DynamicImage> {
        match slot {
            ImageSlot::Logo => self.logo.as_ref(),
            ImageSlot::Chart => self.chart.as_ref(),
        }
    }
}

fn pdf_color(color: Rgb) -> Color {
    let (r, g, b) = color.to_unit();
    Color::Rgb(PdfRgb::new(r, g, b, None))
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

/// Serializes the laid out document. An image slot without an image is
/// skipped.
pub fn render_pdf(document: &ExportDocument, images: &Images) -> Result<Vec<u8>, PdfError> {
    let layout = &document.layout;
    let (width, height) = (mm(layout.page_width), mm(layout.page_height));
    let (doc, first_page, first_layer) = PdfDocument::new(&document.title, width, height, "Page 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    // Flattened once; printpdf embeds RGB without alpha.
    let logo = images.get(ImageSlot::Logo).map(flatten);
    let chart = images.get(ImageSlot::Chart).map(flatten);

    for page in &document.pages {
        let layer = if page.number == 1 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (index, layer) = doc.add_page(width, height, format!("Page {}", page.number));
            doc.get_page(index).get_layer(layer)
        };

        for element in &page.elements {
            draw(&layer, element, layout, &regular, &bold, |slot| match slot {
                ImageSlot::Logo => logo.as_ref(),
                ImageSlot::Chart => chart.as_ref(),
            });
        }
    }

    Ok(doc.save_to_bytes()?)
}

fn flatten(image: &DynamicImage) -> DynamicImage {
    let rgba = image.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (target, source) in rgb.pixels_mut().zip(rgba.pixels()) {
        let alpha = u16::from(source[3]);
        for channel in 0..3 {
            let value = u16::from(source[channel]) * alpha + 255 * (255 - alpha);
            target[channel] = (value / 255) as u8;
        }
    }
    DynamicImage::ImageRgb8(rgb)
}

fn draw<'a>(
    layer: &PdfLayerReference,
    element: &Element,
    layout: &Layout,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
    image_for: impl Fn(ImageSlot) -> Option<&'a DynamicImage>,
) {
    let flip = |y: f32| mm(layout.page_height - y);
    match element {
        Element::Rect {
            x,
            y,
            width,
            height,
            color,
        } => {
            layer.set_fill_color(pdf_color(*color));
            layer.add_rect(Rect::new(mm(*x), flip(y + height), mm(x + width), flip(*y)));
        }
        Element::Text {
            x,
            y,
            size,
            text,
            color,
            bold: is_bold,
        } => {
            layer.set_fill_color(pdf_color(*color));
            let font = if *is_bold { bold } else { regular };
            layer.use_text(text.as_str(), *size, mm(*x), flip(*y), font);
        }
        Element::Image {
            slot,
            x,
            y,
            width,
            height,
        } => {
            let Some(image) = image_for(*slot) else {
                return;
            };
            let (pixels_w, pixels_h) = (image.width() as f32, image.height() as f32);
            Image::from_dynamic_image(image).add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(mm(*x)),
                    translate_y: Some(flip(y + height)),
                    scale_x: Some(width / pixels_w),
                    scale_y: Some(height / pixels_h),
                    // One pixel per point before scaling.
                    dpi: Some(72.0),
                    ..Default::default()
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn table(rows: usize) -> TableView {
        TableView {
            headers: vec!["Site".into(), "Access Point".into(), "Uptime (%)".into()],
            rows: (0..rows)
                .map(|i| vec!["HQ".into(), format!("AP-{i:03}"), "99.5".into()])
                .collect(),
        }
    }

    fn compose_with(table: &TableView, has_chart: bool) -> ExportDocument {
        let input = ComposeInput {
            title: "Access Point Uptime",
            generated_on: date(2026, 10, 18),
            table,
            has_chart,
            has_logo: false,
        };
        compose(&input, &Branding::default(), &Layout::default())
    }

    fn first_row_y(page: &Page, brand: Rgb) -> f32 {
        page.elements
            .iter()
            .find_map(|element| match element {
                Element::Rect { y, color, .. } if *color == brand && *y > 0.0 => Some(*y),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn every_page_is_numbered() {
        let document = compose_with(&table(120), true);
        assert!(document.pages.len() >= 3);
        for (index, page) in document.pages.iter().enumerate() {
            let label = format!("Page {}", index + 1);
            assert_eq!(page.number, index + 1);
            assert_eq!(page.texts().filter(|t| *t == label).count(), 1);
            assert!(page.texts().any(|t| t.starts_with("Confidential")));
        }
    }

    #[test]
    fn table_starts_below_the_chart() {
        let layout = Layout::default();
        let document = compose_with(&table(3), true);
        let page = &document.pages[0];

        let Some(Element::Image { y, height, width, .. }) = page.image(ImageSlot::Chart) else {
            panic!("chart missing");
        };
        assert_eq!(*width, layout.page_width - 80.0);
        assert_eq!(*height, *width / 2.0);

        let table_y = first_row_y(page, Branding::default().brand_color);
        assert!(table_y > y + height);
        assert_eq!(table_y, y + height + layout.table_gap);

        let without = compose_with(&table(3), false);
        assert!(without.pages[0].image(ImageSlot::Chart).is_none());
        assert_eq!(first_row_y(&without.pages[0], Branding::default().brand_color), 150.0);
    }

    #[test]
    fn header_repeats_and_rows_stay_above_the_footer() {
        let layout = Layout::default();
        let document = compose_with(&table(120), false);
        let rows: usize = document
            .pages
            .iter()
            .map(|page| page.texts().filter(|t| t.starts_with("AP-")).count())
            .sum();
        assert_eq!(rows, 120);

        for page in &document.pages[1..] {
            assert_eq!(page.texts().filter(|t| *t == "Access Point").count(), 1);
            assert_eq!(first_row_y(page, Branding::default().brand_color), layout.top_margin);
        }
        for page in &document.pages {
            for element in &page.elements {
                if let Element::Rect { y, height, .. } = element {
                    assert!(y + height <= layout.page_height - layout.bottom_margin);
                }
            }
        }
    }

    #[test]
    fn empty_table_gets_a_notice() {
        let document = compose_with(&table(0), false);
        assert_eq!(document.pages.len(), 1);
        assert!(
            document.pages[0]
                .texts()
                .any(|t| t == "No data for the selected criteria.")
        );
    }

    #[test]
    fn long_cells_are_truncated() {
        let short = fit("HQ", 9.0, 100.0);
        assert_eq!(short, "HQ");
        let long = fit(&"x".repeat(200), 9.0, 100.0);
        assert!(long.ends_with(ELLIPSIS));
        assert!(text_width(&long, 9.0) <= 100.0);
    }

    #[test]
    fn long_titles_stay_within_the_margins() {
        let layout = Layout::default();
        let title = "Wireless Client Session Duration by Access Point and SSID ".repeat(3);
        let input = ComposeInput {
            title: &title,
            generated_on: date(2026, 10, 18),
            table: &table(1),
            has_chart: false,
            has_logo: false,
        };
        let document = compose(&input, &Branding::default(), &layout);
        let (x, text) = document.pages[0]
            .elements
            .iter()
            .find_map(|element| match element {
                Element::Text { x, y, text, .. } if *y == 115.0 => Some((*x, text)),
                _ => None,
            })
            .unwrap();
        assert!(text.ends_with(ELLIPSIS));
        assert!(x >= layout.margin);
        assert!(x + text_width(text, 18.0) <= layout.page_width - layout.margin);
        // The document keeps its full title.
        assert_eq!(document.title, title);
    }

    #[test]
    fn only_two_address_lines_are_printed() {
        let branding = Branding {
            address_lines: vec!["Line one".into(), "Line two".into(), "Line three".into()],
            ..Branding::default()
        };
        let input = ComposeInput {
            title: "Device Inventory",
            generated_on: date(2026, 10, 18),
            table: &table(1),
            has_chart: false,
            has_logo: false,
        };
        let document = compose(&input, &branding, &Layout::default());
        let texts: Vec<_> = document.pages[0].texts().collect();
        assert!(texts.contains(&"Line one"));
        assert!(texts.contains(&"Line two"));
        assert!(!texts.contains(&"Line three"));
    }

    #[test]
    fn logo_slot_moves_the_company_name() {
        let input = ComposeInput {
            title: "Device Inventory",
            generated_on: date(2026, 10, 18),
            table: &table(1),
            has_chart: false,
            has_logo: true,
        };
        let document = compose(&input, &Branding::default(), &Layout::default());
        let page = &document.pages[0];
        assert!(page.image(ImageSlot::Logo).is_some());
        assert!(page.elements.iter().any(|element| matches!(
            element,
            Element::Text { x, text, .. } if text == "Airdesk Networks" && *x == 92.0
        )));
    }

    #[test]
    fn renders_a_pdf() {
        let document = compose_with(&table(60), true);
        let chart = DynamicImage::ImageRgb8(RgbImage::new(40, 20));
        let images = Images {
            logo: None,
            chart: Some(chart),
        };
        let bytes = render_pdf(&document, &images).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
