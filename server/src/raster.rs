//! Off-screen chart rendering to PNG.

use std::sync::{Arc, OnceLock};

use base64::prelude::*;
use resvg::{
    tiny_skia::{Color, Pixmap, Transform},
    usvg::{self, fontdb},
};
use thiserror::Error;
use tracing::debug;
use types::chart::{ChartSpec, svg};

pub const MAX_DIMENSION: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSize {
    pub width: u32,
    pub height: u32,
}

impl Default for RasterSize {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl RasterImage {
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", BASE64_STANDARD.encode(&self.png))
    }
}

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("chart cannot be drawn: {0}")]
    InvalidSpec(types::Error),
    #[error("raster size {width}x{height} must be within 1..={MAX_DIMENSION}")]
    InvalidSize { width: u32, height: u32 },
    #[error("failed to draw chart: {0}")]
    Draw(types::Error),
    #[error("failed to parse chart markup: {0}")]
    Markup(#[from] usvg::Error),
    #[error("failed to allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("failed to encode PNG: {0}")]
    Encode(String),
    #[error("render worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

fn fonts() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            Arc::new(db)
        })
        .clone()
}

/// Renders the chart to a PNG of exactly `size`. Either the whole image is
/// produced or an error is returned.
pub async fn rasterize(spec: &ChartSpec, size: RasterSize) -> Result<RasterImage, RasterError> {
    let RasterSize { width, height } = size;
    if !(1..=MAX_DIMENSION).contains(&width) || !(1..=MAX_DIMENSION).contains(&height) {
        return Err(RasterError::InvalidSize { width, height });
    }
    spec.check().map_err(RasterError::InvalidSpec)?;

    let markup = svg::render(spec, width, height).map_err(RasterError::Draw)?;
    let png = tokio::task::spawn_blocking(move || render_png(&markup, width, height)).await??;
    debug!(width, height, bytes = png.len(), "rasterized chart");

    Ok(RasterImage { width, height, png })
}

fn render_png(markup: &str, width: u32, height: u32) -> Result<Vec<u8>, RasterError> {
    let options = usvg::Options {
        fontdb: fonts(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(markup, &options)?;

    let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::Canvas { width, height })?;
    pixmap.fill(Color::WHITE);
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| RasterError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::chart::{ChartKind, Dataset, palette};

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn bar_chart() -> ChartSpec {
        ChartSpec {
            kind: ChartKind::Bar,
            labels: vec!["HQ".into(), "Warehouse".into()],
            datasets: vec![Dataset {
                label: "Uptime".into(),
                data: vec![99.5, 97.0],
                colors: palette::ALTERNATING.to_vec(),
            }],
        }
    }

    #[tokio::test]
    async fn renders_png_of_requested_size() {
        let size = RasterSize {
            width: 320,
            height: 160,
        };
        let image = rasterize(&bar_chart(), size).await.unwrap();
        assert_eq!((image.width, image.height), (320, 160));
        assert!(image.png.starts_with(PNG_SIGNATURE));
        assert!(image.data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[tokio::test]
    async fn rejects_bad_sizes() {
        for (width, height) in [(0, 100), (100, 0), (MAX_DIMENSION + 1, 10)] {
            let result = rasterize(&bar_chart(), RasterSize { width, height }).await;
            assert!(matches!(result, Err(RasterError::InvalidSize { .. })));
        }
    }

    #[tokio::test]
    async fn rejects_undrawable_specs() {
        let mut spec = bar_chart();
        spec.datasets[0].data.pop();
        let result = rasterize(&spec, RasterSize::default()).await;
        assert!(matches!(result, Err(RasterError::InvalidSpec(_))));

        let mut spec = bar_chart();
        spec.labels.clear();
        spec.datasets[0].data.clear();
        assert!(rasterize(&spec, RasterSize::default()).await.is_err());
    }
}
