use base64::prelude::*;
use jiff::civil::Date;
use printpdf::image_crate;
use tracing::{debug, error, info};
use types::{
    ExportRequest, ExportedFile, ReportKind, Result, criteria::validate, err, export::PDF_MIME,
    table::TableView,
};

use crate::{
    config::Config,
    logo::fetch_logo,
    pdf::{self, ComposeInput, Images, Layout, PdfError},
    raster::{RasterError, RasterSize, rasterize},
};

impl From<RasterError> for types::Error {
    fn from(error: RasterError) -> Self {
        anyhow::Error::new(error).into()
    }
}

impl From<PdfError> for types::Error {
    fn from(error: PdfError) -> Self {
        anyhow::Error::new(error).into()
    }
}

/// Exports with the global configuration, dated today.
pub async fn export(request: ExportRequest) -> Result<ExportedFile> {
    let today = jiff::Zoned::now().date();
    export_with(request, crate::config(), today).await
}

pub async fn export_with(
    request: ExportRequest,
    config: &Config,
    today: Date,
) -> Result<ExportedFile> {
    let result = run(&request, config, today).await;
    if let Err(error) = &result {
        error!(report = %request.report, "export failed: {error}");
    }
    result
}

async fn run(request: &ExportRequest, config: &Config, today: Date) -> Result<ExportedFile> {
    let kind = ReportKind::from_slug(&request.report)?;
    let errors = validate(&kind.fields(), &request.criteria);
    if !errors.is_empty() {
        return Err(err!("invalid criteria: {}", errors.summary()));
    }
    info!(report = kind.slug(), include_chart = request.include_chart, "exporting report");

    let rows = kind.filter(&request.criteria, kind.sample_rows(today));
    let table = TableView::build(&kind.columns(), &rows);

    let chart = match kind.chart(&rows) {
        Some(spec) if request.include_chart && spec.check().is_ok() => {
            let size = RasterSize {
                width: config.export.chart_width,
                height: config.export.chart_height,
            };
            let image = rasterize(&spec, size).await?;
            let decoded = image_crate::load_from_memory(&image.png)
                .map_err(|e| err!("failed to decode chart image: {e}"))?;
            Some(decoded)
        }
        Some(_) if request.include_chart => {
            debug!(report = kind.slug(), "nothing to chart");
            None
        }
        _ => None,
    };

    let logo = match &config.branding.logo {
        Some(source) => fetch_logo(source, &config.export.logo_policy()).await,
        None => None,
    };

    let input = ComposeInput {
        title: kind.title(),
        generated_on: today,
        table: &table,
        has_chart: chart.is_some(),
        has_logo: logo.is_some(),
    };
    let document = pdf::compose(&input, &config.branding, &Layout::default());
    let pages = document.pages.len();

    let images = Images { logo, chart };
    let bytes = tokio::task::spawn_blocking(move || pdf::render_pdf(&document, &images))
        .await
        .map_err(PdfError::from)??;

    info!(report = kind.slug(), pages, bytes = bytes.len(), "export finished");

    Ok(ExportedFile {
        filename: format!("{}-{today}.pdf", kind.slug()),
        mime: PDF_MIME.to_string(),
        data_base64: BASE64_STANDARD.encode(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use types::{Criteria, CriteriaValue, period::DateRange};

    fn request(report: &str, criteria: Criteria) -> ExportRequest {
        ExportRequest {
            report: report.into(),
            criteria,
            include_chart: false,
        }
    }

    #[tokio::test]
    async fn unknown_report_is_rejected() {
        let error = export_with(
            request("wifi-magic", Criteria::default()),
            &Config::default(),
            date(2026, 10, 18),
        )
        .await
        .unwrap_err();
        assert_eq!(error.message, "unknown report 'wifi-magic'");
    }

    #[tokio::test]
    async fn invalid_criteria_are_rejected() {
        let criteria = Criteria::default().with(
            "period",
            CriteriaValue::DateRange(DateRange::new(date(2026, 10, 2), date(2026, 10, 1))),
        );
        let error = export_with(
            request("network-usage", criteria),
            &Config::default(),
            date(2026, 10, 18),
        )
        .await
        .unwrap_err();
        assert!(error.message.contains("Start date must be on or before the end date"));
    }

    #[tokio::test]
    async fn table_only_export_is_named_by_slug_and_date() {
        let file = export_with(
            request("device-inventory", Criteria::default()),
            &Config::default(),
            date(2026, 10, 18),
        )
        .await
        .unwrap();
        assert_eq!(file.filename, "device-inventory-2026-10-18.pdf");
        assert_eq!(file.mime, "application/pdf");
        let bytes = BASE64_STANDARD.decode(file.data_base64).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
