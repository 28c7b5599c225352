use serde::{Deserialize, Serialize};

use crate::Criteria;

pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Slug of the report, see [`crate::ReportKind::slug`].
    pub report: String,
    pub criteria: Criteria,
    pub include_chart: bool,
}

/// A generated document ready to be saved by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFile {
    pub filename: String,
    pub mime: String,
    pub data_base64: String,
}
