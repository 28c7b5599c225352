pub mod chart;
pub mod criteria;
mod error;
pub mod export;
pub mod period;
pub mod report;
pub mod schema;
pub mod table;

pub use criteria::{Criteria, CriteriaValue, ValidationErrors};
pub use error::{Error, Result};
pub use export::{ExportRequest, ExportedFile};
pub use report::{ReportKind, Row};
pub use schema::{FieldKind, FieldSchema};

#[doc(hidden)]
pub use anyhow::anyhow as internal_anyhow_dont_use;
