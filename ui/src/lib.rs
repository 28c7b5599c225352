//! Components shared by the report pages.

mod chart;
pub mod criteria;
mod table;

pub use chart::ChartView;
pub use criteria::CriteriaForm;
pub use table::ReportTable;
