mod dashboard;
pub use dashboard::Dashboard;

mod reports;
pub use reports::Reports;

mod report;
pub use report::Report;
