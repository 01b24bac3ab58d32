//! Service layer - report use cases.

mod report_service;

pub use report_service::{ReportManager, ReportService};
