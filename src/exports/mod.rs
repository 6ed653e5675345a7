//! Export functionality for reports
//!
//! Provides the PDF report, remediation scripts, and JSON/CSV session exports

pub mod csv;
pub mod json;
#[cfg(feature = "pdf-export")]
pub mod pdf;
pub mod script;

#[cfg(not(feature = "pdf-export"))]
mod pdf {
    use anyhow::{Result, anyhow};

    use crate::insights::{RiskPenalties, ScoreBands};
    use crate::models::Device;

    pub const REPORT_TITLE: &str = "Net-Sentinel Security Report";
    pub const REPORT_FILE_NAME: &str = "NetSentinel_Report.pdf";

    pub fn render_report_pdf(
        _devices: &[Device],
        _penalties: &RiskPenalties,
        _bands: &ScoreBands,
    ) -> Result<Vec<u8>> {
        Err(anyhow!(
            "PDF export is disabled at compile time. Rebuild with --features pdf-export."
        ))
    }
}

pub use csv::export_vulnerabilities_csv;
pub use json::{DeviceExport, SessionExport, export_session_json};
pub use pdf::{REPORT_FILE_NAME, REPORT_TITLE, render_report_pdf};
pub use script::{RemediationScript, generate_script};
