//! CSV export functionality
//!
//! Flat vulnerability inventory, one row per finding

use anyhow::Result;
use csv::Writer;

use crate::models::Device;

/// Export every finding of every device to CSV
pub fn export_vulnerabilities_csv(devices: &[Device]) -> Result<String> {
    let mut writer = Writer::from_writer(vec![]);

    writer.write_record([
        "Address",
        "Category",
        "Platform",
        "Port",
        "Service",
        "Risk Tier",
        "Description",
        "Remediation",
    ])?;

    for device in devices {
        for vuln in &device.vulnerabilities {
            writer.write_record([
                device.address.as_str(),
                device.category.as_str(),
                device.platform_or_unknown(),
                &vuln.port.to_string(),
                &vuln.service,
                vuln.risk_tier.as_str(),
                &vuln.description,
                vuln.remediation_or_placeholder(),
            ])?;
        }
    }

    let csv_data = String::from_utf8(writer.into_inner()?)?;
    Ok(csv_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskTier, Vulnerability};
    use crate::scanner::fallback_devices;

    #[test]
    fn inventory_has_one_row_per_finding() {
        let csv = export_vulnerabilities_csv(&fallback_devices()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        // header + 3 findings on the server + 1 on the gateway
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Address,Category"));
        assert!(lines.iter().any(|l| l.starts_with("192.168.1.1,Gateway,Cisco IOS,23,Telnet,high")));
        assert!(!csv.contains("192.168.1.100"));
    }

    #[test]
    fn missing_fields_use_placeholders_and_commas_are_quoted() {
        let device = Device::new("10.0.0.2", "Workstation").with_vulnerability(
            Vulnerability::new(8080, "http-alt", RiskTier::Medium, "proxy, open"),
        );
        let csv = export_vulnerabilities_csv(&[device]).unwrap();
        assert!(csv.contains("Unknown OS"));
        assert!(csv.contains("\"proxy, open\""));
        assert!(csv.contains("No specific fix data."));
    }
}
