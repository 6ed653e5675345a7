//! Locally synthesised assessment used when no narrative provider answers

use chrono::NaiveDate;

use crate::layout::sort_by_severity;
use crate::models::{Device, RiskTier};

/// Every locally generated report starts with this tag
pub const FALLBACK_PREAMBLE: &str = "[NET-SENTINEL AI DIAGNOSTIC";

const GENERIC_REMEDIATION: &str = "Patch service immediately.";

/// Deterministic report for `device`, stamped with `date`.
pub fn fallback_report(device: &Device, date: NaiveDate) -> String {
    let mut text = format!("{} - {}]\n", FALLBACK_PREAMBLE, date.format("%Y-%m-%d"));
    text.push_str(&format!("TARGET: {} ({})\n", device.address, device.category));
    text.push_str(&format!(
        "OS KERNEL: {}\n\n",
        device.platform.as_deref().unwrap_or("Unknown")
    ));

    let Some(top) = sort_by_severity(&device.vulnerabilities).into_iter().next() else {
        text.push_str("STATUS: SYSTEM SECURE\n");
        text.push_str("No active vulnerability vectors detected in current scan depth.\n\n");
        text.push_str("RECOMMENDATION:\n- Maintain firewall rules.\n- Continue periodic deep scans.");
        return text;
    };

    text.push_str(&format!(
        "!! {} RISK VULNERABILITY DETECTED !!\n",
        top.risk_tier.label()
    ));
    text.push_str(&format!("VECTOR: Port {} / {}\n", top.port, top.service));
    text.push_str(&format!("THREAT ASSESSMENT: {}\n\n", top.description));

    let immediate = top
        .remediation
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .unwrap_or(GENERIC_REMEDIATION);
    text.push_str("AI REMEDIATION STRATEGY:\n");
    text.push_str(&format!("1. IMMEDIATE: {}\n", immediate));
    text.push_str(&format!(
        "2. CONFIGURATION: Implement strict ACLs for port {}.\n",
        top.port
    ));
    text.push_str("3. LONG-TERM: Schedule automated patch management cycle.\n");

    if top.risk_tier == RiskTier::High {
        text.push_str(
            "\nWARNING: High risk vector requires urgent attention to prevent remote code execution.",
        );
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vulnerability;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
    }

    #[test]
    fn secure_device_gets_secure_report() {
        let device = Device::new("192.168.1.100", "Workstation").with_platform("Windows 10");
        let report = fallback_report(&device, date());
        assert!(report.starts_with("[NET-SENTINEL AI DIAGNOSTIC - 2026-10-18]\n"));
        assert!(report.contains("OS KERNEL: Windows 10"));
        assert!(report.contains("STATUS: SYSTEM SECURE"));
        assert!(!report.contains("VECTOR"));
    }

    #[test]
    fn highest_tier_wins_and_ties_keep_input_order() {
        let device = Device::new("192.168.1.15", "Linux Server")
            .with_vulnerability(Vulnerability::new(22, "SSH", RiskTier::Low, "OpenSSH"))
            .with_vulnerability(
                Vulnerability::new(3306, "MySQL", RiskTier::High, "root access")
                    .with_remediation("Bind to localhost only."),
            )
            .with_vulnerability(Vulnerability::new(23, "Telnet", RiskTier::High, "cleartext"));

        let report = fallback_report(&device, date());
        assert!(report.contains("VECTOR: Port 3306 / MySQL"));
        assert!(report.contains("1. IMMEDIATE: Bind to localhost only."));
        assert!(report.contains("ACLs for port 3306"));
        assert!(report.ends_with("prevent remote code execution."));
    }

    #[test]
    fn medium_top_finding_has_no_urgent_warning_and_generic_fix() {
        let device = Device::new("10.0.0.8", "Web Server")
            .with_vulnerability(Vulnerability::new(80, "HTTP", RiskTier::Medium, "Unencrypted"));
        let report = fallback_report(&device, date());
        assert!(report.contains("1. IMMEDIATE: Patch service immediately."));
        assert!(report.contains("OS KERNEL: Unknown"));
        assert!(!report.contains("WARNING"));
    }

    #[test]
    fn report_is_deterministic_for_fixed_date() {
        let device = Device::new("10.0.0.8", "Web Server")
            .with_vulnerability(Vulnerability::new(80, "HTTP", RiskTier::Medium, "Unencrypted"));
        assert_eq!(fallback_report(&device, date()), fallback_report(&device, date()));
    }
}
