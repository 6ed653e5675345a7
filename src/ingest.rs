//! Ingestion boundary for scan collaborator payloads
//!
//! Collaborators have shipped several loose device shapes over time
//! (`ip`/`address`, `vulns`/`vulnerabilities`, `info`/`description`,
//! `fix`/`remediation`, ...). Everything is folded into the canonical
//! [`Device`] schema here, once, so downstream consumers never see the
//! legacy names.

use serde_json::{Map, Value};

use crate::models::{Device, RiskTier, Vulnerability};

const DEFAULT_CATEGORY: &str = "Unknown Device";
const DEFAULT_SERVICE: &str = "unknown";

// Canonical key first, then the legacy spellings
const ADDRESS_KEYS: &[&str] = &["address", "ip"];
const CATEGORY_KEYS: &[&str] = &["category", "type"];
const PLATFORM_KEYS: &[&str] = &["platform", "os"];
const VULNERABILITY_KEYS: &[&str] = &["vulnerabilities", "vulns"];
const TIER_KEYS: &[&str] = &["riskTier", "risk", "risk_tier"];
const DESCRIPTION_KEYS: &[&str] = &["description", "info"];
const REMEDIATION_KEYS: &[&str] = &["remediation", "fix"];

/// Errors raised while decoding a collaborator payload
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("payload is empty")]
    Empty,
    #[error("payload is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("payload is not a JSON device array (found {0})")]
    NotAnArray(&'static str),
}

/// Parse a JSON device array and normalise it into canonical devices.
///
/// Records are read one at a time: a device that is not an object or has no
/// address, and a finding with an unreadable port or unknown tier, is logged
/// and dropped without affecting its neighbours. A payload that yields no
/// devices at all is reported as [`IngestError::Empty`].
pub fn parse_devices(body: &str) -> Result<Vec<Device>, IngestError> {
    if body.trim().is_empty() {
        return Err(IngestError::Empty);
    }

    let records = match serde_json::from_str::<Value>(body)? {
        Value::Array(records) => records,
        other => return Err(IngestError::NotAnArray(json_kind(&other))),
    };
    let devices: Vec<Device> = records.iter().filter_map(normalize_device).collect();

    if devices.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(devices)
}

fn normalize_device(record: &Value) -> Option<Device> {
    let Some(fields) = record.as_object() else {
        tracing::warn!("Dropping device record that is a JSON {}", json_kind(record));
        return None;
    };

    let Some(address) = text_field(fields, ADDRESS_KEYS) else {
        tracing::warn!("Dropping device record without an address");
        return None;
    };

    let vulnerabilities = match field(fields, VULNERABILITY_KEYS) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| normalize_vulnerability(&address, item))
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            tracing::warn!(
                "Ignoring vulnerability list on {} that is a JSON {}",
                address,
                json_kind(other)
            );
            Vec::new()
        }
    };

    Some(Device {
        category: text_field(fields, CATEGORY_KEYS)
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        platform: text_field(fields, PLATFORM_KEYS),
        vulnerabilities,
        address,
    })
}

fn normalize_vulnerability(address: &str, item: &Value) -> Option<Vulnerability> {
    let Some(fields) = item.as_object() else {
        tracing::warn!("Dropping finding on {} that is a JSON {}", address, json_kind(item));
        return None;
    };

    let raw_port = fields.get("port");
    let Some(port) = raw_port.and_then(port_value) else {
        tracing::warn!(
            "Dropping finding on {} with missing or out-of-range port {}",
            address,
            raw_port.map(|v| v.to_string()).unwrap_or_else(|| "null".to_string())
        );
        return None;
    };

    let tier_raw = text_field(fields, TIER_KEYS).unwrap_or_default();
    let Some(risk_tier) = RiskTier::parse(&tier_raw) else {
        tracing::warn!(
            "Dropping finding {}:{} with unrecognised risk tier '{}'",
            address,
            port,
            tier_raw
        );
        return None;
    };

    Some(Vulnerability {
        port,
        service: text_field(fields, &["service"]).unwrap_or_else(|| DEFAULT_SERVICE.to_string()),
        risk_tier,
        description: text_field(fields, DESCRIPTION_KEYS).unwrap_or_default(),
        remediation: text_field(fields, REMEDIATION_KEYS),
    })
}

/// First present, non-null value among `keys`
fn field<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| !value.is_null())
}

/// Trimmed, non-empty text; numbers and booleans are rendered as text
fn text_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    let text = match field(fields, keys)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Port as a JSON integer or a numeric string, within 0..=65535
fn port_value(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
        Value::String(s) => s.trim().parse::<u16>().ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_field_names_map_onto_canonical_schema() {
        let body = r#"[{
            "ip": "192.168.1.1",
            "type": "Gateway",
            "os": "Cisco IOS",
            "vulns": [{"port": 23, "service": "Telnet", "risk": "high",
                       "info": "Unencrypted Admin", "fix": "Disable Telnet. Use SSH."}]
        }]"#;

        let devices = parse_devices(body).expect("legacy payload should parse");
        assert_eq!(devices.len(), 1);
        let device = &devices[0];
        assert_eq!(device.address, "192.168.1.1");
        assert_eq!(device.category, "Gateway");
        assert_eq!(device.platform.as_deref(), Some("Cisco IOS"));
        let vuln = &device.vulnerabilities[0];
        assert_eq!(vuln.risk_tier, RiskTier::High);
        assert_eq!(vuln.description, "Unencrypted Admin");
        assert_eq!(vuln.remediation.as_deref(), Some("Disable Telnet. Use SSH."));
    }

    #[test]
    fn canonical_field_names_are_accepted() {
        let body = r#"[{"address": "10.0.0.5", "category": "Server",
            "vulnerabilities": [{"port": 80, "service": "HTTP", "riskTier": "medium",
                                 "description": "Apache", "remediation": "Use HTTPS"}]}]"#;
        let devices = parse_devices(body).unwrap();
        assert_eq!(devices[0].vulnerabilities[0].risk_tier, RiskTier::Medium);
        assert_eq!(devices[0].platform, None);
    }

    #[test]
    fn missing_or_null_vulnerabilities_become_empty() {
        let body = r#"[{"ip": "10.0.0.1", "type": "Workstation"},
                       {"ip": "10.0.0.2", "type": "Workstation", "vulns": null}]"#;
        let devices = parse_devices(body).unwrap();
        assert!(devices.iter().all(|d| d.vulnerabilities.is_empty()));
    }

    #[test]
    fn unknown_tier_and_bad_port_are_excluded() {
        let body = r#"[{"ip": "10.0.0.3", "type": "Server", "vulns": [
            {"port": 22, "service": "SSH", "risk": "low", "info": "ok"},
            {"port": 8080, "service": "HTTP", "risk": "catastrophic", "info": "?"},
            {"port": 70000, "service": "bogus", "risk": "high", "info": "?"}
        ]}]"#;
        let devices = parse_devices(body).unwrap();
        assert_eq!(devices[0].vulnerabilities.len(), 1);
        assert_eq!(devices[0].vulnerabilities[0].port, 22);
    }

    #[test]
    fn empty_and_unparseable_payloads_are_errors() {
        assert!(matches!(parse_devices("   "), Err(IngestError::Empty)));
        assert!(matches!(parse_devices("[]"), Err(IngestError::Empty)));
        assert!(matches!(
            parse_devices("{\"error\":\"boom\"}"),
            Err(IngestError::NotAnArray("object"))
        ));
        assert!(matches!(
            parse_devices("[{\"ip\": "),
            Err(IngestError::Malformed(_))
        ));
        assert!(matches!(
            parse_devices(r#"[{"type": "Orphan"}]"#),
            Err(IngestError::Empty)
        ));
    }

    #[test]
    fn missing_category_gets_default_label() {
        let devices = parse_devices(r#"[{"address": "10.0.0.4"}]"#).unwrap();
        assert_eq!(devices[0].category, DEFAULT_CATEGORY);
    }

    #[test]
    fn mistyped_finding_only_drops_that_finding() {
        let body = r#"[
            {"ip": "10.0.0.5", "type": "Server", "vulns": [
                {"port": "80", "service": "HTTP", "risk": "medium"},
                {"port": 443, "service": 443, "risk": "low"},
                {"port": {"n": 22}, "service": "SSH", "risk": "high"},
                {"port": 23, "service": "Telnet", "risk": 3},
                "not a finding"
            ]},
            {"ip": "10.0.0.6", "type": "Workstation", "vulns": []},
            42
        ]"#;

        let devices = parse_devices(body).expect("valid records should survive");
        assert_eq!(devices.len(), 2);

        let server = &devices[0];
        assert_eq!(server.vulnerabilities.len(), 2);
        assert_eq!(server.vulnerabilities[0].port, 80);
        assert_eq!(server.vulnerabilities[0].risk_tier, RiskTier::Medium);
        assert_eq!(server.vulnerabilities[1].service, "443");
        assert_eq!(devices[1].address, "10.0.0.6");
    }

    #[test]
    fn non_list_vulnerabilities_leave_device_intact() {
        let devices = parse_devices(r#"[{"ip": "10.0.0.7", "vulns": "none"}]"#).unwrap();
        assert_eq!(devices[0].address, "10.0.0.7");
        assert!(devices[0].vulnerabilities.is_empty());
    }
}
