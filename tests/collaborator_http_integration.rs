use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use net_sentinel::ai::{Advisor, AdvisorySource, AiMode, AiSettings};
use net_sentinel::scanner::DEGRADED_SCAN_NOTICE;
use net_sentinel::{
    AppContext, AppEvent, Device, RiskTier, ScanOrchestrator, ScanRequest, ScanSettings,
    ScanSource, fallback_devices,
};

/// One-route HTTP responder answering every request with `status` and `body`.
/// Request bodies are forwarded on the returned channel.
async fn spawn_responder(
    status: &'static str,
    body: &'static str,
) -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("test listener should bind");
    let addr = listener.local_addr().expect("listener has an address");
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let tx = tx.clone();
            tokio::spawn(async move {
                let request_body = read_request_body(&mut stream).await;
                let _ = tx.send(request_body);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    (format!("http://{}/ip-send", addr), rx)
}

async fn read_request_body(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let Ok(n) = stream.read(&mut chunk).await else {
            break;
        };
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            let body_start = header_end + 4;
            if buf.len() >= body_start + content_length {
                return String::from_utf8_lossy(&buf[body_start..body_start + content_length])
                    .to_string();
            }
        }
    }

    String::new()
}

fn scan_settings(endpoint: String) -> ScanSettings {
    ScanSettings {
        endpoint,
        timeout_ms: 5_000,
        fallback_delay_ms: 0,
    }
}

fn capturing_context() -> (AppContext, Arc<Mutex<Vec<AppEvent>>>) {
    let events: Arc<Mutex<Vec<AppEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let context = AppContext::from_env()
        .with_ai_settings(AiSettings::disabled())
        .with_event_hook(Arc::new(move |event| {
            sink.lock()
                .expect("event lock should not be poisoned")
                .push(event.clone());
        }));
    (context, events)
}

fn degraded_messages(events: &Arc<Mutex<Vec<AppEvent>>>) -> Vec<String> {
    events
        .lock()
        .expect("event lock should not be poisoned")
        .iter()
        .filter_map(|event| match event {
            AppEvent::Degraded { component, message } if component == "scan" => {
                Some(message.clone())
            }
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn server_error_degrades_to_fallback_with_one_notice() {
    let (endpoint, _requests) = spawn_responder("500 Internal Server Error", "{}").await;
    let (context, events) = capturing_context();
    let scanner = ScanOrchestrator::from_settings(&scan_settings(endpoint))
        .expect("scanner should build");

    let result = scanner
        .scan(&ScanRequest::new("192.168.1.0/24", true), &context)
        .await;

    assert_eq!(result.source, ScanSource::Fallback);
    assert_eq!(result.devices, fallback_devices());

    let notices = degraded_messages(&events);
    assert_eq!(notices.len(), 1);
    assert!(notices[0].starts_with(DEGRADED_SCAN_NOTICE));
    assert!(notices[0].contains("500"));
}

#[tokio::test]
async fn empty_device_array_counts_as_failure() {
    let (endpoint, _requests) = spawn_responder("200 OK", "[]").await;
    let (context, events) = capturing_context();
    let scanner = ScanOrchestrator::from_settings(&scan_settings(endpoint))
        .expect("scanner should build");

    let result = scanner
        .scan(&ScanRequest::new("10.0.0.0/24", true), &context)
        .await;

    assert!(result.is_degraded());
    assert_eq!(degraded_messages(&events).len(), 1);
}

#[tokio::test]
async fn unreachable_scanner_degrades_to_fallback() {
    let (context, events) = capturing_context();
    let scanner = ScanOrchestrator::from_settings(&scan_settings(
        "http://127.0.0.1:1/ip-send".to_string(),
    ))
    .expect("scanner should build");

    let result = scanner
        .scan(&ScanRequest::new("10.0.0.0/24", true), &context)
        .await;

    assert_eq!(result.devices, fallback_devices());
    assert_eq!(degraded_messages(&events).len(), 1);
}

#[tokio::test]
async fn legacy_shaped_response_is_ingested() {
    let body = r#"[
        {"ip": "10.0.0.5", "type": "Linux Server", "os": "Debian 12", "vulns": [
            {"port": 23, "service": "Telnet", "risk": "HIGH", "info": "cleartext admin"},
            {"port": 80, "service": "HTTP", "riskTier": "medium", "fix": "Enable HTTPS"},
            {"port": 8443, "service": "https-alt", "risk": "critical"}
        ]},
        {"ip": "10.0.0.9", "vulns": null}
    ]"#;
    let (endpoint, mut requests) = spawn_responder("200 OK", body).await;
    let (context, events) = capturing_context();
    let scanner = ScanOrchestrator::from_settings(&scan_settings(endpoint))
        .expect("scanner should build");

    let result = scanner
        .scan(&ScanRequest::new("10.0.0.0/24", false), &context)
        .await;

    assert_eq!(result.source, ScanSource::Live);
    assert!(degraded_messages(&events).is_empty());
    assert_eq!(result.devices.len(), 2);

    let server = &result.devices[0];
    assert_eq!(server.platform.as_deref(), Some("Debian 12"));
    assert_eq!(server.vulnerabilities.len(), 2, "unknown tier is excluded");
    assert_eq!(server.vulnerabilities[0].risk_tier, RiskTier::High);
    assert_eq!(server.vulnerabilities[0].description, "cleartext admin");
    assert_eq!(
        server.vulnerabilities[1].remediation.as_deref(),
        Some("Enable HTTPS")
    );
    assert_eq!(result.devices[1].category, "Unknown Device");

    let sent = requests.recv().await.expect("scanner received a request");
    let sent: serde_json::Value = serde_json::from_str(&sent).expect("request body is JSON");
    assert_eq!(sent["address"], "10.0.0.0/24");
    assert_eq!(sent["deepScan"], false);
}

#[tokio::test]
async fn narrative_service_answer_is_used_verbatim() {
    let (endpoint, mut requests) =
        spawn_responder("200 OK", r#"{"analysis":"Telnet is exposed. Disable it."}"#).await;
    let settings = AiSettings {
        enabled: true,
        mode: AiMode::Service,
        service_endpoint: endpoint,
        ..AiSettings::disabled()
    };
    let device = Device::new("10.0.0.5", "Linux Server");

    let advisory = Advisor::from_settings(&settings).analyze(&device).await;

    assert_eq!(advisory.source, AdvisorySource::Ai);
    assert_eq!(advisory.text, "Telnet is exposed. Disable it.");
    assert_eq!(advisory.ai_provider.as_deref(), Some("service"));

    let sent = requests.recv().await.expect("service received a request");
    let sent: serde_json::Value = serde_json::from_str(&sent).expect("request body is JSON");
    assert_eq!(sent["scanData"]["address"], "10.0.0.5");
}

#[tokio::test]
async fn blank_narrative_falls_back_to_local_report() {
    let (endpoint, _requests) = spawn_responder("200 OK", r#"{"analysis":"   "}"#).await;
    let settings = AiSettings {
        enabled: true,
        mode: AiMode::Service,
        service_endpoint: endpoint,
        ..AiSettings::disabled()
    };
    let device = Device::new("10.0.0.5", "Linux Server");

    let advisory = Advisor::from_settings(&settings).analyze(&device).await;

    assert_eq!(advisory.source, AdvisorySource::Fallback);
    assert!(advisory.text.contains("SYSTEM SECURE"));
    assert!(advisory.ai_error.unwrap_or_default().contains("empty"));
}
