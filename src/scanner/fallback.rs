//! Built-in simulation dataset used while the scanning collaborator is down

use crate::models::{Device, RiskTier, Vulnerability};

/// The fixed fallback dataset. Always nonempty, every address unique.
pub fn fallback_devices() -> Vec<Device> {
    vec![
        Device::new("192.168.1.15", "Linux Server")
            .with_platform("Ubuntu 20.04")
            .with_vulnerability(
                Vulnerability::new(22, "SSH", RiskTier::Low, "OpenSSH 7.2 Protocol 2.0")
                    .with_remediation("Disable Root Login. Use Keys."),
            )
            .with_vulnerability(
                Vulnerability::new(80, "HTTP", RiskTier::Medium, "Apache 2.4.18")
                    .with_remediation("Enable HTTPS (Certbot)."),
            )
            .with_vulnerability(
                Vulnerability::new(3306, "MySQL", RiskTier::High, "MySQL 5.7 root access")
                    .with_remediation("Bind to localhost only. Set strong password."),
            ),
        Device::new("192.168.1.100", "Workstation").with_platform("Windows 10"),
        Device::new("192.168.1.1", "Gateway")
            .with_platform("Cisco IOS")
            .with_vulnerability(
                Vulnerability::new(23, "Telnet", RiskTier::High, "Unencrypted Admin")
                    .with_remediation("Disable Telnet. Use SSH."),
            ),
    ]
}
