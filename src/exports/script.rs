//! Remediation shell-script generation
//!
//! Pure template over the finding's port. Same finding in, same bytes out.

use serde::Serialize;

use crate::models::Vulnerability;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemediationScript {
    pub file_name: String,
    pub content: String,
}

/// Hardening steps for well-known ports; `None` means the generic deny rule.
fn port_playbook(port: u16) -> Option<(&'static str, &'static [&'static str])> {
    let playbook: (&'static str, &'static [&'static str]) = match port {
        21 => (
            "Disable FTP",
            &[
                "sudo systemctl stop vsftpd",
                "sudo systemctl disable vsftpd",
                "sudo ufw deny 21/tcp",
            ],
        ),
        22 => (
            "Hardening SSH",
            &[
                "sudo sed -i 's/#PermitRootLogin prohibit-password/PermitRootLogin no/' /etc/ssh/sshd_config",
                "sudo systemctl restart ssh",
            ],
        ),
        23 => (
            "Disable Telnet",
            &[
                "sudo systemctl stop telnet.socket",
                "sudo systemctl disable telnet.socket",
                "sudo ufw deny 23/tcp",
                "echo \"Use SSH for remote administration\"",
            ],
        ),
        80 => (
            "Secure HTTP",
            &[
                "sudo ufw allow 443/tcp",
                "sudo ufw delete allow 80/tcp",
                "echo \"Please install Certbot: sudo apt install certbot\"",
            ],
        ),
        445 => (
            "Restrict SMB",
            &[
                "sudo ufw deny 445/tcp",
                "echo \"Disable SMBv1 on Windows hosts: Set-SmbServerConfiguration -EnableSMB1Protocol $false\"",
            ],
        ),
        3306 => (
            "Bind MySQL to localhost",
            &[
                "sudo sed -i 's/^bind-address.*/bind-address = 127.0.0.1/' /etc/mysql/mysql.conf.d/mysqld.cnf",
                "sudo systemctl restart mysql",
                "sudo ufw deny 3306/tcp",
            ],
        ),
        3389 => (
            "Restrict RDP",
            &[
                "sudo ufw deny 3389/tcp",
                "echo \"Expose RDP only through a VPN or gateway\"",
            ],
        ),
        _ => return None,
    };
    Some(playbook)
}

/// Build the remediation script for one finding.
pub fn generate_script(vulnerability: &Vulnerability) -> RemediationScript {
    let port = vulnerability.port;
    let mut content = format!(
        "#!/bin/bash\n# Net-Sentinel Auto-Remediation Script\n# Target Port: {} ({})\n\n",
        port, vulnerability.service
    );
    content.push_str(&format!(
        "echo \"Starting security patch for Port {}...\"\n",
        port
    ));

    match port_playbook(port) {
        Some((heading, commands)) => {
            content.push_str(&format!("\n# {}\n", heading));
            for command in commands {
                content.push_str(command);
                content.push('\n');
            }
        }
        None => {
            content.push_str(&format!("\n# General Firewall Rule\nsudo ufw deny {}\n", port));
        }
    }

    content.push_str("\necho \"Remediation steps applied. Verify connectivity.\"\n");

    RemediationScript {
        file_name: format!("fix_port_{}.sh", port),
        content,
    }
}
