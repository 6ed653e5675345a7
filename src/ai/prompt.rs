use anyhow::{Context, Result};

use crate::models::Device;

pub(crate) fn build_prompt(device: &Device) -> Result<String> {
    let findings = serde_json::to_string_pretty(&device.vulnerabilities)
        .context("Failed to serialize device findings for prompt")?;
    Ok(format!(
        "Act as a Senior Cybersecurity Analyst.\n\
I have scanned a device with IP: {address} ({category}), platform: {platform}.\n\
\n\
Here are the open ports and risks found:\n\
{findings}\n\
\n\
Please provide a short, professional executive summary (max 3 sentences) explaining how dangerous this device is.\n\
Then, provide a bulleted list of 3 specific, technical steps to secure it.\n\
Do not use markdown formatting like ** or ##, just plain text.",
        address = device.address,
        category = device.category,
        platform = device.platform_or_unknown(),
        findings = findings
    ))
}
