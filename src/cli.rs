use anyhow::Result;
use std::path::PathBuf;

use crate::command::AppCommand;
use crate::view::ViewMode;

pub fn version_text() -> String {
    format!("net-sentinel {}", env!("CARGO_PKG_VERSION"))
}

pub fn usage_text() -> String {
    format!(
        "{version}
Net-Sentinel - Network Risk Dashboard CLI

Usage:
  net-sentinel scan <TARGET> [--quick] [--topology]
  net-sentinel analyze <TARGET> [--device <ADDRESS>]
  net-sentinel report <TARGET> [--output <FILE>]
  net-sentinel script <TARGET> --port <PORT> [--device <ADDRESS>]
  net-sentinel voice \"<TRANSCRIPT>\" [--target <TARGET>] [--output <FILE>]
  net-sentinel --help
  net-sentinel --version

Options:
  -q, --quick             Scan: ask the scanner for a quick scan instead of a deep one
  -t, --topology          Scan: show the topology view instead of the orbit view
  -d, --device <ADDRESS>  Analyze/script: device to select (default: first device)
  -o, --output <FILE>     Report/voice: PDF path (default: NetSentinel_Report.pdf)
      --target <TARGET>   Voice: scan loaded before view/report commands, and the
                          scan target when the transcript names no address
  -p, --port <PORT>       Script: port of the finding to remediate
  -h, --help              Show this help text
  -V, --version           Show version

Environment:
  NET_SENTINEL_SCAN_ENDPOINT, NET_SENTINEL_FALLBACK_DELAY_MS,
  NET_SENTINEL_AI_MODE (disabled|service|gemini|hybrid), NET_SENTINEL_AI_ENDPOINT,
  NET_SENTINEL_AI_GEMINI_API_KEY, RUST_LOG",
        version = version_text()
    )
}

fn parse_port_arg(raw: &str) -> Result<u16> {
    raw.parse::<u16>().ok().ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid value for --port: '{}'. Expected a port number (0-65535).\n\n{}",
            raw,
            usage_text()
        )
    })
}

/// Value of `--flag=value` or of the next argument after `--flag`.
fn flag_value<I, S>(flag: &str, inline: Option<&str>, iter: &mut I) -> Result<String>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    let value = match inline {
        Some(value) => value.to_string(),
        None => iter
            .next()
            .map(|v| v.as_ref().to_string())
            .unwrap_or_default(),
    };
    if value.is_empty() {
        return Err(anyhow::anyhow!(
            "Missing value for {}.\n\n{}",
            flag,
            usage_text()
        ));
    }
    Ok(value)
}

fn only_valid_with(flag: &str, command: &str) -> anyhow::Error {
    anyhow::anyhow!("{} is only valid with {}.\n\n{}", flag, command, usage_text())
}

pub fn parse_cli_args<I, S>(args: I) -> Result<AppCommand>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iter = args.into_iter();
    let _program_name = iter.next();

    let mut command: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();
    let mut quick = false;
    let mut topology = false;
    let mut device: Option<String> = None;
    let mut output: Option<PathBuf> = None;
    let mut port: Option<u16> = None;
    let mut voice_target: Option<String> = None;

    while let Some(arg) = iter.next() {
        let arg = arg.as_ref();
        let (name, inline) = match arg.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (arg, None),
        };

        match name {
            "-h" | "--help" => return Ok(AppCommand::Help),
            "-V" | "--version" => return Ok(AppCommand::Version),
            "-q" | "--quick" => quick = true,
            "-t" | "--topology" => topology = true,
            "-d" | "--device" => device = Some(flag_value("--device", inline, &mut iter)?),
            "-o" | "--output" => {
                output = Some(PathBuf::from(flag_value("--output", inline, &mut iter)?))
            }
            "--target" => voice_target = Some(flag_value("--target", inline, &mut iter)?),
            "-p" | "--port" => {
                port = Some(parse_port_arg(&flag_value("--port", inline, &mut iter)?)?)
            }
            "scan" | "analyze" | "report" | "script" | "voice" if command.is_none() => {
                command = Some(name.to_string());
            }
            _ if name.starts_with('-') => {
                return Err(anyhow::anyhow!(
                    "Unknown argument: {arg}\n\n{}",
                    usage_text()
                ));
            }
            _ => positional.push(arg.to_string()),
        }
    }

    let Some(command) = command else {
        if positional.is_empty() {
            return Ok(AppCommand::Help);
        }
        return Err(anyhow::anyhow!(
            "Unknown command: {}\n\n{}",
            positional[0],
            usage_text()
        ));
    };

    if command == "voice" {
        if quick || topology || device.is_some() || port.is_some() {
            return Err(anyhow::anyhow!(
                "voice takes a transcript plus optional --target and --output.\n\n{}",
                usage_text()
            ));
        }
        if positional.is_empty() {
            return Err(anyhow::anyhow!("Missing transcript.\n\n{}", usage_text()));
        }
        return Ok(AppCommand::Voice {
            transcript: positional.join(" "),
            target: voice_target,
            output,
        });
    }

    let target = match positional.as_slice() {
        [target] => target.clone(),
        [] => {
            return Err(anyhow::anyhow!(
                "Missing target for {}.\n\n{}",
                command,
                usage_text()
            ));
        }
        [_, extra, ..] => {
            return Err(anyhow::anyhow!(
                "Unexpected argument: {}\n\n{}",
                extra,
                usage_text()
            ));
        }
    };

    if voice_target.is_some() {
        return Err(only_valid_with("--target", "voice"));
    }
    if (quick || topology) && command != "scan" {
        return Err(only_valid_with("--quick/--topology", "scan"));
    }
    if output.is_some() && command != "report" {
        return Err(only_valid_with("--output", "report"));
    }
    if port.is_some() && command != "script" {
        return Err(only_valid_with("--port", "script"));
    }
    if device.is_some() && command != "analyze" && command != "script" {
        return Err(only_valid_with("--device", "analyze or script"));
    }

    match command.as_str() {
        "scan" => Ok(AppCommand::Scan {
            target,
            deep_scan: !quick,
            view: if topology {
                ViewMode::Topology
            } else {
                ViewMode::Orbit
            },
        }),
        "analyze" => Ok(AppCommand::Analyze { target, device }),
        "report" => Ok(AppCommand::Report { target, output }),
        "script" => {
            let port = port.ok_or_else(|| {
                anyhow::anyhow!("script requires --port <PORT>.\n\n{}", usage_text())
            })?;
            Ok(AppCommand::Script {
                target,
                port,
                device,
            })
        }
        other => Err(anyhow::anyhow!(
            "Unknown command: {}\n\n{}",
            other,
            usage_text()
        )),
    }
}
