use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::view::ViewMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Scan {
        target: String,
        deep_scan: bool,
        view: ViewMode,
    },
    Analyze {
        target: String,
        device: Option<String>,
    },
    Report {
        target: String,
        output: Option<PathBuf>,
    },
    Script {
        target: String,
        port: u16,
        device: Option<String>,
    },
    /// `target` primes the session for non-scan actions and is the scan
    /// target when the transcript names none
    Voice {
        transcript: String,
        target: Option<String>,
        output: Option<PathBuf>,
    },
    Help,
    Version,
}

/// What a spoken command asks the dashboard to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum VoiceAction {
    Scan { target: Option<String> },
    Show { mode: ViewMode },
    ExportReport,
    Unrecognized,
}

/// Map a speech transcript to an action. First matching keyword wins,
/// checked in the order scan, topology, orbit, report.
pub fn interpret_transcript(transcript: &str) -> VoiceAction {
    let command = transcript.to_lowercase();

    if command.contains("scan") {
        let target = command
            .split_whitespace()
            .find_map(dotted_quad)
            .map(str::to_string);
        VoiceAction::Scan { target }
    } else if command.contains("topology") || command.contains("map") {
        VoiceAction::Show {
            mode: ViewMode::Topology,
        }
    } else if command.contains("orbit") || command.contains("solar") {
        VoiceAction::Show {
            mode: ViewMode::Orbit,
        }
    } else if command.contains("report") || command.contains("download") {
        VoiceAction::ExportReport
    } else {
        VoiceAction::Unrecognized
    }
}

/// The `a.b.c.d` run inside a word, if any. Trailing punctuation and
/// CIDR suffixes from the recognizer are ignored.
fn dotted_quad(word: &str) -> Option<&str> {
    let start = word.find(|c: char| c.is_ascii_digit())?;
    let candidate = &word[start..];
    let end = candidate
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(candidate.len());
    let candidate = candidate[..end].trim_end_matches('.');

    let octets: Vec<&str> = candidate.split('.').collect();
    let valid = octets.len() == 4
        && octets
            .iter()
            .all(|o| !o.is_empty() && o.len() <= 3 && o.parse::<u8>().is_ok());
    valid.then_some(candidate)
}
