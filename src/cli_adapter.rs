use anyhow::Result;

use crate::app::{AppContext, AppEvent, execute_command_with_context};
use crate::cli::parse_cli_args;

/// Run the app by parsing CLI-style args and dispatching the command.
pub async fn run<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let context = AppContext::from_env().with_event_hook(std::sync::Arc::new(log_event));
    run_with_context(args, &context).await
}

/// Run the app with an explicit context (settings and output hooks).
pub async fn run_with_context<I, S>(args: I, context: &AppContext) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let command = parse_cli_args(args)?;
    execute_command_with_context(command, context).await
}

/// Console rendering of app events; user-facing notices go to stderr.
fn log_event(event: &AppEvent) {
    match event {
        AppEvent::Info { message } => crate::log_stderr!("{}", message),
        AppEvent::Warn { message } => crate::log_warn!("{}", message),
        AppEvent::Error { message } => crate::log_error!("{}", message),
        AppEvent::Degraded { component, message } => {
            crate::log_warn!("[{}] {}", component, message)
        }
        AppEvent::ScanStarted { ticket, target } => {
            crate::log_stderr!("Scan #{} of {} started", ticket, target)
        }
        AppEvent::ScanApplied {
            ticket,
            devices,
            source,
        } => crate::log_stderr!(
            "Scan #{} applied: {} devices ({:?})",
            ticket,
            devices,
            source
        ),
        AppEvent::ScanDiscarded { ticket } => {
            crate::log_debug!("Scan #{} superseded, result discarded", ticket)
        }
    }
}
