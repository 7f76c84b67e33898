use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use std::path::Path;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::Targets,
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    Layer,
};

/// Target used for per-call progress lines shown on the console.
pub const TASK_RESULT: &str = "task_result";

/// Installs the console + hourly file subscriber. The returned guard
/// MUST be kept alive by the caller or buffered file lines are lost.
pub fn setup_logger(log_dir: impl AsRef<Path>) -> Option<WorkerGuard> {
    let log_dir = log_dir.as_ref();
    std::fs::create_dir_all(log_dir).ok();

    let file_appender = tracing_appender::rolling::hourly(log_dir, "fanable");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // File layer: everything from INFO up
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(Targets::new().with_default(Level::INFO));

    // Console layer: progress lines plus warnings and errors
    let console_filter = Targets::new()
        .with_target(TASK_RESULT, Level::INFO)
        .with_default(Level::WARN);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(TerminalFormatter)
        .with_filter(console_filter);

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init();

    // A subscriber already installed (tests) keeps ownership of output
    installed.ok().map(|_| guard)
}

// --- Formatters ---

struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

fn event_message(event: &Event<'_>) -> String {
    let mut visitor = MessageVisitor {
        message: String::new(),
    };
    event.record(&mut visitor);
    visitor.message
}

/// Paints `SUCCESS`/`FAILED` markers and colors by level.
pub fn colorize(level: &Level, msg: &str) -> String {
    if msg.contains("SUCCESS") {
        let green = Style::new().fg(Color::LightGreen).bold();
        return msg.replace("SUCCESS", &green.paint("SUCCESS").to_string());
    }
    if msg.contains("FAILED") {
        let red = Style::new().fg(Color::LightRed).bold();
        return msg.replace("FAILED", &red.paint("FAILED").to_string());
    }

    match *level {
        Level::ERROR => Color::Red.paint(msg).to_string(),
        Level::WARN => Color::Yellow.paint(msg).to_string(),
        _ => msg.to_string(),
    }
}

pub struct TerminalFormatter;

impl<S, N> FormatEvent<S, N> for TerminalFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let msg = event_message(event);
        writeln!(writer, "{}", colorize(event.metadata().level(), &msg))
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let level = event.metadata().level();

        write!(writer, "{} [{}] ", timestamp, level)?;
        writeln!(writer, "{}", event_message(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_marks_success() {
        let painted = colorize(&Level::INFO, "Referral SUCCESS - ok");
        assert!(painted.contains("\u{1b}["));
        assert!(painted.contains("SUCCESS"));
    }

    #[test]
    fn test_colorize_plain_info_untouched() {
        assert_eq!(colorize(&Level::INFO, "Iteration 1 / 2"), "Iteration 1 / 2");
    }
}
