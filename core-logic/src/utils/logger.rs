use anyhow::{Context, Result};
use chrono::Local;
use nu_ansi_term::{Color, Style};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    EnvFilter, Layer,
};

pub fn setup_logger() -> Result<WorkerGuard> {
    std::fs::create_dir_all("logs").context("Failed to create logs directory")?;

    // Hourly rotation, the bot runs for days
    let file_appender = tracing_appender::rolling::hourly("logs", "bot");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter = tracing_subscriber::filter::Targets::new()
        .with_default(tracing::Level::INFO);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(file_filter);

    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(TerminalFormatter)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    // Guard MUST be kept alive by caller
    Ok(guard)
}

/// `0x1234567890abcdef` -> `0x1234...cdef`. Short strings pass through.
pub fn mask_address(address: &str) -> String {
    if address.len() < 10
        || !address.is_char_boundary(6)
        || !address.is_char_boundary(address.len() - 4)
    {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"code=([A-Z_]+)").expect("static regex"));
static REASON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"reason="([^"]+)""#).expect("static regex"));
static NOISE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"transaction=\{[^}]+\}|requestBody=\{[^}]+\}|\s*\[\s*See:[^\]]+\]\s*")
        .expect("static regex")
});

/// Reduces a verbose node/library error to a short code or reason.
pub fn clean_error_message(message: &str) -> String {
    if let Some(reason) = REASON_RE.captures(message).and_then(|c| c.get(1)) {
        return reason.as_str().to_string();
    }
    if let Some(code) = CODE_RE.captures(message).and_then(|c| c.get(1)) {
        return code.as_str().to_string();
    }
    NOISE_RE.replace_all(message, " ").trim().to_string()
}

// --- Formatters ---

#[derive(Default)]
struct EventVisitor {
    message: String,
    wallet: Option<String>,
}

impl tracing::field::Visit for EventVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            "wallet" => self.wallet = Some(format!("{:?}", value).trim_matches('"').to_string()),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "wallet" => self.wallet = Some(value.to_string()),
            _ => {}
        }
    }
}

fn visit(event: &Event<'_>) -> EventVisitor {
    let mut visitor = EventVisitor::default();
    event.record(&mut visitor);
    visitor
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
        let visitor = visit(event);
        let msg = visitor.message;

        let colored_msg = if msg.contains("SUCCESS") {
            let green_text = Style::new().fg(Color::LightGreen).bold();
            msg.replace("SUCCESS", &format!("{}", green_text.paint("SUCCESS")))
        } else if msg.contains("FAILED") {
            let red_text = Style::new().fg(Color::LightRed).bold();
            msg.replace("FAILED", &format!("{}", red_text.paint("FAILED")))
        } else {
            msg
        };

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let dim = Style::new().fg(Color::DarkGray);
        write!(writer, "{} ", dim.paint(format!("[{}]", timestamp)))?;
        if let Some(wallet) = visitor.wallet {
            write!(writer, "{} ", Color::LightBlue.paint(format!("[{}]", wallet)))?;
        }

        let level = *event.metadata().level();
        if level == tracing::Level::ERROR {
            write!(writer, "{} ", Color::Red.paint("ERROR:"))?;
        } else if level == tracing::Level::WARN {
            write!(writer, "{} ", Color::Yellow.paint("WARN:"))?;
        }

        writeln!(writer, "{}", colored_msg)
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
        let visitor = visit(event);

        write!(writer, "{} [{}] ", timestamp, level)?;
        if let Some(wallet) = visitor.wallet {
            write!(writer, "[{}] ", wallet)?;
        }
        writeln!(writer, "{}", visitor.message)
    }
}
