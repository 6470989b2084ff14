use std::io::{self, IsTerminal};

use anyhow::Result;
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// One line per event: local time, level, target, then the event fields.
///
/// Only warnings and errors are colored; everything else a CLI user sees on
/// stderr stays plain.
struct CliFmt;

impl<S, N> FormatEvent<S, N> for CliFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let level = *meta.level();
        let ansi = writer.has_ansi_escapes();

        write!(writer, "{} ", Local::now().format("%H:%M:%S%.3f"))?;
        match level_color(level).filter(|_| ansi) {
            Some(color) => write!(writer, "\x1b[{color}m{level:>5}\x1b[0m ")?,
            None => write!(writer, "{level:>5} ")?,
        }
        write!(writer, "{}: ", meta.target())?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// ANSI color for levels worth drawing attention to.
fn level_color(level: Level) -> Option<&'static str> {
    match level {
        Level::ERROR => Some("1;31"),
        Level::WARN => Some("1;33"),
        _ => None,
    }
}

/// Builds the filter for `level`. `RUST_LOG`, when set, takes precedence.
///
/// Accepts a bare level ("error", "warn", "info", "debug", "trace") or any
/// full `EnvFilter` directive.
pub fn make_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| anyhow::anyhow!("invalid log level '{level}': {e}"))
}

/// Installs the global subscriber, writing to stderr so results on stdout
/// stay clean. Call once at startup; later calls are ignored.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = make_filter(level)?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(CliFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();

    Ok(())
}
