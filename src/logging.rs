// Log formatting for the tracing subscriber

use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// `<emoji> LEVEL [HH:MM:SS] (thread): message`
///
/// The thread is printed because callbacks from different host workers end
/// up in the same log.
pub struct CustomFormatter;

fn level_prefix(level: &tracing::Level) -> (&'static str, &'static str) {
    match *level {
        tracing::Level::TRACE => ("🔬", "TRACE"),
        tracing::Level::DEBUG => ("🐛", "DEBUG"),
        tracing::Level::INFO => ("ℹ️ ", "INFO"),
        tracing::Level::WARN => ("⚠️ ", "WARN"),
        tracing::Level::ERROR => ("❌", "ERROR"),
    }
}

impl<S, N> FormatEvent<S, N> for CustomFormatter
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
        let (emoji, level) = level_prefix(event.metadata().level());
        let timestamp = Local::now().format("%H:%M:%S");
        let thread = std::thread::current();

        write!(writer, "{} {} [{}]", emoji, level, timestamp)?;
        match thread.name() {
            Some(name) => write!(writer, " ({})", name)?,
            None => write!(writer, " ({:?})", thread.id())?,
        }
        write!(writer, ": ")?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}
