use owo_colors::{OwoColorize, Stream};
use tracing::{Level, Subscriber};
use tracing_subscriber::{
    fmt::{self, format, FormatEvent, FormatFields},
    registry::LookupSpan,
};

/// Formats events as `swmi: <level>: <message>`, without timestamps or
/// targets.
pub struct Formatter(());

impl Formatter {
    pub fn new() -> Formatter {
        Formatter(())
    }
}

impl Default for Formatter {
    fn default() -> Formatter {
        Formatter::new()
    }
}

impl<S, N> FormatEvent<S, N> for Formatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        write!(writer, "swmi: ")?;

        let level = *event.metadata().level();
        let label = match level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        match level {
            Level::ERROR => write!(
                writer,
                "{}: ",
                label.if_supports_color(Stream::Stderr, |l| l.red())
            )?,
            Level::WARN => write!(
                writer,
                "{}: ",
                label.if_supports_color(Stream::Stderr, |l| l.yellow())
            )?,
            _ => write!(writer, "{}: ", label)?,
        }

        ctx.format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}
