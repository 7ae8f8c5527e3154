use crate::terminal::colors;
use colored::*;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::registry::LookupSpan;

const MESSAGE_FIELD: &str = "message";

/// Message first, then structured fields as `name=value`. MACs keep the
/// colour they have in record listings.
#[derive(Default)]
struct EventFields {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl EventFields {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == MESSAGE_FIELD {
            self.message = value;
        } else {
            self.fields.push((field.name(), value));
        }
    }

    fn render(&self) -> String {
        let mut line: String = self.message.clone();
        for (name, value) in &self.fields {
            let value: ColoredString = match *name {
                "mac" => value.color(colors::MAC_ADDR),
                _ => value.normal(),
            };
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&format!("{}={}", name.dimmed(), value));
        }
        line
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

pub struct HostdbFormatter;

impl<S, N> FormatEvent<S, N> for HostdbFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match *event.metadata().level() {
            Level::TRACE => ("[ ]", |s| s.dimmed()),
            Level::DEBUG => ("[?]", |s| s.blue()),
            Level::INFO => ("[+]", |s| s.green().bold()),
            Level::WARN => ("[*]", |s| s.yellow().bold()),
            Level::ERROR => ("[-]", |s| s.red().bold()),
        };

        let mut fields = EventFields::default();
        event.record(&mut fields);

        writeln!(writer, "{} {}", color_func(symbol.into()), fields.render())
    }
}

fn default_directive(quiet: u8) -> &'static str {
    match quiet {
        0 => "info",
        _ => "warn",
    }
}

/// Installs the global subscriber. Logs go to stderr so that command output
/// on stdout stays machine readable. `RUST_LOG` overrides the level.
pub fn init_logging(quiet: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(quiet)));

    tracing_subscriber::fmt()
        .event_format(HostdbFormatter)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
