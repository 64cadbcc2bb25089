use std::fmt::{self as stdfmt, Write as _};
use std::path::Path;

use anyhow::Result;
use autofmt_config::{LogFormat, LoggingConfig, Rotation};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::DefaultFields;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormattedFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

// ---------------------------------------------------------------------------
// FileFields - newtype to isolate span field caching between layers
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FileFields(DefaultFields);

impl<'writer> fmt::FormatFields<'writer> for FileFields {
    fn format_fields<R: tracing_subscriber::field::RecordFields>(
        &self,
        writer: fmt::format::Writer<'writer>,
        fields: R,
    ) -> stdfmt::Result {
        self.0.format_fields(writer, fields)
    }
}

// ---------------------------------------------------------------------------
// CallSiteFormat - `[file:line][thread]` prefix
// ---------------------------------------------------------------------------

/// Plain-text formatter that puts the call site and thread in front of the
/// message.
///
/// ```text
/// 2026-10-16T08:01:02.345Z  INFO [src/main.rs:42][main]: 21.50 3 sensor=kitchen
/// ```
///
/// The message is the rendered template; any extra event fields follow it as
/// `key=value` pairs.
struct CallSiteFormat {
    timer: SystemTime,
}

impl CallSiteFormat {
    fn new() -> Self {
        Self { timer: SystemTime }
    }
}

impl<S, N> FormatEvent<S, N> for CallSiteFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> fmt::FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: fmt::format::Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        let ansi = writer.has_ansi_escapes();
        let meta = event.metadata();

        // 1. Timestamp
        if ansi {
            write!(writer, "\x1b[2m")?;
        }
        if self.timer.format_time(&mut writer).is_err() {
            write!(writer, "<unknown time>")?;
        }
        if ansi {
            write!(writer, "\x1b[0m")?;
        }

        // 2. Level
        let level = *meta.level();
        if ansi {
            let color = match level {
                Level::ERROR => "31",
                Level::WARN => "33",
                Level::INFO => "32",
                Level::DEBUG => "34",
                Level::TRACE => "35",
            };
            write!(writer, " \x1b[{color}m{level:>5}\x1b[0m ")?;
        } else {
            write!(writer, " {level:>5} ")?;
        }

        // 3. [file:line][thread]
        let file = meta.file().unwrap_or("<unknown>");
        match meta.line() {
            Some(line) => write!(writer, "[{file}:{line}]")?,
            None => write!(writer, "[{file}]")?,
        }
        let thread = std::thread::current();
        match thread.name() {
            Some(name) => write!(writer, "[{name}]: ")?,
            None => write!(writer, "[{:?}]: ", thread.id())?,
        }

        // 4. Span context
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}{{", span.name())?;
                let ext = span.extensions();
                if let Some(fields) = ext.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{fields}")?;
                    }
                }
                write!(writer, "}}: ")?;
            }
        }

        // 5. Message and remaining fields
        let mut visitor = MessageExtractor::default();
        event.record(&mut visitor);
        write!(writer, "{}", visitor.message)?;
        if !visitor.other_fields.is_empty() {
            if ansi {
                write!(writer, " \x1b[3m{}\x1b[0m", visitor.other_fields)?;
            } else {
                write!(writer, " {}", visitor.other_fields)?;
            }
        }

        writeln!(writer)
    }
}

// ---------------------------------------------------------------------------
// MessageExtractor - separates the message from other fields
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MessageExtractor {
    message: String,
    other_fields: String,
}

impl MessageExtractor {
    fn push_separator(&mut self) {
        if !self.other_fields.is_empty() {
            self.other_fields.push(' ');
        }
    }
}

impl Visit for MessageExtractor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_separator();
            write!(&mut self.other_fields, "{}={value:?}", field.name()).ok();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn stdfmt::Debug) {
        if field.name() == "message" {
            write!(&mut self.message, "{value:?}").ok();
        } else {
            self.push_separator();
            write!(&mut self.other_fields, "{}={value:?}", field.name()).ok();
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Initialise the `tracing` subscriber stack from [`LoggingConfig`].
///
/// Returns an optional [`WorkerGuard`] that must be held until the process
/// exits; dropping it flushes and closes the non-blocking file writer.
///
/// `RUST_LOG` overrides all config-driven directives. Fails if a global
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig, base_dir: &Path) -> Result<Option<WorkerGuard>> {
    // 1. Build EnvFilter ------------------------------------------------
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let directives = config.directives();
        EnvFilter::try_new(&directives)
            .map_err(|e| anyhow::anyhow!("invalid log filter '{directives}': {e}"))?
    };

    // 2. Optional file writer -------------------------------------------
    let (file_writer, guard) = match config.file {
        Some(ref file_path) => {
            let appender = file_appender(file_path, config.rotation, config.max_files, base_dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (Some(non_blocking), Some(guard))
        }
        None => (None, None),
    };

    // 3. stderr + file layers -------------------------------------------
    if config.format == LogFormat::Json {
        let stderr_layer = fmt::layer()
            .json()
            .with_target(false)
            .with_writer(std::io::stderr);
        let file_layer = file_writer.map(|writer: NonBlocking| {
            fmt::layer()
                .json()
                .fmt_fields(FileFields::default())
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
        });
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(file_layer)
            .try_init()?;
    } else {
        let stderr_layer = fmt::layer()
            .event_format(CallSiteFormat::new())
            .with_writer(std::io::stderr);
        let file_layer = file_writer.map(|writer: NonBlocking| {
            fmt::layer()
                .event_format(CallSiteFormat::new())
                .fmt_fields(FileFields::default())
                .with_ansi(false)
                .with_writer(writer)
        });
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(file_layer)
            .try_init()?;
    }

    tracing::debug!(
        directives = %config.directives(),
        file = ?config.file,
        rotation = ?config.rotation,
        max_files = ?config.max_files,
        "tracing initialised"
    );
    Ok(guard)
}

/// Rolling appender for `file_path`; relative paths resolve against
/// `base_dir`. With `max_files` set, rollover prunes the oldest files beyond
/// that count.
fn file_appender(
    file_path: &Path,
    rotation: Rotation,
    max_files: Option<usize>,
    base_dir: &Path,
) -> Result<RollingFileAppender> {
    let resolved = if file_path.is_relative() {
        base_dir.join(file_path)
    } else {
        file_path.to_path_buf()
    };
    let file_name = resolved
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("log file path has no UTF-8 file name"))?
        .to_string();
    let dir = resolved
        .parent()
        .ok_or_else(|| anyhow::anyhow!("log file path has no parent directory"))?;
    std::fs::create_dir_all(dir)?;

    let mut builder = RollingFileAppender::builder()
        .rotation(match rotation {
            Rotation::Never => rolling::Rotation::NEVER,
            Rotation::Hourly => rolling::Rotation::HOURLY,
            Rotation::Daily => rolling::Rotation::DAILY,
        })
        .filename_prefix(file_name);
    if let Some(n) = max_files {
        builder = builder.max_log_files(n);
    }
    builder
        .build(dir)
        .map_err(|e| anyhow::anyhow!("failed to open log file {}: {e}", resolved.display()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
