//! Tracing subscriber for the plugin
//!
//! Plain-text lines (no ANSI, no targets) so the host console and the log
//! file read the same. `RUST_LOG` overrides the default `info` level; this
//! crate always logs at `debug`.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use super::config::LoggingSettings;

const CRATE_DIRECTIVE: &str = "chat_bubble=debug";

// Dropping a guard stops its writer thread
static WRITER_GUARDS: OnceLock<Vec<WorkerGuard>> = OnceLock::new();

/// Install the subscriber described by `[logging]`, writing to `log_file` if given.
///
/// Only the first successful call in a process installs anything; a plugin
/// restart keeps the original subscriber.
pub fn init(settings: &LoggingSettings, log_file: Option<PathBuf>) {
    let mut guards = Vec::new();

    let file_layer = log_file
        .as_deref()
        .and_then(file_writer)
        .map(|(writer, guard)| {
            guards.push(guard);
            plain_layer(writer)
        });

    let console_layer = settings.console.then(|| {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);
        plain_layer(writer)
    });

    let installed = tracing_subscriber::registry()
        .with(filter())
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .is_ok();

    if installed {
        let _ = WRITER_GUARDS.set(guards);
    }
}

fn filter() -> EnvFilter {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    match CRATE_DIRECTIVE.parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Non-blocking appender for `path`; `None` when the path has no usable file name
fn file_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path.file_name()?.to_str()?;
    Some(tracing_appender::non_blocking(
        tracing_appender::rolling::never(dir, file_name),
    ))
}

fn plain_layer<S, W>(writer: W) -> fmt::Layer<S, DefaultFields, Format, W>
where
    W: for<'w> MakeWriter<'w> + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
}
