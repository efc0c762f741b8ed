use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global tracing subscriber.
///
/// Filter comes from `RUST_LOG` (default `info`). When `log_dir` is given,
/// output also goes to a daily-rolling `rustcost.log` file there; keep the
/// returned guard alive to flush it.
pub fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "rustcost.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init();

            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .try_init();

            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_logging_returns_a_guard() {
        let dir = tempfile::tempdir().unwrap();
        let guard = init_tracing(Some(dir.path()));
        assert!(guard.is_some());

        tracing::info!("logging initialised");
        assert!(init_tracing(None).is_none());
    }
}
