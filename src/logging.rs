use std::{
    fmt::{self, Debug, Formatter},
    fs,
    path::Path,
};

use miette::{miette, Context, IntoDiagnostic, Result};
use tracing::{dispatcher::DefaultGuard, Dispatch};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::layer,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};


/// Logging handle injected into a [`Configurator`][crate::Configurator].
///
/// The configurator installs the wrapped dispatcher as the thread-local default
/// for the duration of each of its public calls, so its log output goes where
/// its owner decided regardless of the global subscriber.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Logs to standard error; `debug` lowers the level from `warn` to `debug`.
    pub fn console(debug: bool) -> Self {
        let level_filter = if debug { "debug" } else { "warn" };

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(level_filter))
            .with_writer(std::io::stderr)
            .with_target(false)
            .finish();

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// Uses whatever subscriber is the default at the time of the call.
    pub fn inherit() -> Self {
        Self {
            dispatch: tracing::dispatcher::get_default(Dispatch::clone),
        }
    }

    /// Discards everything.
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// Makes this logger the default until the guard is dropped.
    #[must_use = "logging reverts as soon as the guard is dropped"]
    pub(crate) fn enter(&self) -> DefaultGuard {
        tracing::dispatcher::set_default(&self.dispatch)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::inherit()
    }
}

impl Debug for Logger {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}


/// Installs the process-wide subscriber: console output on standard error and,
/// if `log_file_output_directory` is set, a non-blocking log file in that directory.
///
/// Keep the returned guard alive until exit, otherwise buffered file output is lost.
pub fn initialize_tracing(
    console_level_filter: EnvFilter,
    log_file_level_filter: EnvFilter,
    log_file_output_directory: Option<&Path>,
    log_file_name: &str,
) -> Result<Option<WorkerGuard>> {
    let console_layer = layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_level_filter);

    let Some(log_file_output_directory) = log_file_output_directory else {
        tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .into_diagnostic()
            .wrap_err("Failed to install tracing subscriber.")?;

        return Ok(None);
    };


    fs::create_dir_all(log_file_output_directory)
        .into_diagnostic()
        .wrap_err_with(|| {
            miette!(
                "Failed to create log file directory at {}.",
                log_file_output_directory.display()
            )
        })?;

    let file_appender = tracing_appender::rolling::never(log_file_output_directory, log_file_name);
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = layer()
        .with_ansi(false)
        .with_writer(non_blocking_appender)
        .with_filter(log_file_level_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("Failed to install tracing subscriber.")?;

    Ok(Some(guard))
}


#[cfg(test)]
mod tests {
    use tracing::{debug, enabled, Level};

    use super::*;

    #[test]
    fn entering_a_logger_scopes_the_default_dispatcher() {
        {
            let _guard = Logger::console(true).enter();
            debug!("Visible on standard error while the guard lives.");
            assert!(enabled!(Level::DEBUG));
        }

        let _guard = Logger::disabled().enter();
        assert!(!enabled!(Level::ERROR));
    }
}
