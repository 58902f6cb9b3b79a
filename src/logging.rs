use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialise logging. Besides stderr, log lines go to a daily rolling
/// file under `logs/` so unparseable analysis responses stay inspectable
/// after the fact. The returned guard must be kept alive for the lifetime
/// of the process or buffered lines are lost.
///
/// The default level is `info`; `debug` can be enabled via the settings
/// file, in which case `RUST_LOG` may override the filter further.
pub fn init(debug: bool) -> WorkerGuard {
    let level = if debug { "debug" } else { "info" };
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let file_appender = tracing_appender::rolling::daily("logs", "dash_forge.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init();

    guard
}
