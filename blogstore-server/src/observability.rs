//! Logging and error reporting setup.

use std::env;
use std::io::IsTerminal;

use secrecy::ExposeSecret;
use sentry::integrations::tracing as sentry_tracing;
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, Registry, prelude::*};

use crate::config::{Config, LogFormat};

/// Initializes the Sentry client if a DSN is configured.
///
/// The returned guard flushes pending events when dropped, so it must be held until shutdown.
pub fn init_sentry(config: &Config) -> Option<sentry::ClientInitGuard> {
    let sentry_config = &config.sentry;
    let dsn = sentry_config.dsn.as_ref()?;

    let guard = sentry::init(sentry::ClientOptions {
        dsn: dsn.expose_secret().as_str().parse().ok(),
        release: sentry::release_name!(),
        environment: sentry_config.environment.clone(),
        server_name: sentry_config.server_name.clone(),
        sample_rate: sentry_config.sample_rate,
        traces_sample_rate: sentry_config.traces_sample_rate,
        enable_logs: true,
        ..Default::default()
    });

    sentry::configure_scope(|scope| {
        for (key, value) in &sentry_config.tags {
            scope.set_tag(key, value);
        }
    });

    Some(guard)
}

/// Installs the global tracing subscriber.
///
/// Logs go to stderr in the configured [`LogFormat`]. When Sentry is enabled, warnings and errors
/// are additionally reported as events.
pub fn init_tracing(config: &Config) {
    // Same as the default filter, except it converts warnings into events
    // and also sends everything at or above INFO as logs instead of breadcrumbs.
    let sentry_layer = config.sentry.is_enabled().then(|| {
        sentry_tracing::layer().event_filter(|metadata| match *metadata.level() {
            Level::ERROR | Level::WARN => {
                sentry_tracing::EventFilter::Event | sentry_tracing::EventFilter::Log
            }
            Level::INFO => sentry_tracing::EventFilter::Log,
            Level::DEBUG | Level::TRACE => sentry_tracing::EventFilter::Ignore,
        })
    });

    let format = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let format: Box<dyn Layer<Registry> + Send + Sync> = match config.logging.format {
        LogFormat::Auto if std::io::stderr().is_terminal() => format.pretty().boxed(),
        LogFormat::Pretty => format.pretty().boxed(),
        LogFormat::Auto | LogFormat::Simplified => format.with_ansi(false).boxed(),
        LogFormat::Json => format
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .boxed(),
    };

    let (level, env_filter) = parse_rust_log(config.logging.level);

    tracing_subscriber::registry()
        .with(format.with_filter(level))
        .with(sentry_layer)
        .with(env_filter)
        .init();
}

/// Determines the effective log level and filter directives.
///
/// `RUST_LOG` takes precedence over the configured level. If it holds a plain level, internal
/// crates log at that level. Otherwise it is used literally as filter directives.
fn parse_rust_log(configured: LevelFilter) -> (LevelFilter, EnvFilter) {
    let level = match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) => match value.parse::<LevelFilter>() {
            Ok(level) => level,
            Err(_) => return (LevelFilter::TRACE, EnvFilter::new(value)),
        },
        Err(_) => configured,
    };

    // This is the maximum verbosity that will be logged, we filter this down to `level`.
    let env_filter = EnvFilter::new(
        "INFO,\
        tower_http=TRACE,\
        blogstore=TRACE,\
        blogstore_server=TRACE,\
        blogstore_service=TRACE,\
        blogstore_types=TRACE,\
        ",
    );

    (level, env_filter)
}
