//! Process-wide observability bootstrap: tracing, optional Sentry, and an
//! optional StatsD metrics recorder.

use metrics_exporter_statsd::StatsdBuilder;
use shared::env;
use tracing_subscriber::EnvFilter;

/// Keeps the Sentry client alive for the process lifetime.
pub struct Telemetry {
    _sentry: Option<sentry::ClientInitGuard>,
}

pub fn init() -> Telemetry {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let sentry = env::optional("SENTRY_DSN").map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    if let (Some(host), Some(port)) = (env::optional("STATSD_HOST"), env::optional("STATSD_PORT"))
    {
        install_statsd_recorder(&host, &port);
    }

    Telemetry { _sentry: sentry }
}

fn install_statsd_recorder(host: &str, port: &str) {
    let Ok(port) = port.parse::<u16>() else {
        tracing::warn!(%port, "STATSD_PORT is not a port number, metrics disabled");
        return;
    };

    match StatsdBuilder::from(host, port).build(Some("feedrelay")) {
        Ok(recorder) => {
            if metrics::set_global_recorder(recorder).is_err() {
                tracing::warn!("a metrics recorder was already installed");
            }
        }
        Err(err) => tracing::warn!("could not build statsd recorder: {err}"),
    }
}
