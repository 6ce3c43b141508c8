//!
//! Setup logging subsystem.
//!

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

use super::config::{self, Level};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber described by `conf`.
///
/// The returned guards flush the non-blocking writers when dropped, so keep
/// them alive for as long as the process logs. Installing a second
/// subscriber is reported and otherwise ignored.
pub fn setup(conf: &config::Log) -> Vec<WorkerGuard> {
    let mut guards = Vec::new();
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if conf.console.enabled {
        let (console_writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);
        let filter = build_filter(
            conf.console.level,
            conf.console.filtering_directive.as_deref(),
        );

        let layer = match conf.console.log_format {
            config::LogFormat::Default => fmt::layer()
                .with_span_events(fmt::format::FmtSpan::CLOSE)
                .pretty()
                .with_writer(console_writer)
                .with_filter(filter)
                .boxed(),
            config::LogFormat::Json => fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(console_writer)
                .with_filter(filter)
                .boxed(),
        };
        layers.push(layer);
    }

    if conf.file.enabled {
        let file_appender = tracing_appender::rolling::daily(&conf.file.path, &conf.file.file_name);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        guards.push(guard);
        let filter = build_filter(conf.file.level, conf.file.filtering_directive.as_deref());
        layers.push(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(filter)
                .boxed(),
        );
    }

    if let Err(error) = tracing_subscriber::registry().with(layers).try_init() {
        tracing::warn!(%error, "global subscriber already installed");
    }

    // Returning the WorkerGuard for logs to be printed until it is dropped
    guards
}

/// `RUST_LOG` wins over the configured level and directive.
fn build_filter(level: Level, directive: Option<&str>) -> EnvFilter {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level.into_level()).into());
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(from_env) if !from_env.is_empty() => filter.parse_lossy(from_env),
        _ => filter.parse_lossy(directive.unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_outputs_need_no_guards() {
        let conf = config::Log {
            console: config::LogConsole {
                enabled: false,
                ..Default::default()
            },
            file: config::LogFile::default(),
        };
        assert!(setup(&conf).is_empty());
    }

    #[test]
    fn filter_keeps_configured_directives() {
        let filter = build_filter(Level(tracing::Level::WARN), Some("connector_integration=debug"));
        let rendered = filter.to_string();
        if std::env::var(EnvFilter::DEFAULT_ENV).is_err() {
            assert!(rendered.contains("connector_integration=debug"));
        }
    }
}
