//! Tracing setup for debugging traversals.
//!
//! Everything interesting in estrav logs under the `estrav_traverse` target:
//! path creation and binding registration at `trace`, mutations and scope
//! crawls at `debug` (each crawl opens a `crawl` span), redeclarations at
//! `warn`.
//!
//! ```bash
//! # Crawls and mutations, nested crawls indented under their trigger
//! ESTRAV_LOG=debug ESTRAV_LOG_FORMAT=tree cargo test -p estrav-traverse
//!
//! # Everything, as JSON lines
//! ESTRAV_LOG="estrav_traverse=trace" ESTRAV_LOG_FORMAT=json cargo test
//! ```
//!
//! Nothing is installed unless `ESTRAV_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Output format, from `ESTRAV_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Flat `fmt` lines.
    #[default]
    Text,
    /// `tracing-tree` output; crawl spans nest.
    Tree,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Unknown names fall back to [`LogFormat::Text`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Subscriber settings resolved from the environment or built by hand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TracingConfig {
    /// `EnvFilter` directives; `None` disables tracing.
    pub directives: Option<String>,
    pub format: LogFormat,
}

impl TracingConfig {
    /// Resolve from `ESTRAV_LOG` (preferred), `RUST_LOG` and
    /// `ESTRAV_LOG_FORMAT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        TracingConfig {
            directives: lookup("ESTRAV_LOG").or_else(|| lookup("RUST_LOG")),
            format: lookup("ESTRAV_LOG_FORMAT")
                .map(|name| LogFormat::parse(&name))
                .unwrap_or_default(),
        }
    }

    /// Trace one crate of the workspace at `level`, e.g.
    /// `TracingConfig::for_target("estrav_traverse", "trace")`.
    pub fn for_target(target: &str, level: &str) -> Self {
        TracingConfig {
            directives: Some(format!("{target}={level}")),
            format: LogFormat::default(),
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Install as the global subscriber, writing to stderr. Returns whether
    /// this call installed it: `false` when disabled or when a subscriber is
    /// already set (several tests in one binary).
    pub fn install(&self) -> bool {
        let Some(directives) = self.directives.as_deref() else {
            return false;
        };
        let filter = EnvFilter::builder().parse_lossy(directives);
        let installed = match self.format {
            LogFormat::Tree => {
                let layer = tracing_tree::HierarchicalLayer::default()
                    .with_writer(std::io::stderr)
                    .with_indent_amount(2)
                    .with_indent_lines(true)
                    .with_deferred_spans(true)
                    .with_targets(true);
                Registry::default().with(filter).with(layer).try_init()
            }
            LogFormat::Json => {
                let layer = fmt::layer().json().with_writer(std::io::stderr);
                Registry::default().with(filter).with(layer).try_init()
            }
            LogFormat::Text => {
                let layer = fmt::layer().with_writer(std::io::stderr);
                Registry::default().with(filter).with(layer).try_init()
            }
        }
        .is_ok();
        if installed {
            tracing::debug!(format = ?self.format, directives, "tracing initialised");
        }
        installed
    }
}

/// Install a subscriber configured from the environment, if requested.
pub fn init_tracing() {
    TracingConfig::from_env().install();
}
