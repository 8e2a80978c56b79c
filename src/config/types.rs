use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub effects: EffectsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// How commands returned by a single reducer invocation are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EffectOrdering {
    /// One task per command; completions race each other.
    #[default]
    Concurrent,
    /// One task per invocation, commands awaited in declaration order.
    Sequential,
}

/// What happens to an effect that errors, panics or is cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log at error level, then drop.
    #[default]
    Log,
    /// Drop without logging. A failure report channel still receives it.
    Silent,
}

/// Effect runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectsConfig {
    #[serde(default)]
    pub ordering: EffectOrdering,
    #[serde(default)]
    pub on_failure: FailurePolicy,
    /// Warn when a named command has no registered effect (default: true).
    #[serde(default = "default_true")]
    pub warn_on_unknown_effect: bool,
}

/// Tracing subscriber settings. `RUST_LOG` takes precedence over `filter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive (default: "info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Colored output (default: true).
    #[serde(default = "default_true")]
    pub ansi: bool,
}

/// Timings for the bundled recipes demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Delay before the first batch of recipes arrives (default: 1500).
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,
    /// Delay before the follow-up batch arrives (default: 3000).
    #[serde(default = "default_more_delay_ms")]
    pub more_delay_ms: u64,
    /// Number of follow-up recipes to request (default: 3).
    #[serde(default = "default_more_count")]
    pub more_count: usize,
}

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_fetch_delay_ms() -> u64 {
    1500
}

fn default_more_delay_ms() -> u64 {
    3000
}

fn default_more_count() -> usize {
    3
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            ordering: EffectOrdering::default(),
            on_failure: FailurePolicy::default(),
            warn_on_unknown_effect: default_true(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            ansi: default_true(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: default_fetch_delay_ms(),
            more_delay_ms: default_more_delay_ms(),
            more_count: default_more_count(),
        }
    }
}
