use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FanoutError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub scheduler: SchedulerConfig,
    pub log: LogConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `FANOUT_PROFILE` env var. When set (e.g. `BENCH`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("FANOUT_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            scheduler: SchedulerConfig::from_env_profiled(p),
            log: LogConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  scheduler:   max_concurrency={}, result_buffer={}, thread_prefix={}",
            self.scheduler.max_concurrency,
            self.scheduler.result_buffer,
            self.scheduler.thread_name_prefix
        );
        tracing::info!("  log:         filter={}", self.log.filter);
    }

    /// Return a JSON view for reports.
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "scheduler": {
                "max_concurrency": self.scheduler.max_concurrency,
                "bounded": self.scheduler.is_bounded(),
                "result_buffer": self.scheduler.result_buffer,
                "thread_name_prefix": self.scheduler.thread_name_prefix,
            },
            "log": { "filter": self.log.filter },
        })
    }
}

// ── Scheduler ─────────────────────────────────────────────────

/// Scheduler tuning, read from env or parsed from TOML.
///
/// None of these values affect correctness: every registered task reports
/// exactly once whatever the buffer size or concurrency cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum number of tasks running at once. 0 = one thread per task.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Minimum result channel capacity. The effective capacity is never
    /// smaller than the number of registered tasks.
    #[serde(default = "default_result_buffer")]
    pub result_buffer: usize,
    /// Prefix for worker thread names (`{prefix}-{index}`).
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
}

fn default_max_concurrency() -> usize { 0 }
fn default_result_buffer() -> usize { 100 }
fn default_thread_name_prefix() -> String { "fanout-task".to_string() }

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            result_buffer: default_result_buffer(),
            thread_name_prefix: default_thread_name_prefix(),
        }
    }
}

impl SchedulerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            max_concurrency: profiled_env_usize(p, "FANOUT_MAX_CONCURRENCY", default_max_concurrency()),
            result_buffer: profiled_env_usize(p, "FANOUT_RESULT_BUFFER", default_result_buffer()),
            thread_name_prefix: profiled_env_or(p, "FANOUT_THREAD_PREFIX", "fanout-task"),
        }
    }

    /// Parse from a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, FanoutError> {
        toml::from_str(content).map_err(|e| FanoutError::Config(e.to_string()))
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, FanoutError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| FanoutError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Whether a concurrency cap is configured.
    pub fn is_bounded(&self) -> bool {
        self.max_concurrency > 0
    }

    /// Channel capacity for a batch of `task_count` tasks.
    pub fn resolved_result_buffer(&self, task_count: usize) -> usize {
        self.result_buffer.max(task_count).max(1)
    }

    /// Name for the worker thread running the task at `index`.
    pub fn thread_name(&self, index: usize) -> String {
        format!("{}-{}", self.thread_name_prefix, index)
    }
}

// ── Logging ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl LogConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            filter: profiled_env_or(p, "FANOUT_LOG", "info"),
        }
    }
}
