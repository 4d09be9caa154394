use serde::{Deserialize, Serialize};

const MAX_PARALLELISM: usize = 1024;

/// Configuration for a rename pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// Scheduling strategy
    pub strategy: Strategy,

    /// Maximum context excerpt length (in characters) handed to the oracle
    pub context_window: usize,

    /// Upper bound on the number of occurrences in one batch
    pub max_batch: usize,

    /// Degree of parallelism used to size batches (defaults to host cores)
    pub parallelism: usize,

    /// Prefix prepended to invalid or colliding names
    pub escape_prefix: String,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Sequential,
            context_window: 200,
            max_batch: 1000,
            parallelism: host_parallelism(),
            escape_prefix: "_".to_string(),
        }
    }
}

impl RenameConfig {
    /// Sequential pass, one oracle call in flight at a time
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Batched pass with concurrent oracle calls inside each batch
    pub fn batched() -> Self {
        Self {
            strategy: Strategy::Batched,
            ..Default::default()
        }
    }

    /// Default config with overrides taken from `RELABEL_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |key: &str| std::env::var(key).ok();
        Self {
            strategy: parse_strategy(var("RELABEL_STRATEGY").as_deref(), defaults.strategy),
            context_window: parse_size(
                var("RELABEL_CONTEXT_WINDOW").as_deref(),
                defaults.context_window,
                usize::MAX,
            ),
            max_batch: parse_size(
                var("RELABEL_MAX_BATCH").as_deref(),
                defaults.max_batch,
                usize::MAX,
            ),
            parallelism: parse_size(
                var("RELABEL_PARALLELISM").as_deref(),
                defaults.parallelism,
                MAX_PARALLELISM,
            ),
            escape_prefix: defaults.escape_prefix,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.context_window == 0 {
            return Err("context_window must be > 0".to_string());
        }

        if self.max_batch == 0 {
            return Err("max_batch must be > 0".to_string());
        }

        if self.parallelism == 0 {
            return Err("parallelism must be > 0".to_string());
        }

        if self.escape_prefix.is_empty() {
            return Err("escape_prefix must not be empty".to_string());
        }

        Ok(())
    }

    /// Number of occurrences processed per batch for a pass over `total` occurrences
    pub fn batch_size(&self, total: usize) -> usize {
        match self.strategy {
            Strategy::Sequential => 1,
            Strategy::Batched => total
                .div_ceil(self.parallelism.max(1))
                .min(self.max_batch)
                .max(1),
        }
    }
}

/// How occurrences are driven through the oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Strictly one occurrence at a time, in collection order
    Sequential,

    /// Contiguous batches; oracle calls inside a batch run concurrently
    Batched,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Sequential
    }
}

fn host_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn parse_size(raw: Option<&str>, default_value: usize, max: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, max)
}

fn parse_strategy(raw: Option<&str>, default_value: Strategy) -> Strategy {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("sequential") => Strategy::Sequential,
        Some("batched" | "parallel") => Strategy::Batched,
        _ => default_value,
    }
}
