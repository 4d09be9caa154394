use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// External naming function consulted once per distinct original name.
///
/// Implementations may be slow and need not be deterministic; the engine
/// never retries and never asks twice for a committed name.
#[async_trait]
pub trait NameOracle: Send + Sync {
    /// Propose a new name for `name`, given a source excerpt around its declaration
    async fn propose(&self, name: &str, context: &str) -> anyhow::Result<String>;
}

/// Oracle backed by an async closure
pub struct FnOracle<F> {
    func: F,
}

#[async_trait]
impl<F, Fut> NameOracle for FnOracle<F>
where
    F: Fn(String, String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<String>> + Send,
{
    async fn propose(&self, name: &str, context: &str) -> anyhow::Result<String> {
        (self.func)(name.to_string(), context.to_string()).await
    }
}

/// Wrap an async closure `(name, context) -> Result<String>` as a shared oracle
pub fn oracle_fn<F, Fut>(func: F) -> Arc<dyn NameOracle>
where
    F: Fn(String, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
{
    Arc::new(FnOracle { func })
}

/// Oracle answering from a fixed table; unknown names are proposed unchanged
#[derive(Debug, Clone, Default)]
pub struct MappingOracle {
    names: HashMap<String, String>,
}

impl MappingOracle {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl NameOracle for MappingOracle {
    async fn propose(&self, name: &str, _context: &str) -> anyhow::Result<String> {
        Ok(self
            .names
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string()))
    }
}
