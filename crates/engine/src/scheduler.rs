use crate::collector::collect_occurrences;
use crate::config::RenameConfig;
use crate::context::context_window;
use crate::coordinator::{commit_and_apply, reuse_committed};
use crate::error::{RenameError, Result};
use crate::oracle::NameOracle;
use crate::program::ScopedProgram;
use crate::registry::Registry;
use crate::types::{Occurrence, RenameSummary};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Progress callback receiving the processed fraction in `[0, 1]`
pub type ProgressFn = Box<dyn FnMut(f64) + Send>;

/// Drives every binding occurrence of a program through the oracle.
///
/// Occurrences are processed in contiguous batches; batches never overlap.
/// Inside a batch the first occurrence of each not-yet-committed original
/// name asks the oracle (all such calls run concurrently), and once every
/// call has answered the batch is committed in collection order.
pub struct RenamePass {
    config: RenameConfig,
    oracle: Arc<dyn NameOracle>,
    progress: Option<ProgressFn>,
}

impl RenamePass {
    pub fn new(oracle: Arc<dyn NameOracle>) -> Self {
        Self {
            config: RenameConfig::default(),
            oracle,
            progress: None,
        }
    }

    pub fn with_config(mut self, config: RenameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn on_progress(mut self, progress: impl FnMut(f64) + Send + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn config(&self) -> &RenameConfig {
        &self.config
    }

    /// Rename every binding of `program` in place
    pub async fn run<P: ScopedProgram + ?Sized>(&mut self, program: &mut P) -> Result<RenameSummary> {
        self.config.validate().map_err(RenameError::invalid_config)?;
        if !program.is_valid_identifier(&self.config.escape_prefix) {
            return Err(RenameError::invalid_config(format!(
                "escape_prefix '{}' is not a valid identifier",
                self.config.escape_prefix
            )));
        }

        let occurrences = collect_occurrences(&*program);
        let total = occurrences.len();
        let batch_size = self.config.batch_size(total);
        let mut registry = Registry::new();
        for name in program.pinned_names() {
            registry.pin(name);
        }
        let mut summary = RenameSummary {
            occurrences: total,
            ..Default::default()
        };

        let mut processed = 0;
        for batch in occurrences.chunks(batch_size) {
            match self.run_batch(program, &mut registry, batch).await {
                Ok(calls) => summary.oracle_calls += calls,
                Err(err) => {
                    log::warn!(
                        "Rename pass aborted after {processed}/{total} occurrences ({} names committed): {err}",
                        registry.len()
                    );
                    return Err(err);
                }
            }
            processed += batch.len();
            summary.batches += 1;
            self.report(processed, total);
        }

        summary.mappings = registry.into_mappings();
        log::info!(
            "Renamed {} names across {} occurrences ({} oracle calls, {} batches)",
            summary.mappings.len(),
            summary.occurrences,
            summary.oracle_calls,
            summary.batches
        );
        Ok(summary)
    }

    /// Process one batch, returning the number of oracle calls issued
    async fn run_batch<P: ScopedProgram + ?Sized>(
        &self,
        program: &mut P,
        registry: &mut Registry,
        batch: &[Occurrence],
    ) -> Result<usize> {
        let leaders = leaders(registry, batch);

        let mut calls = JoinSet::new();
        let mut tasks = HashMap::with_capacity(leaders.len());
        for &idx in &leaders {
            let occurrence = &batch[idx];
            let context = context_window(&*program, occurrence, self.config.context_window);
            let oracle = Arc::clone(&self.oracle);
            let name = occurrence.name.clone();
            let handle = calls.spawn(async move { oracle.propose(&name, &context).await });
            tasks.insert(handle.id(), idx);
        }

        let mut proposals = HashMap::with_capacity(leaders.len());
        while let Some(joined) = calls.join_next_with_id().await {
            let (id, answer) = match joined {
                Ok(done) => done,
                Err(err) => {
                    let name = tasks
                        .get(&err.id())
                        .map(|&idx| batch[idx].name.as_str())
                        .unwrap_or("<unknown>");
                    return Err(RenameError::oracle(
                        name,
                        anyhow::anyhow!("oracle task failed: {err}"),
                    ));
                }
            };
            let Some(&idx) = tasks.get(&id) else {
                continue;
            };
            let proposed = answer.map_err(|source| RenameError::oracle(&batch[idx].name, source))?;
            proposals.insert(idx, proposed);
        }

        let prefix = self.config.escape_prefix.as_str();
        for (idx, occurrence) in batch.iter().enumerate() {
            match proposals.remove(&idx) {
                Some(proposed) => {
                    commit_and_apply(program, registry, occurrence, &proposed, prefix);
                }
                None => {
                    if reuse_committed(program, registry, occurrence).is_none() {
                        log::warn!("No committed name for '{}'; left unchanged", occurrence.name);
                    }
                }
            }
        }

        Ok(leaders.len())
    }

    fn report(&mut self, processed: usize, total: usize) {
        log::debug!("Rename progress: {processed}/{total}");
        if let Some(progress) = self.progress.as_mut() {
            progress(processed as f64 / total as f64);
        }
    }
}

/// Indexes of the occurrences in `batch` that must consult the oracle
fn leaders(registry: &Registry, batch: &[Occurrence]) -> Vec<usize> {
    let mut pending = HashSet::new();
    batch
        .iter()
        .enumerate()
        .filter(|(_, occ)| {
            registry.final_name(&occ.name).is_none() && pending.insert(occ.name.as_str())
        })
        .map(|(idx, _)| idx)
        .collect()
}
