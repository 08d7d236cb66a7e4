// Curriculum: one window length per phase, one consumer for all phases
//
// Every phase gets its own window dataset wrapped in the same pipeline
// recipe and registered in a single FeedableIterator. The schedule maps a
// global step to a phase; the consumer switches phases simply by feeding
// that phase's handle.

use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use ladder_core::{Cardinality, Error, Result};
use ladder_data::{Corpus, Dataset, PipelineConfig, WindowDataset};

use crate::config::CurriculumConfig;
use crate::handle::{FeedableIterator, Handle};

fn default_steps() -> usize {
    1
}

/// One stage of the curriculum: a window length and how long to train on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub window_length: usize,
    /// Batches drawn from this phase before moving on.
    #[serde(default = "default_steps")]
    pub steps: usize,
}

impl Phase {
    pub fn new(name: impl Into<String>, window_length: usize, steps: usize) -> Self {
        Self {
            name: name.into(),
            window_length,
            steps,
        }
    }
}

/// Maps global step numbers to phase indices.
///
/// Phase `i` owns the steps `[sum(steps[..i]), sum(steps[..=i]))`. Steps past
/// the end of the plan belong to the last phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSchedule {
    /// Cumulative step counts, one entry per phase.
    ends: Vec<usize>,
}

impl PhaseSchedule {
    /// Step counts whose sum exceeds `usize::MAX` saturate there.
    pub fn from_phases(phases: &[Phase]) -> Self {
        let mut total: usize = 0;
        let ends = phases
            .iter()
            .map(|p| {
                total = total.saturating_add(p.steps);
                total
            })
            .collect();
        Self { ends }
    }

    pub fn total_steps(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    pub fn num_phases(&self) -> usize {
        self.ends.len()
    }

    /// Index of the phase that owns `step`, or `None` with no phases.
    pub fn phase_at(&self, step: usize) -> Option<usize> {
        if self.ends.is_empty() {
            return None;
        }
        let idx = self.ends.partition_point(|&end| end <= step);
        Some(idx.min(self.ends.len() - 1))
    }

    /// Global steps owned by phase `index`.
    pub fn bounds(&self, index: usize) -> Option<Range<usize>> {
        let end = *self.ends.get(index)?;
        let start = if index == 0 { 0 } else { self.ends[index - 1] };
        Some(start..end)
    }
}

/// Totals reported by [`Curriculum::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Batches handed to the callback.
    pub batches: usize,
    /// Scheduled steps skipped because their phase ran out of data.
    pub skipped_steps: usize,
}

/// A set of phase streams fed through one handle-keyed iterator.
pub struct Curriculum {
    corpus: Arc<Corpus>,
    phases: Vec<Phase>,
    handles: Vec<Handle>,
    cardinalities: Vec<Cardinality>,
    feeder: FeedableIterator<Vec<String>>,
    schedule: PhaseSchedule,
}

impl Curriculum {
    /// Build one pipeline per phase over `corpus`.
    ///
    /// With a seed configured, phase `i` shuffles with `seed + i` so phases
    /// do not mirror each other's order.
    pub fn build(
        corpus: Arc<Corpus>,
        phases: Vec<Phase>,
        pipeline: &PipelineConfig,
    ) -> Result<Self> {
        if phases.is_empty() {
            return Err(Error::invalid("a curriculum needs at least one phase"));
        }

        let mut feeder = FeedableIterator::new();
        let mut handles = Vec::with_capacity(phases.len());
        let mut cardinalities = Vec::with_capacity(phases.len());

        for (idx, phase) in phases.iter().enumerate() {
            let windows = WindowDataset::new(corpus.clone(), phase.window_length)?;
            let mut config = pipeline.clone();
            config.seed = pipeline.seed.map(|s| s.wrapping_add(idx as u64));

            let batches = config.build(windows)?;
            cardinalities.push(batches.cardinality());
            let handle = feeder.make_one_shot(&batches)?;
            debug!(
                phase = %phase.name,
                window_length = phase.window_length,
                batches = %batches.cardinality(),
                %handle,
                "phase ready"
            );
            handles.push(handle);
        }

        let schedule = PhaseSchedule::from_phases(&phases);
        info!(
            phases = phases.len(),
            total_steps = schedule.total_steps(),
            corpus_chars = corpus.char_len(),
            "curriculum built"
        );

        Ok(Self {
            corpus,
            phases,
            handles,
            cardinalities,
            feeder,
            schedule,
        })
    }

    /// Validate `config` and build its phases over `corpus`.
    pub fn from_config(config: &CurriculumConfig, corpus: Arc<Corpus>) -> Result<Self> {
        config.validate()?;
        Self::build(corpus, config.phases.clone(), &config.pipeline)
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    pub fn schedule(&self) -> &PhaseSchedule {
        &self.schedule
    }

    /// Batches per pass of phase `index`'s stream.
    pub fn cardinality(&self, index: usize) -> Option<Cardinality> {
        self.cardinalities.get(index).copied()
    }

    pub fn handle(&self, index: usize) -> Option<&Handle> {
        self.handles.get(index)
    }

    pub fn handle_by_name(&self, name: &str) -> Option<&Handle> {
        let idx = self.phases.iter().position(|p| p.name == name)?;
        self.handles.get(idx)
    }

    /// The handle the schedule assigns to global `step`.
    pub fn handle_for_step(&self, step: usize) -> Option<&Handle> {
        self.handles.get(self.schedule.phase_at(step)?)
    }

    /// Pull the next batch from whichever phase `handle` selects.
    pub fn next_batch(&mut self, handle: &str) -> Result<Vec<String>> {
        self.feeder.get_next(handle)
    }

    /// Walk the schedule, feeding each step's phase handle and handing the
    /// batch to `on_batch` as `(phase, handle, step, batch)`.
    ///
    /// A phase whose stream ends early (finite `repeat`, or a corpus shorter
    /// than its window) has its remaining steps skipped with a warning.
    pub fn run<F>(&mut self, mut on_batch: F) -> Result<RunSummary>
    where
        F: FnMut(&Phase, &Handle, usize, Vec<String>) -> Result<()>,
    {
        let mut summary = RunSummary::default();
        let mut exhausted = vec![false; self.phases.len()];
        let mut current: Option<usize> = None;

        for step in 0..self.schedule.total_steps() {
            let Some(idx) = self.schedule.phase_at(step) else {
                break;
            };
            let phase = &self.phases[idx];
            let handle = &self.handles[idx];

            if current != Some(idx) {
                info!(
                    step,
                    phase = %phase.name,
                    window_length = phase.window_length,
                    %handle,
                    "switching phase"
                );
                current = Some(idx);
            }

            if exhausted[idx] {
                summary.skipped_steps += 1;
                continue;
            }

            match self.feeder.get_next(handle.as_str()) {
                Ok(batch) => {
                    on_batch(phase, handle, step, batch)?;
                    summary.batches += 1;
                }
                Err(Error::EndOfSequence) => {
                    warn!(
                        phase = %phase.name,
                        step,
                        "phase ran out of data, skipping its remaining steps"
                    );
                    exhausted[idx] = true;
                    summary.skipped_steps += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            batches = summary.batches,
            skipped = summary.skipped_steps,
            "curriculum finished"
        );
        Ok(summary)
    }
}
