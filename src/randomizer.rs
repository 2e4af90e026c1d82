//! Permuted block randomization across two treatment arms.
//!
//! The assignment log is the only durable state. A shuffled block is cached
//! in memory while it is being handed out; when the cache is missing or no
//! longer agrees with the log (typically after a restart mid-block), the
//! randomizer falls back to picking the under-represented arm.
//!
//! Only blocks drawn and completed by the same instance follow the uniform
//! permuted-block distribution. A fresh instance joining an open block fills
//! the remaining slots by count, so a caller that builds one randomizer per
//! participant mostly sees alternating blocks. Keep one instance alive across
//! assignments (see `pflow assign --count` and `--serve`).

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const BLOCK_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub label: String,
    /// Operator override; excluded from balance accounting.
    #[serde(default)]
    pub forced: bool,
}

impl Assignment {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            forced: false,
        }
    }

    pub fn forced(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            forced: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentSource {
    /// First draw of a freshly shuffled block.
    NewBlock,
    /// Next slot of the cached block.
    CachedBlock,
    /// Cache missing or inconsistent with the log.
    Fallback,
}

#[derive(Debug)]
pub struct BlockRandomizer<R = StdRng> {
    arms: [String; 2],
    rng: R,
    block: Option<Vec<String>>,
}

impl BlockRandomizer<StdRng> {
    pub fn new(arms: [String; 2]) -> Self {
        Self::with_rng(arms, StdRng::from_entropy())
    }

    pub fn seeded(arms: [String; 2], seed: u64) -> Self {
        Self::with_rng(arms, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> BlockRandomizer<R> {
    pub fn with_rng(arms: [String; 2], rng: R) -> Self {
        Self {
            arms,
            rng,
            block: None,
        }
    }

    pub fn arms(&self) -> &[String; 2] {
        &self.arms
    }

    /// Drops the in-progress block, as a process restart would.
    pub fn forget_block(&mut self) {
        self.block = None;
    }

    /// Next treatment label for a new participant given every prior record.
    pub fn assign(&mut self, log: &[Assignment]) -> String {
        self.assign_with_source(log).0
    }

    pub fn assign_with_source(&mut self, log: &[Assignment]) -> (String, AssignmentSource) {
        let counted: Vec<&str> = log
            .iter()
            .filter(|record| !record.forced)
            .map(|record| record.label.as_str())
            .collect();
        let pos = counted.len() % BLOCK_SIZE;

        if pos == 0 {
            let block = self.shuffle_block();
            let first = block[0].clone();
            self.block = Some(block);
            return (first, AssignmentSource::NewBlock);
        }

        if let Some(block) = &self.block
            && block.len() == BLOCK_SIZE
        {
            let recent = &counted[counted.len() - pos..];
            let consistent = block
                .iter()
                .zip(recent)
                .all(|(expected, actual)| expected == actual);
            if consistent {
                return (block[pos].clone(), AssignmentSource::CachedBlock);
            }
        }

        if self.block.take().is_some() {
            tracing::warn!(position = pos, "block cache out of sync with assignment log; balancing by count");
        } else {
            // Normal for a fresh process joining a block left open by another.
            tracing::debug!(position = pos, "no cached block; balancing by count");
        }
        (self.least_assigned(&counted), AssignmentSource::Fallback)
    }

    fn shuffle_block(&mut self) -> Vec<String> {
        let mut block: Vec<String> = self
            .arms
            .iter()
            .flat_map(|arm| std::iter::repeat_n(arm.clone(), BLOCK_SIZE / 2))
            .collect();
        block.shuffle(&mut self.rng);
        block
    }

    fn least_assigned(&mut self, counted: &[&str]) -> String {
        let first = counted.iter().filter(|label| **label == self.arms[0]).count();
        let second = counted.iter().filter(|label| **label == self.arms[1]).count();
        let pick = match first.cmp(&second) {
            std::cmp::Ordering::Less => 0,
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Equal => usize::from(self.rng.gen_bool(0.5)),
        };
        self.arms[pick].clone()
    }
}
