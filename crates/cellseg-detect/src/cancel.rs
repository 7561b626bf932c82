//! Cooperative interruption
//!
//! The detector polls an [`Interruption`] before each major stage. Once it
//! reports an interruption the call returns an empty, cancelled result and
//! leaves the cached detector state as it was.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Major pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Median filter, background subtraction, LoG and seed watershed
    SeedDetection,
    /// Threshold pruning, merging and split by shape
    Masking,
    /// Small-sigma boundary refinement
    Refinement,
    /// Area pruning and tracing of the final nuclei
    AreaPruning,
    /// Per-label channel statistics
    Statistics,
    /// Growing nuclei into cells
    Expansion,
    /// Building objects and measurement lists
    Assembly,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::SeedDetection => "seed detection",
            Stage::Masking => "masking",
            Stage::Refinement => "boundary refinement",
            Stage::AreaPruning => "area pruning",
            Stage::Statistics => "statistics",
            Stage::Expansion => "cell expansion",
            Stage::Assembly => "object assembly",
        };
        f.write_str(name)
    }
}

/// Source of interruption requests
pub trait Interruption {
    /// Return true to abandon the run before `stage` starts
    fn is_interrupted(&self, stage: Stage) -> bool;
}

/// Never interrupts
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterruption;

impl Interruption for NoInterruption {
    fn is_interrupted(&self, _stage: Stage) -> bool {
        false
    }
}

impl<F> Interruption for F
where
    F: Fn(Stage) -> bool,
{
    fn is_interrupted(&self, stage: Stage) -> bool {
        self(stage)
    }
}

/// Shared cancellation flag
///
/// Clones share the same flag, so one clone can be handed to the thread
/// running the detector and another kept by whoever may cancel it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A token that has not been cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Clear a previous cancellation request
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }

    /// True once cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl Interruption for CancelToken {
    fn is_interrupted(&self, _stage: Stage) -> bool {
        self.is_cancelled()
    }
}
