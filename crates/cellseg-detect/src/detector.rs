//! The cell detector
//!
//! [`CellDetector`] runs the stages in order, polling the interruption
//! source before each one:
//!
//! 1. seed detection (cached per [`SeedKey`](crate::state::SeedKey))
//! 2. masking: threshold, merge and split by shape
//! 3. boundary refinement
//! 4. area pruning
//! 5. nucleus statistics
//! 6. cell expansion with cell, cytoplasm and membrane statistics
//! 7. object assembly and classification
//!
//! State is only committed when a run completes, so an interrupted or
//! failed call leaves the detector exactly as it was.

use crate::DetectResult;
use crate::assembly::Assembly;
use crate::cancel::{Interruption, NoInterruption, Stage};
use crate::classify::{ClassificationSummary, classify_objects, summary_text};
use crate::compartments::{cell_statistics, channel_statistics};
use crate::expansion::expand_cells;
use crate::input::DetectionInput;
use crate::nuclei::{corrected_raster, nucleus_mask, prune_by_area, refine_boundary, select_seeds};
use crate::object::CellObject;
use crate::params::DetectionParams;
use crate::seeds::detect_seeds;
use crate::state::{PipelineState, RefinedKey, SeedKey};
use log::debug;
use std::sync::Arc;

/// Outcome of one detection call
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// Detected objects, ordered by nucleus label
    pub objects: Vec<CellObject>,
    /// Human-readable summary
    pub summary: String,
    /// Positivity counts when classification was requested
    pub classification: Option<ClassificationSummary>,
    /// True if the run was interrupted; `objects` is then empty
    pub cancelled: bool,
}

impl DetectionResult {
    fn cancelled() -> Self {
        Self {
            objects: Vec::new(),
            summary: "detection cancelled".to_string(),
            classification: None,
            cancelled: true,
        }
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True if nothing was detected
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Nucleus and cell detector for one image region at a time
///
/// A detector caches the seeds and the last result of the region it
/// processed. Calling it again with parameters that only affect later
/// stages skips seed detection; calling it with identical inputs returns
/// the cached result. A detector is not meant to be shared between
/// threads; give each worker its own.
///
/// Cache keys cover the region, plane, region of interest and parameters,
/// not raster or channel contents: call [`CellDetector::invalidate`] (or
/// use a new [`RegionId`](crate::RegionId)) after replacing the rasters of
/// a region.
#[derive(Debug, Default)]
pub struct CellDetector {
    state: PipelineState,
    seed_passes: u64,
}

fn interrupted<I: Interruption + ?Sized>(interrupt: &I, stage: Stage) -> bool {
    let hit = interrupt.is_interrupted(stage);
    if hit {
        debug!("detection interrupted before {stage}");
    }
    hit
}

impl CellDetector {
    /// Create a detector with empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times seed detection has actually run
    pub fn seed_passes(&self) -> u64 {
        self.seed_passes
    }

    /// True if seeds from a previous run are cached
    pub fn has_cached_seeds(&self) -> bool {
        self.state.seed.is_some()
    }

    /// Drop all cached state
    pub fn invalidate(&mut self) {
        self.state.clear();
    }

    /// Detect cells without interruption
    pub fn detect(
        &mut self,
        input: &DetectionInput,
        params: &DetectionParams,
    ) -> DetectResult<DetectionResult> {
        self.detect_with_interrupt(input, params, &NoInterruption)
    }

    /// Detect cells, polling `interrupt` before every stage
    ///
    /// # Errors
    ///
    /// - `DetectError::MissingRoi` if the input has no region of interest
    /// - `DetectError::InvalidParameters` / `InvalidInput` on validation
    ///   failures
    /// - lower-level errors from the raster operations
    pub fn detect_with_interrupt<I: Interruption + ?Sized>(
        &mut self,
        input: &DetectionInput,
        params: &DetectionParams,
        interrupt: &I,
    ) -> DetectResult<DetectionResult> {
        let roi = input.require_roi()?;
        params.validate()?;
        input.validate()?;

        let key = RefinedKey {
            seed: SeedKey::new(input, roi, params),
            params: params.clone(),
        };
        if let Some(cached) = self.state.result_for(&key) {
            debug!("inputs unchanged, reusing {} cached objects", cached.len());
            return Ok(cached.clone());
        }

        if interrupted(interrupt, Stage::SeedDetection) {
            return Ok(DetectionResult::cancelled());
        }
        let seeds = match self.state.seeds_for(&key.seed) {
            Some(seeds) => {
                debug!("seed parameters unchanged, reusing {} seeds", seeds.count);
                seeds
            }
            None => {
                self.seed_passes += 1;
                Arc::new(detect_seeds(input, roi, params)?)
            }
        };

        if interrupted(interrupt, Stage::Masking) {
            return Ok(DetectionResult::cancelled());
        }
        let corrected = corrected_raster(&seeds, params)?;
        let keep = select_seeds(&seeds, &corrected, params.threshold)?;
        let mut mask = nucleus_mask(&seeds, &keep, params)?;

        if params.refines_boundary() {
            if interrupted(interrupt, Stage::Refinement) {
                return Ok(DetectionResult::cancelled());
            }
            mask = refine_boundary(&mask, input, &seeds)?;
        }

        if interrupted(interrupt, Stage::AreaPruning) {
            return Ok(DetectionResult::cancelled());
        }
        let nuclei = prune_by_area(&mask, params)?;

        if interrupted(interrupt, Stage::Statistics) {
            return Ok(DetectionResult::cancelled());
        }
        let nucleus_stats = if params.make_measurements {
            channel_statistics(&nuclei.labels, &input.nucleus_channels, nuclei.count)?
        } else {
            Vec::new()
        };

        let (cells, cell_stats) = if params.expands_cells() {
            if interrupted(interrupt, Stage::Expansion) {
                return Ok(DetectionResult::cancelled());
            }
            let cells = expand_cells(
                &nuclei.labels,
                nuclei.count,
                params.cell_expansion,
                params.expansion_mode,
                &seeds.roi_mask,
            )?;
            let stats = if params.make_measurements {
                Some(cell_statistics(
                    &cells,
                    &nuclei.labels,
                    &input.cell_channels,
                    nuclei.count,
                    params.membrane,
                )?)
            } else {
                None
            };
            (Some(cells), stats)
        } else {
            (None, None)
        };

        if interrupted(interrupt, Stage::Assembly) {
            return Ok(DetectionResult::cancelled());
        }
        let assembly = Assembly {
            nuclei: &nuclei,
            cells: cells.as_ref(),
            nucleus_stats: &nucleus_stats,
            cell_stats: cell_stats.as_ref(),
        };
        let mut objects: Vec<CellObject> = assembly.build(params)?;
        let classification = params
            .positivity
            .as_ref()
            .map(|p| classify_objects(&mut objects, p));
        let summary = summary_text(objects.len(), classification.as_ref());
        debug!("{summary}");

        let result = DetectionResult {
            objects,
            summary,
            classification,
            cancelled: false,
        };
        self.state.commit(key, seeds, result.clone());
        Ok(result)
    }
}
