use crate::{HashRequest, MAX_LANES, MIN_LANES, MIN_MEMORY_PER_LANE, Result, SYNC_POINTS, Variant, Version, log};

/// The aligned geometry of one computation.
///
/// Created from a validated [`HashRequest`]; the memory is rounded down to a
/// whole number of segments so that every lane has the same length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineInstance {
    /// Total number of 1 KiB blocks
    pub memory_blocks: u32,
    /// Blocks per segment (a lane's share of one slice)
    pub segment_length: u32,
    /// Blocks per lane
    pub lane_length: u32,
    /// Number of passes
    pub passes: u32,
    /// Number of lanes
    pub lanes: u32,
    /// Number of threads that will fill lanes, at most `lanes`
    pub active_threads: u32,
    /// Argon2 variant
    pub variant: Variant,
    /// Argon2 version
    pub version: Version,
}

impl EngineInstance {
    /// Validate `request` and derive the memory geometry
    pub fn new(request: &HashRequest<'_>) -> Result<Self> {
        request.validate().inspect_err(|err| log::debug!("rejected {request:?}: {err}"))?;

        let memory_blocks = align_memory(request.memory_cost, request.lanes);
        let segment_length = memory_blocks / (request.lanes * SYNC_POINTS);

        Ok(Self {
            memory_blocks,
            segment_length,
            lane_length: segment_length * SYNC_POINTS,
            passes: request.time_cost,
            lanes: request.lanes,
            active_threads: request.threads.min(request.lanes),
            variant: request.variant,
            version: request.version,
        })
    }

    /// The number of blocks a work area must hold
    pub fn block_count(&self) -> usize {
        self.memory_blocks as usize
    }

    /// Position of block `index` of `lane` in the work area
    #[inline]
    pub(crate) fn block_index(&self, lane: u32, index: u32) -> usize {
        lane as usize * self.lane_length as usize + index as usize
    }
}

/// Round `memory_cost` to a whole number of segments, with at least
/// `2 * SYNC_POINTS` blocks per lane.
///
/// `lanes` is clamped to `MIN_LANES..=MAX_LANES`.
pub fn align_memory(memory_cost: u32, lanes: u32) -> u32 {
    let lanes = lanes.clamp(MIN_LANES, MAX_LANES);
    let memory_blocks = memory_cost.max(MIN_MEMORY_PER_LANE.saturating_mul(lanes));
    let segment_length = memory_blocks / (lanes * SYNC_POINTS);
    segment_length * lanes * SYNC_POINTS
}
