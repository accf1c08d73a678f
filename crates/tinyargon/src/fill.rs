use core::cmp::Ordering;

#[cfg(feature = "parallel")]
use alloc::vec::Vec;

use crate::block::QWORDS_IN_BLOCK;
use crate::reference::index_alpha;
use crate::{Block, EngineInstance, SYNC_POINTS, Variant, Version, compress, log};

/// Pseudo-random values per address block
const ADDRESSES_IN_BLOCK: u32 = QWORDS_IN_BLOCK as u32;

/// The segment being filled: one lane's share of one slice of one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position {
    pub(crate) pass: u32,
    pub(crate) slice: u32,
    pub(crate) lane: u32,
}

/// The blocks of a lane that lie outside the segment being filled
#[derive(Debug, Clone, Copy)]
struct LaneView<'a> {
    head: &'a [Block],
    tail: &'a [Block],
}

/// Where the current slice sits within a lane
#[derive(Debug, Clone, Copy)]
struct SliceBounds {
    lane_length: usize,
    start: usize,
    segment_length: usize,
}

impl SliceBounds {
    fn new(instance: &EngineInstance, slice: u32) -> Self {
        let segment_length = instance.segment_length as usize;
        Self { lane_length: instance.lane_length as usize, start: slice as usize * segment_length, segment_length }
    }
}

/// Read access to the finished blocks of every lane
#[derive(Debug, Clone, Copy)]
enum Lanes<'a> {
    /// One view per lane, when all segments of a slice are borrowed at once
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    Views(&'a [LaneView<'a>]),
    /// The lanes around `own_lane`, when lanes are filled one after another
    Around { before: &'a [Block], own: LaneView<'a>, after: &'a [Block], own_lane: u32, bounds: SliceBounds },
}

impl<'a> Lanes<'a> {
    fn view(self, lane: u32) -> LaneView<'a> {
        match self {
            Self::Views(views) => views[lane as usize],
            Self::Around { before, own, after, own_lane, bounds } => {
                let SliceBounds { lane_length, start, segment_length } = bounds;
                let blocks = match lane.cmp(&own_lane) {
                    Ordering::Equal => return own,
                    Ordering::Less => &before[lane as usize * lane_length..][..lane_length],
                    Ordering::Greater => &after[(lane - own_lane - 1) as usize * lane_length..][..lane_length],
                };
                LaneView { head: &blocks[..start], tail: &blocks[start + segment_length..] }
            }
        }
    }
}

/// Fill every block of `memory` after the first two of each lane
pub(crate) fn fill_memory(instance: &EngineInstance, memory: &mut [Block]) {
    for pass in 0..instance.passes {
        for slice in 0..SYNC_POINTS {
            log::trace!("filling pass {pass}, slice {slice}");
            fill_slice(instance, memory, pass, slice);
        }
    }
}

/// Fill one slice across all lanes.
///
/// Within a slice each lane only writes its own segment and only reads other
/// lanes outside of theirs, so the work area is split into one mutable segment
/// and read-only views per lane. The end of the slice is the synchronization
/// point: all segments are finished before the next slice starts.
///
/// Filling lanes one after another does not allocate.
fn fill_slice(instance: &EngineInstance, memory: &mut [Block], pass: u32, slice: u32) {
    #[cfg(feature = "parallel")]
    if instance.active_threads > 1 {
        fill_slice_parallel(instance, memory, pass, slice);
        return;
    }

    let bounds = SliceBounds::new(instance, slice);
    for lane in 0..instance.lanes {
        let (before, rest) = memory.split_at_mut(lane as usize * bounds.lane_length);
        let (own, after) = rest.split_at_mut(bounds.lane_length);
        let (head, rest) = own.split_at_mut(bounds.start);
        let (current, tail) = rest.split_at_mut(bounds.segment_length);

        let own = LaneView { head, tail };
        let lanes = Lanes::Around { before, own, after, own_lane: lane, bounds };
        Segment { instance, lanes, current, position: Position { pass, slice, lane } }.fill();
    }
}

#[cfg(feature = "parallel")]
fn fill_slice_parallel(instance: &EngineInstance, memory: &mut [Block], pass: u32, slice: u32) {
    let bounds = SliceBounds::new(instance, slice);

    let mut views = Vec::with_capacity(instance.lanes as usize);
    let mut currents = Vec::with_capacity(instance.lanes as usize);
    for lane in memory.chunks_exact_mut(bounds.lane_length) {
        let (head, rest) = lane.split_at_mut(bounds.start);
        let (current, tail) = rest.split_at_mut(bounds.segment_length);
        views.push(LaneView { head, tail });
        currents.push(current);
    }

    let mut segments: Vec<Segment<'_>> = currents
        .into_iter()
        .zip(0..)
        .map(|(current, lane)| Segment {
            instance,
            lanes: Lanes::Views(&views),
            current,
            position: Position { pass, slice, lane },
        })
        .collect();

    let per_thread = segments.len().div_ceil(instance.active_threads as usize);
    crate::std::thread::scope(|scope| {
        for group in segments.chunks_mut(per_thread) {
            scope.spawn(move || group.iter_mut().for_each(Segment::fill));
        }
    });
}

struct Segment<'a> {
    instance: &'a EngineInstance,
    lanes: Lanes<'a>,
    current: &'a mut [Block],
    position: Position,
}

impl Segment<'_> {
    fn fill(&mut self) {
        let instance = self.instance;
        let Position { pass, slice, lane } = self.position;

        let data_independent = match instance.variant {
            Variant::Argon2i => true,
            Variant::Argon2id => pass == 0 && slice < SYNC_POINTS / 2,
            Variant::Argon2d => false,
        };
        let mut addresses = data_independent.then(|| AddressGenerator::new(instance, self.position));

        // the first two blocks of each lane come from H0
        let starting_index = if pass == 0 && slice == 0 { 2 } else { 0 };
        let with_xor = pass > 0 && instance.version == Version::V0x13;
        let bounds = SliceBounds::new(instance, slice);
        let segment_start = slice * instance.segment_length;

        for i in starting_index..instance.segment_length {
            let (done, rest) = self.current.split_at_mut(i as usize);
            let Some(next) = rest.first_mut() else { break };
            let view = SegmentView { lanes: self.lanes, done, own_lane: lane, bounds };

            let index = segment_start + i;
            let prev_index = if index == 0 { instance.lane_length - 1 } else { index - 1 };
            let prev = view.block(lane, prev_index);

            let pseudo_rand = match addresses.as_mut() {
                Some(addresses) => addresses.next(i),
                None => prev.0[0],
            };

            let ref_lane = match (pass, slice) {
                (0, 0) => lane,
                _ => ((pseudo_rand >> 32) % u64::from(instance.lanes)) as u32,
            };
            let same_lane = ref_lane == lane;
            let ref_index = index_alpha(instance, self.position, i, pseudo_rand as u32, same_lane);

            compress(prev, view.block(ref_lane, ref_index), next, with_xor);
        }
    }
}

/// Read access to every finished block while block `start + done.len()` of
/// `own_lane` is being computed
struct SegmentView<'s> {
    lanes: Lanes<'s>,
    done: &'s [Block],
    own_lane: u32,
    bounds: SliceBounds,
}

impl SegmentView<'_> {
    fn block(&self, lane: u32, index: u32) -> &Block {
        let SliceBounds { start, segment_length, .. } = self.bounds;
        let index = index as usize;

        if index < start {
            &self.lanes.view(lane).head[index]
        } else if index >= start + segment_length {
            &self.lanes.view(lane).tail[index - start - segment_length]
        } else {
            debug_assert_eq!(lane, self.own_lane, "reference into another lane's current segment");
            &self.done[index - start]
        }
    }
}

/// Generates the pseudo-random values of the data-independent modes
struct AddressGenerator {
    input: Block,
    scratch: Block,
    addresses: Block,
}

impl AddressGenerator {
    fn new(instance: &EngineInstance, position: Position) -> Self {
        let mut input = Block::ZERO;
        input.0[0] = u64::from(position.pass);
        input.0[1] = u64::from(position.lane);
        input.0[2] = u64::from(position.slice);
        input.0[3] = u64::from(instance.memory_blocks);
        input.0[4] = u64::from(instance.passes);
        input.0[5] = instance.variant as u64;
        Self { input, scratch: Block::ZERO, addresses: Block::ZERO }
    }

    /// The pseudo-random value for block `index` of the segment
    fn next(&mut self, index: u32) -> u64 {
        // the counter is still zero when the first segment starts at block 2
        if self.input.0[6] == 0 || index % ADDRESSES_IN_BLOCK == 0 {
            self.refresh();
        }
        self.addresses.0[(index % ADDRESSES_IN_BLOCK) as usize]
    }

    // addresses = G(0, G(0, input))
    fn refresh(&mut self) {
        self.input.0[6] += 1;
        compress(&Block::ZERO, &self.input, &mut self.scratch, false);
        compress(&Block::ZERO, &self.scratch, &mut self.addresses, false);
    }
}
