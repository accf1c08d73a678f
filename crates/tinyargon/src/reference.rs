use crate::fill::Position;
use crate::{EngineInstance, SYNC_POINTS};

/// Map a pseudo-random value to the index of the reference block within its lane.
///
/// The reference area is every block already finished that is not in the
/// segment currently being filled by another lane. Small values of `J1` are
/// mapped close to the end of the area, following the non-uniform
/// distribution `area - 1 - area * (J1^2 / 2^32) / 2^32`.
pub(crate) fn index_alpha(
    instance: &EngineInstance,
    position: Position,
    index: u32,
    pseudo_rand: u32,
    same_lane: bool,
) -> u32 {
    let segment_length = instance.segment_length;
    let lane_length = instance.lane_length;
    let Position { pass, slice, .. } = position;

    let reference_area_size = match (pass, slice, same_lane) {
        // only the blocks before `index` in this segment exist yet
        (0, 0, _) => index - 1,
        (0, _, true) => slice * segment_length + index - 1,
        (0, _, false) => slice * segment_length - u32::from(index == 0),
        (_, _, true) => lane_length - segment_length + index - 1,
        (_, _, false) => lane_length - segment_length - u32::from(index == 0),
    };

    let area = u64::from(reference_area_size);
    let x = u64::from(pseudo_rand);
    let x = (x * x) >> 32;
    let relative_position = area - 1 - ((area * x) >> 32);

    let start_position = if pass == 0 || slice == SYNC_POINTS - 1 { 0 } else { (slice + 1) * segment_length };
    ((u64::from(start_position) + relative_position) % u64::from(lane_length)) as u32
}

#[cfg(test)]
mod reference_tests {
    use super::*;
    use crate::HashRequest;

    fn instance() -> EngineInstance {
        let request = HashRequest::new(b"password", b"somesalt").with_lanes(2).with_memory_cost(64);
        EngineInstance::new(&request).unwrap()
    }

    // a simple xorshift so the sweep covers the whole u32 range
    fn samples() -> impl Iterator<Item = u32> {
        let mut state = 0x2545_f491_u32;
        core::iter::from_fn(move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            Some(state)
        })
        .take(512)
        .chain([0, 1, u32::MAX])
    }

    #[test]
    fn test_first_segment() {
        let instance = instance();
        let position = Position { pass: 0, slice: 0, lane: 0 };

        // with a single finished candidate the reference is block 0
        assert_eq!(index_alpha(&instance, position, 2, u32::MAX, true), 0);
        for j1 in samples() {
            for index in 2..instance.segment_length {
                assert!(index_alpha(&instance, position, index, j1, true) < index - 1);
            }
        }
    }

    #[test]
    fn test_first_pass_stays_behind() {
        let instance = instance();
        for slice in 1..SYNC_POINTS {
            let position = Position { pass: 0, slice, lane: 0 };
            let start = slice * instance.segment_length;
            for j1 in samples() {
                for index in 0..instance.segment_length {
                    // same lane: anything finished except the previous block
                    if start + index >= 2 {
                        assert!(index_alpha(&instance, position, index, j1, true) < start + index - 1);
                    }
                    // other lanes: finished segments only
                    assert!(index_alpha(&instance, position, index, j1, false) < start);
                }
            }
        }
    }

    #[test]
    fn test_later_passes_skip_current_segment() {
        let instance = instance();
        for slice in 0..SYNC_POINTS {
            let position = Position { pass: 1, slice, lane: 1 };
            let current = slice * instance.segment_length..(slice + 1) * instance.segment_length;
            for j1 in samples() {
                for index in 0..instance.segment_length {
                    let other = index_alpha(&instance, position, index, j1, false);
                    assert!(other < instance.lane_length);
                    assert!(!current.contains(&other));

                    let own = index_alpha(&instance, position, index, j1, true);
                    assert!(own < instance.lane_length);
                    let absolute = current.start + index;
                    let previous = (absolute + instance.lane_length - 1) % instance.lane_length;
                    assert!(!(absolute..current.end).contains(&own) && own != previous);
                }
            }
        }
    }
}
