//! Maps handover target cells onto topology coordinates.
//!
//! The simulator numbers cells contiguously from [`CELL_ID_OFFSET`] in the same
//! order it writes the topology trace, so a cell's row is its identifier minus
//! the offset.

use crate::frame::scene::Point;
use crate::prelude::{TraceError, TraceResult};
use crate::trace::{HandoverBand, HandoverLog, HandoverRecord, PositionRecord};

/// Identifier of the cell described by the first topology row.
pub const CELL_ID_OFFSET: u32 = 2;

/// Topology row of `cell_id`; negative for identifiers below the offset.
pub fn topology_index(cell_id: i64) -> i64 {
    cell_id - i64::from(CELL_ID_OFFSET)
}

/// Inverse of [`topology_index`].
pub fn cell_id_for_index(index: usize) -> u32 {
    index as u32 + CELL_ID_OFFSET
}

pub fn resolve(record: &HandoverRecord, topology: &[PositionRecord]) -> TraceResult<Point> {
    let index = topology_index(record.target_cell);
    usize::try_from(index)
        .ok()
        .and_then(|row| topology.get(row))
        .map(Point::from)
        .ok_or(TraceError::ReferentialIntegrity {
            cell_id: record.target_cell,
            index,
            len: topology.len(),
        })
}

/// Anchor of the band's most recent handover, or `None` while the band is empty.
pub fn resolve_latest(
    log: &HandoverLog,
    band: HandoverBand,
    topology: &[PositionRecord],
) -> TraceResult<Option<Point>> {
    log.latest(band)
        .map(|record| resolve(record, topology))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topology(len: usize) -> Vec<PositionRecord> {
        (0..len)
            .map(|idx| PositionRecord::new(idx as f64 * 10.0, idx as f64))
            .collect()
    }

    fn handover(target_cell: i64) -> HandoverRecord {
        HandoverRecord {
            time: 1.0,
            imsi: 1,
            rnti: 4,
            source_cell: 2,
            target_cell,
        }
    }

    #[test]
    fn every_valid_cell_resolves_to_its_row() {
        let rows = topology(6);
        for cell in 2..(6 + 2) {
            let point = resolve(&handover(cell), &rows).unwrap();
            let expected = &rows[(cell - 2) as usize];
            assert_eq!((point.x, point.y), (expected.x, expected.y));
        }
    }

    #[test]
    fn cells_outside_the_topology_are_rejected() {
        let rows = topology(4);
        for cell in [-4, 0, 1, 6, 7, 100] {
            let err = resolve(&handover(cell), &rows).unwrap_err();
            match err {
                TraceError::ReferentialIntegrity { cell_id, index, len } => {
                    assert_eq!(cell_id, cell);
                    assert_eq!(index, cell - 2);
                    assert_eq!(len, 4);
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn empty_topology_never_resolves() {
        assert!(resolve(&handover(2), &[]).is_err());
    }

    #[test]
    fn empty_band_resolves_to_nothing() {
        let mut log = HandoverLog::new(6);
        log.push(handover(7));
        let rows = topology(6);
        assert_eq!(
            resolve_latest(&log, HandoverBand::Lower, &rows).unwrap(),
            None
        );
        assert_eq!(
            resolve_latest(&log, HandoverBand::Upper, &rows).unwrap(),
            Some(Point::new(50.0, 5.0))
        );
    }

    #[test]
    fn index_mapping_round_trips() {
        assert_eq!(topology_index(i64::from(cell_id_for_index(3))), 3);
        assert_eq!(topology_index(1), -1);
    }
}
