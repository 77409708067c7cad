use crate::prelude::TraceResult;
use crate::trace::reader::{parse_field, TraceSchema};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the handover-start trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandoverRecord {
    pub time: f64,
    pub imsi: u64,
    pub rnti: u32,
    pub source_cell: i64,
    pub target_cell: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandoverSchema;

impl TraceSchema for HandoverSchema {
    type Record = HandoverRecord;

    fn name(&self) -> &'static str {
        "handover"
    }

    fn field_count(&self) -> usize {
        5
    }

    fn parse(&self, fields: &[&str]) -> Result<HandoverRecord, String> {
        Ok(HandoverRecord {
            time: parse_field(fields, 0, "time")?,
            imsi: parse_field(fields, 1, "imsi")?,
            rnti: parse_field(fields, 2, "rnti")?,
            source_cell: parse_field(fields, 3, "source_cell")?,
            target_cell: parse_field(fields, 4, "target_cell")?,
        })
    }
}

/// Technology class of a handover, decided by its target cell identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoverBand {
    /// Target cell at or above the threshold.
    Upper,
    /// Target cell below the threshold.
    Lower,
}

impl HandoverBand {
    pub const ALL: [HandoverBand; 2] = [HandoverBand::Upper, HandoverBand::Lower];

    pub fn classify(target_cell: i64, threshold: u32) -> Self {
        if target_cell >= i64::from(threshold) {
            HandoverBand::Upper
        } else {
            HandoverBand::Lower
        }
    }
}

impl fmt::Display for HandoverBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandoverBand::Upper => f.write_str("upper band"),
            HandoverBand::Lower => f.write_str("lower band"),
        }
    }
}

/// Handover records split into the two bands in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct HandoverLog {
    threshold: u32,
    upper: Vec<HandoverRecord>,
    lower: Vec<HandoverRecord>,
}

impl HandoverLog {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            upper: Vec::new(),
            lower: Vec::new(),
        }
    }

    /// Partitions records as they are read; the first bad record aborts.
    pub fn collect<I>(records: I, threshold: u32) -> TraceResult<Self>
    where
        I: IntoIterator<Item = TraceResult<HandoverRecord>>,
    {
        let mut log = Self::new(threshold);
        for record in records {
            log.push(record?);
        }
        Ok(log)
    }

    pub fn push(&mut self, record: HandoverRecord) {
        match self.band_of(&record) {
            HandoverBand::Upper => self.upper.push(record),
            HandoverBand::Lower => self.lower.push(record),
        }
    }

    pub fn band_of(&self, record: &HandoverRecord) -> HandoverBand {
        HandoverBand::classify(record.target_cell, self.threshold)
    }

    pub fn records(&self, band: HandoverBand) -> &[HandoverRecord] {
        match band {
            HandoverBand::Upper => &self.upper,
            HandoverBand::Lower => &self.lower,
        }
    }

    pub fn count(&self, band: HandoverBand) -> usize {
        self.records(band).len()
    }

    pub fn total(&self) -> usize {
        self.upper.len() + self.lower.len()
    }

    /// Most recent handover decision of the band; `None` until it has one.
    pub fn latest(&self, band: HandoverBand) -> Option<&HandoverRecord> {
        self.records(band).last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::TraceError;
    use crate::trace::reader::TraceReader;
    use std::io::Cursor;

    fn record(time: f64, target_cell: i64) -> HandoverRecord {
        HandoverRecord {
            time,
            imsi: 1,
            rnti: 1,
            source_cell: 2,
            target_cell,
        }
    }

    #[test]
    fn every_record_lands_in_exactly_one_band() {
        let mut log = HandoverLog::new(6);
        for (idx, cell) in [2, 5, 6, 9, 3, 7, 6].into_iter().enumerate() {
            log.push(record(idx as f64, cell));
        }
        assert_eq!(log.count(HandoverBand::Upper), 4);
        assert_eq!(log.count(HandoverBand::Lower), 3);
        assert_eq!(
            log.count(HandoverBand::Upper) + log.count(HandoverBand::Lower),
            log.total()
        );
        assert!(log
            .records(HandoverBand::Upper)
            .iter()
            .all(|r| r.target_cell >= 6));
        assert!(log
            .records(HandoverBand::Lower)
            .iter()
            .all(|r| r.target_cell < 6));
    }

    #[test]
    fn latest_follows_arrival_order_per_band() {
        let mut log = HandoverLog::new(6);
        log.push(record(0.1, 7));
        log.push(record(0.2, 3));
        log.push(record(0.3, 8));
        assert_eq!(log.latest(HandoverBand::Upper).unwrap().target_cell, 8);
        assert_eq!(log.latest(HandoverBand::Lower).unwrap().target_cell, 3);
    }

    #[test]
    fn empty_band_has_no_latest_record() {
        let mut log = HandoverLog::new(6);
        log.push(record(0.1, 9));
        assert!(log.latest(HandoverBand::Lower).is_none());
    }

    #[test]
    fn threshold_is_configurable() {
        let mut log = HandoverLog::new(4);
        log.push(record(0.1, 4));
        log.push(record(0.2, 5));
        assert_eq!(log.count(HandoverBand::Upper), 2);
        assert_eq!(log.band_of(&record(0.3, 3)), HandoverBand::Lower);
    }

    #[test]
    fn collect_reads_and_partitions_trace_rows() {
        let input = "0.50 1 1 2 7\n0.90 1 1 7 3\n1.40 1 1 3 4\n";
        let reader = TraceReader::new(Cursor::new(input), HandoverSchema);
        let log = HandoverLog::collect(reader, 6).unwrap();
        assert_eq!(log.count(HandoverBand::Upper), 1);
        assert_eq!(log.count(HandoverBand::Lower), 2);
        assert_eq!(log.latest(HandoverBand::Lower).unwrap().source_cell, 3);
    }

    #[test]
    fn fractional_cell_identifier_is_malformed() {
        let reader = TraceReader::new(Cursor::new("0.5 1 1 2 7.0\n"), HandoverSchema);
        assert!(matches!(
            HandoverLog::collect(reader, 6),
            Err(TraceError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn negative_cell_identifier_is_read_as_lower_band() {
        let reader = TraceReader::new(Cursor::new("0.5 1 1 2 -3\n"), HandoverSchema);
        let log = HandoverLog::collect(reader, 6).unwrap();
        assert_eq!(log.latest(HandoverBand::Lower).unwrap().target_cell, -3);
    }
}
