use crate::trace::reader::{parse_field, TraceSchema};
use serde::{Deserialize, Serialize};

/// One sample of a throughput or per-TB SINR series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub time: f64,
    pub value: f64,
}

/// `time value` rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesSchema;

impl TraceSchema for SeriesSchema {
    type Record = SamplePoint;

    fn name(&self) -> &'static str {
        "series"
    }

    fn field_count(&self) -> usize {
        2
    }

    fn parse(&self, fields: &[&str]) -> Result<SamplePoint, String> {
        Ok(SamplePoint {
            time: parse_field(fields, 0, "time")?,
            value: parse_field(fields, 1, "value")?,
        })
    }
}

/// One row of the multiplexed SINR trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SinrRecord {
    pub time: f64,
    pub imsi: u64,
    pub cell_id: u32,
    pub value: f64,
}

/// `time imsi cell_id value` rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinrSchema;

impl TraceSchema for SinrSchema {
    type Record = SinrRecord;

    fn name(&self) -> &'static str {
        "sinr"
    }

    fn field_count(&self) -> usize {
        4
    }

    fn parse(&self, fields: &[&str]) -> Result<SinrRecord, String> {
        Ok(SinrRecord {
            time: parse_field(fields, 0, "time")?,
            imsi: parse_field(fields, 1, "imsi")?,
            cell_id: parse_field(fields, 2, "cell_id")?,
            value: parse_field(fields, 3, "value")?,
        })
    }
}
