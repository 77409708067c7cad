use crate::trace::reader::{parse_field, TraceSchema};
use serde::{Deserialize, Serialize};

/// A point in the simulation plane, optionally stamped with simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub x: f64,
    pub y: f64,
    pub timestamp: Option<f64>,
}

impl PositionRecord {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            timestamp: None,
        }
    }
}

/// `x y` rows, or `x y _ t` rows for the mobility trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionSchema {
    timed: bool,
}

impl PositionSchema {
    /// Topology layout: `x y`.
    pub fn plain() -> Self {
        Self { timed: false }
    }

    /// Mobility layout: `x y _ timestamp`; the third column is never parsed.
    pub fn timed() -> Self {
        Self { timed: true }
    }
}

impl TraceSchema for PositionSchema {
    type Record = PositionRecord;

    fn name(&self) -> &'static str {
        if self.timed {
            "mobility"
        } else {
            "topology"
        }
    }

    fn field_count(&self) -> usize {
        if self.timed {
            4
        } else {
            2
        }
    }

    fn parse(&self, fields: &[&str]) -> Result<PositionRecord, String> {
        let timestamp = if self.timed {
            Some(parse_field(fields, 3, "timestamp")?)
        } else {
            None
        };
        Ok(PositionRecord {
            x: parse_field(fields, 0, "x")?,
            y: parse_field(fields, 1, "y")?,
            timestamp,
        })
    }
}
