use crate::trace::reader::{parse_field, TraceSchema};
use serde::{Deserialize, Serialize};

/// Axis-aligned obstacle footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingRecord {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl BuildingRecord {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildingSchema;

impl TraceSchema for BuildingSchema {
    type Record = BuildingRecord;

    fn name(&self) -> &'static str {
        "building"
    }

    fn field_count(&self) -> usize {
        4
    }

    fn parse(&self, fields: &[&str]) -> Result<BuildingRecord, String> {
        Ok(BuildingRecord {
            x_min: parse_field(fields, 0, "x_min")?,
            x_max: parse_field(fields, 1, "x_max")?,
            y_min: parse_field(fields, 2, "y_min")?,
            y_max: parse_field(fields, 3, "y_max")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::reader::TraceReader;
    use std::io::Cursor;

    #[test]
    fn building_columns_are_min_max_pairs() {
        let records = TraceReader::new(Cursor::new("10 20 30 45\n"), BuildingSchema)
            .read_all()
            .unwrap();
        assert_eq!(records[0].width(), 10.0);
        assert_eq!(records[0].height(), 15.0);
    }
}
