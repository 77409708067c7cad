pub mod building;
pub mod handover;
pub mod position;
pub mod reader;
pub mod scanner;
pub mod series;

pub use building::{BuildingRecord, BuildingSchema};
pub use handover::{HandoverBand, HandoverLog, HandoverRecord, HandoverSchema};
pub use position::{PositionRecord, PositionSchema};
pub use reader::{parse_field, TraceFile, TraceReader, TraceSchema};
pub use scanner::{LineScanner, RawLine};
pub use series::{SamplePoint, SeriesSchema, SinrRecord, SinrSchema};
