use crate::prelude::{TraceError, TraceResult};
use crate::trace::scanner::{LineScanner, RawLine};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Column layout of one trace format.
pub trait TraceSchema {
    type Record;

    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    /// Minimum number of whitespace-separated fields a line must carry.
    fn field_count(&self) -> usize;

    /// Converts the fields of a line known to hold at least `field_count` entries.
    fn parse(&self, fields: &[&str]) -> Result<Self::Record, String>;

    fn decode(&self, line: &RawLine) -> TraceResult<Self::Record> {
        let fields = line.fields();
        let malformed = |reason: String| TraceError::MalformedRecord {
            trace: self.name().to_string(),
            line: line.number,
            reason,
        };
        if fields.len() < self.field_count() {
            return Err(malformed(format!(
                "expected {} fields, found {}",
                self.field_count(),
                fields.len()
            )));
        }
        self.parse(&fields).map_err(malformed)
    }
}

/// Parses column `index`, naming the column in the error.
pub fn parse_field<T: FromStr>(fields: &[&str], index: usize, column: &str) -> Result<T, String> {
    let token = fields
        .get(index)
        .ok_or_else(|| format!("missing {} column", column))?;
    token
        .parse()
        .map_err(|_| format!("{} column holds non-numeric token {:?}", column, token))
}

/// Lazy sequence of typed records read from one trace stream.
pub struct TraceReader<R, S> {
    lines: LineScanner<R>,
    schema: S,
    origin: String,
}

impl<R: BufRead, S: TraceSchema> TraceReader<R, S> {
    pub fn new(reader: R, schema: S) -> Self {
        let origin = schema.name().to_string();
        Self {
            lines: LineScanner::new(reader),
            schema,
            origin,
        }
    }

    /// Names the stream (usually its path) in I/O errors.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Drains the stream, stopping at the first bad record.
    pub fn read_all(self) -> TraceResult<Vec<S::Record>> {
        self.collect()
    }
}

impl<R: BufRead, S: TraceSchema> Iterator for TraceReader<R, S> {
    type Item = TraceResult<S::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        Some(match line {
            Ok(line) => self.schema.decode(&line),
            Err(source) => Err(TraceError::ResourceUnavailable {
                trace: self.origin.clone(),
                source,
            }),
        })
    }
}

/// A trace on disk; every `open` starts again from the first line.
#[derive(Debug, Clone)]
pub struct TraceFile<S> {
    path: PathBuf,
    schema: S,
}

impl<S: TraceSchema + Clone> TraceFile<S> {
    pub fn new(path: impl Into<PathBuf>, schema: S) -> Self {
        Self {
            path: path.into(),
            schema,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self) -> TraceResult<TraceReader<BufReader<File>, S>> {
        let origin = self.path.display().to_string();
        let file = File::open(&self.path).map_err(|source| TraceError::ResourceUnavailable {
            trace: origin.clone(),
            source,
        })?;
        Ok(TraceReader::new(BufReader::new(file), self.schema.clone()).with_origin(origin))
    }

    pub fn read_all(&self) -> TraceResult<Vec<S::Record>> {
        self.open()?.read_all()
    }
}
