//! Splits the multiplexed SINR trace into one file per (IMSI, cell) pair.

use crate::prelude::{TraceError, TraceResult};
use crate::trace::{LineScanner, SinrSchema, TraceSchema};
use log::info;
use std::collections::btree_map::{BTreeMap, Entry};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Output file name used for one UE/cell pair.
pub fn output_name(imsi: u64, cell_id: u32) -> String {
    format!("SINR-UE-{}-Enb-{}.txt", imsi, cell_id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemuxSummary {
    pub rows: usize,
    /// Written files ordered by (imsi, cell_id).
    pub outputs: Vec<PathBuf>,
}

struct PairSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl PairSink {
    fn create(path: PathBuf) -> TraceResult<Self> {
        let file = File::create(&path).map_err(|source| TraceError::Output {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    fn write_row(&mut self, time: &str, value: &str) -> TraceResult<()> {
        writeln!(self.writer, "{}\t{}", time, value).map_err(|source| TraceError::Output {
            path: self.path.clone(),
            source,
        })
    }

    fn finish(mut self) -> TraceResult<PathBuf> {
        self.writer.flush().map_err(|source| TraceError::Output {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.path)
    }
}

/// Copies every row of `input` into its pair's file under `output_dir`.
///
/// Rows keep their original time and value tokens and their relative order.
/// A file is created the first time its pair shows up.
pub fn demux_sinr<R: BufRead>(input: R, output_dir: &Path) -> TraceResult<DemuxSummary> {
    let schema = SinrSchema;
    let mut sinks: BTreeMap<(u64, u32), PairSink> = BTreeMap::new();
    let mut rows = 0;

    for line in LineScanner::complete(input) {
        let line = line.map_err(|source| TraceError::ResourceUnavailable {
            trace: schema.name().to_string(),
            source,
        })?;
        let record = schema.decode(&line)?;
        let fields = line.fields();
        let key = (record.imsi, record.cell_id);

        let sink = match sinks.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                entry.insert(PairSink::create(output_dir.join(output_name(key.0, key.1)))?)
            }
        };
        sink.write_row(fields[0], fields[3])?;
        rows += 1;
    }

    let outputs = sinks
        .into_values()
        .map(PairSink::finish)
        .collect::<TraceResult<Vec<_>>>()?;
    info!(
        "demultiplexed {} SINR rows into {} files",
        rows,
        outputs.len()
    );
    Ok(DemuxSummary { rows, outputs })
}

pub fn demux_sinr_file(input: &Path, output_dir: &Path) -> TraceResult<DemuxSummary> {
    let file = File::open(input).map_err(|source| TraceError::ResourceUnavailable {
        trace: input.display().to_string(),
        source,
    })?;
    demux_sinr(BufReader::new(file), output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn output_names_follow_the_pair_convention() {
        assert_eq!(output_name(1, 3), "SINR-UE-1-Enb-3.txt");
    }

    #[test]
    fn rows_keep_their_original_tokens() {
        let dir = TempDir::new().unwrap();
        let summary = demux_sinr(Cursor::new("0.000214 1 2 23.500000\n"), dir.path()).unwrap();
        assert_eq!(summary.rows, 1);
        let contents = fs::read_to_string(&summary.outputs[0]).unwrap();
        assert_eq!(contents, "0.000214\t23.500000\n");
    }

    #[test]
    fn unterminated_last_row_is_still_demultiplexed() {
        let dir = TempDir::new().unwrap();
        let summary = demux_sinr(Cursor::new("0.1 1 2 20.5\n0.2 1 3 11.0"), dir.path()).unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.outputs.len(), 2);
        let contents = fs::read_to_string(dir.path().join(output_name(1, 3))).unwrap();
        assert_eq!(contents, "0.2\t11.0\n");
    }

    #[test]
    fn malformed_row_aborts_the_demux() {
        let dir = TempDir::new().unwrap();
        let err = demux_sinr(Cursor::new("0.1 1 2 20\n0.2 1 x 21\n"), dir.path()).unwrap_err();
        assert!(matches!(err, TraceError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn missing_output_directory_is_an_output_error() {
        let dir = TempDir::new().unwrap();
        let absent = dir.path().join("nope");
        let err = demux_sinr(Cursor::new("0.1 1 2 20\n"), &absent).unwrap_err();
        assert!(matches!(err, TraceError::Output { .. }));
    }

    #[test]
    fn empty_input_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let summary = demux_sinr(Cursor::new(""), dir.path()).unwrap();
        assert_eq!(summary.rows, 0);
        assert!(summary.outputs.is_empty());
    }
}
