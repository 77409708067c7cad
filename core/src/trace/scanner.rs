use log::trace;
use std::io::{self, BufRead};

/// One complete, newline-terminated line of a trace.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLine {
    /// 1-based position of the line in the file.
    pub number: usize,
    pub text: String,
}

impl RawLine {
    pub fn fields(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }
}

/// Splits a trace stream into lines, stopping at the first blank line.
///
/// The simulator appends to these files while we read them, so by default a
/// last line without its newline is still being written. It is treated as the
/// end of the available data and never handed out. [`LineScanner::complete`]
/// reads a finished file, where that last line is a whole record.
pub struct LineScanner<R> {
    reader: R,
    line_number: usize,
    finished: bool,
    accept_tail: bool,
}

impl<R: BufRead> LineScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            finished: false,
            accept_tail: false,
        }
    }

    /// Scanner for a trace that is no longer being written.
    pub fn complete(reader: R) -> Self {
        Self {
            accept_tail: true,
            ..Self::new(reader)
        }
    }
}

impl<R: BufRead> Iterator for LineScanner<R> {
    type Item = io::Result<RawLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut text = String::new();
        match self.reader.read_line(&mut text) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(_) => {
                self.line_number += 1;
                if !text.ends_with('\n') && !self.accept_tail {
                    trace!(
                        "ignoring unterminated line {} ({} bytes)",
                        self.line_number,
                        text.len()
                    );
                    self.finished = true;
                    return None;
                }
                if text.trim().is_empty() {
                    self.finished = true;
                    return None;
                }
                Some(Ok(RawLine {
                    number: self.line_number,
                    text,
                }))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn numbers(input: &str) -> Vec<usize> {
        LineScanner::new(Cursor::new(input.as_bytes()))
            .map(|line| line.unwrap().number)
            .collect()
    }

    #[test]
    fn scanner_yields_terminated_lines_in_order() {
        let lines: Vec<RawLine> = LineScanner::new(Cursor::new("1 2\n3 4\r\n"))
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].number, 2);
        assert_eq!(lines[1].fields(), vec!["3", "4"]);
    }

    #[test]
    fn blank_line_ends_the_stream() {
        assert_eq!(numbers("1 2\n   \n3 4\n"), vec![1]);
    }

    #[test]
    fn unterminated_tail_is_withheld() {
        assert_eq!(numbers("1 2\n3 4\n5"), vec![1, 2]);
        assert!(numbers("").is_empty());
    }

    #[test]
    fn complete_scanner_keeps_the_unterminated_tail() {
        let lines: Vec<RawLine> = LineScanner::complete(Cursor::new("1 2\n3 4"))
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].fields(), vec!["3", "4"]);
        let blank_tail = LineScanner::complete(Cursor::new("1 2\n  ")).count();
        assert_eq!(blank_tail, 1);
    }
}
