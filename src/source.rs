//! Line sources: pull iterators of `io::Result<String>`, forward-only and
//! not restartable. Any such iterator feeds the pipeline, which makes it easy
//! to drive with synthetic or fault-injecting sources in tests.

use std::io::{self, BufRead, BufReader, Read};

/// Larger buffer reduces syscalls on big inputs.
const READ_BUFFER: usize = 1 << 20;

/// Splits a byte stream into lines. `\n`, `\r\n` and a lone `\r` each end a
/// line; a `\r\n` pair is one break even when a buffer refill falls between
/// the two bytes. A final unterminated line is still yielded. Invalid UTF-8
/// is decoded lossily rather than treated as a fault.
pub struct ReaderLines<R> {
    reader: R,
    buf: Vec<u8>,
    // last line ended on `\r`; a leading `\n` belongs to that break
    skip_lf: bool,
    done: bool,
}

impl<R: BufRead> ReaderLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: Vec::new(), skip_lf: false, done: false }
    }

    fn take_line(&mut self) -> String {
        String::from_utf8_lossy(&self.buf).into_owned()
    }
}

impl<R: BufRead> Iterator for ReaderLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.buf.clear();
        loop {
            let available = match self.reader.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    // a faulted stream is not resumed
                    self.done = true;
                    return Some(Err(e));
                }
            };
            if self.skip_lf {
                self.skip_lf = false;
                if available.first() == Some(&b'\n') {
                    self.reader.consume(1);
                    continue;
                }
            }
            if available.is_empty() {
                self.done = true;
                if self.buf.is_empty() {
                    return None;
                }
                return Some(Ok(self.take_line()));
            }
            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(end) => {
                    self.skip_lf = available[end] == b'\r';
                    self.buf.extend_from_slice(&available[..end]);
                    self.reader.consume(end + 1);
                    return Some(Ok(self.take_line()));
                }
                None => {
                    let len = available.len();
                    self.buf.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }
}

pub fn lines<R: BufRead>(reader: R) -> ReaderLines<R> {
    ReaderLines::new(reader)
}

/// Wraps an unbuffered byte stream, such as a blob body.
pub fn lines_from_read<R: Read>(reader: R) -> ReaderLines<BufReader<R>> {
    ReaderLines::new(BufReader::with_capacity(READ_BUFFER, reader))
}
