//! Encoding-tolerant line reading.

use std::io::BufRead;

use dtn_log_types::LogIngestError;

/// Decodes `bytes` as UTF-8, dropping invalid sequences instead of replacing them.
pub fn decode_dropping_invalid(mut bytes: &[u8]) -> String {
    let mut decoded = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                decoded.push_str(valid);
                return decoded;
            }
            Err(error) => {
                let (valid, rest) = bytes.split_at(error.valid_up_to());
                decoded.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match error.error_len() {
                    Some(invalid_len) => bytes = &rest[invalid_len..],
                    None => return decoded,
                }
            }
        }
    }
}

/// Iterator over decoded lines of a byte reader.
pub struct LossyLines<R> {
    reader: R,
    buffer: Vec<u8>,
    line_no: usize,
}

impl<R: BufRead> LossyLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = Result<String, LogIngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        self.line_no = self.line_no.saturating_add(1);
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => Some(Ok(decode_dropping_invalid(&self.buffer))),
            Err(source) => Some(Err(LogIngestError::Read {
                line: self.line_no,
                source,
            })),
        }
    }
}
