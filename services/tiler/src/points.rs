//! CSV point input.
//!
//! Each record is `lat,lng`; extra columns are ignored and fields are
//! trimmed. Blank lines and `#` comments are skipped, and a first record
//! that does not parse as numbers is taken to be a header.

use std::io::Read;

use csv::{ByteRecord, ReaderBuilder, Trim};
use tile_common::{DensityError, DensityResult};
use tracing::debug;

/// Iterator over the points of a CSV stream.
///
/// Yields `Err(DensityError::Parse)` for malformed records (including
/// invalid UTF-8) and keeps going, so callers decide whether to skip or
/// abort. I/O errors are yielded as `DensityError::Io`.
pub struct PointReader<R> {
    reader: csv::Reader<R>,
    record: ByteRecord,
    seen_record: bool,
}

impl<R: Read> PointReader<R> {
    pub fn new(input: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .flexible(true)
            .trim(Trim::All)
            .from_reader(input);
        Self {
            reader,
            record: ByteRecord::new(),
            seen_record: false,
        }
    }
}

impl<R: Read> Iterator for PointReader<R> {
    type Item = DensityResult<(f64, f64)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.read_byte_record(&mut self.record) {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => return Some(Err(to_density_error(e, None))),
            }

            // Whitespace-only lines trim down to one empty field
            if self.record.iter().all(|field| field.is_empty()) {
                continue;
            }

            let line = self.record.position().map(|p| p.line());
            let first = !self.seen_record;
            self.seen_record = true;

            self.record.truncate(2);
            match self.record.deserialize::<(f64, f64)>(None) {
                Ok(point) => return Some(Ok(point)),
                Err(e) if first => {
                    debug!(line, error = %e, "Treating first record as header");
                    continue;
                }
                Err(e) => return Some(Err(to_density_error(e, line))),
            }
        }
    }
}

fn to_density_error(err: csv::Error, line: Option<u64>) -> DensityError {
    let line = line
        .or_else(|| err.position().map(|p| p.line()))
        .unwrap_or(0) as usize;

    match err.into_kind() {
        csv::ErrorKind::Io(e) => DensityError::Io(e),
        csv::ErrorKind::Deserialize { err, .. } => DensityError::Parse {
            line,
            message: err.to_string(),
        },
        other => DensityError::Parse {
            line,
            message: format!("{:?}", other),
        },
    }
}
