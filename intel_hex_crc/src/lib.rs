//! Checksum verification for Intel HEX files.
//!
//! Every record is a start code `:` followed by pairs of uppercase hex digits. The bytes of a
//! record, its trailing checksum byte included, must add up to zero modulo 256. Anything
//! outside a record is ignored. Record types, addresses and file structure are not looked at.
//!
//! ```no_run
//! use intel_hex_crc::{check_file, ScanOptions};
//!
//! let summary = check_file("firmware.hex", ScanOptions::default())?;
//! println!("{} records ok", summary.records);
//! # Ok::<(), intel_hex_crc::Error>(())
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, warn};

mod error;
mod hex;
mod scanner;
mod stream;

pub use error::{Error, Result, ScanError};
pub use hex::{decode_hex_digit, is_hex_digit, InvalidHexDigit};
pub use scanner::{scan, ScanOptions, Scanner, Summary};
pub use stream::{Position, Positioned, Tracker};

/// Verifies every record checksum in the file at `path`.
pub fn check_file<P>(path: P, options: ScanOptions) -> Result<Summary>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "checking file");

    check_reader(file, options)
}

/// Verifies every record checksum read from `reader`, in a single buffered pass.
pub fn check_reader<R>(reader: R, options: ScanOptions) -> Result<Summary>
where
    R: Read,
{
    let mut tracker = Tracker::default();
    let mut scanner = Scanner::new(options);

    for input in BufReader::new(reader).bytes() {
        let input = input.map_err(Error::Read)?;
        let position = tracker.advance(input);
        scanner
            .feed(position, input)
            .inspect_err(|e| warn!(%e, "scan stopped"))?;
    }

    let summary = scanner
        .finish(tracker.consumed(), tracker.position())
        .inspect_err(|e| warn!(%e, "scan failed"))?;
    debug!(
        records = summary.records,
        characters = summary.characters,
        lines = summary.lines,
        "all checksums ok"
    );
    Ok(summary)
}

/// Verifies every record checksum in `content`.
pub fn check_bytes(content: &[u8], options: ScanOptions) -> Result<Summary> {
    let summary = scan(content.iter().copied(), options)?;
    debug!(records = summary.records, "all checksums ok");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::{self, Write};

    use tempfile::NamedTempFile;

    const VALID: &str = ":100100002122232425262728292A2B2C2D2E2F3067\n:00000001FF\n";

    #[test]
    fn checks_file_on_disk() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(VALID.as_bytes()).expect("write failed");

        let summary = check_file(file.path(), ScanOptions::default()).expect("check failed");
        assert_eq!(summary.records, 2);
        assert_eq!(summary.lines, 2);
    }

    #[test]
    fn empty_file_on_disk() {
        let file = NamedTempFile::new().expect("temp file");
        assert!(matches!(
            check_file(file.path(), ScanOptions::default()),
            Err(Error::Scan(ScanError::EmptyInput))
        ));
    }

    #[test]
    fn fails_to_read_missing_hex_file() {
        let err = check_file("/path/to/missing.hex", ScanOptions::default()).unwrap_err();
        match err {
            Error::ReadFile { path, source } => {
                assert_eq!(path, Path::new("/path/to/missing.hex"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reader_and_bytes_agree() {
        for input in [VALID, ":01000001FF\n", "hello world", "", ":0a"] {
            let from_reader = check_reader(input.as_bytes(), ScanOptions::default());
            let from_bytes = check_bytes(input.as_bytes(), ScanOptions::default());
            match (from_reader, from_bytes) {
                (Ok(a), Ok(b)) => assert_eq!(a, b),
                (Err(Error::Scan(a)), Err(Error::Scan(b))) => assert_eq!(a, b),
                other => panic!("verdicts differ: {other:?}"),
            }
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device gone"))
        }
    }

    #[test]
    fn read_failure_is_reported() {
        assert!(matches!(
            check_reader(FailingReader, ScanOptions::default()),
            Err(Error::Read(_))
        ));
    }

    #[test]
    fn reader_stops_at_first_error() {
        let input = io::Cursor::new(b":0g\n:00000001FF\n".to_vec());
        let err = check_reader(input, ScanOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Scan(ScanError::MalformedDigit { input: b'g', .. })
        ));
    }
}
