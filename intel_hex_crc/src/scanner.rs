use tracing::trace;

use crate::error::ScanError;
use crate::hex::{decode_hex_digit, InvalidHexDigit};
use crate::stream::{Position, Positioned};

const START_CODE: u8 = b':';

/// Knobs for the scanner. The default accepts exactly what `hexcrc` has always accepted.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Treat a record cut off by the end of the stream as an error, and verify the
    /// checksum of a final record that was never followed by a terminator.
    pub reject_unterminated: bool,
}

/// What a successful scan went through.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Number of start codes seen.
    pub records: usize,
    pub characters: usize,
    pub lines: usize,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
enum State {
    /// Outside a record, everything is ignored until a start code.
    #[default]
    Comment,
    /// Just after a start code, expecting the high nibble of the first byte.
    NewRecord,
    /// Have the high nibble, expecting the low nibble.
    ByteStart,
    /// A byte is complete; another byte or the end of the record follows.
    ByteEnd,
}

/// Verifies record checksums one character at a time.
#[derive(Debug, Default)]
pub struct Scanner {
    options: ScanOptions,
    state: State,
    byte: u8,
    record_sum: u64,
    records: usize,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Scanner {
            options,
            ..Default::default()
        }
    }

    /// Consumes the character `input` found at `position`.
    pub fn feed(&mut self, position: Position, input: u8) -> Result<(), ScanError> {
        use State::*;
        self.state = match self.state {
            Comment => {
                if input == START_CODE {
                    self.records += 1;
                    NewRecord
                } else {
                    Comment
                }
            }
            NewRecord => {
                let high = expect_digit(position, input)?;
                self.record_sum = 0;
                self.byte = high << 4;
                ByteStart
            }
            ByteStart => {
                self.byte |= expect_digit(position, input)?;
                ByteEnd
            }
            ByteEnd => {
                if let Ok(high) = decode_hex_digit(input) {
                    self.add_byte();
                    self.byte = high << 4;
                    ByteStart
                } else if input == START_CODE {
                    self.add_byte();
                    self.check_record(position)?;
                    self.records += 1;
                    NewRecord
                } else if input.is_ascii_alphanumeric() {
                    return Err(ScanError::MalformedDigit { position, input });
                } else {
                    self.add_byte();
                    self.check_record(position)?;
                    Comment
                }
            }
        };
        Ok(())
    }

    /// Runs the end of stream checks. `consumed` is the number of characters fed and
    /// `end` the position just past the last one.
    pub fn finish(mut self, consumed: usize, end: Position) -> Result<Summary, ScanError> {
        if consumed == 0 {
            return Err(ScanError::EmptyInput);
        }
        if self.records == 0 {
            return Err(ScanError::NoRecord);
        }

        if self.options.reject_unterminated {
            match self.state {
                State::Comment => {}
                State::NewRecord | State::ByteStart => {
                    return Err(ScanError::UnterminatedRecord { position: end });
                }
                State::ByteEnd => {
                    self.add_byte();
                    self.check_record(end)?;
                }
            }
        }

        // A trailing newline does not start another line of content.
        let lines = if end.column == 1 && end.line > 1 {
            end.line - 1
        } else {
            end.line
        };

        Ok(Summary {
            records: self.records,
            characters: consumed,
            lines,
        })
    }

    fn add_byte(&mut self) {
        self.record_sum = self.record_sum.wrapping_add(u64::from(self.byte));
    }

    fn check_record(&self, position: Position) -> Result<(), ScanError> {
        let low_byte = (self.record_sum & 0xff) as u8;
        if low_byte != 0 {
            return Err(ScanError::Checksum { position, low_byte });
        }
        trace!(record = self.records, %position, "record checksum ok");
        Ok(())
    }
}

fn expect_digit(position: Position, input: u8) -> Result<u8, ScanError> {
    decode_hex_digit(input)
        .map_err(|InvalidHexDigit(input)| ScanError::MalformedDigit { position, input })
}

/// Scans `input` in a single pass, stopping at the first error.
pub fn scan<I>(input: I, options: ScanOptions) -> Result<Summary, ScanError>
where
    I: IntoIterator<Item = u8>,
{
    let mut stream = Positioned::new(input.into_iter());
    let mut scanner = Scanner::new(options);
    for (position, input) in stream.by_ref() {
        scanner.feed(position, input)?;
    }
    scanner.finish(stream.consumed(), stream.position())
}
