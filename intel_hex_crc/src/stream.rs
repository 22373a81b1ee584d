use std::fmt;

/// 1-based line and column of a character in the input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }

    pub const fn start() -> Self {
        Position::new(1, 1)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Follows the line and column as characters are consumed.
#[derive(Debug, Default, Clone)]
pub struct Tracker {
    next: Position,
    consumed: usize,
}

impl Tracker {
    /// Consumes `input` and returns its position.
    pub fn advance(&mut self, input: u8) -> Position {
        let position = self.next;
        self.consumed += 1;
        if input == b'\n' {
            self.next.line += 1;
            self.next.column = 1;
        } else {
            self.next.column += 1;
        }
        position
    }

    /// Position of the next character, or of the end of the stream once it is exhausted.
    pub fn position(&self) -> Position {
        self.next
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

/// Single-pass iterator adapter yielding each character together with its position.
pub struct Positioned<I> {
    inner: I,
    tracker: Tracker,
}

impl<I> Positioned<I>
where
    I: Iterator<Item = u8>,
{
    pub fn new(inner: I) -> Self {
        Positioned {
            inner,
            tracker: Tracker::default(),
        }
    }

    pub fn position(&self) -> Position {
        self.tracker.position()
    }

    pub fn consumed(&self) -> usize {
        self.tracker.consumed()
    }
}

impl<I> Iterator for Positioned<I>
where
    I: Iterator<Item = u8>,
{
    type Item = (Position, u8);

    fn next(&mut self) -> Option<Self::Item> {
        let input = self.inner.next()?;
        Some((self.tracker.advance(input), input))
    }
}
