use std::str::SplitAsciiWhitespace;

use crate::{PlyError, Result, ScalarType, ScalarValue};

/// Reads little-endian values out of a packed buffer.
pub struct BinValReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinValReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    /// Skip `len` bytes. Returns false if that would run past the end.
    pub(crate) fn skip(&mut self, len: usize) -> bool {
        match self.position.checked_add(len) {
            Some(end) if end <= self.data.len() => {
                self.position = end;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.position
    }
}

/// Reads whitespace separated tokens from one ASCII record.
pub struct AsciiValReader<'a> {
    tokens: SplitAsciiWhitespace<'a>,
}

impl<'a> AsciiValReader<'a> {
    pub(crate) fn new(line: &'a str) -> Self {
        Self {
            tokens: line.split_ascii_whitespace(),
        }
    }
}

pub trait ScalarReader {
    fn read_scalar(&mut self, data_type: ScalarType) -> Result<ScalarValue>;

    fn read_row_end(&mut self) -> Result<()>;
}

impl ScalarReader for BinValReader<'_> {
    fn read_scalar(&mut self, data_type: ScalarType) -> Result<ScalarValue> {
        let value = ScalarValue::read_le(self.data, self.position, data_type)
            .ok_or(PlyError::NoPropertyFound)?;
        self.position += data_type.size_bytes();
        Ok(value)
    }

    fn read_row_end(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ScalarReader for AsciiValReader<'_> {
    fn read_scalar(&mut self, data_type: ScalarType) -> Result<ScalarValue> {
        let token = self.tokens.next().ok_or(PlyError::NoPropertyFound)?;
        ScalarValue::parse(token, data_type)
    }

    fn read_row_end(&mut self) -> Result<()> {
        match self.tokens.next() {
            Some(_) => Err(PlyError::TooManyProperties),
            None => Ok(()),
        }
    }
}
