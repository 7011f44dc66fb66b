use std::io::Write;

use crate::{Result, ScalarValue};

/// Appends values in their little-endian packed form.
pub struct BinValWriter<W: Write> {
    writer: W,
}

impl<W: Write> BinValWriter<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    pub(crate) fn into_inner(self) -> W {
        self.writer
    }
}

/// Renders values as space separated ASCII, one record per line.
pub struct AsciiValWriter<W: Write> {
    writer: W,
    row_started: bool,
}

impl<W: Write> AsciiValWriter<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self {
            writer,
            row_started: false,
        }
    }
}

pub trait ScalarWriter {
    fn write_scalar(&mut self, value: ScalarValue) -> Result<()>;

    fn write_row_end(&mut self) -> Result<()>;
}

impl<W: Write> ScalarWriter for BinValWriter<W> {
    fn write_scalar(&mut self, value: ScalarValue) -> Result<()> {
        let mut bytes = [0u8; 8];
        let width = value.data_type().size_bytes();
        // 8 bytes holds the widest scalar.
        let _ = value.write_le(&mut bytes, 0);
        self.writer.write_all(&bytes[..width])?;
        Ok(())
    }

    fn write_row_end(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<W: Write> ScalarWriter for AsciiValWriter<W> {
    fn write_scalar(&mut self, value: ScalarValue) -> Result<()> {
        if self.row_started {
            self.writer.write_all(b" ")?;
        }
        write!(self.writer, "{value}")?;
        self.row_started = true;
        Ok(())
    }

    fn write_row_end(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        self.row_started = false;
        Ok(())
    }
}
