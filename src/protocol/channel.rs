/// Blocking byte channel to the client

use crate::error::{FlexError, Result};
use crate::format::{CR, MAX_PARAM_LEN};
use std::io::{self, BufReader, BufWriter, Read, Write};

/// Byte-oriented, blocking link to a NetPC client
///
/// Output is buffered and flushed before every read, so a response is on
/// the wire before the server waits for the client's next byte. End of
/// stream on any read is reported as [`FlexError::Disconnected`].
pub struct Channel<R: Read, W: Write> {
    reader: BufReader<R>,
    writer: BufWriter<W>,
}

impl<R: Read, W: Write> Channel<R, W> {
    /// Wrap a reader/writer pair (e.g. a serial device opened twice, or stdin/stdout)
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer: BufWriter::new(writer),
        }
    }

    /// Read one byte, blocking until it arrives
    pub fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_bytes(&mut byte)?;
        Ok(byte[0])
    }

    /// Fill `buf` completely
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.writer.flush()?;
        self.reader.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => FlexError::Disconnected,
            _ => FlexError::Io(e),
        })
    }

    /// Read a CR-terminated parameter
    ///
    /// The CR is not included. Bytes past the first 127 are read and dropped.
    /// There is no timeout: if the CR never comes this blocks until it does
    /// or the stream ends.
    pub fn read_param(&mut self) -> Result<String> {
        let mut param = Vec::with_capacity(MAX_PARAM_LEN);
        loop {
            let byte = self.read_byte()?;
            if byte == CR {
                break;
            }
            if param.len() < MAX_PARAM_LEN {
                param.push(byte);
            }
        }
        Ok(String::from_utf8_lossy(&param).into_owned())
    }

    /// Queue one byte for sending
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.writer.write_all(&[byte])?;
        Ok(())
    }

    /// Queue bytes for sending
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    /// Push queued bytes to the client
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and give back the writer
    pub fn into_writer(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| FlexError::Io(e.into_error()))
    }
}
