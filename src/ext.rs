use std::io::{Error, ErrorKind, Read, Result, Write};

pub trait ExtWriter {
    fn write_u32(&mut self, value: u32) -> Result<()>;
}

impl<W: Write> ExtWriter for W {
    fn write_u32(&mut self, value: u32) -> Result<()> {
        let bytes = value.to_le_bytes();
        self.write_all(&bytes)
    }
}

pub trait ExtReader {
    fn read_u8(&mut self) -> Result<u8>;
    fn skip(&mut self, count: u64) -> Result<()>;
}

impl<R: Read> ExtReader for R {
    fn read_u8(&mut self) -> Result<u8> {
        let mut buffer = [0; 1];
        self.read_exact(&mut buffer)?;
        Ok(buffer[0])
    }

    fn skip(&mut self, count: u64) -> Result<()> {
        let copied = std::io::copy(&mut self.by_ref().take(count), &mut std::io::sink())?;
        if copied < count {
            return Err(Error::from(ErrorKind::UnexpectedEof));
        }
        Ok(())
    }
}
