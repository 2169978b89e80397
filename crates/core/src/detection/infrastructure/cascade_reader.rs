use thiserror::Error;

/// Deepest tree a cascade may declare; deeper trees would allocate
/// unreasonably large node tables from a corrupt header.
pub const MAX_TREE_DEPTH: u32 = 16;

#[derive(Error, Debug, PartialEq)]
pub enum CascadeFormatError {
    #[error("cascade truncated at byte {offset}: needed {needed} more bytes")]
    Truncated { offset: usize, needed: usize },
    #[error("unsupported tree depth {0} (maximum {MAX_TREE_DEPTH})")]
    UnsupportedDepth(u32),
}

/// Little-endian cursor over a packed cascade file.
pub struct CascadeReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> CascadeReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], CascadeFormatError> {
        let remaining = self.bytes.len().saturating_sub(self.offset);
        if remaining < len {
            return Err(CascadeFormatError::Truncated {
                offset: self.offset,
                needed: len - remaining,
            });
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), CascadeFormatError> {
        self.take(len).map(|_| ())
    }

    pub fn read_u32(&mut self) -> Result<u32, CascadeFormatError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_f32(&mut self) -> Result<f32, CascadeFormatError> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_depth(&mut self) -> Result<u32, CascadeFormatError> {
        let depth = self.read_u32()?;
        if depth > MAX_TREE_DEPTH {
            return Err(CascadeFormatError::UnsupportedDepth(depth));
        }
        Ok(depth)
    }

    pub fn read_codes(&mut self, count: usize) -> Result<Vec<i8>, CascadeFormatError> {
        Ok(self.take(count)?.iter().map(|&b| b as i8).collect())
    }

    pub fn read_f32s(&mut self, count: usize, out: &mut Vec<f32>) -> Result<(), CascadeFormatError> {
        let bytes = self.take(count * 4)?;
        out.extend(
            bytes
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        );
        Ok(())
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}
