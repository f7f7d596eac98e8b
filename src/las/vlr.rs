//! Variable length records, before the points, and their extended
//! counterpart, after the points.
//!
//! The payload is kept as opaque bytes.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::LasError;

fn str_to_fixed<const N: usize>(s: &str) -> [u8; N] {
    let mut out = [0u8; N];
    let len = s.len().min(N);
    out[..len].copy_from_slice(&s.as_bytes()[..len]);
    out
}

fn fixed_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(|c| c as u8 == 0)
        .to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vlr {
    pub user_id: [u8; 16],
    pub record_id: u16,
    pub description: [u8; 32],
    pub data: Vec<u8>,
}

impl Vlr {
    /// Size of the envelope preceding the payload
    pub const HEADER_SIZE: usize = 54;

    /// Strings longer than their field (16 and 32 bytes) are cut.
    pub fn new(user_id: &str, record_id: u16, description: &str, data: Vec<u8>) -> Self {
        Self {
            user_id: str_to_fixed(user_id),
            record_id,
            description: str_to_fixed(description),
            data,
        }
    }

    pub fn user_id(&self) -> String {
        fixed_to_string(&self.user_id)
    }

    pub fn description(&self) -> String {
        fixed_to_string(&self.description)
    }

    /// Size in bytes of the whole record, envelope included
    pub fn size(&self) -> usize {
        Self::HEADER_SIZE + self.data.len()
    }

    pub fn read_from<R: Read>(src: &mut R) -> std::io::Result<Self> {
        src.read_u16::<LittleEndian>()?; // reserved
        let mut user_id = [0u8; 16];
        src.read_exact(&mut user_id)?;

        let record_id = src.read_u16::<LittleEndian>()?;
        let record_length = src.read_u16::<LittleEndian>()?;

        let mut description = [0u8; 32];
        src.read_exact(&mut description)?;

        let mut data = vec![0u8; usize::from(record_length)];
        src.read_exact(&mut data)?;

        Ok(Self {
            user_id,
            record_id,
            description,
            data,
        })
    }

    pub fn write_to<W: Write>(&self, dst: &mut W) -> crate::Result<()> {
        if self.data.len() > usize::from(std::u16::MAX) {
            return Err(LasError::VlrDataTooLarge(self.data.len()));
        }
        dst.write_u16::<LittleEndian>(0)?;
        dst.write_all(&self.user_id)?;
        dst.write_u16::<LittleEndian>(self.record_id)?;
        dst.write_u16::<LittleEndian>(self.data.len() as u16)?;
        dst.write_all(&self.description)?;
        dst.write_all(&self.data)?;
        Ok(())
    }
}

/// An extended variable length record, its payload length is a u64
#[derive(Debug, Clone, PartialEq)]
pub struct Evlr {
    pub user_id: [u8; 16],
    pub record_id: u16,
    pub description: [u8; 32],
    pub data: Vec<u8>,
}

impl Evlr {
    pub const HEADER_SIZE: usize = 60;

    pub fn new(user_id: &str, record_id: u16, description: &str, data: Vec<u8>) -> Self {
        Self {
            user_id: str_to_fixed(user_id),
            record_id,
            description: str_to_fixed(description),
            data,
        }
    }

    pub fn user_id(&self) -> String {
        fixed_to_string(&self.user_id)
    }

    pub fn description(&self) -> String {
        fixed_to_string(&self.description)
    }

    pub fn size(&self) -> u64 {
        (Self::HEADER_SIZE + self.data.len()) as u64
    }

    pub fn read_from<R: Read>(src: &mut R) -> std::io::Result<Self> {
        src.read_u16::<LittleEndian>()?; // reserved
        let mut user_id = [0u8; 16];
        src.read_exact(&mut user_id)?;

        let record_id = src.read_u16::<LittleEndian>()?;
        let record_length = src.read_u64::<LittleEndian>()?;

        let mut description = [0u8; 32];
        src.read_exact(&mut description)?;

        // Do not trust the length for the allocation, a corrupted file
        // would make us allocate a huge buffer.
        let mut data = Vec::new();
        src.take(record_length).read_to_end(&mut data)?;
        if (data.len() as u64) < record_length {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }

        Ok(Self {
            user_id,
            record_id,
            description,
            data,
        })
    }

    pub fn write_to<W: Write>(&self, dst: &mut W) -> std::io::Result<()> {
        dst.write_u16::<LittleEndian>(0)?;
        dst.write_all(&self.user_id)?;
        dst.write_u16::<LittleEndian>(self.record_id)?;
        dst.write_u64::<LittleEndian>(self.data.len() as u64)?;
        dst.write_all(&self.description)?;
        dst.write_all(&self.data)?;
        Ok(())
    }
}

impl From<Vlr> for Evlr {
    fn from(vlr: Vlr) -> Self {
        Self {
            user_id: vlr.user_id,
            record_id: vlr.record_id,
            description: vlr.description,
            data: vlr.data,
        }
    }
}
