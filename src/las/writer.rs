//! Writing a LAS file.
//!
//! A file is written in order: the header and the variable length records,
//! then the points, then the extended variable length records.
//!
//! Extended records are only known once the points are written, so their
//! start offset and count in the header are patched each time one is
//! written. This requires the stream to be seekable.

use std::io::{Seek, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use log::debug;

use crate::formats::PointFormat;
use crate::las::header::{
    header_size_for, HeaderBlock, EVLR_COUNT_FIELD_OFFSET, EVLR_START_FIELD_OFFSET,
};
use crate::las::stream::{LasStream, Seekable, Sequential};
use crate::las::vlr::{Evlr, Vlr};
use crate::record::PointRecord;
use crate::LasError;

/// What the header says about extended records
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EvlrState {
    NoExtendedRecordWritten,
    ExtendedRecordsWritten {
        count: u32,
        /// offset, relative to the start of the header, of the first record
        start: u64,
    },
}

impl EvlrState {
    /// (count, start) once one more record, starting at `record_start`,
    /// is written
    pub(crate) fn after_record_at(self, record_start: u64) -> (u32, u64) {
        match self {
            EvlrState::NoExtendedRecordWritten => (1, record_start),
            EvlrState::ExtendedRecordsWritten { count, start } => (count + 1, start),
        }
    }
}

impl Default for EvlrState {
    fn default() -> Self {
        EvlrState::NoExtendedRecordWritten
    }
}

/// Checks the header can be written, and returns it with its
/// offset to point data and number of vlrs matching `vlrs`.
pub(crate) fn prepare_header(header: &HeaderBlock, vlrs: &[Vlr]) -> crate::Result<HeaderBlock> {
    let point_format = PointFormat::for_version(header.point_format().id(), header.version())?;
    if usize::from(header.point_record_length()) < point_format.size() {
        return Err(LasError::PointRecordLengthTooSmall {
            format_id: point_format.id(),
            length: header.point_record_length(),
        });
    }

    let mut vlrs_size = 0u64;
    for vlr in vlrs {
        if vlr.data.len() > usize::from(std::u16::MAX) {
            return Err(LasError::VlrDataTooLarge(vlr.data.len()));
        }
        vlrs_size += vlr.size() as u64;
    }

    let header_size = header_size_for(header.version());
    let offset_to_point_data = u64::from(header_size) + vlrs_size;
    if offset_to_point_data > u64::from(std::u32::MAX) {
        return Err(LasError::HeaderTooLarge(offset_to_point_data));
    }

    let mut header = header.clone();
    header.header_size = header_size;
    header.offset_to_point_data = offset_to_point_data as u32;
    header.number_of_vlrs = vlrs.len() as u32;
    header.evlr_start = 0;
    header.evlr_count = 0;
    header.end_of_point_data()?;
    Ok(header)
}

/// Checks the point matches the format and extra bytes of the header
pub(crate) fn check_point(
    header: &HeaderBlock,
    record: &PointRecord,
    extra_bytes: &[u8],
) -> crate::Result<()> {
    if record.format() != header.point_format() {
        return Err(LasError::PointFormatMismatch {
            expected: header.point_format().id(),
            actual: record.format_id(),
        });
    }
    if extra_bytes.len() != usize::from(header.extra_bytes()) {
        return Err(LasError::ExtraBytesMismatch {
            expected: usize::from(header.extra_bytes()),
            actual: extra_bytes.len(),
        });
    }
    Ok(())
}

pub struct LasWriter<S> {
    stream: S,
    header: Option<HeaderBlock>,
    header_start: u64,
    internal_buffer: Vec<u8>,
    points_written: u64,
    evlr_state: EvlrState,
}

impl<W: Write + Seek> LasWriter<Seekable<W>> {
    /// Creates a writer, the header will be written
    /// at the current position of `dst`.
    pub fn new(dst: W) -> crate::Result<Self> {
        Ok(Self::from_stream(Seekable::new(dst)?))
    }
}

impl<W: Write> LasWriter<Sequential<W>> {
    /// Creates a writer on a destination that cannot seek,
    /// extended records cannot be written with it.
    pub fn sequential(dst: W) -> Self {
        Self::from_stream(Sequential::new(dst))
    }
}

impl<S: LasStream + Write> LasWriter<S> {
    fn from_stream(stream: S) -> Self {
        Self {
            stream,
            header: None,
            header_start: 0,
            internal_buffer: Vec::new(),
            points_written: 0,
            evlr_state: EvlrState::NoExtendedRecordWritten,
        }
    }

    /// Writes the header followed by the variable length records.
    ///
    /// The offset to point data and the number of vlrs of the written header
    /// are computed from `vlrs`, the point record length is the one
    /// of `header`.
    pub fn write_header_and_records(
        &mut self,
        header: &HeaderBlock,
        vlrs: &[Vlr],
    ) -> crate::Result<()> {
        if self.header.is_some() {
            return Err(LasError::HeaderAlreadyWritten);
        }
        let header = prepare_header(header, vlrs)?;

        self.header_start = self.stream.position();
        header.write_to(&mut self.stream)?;
        for vlr in vlrs {
            vlr.write_to(&mut self.stream)?;
        }
        debug!(
            "Wrote LAS {} header, point format {}, {} vlrs, points at offset {}",
            header.version(),
            header.point_format(),
            vlrs.len(),
            header.offset_to_point_data()
        );

        self.internal_buffer = vec![0u8; usize::from(header.point_record_length())];
        self.header = Some(header);
        Ok(())
    }

    /// Writes a point followed by its extra bytes.
    ///
    /// The point must be of the header's format, and `extra_bytes` as long
    /// as the header declares.
    pub fn write_point(&mut self, record: &PointRecord, extra_bytes: &[u8]) -> crate::Result<()> {
        let header = self.header.as_ref().ok_or(LasError::HeaderNotWritten)?;
        check_point(header, record, extra_bytes)?;

        let size = record.size();
        record.encode(&mut self.internal_buffer[..size]);
        self.internal_buffer[size..].copy_from_slice(extra_bytes);
        self.stream.write_all(&self.internal_buffer)?;
        self.points_written += 1;
        Ok(())
    }

    /// Writes an extended record at the current position and patches
    /// the header to account for it.
    ///
    /// The start offset is only patched for the first record,
    /// the count for every record.
    pub fn write_extended_record(&mut self, evlr: &Evlr) -> crate::Result<()> {
        let header = self.header.as_mut().ok_or(LasError::HeaderNotWritten)?;
        if !header.version().has_extended_counts() {
            return Err(LasError::ExtendedRecordsNotSupported(header.version()));
        }
        if !self.stream.can_seek() {
            return Err(LasError::CannotBackPatch);
        }

        let record_start = self.stream.position() - self.header_start;
        evlr.write_to(&mut self.stream)?;
        let end_position = self.stream.position();

        let (count, start) = self.evlr_state.after_record_at(record_start);
        if self.evlr_state == EvlrState::NoExtendedRecordWritten {
            self.stream
                .seek_to(self.header_start + EVLR_START_FIELD_OFFSET)?;
            self.stream.write_u64::<LittleEndian>(start)?;
            debug!("Patched evlr start offset to {}", start);
        }
        self.stream
            .seek_to(self.header_start + EVLR_COUNT_FIELD_OFFSET)?;
        self.stream.write_u32::<LittleEndian>(count)?;
        debug!("Patched evlr count to {}", count);
        self.stream.seek_to(end_position)?;

        header.evlr_start = start;
        header.evlr_count = count;
        self.evlr_state = EvlrState::ExtendedRecordsWritten { count, start };
        Ok(())
    }

    /// The header as written, `None` before
    /// [`write_header_and_records`](Self::write_header_and_records)
    pub fn header(&self) -> Option<&HeaderBlock> {
        self.header.as_ref()
    }

    pub fn points_written(&self) -> u64 {
        self.points_written
    }

    pub fn evlr_state(&self) -> EvlrState {
        self.evlr_state
    }

    pub fn flush(&mut self) -> crate::Result<()> {
        self.stream.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}
