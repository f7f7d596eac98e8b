//! Async readers and writers, over tokio's io traits.
//!
//! They follow the same protocol as their sync counterparts. Only one
//! read or write is in flight at a time, and the header is expected at
//! the start of the stream.

use std::io::SeekFrom;

use log::{debug, trace, warn};
use tokio::io::{
    AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt, AsyncWrite, AsyncWriteExt,
};

use crate::formats::PointFormat;
use crate::las::header::{HeaderBlock, EVLR_COUNT_FIELD_OFFSET, EVLR_START_FIELD_OFFSET};
use crate::las::vlr::{Evlr, Vlr};
use crate::las::writer::{check_point, prepare_header, EvlrState};
use crate::record::PointRecord;
use crate::LasError;

/// Offset of the header size field, everything up to it has a fixed layout
const HEADER_SIZE_FIELD_END: usize = 96;

async fn skip<R: AsyncRead + Unpin>(src: &mut R, count: u64) -> crate::Result<()> {
    let skipped = tokio::io::copy(&mut src.take(count), &mut tokio::io::sink()).await?;
    if skipped < count {
        return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
    }
    Ok(())
}

pub struct AsyncLasReader<R> {
    src: R,
    header: HeaderBlock,
    vlrs: Vec<Vlr>,
    point_format: PointFormat,
    position: u64,
    end_of_point_data: u64,
    current_index: u64,
    internal_buffer: Vec<u8>,
}

impl<R: AsyncRead + Unpin> AsyncLasReader<R> {
    /// Reads the header and the variable length records.
    pub async fn new(mut src: R) -> crate::Result<Self> {
        let mut header_bytes = vec![0u8; HEADER_SIZE_FIELD_END];
        src.read_exact(&mut header_bytes).await?;
        let header_size = usize::from(u16::from_le_bytes([
            header_bytes[HEADER_SIZE_FIELD_END - 2],
            header_bytes[HEADER_SIZE_FIELD_END - 1],
        ]));
        if header_size > HEADER_SIZE_FIELD_END {
            header_bytes.resize(header_size, 0);
            src.read_exact(&mut header_bytes[HEADER_SIZE_FIELD_END..])
                .await?;
        }
        let header = HeaderBlock::read_from(&mut header_bytes.as_slice())?;
        let mut position = header_bytes.len() as u64;

        let mut vlrs = Vec::new();
        for _ in 0..header.number_of_vlrs() {
            let mut vlr_bytes = vec![0u8; Vlr::HEADER_SIZE];
            src.read_exact(&mut vlr_bytes).await?;
            let data_len = usize::from(u16::from_le_bytes([vlr_bytes[20], vlr_bytes[21]]));
            vlr_bytes.resize(Vlr::HEADER_SIZE + data_len, 0);
            src.read_exact(&mut vlr_bytes[Vlr::HEADER_SIZE..]).await?;
            position += vlr_bytes.len() as u64;
            vlrs.push(Vlr::read_from(&mut vlr_bytes.as_slice())?);
        }

        let offset_to_point_data = u64::from(header.offset_to_point_data());
        let end_of_point_data = header.end_of_point_data()?;
        if position > offset_to_point_data {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "variable length records overlap the point data",
            )
            .into());
        }
        skip(&mut src, offset_to_point_data - position).await?;

        debug!(
            "Opened LAS {} file, point format {}, {} points",
            header.version(),
            header.point_format(),
            header.number_of_points()
        );

        Ok(Self {
            src,
            point_format: header.point_format(),
            end_of_point_data,
            internal_buffer: vec![0u8; usize::from(header.point_record_length())],
            header,
            vlrs,
            position: offset_to_point_data,
            current_index: 0,
        })
    }

    pub fn header(&self) -> &HeaderBlock {
        &self.header
    }

    pub fn vlrs(&self) -> &[Vlr] {
        &self.vlrs
    }

    pub fn extra_bytes(&self) -> &[u8] {
        &self.internal_buffer[self.point_format.size()..]
    }

    /// Reads the next point, `None` when there are no more
    pub async fn read_next(&mut self) -> Option<crate::Result<PointRecord>> {
        if self.current_index >= self.header.number_of_points() {
            return None;
        }
        let record_length = self.internal_buffer.len() as u64;
        if self.position + record_length > self.end_of_point_data {
            return None;
        }
        if let Err(e) = self.src.read_exact(&mut self.internal_buffer).await {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                warn!(
                    "Point data ends after {} points, {} were declared",
                    self.current_index,
                    self.header.number_of_points()
                );
                self.end_of_point_data = self.position;
                return None;
            }
            return Some(Err(e.into()));
        }
        self.position += record_length;
        self.current_index += 1;
        Some(Ok(PointRecord::decode(
            self.point_format,
            &self.internal_buffer,
        )))
    }

    pub fn into_inner(self) -> R {
        self.src
    }
}

impl<R: AsyncRead + AsyncSeek + Unpin> AsyncLasReader<R> {
    pub async fn read_at(&mut self, index: u64) -> crate::Result<PointRecord> {
        let count = self.header.number_of_points();
        if index >= count {
            return Err(LasError::IndexNotFound { index, count });
        }
        trace!("Reading point {}", index);
        let offset = self
            .header
            .point_offset(index)
            .ok_or_else(|| self.header.point_count_too_large())?;
        self.position = self.src.seek(SeekFrom::Start(offset)).await?;
        self.end_of_point_data = self.header.end_of_point_data()?;
        self.current_index = index;
        self.read_next()
            .await
            .unwrap_or(Err(LasError::PointDataTruncated { index }))
    }
}

pub struct AsyncLasWriter<W> {
    dst: W,
    header: Option<HeaderBlock>,
    position: u64,
    internal_buffer: Vec<u8>,
    points_written: u64,
    evlr_state: EvlrState,
}

impl<W: AsyncWrite + Unpin> AsyncLasWriter<W> {
    pub fn new(dst: W) -> Self {
        Self {
            dst,
            header: None,
            position: 0,
            internal_buffer: Vec::new(),
            points_written: 0,
            evlr_state: EvlrState::NoExtendedRecordWritten,
        }
    }

    pub async fn write_header_and_records(
        &mut self,
        header: &HeaderBlock,
        vlrs: &[Vlr],
    ) -> crate::Result<()> {
        if self.header.is_some() {
            return Err(LasError::HeaderAlreadyWritten);
        }
        let header = prepare_header(header, vlrs)?;
        let mut bytes = Vec::with_capacity(header.offset_to_point_data() as usize);
        header.write_to(&mut bytes)?;
        for vlr in vlrs {
            vlr.write_to(&mut bytes)?;
        }
        self.dst.write_all(&bytes).await?;
        self.position += bytes.len() as u64;
        debug!(
            "Wrote LAS {} header, point format {}, {} vlrs",
            header.version(),
            header.point_format(),
            vlrs.len()
        );

        self.internal_buffer = vec![0u8; usize::from(header.point_record_length())];
        self.header = Some(header);
        Ok(())
    }

    pub async fn write_point(
        &mut self,
        record: &PointRecord,
        extra_bytes: &[u8],
    ) -> crate::Result<()> {
        let header = self.header.as_ref().ok_or(LasError::HeaderNotWritten)?;
        check_point(header, record, extra_bytes)?;

        let size = record.size();
        record.encode(&mut self.internal_buffer[..size]);
        self.internal_buffer[size..].copy_from_slice(extra_bytes);
        self.dst.write_all(&self.internal_buffer).await?;
        self.position += self.internal_buffer.len() as u64;
        self.points_written += 1;
        Ok(())
    }

    pub fn header(&self) -> Option<&HeaderBlock> {
        self.header.as_ref()
    }

    pub fn points_written(&self) -> u64 {
        self.points_written
    }

    pub fn evlr_state(&self) -> EvlrState {
        self.evlr_state
    }

    pub async fn flush(&mut self) -> crate::Result<()> {
        self.dst.flush().await?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.dst
    }
}

impl<W: AsyncWrite + AsyncSeek + Unpin> AsyncLasWriter<W> {
    /// Writes an extended record and patches the header,
    /// see [`LasWriter::write_extended_record`](crate::las::writer::LasWriter::write_extended_record)
    pub async fn write_extended_record(&mut self, evlr: &Evlr) -> crate::Result<()> {
        let version = self
            .header
            .as_ref()
            .ok_or(LasError::HeaderNotWritten)?
            .version();
        if !version.has_extended_counts() {
            return Err(LasError::ExtendedRecordsNotSupported(version));
        }

        let mut bytes = Vec::with_capacity(evlr.size() as usize);
        evlr.write_to(&mut bytes)?;
        let record_start = self.position;
        self.dst.write_all(&bytes).await?;
        self.position += bytes.len() as u64;

        let (count, start) = self.evlr_state.after_record_at(record_start);
        if self.evlr_state == EvlrState::NoExtendedRecordWritten {
            self.dst.seek(SeekFrom::Start(EVLR_START_FIELD_OFFSET)).await?;
            self.dst.write_all(&start.to_le_bytes()).await?;
            debug!("Patched evlr start offset to {}", start);
        }
        self.dst.seek(SeekFrom::Start(EVLR_COUNT_FIELD_OFFSET)).await?;
        self.dst.write_all(&count.to_le_bytes()).await?;
        debug!("Patched evlr count to {}", count);
        self.dst.seek(SeekFrom::Start(self.position)).await?;

        if let Some(header) = self.header.as_mut() {
            header.evlr_start = start;
            header.evlr_count = count;
        }
        self.evlr_state = EvlrState::ExtendedRecordsWritten { count, start };
        Ok(())
    }
}
