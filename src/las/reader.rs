//! Reading points from a LAS file.

use std::io::{ErrorKind, Read, Seek};

use log::{debug, trace, warn};

use crate::formats::PointFormat;
use crate::las::header::HeaderBlock;
use crate::las::stream::{advance_to, LasStream, Seekable, Sequential};
use crate::las::vlr::{Evlr, Vlr};
use crate::record::PointRecord;
use crate::LasError;

/// Reads the header, the variable length records and the points of a file.
///
/// The header and records are read when the reader is created,
/// points are then read one at a time.
///
/// ```
/// # fn main() -> las_codec::Result<()> {
/// use las_codec::formats::{PointFormat, Version};
/// use las_codec::las::builder::HeaderBuilder;
/// use las_codec::las::reader::LasReader;
/// use las_codec::las::writer::LasWriter;
/// use std::io::Cursor;
///
/// let header = HeaderBuilder::new(Version::V1_2, PointFormat::Point0).build()?;
/// let mut writer = LasWriter::new(Cursor::new(Vec::new()))?;
/// writer.write_header_and_records(&header, &[])?;
/// let bytes = writer.into_inner().into_inner().into_inner();
///
/// let mut reader = LasReader::new(Cursor::new(bytes))?;
/// assert_eq!(reader.header().point_format(), PointFormat::Point0);
/// assert!(reader.read_next().is_none());
/// # Ok(())
/// # }
/// ```
pub struct LasReader<S> {
    stream: S,
    header_start: u64,
    header: HeaderBlock,
    vlrs: Vec<Vlr>,
    evlrs: Vec<Evlr>,
    point_format: PointFormat,
    end_of_point_data: u64,
    current_index: u64,
    internal_buffer: Vec<u8>,
}

impl<R: Read + Seek> LasReader<Seekable<R>> {
    /// Opens a reader on a seekable source, the header must be at its
    /// current position.
    ///
    /// Extended variable length records are read too.
    pub fn new(src: R) -> crate::Result<Self> {
        Self::open(Seekable::new(src)?)
    }
}

impl<R: Read> LasReader<Sequential<R>> {
    /// Opens a reader on a source that cannot seek.
    ///
    /// Extended variable length records, which come after the points,
    /// are not read and [`read_at`](LasReader::read_at) is not available.
    pub fn sequential(src: R) -> crate::Result<Self> {
        Self::open(Sequential::new(src))
    }
}

impl<S: LasStream + Read> LasReader<S> {
    fn open(mut stream: S) -> crate::Result<Self> {
        let header_start = stream.position();
        let header = HeaderBlock::read_from(&mut stream)?;

        // the count is read from the file, it does not size the vec
        let mut vlrs = Vec::new();
        for _ in 0..header.number_of_vlrs() {
            vlrs.push(Vlr::read_from(&mut stream)?);
        }

        let offset_to_point_data = header_start + u64::from(header.offset_to_point_data());
        advance_to(&mut stream, offset_to_point_data)?;

        let declared_end = header_start
            .checked_add(header.end_of_point_data()?)
            .ok_or_else(|| header.point_count_too_large())?;
        let mut end_of_point_data = declared_end;
        let mut evlrs = Vec::new();
        if let Some(len) = stream.stream_len()? {
            if len < declared_end {
                warn!(
                    "The stream ({} bytes) is shorter than the declared end of point data ({})",
                    len, declared_end
                );
                end_of_point_data = len;
            }

            if let (Some(start), Some(count)) = (header.evlr_start(), header.evlr_count()) {
                if count > 0 {
                    stream.seek_to(header_start + start)?;
                    for _ in 0..count {
                        evlrs.push(Evlr::read_from(&mut stream)?);
                    }
                    stream.seek_to(offset_to_point_data)?;
                }
            }
        }

        debug!(
            "Opened LAS {} file, point format {}, {} points of {} bytes at offset {}, {} vlrs, {} evlrs",
            header.version(),
            header.point_format(),
            header.number_of_points(),
            header.point_record_length(),
            header.offset_to_point_data(),
            vlrs.len(),
            evlrs.len()
        );

        let internal_buffer = vec![0u8; usize::from(header.point_record_length())];
        Ok(Self {
            stream,
            header_start,
            point_format: header.point_format(),
            header,
            vlrs,
            evlrs,
            end_of_point_data,
            current_index: 0,
            internal_buffer,
        })
    }

    pub fn header(&self) -> &HeaderBlock {
        &self.header
    }

    pub fn vlrs(&self) -> &[Vlr] {
        &self.vlrs
    }

    /// Always empty for sequential readers
    pub fn evlrs(&self) -> &[Evlr] {
        &self.evlrs
    }

    /// Index of the next point [`read_next`](Self::read_next) reads
    pub fn position(&self) -> u64 {
        self.current_index
    }

    /// The bytes following the last point read, as many as the
    /// header declares extra bytes
    pub fn extra_bytes(&self) -> &[u8] {
        &self.internal_buffer[self.point_format.size()..]
    }

    /// Reads the next point.
    ///
    /// Returns `None` once the declared number of points was read,
    /// or when the point data ends before that.
    pub fn read_next(&mut self) -> Option<crate::Result<PointRecord>> {
        if self.current_index >= self.header.number_of_points() {
            return None;
        }
        let record_length = self.internal_buffer.len() as u64;
        if self.stream.position() + record_length > self.end_of_point_data {
            return None;
        }

        if let Err(e) = self.stream.read_exact(&mut self.internal_buffer) {
            if e.kind() == ErrorKind::UnexpectedEof {
                warn!(
                    "Point data ends after {} points, {} were declared",
                    self.current_index,
                    self.header.number_of_points()
                );
                self.end_of_point_data = self.stream.position();
                return None;
            }
            return Some(Err(e.into()));
        }
        self.current_index += 1;
        Some(Ok(PointRecord::decode(
            self.point_format,
            &self.internal_buffer,
        )))
    }

    /// Reads the point at `index`, the next call to
    /// [`read_next`](Self::read_next) returns the point after it.
    pub fn read_at(&mut self, index: u64) -> crate::Result<PointRecord> {
        if !self.stream.can_seek() {
            return Err(LasError::NoSeek);
        }
        let count = self.header.number_of_points();
        if index >= count {
            return Err(LasError::IndexNotFound { index, count });
        }
        trace!("Reading point {}", index);
        let offset = self
            .header
            .point_offset(index)
            .ok_or_else(|| self.header.point_count_too_large())?;
        self.stream.seek_to(self.header_start + offset)?;
        self.current_index = index;
        self.read_next()
            .unwrap_or(Err(LasError::PointDataTruncated { index }))
    }

    /// Iterates over the remaining points
    pub fn points(&mut self) -> Points<'_, S> {
        Points { reader: self }
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

pub struct Points<'a, S> {
    reader: &'a mut LasReader<S>,
}

impl<'a, S: LasStream + Read> Iterator for Points<'a, S> {
    type Item = crate::Result<PointRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_next()
    }
}
