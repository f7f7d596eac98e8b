//! The public header block.
//!
//! The header layout grows with the minor version, each layout keeps the
//! previous one as a prefix:
//!
//! | version       | size | adds                                               |
//! |---------------|------|----------------------------------------------------|
//! | 1.0, 1.1, 1.2 | 227  | base layout                                        |
//! | 1.3           | 235  | start of waveform data                             |
//! | 1.4           | 375  | EVLR start & count, 64-bit point counts            |
//! | 1.5           | 393  | min & max GPS time, time offset                    |

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::formats::{PointFormat, Version};
use crate::record::PointRecord;
use crate::LasError;

pub const LAS_SIGNATURE: [u8; 4] = *b"LASF";

/// Number of by-return counts in the 32-bit legacy fields
pub const LEGACY_NUM_RETURNS: usize = 5;
/// Number of by-return counts in the 64-bit fields of 1.4+ headers
pub const EXTENDED_NUM_RETURNS: usize = 15;

/// Byte offset of the EVLR start field (1.4+)
pub const EVLR_START_FIELD_OFFSET: u64 = 235;
/// Byte offset of the EVLR count field (1.4+)
pub const EVLR_COUNT_FIELD_OFFSET: u64 = 243;

/// (first minor version using the layout, header size)
const HEADER_LAYOUTS: [(u8, u16); 4] = [(0, 227), (3, 235), (4, 375), (5, 393)];

/// Size in bytes of the header of the given version
pub fn header_size_for(version: Version) -> u16 {
    HEADER_LAYOUTS
        .iter()
        .rev()
        .find(|(minor, _)| *minor <= version.minor())
        .map(|(_, size)| *size)
        .unwrap_or(HEADER_LAYOUTS[0].1)
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn read_from<R: Read>(src: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            x: src.read_f64::<LittleEndian>()?,
            y: src.read_f64::<LittleEndian>()?,
            z: src.read_f64::<LittleEndian>()?,
        })
    }

    fn write_to<W: Write>(&self, dst: &mut W) -> std::io::Result<()> {
        dst.write_f64::<LittleEndian>(self.x)?;
        dst.write_f64::<LittleEndian>(self.y)?;
        dst.write_f64::<LittleEndian>(self.z)
    }
}

/// Snapshot of the header of a file.
///
/// Obtained by reading a file, or by building one with
/// [`HeaderBuilder`](crate::las::builder::HeaderBuilder).
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderBlock {
    pub(crate) file_source_id: u16,
    pub(crate) global_encoding: u16,
    pub(crate) guid: [u8; 16],
    pub(crate) version: Version,
    pub(crate) system_identifier: [u8; 32],
    pub(crate) generating_software: [u8; 32],
    pub(crate) file_creation_day: u16,
    pub(crate) file_creation_year: u16,
    pub(crate) header_size: u16,
    pub(crate) offset_to_point_data: u32,
    pub(crate) number_of_vlrs: u32,
    pub(crate) point_format: PointFormat,
    pub(crate) point_record_length: u16,
    pub(crate) legacy_number_of_points: u32,
    pub(crate) legacy_number_of_points_by_return: [u32; LEGACY_NUM_RETURNS],
    pub(crate) scale: Vector3,
    pub(crate) offset: Vector3,
    pub(crate) max: Vector3,
    pub(crate) min: Vector3,
    pub(crate) waveform_data_start: u64,
    pub(crate) evlr_start: u64,
    pub(crate) evlr_count: u32,
    pub(crate) number_of_points: u64,
    pub(crate) number_of_points_by_return: [u64; EXTENDED_NUM_RETURNS],
    pub(crate) max_gps_time: f64,
    pub(crate) min_gps_time: f64,
    pub(crate) time_offset: u16,
}

impl HeaderBlock {
    /// Reads the header, leaving `src` at the end of the declared
    /// header size.
    pub fn read_from<R: Read>(src: &mut R) -> crate::Result<Self> {
        let mut signature = [0u8; 4];
        src.read_exact(&mut signature)?;
        if signature != LAS_SIGNATURE {
            return Err(LasError::InvalidFileSignature(signature));
        }
        let file_source_id = src.read_u16::<LittleEndian>()?;
        let global_encoding = src.read_u16::<LittleEndian>()?;
        let mut guid = [0u8; 16];
        src.read_exact(&mut guid)?;
        let major = src.read_u8()?;
        let minor = src.read_u8()?;
        let version = Version::new(major, minor)?;

        let mut system_identifier = [0u8; 32];
        src.read_exact(&mut system_identifier)?;
        let mut generating_software = [0u8; 32];
        src.read_exact(&mut generating_software)?;
        let file_creation_day = src.read_u16::<LittleEndian>()?;
        let file_creation_year = src.read_u16::<LittleEndian>()?;
        let header_size = src.read_u16::<LittleEndian>()?;
        let offset_to_point_data = src.read_u32::<LittleEndian>()?;
        let number_of_vlrs = src.read_u32::<LittleEndian>()?;
        let point_format_id = src.read_u8()?;
        let point_format = PointFormat::for_version(point_format_id, version)?;
        let point_record_length = src.read_u16::<LittleEndian>()?;
        if usize::from(point_record_length) < point_format.size() {
            return Err(LasError::PointRecordLengthTooSmall {
                format_id: point_format_id,
                length: point_record_length,
            });
        }

        let legacy_number_of_points = src.read_u32::<LittleEndian>()?;
        let mut legacy_number_of_points_by_return = [0u32; LEGACY_NUM_RETURNS];
        src.read_u32_into::<LittleEndian>(&mut legacy_number_of_points_by_return)?;

        let scale = Vector3::read_from(src)?;
        let offset = Vector3::read_from(src)?;
        let max_x = src.read_f64::<LittleEndian>()?;
        let min_x = src.read_f64::<LittleEndian>()?;
        let max_y = src.read_f64::<LittleEndian>()?;
        let min_y = src.read_f64::<LittleEndian>()?;
        let max_z = src.read_f64::<LittleEndian>()?;
        let min_z = src.read_f64::<LittleEndian>()?;

        let mut header = Self {
            file_source_id,
            global_encoding,
            guid,
            version,
            system_identifier,
            generating_software,
            file_creation_day,
            file_creation_year,
            header_size,
            offset_to_point_data,
            number_of_vlrs,
            point_format,
            point_record_length,
            legacy_number_of_points,
            legacy_number_of_points_by_return,
            scale,
            offset,
            max: Vector3::new(max_x, max_y, max_z),
            min: Vector3::new(min_x, min_y, min_z),
            waveform_data_start: 0,
            evlr_start: 0,
            evlr_count: 0,
            number_of_points: 0,
            number_of_points_by_return: [0u64; EXTENDED_NUM_RETURNS],
            max_gps_time: 0.0,
            min_gps_time: 0.0,
            time_offset: 0,
        };

        if version.has_waveform_data_start() {
            header.waveform_data_start = src.read_u64::<LittleEndian>()?;
        }
        if version.has_extended_counts() {
            header.evlr_start = src.read_u64::<LittleEndian>()?;
            header.evlr_count = src.read_u32::<LittleEndian>()?;
            header.number_of_points = src.read_u64::<LittleEndian>()?;
            src.read_u64_into::<LittleEndian>(&mut header.number_of_points_by_return)?;
        }
        if version.has_gps_time_range() {
            header.max_gps_time = src.read_f64::<LittleEndian>()?;
            header.min_gps_time = src.read_f64::<LittleEndian>()?;
            header.time_offset = src.read_u16::<LittleEndian>()?;
        }

        // Skip what a newer writer may have appended
        let layout_size = header_size_for(version);
        if header_size > layout_size {
            let to_skip = u64::from(header_size - layout_size);
            let skipped = std::io::copy(&mut src.take(to_skip), &mut std::io::sink())?;
            if skipped < to_skip {
                return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
            }
        }
        header.end_of_point_data()?;
        Ok(header)
    }

    /// Writes the header using the layout of its version
    pub fn write_to<W: Write>(&self, dst: &mut W) -> std::io::Result<()> {
        dst.write_all(&LAS_SIGNATURE)?;
        dst.write_u16::<LittleEndian>(self.file_source_id)?;
        dst.write_u16::<LittleEndian>(self.global_encoding)?;
        dst.write_all(&self.guid)?;
        dst.write_u8(self.version.major())?;
        dst.write_u8(self.version.minor())?;
        dst.write_all(&self.system_identifier)?;
        dst.write_all(&self.generating_software)?;
        dst.write_u16::<LittleEndian>(self.file_creation_day)?;
        dst.write_u16::<LittleEndian>(self.file_creation_year)?;
        dst.write_u16::<LittleEndian>(header_size_for(self.version))?;
        dst.write_u32::<LittleEndian>(self.offset_to_point_data)?;
        dst.write_u32::<LittleEndian>(self.number_of_vlrs)?;
        dst.write_u8(self.point_format.id())?;
        dst.write_u16::<LittleEndian>(self.point_record_length)?;
        dst.write_u32::<LittleEndian>(self.legacy_number_of_points)?;
        for count in &self.legacy_number_of_points_by_return {
            dst.write_u32::<LittleEndian>(*count)?;
        }
        self.scale.write_to(dst)?;
        self.offset.write_to(dst)?;
        dst.write_f64::<LittleEndian>(self.max.x)?;
        dst.write_f64::<LittleEndian>(self.min.x)?;
        dst.write_f64::<LittleEndian>(self.max.y)?;
        dst.write_f64::<LittleEndian>(self.min.y)?;
        dst.write_f64::<LittleEndian>(self.max.z)?;
        dst.write_f64::<LittleEndian>(self.min.z)?;

        if self.version.has_waveform_data_start() {
            dst.write_u64::<LittleEndian>(self.waveform_data_start)?;
        }
        if self.version.has_extended_counts() {
            dst.write_u64::<LittleEndian>(self.evlr_start)?;
            dst.write_u32::<LittleEndian>(self.evlr_count)?;
            dst.write_u64::<LittleEndian>(self.number_of_points)?;
            for count in &self.number_of_points_by_return {
                dst.write_u64::<LittleEndian>(*count)?;
            }
        }
        if self.version.has_gps_time_range() {
            dst.write_f64::<LittleEndian>(self.max_gps_time)?;
            dst.write_f64::<LittleEndian>(self.min_gps_time)?;
            dst.write_u16::<LittleEndian>(self.time_offset)?;
        }
        Ok(())
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn point_format(&self) -> PointFormat {
        self.point_format
    }

    pub fn file_source_id(&self) -> u16 {
        self.file_source_id
    }

    pub fn global_encoding(&self) -> u16 {
        self.global_encoding
    }

    pub fn guid(&self) -> [u8; 16] {
        self.guid
    }

    pub fn system_identifier(&self) -> &[u8; 32] {
        &self.system_identifier
    }

    pub fn generating_software(&self) -> &[u8; 32] {
        &self.generating_software
    }

    /// (day of year, year)
    pub fn file_creation_date(&self) -> (u16, u16) {
        (self.file_creation_day, self.file_creation_year)
    }

    /// Header size as declared by the file
    pub fn header_size(&self) -> u16 {
        self.header_size
    }

    pub fn offset_to_point_data(&self) -> u32 {
        self.offset_to_point_data
    }

    pub fn number_of_vlrs(&self) -> u32 {
        self.number_of_vlrs
    }

    pub fn point_record_length(&self) -> u16 {
        self.point_record_length
    }

    /// Number of bytes following each point record
    pub fn extra_bytes(&self) -> u16 {
        self.point_record_length - self.point_format.size() as u16
    }

    /// The point count, from the 64-bit field for 1.4+
    /// and from the legacy field for older versions
    pub fn number_of_points(&self) -> u64 {
        if self.version.has_extended_counts() {
            self.number_of_points
        } else {
            u64::from(self.legacy_number_of_points)
        }
    }

    /// The count of points with the 1-based `return_number`.
    ///
    /// Returns 0 for return numbers the version cannot count.
    pub fn number_of_points_by_return(&self, return_number: usize) -> u64 {
        if return_number == 0 {
            return 0;
        }
        if self.version.has_extended_counts() {
            self.number_of_points_by_return
                .get(return_number - 1)
                .copied()
                .unwrap_or(0)
        } else {
            self.legacy_number_of_points_by_return
                .get(return_number - 1)
                .map(|&n| u64::from(n))
                .unwrap_or(0)
        }
    }

    pub fn legacy_number_of_points(&self) -> u32 {
        self.legacy_number_of_points
    }

    pub fn legacy_number_of_points_by_return(&self) -> &[u32; LEGACY_NUM_RETURNS] {
        &self.legacy_number_of_points_by_return
    }

    /// The 64-bit by-return counts, all zero before 1.4
    pub fn extended_number_of_points_by_return(&self) -> &[u64; EXTENDED_NUM_RETURNS] {
        &self.number_of_points_by_return
    }

    pub fn scale(&self) -> Vector3 {
        self.scale
    }

    pub fn offset(&self) -> Vector3 {
        self.offset
    }

    pub fn min(&self) -> Vector3 {
        self.min
    }

    pub fn max(&self) -> Vector3 {
        self.max
    }

    pub fn waveform_data_start(&self) -> Option<u64> {
        if self.version.has_waveform_data_start() {
            Some(self.waveform_data_start)
        } else {
            None
        }
    }

    pub fn evlr_start(&self) -> Option<u64> {
        if self.version.has_extended_counts() {
            Some(self.evlr_start)
        } else {
            None
        }
    }

    pub fn evlr_count(&self) -> Option<u32> {
        if self.version.has_extended_counts() {
            Some(self.evlr_count)
        } else {
            None
        }
    }

    /// (min, max) GPS time of the points, 1.5+
    pub fn gps_time_range(&self) -> Option<(f64, f64)> {
        if self.version.has_gps_time_range() {
            Some((self.min_gps_time, self.max_gps_time))
        } else {
            None
        }
    }

    pub fn time_offset(&self) -> Option<u16> {
        if self.version.has_gps_time_range() {
            Some(self.time_offset)
        } else {
            None
        }
    }

    /// Byte offset of the point with the given index,
    /// `None` if it overflows
    pub fn point_offset(&self, index: u64) -> Option<u64> {
        index
            .checked_mul(u64::from(self.point_record_length))?
            .checked_add(u64::from(self.offset_to_point_data))
    }

    /// Offset of the end of the point data, as declared by the header
    pub fn end_of_point_data(&self) -> crate::Result<u64> {
        self.point_offset(self.number_of_points())
            .ok_or_else(|| self.point_count_too_large())
    }

    pub(crate) fn point_count_too_large(&self) -> LasError {
        LasError::PointCountTooLarge {
            count: self.number_of_points(),
            record_length: self.point_record_length,
        }
    }

    /// Real world coordinates of a point
    pub fn transform(&self, point: &PointRecord) -> Vector3 {
        let (x, y, z) = point.xyz();
        Vector3 {
            x: f64::from(x) * self.scale.x + self.offset.x,
            y: f64::from(y) * self.scale.y + self.offset.y,
            z: f64::from(z) * self.scale.z + self.offset.z,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::las::builder::HeaderBuilder;
    use std::io::Cursor;

    #[test]
    fn test_header_size_table() {
        assert_eq!(header_size_for(Version::V1_0), 227);
        assert_eq!(header_size_for(Version::V1_1), 227);
        assert_eq!(header_size_for(Version::V1_2), 227);
        assert_eq!(header_size_for(Version::V1_3), 235);
        assert_eq!(header_size_for(Version::V1_4), 375);
        assert_eq!(header_size_for(Version::V1_5), 393);
    }

    #[test]
    fn test_written_size_matches_table() {
        for minor in 0..=5 {
            let version = Version::new(1, minor).unwrap();
            let header = HeaderBuilder::new(version, PointFormat::Point1)
                .build()
                .unwrap();
            let mut bytes = Vec::new();
            header.write_to(&mut bytes).unwrap();
            assert_eq!(bytes.len(), usize::from(header_size_for(version)));
            assert_eq!(&bytes[94..96], &header_size_for(version).to_le_bytes());
        }
    }

    #[test]
    fn test_field_offsets() {
        let mut builder = HeaderBuilder::new(Version::V1_4, PointFormat::Point6);
        builder.file_source_id = 0x0102;
        builder.set_scale(Vector3::new(0.5, 0.25, 0.125));
        let header = builder.build().unwrap();
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();

        assert_eq!(&bytes[0..4], b"LASF");
        assert_eq!(&bytes[4..6], &[0x02, 0x01]);
        assert_eq!(bytes[24], 1);
        assert_eq!(bytes[25], 4);
        assert_eq!(&bytes[96..100], &375u32.to_le_bytes());
        assert_eq!(bytes[104], 6);
        assert_eq!(&bytes[105..107], &30u16.to_le_bytes());
        assert_eq!(&bytes[131..139], &0.5f64.to_le_bytes());
        assert_eq!(&bytes[147..155], &0.125f64.to_le_bytes());
    }

    #[test]
    fn test_read_write() {
        let mut builder = HeaderBuilder::new(Version::V1_5, PointFormat::Point3);
        builder.set_offset(Vector3::new(100.0, 200.0, 0.0));
        builder.time_offset = 3;
        let header = builder.build().unwrap();
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();

        let read = HeaderBlock::read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(read, header);
        assert_eq!(read.time_offset(), Some(3));
        assert_eq!(read.gps_time_range(), Some((0.0, 0.0)));
    }

    #[test]
    fn test_skips_unknown_header_bytes() {
        let header = HeaderBuilder::new(Version::V1_2, PointFormat::Point0)
            .build()
            .unwrap();
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        bytes[94..96].copy_from_slice(&230u16.to_le_bytes());
        bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);

        let mut cursor = Cursor::new(bytes);
        let read = HeaderBlock::read_from(&mut cursor).unwrap();
        assert_eq!(read.header_size(), 230);
        assert_eq!(cursor.position(), 230);
    }

    #[test]
    fn test_invalid_signature() {
        let mut bytes = vec![0u8; 227];
        bytes[0..4].copy_from_slice(b"LASG");
        assert!(matches!(
            HeaderBlock::read_from(&mut Cursor::new(bytes)),
            Err(LasError::InvalidFileSignature(_))
        ));
    }

    #[test]
    fn test_unmapped_format_is_rejected() {
        let header = HeaderBuilder::new(Version::V1_4, PointFormat::Point6)
            .build()
            .unwrap();
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        bytes[25] = 3;
        assert!(matches!(
            HeaderBlock::read_from(&mut Cursor::new(bytes)),
            Err(LasError::FormatNotSupportedByVersion { format_id: 6, .. })
        ));
    }

    #[test]
    fn test_record_length_too_small() {
        let header = HeaderBuilder::new(Version::V1_2, PointFormat::Point1)
            .build()
            .unwrap();
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        bytes[105..107].copy_from_slice(&20u16.to_le_bytes());
        assert!(matches!(
            HeaderBlock::read_from(&mut Cursor::new(bytes)),
            Err(LasError::PointRecordLengthTooSmall { length: 20, .. })
        ));
    }
}
