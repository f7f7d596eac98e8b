//! Definitions of error related things.

use crate::formats::Version;
use std::fmt;

/// Errors of this crate
#[derive(Debug)]
#[non_exhaustive]
pub enum LasError {
    /// The first four bytes of the header are not `LASF`
    InvalidFileSignature([u8; 4]),
    /// The version is not 1.x with a minor in the supported range
    UnsupportedVersion { major: u8, minor: u8 },
    /// A by-return point count array does not have the length the layout requires
    InvalidByReturnLength { expected: usize, actual: usize },
    /// The point format id is not one of the 11 known formats
    UnsupportedPointFormat(u8),
    /// The point format exists but cannot be used with this version
    FormatNotSupportedByVersion { format_id: u8, version: Version },
    /// The point record length declared is smaller than the format size
    PointRecordLengthTooSmall { format_id: u8, length: u16 },
    /// The writer was given a point whose format differs from the header's
    PointFormatMismatch { expected: u8, actual: u8 },
    /// The extra bytes given alongside a point do not match the header
    ExtraBytesMismatch { expected: usize, actual: usize },
    /// The requested point index is outside the declared point count
    IndexNotFound { index: u64, count: u64 },
    /// The requested point index is declared but its bytes are missing
    PointDataTruncated { index: u64 },
    /// Extended records need a seekable stream so the header can be patched
    CannotBackPatch,
    /// Extended records only exist in version 1.4 and later
    ExtendedRecordsNotSupported(Version),
    /// Points or extended records were written before the header
    HeaderNotWritten,
    /// The header and records can only be written once
    HeaderAlreadyWritten,
    /// A variable length record payload does not fit in its u16 length field
    VlrDataTooLarge(usize),
    /// The offset to point data does not fit in its u32 field
    HeaderTooLarge(u64),
    /// The end of the declared point data does not fit in a 64 bit offset
    PointCountTooLarge { count: u64, record_length: u16 },
    /// Random access was requested on a stream that cannot seek
    NoSeek,
    /// The point buffer does not hold a whole number of points
    BufferLenNotMultipleOfPointSize {
        buffer_len: usize,
        point_size: usize,
    },
    /// Wrapper around and io error from the std lib
    IoError(std::io::Error),
}

impl From<std::io::Error> for LasError {
    fn from(e: std::io::Error) -> Self {
        LasError::IoError(e)
    }
}

impl fmt::Display for LasError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            LasError::InvalidFileSignature(signature) => {
                write!(f, "Invalid file signature: {:?}", signature)
            }
            LasError::UnsupportedVersion { major, minor } => {
                write!(f, "Version {}.{} is not supported", major, minor)
            }
            LasError::InvalidByReturnLength { expected, actual } => write!(
                f,
                "Point counts by return must have {} elements, got {}",
                expected, actual
            ),
            LasError::UnsupportedPointFormat(id) => {
                write!(f, "Point format {} is not supported", id)
            }
            LasError::FormatNotSupportedByVersion { format_id, version } => write!(
                f,
                "Point format {} is not supported by version {}",
                format_id, version
            ),
            LasError::PointRecordLengthTooSmall { format_id, length } => write!(
                f,
                "Point record length {} is too small for point format {}",
                length, format_id
            ),
            LasError::PointFormatMismatch { expected, actual } => write!(
                f,
                "Expected a point of format {}, got format {}",
                expected, actual
            ),
            LasError::ExtraBytesMismatch { expected, actual } => write!(
                f,
                "Expected {} extra bytes per point, got {}",
                expected, actual
            ),
            LasError::IndexNotFound { index, count } => write!(
                f,
                "Point index {} not found, the file declares {} points",
                index, count
            ),
            LasError::PointDataTruncated { index } => {
                write!(f, "The data of point {} is missing from the stream", index)
            }
            LasError::CannotBackPatch => write!(
                f,
                "Extended records require a seekable stream to patch the header"
            ),
            LasError::ExtendedRecordsNotSupported(version) => write!(
                f,
                "Extended variable length records are not supported by version {}",
                version
            ),
            LasError::HeaderNotWritten => write!(f, "The header has not been written yet"),
            LasError::HeaderAlreadyWritten => write!(f, "The header was already written"),
            LasError::VlrDataTooLarge(len) => write!(
                f,
                "Vlr data of {} bytes does not fit in a variable length record",
                len
            ),
            LasError::PointCountTooLarge {
                count,
                record_length,
            } => write!(
                f,
                "{} points of {} bytes do not fit in a file",
                count, record_length
            ),
            LasError::HeaderTooLarge(offset) => {
                write!(f, "Offset to point data {} does not fit in 32 bits", offset)
            }
            LasError::NoSeek => write!(f, "The stream does not support seeking"),
            LasError::BufferLenNotMultipleOfPointSize {
                buffer_len: bl,
                point_size: ps,
            } => write!(
                f,
                "The len of the buffer ({}) is not a multiple of the point size {}",
                bl, ps
            ),
            LasError::IoError(e) => write!(f, "IoError: {}", e),
        }
    }
}

impl std::error::Error for LasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LasError::IoError(e) => Some(e),
            _ => None,
        }
    }
}
