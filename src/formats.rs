//! Point formats, LAS versions and which of them go together.

use std::fmt;

use crate::las::gps::GPS_TIME_SIZE;
use crate::las::nir::Nir;
use crate::las::point0::Point0;
use crate::las::point6::Point6;
use crate::las::rgb::RGB;
use crate::las::wavepacket::LasWavepacket;
use crate::LasError;

/// Lowest minor version of the 1.x family this crate handles
pub const MIN_MINOR_VERSION: u8 = 0;
/// Highest minor version of the 1.x family this crate handles
pub const MAX_MINOR_VERSION: u8 = 5;

/// A LAS version, always 1.x
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Version {
    major: u8,
    minor: u8,
}

impl Version {
    pub const V1_0: Version = Version { major: 1, minor: 0 };
    pub const V1_1: Version = Version { major: 1, minor: 1 };
    pub const V1_2: Version = Version { major: 1, minor: 2 };
    pub const V1_3: Version = Version { major: 1, minor: 3 };
    pub const V1_4: Version = Version { major: 1, minor: 4 };
    pub const V1_5: Version = Version { major: 1, minor: 5 };

    /// Creates a version, failing if it is not one of 1.0 to 1.5
    pub fn new(major: u8, minor: u8) -> crate::Result<Self> {
        if major != 1 || !(MIN_MINOR_VERSION..=MAX_MINOR_VERSION).contains(&minor) {
            return Err(LasError::UnsupportedVersion { major, minor });
        }
        Ok(Self { major, minor })
    }

    pub fn major(&self) -> u8 {
        self.major
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }

    /// The global encoding field exists from 1.2, before it is reserved
    pub fn has_global_encoding(&self) -> bool {
        self.minor >= 2
    }

    pub fn has_waveform_data_start(&self) -> bool {
        self.minor >= 3
    }

    /// 1.4 and later carry 64-bit point counts and extended records
    pub fn has_extended_counts(&self) -> bool {
        self.minor >= 4
    }

    pub fn has_gps_time_range(&self) -> bool {
        self.minor >= 5
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The 11 point record formats
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PointFormat {
    Point0,
    Point1,
    Point2,
    Point3,
    Point4,
    Point5,
    Point6,
    Point7,
    Point8,
    Point9,
    Point10,
}

/// (format, first minor version supporting it)
///
/// Every format stays valid up to the last supported minor version.
const FORMAT_VERSION_TABLE: [(PointFormat, u8); 11] = [
    (PointFormat::Point0, 0),
    (PointFormat::Point1, 0),
    (PointFormat::Point2, 2),
    (PointFormat::Point3, 2),
    (PointFormat::Point4, 3),
    (PointFormat::Point5, 3),
    (PointFormat::Point6, 4),
    (PointFormat::Point7, 4),
    (PointFormat::Point8, 4),
    (PointFormat::Point9, 4),
    (PointFormat::Point10, 4),
];

impl PointFormat {
    pub const ALL: [PointFormat; 11] = [
        PointFormat::Point0,
        PointFormat::Point1,
        PointFormat::Point2,
        PointFormat::Point3,
        PointFormat::Point4,
        PointFormat::Point5,
        PointFormat::Point6,
        PointFormat::Point7,
        PointFormat::Point8,
        PointFormat::Point9,
        PointFormat::Point10,
    ];

    pub fn from_id(id: u8) -> crate::Result<Self> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or(LasError::UnsupportedPointFormat(id))
    }

    /// Looks up the format for an id as found in a file of the given version.
    ///
    /// This is the table the readers and writers use to pick their codec,
    /// ids that exist but are not part of the version are rejected.
    pub fn for_version(id: u8, version: Version) -> crate::Result<Self> {
        let format = Self::from_id(id)?;
        if format.min_version() > version {
            return Err(LasError::FormatNotSupportedByVersion {
                format_id: id,
                version,
            });
        }
        Ok(format)
    }

    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn min_version(&self) -> Version {
        let minor = FORMAT_VERSION_TABLE[self.id() as usize].1;
        Version { major: 1, minor }
    }

    /// Size in bytes of a record, without any extra bytes
    pub fn size(&self) -> usize {
        let base = if self.is_extended() {
            Point6::SIZE
        } else {
            Point0::SIZE
        };
        let mut size = base;
        if self.has_gps_time() && !self.is_extended() {
            size += GPS_TIME_SIZE;
        }
        if self.has_rgb() {
            size += RGB::SIZE;
        }
        if self.has_nir() {
            size += Nir::SIZE;
        }
        if self.has_waveform() {
            size += LasWavepacket::SIZE;
        }
        size
    }

    /// Formats from 6 onwards use the extended bit layout
    pub fn is_extended(&self) -> bool {
        self.id() >= 6
    }

    pub fn has_gps_time(&self) -> bool {
        !matches!(self, PointFormat::Point0 | PointFormat::Point2)
    }

    pub fn has_rgb(&self) -> bool {
        matches!(
            self,
            PointFormat::Point2
                | PointFormat::Point3
                | PointFormat::Point5
                | PointFormat::Point7
                | PointFormat::Point8
                | PointFormat::Point10
        )
    }

    pub fn has_nir(&self) -> bool {
        matches!(self, PointFormat::Point8 | PointFormat::Point10)
    }

    pub fn has_waveform(&self) -> bool {
        matches!(
            self,
            PointFormat::Point4 | PointFormat::Point5 | PointFormat::Point9 | PointFormat::Point10
        )
    }
}

impl fmt::Display for PointFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sizes() {
        let sizes: Vec<usize> = PointFormat::ALL.iter().map(PointFormat::size).collect();
        assert_eq!(sizes, vec![20, 28, 26, 34, 57, 63, 30, 36, 38, 59, 67]);
    }

    #[test]
    fn test_ids_round_trip() {
        for id in 0..=10u8 {
            assert_eq!(PointFormat::from_id(id).unwrap().id(), id);
        }
        assert!(matches!(
            PointFormat::from_id(11),
            Err(LasError::UnsupportedPointFormat(11))
        ));
    }

    #[test]
    fn test_version_gating() {
        assert!(PointFormat::for_version(6, Version::V1_3).is_err());
        assert!(PointFormat::for_version(6, Version::V1_4).is_ok());
        assert!(PointFormat::for_version(2, Version::V1_1).is_err());
        assert!(PointFormat::for_version(3, Version::V1_2).is_ok());
        assert!(PointFormat::for_version(4, Version::V1_2).is_err());
        assert!(PointFormat::for_version(10, Version::V1_5).is_ok());
        assert!(PointFormat::for_version(1, Version::V1_0).is_ok());
    }

    #[test]
    fn test_version_range() {
        assert!(Version::new(1, 5).is_ok());
        assert!(Version::new(1, 6).is_err());
        assert!(Version::new(2, 0).is_err());
        assert!(Version::new(0, 9).is_err());
        assert!(Version::V1_3 < Version::V1_4);
    }
}
