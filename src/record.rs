//! A point record of any of the 11 point formats.

use crate::formats::PointFormat;
use crate::las::classification::Classification;
use crate::las::convert::{convert_record, BaseRef, PointSource};
use crate::las::nir::Nir;
use crate::las::point0::Point0;
use crate::las::point6::{LasPoint6, Point6};
use crate::las::pointtypes::{
    Point1, Point10, Point2, Point3, Point4, Point5, Point7, Point8, Point9,
};
use crate::las::rgb::RGB;
use crate::las::wavepacket::LasWavepacket;
use crate::packers::Packable;

/// Implemented by the concrete point types to know their format
pub trait LasPoint: Packable + Default + Copy + Into<PointRecord> {
    const FORMAT: PointFormat;
}

/// A point of one of the 11 formats
///
/// The on-disk layout of each variant is exactly `format().size()` bytes,
/// little-endian.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointRecord {
    Point0(Point0),
    Point1(Point1),
    Point2(Point2),
    Point3(Point3),
    Point4(Point4),
    Point5(Point5),
    Point6(Point6),
    Point7(Point7),
    Point8(Point8),
    Point9(Point9),
    Point10(Point10),
}

macro_rules! impl_las_point {
    ($($t:ident),+) => {
        $(
            impl LasPoint for $t {
                const FORMAT: PointFormat = PointFormat::$t;
            }

            impl From<$t> for PointRecord {
                fn from(point: $t) -> Self {
                    PointRecord::$t(point)
                }
            }
        )+
    };
}

impl_las_point!(
    Point0, Point1, Point2, Point3, Point4, Point5, Point6, Point7, Point8, Point9, Point10
);

macro_rules! dispatch {
    ($record:expr, $p:ident => $body:expr) => {
        match $record {
            PointRecord::Point0($p) => $body,
            PointRecord::Point1($p) => $body,
            PointRecord::Point2($p) => $body,
            PointRecord::Point3($p) => $body,
            PointRecord::Point4($p) => $body,
            PointRecord::Point5($p) => $body,
            PointRecord::Point6($p) => $body,
            PointRecord::Point7($p) => $body,
            PointRecord::Point8($p) => $body,
            PointRecord::Point9($p) => $body,
            PointRecord::Point10($p) => $body,
        }
    };
}

impl PointRecord {
    /// A zeroed point of the given format
    pub fn default_for(format: PointFormat) -> Self {
        match format {
            PointFormat::Point0 => Point0::default().into(),
            PointFormat::Point1 => Point1::default().into(),
            PointFormat::Point2 => Point2::default().into(),
            PointFormat::Point3 => Point3::default().into(),
            PointFormat::Point4 => Point4::default().into(),
            PointFormat::Point5 => Point5::default().into(),
            PointFormat::Point6 => Point6::default().into(),
            PointFormat::Point7 => Point7::default().into(),
            PointFormat::Point8 => Point8::default().into(),
            PointFormat::Point9 => Point9::default().into(),
            PointFormat::Point10 => Point10::default().into(),
        }
    }

    /// Decodes a point of the given format from the first
    /// `format.size()` bytes of `bytes`.
    ///
    /// # Panics
    ///
    /// If `bytes` is shorter than the format size.
    pub fn decode(format: PointFormat, bytes: &[u8]) -> Self {
        match format {
            PointFormat::Point0 => Point0::unpack_from(bytes).into(),
            PointFormat::Point1 => Point1::unpack_from(bytes).into(),
            PointFormat::Point2 => Point2::unpack_from(bytes).into(),
            PointFormat::Point3 => Point3::unpack_from(bytes).into(),
            PointFormat::Point4 => Point4::unpack_from(bytes).into(),
            PointFormat::Point5 => Point5::unpack_from(bytes).into(),
            PointFormat::Point6 => Point6::unpack_from(bytes).into(),
            PointFormat::Point7 => Point7::unpack_from(bytes).into(),
            PointFormat::Point8 => Point8::unpack_from(bytes).into(),
            PointFormat::Point9 => Point9::unpack_from(bytes).into(),
            PointFormat::Point10 => Point10::unpack_from(bytes).into(),
        }
    }

    /// Encodes the point into the first `self.size()` bytes of `dest`.
    ///
    /// # Panics
    ///
    /// If `dest` is shorter than the format size.
    pub fn encode(&self, dest: &mut [u8]) {
        dispatch!(self, p => p.pack_into(dest))
    }

    /// Encodes the point into a new buffer of `self.size()` bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.size()];
        self.encode(&mut bytes);
        bytes
    }

    pub fn format(&self) -> PointFormat {
        match self {
            PointRecord::Point0(_) => PointFormat::Point0,
            PointRecord::Point1(_) => PointFormat::Point1,
            PointRecord::Point2(_) => PointFormat::Point2,
            PointRecord::Point3(_) => PointFormat::Point3,
            PointRecord::Point4(_) => PointFormat::Point4,
            PointRecord::Point5(_) => PointFormat::Point5,
            PointRecord::Point6(_) => PointFormat::Point6,
            PointRecord::Point7(_) => PointFormat::Point7,
            PointRecord::Point8(_) => PointFormat::Point8,
            PointRecord::Point9(_) => PointFormat::Point9,
            PointRecord::Point10(_) => PointFormat::Point10,
        }
    }

    pub fn format_id(&self) -> u8 {
        self.format().id()
    }

    /// Size of the encoded point in bytes
    pub fn size(&self) -> usize {
        self.format().size()
    }

    /// Converts the point to another format, see [`crate::las::convert`]
    pub fn convert_to(&self, format: PointFormat) -> PointRecord {
        convert_record(self, format)
    }

    /// The legacy base of formats 0 to 5
    pub fn legacy_base(&self) -> Option<&Point0> {
        match self.base() {
            BaseRef::Legacy(p) => Some(p),
            BaseRef::Extended(_) => None,
        }
    }

    /// The extended base of formats 6 to 10
    pub fn extended_base(&self) -> Option<&Point6> {
        match self.base() {
            BaseRef::Legacy(_) => None,
            BaseRef::Extended(p) => Some(p),
        }
    }

    pub fn is_extended(&self) -> bool {
        self.format().is_extended()
    }

    pub fn gps_time(&self) -> Option<f64> {
        self.time()
    }

    pub fn rgb(&self) -> Option<RGB> {
        self.color()
    }

    pub fn nir(&self) -> Option<u16> {
        self.near_infrared().map(|nir| nir.0)
    }

    pub fn wavepacket(&self) -> Option<LasWavepacket> {
        self.waveform()
    }

    /// The raw x, y, z coordinates, before scale and offset
    pub fn xyz(&self) -> (i32, i32, i32) {
        match self.base() {
            BaseRef::Legacy(p) => (p.x, p.y, p.z),
            BaseRef::Extended(p) => (p.x, p.y, p.z),
        }
    }

    pub fn x(&self) -> i32 {
        self.xyz().0
    }

    pub fn y(&self) -> i32 {
        self.xyz().1
    }

    pub fn z(&self) -> i32 {
        self.xyz().2
    }

    pub fn intensity(&self) -> u16 {
        match self.base() {
            BaseRef::Legacy(p) => p.intensity,
            BaseRef::Extended(p) => p.intensity,
        }
    }

    pub fn return_number(&self) -> u8 {
        match self.base() {
            BaseRef::Legacy(p) => p.return_number,
            BaseRef::Extended(p) => p.return_number(),
        }
    }

    pub fn number_of_returns(&self) -> u8 {
        match self.base() {
            BaseRef::Legacy(p) => p.number_of_returns_of_given_pulse,
            BaseRef::Extended(p) => p.number_of_returns_of_given_pulse(),
        }
    }

    /// The classification value, 5 bits for legacy formats
    pub fn classification(&self) -> u8 {
        match self.base() {
            BaseRef::Legacy(p) => p.classification,
            BaseRef::Extended(p) => p.classification,
        }
    }

    pub fn classification_kind(&self) -> Classification {
        match self.base() {
            BaseRef::Legacy(p) => p.classification_kind(),
            BaseRef::Extended(p) => p.classification_kind(),
        }
    }

    /// The legacy classification byte, with the synthetic,
    /// key point and withheld bits
    pub fn raw_classification_byte(&self) -> Option<u8> {
        self.legacy_base().map(Point0::classification_to_byte)
    }

    /// The scan angle in degrees
    pub fn scan_angle_degrees(&self) -> f64 {
        match self.base() {
            BaseRef::Legacy(p) => f64::from(p.scan_angle_rank),
            BaseRef::Extended(p) => {
                f64::from(p.scan_angle) * crate::las::utils::SCAN_ANGLE_UNIT
            }
        }
    }

    pub fn user_data(&self) -> u8 {
        match self.base() {
            BaseRef::Legacy(p) => p.user_data,
            BaseRef::Extended(p) => p.user_data,
        }
    }

    pub fn point_source_id(&self) -> u16 {
        match self.base() {
            BaseRef::Legacy(p) => p.point_source_id,
            BaseRef::Extended(p) => p.point_source_id,
        }
    }
}

impl PointSource for PointRecord {
    fn base(&self) -> BaseRef<'_> {
        dispatch!(self, p => p.base())
    }

    fn time(&self) -> Option<f64> {
        dispatch!(self, p => p.time())
    }

    fn color(&self) -> Option<RGB> {
        dispatch!(self, p => p.color())
    }

    fn near_infrared(&self) -> Option<Nir> {
        dispatch!(self, p => p.near_infrared())
    }

    fn waveform(&self) -> Option<LasWavepacket> {
        dispatch!(self, p => p.waveform())
    }
}
