//! Conversion between any two point formats.
//!
//! A conversion never fails: fields both formats have are copied,
//! fields only the target has are left to zero and fields only the
//! source has are dropped.
//!
//! Rather than one function per (source, target) pair, each format
//! describes which field groups it has ([`PointSource`], [`PointTarget`])
//! and a conversion is the composition of one primitive per group.
//!
//! Crossing the legacy / extended boundary:
//!
//! - legacy to extended: the scan angle rank is converted to 0.006° units,
//!   overlap is false and the scanner channel is 0.
//! - extended to legacy: classification, return number and number of
//!   returns keep their low bits only (5, 3 and 3 bits), overlap and the
//!   scanner channel are dropped and the scan angle is rounded to degrees.
//!
//! ```
//! use las_codec::las::convert::convert;
//! use las_codec::las::pointtypes::{Point3, Point8};
//! use las_codec::las::rgb::RGB;
//!
//! let mut src = Point3::default();
//! src.base.x = 12;
//! src.gps_time = 4.5;
//! src.rgb = RGB::new(1, 2, 3);
//!
//! let dst: Point8 = convert(&src);
//! assert_eq!(dst.base.x, 12);
//! assert_eq!(dst.base.gps_time, 4.5);
//! assert_eq!(dst.rgb, RGB::new(1, 2, 3));
//! assert_eq!(dst.nir.0, 0);
//! ```

use crate::formats::PointFormat;
use crate::las::nir::Nir;
use crate::las::point0::Point0;
use crate::las::point6::Point6;
use crate::las::pointtypes::{
    Point1, Point10, Point2, Point3, Point4, Point5, Point7, Point8, Point9,
};
use crate::las::rgb::RGB;
use crate::las::utils::{
    extended_bits as eb, legacy_bits as lb, legacy_classification_bits as lcb,
    scan_angle_from_rank, scan_angle_rank_from_angle,
};
use crate::las::wavepacket::LasWavepacket;
use crate::packers::Packable;
use crate::record::{LasPoint, PointRecord};
use crate::LasError;

/// The base record of a point, legacy or extended
#[derive(Debug, Copy, Clone)]
pub enum BaseRef<'a> {
    Legacy(&'a Point0),
    Extended(&'a Point6),
}

pub enum BaseMut<'a> {
    Legacy(&'a mut Point0),
    Extended(&'a mut Point6),
}

/// The field groups a point can be converted from
pub trait PointSource {
    fn base(&self) -> BaseRef<'_>;

    fn time(&self) -> Option<f64> {
        None
    }

    fn color(&self) -> Option<RGB> {
        None
    }

    fn near_infrared(&self) -> Option<Nir> {
        None
    }

    fn waveform(&self) -> Option<LasWavepacket> {
        None
    }
}

/// The field groups a point can be converted to
pub trait PointTarget: Default {
    fn base_mut(&mut self) -> BaseMut<'_>;

    fn time_mut(&mut self) -> Option<&mut f64> {
        None
    }

    fn color_mut(&mut self) -> Option<&mut RGB> {
        None
    }

    fn near_infrared_mut(&mut self) -> Option<&mut Nir> {
        None
    }

    fn waveform_mut(&mut self) -> Option<&mut LasWavepacket> {
        None
    }
}

macro_rules! source_methods {
    (legacy_self) => {
        fn base(&self) -> BaseRef<'_> {
            BaseRef::Legacy(self)
        }
    };
    (extended_self) => {
        fn base(&self) -> BaseRef<'_> {
            BaseRef::Extended(self)
        }

        fn time(&self) -> Option<f64> {
            Some(self.gps_time)
        }
    };
    (legacy) => {
        fn base(&self) -> BaseRef<'_> {
            BaseRef::Legacy(&self.base)
        }
    };
    (extended) => {
        fn base(&self) -> BaseRef<'_> {
            BaseRef::Extended(&self.base)
        }

        fn time(&self) -> Option<f64> {
            Some(self.base.gps_time)
        }
    };
    (time) => {
        fn time(&self) -> Option<f64> {
            Some(self.gps_time)
        }
    };
    (color) => {
        fn color(&self) -> Option<RGB> {
            Some(self.rgb)
        }
    };
    (nir) => {
        fn near_infrared(&self) -> Option<Nir> {
            Some(self.nir)
        }
    };
    (waveform) => {
        fn waveform(&self) -> Option<LasWavepacket> {
            Some(self.wavepacket)
        }
    };
}

macro_rules! target_methods {
    (legacy_self) => {
        fn base_mut(&mut self) -> BaseMut<'_> {
            BaseMut::Legacy(self)
        }
    };
    (extended_self) => {
        fn base_mut(&mut self) -> BaseMut<'_> {
            BaseMut::Extended(self)
        }

        fn time_mut(&mut self) -> Option<&mut f64> {
            Some(&mut self.gps_time)
        }
    };
    (legacy) => {
        fn base_mut(&mut self) -> BaseMut<'_> {
            BaseMut::Legacy(&mut self.base)
        }
    };
    (extended) => {
        fn base_mut(&mut self) -> BaseMut<'_> {
            BaseMut::Extended(&mut self.base)
        }

        fn time_mut(&mut self) -> Option<&mut f64> {
            Some(&mut self.base.gps_time)
        }
    };
    (time) => {
        fn time_mut(&mut self) -> Option<&mut f64> {
            Some(&mut self.gps_time)
        }
    };
    (color) => {
        fn color_mut(&mut self) -> Option<&mut RGB> {
            Some(&mut self.rgb)
        }
    };
    (nir) => {
        fn near_infrared_mut(&mut self) -> Option<&mut Nir> {
            Some(&mut self.nir)
        }
    };
    (waveform) => {
        fn waveform_mut(&mut self) -> Option<&mut LasWavepacket> {
            Some(&mut self.wavepacket)
        }
    };
}

macro_rules! impl_field_groups {
    ($($t:ty: $($group:ident),+;)+) => {
        $(
            impl PointSource for $t {
                $(source_methods!($group);)+
            }

            impl PointTarget for $t {
                $(target_methods!($group);)+
            }
        )+
    };
}

impl_field_groups! {
    Point0: legacy_self;
    Point1: legacy, time;
    Point2: legacy, color;
    Point3: legacy, time, color;
    Point4: legacy, time, waveform;
    Point5: legacy, time, color, waveform;
    Point6: extended_self;
    Point7: extended, color;
    Point8: extended, color, nir;
    Point9: extended, waveform;
    Point10: extended, color, nir, waveform;
}

/// Fields every base record has, whatever its bit layout
struct BaseFields {
    x: i32,
    y: i32,
    z: i32,
    intensity: u16,
    return_number: u8,
    number_of_returns: u8,
    scan_direction_flag: bool,
    edge_of_flight_line: bool,
    user_data: u8,
    point_source_id: u16,
    scan: ScanAngle,
}

enum ScanAngle {
    /// 1° units
    Rank(i8),
    /// 0.006° units
    Angle(i16),
}

impl ScanAngle {
    fn rank(&self) -> i8 {
        match *self {
            ScanAngle::Rank(rank) => rank,
            ScanAngle::Angle(angle) => scan_angle_rank_from_angle(angle),
        }
    }

    fn angle(&self) -> i16 {
        match *self {
            ScanAngle::Rank(rank) => scan_angle_from_rank(rank),
            ScanAngle::Angle(angle) => angle,
        }
    }
}

fn extract_base(src: BaseRef) -> BaseFields {
    use crate::las::point6::LasPoint6;
    match src {
        BaseRef::Legacy(p) => BaseFields {
            x: p.x,
            y: p.y,
            z: p.z,
            intensity: p.intensity,
            return_number: p.return_number,
            number_of_returns: p.number_of_returns_of_given_pulse,
            scan_direction_flag: p.scan_direction_flag,
            edge_of_flight_line: p.edge_of_flight_line,
            user_data: p.user_data,
            point_source_id: p.point_source_id,
            scan: ScanAngle::Rank(p.scan_angle_rank),
        },
        BaseRef::Extended(p) => BaseFields {
            x: p.x,
            y: p.y,
            z: p.z,
            intensity: p.intensity,
            return_number: p.return_number(),
            number_of_returns: p.number_of_returns_of_given_pulse(),
            scan_direction_flag: p.scan_direction_flag(),
            edge_of_flight_line: p.edge_of_flight_line(),
            user_data: p.user_data,
            point_source_id: p.point_source_id,
            scan: ScanAngle::Angle(p.scan_angle),
        },
    }
}

/// Copies the geometry, intensity, returns, scan and source fields
pub fn from_base(src: BaseRef, dst: BaseMut) {
    let fields = extract_base(src);
    match dst {
        BaseMut::Legacy(p) => {
            p.x = fields.x;
            p.y = fields.y;
            p.z = fields.z;
            p.intensity = fields.intensity;
            p.return_number = fields.return_number & lb::RETURN_NUMBER_MASK;
            p.number_of_returns_of_given_pulse =
                fields.number_of_returns & (lb::NUMBER_OF_RETURNS_MASK >> lb::NUMBER_OF_RETURNS_SHIFT);
            p.scan_direction_flag = fields.scan_direction_flag;
            p.edge_of_flight_line = fields.edge_of_flight_line;
            p.user_data = fields.user_data;
            p.point_source_id = fields.point_source_id;
            p.scan_angle_rank = fields.scan.rank();
        }
        BaseMut::Extended(p) => {
            p.x = fields.x;
            p.y = fields.y;
            p.z = fields.z;
            p.intensity = fields.intensity;
            p.set_return_number(fields.return_number & eb::RETURN_NUMBER_MASK);
            p.set_number_of_returns(fields.number_of_returns);
            p.set_scan_direction_flag(fields.scan_direction_flag);
            p.set_edge_of_flight_line(fields.edge_of_flight_line);
            p.user_data = fields.user_data;
            p.point_source_id = fields.point_source_id;
            p.scan_angle = fields.scan.angle();
        }
    }
}

/// Copies a legacy classification and its flags.
///
/// An extended target gets overlap = false and scanner channel = 0.
pub fn from_legacy_classification(src: &Point0, dst: BaseMut) {
    match dst {
        BaseMut::Legacy(p) => {
            p.classification = src.classification & lcb::CLASSIFICATION_MASK;
            p.synthetic = src.synthetic;
            p.key_point = src.key_point;
            p.withheld = src.withheld;
        }
        BaseMut::Extended(p) => {
            p.classification = src.classification & lcb::CLASSIFICATION_MASK;
            p.set_synthetic(src.synthetic);
            p.set_key_point(src.key_point);
            p.set_withheld(src.withheld);
            p.set_overlap(false);
            p.set_scanner_channel(0);
        }
    }
}

/// Copies an extended classification and its flags.
///
/// A legacy target only keeps the low 5 bits of the classification,
/// overlap and the scanner channel are dropped.
pub fn from_extended_classification(src: &Point6, dst: BaseMut) {
    use crate::las::point6::LasPoint6;
    match dst {
        BaseMut::Legacy(p) => {
            p.classification = src.classification & lcb::CLASSIFICATION_MASK;
            p.synthetic = src.synthetic();
            p.key_point = src.key_point();
            p.withheld = src.withheld();
        }
        BaseMut::Extended(p) => {
            p.classification = src.classification;
            p.set_synthetic(src.synthetic());
            p.set_key_point(src.key_point());
            p.set_withheld(src.withheld());
            p.set_overlap(src.overlap());
            p.set_scanner_channel(src.scanner_channel());
        }
    }
}

pub fn from_time<S: PointSource + ?Sized, D: PointTarget>(src: &S, dst: &mut D) {
    if let (Some(time), Some(slot)) = (src.time(), dst.time_mut()) {
        *slot = time;
    }
}

pub fn from_color<S: PointSource + ?Sized, D: PointTarget>(src: &S, dst: &mut D) {
    if let (Some(color), Some(slot)) = (src.color(), dst.color_mut()) {
        *slot = color;
    }
}

pub fn from_nir<S: PointSource + ?Sized, D: PointTarget>(src: &S, dst: &mut D) {
    if let (Some(nir), Some(slot)) = (src.near_infrared(), dst.near_infrared_mut()) {
        *slot = nir;
    }
}

pub fn from_waveform<S: PointSource + ?Sized, D: PointTarget>(src: &S, dst: &mut D) {
    if let (Some(waveform), Some(slot)) = (src.waveform(), dst.waveform_mut()) {
        *slot = waveform;
    }
}

/// Converts a point of any format into a point of any other format
pub fn convert<S: PointSource + ?Sized, D: PointTarget>(src: &S) -> D {
    let mut dst = D::default();
    from_base(src.base(), dst.base_mut());
    match src.base() {
        BaseRef::Legacy(p) => from_legacy_classification(p, dst.base_mut()),
        BaseRef::Extended(p) => from_extended_classification(p, dst.base_mut()),
    }
    from_time(src, &mut dst);
    from_color(src, &mut dst);
    from_nir(src, &mut dst);
    from_waveform(src, &mut dst);
    dst
}

/// Converts a record into the given format
pub fn convert_record(src: &PointRecord, format: PointFormat) -> PointRecord {
    match format {
        PointFormat::Point0 => PointRecord::Point0(convert(src)),
        PointFormat::Point1 => PointRecord::Point1(convert(src)),
        PointFormat::Point2 => PointRecord::Point2(convert(src)),
        PointFormat::Point3 => PointRecord::Point3(convert(src)),
        PointFormat::Point4 => PointRecord::Point4(convert(src)),
        PointFormat::Point5 => PointRecord::Point5(convert(src)),
        PointFormat::Point6 => PointRecord::Point6(convert(src)),
        PointFormat::Point7 => PointRecord::Point7(convert(src)),
        PointFormat::Point8 => PointRecord::Point8(convert(src)),
        PointFormat::Point9 => PointRecord::Point9(convert(src)),
        PointFormat::Point10 => PointRecord::Point10(convert(src)),
    }
}

fn check_buffer_len(input: &[u8], format: PointFormat) -> crate::Result<()> {
    if input.len() % format.size() != 0 {
        Err(LasError::BufferLenNotMultipleOfPointSize {
            buffer_len: input.len(),
            point_size: format.size(),
        })
    } else {
        Ok(())
    }
}

fn convert_raw_point(src: &[u8], from: PointFormat, to: PointFormat, dst: &mut [u8]) {
    let record = PointRecord::decode(from, src);
    convert_record(&record, to).encode(dst);
}

/// Converts a buffer of points, `input` must only contain whole points.
pub fn convert_buffer(input: &[u8], from: PointFormat, to: PointFormat) -> crate::Result<Vec<u8>> {
    check_buffer_len(input, from)?;
    let num_points = input.len() / from.size();
    let mut output = vec![0u8; num_points * to.size()];
    for (src, dst) in input
        .chunks_exact(from.size())
        .zip(output.chunks_exact_mut(to.size()))
    {
        convert_raw_point(src, from, to, dst);
    }
    Ok(output)
}

/// Converts a buffer of points using multiple threads.
///
/// Point order is conserved.
#[cfg(feature = "parallel")]
pub fn par_convert_buffer(
    input: &[u8],
    from: PointFormat,
    to: PointFormat,
) -> crate::Result<Vec<u8>> {
    use rayon::prelude::*;

    check_buffer_len(input, from)?;
    let num_points = input.len() / from.size();
    let mut output = vec![0u8; num_points * to.size()];
    input
        .par_chunks(from.size())
        .zip(output.par_chunks_mut(to.size()))
        .for_each(|(src, dst)| convert_raw_point(src, from, to, dst));
    Ok(output)
}

/// Decodes a point of type `S` and re-encodes it as a `D`.
pub fn convert_bytes<S, D>(src: &[u8], dst: &mut [u8])
where
    S: PointSource + LasPoint,
    D: PointTarget + LasPoint,
{
    let point = S::unpack_from(src);
    convert::<S, D>(&point).pack_into(dst);
}

/// Same as [`convert_buffer`], with formats known at compile time.
pub fn convert_points<S, D>(input: &[u8]) -> crate::Result<Vec<u8>>
where
    S: PointSource + LasPoint,
    D: PointTarget + LasPoint,
{
    let (from, to) = (S::FORMAT.size(), D::FORMAT.size());
    check_buffer_len(input, S::FORMAT)?;
    let mut output = vec![0u8; input.len() / from * to];
    for (src, dst) in input.chunks_exact(from).zip(output.chunks_exact_mut(to)) {
        convert_bytes::<S, D>(src, dst);
    }
    Ok(output)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::las::point6::LasPoint6;

    #[test]
    fn test_legacy_to_extended_classification() {
        let src = Point0 {
            classification: 9,
            synthetic: true,
            withheld: true,
            scan_angle_rank: 5,
            return_number: 2,
            number_of_returns_of_given_pulse: 3,
            ..Default::default()
        };
        let dst: Point6 = convert(&src);
        assert_eq!(dst.classification, 9);
        assert!(dst.synthetic());
        assert!(!dst.key_point());
        assert!(dst.withheld());
        assert!(!dst.overlap());
        assert_eq!(dst.scanner_channel(), 0);
        assert_eq!(dst.scan_angle, 833);
        assert_eq!(dst.return_number(), 2);
        assert_eq!(dst.number_of_returns_of_given_pulse(), 3);
        assert_eq!(dst.gps_time, 0.0);
    }

    #[test]
    fn test_extended_to_legacy_truncates() {
        let mut src = Point6 {
            classification: 0b0110_0110,
            scan_angle: -833,
            gps_time: 3.0,
            ..Default::default()
        };
        src.set_overlap(true);
        src.set_scanner_channel(2);
        src.set_key_point(true);
        src.set_return_number(9);
        src.set_number_of_returns(10);

        let dst: Point1 = convert(&src);
        assert_eq!(dst.base.classification, 0b0000_0110);
        assert!(dst.base.key_point);
        assert_eq!(dst.base.scan_angle_rank, -5);
        assert_eq!(dst.base.return_number, 1);
        assert_eq!(dst.base.number_of_returns_of_given_pulse, 2);
        assert_eq!(dst.gps_time, 3.0);

        // converting back does not bring the dropped fields back
        let back: Point6 = convert(&dst);
        assert!(!back.overlap());
        assert_eq!(back.scanner_channel(), 0);
    }

    #[test]
    fn test_buffer_len_is_checked() {
        let input = vec![0u8; Point0::SIZE + 1];
        assert!(matches!(
            convert_buffer(&input, PointFormat::Point0, PointFormat::Point6),
            Err(LasError::BufferLenNotMultipleOfPointSize { .. })
        ));
    }

    #[test]
    fn test_convert_buffer() {
        let mut input = vec![0u8; 2 * Point2::SIZE];
        let mut p = Point2::default();
        p.base.x = 7;
        p.rgb = RGB::new(10, 20, 30);
        p.pack_into(&mut input[..Point2::SIZE]);
        p.base.x = 8;
        p.pack_into(&mut input[Point2::SIZE..]);

        let output = convert_buffer(&input, PointFormat::Point2, PointFormat::Point7).unwrap();
        assert_eq!(output.len(), 2 * Point7::SIZE);
        let first = Point7::unpack_from(&output[..Point7::SIZE]);
        let second = Point7::unpack_from(&output[Point7::SIZE..]);
        assert_eq!(first.base.x, 7);
        assert_eq!(second.base.x, 8);
        assert_eq!(second.rgb, RGB::new(10, 20, 30));
    }

    #[test]
    fn test_convert_bytes() {
        let p = Point3 {
            gps_time: 1.5,
            ..Default::default()
        };
        let mut src = [0u8; Point3::SIZE];
        p.pack_into(&mut src);
        let mut dst = [0u8; Point9::SIZE];
        convert_bytes::<Point3, Point9>(&src, &mut dst);
        assert_eq!(Point9::unpack_from(&dst).base.gps_time, 1.5);
    }

    #[test]
    fn test_convert_points() {
        let points = [
            Point0 {
                x: 1,
                classification: 2,
                ..Default::default()
            },
            Point0 {
                x: 2,
                ..Default::default()
            },
        ];
        let mut input = vec![0u8; 2 * Point0::SIZE];
        for (point, dst) in points.iter().zip(input.chunks_exact_mut(Point0::SIZE)) {
            point.pack_into(dst);
        }

        let output = convert_points::<Point0, Point7>(&input).unwrap();
        assert_eq!(output.len(), 2 * Point7::SIZE);
        assert_eq!(output, convert_buffer(&input, PointFormat::Point0, PointFormat::Point7).unwrap());
        let second = Point7::unpack_from(&output[Point7::SIZE..]);
        assert_eq!(second.base.x, 2);

        assert!(matches!(
            convert_points::<Point0, Point7>(&input[1..]),
            Err(LasError::BufferLenNotMultipleOfPointSize {
                buffer_len: 39,
                point_size: 20
            })
        ));
    }
}
