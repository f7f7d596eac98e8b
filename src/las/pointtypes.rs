//! The composite point formats, built from a base record
//! (format 0 or format 6) and optional field groups.

use crate::las::gps::{LasGpsTime, GPS_TIME_SIZE};
use crate::las::nir::{LasNIR, Nir};
use crate::las::point0::{LasPoint0, Point0};
use crate::las::point6::{LasPoint6, Point6};
use crate::las::rgb::{LasRGB, RGB};
use crate::las::wavepacket::{LasWavepacket, LasWavepacketFields};
use crate::packers::Packable;

pub trait Point0Based {
    fn point0(&self) -> &Point0;
}

pub trait Point6Based {
    fn point6(&self) -> &Point6;
}

macro_rules! impl_point0_based {
    ($($t:ty),+) => {
        $(
            impl Point0Based for $t {
                fn point0(&self) -> &Point0 {
                    &self.base
                }
            }
        )+
    };
}

macro_rules! impl_point6_based {
    ($($t:ty),+) => {
        $(
            impl Point6Based for $t {
                fn point6(&self) -> &Point6 {
                    &self.base
                }
            }

            impl LasGpsTime for $t {
                fn gps_time(&self) -> f64 {
                    self.base.gps_time
                }
            }
        )+
    };
}

macro_rules! impl_gps_time {
    ($($t:ty),+) => {
        $(
            impl LasGpsTime for $t {
                fn gps_time(&self) -> f64 {
                    self.gps_time
                }
            }
        )+
    };
}

macro_rules! impl_rgb {
    ($($t:ty),+) => {
        $(
            impl LasRGB for $t {
                fn red(&self) -> u16 {
                    self.rgb.red
                }

                fn green(&self) -> u16 {
                    self.rgb.green
                }

                fn blue(&self) -> u16 {
                    self.rgb.blue
                }
            }
        )+
    };
}

macro_rules! impl_nir {
    ($($t:ty),+) => {
        $(
            impl LasNIR for $t {
                fn nir(&self) -> u16 {
                    self.nir.0
                }
            }
        )+
    };
}

macro_rules! impl_wavepacket {
    ($($t:ty),+) => {
        $(
            impl LasWavepacketFields for $t {
                fn wavepacket(&self) -> LasWavepacket {
                    self.wavepacket
                }
            }
        )+
    };
}

impl_point0_based!(Point1, Point2, Point3, Point4, Point5);
impl_point6_based!(Point7, Point8, Point9, Point10);
impl_gps_time!(Point1, Point3, Point4, Point5);
impl_rgb!(Point2, Point3, Point5, Point7, Point8, Point10);
impl_nir!(Point8, Point10);
impl_wavepacket!(Point4, Point5, Point9, Point10);

/***************************************************************************************************
                    Point Format 1
***************************************************************************************************/

/// Point format 1: format 0 with GPS time
#[derive(Default, Debug, PartialEq, Copy, Clone)]
pub struct Point1 {
    pub base: Point0,
    pub gps_time: f64,
}

impl Point1 {
    pub const SIZE: usize = 28;
}

impl Packable for Point1 {
    fn unpack_from(input: &[u8]) -> Self {
        assert!(
            input.len() >= Self::SIZE,
            "Point1::unpack_from expected buffer of 28 bytes"
        );
        let start = Point0::SIZE;
        let gps_time = f64::unpack_from(&input[start..start + GPS_TIME_SIZE]);
        Self {
            base: Point0::unpack_from(&input[..Point0::SIZE]),
            gps_time,
        }
    }

    fn pack_into(&self, output: &mut [u8]) {
        assert!(
            output.len() >= Self::SIZE,
            "Point1::pack_into expected buffer of 28 bytes"
        );
        self.base.pack_into(&mut output[..Point0::SIZE]);
        let start = Point0::SIZE;
        self.gps_time.pack_into(&mut output[start..start + GPS_TIME_SIZE]);
    }
}

/***************************************************************************************************
                    Point Format 2
***************************************************************************************************/

/// Point format 2: format 0 with RGB colors
#[derive(Default, Debug, PartialEq, Copy, Clone)]
pub struct Point2 {
    pub base: Point0,
    pub rgb: RGB,
}

impl Point2 {
    pub const SIZE: usize = 26;
}

impl Packable for Point2 {
    fn unpack_from(input: &[u8]) -> Self {
        assert!(
            input.len() >= Self::SIZE,
            "Point2::unpack_from expected buffer of 26 bytes"
        );
        let start = Point0::SIZE;
        let rgb = RGB::unpack_from(&input[start..start + RGB::SIZE]);
        Self {
            base: Point0::unpack_from(&input[..Point0::SIZE]),
            rgb,
        }
    }

    fn pack_into(&self, output: &mut [u8]) {
        assert!(
            output.len() >= Self::SIZE,
            "Point2::pack_into expected buffer of 26 bytes"
        );
        self.base.pack_into(&mut output[..Point0::SIZE]);
        let start = Point0::SIZE;
        self.rgb.pack_into(&mut output[start..start + RGB::SIZE]);
    }
}

/***************************************************************************************************
                    Point Format 3
***************************************************************************************************/

/// Point format 3: format 0 with GPS time and RGB colors
#[derive(Default, Debug, PartialEq, Copy, Clone)]
pub struct Point3 {
    pub base: Point0,
    pub gps_time: f64,
    pub rgb: RGB,
}

impl Point3 {
    pub const SIZE: usize = 34;
}

impl Packable for Point3 {
    fn unpack_from(input: &[u8]) -> Self {
        assert!(
            input.len() >= Self::SIZE,
            "Point3::unpack_from expected buffer of 34 bytes"
        );
        let mut start = Point0::SIZE;
        let gps_time = f64::unpack_from(&input[start..start + GPS_TIME_SIZE]);
        start += GPS_TIME_SIZE;
        let rgb = RGB::unpack_from(&input[start..start + RGB::SIZE]);
        Self {
            base: Point0::unpack_from(&input[..Point0::SIZE]),
            gps_time,
            rgb,
        }
    }

    fn pack_into(&self, output: &mut [u8]) {
        assert!(
            output.len() >= Self::SIZE,
            "Point3::pack_into expected buffer of 34 bytes"
        );
        self.base.pack_into(&mut output[..Point0::SIZE]);
        let mut start = Point0::SIZE;
        self.gps_time.pack_into(&mut output[start..start + GPS_TIME_SIZE]);
        start += GPS_TIME_SIZE;
        self.rgb.pack_into(&mut output[start..start + RGB::SIZE]);
    }
}

/***************************************************************************************************
                    Point Format 4
***************************************************************************************************/

/// Point format 4: format 1 with a wave packet
#[derive(Default, Debug, PartialEq, Copy, Clone)]
pub struct Point4 {
    pub base: Point0,
    pub gps_time: f64,
    pub wavepacket: LasWavepacket,
}

impl Point4 {
    pub const SIZE: usize = 57;
}

impl Packable for Point4 {
    fn unpack_from(input: &[u8]) -> Self {
        assert!(
            input.len() >= Self::SIZE,
            "Point4::unpack_from expected buffer of 57 bytes"
        );
        let mut start = Point0::SIZE;
        let gps_time = f64::unpack_from(&input[start..start + GPS_TIME_SIZE]);
        start += GPS_TIME_SIZE;
        let wavepacket = LasWavepacket::unpack_from(&input[start..start + LasWavepacket::SIZE]);
        Self {
            base: Point0::unpack_from(&input[..Point0::SIZE]),
            gps_time,
            wavepacket,
        }
    }

    fn pack_into(&self, output: &mut [u8]) {
        assert!(
            output.len() >= Self::SIZE,
            "Point4::pack_into expected buffer of 57 bytes"
        );
        self.base.pack_into(&mut output[..Point0::SIZE]);
        let mut start = Point0::SIZE;
        self.gps_time.pack_into(&mut output[start..start + GPS_TIME_SIZE]);
        start += GPS_TIME_SIZE;
        self.wavepacket.pack_into(&mut output[start..start + LasWavepacket::SIZE]);
    }
}

/***************************************************************************************************
                    Point Format 5
***************************************************************************************************/

/// Point format 5: format 3 with a wave packet
#[derive(Default, Debug, PartialEq, Copy, Clone)]
pub struct Point5 {
    pub base: Point0,
    pub gps_time: f64,
    pub rgb: RGB,
    pub wavepacket: LasWavepacket,
}

impl Point5 {
    pub const SIZE: usize = 63;
}

impl Packable for Point5 {
    fn unpack_from(input: &[u8]) -> Self {
        assert!(
            input.len() >= Self::SIZE,
            "Point5::unpack_from expected buffer of 63 bytes"
        );
        let mut start = Point0::SIZE;
        let gps_time = f64::unpack_from(&input[start..start + GPS_TIME_SIZE]);
        start += GPS_TIME_SIZE;
        let rgb = RGB::unpack_from(&input[start..start + RGB::SIZE]);
        start += RGB::SIZE;
        let wavepacket = LasWavepacket::unpack_from(&input[start..start + LasWavepacket::SIZE]);
        Self {
            base: Point0::unpack_from(&input[..Point0::SIZE]),
            gps_time,
            rgb,
            wavepacket,
        }
    }

    fn pack_into(&self, output: &mut [u8]) {
        assert!(
            output.len() >= Self::SIZE,
            "Point5::pack_into expected buffer of 63 bytes"
        );
        self.base.pack_into(&mut output[..Point0::SIZE]);
        let mut start = Point0::SIZE;
        self.gps_time.pack_into(&mut output[start..start + GPS_TIME_SIZE]);
        start += GPS_TIME_SIZE;
        self.rgb.pack_into(&mut output[start..start + RGB::SIZE]);
        start += RGB::SIZE;
        self.wavepacket.pack_into(&mut output[start..start + LasWavepacket::SIZE]);
    }
}

/***************************************************************************************************
                    Point Format 7
***************************************************************************************************/

/// Point format 7: format 6 with RGB colors
#[derive(Default, Debug, PartialEq, Copy, Clone)]
pub struct Point7 {
    pub base: Point6,
    pub rgb: RGB,
}

impl Point7 {
    pub const SIZE: usize = 36;
}

impl Packable for Point7 {
    fn unpack_from(input: &[u8]) -> Self {
        assert!(
            input.len() >= Self::SIZE,
            "Point7::unpack_from expected buffer of 36 bytes"
        );
        let start = Point6::SIZE;
        let rgb = RGB::unpack_from(&input[start..start + RGB::SIZE]);
        Self {
            base: Point6::unpack_from(&input[..Point6::SIZE]),
            rgb,
        }
    }

    fn pack_into(&self, output: &mut [u8]) {
        assert!(
            output.len() >= Self::SIZE,
            "Point7::pack_into expected buffer of 36 bytes"
        );
        self.base.pack_into(&mut output[..Point6::SIZE]);
        let start = Point6::SIZE;
        self.rgb.pack_into(&mut output[start..start + RGB::SIZE]);
    }
}

/***************************************************************************************************
                    Point Format 8
***************************************************************************************************/

/// Point format 8: format 7 with near infrared
#[derive(Default, Debug, PartialEq, Copy, Clone)]
pub struct Point8 {
    pub base: Point6,
    pub rgb: RGB,
    pub nir: Nir,
}

impl Point8 {
    pub const SIZE: usize = 38;
}

impl Packable for Point8 {
    fn unpack_from(input: &[u8]) -> Self {
        assert!(
            input.len() >= Self::SIZE,
            "Point8::unpack_from expected buffer of 38 bytes"
        );
        let mut start = Point6::SIZE;
        let rgb = RGB::unpack_from(&input[start..start + RGB::SIZE]);
        start += RGB::SIZE;
        let nir = Nir::unpack_from(&input[start..start + Nir::SIZE]);
        Self {
            base: Point6::unpack_from(&input[..Point6::SIZE]),
            rgb,
            nir,
        }
    }

    fn pack_into(&self, output: &mut [u8]) {
        assert!(
            output.len() >= Self::SIZE,
            "Point8::pack_into expected buffer of 38 bytes"
        );
        self.base.pack_into(&mut output[..Point6::SIZE]);
        let mut start = Point6::SIZE;
        self.rgb.pack_into(&mut output[start..start + RGB::SIZE]);
        start += RGB::SIZE;
        self.nir.pack_into(&mut output[start..start + Nir::SIZE]);
    }
}

/***************************************************************************************************
                    Point Format 9
***************************************************************************************************/

/// Point format 9: format 6 with a wave packet
#[derive(Default, Debug, PartialEq, Copy, Clone)]
pub struct Point9 {
    pub base: Point6,
    pub wavepacket: LasWavepacket,
}

impl Point9 {
    pub const SIZE: usize = 59;
}

impl Packable for Point9 {
    fn unpack_from(input: &[u8]) -> Self {
        assert!(
            input.len() >= Self::SIZE,
            "Point9::unpack_from expected buffer of 59 bytes"
        );
        let start = Point6::SIZE;
        let wavepacket = LasWavepacket::unpack_from(&input[start..start + LasWavepacket::SIZE]);
        Self {
            base: Point6::unpack_from(&input[..Point6::SIZE]),
            wavepacket,
        }
    }

    fn pack_into(&self, output: &mut [u8]) {
        assert!(
            output.len() >= Self::SIZE,
            "Point9::pack_into expected buffer of 59 bytes"
        );
        self.base.pack_into(&mut output[..Point6::SIZE]);
        let start = Point6::SIZE;
        self.wavepacket.pack_into(&mut output[start..start + LasWavepacket::SIZE]);
    }
}

/***************************************************************************************************
                    Point Format 10
***************************************************************************************************/

/// Point format 10: format 8 with a wave packet
#[derive(Default, Debug, PartialEq, Copy, Clone)]
pub struct Point10 {
    pub base: Point6,
    pub rgb: RGB,
    pub nir: Nir,
    pub wavepacket: LasWavepacket,
}

impl Point10 {
    pub const SIZE: usize = 67;
}

impl Packable for Point10 {
    fn unpack_from(input: &[u8]) -> Self {
        assert!(
            input.len() >= Self::SIZE,
            "Point10::unpack_from expected buffer of 67 bytes"
        );
        let mut start = Point6::SIZE;
        let rgb = RGB::unpack_from(&input[start..start + RGB::SIZE]);
        start += RGB::SIZE;
        let nir = Nir::unpack_from(&input[start..start + Nir::SIZE]);
        start += Nir::SIZE;
        let wavepacket = LasWavepacket::unpack_from(&input[start..start + LasWavepacket::SIZE]);
        Self {
            base: Point6::unpack_from(&input[..Point6::SIZE]),
            rgb,
            nir,
            wavepacket,
        }
    }

    fn pack_into(&self, output: &mut [u8]) {
        assert!(
            output.len() >= Self::SIZE,
            "Point10::pack_into expected buffer of 67 bytes"
        );
        self.base.pack_into(&mut output[..Point6::SIZE]);
        let mut start = Point6::SIZE;
        self.rgb.pack_into(&mut output[start..start + RGB::SIZE]);
        start += RGB::SIZE;
        self.nir.pack_into(&mut output[start..start + Nir::SIZE]);
        start += Nir::SIZE;
        self.wavepacket.pack_into(&mut output[start..start + LasWavepacket::SIZE]);
    }
}

/***************************************************************************************************
                    Auto implementation of some traits
***************************************************************************************************/

impl<T: Point0Based> LasPoint0 for T {
    fn x(&self) -> i32 {
        self.point0().x()
    }

    fn y(&self) -> i32 {
        self.point0().y()
    }

    fn z(&self) -> i32 {
        self.point0().z()
    }

    fn intensity(&self) -> u16 {
        self.point0().intensity()
    }

    fn bit_fields(&self) -> u8 {
        self.point0().bit_fields()
    }

    fn return_number(&self) -> u8 {
        self.point0().return_number()
    }

    fn number_of_returns_of_given_pulse(&self) -> u8 {
        self.point0().number_of_returns_of_given_pulse()
    }

    fn scan_direction_flag(&self) -> bool {
        self.point0().scan_direction_flag()
    }

    fn edge_of_flight_line(&self) -> bool {
        self.point0().edge_of_flight_line()
    }

    fn classification_byte(&self) -> u8 {
        self.point0().classification_byte()
    }

    fn classification(&self) -> u8 {
        self.point0().classification()
    }

    fn synthetic(&self) -> bool {
        self.point0().synthetic()
    }

    fn key_point(&self) -> bool {
        self.point0().key_point()
    }

    fn withheld(&self) -> bool {
        self.point0().withheld()
    }

    fn scan_angle_rank(&self) -> i8 {
        self.point0().scan_angle_rank()
    }

    fn user_data(&self) -> u8 {
        self.point0().user_data()
    }

    fn point_source_id(&self) -> u16 {
        self.point0().point_source_id()
    }
}

impl<T: Point6Based> LasPoint6 for T {
    fn x(&self) -> i32 {
        self.point6().x()
    }

    fn y(&self) -> i32 {
        self.point6().y()
    }

    fn z(&self) -> i32 {
        self.point6().z()
    }

    fn intensity(&self) -> u16 {
        self.point6().intensity()
    }

    fn bit_fields(&self) -> u8 {
        self.point6().bit_fields()
    }

    fn return_number(&self) -> u8 {
        self.point6().return_number()
    }

    fn number_of_returns_of_given_pulse(&self) -> u8 {
        self.point6().number_of_returns_of_given_pulse()
    }

    fn flags(&self) -> u8 {
        self.point6().flags()
    }

    fn synthetic(&self) -> bool {
        self.point6().synthetic()
    }

    fn key_point(&self) -> bool {
        self.point6().key_point()
    }

    fn withheld(&self) -> bool {
        self.point6().withheld()
    }

    fn overlap(&self) -> bool {
        self.point6().overlap()
    }

    fn scanner_channel(&self) -> u8 {
        self.point6().scanner_channel()
    }

    fn scan_direction_flag(&self) -> bool {
        self.point6().scan_direction_flag()
    }

    fn edge_of_flight_line(&self) -> bool {
        self.point6().edge_of_flight_line()
    }

    fn classification(&self) -> u8 {
        self.point6().classification()
    }

    fn user_data(&self) -> u8 {
        self.point6().user_data()
    }

    fn scan_angle(&self) -> i16 {
        self.point6().scan_angle()
    }

    fn point_source_id(&self) -> u16 {
        self.point6().point_source_id()
    }

    fn gps_time(&self) -> f64 {
        self.point6().gps_time()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sizes_match_the_sum_of_their_parts() {
        assert_eq!(Point1::SIZE, Point0::SIZE + GPS_TIME_SIZE);
        assert_eq!(Point5::SIZE, Point3::SIZE + LasWavepacket::SIZE);
        assert_eq!(Point8::SIZE, Point7::SIZE + Nir::SIZE);
        assert_eq!(Point10::SIZE, Point8::SIZE + LasWavepacket::SIZE);
    }

    #[test]
    fn test_field_groups_follow_the_base() {
        let point = Point3 {
            base: Point0 {
                x: 1,
                ..Default::default()
            },
            gps_time: 2.5,
            rgb: RGB::new(1, 2, 3),
        };
        let mut buf = [0u8; Point3::SIZE];
        point.pack_into(&mut buf);
        assert_eq!(&buf[20..28], &2.5f64.to_le_bytes());
        assert_eq!(&buf[28..34], &[1, 0, 2, 0, 3, 0]);
        assert_eq!(point.red(), 1);
        assert_eq!(point.gps_time(), 2.5);
        assert_eq!(point.x(), 1);
    }

    #[test]
    fn test_extended_gps_time_lives_in_the_base() {
        let mut point = Point8::default();
        point.base.gps_time = 12.0;
        point.nir = Nir(9);
        let mut buf = [0u8; Point8::SIZE];
        point.pack_into(&mut buf);
        assert_eq!(&buf[22..30], &12.0f64.to_le_bytes());
        assert_eq!(&buf[36..38], &[9, 0]);
        assert_eq!(LasGpsTime::gps_time(&point), 12.0);
        assert_eq!(point.nir(), 9);
    }

    #[test]
    fn test_extended_formats_share_the_base_gps_time() {
        let mut point = Point9::default();
        point.base.gps_time = -3.5;
        assert_eq!(LasPoint6::gps_time(&point), -3.5);
        assert_eq!(LasGpsTime::gps_time(&point), -3.5);
        assert_eq!(point.point6().gps_time(), -3.5);
    }
}
