//! Defines the Point Format 6, the base of every extended point format

use crate::las::classification::Classification;
use crate::las::utils::{
    extended_bits as eb, extended_flags_bits as efb, get_bits, get_flag, set_bits, set_flag,
};
use crate::packers::Packable;

pub trait LasPoint6 {
    fn x(&self) -> i32;
    fn y(&self) -> i32;
    fn z(&self) -> i32;
    fn intensity(&self) -> u16;

    // return_number & number_of_returns_of_given_pulse are packed into
    // bit_fields
    fn bit_fields(&self) -> u8;
    fn return_number(&self) -> u8; // 4 bits
    fn number_of_returns_of_given_pulse(&self) -> u8; // 4bits

    // all theses values are packed into the same byte
    fn flags(&self) -> u8;
    fn synthetic(&self) -> bool;
    fn key_point(&self) -> bool;
    fn withheld(&self) -> bool;
    fn overlap(&self) -> bool;
    fn scanner_channel(&self) -> u8; // 2 bits
    fn scan_direction_flag(&self) -> bool;
    fn edge_of_flight_line(&self) -> bool;

    fn classification(&self) -> u8;
    fn user_data(&self) -> u8;
    fn scan_angle(&self) -> i16;
    fn point_source_id(&self) -> u16;
    fn gps_time(&self) -> f64;
}

#[derive(Default, Copy, Clone, Debug, PartialEq)]
pub struct Point6 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub intensity: u16,

    pub bit_fields: u8,
    pub flags: u8,

    pub classification: u8,
    pub user_data: u8,
    // in 0.006 degrees
    pub scan_angle: i16,
    pub point_source_id: u16,
    pub gps_time: f64,
}

impl Point6 {
    pub const SIZE: usize = 30;

    pub fn set_return_number(&mut self, new_val: u8) {
        self.bit_fields = set_bits(
            self.bit_fields,
            new_val,
            eb::RETURN_NUMBER_MASK,
            eb::RETURN_NUMBER_SHIFT,
        );
    }

    pub fn set_number_of_returns(&mut self, new_val: u8) {
        self.bit_fields = set_bits(
            self.bit_fields,
            new_val,
            eb::NUMBER_OF_RETURNS_MASK,
            eb::NUMBER_OF_RETURNS_SHIFT,
        );
    }

    pub fn set_synthetic(&mut self, new_val: bool) {
        self.flags = set_flag(self.flags, new_val, efb::SYNTHETIC_MASK, efb::SYNTHETIC_SHIFT);
    }

    pub fn set_key_point(&mut self, new_val: bool) {
        self.flags = set_flag(self.flags, new_val, efb::KEY_POINT_MASK, efb::KEY_POINT_SHIFT);
    }

    pub fn set_withheld(&mut self, new_val: bool) {
        self.flags = set_flag(self.flags, new_val, efb::WITHHELD_MASK, efb::WITHHELD_SHIFT);
    }

    pub fn set_overlap(&mut self, new_val: bool) {
        self.flags = set_flag(self.flags, new_val, efb::OVERLAP_MASK, efb::OVERLAP_SHIFT);
    }

    pub fn set_scanner_channel(&mut self, new_val: u8) {
        self.flags = set_bits(
            self.flags,
            new_val,
            efb::SCANNER_CHANNEL_MASK,
            efb::SCANNER_CHANNEL_SHIFT,
        );
    }

    pub fn set_scan_direction_flag(&mut self, new_val: bool) {
        self.flags = set_flag(
            self.flags,
            new_val,
            efb::SCAN_DIRECTION_MASK,
            efb::SCAN_DIRECTION_SHIFT,
        );
    }

    pub fn set_edge_of_flight_line(&mut self, new_val: bool) {
        self.flags = set_flag(
            self.flags,
            new_val,
            efb::EDGE_OF_FLIGHT_LINE_MASK,
            efb::EDGE_OF_FLIGHT_LINE_SHIFT,
        );
    }

    pub fn classification_kind(&self) -> Classification {
        Classification::from(self.classification)
    }
}

impl LasPoint6 for Point6 {
    fn x(&self) -> i32 {
        self.x
    }

    fn y(&self) -> i32 {
        self.y
    }

    fn z(&self) -> i32 {
        self.z
    }

    fn intensity(&self) -> u16 {
        self.intensity
    }

    fn bit_fields(&self) -> u8 {
        self.bit_fields
    }

    fn return_number(&self) -> u8 {
        get_bits(self.bit_fields, eb::RETURN_NUMBER_MASK, eb::RETURN_NUMBER_SHIFT)
    }

    fn number_of_returns_of_given_pulse(&self) -> u8 {
        get_bits(
            self.bit_fields,
            eb::NUMBER_OF_RETURNS_MASK,
            eb::NUMBER_OF_RETURNS_SHIFT,
        )
    }

    fn flags(&self) -> u8 {
        self.flags
    }

    fn synthetic(&self) -> bool {
        get_flag(self.flags, efb::SYNTHETIC_MASK, efb::SYNTHETIC_SHIFT)
    }

    fn key_point(&self) -> bool {
        get_flag(self.flags, efb::KEY_POINT_MASK, efb::KEY_POINT_SHIFT)
    }

    fn withheld(&self) -> bool {
        get_flag(self.flags, efb::WITHHELD_MASK, efb::WITHHELD_SHIFT)
    }

    fn overlap(&self) -> bool {
        get_flag(self.flags, efb::OVERLAP_MASK, efb::OVERLAP_SHIFT)
    }

    fn scanner_channel(&self) -> u8 {
        get_bits(
            self.flags,
            efb::SCANNER_CHANNEL_MASK,
            efb::SCANNER_CHANNEL_SHIFT,
        )
    }

    fn scan_direction_flag(&self) -> bool {
        get_flag(self.flags, efb::SCAN_DIRECTION_MASK, efb::SCAN_DIRECTION_SHIFT)
    }

    fn edge_of_flight_line(&self) -> bool {
        get_flag(
            self.flags,
            efb::EDGE_OF_FLIGHT_LINE_MASK,
            efb::EDGE_OF_FLIGHT_LINE_SHIFT,
        )
    }

    fn classification(&self) -> u8 {
        self.classification
    }

    fn user_data(&self) -> u8 {
        self.user_data
    }

    fn scan_angle(&self) -> i16 {
        self.scan_angle
    }

    fn point_source_id(&self) -> u16 {
        self.point_source_id
    }

    fn gps_time(&self) -> f64 {
        self.gps_time
    }
}

impl Packable for Point6 {
    fn unpack_from(input: &[u8]) -> Self {
        assert!(
            input.len() >= Self::SIZE,
            "Point6::unpack_from expected buffer of 30 bytes"
        );
        Self {
            x: i32::unpack_from(&input[0..4]),
            y: i32::unpack_from(&input[4..8]),
            z: i32::unpack_from(&input[8..12]),
            intensity: u16::unpack_from(&input[12..14]),
            bit_fields: input[14],
            flags: input[15],
            classification: input[16],
            user_data: input[17],
            scan_angle: i16::unpack_from(&input[18..20]),
            point_source_id: u16::unpack_from(&input[20..22]),
            gps_time: f64::unpack_from(&input[22..30]),
        }
    }

    fn pack_into(&self, output: &mut [u8]) {
        assert!(
            output.len() >= Self::SIZE,
            "Point6::pack_into expected buffer of 30 bytes"
        );
        self.x.pack_into(&mut output[0..4]);
        self.y.pack_into(&mut output[4..8]);
        self.z.pack_into(&mut output[8..12]);
        self.intensity.pack_into(&mut output[12..14]);
        output[14] = self.bit_fields;
        output[15] = self.flags;
        output[16] = self.classification;
        output[17] = self.user_data;
        self.scan_angle.pack_into(&mut output[18..20]);
        self.point_source_id.pack_into(&mut output[20..22]);
        self.gps_time.pack_into(&mut output[22..30]);
    }
}
