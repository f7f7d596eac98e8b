/*
===============================================================================

  PROGRAMMERS:

    martin.isenburg@rapidlasso.com  -  http://rapidlasso.com
    uday.karan@gmail.com - Hobu, Inc.

  COPYRIGHT:

    (c) 2007-2014, martin isenburg, rapidlasso - tools to catch reality
    (c) 2014, Uday Verma, Hobu, Inc.
    (c) 2019, Thomas Montaigu

    This is free software; you can redistribute and/or modify it under the
    terms of the GNU Lesser General Licence as published by the Free Software
    Foundation. See the COPYING file for more information.

    This software is distributed WITHOUT ANY WARRANTY and without even the
    implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.

  CHANGE HISTORY:
    6 June 2019: Translated to Rust
===============================================================================
*/

//! Defines the Point Format 0, the base of every legacy point format

use crate::las::classification::Classification;
use crate::las::utils::{
    get_bits, get_flag, legacy_bits as lb, legacy_classification_bits as lcb, set_bits, set_flag,
};
use crate::packers::Packable;

pub trait LasPoint0 {
    fn x(&self) -> i32;
    fn y(&self) -> i32;
    fn z(&self) -> i32;
    fn intensity(&self) -> u16;

    // return_number, number_of_returns, scan_direction_flag
    // & edge_of_flight_line packed together
    fn bit_fields(&self) -> u8;
    fn return_number(&self) -> u8;
    fn number_of_returns_of_given_pulse(&self) -> u8;
    fn scan_direction_flag(&self) -> bool;
    fn edge_of_flight_line(&self) -> bool;

    // classification (5 bits), synthetic, key_point & withheld packed together
    fn classification_byte(&self) -> u8;
    fn classification(&self) -> u8;
    fn synthetic(&self) -> bool;
    fn key_point(&self) -> bool;
    fn withheld(&self) -> bool;

    fn scan_angle_rank(&self) -> i8;
    fn user_data(&self) -> u8;
    fn point_source_id(&self) -> u16;
}

#[derive(Default, Copy, Clone, PartialEq, Debug)]
pub struct Point0 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub intensity: u16,

    // 3 bits
    pub return_number: u8,
    // 3 bits
    pub number_of_returns_of_given_pulse: u8,
    // 1 bit
    pub scan_direction_flag: bool,
    // 1 bit
    pub edge_of_flight_line: bool,

    // 5 bits
    pub classification: u8,
    pub synthetic: bool,
    pub key_point: bool,
    pub withheld: bool,

    pub scan_angle_rank: i8,
    pub user_data: u8,
    pub point_source_id: u16,
}

impl Point0 {
    pub const SIZE: usize = 20;

    pub fn populate_bit_fields_from(&mut self, byte: u8) {
        self.return_number = get_bits(byte, lb::RETURN_NUMBER_MASK, lb::RETURN_NUMBER_SHIFT);
        self.number_of_returns_of_given_pulse =
            get_bits(byte, lb::NUMBER_OF_RETURNS_MASK, lb::NUMBER_OF_RETURNS_SHIFT);
        self.scan_direction_flag = get_flag(byte, lb::SCAN_DIRECTION_MASK, lb::SCAN_DIRECTION_SHIFT);
        self.edge_of_flight_line =
            get_flag(byte, lb::EDGE_OF_FLIGHT_LINE_MASK, lb::EDGE_OF_FLIGHT_LINE_SHIFT);
    }

    pub fn bit_fields_to_byte(&self) -> u8 {
        let mut byte = 0u8;
        byte = set_bits(
            byte,
            self.return_number,
            lb::RETURN_NUMBER_MASK,
            lb::RETURN_NUMBER_SHIFT,
        );
        byte = set_bits(
            byte,
            self.number_of_returns_of_given_pulse,
            lb::NUMBER_OF_RETURNS_MASK,
            lb::NUMBER_OF_RETURNS_SHIFT,
        );
        byte = set_flag(
            byte,
            self.scan_direction_flag,
            lb::SCAN_DIRECTION_MASK,
            lb::SCAN_DIRECTION_SHIFT,
        );
        set_flag(
            byte,
            self.edge_of_flight_line,
            lb::EDGE_OF_FLIGHT_LINE_MASK,
            lb::EDGE_OF_FLIGHT_LINE_SHIFT,
        )
    }

    pub fn populate_classification_from(&mut self, byte: u8) {
        self.classification = get_bits(byte, lcb::CLASSIFICATION_MASK, lcb::CLASSIFICATION_SHIFT);
        self.synthetic = get_flag(byte, lcb::SYNTHETIC_MASK, lcb::SYNTHETIC_SHIFT);
        self.key_point = get_flag(byte, lcb::KEY_POINT_MASK, lcb::KEY_POINT_SHIFT);
        self.withheld = get_flag(byte, lcb::WITHHELD_MASK, lcb::WITHHELD_SHIFT);
    }

    pub fn classification_to_byte(&self) -> u8 {
        let mut byte = set_bits(
            0,
            self.classification,
            lcb::CLASSIFICATION_MASK,
            lcb::CLASSIFICATION_SHIFT,
        );
        byte = set_flag(byte, self.synthetic, lcb::SYNTHETIC_MASK, lcb::SYNTHETIC_SHIFT);
        byte = set_flag(byte, self.key_point, lcb::KEY_POINT_MASK, lcb::KEY_POINT_SHIFT);
        set_flag(byte, self.withheld, lcb::WITHHELD_MASK, lcb::WITHHELD_SHIFT)
    }

    pub fn classification_kind(&self) -> Classification {
        Classification::from_legacy(self.classification)
    }
}

impl LasPoint0 for Point0 {
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
        self.bit_fields_to_byte()
    }

    fn return_number(&self) -> u8 {
        self.return_number
    }

    fn number_of_returns_of_given_pulse(&self) -> u8 {
        self.number_of_returns_of_given_pulse
    }

    fn scan_direction_flag(&self) -> bool {
        self.scan_direction_flag
    }

    fn edge_of_flight_line(&self) -> bool {
        self.edge_of_flight_line
    }

    fn classification_byte(&self) -> u8 {
        self.classification_to_byte()
    }

    fn classification(&self) -> u8 {
        self.classification
    }

    fn synthetic(&self) -> bool {
        self.synthetic
    }

    fn key_point(&self) -> bool {
        self.key_point
    }

    fn withheld(&self) -> bool {
        self.withheld
    }

    fn scan_angle_rank(&self) -> i8 {
        self.scan_angle_rank
    }

    fn user_data(&self) -> u8 {
        self.user_data
    }

    fn point_source_id(&self) -> u16 {
        self.point_source_id
    }
}

impl Packable for Point0 {
    fn unpack_from(input: &[u8]) -> Self {
        assert!(
            input.len() >= Self::SIZE,
            "Point0::unpack_from expected buffer of 20 bytes"
        );
        let mut point = Self {
            x: i32::unpack_from(&input[..4]),
            y: i32::unpack_from(&input[4..8]),
            z: i32::unpack_from(&input[8..12]),
            intensity: u16::unpack_from(&input[12..14]),
            scan_angle_rank: i8::unpack_from(&input[16..17]),
            user_data: input[17],
            point_source_id: u16::unpack_from(&input[18..20]),
            ..Default::default()
        };
        point.populate_bit_fields_from(input[14]);
        point.populate_classification_from(input[15]);
        point
    }

    fn pack_into(&self, output: &mut [u8]) {
        assert!(
            output.len() >= Self::SIZE,
            "Point0::pack_into expected buffer of 20 bytes"
        );
        self.x.pack_into(&mut output[0..4]);
        self.y.pack_into(&mut output[4..8]);
        self.z.pack_into(&mut output[8..12]);
        self.intensity.pack_into(&mut output[12..14]);
        output[14] = self.bit_fields_to_byte();
        output[15] = self.classification_to_byte();
        self.scan_angle_rank.pack_into(&mut output[16..17]);
        output[17] = self.user_data;
        self.point_source_id.pack_into(&mut output[18..20]);
    }
}
