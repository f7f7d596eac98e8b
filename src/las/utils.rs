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
    terms of the Apache Public License 2.0 published by the Apache Software
    Foundation. See the COPYING file for more information.

    This software is distributed WITHOUT ANY WARRANTY and without even the
    implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.

  CHANGE HISTORY:
    6 June 2019: Translated to Rust
===============================================================================
*/

//! Helpers for the sub-byte fields of point records and the scan angle units.

use num_traits::clamp;

/// Size in degrees of one unit of the extended scan angle
pub const SCAN_ANGLE_UNIT: f64 = 0.006;

/// Legacy `bit_fields` byte
pub(crate) mod legacy_bits {
    pub const RETURN_NUMBER_MASK: u8 = 0b0000_0111;
    pub const RETURN_NUMBER_SHIFT: u8 = 0;
    pub const NUMBER_OF_RETURNS_MASK: u8 = 0b0011_1000;
    pub const NUMBER_OF_RETURNS_SHIFT: u8 = 3;
    pub const SCAN_DIRECTION_MASK: u8 = 0b0100_0000;
    pub const SCAN_DIRECTION_SHIFT: u8 = 6;
    pub const EDGE_OF_FLIGHT_LINE_MASK: u8 = 0b1000_0000;
    pub const EDGE_OF_FLIGHT_LINE_SHIFT: u8 = 7;
}

/// Legacy classification byte
pub(crate) mod legacy_classification_bits {
    pub const CLASSIFICATION_MASK: u8 = 0b0001_1111;
    pub const CLASSIFICATION_SHIFT: u8 = 0;
    pub const SYNTHETIC_MASK: u8 = 0b0010_0000;
    pub const SYNTHETIC_SHIFT: u8 = 5;
    pub const KEY_POINT_MASK: u8 = 0b0100_0000;
    pub const KEY_POINT_SHIFT: u8 = 6;
    pub const WITHHELD_MASK: u8 = 0b1000_0000;
    pub const WITHHELD_SHIFT: u8 = 7;
}

/// Extended `bit_fields` byte
pub(crate) mod extended_bits {
    pub const RETURN_NUMBER_MASK: u8 = 0b0000_1111;
    pub const RETURN_NUMBER_SHIFT: u8 = 0;
    pub const NUMBER_OF_RETURNS_MASK: u8 = 0b1111_0000;
    pub const NUMBER_OF_RETURNS_SHIFT: u8 = 4;
}

/// Extended classification flags byte
pub(crate) mod extended_flags_bits {
    pub const SYNTHETIC_MASK: u8 = 0b0000_0001;
    pub const SYNTHETIC_SHIFT: u8 = 0;
    pub const KEY_POINT_MASK: u8 = 0b0000_0010;
    pub const KEY_POINT_SHIFT: u8 = 1;
    pub const WITHHELD_MASK: u8 = 0b0000_0100;
    pub const WITHHELD_SHIFT: u8 = 2;
    pub const OVERLAP_MASK: u8 = 0b0000_1000;
    pub const OVERLAP_SHIFT: u8 = 3;
    pub const SCANNER_CHANNEL_MASK: u8 = 0b0011_0000;
    pub const SCANNER_CHANNEL_SHIFT: u8 = 4;
    pub const SCAN_DIRECTION_MASK: u8 = 0b0100_0000;
    pub const SCAN_DIRECTION_SHIFT: u8 = 6;
    pub const EDGE_OF_FLIGHT_LINE_MASK: u8 = 0b1000_0000;
    pub const EDGE_OF_FLIGHT_LINE_SHIFT: u8 = 7;
}

#[inline(always)]
pub fn get_bits(byte: u8, mask: u8, shift: u8) -> u8 {
    (byte & mask) >> shift
}

#[inline(always)]
pub fn set_bits(byte: u8, value: u8, mask: u8, shift: u8) -> u8 {
    (byte & !mask) | ((value << shift) & mask)
}

#[inline(always)]
pub fn get_flag(byte: u8, mask: u8, shift: u8) -> bool {
    get_bits(byte, mask, shift) != 0
}

#[inline(always)]
pub fn set_flag(byte: u8, value: bool, mask: u8, shift: u8) -> u8 {
    set_bits(byte, value as u8, mask, shift)
}

#[inline]
pub(crate) fn i8_clamp(n: f64) -> i8 {
    clamp(n, f64::from(std::i8::MIN), f64::from(std::i8::MAX)) as i8
}

#[inline]
pub(crate) fn i16_clamp(n: f64) -> i16 {
    clamp(n, f64::from(std::i16::MIN), f64::from(std::i16::MAX)) as i16
}

/// Converts a legacy scan angle rank (1° units) to an extended scan angle (0.006° units)
#[inline]
pub fn scan_angle_from_rank(rank: i8) -> i16 {
    i16_clamp((f64::from(rank) / SCAN_ANGLE_UNIT).round())
}

/// Converts an extended scan angle (0.006° units) to a legacy scan angle rank (1° units)
#[inline]
pub fn scan_angle_rank_from_angle(angle: i16) -> i8 {
    i8_clamp((f64::from(angle) * SCAN_ANGLE_UNIT).round())
}
