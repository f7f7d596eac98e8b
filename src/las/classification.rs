//! ASPRS classification values.
//!
//! Legacy formats (0 to 5) store a 5-bit classification, extended
//! formats (6 to 10) a full byte. Both share the same numbering for the
//! values they have in common.

use crate::las::utils::legacy_classification_bits::CLASSIFICATION_MASK;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Classification {
    CreatedNeverClassified,
    Unclassified,
    Ground,
    LowVegetation,
    MediumVegetation,
    HighVegetation,
    Building,
    LowPoint,
    ModelKeyPoint,
    Water,
    Rail,
    RoadSurface,
    Overlap,
    WireGuard,
    WireConductor,
    TransmissionTower,
    WireStructureConnector,
    BridgeDeck,
    HighNoise,
    /// 19 to 63, reserved for ASPRS definitions
    Reserved(u8),
    /// 64 to 255, only reachable by extended formats
    UserDefined(u8),
}

impl Classification {
    /// The value as stored by legacy formats: the low 5 bits.
    ///
    /// Values above 31 do not fit and are truncated.
    pub fn to_legacy(self) -> u8 {
        u8::from(self) & CLASSIFICATION_MASK
    }

    /// Interprets the 5-bit value of a legacy classification byte
    pub fn from_legacy(value: u8) -> Self {
        Self::from(value & CLASSIFICATION_MASK)
    }

    pub fn fits_legacy(self) -> bool {
        u8::from(self) <= CLASSIFICATION_MASK
    }
}

impl Default for Classification {
    fn default() -> Self {
        Classification::CreatedNeverClassified
    }
}

impl From<u8> for Classification {
    fn from(value: u8) -> Self {
        match value {
            0 => Classification::CreatedNeverClassified,
            1 => Classification::Unclassified,
            2 => Classification::Ground,
            3 => Classification::LowVegetation,
            4 => Classification::MediumVegetation,
            5 => Classification::HighVegetation,
            6 => Classification::Building,
            7 => Classification::LowPoint,
            8 => Classification::ModelKeyPoint,
            9 => Classification::Water,
            10 => Classification::Rail,
            11 => Classification::RoadSurface,
            12 => Classification::Overlap,
            13 => Classification::WireGuard,
            14 => Classification::WireConductor,
            15 => Classification::TransmissionTower,
            16 => Classification::WireStructureConnector,
            17 => Classification::BridgeDeck,
            18 => Classification::HighNoise,
            19..=63 => Classification::Reserved(value),
            _ => Classification::UserDefined(value),
        }
    }
}

impl From<Classification> for u8 {
    fn from(c: Classification) -> Self {
        match c {
            Classification::CreatedNeverClassified => 0,
            Classification::Unclassified => 1,
            Classification::Ground => 2,
            Classification::LowVegetation => 3,
            Classification::MediumVegetation => 4,
            Classification::HighVegetation => 5,
            Classification::Building => 6,
            Classification::LowPoint => 7,
            Classification::ModelKeyPoint => 8,
            Classification::Water => 9,
            Classification::Rail => 10,
            Classification::RoadSurface => 11,
            Classification::Overlap => 12,
            Classification::WireGuard => 13,
            Classification::WireConductor => 14,
            Classification::TransmissionTower => 15,
            Classification::WireStructureConnector => 16,
            Classification::BridgeDeck => 17,
            Classification::HighNoise => 18,
            Classification::Reserved(v) | Classification::UserDefined(v) => v,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Classification;

    #[test]
    fn test_all_values_round_trip() {
        for value in 0..=255u8 {
            assert_eq!(u8::from(Classification::from(value)), value);
        }
    }

    #[test]
    fn test_legacy_truncation() {
        assert_eq!(Classification::Ground.to_legacy(), 2);
        assert_eq!(Classification::UserDefined(200).to_legacy(), 200 & 0x1F);
        assert!(!Classification::Reserved(40).fits_legacy());
        assert!(Classification::Reserved(31).fits_legacy());
        assert_eq!(Classification::from_legacy(0b1110_0010), Classification::Ground);
    }
}
