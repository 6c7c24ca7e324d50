//! The element vocabulary shared by reagent and product atoms.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An atom's element. The discriminants below are fixed by the binary
/// puzzle format and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Salt,
    Air,
    Earth,
    Fire,
    Water,
    Quicksilver,
    Gold,
    Silver,
    Copper,
    Iron,
    Tin,
    Lead,
    Vitae,
    Mors,
    RepetitionPlaceholder,
    Quintessence,
}

impl Element {
    /// Wire byte used in puzzle files.
    pub fn to_byte(self) -> u8 {
        match self {
            Element::Salt => 1,
            Element::Air => 2,
            Element::Earth => 3,
            Element::Fire => 4,
            Element::Water => 5,
            Element::Quicksilver => 6,
            Element::Gold => 7,
            Element::Silver => 8,
            Element::Copper => 9,
            Element::Iron => 10,
            Element::Tin => 11,
            Element::Lead => 12,
            Element::Vitae => 13,
            Element::Mors => 14,
            Element::RepetitionPlaceholder => 15,
            Element::Quintessence => 16,
        }
    }

    /// Decode a wire byte; `None` for bytes outside the known range.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            1 => Element::Salt,
            2 => Element::Air,
            3 => Element::Earth,
            4 => Element::Fire,
            5 => Element::Water,
            6 => Element::Quicksilver,
            7 => Element::Gold,
            8 => Element::Silver,
            9 => Element::Copper,
            10 => Element::Iron,
            11 => Element::Tin,
            12 => Element::Lead,
            13 => Element::Vitae,
            14 => Element::Mors,
            15 => Element::RepetitionPlaceholder,
            16 => Element::Quintessence,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            Element::Salt => "salt",
            Element::Air => "air",
            Element::Earth => "earth",
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Quicksilver => "quicksilver",
            Element::Gold => "gold",
            Element::Silver => "silver",
            Element::Copper => "copper",
            Element::Iron => "iron",
            Element::Tin => "tin",
            Element::Lead => "lead",
            Element::Vitae => "vitae",
            Element::Mors => "mors",
            Element::RepetitionPlaceholder => "repetition-placeholder",
            Element::Quintessence => "quintessence",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_round_trip() {
        for byte in 1..=16 {
            let element = Element::from_byte(byte).unwrap();
            assert_eq!(element.to_byte(), byte);
        }
    }

    #[test]
    fn unknown_bytes_rejected() {
        assert_eq!(Element::from_byte(0), None);
        assert_eq!(Element::from_byte(17), None);
        assert_eq!(Element::from_byte(255), None);
    }

    #[test]
    fn display_name() {
        assert_eq!(Element::Quicksilver.to_string(), "quicksilver");
    }
}
