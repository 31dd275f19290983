//! Egyptian National ID data model.
//!
//! A national ID is 14 digits laid out as:
//!
//! ```text
//! C YY MM DD GG SSSS K
//! │ │  │  │  │  │    └─ check digit
//! │ │  │  │  │  └────── sequence number (parity encodes gender)
//! │ │  │  │  └───────── governorate code
//! │ │  │  └──────────── day of birth
//! │ │  └─────────────── month of birth
//! │ └────────────────── two-digit year of birth
//! └──────────────────── century (2 = 1900s, 3 = 2000s)
//! ```

use serde::{Serialize, Serializer};

/// Governorate where the ID was issued.
///
/// Discriminants are the two-digit codes printed in the ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Governorate {
    Cairo = 1,
    Alexandria = 2,
    PortSaid = 3,
    Suez = 4,
    Damietta = 11,
    Dakahlia = 12,
    Sharqia = 13,
    Qalyubia = 14,
    KafrElSheikh = 15,
    Gharbia = 16,
    Monufia = 17,
    Beheira = 18,
    Ismailia = 19,
    Giza = 21,
    BeniSuef = 22,
    Fayoum = 23,
    Minya = 24,
    Asyut = 25,
    Sohag = 26,
    Qena = 27,
    Aswan = 28,
    Luxor = 29,
    RedSea = 31,
    NewValley = 32,
    Matrouh = 33,
    NorthSinai = 34,
    SouthSinai = 35,
    OutsideTheRepublic = 88,
}

impl Governorate {
    /// Every known governorate, in code order.
    pub const ALL: [Governorate; 28] = [
        Governorate::Cairo,
        Governorate::Alexandria,
        Governorate::PortSaid,
        Governorate::Suez,
        Governorate::Damietta,
        Governorate::Dakahlia,
        Governorate::Sharqia,
        Governorate::Qalyubia,
        Governorate::KafrElSheikh,
        Governorate::Gharbia,
        Governorate::Monufia,
        Governorate::Beheira,
        Governorate::Ismailia,
        Governorate::Giza,
        Governorate::BeniSuef,
        Governorate::Fayoum,
        Governorate::Minya,
        Governorate::Asyut,
        Governorate::Sohag,
        Governorate::Qena,
        Governorate::Aswan,
        Governorate::Luxor,
        Governorate::RedSea,
        Governorate::NewValley,
        Governorate::Matrouh,
        Governorate::NorthSinai,
        Governorate::SouthSinai,
        Governorate::OutsideTheRepublic,
    ];

    /// Look up a governorate by its two-digit code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.code() == code)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Registry label, e.g. `KAFR_EL_SHEIKH`.
    pub fn label(self) -> &'static str {
        match self {
            Governorate::Cairo => "CAIRO",
            Governorate::Alexandria => "ALEXANDRIA",
            Governorate::PortSaid => "PORT_SAID",
            Governorate::Suez => "SUEZ",
            Governorate::Damietta => "DAMIETTA",
            Governorate::Dakahlia => "DAKAHLIA",
            Governorate::Sharqia => "SHARQIA",
            Governorate::Qalyubia => "QALYUBIA",
            Governorate::KafrElSheikh => "KAFR_EL_SHEIKH",
            Governorate::Gharbia => "GHARBIA",
            Governorate::Monufia => "MONUFIA",
            Governorate::Beheira => "BEHEIRA",
            Governorate::Ismailia => "ISMAILIA",
            Governorate::Giza => "GIZA",
            Governorate::BeniSuef => "BENI_SUEF",
            Governorate::Fayoum => "FAYOUM",
            Governorate::Minya => "MINYA",
            Governorate::Asyut => "ASYUT",
            Governorate::Sohag => "SOHAG",
            Governorate::Qena => "QENA",
            Governorate::Aswan => "ASWAN",
            Governorate::Luxor => "LUXOR",
            Governorate::RedSea => "RED_SEA",
            Governorate::NewValley => "NEW_VALLEY",
            Governorate::Matrouh => "MATROUH",
            Governorate::NorthSinai => "NORTH_SINAI",
            Governorate::SouthSinai => "SOUTH_SINAI",
            Governorate::OutsideTheRepublic => "OUTSIDE_THE_REPUBLIC",
        }
    }

    /// Human readable name: underscores become spaces and only the first
    /// letter stays upper case (`OUTSIDE_THE_REPUBLIC` -> `Outside the republic`).
    pub fn display_name(self) -> String {
        let spaced = self.label().replace('_', " ").to_lowercase();
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Gender encoded by the parity of the sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    Female,
}

/// Outcome of each individual check.
///
/// A field of [`NationalIdRecord`] is only trustworthy when the flag of the
/// check that produced it is `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationChecks {
    pub structure: bool,
    pub century: bool,
    pub year: bool,
    pub month: bool,
    pub day: bool,
    pub governorate: bool,
}

impl ValidationChecks {
    pub fn all_passed(&self) -> bool {
        self.structure && self.century && self.year && self.month && self.day && self.governorate
    }
}

/// Why a check failed. The `Display` text is what clients see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReason {
    #[error("invalid length or non-numeric string")]
    Structure,
    #[error("invalid century part")]
    Century,
    #[error("year of birth is in the future")]
    FutureYear,
    #[error("invalid month")]
    Month,
    #[error("invalid day for the month")]
    Day,
    #[error("invalid governorate ID")]
    Governorate,
}

impl Serialize for InvalidReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of parsing one national ID.
///
/// Every positional field is parsed eagerly, even when an earlier check
/// failed, so that a rejected ID still reports what could be read from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NationalIdRecord {
    /// The input exactly as received
    pub national_id: String,

    pub is_valid: bool,

    /// Failed checks in check order; empty iff `is_valid`
    pub invalid_reasons: Vec<InvalidReason>,

    /// `invalid_reasons` joined with single spaces
    pub fake_id_reason: String,

    pub checks: ValidationChecks,

    /// 2 or 3; `None` for any other leading digit
    pub century: Option<u8>,

    pub year_of_birth: Option<i32>,
    pub month_of_birth: Option<u32>,
    pub month_of_birth_name: Option<&'static str>,
    pub day_of_birth: Option<u32>,

    pub governorate_id: Option<u8>,
    pub governorate_name: Option<String>,

    pub sequence_number: Option<u32>,
    pub gender: Option<Gender>,
    pub check_digit: Option<u8>,
}
