//! Tropical zodiac placement.
//!
//! The ecliptic is divided into 12 equal signs of 30 degrees starting at
//! 0° Aries. A longitude is reported as sign + whole degree + whole minute.

use crate::util::normalize_degrees;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SIGN_ARC: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Cardinal,
    Fixed,
    Mutable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

pub const ALL_SIGNS: [ZodiacSign; 12] = [
    ZodiacSign::Aries,
    ZodiacSign::Taurus,
    ZodiacSign::Gemini,
    ZodiacSign::Cancer,
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Libra,
    ZodiacSign::Scorpio,
    ZodiacSign::Sagittarius,
    ZodiacSign::Capricorn,
    ZodiacSign::Aquarius,
    ZodiacSign::Pisces,
];

impl ZodiacSign {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    /// 0-based position from Aries.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        ALL_SIGNS[index % 12]
    }

    pub fn element(self) -> Element {
        match self.index() % 4 {
            0 => Element::Fire,
            1 => Element::Earth,
            2 => Element::Air,
            _ => Element::Water,
        }
    }

    pub fn modality(self) -> Modality {
        match self.index() % 3 {
            0 => Modality::Cardinal,
            1 => Modality::Fixed,
            _ => Modality::Mutable,
        }
    }

    pub fn ruler(self) -> &'static str {
        match self {
            Self::Aries | Self::Scorpio => "mars",
            Self::Taurus | Self::Libra => "venus",
            Self::Gemini | Self::Virgo => "mercury",
            Self::Cancer => "moon",
            Self::Leo => "sun",
            Self::Sagittarius | Self::Pisces => "jupiter",
            Self::Capricorn | Self::Aquarius => "saturn",
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Aries => '♈',
            Self::Taurus => '♉',
            Self::Gemini => '♊',
            Self::Cancer => '♋',
            Self::Leo => '♌',
            Self::Virgo => '♍',
            Self::Libra => '♎',
            Self::Scorpio => '♏',
            Self::Sagittarius => '♐',
            Self::Capricorn => '♑',
            Self::Aquarius => '♒',
            Self::Pisces => '♓',
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A longitude expressed as sign, degree and minute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignPosition {
    pub sign: ZodiacSign,
    /// Whole degrees within the sign (0-29)
    pub degree: u8,
    /// Whole arc-minutes (0-59)
    pub minute: u8,
    /// Exact offset into the sign, 0 <= x < 30
    pub degree_in_sign: f64,
    /// Normalized ecliptic longitude
    pub longitude: f64,
}

impl SignPosition {
    /// Degrees reconstructed from sign/degree/minute (truncated to the minute).
    pub fn to_longitude(&self) -> f64 {
        self.sign.index() as f64 * SIGN_ARC + self.degree as f64 + self.minute as f64 / 60.0
    }
}

impl fmt::Display for SignPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°{:02}' {}", self.degree, self.minute, self.sign)
    }
}

/// Place a longitude (any real number) in the zodiac.
pub fn sign_position(longitude: f64) -> SignPosition {
    let lon = normalize_degrees(longitude);
    let index = ((lon / SIGN_ARC).floor() as usize).min(11);
    let degree_in_sign = (lon - index as f64 * SIGN_ARC).clamp(0.0, SIGN_ARC);

    let whole = degree_in_sign.floor();
    let degree = (whole as u8).min(29);
    let minute = (((degree_in_sign - whole) * 60.0).floor() as u8).min(59);

    SignPosition {
        sign: ZodiacSign::from_index(index),
        degree,
        minute,
        degree_in_sign,
        longitude: lon,
    }
}

/// Sign containing `longitude`.
pub fn sign_for_longitude(longitude: f64) -> ZodiacSign {
    sign_position(longitude).sign
}
