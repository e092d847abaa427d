use crate::ephemeris::Planet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Conjunction,
    Semisextile,
    Sextile,
    Square,
    Trine,
    Quincunx,
    Opposition,
}

/// All aspects tested, in orb-table column order.
pub const ALL_ASPECTS: [AspectKind; 7] = [
    AspectKind::Conjunction,
    AspectKind::Semisextile,
    AspectKind::Sextile,
    AspectKind::Square,
    AspectKind::Trine,
    AspectKind::Quincunx,
    AspectKind::Opposition,
];

impl AspectKind {
    pub const fn angle(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Semisextile => 30.0,
            Self::Sextile => 60.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Quincunx => 150.0,
            Self::Opposition => 180.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Conjunction => "conjunction",
            Self::Semisextile => "semisextile",
            Self::Sextile => "sextile",
            Self::Square => "square",
            Self::Trine => "trine",
            Self::Quincunx => "quincunx",
            Self::Opposition => "opposition",
        }
    }

    pub const fn is_major(self) -> bool {
        !matches!(self, Self::Semisextile | Self::Quincunx)
    }

    pub(crate) fn column(self) -> usize {
        self as usize
    }
}

/// An aspect between two planets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aspect {
    pub from: Planet,
    pub to: Planet,
    pub kind: AspectKind,
    /// Exact angle for this aspect (0, 30, ..., 180)
    pub exact_angle: f64,
    /// Actual separation, folded to [0, 180]
    pub separation: f64,
    /// Deviation from the exact angle
    pub orb: f64,
    /// Orb allowed for this pair and aspect
    pub allowed_orb: f64,
    /// 100 at exact, 0 at the edge of the orb
    pub strength: u8,
    /// Whether the aspect is applying (approaching exact)
    pub is_applying: bool,
}

/// Settings for aspect calculations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectSettings {
    /// Multiplier applied to every orb in the table
    pub orb_scale: f64,
    /// Whether semisextile and quincunx are tested
    pub include_minor: bool,
}

impl Default for AspectSettings {
    fn default() -> Self {
        Self {
            orb_scale: 1.0,
            include_minor: true,
        }
    }
}
