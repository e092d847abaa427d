pub mod summary;
pub mod zodiac;

pub use summary::{summarize, Placement, WesternSummary};
pub use zodiac::{
    sign_for_longitude, sign_position, Element, Modality, SignPosition, ZodiacSign, ALL_SIGNS,
    SIGN_ARC,
};
