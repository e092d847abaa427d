//! Chinese zodiac by Gregorian year.

use serde::{Deserialize, Serialize};

const ANIMALS: [&str; 12] = [
    "Rat", "Ox", "Tiger", "Rabbit", "Dragon", "Snake", "Horse", "Goat", "Monkey", "Rooster",
    "Dog", "Pig",
];
const ELEMENTS: [&str; 5] = ["Wood", "Fire", "Earth", "Metal", "Water"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChineseZodiac {
    pub animal: String,
    pub element: String,
    pub yin_yang: String,
}

/// Year-based sign. Lunar new year is not taken into account.
pub fn chinese_zodiac(year: i32) -> ChineseZodiac {
    let cycle = (year - 4).rem_euclid(60);
    ChineseZodiac {
        animal: ANIMALS[(cycle % 12) as usize].to_string(),
        element: ELEMENTS[((cycle % 10) / 2) as usize].to_string(),
        yin_yang: if year.rem_euclid(2) == 0 { "Yang" } else { "Yin" }.to_string(),
    }
}
