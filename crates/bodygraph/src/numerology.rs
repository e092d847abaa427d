//! Birth-date numerology.

use crate::error::ChartError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const MASTER_NUMBERS: [u32; 3] = [11, 22, 33];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Numerology {
    pub life_path_number: u32,
    pub life_path_keyword: String,
    pub birth_day_number: u32,
}

/// Parse "YYYY-MM-DD".
pub fn parse_birth_date(text: &str) -> Result<NaiveDate, ChartError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| ChartError::invalid("birth_date", format!("expected YYYY-MM-DD ({e})")))
}

fn digit_sum(mut n: u32) -> u32 {
    let mut total = 0;
    while n > 0 {
        total += n % 10;
        n /= 10;
    }
    total
}

/// Sum the digits of YYYYMMDD, reducing until single-digit or a master number.
pub fn life_path(date: NaiveDate) -> u32 {
    let digits = format!("{:04}{:02}{:02}", date.year().unsigned_abs(), date.month(), date.day());
    let mut total: u32 = digits.chars().filter_map(|c| c.to_digit(10)).sum();
    while total > 9 && !MASTER_NUMBERS.contains(&total) {
        total = digit_sum(total);
    }
    total
}

pub fn life_path_keyword(number: u32) -> &'static str {
    match number {
        1 => "Independent Leader",
        2 => "Diplomatic Peacemaker",
        3 => "Creative Communicator",
        4 => "Steady Builder",
        5 => "Freedom Seeker",
        6 => "Nurturing Guardian",
        7 => "Seeker of Truth",
        8 => "Ambitious Achiever",
        9 => "Compassionate Humanitarian",
        11 => "Intuitive Illuminator",
        22 => "Master Builder",
        33 => "Master Teacher",
        _ => "Unknown",
    }
}

pub fn numerology(date: NaiveDate) -> Numerology {
    let life_path_number = life_path(date);
    Numerology {
        life_path_number,
        life_path_keyword: life_path_keyword(life_path_number).to_string(),
        birth_day_number: date.day(),
    }
}
