//! Bedwars statistics scraped from the raw stats provider's HTML.
//!
//! Extraction is plain delimiter matching: a missing delimiter yields `"0"`
//! for that field instead of failing the whole page.

use std::fmt::{self, Display};
use thiserror::Error;

/// Value used for a field whose delimiters are missing.
const MISSING: &str = "0";
const STAR_GLYPHS: &[&str] = &["✪", "✩", "âœª", "âœ©"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("malformed {field}: '{value}'")]
    Malformed { field: &'static str, value: String },
}

/// Returns the trimmed text between `start` and the next `end`, or `"0"`.
pub fn extract<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
    let begin = match text.find(start) {
        Some(index) => index + start.len(),
        None => return MISSING,
    };

    match text[begin..].find(end) {
        Some(len) => text[begin..begin + len].trim(),
        None => MISSING,
    }
}

fn cell(html: &str, label: &str) -> String {
    extract(html, &format!("<td>{}</td><td>", label), "</td>").replace(',', "")
}

fn number(field: &'static str, value: String) -> Result<u64, StatsError> {
    value
        .parse()
        .map_err(|_| StatsError::Malformed { field, value })
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BedwarsStats {
    pub final_kills: u64,
    pub final_deaths: u64,
    pub wins: u64,
    pub losses: u64,
    pub beds_broken: u64,
    pub beds_lost: u64,
    pub kills: u64,
    pub deaths: u64,
    pub stars: u64,
}

impl BedwarsStats {
    pub fn parse(html: &str) -> Result<Self, StatsError> {
        let mut stars = extract(html, "Level: ", " ").replace([',', ' '], "");
        for glyph in STAR_GLYPHS {
            stars = stars.replace(glyph, "");
        }

        Ok(Self {
            final_kills: number("final kills", cell(html, "Final Kills"))?,
            final_deaths: number("final deaths", cell(html, "Final Deaths"))?,
            wins: number("wins", cell(html, "Wins"))?,
            losses: number("losses", cell(html, "Losses"))?,
            beds_broken: number("beds broken", cell(html, "Beds Broken"))?,
            beds_lost: number("beds lost", cell(html, "Beds Lost"))?,
            kills: number("kills", cell(html, "Kills"))?,
            deaths: number("deaths", cell(html, "Deaths"))?,
            stars: number("stars", stars)?,
        })
    }
}

/// Final kills and deaths only; an unparsable value is `None`.
pub fn final_kill_pair(html: &str) -> (Option<u64>, Option<u64>) {
    (
        cell(html, "Final Kills").parse().ok(),
        cell(html, "Final Deaths").parse().ok(),
    )
}

/// Final kill/death ratio as shown in alt reports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ratio {
    /// No deaths, so the kills themselves.
    Whole(u64),
    Fraction(f64),
    Unavailable,
}

impl Ratio {
    pub fn from_finals(final_kills: Option<u64>, final_deaths: Option<u64>) -> Self {
        match (final_kills, final_deaths) {
            (Some(kills), Some(0)) if kills > 0 => Ratio::Whole(kills),
            (Some(kills), Some(deaths)) if deaths > 0 => {
                Ratio::Fraction(kills as f64 / deaths as f64)
            }
            _ => Ratio::Unavailable,
        }
    }
}

impl Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Whole(kills) => write!(f, "{}", kills),
            Ratio::Fraction(ratio) => write!(f, "{:.2}", ratio),
            Ratio::Unavailable => write!(f, "N/A"),
        }
    }
}

/// Ratio used on the bedwars card, where a zero denominator falls back to the numerator.
pub fn ratio(value: u64, over: u64) -> f64 {
    if over == 0 {
        value as f64
    } else {
        value as f64 / over as f64
    }
}

pub fn format_stars(stars: u64) -> String {
    if stars < 1000 {
        format!("{}✫", stars)
    } else {
        format!("{}✪", stars)
    }
}

/// Removes Minecraft `§x` colour codes.
pub fn strip_color_codes(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut previous = None;
    for c in text.chars() {
        if c != '§' && previous != Some('§') {
            stripped.push(c);
        }
        previous = Some(c);
    }
    stripped
}

/// `1234567` -> `1,234,567`
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
