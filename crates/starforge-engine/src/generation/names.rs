//! Deterministic system and body names.

use crate::core::rng::Rng;

const PREFIXES: [&str; 24] = [
    "Ka", "Ve", "Tor", "Zan", "Or", "Mel", "Syr", "Ith", "Ul", "Bre", "Cas", "Dro",
    "Eri", "Fen", "Gal", "Hes", "Ix", "Jor", "Lum", "Nyx", "Pra", "Quo", "Rha", "Tev",
];
const MIDDLES: [&str; 16] = [
    "ra", "lo", "the", "mi", "na", "ri", "vo", "du", "sae", "ko", "li", "ze", "an", "or", "eu", "ya",
];
const SUFFIXES: [&str; 16] = [
    "n", "s", "x", "th", "ra", "ion", "us", "ae", "is", "on", "ar", "el", "os", "ek", "ia", "um",
];
const GREEK: [&str; 8] = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta"];
const ROMAN: [&str; 12] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII"];

/// A pronounceable name for a star system.
pub fn system_name(rng: &mut Rng) -> String {
    let mut name = String::new();
    name.push_str(PREFIXES[rng.range_u32(0, PREFIXES.len() as u32 - 1) as usize]);
    if rng.chance(0.7) {
        name.push_str(MIDDLES[rng.range_u32(0, MIDDLES.len() as u32 - 1) as usize]);
    }
    name.push_str(SUFFIXES[rng.range_u32(0, SUFFIXES.len() as u32 - 1) as usize]);
    if rng.chance(0.25) {
        name.push(' ');
        name.push_str(GREEK[rng.range_u32(0, GREEK.len() as u32 - 1) as usize]);
    }
    name
}

/// `"<System> <numeral>"`, 0-based index. Indices past XII fall back to digits.
pub fn planet_name(system: &str, index: usize) -> String {
    match ROMAN.get(index) {
        Some(numeral) => format!("{system} {numeral}"),
        None => format!("{system} {}", index + 1),
    }
}

pub fn station_name(planet: &str, index: usize) -> String {
    format!("{planet} Station {}", index + 1)
}

pub fn ship_name(rng: &mut Rng) -> String {
    const CLASSES: [&str; 6] = ["Courier", "Hauler", "Survey", "Tender", "Lancer", "Drifter"];
    let class = CLASSES[rng.range_u32(0, CLASSES.len() as u32 - 1) as usize];
    format!("{class}-{:03}", rng.range_u32(1, 999))
}
