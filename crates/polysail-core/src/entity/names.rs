//! Island name generation.

use rand::Rng;

/// Generates an island name from two random syllables.
pub fn island_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = SYLLABLES[rng.gen_range(0..SYLLABLES.len())];
    let second = SYLLABLES[rng.gen_range(0..SYLLABLES.len())];
    format!("{first}{second}")
}

/// Name as shown on the island label: first letter upper-cased.
#[must_use]
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

static SYLLABLES: &[&str] = &[
    // Open vowels
    "a", "e", "i", "o", "u",
    // Soft
    "la", "le", "li", "lo", "lu", "ma", "me", "mi", "mo", "mu", "na", "ne", "ni", "no", "nu",
    "sa", "se", "si", "so", "su", "wa", "wi", "ya", "yo",
    // Hard
    "ka", "ke", "ki", "ko", "ku", "ta", "te", "ti", "to", "tu", "pa", "pe", "pi", "po", "pu",
    "ra", "re", "ri", "ro", "ru",
    // Closed
    "kal", "mar", "nor", "tan", "vel", "sor", "lin", "dun", "bar", "hol", "rin", "ves",
];
