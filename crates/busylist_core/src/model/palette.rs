//! Flat color palette offered for new lists.

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use regex::Regex;

/// `#rgb`, `#rrggbb` or `#aarrggbb`.
pub const COLOR_HEX_PATTERN: &str = r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$";

static COLOR_HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(COLOR_HEX_PATTERN).expect("valid color regex"));

/// Colors a new list is seeded with.
pub const FLAT_COLORS: [&str; 20] = [
    "#fc5c65", "#eb3b5a", "#fd9644", "#fa8231", "#fed330", "#f7b731", "#26de81", "#20bf6b",
    "#2bcbba", "#0fb9b1", "#45aaf2", "#2d98da", "#4b7bec", "#3867d6", "#a55eea", "#8854d0",
    "#d1d8e0", "#a5b1c2", "#778ca3", "#4b6584",
];

/// Picks one palette color at random.
pub fn random_flat_color() -> &'static str {
    FLAT_COLORS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FLAT_COLORS[0])
}

/// Accepts `#rgb`, `#rrggbb` and `#aarrggbb` forms.
pub fn is_valid_color_hex(value: &str) -> bool {
    COLOR_HEX_RE.is_match(value.trim())
}

#[cfg(test)]
mod tests {
    use super::{is_valid_color_hex, random_flat_color, FLAT_COLORS};

    #[test]
    fn random_color_comes_from_palette() {
        for _ in 0..32 {
            assert!(FLAT_COLORS.contains(&random_flat_color()));
        }
    }

    #[test]
    fn palette_entries_are_valid_hex() {
        assert!(FLAT_COLORS.iter().all(|color| is_valid_color_hex(color)));
    }

    #[test]
    fn color_hex_rejects_malformed_values() {
        assert!(is_valid_color_hex("#112233"));
        assert!(is_valid_color_hex("#FFF"));
        assert!(!is_valid_color_hex("112233"));
        assert!(!is_valid_color_hex("#11223"));
        assert!(!is_valid_color_hex("#gggggg"));
    }
}
