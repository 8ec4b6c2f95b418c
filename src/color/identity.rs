use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five canonical colors, in WUBRG order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

pub const WUBRG: [Color; 5] = [Color::White, Color::Blue, Color::Black, Color::Red, Color::Green];

impl Color {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Blue => "Blue",
            Color::Black => "Black",
            Color::Red => "Red",
            Color::Green => "Green",
        }
    }

    fn bit(&self) -> u8 {
        match self {
            Color::White => 1,
            Color::Blue => 1 << 1,
            Color::Black => 1 << 2,
            Color::Red => 1 << 3,
            Color::Green => 1 << 4,
        }
    }
}

/// A subset of WUBRG, kept in canonical order regardless of how colors were
/// inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ColorSet(u8);

impl ColorSet {
    pub fn new() -> Self {
        ColorSet(0)
    }

    pub fn from_colors(colors: impl IntoIterator<Item = Color>) -> Self {
        let mut set = ColorSet(0);
        for color in colors {
            set.insert(color);
        }
        set
    }

    pub fn insert(&mut self, color: Color) {
        self.0 |= color.bit();
    }

    pub fn union(&self, other: &ColorSet) -> ColorSet {
        ColorSet(self.0 | other.0)
    }

    pub fn contains(&self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Colors in canonical WUBRG order.
    pub fn colors(&self) -> Vec<Color> {
        WUBRG.iter().copied().filter(|c| self.contains(*c)).collect()
    }

    /// Canonical letter string, e.g. "UR" for blue+red.
    pub fn letters(&self) -> String {
        self.colors().iter().map(Color::letter).collect()
    }
}

/// A deck's color identity: the canonical color subset plus its conventional
/// name (guild for pairs, shard/wedge for triples).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorIdentity {
    pub colors: String,
    pub name: String,
}

impl ColorIdentity {
    pub fn from_set(set: ColorSet) -> Self {
        Self {
            colors: set.letters(),
            name: canonical_name(set),
        }
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }
}

impl fmt::Display for ColorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Conventional name for a color subset: the ten guilds, ten shards/wedges,
/// and explicit names for the extremes.
pub fn canonical_name(set: ColorSet) -> String {
    let letters = set.letters();
    match letters.as_str() {
        "" => "Colorless".to_string(),
        "WU" => "Azorius".to_string(),
        "WB" => "Orzhov".to_string(),
        "WR" => "Boros".to_string(),
        "WG" => "Selesnya".to_string(),
        "UB" => "Dimir".to_string(),
        "UR" => "Izzet".to_string(),
        "UG" => "Simic".to_string(),
        "BR" => "Rakdos".to_string(),
        "BG" => "Golgari".to_string(),
        "RG" => "Gruul".to_string(),
        "WUB" => "Esper".to_string(),
        "WUR" => "Jeskai".to_string(),
        "WUG" => "Bant".to_string(),
        "WBR" => "Mardu".to_string(),
        "WBG" => "Abzan".to_string(),
        "WRG" => "Naya".to_string(),
        "UBR" => "Grixis".to_string(),
        "UBG" => "Sultai".to_string(),
        "URG" => "Temur".to_string(),
        "BRG" => "Jund".to_string(),
        _ if set.len() == 1 => format!("Mono {}", set.colors()[0].name()),
        _ if set.len() == 4 => "Four-Color".to_string(),
        _ => "Five-Color".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_is_order_independent() {
        let a = ColorSet::from_colors([Color::Red, Color::Blue]);
        let b = ColorSet::from_colors([Color::Blue, Color::Red]);
        assert_eq!(a, b);
        assert_eq!(a.letters(), "UR");
    }

    #[test]
    fn test_guild_names() {
        let izzet = ColorSet::from_colors([Color::Blue, Color::Red]);
        assert_eq!(canonical_name(izzet), "Izzet");
        let boros = ColorSet::from_colors([Color::Red, Color::White]);
        assert_eq!(canonical_name(boros), "Boros");
    }

    #[test]
    fn test_wedge_and_shard_names() {
        let jeskai = ColorSet::from_colors([Color::Red, Color::White, Color::Blue]);
        assert_eq!(canonical_name(jeskai), "Jeskai");
        let jund = ColorSet::from_colors([Color::Black, Color::Red, Color::Green]);
        assert_eq!(canonical_name(jund), "Jund");
    }

    #[test]
    fn test_extremes() {
        assert_eq!(canonical_name(ColorSet::new()), "Colorless");
        assert_eq!(
            canonical_name(ColorSet::from_colors([Color::Red])),
            "Mono Red"
        );
        assert_eq!(
            canonical_name(ColorSet::from_colors([
                Color::White,
                Color::Blue,
                Color::Black,
                Color::Red
            ])),
            "Four-Color"
        );
        assert_eq!(canonical_name(ColorSet::from_colors(WUBRG)), "Five-Color");
    }
}
