//! Homoglyph detection tables
//!
//! Three independent detectors, each returning hits ordered by character
//! position: Latin digit/digraph tricks, Cyrillic lookalike letters, and
//! Japanese fullwidth forms.

use serde::{Deserialize, Serialize};

/// One confusable character (or digraph) found in a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Homoglyph {
    /// Character offset of the confusable in the domain
    pub position: usize,
    /// The confusable text as it appears
    pub original: String,
    /// The Latin text it impersonates
    pub possible_replacement: String,
}

impl Homoglyph {
    fn new(position: usize, original: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            position,
            original: original.into(),
            possible_replacement: replacement.into(),
        }
    }
}

/// Latin-internal confusables: digits standing in for letters and the
/// classic `rn`->`m` / `vv`->`w` digraphs
pub fn detect_latin_homoglyphs(domain: &str) -> Vec<Homoglyph> {
    let chars: Vec<char> = domain.chars().collect();
    let mut hits = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if i + 1 < chars.len() {
            match (chars[i], chars[i + 1]) {
                ('r', 'n') => {
                    hits.push(Homoglyph::new(i, "rn", "m"));
                    i += 2;
                    continue;
                }
                ('v', 'v') => {
                    hits.push(Homoglyph::new(i, "vv", "w"));
                    i += 2;
                    continue;
                }
                _ => {}
            }
        }
        match chars[i] {
            '0' => hits.push(Homoglyph::new(i, "0", "o")),
            '1' => hits.push(Homoglyph::new(i, "1", "l")),
            _ => {}
        }
        i += 1;
    }
    hits
}

/// Cyrillic letter that renders identically to a Latin letter
fn cyrillic_lookalike(c: char) -> Option<&'static str> {
    match c {
        'а' => Some("a"),
        'е' => Some("e"),
        'о' => Some("o"),
        'р' => Some("p"),
        'с' => Some("c"),
        'у' => Some("y"),
        'х' => Some("x"),
        'і' => Some("i"),
        'ѕ' => Some("s"),
        'ј' => Some("j"),
        _ => None,
    }
}

/// Cyrillic lookalike letters embedded in a domain
pub fn detect_cyrillic_homoglyphs(domain: &str) -> Vec<Homoglyph> {
    domain
        .chars()
        .enumerate()
        .filter_map(|(i, c)| {
            cyrillic_lookalike(c).map(|replacement| Homoglyph::new(i, c.to_string(), replacement))
        })
        .collect()
}

/// Japanese-script confusables: fullwidth Latin forms and the katakana
/// prolonged-sound mark standing in for a hyphen
pub fn detect_japanese_homoglyphs(domain: &str) -> Vec<Homoglyph> {
    domain
        .chars()
        .enumerate()
        .filter_map(|(i, c)| match c as u32 {
            // Fullwidth A-Z / a-z map onto their ASCII counterparts
            0xFF21..=0xFF3A => {
                let ascii = char::from_u32(c as u32 - 0xFF21 + 'A' as u32)?;
                Some(Homoglyph::new(i, c.to_string(), ascii.to_string()))
            }
            0xFF41..=0xFF5A => {
                let ascii = char::from_u32(c as u32 - 0xFF41 + 'a' as u32)?;
                Some(Homoglyph::new(i, c.to_string(), ascii.to_string()))
            }
            // Katakana prolonged sound mark resembles a hyphen
            0x30FC => Some(Homoglyph::new(i, c.to_string(), "-")),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_digit_homoglyphs() {
        let hits = detect_latin_homoglyphs("g00gle.com");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].position, 1);
        assert_eq!(hits[0].original, "0");
        assert_eq!(hits[0].possible_replacement, "o");
        assert_eq!(hits[1].position, 2);
    }

    #[test]
    fn test_latin_digraph_rn() {
        let hits = detect_latin_homoglyphs("rnicrosoft.com");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].position, 0);
        assert_eq!(hits[0].original, "rn");
        assert_eq!(hits[0].possible_replacement, "m");
    }

    #[test]
    fn test_latin_digraph_vv() {
        let hits = detect_latin_homoglyphs("vvikipedia.org");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].original, "vv");
        assert_eq!(hits[0].possible_replacement, "w");
    }

    #[test]
    fn test_latin_one_for_l() {
        let hits = detect_latin_homoglyphs("paypa1.com");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].original, "1");
        assert_eq!(hits[0].possible_replacement, "l");
    }

    #[test]
    fn test_latin_clean_domain() {
        assert!(detect_latin_homoglyphs("example.com").is_empty());
    }

    #[test]
    fn test_hits_ordered_by_position() {
        let hits = detect_latin_homoglyphs("1rn0vv");
        let positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_cyrillic_canonical_pairs() {
        // All-Cyrillic "apple" lookalike: а р р ӏ е — use detectable subset
        let hits = detect_cyrillic_homoglyphs("аpple.com");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].position, 0);
        assert_eq!(hits[0].original, "а");
        assert_eq!(hits[0].possible_replacement, "a");
    }

    #[test]
    fn test_cyrillic_mirror_set() {
        let hits = detect_cyrillic_homoglyphs("ѕх");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].possible_replacement, "s");
        assert_eq!(hits[1].possible_replacement, "x");
    }

    #[test]
    fn test_cyrillic_ignores_latin() {
        assert!(detect_cyrillic_homoglyphs("apple.com").is_empty());
    }

    #[test]
    fn test_japanese_fullwidth_letters() {
        let hits = detect_japanese_homoglyphs("ｇoogle.com");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].position, 0);
        assert_eq!(hits[0].possible_replacement, "g");
    }

    #[test]
    fn test_japanese_prolonged_sound_mark() {
        let hits = detect_japanese_homoglyphs("abcーdef");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].position, 3);
        assert_eq!(hits[0].possible_replacement, "-");
    }

    #[test]
    fn test_japanese_ignores_regular_kana() {
        assert!(detect_japanese_homoglyphs("ひらがな.jp").is_empty());
    }
}
