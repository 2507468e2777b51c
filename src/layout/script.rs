//! Script classification and font slots.
//!
//! Every character of label text is drawn with exactly one of four fonts.
//! Classification is by code point range, checked in a fixed precedence
//! order; characters outside every range fall back to the first available
//! CJK font.

use std::collections::BTreeMap;

/// Font used to draw a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontSlot {
    /// Printable ASCII, built-in Helvetica
    Latin,
    /// Han ideographs
    SimplifiedChinese,
    /// Kana
    Japanese,
    /// Hangul
    Korean,
}

impl FontSlot {
    /// All slots.
    pub const ALL: [FontSlot; 4] = [
        FontSlot::Latin,
        FontSlot::SimplifiedChinese,
        FontSlot::Japanese,
        FontSlot::Korean,
    ];

    /// Slots tried, in order, for characters no range claims.
    pub const FALLBACK: [FontSlot; 3] = [
        FontSlot::SimplifiedChinese,
        FontSlot::Japanese,
        FontSlot::Korean,
    ];

    /// Human-readable script name.
    pub fn script_name(&self) -> &'static str {
        match self {
            FontSlot::Latin => "Latin",
            FontSlot::SimplifiedChinese => "Simplified Chinese",
            FontSlot::Japanese => "Japanese",
            FontSlot::Korean => "Korean",
        }
    }

    /// PDF font resource name.
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontSlot::Latin => "F1",
            FontSlot::SimplifiedChinese => "F2",
            FontSlot::Japanese => "F3",
            FontSlot::Korean => "F4",
        }
    }
}

/// Script name reported for characters no range claims.
pub const UNCLASSIFIED_SCRIPT: &str = "Unclassified";

fn is_latin(cp: u32) -> bool {
    (0x20..=0x7E).contains(&cp)
}

fn is_japanese(cp: u32) -> bool {
    matches!(cp,
        0x3040..=0x309F   // Hiragana
        | 0x30A0..=0x30FF // Katakana
        | 0x31F0..=0x31FF // Katakana phonetic extensions
        | 0xFF65..=0xFF9F // Halfwidth katakana
    )
}

fn is_korean(cp: u32) -> bool {
    matches!(cp,
        0x1100..=0x11FF   // Hangul Jamo
        | 0x3130..=0x318F // Compatibility Jamo
        | 0xA960..=0xA97F // Jamo extended-A
        | 0xAC00..=0xD7AF // Syllables
        | 0xD7B0..=0xD7FF // Jamo extended-B
        | 0xFFA0..=0xFFDC // Halfwidth Hangul
    )
}

fn is_han(cp: u32) -> bool {
    matches!(cp,
        0x3400..=0x4DBF     // Extension A
        | 0x4E00..=0x9FFF   // Unified ideographs
        | 0xF900..=0xFAFF   // Compatibility ideographs
        | 0x20000..=0x2EBEF // Extensions B-F
        | 0x2F800..=0x2FA1F // Compatibility supplement
        | 0x30000..=0x3134F // Extension G
    )
}

/// Slot claimed by a character's code point range, if any.
pub fn classify(ch: char) -> Option<FontSlot> {
    let cp = ch as u32;
    if is_latin(cp) {
        Some(FontSlot::Latin)
    } else if is_japanese(cp) {
        Some(FontSlot::Japanese)
    } else if is_korean(cp) {
        Some(FontSlot::Korean)
    } else if is_han(cp) {
        Some(FontSlot::SimplifiedChinese)
    } else {
        None
    }
}

/// Which slots a body of text needs, found before any font is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptUsage {
    first_char: BTreeMap<FontSlot, char>,
    fallback: Option<char>,
}

impl ScriptUsage {
    /// Scan text values.
    pub fn scan<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut usage = Self::default();
        for text in texts {
            usage.add(text.as_ref());
        }
        usage
    }

    /// Record one more text value.
    pub fn add(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                continue;
            }
            match classify(ch) {
                Some(slot) => {
                    self.first_char.entry(slot).or_insert(ch);
                },
                None => {
                    self.fallback.get_or_insert(ch);
                },
            }
        }
    }

    /// Whether a slot is needed.
    pub fn requires(&self, slot: FontSlot) -> bool {
        self.first_char.contains_key(&slot)
    }

    /// First character seen for a slot.
    pub fn first_char(&self, slot: FontSlot) -> Option<char> {
        self.first_char.get(&slot).copied()
    }

    /// Needed slots, in slot order.
    pub fn slots(&self) -> impl Iterator<Item = FontSlot> + '_ {
        self.first_char.keys().copied()
    }

    /// First character that only a fallback font can draw.
    pub fn fallback_char(&self) -> Option<char> {
        self.fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_precedence() {
        assert_eq!(classify('A'), Some(FontSlot::Latin));
        assert_eq!(classify('~'), Some(FontSlot::Latin));
        assert_eq!(classify('あ'), Some(FontSlot::Japanese));
        assert_eq!(classify('カ'), Some(FontSlot::Japanese));
        assert_eq!(classify('ｶ'), Some(FontSlot::Japanese));
        assert_eq!(classify('한'), Some(FontSlot::Korean));
        assert_eq!(classify('ㄱ'), Some(FontSlot::Korean));
        assert_eq!(classify('中'), Some(FontSlot::SimplifiedChinese));
        assert_eq!(classify('é'), None);
        assert_eq!(classify('。'), None);
    }

    #[test]
    fn test_scan_usage() {
        let usage = ScriptUsage::scan(["Order 12", "王 さん", ""]);
        assert!(usage.requires(FontSlot::Latin));
        assert!(usage.requires(FontSlot::SimplifiedChinese));
        assert!(usage.requires(FontSlot::Japanese));
        assert!(!usage.requires(FontSlot::Korean));
        assert_eq!(usage.first_char(FontSlot::Japanese), Some('さ'));
        assert_eq!(usage.fallback_char(), None);

        let usage = ScriptUsage::scan(["Zoë"]);
        assert_eq!(usage.fallback_char(), Some('ë'));
    }

    #[test]
    fn test_resource_names_are_distinct() {
        let mut names: Vec<_> = FontSlot::ALL.iter().map(FontSlot::resource_name).collect();
        names.dedup();
        assert_eq!(names.len(), 4);
    }
}
