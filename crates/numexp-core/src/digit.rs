//! Character-level numeral classification.
//!
//! Built from the character dictionary at construction; everything else in
//! the pipeline asks this table what a character is instead of hardcoding
//! numeral sets.

use std::collections::HashMap;

use crate::dict::ChineseCharacter;

/// Notation class of a single character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    NotNumber,
    /// Kanji ones numeral (〇 一 .. 九)
    Kansuji09,
    /// Kanji scale mark below ten thousand (十 百 千)
    KansujiKuraiSen,
    /// Kanji scale mark of ten thousand and above (万 億 兆 京)
    KansujiKuraiMan,
    /// Full-width digit （０..９）
    Zenkaku,
    /// ASCII digit
    Hankaku,
}

impl Notation {
    pub fn is_kansuji(self) -> bool {
        matches!(
            self,
            Notation::Kansuji09 | Notation::KansujiKuraiSen | Notation::KansujiKuraiMan
        )
    }

    pub fn is_kansuji_kurai(self) -> bool {
        matches!(self, Notation::KansujiKuraiSen | Notation::KansujiKuraiMan)
    }
}

/// Characters that connect the two ends of a range expression
const RANGE_EXPRESSIONS: &[&str] = &["~", "〜", "～", "-", "−", "ー", "―", "から"];

/// Numeral lookup table for one language
#[derive(Debug, Clone)]
pub struct DigitTable {
    kansuji09: HashMap<char, i64>,
    kurai_sen: HashMap<char, u32>,
    kurai_man: HashMap<char, u32>,
}

impl DigitTable {
    pub fn new(characters: &[ChineseCharacter]) -> Self {
        let mut kansuji09 = HashMap::new();
        let mut kurai_sen = HashMap::new();
        let mut kurai_man = HashMap::new();
        for entry in characters {
            match entry.notation_type.as_str() {
                "09" => {
                    kansuji09.insert(entry.character, entry.value);
                }
                "sen" => {
                    kurai_sen.insert(entry.character, entry.value as u32);
                }
                "man" => {
                    kurai_man.insert(entry.character, entry.value as u32);
                }
                other => {
                    tracing::warn!(character = %entry.character, notation_type = other,
                                   "unknown notation type in character dictionary");
                }
            }
        }
        Self { kansuji09, kurai_sen, kurai_man }
    }

    pub fn classify(&self, c: char) -> Notation {
        if c.is_ascii_digit() {
            Notation::Hankaku
        } else if ('０'..='９').contains(&c) {
            Notation::Zenkaku
        } else if self.kansuji09.contains_key(&c) {
            Notation::Kansuji09
        } else if self.kurai_sen.contains_key(&c) {
            Notation::KansujiKuraiSen
        } else if self.kurai_man.contains_key(&c) {
            Notation::KansujiKuraiMan
        } else {
            Notation::NotNumber
        }
    }

    pub fn is_number(&self, c: char) -> bool {
        self.classify(c) != Notation::NotNumber
    }

    /// Digit value of a kanji ones numeral
    pub fn kansuji09_value(&self, c: char) -> Option<i64> {
        self.kansuji09.get(&c).copied()
    }

    /// Power of ten a scale mark multiplies by (十→1, 百→2, 千→3, 万→4, ...)
    pub fn power_of(&self, c: char) -> Option<u32> {
        self.kurai_sen
            .get(&c)
            .or_else(|| self.kurai_man.get(&c))
            .copied()
    }

    pub fn is_kansuji_kurai_man(&self, c: char) -> bool {
        self.kurai_man.contains_key(&c)
    }

    pub fn is_comma(&self, c: char) -> bool {
        matches!(c, ',' | '、' | '，')
    }

    pub fn is_decimal_point(&self, c: char) -> bool {
        matches!(c, '.' | '・' | '．')
    }

    /// Whether the text between two numbers reads as a range connector
    pub fn is_range_expression(&self, s: &str) -> bool {
        RANGE_EXPRESSIONS.contains(&s)
    }
}
