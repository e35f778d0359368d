//! Numeral-string to value conversion.
//!
//! The trait is the seam for adding languages; the Japanese implementation
//! handles mixed Arabic/kanji positional notation ("3万", "一億二千万").

use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use crate::digit::{DigitTable, Notation};

pub trait NumberConverter {
    /// Convert a scanned numeral string to its integer value.
    /// Characters the scanner should not have let through are ignored.
    fn convert(&self, number_string: &str) -> i64;
}

pub struct JapaneseNumberConverter {
    table: Arc<DigitTable>,
}

impl JapaneseNumberConverter {
    pub fn new(table: Arc<DigitTable>) -> Self {
        Self { table }
    }

    /// Cut the string at every ten-thousands scale mark, keeping the mark's
    /// power with the segment it closes. "一億二千万" → [("一", 8), ("二千", 4), ("", 0)]
    fn split_by_kurai_man(&self, s: &str) -> Vec<(String, u32)> {
        let mut segments = Vec::new();
        let mut current = String::new();
        for c in s.chars() {
            if self.table.is_kansuji_kurai_man(c) {
                let power = self.table.power_of(c).unwrap_or(0);
                segments.push((std::mem::take(&mut current), power));
            } else {
                current.push(c);
            }
        }
        segments.push((current, 0));
        segments
    }

    /// Value of a segment without ten-thousands marks: digits accumulate
    /// positionally, a sub-man scale mark closes the accumulator.
    fn convert_mixed_segment(&self, segment: &str) -> i128 {
        let mut result: i128 = 0;
        let mut temp: i128 = 0;
        for c in segment.chars() {
            match self.table.classify(c) {
                Notation::Hankaku => {
                    temp = temp * 10 + (c as i128 - '0' as i128);
                }
                Notation::Kansuji09 => {
                    if let Some(v) = self.table.kansuji09_value(c) {
                        temp = temp * 10 + v as i128;
                    }
                }
                Notation::KansujiKuraiSen => {
                    if let Some(power) = self.table.power_of(c) {
                        if temp == 0 {
                            temp = 1;
                        }
                        result += temp * 10i128.pow(power);
                        temp = 0;
                    }
                }
                _ => {}
            }
        }
        result + temp
    }
}

impl NumberConverter for JapaneseNumberConverter {
    fn convert(&self, number_string: &str) -> i64 {
        let stripped: String = number_string
            .chars()
            .filter(|&c| !self.table.is_comma(c))
            .collect();
        let normalized: String = stripped.nfkc().collect();

        let mut converted: i128 = 0;
        for (segment, power) in self.split_by_kurai_man(&normalized) {
            let value = if segment.is_empty() {
                if power == 0 {
                    continue;
                }
                // A bare scale mark reads as 1 only when nothing has
                // accumulated yet ("万" → 10000); after a value it carries
                // nothing ("1億万" → 100000000).
                if converted == 0 {
                    1
                } else {
                    continue;
                }
            } else {
                self.convert_mixed_segment(&segment)
            };
            converted += value * 10i128.pow(power);
        }

        i64::try_from(converted).unwrap_or(i64::MAX)
    }
}
