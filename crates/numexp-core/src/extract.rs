//! Number extraction: locating numeral runs in text and splitting runs that
//! mix notations which cannot belong to one number.

use std::sync::Arc;

use crate::digit::{DigitTable, Notation};
use crate::expression::NNumber;

pub struct NumberExtractor {
    table: Arc<DigitTable>,
}

/// Adjacent notation classes that force a token boundary
fn is_invalid_pair(prev: Notation, cur: Notation) -> bool {
    use Notation::*;
    matches!(
        (prev, cur),
        (Hankaku, Zenkaku)
            | (Zenkaku, Hankaku)
            | (Hankaku, Kansuji09)
            | (Kansuji09, Hankaku)
            | (Zenkaku, Kansuji09)
            | (Kansuji09, Zenkaku)
    )
}

impl NumberExtractor {
    pub fn new(table: Arc<DigitTable>) -> Self {
        Self { table }
    }

    /// Extract every number token from `chars`, positions in char offsets
    pub fn extract(&self, chars: &[char]) -> Vec<NNumber> {
        let runs = self.scan_runs(chars);
        let split = self.split_by_notation_type(runs);
        split
            .into_iter()
            .flat_map(|n| self.split_by_kansuji_kurai(n))
            .collect()
    }

    fn make_number(&self, chars: &[char], start: usize, end: usize) -> NNumber {
        let mut number = NNumber::new(chars[start..end].iter().collect::<String>(), start, end);
        number.notation_types = chars[start..end].iter().map(|&c| self.table.classify(c)).collect();
        number
    }

    /// Contiguous runs of numeral characters
    fn scan_runs(&self, chars: &[char]) -> Vec<NNumber> {
        let mut numbers = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            if self.table.is_number(chars[i]) {
                let start = i;
                while i < chars.len() && self.table.is_number(chars[i]) {
                    i += 1;
                }
                numbers.push(self.make_number(chars, start, i));
            } else {
                i += 1;
            }
        }
        numbers
    }

    /// Cut a run wherever two adjacent characters cannot share a number
    /// ("2000三十" is two numbers, not one)
    fn split_by_notation_type(&self, numbers: Vec<NNumber>) -> Vec<NNumber> {
        let mut result = Vec::new();
        for number in numbers {
            let chars: Vec<char> = number.original_expr.chars().collect();
            let mut piece_start = 0;
            for i in 1..chars.len() {
                if is_invalid_pair(number.notation_types[i - 1], number.notation_types[i]) {
                    result.push(self.piece(&number, &chars, piece_start, i));
                    piece_start = i;
                }
            }
            result.push(self.piece(&number, &chars, piece_start, chars.len()));
        }
        result
    }

    /// Cut at a scale mark that cannot continue the running numeral: an
    /// equal scale repeating ("千千") or a ten-thousands mark after a piece
    /// that already closed one ("一万五千七百" + "億")
    fn split_by_kansuji_kurai(&self, number: NNumber) -> Vec<NNumber> {
        let chars: Vec<char> = number.original_expr.chars().collect();
        let mut result = Vec::new();
        let mut piece_start = 0;
        let mut last_power: Option<u32> = None;
        let mut piece_has_man = false;

        for (i, &c) in chars.iter().enumerate() {
            if !number.notation_types[i].is_kansuji_kurai() {
                continue;
            }
            let cur_power = match self.table.power_of(c) {
                Some(p) => p,
                None => continue,
            };
            if let Some(prev_power) = last_power {
                if prev_power == cur_power || (prev_power < cur_power && piece_has_man) {
                    result.push(self.piece(&number, &chars, piece_start, i));
                    piece_start = i;
                    piece_has_man = false;
                }
            }
            last_power = Some(cur_power);
            if self.table.is_kansuji_kurai_man(c) {
                piece_has_man = true;
            }
        }

        result.push(self.piece(&number, &chars, piece_start, chars.len()));
        result
    }

    fn piece(&self, number: &NNumber, chars: &[char], from: usize, to: usize) -> NNumber {
        let mut piece = NNumber::new(
            chars[from..to].iter().collect::<String>(),
            number.position_start + from,
            number.position_start + to,
        );
        piece.notation_types = number.notation_types[from..to].to_vec();
        piece
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::{Dictionaries, Language};

    fn extractor() -> NumberExtractor {
        let dict = Dictionaries::load(Language::Japanese).unwrap();
        NumberExtractor::new(Arc::new(DigitTable::new(&dict.characters)))
    }

    fn extract(text: &str) -> Vec<NNumber> {
        let chars: Vec<char> = text.chars().collect();
        extractor().extract(&chars)
    }

    #[test]
    fn test_simple_runs() {
        let numbers = extract("あと3日で1000円");
        assert_eq!(numbers.len(), 2);
        assert_eq!(numbers[0].original_expr, "3");
        assert_eq!((numbers[0].position_start, numbers[0].position_end), (2, 3));
        assert_eq!(numbers[1].original_expr, "1000");
        assert_eq!((numbers[1].position_start, numbers[1].position_end), (5, 9));
    }

    #[test]
    fn test_notation_split() {
        let numbers = extract("2000三十");
        assert_eq!(numbers.len(), 2);
        assert_eq!(numbers[0].original_expr, "2000");
        assert_eq!(numbers[1].original_expr, "三十");
    }

    #[test]
    fn test_digit_kurai_stays_joined() {
        // a scale mark may follow digits: "3万" is one number
        let numbers = extract("3万人");
        assert_eq!(numbers.len(), 1);
        assert_eq!(numbers[0].original_expr, "3万");
    }

    #[test]
    fn test_kansuji_kurai_split() {
        let numbers = extract("一万五千七百億");
        assert_eq!(numbers.len(), 2);
        assert_eq!(numbers[0].original_expr, "一万五千七百");
        assert_eq!(numbers[1].original_expr, "億");

        let numbers = extract("千千");
        assert_eq!(numbers.len(), 2);

        let numbers = extract("一億二千四百五十六万三千九百二十一");
        assert_eq!(numbers.len(), 1);
    }
}
