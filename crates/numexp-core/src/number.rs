//! The number-normalization pipeline: extraction, comma joining, numeral
//! conversion, vague-quantity folding and symbol handling.

use std::sync::Arc;

use crate::convert::{JapaneseNumberConverter, NumberConverter};
use crate::dict::Language;
use crate::digit::{DigitTable, Notation};
use crate::expression::NNumber;
use crate::extract::NumberExtractor;
use crate::symbol::SymbolFixer;

/// The vague-quantity marker ("数万" = some tens of thousands)
const SU: char = '数';

pub struct NumberNormalizer {
    table: Arc<DigitTable>,
    extractor: NumberExtractor,
    converter: Box<dyn NumberConverter + Send + Sync>,
    symbol_fixer: SymbolFixer,
}

impl NumberNormalizer {
    pub fn new(language: Language, table: Arc<DigitTable>) -> Self {
        let converter: Box<dyn NumberConverter + Send + Sync> = match language {
            Language::Japanese => Box::new(JapaneseNumberConverter::new(table.clone())),
        };
        Self {
            extractor: NumberExtractor::new(table.clone()),
            converter,
            symbol_fixer: SymbolFixer::new(table.clone()),
            table,
        }
    }

    /// Extract and normalize every number in `chars`.
    ///
    /// `do_fix_symbol` is off for the calendar/clock domain, which needs the
    /// tokens around separators kept apart for its own pattern matching.
    pub fn process(&self, chars: &[char], do_fix_symbol: bool) -> Vec<NNumber> {
        let numbers = self.extractor.extract(chars);
        let numbers = self.join_numbers_by_comma(chars, numbers);
        let numbers = self.convert_number(numbers);
        let numbers = self.fix_numbers_by_su(chars, numbers);
        let numbers = self.remove_only_kansuji_kurai_man(numbers);
        let numbers = if do_fix_symbol {
            self.symbol_fixer.fix_numbers_by_symbol(chars, numbers)
        } else {
            numbers
        };
        self.remove_unnecessary_data(numbers)
    }

    fn is_arabic(&self, c: char) -> bool {
        matches!(self.table.classify(c), Notation::Hankaku | Notation::Zenkaku)
    }

    fn suffix_is_arabic(&self, s: &str) -> bool {
        s.chars().last().map_or(false, |c| self.is_arabic(c))
    }

    fn prefix_3digits_is_arabic(&self, s: &str) -> bool {
        let chars: Vec<char> = s.chars().take(3).collect();
        chars.len() == 3 && chars.iter().all(|&c| self.is_arabic(c))
    }

    /// "3,000" joins; "29,30" stays two tokens
    fn is_valid_comma_notation(&self, left: &str, right: &str) -> bool {
        let right_chars: Vec<char> = right.chars().collect();
        self.suffix_is_arabic(left)
            && self.prefix_3digits_is_arabic(right)
            && (right_chars.len() == 3 || !self.is_arabic(right_chars[3]))
    }

    fn join_numbers_by_comma(&self, chars: &[char], numbers: Vec<NNumber>) -> Vec<NNumber> {
        let mut numbers = numbers;
        // right to left so chains like "1,234,567" fold up
        for i in (1..numbers.len()).rev() {
            let gap = numbers[i - 1].position_end;
            if gap != numbers[i].position_start - 1 {
                continue;
            }
            let separator = chars[gap];
            if !self.table.is_comma(separator) {
                continue;
            }
            if !self.is_valid_comma_notation(
                &numbers[i - 1].original_expr,
                &numbers[i].original_expr,
            ) {
                continue;
            }

            let right = numbers.remove(i);
            let left = &mut numbers[i - 1];
            left.position_end = right.position_end;
            left.original_expr.push(separator);
            left.original_expr.push_str(&right.original_expr);
        }
        numbers
    }

    fn convert_number(&self, mut numbers: Vec<NNumber>) -> Vec<NNumber> {
        for number in &mut numbers {
            let value = self.converter.convert(&number.original_expr) as f64;
            number.value_lower_bound = value;
            number.value_upper_bound = value;
        }
        numbers
    }

    /// "数十万円" style: a leading marker widens the range ninefold
    fn fix_prefix_su(&self, chars: &[char], number: &mut NNumber) {
        if number.position_start == 0 || chars[number.position_start - 1] != SU {
            return;
        }
        number.value_upper_bound *= 9.0;
        number.position_start -= 1;
        number.original_expr.insert(0, SU);
    }

    /// "十数万円" style: scale the left token up to the right one, then sum
    fn fix_intermediate_su(
        &self,
        chars: &[char],
        cur: &NNumber,
        next: &NNumber,
    ) -> Option<NNumber> {
        if cur.position_end != next.position_start - 1 || chars[cur.position_end] != SU {
            return None;
        }

        let mut fixed = cur.clone();
        while next.value_lower_bound >= fixed.value_lower_bound {
            fixed.value_lower_bound *= 10f64.powi(4);
            if fixed.value_lower_bound <= 0.0 {
                return None;
            }
        }

        fixed.value_upper_bound = fixed.value_lower_bound;
        fixed.value_lower_bound += next.value_lower_bound;
        fixed.value_upper_bound += next.value_upper_bound * 9.0;
        fixed.position_end = next.position_end;
        fixed.original_expr.push(SU);
        fixed.original_expr.push_str(&next.original_expr);
        Some(fixed)
    }

    /// "十数円" style: a trailing marker adds one to nine
    fn fix_suffix_su(&self, chars: &[char], number: &mut NNumber) {
        if number.position_end == chars.len() || chars[number.position_end] != SU {
            return;
        }
        number.value_lower_bound += 1.0;
        number.value_upper_bound += 9.0;
        number.position_end += 1;
        number.original_expr.push(SU);
    }

    fn fix_numbers_by_su(&self, chars: &[char], numbers: Vec<NNumber>) -> Vec<NNumber> {
        let mut numbers = numbers;
        let mut i = 0;
        while i < numbers.len() {
            self.fix_prefix_su(chars, &mut numbers[i]);
            if i + 1 < numbers.len() {
                if let Some(fixed) = self.fix_intermediate_su(chars, &numbers[i], &numbers[i + 1])
                {
                    numbers[i] = fixed;
                    numbers.remove(i + 1);
                }
            }
            self.fix_suffix_su(chars, &mut numbers[i]);
            i += 1;
        }
        numbers
    }

    /// Bare scale marks ("万", "億") are not numbers on their own
    fn remove_only_kansuji_kurai_man(&self, mut numbers: Vec<NNumber>) -> Vec<NNumber> {
        numbers.retain(|n| {
            !n.original_expr
                .chars()
                .all(|c| self.table.is_kansuji_kurai_man(c))
        });
        numbers
    }

    fn remove_unnecessary_data(&self, numbers: Vec<NNumber>) -> Vec<NNumber> {
        let mut result: Vec<NNumber> = Vec::new();
        let mut covered_end = 0;
        for number in numbers {
            if let Some(last) = result.last() {
                if last.position_start <= number.position_start && number.position_end <= covered_end
                {
                    continue;
                }
            }
            if covered_end <= number.position_start {
                covered_end = number.position_end;
                result.push(number);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::Dictionaries;

    fn normalizer() -> NumberNormalizer {
        let dict = Dictionaries::load(Language::Japanese).unwrap();
        let table = Arc::new(DigitTable::new(&dict.characters));
        NumberNormalizer::new(Language::Japanese, table)
    }

    fn process(text: &str) -> Vec<NNumber> {
        let chars: Vec<char> = text.chars().collect();
        normalizer().process(&chars, true)
    }

    #[test]
    fn test_comma_join() {
        let numbers = process("価格は3,000円です");
        assert_eq!(numbers[0].original_expr, "3,000");
        assert_eq!(numbers[0].value_lower_bound, 3000.0);

        let numbers = process("1,234,567個の星");
        assert_eq!(numbers[0].original_expr, "1,234,567");
        assert_eq!(numbers[0].value_lower_bound, 1_234_567.0);
    }

    #[test]
    fn test_comma_enumeration_not_joined_as_digits() {
        // consecutive values merge into a range, not into "2930"
        let numbers = process("29,30が好きだ");
        assert_eq!(numbers.len(), 1);
        assert_eq!(numbers[0].value_lower_bound, 29.0);
        assert_eq!(numbers[0].value_upper_bound, 30.0);
    }

    #[test]
    fn test_su_prefix() {
        let numbers = process("数十人が集まった");
        assert_eq!(numbers[0].original_expr, "数十");
        assert_eq!(numbers[0].value_lower_bound, 10.0);
        assert_eq!(numbers[0].value_upper_bound, 90.0);
    }

    #[test]
    fn test_su_suffix() {
        let numbers = process("十数人が集まった");
        assert_eq!(numbers[0].original_expr, "十数");
        assert_eq!(numbers[0].value_lower_bound, 11.0);
        assert_eq!(numbers[0].value_upper_bound, 19.0);
    }

    #[test]
    fn test_su_intermediate() {
        let numbers = process("百数十円かかった");
        assert_eq!(numbers[0].original_expr, "百数十");
        assert_eq!(numbers[0].value_lower_bound, 110.0);
        assert_eq!(numbers[0].value_upper_bound, 190.0);

        let numbers = process("十数万円かかった");
        assert_eq!(numbers[0].original_expr, "十数万");
        assert_eq!(numbers[0].value_lower_bound, 110_000.0);
        assert_eq!(numbers[0].value_upper_bound, 190_000.0);
    }

    #[test]
    fn test_bare_scale_mark_removed() {
        assert!(process("万全を期す").is_empty());
    }
}
