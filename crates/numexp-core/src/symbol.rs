//! Sign, decimal-point and range-connector handling between number tokens.

use std::sync::Arc;

use crate::digit::DigitTable;
use crate::expression::{NNumber, INF};

pub struct SymbolFixer {
    table: Arc<DigitTable>,
}

impl SymbolFixer {
    pub fn new(table: Arc<DigitTable>) -> Self {
        Self { table }
    }

    /// Attach sign prefixes and merge token pairs joined by a decimal point,
    /// a range connector, or an enumerating comma over consecutive values.
    pub fn fix_numbers_by_symbol(&self, text: &[char], numbers: Vec<NNumber>) -> Vec<NNumber> {
        let mut numbers = numbers;
        let mut i = 0;
        while i < numbers.len() {
            numbers[i] = self.fix_prefix_symbol(text, &numbers[i]);

            if i + 1 < numbers.len() {
                if let Some(merged) =
                    self.fix_intermediate_symbol(text, &numbers[i], &numbers[i + 1])
                {
                    numbers[i] = merged;
                    numbers.remove(i + 1);
                }
            }

            i += 1;
        }
        numbers
    }

    fn extract_plus(&self, text: &[char], i: isize) -> Option<String> {
        if i < 0 {
            return None;
        }
        let i = i as usize;
        if text[i] == '+' || text[i] == '＋' {
            Some(text[i].to_string())
        } else if i >= 2 && text[i - 2..=i] == ['プ', 'ラ', 'ス'] {
            Some("プラス".to_string())
        } else {
            None
        }
    }

    fn extract_minus(&self, text: &[char], i: isize) -> Option<String> {
        if i < 0 {
            return None;
        }
        let i = i as usize;
        if text[i] == '-' || text[i] == '－' || text[i] == 'ー' {
            Some(text[i].to_string())
        } else if i >= 3 && text[i - 3..=i] == ['マ', 'イ', 'ナ', 'ス'] {
            Some("マイナス".to_string())
        } else {
            None
        }
    }

    fn fix_prefix_symbol(&self, text: &[char], number: &NNumber) -> NNumber {
        let mut fixed = number.clone();
        let before = number.position_start as isize - 1;

        if let Some(plus) = self.extract_plus(text, before) {
            fixed.position_start -= plus.chars().count();
            fixed.original_expr = plus + &fixed.original_expr;
            return fixed;
        }
        if let Some(minus) = self.extract_minus(text, before) {
            fixed.position_start -= minus.chars().count();
            fixed.original_expr = minus + &fixed.original_expr;
            fixed.value_lower_bound *= -1.0;
            fixed.value_upper_bound *= -1.0;
            return fixed;
        }

        fixed
    }

    /// Fraction digits to a value below one, honoring written leading zeros
    /// ("1.001": the "001" token converts to 1, the zeros add two shifts)
    fn create_decimal_value(&self, number: &NNumber) -> f64 {
        let mut decimal = number.value_lower_bound;
        while decimal >= 1.0 {
            decimal *= 0.1;
        }
        for c in number.original_expr.chars() {
            if !matches!(c, '0' | '０' | '零' | '〇') {
                break;
            }
            decimal *= 0.1;
        }
        decimal
    }

    fn fix_decimal_point(
        &self,
        number: &NNumber,
        next_number: &NNumber,
        decimal_string: char,
    ) -> NNumber {
        let mut fixed = number.clone();
        fixed.value_lower_bound += self.create_decimal_value(next_number);

        // a trailing scale mark rescales the whole decimal ("9.3万" → 93000)
        if let Some(last) = next_number.original_expr.chars().last() {
            if self.table.is_kansuji_kurai_man(last) {
                if let Some(power) = self.table.power_of(last) {
                    fixed.value_lower_bound *= 10f64.powi(power as i32);
                }
            }
        }

        fixed.value_upper_bound = fixed.value_lower_bound;
        fixed.original_expr.push(decimal_string);
        fixed.original_expr.push_str(&next_number.original_expr);
        fixed.position_end = next_number.position_end;
        fixed
    }

    fn fix_range_expression(
        &self,
        number: &NNumber,
        next_number: &NNumber,
        range_string: &str,
    ) -> NNumber {
        let mut fixed = number.clone();
        fixed.value_upper_bound = next_number.value_lower_bound;
        fixed.original_expr.push_str(range_string);
        fixed.original_expr.push_str(&next_number.original_expr);
        fixed.position_end = next_number.position_end;
        fixed
    }

    fn fix_intermediate_symbol(
        &self,
        text: &[char],
        number: &NNumber,
        next_number: &NNumber,
    ) -> Option<NNumber> {
        let i = number.position_end;
        let j = next_number.position_start;
        if i > j || i == j {
            return None;
        }

        let intermediate: String = text[i..j].iter().collect();
        if number.value_lower_bound == INF || next_number.value_lower_bound == INF {
            return None;
        }

        let first = text[i];
        if self.table.is_decimal_point(first) {
            return Some(self.fix_decimal_point(number, next_number, first));
        }

        let comma_enumeration = self.table.is_comma(first)
            && intermediate.chars().count() == 1
            && number.value_lower_bound == next_number.value_upper_bound - 1.0;
        if self.table.is_range_expression(&intermediate) || comma_enumeration {
            return Some(self.fix_range_expression(number, next_number, &intermediate));
        }

        None
    }
}
