//! Quantity normalization: counters, SI prefixes, ratio notation and the
//! numeric modifier vocabulary.

use std::sync::Arc;

use crate::dict::{CounterPattern, Dictionaries, NumberModifier};
use crate::expression::{NNumber, NumericalExpression, INF};
use crate::number::NumberNormalizer;

use super::{merge_adjacent_ranges, Domain, ExprNormalizer};

pub struct NumericalDomain;

pub fn normalizer(
    dict: &Dictionaries,
    number_normalizer: Arc<NumberNormalizer>,
) -> ExprNormalizer<NumericalDomain> {
    ExprNormalizer::new(
        NumericalDomain,
        number_normalizer,
        dict.num_counters.clone(),
        dict.num_prefix_counters.clone(),
        dict.num_prefix_modifiers.clone(),
        dict.num_suffix_modifiers.clone(),
    )
}

fn multiply_value(expr: &mut NumericalExpression, x: f64) {
    expr.value_lower_bound *= x;
    expr.value_upper_bound *= x;
}

/// "時速50km~60km" normalizes to counters "km/h" and "km"; ranges only
/// need the part before the slash to agree.
fn match_counter_suffix(counter1: &str, counter2: &str) -> bool {
    let before_slash = |s: &str| s.split('/').next().unwrap_or(s).to_string();
    before_slash(counter1) == before_slash(counter2)
}

/// "3割4分5厘": each ratio word scales the number in the preceding slot,
/// and the partial expressions fold into one percentage.
fn do_option_wari(
    exprs: &mut Vec<NumericalExpression>,
    expr_id: usize,
    pattern: &CounterPattern,
) {
    let pattern_chars: Vec<char> = pattern.pattern.chars().collect();

    let mut value = 0.0;
    for (i, &c) in pattern_chars.iter().enumerate().step_by(2) {
        let scale = match c {
            '割' => 10.0,
            '分' => 1.0,
            '厘' => 0.1,
            _ => continue,
        };
        value += exprs[expr_id + i / 2].value_lower_bound * scale;
    }

    let expr = &mut exprs[expr_id];
    expr.base.position_end += pattern_chars.len();
    expr.counter = "%".to_string();
    expr.base.ordinary = false;
    expr.value_lower_bound = value;
    expr.value_upper_bound = value;

    let consumed = pattern.place_holder_count;
    exprs.drain(expr_id + 1..expr_id + 1 + consumed);
}

impl Domain for NumericalDomain {
    type Expr = NumericalExpression;
    type Pattern = CounterPattern;

    const FIX_SYMBOLS: bool = true;

    fn from_number(&self, number: &NNumber) -> NumericalExpression {
        NumericalExpression::from_number(number)
    }

    fn revise_by_limited_expression(
        &self,
        exprs: &mut Vec<NumericalExpression>,
        expr_id: usize,
        pattern: &CounterPattern,
    ) {
        if pattern.option == "wari" {
            do_option_wari(exprs, expr_id, pattern);
            return;
        }

        let expr = &mut exprs[expr_id];
        expr.base.position_end += pattern.pattern.chars().count();
        expr.counter = pattern.counter.clone();
        multiply_value(expr, 10f64.powi(pattern.si_prefix));
        multiply_value(expr, 10f64.powi(pattern.optional_power_of_ten));
        expr.base.ordinary = pattern.ordinary;
    }

    fn revise_by_prefix_counter(&self, expr: &mut NumericalExpression, pattern: &CounterPattern) {
        match pattern.option.as_str() {
            "counter" => {
                expr.base.position_start -= pattern.pattern.chars().count();
                expr.counter = pattern.counter.clone();
                multiply_value(expr, 10f64.powi(pattern.si_prefix));
                multiply_value(expr, 10f64.powi(pattern.optional_power_of_ten));
                expr.base.ordinary = pattern.ordinary;
            }
            // "時速" only means anything once a distance counter attached
            "add_suffix_counter" if !expr.counter.is_empty() => {
                expr.base.position_start -= pattern.pattern.chars().count();
                expr.counter.push_str(&pattern.counter);
            }
            _ => {}
        }
    }

    fn revise_by_modifier(&self, expr: &mut NumericalExpression, modifier: &NumberModifier) {
        match modifier.process_type.as_str() {
            "or_over" => expr.value_upper_bound = INF,
            "or_less" => expr.value_lower_bound = -INF,
            "over" => {
                expr.value_upper_bound = INF;
                expr.base.include_lower_bound = false;
            }
            "less" => {
                expr.value_lower_bound = -INF;
                expr.base.include_upper_bound = false;
            }
            "ordinary" => expr.base.ordinary = true,
            "han" => {
                expr.value_lower_bound += 0.5;
                expr.value_upper_bound += 0.5;
            }
            "about" => {
                expr.value_lower_bound *= 0.7;
                expr.value_upper_bound *= 1.3;
            }
            "kyou" => expr.value_upper_bound *= 1.6,
            "jaku" => expr.value_lower_bound *= 0.5,
            "made" => {
                if expr.value_upper_bound == expr.value_lower_bound {
                    expr.value_lower_bound = -INF;
                }
            }
            "dai" | "per" | "none" => {}
            process if process.starts_with('/') => expr.counter.push_str(process),
            process => expr.base.options.push(process.to_string()),
        }
    }

    fn is_empty_expression(&self, expr: &NumericalExpression) -> bool {
        expr.counter.is_empty()
    }

    fn fix_by_range_expression(
        &self,
        chars: &[char],
        exprs: Vec<NumericalExpression>,
    ) -> Vec<NumericalExpression> {
        merge_adjacent_ranges(chars, exprs, |left, right| {
            if !match_counter_suffix(&left.counter, &right.counter) {
                return false;
            }
            left.value_upper_bound = right.value_upper_bound;
            true
        })
    }
}
