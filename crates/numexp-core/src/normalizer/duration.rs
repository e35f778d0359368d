//! Durations: "100年間", "3週間", "2時間半".

use std::sync::Arc;

use crate::dict::{Dictionaries, NumberModifier, TimePattern};
use crate::expression::{DurationExpression, NNumber, NTime, TimeUnit, INF};
use crate::number::NumberNormalizer;
use crate::util::identify_time_detail;

use super::abstime::do_time_about;
use super::{merge_adjacent_ranges, Domain, ExprNormalizer};

pub struct DurationDomain;

pub fn normalizer(
    dict: &Dictionaries,
    number_normalizer: Arc<NumberNormalizer>,
) -> ExprNormalizer<DurationDomain> {
    ExprNormalizer::new(
        DurationDomain,
        number_normalizer,
        dict.duration_expressions.clone(),
        dict.duration_prefix_counters.clone(),
        dict.duration_prefix_modifiers.clone(),
        dict.duration_suffix_modifiers.clone(),
    )
}

fn set_time(expr: &mut DurationExpression, time_position: &str, org_lower: f64, org_upper: f64) {
    let lb = &mut expr.value_lower_bound;
    let ub = &mut expr.value_upper_bound;
    match time_position {
        "y" => {
            lb.year = org_lower;
            ub.year = org_upper;
        }
        "m" => {
            lb.month = org_lower;
            ub.month = org_upper;
        }
        "d" => {
            lb.day = org_lower;
            ub.day = org_upper;
        }
        "h" => {
            lb.hour = org_lower;
            ub.hour = org_upper;
        }
        "mn" => {
            lb.minute = org_lower;
            ub.minute = org_upper;
        }
        "s" => {
            lb.second = org_lower;
            ub.second = org_upper;
        }
        "seiki" => {
            lb.year = org_lower * 100.0;
            ub.year = org_upper * 100.0;
        }
        "w" => {
            lb.day = org_lower * 7.0;
            ub.day = org_upper * 7.0;
        }
        _ => {}
    }
}

/// "2時間半": extend the span by half of its unit
fn do_option_han(lb: &mut NTime, ub: &mut NTime, time_position: &str) {
    match time_position {
        "y" => {
            lb.year += 0.5;
            ub.year += 0.5;
        }
        "m" => {
            lb.month += 0.5;
            ub.month += 0.5;
        }
        "d" => {
            lb.day += 0.5;
            ub.day += 0.5;
        }
        "h" => {
            lb.hour += 0.5;
            ub.hour += 0.5;
        }
        "mn" => {
            lb.minute += 0.5;
            ub.minute += 0.5;
        }
        "s" => {
            lb.second += 0.5;
            ub.second += 0.5;
        }
        "seiki" => {
            lb.year += 50.0;
            ub.year += 50.0;
        }
        _ => {}
    }
}

/// "1時間強" pushes the upper bound out one vagueness step
fn do_time_kyou(lb: &NTime, ub: &mut NTime) {
    match identify_time_detail(lb) {
        Some(TimeUnit::Year) => ub.year += 5.0,
        Some(TimeUnit::Month) => ub.month += 1.0,
        Some(TimeUnit::Day) => ub.day += 1.0,
        Some(TimeUnit::Hour) => ub.hour += 1.0,
        Some(TimeUnit::Minute) => ub.minute += 5.0,
        Some(TimeUnit::Second) => ub.second += 5.0,
        None => {}
    }
}

/// "1時間弱" pulls the lower bound in the same step
fn do_time_jaku(lb: &mut NTime) {
    match identify_time_detail(lb) {
        Some(TimeUnit::Year) => lb.year -= 5.0,
        Some(TimeUnit::Month) => lb.month -= 1.0,
        Some(TimeUnit::Day) => lb.day -= 1.0,
        Some(TimeUnit::Hour) => lb.hour -= 1.0,
        Some(TimeUnit::Minute) => lb.minute -= 5.0,
        Some(TimeUnit::Second) => lb.second -= 5.0,
        None => {}
    }
}

impl Domain for DurationDomain {
    type Expr = DurationExpression;
    type Pattern = TimePattern;

    const FIX_SYMBOLS: bool = true;

    fn from_number(&self, number: &NNumber) -> DurationExpression {
        DurationExpression::from_number(number)
    }

    fn revise_by_limited_expression(
        &self,
        exprs: &mut Vec<DurationExpression>,
        expr_id: usize,
        pattern: &TimePattern,
    ) {
        let final_id = expr_id + pattern.place_holder_count;
        let new_end = exprs[final_id].base.position_end + pattern.trailing_len;

        let orgs: Vec<(f64, f64)> = (expr_id..=final_id)
            .map(|i| (exprs[i].org_value_lower_bound, exprs[i].org_value_upper_bound))
            .collect();

        let expr = &mut exprs[expr_id];
        expr.base.position_end = new_end;
        for (i, time_position) in pattern.corresponding_time_position.iter().enumerate() {
            let (lo, hi) = orgs[i.min(orgs.len() - 1)];
            set_time(expr, time_position, lo, hi);
        }
        for process_type in &pattern.process_type {
            if process_type == "han" {
                if let Some(position) = pattern.corresponding_time_position.last() {
                    let mut lb = expr.value_lower_bound;
                    let mut ub = expr.value_upper_bound;
                    do_option_han(&mut lb, &mut ub, position);
                    expr.value_lower_bound = lb;
                    expr.value_upper_bound = ub;
                }
            }
        }
        expr.base.ordinary = pattern.ordinary;

        exprs.drain(expr_id + 1..=final_id);
    }

    fn revise_by_prefix_counter(&self, _expr: &mut DurationExpression, _pattern: &TimePattern) {
        // durations have no prefix counters
    }

    fn revise_by_modifier(&self, expr: &mut DurationExpression, modifier: &NumberModifier) {
        match modifier.process_type.as_str() {
            "or_over" => expr.value_upper_bound = NTime::filled(-INF),
            "or_less" => expr.value_lower_bound = NTime::filled(INF),
            "over" => {
                expr.value_upper_bound = NTime::filled(-INF);
                expr.base.include_lower_bound = false;
            }
            "less" => {
                expr.value_lower_bound = NTime::filled(INF);
                expr.base.include_upper_bound = false;
            }
            "ordinary" => expr.base.ordinary = true,
            "about" => {
                let mut lb = expr.value_lower_bound;
                let mut ub = expr.value_upper_bound;
                do_time_about(&mut lb, &mut ub);
                expr.value_lower_bound = lb;
                expr.value_upper_bound = ub;
            }
            "kyou" => {
                let lb = expr.value_lower_bound;
                let mut ub = expr.value_upper_bound;
                do_time_kyou(&lb, &mut ub);
                expr.value_upper_bound = ub;
            }
            "jaku" => {
                let mut lb = expr.value_lower_bound;
                do_time_jaku(&mut lb);
                expr.value_lower_bound = lb;
            }
            "made" => {
                if expr.value_upper_bound == expr.value_lower_bound {
                    expr.value_lower_bound = NTime::filled(INF);
                }
            }
            "per" | "dai" | "none" => {}
            process => expr.base.options.push(process.to_string()),
        }
    }

    fn is_empty_expression(&self, expr: &DurationExpression) -> bool {
        expr.value_lower_bound.is_null() && expr.value_upper_bound.is_null()
    }

    fn fix_by_range_expression(
        &self,
        chars: &[char],
        exprs: Vec<DurationExpression>,
    ) -> Vec<DurationExpression> {
        merge_adjacent_ranges(chars, exprs, |left, right| {
            left.value_upper_bound = right.value_upper_bound;
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duration(org_lower: f64, org_upper: f64) -> DurationExpression {
        let mut n = NNumber::new("", 0, 3);
        n.value_lower_bound = org_lower;
        n.value_upper_bound = org_upper;
        DurationExpression::from_number(&n)
    }

    #[test]
    fn test_set_time_week_counts_days() {
        let mut expr = duration(3.0, 3.0);
        set_time(&mut expr, "w", 3.0, 3.0);
        assert_eq!(expr.value_lower_bound.day, 21.0);
    }

    #[test]
    fn test_set_time_seiki_scales_years() {
        let mut expr = duration(2.0, 2.0);
        set_time(&mut expr, "seiki", 2.0, 2.0);
        assert_eq!(expr.value_lower_bound.year, 200.0);
        assert_eq!(expr.value_upper_bound.year, 200.0);
    }

    #[test]
    fn test_kyou_and_jaku_step_one_bound() {
        let domain = DurationDomain;
        let modifier = |process: &str| NumberModifier {
            pattern: String::new(),
            process_type: process.to_string(),
        };

        let mut expr = duration(1.0, 1.0);
        set_time(&mut expr, "h", 1.0, 1.0);
        domain.revise_by_modifier(&mut expr, &modifier("kyou"));
        assert_eq!(expr.value_lower_bound.hour, 1.0);
        assert_eq!(expr.value_upper_bound.hour, 2.0);

        let mut expr = duration(1.0, 1.0);
        set_time(&mut expr, "h", 1.0, 1.0);
        domain.revise_by_modifier(&mut expr, &modifier("jaku"));
        assert_eq!(expr.value_lower_bound.hour, 0.0);
        assert_eq!(expr.value_upper_bound.hour, 1.0);
    }

    #[test]
    fn test_han_extends_span() {
        let mut exprs = vec![duration(2.0, 2.0)];
        let pattern = TimePattern {
            pattern: "時間半".to_string(),
            corresponding_time_position: vec!["h".to_string()],
            process_type: vec!["han".to_string()],
            ordinary: false,
            option: String::new(),
            place_holder_count: 0,
            trailing_len: 3,
        };
        DurationDomain.revise_by_limited_expression(&mut exprs, 0, &pattern);
        assert_eq!(exprs[0].value_lower_bound.hour, 2.5);
        assert_eq!(exprs[0].base.position_end, 6);
    }
}
