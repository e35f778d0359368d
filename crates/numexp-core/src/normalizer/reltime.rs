//! Relative time: offsets like "3日前" and "2時間後", plus deixis words
//! ("今日", "来年") and anchored forms like "昨年3月".
//!
//! Each expression carries two bound pairs: the relative offset and an
//! absolute anchor for the calendar part that rode along with it.

use std::sync::Arc;

use crate::dict::{DictPattern, Dictionaries, NumberModifier, TimePattern};
use crate::expression::{NNumber, NTime, ReltimeExpression, INF};
use crate::number::NumberNormalizer;

use super::abstime::{do_time_about, do_time_jun, do_time_kouhan, do_time_nakaba, do_time_zenhan};
use super::{merge_adjacent_ranges, Domain, ExprNormalizer};

pub struct ReltimeDomain {
    // kept for the deixis pass in the range fix
    prefix_counters: Vec<TimePattern>,
}

pub fn normalizer(
    dict: &Dictionaries,
    number_normalizer: Arc<NumberNormalizer>,
) -> ExprNormalizer<ReltimeDomain> {
    ExprNormalizer::new(
        ReltimeDomain {
            prefix_counters: dict.reltime_prefix_counters.clone(),
        },
        number_normalizer,
        dict.reltime_expressions.clone(),
        dict.reltime_prefix_counters.clone(),
        dict.reltime_prefix_modifiers.clone(),
        dict.reltime_suffix_modifiers.clone(),
    )
}

/// Write one field from the slot's converted number. Bare codes fill the
/// absolute anchor, signed codes the relative offset; "w" counts weeks in
/// days and "seiki" centuries in years.
fn set_time(expr: &mut ReltimeExpression, time_position: &str, org_lower: f64, org_upper: f64) {
    let (lb, ub, lower, upper) = match time_position {
        "+y" | "+m" | "+d" | "+h" | "+mn" | "+s" | "+seiki" | "+w" => (
            &mut expr.value_lower_bound_rel,
            &mut expr.value_upper_bound_rel,
            org_lower,
            org_upper,
        ),
        "-y" | "-m" | "-d" | "-h" | "-mn" | "-s" | "-seiki" | "-w" => (
            &mut expr.value_lower_bound_rel,
            &mut expr.value_upper_bound_rel,
            -org_lower,
            -org_upper,
        ),
        _ => (
            &mut expr.value_lower_bound_abs,
            &mut expr.value_upper_bound_abs,
            org_lower,
            org_upper,
        ),
    };
    let unit = time_position.trim_start_matches(|c| c == '+' || c == '-');
    match unit {
        "y" => {
            lb.year = lower;
            ub.year = upper;
        }
        "m" => {
            lb.month = lower;
            ub.month = upper;
        }
        "d" => {
            lb.day = lower;
            ub.day = upper;
        }
        "h" => {
            lb.hour = lower;
            ub.hour = upper;
        }
        "mn" => {
            lb.minute = lower;
            ub.minute = upper;
        }
        "s" => {
            lb.second = lower;
            ub.second = upper;
        }
        "seiki" => {
            if time_position == "seiki" {
                lb.year = lower * 100.0 - 99.0;
                ub.year = upper * 100.0;
            } else {
                lb.year = lower * 100.0;
                ub.year = upper * 100.0;
            }
        }
        "w" => {
            lb.day = lower * 7.0;
            ub.day = upper * 7.0;
        }
        _ => {}
    }
}

/// "1年半前": shift the offset by half of its unit
fn do_option_han(lb: &mut NTime, ub: &mut NTime, time_position: &str) {
    let sign = if time_position.starts_with('-') { -1.0 } else { 1.0 };
    let unit = time_position.trim_start_matches(|c| c == '+' || c == '-');
    let amount = sign * if unit == "seiki" { 50.0 } else { 0.5 };
    match unit {
        "y" | "seiki" => {
            lb.year += amount;
            ub.year += amount;
        }
        "m" => {
            lb.month += amount;
            ub.month += amount;
        }
        "d" => {
            lb.day += amount;
            ub.day += amount;
        }
        "h" => {
            lb.hour += amount;
            ub.hour += amount;
        }
        "mn" => {
            lb.minute += amount;
            ub.minute += amount;
        }
        "s" => {
            lb.second += amount;
            ub.second += amount;
        }
        _ => {}
    }
}

fn revise_by_process_type(
    expr: &mut ReltimeExpression,
    process_type: &str,
    pattern: &TimePattern,
) {
    match process_type {
        "han" => {
            if let Some(position) = pattern.corresponding_time_position.last() {
                let mut lb = expr.value_lower_bound_rel;
                let mut ub = expr.value_upper_bound_rel;
                do_option_han(&mut lb, &mut ub, position);
                expr.value_lower_bound_rel = lb;
                expr.value_upper_bound_rel = ub;
            }
        }
        "or_over" => expr.value_upper_bound_abs = NTime::filled(-INF),
        "or_less" => expr.value_lower_bound_abs = NTime::filled(INF),
        "over" => {
            expr.value_upper_bound_abs = NTime::filled(-INF);
            expr.base.include_lower_bound = false;
        }
        "less" => {
            expr.value_lower_bound_abs = NTime::filled(INF);
            expr.base.include_upper_bound = false;
        }
        // "3日以内" spans everything up to the offset
        "inai" => expr.value_lower_bound_rel = NTime::filled(0.0),
        _ => {}
    }
}

impl Domain for ReltimeDomain {
    type Expr = ReltimeExpression;
    type Pattern = TimePattern;

    const FIX_SYMBOLS: bool = true;

    fn from_number(&self, number: &NNumber) -> ReltimeExpression {
        ReltimeExpression::from_number(number)
    }

    fn revise_by_limited_expression(
        &self,
        exprs: &mut Vec<ReltimeExpression>,
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
            revise_by_process_type(expr, process_type, pattern);
        }
        expr.base.ordinary = pattern.ordinary;

        exprs.drain(expr_id + 1..=final_id);
    }

    fn revise_by_prefix_counter(&self, expr: &mut ReltimeExpression, pattern: &TimePattern) {
        // "昨年3月": the deixis word only attaches when a calendar part
        // already anchored the expression
        if pattern.option == "add_relation"
            && !(expr.value_lower_bound_abs.is_null() && expr.value_upper_bound_abs.is_null())
        {
            if let (Some(position), Some(relation)) = (
                pattern.corresponding_time_position.first(),
                pattern.process_type.first().and_then(|s| s.parse::<f64>().ok()),
            ) {
                let lb = &mut expr.value_lower_bound_rel;
                let ub = &mut expr.value_upper_bound_rel;
                match position.as_str() {
                    "y" => {
                        lb.year = relation;
                        ub.year = relation;
                    }
                    "m" => {
                        lb.month = relation;
                        ub.month = relation;
                    }
                    "d" => {
                        lb.day = relation;
                        ub.day = relation;
                    }
                    "h" => {
                        lb.hour = relation;
                        ub.hour = relation;
                    }
                    "mn" => {
                        lb.minute = relation;
                        ub.minute = relation;
                    }
                    "s" => {
                        lb.second = relation;
                        ub.second = relation;
                    }
                    _ => {}
                }
            }
        }
        expr.base.position_start -= pattern.pattern.chars().count();
    }

    fn revise_by_modifier(&self, expr: &mut ReltimeExpression, modifier: &NumberModifier) {
        match modifier.process_type.as_str() {
            "about" => {
                let mut lb = expr.value_lower_bound_rel;
                let mut ub = expr.value_upper_bound_rel;
                do_time_about(&mut lb, &mut ub);
                expr.value_lower_bound_rel = lb;
                expr.value_upper_bound_rel = ub;
            }
            process @ ("zenhan" | "nakaba" | "kouhan" | "joujun" | "tyujun" | "gejun") => {
                let mut lb = expr.value_lower_bound_abs;
                let mut ub = expr.value_upper_bound_abs;
                match process {
                    "zenhan" => do_time_zenhan(&mut lb, &mut ub),
                    "nakaba" => do_time_nakaba(&mut lb, &mut ub),
                    "kouhan" => do_time_kouhan(&mut lb, &mut ub),
                    "joujun" => do_time_jun(&mut lb, &mut ub, 1.0, 10.0),
                    "tyujun" => do_time_jun(&mut lb, &mut ub, 11.0, 20.0),
                    _ => do_time_jun(&mut lb, &mut ub, 21.0, 31.0),
                }
                expr.value_lower_bound_abs = lb;
                expr.value_upper_bound_abs = ub;
            }
            "inai" => expr.value_lower_bound_rel = NTime::filled(0.0),
            "none" => {}
            process => expr.base.options.push(process.to_string()),
        }
    }

    fn is_empty_expression(&self, expr: &ReltimeExpression) -> bool {
        expr.value_lower_bound_rel.is_null() && expr.value_upper_bound_rel.is_null()
    }

    fn fix_by_range_expression(
        &self,
        chars: &[char],
        exprs: Vec<ReltimeExpression>,
    ) -> Vec<ReltimeExpression> {
        let mut exprs = merge_adjacent_ranges(chars, exprs, |left, right| {
            left.value_upper_bound_rel = right.value_upper_bound_rel;
            left.value_upper_bound_abs = right.value_upper_bound_abs;
            true
        });

        // bare deixis words never contain a number, so the main scan
        // cannot see them; pick up their first occurrence directly
        for pattern in &self.prefix_counters {
            let Some(relation) = pattern.process_type.first().and_then(|s| s.parse::<f64>().ok())
            else {
                continue;
            };
            let pattern_chars: Vec<char> = pattern.pattern().chars().collect();
            let Some(idx) = chars
                .windows(pattern_chars.len())
                .position(|w| w == pattern_chars.as_slice())
            else {
                continue;
            };
            let end = idx + pattern_chars.len();
            let covered = exprs.iter().any(|e| {
                e.base.position_start <= idx && end <= e.base.position_end
            });
            if covered {
                continue;
            }

            let number = NNumber::new(pattern.pattern().to_string(), idx, end);
            let mut expr = ReltimeExpression::from_number(&number);
            let lb = &mut expr.value_lower_bound_rel;
            let ub = &mut expr.value_upper_bound_rel;
            match pattern.corresponding_time_position.first().map(String::as_str) {
                Some("y") => {
                    lb.year = relation;
                    ub.year = relation;
                }
                Some("m") => {
                    lb.month = relation;
                    ub.month = relation;
                }
                Some("d") => {
                    lb.day = relation;
                    ub.day = relation;
                }
                _ => continue,
            }
            exprs.push(expr);
        }

        exprs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reltime(org_lower: f64, org_upper: f64) -> ReltimeExpression {
        let mut n = NNumber::new("", 0, 2);
        n.value_lower_bound = org_lower;
        n.value_upper_bound = org_upper;
        ReltimeExpression::from_number(&n)
    }

    #[test]
    fn test_set_time_signed_offsets() {
        let mut expr = reltime(15.0, 15.0);
        set_time(&mut expr, "-y", 15.0, 15.0);
        assert_eq!(expr.value_lower_bound_rel.year, -15.0);

        let mut expr = reltime(2.0, 2.0);
        set_time(&mut expr, "+w", 2.0, 2.0);
        assert_eq!(expr.value_lower_bound_rel.day, 14.0);
    }

    #[test]
    fn test_set_time_bare_code_fills_anchor() {
        let mut expr = reltime(3.0, 3.0);
        set_time(&mut expr, "m", 3.0, 3.0);
        assert_eq!(expr.value_lower_bound_abs.month, 3.0);
        assert!(expr.value_lower_bound_rel.is_null());
    }

    #[test]
    fn test_han_shifts_offset_by_half_unit() {
        let mut expr = reltime(1.0, 1.0);
        set_time(&mut expr, "-y", 1.0, 1.0);
        let pattern = TimePattern {
            pattern: "年半前".to_string(),
            corresponding_time_position: vec!["-y".to_string()],
            process_type: vec!["han".to_string()],
            ordinary: false,
            option: String::new(),
            place_holder_count: 0,
            trailing_len: 3,
        };
        revise_by_process_type(&mut expr, "han", &pattern);
        assert_eq!(expr.value_lower_bound_rel.year, -1.5);
    }

    #[test]
    fn test_inai_zeroes_lower_offset() {
        let mut expr = reltime(3.0, 3.0);
        set_time(&mut expr, "+d", 3.0, 3.0);
        revise_by_process_type(&mut expr, "inai", &TimePattern {
            pattern: String::new(),
            corresponding_time_position: Vec::new(),
            process_type: Vec::new(),
            ordinary: false,
            option: String::new(),
            place_holder_count: 0,
            trailing_len: 0,
        });
        assert_eq!(expr.value_lower_bound_rel, NTime::filled(0.0));
        assert_eq!(expr.value_upper_bound_rel.day, 3.0);
    }

    #[test]
    fn test_add_relation_requires_anchor() {
        let pattern = TimePattern {
            pattern: "昨年".to_string(),
            corresponding_time_position: vec!["y".to_string()],
            process_type: vec!["-1".to_string()],
            ordinary: false,
            option: "add_relation".to_string(),
            place_holder_count: 0,
            trailing_len: 2,
        };
        let domain = ReltimeDomain { prefix_counters: Vec::new() };

        let mut bare = reltime(3.0, 3.0);
        bare.base.position_start = 2;
        domain.revise_by_prefix_counter(&mut bare, &pattern);
        assert!(bare.value_lower_bound_rel.is_null());
        assert_eq!(bare.base.position_start, 0);

        let mut anchored = reltime(3.0, 3.0);
        anchored.base.position_start = 2;
        set_time(&mut anchored, "m", 3.0, 3.0);
        domain.revise_by_prefix_counter(&mut anchored, &pattern);
        assert_eq!(anchored.value_lower_bound_rel.year, -1.0);
    }
}
