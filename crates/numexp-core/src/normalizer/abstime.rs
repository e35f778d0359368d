//! Calendar and clock points: "2021年3月", "午後3時45分", "18世紀".
//!
//! Symbols are left unfolded so separator patterns ("ǂ/ǂ/ǂ",
//! "ǂ:ǂ") still see one slot per token, and ranges are repaired by
//! borrowing the missing fields from the other side.

use std::sync::Arc;

use crate::dict::{Dictionaries, NumberModifier, TimePattern};
use crate::expression::{AbstimeExpression, NNumber, NTime, TimeUnit, INF};
use crate::number::NumberNormalizer;
use crate::util::identify_time_detail;

use super::{merge_adjacent_ranges, Domain, ExprNormalizer};

pub struct AbstimeDomain;

pub fn normalizer(
    dict: &Dictionaries,
    number_normalizer: Arc<NumberNormalizer>,
) -> ExprNormalizer<AbstimeDomain> {
    ExprNormalizer::new(
        AbstimeDomain,
        number_normalizer,
        dict.abstime_expressions.clone(),
        dict.abstime_prefix_counters.clone(),
        dict.abstime_prefix_modifiers.clone(),
        dict.abstime_suffix_modifiers.clone(),
    )
}

/// Write one time field from the slot's converted number
fn set_time(expr: &mut AbstimeExpression, time_position: &str, org_lower: f64, org_upper: f64) {
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
        // the Nth century runs from year 100N-99 to 100N
        "seiki" => {
            lb.year = org_lower * 100.0 - 99.0;
            ub.year = org_upper * 100.0;
        }
        _ => {}
    }
}

fn set_time_by_unit(expr: &mut AbstimeExpression, unit: TimeUnit, org_lower: f64, org_upper: f64) {
    let code = match unit {
        TimeUnit::Year => "y",
        TimeUnit::Month => "m",
        TimeUnit::Day => "d",
        TimeUnit::Hour => "h",
        TimeUnit::Minute => "mn",
        TimeUnit::Second => "s",
    };
    set_time(expr, code, org_lower, org_upper);
}

fn revise_by_process_type(expr: &mut AbstimeExpression, process_type: &str) {
    match process_type {
        "gozen" => {
            if expr.value_lower_bound.hour == INF {
                expr.value_lower_bound.hour = 0.0;
                expr.value_upper_bound.hour = 12.0;
            }
        }
        "gogo" => {
            if expr.value_lower_bound.hour == INF {
                expr.value_lower_bound.hour = 12.0;
                expr.value_upper_bound.hour = 24.0;
            } else {
                expr.value_lower_bound.hour += 12.0;
                expr.value_upper_bound.hour += 12.0;
            }
        }
        "han" => {
            expr.value_lower_bound.minute = 30.0;
            expr.value_upper_bound.minute = 30.0;
        }
        // "2012/3" first parses as month/day; a month in the 1800..2100
        // band can only have been a year
        "unclear" if (1800.0..=2100.0).contains(&expr.value_lower_bound.month) => {
            let lb = expr.value_lower_bound;
            let ub = expr.value_upper_bound;
            expr.value_lower_bound.year = lb.month;
            expr.value_upper_bound.year = ub.month;
            expr.value_lower_bound.month = lb.day;
            expr.value_upper_bound.month = ub.day;
            expr.value_lower_bound.day = INF;
            expr.value_upper_bound.day = -INF;
        }
        _ => {}
    }
}

/// Widen a bound pair by the vagueness step of its finest set field
pub(crate) fn do_time_about(lb: &mut NTime, ub: &mut NTime) {
    match identify_time_detail(lb) {
        Some(TimeUnit::Year) => {
            lb.year -= 5.0;
            ub.year += 5.0;
        }
        Some(TimeUnit::Month) => {
            lb.month -= 1.0;
            ub.month += 1.0;
        }
        Some(TimeUnit::Day) => {
            lb.day -= 1.0;
            ub.day += 1.0;
        }
        Some(TimeUnit::Hour) => {
            lb.hour -= 1.0;
            ub.hour += 1.0;
        }
        Some(TimeUnit::Minute) => {
            lb.minute -= 5.0;
            ub.minute += 5.0;
        }
        Some(TimeUnit::Second) => {
            lb.second -= 5.0;
            ub.second += 5.0;
        }
        None => {}
    }
}

pub(crate) fn do_time_zenhan(lb: &mut NTime, ub: &mut NTime) {
    match identify_time_detail(lb) {
        Some(TimeUnit::Year) => {
            if lb.year != ub.year {
                // "18世紀前半"
                ub.year = (lb.year + ub.year) / 2.0 - 0.5;
            } else {
                // "1989年前半"
                lb.month = 1.0;
                ub.month = 6.0;
            }
        }
        Some(TimeUnit::Month) => {
            lb.day = 1.0;
            ub.day = 15.0;
        }
        Some(TimeUnit::Day) => {
            // "3日朝"
            lb.hour = 5.0;
            ub.hour = 12.0;
        }
        _ => {}
    }
}

pub(crate) fn do_time_kouhan(lb: &mut NTime, ub: &mut NTime) {
    match identify_time_detail(lb) {
        Some(TimeUnit::Year) => {
            if lb.year != ub.year {
                lb.year = (lb.year + ub.year) / 2.0 + 0.5;
            } else {
                lb.month = 7.0;
                ub.month = 12.0;
            }
        }
        Some(TimeUnit::Month) => {
            lb.day = 16.0;
            ub.day = 31.0;
        }
        Some(TimeUnit::Day) => {
            // "3日夜"
            lb.hour = 18.0;
            ub.hour = 24.0;
        }
        _ => {}
    }
}

pub(crate) fn do_time_nakaba(lb: &mut NTime, ub: &mut NTime) {
    match identify_time_detail(lb) {
        Some(TimeUnit::Year) => {
            if lb.year != ub.year {
                let quarter = ((ub.year - lb.year) / 4.0).floor();
                lb.year += quarter;
                ub.year -= quarter;
            } else {
                lb.month = 4.0;
                ub.month = 9.0;
            }
        }
        Some(TimeUnit::Month) => {
            lb.day = 10.0;
            ub.day = 20.0;
        }
        Some(TimeUnit::Day) => {
            // "3日昼"
            lb.hour = 10.0;
            ub.hour = 15.0;
        }
        _ => {}
    }
}

/// The three ten-day divisions of a month
pub(crate) fn do_time_jun(lb: &mut NTime, ub: &mut NTime, day_lower: f64, day_upper: f64) {
    if identify_time_detail(lb) == Some(TimeUnit::Month) {
        lb.day = day_lower;
        ub.day = day_upper;
    }
}

/// One side of a range marker may not have parsed as a time at all
/// ("4~12月" leaves "4" bare, "2012/4/3~6" leaves "6" bare); read the
/// missing granularity off the other side and fill it in.
fn fill_null_side(left: &mut AbstimeExpression, right: &mut AbstimeExpression) {
    if left.value_lower_bound == NTime::filled(INF) {
        if let Some(unit) = identify_time_detail(&right.value_upper_bound) {
            let (lo, hi) = (left.org_value_lower_bound, left.org_value_upper_bound);
            set_time_by_unit(left, unit, lo, hi);
        }
    } else if right.value_upper_bound == NTime::filled(-INF) {
        right.value_upper_bound = left.value_upper_bound;
        if let Some(unit) = identify_time_detail(&left.value_upper_bound) {
            let (lo, hi) = (right.org_value_lower_bound, right.org_value_upper_bound);
            set_time_by_unit(right, unit, lo, hi);
        }
    }
}

/// "2012/4/3~4/5": both sides parsed, but each is missing fields the
/// other has. Fields are copied from the pre-supplement values of the
/// opposite side.
fn supplement_abstime_info(left: &mut AbstimeExpression, right: &mut AbstimeExpression) {
    let left_lb = left.value_lower_bound;
    let left_ub = left.value_upper_bound;
    let right_lb = right.value_lower_bound;
    let right_ub = right.value_upper_bound;

    macro_rules! fill {
        ($field:ident) => {
            if left_lb.$field == INF && left_ub.$field == -INF {
                left.value_lower_bound.$field = right_lb.$field;
                left.value_upper_bound.$field = right_ub.$field;
            }
            if right_lb.$field == INF && right_ub.$field == -INF {
                right.value_lower_bound.$field = left_lb.$field;
                right.value_upper_bound.$field = left_ub.$field;
            }
        };
    }

    fill!(year);
    fill!(month);
    fill!(day);
    fill!(hour);
    fill!(minute);
    fill!(second);
}

impl Domain for AbstimeDomain {
    type Expr = AbstimeExpression;
    type Pattern = TimePattern;

    const FIX_SYMBOLS: bool = false;

    fn from_number(&self, number: &NNumber) -> AbstimeExpression {
        AbstimeExpression::from_number(number)
    }

    fn revise_by_limited_expression(
        &self,
        exprs: &mut Vec<AbstimeExpression>,
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
            revise_by_process_type(expr, process_type);
        }
        expr.base.ordinary = pattern.ordinary;
        expr.base.options.push(pattern.option.clone());

        exprs.drain(expr_id + 1..=final_id);
    }

    fn revise_by_prefix_counter(&self, expr: &mut AbstimeExpression, pattern: &TimePattern) {
        match pattern.option.as_str() {
            // era names carry their year offset in the process type
            "seireki" => {
                if let Some(offset) = pattern.process_type.first().and_then(|s| s.parse::<f64>().ok())
                {
                    expr.value_lower_bound.year += offset;
                    expr.value_upper_bound.year += offset;
                }
            }
            "gogo" => {
                expr.value_lower_bound.hour += 12.0;
                expr.value_upper_bound.hour += 12.0;
            }
            "gozen" => {}
            option => expr.base.options.push(option.to_string()),
        }
        expr.base.position_start -= pattern.pattern.chars().count();
    }

    fn revise_by_modifier(&self, expr: &mut AbstimeExpression, modifier: &NumberModifier) {
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
            process @ ("about" | "zenhan" | "nakaba" | "kouhan" | "joujun" | "tyujun" | "gejun") => {
                let mut lb = expr.value_lower_bound;
                let mut ub = expr.value_upper_bound;
                match process {
                    "about" => do_time_about(&mut lb, &mut ub),
                    "zenhan" => do_time_zenhan(&mut lb, &mut ub),
                    "nakaba" => do_time_nakaba(&mut lb, &mut ub),
                    "kouhan" => do_time_kouhan(&mut lb, &mut ub),
                    "joujun" => do_time_jun(&mut lb, &mut ub, 1.0, 10.0),
                    "tyujun" => do_time_jun(&mut lb, &mut ub, 11.0, 20.0),
                    _ => do_time_jun(&mut lb, &mut ub, 21.0, 31.0),
                }
                expr.value_lower_bound = lb;
                expr.value_upper_bound = ub;
            }
            "made" => {
                // "3時までに" bounds only from above; a closed range keeps
                // its lower end
                if expr.value_upper_bound == expr.value_lower_bound {
                    expr.value_lower_bound = NTime::filled(INF);
                }
            }
            "none" => {}
            process => expr.base.options.push(process.to_string()),
        }
    }

    fn is_empty_expression(&self, expr: &AbstimeExpression) -> bool {
        expr.value_lower_bound.is_null() && expr.value_upper_bound.is_null()
    }

    fn fix_by_range_expression(
        &self,
        chars: &[char],
        exprs: Vec<AbstimeExpression>,
    ) -> Vec<AbstimeExpression> {
        merge_adjacent_ranges(chars, exprs, |left, right| {
            let mut right = right.clone();
            fill_null_side(left, &mut right);
            supplement_abstime_info(left, &mut right);
            left.value_upper_bound = right.value_upper_bound;
            true
        })
    }
}
