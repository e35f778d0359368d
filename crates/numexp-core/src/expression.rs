//! Value types flowing through the pipeline.
//!
//! Bounds use IEEE infinities as "not yet set" sentinels: a lower bound
//! starts at +∞ and an upper bound at -∞, so an untouched field is
//! recognizable without an Option wrapper and min/max folds behave.

use crate::digit::Notation;

pub const INF: f64 = f64::INFINITY;

/// A raw extracted number, before and after numeral conversion
#[derive(Debug, Clone, PartialEq)]
pub struct NNumber {
    pub original_expr: String,
    pub position_start: usize,
    pub position_end: usize,
    pub value_lower_bound: f64,
    pub value_upper_bound: f64,
    pub notation_types: Vec<Notation>,
}

impl NNumber {
    pub fn new(original_expr: impl Into<String>, position_start: usize, position_end: usize) -> Self {
        Self {
            original_expr: original_expr.into(),
            position_start,
            position_end,
            value_lower_bound: INF,
            value_upper_bound: -INF,
            notation_types: Vec::new(),
        }
    }
}

/// A point in time, fields unset until a pattern fills them.
///
/// For lower bounds the unset sentinel is +∞ and for upper bounds -∞; a
/// field is "set" when it moved off its sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NTime {
    pub year: f64,
    pub month: f64,
    pub day: f64,
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl NTime {
    pub fn filled(value: f64) -> Self {
        Self {
            year: value,
            month: value,
            day: value,
            hour: value,
            minute: value,
            second: value,
        }
    }

    /// True when no field was ever set (all +∞ or all -∞)
    pub fn is_null(&self) -> bool {
        *self == NTime::filled(INF) || *self == NTime::filled(-INF)
    }
}

/// Time granularity, most specific last
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

/// Fields shared by every normalized expression
#[derive(Debug, Clone, PartialEq)]
pub struct ExprBase {
    pub original_expr: String,
    pub position_start: usize,
    pub position_end: usize,
    pub include_lower_bound: bool,
    pub include_upper_bound: bool,
    pub ordinary: bool,
    pub options: Vec<String>,
}

impl ExprBase {
    fn from_number(number: &NNumber) -> Self {
        Self {
            original_expr: number.original_expr.clone(),
            position_start: number.position_start,
            position_end: number.position_end,
            include_lower_bound: true,
            include_upper_bound: true,
            ordinary: false,
            options: Vec::new(),
        }
    }
}

/// Access to the shared fields, for the generic normalizer driver
pub trait HasBase {
    fn base(&self) -> &ExprBase;
    fn base_mut(&mut self) -> &mut ExprBase;
}

macro_rules! impl_has_base {
    ($ty:ty) => {
        impl HasBase for $ty {
            fn base(&self) -> &ExprBase {
                &self.base
            }
            fn base_mut(&mut self) -> &mut ExprBase {
                &mut self.base
            }
        }
    };
}

/// A quantity: numeric bounds plus the counter word they count
#[derive(Debug, Clone, PartialEq)]
pub struct NumericalExpression {
    pub base: ExprBase,
    pub value_lower_bound: f64,
    pub value_upper_bound: f64,
    pub counter: String,
}

impl NumericalExpression {
    pub fn from_number(number: &NNumber) -> Self {
        Self {
            base: ExprBase::from_number(number),
            value_lower_bound: number.value_lower_bound,
            value_upper_bound: number.value_upper_bound,
            counter: String::new(),
        }
    }
}

/// A calendar/clock point, possibly partial
#[derive(Debug, Clone, PartialEq)]
pub struct AbstimeExpression {
    pub base: ExprBase,
    pub value_lower_bound: NTime,
    pub value_upper_bound: NTime,
    pub org_value_lower_bound: f64,
    pub org_value_upper_bound: f64,
}

impl AbstimeExpression {
    pub fn from_number(number: &NNumber) -> Self {
        Self {
            base: ExprBase::from_number(number),
            value_lower_bound: NTime::filled(INF),
            value_upper_bound: NTime::filled(-INF),
            org_value_lower_bound: number.value_lower_bound,
            org_value_upper_bound: number.value_upper_bound,
        }
    }
}

/// An offset from utterance time, with an optional absolute anchor
#[derive(Debug, Clone, PartialEq)]
pub struct ReltimeExpression {
    pub base: ExprBase,
    pub value_lower_bound_abs: NTime,
    pub value_upper_bound_abs: NTime,
    pub value_lower_bound_rel: NTime,
    pub value_upper_bound_rel: NTime,
    pub org_value_lower_bound: f64,
    pub org_value_upper_bound: f64,
}

impl ReltimeExpression {
    pub fn from_number(number: &NNumber) -> Self {
        Self {
            base: ExprBase::from_number(number),
            value_lower_bound_abs: NTime::filled(INF),
            value_upper_bound_abs: NTime::filled(-INF),
            value_lower_bound_rel: NTime::filled(INF),
            value_upper_bound_rel: NTime::filled(-INF),
            org_value_lower_bound: number.value_lower_bound,
            org_value_upper_bound: number.value_upper_bound,
        }
    }
}

/// A span of time
#[derive(Debug, Clone, PartialEq)]
pub struct DurationExpression {
    pub base: ExprBase,
    pub value_lower_bound: NTime,
    pub value_upper_bound: NTime,
    pub org_value_lower_bound: f64,
    pub org_value_upper_bound: f64,
}

impl DurationExpression {
    pub fn from_number(number: &NNumber) -> Self {
        Self {
            base: ExprBase::from_number(number),
            value_lower_bound: NTime::filled(INF),
            value_upper_bound: NTime::filled(-INF),
            org_value_lower_bound: number.value_lower_bound,
            org_value_upper_bound: number.value_upper_bound,
        }
    }
}

impl_has_base!(NumericalExpression);
impl_has_base!(AbstimeExpression);
impl_has_base!(ReltimeExpression);
impl_has_base!(DurationExpression);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ntime_null() {
        assert!(NTime::filled(INF).is_null());
        assert!(NTime::filled(-INF).is_null());
        let mut t = NTime::filled(INF);
        t.month = 3.0;
        assert!(!t.is_null());
    }

    #[test]
    fn test_nnumber_sentinels() {
        let n = NNumber::new("三十", 0, 2);
        assert_eq!(n.value_lower_bound, INF);
        assert_eq!(n.value_upper_bound, -INF);
    }
}
