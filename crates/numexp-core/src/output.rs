//! The unified output record: every domain's result flattened into one
//! serializable shape, sorted by where it appeared in the text.

use serde::Serialize;

use crate::expression::{
    AbstimeExpression, DurationExpression, ExprBase, NTime, NumericalExpression,
    ReltimeExpression,
};

/// Which normalizer produced an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpressionKind {
    Numerical,
    Abstime,
    Reltime,
    Duration,
}

/// A time bound in the public record. Unset fields keep their infinity
/// sentinels (serialized as `null` by serde_json).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Time {
    pub year: f64,
    pub month: f64,
    pub day: f64,
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl From<NTime> for Time {
    fn from(t: NTime) -> Self {
        Self {
            year: t.year,
            month: t.month,
            day: t.day,
            hour: t.hour,
            minute: t.minute,
            second: t.second,
        }
    }
}

/// A numeric or time-point bound, depending on the expression kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BoundValue {
    Number(f64),
    Time(Time),
}

/// One extracted and normalized expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    #[serde(rename = "type")]
    pub kind: ExpressionKind,
    pub original_expr: String,
    pub position_start: usize,
    pub position_end: usize,
    /// Counter word for quantities; "none" for the time kinds
    pub counter: String,
    pub value_lower_bound: Option<BoundValue>,
    pub value_upper_bound: Option<BoundValue>,
    pub value_lower_bound_abs: Option<Time>,
    pub value_upper_bound_abs: Option<Time>,
    pub value_lower_bound_rel: Option<Time>,
    pub value_upper_bound_rel: Option<Time>,
    pub options: Vec<String>,
}

/// "ordinary" first when set, then the non-empty accumulated tags
fn show_options(base: &ExprBase) -> Vec<String> {
    let mut options = Vec::new();
    if base.ordinary {
        options.push("ordinary".to_string());
    }
    options.extend(base.options.iter().filter(|o| !o.is_empty()).cloned());
    options
}

fn blank(kind: ExpressionKind, base: &ExprBase) -> Expression {
    Expression {
        kind,
        original_expr: base.original_expr.clone(),
        position_start: base.position_start,
        position_end: base.position_end,
        counter: "none".to_string(),
        value_lower_bound: None,
        value_upper_bound: None,
        value_lower_bound_abs: None,
        value_upper_bound_abs: None,
        value_lower_bound_rel: None,
        value_upper_bound_rel: None,
        options: show_options(base),
    }
}

impl Expression {
    pub fn from_numerical(source: &NumericalExpression) -> Self {
        let mut expr = blank(ExpressionKind::Numerical, &source.base);
        expr.counter = source.counter.clone();
        expr.value_lower_bound = Some(BoundValue::Number(source.value_lower_bound));
        expr.value_upper_bound = Some(BoundValue::Number(source.value_upper_bound));
        expr
    }

    pub fn from_abstime(source: &AbstimeExpression) -> Self {
        let mut expr = blank(ExpressionKind::Abstime, &source.base);
        expr.value_lower_bound = Some(BoundValue::Time(source.value_lower_bound.into()));
        expr.value_upper_bound = Some(BoundValue::Time(source.value_upper_bound.into()));
        expr
    }

    pub fn from_reltime(source: &ReltimeExpression) -> Self {
        let mut expr = blank(ExpressionKind::Reltime, &source.base);
        expr.value_lower_bound_abs = Some(source.value_lower_bound_abs.into());
        expr.value_upper_bound_abs = Some(source.value_upper_bound_abs.into());
        expr.value_lower_bound_rel = Some(source.value_lower_bound_rel.into());
        expr.value_upper_bound_rel = Some(source.value_upper_bound_rel.into());
        expr
    }

    pub fn from_duration(source: &DurationExpression) -> Self {
        let mut expr = blank(ExpressionKind::Duration, &source.base);
        expr.value_lower_bound = Some(BoundValue::Time(source.value_lower_bound.into()));
        expr.value_upper_bound = Some(BoundValue::Time(source.value_upper_bound.into()));
        expr
    }
}

/// Flatten the per-domain results into one list ordered by start offset
pub fn merge_expressions(
    numerical_exprs: &[NumericalExpression],
    abstime_exprs: &[AbstimeExpression],
    reltime_exprs: &[ReltimeExpression],
    duration_exprs: &[DurationExpression],
) -> Vec<Expression> {
    let mut merged: Vec<Expression> = numerical_exprs
        .iter()
        .map(Expression::from_numerical)
        .chain(abstime_exprs.iter().map(Expression::from_abstime))
        .chain(reltime_exprs.iter().map(Expression::from_reltime))
        .chain(duration_exprs.iter().map(Expression::from_duration))
        .collect();
    merged.sort_by_key(|e| e.position_start);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::NNumber;

    #[test]
    fn test_show_options_ordinary_first() {
        let mut base = ExprBase {
            original_expr: String::new(),
            position_start: 0,
            position_end: 0,
            include_lower_bound: true,
            include_upper_bound: true,
            ordinary: true,
            options: vec!["".to_string(), "Wed".to_string()],
        };
        assert_eq!(show_options(&base), vec!["ordinary".to_string(), "Wed".to_string()]);
        base.ordinary = false;
        assert_eq!(show_options(&base), vec!["Wed".to_string()]);
    }

    #[test]
    fn test_merge_sorts_by_start() {
        let mut late = NumericalExpression::from_number(&NNumber::new("2", 5, 6));
        late.counter = "人".to_string();
        let mut abstime = AbstimeExpression::from_number(&NNumber::new("3月", 1, 3));
        abstime.value_lower_bound.month = 3.0;

        let merged = merge_expressions(&[late], &[abstime], &[], &[]);
        assert_eq!(merged[0].kind, ExpressionKind::Abstime);
        assert_eq!(merged[1].kind, ExpressionKind::Numerical);
    }

    #[test]
    fn test_numerical_serializes_plain_numbers() {
        let mut source = NumericalExpression::from_number(&NNumber::new("3人", 0, 2));
        source.counter = "人".to_string();
        source.value_lower_bound = 3.0;
        source.value_upper_bound = 3.0;
        let json = serde_json::to_value(Expression::from_numerical(&source)).unwrap();
        assert_eq!(json["type"], "numerical");
        assert_eq!(json["value_lower_bound"], 3.0);
        assert_eq!(json["counter"], "人");
    }
}
