//! Post-extraction filtering: year fixups, sanity checks, cross-domain
//! dedup and the blocklists for strings that merely look numeric.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dict::Dictionaries;
use crate::expression::{
    AbstimeExpression, DurationExpression, HasBase, NTime, NumericalExpression,
    ReltimeExpression, INF,
};

/// Two-digit years at or below this read as 20xx, above it as 19xx
pub const TWO_DIGIT_YEAR_PIVOT: f64 = 21.0;

/// Version strings ("ver2.3.4") are never dates
const INAPPROPRIATE_PREFIXES: &[&str] = &["ver", "ｖｅｒ"];

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://[\w!\?/\+\-_~=;\.,\*&@#\$%\(\)'\[\]]+")
        .expect("URL pattern compiles")
});

pub struct InappropriateExpressionRemover {
    inappropriate_strings: HashSet<String>,
}

impl InappropriateExpressionRemover {
    pub fn new(dict: &Dictionaries) -> Self {
        Self {
            inappropriate_strings: dict.inappropriate_strings.iter().cloned().collect(),
        }
    }

    /// Drop misparsed and duplicated expressions across the four domains.
    ///
    /// An expression whose span sits inside an expression of another
    /// domain is the weaker reading and goes; quantities yield to time,
    /// time types yield to each other in fixed order.
    pub fn remove_inappropriate_extraction(
        &self,
        text: &str,
        numerical_exprs: &mut Vec<NumericalExpression>,
        abstime_exprs: &mut Vec<AbstimeExpression>,
        reltime_exprs: &mut Vec<ReltimeExpression>,
        duration_exprs: &mut Vec<DurationExpression>,
    ) {
        delete_inappropriate_abstime_exprs(abstime_exprs);

        delete_duplicates(numerical_exprs, &spans3(abstime_exprs, reltime_exprs, duration_exprs));
        delete_duplicates(reltime_exprs, &spans3(abstime_exprs, numerical_exprs, duration_exprs));
        delete_duplicates(duration_exprs, &spans3(abstime_exprs, reltime_exprs, numerical_exprs));
        delete_duplicates(abstime_exprs, &spans3(numerical_exprs, reltime_exprs, duration_exprs));

        let chars: Vec<char> = text.chars().collect();
        let url_spans = url_char_spans(text);
        self.delete_using_dict(&chars, &url_spans, numerical_exprs);
        self.delete_using_dict(&chars, &url_spans, abstime_exprs);
        self.delete_using_dict(&chars, &url_spans, reltime_exprs);
        self.delete_using_dict(&chars, &url_spans, duration_exprs);
    }

    fn delete_using_dict<E: HasBase>(
        &self,
        chars: &[char],
        url_spans: &[(usize, usize)],
        exprs: &mut Vec<E>,
    ) {
        exprs.retain(|expr| {
            let base = expr.base();
            if self.inappropriate_strings.contains(&base.original_expr) {
                return false;
            }
            let before: String = chars[..base.position_start.min(chars.len())].iter().collect();
            if INAPPROPRIATE_PREFIXES.iter().any(|p| before.ends_with(p)) {
                return false;
            }
            let inside_url = url_spans.iter().any(|&(url_start, url_end)| {
                url_start <= base.position_start && base.position_end <= url_end
            });
            !inside_url
        });
    }
}

/// URL match spans converted to char offsets
fn url_char_spans(text: &str) -> Vec<(usize, usize)> {
    let byte_to_char: std::collections::HashMap<usize, usize> = text
        .char_indices()
        .enumerate()
        .map(|(char_idx, (byte_idx, _))| (byte_idx, char_idx))
        .collect();
    let total_chars = text.chars().count();

    URL_PATTERN
        .find_iter(text)
        .map(|m| {
            let start = byte_to_char.get(&m.start()).copied().unwrap_or(0);
            let end = byte_to_char.get(&m.end()).copied().unwrap_or(total_chars);
            (start, end)
        })
        .collect()
}

fn spans3<A: HasBase, B: HasBase, C: HasBase>(
    a: &[A],
    b: &[B],
    c: &[C],
) -> Vec<(usize, usize)> {
    a.iter()
        .map(|e| (e.base().position_start, e.base().position_end))
        .chain(b.iter().map(|e| (e.base().position_start, e.base().position_end)))
        .chain(c.iter().map(|e| (e.base().position_start, e.base().position_end)))
        .collect()
}

fn delete_duplicates<E: HasBase>(exprs: &mut Vec<E>, other_spans: &[(usize, usize)]) {
    exprs.retain(|expr| {
        let base = expr.base();
        !other_spans.iter().any(|&(other_start, other_end)| {
            other_start <= base.position_start && base.position_end <= other_end
        })
    });
}

fn delete_inappropriate_abstime_exprs(exprs: &mut Vec<AbstimeExpression>) {
    exprs.retain_mut(|expr| {
        revise_year(expr);
        if is_separator_misparse(&expr.base.original_expr) {
            return false;
        }
        !is_inappropriate_time_value(&expr.value_lower_bound)
            && !is_inappropriate_time_value(&expr.value_upper_bound)
    });
}

/// "1.2.3" and "1-2-3" match the date separator patterns but are version
/// or code numbers; the second character gives them away.
fn is_separator_misparse(original_expr: &str) -> bool {
    matches!(
        original_expr.chars().nth(1),
        Some('.' | '・' | '．' | '-' | '−' | 'ー' | '―')
    )
}

/// Expand a two-digit year: "98年" meant 1998, "08年" meant 2008.
/// Explicit "西暦" notation is taken at face value.
fn revise_year(expr: &mut AbstimeExpression) {
    if expr.base.original_expr.contains('西') {
        return;
    }
    for year in [
        &mut expr.value_lower_bound.year,
        &mut expr.value_upper_bound.year,
    ] {
        if TWO_DIGIT_YEAR_PIVOT < *year && *year < 100.0 {
            *year += 1900.0;
        } else if 0.0 <= *year && *year <= TWO_DIGIT_YEAR_PIVOT {
            *year += 2000.0;
        }
    }
}

/// Field ranges a real date/time can take; hours run to 30 because "25時"
/// style late-night notation is common.
fn is_inappropriate_time_value(t: &NTime) -> bool {
    let out_of_range = |x: f64, a: f64, b: f64| {
        if x == INF || x == -INF {
            return false;
        }
        x < a || b < x
    };
    out_of_range(t.year, 1.0, 3000.0)
        || out_of_range(t.month, 1.0, 12.0)
        || out_of_range(t.day, 1.0, 31.0)
        || out_of_range(t.hour, 0.0, 30.0)
        || out_of_range(t.minute, 0.0, 59.0)
        || out_of_range(t.second, 0.0, 59.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::NNumber;

    fn abstime(original: &str, year: f64) -> AbstimeExpression {
        let mut expr = AbstimeExpression::from_number(&NNumber::new(original, 0, 2));
        expr.value_lower_bound.year = year;
        expr.value_upper_bound.year = year;
        expr
    }

    #[test]
    fn test_revise_year_pivot() {
        let mut expr = abstime("98年", 98.0);
        revise_year(&mut expr);
        assert_eq!(expr.value_lower_bound.year, 1998.0);

        let mut expr = abstime("08年", 8.0);
        revise_year(&mut expr);
        assert_eq!(expr.value_lower_bound.year, 2008.0);

        let mut expr = abstime("西暦99年", 99.0);
        revise_year(&mut expr);
        assert_eq!(expr.value_lower_bound.year, 99.0);
    }

    #[test]
    fn test_separator_misparse() {
        assert!(is_separator_misparse("1.2.3"));
        assert!(is_separator_misparse("1-2"));
        assert!(!is_separator_misparse("12月"));
    }

    #[test]
    fn test_out_of_range_time() {
        let mut t = NTime::filled(INF);
        assert!(!is_inappropriate_time_value(&t));
        t.month = 13.0;
        assert!(is_inappropriate_time_value(&t));
        t.month = 12.0;
        t.hour = 28.0;
        assert!(!is_inappropriate_time_value(&t));
    }

    #[test]
    fn test_url_char_spans_multibyte() {
        let text = "詳細はhttps://example.com/a?b=1を見て";
        let spans = url_char_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].0, 3);
        let url_len = "https://example.com/a?b=1".chars().count();
        assert_eq!(spans[0].1, 3 + url_len);
    }

    #[test]
    fn test_delete_duplicates_containment() {
        let mut exprs = vec![abstime("3月", 2021.0)];
        exprs[0].base.position_start = 2;
        exprs[0].base.position_end = 4;
        let mut contained = exprs.clone();
        delete_duplicates(&mut contained, &[(0, 4)]);
        assert!(contained.is_empty());

        let mut overlapping = exprs.clone();
        delete_duplicates(&mut overlapping, &[(3, 6)]);
        assert_eq!(overlapping.len(), 1);
    }
}
