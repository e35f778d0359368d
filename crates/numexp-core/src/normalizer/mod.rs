//! The pattern-matching normalizer framework.
//!
//! Each domain (quantities, calendar/clock points, relative time,
//! durations) plugs its dictionary tables and revision rules into the
//! same driver: extract numbers, mask them in the text, then attach the
//! surrounding dictionary patterns and modifiers to each number.

pub mod abstime;
pub mod duration;
pub mod numerical;
pub mod reltime;

use std::sync::Arc;

use crate::dict::{DictPattern, NumberModifier};
use crate::expression::{HasBase, NNumber};
use crate::number::NumberNormalizer;
use crate::util::{
    mask_numbers, search_prefix, search_prefix_number_modifier, search_suffix,
    search_suffix_number_modifier,
};

/// Domain-specific behavior slotted into [`ExprNormalizer`]
pub trait Domain {
    type Expr: HasBase + Clone;
    type Pattern: DictPattern + Clone;

    /// Whether the number pipeline should fold signs, decimal points and
    /// range symbols into the numbers before pattern matching. The
    /// calendar/clock domain keeps the raw tokens so separator patterns
    /// like "ǂ/ǂ/ǂ" still see their slots.
    const FIX_SYMBOLS: bool;

    fn from_number(&self, number: &NNumber) -> Self::Expr;

    /// Apply a pattern matched right after the expression. Patterns with
    /// placeholders consume the following expressions from `exprs`.
    fn revise_by_limited_expression(
        &self,
        exprs: &mut Vec<Self::Expr>,
        expr_id: usize,
        pattern: &Self::Pattern,
    );

    /// Apply a counter-like pattern matched right before the expression
    fn revise_by_prefix_counter(&self, expr: &mut Self::Expr, pattern: &Self::Pattern);

    /// Apply a prefix/suffix modifier; the driver has already widened the
    /// expression span over the modifier text.
    fn revise_by_modifier(&self, expr: &mut Self::Expr, modifier: &NumberModifier);

    /// True when no pattern ever attached, so the bare number is dropped
    fn is_empty_expression(&self, expr: &Self::Expr) -> bool;

    fn fix_by_range_expression(&self, chars: &[char], exprs: Vec<Self::Expr>) -> Vec<Self::Expr>;
}

/// The shared driver: one instance per domain, all built over the same
/// number pipeline.
pub struct ExprNormalizer<D: Domain> {
    domain: D,
    number_normalizer: Arc<NumberNormalizer>,
    limited_expressions: Vec<D::Pattern>,
    prefix_counters: Vec<D::Pattern>,
    prefix_number_modifiers: Vec<NumberModifier>,
    suffix_number_modifiers: Vec<NumberModifier>,
}

impl<D: Domain> ExprNormalizer<D> {
    pub fn new(
        domain: D,
        number_normalizer: Arc<NumberNormalizer>,
        limited_expressions: Vec<D::Pattern>,
        prefix_counters: Vec<D::Pattern>,
        prefix_number_modifiers: Vec<NumberModifier>,
        suffix_number_modifiers: Vec<NumberModifier>,
    ) -> Self {
        Self {
            domain,
            number_normalizer,
            limited_expressions,
            prefix_counters,
            prefix_number_modifiers,
            suffix_number_modifiers,
        }
    }

    pub fn prefix_counters(&self) -> &[D::Pattern] {
        &self.prefix_counters
    }

    /// Extract and normalize every expression of this domain in `chars`
    pub fn process(&self, chars: &[char]) -> Vec<D::Expr> {
        let numbers = self.number_normalizer.process(chars, D::FIX_SYMBOLS);
        let masked = mask_numbers(chars, &numbers);

        let mut exprs: Vec<D::Expr> =
            numbers.iter().map(|n| self.domain.from_number(n)).collect();

        let mut i = 0;
        while i < exprs.len() {
            self.normalize_limited_expression(&masked, &mut exprs, i);
            self.normalize_prefix_counter(&masked, &mut exprs[i]);
            self.normalize_suffix_number_modifier(&masked, &mut exprs[i]);
            if self.normalize_prefix_number_modifier(&masked, &mut exprs[i]) {
                // the span grew leftward, a counter may sit before it now
                self.normalize_prefix_counter(&masked, &mut exprs[i]);
            }
            set_original_expr_from_position(&mut exprs[i], chars);
            i += 1;
        }

        let exprs = self.domain.fix_by_range_expression(chars, exprs);
        let mut exprs = fix_kara_expression(exprs);
        exprs.retain(|e| !self.domain.is_empty_expression(e));
        exprs
    }

    fn normalize_limited_expression(
        &self,
        masked: &[char],
        exprs: &mut Vec<D::Expr>,
        expr_id: usize,
    ) {
        let after = &masked[exprs[expr_id].base().position_end.min(masked.len())..];
        let Some(pattern_id) = search_prefix(after, &self.limited_expressions) else {
            return;
        };
        let pattern = self.limited_expressions[pattern_id].clone();
        // patterns with number slots consume that many following expressions
        if expr_id + pattern.place_holder_count() >= exprs.len() {
            return;
        }
        self.domain.revise_by_limited_expression(exprs, expr_id, &pattern);
    }

    fn normalize_prefix_counter(&self, masked: &[char], expr: &mut D::Expr) {
        let before = &masked[..expr.base().position_start.min(masked.len())];
        if let Some(pattern_id) = search_suffix(before, &self.prefix_counters) {
            let pattern = self.prefix_counters[pattern_id].clone();
            self.domain.revise_by_prefix_counter(expr, &pattern);
        }
    }

    fn normalize_suffix_number_modifier(&self, masked: &[char], expr: &mut D::Expr) {
        let found = search_suffix_number_modifier(
            masked,
            expr.base().position_end,
            &self.suffix_number_modifiers,
        );
        if let Some(modifier_id) = found {
            let modifier = self.suffix_number_modifiers[modifier_id].clone();
            expr.base_mut().position_end += modifier.pattern.chars().count();
            self.domain.revise_by_modifier(expr, &modifier);
        }
    }

    fn normalize_prefix_number_modifier(&self, masked: &[char], expr: &mut D::Expr) -> bool {
        let found = search_prefix_number_modifier(
            masked,
            expr.base().position_start,
            &self.prefix_number_modifiers,
        );
        let Some(modifier_id) = found else {
            return false;
        };
        let modifier = self.prefix_number_modifiers[modifier_id].clone();
        let len = modifier.pattern.chars().count();
        expr.base_mut().position_start -= len;
        self.domain.revise_by_modifier(expr, &modifier);
        true
    }
}

/// Re-slice the expression text from the (possibly revised) span.
///
/// Skipped when the span ran past the text, which happens for patterns
/// matched against collapsed placeholders near the end of input.
pub(crate) fn set_original_expr_from_position<E: HasBase>(expr: &mut E, chars: &[char]) {
    let base = expr.base_mut();
    if chars.len() < base.position_end || base.position_start > base.position_end {
        return;
    }
    base.original_expr = chars[base.position_start..base.position_end].iter().collect();
}

pub(crate) fn have_kara_prefix(options: &[String]) -> bool {
    options.iter().any(|o| o == "kara_prefix")
}

pub(crate) fn have_kara_suffix(options: &[String]) -> bool {
    options.iter().any(|o| o == "kara_suffix")
}

pub(crate) fn merge_options(options1: &[String], options2: &[String]) -> Vec<String> {
    options1
        .iter()
        .filter(|o| o.as_str() != "kara_suffix")
        .chain(options2.iter().filter(|o| o.as_str() != "kara_prefix"))
        .cloned()
        .collect()
}

/// An expression pair is a range when the left carries a trailing "から"
/// marker, the right a leading one, and at most the two marker characters
/// separate them.
pub(crate) fn should_merge_range<E: HasBase>(left: &E, right: &E) -> bool {
    have_kara_suffix(&left.base().options)
        && have_kara_prefix(&right.base().options)
        && left.base().position_end + 2 >= right.base().position_start
}

/// Walk adjacent pairs and fold range expressions into the left member.
///
/// `merge_values` moves the domain values across and may veto the merge
/// (the quantity domain requires matching counters).
pub(crate) fn merge_adjacent_ranges<E, F>(chars: &[char], exprs: Vec<E>, mut merge_values: F) -> Vec<E>
where
    E: HasBase + Clone,
    F: FnMut(&mut E, &E) -> bool,
{
    let mut slots: Vec<Option<E>> = exprs.into_iter().map(Some).collect();
    for i in 0..slots.len().saturating_sub(1) {
        let (head, tail) = slots.split_at_mut(i + 1);
        let (Some(left), Some(right)) = (head[i].as_mut(), tail[0].as_ref()) else {
            continue;
        };
        if !should_merge_range(left, right) || !merge_values(left, right) {
            continue;
        }
        left.base_mut().position_end = right.base().position_end;
        let merged = merge_options(&left.base().options, &right.base().options);
        set_original_expr_from_position(left, chars);
        left.base_mut().options = merged;
        slots[i + 1] = None;
    }
    slots.into_iter().flatten().collect()
}

/// Strip a "から" that ended up inside the span because only the range
/// marker matched, not a full range.
pub(crate) fn fix_kara_expression<E: HasBase>(exprs: Vec<E>) -> Vec<E> {
    let mut exprs = exprs;
    for expr in &mut exprs {
        let base = expr.base_mut();
        if base.original_expr.starts_with("から") {
            base.original_expr = base.original_expr.chars().skip(2).collect();
            base.position_start += 2;
            if !base.options.is_empty() {
                base.options.remove(0);
            }
        } else if base.original_expr.ends_with("から") {
            let len = base.original_expr.chars().count();
            base.original_expr = base.original_expr.chars().take(len - 2).collect();
            base.position_end -= 2;
            base.options.pop();
        }
    }
    exprs
}
