//! Numeric expression extraction and normalization for Japanese text.
//!
//! This library provides:
//! - Multi-notation number scanning (Arabic, fullwidth, kanji numerals)
//! - Positional/named-power numeral conversion
//! - Dictionary-driven normalization of quantities, calendar/clock
//!   points, relative time and durations
//! - Cross-domain deduplication and misparse filtering

pub mod convert;
pub mod dict;
pub mod digit;
pub mod expression;
pub mod extract;
pub mod filter;
pub mod normalizer;
pub mod number;
pub mod output;
pub mod symbol;

mod util;

use std::sync::Arc;

pub use dict::{DictError, Language, PLACE_HOLDER};
pub use expression::{
    AbstimeExpression, DurationExpression, NNumber, NTime, NumericalExpression,
    ReltimeExpression, INF,
};
pub use filter::TWO_DIGIT_YEAR_PIVOT;
pub use output::{BoundValue, Expression, ExpressionKind, Time};

use dict::Dictionaries;
use digit::DigitTable;
use filter::InappropriateExpressionRemover;
use normalizer::{abstime, duration, numerical, reltime, ExprNormalizer};
use number::NumberNormalizer;

/// The end-to-end normalizer: all four domains plus the filter, sharing
/// one dictionary load.
pub struct NormalizeNumexp {
    numerical: ExprNormalizer<numerical::NumericalDomain>,
    abstime: ExprNormalizer<abstime::AbstimeDomain>,
    reltime: ExprNormalizer<reltime::ReltimeDomain>,
    duration: ExprNormalizer<duration::DurationDomain>,
    remover: InappropriateExpressionRemover,
}

impl NormalizeNumexp {
    /// Load the dictionaries for `language` and build the pipeline
    pub fn new(language: Language) -> Result<Self, DictError> {
        let dict = Dictionaries::load(language)?;
        let table = Arc::new(DigitTable::new(&dict.characters));
        let number_normalizer = Arc::new(NumberNormalizer::new(language, table));

        Ok(Self {
            numerical: numerical::normalizer(&dict, number_normalizer.clone()),
            abstime: abstime::normalizer(&dict, number_normalizer.clone()),
            reltime: reltime::normalizer(&dict, number_normalizer.clone()),
            duration: duration::normalizer(&dict, number_normalizer),
            remover: InappropriateExpressionRemover::new(&dict),
        })
    }

    /// Extract every numeric expression in `text`, normalized and sorted
    /// by start offset.
    pub fn normalize(&self, text: &str) -> Vec<Expression> {
        let chars: Vec<char> = text.chars().collect();

        let mut numerical_exprs = self.numerical.process(&chars);
        let mut abstime_exprs = self.abstime.process(&chars);
        let mut reltime_exprs = self.reltime.process(&chars);
        let mut duration_exprs = self.duration.process(&chars);

        self.remover.remove_inappropriate_extraction(
            text,
            &mut numerical_exprs,
            &mut abstime_exprs,
            &mut reltime_exprs,
            &mut duration_exprs,
        );

        let merged = output::merge_expressions(
            &numerical_exprs,
            &abstime_exprs,
            &reltime_exprs,
            &duration_exprs,
        );
        tracing::debug!(
            text_chars = chars.len(),
            expressions = merged.len(),
            "normalized text"
        );
        merged
    }

    /// Quantity expressions only, unfiltered
    pub fn process_numerical(&self, text: &str) -> Vec<NumericalExpression> {
        let chars: Vec<char> = text.chars().collect();
        self.numerical.process(&chars)
    }

    /// Calendar/clock expressions only, unfiltered
    pub fn process_abstime(&self, text: &str) -> Vec<AbstimeExpression> {
        let chars: Vec<char> = text.chars().collect();
        self.abstime.process(&chars)
    }

    /// Relative time expressions only, unfiltered
    pub fn process_reltime(&self, text: &str) -> Vec<ReltimeExpression> {
        let chars: Vec<char> = text.chars().collect();
        self.reltime.process(&chars)
    }

    /// Duration expressions only, unfiltered
    pub fn process_duration(&self, text: &str) -> Vec<DurationExpression> {
        let chars: Vec<char> = text.chars().collect();
        self.duration.process(&chars)
    }
}
