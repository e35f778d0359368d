//! Shared helpers for the pattern-matching normalizers: placeholder
//! masking and the longest-match prefix/suffix searches over dictionary
//! tables.

use crate::dict::{DictPattern, PLACE_HOLDER};
use crate::expression::{NNumber, NTime, TimeUnit};

/// Replace every character of each extracted number with the placeholder,
/// so "2021年" becomes "ǂǂǂǂ年" and patterns can address the number slot.
pub fn mask_numbers(chars: &[char], numbers: &[NNumber]) -> Vec<char> {
    let mut masked = chars.to_vec();
    for number in numbers {
        for c in masked
            .iter_mut()
            .take(number.position_end)
            .skip(number.position_start)
        {
            *c = PLACE_HOLDER;
        }
    }
    masked
}

/// Collapse runs of placeholders to a single one ("ǂǂǂǂ年ǂǂ月" ->
/// "ǂ年ǂ月"), matching how dictionary patterns write number slots.
pub fn shorten_place_holders(chars: &[char]) -> Vec<char> {
    let mut shortened = Vec::with_capacity(chars.len());
    for &c in chars {
        if c == PLACE_HOLDER && shortened.last() == Some(&PLACE_HOLDER) {
            continue;
        }
        shortened.push(c);
    }
    shortened
}

fn starts_with(chars: &[char], pattern: &str) -> bool {
    let mut it = chars.iter();
    pattern.chars().all(|p| it.next() == Some(&p))
}

fn ends_with(chars: &[char], pattern: &str) -> bool {
    let pattern_len = pattern.chars().count();
    if pattern_len > chars.len() {
        return false;
    }
    let tail = &chars[chars.len() - pattern_len..];
    starts_with(tail, pattern)
}

/// Find the pattern that is a prefix of `chars` (after placeholder
/// collapsing). The longest match wins; on equal lengths the earlier
/// table entry wins.
pub fn search_prefix<P: DictPattern>(chars: &[char], patterns: &[P]) -> Option<usize> {
    let shortened = shorten_place_holders(chars);
    let mut best: Option<(usize, usize)> = None;
    for (id, pattern) in patterns.iter().enumerate() {
        if !starts_with(&shortened, pattern.pattern()) {
            continue;
        }
        let len = pattern.pattern().chars().count();
        if best.map_or(true, |(_, best_len)| len > best_len) {
            best = Some((id, len));
        }
    }
    best.map(|(id, _)| id)
}

/// Find the pattern that is a suffix of `chars`, longest match first
pub fn search_suffix<P: DictPattern>(chars: &[char], patterns: &[P]) -> Option<usize> {
    let shortened = shorten_place_holders(chars);
    let mut best: Option<(usize, usize)> = None;
    for (id, pattern) in patterns.iter().enumerate() {
        if !ends_with(&shortened, pattern.pattern()) {
            continue;
        }
        let len = pattern.pattern().chars().count();
        if best.map_or(true, |(_, best_len)| len > best_len) {
            best = Some((id, len));
        }
    }
    best.map(|(id, _)| id)
}

/// Search the text before an expression for a modifier suffix
pub fn search_prefix_number_modifier<P: DictPattern>(
    masked: &[char],
    position_start: usize,
    patterns: &[P],
) -> Option<usize> {
    search_suffix(&masked[..position_start.min(masked.len())], patterns)
}

/// Search the text after an expression for a modifier prefix
pub fn search_suffix_number_modifier<P: DictPattern>(
    masked: &[char],
    position_end: usize,
    patterns: &[P],
) -> Option<usize> {
    search_prefix(&masked[position_end.min(masked.len())..], patterns)
}

pub fn is_finite(value: f64) -> bool {
    value != f64::INFINITY && value != f64::NEG_INFINITY
}

/// The most specific time field that has been set, if any
pub fn identify_time_detail(time: &NTime) -> Option<TimeUnit> {
    if is_finite(time.second) {
        Some(TimeUnit::Second)
    } else if is_finite(time.minute) {
        Some(TimeUnit::Minute)
    } else if is_finite(time.hour) {
        Some(TimeUnit::Hour)
    } else if is_finite(time.day) {
        Some(TimeUnit::Day)
    } else if is_finite(time.month) {
        Some(TimeUnit::Month)
    } else if is_finite(time.year) {
        Some(TimeUnit::Year)
    } else {
        None
    }
}
