//! Garment category heuristics based on the sizes an item is offered in.
//!
//! Apparel is sized alphabetically, with a short contiguous integer run or
//! with parity-consistent numbers (UK 6/8/10, Japanese 1/3/5). Shoes use a
//! wider numeric range with half sizes or gaps. Runs that fit both charts,
//! such as a lone `8` or Australian swimwear `2`/`3`, are left to a lookup
//! against the shoe category page.

use std::sync::LazyLock;

use regex::Regex;
use tracing::error;

use crate::models::ItemType;

use super::stock::strip_sold_out;

static ONE_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)one\s*size").expect("valid one size regex"));
static ALPHA_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(XXS|XS|S|M|L|XL|XXL|XXXL)\b").expect("valid alpha size regex")
});
static NUMERIC_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d?").expect("valid numeric size regex"));

/// Outcome of classifying an item from its sizes alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeVerdict {
    Resolved(ItemType),
    /// The sizes fit both apparel and shoe charts
    NeedsLookup,
    Unresolved,
}

/// Classifies an item from its size-select options.
///
/// `options` are the raw option texts including the leading placeholder.
/// Sold-out sizes still count towards the verdict.
pub fn classify_sizes<S: AsRef<str>>(options: &[S]) -> SizeVerdict {
    let sizes = options
        .iter()
        .skip(1)
        .map(|option| strip_sold_out(option.as_ref()))
        .collect::<Vec<_>>()
        .join(",");

    if ONE_SIZE_RE.is_match(&sizes) {
        return SizeVerdict::Resolved(ItemType::Accessories);
    }
    if ALPHA_SIZE_RE.is_match(&sizes) {
        return SizeVerdict::Resolved(ItemType::Apparel);
    }

    let tokens: Vec<&str> = NUMERIC_SIZE_RE
        .find_iter(&sizes)
        .map(|m| m.as_str())
        .collect();
    classify_numeric(&tokens)
}

/// Running figures over the numeric sizes of one item
#[derive(Debug, Default)]
struct SizeStats {
    sizes: Vec<f64>,
    min: Option<f64>,
    even: usize,
    odd: usize,
    fractional: bool,
}

impl SizeStats {
    fn collect(tokens: &[&str]) -> Self {
        let mut stats = Self::default();
        for token in tokens {
            match token.parse::<f64>() {
                Ok(size) => stats.push(size),
                Err(e) => error!("Can't cast size {token:?} into a number: {e}"),
            }
        }
        stats
    }

    fn push(&mut self, size: f64) {
        if size % 2.0 == 0.0 {
            self.even += 1;
        } else {
            self.odd += 1;
        }
        if size.fract() != 0.0 {
            self.fractional = true;
        }
        self.min = Some(self.min.map_or(size, |min| min.min(size)));
        self.sizes.push(size);
    }

    fn count(&self) -> usize {
        self.sizes.len()
    }

    fn parity_consistent(&self) -> bool {
        self.even == self.count() || self.odd == self.count()
    }

    fn starts_at_zero_or_one(&self) -> bool {
        self.min.is_some_and(|min| min == 0.0 || min == 1.0)
    }

    /// Sorted sizes step up by exactly one
    fn contiguous_run(&self) -> bool {
        let mut sorted = self.sizes.clone();
        sorted.sort_by(f64::total_cmp);
        // Fractional sizes are settled before this point, so steps are whole
        sorted.windows(2).all(|pair| pair[1] - pair[0] == 1.0)
    }
}

fn classify_numeric(tokens: &[&str]) -> SizeVerdict {
    let stats = SizeStats::collect(tokens);

    if stats.count() == 0 {
        return SizeVerdict::Unresolved;
    }
    if stats.fractional {
        return SizeVerdict::Resolved(ItemType::Shoes);
    }
    if stats.count() == 1 {
        return SizeVerdict::NeedsLookup;
    }
    if stats.starts_at_zero_or_one() || stats.parity_consistent() {
        return SizeVerdict::Resolved(ItemType::Apparel);
    }
    if tokens.iter().any(|t| matches!(*t, "2" | "3")) {
        return SizeVerdict::NeedsLookup;
    }
    if stats.contiguous_run() {
        return SizeVerdict::NeedsLookup;
    }
    SizeVerdict::Resolved(ItemType::Shoes)
}
