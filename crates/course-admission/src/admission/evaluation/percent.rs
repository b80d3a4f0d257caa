//! Percentage helpers shared by the rule variants.
//!
//! Neither helper guards against a zero denominator; the rules special-case empty
//! totals before calling in.

/// Share of `part` in `whole`, expressed in percent.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    (part / whole) * 100.0
}

/// The amount that `percent` percent of `total` corresponds to.
pub fn amount_of_percent(total: f64, percent: f64) -> f64 {
    total * percent / 100.0
}
