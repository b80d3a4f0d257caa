use super::config::{AdmissionConfigError, RoundingMethod, RoundingSpec};

/// Resolved rounding function, built once per rule and applied to every value it compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Identity,
    Decimals(i32),
    Floor,
    Ceil,
}

impl Rounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::Identity => value,
            Rounding::Decimals(decimals) => round_half_away_from_zero(value, decimals),
            Rounding::Floor => value.floor(),
            Rounding::Ceil => value.ceil(),
        }
    }
}

impl RoundingSpec {
    /// Turn the declarative spec into a callable rounding.
    ///
    /// `decimals` is ignored for floor and ceil; an absent `decimals` rounds to integers.
    pub fn resolve(&self) -> Result<Rounding, AdmissionConfigError> {
        match self.method {
            RoundingMethod::None => Ok(Rounding::Identity),
            RoundingMethod::Decimals => Ok(Rounding::Decimals(self.decimals.unwrap_or(0))),
            RoundingMethod::Floor => Ok(Rounding::Floor),
            RoundingMethod::Ceil => Ok(Rounding::Ceil),
            RoundingMethod::Unrecognized => Err(AdmissionConfigError::UnrecognizedRoundingMethod),
        }
    }
}

/// Shifts the decimal point through the textual representation so that values such as
/// `1.005` are rounded on their written digits rather than on the nearest binary fraction.
fn round_half_away_from_zero(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let scale = 10f64.powi(decimals);
    let shifted = format!("{value}e{decimals}")
        .parse::<f64>()
        .unwrap_or(value * scale);
    if !shifted.is_finite() {
        return value;
    }
    let rounded = shifted.round();

    format!("{rounded}e{}", -decimals)
        .parse::<f64>()
        .unwrap_or(rounded / scale)
}
