// src/types.rs
use crate::error::{EngineError, Result};
use crate::utils::precision::decimal_from_f64;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current state of one position. Every field is strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    current_price: Decimal,
    average_cost: Decimal,
    share_count: Decimal,
}

impl Holding {
    pub fn new(current_price: Decimal, average_cost: Decimal, share_count: Decimal) -> Result<Self> {
        Ok(Self {
            current_price: ensure_positive("currentPrice", current_price)?,
            average_cost: ensure_positive("averageCost", average_cost)?,
            share_count: ensure_positive("shareCount", share_count)?,
        })
    }

    /// Builds a holding from raw floats, rejecting NaN and infinities.
    pub fn from_f64(current_price: f64, average_cost: f64, share_count: f64) -> Result<Self> {
        Self::new(
            finite("currentPrice", current_price)?,
            finite("averageCost", average_cost)?,
            finite("shareCount", share_count)?,
        )
    }

    pub fn current_price(&self) -> Decimal {
        self.current_price
    }

    pub fn average_cost(&self) -> Decimal {
        self.average_cost
    }

    pub fn share_count(&self) -> Decimal {
        self.share_count
    }
}

fn ensure_positive(field: &'static str, value: Decimal) -> Result<Decimal> {
    if value > Decimal::ZERO {
        Ok(value)
    } else {
        Err(EngineError::InvalidHolding {
            field,
            value: value.to_string(),
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<Decimal> {
    decimal_from_f64(value).ok_or_else(|| EngineError::InvalidHolding {
        field,
        value: value.to_string(),
    })
}

/// Snapshot of one portfolio row for threshold scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub ticker: String,
    pub share_count: Decimal,
    /// Signed gain/loss percent, negative = loss.
    pub percent_change: Decimal,
}

/// State of the position after buying the recommended shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub new_share_count: Decimal,
    pub new_total_cost: Decimal,
    pub new_average_cost: Decimal,
    pub new_loss_percent: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Recommendation {
    /// The position is already at or better than the target loss.
    TargetAlreadyMet,
    #[serde(rename_all = "camelCase")]
    Buy {
        shares_to_buy: u64,
        target_average_cost: Decimal,
        projection: Projection,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingResult {
    pub holding: Holding,
    pub target_loss_percent: Decimal,
    pub current_loss_amount: Decimal,
    pub current_loss_percent: Decimal,
    pub recommendation: Recommendation,
}

impl SizingResult {
    /// Zero when the target is already met.
    pub fn shares_to_buy(&self) -> u64 {
        match self.recommendation {
            Recommendation::TargetAlreadyMet => 0,
            Recommendation::Buy { shares_to_buy, .. } => shares_to_buy,
        }
    }

    pub fn is_target_met(&self) -> bool {
        matches!(self.recommendation, Recommendation::TargetAlreadyMet)
    }

    pub fn projection(&self) -> Option<&Projection> {
        match &self.recommendation {
            Recommendation::TargetAlreadyMet => None,
            Recommendation::Buy { projection, .. } => Some(projection),
        }
    }
}

/// Outcome of a best-effort scan over heterogeneous page entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanReport {
    pub threshold_percent: Decimal,
    pub scanned: usize,
    pub flagged: Vec<Position>,
    /// `EngineError::MalformedEntry` for every entry that could not be normalized.
    pub skipped: Vec<EngineError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn holding_accepts_fractional_shares() {
        let holding = Holding::new(dec!(12.5), dec!(20), dec!(0.25)).unwrap();
        assert_eq!(holding.share_count(), dec!(0.25));
    }

    #[test]
    fn holding_rejects_non_positive_fields() {
        let err = Holding::new(dec!(0), dec!(100), dec!(10)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidHolding { field: "currentPrice", .. }
        ));

        let err = Holding::new(dec!(50), dec!(-1), dec!(10)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidHolding { field: "averageCost", .. }
        ));

        let err = Holding::new(dec!(50), dec!(100), dec!(0)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidHolding { field: "shareCount", .. }
        ));
    }

    #[test]
    fn holding_rejects_non_finite_floats() {
        let err = Holding::from_f64(50.0, f64::NAN, 10.0).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidHolding { field: "averageCost", .. }
        ));
        assert!(Holding::from_f64(f64::INFINITY, 100.0, 10.0).is_err());
    }
}
