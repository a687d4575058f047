// src/core/filter.rs
use crate::connectors::messages::RawPosition;
use crate::core::sizing::validate_percent;
use crate::error::Result;
use crate::types::{Position, ScanReport};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Selects positions whose loss is deeper than a threshold.
pub struct PositionFilter;

impl PositionFilter {
    /// Strictly beyond: a position sitting exactly at `-threshold_percent` is not flagged.
    pub fn is_beyond_threshold(position: &Position, threshold_percent: Decimal) -> bool {
        position.percent_change < -threshold_percent
    }

    /// Stable filter, the output keeps the input order.
    pub fn filter_beyond_threshold(
        positions: &[Position],
        threshold_percent: Decimal,
    ) -> Vec<Position> {
        positions
            .iter()
            .filter(|p| Self::is_beyond_threshold(p, threshold_percent))
            .cloned()
            .collect()
    }

    /// Best-effort scan over raw page rows.
    ///
    /// Only an out-of-range threshold fails the scan. Rows that cannot be
    /// normalized are recorded in `ScanReport::skipped` and the rest are filtered.
    pub fn scan(entries: &[RawPosition], threshold_percent: Decimal) -> Result<ScanReport> {
        validate_percent(threshold_percent)?;

        let mut positions = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            match entry.to_position(index) {
                Ok(position) => positions.push(position),
                Err(e) => {
                    warn!("{}", e);
                    skipped.push(e);
                }
            }
        }

        let flagged = Self::filter_beyond_threshold(&positions, threshold_percent);
        debug!(
            "Scanned {} entries: {} beyond -{}%, {} skipped",
            entries.len(),
            flagged.len(),
            threshold_percent,
            skipped.len()
        );

        Ok(ScanReport {
            threshold_percent,
            scanned: entries.len(),
            flagged,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use rust_decimal_macros::dec;

    fn position(ticker: &str, percent_change: Decimal) -> Position {
        Position {
            ticker: ticker.to_string(),
            share_count: dec!(10),
            percent_change,
        }
    }

    fn tickers(positions: &[Position]) -> Vec<&str> {
        positions.iter().map(|p| p.ticker.as_str()).collect()
    }

    #[test]
    fn keeps_losers_beyond_threshold_in_order() {
        let positions = vec![
            position("A", dec!(-25.0)),
            position("B", dec!(-10.0)),
            position("C", dec!(-30.5)),
        ];
        let flagged = PositionFilter::filter_beyond_threshold(&positions, dec!(20));
        assert_eq!(tickers(&flagged), vec!["A", "C"]);
    }

    #[test]
    fn exact_threshold_is_not_flagged() {
        assert!(!PositionFilter::is_beyond_threshold(
            &position("EQ", dec!(-20)),
            dec!(20)
        ));
        assert!(PositionFilter::is_beyond_threshold(
            &position("JUST", dec!(-20.0001)),
            dec!(20)
        ));
    }

    #[test]
    fn gains_are_never_flagged() {
        let positions = vec![position("UP", dec!(12.5)), position("FLAT", dec!(0))];
        assert!(PositionFilter::filter_beyond_threshold(&positions, dec!(0)).is_empty());
    }

    #[test]
    fn output_is_an_ordered_subsequence() {
        let positions: Vec<Position> = (0..20)
            .map(|i| position(&format!("T{i}"), Decimal::from(-(i * 7 % 40))))
            .collect();
        let flagged = PositionFilter::filter_beyond_threshold(&positions, dec!(15));

        let mut cursor = positions.iter();
        for kept in &flagged {
            assert!(cursor.any(|p| p == kept), "{} out of order", kept.ticker);
        }
    }

    #[test]
    fn scan_skips_malformed_rows() {
        let entries = vec![
            RawPosition::new("A", 10.0, "-25.00%"),
            RawPosition::new("BAD", 3.0, "n/a"),
            RawPosition::new("B", 4.0, -10.0),
            RawPosition::default(),
            RawPosition::new("C", 1.0, "-30.50"),
        ];
        let report = PositionFilter::scan(&entries, dec!(20)).unwrap();

        assert_eq!(report.scanned, 5);
        assert_eq!(tickers(&report.flagged), vec!["A", "C"]);
        assert_eq!(report.skipped.len(), 2);
        assert!(matches!(
            report.skipped[0],
            EngineError::MalformedEntry { index: 1, .. }
        ));
        assert!(matches!(
            report.skipped[1],
            EngineError::MalformedEntry { index: 3, .. }
        ));
    }

    #[test]
    fn scan_rejects_out_of_range_threshold() {
        let entries = vec![RawPosition::new("A", 10.0, -25.0)];
        assert!(matches!(
            PositionFilter::scan(&entries, dec!(101)),
            Err(EngineError::InvalidTarget(_))
        ));
    }

    #[test]
    fn empty_scan_succeeds() {
        let report = PositionFilter::scan(&[], dec!(20)).unwrap();
        assert_eq!(report.scanned, 0);
        assert!(report.flagged.is_empty());
        assert!(report.skipped.is_empty());
    }
}
