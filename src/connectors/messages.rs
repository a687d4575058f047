// src/connectors/messages.rs
use crate::error::{EngineError, Result};
use crate::types::{Holding, Position};
use crate::utils::precision::{decimal_from_f64, parse_currency, parse_percent, parse_quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A number as the page delivers it: either already numeric or scraped text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Number(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

/// Holding fields read from a position page. Every field is required downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHolding {
    pub current_price: Option<RawNumber>,
    #[serde(alias = "avgCost")]
    pub average_cost: Option<RawNumber>,
    #[serde(alias = "numShares")]
    pub share_count: Option<RawNumber>,
}

impl RawHolding {
    pub fn new(current_price: f64, average_cost: f64, share_count: f64) -> Self {
        Self {
            current_price: Some(current_price.into()),
            average_cost: Some(average_cost.into()),
            share_count: Some(share_count.into()),
        }
    }

    /// Normalizes into a validated `Holding`.
    ///
    /// Missing or unreadable fields are all reported together as
    /// `IncompleteSourceData`, and nothing is defaulted. Fields that parse but
    /// are not positive and finite give `InvalidHolding`.
    pub fn into_holding(self) -> Result<Holding> {
        let price = read_field("currentPrice", self.current_price.as_ref(), parse_currency);
        let avg_cost = read_field("averageCost", self.average_cost.as_ref(), parse_currency);
        let shares = read_field("shareCount", self.share_count.as_ref(), parse_quantity);

        let missing: Vec<&'static str> = [&price, &avg_cost, &shares]
            .iter()
            .filter_map(|field| match field {
                Field::Missing(name) => Some(*name),
                _ => None,
            })
            .collect();
        if !missing.is_empty() {
            return Err(EngineError::IncompleteSourceData(missing));
        }

        Holding::new(price.value()?, avg_cost.value()?, shares.value()?)
    }
}

enum Field {
    Value(Decimal),
    Missing(&'static str),
    NonFinite(&'static str, f64),
}

impl Field {
    fn value(&self) -> Result<Decimal> {
        match self {
            Field::Value(v) => Ok(*v),
            Field::Missing(name) => Err(EngineError::IncompleteSourceData(vec![*name])),
            Field::NonFinite(name, raw) => Err(EngineError::InvalidHolding {
                field: *name,
                value: raw.to_string(),
            }),
        }
    }
}

fn read_field(
    name: &'static str,
    raw: Option<&RawNumber>,
    parse_text: fn(&str) -> Option<Decimal>,
) -> Field {
    match raw {
        None => Field::Missing(name),
        Some(RawNumber::Number(n)) => match decimal_from_f64(*n) {
            Some(v) => Field::Value(v),
            None => Field::NonFinite(name, *n),
        },
        Some(RawNumber::Text(text)) => match parse_text(text) {
            Some(v) => Field::Value(v),
            None => Field::Missing(name),
        },
    }
}

/// One row of the portfolio list as scraped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPosition {
    pub ticker: Option<String>,
    #[serde(alias = "shares")]
    pub share_count: Option<RawNumber>,
    pub percent_change: Option<RawNumber>,
}

impl RawPosition {
    pub fn new(ticker: &str, share_count: f64, percent_change: impl Into<RawNumber>) -> Self {
        Self {
            ticker: Some(ticker.to_string()),
            share_count: Some(share_count.into()),
            percent_change: Some(percent_change.into()),
        }
    }

    /// Normalizes entry number `index` of a scan into a `Position`.
    /// Any failure is a `MalformedEntry`, which scanning skips.
    pub fn to_position(&self, index: usize) -> Result<Position> {
        let malformed = |reason: String| EngineError::MalformedEntry { index, reason };

        let ticker = self
            .ticker
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| malformed("missing ticker".to_string()))?;

        let percent_change = match &self.percent_change {
            None => return Err(malformed(format!("{ticker}: missing percent change"))),
            Some(RawNumber::Number(n)) => decimal_from_f64(*n),
            Some(RawNumber::Text(text)) => parse_percent(text),
        }
        .ok_or_else(|| malformed(format!("{ticker}: unreadable percent change")))?;

        // The share label is informational: absent or unreadable counts as 0.
        let share_count = match &self.share_count {
            None => None,
            Some(RawNumber::Number(n)) => decimal_from_f64(*n),
            Some(RawNumber::Text(text)) => parse_quantity(text),
        }
        .filter(|shares| *shares >= Decimal::ZERO)
        .unwrap_or(Decimal::ZERO);

        Ok(Position {
            ticker: ticker.to_string(),
            share_count,
            percent_change,
        })
    }
}

/// File form of the page data: holdings keyed by symbol plus the portfolio list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub holdings: HashMap<String, RawHolding>,
    #[serde(default)]
    pub positions: Vec<RawPosition>,
}
