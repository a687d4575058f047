// src/core/sizing.rs
use crate::error::{EngineError, Result};
use crate::types::{Holding, Projection, Recommendation, SizingResult};
use crate::utils::precision::{
    checked_add, checked_div, checked_mul, checked_sub, round_up_shares,
};
use rust_decimal::Decimal;
use tracing::debug;

/// Computes how many shares to buy so the average cost lands on a target loss.
///
/// Stateless: every call derives its result from the arguments alone.
pub struct ShareSizingCalculator;

impl ShareSizingCalculator {
    /// Sizes a purchase at the current price that brings the position's loss
    /// to `target_loss_percent` (0 = break even).
    ///
    /// Fails with `InvalidTarget` outside `[0, 100]` and with `DegenerateTarget`
    /// when the blend equation has no solution (a 100% target, or a 0% target
    /// on a position that is under water).
    pub fn compute(holding: &Holding, target_loss_percent: Decimal) -> Result<SizingResult> {
        validate_percent(target_loss_percent)?;
        if target_loss_percent == Decimal::ONE_HUNDRED {
            return Err(EngineError::DegenerateTarget(target_loss_percent));
        }

        let price = holding.current_price();
        let avg_cost = holding.average_cost();
        let shares = holding.share_count();

        let current_cost = checked_mul(avg_cost, shares)?;
        let current_value = checked_mul(price, shares)?;
        let current_loss_amount = checked_sub(current_value, current_cost)?;
        let current_loss_percent = checked_mul(
            checked_div(current_loss_amount, current_cost)?,
            Decimal::ONE_HUNDRED,
        )?;

        debug!(
            "Sizing: price={} avg_cost={} shares={} loss={}% target=-{}%",
            price, avg_cost, shares, current_loss_percent, target_loss_percent
        );

        let mut result = SizingResult {
            holding: *holding,
            target_loss_percent,
            current_loss_amount,
            current_loss_percent,
            recommendation: Recommendation::TargetAlreadyMet,
        };

        if current_loss_percent >= -target_loss_percent {
            debug!("Target already met, no purchase needed");
            return Ok(result);
        }

        // 1 + ratio lies in (0, 1] here because the target is below 100.
        let target_loss_ratio = -target_loss_percent / Decimal::ONE_HUNDRED;
        let target_avg_cost = checked_div(price, Decimal::ONE + target_loss_ratio)?;

        let denominator = price - target_avg_cost;
        if denominator.is_zero() {
            return Err(EngineError::DegenerateTarget(target_loss_percent));
        }
        let numerator = checked_sub(checked_mul(target_avg_cost, shares)?, current_cost)?;
        let raw_shares = checked_div(numerator, denominator)?;

        let mut shares_to_buy = round_up_shares(raw_shares)?;
        if shares_to_buy == 0 {
            debug!("Unrounded size {} is not positive, target met", raw_shares);
            return Ok(result);
        }

        // Division noise can push an exact answer (980) just past an integer.
        let mut projection = project(price, shares, current_cost, shares_to_buy)?;
        if shares_to_buy > 1 {
            let fewer = project(price, shares, current_cost, shares_to_buy - 1)?;
            if fewer.new_loss_percent >= -target_loss_percent {
                shares_to_buy -= 1;
                projection = fewer;
            }
        }

        result.recommendation = Recommendation::Buy {
            shares_to_buy,
            target_average_cost: target_avg_cost,
            projection,
        };
        Ok(result)
    }
}

/// Accepts a percentage in `[0, 100]`, shared by targets and scan thresholds.
pub fn validate_percent(percent: Decimal) -> Result<Decimal> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(EngineError::InvalidTarget(percent.to_string()));
    }
    Ok(percent)
}

fn project(
    price: Decimal,
    shares: Decimal,
    current_cost: Decimal,
    shares_to_buy: u64,
) -> Result<Projection> {
    let bought = Decimal::from(shares_to_buy);
    let new_share_count = checked_add(shares, bought)?;
    let new_total_cost = checked_add(current_cost, checked_mul(price, bought)?)?;
    let new_average_cost = checked_div(new_total_cost, new_share_count)?;
    let new_value = checked_mul(price, new_share_count)?;
    let new_loss_percent = checked_mul(
        checked_div(checked_sub(new_value, new_total_cost)?, new_total_cost)?,
        Decimal::ONE_HUNDRED,
    )?;

    Ok(Projection {
        new_share_count,
        new_total_cost,
        new_average_cost,
        new_loss_percent,
    })
}
