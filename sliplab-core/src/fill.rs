//! Applying a slippage model to a planned fill.
//!
//! Tick rounding is applied after slippage and is adverse: buy rounds up,
//! sell rounds down.

use serde::{Deserialize, Serialize};

use crate::domain::Side;
use crate::slippage::{SlippageModel, SlippageRequest};

/// Outcome of slipping a planned fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlippedFill {
    /// Planned price before slippage.
    pub requested: f64,
    /// Real fill price.
    pub price: f64,
    /// Adverse cost of slippage in currency units. Never negative.
    pub slippage_amount: f64,
}

/// Slip a planned fill of `quantity` units through `model`.
pub fn apply_slippage(
    model: &dyn SlippageModel,
    request: &SlippageRequest,
    quantity: f64,
) -> SlippedFill {
    let price = model.compute(request);
    slipped(request, price, quantity)
}

/// Slip a planned fill, then round the result to `tick_size` adversely.
pub fn apply_slippage_with_tick(
    model: &dyn SlippageModel,
    request: &SlippageRequest,
    quantity: f64,
    tick_size: f64,
) -> SlippedFill {
    let price = round_to_tick(model.compute(request), tick_size, request.side);
    slipped(request, price, quantity)
}

fn slipped(request: &SlippageRequest, price: f64, quantity: f64) -> SlippedFill {
    let adverse = (price - request.price) * request.side.adverse_sign();
    SlippedFill {
        requested: request.price,
        price,
        slippage_amount: (adverse * quantity.abs()).max(0.0),
    }
}

/// Round `price` to a multiple of `tick_size`: buys up, sells down.
///
/// A non-positive tick size leaves the price unchanged.
pub fn round_to_tick(price: f64, tick_size: f64, side: Side) -> f64 {
    if tick_size <= 0.0 {
        return price;
    }
    // absorb float noise like 100.0 / 0.01 = 10000.000000000002
    let ticks = price / tick_size;
    let rounded = match side {
        Side::Buy => (ticks - 1e-9).ceil(),
        Side::Sell => (ticks + 1e-9).floor(),
    };
    rounded * tick_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slippage::{CustomSlippage, FixedPercent, FixedValue};
    use chrono::{NaiveDate, NaiveDateTime};

    fn dt() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn buy_slippage_amount() {
        let model = FixedPercent::new(0.001).unwrap(); // 10 bps
        let fill = apply_slippage(&model, &SlippageRequest::buy(dt(), 100.0), 100.0);
        assert!((fill.price - 100.10).abs() < 1e-10);
        assert!((fill.slippage_amount - 10.0).abs() < 1e-8);
        assert_eq!(fill.requested, 100.0);
    }

    #[test]
    fn sell_slippage_amount() {
        let model = FixedValue::new(0.05).unwrap();
        let fill = apply_slippage(&model, &SlippageRequest::sell(dt(), 20.0), 200.0);
        assert!((fill.price - 19.95).abs() < 1e-10);
        assert!((fill.slippage_amount - 10.0).abs() < 1e-8);
    }

    #[test]
    fn favourable_move_reports_zero_cost() {
        // price improvement: buyer fills below plan
        let model = CustomSlippage::from_fn(|_, req| req.price - 1.0);
        let fill = apply_slippage(&model, &SlippageRequest::buy(dt(), 50.0), 10.0);
        assert_eq!(fill.price, 49.0);
        assert_eq!(fill.slippage_amount, 0.0);
    }

    #[test]
    fn tick_rounding_is_adverse() {
        assert!((round_to_tick(100.101, 0.01, Side::Buy) - 100.11).abs() < 1e-10);
        assert!((round_to_tick(100.109, 0.01, Side::Sell) - 100.10).abs() < 1e-10);
    }

    #[test]
    fn tick_aligned_price_is_unchanged() {
        assert!((round_to_tick(100.0, 0.01, Side::Buy) - 100.0).abs() < 1e-10);
        assert!((round_to_tick(100.0, 0.01, Side::Sell) - 100.0).abs() < 1e-10);
    }

    #[test]
    fn zero_tick_is_noop() {
        assert_eq!(round_to_tick(1.2345, 0.0, Side::Buy), 1.2345);
    }

    #[test]
    fn slippage_with_tick() {
        let model = FixedPercent::new(0.001).unwrap();
        let fill =
            apply_slippage_with_tick(&model, &SlippageRequest::buy(dt(), 33.33), 1.0, 0.01);
        // 33.33 * 1.001 = 33.36333 -> 33.37
        assert!((fill.price - 33.37).abs() < 1e-10);
        assert!((fill.slippage_amount - 0.04).abs() < 1e-10);
    }
}
