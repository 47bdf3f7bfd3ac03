//! Slippage models: turn a planned fill price into the price actually paid.
//!
//! Slippage is adverse: buyers fill higher, sellers fill lower.
//! - `SlippageBase`: state every model carries (name, parameters, bound bars)
//! - `SlippageModel`: the polymorphic contract an engine consumes
//! - `FixedPercent`, `FixedValue`: built-in models
//! - `CustomSlippage`: compute behaviour supplied as a closure

pub mod custom;
pub mod fixed_percent;
pub mod fixed_value;

pub use custom::{create_slippage_model, ComputeFn, CustomSlippage, DEFAULT_CUSTOM_NAME};
pub use fixed_percent::FixedPercent;
pub use fixed_value::FixedValue;

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Side};
use crate::params::{FromParam, ParamError, ParamValue, Params};

/// Name given to a bare `SlippageBase`.
pub const DEFAULT_BASE_NAME: &str = "SlippageBase";

/// A planned fill handed to a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlippageRequest {
    pub side: Side,
    pub datetime: NaiveDateTime,
    /// Planned (pre-slippage) price.
    pub price: f64,
}

impl SlippageRequest {
    pub fn new(side: Side, datetime: NaiveDateTime, price: f64) -> Self {
        Self {
            side,
            datetime,
            price,
        }
    }

    pub fn buy(datetime: NaiveDateTime, price: f64) -> Self {
        Self::new(Side::Buy, datetime, price)
    }

    pub fn sell(datetime: NaiveDateTime, price: f64) -> Self {
        Self::new(Side::Sell, datetime, price)
    }
}

/// Read-only view of a model's state, passed to compute functions.
#[derive(Debug, Clone, Copy)]
pub struct SlippageContext<'a> {
    pub name: &'a str,
    pub params: &'a Params,
    pub bars: &'a [Bar],
}

impl<'a> SlippageContext<'a> {
    /// Latest bar at or before `datetime`. Assumes bars are in time order.
    pub fn bar_at(&self, datetime: NaiveDateTime) -> Option<&'a Bar> {
        let bars = self.bars;
        let idx = bars.partition_point(|b| b.datetime <= datetime);
        idx.checked_sub(1).map(|i| &bars[i])
    }
}

/// State shared by every slippage model.
#[derive(Debug, Clone)]
pub struct SlippageBase {
    name: String,
    params: Params,
    bars: Arc<[Bar]>,
}

impl SlippageBase {
    /// Create the shared state of a slippage model.
    ///
    /// - `name`: model name. Fixed for the lifetime of the model;
    ///   `SlippageBase::default()` uses `"SlippageBase"`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_params(name, Params::new())
    }

    /// Create the shared state with an initial parameter mapping.
    pub fn with_params(name: impl Into<String>, params: Params) -> Self {
        Self {
            name: name.into(),
            params,
            bars: Arc::from(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn context(&self) -> SlippageContext<'_> {
        SlippageContext {
            name: &self.name,
            params: &self.params,
            bars: &self.bars,
        }
    }
}

impl Default for SlippageBase {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_NAME)
    }
}

/// Slippage model: computes the real fill price of a planned fill.
///
/// Object safe; engines hold models as `Box<dyn SlippageModel>`.
pub trait SlippageModel: Send + Sync {
    fn base(&self) -> &SlippageBase;

    fn base_mut(&mut self) -> &mut SlippageBase;

    /// Real fill price for the request (planned price plus adverse slippage).
    fn compute(&self, request: &SlippageRequest) -> f64;

    /// Fresh, independent copy of this model.
    fn clone_model(&self) -> Box<dyn SlippageModel>;

    fn name(&self) -> &str {
        self.base().name()
    }

    fn params(&self) -> &Params {
        self.base().params()
    }

    fn have_param(&self, key: &str) -> bool {
        self.base().params().contains(key)
    }

    /// Read a parameter as `T`.
    fn get_param<T: FromParam>(&self, key: &str) -> Result<T, ParamError>
    where
        Self: Sized,
    {
        self.base().params().get(key)
    }

    /// Untyped parameter lookup, callable on `dyn SlippageModel`.
    fn get_param_value(&self, key: &str) -> Option<&ParamValue> {
        self.base().params().value(key)
    }

    /// Validation hook run before a parameter is stored.
    fn check_param(&self, _key: &str, _value: &ParamValue) -> Result<(), ParamError> {
        Ok(())
    }

    /// Set one parameter. The model's `check_param` runs first; the store
    /// then rejects kind changes of existing keys.
    fn set_param(&mut self, key: &str, value: ParamValue) -> Result<(), ParamError> {
        let result = self
            .check_param(key, &value)
            .and_then(|()| self.base_mut().params_mut().set(key, value));
        match &result {
            Ok(()) => log::debug!("{}: set param {key}", self.name()),
            Err(e) => log::warn!("{}: rejected param {key}: {e}", self.name()),
        }
        result
    }

    fn real_buy_price(&self, datetime: NaiveDateTime, price: f64) -> f64 {
        self.compute(&SlippageRequest::buy(datetime, price))
    }

    fn real_sell_price(&self, datetime: NaiveDateTime, price: f64) -> f64 {
        self.compute(&SlippageRequest::sell(datetime, price))
    }

    fn bars(&self) -> &[Bar] {
        self.base().bars()
    }

    /// Bind the market data of the traded instrument, then run `calculate`.
    fn set_bars(&mut self, bars: Arc<[Bar]>) {
        self.base_mut().bars = bars;
        self.calculate();
    }

    /// Hook run after new bars are bound.
    fn calculate(&mut self) {}

    /// Drop bound market data and any derived state.
    fn reset(&mut self) {
        self.base_mut().bars = Arc::from(Vec::new());
        self.reset_state();
    }

    /// Hook run by `reset` for model-specific state.
    fn reset_state(&mut self) {}
}

impl Clone for Box<dyn SlippageModel> {
    fn clone(&self) -> Self {
        self.clone_model()
    }
}
