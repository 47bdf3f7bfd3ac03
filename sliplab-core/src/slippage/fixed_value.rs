//! Fixed-value slippage: a constant price offset.

use crate::domain::Side;
use crate::params::{ParamError, ParamValue, Params};

use super::{SlippageBase, SlippageModel, SlippageRequest};

/// Default price offset.
pub const DEFAULT_VALUE: f64 = 0.01;

/// Buy fills at `price + value`, sell fills at `price - value`. `value >= 0`.
#[derive(Debug, Clone)]
pub struct FixedValue {
    base: SlippageBase,
}

impl FixedValue {
    pub fn new(value: f64) -> Result<Self, ParamError> {
        let mut model = Self::default();
        model.set_param("value", ParamValue::Float(value))?;
        Ok(model)
    }

    pub fn named(name: impl Into<String>) -> Self {
        let params: Params = [("value", DEFAULT_VALUE)].into_iter().collect();
        Self {
            base: SlippageBase::with_params(name, params),
        }
    }

    pub fn value(&self) -> f64 {
        self.get_param("value").unwrap_or(DEFAULT_VALUE)
    }
}

impl Default for FixedValue {
    fn default() -> Self {
        Self::named("FixedValue")
    }
}

impl SlippageModel for FixedValue {
    fn base(&self) -> &SlippageBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SlippageBase {
        &mut self.base
    }

    fn check_param(&self, key: &str, value: &ParamValue) -> Result<(), ParamError> {
        match (key, value.as_f64()) {
            ("value", Some(v)) if !v.is_finite() || v < 0.0 => Err(ParamError::OutOfRange {
                key: key.to_string(),
                value: value.clone(),
                reason: "must be finite and >= 0".into(),
            }),
            _ => Ok(()),
        }
    }

    fn compute(&self, request: &SlippageRequest) -> f64 {
        let value = self.value();
        match request.side {
            Side::Buy => request.price + value,
            Side::Sell => request.price - value,
        }
    }

    fn clone_model(&self) -> Box<dyn SlippageModel> {
        Box::new(self.clone())
    }
}
