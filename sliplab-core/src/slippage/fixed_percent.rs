//! Fixed-percent slippage: a constant fraction of the planned price.

use crate::domain::Side;
use crate::params::{ParamError, ParamValue, Params};

use super::{SlippageBase, SlippageModel, SlippageRequest};

/// Default slippage fraction (0.1%).
pub const DEFAULT_P: f64 = 0.001;

/// Buy fills at `price * (1 + p)`, sell fills at `price * (1 - p)`.
///
/// Parameter `p` must satisfy `0 <= p < 1`.
#[derive(Debug, Clone)]
pub struct FixedPercent {
    base: SlippageBase,
}

impl FixedPercent {
    pub fn new(p: f64) -> Result<Self, ParamError> {
        let mut model = Self::default();
        model.set_param("p", ParamValue::Float(p))?;
        Ok(model)
    }

    /// Default model under a custom name.
    pub fn named(name: impl Into<String>) -> Self {
        let params: Params = [("p", DEFAULT_P)].into_iter().collect();
        Self {
            base: SlippageBase::with_params(name, params),
        }
    }

    pub fn p(&self) -> f64 {
        self.get_param("p").unwrap_or(DEFAULT_P)
    }
}

impl Default for FixedPercent {
    fn default() -> Self {
        Self::named("FixedPercent")
    }
}

impl SlippageModel for FixedPercent {
    fn base(&self) -> &SlippageBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SlippageBase {
        &mut self.base
    }

    fn check_param(&self, key: &str, value: &ParamValue) -> Result<(), ParamError> {
        match (key, value.as_f64()) {
            ("p", Some(p)) if !p.is_finite() || !(0.0..1.0).contains(&p) => {
                Err(ParamError::OutOfRange {
                    key: key.to_string(),
                    value: value.clone(),
                    reason: "must be in [0, 1)".into(),
                })
            }
            _ => Ok(()),
        }
    }

    fn compute(&self, request: &SlippageRequest) -> f64 {
        let p = self.p();
        match request.side {
            Side::Buy => request.price * (1.0 + p),
            Side::Sell => request.price * (1.0 - p),
        }
    }

    fn clone_model(&self) -> Box<dyn SlippageModel> {
        Box::new(self.clone())
    }
}
