//! Closure-backed slippage models.
//!
//! `create_slippage_model` builds a model from a plain function plus a
//! parameter mapping, so ad-hoc strategies need no new type. The model is
//! indistinguishable from a built-in one from an engine's point of view.

use std::fmt;
use std::sync::Arc;

use crate::params::Params;

use super::{SlippageBase, SlippageContext, SlippageModel, SlippageRequest};

/// Name used when none is given.
pub const DEFAULT_CUSTOM_NAME: &str = "crtSL";

/// Compute function of a custom model: returns the real fill price.
pub type ComputeFn = Arc<dyn Fn(&SlippageContext<'_>, &SlippageRequest) -> f64 + Send + Sync>;

/// Slippage model whose compute behaviour is a closure.
///
/// Cloning rebuilds the model from its name and construction-time parameters.
/// The compute function is shared with the clone; bound bars and parameters
/// set after construction are not carried over.
pub struct CustomSlippage {
    base: SlippageBase,
    init_params: Params,
    compute_fn: ComputeFn,
}

impl CustomSlippage {
    /// Build a model from a shared compute function.
    ///
    /// Every entry of `params` goes through `set_param`. The store starts
    /// empty and a custom model has no range checks, so every entry is
    /// accepted. Bad values surface when the compute function reads them.
    pub fn new(compute_fn: ComputeFn, params: Params, name: impl Into<String>) -> Self {
        let mut model = Self {
            base: SlippageBase::new(name),
            init_params: Params::new(),
            compute_fn,
        };
        for (key, value) in &params {
            if let Err(e) = model.set_param(key, value.clone()) {
                log::warn!("{}: skipped construction param {key}: {e}", model.name());
            }
        }
        log::debug!(
            "built custom slippage model {} with {} params",
            model.name(),
            params.len()
        );
        model.init_params = params;
        model
    }

    /// Shorthand with no parameters and the default name.
    pub fn from_fn<F>(compute_fn: F) -> Self
    where
        F: Fn(&SlippageContext<'_>, &SlippageRequest) -> f64 + Send + Sync + 'static,
    {
        create_slippage_model(compute_fn, Params::new(), DEFAULT_CUSTOM_NAME)
    }

    /// Parameters the model was constructed with.
    pub fn initial_params(&self) -> &Params {
        &self.init_params
    }
}

/// Create a slippage model whose `compute` delegates to `compute_fn`.
///
/// Each call yields an independent model; models from different calls share
/// no state.
pub fn create_slippage_model<F>(compute_fn: F, params: Params, name: &str) -> CustomSlippage
where
    F: Fn(&SlippageContext<'_>, &SlippageRequest) -> f64 + Send + Sync + 'static,
{
    CustomSlippage::new(Arc::new(compute_fn), params, name)
}

impl Clone for CustomSlippage {
    fn clone(&self) -> Self {
        Self::new(
            Arc::clone(&self.compute_fn),
            self.init_params.clone(),
            self.base.name(),
        )
    }
}

impl fmt::Debug for CustomSlippage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSlippage")
            .field("name", &self.base.name())
            .field("params", self.base.params())
            .finish_non_exhaustive()
    }
}

impl SlippageModel for CustomSlippage {
    fn base(&self) -> &SlippageBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SlippageBase {
        &mut self.base
    }

    fn compute(&self, request: &SlippageRequest) -> f64 {
        (self.compute_fn)(&self.base.context(), request)
    }

    fn clone_model(&self) -> Box<dyn SlippageModel> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bar, Side};
    use crate::params::ParamValue;
    use chrono::{NaiveDate, NaiveDateTime};

    fn dt() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    /// Half-tick model reading its tick from params.
    fn half_tick(ctx: &SlippageContext<'_>, req: &SlippageRequest) -> f64 {
        let tick = ctx.params.get::<f64>("tick").unwrap_or(0.0);
        req.price + req.side.adverse_sign() * tick / 2.0
    }

    #[test]
    fn from_fn_uses_default_name() {
        let model = CustomSlippage::from_fn(|_, req| req.price);
        assert_eq!(model.name(), "crtSL");
        assert!(model.params().is_empty());
    }

    #[test]
    fn compute_reads_params() {
        let params: Params = [("tick", 0.02)].into_iter().collect();
        let model = create_slippage_model(half_tick, params, "half_tick");
        let buy = model.compute(&SlippageRequest::buy(dt(), 10.0));
        let sell = model.compute(&SlippageRequest::sell(dt(), 10.0));
        assert!((buy - 10.01).abs() < 1e-12);
        assert!((sell - 9.99).abs() < 1e-12);
    }

    #[test]
    fn params_set_later_are_visible_to_compute() {
        let mut model = create_slippage_model(half_tick, Params::new(), "half_tick");
        assert_eq!(model.compute(&SlippageRequest::buy(dt(), 10.0)), 10.0);
        model.set_param("tick", ParamValue::Float(1.0)).unwrap();
        assert_eq!(model.compute(&SlippageRequest::buy(dt(), 10.0)), 10.5);
    }

    #[test]
    fn clone_uses_construction_params() {
        let params: Params = [("tick", 0.02)].into_iter().collect();
        let mut model = create_slippage_model(half_tick, params.clone(), "half_tick");
        model.set_param("tick", ParamValue::Float(1.0)).unwrap();

        let copy = model.clone();
        assert_eq!(copy.name(), "half_tick");
        assert_eq!(copy.params(), &params);
        assert_eq!(copy.initial_params(), &params);
    }

    #[test]
    fn compute_sees_bound_bars() {
        let mut model = CustomSlippage::from_fn(|ctx, req| match ctx.bar_at(req.datetime) {
            Some(bar) => req.price + req.side.adverse_sign() * bar.range() * 0.1,
            None => req.price,
        });
        let bar = Bar {
            symbol: "SPY".into(),
            datetime: dt(),
            open: 100.0,
            high: 102.0,
            low: 98.0,
            close: 101.0,
            volume: 1_000.0,
        };
        model.set_bars(Arc::from(vec![bar]));
        let price = model.compute(&SlippageRequest::new(Side::Sell, dt(), 100.0));
        assert!((price - 99.6).abs() < 1e-12);

        // bars are not carried into clones
        let copy = model.clone();
        assert_eq!(copy.compute(&SlippageRequest::new(Side::Sell, dt(), 100.0)), 100.0);
    }

    #[test]
    fn construction_applies_every_param() {
        let params: Params = [
            ("tick", ParamValue::Float(0.01)),
            ("lots", ParamValue::Int(2)),
            ("mode", ParamValue::Str("close".into())),
        ]
        .into_iter()
        .collect();
        let model = create_slippage_model(half_tick, params.clone(), "mixed");
        assert_eq!(model.params(), &params);
        assert_eq!(model.initial_params(), &params);

        // applied through the store, so kinds are now fixed
        let mut model = model;
        assert!(matches!(
            model.set_param("lots", ParamValue::Bool(true)),
            Err(crate::params::ParamError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn debug_shows_name_and_params() {
        let model = CustomSlippage::from_fn(|_, req| req.price);
        let s = format!("{model:?}");
        assert!(s.contains("crtSL"));
    }
}
