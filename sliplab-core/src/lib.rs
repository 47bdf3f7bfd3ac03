//! SlipLab Core — pluggable slippage models for backtest fill simulation.
//!
//! This crate contains:
//! - Domain types (bars, trade side)
//! - Named, typed model parameters
//! - The `SlippageModel` contract and its shared `SlippageBase` state
//! - Built-in fixed-percent and fixed-value models
//! - Closure-backed custom models (`create_slippage_model`)
//! - Config files, fingerprints and a factory/registry for building models
//! - Fill helpers: slippage cost and adverse tick rounding

pub mod config;
pub mod domain;
pub mod factory;
pub mod fill;
pub mod params;
pub mod slippage;

pub use config::{load_config, ConfigError, SlippageConfig, SlippageFile};
pub use domain::{Bar, Side};
pub use factory::{create_builtin, FactoryError, SlippageRegistry, BUILTIN_KINDS};
pub use fill::{apply_slippage, apply_slippage_with_tick, round_to_tick, SlippedFill};
pub use params::{FromParam, ParamError, ParamKind, ParamValue, Params};
pub use slippage::{
    create_slippage_model, ComputeFn, CustomSlippage, FixedPercent, FixedValue, SlippageBase,
    SlippageContext, SlippageModel, SlippageRequest, DEFAULT_CUSTOM_NAME,
};
