//! Factory system — converts `SlippageConfig` into runtime trait objects.
//!
//! Built-in kinds (`fixed_percent`, `fixed_value`) are always available.
//! Custom kinds resolve through compute functions registered on a
//! `SlippageRegistry`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::SlippageConfig;
use crate::params::ParamError;
use crate::slippage::{
    ComputeFn, CustomSlippage, FixedPercent, FixedValue, SlippageContext, SlippageModel,
    SlippageRequest,
};

/// Kinds every registry resolves without registration.
pub const BUILTIN_KINDS: &[&str] = &["fixed_percent", "fixed_value"];

// ─── Error type ──────────────────────────────────────────────────────

/// Errors that can occur during model construction.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("Unknown slippage model type: {0}")]
    UnknownModel(String),
    #[error("Slippage model type {0} is built in and cannot be registered")]
    ReservedKind(String),
    #[error("Invalid parameter for {model}: {source}")]
    Param {
        model: String,
        #[source]
        source: ParamError,
    },
}

// ─── Built-ins ───────────────────────────────────────────────────────

/// Create a built-in model, applying every configured parameter through
/// `set_param` so range checks run.
pub fn create_builtin(config: &SlippageConfig) -> Result<Box<dyn SlippageModel>, FactoryError> {
    let mut model: Box<dyn SlippageModel> = match config.model_type.as_str() {
        "fixed_percent" => match &config.name {
            Some(name) => Box::new(FixedPercent::named(name.as_str())),
            None => Box::new(FixedPercent::default()),
        },
        "fixed_value" => match &config.name {
            Some(name) => Box::new(FixedValue::named(name.as_str())),
            None => Box::new(FixedValue::default()),
        },
        other => return Err(FactoryError::UnknownModel(other.to_string())),
    };
    for (key, value) in &config.params {
        model
            .set_param(key, value.clone())
            .map_err(|source| FactoryError::Param {
                model: model.name().to_string(),
                source,
            })?;
    }
    Ok(model)
}

// ─── Registry ────────────────────────────────────────────────────────

/// Maps custom model kinds to compute functions.
#[derive(Clone, Default)]
pub struct SlippageRegistry {
    custom: HashMap<String, ComputeFn>,
}

impl SlippageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compute function under `kind`, replacing any previous one.
    pub fn register<F>(&mut self, kind: &str, compute_fn: F) -> Result<(), FactoryError>
    where
        F: Fn(&SlippageContext<'_>, &SlippageRequest) -> f64 + Send + Sync + 'static,
    {
        if BUILTIN_KINDS.contains(&kind) {
            return Err(FactoryError::ReservedKind(kind.to_string()));
        }
        if self
            .custom
            .insert(kind.to_string(), Arc::new(compute_fn))
            .is_some()
        {
            log::debug!("replaced compute function for {kind}");
        }
        Ok(())
    }

    pub fn contains(&self, kind: &str) -> bool {
        BUILTIN_KINDS.contains(&kind) || self.custom.contains_key(kind)
    }

    /// All resolvable kinds, sorted.
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = BUILTIN_KINDS
            .iter()
            .map(|k| k.to_string())
            .chain(self.custom.keys().cloned())
            .collect();
        kinds.sort();
        kinds
    }

    /// Build a model from its config.
    ///
    /// Custom models are named after their kind unless the config names them.
    pub fn build(&self, config: &SlippageConfig) -> Result<Box<dyn SlippageModel>, FactoryError> {
        let kind = config.model_type.as_str();
        let model: Box<dyn SlippageModel> = if BUILTIN_KINDS.contains(&kind) {
            create_builtin(config)?
        } else {
            let compute_fn = self
                .custom
                .get(kind)
                .ok_or_else(|| FactoryError::UnknownModel(kind.to_string()))?;
            let name = config.name.as_deref().unwrap_or(kind);
            Box::new(CustomSlippage::new(
                Arc::clone(compute_fn),
                config.params.clone(),
                name,
            ))
        };
        log::debug!("built slippage model {} ({kind})", model.name());
        Ok(model)
    }

    /// Build every config, stopping at the first failure.
    pub fn build_all(
        &self,
        configs: &[SlippageConfig],
    ) -> Result<Vec<Box<dyn SlippageModel>>, FactoryError> {
        configs.iter().map(|c| self.build(c)).collect()
    }
}

impl std::fmt::Debug for SlippageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlippageRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
