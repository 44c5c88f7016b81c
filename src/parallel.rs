//! Parallel sizing
//!
//! Finds how many recipe instances one machine can run at once, then drives
//! the overclock calculator at that count.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Ingredient, ParallelResult};
use crate::overclock::{OverclockCalculator, OverclockConfig};

/// Batch mode packs cycles together until they fill this many ticks.
pub const MAX_BATCH_MODE_TICK_TIME: u64 = 128;

/// Answers how much of an ingredient is on hand.
///
/// `None` means the ingredient is absent, which is not the same as a stock
/// of zero.
pub trait Inventory: fmt::Debug {
    fn quantity(&self, ingredient: &str) -> Option<f64>;
}

impl Inventory for HashMap<String, f64> {
    fn quantity(&self, ingredient: &str) -> Option<f64> {
        self.get(ingredient).copied()
    }
}

impl Inventory for BTreeMap<String, f64> {
    fn quantity(&self, ingredient: &str) -> Option<f64> {
        self.get(ingredient).copied()
    }
}

/// Largest number of recipe instances the inventory can feed.
///
/// Returns `None` when no input constrains the count.
pub fn max_parallel_by_inputs<I: Inventory + ?Sized>(
    inventory: &I,
    inputs: &[Ingredient],
) -> Option<u64> {
    let mut limit: Option<f64> = None;
    for input in inputs.iter().filter(|i| i.quantity > 0.0) {
        let ratio = match inventory.quantity(&input.name) {
            Some(available) => available.max(0.0) / input.quantity,
            None => return Some(0),
        };
        limit = Some(limit.map_or(ratio, |l| l.min(ratio)));
    }
    limit.map(|l| l.floor() as u64)
}

/// Parallel helper parameters.
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    pub calculator: OverclockConfig,
    pub power_modifier: f64,
    pub max_parallel: u64,
    pub batch_modifier: u64,
    pub inventory: Option<Arc<dyn Inventory + Send + Sync>>,
    pub inputs: Vec<Ingredient>,
}

impl ParallelConfig {
    pub fn new(calculator: OverclockConfig) -> Self {
        ParallelConfig {
            calculator,
            power_modifier: 1.0,
            max_parallel: 1,
            batch_modifier: 1,
            inventory: None,
            inputs: Vec::new(),
        }
    }

    pub fn with_power_modifier(mut self, modifier: f64) -> Self {
        self.power_modifier = modifier;
        self
    }

    pub fn with_max_parallel(mut self, max_parallel: u64) -> Self {
        self.max_parallel = max_parallel;
        self
    }

    /// A modifier above 1 turns batch mode on.
    pub fn with_batch_mode(mut self, batch_modifier: u64) -> Self {
        self.batch_modifier = batch_modifier;
        self
    }

    pub fn with_inputs<I>(mut self, inventory: I, inputs: Vec<Ingredient>) -> Self
    where
        I: Inventory + Send + Sync + 'static,
    {
        self.inventory = Some(Arc::new(inventory));
        self.inputs = inputs;
        self
    }

    pub fn batch_mode(&self) -> bool {
        self.batch_modifier > 1
    }

    /// Recipe power after the machine's power modifier.
    pub fn actual_recipe_power(&self) -> u64 {
        (self.calculator.recipe_power as f64 * self.power_modifier).ceil() as u64
    }

    pub fn available_power(&self) -> u64 {
        self.calculator
            .machine_voltage
            .saturating_mul(self.calculator.machine_amperage)
    }

    pub fn validate(&self) -> Result<()> {
        self.calculator.validate()?;
        if !self.power_modifier.is_finite() || self.power_modifier <= 0.0 {
            return Err(Error::invalid(format!(
                "power modifier must be finite and positive, got {}",
                self.power_modifier
            )));
        }
        let required = self.actual_recipe_power();
        let available = self.available_power();
        if required > available {
            return Err(Error::InsufficientPower { required, available });
        }
        Ok(())
    }
}

/// A validated parallel configuration.
#[derive(Debug, Clone)]
pub struct ParallelHelper {
    config: ParallelConfig,
}

impl ParallelHelper {
    pub fn new(config: ParallelConfig) -> Result<Self> {
        config.validate()?;
        Ok(ParallelHelper { config })
    }

    pub fn config(&self) -> &ParallelConfig {
        &self.config
    }

    pub fn build(&self) -> Result<ParallelResult> {
        let cfg = &self.config;
        let base = &cfg.calculator;
        let idle_duration = (base.duration as f64 * base.speed_boost).ceil() as u64;
        let requested = cfg.max_parallel;
        if requested == 0 {
            return Ok(ParallelResult::idle(idle_duration));
        }

        let at_requested = OverclockCalculator::new(base.clone().with_parallel(requested))?;
        let mut max_parallel = requested;
        let sub_tick_duration = at_requested.duration_under_sub_tick();
        if sub_tick_duration < 1.0 {
            max_parallel = (requested as f64 / sub_tick_duration) as u64;
        }

        let before_batch = max_parallel;
        if cfg.batch_mode() {
            max_parallel = max_parallel.saturating_mul(cfg.batch_modifier);
        }

        let required = cfg.actual_recipe_power();
        let mut current = before_batch;
        if required > 0 {
            current = current.min(cfg.available_power() / required);
        }
        if let Some(inventory) = &cfg.inventory {
            if let Some(by_inputs) = max_parallel_by_inputs(inventory.as_ref(), &cfg.inputs) {
                current = current.min(by_inputs);
            }
        }

        debug!(requested, sub_tick_duration, max_parallel, current, "parallel limits resolved");

        if current == 0 {
            return Ok(ParallelResult::idle(idle_duration));
        }

        let calculator =
            OverclockCalculator::new(base.clone().with_parallel(current.min(requested)))?;
        let result = calculator.calculate();
        let power = if current > requested {
            at_requested.power_draw_under_sub_tick(requested, current)
        } else {
            result.power
        };

        let mut duration_multiplier = 1.0;
        if cfg.batch_mode() && result.duration < MAX_BATCH_MODE_TICK_TIME {
            let batch_ceiling = MAX_BATCH_MODE_TICK_TIME / result.duration;
            let extra = current
                .saturating_mul((batch_ceiling - 1).min(cfg.batch_modifier - 1))
                .min(max_parallel - current);
            duration_multiplier = 1.0 + extra as f64 / current as f64;
            current += extra;
            debug!(extra, duration_multiplier, "batch mode packed extra parallels");
        }

        Ok(ParallelResult {
            parallel: current,
            power,
            duration_multiplier,
            calculator: result,
        })
    }
}
