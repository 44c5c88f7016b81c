//! Overclock calculator
//!
//! Derives the duration, power draw and overclock count of a recipe running
//! in a machine. Each overclock multiplies power by `step_power_multiplier`
//! and divides duration by `step_duration_divisor`; heat overclocks divide by
//! `heat_step_duration_divisor` instead.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::models::OverclockResult;
use crate::voltage::VoltageTier;

/// Heat surplus (K) per heat discount step.
pub const HEAT_DISCOUNT_THRESHOLD: u32 = 900;
/// Heat surplus (K) per perfect overclock.
pub const HEAT_PERFECT_OVERCLOCK_THRESHOLD: u32 = 1800;

/// Continuous tier scale used for every tier comparison.
///
/// `1 + max(0, log2(power) - 5) / 2`. Only called with positive values;
/// configs are validated before any calculation reaches this.
pub fn power_scale(power: f64) -> f64 {
    1.0 + (power.log2() - 5.0).max(0.0) / 2.0
}

/// Calculator parameters for one recipe in one machine.
#[derive(Debug, Clone, PartialEq)]
pub struct OverclockConfig {
    pub recipe_power: u64,
    pub duration: u64,
    pub recipe_amperage: u64,
    pub recipe_heat: u32,

    pub machine_voltage: u64,
    pub machine_amperage: u64,
    pub machine_heat: u32,

    pub parallel: u64,
    pub speed_boost: f64,
    pub power_discount: f64,
    pub step_power_multiplier: u32,
    pub step_duration_divisor: u32,
    pub heat_step_duration_divisor: u32,

    pub skip_overclock: bool,
    pub amperage_overclock: bool,
    pub laser_overclock: bool,
    pub laser_penalty: f64,
    pub heat_overclock: bool,
    pub heat_discount: bool,
    pub heat_discount_base: f64,
    pub max_overclocks: Option<u32>,
    pub one_tick_discount: bool,
}

impl OverclockConfig {
    pub fn new(recipe_power: u64, duration: u64, machine_voltage: u64) -> Self {
        OverclockConfig {
            recipe_power,
            duration,
            recipe_amperage: 1,
            recipe_heat: 0,
            machine_voltage,
            machine_amperage: 1,
            machine_heat: 0,
            parallel: 1,
            speed_boost: 1.0,
            power_discount: 1.0,
            step_power_multiplier: 4,
            step_duration_divisor: 2,
            heat_step_duration_divisor: 4,
            skip_overclock: false,
            amperage_overclock: false,
            laser_overclock: false,
            laser_penalty: 0.3,
            heat_overclock: false,
            heat_discount: false,
            heat_discount_base: 0.95,
            max_overclocks: None,
            one_tick_discount: false,
        }
    }

    pub fn with_recipe_amperage(mut self, amperage: u64) -> Self {
        self.recipe_amperage = amperage;
        self
    }

    pub fn with_machine_amperage(mut self, amperage: u64) -> Self {
        self.machine_amperage = amperage;
        self
    }

    pub fn with_parallel(mut self, parallel: u64) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_speed_boost(mut self, speed_boost: f64) -> Self {
        self.speed_boost = speed_boost;
        self
    }

    pub fn with_power_discount(mut self, discount: f64) -> Self {
        self.power_discount = discount;
        self
    }

    pub fn with_step_power_multiplier(mut self, multiplier: u32) -> Self {
        self.step_power_multiplier = multiplier;
        self
    }

    pub fn with_step_duration_divisor(mut self, divisor: u32) -> Self {
        self.step_duration_divisor = divisor;
        self
    }

    pub fn with_heat_step_duration_divisor(mut self, divisor: u32) -> Self {
        self.heat_step_duration_divisor = divisor;
        self
    }

    /// Every overclock divides duration by 4 instead of 2.
    pub fn perfect_overclock(self) -> Self {
        self.with_step_duration_divisor(4)
    }

    pub fn skip_overclock(mut self) -> Self {
        self.skip_overclock = true;
        self
    }

    pub fn amperage_overclock(mut self) -> Self {
        self.amperage_overclock = true;
        self
    }

    pub fn laser_overclock(mut self, penalty: f64) -> Self {
        self.laser_overclock = true;
        self.laser_penalty = penalty;
        self
    }

    /// Enable heat overclocks and the heat discount for a coil machine.
    pub fn with_heat(mut self, recipe_heat: u32, machine_heat: u32) -> Self {
        self.recipe_heat = recipe_heat;
        self.machine_heat = machine_heat;
        self.heat_overclock = true;
        self.heat_discount = true;
        self
    }

    pub fn with_heat_overclock(mut self, enabled: bool) -> Self {
        self.heat_overclock = enabled;
        self
    }

    pub fn with_heat_discount(mut self, enabled: bool) -> Self {
        self.heat_discount = enabled;
        self
    }

    pub fn with_heat_discount_base(mut self, base: f64) -> Self {
        self.heat_discount_base = base;
        self
    }

    pub fn with_max_overclocks(mut self, limit: u32) -> Self {
        self.max_overclocks = Some(limit);
        self
    }

    pub fn one_tick_discount(mut self) -> Self {
        self.one_tick_discount = true;
        self
    }

    /// Check parameters before any calculation runs.
    pub fn validate(&self) -> Result<()> {
        if self.laser_overclock && self.amperage_overclock {
            return Err(Error::invalid(
                "laser and amperage overclocking cannot both be enabled",
            ));
        }
        if self.step_duration_divisor == 0 {
            return Err(Error::invalid("duration decrease per overclock must be positive"));
        }
        if self.heat_step_duration_divisor == 0 {
            return Err(Error::invalid("duration decrease per heat overclock must be positive"));
        }
        if self.step_power_multiplier == 0 {
            return Err(Error::invalid("power increase per overclock must be positive"));
        }
        if self.recipe_power == 0 {
            return Err(Error::invalid("recipe power must be positive"));
        }
        if self.duration == 0 {
            return Err(Error::invalid("recipe duration must be at least one tick"));
        }
        if self.recipe_amperage == 0 {
            return Err(Error::invalid("recipe amperage must be positive"));
        }
        if self.machine_voltage == 0 {
            return Err(Error::invalid("machine voltage must be positive"));
        }
        if self.machine_amperage == 0 {
            return Err(Error::invalid("machine amperage must be positive"));
        }
        if self.parallel == 0 {
            return Err(Error::invalid("parallel must be at least one"));
        }
        if !self.speed_boost.is_finite() || self.speed_boost <= 0.0 {
            return Err(Error::invalid(format!(
                "speed boost must be finite and positive, got {}",
                self.speed_boost
            )));
        }
        if !in_unit_interval(self.power_discount) {
            return Err(Error::invalid(format!(
                "power discount must be in (0, 1], got {}",
                self.power_discount
            )));
        }
        if !in_unit_interval(self.heat_discount_base) {
            return Err(Error::invalid(format!(
                "heat discount base must be in (0, 1], got {}",
                self.heat_discount_base
            )));
        }
        if self.laser_overclock && (!self.laser_penalty.is_finite() || self.laser_penalty <= 0.0) {
            return Err(Error::invalid(format!(
                "laser overclock penalty must be finite and positive, got {}",
                self.laser_penalty
            )));
        }
        Ok(())
    }
}

fn in_unit_interval(value: f64) -> bool {
    value > 0.0 && value <= 1.0
}

/// A validated configuration, ready to calculate.
#[derive(Debug, Clone)]
pub struct OverclockCalculator {
    config: OverclockConfig,
}

impl OverclockCalculator {
    pub fn new(config: OverclockConfig) -> Result<Self> {
        config.validate()?;
        Ok(OverclockCalculator { config })
    }

    pub fn config(&self) -> &OverclockConfig {
        &self.config
    }

    pub fn calculate(&self) -> OverclockResult {
        let cfg = &self.config;
        let duration = (cfg.duration as f64 * cfg.speed_boost).ceil() as u64;

        if cfg.skip_overclock {
            let power = self.final_power(cfg.recipe_power as f64, self.heat_discount_multiplier());
            return OverclockResult {
                duration: duration.max(1),
                power,
                overclocks: 0,
            };
        }

        let heat_discount = self.heat_discount_multiplier();
        let recipe_tier = self.recipe_power_tier(heat_discount);
        let machine_tier = self.machine_power_tier();

        let heat_overclocks = if cfg.heat_overclock {
            self.heat_overclocks(machine_tier, recipe_tier)
        } else {
            0
        };

        let mut overclocks = self.needed_overclocks(machine_tier, recipe_tier);
        if !cfg.amperage_overclock {
            overclocks = overclocks.min(self.voltage_tier_gap());
        }
        overclocks = overclocks.max(0);
        if let Some(limit) = cfg.max_overclocks {
            overclocks = overclocks.min(i64::from(limit));
        }
        let heat_overclocks = heat_overclocks.min(overclocks).max(0);

        debug!(
            machine_tier,
            recipe_tier,
            overclocks,
            heat_overclocks,
            heat_discount,
            "overclock steps resolved"
        );

        let multiplier = f64::from(cfg.step_power_multiplier);
        let divisor = f64::from(cfg.step_duration_divisor);
        let heat_divisor = f64::from(cfg.heat_step_duration_divisor);

        let mut power =
            (cfg.recipe_power as f64 * multiplier.powf(overclocks as f64)).floor() as u64;
        let mut duration =
            (duration as f64 / divisor.powf((overclocks - heat_overclocks) as f64)).floor() as u64;
        duration = (duration as f64 / heat_divisor.powf(heat_overclocks as f64)).floor() as u64;

        if cfg.one_tick_discount {
            // Leftover tier headroom past the last overclock lowers power instead.
            let unused = ((machine_tier - recipe_tier - overclocks as f64) as i64).max(0);
            power = ((power as f64 / divisor.powf(unused as f64)).floor() as u64).max(1);
        }

        if cfg.laser_overclock {
            (duration, power) = self.laser_overclock(duration, power);
        }

        OverclockResult {
            duration: duration.max(1),
            power: self.final_power(power as f64, heat_discount),
            overclocks: overclocks as u32,
        }
    }

    /// Duration in fractional ticks when the one-tick floor is ignored.
    ///
    /// Used by parallel sizing to convert speed beyond one tick into
    /// extra parallels.
    pub fn duration_under_sub_tick(&self) -> f64 {
        let cfg = &self.config;
        if cfg.skip_overclock {
            return cfg.duration as f64;
        }
        let machine_tier = self.machine_power_tier();
        let recipe_tier = self.recipe_power_tier(self.heat_discount_multiplier());

        let mut normal = overclocks_between(machine_tier, recipe_tier);
        if let Some(limit) = cfg.max_overclocks {
            normal = normal.min(i64::from(limit));
        }
        let heat = if cfg.heat_overclock {
            self.heat_overclocks(machine_tier, recipe_tier).min(normal)
        } else {
            0
        };

        let divisor = f64::from(cfg.step_duration_divisor);
        let heat_divisor = f64::from(cfg.heat_step_duration_divisor);
        (cfg.duration as f64 * cfg.speed_boost)
            / (divisor.powf((normal - heat) as f64) * heat_divisor.powf(heat as f64))
    }

    /// Power draw for `current_parallel` parallels when sub-tick speed let
    /// the machine exceed `original_max_parallel`.
    ///
    /// The extra parallels are paid for by overclocks the recipe no longer
    /// spends on speed. Normal and heat steps cancel out of the split, so the
    /// draw is the full overclock power at `original_max_parallel`.
    pub fn power_draw_under_sub_tick(
        &self,
        original_max_parallel: u64,
        current_parallel: u64,
    ) -> u64 {
        let cfg = &self.config;
        if cfg.skip_overclock {
            return cfg.recipe_power;
        }
        let original_max_parallel = original_max_parallel.max(1);
        let heat_discount = self.heat_discount_multiplier();
        let machine_tier = self.machine_power_tier();
        let recipe_tier = self.recipe_power_tier(heat_discount);

        let mut total = overclocks_between(machine_tier, recipe_tier);
        if cfg.recipe_power <= VoltageTier::Ulv.voltage() {
            total = total.min(self.voltage_tier_gap());
        }
        if let Some(limit) = cfg.max_overclocks {
            total = total.min(i64::from(limit));
        }

        trace!(original_max_parallel, current_parallel, total, "sub-tick power draw");

        (cfg.recipe_power as f64
            * f64::from(cfg.step_power_multiplier).powf(total as f64)
            * original_max_parallel as f64
            * cfg.power_discount
            * cfg.recipe_amperage as f64
            * heat_discount)
            .ceil() as u64
    }

    fn heat_surplus(&self) -> u32 {
        self.config.machine_heat.saturating_sub(self.config.recipe_heat)
    }

    fn heat_discount_multiplier(&self) -> f64 {
        if !self.config.heat_discount {
            return 1.0;
        }
        let steps = self.heat_surplus() / HEAT_DISCOUNT_THRESHOLD;
        self.config.heat_discount_base.powf(f64::from(steps))
    }

    fn heat_overclocks(&self, machine_tier: f64, recipe_tier: f64) -> i64 {
        let by_heat = i64::from(self.heat_surplus() / HEAT_PERFECT_OVERCLOCK_THRESHOLD);
        by_heat.min(overclocks_between(machine_tier, recipe_tier))
    }

    fn needed_overclocks(&self, machine_tier: f64, recipe_tier: f64) -> i64 {
        let divisor = f64::from(self.config.step_duration_divisor);
        let to_one_tick = log_base(self.config.duration as f64, divisor).ceil() as i64;
        overclocks_between(machine_tier, recipe_tier).min(to_one_tick)
    }

    fn machine_power_tier(&self) -> f64 {
        let cfg = &self.config;
        let amperage = if cfg.amperage_overclock {
            cfg.machine_amperage
        } else {
            cfg.machine_amperage.min(cfg.parallel)
        };
        power_scale(cfg.machine_voltage.saturating_mul(amperage) as f64)
    }

    fn recipe_power_tier(&self, heat_discount: f64) -> f64 {
        let cfg = &self.config;
        power_scale(
            cfg.recipe_power as f64
                * cfg.parallel as f64
                * cfg.power_discount
                * heat_discount
                * cfg.recipe_amperage as f64,
        )
    }

    /// Whole-tier gap between machine voltage and recipe power.
    fn voltage_tier_gap(&self) -> i64 {
        power_scale(self.config.machine_voltage as f64).ceil() as i64
            - power_scale(self.config.recipe_power as f64).ceil() as i64
    }

    fn laser_overclock(&self, mut duration: u64, mut power: u64) -> (u64, u64) {
        let cfg = &self.config;
        let available = cfg.machine_voltage.saturating_mul(cfg.machine_amperage) as f64;
        let divisor = u64::from(cfg.step_duration_divisor);
        let mut penalty = f64::from(cfg.step_power_multiplier) + cfg.laser_penalty;

        // penalty grows every pass and duration shrinks toward one tick
        while available > power as f64 * penalty && power as f64 * penalty > 0.0 && duration > 1 {
            duration /= divisor;
            power = (power as f64 * penalty) as u64;
            penalty += cfg.laser_penalty;
        }
        debug!(duration, power, penalty, "laser overclock finished");
        (duration, power)
    }

    fn final_power(&self, power: f64, heat_discount: f64) -> u64 {
        let cfg = &self.config;
        (power
            * cfg.power_discount
            * heat_discount
            * cfg.parallel as f64
            * cfg.recipe_amperage as f64)
            .ceil() as u64
    }
}

fn overclocks_between(machine_tier: f64, recipe_tier: f64) -> i64 {
    (machine_tier - recipe_tier) as i64
}

// log2 keeps powers of two exact for the usual 2 and 4 step bases
fn log_base(value: f64, base: f64) -> f64 {
    value.log2() / base.log2()
}
