//! Result records and recipe ingredients

use std::fmt;

use serde::Serialize;

/// Outcome of a single overclock calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverclockResult {
    pub duration: u64, // ticks, always >= 1
    pub power: u64,    // EU/t
    pub overclocks: u32,
}

impl OverclockResult {
    /// A machine that runs nothing: no power, no overclocks.
    pub(crate) fn idle(duration: u64) -> Self {
        OverclockResult {
            duration: duration.max(1),
            power: 0,
            overclocks: 0,
        }
    }
}

/// Outcome of parallel sizing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParallelResult {
    pub parallel: u64,
    pub power: u64,
    pub duration_multiplier: f64,
    pub calculator: OverclockResult,
}

impl ParallelResult {
    pub(crate) fn idle(duration: u64) -> Self {
        ParallelResult {
            parallel: 0,
            power: 0,
            duration_multiplier: 1.0,
            calculator: OverclockResult::idle(duration),
        }
    }

    /// Ticks the batched operation actually takes.
    pub fn effective_duration(&self) -> u64 {
        (self.calculator.duration as f64 * self.duration_multiplier) as u64
    }
}

/// A recipe input and the quantity one recipe instance consumes
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: f64) -> Self {
        Ingredient {
            name: name.into(),
            quantity,
        }
    }
}

impl fmt::Display for OverclockResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Overclock Result ===")?;
        writeln!(f, "  Duration:   {} ticks ({:.2}s)", self.duration, self.duration as f64 / 20.0)?;
        writeln!(f, "  Power:      {} EU/t", self.power)?;
        writeln!(f, "  Overclocks: {}", self.overclocks)?;
        Ok(())
    }
}

impl fmt::Display for ParallelResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Parallel Result ===")?;
        writeln!(f, "  Parallel:            {}", self.parallel)?;
        writeln!(f, "  Power:               {} EU/t", self.power)?;
        writeln!(f, "  Duration multiplier: {:.3}", self.duration_multiplier)?;
        writeln!(f, "  Effective duration:  {} ticks", self.effective_duration())?;
        writeln!(f)?;
        write!(f, "{}", self.calculator)
    }
}
