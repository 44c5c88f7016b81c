//! GregTech: New Horizons overclock and parallel calculator
//!
//! Computes how a recipe's power draw and duration change when a machine
//! overclocks it, and how many parallels the machine can run at once.
//!
//! ```
//! use gtnh_overclock::{OverclockCalculator, OverclockConfig, VoltageTier};
//!
//! let config = OverclockConfig::new(5, 80, VoltageTier::Hv.voltage());
//! let result = OverclockCalculator::new(config)?.calculate();
//! assert_eq!((result.power, result.duration, result.overclocks), (80, 20, 2));
//! # Ok::<(), gtnh_overclock::Error>(())
//! ```

pub mod error;
pub mod models;
pub mod overclock;
pub mod parallel;
pub mod voltage;

pub use error::{Error, Result};
pub use models::{Ingredient, OverclockResult, ParallelResult};
pub use overclock::{OverclockCalculator, OverclockConfig, power_scale};
pub use parallel::{Inventory, ParallelConfig, ParallelHelper, max_parallel_by_inputs};
pub use voltage::VoltageTier;
