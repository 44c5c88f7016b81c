//! GTNH Overclock Calculator
//!
//! Command-line front end for the overclock and parallel calculators.

use std::collections::BTreeMap;
use std::fmt::Display;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gtnh_overclock::{
    Ingredient, OverclockCalculator, OverclockConfig, ParallelConfig, ParallelHelper, VoltageTier,
};

#[derive(Parser)]
#[command(name = "gtnh-overclock")]
#[command(about = "Overclock and parallel calculator for GregTech: New Horizons")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the voltage tiers
    Tiers,

    /// Overclock a single recipe
    Overclock {
        #[command(flatten)]
        recipe: RecipeArgs,

        #[command(flatten)]
        machine: MachineArgs,

        /// Parallels already applied to the recipe
        #[arg(long, default_value_t = 1)]
        parallel: u64,
    },

    /// Work out parallels for a recipe, then overclock it
    Parallel {
        #[command(flatten)]
        recipe: RecipeArgs,

        #[command(flatten)]
        machine: MachineArgs,

        /// Most parallels the machine offers
        #[arg(long, default_value_t = 1)]
        max_parallel: u64,

        /// Multiplier on recipe power when checking the power budget
        #[arg(long, default_value_t = 1.0)]
        eut_modifier: f64,

        /// Batch mode modifier (values above 1 enable batch mode)
        #[arg(long, default_value_t = 1)]
        batch: u64,

        /// Recipe input consumed per parallel, as NAME=QUANTITY
        #[arg(long = "input", value_parser = parse_quantity)]
        inputs: Vec<(String, f64)>,

        /// Available ingredient stock, as NAME=QUANTITY
        #[arg(long = "stock", value_parser = parse_quantity)]
        stock: Vec<(String, f64)>,
    },
}

#[derive(Args)]
struct RecipeArgs {
    /// Recipe power draw in EU/t
    #[arg(long)]
    eut: u64,

    /// Recipe duration in ticks
    #[arg(short, long)]
    duration: u64,

    #[arg(long, default_value_t = 1)]
    recipe_amperage: u64,

    /// Recipe heat requirement in K
    #[arg(long, default_value_t = 0)]
    recipe_heat: u32,
}

#[derive(Args)]
struct MachineArgs {
    /// Machine voltage as a tier name (e.g. "HV") or EU/t
    #[arg(short, long, value_parser = parse_voltage)]
    voltage: u64,

    #[arg(long, default_value_t = 1)]
    amperage: u64,

    /// Coil heat in K; enables heat overclocks and the heat discount
    #[arg(long)]
    machine_heat: Option<u32>,

    /// Speed multiplier on duration (0.5 = twice as fast)
    #[arg(long, default_value_t = 1.0)]
    speed_boost: f64,

    #[arg(long, default_value_t = 1.0)]
    eut_discount: f64,

    /// Every overclock divides duration by 4
    #[arg(long)]
    perfect: bool,

    /// Machine does not overclock
    #[arg(long)]
    no_overclock: bool,

    /// Overclock with all amps instead of one per parallel
    #[arg(long, conflicts_with = "laser")]
    amperage_oc: bool,

    /// Laser overclock, with this penalty added per step
    #[arg(long)]
    laser: Option<f64>,

    #[arg(long)]
    max_overclocks: Option<u32>,

    #[arg(long)]
    one_tick_discount: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Tiers => {
            let tiers: Vec<TierRow> = VoltageTier::ALL.iter().copied().map(TierRow::from).collect();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tiers)?);
            } else {
                println!("{:<6} {:>4} {:>15} {:>15}", "Tier", "#", "Voltage", "Practical");
                println!("{}", "-".repeat(43));
                for t in tiers {
                    println!("{:<6} {:>4} {:>15} {:>15}", t.name, t.tier, t.voltage, t.practical);
                }
            }
        }

        Commands::Overclock {
            recipe,
            machine,
            parallel,
        } => {
            let config = overclock_config(&recipe, &machine).with_parallel(parallel);
            let calculator =
                OverclockCalculator::new(config).context("invalid overclock parameters")?;
            emit(&calculator.calculate(), cli.json)?;
        }

        Commands::Parallel {
            recipe,
            machine,
            max_parallel,
            eut_modifier,
            batch,
            inputs,
            stock,
        } => {
            let mut config = ParallelConfig::new(overclock_config(&recipe, &machine))
                .with_power_modifier(eut_modifier)
                .with_max_parallel(max_parallel)
                .with_batch_mode(batch);

            if !inputs.is_empty() {
                let inputs = inputs
                    .into_iter()
                    .map(|(name, qty)| Ingredient::new(name, qty))
                    .collect();
                let stock: BTreeMap<String, f64> = stock.into_iter().collect();
                config = config.with_inputs(stock, inputs);
            } else if !stock.is_empty() {
                warn!("--stock given without any --input; stock is ignored");
            }

            let helper = ParallelHelper::new(config).context("invalid parallel parameters")?;
            let result = helper.build().context("parallel calculation failed")?;
            emit(&result, cli.json)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn overclock_config(recipe: &RecipeArgs, machine: &MachineArgs) -> OverclockConfig {
    let mut config = OverclockConfig::new(recipe.eut, recipe.duration, machine.voltage)
        .with_recipe_amperage(recipe.recipe_amperage)
        .with_machine_amperage(machine.amperage)
        .with_speed_boost(machine.speed_boost)
        .with_power_discount(machine.eut_discount);

    match machine.machine_heat {
        Some(heat) => config = config.with_heat(recipe.recipe_heat, heat),
        None if recipe.recipe_heat > 0 => {
            warn!("--recipe-heat given without --machine-heat; heat bonuses are off")
        }
        None => {}
    }
    if machine.perfect {
        config = config.perfect_overclock();
    }
    if machine.no_overclock {
        config = config.skip_overclock();
    }
    if machine.amperage_oc {
        config = config.amperage_overclock();
    }
    if let Some(penalty) = machine.laser {
        config = config.laser_overclock(penalty);
    }
    if let Some(limit) = machine.max_overclocks {
        config = config.with_max_overclocks(limit);
    }
    if machine.one_tick_discount {
        config = config.one_tick_discount();
    }
    config
}

fn emit<T: Serialize + Display>(value: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", value);
    }
    Ok(())
}

#[derive(Serialize)]
struct TierRow {
    name: &'static str,
    tier: u32,
    voltage: u64,
    practical: u64,
}

impl From<VoltageTier> for TierRow {
    fn from(tier: VoltageTier) -> Self {
        TierRow {
            name: tier.name(),
            tier: tier.number(),
            voltage: tier.voltage(),
            practical: tier.practical(),
        }
    }
}

fn parse_voltage(s: &str) -> std::result::Result<u64, String> {
    if let Ok(voltage) = s.parse::<u64>() {
        return Ok(voltage);
    }
    s.parse::<VoltageTier>()
        .map(VoltageTier::voltage)
        .map_err(|e| e.to_string())
}

fn parse_quantity(s: &str) -> std::result::Result<(String, f64), String> {
    let (name, qty) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=QUANTITY, got '{}'", s))?;
    let qty = qty
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad quantity for '{}': {}", name, e))?;
    Ok((name.trim().to_string(), qty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voltage_accepts_names_and_numbers() {
        assert_eq!(parse_voltage("HV"), Ok(512));
        assert_eq!(parse_voltage("luv"), Ok(32_768));
        assert_eq!(parse_voltage("1000"), Ok(1000));
        assert!(parse_voltage("warp").is_err());
    }

    #[test]
    fn quantity_pairs() {
        assert_eq!(
            parse_quantity("oxygen gas=1000"),
            Ok(("oxygen gas".to_string(), 1000.0))
        );
        assert!(parse_quantity("oxygen").is_err());
        assert!(parse_quantity("oxygen=lots").is_err());
    }

    #[test]
    fn cli_builds_coil_config() {
        let cli = Cli::try_parse_from([
            "gtnh-overclock",
            "overclock",
            "--eut",
            "120",
            "--duration",
            "500",
            "--recipe-heat",
            "1000",
            "--voltage",
            "ev",
            "--machine-heat",
            "3601",
        ])
        .unwrap();
        let Commands::Overclock { recipe, machine, .. } = cli.command else {
            panic!("expected overclock command");
        };
        let config = overclock_config(&recipe, &machine);
        assert_eq!(config.machine_voltage, 2048);
        assert!(config.heat_overclock && config.heat_discount);
        assert_eq!((config.recipe_heat, config.machine_heat), (1000, 3601));
    }

    #[test]
    fn cli_recipe_heat_alone_leaves_heat_off() {
        let cli = Cli::try_parse_from([
            "gtnh-overclock",
            "overclock",
            "--eut",
            "120",
            "--duration",
            "500",
            "--recipe-heat",
            "1000",
            "--voltage",
            "ev",
        ])
        .unwrap();
        let Commands::Overclock { recipe, machine, .. } = cli.command else {
            panic!("expected overclock command");
        };
        let config = overclock_config(&recipe, &machine);
        assert!(!config.heat_overclock && !config.heat_discount);
        assert_eq!(config.recipe_heat, 0);
    }

    #[test]
    fn cli_rejects_laser_with_amperage_oc() {
        let parsed = Cli::try_parse_from([
            "gtnh-overclock",
            "overclock",
            "--eut",
            "30",
            "--duration",
            "100",
            "--voltage",
            "hv",
            "--amperage-oc",
            "--laser",
            "0.3",
        ]);
        assert!(parsed.is_err());
    }
}
