use gtnh_overclock::{OverclockCalculator, OverclockConfig, OverclockResult, VoltageTier};

fn ebf(
    recipe_power: u64,
    duration: u64,
    recipe_heat: u32,
    voltage: VoltageTier,
    machine_heat: u32,
) -> OverclockResult {
    let config = OverclockConfig::new(recipe_power, duration, voltage.voltage())
        .with_heat(recipe_heat, machine_heat);
    OverclockCalculator::new(config).expect("valid ebf config").calculate()
}

fn heat_discount(steps: u32) -> f64 {
    0.95f64.powf(f64::from(steps))
}

#[test]
fn ebf_at_exact_heat_requirement() {
    let result = ebf(VoltageTier::Lv.practical(), 1024, 1800, VoltageTier::Iv, 1800);
    assert_eq!(result.duration, 1024 >> 4);
    assert_eq!(result.power, (7680.0 * heat_discount(0)).ceil() as u64);
    assert_eq!(result.overclocks, 4);
}

#[test]
fn ebf_with_one_discount_step() {
    let result = ebf(VoltageTier::Lv.practical(), 1024, 1800, VoltageTier::Iv, 2700);
    assert_eq!(result.duration, 1024 >> 4);
    assert_eq!(result.power, (7680.0 * heat_discount(1)).ceil() as u64);
}

#[test]
fn ebf_with_one_perfect_overclock() {
    let result = ebf(VoltageTier::Lv.practical(), 1024, 1800, VoltageTier::Iv, 3600);
    assert_eq!(result.duration, 1024 >> 5);
    assert_eq!(result.power, (7680.0 * heat_discount(2)).ceil() as u64);
}

#[test]
fn ebf_all_overclocks_perfect() {
    let result = ebf(VoltageTier::Lv.practical(), 1024, 1800, VoltageTier::Iv, 1800 * 5);
    assert_eq!(result.duration, 1024 >> 8);
    assert_eq!(result.power, (7680.0 * heat_discount(8)).ceil() as u64);
    assert_eq!(result.overclocks, 4);
}

#[test]
fn ebf_steel_one_normal_overclock() {
    // kanthal coils
    let result = ebf(120, 500, 1000, VoltageTier::Hv, 2701);
    assert_eq!(result.power, (480.0 * heat_discount(1)).ceil() as u64);
    assert_eq!(result.duration, 250);
}

#[test]
fn ebf_steel_one_perfect_overclock() {
    // nichrome coils
    let result = ebf(120, 500, 1000, VoltageTier::Hv, 3601);
    assert_eq!(result.power, (480.0 * heat_discount(2)).ceil() as u64);
    assert_eq!(result.duration, 125);
}

#[test]
fn ebf_steel_normal_plus_perfect_overclock() {
    let result = ebf(120, 500, 1000, VoltageTier::Ev, 3601);
    assert_eq!(result.power, (1920.0 * heat_discount(2)).ceil() as u64);
    assert_eq!(result.duration, 62);
    assert_eq!(result.overclocks, 2);
}

#[test]
fn heat_overclock_disabled_keeps_normal_steps() {
    let config = OverclockConfig::new(120, 500, VoltageTier::Ev.voltage())
        .with_heat(1000, 3601)
        .with_heat_overclock(false);
    let result = OverclockCalculator::new(config).unwrap().calculate();
    assert_eq!(result.duration, 125);
    assert_eq!(result.power, (1920.0 * heat_discount(2)).ceil() as u64);
}

#[test]
fn heat_discount_disabled_keeps_full_power() {
    let config = OverclockConfig::new(120, 500, VoltageTier::Ev.voltage())
        .with_heat(1000, 3601)
        .with_heat_discount(false);
    let result = OverclockCalculator::new(config).unwrap().calculate();
    assert_eq!(result.duration, 62);
    assert_eq!(result.power, 1920);
}
