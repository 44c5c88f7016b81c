//! Voltage tier table
//!
//! Sixteen tiers from ULV (8 EU/t) to MAX+ (8 589 934 592 EU/t), each four
//! times the previous one.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Number of tiers in the table.
pub const TIER_COUNT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VoltageTier {
    Ulv,
    Lv,
    Mv,
    Hv,
    Ev,
    Iv,
    Luv,
    Zpm,
    Uv,
    Uhv,
    Uev,
    Uiv,
    Umv,
    Uxv,
    Max,
    MaxPlus,
}

impl VoltageTier {
    pub const ALL: [VoltageTier; TIER_COUNT] = [
        VoltageTier::Ulv,
        VoltageTier::Lv,
        VoltageTier::Mv,
        VoltageTier::Hv,
        VoltageTier::Ev,
        VoltageTier::Iv,
        VoltageTier::Luv,
        VoltageTier::Zpm,
        VoltageTier::Uv,
        VoltageTier::Uhv,
        VoltageTier::Uev,
        VoltageTier::Uiv,
        VoltageTier::Umv,
        VoltageTier::Uxv,
        VoltageTier::Max,
        VoltageTier::MaxPlus,
    ];

    /// Look up a tier by its index (ULV = 0).
    pub fn from_number(tier: i64) -> Result<Self> {
        usize::try_from(tier)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(Error::TierOutOfRange { tier })
    }

    /// Smallest tier whose voltage is at least `voltage`.
    pub fn for_voltage(voltage: u64) -> Result<Self> {
        if voltage == 0 {
            return Err(Error::VoltageOutOfRange { voltage });
        }
        Self::ALL
            .iter()
            .copied()
            .find(|tier| tier.voltage() >= voltage)
            .ok_or(Error::VoltageOutOfRange { voltage })
    }

    pub fn number(self) -> u32 {
        self as u32
    }

    /// Nominal voltage, `2^(3 + 2 * tier)`.
    pub fn voltage(self) -> u64 {
        1u64 << (3 + 2 * self.number())
    }

    /// Voltage after the 30/32 derating used for recipe tables.
    pub fn practical(self) -> u64 {
        self.voltage() * 30 / 32
    }

    pub fn name(self) -> &'static str {
        match self {
            VoltageTier::Ulv => "ULV",
            VoltageTier::Lv => "LV",
            VoltageTier::Mv => "MV",
            VoltageTier::Hv => "HV",
            VoltageTier::Ev => "EV",
            VoltageTier::Iv => "IV",
            VoltageTier::Luv => "LuV",
            VoltageTier::Zpm => "ZPM",
            VoltageTier::Uv => "UV",
            VoltageTier::Uhv => "UHV",
            VoltageTier::Uev => "UEV",
            VoltageTier::Uiv => "UIV",
            VoltageTier::Umv => "UMV",
            VoltageTier::Uxv => "UXV",
            VoltageTier::Max => "MAX",
            VoltageTier::MaxPlus => "MAX+",
        }
    }
}

impl fmt::Display for VoltageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VoltageTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("max_plus") {
            return Ok(VoltageTier::MaxPlus);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|tier| tier.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownTier {
                name: s.to_string(),
            })
    }
}

pub fn voltage_for_tier(tier: i64) -> Result<u64> {
    VoltageTier::from_number(tier).map(VoltageTier::voltage)
}

pub fn tier_for_voltage(voltage: u64) -> Result<u32> {
    VoltageTier::for_voltage(voltage).map(VoltageTier::number)
}

pub fn practical(tier: i64) -> Result<u64> {
    VoltageTier::from_number(tier).map(VoltageTier::practical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_ulv_to_max_plus() {
        assert_eq!(voltage_for_tier(0).unwrap(), 8);
        assert_eq!(voltage_for_tier(15).unwrap(), 8_589_934_592);
        for pair in VoltageTier::ALL.windows(2) {
            assert_eq!(pair[1].voltage(), pair[0].voltage() * 4);
        }
    }

    #[test]
    fn lookup_by_number() {
        assert_eq!(VoltageTier::from_number(1).unwrap(), VoltageTier::Lv);
        assert_eq!(VoltageTier::from_number(4).unwrap(), VoltageTier::Ev);
        assert_eq!(VoltageTier::from_number(15).unwrap(), VoltageTier::MaxPlus);
        assert_eq!(VoltageTier::Ev.number(), 4);
    }

    #[test]
    fn lookup_by_number_out_of_range() {
        for tier in [-10, -1, 16, 20] {
            assert_eq!(
                VoltageTier::from_number(tier),
                Err(Error::TierOutOfRange { tier })
            );
        }
    }

    #[test]
    fn lookup_by_name_is_case_insensitive() {
        assert_eq!("LV".parse::<VoltageTier>().unwrap(), VoltageTier::Lv);
        assert_eq!("LuV".parse::<VoltageTier>().unwrap(), VoltageTier::Luv);
        assert_eq!("ev".parse::<VoltageTier>().unwrap(), VoltageTier::Ev);
        assert_eq!("max+".parse::<VoltageTier>().unwrap(), VoltageTier::MaxPlus);
        assert_eq!("MAX_PLUS".parse::<VoltageTier>().unwrap(), VoltageTier::MaxPlus);
        assert!(matches!(
            "abc".parse::<VoltageTier>(),
            Err(Error::UnknownTier { .. })
        ));
    }

    #[test]
    fn tier_for_arbitrary_voltage() {
        assert_eq!(VoltageTier::for_voltage(1).unwrap(), VoltageTier::Ulv);
        assert_eq!(VoltageTier::for_voltage(50).unwrap(), VoltageTier::Mv);
        assert_eq!(VoltageTier::for_voltage(3000).unwrap(), VoltageTier::Iv);
        assert_eq!(VoltageTier::for_voltage(33_554_432).unwrap(), VoltageTier::Uiv);
        assert_eq!(VoltageTier::for_voltage(33_554_433).unwrap(), VoltageTier::Umv);
        assert_eq!(
            VoltageTier::for_voltage(8_589_934_592).unwrap(),
            VoltageTier::MaxPlus
        );
    }

    #[test]
    fn tier_for_voltage_agrees_with_table_at_boundaries() {
        for tier in VoltageTier::ALL {
            assert_eq!(VoltageTier::for_voltage(tier.voltage()).unwrap(), tier);
        }
    }

    #[test]
    fn tier_for_voltage_out_of_range() {
        assert!(tier_for_voltage(0).is_err());
        assert!(tier_for_voltage(8_589_934_593).is_err());
    }

    #[test]
    fn practical_voltage_is_derated() {
        assert_eq!(practical(1).unwrap(), 30);
        assert_eq!(practical(5).unwrap(), 7680);
        assert_eq!(VoltageTier::Ulv.practical(), 7);
    }
}
