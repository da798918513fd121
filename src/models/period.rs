use anyhow::{Result, anyhow};
use strum_macros::EnumIter;

#[derive(Clone, Copy, Debug, Default, EnumIter, Eq, PartialEq)]
pub enum GrowthPeriod {
    Today,
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl GrowthPeriod {
    pub fn parse_str(s: &str) -> Result<GrowthPeriod> {
        match s {
            "today" => Ok(GrowthPeriod::Today),
            "day" => Ok(GrowthPeriod::Day),
            "week" => Ok(GrowthPeriod::Week),
            "month" => Ok(GrowthPeriod::Month),
            "year" => Ok(GrowthPeriod::Year),
            "all" => Ok(GrowthPeriod::All),
            _ => Err(anyhow!("Unknown growth period '{}'", s)),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            GrowthPeriod::Today => "today",
            GrowthPeriod::Day => "day",
            GrowthPeriod::Week => "week",
            GrowthPeriod::Month => "month",
            GrowthPeriod::Year => "year",
            GrowthPeriod::All => "all",
        }
    }
}
