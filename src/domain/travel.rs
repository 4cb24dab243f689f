use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete travel buckets a student can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelTier {
    NoTransportation,
    LocalArea,
    #[serde(rename = "up_to_15_miles")]
    UpTo15Miles,
    #[serde(rename = "up_to_20_miles")]
    UpTo20Miles,
    #[serde(rename = "up_to_30_miles")]
    UpTo30Miles,
}

impl TravelTier {
    pub const ALL: [TravelTier; 5] = [
        TravelTier::NoTransportation,
        TravelTier::LocalArea,
        TravelTier::UpTo15Miles,
        TravelTier::UpTo20Miles,
        TravelTier::UpTo30Miles,
    ];
}

impl fmt::Display for TravelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TravelTier::NoTransportation => "no transportation",
            TravelTier::LocalArea => "within local area",
            TravelTier::UpTo15Miles => "up to 15 miles",
            TravelTier::UpTo20Miles => "up to 20 miles",
            TravelTier::UpTo30Miles => "up to 30 miles",
        };
        f.write_str(label)
    }
}

/// Miles granted to each tier. Only the no-transportation value is a policy knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPolicy {
    pub no_transportation_miles: u32,
}

impl TierPolicy {
    pub const LOCAL_AREA_MILES: u32 = 8;

    pub fn miles(&self, tier: TravelTier) -> u32 {
        match tier {
            TravelTier::NoTransportation => self.no_transportation_miles,
            TravelTier::LocalArea => Self::LOCAL_AREA_MILES,
            TravelTier::UpTo15Miles => 15,
            TravelTier::UpTo20Miles => 20,
            TravelTier::UpTo30Miles => 30,
        }
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        // 允許步行範圍內的最短距離
        Self {
            no_transportation_miles: 1,
        }
    }
}
