//! The closed vocabulary of storm-event categories found in disaster tables.

use std::fmt;
use std::str::FromStr;

/// A natural-hazard category as reported in the `eventType` column.
///
/// Disaster tables may contain labels outside this vocabulary (typos, renamed
/// categories). Those rows are still labeled as disasters; [`EventType::from_str`]
/// simply fails for them so the pipeline can report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    AstronomicalLowTide,
    Avalanche,
    Blizzard,
    CoastalFlood,
    ColdWindChill,
    DebrisFlow,
    DenseFog,
    DenseSmoke,
    Drought,
    DustDevil,
    DustStorm,
    ExcessiveHeat,
    ExtremeColdWindChill,
    FlashFlood,
    Flood,
    FreezingFog,
    FrostFreeze,
    FunnelCloud,
    Hail,
    Heat,
    HeavyRain,
    HeavySnow,
    HighSurf,
    HighWind,
    HurricaneTyphoon,
    IceStorm,
    LakeEffectSnow,
    LakeshoreFlood,
    Lightning,
    MarineHail,
    MarineHighWind,
    MarineStrongWind,
    MarineThunderstormWind,
    RipCurrent,
    Seiche,
    Sleet,
    Sneakerwave,
    StormSurgeTide,
    StrongWind,
    ThunderstormWind,
    Tornado,
    TropicalDepression,
    TropicalStorm,
    Tsunami,
    VolcanicAsh,
    Waterspout,
    Wildfire,
    WinterStorm,
    WinterWeather,
}

impl EventType {
    pub const ALL: [EventType; 49] = [
        EventType::AstronomicalLowTide,
        EventType::Avalanche,
        EventType::Blizzard,
        EventType::CoastalFlood,
        EventType::ColdWindChill,
        EventType::DebrisFlow,
        EventType::DenseFog,
        EventType::DenseSmoke,
        EventType::Drought,
        EventType::DustDevil,
        EventType::DustStorm,
        EventType::ExcessiveHeat,
        EventType::ExtremeColdWindChill,
        EventType::FlashFlood,
        EventType::Flood,
        EventType::FreezingFog,
        EventType::FrostFreeze,
        EventType::FunnelCloud,
        EventType::Hail,
        EventType::Heat,
        EventType::HeavyRain,
        EventType::HeavySnow,
        EventType::HighSurf,
        EventType::HighWind,
        EventType::HurricaneTyphoon,
        EventType::IceStorm,
        EventType::LakeEffectSnow,
        EventType::LakeshoreFlood,
        EventType::Lightning,
        EventType::MarineHail,
        EventType::MarineHighWind,
        EventType::MarineStrongWind,
        EventType::MarineThunderstormWind,
        EventType::RipCurrent,
        EventType::Seiche,
        EventType::Sleet,
        EventType::Sneakerwave,
        EventType::StormSurgeTide,
        EventType::StrongWind,
        EventType::ThunderstormWind,
        EventType::Tornado,
        EventType::TropicalDepression,
        EventType::TropicalStorm,
        EventType::Tsunami,
        EventType::VolcanicAsh,
        EventType::Waterspout,
        EventType::Wildfire,
        EventType::WinterStorm,
        EventType::WinterWeather,
    ];

    /// The label exactly as it appears in storm-event exports.
    pub fn label(&self) -> &'static str {
        match self {
            EventType::AstronomicalLowTide => "Astronomical Low Tide",
            EventType::Avalanche => "Avalanche",
            EventType::Blizzard => "Blizzard",
            EventType::CoastalFlood => "Coastal Flood",
            EventType::ColdWindChill => "Cold/Wind Chill",
            EventType::DebrisFlow => "Debris Flow",
            EventType::DenseFog => "Dense Fog",
            EventType::DenseSmoke => "Dense Smoke",
            EventType::Drought => "Drought",
            EventType::DustDevil => "Dust Devil",
            EventType::DustStorm => "Dust Storm",
            EventType::ExcessiveHeat => "Excessive Heat",
            EventType::ExtremeColdWindChill => "Extreme Cold/Wind Chill",
            EventType::FlashFlood => "Flash Flood",
            EventType::Flood => "Flood",
            EventType::FreezingFog => "Freezing Fog",
            EventType::FrostFreeze => "Frost/Freeze",
            EventType::FunnelCloud => "Funnel Cloud",
            EventType::Hail => "Hail",
            EventType::Heat => "Heat",
            EventType::HeavyRain => "Heavy Rain",
            EventType::HeavySnow => "Heavy Snow",
            EventType::HighSurf => "High Surf",
            EventType::HighWind => "High Wind",
            EventType::HurricaneTyphoon => "Hurricane (Typhoon)",
            EventType::IceStorm => "Ice Storm",
            EventType::LakeEffectSnow => "Lake-Effect Snow",
            EventType::LakeshoreFlood => "Lakeshore Flood",
            EventType::Lightning => "Lightning",
            EventType::MarineHail => "Marine Hail",
            EventType::MarineHighWind => "Marine High Wind",
            EventType::MarineStrongWind => "Marine Strong Wind",
            EventType::MarineThunderstormWind => "Marine Thunderstorm Wind",
            EventType::RipCurrent => "Rip Current",
            EventType::Seiche => "Seiche",
            EventType::Sleet => "Sleet",
            EventType::Sneakerwave => "Sneakerwave",
            EventType::StormSurgeTide => "Storm Surge/Tide",
            EventType::StrongWind => "Strong Wind",
            EventType::ThunderstormWind => "Thunderstorm Wind",
            EventType::Tornado => "Tornado",
            EventType::TropicalDepression => "Tropical Depression",
            EventType::TropicalStorm => "Tropical Storm",
            EventType::Tsunami => "Tsunami",
            EventType::VolcanicAsh => "Volcanic Ash",
            EventType::Waterspout => "Waterspout",
            EventType::Wildfire => "Wildfire",
            EventType::WinterStorm => "Winter Storm",
            EventType::WinterWeather => "Winter Weather",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Returned when a label is not part of the storm-event vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventType(pub String);

impl fmt::Display for UnknownEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event type '{}'", self.0)
    }
}

impl std::error::Error for UnknownEventType {}

impl FromStr for EventType {
    type Err = UnknownEventType;

    /// Matches labels case-insensitively, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EventType::ALL
            .iter()
            .find(|event| event.label().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}
