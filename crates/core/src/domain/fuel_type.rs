use serde::{Deserialize, Serialize};

/// Fuel type reported by the vehicle (SPN 5837 encoding).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    #[default]
    Diesel,
    Gasoline,
    Methanol,
    Ethanol,
    Lpg,
    Cng,
    Lng,
    Electric,
    HybridDiesel,
    HybridGasoline,
    HybridElectric,
    BiFuelGasolineCng,
    Unknown,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diesel => "diesel",
            Self::Gasoline => "gasoline",
            Self::Methanol => "methanol",
            Self::Ethanol => "ethanol",
            Self::Lpg => "lpg",
            Self::Cng => "cng",
            Self::Lng => "lng",
            Self::Electric => "electric",
            Self::HybridDiesel => "hybrid_diesel",
            Self::HybridGasoline => "hybrid_gasoline",
            Self::HybridElectric => "hybrid_electric",
            Self::BiFuelGasolineCng => "bi_fuel_gasoline_cng",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "diesel" => Some(Self::Diesel),
            "gasoline" => Some(Self::Gasoline),
            "methanol" => Some(Self::Methanol),
            "ethanol" => Some(Self::Ethanol),
            "lpg" => Some(Self::Lpg),
            "cng" => Some(Self::Cng),
            "lng" => Some(Self::Lng),
            "electric" => Some(Self::Electric),
            "hybrid_diesel" => Some(Self::HybridDiesel),
            "hybrid_gasoline" => Some(Self::HybridGasoline),
            "hybrid_electric" => Some(Self::HybridElectric),
            "bi_fuel_gasoline_cng" => Some(Self::BiFuelGasolineCng),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn is_compression_ignition(&self) -> bool {
        matches!(self, Self::Diesel | Self::HybridDiesel)
    }

    pub fn is_spark_ignition(&self) -> bool {
        matches!(
            self,
            Self::Gasoline
                | Self::Methanol
                | Self::Ethanol
                | Self::Lpg
                | Self::Cng
                | Self::Lng
                | Self::HybridGasoline
                | Self::BiFuelGasolineCng
        )
    }

    pub fn is_electric(&self) -> bool {
        matches!(self, Self::Electric | Self::HybridElectric)
    }
}
