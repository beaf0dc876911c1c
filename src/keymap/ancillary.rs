use super::{AttributeMapping, MetadataKeyMap};

/// Ancillary category keys as they appear in table file names
pub mod category {
    // ── Fluorescence / growth stage ─────────────────────────────────────────
    /// Fluorescence readings
    pub const FLUORESCENCE: &str = "Fluorescence";
    /// Growth stage
    pub const GS: &str = "GS";

    // ── Harvest folder ──────────────────────────────────────────────────────
    /// Harvest yield
    pub const HARVEST: &str = "Harvest";
    /// Carbon / nitrogen content
    pub const CN: &str = "CN";
    /// Harvest index
    pub const HI: &str = "HI";

    // ── Canopy ──────────────────────────────────────────────────────────────
    /// Canopy height
    pub const HEIGHT: &str = "Height";
    /// Leaf area index (PRN exports)
    pub const LAI: &str = "LAI";
    /// Chlorophyll meter readings
    pub const SPAD: &str = "SPAD";
    /// Soil moisture probe readings
    pub const THETA_PROBE: &str = "ThetaProbe";

    // ── Soils folder ────────────────────────────────────────────────────────
    /// Nitrate and ammonia
    pub const NITRATE_AMMONIA: &str = "NitrateAmmonia";
    /// Resin extracts
    pub const RESIN_EXTRACTS: &str = "ResinExtracts";
    /// Gravimetric soil moisture
    pub const MOISTURE: &str = "Moisture";
    /// Soil pH
    pub const PH: &str = "pH";
}

const FERTILISER_LEVEL: &str = "Fertiliser_level";

/// Category → ordered column tuple. An empty tuple has no attribute
/// counterpart yet.
const ANCILLARY_CATEGORIES: [(&str, &[&str]); 13] = [
    (category::FLUORESCENCE, &[]),
    (category::GS, &[FERTILISER_LEVEL, "GS"]),
    (
        category::HARVEST,
        &[FERTILISER_LEVEL, "Yield_TonnesPerHectare", "TGW", "FreshWeightKg", "DryMatter%", "no_in15g"],
    ),
    (category::CN, &[FERTILISER_LEVEL, "N%", "C%"]),
    (
        category::HI,
        &[
            FERTILISER_LEVEL,
            "StrawFreshWeight",
            "StrawDryWeight",
            "WholeEarWeight",
            "GrainWeight",
            "ChaffWeight",
            "HI",
        ],
    ),
    (
        category::HEIGHT,
        &[FERTILISER_LEVEL, "Height1", "Height2", "Height3", "Height4", "Height5", "Plot_height"],
    ),
    (category::LAI, &[]),
    (
        category::SPAD,
        &[
            FERTILISER_LEVEL,
            "SPAD1",
            "SPAD2",
            "SPAD3",
            "SPAD4",
            "SPAD5",
            "SPAD6",
            "SPAD7",
            "SPAD8",
            "SPAD9",
            "SPAD10",
            "Plot_Average",
        ],
    ),
    (
        category::THETA_PROBE,
        &[FERTILISER_LEVEL, "Moisture1", "Moisture2", "Moisture3", "Moisture4", "Moisture5", "Plot Moisture"],
    ),
    (category::NITRATE_AMMONIA, &[FERTILISER_LEVEL, "NO2NO3mgperlN", "AmmoniamgperlN"]),
    (category::RESIN_EXTRACTS, &[FERTILISER_LEVEL, "Ammonia_set1", "Nitrate_set1"]),
    (category::MOISTURE, &[FERTILISER_LEVEL, "Moisture%g/g"]),
    (category::PH, &[FERTILISER_LEVEL, "pH"]),
];

/// Key map from ancillary category to its ordered column tuple
pub fn ancillary_category_map() -> MetadataKeyMap {
    ANCILLARY_CATEGORIES
        .iter()
        .map(|&(key, columns)| (key, AttributeMapping::columns(columns.iter().copied())))
        .collect()
}
