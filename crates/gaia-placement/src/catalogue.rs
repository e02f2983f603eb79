//! Resource templates: altitude bands for whole-map population and the
//! resource types offered for hand-placed clusters.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

/// Low-lying flora, below 10 altitude.
pub const COASTAL_FLORA: &[&str] = &[
    "gaia/tree/medit_fan_palm",
    "gaia/tree/mangrove",
    "gaia/tree/baobab",
    "gaia/tree/palm_senegal_date",
    "gaia/tree/bamboo",
];

/// Low-lying fauna, below 10 altitude.
pub const COASTAL_FAUNA: &[&str] = &["gaia/fauna_goat", "gaia/fauna_chicken"];

/// Hill flora, altitude 10 to 40.
pub const TEMPERATE_FLORA: &[&str] = &[
    "gaia/tree/oak",
    "gaia/tree/oak_aut",
    "gaia/tree/olive",
    "gaia/tree/carob",
    "gaia/tree/fig",
];

/// Hill fauna, altitude 10 to 40.
pub const TEMPERATE_FAUNA: &[&str] = &["gaia/fauna_deer", "gaia/fauna_rabbit"];

/// Mountain stone, altitude 40 and up.
pub const ROCKS: &[&str] = &[
    "gaia/rock/temperate_large_03",
    "gaia/rock/mediterranean_large",
    "gaia/rock/desert_large",
    "gaia/rock/alpine_large",
];

/// Mountain metal, altitude 40 and up.
pub const ORES: &[&str] = &[
    "gaia/ore/temperate_large",
    "gaia/ore/temperate_small",
    "gaia/ore/desert_large",
    "gaia/ore/alpine_large",
];

const ALPINE_FOREST: &[&str] = &[
    "flora/trees/alpine/pine",
    "flora/trees/alpine/pine_w",
    "flora/trees/alpine/fir_tree",
];

/// Altitude ranges that select a template family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AltitudeBand {
    /// `altitude < 10`.
    Coastal,
    /// `10 <= altitude < 40`.
    Temperate,
    /// `altitude >= 40`.
    Highland,
}

impl AltitudeBand {
    pub fn from_altitude(altitude: f64) -> Self {
        if altitude < 10.0 {
            Self::Coastal
        } else if altitude < 40.0 {
            Self::Temperate
        } else {
            Self::Highland
        }
    }

    /// Probability of drawing from [`AltitudeBand::primary`] rather than
    /// [`AltitudeBand::secondary`].
    pub fn primary_chance(self) -> f64 {
        match self {
            Self::Coastal | Self::Highland => 0.7,
            Self::Temperate => 0.6,
        }
    }

    /// Flora for the lower bands, rock for the highland.
    pub fn primary(self) -> &'static [&'static str] {
        match self {
            Self::Coastal => COASTAL_FLORA,
            Self::Temperate => TEMPERATE_FLORA,
            Self::Highland => ROCKS,
        }
    }

    /// Fauna for the lower bands, ore for the highland.
    pub fn secondary(self) -> &'static [&'static str] {
        match self {
            Self::Coastal => COASTAL_FAUNA,
            Self::Temperate => TEMPERATE_FAUNA,
            Self::Highland => ORES,
        }
    }
}

/// Pick one template uniformly from a non-empty list.
pub(crate) fn pick_from<R: Rng>(list: &'static [&'static str], rng: &mut R) -> &'static str {
    list[rng.random_range(0..list.len())]
}

/// Choose a template for a resource standing at `altitude`.
pub fn pick_template<R: Rng>(altitude: f64, rng: &mut R) -> &'static str {
    let band = AltitudeBand::from_altitude(altitude);
    let list = if rng.random::<f64>() < band.primary_chance() {
        band.primary()
    } else {
        band.secondary()
    };
    pick_from(list, rng)
}

/// Default cluster shape for a resource type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterDefaults {
    /// Fraction of the radius actually used, in `(0, 1]`.
    pub density: f64,
    /// Cluster radius in game units.
    pub radius: f64,
    /// Number of entities per cluster.
    pub count: usize,
}

/// Resource families that can be hand-placed as clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    AlpineForest,
    MediterraneanForest,
    TropicalForest,
    Stones,
    Metals,
}

impl ResourceType {
    pub const ALL: [ResourceType; 5] = [
        Self::AlpineForest,
        Self::MediterraneanForest,
        Self::TropicalForest,
        Self::Stones,
        Self::Metals,
    ];

    /// Stable identifier, e.g. `alpine_forest`.
    pub fn id(self) -> &'static str {
        match self {
            Self::AlpineForest => "alpine_forest",
            Self::MediterraneanForest => "mediterranean_forest",
            Self::TropicalForest => "tropical_forest",
            Self::Stones => "stones",
            Self::Metals => "metals",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::AlpineForest => "Alpine forest",
            Self::MediterraneanForest => "Mediterranean forest",
            Self::TropicalForest => "Tropical forest",
            Self::Stones => "Stones",
            Self::Metals => "Metals",
        }
    }

    /// Editor swatch colour as `#rrggbb`.
    pub fn color(self) -> &'static str {
        match self {
            Self::AlpineForest => "#2d5a27",
            Self::MediterraneanForest => "#4a7c59",
            Self::TropicalForest => "#228b22",
            Self::Stones => "#696969",
            Self::Metals => "#daa520",
        }
    }

    pub fn defaults(self) -> ClusterDefaults {
        let (density, radius, count) = match self {
            Self::AlpineForest => (0.8, 30.0, 8),
            Self::MediterraneanForest => (0.7, 35.0, 10),
            Self::TropicalForest => (0.9, 40.0, 12),
            Self::Stones => (0.6, 20.0, 6),
            Self::Metals => (0.5, 15.0, 4),
        };
        ClusterDefaults {
            density,
            radius,
            count,
        }
    }

    /// Templates a cluster of this type draws from.
    pub fn templates(self) -> &'static [&'static str] {
        match self {
            Self::AlpineForest => ALPINE_FOREST,
            Self::MediterraneanForest => TEMPERATE_FLORA,
            Self::TropicalForest => COASTAL_FLORA,
            Self::Stones => ROCKS,
            Self::Metals => ORES,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A resource type name that is not in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource type {0:?}")]
pub struct UnknownResourceType(pub String);

impl FromStr for ResourceType {
    type Err = UnknownResourceType;

    /// Accepts the id in any case, with `-` or `_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.id() == normalized)
            .ok_or_else(|| UnknownResourceType(s.to_string()))
    }
}
