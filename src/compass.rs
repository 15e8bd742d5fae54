//! The 16-sector compass model.
//!
//! Sector assignment is anchored to a user-placed north vector: north is a
//! geometric reference, and the optional rotation offset shifts sector
//! boundaries without moving the vector itself.

use std::f64::consts::TAU;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::constants::COMPASS_SECTORS;
use crate::geometry::Point;

/// One of the 16 conventional compass directions, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompassLabel {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
}

impl CompassLabel {
    /// All labels in clockwise order starting at north.
    pub fn all() -> &'static [CompassLabel] {
        use CompassLabel::*;
        &[N, Nne, Ne, Ene, E, Ese, Se, Sse, S, Ssw, Sw, Wsw, W, Wnw, Nw, Nnw]
    }

    /// Canonical 1–3 letter abbreviation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompassLabel::N => "N",
            CompassLabel::Nne => "NNE",
            CompassLabel::Ne => "NE",
            CompassLabel::Ene => "ENE",
            CompassLabel::E => "E",
            CompassLabel::Ese => "ESE",
            CompassLabel::Se => "SE",
            CompassLabel::Sse => "SSE",
            CompassLabel::S => "S",
            CompassLabel::Ssw => "SSW",
            CompassLabel::Sw => "SW",
            CompassLabel::Wsw => "WSW",
            CompassLabel::W => "W",
            CompassLabel::Wnw => "WNW",
            CompassLabel::Nw => "NW",
            CompassLabel::Nnw => "NNW",
        }
    }

    /// Sector index, 0 = north, increasing clockwise.
    pub fn index(&self) -> usize {
        Self::all()
            .iter()
            .position(|l| l == self)
            .unwrap_or_default()
    }

    /// Label for a sector index (wraps modulo 16).
    pub fn from_index(index: usize) -> CompassLabel {
        Self::all()[index % COMPASS_SECTORS]
    }

    /// Parse a direction name in any of the forms external data uses.
    ///
    /// Accepts canonical abbreviations (`"NNE"`), full names (`"North"`),
    /// hyphenated full names (`"South - Southwest"`), and names carrying the
    /// abbreviation in parentheses (`"Northeast (NE)"`). Case-insensitive.
    pub fn from_name(raw: &str) -> Option<CompassLabel> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        // Prefer an abbreviation given in parentheses.
        if let Some(open) = s.find('(')
            && let Some(close) = s[open + 1..].find(')')
        {
            return Self::from_abbreviation(s[open + 1..open + 1 + close].trim());
        }
        let mut normalized = s.replace(',', "");
        // Standardize "X - Y" to "X-Y", then collapse whitespace.
        while normalized.contains(" -") {
            normalized = normalized.replace(" -", "-");
        }
        while normalized.contains("- ") {
            normalized = normalized.replace("- ", "-");
        }
        let normalized = normalized
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        match normalized.as_str() {
            "NORTH" => Some(CompassLabel::N),
            "NORTH-NORTHEAST" => Some(CompassLabel::Nne),
            "NORTHEAST" => Some(CompassLabel::Ne),
            "EAST-NORTHEAST" => Some(CompassLabel::Ene),
            "EAST" => Some(CompassLabel::E),
            "EAST-SOUTHEAST" => Some(CompassLabel::Ese),
            "SOUTHEAST" => Some(CompassLabel::Se),
            "SOUTH-SOUTHEAST" => Some(CompassLabel::Sse),
            "SOUTH" => Some(CompassLabel::S),
            "SOUTH-SOUTHWEST" => Some(CompassLabel::Ssw),
            "SOUTHWEST" => Some(CompassLabel::Sw),
            "WEST-SOUTHWEST" => Some(CompassLabel::Wsw),
            "WEST" => Some(CompassLabel::W),
            "WEST-NORTHWEST" => Some(CompassLabel::Wnw),
            "NORTHWEST" => Some(CompassLabel::Nw),
            "NORTH-NORTHWEST" => Some(CompassLabel::Nnw),
            other => Self::from_abbreviation(other),
        }
    }

    fn from_abbreviation(s: &str) -> Option<CompassLabel> {
        let upper = s.trim().to_uppercase();
        Self::all().iter().copied().find(|l| l.as_str() == upper)
    }
}

impl fmt::Display for CompassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CompassLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CompassLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelVisitor;

        impl Visitor<'_> for LabelVisitor {
            type Value = CompassLabel;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a compass direction name")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<CompassLabel, E> {
                CompassLabel::from_name(value)
                    .ok_or_else(|| E::custom(format!("unknown compass direction '{value}'")))
            }
        }

        deserializer.deserialize_str(LabelVisitor)
    }
}

// ============================================================================
// Sector Assignment
// ============================================================================

/// Angular width of one compass sector, in radians.
pub fn sector_step() -> f64 {
    TAU / COMPASS_SECTORS as f64
}

/// Assign the compass label for `target` as seen from `center`, with the
/// north ray pointing at `north` and an optional rotation offset in degrees.
///
/// The angle from `center` to `target` is taken relative to the north ray,
/// shifted by the rotation offset, normalized into `[0, 2π)` and rounded to
/// the nearest of the 16 sector centers.
pub fn angle_to_compass_label(
    center: Point,
    target: Point,
    north: Point,
    rotation_offset_deg: f32,
) -> CompassLabel {
    let north_angle =
        f64::from(north.y - center.y).atan2(f64::from(north.x - center.x));
    let target_angle =
        f64::from(target.y - center.y).atan2(f64::from(target.x - center.x));
    let rotation = f64::from(rotation_offset_deg).to_radians();
    let relative = (target_angle - north_angle + rotation).rem_euclid(TAU);
    let index = (relative / sector_step()).round() as usize % COMPASS_SECTORS;
    CompassLabel::from_index(index)
}

// ============================================================================
// Tests
// ============================================================================
