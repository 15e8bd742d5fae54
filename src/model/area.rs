//! Placed room and fixture regions.
//!
//! Areas are axis-aligned rectangles in base-image pixel space, keyed by
//! `Type-index` (e.g. `Bedroom-1`). The registry owns placement, movement,
//! resizing and the single active selection.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    MIN_AREA_HEIGHT, MIN_AREA_WIDTH, NEW_AREA_HEIGHT_FRACTION, NEW_AREA_MIN_HEIGHT,
    NEW_AREA_MIN_WIDTH, NEW_AREA_WIDTH_FRACTION,
};
use crate::geometry::{Corner, Point, Rect};

// ============================================================================
// Area Types
// ============================================================================

/// The semantic type of a placed region.
///
/// Rooms are placed during the room-layout stage; fixtures during the
/// fixtures stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AreaType {
    Bedroom,
    Bathroom,
    Hall,
    Study,
    Puja,
    Toilet,
    GasStove,
    DiningTable,
    ToiletFixture,
}

impl AreaType {
    /// All area types, rooms first.
    pub fn all() -> &'static [AreaType] {
        &[
            AreaType::Bedroom,
            AreaType::Bathroom,
            AreaType::Hall,
            AreaType::Study,
            AreaType::Puja,
            AreaType::Toilet,
            AreaType::GasStove,
            AreaType::DiningTable,
            AreaType::ToiletFixture,
        ]
    }

    /// Room types placeable in the room-layout stage.
    pub fn rooms() -> &'static [AreaType] {
        &[
            AreaType::Bedroom,
            AreaType::Bathroom,
            AreaType::Hall,
            AreaType::Study,
            AreaType::Puja,
            AreaType::Toilet,
        ]
    }

    /// Fixture types placeable in the fixtures stage.
    pub fn fixtures() -> &'static [AreaType] {
        &[
            AreaType::GasStove,
            AreaType::DiningTable,
            AreaType::ToiletFixture,
        ]
    }

    /// Whether this type is a fixture rather than a room.
    pub fn is_fixture(&self) -> bool {
        matches!(
            self,
            AreaType::GasStove | AreaType::DiningTable | AreaType::ToiletFixture
        )
    }

    /// Get the display name for this type.
    pub fn name(&self) -> &'static str {
        match self {
            AreaType::Bedroom => "Bedroom",
            AreaType::Bathroom => "Bathroom",
            AreaType::Hall => "Hall",
            AreaType::Study => "Study",
            AreaType::Puja => "Puja House",
            AreaType::Toilet => "Toilet",
            AreaType::GasStove => "Gas Stove",
            AreaType::DiningTable => "Dining Table",
            AreaType::ToiletFixture => "Toilet Fixture",
        }
    }

    /// Short label prefix used on the canvas (`B3` for the third bedroom).
    pub fn prefix(&self) -> &'static str {
        match self {
            AreaType::Bedroom => "B",
            AreaType::Bathroom => "Ba",
            AreaType::Hall => "H",
            AreaType::Study => "S",
            AreaType::Puja => "P",
            AreaType::Toilet => "T",
            AreaType::GasStove => "GS",
            AreaType::DiningTable => "DT",
            AreaType::ToiletFixture => "TF",
        }
    }

    /// Key string used in the registry and in keys like `Bedroom-1`.
    pub fn key_name(&self) -> &'static str {
        match self {
            AreaType::Bedroom => "Bedroom",
            AreaType::Bathroom => "Bathroom",
            AreaType::Hall => "Hall",
            AreaType::Study => "Study",
            AreaType::Puja => "Puja",
            AreaType::Toilet => "Toilet",
            AreaType::GasStove => "GasStove",
            AreaType::DiningTable => "DiningTable",
            AreaType::ToiletFixture => "ToiletFixture",
        }
    }

    /// Translucent fill color (RGBA) for the overlay.
    pub fn fill_color(&self) -> [u8; 4] {
        match self {
            AreaType::Bedroom => [99, 102, 241, 64],
            AreaType::Bathroom => [16, 185, 129, 64],
            AreaType::Hall => [234, 179, 8, 64],
            AreaType::Study => [59, 130, 246, 64],
            AreaType::Puja => [236, 72, 153, 64],
            AreaType::Toilet => [239, 68, 68, 64],
            AreaType::GasStove => [249, 115, 22, 64],
            AreaType::DiningTable => [20, 184, 166, 64],
            AreaType::ToiletFixture => [168, 85, 247, 64],
        }
    }

    /// Guidance lookup category for this type, plus an optional fallback
    /// tried when the loaded table has no entry under the primary key.
    ///
    /// `dinning_hall` keeps the misspelling the external data uses.
    pub fn guidance_category(&self) -> (&'static str, Option<&'static str>) {
        match self {
            AreaType::Bedroom => ("bedroom", None),
            AreaType::Bathroom => ("bathroom", None),
            AreaType::Hall => ("drawing_room", Some("hall")),
            AreaType::Study => ("study_room", None),
            AreaType::Puja => ("puja_room", None),
            AreaType::Toilet => ("toilet", None),
            AreaType::GasStove => ("kitchen", None),
            AreaType::DiningTable => ("dinning_hall", None),
            AreaType::ToiletFixture => ("toilet", None),
        }
    }
}

/// Build the registry key for a `(type, index)` pair.
pub fn area_key(area_type: AreaType, index: u32) -> String {
    format!("{}-{}", area_type.key_name(), index)
}

// ============================================================================
// Area
// ============================================================================

/// A placed, resizable region on the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    /// Unique registry key, `Type-index`.
    pub key: String,
    /// Semantic type.
    pub area_type: AreaType,
    /// 1-based index within the type.
    pub index: u32,
    /// Placement rectangle in image pixels.
    pub rect: Rect,
    /// Reserved for future lock semantics.
    pub fixed: bool,
    /// Tool stage at which the area was created; earlier-stage areas render
    /// de-emphasized.
    pub stage_index: u8,
    /// Extensible per-type attributes (e.g. a fixture's seating direction).
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl Area {
    /// Short canvas label, type prefix plus index (`Ba2`).
    pub fn label(&self) -> String {
        format!("{}{}", self.area_type.prefix(), self.index)
    }

    /// Center of the placement rectangle.
    pub fn center(&self) -> Point {
        self.rect.center()
    }
}

// ============================================================================
// Area Registry
// ============================================================================

/// The set of placed areas, in creation order, with one optional active
/// selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaRegistry {
    areas: Vec<Area>,
    active: Option<String>,
}

impl AreaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent creation keyed by `(type, index)`.
    ///
    /// A new area is centered on the canvas with a size proportional to the
    /// canvas dimensions; re-creating an existing key returns the existing
    /// area unchanged. Returns the key and whether an area was created.
    pub fn ensure(
        &mut self,
        area_type: AreaType,
        index: u32,
        canvas_width: u32,
        canvas_height: u32,
        stage_index: u8,
    ) -> (String, bool) {
        let key = area_key(area_type, index);
        if self.get(&key).is_some() {
            return (key, false);
        }
        let w = canvas_width as f32;
        let h = canvas_height as f32;
        let rect_w = NEW_AREA_MIN_WIDTH.max((w * NEW_AREA_WIDTH_FRACTION).round());
        let rect_h = NEW_AREA_MIN_HEIGHT.max((h * NEW_AREA_HEIGHT_FRACTION).round());
        let rect = Rect::new(
            (w / 2.0 - rect_w / 2.0).round(),
            (h / 2.0 - rect_h / 2.0).round(),
            rect_w,
            rect_h,
        );
        log::debug!("Created area {key} at {rect:?}");
        self.areas.push(Area {
            key: key.clone(),
            area_type,
            index,
            rect,
            fixed: false,
            stage_index,
            attributes: HashMap::new(),
        });
        (key, true)
    }

    /// Translate an area to a new top-left corner. Overlap with other areas
    /// is permitted. Returns false for an unknown key.
    pub fn move_to(&mut self, key: &str, top_left: Point) -> bool {
        let Some(area) = self.get_mut(key) else {
            return false;
        };
        area.rect.x = top_left.x;
        area.rect.y = top_left.y;
        true
    }

    /// Resize an area by dragging one corner, anchoring the opposite corner.
    ///
    /// Width and height clamp to the minimum size; dragging past the anchor
    /// clamps rather than inverting the rectangle. Returns false for an
    /// unknown key.
    pub fn resize(&mut self, key: &str, corner: Corner, pointer: Point) -> bool {
        let Some(area) = self.get_mut(key) else {
            return false;
        };
        let anchor = area.rect.corner(corner.opposite());
        // Signed extent from the anchor toward the dragged corner; clamping
        // at the minimum keeps the rectangle from inverting.
        let (x, w) = match corner {
            Corner::Ne | Corner::Se => (anchor.x, MIN_AREA_WIDTH.max(pointer.x - anchor.x)),
            Corner::Nw | Corner::Sw => {
                let w = MIN_AREA_WIDTH.max(anchor.x - pointer.x);
                (anchor.x - w, w)
            }
        };
        let (y, h) = match corner {
            Corner::Sw | Corner::Se => (anchor.y, MIN_AREA_HEIGHT.max(pointer.y - anchor.y)),
            Corner::Nw | Corner::Ne => {
                let h = MIN_AREA_HEIGHT.max(anchor.y - pointer.y);
                (anchor.y - h, h)
            }
        };
        area.rect = Rect::new(x, y, w, h);
        true
    }

    /// Set the single active area. `None` clears the selection; an unknown
    /// key is ignored.
    pub fn set_active(&mut self, key: Option<&str>) {
        match key {
            None => self.active = None,
            Some(k) if self.get(k).is_some() => self.active = Some(k.to_string()),
            Some(k) => log::debug!("Ignoring activation of unknown area {k}"),
        }
    }

    /// Key of the active area, if any.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Get an area by key.
    pub fn get(&self, key: &str) -> Option<&Area> {
        self.areas.iter().find(|a| a.key == key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Area> {
        self.areas.iter_mut().find(|a| a.key == key)
    }

    /// Iterate areas in creation (draw) order.
    pub fn iter(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Topmost area containing the point (last drawn wins).
    pub fn hit_test(&self, point: &Point) -> Option<&str> {
        self.areas
            .iter()
            .rev()
            .find(|a| a.rect.contains(point))
            .map(|a| a.key.as_str())
    }

    /// Remove all areas and clear the selection.
    pub fn clear(&mut self) {
        self.areas.clear();
        self.active = None;
    }
}

// ============================================================================
// Tests
// ============================================================================
