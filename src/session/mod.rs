//! The annotation session: one floor plan, one compass frame, one set of
//! placed areas.
//!
//! All annotation state lives in [`AnnotationSession`]; mutation happens
//! through [`Command`]s so the stage gating sits in one place. Commands
//! whose preconditions do not hold are silently discarded (logged at debug
//! level) — the calling surface is expected to have disabled the control,
//! and this is a best-effort interactive tool, not a transactional API.

mod command;
mod history;

pub use command::Command;
pub use history::{HistoryStack, Snapshot};

use std::collections::BTreeMap;

use image::RgbaImage;

use crate::brush;
use crate::constants::{
    BRUSH_SIZE_MAX, BRUSH_SIZE_MIN, DEFAULT_BRUSH_COLOR, DEFAULT_BRUSH_SIZE,
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, MIN_BOUNDARY_POINTS, RESIZE_HANDLE_SIZE,
};
use crate::geometry::{self, Corner, Point};
use crate::guidance::{GuidanceError, GuidanceTable};
use crate::model::{AreaRegistry, AreaType, area_key};

// ============================================================================
// Stages
// ============================================================================

/// Coarse tool stage gating which control set is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ToolStage {
    /// Orientation: boundary capture, centroid, north, compass.
    Orientation,
    /// Room layout: room counts, area placement, export.
    RoomLayout,
    /// Fixtures: fixture counts, guidance loading, report.
    Fixtures,
}

impl ToolStage {
    /// 1-based stage index, as recorded on areas for dimming.
    pub fn index(&self) -> u8 {
        match self {
            ToolStage::Orientation => 1,
            ToolStage::RoomLayout => 2,
            ToolStage::Fixtures => 3,
        }
    }

    fn next(&self) -> ToolStage {
        match self {
            ToolStage::Orientation => ToolStage::RoomLayout,
            ToolStage::RoomLayout | ToolStage::Fixtures => ToolStage::Fixtures,
        }
    }

    fn back(&self) -> ToolStage {
        match self {
            ToolStage::Orientation | ToolStage::RoomLayout => ToolStage::Orientation,
            ToolStage::Fixtures => ToolStage::RoomLayout,
        }
    }
}

/// Fine-grained orientation progress.
///
/// `north-fixed` and `directions-shown` are the `NorthPlacing` stage with
/// the corresponding flags set; the flags (not the stage) participate in
/// undo snapshots, so undo rewinds the canvas without yanking the user to a
/// different control set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    Idle,
    WallSelecting,
    CenterComputed,
    NorthPlacing,
}

/// Free-hand brush settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushSettings {
    pub enabled: bool,
    pub color: [u8; 4],
    pub size: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            color: DEFAULT_BRUSH_COLOR,
            size: DEFAULT_BRUSH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ImageSize {
    width: u32,
    height: u32,
}

/// One in-flight pointer gesture. Only one gesture runs at a time; its
/// pre-gesture snapshot is committed to history on release.
#[derive(Debug, Clone)]
enum GestureKind {
    NorthDrag { grab: (f32, f32) },
    AreaMove { key: String, grab: (f32, f32) },
    AreaResize { key: String, corner: Corner },
    BrushStroke { last: Point },
}

#[derive(Debug, Clone)]
struct ActiveGesture {
    kind: GestureKind,
    before: Snapshot,
}

// ============================================================================
// Annotation Session
// ============================================================================

/// All annotation state for one loaded floor plan.
#[derive(Debug, Clone)]
pub struct AnnotationSession {
    image: Option<ImageSize>,
    progress: ProgressStage,
    tool_stage: ToolStage,
    wall_points: Vec<Point>,
    centroid: Option<Point>,
    show_center: bool,
    north: Option<Point>,
    north_fixed: bool,
    show_directions: bool,
    rotation_offset_deg: f32,
    overlay: RgbaImage,
    brush: BrushSettings,
    areas: AreaRegistry,
    room_counts: BTreeMap<AreaType, u32>,
    history: HistoryStack,
    gesture: Option<ActiveGesture>,
    guidance: GuidanceTable,
    status: Option<String>,
}

impl Default for AnnotationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationSession {
    /// Create an empty session with no image loaded.
    pub fn new() -> Self {
        Self {
            image: None,
            progress: ProgressStage::Idle,
            tool_stage: ToolStage::Orientation,
            wall_points: Vec::new(),
            centroid: None,
            show_center: false,
            north: None,
            north_fixed: false,
            show_directions: false,
            rotation_offset_deg: 0.0,
            overlay: RgbaImage::new(0, 0),
            brush: BrushSettings::default(),
            areas: AreaRegistry::new(),
            room_counts: BTreeMap::new(),
            history: HistoryStack::new(),
            gesture: None,
            guidance: GuidanceTable::new(),
            status: None,
        }
    }

    /// Create a session with a custom undo depth cap.
    pub fn with_undo_depth(depth: usize) -> Self {
        Self {
            history: HistoryStack::with_depth(depth),
            ..Self::new()
        }
    }

    // ========================================================================
    // Command application
    // ========================================================================

    /// Apply a command. Returns false when the command was discarded because
    /// its preconditions do not hold in the current stage.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::LoadImage { width, height } => {
                self.load_image(width, height);
                true
            }
            Command::BeginWallSelection => self.begin_wall_selection(),
            Command::AddBoundaryPoint(at) => self.add_boundary_point(at),
            Command::ClearBoundaryPoints => self.clear_boundary_points(),
            Command::CommitCenter => self.commit_center(),
            Command::BeginNorthPlacement => self.begin_north_placement(),
            Command::PlaceNorth(at) => self.place_north(at),
            Command::BeginNorthDrag(at) => self.begin_north_drag(at),
            Command::DragNorth(at) => self.drag_north(at),
            Command::EndNorthDrag => self.end_north_drag(),
            Command::FixNorth => self.fix_north(),
            Command::ShowDirections => self.show_directions_cmd(),
            Command::SetRotationOffset(deg) => self.set_rotation_offset(deg),
            Command::NextStage => self.next_stage(),
            Command::PrevStage => self.prev_stage(),
            Command::SetRoomCount(area_type, count) => self.set_room_count(area_type, count),
            Command::CreateArea(area_type, index) => self.create_area(area_type, index),
            Command::MoveArea { key, top_left } => self.move_area(&key, top_left),
            Command::ResizeArea {
                key,
                corner,
                pointer,
            } => self.resize_area(&key, corner, pointer),
            Command::SetActiveArea(key) => self.set_active_area(key),
            Command::BeginAreaMove { key, pointer } => self.begin_area_move(&key, pointer),
            Command::BeginAreaResize { key, corner } => self.begin_area_resize(&key, corner),
            Command::DragAreaPointer(at) => self.drag_area_pointer(at),
            Command::EndAreaGesture => self.end_area_gesture(),
            Command::SetBrushEnabled(enabled) => {
                self.brush.enabled = enabled;
                true
            }
            Command::SetBrushColor(color) => {
                self.brush.color = color;
                true
            }
            Command::SetBrushSize(size) => {
                self.brush.size = size.clamp(BRUSH_SIZE_MIN, BRUSH_SIZE_MAX);
                true
            }
            Command::BeginBrushStroke(at) => self.begin_brush_stroke(at),
            Command::BrushMove(at) => self.brush_move(at),
            Command::EndBrushStroke => self.end_brush_stroke(),
        }
    }

    fn discard(&self, command: &str, reason: &str) -> bool {
        log::debug!("Discarding {command}: {reason}");
        false
    }

    // ========================================================================
    // Image lifecycle
    // ========================================================================

    fn load_image(&mut self, width: u32, height: u32) {
        self.image = Some(ImageSize { width, height });
        self.progress = ProgressStage::Idle;
        self.tool_stage = ToolStage::Orientation;
        self.wall_points.clear();
        self.centroid = None;
        self.show_center = false;
        self.north = None;
        self.north_fixed = false;
        self.show_directions = false;
        self.rotation_offset_deg = 0.0;
        self.overlay = brush::new_overlay(width, height);
        self.areas.clear();
        self.gesture = None;
        self.history.clear();
        self.status = Some(format!("{width}×{height}"));
        log::debug!("Loaded {width}×{height} base image, session reset");
    }

    // ========================================================================
    // Wall boundary and centroid
    // ========================================================================

    fn begin_wall_selection(&mut self) -> bool {
        if self.image.is_none() {
            return self.discard("BeginWallSelection", "no image loaded");
        }
        if !matches!(
            self.progress,
            ProgressStage::Idle | ProgressStage::WallSelecting
        ) {
            return self.discard("BeginWallSelection", "orientation already committed");
        }
        self.wall_points.clear();
        self.centroid = None;
        self.show_center = false;
        self.brush.enabled = false;
        self.progress = ProgressStage::WallSelecting;
        self.status = Some("Click to add wall boundary points".to_string());
        true
    }

    fn add_boundary_point(&mut self, at: Point) -> bool {
        if self.progress != ProgressStage::WallSelecting {
            return self.discard("AddBoundaryPoint", "not selecting a wall");
        }
        self.commit_snapshot();
        self.wall_points.push(at.rounded());
        true
    }

    fn clear_boundary_points(&mut self) -> bool {
        if self.progress != ProgressStage::WallSelecting {
            return self.discard("ClearBoundaryPoints", "not selecting a wall");
        }
        if self.wall_points.is_empty() {
            return self.discard("ClearBoundaryPoints", "no points to clear");
        }
        self.commit_snapshot();
        self.wall_points.clear();
        true
    }

    fn commit_center(&mut self) -> bool {
        if self.progress != ProgressStage::WallSelecting {
            return self.discard("CommitCenter", "not selecting a wall");
        }
        if self.wall_points.len() < MIN_BOUNDARY_POINTS {
            return self.discard("CommitCenter", "fewer than 3 boundary points");
        }
        self.commit_snapshot();
        self.wall_points = geometry::order_clockwise(&self.wall_points);
        self.centroid = geometry::centroid_or_mean(&self.wall_points);
        self.show_center = true;
        self.show_directions = false;
        self.progress = ProgressStage::CenterComputed;
        if let (Some(size), Some(c)) = (self.image, self.centroid) {
            self.status = Some(format!(
                "{}×{} • center=({},{})",
                size.width, size.height, c.x as i32, c.y as i32
            ));
        }
        true
    }

    // ========================================================================
    // North vector
    // ========================================================================

    fn begin_north_placement(&mut self) -> bool {
        if self.progress != ProgressStage::CenterComputed {
            return self.discard("BeginNorthPlacement", "centroid not committed");
        }
        self.commit_snapshot();
        self.north = None;
        self.north_fixed = false;
        self.show_directions = false;
        self.progress = ProgressStage::NorthPlacing;
        self.status = Some("Click on the image to place North, then drag to adjust".to_string());
        true
    }

    fn place_north(&mut self, at: Point) -> bool {
        if self.progress != ProgressStage::NorthPlacing {
            return self.discard("PlaceNorth", "not placing north");
        }
        if self.north_fixed {
            return self.discard("PlaceNorth", "north is fixed");
        }
        if self.north.is_some() {
            return self.discard("PlaceNorth", "north already placed; drag it instead");
        }
        self.commit_snapshot();
        self.north = Some(at);
        true
    }

    fn begin_north_drag(&mut self, at: Point) -> bool {
        if self.progress != ProgressStage::NorthPlacing || self.north_fixed {
            return self.discard("BeginNorthDrag", "north is not draggable");
        }
        let Some(north) = self.north else {
            return self.discard("BeginNorthDrag", "north not placed");
        };
        if self.gesture.is_some() {
            return self.discard("BeginNorthDrag", "another gesture is active");
        }
        self.gesture = Some(ActiveGesture {
            kind: GestureKind::NorthDrag {
                grab: (at.x - north.x, at.y - north.y),
            },
            before: self.snapshot(),
        });
        true
    }

    fn drag_north(&mut self, at: Point) -> bool {
        let grab = match &self.gesture {
            Some(ActiveGesture {
                kind: GestureKind::NorthDrag { grab },
                ..
            }) => *grab,
            _ => return self.discard("DragNorth", "no north drag in progress"),
        };
        let Some(size) = self.image else {
            return self.discard("DragNorth", "no image loaded");
        };
        self.north = Some(Point::new(
            (at.x - grab.0).clamp(0.0, size.width as f32),
            (at.y - grab.1).clamp(0.0, size.height as f32),
        ));
        true
    }

    fn end_north_drag(&mut self) -> bool {
        match self.gesture.take() {
            Some(ActiveGesture {
                kind: GestureKind::NorthDrag { .. },
                before,
            }) => {
                self.history.push(before);
                true
            }
            other => {
                self.gesture = other;
                self.discard("EndNorthDrag", "no north drag in progress")
            }
        }
    }

    fn fix_north(&mut self) -> bool {
        if self.north.is_none() {
            return self.discard("FixNorth", "north not placed");
        }
        if self.north_fixed {
            // Fixing is idempotent.
            return self.discard("FixNorth", "already fixed");
        }
        self.gesture = None;
        self.commit_snapshot();
        self.north_fixed = true;
        true
    }

    fn show_directions_cmd(&mut self) -> bool {
        if self.north.is_none() {
            return self.discard("ShowDirections", "north not placed");
        }
        self.gesture = None;
        self.commit_snapshot();
        self.show_directions = true;
        self.north_fixed = true;
        true
    }

    fn set_rotation_offset(&mut self, deg: f32) -> bool {
        if self.north.is_none() {
            return self.discard("SetRotationOffset", "north not placed");
        }
        self.commit_snapshot();
        self.rotation_offset_deg = deg;
        self.north_fixed = true;
        true
    }

    // ========================================================================
    // Tool stages
    // ========================================================================

    fn next_stage(&mut self) -> bool {
        if self.image.is_none() {
            return self.discard("NextStage", "no image loaded");
        }
        let next = self.tool_stage.next();
        if next == self.tool_stage {
            return self.discard("NextStage", "already at the last stage");
        }
        self.tool_stage = next;
        log::debug!("Tool stage -> {:?}", self.tool_stage);
        true
    }

    fn prev_stage(&mut self) -> bool {
        let back = self.tool_stage.back();
        if back == self.tool_stage {
            return self.discard("PrevStage", "already at the first stage");
        }
        self.tool_stage = back;
        log::debug!("Tool stage -> {:?}", self.tool_stage);
        true
    }

    /// Whether the current tool stage exposes controls for this area type.
    fn stage_allows(&self, area_type: AreaType) -> bool {
        if area_type.is_fixture() {
            self.tool_stage == ToolStage::Fixtures
        } else {
            self.tool_stage == ToolStage::RoomLayout
        }
    }

    // ========================================================================
    // Room planning
    // ========================================================================

    fn set_room_count(&mut self, area_type: AreaType, count: u32) -> bool {
        if !self.stage_allows(area_type) {
            return self.discard("SetRoomCount", "type not exposed in this stage");
        }
        self.room_counts.insert(area_type, count);
        true
    }

    fn create_area(&mut self, area_type: AreaType, index: u32) -> bool {
        if self.image.is_none() {
            return self.discard("CreateArea", "no image loaded");
        }
        if !self.stage_allows(area_type) {
            return self.discard("CreateArea", "type not exposed in this stage");
        }
        if index == 0 {
            return self.discard("CreateArea", "indices are 1-based");
        }
        let (width, height) = self.canvas_size();
        let key = area_key(area_type, index);
        if self.areas.get(&key).is_none() {
            let before = self.snapshot();
            self.areas
                .ensure(area_type, index, width, height, self.tool_stage.index());
            self.history.push(before);
        }
        self.areas.set_active(Some(key.as_str()));
        true
    }

    fn move_area(&mut self, key: &str, top_left: Point) -> bool {
        if self.tool_stage < ToolStage::RoomLayout {
            return self.discard("MoveArea", "areas not exposed in this stage");
        }
        if self.areas.get(key).is_none() {
            return self.discard("MoveArea", "unknown area");
        }
        self.commit_snapshot();
        self.areas.move_to(key, top_left)
    }

    fn resize_area(&mut self, key: &str, corner: Corner, pointer: Point) -> bool {
        if self.tool_stage < ToolStage::RoomLayout {
            return self.discard("ResizeArea", "areas not exposed in this stage");
        }
        if self.areas.get(key).is_none() {
            return self.discard("ResizeArea", "unknown area");
        }
        self.commit_snapshot();
        self.areas.resize(key, corner, pointer)
    }

    fn set_active_area(&mut self, key: Option<String>) -> bool {
        if self.tool_stage < ToolStage::RoomLayout {
            return self.discard("SetActiveArea", "areas not exposed in this stage");
        }
        if let Some(k) = &key
            && self.areas.get(k).is_none()
        {
            return self.discard("SetActiveArea", "unknown area");
        }
        self.areas.set_active(key.as_deref());
        true
    }

    fn begin_area_move(&mut self, key: &str, pointer: Point) -> bool {
        if self.tool_stage < ToolStage::RoomLayout {
            return self.discard("BeginAreaMove", "areas not exposed in this stage");
        }
        if self.gesture.is_some() {
            return self.discard("BeginAreaMove", "another gesture is active");
        }
        let Some(area) = self.areas.get(key) else {
            return self.discard("BeginAreaMove", "unknown area");
        };
        let top_left = area.rect.top_left();
        self.gesture = Some(ActiveGesture {
            kind: GestureKind::AreaMove {
                key: key.to_string(),
                grab: (pointer.x - top_left.x, pointer.y - top_left.y),
            },
            before: self.snapshot(),
        });
        true
    }

    fn begin_area_resize(&mut self, key: &str, corner: Corner) -> bool {
        if self.tool_stage < ToolStage::RoomLayout {
            return self.discard("BeginAreaResize", "areas not exposed in this stage");
        }
        if self.gesture.is_some() {
            return self.discard("BeginAreaResize", "another gesture is active");
        }
        if self.areas.get(key).is_none() {
            return self.discard("BeginAreaResize", "unknown area");
        }
        self.gesture = Some(ActiveGesture {
            kind: GestureKind::AreaResize {
                key: key.to_string(),
                corner,
            },
            before: self.snapshot(),
        });
        true
    }

    fn drag_area_pointer(&mut self, at: Point) -> bool {
        match &self.gesture {
            Some(ActiveGesture {
                kind: GestureKind::AreaMove { key, grab },
                ..
            }) => {
                let key = key.clone();
                let target = Point::new(at.x - grab.0, at.y - grab.1);
                self.areas.move_to(&key, target)
            }
            Some(ActiveGesture {
                kind: GestureKind::AreaResize { key, corner },
                ..
            }) => {
                let (key, corner) = (key.clone(), *corner);
                self.areas.resize(&key, corner, at)
            }
            _ => self.discard("DragAreaPointer", "no area gesture in progress"),
        }
    }

    fn end_area_gesture(&mut self) -> bool {
        match self.gesture.take() {
            Some(ActiveGesture {
                kind: GestureKind::AreaMove { .. } | GestureKind::AreaResize { .. },
                before,
            }) => {
                self.history.push(before);
                true
            }
            other => {
                self.gesture = other;
                self.discard("EndAreaGesture", "no area gesture in progress")
            }
        }
    }

    // ========================================================================
    // Free-hand brush
    // ========================================================================

    fn begin_brush_stroke(&mut self, at: Point) -> bool {
        if self.image.is_none() {
            return self.discard("BeginBrushStroke", "no image loaded");
        }
        if !self.brush.enabled {
            return self.discard("BeginBrushStroke", "brush disabled");
        }
        if self.progress == ProgressStage::WallSelecting {
            return self.discard("BeginBrushStroke", "wall selection takes pointer input");
        }
        if self.gesture.is_some() {
            return self.discard("BeginBrushStroke", "another gesture is active");
        }
        self.gesture = Some(ActiveGesture {
            kind: GestureKind::BrushStroke { last: at },
            before: self.snapshot(),
        });
        true
    }

    fn brush_move(&mut self, at: Point) -> bool {
        let Some(ActiveGesture {
            kind: GestureKind::BrushStroke { last },
            ..
        }) = &mut self.gesture
        else {
            return self.discard("BrushMove", "no brush stroke in progress");
        };
        let from = *last;
        *last = at;
        let (color, size) = (self.brush.color, self.brush.size);
        brush::stroke_segment(&mut self.overlay, from, at, color, size);
        true
    }

    fn end_brush_stroke(&mut self) -> bool {
        match self.gesture.take() {
            Some(ActiveGesture {
                kind: GestureKind::BrushStroke { .. },
                before,
            }) => {
                self.history.push(before);
                true
            }
            other => {
                self.gesture = other;
                self.discard("EndBrushStroke", "no brush stroke in progress")
            }
        }
    }

    // ========================================================================
    // Pointer adapter
    // ========================================================================

    /// Translate a raw pointer-down at image coordinates into the command
    /// the current stage calls for.
    pub fn pointer_down(&mut self, at: Point) {
        if self.progress == ProgressStage::WallSelecting {
            self.apply(Command::AddBoundaryPoint(at));
            return;
        }
        if self.progress == ProgressStage::NorthPlacing && !self.north_fixed {
            if self.north.is_none() {
                self.apply(Command::PlaceNorth(at));
            } else {
                // An existing vector is dragged, not relocated.
                self.apply(Command::BeginNorthDrag(at));
            }
            return;
        }
        if self.brush.enabled {
            self.apply(Command::BeginBrushStroke(at));
            return;
        }
        if self.tool_stage >= ToolStage::RoomLayout {
            if let Some(active) = self.areas.active().map(str::to_string)
                && let Some(area) = self.areas.get(&active)
                && let Some(corner) =
                    geometry::hit_test_resize_handle(&at, &area.rect, RESIZE_HANDLE_SIZE)
            {
                self.apply(Command::BeginAreaResize {
                    key: active,
                    corner,
                });
                return;
            }
            match self.areas.hit_test(&at).map(str::to_string) {
                Some(key) => {
                    self.apply(Command::SetActiveArea(Some(key.clone())));
                    self.apply(Command::BeginAreaMove { key, pointer: at });
                }
                None => {
                    self.apply(Command::SetActiveArea(None));
                }
            }
        }
    }

    /// Route a pointer-move to the active gesture, if any.
    pub fn pointer_move(&mut self, at: Point) {
        let command = match &self.gesture {
            None => return,
            Some(gesture) => match &gesture.kind {
                GestureKind::NorthDrag { .. } => Command::DragNorth(at),
                GestureKind::AreaMove { .. } | GestureKind::AreaResize { .. } => {
                    Command::DragAreaPointer(at)
                }
                GestureKind::BrushStroke { .. } => Command::BrushMove(at),
            },
        };
        self.apply(command);
    }

    /// Release the active gesture, committing its history snapshot.
    pub fn pointer_up(&mut self) {
        let command = match &self.gesture {
            None => return,
            Some(gesture) => match &gesture.kind {
                GestureKind::NorthDrag { .. } => Command::EndNorthDrag,
                GestureKind::AreaMove { .. } | GestureKind::AreaResize { .. } => {
                    Command::EndAreaGesture
                }
                GestureKind::BrushStroke { .. } => Command::EndBrushStroke,
            },
        };
        self.apply(command);
    }

    // ========================================================================
    // Undo / Redo
    // ========================================================================

    /// Undo the most recent committed mutation.
    pub fn undo(&mut self) -> bool {
        self.gesture = None;
        let current = self.snapshot();
        let Some(snapshot) = self.history.undo(current) else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    /// Redo the most recently undone mutation.
    pub fn redo(&mut self) -> bool {
        self.gesture = None;
        let current = self.snapshot();
        let Some(snapshot) = self.history.redo(current) else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Capture the undoable state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            show_center: self.show_center,
            north: self.north,
            north_fixed: self.north_fixed,
            wall_points: self.wall_points.clone(),
            centroid: self.centroid,
            show_directions: self.show_directions,
            rotation_offset_deg: self.rotation_offset_deg,
            overlay: self.overlay.clone(),
            areas: self.areas.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.show_center = snapshot.show_center;
        self.north = snapshot.north;
        self.north_fixed = snapshot.north_fixed;
        self.wall_points = snapshot.wall_points;
        self.centroid = snapshot.centroid;
        self.show_directions = snapshot.show_directions;
        self.rotation_offset_deg = snapshot.rotation_offset_deg;
        self.overlay = snapshot.overlay;
        self.areas = snapshot.areas;
    }

    /// Push the current state as the pre-mutation snapshot.
    fn commit_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    // ========================================================================
    // Guidance
    // ========================================================================

    /// Install a freshly loaded guidance table, or record the failure.
    ///
    /// On error the previous table stays in place and the failure shows up
    /// in the status line, per the no-partial-overwrite rule.
    pub fn install_guidance(&mut self, result: Result<GuidanceTable, GuidanceError>) -> bool {
        match result {
            Ok(table) => {
                self.status = Some(format!(
                    "Guidance loaded: {} categories, {} entries",
                    table.len(),
                    table.entry_count()
                ));
                self.guidance = table;
                true
            }
            Err(e) => {
                log::warn!("Guidance load failed: {e}");
                self.status = Some(format!("Guidance load failed: {e}"));
                false
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Base image dimensions, if an image is loaded.
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image.map(|s| (s.width, s.height))
    }

    /// Canvas dimensions: the image size, or the default canvas.
    pub fn canvas_size(&self) -> (u32, u32) {
        self.image_size()
            .unwrap_or((DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT))
    }

    /// The compass origin: the committed centroid, else the canvas center.
    pub fn compass_center(&self) -> Point {
        self.centroid.unwrap_or_else(|| {
            let (w, h) = self.canvas_size();
            Point::new((w as f32 / 2.0).round(), (h as f32 / 2.0).round())
        })
    }

    /// Planner slots `(type, 1-based index)` exposed by the current stage.
    pub fn planner_slots(&self) -> Vec<(AreaType, u32)> {
        let types: &[AreaType] = match self.tool_stage {
            ToolStage::Orientation => &[],
            ToolStage::RoomLayout => AreaType::rooms(),
            ToolStage::Fixtures => AreaType::fixtures(),
        };
        let mut slots = Vec::new();
        for &t in types {
            let count = self.room_counts.get(&t).copied().unwrap_or(0);
            for index in 1..=count {
                slots.push((t, index));
            }
        }
        slots
    }

    pub fn progress(&self) -> ProgressStage {
        self.progress
    }

    pub fn tool_stage(&self) -> ToolStage {
        self.tool_stage
    }

    pub fn wall_points(&self) -> &[Point] {
        &self.wall_points
    }

    pub fn centroid(&self) -> Option<Point> {
        self.centroid
    }

    pub fn show_center(&self) -> bool {
        self.show_center
    }

    pub fn north(&self) -> Option<Point> {
        self.north
    }

    pub fn north_fixed(&self) -> bool {
        self.north_fixed
    }

    pub fn directions_shown(&self) -> bool {
        self.show_directions
    }

    pub fn rotation_offset_deg(&self) -> f32 {
        self.rotation_offset_deg
    }

    pub fn brush(&self) -> &BrushSettings {
        &self.brush
    }

    pub fn overlay(&self) -> &RgbaImage {
        &self.overlay
    }

    pub fn areas(&self) -> &AreaRegistry {
        &self.areas
    }

    pub fn room_counts(&self) -> &BTreeMap<AreaType, u32> {
        &self.room_counts
    }

    pub fn guidance(&self) -> &GuidanceTable {
        &self.guidance
    }

    /// Latest informational status line, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compass::{CompassLabel, angle_to_compass_label};

    fn session_with_image() -> AnnotationSession {
        let mut session = AnnotationSession::new();
        session.apply(Command::LoadImage {
            width: 800,
            height: 600,
        });
        session
    }

    /// Walk the session through the 800×600 square boundary scenario.
    fn session_with_center() -> AnnotationSession {
        let mut session = session_with_image();
        assert!(session.apply(Command::BeginWallSelection));
        for (x, y) in [(100.0, 100.0), (700.0, 100.0), (700.0, 500.0), (100.0, 500.0)] {
            assert!(session.apply(Command::AddBoundaryPoint(Point::new(x, y))));
        }
        assert!(session.apply(Command::CommitCenter));
        session
    }

    #[test]
    fn test_actions_gated_by_stage() {
        let mut session = AnnotationSession::new();
        assert!(!session.apply(Command::BeginWallSelection)); // no image
        assert!(!session.apply(Command::AddBoundaryPoint(Point::new(1.0, 1.0))));
        assert!(!session.apply(Command::CommitCenter));
        assert!(!session.apply(Command::BeginNorthPlacement));
        assert!(!session.apply(Command::PlaceNorth(Point::new(1.0, 1.0))));

        let mut session = session_with_image();
        assert!(!session.apply(Command::CommitCenter)); // not selecting
        assert!(session.apply(Command::BeginWallSelection));
        assert!(!session.apply(Command::BeginNorthPlacement)); // center missing
    }

    #[test]
    fn test_commit_center_requires_three_points() {
        let mut session = session_with_image();
        session.apply(Command::BeginWallSelection);
        session.apply(Command::AddBoundaryPoint(Point::new(10.0, 10.0)));
        session.apply(Command::AddBoundaryPoint(Point::new(90.0, 10.0)));
        assert!(!session.apply(Command::CommitCenter));
        session.apply(Command::AddBoundaryPoint(Point::new(50.0, 80.0)));
        assert!(session.apply(Command::CommitCenter));
        assert_eq!(session.progress(), ProgressStage::CenterComputed);
    }

    #[test]
    fn test_square_boundary_scenario() {
        let session = session_with_center();
        assert_eq!(session.centroid(), Some(Point::new(400.0, 300.0)));
        assert!(session.show_center());
        assert_eq!(session.status(), Some("800×600 • center=(400,300)"));
    }

    #[test]
    fn test_clear_points_stays_in_wall_selection() {
        let mut session = session_with_image();
        session.apply(Command::BeginWallSelection);
        assert!(!session.apply(Command::ClearBoundaryPoints)); // nothing yet
        session.apply(Command::AddBoundaryPoint(Point::new(10.0, 10.0)));
        assert!(session.apply(Command::ClearBoundaryPoints));
        assert!(session.wall_points().is_empty());
        assert_eq!(session.progress(), ProgressStage::WallSelecting);
    }

    #[test]
    fn test_north_place_then_drag_then_fix() {
        let mut session = session_with_center();
        assert!(session.apply(Command::BeginNorthPlacement));
        session.pointer_down(Point::new(400.0, 100.0));
        assert_eq!(session.north(), Some(Point::new(400.0, 100.0)));

        // A second pointer-down starts a drag instead of relocating.
        session.pointer_down(Point::new(400.0, 100.0));
        session.pointer_move(Point::new(500.0, 150.0));
        session.pointer_up();
        assert_eq!(session.north(), Some(Point::new(500.0, 150.0)));

        // Dragging clamps to the image bounds.
        session.pointer_down(Point::new(500.0, 150.0));
        session.pointer_move(Point::new(2000.0, -50.0));
        session.pointer_up();
        assert_eq!(session.north(), Some(Point::new(800.0, 0.0)));

        assert!(session.apply(Command::FixNorth));
        assert!(session.north_fixed());
        assert!(!session.apply(Command::FixNorth)); // idempotent no-op
        session.pointer_down(Point::new(100.0, 100.0));
        session.pointer_move(Point::new(200.0, 200.0));
        session.pointer_up();
        assert_eq!(session.north(), Some(Point::new(800.0, 0.0)));
    }

    #[test]
    fn test_drag_commits_single_history_snapshot() {
        let mut session = session_with_center();
        session.apply(Command::BeginNorthPlacement);
        session.apply(Command::PlaceNorth(Point::new(400.0, 100.0)));
        let before_drag = session.snapshot();

        session.pointer_down(Point::new(400.0, 100.0));
        for i in 1..=20 {
            session.pointer_move(Point::new(400.0 + i as f32 * 5.0, 100.0));
        }
        session.pointer_up();
        assert_eq!(session.north(), Some(Point::new(500.0, 100.0)));

        // One undo rewinds the whole gesture.
        assert!(session.undo());
        assert_eq!(session.snapshot(), before_drag);
    }

    #[test]
    fn test_show_directions_forces_fixed() {
        let mut session = session_with_center();
        session.apply(Command::BeginNorthPlacement);
        session.apply(Command::PlaceNorth(Point::new(400.0, 100.0)));
        assert!(session.apply(Command::ShowDirections));
        assert!(session.directions_shown());
        assert!(session.north_fixed());
    }

    #[test]
    fn test_undo_redo_bit_for_bit() {
        let mut session = session_with_image();
        let mut states = vec![session.snapshot()];

        session.apply(Command::BeginWallSelection);
        for (x, y) in [(100.0, 100.0), (700.0, 100.0), (700.0, 500.0), (100.0, 500.0)] {
            session.apply(Command::AddBoundaryPoint(Point::new(x, y)));
            states.push(session.snapshot());
        }
        session.apply(Command::CommitCenter);
        states.push(session.snapshot());
        session.apply(Command::BeginNorthPlacement);
        states.push(session.snapshot());
        session.apply(Command::PlaceNorth(Point::new(400.0, 100.0)));
        states.push(session.snapshot());
        session.apply(Command::SetRotationOffset(15.0));
        let final_state = session.snapshot();

        // BeginWallSelection mutates without a snapshot, so the first
        // AddBoundaryPoint's pre-state differs from states[0] only in
        // transient fields outside the snapshot; every later state must
        // round-trip exactly.
        for expected in states.iter().skip(1).rev() {
            assert!(session.undo());
            assert_eq!(&session.snapshot(), expected);
        }
        for _ in 1..states.len() {
            assert!(session.redo());
        }
        assert_eq!(session.snapshot(), final_state);
        assert!(!session.redo());
    }

    #[test]
    fn test_area_lifecycle_and_gating() {
        let mut session = session_with_image();
        // Stage 1 exposes no area controls.
        assert!(!session.apply(Command::SetRoomCount(AreaType::Bedroom, 2)));
        assert!(!session.apply(Command::CreateArea(AreaType::Bedroom, 1)));

        session.apply(Command::NextStage);
        assert_eq!(session.tool_stage(), ToolStage::RoomLayout);
        assert!(session.apply(Command::SetRoomCount(AreaType::Bedroom, 2)));
        assert_eq!(
            session.planner_slots(),
            vec![(AreaType::Bedroom, 1), (AreaType::Bedroom, 2)]
        );

        assert!(session.apply(Command::CreateArea(AreaType::Bedroom, 1)));
        assert_eq!(session.areas().len(), 1);
        assert_eq!(session.areas().active(), Some("Bedroom-1"));

        // Idempotent re-create.
        assert!(session.apply(Command::CreateArea(AreaType::Bedroom, 1)));
        assert_eq!(session.areas().len(), 1);

        // Fixtures are gated to stage 3.
        assert!(!session.apply(Command::CreateArea(AreaType::GasStove, 1)));
        session.apply(Command::NextStage);
        assert!(session.apply(Command::SetRoomCount(AreaType::GasStove, 1)));
        assert!(session.apply(Command::CreateArea(AreaType::GasStove, 1)));
        assert_eq!(
            session.areas().get("GasStove-1").unwrap().stage_index,
            3
        );
    }

    #[test]
    fn test_area_creation_is_undoable() {
        let mut session = session_with_image();
        session.apply(Command::NextStage);
        session.apply(Command::CreateArea(AreaType::Hall, 1));
        assert_eq!(session.areas().len(), 1);
        assert!(session.undo());
        assert!(session.areas().is_empty());
        assert!(session.redo());
        assert_eq!(session.areas().len(), 1);
    }

    #[test]
    fn test_area_move_gesture_via_pointer() {
        let mut session = session_with_image();
        session.apply(Command::NextStage);
        session.apply(Command::CreateArea(AreaType::Bedroom, 1));
        let rect = session.areas().get("Bedroom-1").unwrap().rect;
        let inside = Point::new(rect.x + 10.0, rect.y + 10.0);

        session.apply(Command::SetActiveArea(None));
        session.pointer_down(inside);
        assert_eq!(session.areas().active(), Some("Bedroom-1"));
        session.pointer_move(Point::new(inside.x + 50.0, inside.y + 30.0));
        session.pointer_up();
        let moved = session.areas().get("Bedroom-1").unwrap().rect;
        assert_eq!(moved.x, rect.x + 50.0);
        assert_eq!(moved.y, rect.y + 30.0);

        // The whole gesture is one undo step.
        assert!(session.undo());
        assert_eq!(session.areas().get("Bedroom-1").unwrap().rect, rect);
    }

    #[test]
    fn test_area_resize_via_pointer_handle() {
        let mut session = session_with_image();
        session.apply(Command::NextStage);
        session.apply(Command::CreateArea(AreaType::Bedroom, 1));
        let rect = session.areas().get("Bedroom-1").unwrap().rect;

        let se = rect.corner(Corner::Se);
        session.pointer_down(Point::new(se.x - 2.0, se.y - 2.0));
        session.pointer_move(Point::new(se.x + 40.0, se.y + 25.0));
        session.pointer_up();
        let resized = session.areas().get("Bedroom-1").unwrap().rect;
        assert_eq!(resized.width, rect.width + 40.0);
        assert_eq!(resized.height, rect.height + 25.0);
    }

    #[test]
    fn test_pointer_down_outside_clears_selection() {
        let mut session = session_with_image();
        session.apply(Command::NextStage);
        session.apply(Command::CreateArea(AreaType::Bedroom, 1));
        assert!(session.areas().active().is_some());
        session.pointer_down(Point::new(1.0, 1.0));
        assert_eq!(session.areas().active(), None);
    }

    #[test]
    fn test_brush_stroke_is_one_history_step() {
        let mut session = session_with_image();
        session.apply(Command::SetBrushEnabled(true));
        session.apply(Command::SetBrushSize(8.0));
        let clean = session.overlay().clone();

        session.pointer_down(Point::new(50.0, 50.0));
        session.pointer_move(Point::new(120.0, 50.0));
        session.pointer_move(Point::new(120.0, 120.0));
        session.pointer_up();
        assert_ne!(session.overlay(), &clean);

        assert!(session.undo());
        assert_eq!(session.overlay(), &clean);
    }

    #[test]
    fn test_brush_size_clamped() {
        let mut session = session_with_image();
        session.apply(Command::SetBrushSize(100.0));
        assert_eq!(session.brush().size, BRUSH_SIZE_MAX);
        session.apply(Command::SetBrushSize(0.1));
        assert_eq!(session.brush().size, BRUSH_SIZE_MIN);
    }

    #[test]
    fn test_load_image_resets_session() {
        let mut session = session_with_center();
        session.apply(Command::NextStage);
        session.apply(Command::CreateArea(AreaType::Bedroom, 1));

        session.apply(Command::LoadImage {
            width: 1024,
            height: 768,
        });
        assert_eq!(session.progress(), ProgressStage::Idle);
        assert!(session.wall_points().is_empty());
        assert_eq!(session.centroid(), None);
        assert_eq!(session.north(), None);
        assert!(session.areas().is_empty());
        assert!(!session.can_undo());
        assert_eq!(session.image_size(), Some((1024, 768)));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut session = session_with_center();
        assert_eq!(session.centroid(), Some(Point::new(400.0, 300.0)));

        session.apply(Command::BeginNorthPlacement);
        session.apply(Command::PlaceNorth(Point::new(400.0, 100.0)));
        let centroid = session.centroid().unwrap();
        let north = session.north().unwrap();
        assert_eq!(
            angle_to_compass_label(centroid, Point::new(700.0, 300.0), north, 0.0),
            CompassLabel::E
        );

        session.apply(Command::ShowDirections);
        session.apply(Command::NextStage);
        session.apply(Command::CreateArea(AreaType::Bedroom, 1));
        let area_center = session.areas().get("Bedroom-1").unwrap().center();
        // Default placement centers the area on the canvas.
        assert_eq!(area_center, Point::new(400.0, 300.0));
        // Its direction is computed from the same centroid/north pair.
        let label = angle_to_compass_label(
            centroid,
            area_center,
            north,
            session.rotation_offset_deg(),
        );
        assert_eq!(label, CompassLabel::E);
    }
}
