//! Commands applied to an annotation session.
//!
//! Every user action is an explicit command; the session validates each one
//! against the current stage and silently discards commands whose
//! preconditions do not hold.

use crate::geometry::{Corner, Point};
use crate::model::AreaType;

/// Commands that mutate annotation state.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Image lifecycle
    /// A new base image was decoded; resets the annotation state.
    LoadImage { width: u32, height: u32 },

    // Orientation: wall boundary and centroid
    /// Enter wall selection, clearing any prior boundary.
    BeginWallSelection,
    /// Append a boundary point at the clicked position.
    AddBoundaryPoint(Point),
    /// Clear all boundary points while staying in wall selection.
    ClearBoundaryPoints,
    /// Order the boundary clockwise, compute the centroid and freeze the
    /// boundary.
    CommitCenter,

    // Orientation: north vector
    /// Enter north placement; the next click places the vector.
    BeginNorthPlacement,
    /// Place the north vector at the clicked position.
    PlaceNorth(Point),
    /// Start dragging the existing north vector from the grab position.
    BeginNorthDrag(Point),
    /// Drag the north vector; clamped to image bounds.
    DragNorth(Point),
    /// Release the north drag, committing one history snapshot.
    EndNorthDrag,
    /// Lock the north vector against further dragging.
    FixNorth,
    /// Reveal the 16-direction compass (implies fixing north).
    ShowDirections,
    /// Apply a rotation offset to all compass sectors (implies fixing
    /// north).
    SetRotationOffset(f32),

    // Tool stages
    /// Advance to the next tool stage.
    NextStage,
    /// Return to the previous tool stage.
    PrevStage,

    // Room planning
    /// Set the planned count for a room or fixture type.
    SetRoomCount(AreaType, u32),
    /// Create (or re-activate) the area for a planner slot.
    CreateArea(AreaType, u32),
    /// Translate an area to a new top-left corner.
    MoveArea { key: String, top_left: Point },
    /// Resize an area by one corner toward the pointer position.
    ResizeArea {
        key: String,
        corner: Corner,
        pointer: Point,
    },
    /// Change the active area selection.
    SetActiveArea(Option<String>),
    /// Start dragging an area from the grab position.
    BeginAreaMove { key: String, pointer: Point },
    /// Start resizing an area by the given corner handle.
    BeginAreaResize { key: String, corner: Corner },
    /// Drag update for an active area move/resize gesture.
    DragAreaPointer(Point),
    /// Release the area gesture, committing one history snapshot.
    EndAreaGesture,

    // Free-hand brush
    /// Toggle the brush tool.
    SetBrushEnabled(bool),
    /// Change the brush color (RGBA).
    SetBrushColor([u8; 4]),
    /// Change the brush stroke width (clamped to the supported range).
    SetBrushSize(f32),
    /// Start a brush stroke at the pointer position.
    BeginBrushStroke(Point),
    /// Extend the active brush stroke to the pointer position.
    BrushMove(Point),
    /// Release the brush stroke, committing one history snapshot.
    EndBrushStroke,
}
