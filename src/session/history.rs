//! Snapshot-based undo/redo for the annotation session.
//!
//! Each committed mutation pushes the pre-mutation snapshot; undo restores
//! it and parks the current state on the redo stack. Drag gestures snapshot
//! once per gesture (on release), not per intermediate move.

use image::RgbaImage;

use crate::constants::DEFAULT_UNDO_DEPTH;
use crate::geometry::Point;
use crate::model::AreaRegistry;

/// An immutable copy of the undoable annotation state.
///
/// Tool and progress stages are deliberately not part of the snapshot:
/// undo rewinds what is on the canvas, not which controls are exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub show_center: bool,
    pub north: Option<Point>,
    pub north_fixed: bool,
    pub wall_points: Vec<Point>,
    pub centroid: Option<Point>,
    pub show_directions: bool,
    pub rotation_offset_deg: f32,
    /// Free-hand brush overlay pixels.
    pub overlay: RgbaImage,
    /// Placed areas including the active selection.
    pub areas: AreaRegistry,
}

/// The undo/redo history.
///
/// Depth is capped (oldest snapshots dropped first); the default cap is
/// [`DEFAULT_UNDO_DEPTH`].
#[derive(Debug, Clone)]
pub struct HistoryStack {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStack {
    /// Create an empty history with the default depth cap.
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_UNDO_DEPTH)
    }

    /// Create an empty history with a custom depth cap.
    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Push a pre-mutation snapshot. Clears the redo stack.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pop the snapshot to restore for undo, parking `current` for redo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(snapshot)
    }

    /// Pop the snapshot to restore for redo, parking `current` for undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(snapshot)
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Number of snapshots available to undo.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of snapshots available to redo.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
