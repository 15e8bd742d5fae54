//! Per-area direction resolution and the flattened report record set.
//!
//! The report renderer is an external consumer: it receives one resolved
//! record per area plus session-level facts, and owns all document layout.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::compass::{CompassLabel, angle_to_compass_label};
use crate::geometry::Point;
use crate::guidance::GuidanceTable;
use crate::model::{Area, AreaType};
use crate::session::AnnotationSession;

/// One resolved record per placed area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    /// Area type.
    #[serde(rename = "type")]
    pub area_type: AreaType,
    /// Registry key (`Bedroom-1`).
    pub key: String,
    /// Resolved compass direction; reported as `-` when the compass frame
    /// is incomplete.
    #[serde(serialize_with = "serialize_direction")]
    pub resolved_direction: Option<CompassLabel>,
    /// Effects from the guidance table; empty when no entry matched.
    pub effect: Vec<String>,
    /// Primary remedies from the guidance table; empty when no entry
    /// matched.
    pub remedies_primary: Vec<String>,
}

impl ReportRecord {
    /// Direction text as shown to the user (`-` when undefined).
    pub fn direction_text(&self) -> &str {
        self.resolved_direction.map_or("-", |label| label.as_str())
    }
}

fn serialize_direction<S: Serializer>(
    direction: &Option<CompassLabel>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(direction.map_or("-", |label| label.as_str()))
}

/// The full record set handed to the report renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    /// Whether a north vector exists in the session.
    pub has_north: bool,
    /// Planned counts per room/fixture type.
    pub room_counts: BTreeMap<AreaType, u32>,
    /// One record per placed area, in creation order.
    pub records: Vec<ReportRecord>,
}

/// Resolve the compass direction of one area's rectangle center.
///
/// Undefined unless both a centroid and a north vector exist.
pub fn resolve_area_direction(
    area: &Area,
    centroid: Option<Point>,
    north: Option<Point>,
    rotation_offset_deg: f32,
) -> Option<CompassLabel> {
    let centroid = centroid?;
    let north = north?;
    Some(angle_to_compass_label(
        centroid,
        area.center(),
        north,
        rotation_offset_deg,
    ))
}

/// Build the report record set from the session and its guidance table.
///
/// A missing guidance entry leaves the effect and remedy lists empty; the
/// area still reports its resolved direction.
pub fn build_report(session: &AnnotationSession) -> SessionReport {
    build_report_with(session, session.guidance())
}

/// As [`build_report`] but resolving against an explicit table.
pub fn build_report_with(session: &AnnotationSession, table: &GuidanceTable) -> SessionReport {
    let centroid = session.centroid();
    let north = session.north();
    let rotation = session.rotation_offset_deg();

    let records = session
        .areas()
        .iter()
        .map(|area| {
            let direction = resolve_area_direction(area, centroid, north, rotation);
            let entry = direction.and_then(|label| table.lookup(area.area_type, label));
            ReportRecord {
                area_type: area.area_type,
                key: area.key.clone(),
                resolved_direction: direction,
                effect: entry.map(|e| e.effect.clone()).unwrap_or_default(),
                remedies_primary: entry.map(|e| e.remedies_primary.clone()).unwrap_or_default(),
            }
        })
        .collect();

    SessionReport {
        has_north: north.is_some(),
        room_counts: session.room_counts().clone(),
        records,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidance::GuidanceEntry;
    use crate::session::Command;

    /// Session with the 800×600 square boundary, centroid (400,300) and
    /// north straight up at (400,100).
    fn oriented_session() -> AnnotationSession {
        let mut session = AnnotationSession::new();
        session.apply(Command::LoadImage {
            width: 800,
            height: 600,
        });
        session.apply(Command::BeginWallSelection);
        for (x, y) in [(100.0, 100.0), (700.0, 100.0), (700.0, 500.0), (100.0, 500.0)] {
            session.apply(Command::AddBoundaryPoint(Point::new(x, y)));
        }
        session.apply(Command::CommitCenter);
        session.apply(Command::BeginNorthPlacement);
        session.apply(Command::PlaceNorth(Point::new(400.0, 100.0)));
        session.apply(Command::ShowDirections);
        session
    }

    #[test]
    fn test_direction_undefined_without_compass_frame() {
        let mut session = AnnotationSession::new();
        session.apply(Command::LoadImage {
            width: 800,
            height: 600,
        });
        session.apply(Command::NextStage);
        session.apply(Command::CreateArea(AreaType::Bedroom, 1));

        let report = build_report(&session);
        assert!(!report.has_north);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].resolved_direction, None);
        assert_eq!(report.records[0].direction_text(), "-");
    }

    #[test]
    fn test_area_east_of_centroid_resolves_east() {
        let mut session = oriented_session();
        session.apply(Command::NextStage);
        session.apply(Command::CreateArea(AreaType::Bedroom, 1));
        // Rect is 120×72; put its center at (640, 300), due east.
        session.apply(Command::MoveArea {
            key: "Bedroom-1".to_string(),
            top_left: Point::new(580.0, 264.0),
        });

        let report = build_report(&session);
        assert!(report.has_north);
        assert_eq!(
            report.records[0].resolved_direction,
            Some(CompassLabel::E)
        );
    }

    #[test]
    fn test_missing_guidance_entry_keeps_direction() {
        let mut session = oriented_session();
        session.apply(Command::NextStage);
        session.apply(Command::NextStage);
        session.apply(Command::SetRoomCount(AreaType::GasStove, 1));
        session.apply(Command::CreateArea(AreaType::GasStove, 1));
        // Center at (240, 140): north-west of the centroid.
        session.apply(Command::MoveArea {
            key: "GasStove-1".to_string(),
            top_left: Point::new(180.0, 104.0),
        });

        // kitchen has entries, but none for NW.
        let mut table = GuidanceTable::new();
        table.insert(
            "kitchen",
            CompassLabel::Se,
            GuidanceEntry {
                zone: "Best".into(),
                effect: vec!["prosperity".into()],
                ..GuidanceEntry::default()
            },
        );
        session.install_guidance(Ok(table));

        let report = build_report(&session);
        let record = &report.records[0];
        assert_eq!(record.resolved_direction, Some(CompassLabel::Nw));
        assert!(record.effect.is_empty());
        assert!(record.remedies_primary.is_empty());
    }

    #[test]
    fn test_matched_guidance_entry_fills_lists() {
        let mut session = oriented_session();
        session.apply(Command::NextStage);
        session.apply(Command::CreateArea(AreaType::Bedroom, 1));
        session.apply(Command::MoveArea {
            key: "Bedroom-1".to_string(),
            top_left: Point::new(580.0, 264.0),
        });
        session.apply(Command::SetRoomCount(AreaType::Bedroom, 1));

        let mut table = GuidanceTable::new();
        table.insert(
            "bedroom",
            CompassLabel::E,
            GuidanceEntry {
                zone: "Good".into(),
                effect: vec!["sound sleep".into()],
                remedies_primary: vec!["light colors".into()],
                ..GuidanceEntry::default()
            },
        );
        session.install_guidance(Ok(table));

        let report = build_report(&session);
        let record = &report.records[0];
        assert_eq!(record.effect, vec!["sound sleep"]);
        assert_eq!(record.remedies_primary, vec!["light colors"]);
        assert_eq!(report.room_counts.get(&AreaType::Bedroom), Some(&1));
    }

    #[test]
    fn test_report_serializes_direction_as_text() {
        let mut session = oriented_session();
        session.apply(Command::NextStage);
        session.apply(Command::CreateArea(AreaType::Bedroom, 1));
        session.apply(Command::MoveArea {
            key: "Bedroom-1".to_string(),
            top_left: Point::new(580.0, 264.0),
        });

        let json = serde_json::to_value(build_report(&session)).unwrap();
        assert_eq!(json["records"][0]["resolved_direction"], "E");
        assert_eq!(json["records"][0]["type"], "Bedroom");
        assert_eq!(json["has_north"], true);
    }
}
