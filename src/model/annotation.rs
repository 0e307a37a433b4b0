//! Annotation group types and identifiers.

use serde::{Deserialize, Serialize};

use crate::constants::ARROW_POINTS;

/// Identifier of a rendered group in the editor's scene arena.
pub type GroupId = u32;

/// Identifier of a resize handle in the editor's handle table.
pub type HandleId = u32;

/// Which half of an annotation group is being authored or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeCategory {
    /// The closed region polygon
    Polygon,
    /// The direction arrow
    Arrow,
}

impl ShapeCategory {
    /// Get the display name for this category.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeCategory::Polygon => "Polygon",
            ShapeCategory::Arrow => "Arrow",
        }
    }
}

/// A committed annotation: a closed region paired with a direction arrow.
///
/// Coordinates are flattened `(x, y)` pairs in absolute surface pixels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationGroup {
    /// Application-defined type tag
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Polygon vertices
    #[serde(default)]
    pub points: Vec<f32>,
    /// Arrow start and end; empty until the arrow is confirmed
    #[serde(default)]
    pub direction: Vec<f32>,
}

impl AnnotationGroup {
    /// Create a group holding only its region.
    pub fn with_region(kind: Option<String>, points: Vec<f32>) -> Self {
        Self {
            kind,
            points,
            direction: Vec::new(),
        }
    }

    /// Whether both halves of the group are present.
    pub fn is_complete(&self) -> bool {
        !self.points.is_empty() && self.direction.len() == ARROW_POINTS * 2
    }

    /// Get the coordinates for one half of the group.
    pub fn geometry(&self, category: ShapeCategory) -> &[f32] {
        match category {
            ShapeCategory::Polygon => &self.points,
            ShapeCategory::Arrow => &self.direction,
        }
    }

    /// Replace the coordinates of one half of the group.
    pub fn set_geometry(&mut self, category: ShapeCategory, points: Vec<f32>) {
        match category {
            ShapeCategory::Polygon => self.points = points,
            ShapeCategory::Arrow => self.direction = points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_serializes_type_field() {
        let group = AnnotationGroup {
            kind: Some("entry".to_string()),
            points: vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0],
            direction: vec![1.0, 1.0, 8.0, 1.0],
        };
        let json = serde_json::to_string(&group).expect("serialize");
        assert!(json.contains("\"type\":\"entry\""));

        let back: AnnotationGroup = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, group);
    }

    #[test]
    fn test_missing_direction_defaults_empty() {
        let group: AnnotationGroup =
            serde_json::from_str(r#"{"type":null,"points":[0,0,4,0,4,4]}"#).expect("deserialize");
        assert!(group.kind.is_none());
        assert!(group.direction.is_empty());
        assert!(!group.is_complete());
    }

    #[test]
    fn test_geometry_by_category() {
        let mut group = AnnotationGroup::with_region(None, vec![1.0, 2.0]);
        group.set_geometry(ShapeCategory::Arrow, vec![0.0, 0.0, 9.0, 0.0]);
        assert_eq!(group.geometry(ShapeCategory::Polygon), &[1.0, 2.0]);
        assert_eq!(group.geometry(ShapeCategory::Arrow), &[0.0, 0.0, 9.0, 0.0]);
        assert!(group.is_complete());
    }
}
