//! Pure geometry helpers over flattened `[x0, y0, x1, y1, ...]` coordinate lists.

use crate::model::AnnotationGroup;

/// Euclidean distance between two points.
pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Scale a flat point list: even entries by `scale_x`, odd entries by `scale_y`.
pub fn rescale(points: &[f32], scale_x: f32, scale_y: f32) -> Vec<f32> {
    points
        .iter()
        .enumerate()
        .map(|(i, v)| if i % 2 == 0 { v * scale_x } else { v * scale_y })
        .collect()
}

/// Scale the region and direction of every group.
pub fn rescale_groups(groups: &[AnnotationGroup], scale_x: f32, scale_y: f32) -> Vec<AnnotationGroup> {
    groups
        .iter()
        .map(|group| AnnotationGroup {
            kind: group.kind.clone(),
            points: rescale(&group.points, scale_x, scale_y),
            direction: rescale(&group.direction, scale_x, scale_y),
        })
        .collect()
}

/// Convert groups expressed in fractions of the surface (0..1) into absolute pixels.
pub fn fraction_to_absolute(groups: &[AnnotationGroup], width: f32, height: f32) -> Vec<AnnotationGroup> {
    rescale_groups(groups, width, height)
}

/// Read the `index`-th point of a flat list.
pub fn point_at(points: &[f32], index: usize) -> Option<(f32, f32)> {
    let x = *points.get(index * 2)?;
    let y = *points.get(index * 2 + 1)?;
    Some((x, y))
}

/// Shift every point in a flat list by `(dx, dy)`.
pub fn translate(points: &[f32], dx: f32, dy: f32) -> Vec<f32> {
    points
        .iter()
        .enumerate()
        .map(|(i, v)| if i % 2 == 0 { v + dx } else { v + dy })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert!((distance(0.0, 0.0, 3.0, 4.0) - 5.0).abs() < 0.001);
        assert_eq!(distance(7.0, 7.0, 7.0, 7.0), 0.0);
    }

    #[test]
    fn test_rescale_axes_independently() {
        let scaled = rescale(&[10.0, 20.0, 30.0, 40.0], 2.0, 0.5);
        assert_eq!(scaled, vec![20.0, 10.0, 60.0, 20.0]);
    }

    #[test]
    fn test_rescale_empty() {
        assert!(rescale(&[], 3.0, 3.0).is_empty());
    }

    #[test]
    fn test_fraction_to_absolute() {
        let groups = vec![AnnotationGroup {
            kind: Some("lane".to_string()),
            points: vec![0.0, 0.0, 0.5, 0.0, 0.5, 0.5, 0.0, 0.5],
            direction: vec![0.25, 0.25, 0.75, 0.25],
        }];
        let converted = fraction_to_absolute(&groups, 200.0, 100.0);
        assert_eq!(converted[0].points, vec![0.0, 0.0, 100.0, 0.0, 100.0, 50.0, 0.0, 50.0]);
        assert_eq!(converted[0].direction, vec![50.0, 25.0, 150.0, 25.0]);
        assert_eq!(converted[0].kind.as_deref(), Some("lane"));
        // Input is left untouched
        assert_eq!(groups[0].points[2], 0.5);
    }

    #[test]
    fn test_point_at_and_translate() {
        let points = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(point_at(&points, 1), Some((3.0, 4.0)));
        assert_eq!(point_at(&points, 2), None);
        assert_eq!(translate(&points, 10.0, -1.0), vec![11.0, 1.0, 13.0, 3.0]);
    }
}
