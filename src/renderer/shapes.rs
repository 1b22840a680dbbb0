//! Line tessellation

use glam::Vec2;

use super::vertex::Vertex;

/// Thick polyline as a triangle list
///
/// Each segment becomes a quad whose ends take the color of the matching
/// point, so opacity and the head highlight fade smoothly along the line.
/// Segments with both endpoints fully transparent are skipped.
pub fn line_strip(points: &[Vec2], colors: &[[f32; 4]], width: f32) -> Vec<Vertex> {
    let count = points.len().min(colors.len());
    if count < 2 || width <= 0.0 {
        return Vec::new();
    }

    let half = width / 2.0;
    let mut vertices = Vec::with_capacity((count - 1) * 6);

    for i in 0..count - 1 {
        let (p1, p2) = (points[i], points[i + 1]);
        let (c1, c2) = (colors[i], colors[i + 1]);
        if c1[3] <= 0.0 && c2[3] <= 0.0 {
            continue;
        }

        // Direction from p1 to p2
        let dir = (p2 - p1).normalize_or_zero();
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x) * half;

        // Quad corners
        let v1a = p1 + perp;
        let v1b = p1 - perp;
        let v2a = p2 + perp;
        let v2b = p2 - perp;

        // Two triangles
        vertices.push(Vertex::new(v1a.x, v1a.y, c1));
        vertices.push(Vertex::new(v1b.x, v1b.y, c1));
        vertices.push(Vertex::new(v2a.x, v2a.y, c2));

        vertices.push(Vertex::new(v2a.x, v2a.y, c2));
        vertices.push(Vertex::new(v1b.x, v1b.y, c1));
        vertices.push(Vertex::new(v2b.x, v2b.y, c2));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const ON: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    const OFF: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

    #[test]
    fn test_horizontal_segment_quad() {
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        let verts = line_strip(&points, &[ON, ON], 4.0);
        assert_eq!(verts.len(), 6);
        assert_eq!(verts[0].position, [0.0, 2.0]);
        assert_eq!(verts[1].position, [0.0, -2.0]);
        assert_eq!(verts[5].position, [10.0, -2.0]);
    }

    #[test]
    fn test_hidden_segments_skipped() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 0.0),
        ];
        let verts = line_strip(&points, &[OFF, OFF, ON, ON], 1.0);
        // Segment 1-2 fades in, segment 2-3 is solid
        assert_eq!(verts.len(), 12);
        assert_eq!(verts[0].color, OFF);
        assert_eq!(verts[2].color, ON);
    }

    #[test]
    fn test_degenerate_input() {
        assert!(line_strip(&[], &[], 3.0).is_empty());
        assert!(line_strip(&[Vec2::ZERO], &[ON], 3.0).is_empty());
        let points = [Vec2::ZERO, Vec2::X];
        assert!(line_strip(&points, &[ON, ON], 0.0).is_empty());
        // Mismatched lengths use the shorter one
        assert!(line_strip(&points, &[ON], 1.0).is_empty());
    }
}
