//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in canvas coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, with_alpha};

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    annulus(center, inner_radius, outer_radius, color, color, segments)
}

/// Ring whose color blends from `inner_color` to `outer_color` across its width
fn annulus(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    inner_color: [f32; 4],
    outer_color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, inner_color));
        vertices.push(Vertex::new(outer1.x, outer1.y, outer_color));
        vertices.push(Vertex::new(inner2.x, inner2.y, inner_color));

        vertices.push(Vertex::new(inner2.x, inner2.y, inner_color));
        vertices.push(Vertex::new(outer1.x, outer1.y, outer_color));
        vertices.push(Vertex::new(outer2.x, outer2.y, outer_color));
    }

    vertices
}

/// Radial gradient disc. `stops` are `(offset, color)` with offsets in 0..=1
/// of `radius`, ascending; the first stop is stretched to the center.
pub fn radial_gradient(
    center: Vec2,
    radius: f32,
    stops: &[(f32, [f32; 4])],
    segments: u32,
) -> Vec<Vertex> {
    let Some(&(_, first)) = stops.first() else {
        return Vec::new();
    };

    let mut vertices = Vec::new();
    let mut inner_r = 0.0;
    let mut inner_color = first;
    for &(offset, color) in stops {
        let outer_r = offset.clamp(0.0, 1.0) * radius;
        if outer_r > inner_r {
            if inner_r == 0.0 {
                vertices.extend(fan(center, outer_r, inner_color, color, segments));
            } else {
                vertices.extend(annulus(center, inner_r, outer_r, inner_color, color, segments));
            }
        }
        inner_r = outer_r;
        inner_color = color;
    }
    vertices
}

/// Soft halo: `color` at the center fading to transparent at `radius`
pub fn glow(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let alpha = color[3];
    radial_gradient(
        center,
        radius,
        &[
            (0.0, color),
            (0.5, with_alpha(color, alpha * 0.4)),
            (1.0, with_alpha(color, 0.0)),
        ],
        segments,
    )
}

fn fan(
    center: Vec2,
    radius: f32,
    center_color: [f32; 4],
    edge_color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        vertices.push(Vertex::new(center.x, center.y, center_color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            edge_color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            edge_color,
        ));
    }
    vertices
}

/// Axis-aligned filled rectangle
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> Vec<Vertex> {
    quad(
        Vec2::new(x, y),
        Vec2::new(x + w, y),
        Vec2::new(x + w, y + h),
        Vec2::new(x, y + h),
        [color; 4],
    )
}

/// Rectangle outline of `width`, centered on the rectangle's edges
pub fn rect_outline(x: f32, y: f32, w: f32, h: f32, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = width / 2.0;
    let mut vertices = Vec::with_capacity(24);
    // Top and bottom span the corners; sides fill between them
    vertices.extend(rect(x - half, y - half, w + width, width, color));
    vertices.extend(rect(x - half, y + h - half, w + width, width, color));
    vertices.extend(rect(x - half, y + half, width, h - width, color));
    vertices.extend(rect(x + w - half, y + half, width, h - width, color));
    vertices
}

/// Rectangle with a vertical gradient; `stops` as in `radial_gradient`
pub fn vertical_gradient(x: f32, y: f32, w: f32, h: f32, stops: &[(f32, [f32; 4])]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        let y0 = y + t0 * h;
        let y1 = y + t1 * h;
        if y1 <= y0 {
            continue;
        }
        vertices.extend(quad(
            Vec2::new(x, y0),
            Vec2::new(x + w, y0),
            Vec2::new(x + w, y1),
            Vec2::new(x, y1),
            [c0, c0, c1, c1],
        ));
    }
    vertices
}

/// Thick line segment
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(from + perp, to + perp, to - perp, from - perp, [color; 4])
}

/// Connected thick line through `points`
pub fn polyline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len().saturating_sub(1) * 6 + points.len() * 24);
    for pair in points.windows(2) {
        vertices.extend(line(pair[0], pair[1], width, color));
    }
    // Round joints so segments don't show gaps at bends
    for &p in points.iter().skip(1).take(points.len().saturating_sub(2)) {
        vertices.extend(circle(p, width / 2.0, color, 8));
    }
    vertices
}

fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, colors: [[f32; 4]; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, colors[0]),
        Vertex::new(b.x, b.y, colors[1]),
        Vertex::new(c.x, c.y, colors[2]),
        Vertex::new(a.x, a.y, colors[0]),
        Vertex::new(c.x, c.y, colors[2]),
        Vertex::new(d.x, d.y, colors[3]),
    ]
}
