//! Narrow-phase capsule versus triangle test
//!
//! Given one capsule and one triangle, computes the penetration the
//! resolver needs: a unit contact normal pointing into free space and a
//! non-negative depth. Contacts are found in two regions:
//!
//! - **Face**: a segment endpoint in front of the face projects inside the
//!   triangle, or the segment pierces it. The normal is the triangle normal,
//!   flipped when the segment starts behind the face.
//! - **Edge**: otherwise the nearest point pair between the segment and the
//!   three triangle edges (vertices included) decides, and the normal runs
//!   from the edge to the segment.

use crate::foundation::math::{Vec3, EPSILON};
use crate::physics::collision::{Capsule, Triangle};

/// Distance beyond the radius that still counts as touching
///
/// Keeps a capsule that was pushed out to exactly `radius` in contact
/// despite rounding, so a resting player stays on the floor.
pub const CONTACT_SLOP: f32 = 1e-4;

/// Penetration of a capsule into world geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit push-out direction, pointing away from the geometry
    pub normal: Vec3,
    /// How far the capsule must move along `normal` to stop penetrating
    pub depth: f32,
    /// Contact point on the triangle
    pub point: Vec3,
}

impl Contact {
    /// Whether the contact surface faces upward (floor rather than wall or ceiling)
    pub fn is_floor(&self) -> bool {
        self.normal.y > 0.0
    }

    /// Displacement that resolves this contact
    pub fn correction(&self) -> Vec3 {
        self.normal * self.depth
    }
}

/// Test a capsule against a single triangle
///
/// Returns `None` when they are separated by more than the radius, and for
/// degenerate triangles.
pub fn capsule_triangle(capsule: &Capsule, triangle: &Triangle) -> Option<Contact> {
    let face_normal = triangle.try_normal()?;
    let radius = capsule.radius();
    let reach = radius + CONTACT_SLOP;
    let start = capsule.start();
    let end = capsule.end();

    let start_dist = face_normal.dot(&(start - triangle.v0));
    let end_dist = face_normal.dot(&(end - triangle.v0));

    // Orient the plane toward the side the segment starts on
    let (normal, start_dist, end_dist) = if start_dist < 0.0 {
        (-face_normal, -start_dist, -end_dist)
    } else {
        (face_normal, start_dist, end_dist)
    };

    if start_dist > reach && end_dist > reach {
        return None;
    }

    let face = face_region(triangle, normal, start, end, start_dist, end_dist)
        .filter(|(dist, _)| *dist <= reach);

    let edge = edge_region(triangle, start, end).filter(|(dist, _, _)| *dist <= reach);

    match (face, edge) {
        (Some((face_dist, point)), Some((edge_dist, _, _))) if face_dist <= edge_dist => {
            Some(face_contact(normal, radius, face_dist, point))
        }
        (Some((face_dist, point)), None) => Some(face_contact(normal, radius, face_dist, point)),
        (_, Some((dist, seg_point, edge_point))) if dist > EPSILON => Some(Contact {
            normal: (seg_point - edge_point) / dist,
            depth: (radius - dist).max(0.0),
            point: edge_point,
        }),
        // Segment runs through an edge: clear the whole segment off the plane
        (_, Some((_, _, edge_point))) => Some(Contact {
            normal,
            depth: radius - end_dist.min(0.0),
            point: edge_point,
        }),
        (None, None) => None,
    }
}

fn face_contact(normal: Vec3, radius: f32, dist: f32, point: Vec3) -> Contact {
    Contact {
        normal,
        depth: (radius - dist).max(0.0),
        point,
    }
}

/// Smallest signed plane distance among segment points that lie over the face
///
/// Only endpoints on the front side count. A negative distance is reported
/// only when the segment pierces the triangle itself; a segment crossing the
/// plane outside the triangle is left to the edge region.
fn face_region(
    triangle: &Triangle,
    normal: Vec3,
    start: Vec3,
    end: Vec3,
    start_dist: f32,
    end_dist: f32,
) -> Option<(f32, Vec3)> {
    // start_dist is non-negative after orientation, so a negative end means
    // the segment passes through the plane
    if end_dist < 0.0 {
        let t = start_dist / (start_dist - end_dist);
        let crossing = start + (end - start) * t;
        if triangle.contains_point(crossing) {
            return Some((end_dist, crossing));
        }
    }

    [(start, start_dist), (end, end_dist)]
        .into_iter()
        .filter(|&(_, dist)| dist >= 0.0)
        .map(|(point, dist)| (dist, point - normal * dist))
        .filter(|&(_, projected)| triangle.contains_point(projected))
        .min_by(|a, b| a.0.total_cmp(&b.0))
}

/// Nearest (distance, segment point, edge point) over the three edges
fn edge_region(triangle: &Triangle, start: Vec3, end: Vec3) -> Option<(f32, Vec3, Vec3)> {
    triangle
        .edges()
        .iter()
        .map(|&(a, b)| {
            let (seg_point, edge_point) = closest_points_between_segments(start, end, a, b);
            ((seg_point - edge_point).magnitude(), seg_point, edge_point)
        })
        .min_by(|x, y| x.0.total_cmp(&y.0))
}

/// Closest points between segments `p1-q1` and `p2-q2`
///
/// Returns the point on the first segment and the point on the second.
/// Follows Ericson, *Real-Time Collision Detection*, section 5.1.9.
pub fn closest_points_between_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(&d1);
    let e = d2.dot(&d2);
    let f = d2.dot(&r);

    if a <= EPSILON && e <= EPSILON {
        return (p1, p2);
    }

    let (s, t) = if a <= EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;

            // Parallel segments: any s works, pick the start
            let s = if denom > f32::EPSILON * a * e {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let t = (b * s + f) / e;
            if t < 0.0 {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else if t > 1.0 {
                (((b - c) / a).clamp(0.0, 1.0), 1.0)
            } else {
                (s, t)
            }
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}
