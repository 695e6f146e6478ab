//! Procedural two-level gallery
//!
//! A walled hall with a mezzanine deck over its far end, reached by a ramp
//! along the right wall. Artwork panels hang a little in front of the walls
//! so look-at rays report them instead of the wall behind.

use std::ops::Range;

use walkthrough_core::prelude::*;

// Hall dimensions (player spawns at the origin looking down -Z)
const HALL_HALF_WIDTH: f32 = 8.0;
const HALL_BACK_Z: f32 = 4.0;
const HALL_FRONT_Z: f32 = -20.0;
const WALL_HEIGHT: f32 = 7.0;

// Mezzanine and ramp
const DECK_HEIGHT: f32 = 3.0;
const DECK_EDGE_Z: f32 = -12.0;
const RAMP_START_Z: f32 = -4.0;
const RAMP_INNER_X: f32 = 4.0;

/// Distance between a panel and the wall it hangs on
const PANEL_OFFSET: f32 = 0.02;

/// A labelled artwork and the triangles that make up its panel
#[derive(Debug, Clone)]
pub struct Artwork {
    pub name: &'static str,
    pub triangles: Range<usize>,
}

/// World geometry plus artwork labels
#[derive(Debug, Default)]
pub struct Gallery {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub artworks: Vec<Artwork>,
}

impl Gallery {
    /// Build the full gallery
    pub fn build() -> Self {
        let mut gallery = Self::default();
        let (w, back, front) = (HALL_HALF_WIDTH, HALL_BACK_Z, HALL_FRONT_Z);

        // Ground floor
        gallery.quad([
            Vec3::new(-w, 0.0, back),
            Vec3::new(w, 0.0, back),
            Vec3::new(w, 0.0, front),
            Vec3::new(-w, 0.0, front),
        ]);

        // Outer walls
        gallery.wall(Vec3::new(-w, 0.0, back), Vec3::new(-w, 0.0, front));
        gallery.wall(Vec3::new(w, 0.0, front), Vec3::new(w, 0.0, back));
        gallery.wall(Vec3::new(w, 0.0, back), Vec3::new(-w, 0.0, back));
        gallery.wall(Vec3::new(-w, 0.0, front), Vec3::new(w, 0.0, front));

        // Mezzanine deck over the far end
        gallery.quad([
            Vec3::new(-w, DECK_HEIGHT, DECK_EDGE_Z),
            Vec3::new(w, DECK_HEIGHT, DECK_EDGE_Z),
            Vec3::new(w, DECK_HEIGHT, front),
            Vec3::new(-w, DECK_HEIGHT, front),
        ]);

        // Ramp up to the deck along the right wall
        gallery.quad([
            Vec3::new(RAMP_INNER_X, 0.0, RAMP_START_Z),
            Vec3::new(w, 0.0, RAMP_START_Z),
            Vec3::new(w, DECK_HEIGHT, DECK_EDGE_Z),
            Vec3::new(RAMP_INNER_X, DECK_HEIGHT, DECK_EDGE_Z),
        ]);

        // Ground-level artwork
        gallery.artwork(
            "Harbor at Dusk",
            Vec3::new(-w + PANEL_OFFSET, 1.0, -2.0),
            Vec3::new(0.0, 0.0, -3.0),
            1.6,
        );
        gallery.artwork(
            "Three Figures",
            Vec3::new(-2.0, 0.8, front + PANEL_OFFSET),
            Vec3::new(4.0, 0.0, 0.0),
            1.8,
        );

        // Upper-level artwork, above the deck
        gallery.artwork(
            "Untitled (Blue)",
            Vec3::new(-2.5, DECK_HEIGHT + 1.0, front + PANEL_OFFSET),
            Vec3::new(5.0, 0.0, 0.0),
            2.2,
        );
        gallery.artwork(
            "Orchard",
            Vec3::new(-w + PANEL_OFFSET, DECK_HEIGHT + 1.0, -14.0),
            Vec3::new(0.0, 0.0, -4.0),
            1.5,
        );

        gallery
    }

    /// Collision triangles for the whole gallery
    pub fn triangles(&self) -> Vec<Triangle> {
        let (triangles, skipped) = triangles_from_indexed(&self.vertices, &self.indices);
        if skipped > 0 {
            log::warn!("Gallery mesh had {} broken triangles", skipped);
        }
        triangles
    }

    /// Artwork owning a triangle, if any
    pub fn artwork_for(&self, triangle_index: usize) -> Option<&Artwork> {
        self.artworks.iter().find(|art| art.triangles.contains(&triangle_index))
    }

    fn artwork(&mut self, name: &'static str, bottom_left: Vec3, width: Vec3, height: f32) {
        let up = Vec3::new(0.0, height, 0.0);
        let top_left = bottom_left + up;
        let triangles = self.quad([bottom_left, bottom_left + width, top_left + width, top_left]);
        self.artworks.push(Artwork { name, triangles });
    }

    fn wall(&mut self, from: Vec3, to: Vec3) {
        let up = Vec3::new(0.0, WALL_HEIGHT, 0.0);
        self.quad([from, to, to + up, from + up]);
    }

    /// Append a quad as two triangles; returns their triangle index range
    fn quad(&mut self, corners: [Vec3; 4]) -> Range<usize> {
        let base = self.vertices.len() as u32;
        let first = self.indices.len() / 3;
        self.vertices.extend_from_slice(&corners);
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        first..first + 2
    }
}
