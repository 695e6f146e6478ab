//! Gallery Walkthrough Demo
//!
//! Headless tour of a procedural two-level gallery:
//! - Spawns the player on the ground floor
//! - Plays a scripted key timeline at a fixed 60 Hz frame rate
//! - Walks to the ramp, runs up to the mezzanine, jumps, and looks around
//! - Logs the camera path and whichever artwork the player is looking at
//!
//! Usage: `gallery_walkthrough [config.toml | config.ron]`
//!
//! Set `RUST_LOG=debug` (or `trace`) for frame clamping and floor contact logs.

mod gallery;

use std::f32::consts::{FRAC_PI_2, PI};

use thiserror::Error;
use walkthrough_core::foundation::logging;
use walkthrough_core::prelude::*;

use gallery::Gallery;

const FRAME_TIME: f32 = 1.0 / 60.0;
const CAMERA_LOG_INTERVAL: usize = 30; // frames
const LOOK_DISTANCE: f32 = 30.0;

/// One stretch of the scripted tour
struct Segment {
    label: &'static str,
    seconds: f32,
    keys: &'static [&'static str],
    yaw: f32,
    pitch: f32,
}

const TOUR: &[Segment] = &[
    Segment {
        label: "settle",
        seconds: 1.0,
        keys: &[],
        yaw: 0.0,
        pitch: 0.0,
    },
    Segment {
        label: "look left",
        seconds: 0.5,
        keys: &[],
        yaw: FRAC_PI_2,
        pitch: 0.0,
    },
    Segment {
        label: "walk to the ramp",
        seconds: 4.0,
        keys: &["KeyW"],
        yaw: -FRAC_PI_2,
        pitch: 0.0,
    },
    Segment {
        label: "run up the ramp",
        seconds: 5.0,
        keys: &["KeyW", "ShiftLeft"],
        yaw: 0.0,
        pitch: 0.0,
    },
    Segment {
        label: "jump on the deck",
        seconds: 1.0,
        keys: &["KeyW", "Space"],
        yaw: 0.0,
        pitch: 0.0,
    },
    Segment {
        label: "strafe along the deck",
        seconds: 3.0,
        keys: &["KeyA"],
        yaw: 0.0,
        pitch: 0.2,
    },
    Segment {
        label: "turn to the side wall",
        seconds: 1.5,
        keys: &[],
        yaw: FRAC_PI_2,
        pitch: 0.1,
    },
    Segment {
        label: "look over the railing",
        seconds: 1.0,
        keys: &[],
        yaw: PI,
        pitch: -0.6,
    },
];

#[derive(Error, Debug)]
enum DemoError {
    #[error("Usage: gallery_walkthrough [config.toml | config.ron]")]
    Usage,
}

fn load_config() -> Result<WalkthroughConfig, Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config = match (args.next(), args.next()) {
        (None, _) => WalkthroughConfig::default(),
        (Some(path), None) => {
            log::info!("Loading configuration from {}", path);
            WalkthroughConfig::load(&path)?
        }
        (Some(_), Some(_)) => return Err(DemoError::Usage.into()),
    };
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level("info");

    let config = load_config()?;
    let gallery = Gallery::build();
    let mut walk = Walkthrough::new(gallery.triangles(), config)?;

    println!("=== Gallery Walkthrough ===");
    println!(
        "{} triangles, {} octree nodes, {} artworks",
        walk.octree().triangle_count(),
        walk.octree().node_count(),
        gallery.artworks.len()
    );

    let mut frame = 0usize;
    let mut looking_at: Option<&str> = None;
    let mut path_length = 0.0;
    let mut previous = walk.camera_position();

    for segment in TOUR {
        log::info!("-- {} ({:.1}s)", segment.label, segment.seconds);
        let input = InputState::from_key_codes(segment.keys.iter().copied());
        let view = ViewDirection::from_yaw_pitch(segment.yaw, segment.pitch);
        let frames = (segment.seconds / FRAME_TIME).round() as usize;

        for _ in 0..frames {
            let camera = walk.update(FRAME_TIME, &input, &view);
            path_length += (camera - previous).magnitude();
            previous = camera;
            frame += 1;

            if frame % CAMERA_LOG_INTERVAL == 0 {
                log::info!(
                    "t={:5.2}s camera=({:6.2}, {:5.2}, {:6.2}) on_floor={}",
                    frame as f32 * FRAME_TIME,
                    camera.x,
                    camera.y,
                    camera.z,
                    walk.player().on_floor()
                );
            }

            let seen = walk.look_at(&view, LOOK_DISTANCE).and_then(|hit| {
                gallery.artwork_for(hit.triangle_index).map(|art| (art.name, hit.distance))
            });
            if seen.map(|(name, _)| name) != looking_at {
                if let Some((name, distance)) = seen {
                    log::info!("Looking at \"{}\" ({:.1}m away)", name, distance);
                }
                looking_at = seen.map(|(name, _)| name);
            }
        }
    }

    let camera = walk.camera_position();
    println!(
        "Tour finished after {:.1}s: camera at ({:.2}, {:.2}, {:.2}), walked {:.1}m",
        frame as f32 * FRAME_TIME,
        camera.x,
        camera.y,
        camera.z,
        path_length
    );

    Ok(())
}
