//! Positional collision response
//!
//! Each substep finds the deepest penetration and classifies it as floor or
//! wall. Velocity into a wall is removed and the capsule is pushed out. Only
//! the deepest contact is handled per iteration; shallower ones are picked
//! up by later iterations or substeps.

use serde::{Deserialize, Serialize};

use crate::physics::collision::{Capsule, Contact};
use crate::player::PlayerKinematics;
use crate::spatial::Octree;

/// Resolver tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Query/push-out iterations per substep
    ///
    /// `1` resolves a single contact per substep. Larger values settle
    /// corners faster but change how many contacts a substep sees.
    pub iterations: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { iterations: 1 }
    }
}

/// Push the capsule out of the world and redirect the player's velocity
///
/// Per iteration:
/// 1. query the deepest contact, stopping when there is none
/// 2. a contact with `normal.y > 0` supports the player
/// 3. otherwise the velocity component along the normal is removed
/// 4. the capsule moves by `normal * depth`
///
/// `on_floor` ends up true if any contact in the pass was floor-like.
/// Returns the last contact resolved.
pub fn resolve_collisions(
    capsule: &mut Capsule,
    kinematics: &mut PlayerKinematics,
    world: &Octree,
    config: &ResolverConfig,
) -> Option<Contact> {
    let was_on_floor = kinematics.on_floor;
    let mut on_floor = false;
    let mut last = None;

    for _ in 0..config.iterations.max(1) {
        let Some(contact) = world.query_capsule(capsule) else {
            break;
        };

        if contact.is_floor() {
            on_floor = true;
        } else {
            let into = contact.normal.dot(&kinematics.velocity);
            kinematics.velocity -= contact.normal * into;
        }

        capsule.translate(contact.correction());
        last = Some(contact);
    }

    kinematics.on_floor = on_floor;

    match (was_on_floor, on_floor) {
        (false, true) => log::trace!("Landed at {:?}", capsule.start()),
        (true, false) => log::trace!("Left floor at {:?}", capsule.start()),
        _ => {}
    }

    last
}
