//! Body movement for the *hecs* ECS: axis-separated slide against solid
//! tiles, then the portal check.
//!
//! Portal relocation is the only non-trivial step. A body that has
//! entered one end of a linked pair is moved to the other end's
//! `infacing` side and its velocity turned to point out of that portal.

use glam::Vec2;
use hecs::{Entity, World};
use tracing::info;

use super::components::{Body, Velocity};
use crate::world::{Hitbox, Level, PortalSlot};

/// One relocation performed this tic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Teleport {
    pub entity: Entity,
    pub entered: PortalSlot,
    pub exited: PortalSlot,
}

/* ================================================================= */
/*  Public system                                                    */
/* ================================================================= */

/// Advance every body by `velocity × dt`.
pub fn movement_system(world: &mut World, level: &Level, dt: f32) -> Vec<Teleport> {
    let mut teleports = Vec::new();

    for (entity, (body, vel)) in world.query_mut::<(&mut Body, &mut Velocity)>() {
        let step = vel.0 * dt;
        let mut hb = body.0;
        if step.x != 0.0 {
            hb = slide_axis(level, hb, step.x, 0);
        }
        if step.y != 0.0 {
            hb = slide_axis(level, hb, step.y, 1);
        }

        if let Some(entered) = level.entered_portal(&hb) {
            let exited = entered.other();
            let exit = level.portal(exited);
            hb = exit.exit_hitbox(&hb);
            vel.0 = exit.infacing().unit() * vel.0.length();
            info!(?entity, ?entered, ?exited, at = %hb.position, "teleport");
            teleports.push(Teleport {
                entity,
                entered,
                exited,
            });
        }

        body.0 = hb;
    }

    teleports
}

/* ================================================================= */
/*  Collision                                                        */
/* ================================================================= */

/// Interiors intersect; boxes that merely touch do not block.
#[inline]
fn penetrates(a: &Hitbox, b: &Hitbox) -> bool {
    let (a0, a1) = (a.top_left(), a.bottom_right());
    let (b0, b1) = (b.top_left(), b.bottom_right());
    a0.x < b1.x && b0.x < a1.x && a0.y < b1.y && b0.y < a1.y
}

/// Move `hb` by `delta` along `axis` (0 = x, 1 = y), stopping flush against
/// the nearest solid the swept box runs into. Solids already overlapping
/// the start position are ignored so a body can never get wedged.
fn slide_axis(level: &Level, hb: Hitbox, delta: f32, axis: usize) -> Hitbox {
    let mut offset = Vec2::ZERO;
    offset[axis] = delta;
    let swept = hb.union(&hb.translated(offset));
    let mut stop = hb.position[axis] + delta;

    for solid in level.solids() {
        if !penetrates(&swept, solid) {
            continue;
        }
        if delta > 0.0 && solid.position[axis] >= hb.bottom_right()[axis] {
            stop = stop.min(solid.position[axis] - hb.size[axis]);
        } else if delta < 0.0 && solid.bottom_right()[axis] <= hb.position[axis] {
            stop = stop.max(solid.bottom_right()[axis]);
        }
    }

    let mut moved = hb;
    moved.position[axis] = stop;
    moved
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Drawable, Edge, Facing, TileType};
    use glam::vec2;

    /// 400 × 240 room, 20-unit walls.
    fn room() -> Level {
        let wall = TileType::Color(1);
        let edges = vec![
            Edge::new(wall, vec2(0.0, 0.0), vec2(400.0, 20.0), Facing::Up),
            Edge::new(wall, vec2(0.0, 220.0), vec2(400.0, 20.0), Facing::Down),
            Edge::new(wall, vec2(0.0, 20.0), vec2(20.0, 200.0), Facing::Left),
            Edge::new(wall, vec2(380.0, 20.0), vec2(20.0, 200.0), Facing::Right),
        ];
        Level::new("room", vec![], vec![], edges)
    }

    fn spawn(world: &mut World, at: Vec2, vel: Vec2) -> Entity {
        world.spawn((
            Body(Hitbox::new(at, vec2(30.0, 30.0))),
            Velocity(vel),
        ))
    }

    fn body(world: &World, e: Entity) -> Hitbox {
        world.get::<&Body>(e).unwrap().0
    }

    #[test]
    fn walls_stop_bodies_flush() {
        let level = room();
        let mut world = World::new();
        let e = spawn(&mut world, vec2(100.0, 100.0), vec2(0.0, -1000.0));
        movement_system(&mut world, &level, 1.0);
        assert_eq!(body(&world, e).position, vec2(100.0, 20.0));

        let e = spawn(&mut world, vec2(100.0, 100.0), vec2(1000.0, 0.0));
        movement_system(&mut world, &level, 1.0);
        assert_eq!(body(&world, e).position, vec2(350.0, 100.0));
    }

    #[test]
    fn unlinked_portal_does_not_teleport() {
        let mut level = room();
        level.place_portal(PortalSlot::Primary, 0, vec2(115.0, 0.0)).unwrap();
        let mut world = World::new();
        let e = spawn(&mut world, vec2(100.0, 60.0), vec2(0.0, -100.0));

        assert!(movement_system(&mut world, &level, 1.0).is_empty());
        assert_eq!(body(&world, e).position, vec2(100.0, 20.0));
    }

    #[test]
    fn linked_pair_relocates_to_the_other_side() {
        let mut level = room();
        level.place_portal(PortalSlot::Primary, 0, vec2(115.0, 0.0)).unwrap(); // x 55..175 on top wall
        level.place_portal(PortalSlot::Secondary, 3, vec2(390.0, 120.0)).unwrap(); // y 60..180 on right wall

        let mut world = World::new();
        let e = spawn(&mut world, vec2(100.0, 60.0), vec2(0.0, -100.0));
        let events = movement_system(&mut world, &level, 1.0);

        assert_eq!(
            events,
            vec![Teleport {
                entity: e,
                entered: PortalSlot::Primary,
                exited: PortalSlot::Secondary,
            }]
        );
        let out = body(&world, e);
        let exit = level.portal(PortalSlot::Secondary);
        assert_eq!(exit.infacing(), Facing::Left);
        assert!(!exit.hitbox().overlaps(&out));
        assert_eq!(out.center().y, exit.hitbox().center().y);
        assert!(out.bottom_right().x < exit.hitbox().position.x);
        assert_eq!(world.get::<&Velocity>(e).unwrap().0, vec2(-100.0, 0.0));

        // nothing more happens next tic
        world.get::<&mut Velocity>(e).unwrap().zero();
        assert!(movement_system(&mut world, &level, 1.0).is_empty());
    }

    #[test]
    fn brushing_past_a_portal_edge_does_not_teleport() {
        let mut level = room();
        level.place_portal(PortalSlot::Primary, 0, vec2(115.0, 0.0)).unwrap();
        level.place_portal(PortalSlot::Secondary, 3, vec2(390.0, 120.0)).unwrap();

        let mut world = World::new();
        // straddles the portal's right end at x = 175
        let e = spawn(&mut world, vec2(160.0, 60.0), vec2(0.0, -100.0));
        assert!(movement_system(&mut world, &level, 1.0).is_empty());
        assert_eq!(body(&world, e).position, vec2(160.0, 20.0));
    }
}
