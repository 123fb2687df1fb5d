//! # Buildings
//!
//! Startup placement of houses on flattened plots, their door animation
//! and chest opening.
//!
//! ```text
//!              back wall
//!   ┌───────────────────────────┐
//!   │                           │
//!   │  left        chest?  right│   z
//!   │                           │   ^
//!   └──────────┐  door ┌────────┘   │
//!    front-left hinge   front-right └──> x
//! ```
//!
//! Each wall segment is its own static body. The door body exists only
//! while the door is fully closed; opening detaches it at once and it is
//! re-attached when the swing back reaches angle zero.

use rand::Rng;
use stranded_core::EntityId;
use stranded_shared::{Quaternion, Vec3};
use tracing::{debug, info, warn};

use crate::assets::ModelRole;
use crate::entities::{Building, Chest, Door};
use crate::events::GameEvent;
use crate::physics::{BodyDesc, BodyHandle, PhysicsWorld, Shape};
use crate::world::World;

/// Thickness of every wall.
pub const WALL_THICKNESS: f32 = 1.0;

/// Door leaf width.
pub const DOOR_WIDTH: f32 = 6.0;

/// Door leaf height.
pub const DOOR_HEIGHT: f32 = 8.0;

/// Door leaf thickness.
pub const DOOR_DEPTH: f32 = 0.4;

/// Gap left between the top of the door and the wall above it.
const LINTEL_GAP: f32 = 0.5;

/// Inset of the chest area from the walls.
const CHEST_MARGIN: f32 = 4.0;

/// Angle difference under which a swinging door snaps to its target.
const SNAP_EPSILON: f32 = 0.01;

// =============================================================================
// PLACEMENT
// =============================================================================

/// Places the startup buildings and returns how many were built.
///
/// Plots are searched and flattened first, then the terrain is committed
/// once for the whole batch before any walls go up.
pub fn place_buildings(world: &mut World) -> usize {
    let spawning = &world.config.spawning;
    let requested = world
        .rng
        .gen_range(spawning.min_buildings..=spawning.max_buildings);

    let plots: Vec<(f32, f32)> = (0..requested).filter_map(|_| find_plot(world)).collect();

    if let Some(revision) = world.terrain.commit_flatten() {
        world.emit(GameEvent::TerrainChanged { revision });
    }

    for &(x, z) in &plots {
        spawn_building(world, x, z);
    }
    info!(placed = plots.len(), requested, "buildings placed");
    plots.len()
}

/// Tries random plot centers until one passes the flatness probe, then
/// flattens it to the height field value at its center.
fn find_plot(world: &mut World) -> Option<(f32, f32)> {
    let spawning = &world.config.spawning;
    let plot = spawning.building_base_size + spawning.building_flat_margin;
    let span = world.config.world.terrain_size - plot;
    let threshold = spawning.flatness_threshold;

    for _ in 0..spawning.placement_attempts {
        let x = (world.rng.gen::<f32>() - 0.5) * span;
        let z = (world.rng.gen::<f32>() - 0.5) * span;
        if world.terrain.is_area_flat(x, z, plot, plot, threshold) {
            let target = world.height_field.sample_f32(x, z);
            world.terrain.flatten_area(x, z, plot, plot, target);
            debug!(x, z, target, "building plot flattened");
            return Some((x, z));
        }
    }
    warn!(
        attempts = spawning.placement_attempts,
        "no flat location found for a building"
    );
    None
}

/// Builds one house centered on `(x, z)`, standing on the terrain.
pub fn spawn_building(world: &mut World, x: f32, z: f32) -> EntityId {
    let height = 10.0 + world.rng.gen::<f32>() * 10.0;
    let width = 20.0 + world.rng.gen::<f32>() * 10.0;
    let depth = 20.0 + world.rng.gen::<f32>() * 10.0;
    let ground = world.ground_height(x, z);
    let center = Vec3::new(x, ground + height / 2.0, z);

    let id = world.entities.buildings.next_id();
    let walls = wall_boxes(width, depth, height)
        .into_iter()
        .map(|(offset, half_extents)| {
            world.physics.add_body(
                BodyDesc::fixed(Shape::Cuboid { half_extents }, center + offset).with_owner(id),
            )
        })
        .collect();

    let mut door = Door {
        hinge: Vec3::new(
            x - DOOR_WIDTH / 2.0,
            center.y - height / 2.0 + DOOR_HEIGHT / 2.0,
            z + depth / 2.0 - WALL_THICKNESS / 2.0,
        ),
        width: DOOR_WIDTH,
        height: DOOR_HEIGHT,
        angle: 0.0,
        target: 0.0,
        body: None,
    };
    door.body = Some(attach_door(world.physics.as_mut(), &door, id));

    let chest = world
        .rng
        .gen_bool(world.config.spawning.chest_chance)
        .then(|| {
            let ox = (world.rng.gen::<f32>() - 0.5) * (width - CHEST_MARGIN) * 0.8;
            let oz = (world.rng.gen::<f32>() - 0.5) * (depth - CHEST_MARGIN) * 0.8;
            world.catalog.resolve("chest", ModelRole::Chest);
            Chest {
                position: Vec3::new(x + ox, ground, z + oz),
                opened: false,
            }
        });

    let spawned = world.entities.buildings.spawn(Building {
        center,
        width,
        depth,
        height,
        walls,
        door,
        chest,
    });
    debug!(%spawned, width, depth, height, "building spawned");
    world.emit(GameEvent::EntitySpawned {
        id: spawned,
        tag: "building".to_string(),
        position: center,
    });
    spawned
}

/// Wall segments as (offset from the building center, half extents).
fn wall_boxes(width: f32, depth: f32, height: f32) -> Vec<(Vec3, Vec3)> {
    let t = WALL_THICKNESS;
    let front_z = depth / 2.0 - t / 2.0;
    let side = (width - DOOR_WIDTH) / 2.0;
    let lintel = height - DOOR_HEIGHT - LINTEL_GAP;

    vec![
        (
            Vec3::new(-width / 2.0 + t / 2.0, 0.0, 0.0),
            Vec3::new(t / 2.0, height / 2.0, depth / 2.0),
        ),
        (
            Vec3::new(width / 2.0 - t / 2.0, 0.0, 0.0),
            Vec3::new(t / 2.0, height / 2.0, depth / 2.0),
        ),
        (
            Vec3::new(0.0, 0.0, -front_z),
            Vec3::new(width / 2.0, height / 2.0, t / 2.0),
        ),
        (
            Vec3::new(-width / 2.0 + side / 2.0, 0.0, front_z),
            Vec3::new(side / 2.0, height / 2.0, t / 2.0),
        ),
        (
            Vec3::new(width / 2.0 - side / 2.0, 0.0, front_z),
            Vec3::new(side / 2.0, height / 2.0, t / 2.0),
        ),
        (
            Vec3::new(0.0, -height / 2.0 + DOOR_HEIGHT + lintel / 2.0, front_z),
            Vec3::new(DOOR_WIDTH / 2.0, lintel / 2.0, t / 2.0),
        ),
    ]
}

fn attach_door(physics: &mut dyn PhysicsWorld, door: &Door, owner: EntityId) -> BodyHandle {
    let half_extents = Vec3::new(door.width / 2.0, door.height / 2.0, DOOR_DEPTH / 2.0);
    let body = physics.add_body(
        BodyDesc::fixed(Shape::Cuboid { half_extents }, door.center()).with_owner(owner),
    );
    physics.set_orientation(body, Quaternion::from_yaw(door.angle));
    body
}

// =============================================================================
// DOORS
// =============================================================================

/// Starts a door swing, or reverses one in progress.
pub fn toggle_door(world: &mut World, id: EntityId) {
    let Some(building) = world.entities.buildings.get_mut(id) else {
        return;
    };
    let door = &mut building.door;
    let message = if door.is_opening() {
        door.target = 0.0;
        "Closing door..."
    } else {
        door.target = Door::OPEN_ANGLE;
        if let Some(body) = door.body.take() {
            world.physics.remove_body(body);
        }
        "Opening door..."
    };
    debug!(building = %id, target = door.target, "door toggled");
    world.notify(message);
}

/// Turns every moving door toward its target.
///
/// Doors move at `door_speed` rad/s and snap once within 0.01 rad. A door
/// that comes to rest closed gets its body back.
#[allow(clippy::float_cmp)]
pub fn update_doors(world: &mut World, dt: f32) {
    let step = world.config.interaction.door_speed * dt;
    let mut moved = Vec::new();

    for (id, building) in world.entities.buildings.iter_mut() {
        let door = &mut building.door;
        if !door.is_moving() {
            continue;
        }
        let diff = door.target - door.angle;
        if diff.abs() > SNAP_EPSILON {
            door.angle += diff.signum() * diff.abs().min(step);
        } else {
            door.angle = door.target;
        }

        if door.angle == 0.0 && door.target == 0.0 && door.body.is_none() {
            door.body = Some(attach_door(world.physics.as_mut(), door, id));
            debug!(building = %id, "door closed");
        }
        moved.push((id, door.angle));
    }

    for (building, angle) in moved {
        world.emit(GameEvent::DoorMoved { building, angle });
    }
}

// =============================================================================
// CHESTS
// =============================================================================

/// Opens a building's chest once: rolls the chest table, scatters the
/// loot on the ground around it and pauses resource pickup.
///
/// Returns false when there is no chest or it was already opened.
pub fn open_chest(world: &mut World, id: EntityId) -> bool {
    let Some(chest) = world
        .entities
        .buildings
        .get_mut(id)
        .and_then(|building| building.chest.as_mut())
    else {
        return false;
    };
    if chest.opened {
        return false;
    }
    chest.opened = true;
    let position = chest.position;

    world.notify("Chest opened!");
    world.collection_cooldown_until = world.now + world.config.interaction.chest_collection_cooldown;

    let loot = world.chest_loot.roll(&mut world.rng);
    let ground = position.with_y(world.ground_height(position.x, position.z));
    world.scatter_loot(&loot, ground);

    info!(building = %id, stacks = loot.len(), "chest opened");
    world.emit(GameEvent::ChestOpened { building: id });
    true
}
