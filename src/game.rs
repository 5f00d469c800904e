//! Simulation context.
//!
//! [`Simulation`] owns the ECS [`World`], the actor entity and the schedules
//! that advance it. Each call to [`Simulation::step`] is one update:
//!
//! 1. fold the step's [`Intents`] into [`InputState`]
//! 2. clamp the frame delta into [`WorldTime`]
//! 3. run the *play* schedule while no transition is active, otherwise the
//!    *transition* schedule
//! 4. run the *effects* schedule (pulses and feedback) in either state
//! 5. count down a pending autosave
//!
//! Editing operations ([`Simulation::edit_tile`], [`Simulation::resize_grid`])
//! act on the live stage grids and arm a debounced save. Save failures are
//! logged and never reach the caller of `step`.
use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use crossbeam_channel::Receiver;
use glam::Vec2;
use log::{info, warn};

use crate::components::actor::Actor;
use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::{GRAVITY_FORCE, RigidBody};
use crate::events::feedback::FeedbackCmd;
use crate::resources::feedback::setup_feedback;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::{InputState, Intents};
use crate::resources::pulses::{Pulse, Pulses};
use crate::resources::segments::{SegmentMask, SegmentTracker};
use crate::resources::stage::{CurrentStage, Stage, StageId};
use crate::resources::stagestore::{StageStore, StoreError};
use crate::resources::tilegrid::{ExitBands, Tile, TileGrid};
use crate::resources::transition::RoomTransition;
use crate::resources::worldgraph::WorldGraph;
use crate::resources::worldtime::WorldTime;
use crate::systems::exit::room_exit_system;
use crate::systems::feedback::{forward_feedback_cmds, update_segment_messages};
use crate::systems::input::actor_input_system;
use crate::systems::movement::actor_movement_system;
use crate::systems::pulses::pulse_system;
use crate::systems::time::update_world_time;
use crate::systems::transition::room_transition_system;

/// Horizontal spawn position of the actor in the start room.
const START_X: f32 = 1.5;

/// A stage together with the tiles it is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct StageView<'a> {
    pub stage: Stage,
    pub tiles: &'a TileGrid,
}

/// Actor box and motion, room-relative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActorView {
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub grounded: bool,
}

/// Room the actor is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRoom {
    Current,
    /// The transition target; the actor already sits at its entry point.
    Next,
}

/// Everything a renderer needs for one frame, borrowed from the simulation.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub current: StageView<'a>,
    /// Target of the active transition.
    pub next: Option<StageView<'a>>,
    pub bands: ExitBands,
    pub actor: ActorView,
    pub actor_room: ActorRoom,
    /// Transition progress in `0.0..=1.0`; zero while idle.
    pub progress: f32,
    /// Unit direction of the active transition; zero while idle.
    pub direction: Vec2,
    /// Offset to subtract from the current room; the next room sits one
    /// room size further along `direction`.
    pub camera_offset: Vec2,
    pub pulses: &'a [Pulse],
}

pub struct Simulation {
    world: World,
    actor: Entity,
    play: Schedule,
    transition: Schedule,
    effects: Schedule,
    feedback_rx: Receiver<FeedbackCmd>,
    /// Seconds left before a pending save is flushed.
    autosave: Option<f32>,
}

impl Simulation {
    /// Simulation over freshly generated stages.
    pub fn new(config: GameConfig) -> Self {
        let store = StageStore::generated(config.grid_cols, config.grid_rows, config.grid_limits);
        Self::with_store(config, store)
    }

    /// Simulation over the stages persisted at `config.stages_path`.
    ///
    /// A missing or unreadable file falls back to generated stages.
    pub fn load(config: GameConfig) -> Self {
        let store = match &config.stages_path {
            Some(path) => StageStore::load_from_file(
                path,
                config.grid_cols,
                config.grid_rows,
                config.grid_limits,
            )
            .unwrap_or_else(|e| {
                if e.is_not_found() {
                    info!("No stages at {:?} yet; starting from generated stages", path);
                } else {
                    warn!("Could not load stages from {:?}: {}", path, e);
                }
                StageStore::generated(config.grid_cols, config.grid_rows, config.grid_limits)
            }),
            None => StageStore::generated(config.grid_cols, config.grid_rows, config.grid_limits),
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: GameConfig, store: StageStore) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_max_step(config.max_step));
        world.insert_resource(InputState::default());
        world.insert_resource(CurrentStage(Stage::new(StageId::START)));
        world.insert_resource(SegmentTracker::default());
        world.insert_resource(RoomTransition::new(config.transition_duration));
        world.insert_resource(WorldGraph::new(StageId::START));
        world.insert_resource(Pulses::default());
        let feedback_rx = setup_feedback(&mut world);

        let size = config.actor_size;
        let mut body = RigidBody::with_max_fall_speed(config.max_fall_speed);
        body.add_force(GRAVITY_FORCE, Vec2::new(0.0, config.gravity));
        let actor = world
            .spawn((
                Actor,
                MapPosition::new(START_X, store.rows() as f32 - 1.0 - size),
                BoxCollider::new(size, size),
                body,
            ))
            .id();

        info!(
            "Simulation ready: {}x{} grid, start stage {}",
            store.cols(),
            store.rows(),
            StageId::START
        );
        world.insert_resource(store);
        world.insert_resource(config);

        let mut play = Schedule::default();
        play.set_executor_kind(ExecutorKind::SingleThreaded);
        play.add_systems(
            (
                actor_input_system,
                actor_movement_system,
                room_exit_system,
            )
                .chain(),
        );

        let mut transition = Schedule::default();
        transition.set_executor_kind(ExecutorKind::SingleThreaded);
        transition.add_systems(room_transition_system);

        let mut effects = Schedule::default();
        effects.set_executor_kind(ExecutorKind::SingleThreaded);
        effects.add_systems(
            (
                pulse_system,
                forward_feedback_cmds,
                update_segment_messages,
            )
                .chain(),
        );

        Self {
            world,
            actor,
            play,
            transition,
            effects,
            feedback_rx,
            autosave: None,
        }
    }

    /// Advance the simulation by one frame of `dt` seconds.
    pub fn step(&mut self, dt: f32, intents: Intents) {
        self.world.resource_mut::<InputState>().apply(intents);
        update_world_time(&mut self.world, dt);

        if self.world.resource::<RoomTransition>().is_active() {
            self.transition.run(&mut self.world);
        } else {
            self.play.run(&mut self.world);
        }
        self.effects.run(&mut self.world);
        self.world.clear_trackers();

        self.tick_autosave();
    }

    fn tick_autosave(&mut self) {
        let Some(remaining) = self.autosave.as_mut() else {
            return;
        };
        *remaining -= self.world.resource::<WorldTime>().delta;
        if *remaining <= 0.0 {
            self.flush_save();
        }
    }

    fn arm_autosave(&mut self) {
        if self.config().stages_path.is_some() {
            self.autosave = Some(self.config().autosave_delay);
        }
    }

    fn flush_save(&mut self) {
        if let Err(e) = self.save_now() {
            warn!("Could not save stages: {}", e);
        }
    }

    /// Write the stages to `stages_path` right away.
    ///
    /// Without a configured path this is a no-op. A pending autosave is
    /// cancelled either way.
    pub fn save_now(&mut self) -> Result<(), StoreError> {
        self.autosave = None;
        let Some(path) = &self.config().stages_path else {
            return Ok(());
        };
        self.store().save_to_file(path)
    }

    /// Whether an edit is waiting for the autosave delay to pass.
    pub fn save_pending(&self) -> bool {
        self.autosave.is_some()
    }

    /// Flush any pending save. Call once before dropping the simulation.
    pub fn shutdown(&mut self) {
        if self.save_pending() {
            self.flush_save();
        }
    }

    /// Overwrite one cell of the grid stored for `id`.
    ///
    /// The change is live immediately, including for the room the actor is
    /// in. Returns `false` for cells outside the grid.
    pub fn edit_tile(&mut self, id: StageId, col: i32, row: i32, tile: Tile) -> bool {
        let changed = self
            .world
            .resource_mut::<StageStore>()
            .set_tile(id, col, row, tile);
        if changed {
            self.arm_autosave();
        }
        changed
    }

    /// Restore the generated default tiles for `id`.
    pub fn reset_stage(&mut self, id: StageId) {
        self.world.resource_mut::<StageStore>().reset_stage(id);
        self.arm_autosave();
    }

    /// Resize every stage grid and keep the actor inside the new bounds.
    ///
    /// Returns the dimensions actually applied after clamping to the limits.
    pub fn resize_grid(&mut self, cols: usize, rows: usize) -> (usize, usize) {
        let (cols, rows) = self.world.resource_mut::<StageStore>().resize(cols, rows);
        let room = Vec2::new(cols as f32, rows as f32);
        let size = self
            .world
            .get::<BoxCollider>(self.actor)
            .map(|c| c.size)
            .unwrap_or(Vec2::ZERO);
        if let Some(mut position) = self.world.get_mut::<MapPosition>(self.actor) {
            let max = (room - size).max(Vec2::ZERO);
            position.pos = position.pos.min(max).max(Vec2::ZERO);
        }
        self.arm_autosave();
        (cols, rows)
    }

    /// Teleport the actor within the current room and stop it.
    pub fn place_actor(&mut self, x: f32, y: f32) {
        if let Some(mut position) = self.world.get_mut::<MapPosition>(self.actor) {
            position.pos = Vec2::new(x, y);
        }
        if let Some(mut body) = self.world.get_mut::<RigidBody>(self.actor) {
            body.stop();
        }
    }

    pub fn actor(&self) -> ActorView {
        let pos = self
            .world
            .get::<MapPosition>(self.actor)
            .map(|p| p.pos)
            .unwrap_or_default();
        let size = self
            .world
            .get::<BoxCollider>(self.actor)
            .map(|c| c.size)
            .unwrap_or_default();
        let (velocity, grounded) = self
            .world
            .get::<RigidBody>(self.actor)
            .map(|b| (b.velocity, b.grounded))
            .unwrap_or_default();
        ActorView {
            pos,
            size,
            velocity,
            grounded,
        }
    }

    /// Borrowed view of everything a renderer draws this frame.
    pub fn frame(&self) -> RenderFrame<'_> {
        let store = self.store();
        let transition = self.transition();
        let room_size = Vec2::new(store.cols() as f32, store.rows() as f32);
        let current = self.current_stage();
        let next = transition.active().map(|active| StageView {
            stage: active.target,
            tiles: store.grid(active.target.id),
        });
        RenderFrame {
            current: StageView {
                stage: current,
                tiles: store.grid(current.id),
            },
            next,
            bands: *store.exit_bands(),
            actor: self.actor(),
            actor_room: if next.is_some() {
                ActorRoom::Next
            } else {
                ActorRoom::Current
            },
            progress: transition.active().map(|a| a.ratio()).unwrap_or(0.0),
            direction: transition
                .active()
                .map(|a| a.edge.direction())
                .unwrap_or(Vec2::ZERO),
            camera_offset: transition.camera_offset(room_size),
            pulses: self.world.resource::<Pulses>().as_slice(),
        }
    }

    pub fn current_stage(&self) -> Stage {
        self.world.resource::<CurrentStage>().0
    }

    pub fn world_graph(&self) -> &WorldGraph {
        self.world.resource::<WorldGraph>()
    }

    pub fn segments(&self) -> SegmentMask {
        self.world.resource::<SegmentTracker>().mask()
    }

    pub fn transition(&self) -> &RoomTransition {
        self.world.resource::<RoomTransition>()
    }

    pub fn store(&self) -> &StageStore {
        self.world.resource::<StageStore>()
    }

    pub fn config(&self) -> &GameConfig {
        self.world.resource::<GameConfig>()
    }

    pub fn time(&self) -> &WorldTime {
        self.world.resource::<WorldTime>()
    }

    /// Receiving end of the feedback channel.
    pub fn feedback(&self) -> &Receiver<FeedbackCmd> {
        &self.feedback_rx
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}
