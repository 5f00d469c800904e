//! Transition progress and commit.
//!
//! Runs instead of the play systems while a
//! [`RoomTransition`](crate::resources::transition::RoomTransition) is
//! active. Progress only consumes time; when it reaches the duration the
//! target stage becomes current, the world graph moves to the target
//! coordinate and the actor is released.
use bevy_ecs::prelude::*;
use log::info;

use crate::components::actor::Actor;
use crate::components::rigidbody::RigidBody;
use crate::resources::stage::CurrentStage;
use crate::resources::transition::RoomTransition;
use crate::resources::worldgraph::WorldGraph;
use crate::resources::worldtime::WorldTime;

pub fn room_transition_system(
    mut transition: ResMut<RoomTransition>,
    mut current: ResMut<CurrentStage>,
    mut graph: ResMut<WorldGraph>,
    mut query: Query<&mut RigidBody, With<Actor>>,
    time: Res<WorldTime>,
) {
    let Some(committed) = transition.advance(time.delta) else {
        return;
    };
    current.0 = committed.stage;
    let id = graph.enter(committed.coord, committed.stage.id);
    for mut body in query.iter_mut() {
        body.unfreeze();
    }
    info!(
        "Entered room {} (stage {}, {} rooms explored)",
        committed.coord,
        id,
        graph.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::stage::{Stage, StageId};
    use crate::resources::tilegrid::Edge;
    use crate::resources::worldgraph::RoomCoord;

    fn make_world(delta: f32) -> World {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            delta,
            ..WorldTime::default()
        });
        world.insert_resource(RoomTransition::new(0.2));
        world.insert_resource(CurrentStage(Stage::new(StageId::START)));
        world.insert_resource(WorldGraph::default());
        world
    }

    #[test]
    fn test_commit_swaps_current_room_and_releases_actor() {
        let mut world = make_world(0.05);
        let mut body = RigidBody::new();
        body.freeze();
        let actor = world.spawn((Actor, body)).id();
        let target = RoomCoord::new(0, 1);
        world
            .resource_mut::<RoomTransition>()
            .start(Edge::Bottom, Stage::new(StageId::Void), target);

        let mut schedule = Schedule::default();
        schedule.add_systems(room_transition_system);
        for _ in 0..3 {
            schedule.run(&mut world);
        }
        assert!(world.resource::<RoomTransition>().is_active());
        assert_eq!(world.resource::<CurrentStage>().0.id, StageId::START);
        assert!(world.get::<RigidBody>(actor).unwrap().frozen);

        schedule.run(&mut world);
        schedule.run(&mut world);
        assert!(!world.resource::<RoomTransition>().is_active());
        assert_eq!(world.resource::<CurrentStage>().0.id, StageId::Void);
        let graph = world.resource::<WorldGraph>();
        assert_eq!(graph.current(), target);
        assert_eq!(graph.lookup(target), Some(StageId::Void));
        assert!(!world.get::<RigidBody>(actor).unwrap().frozen);
    }

    #[test]
    fn test_idle_is_a_no_op() {
        let mut world = make_world(1.0);
        let mut schedule = Schedule::default();
        schedule.add_systems(room_transition_system);
        schedule.run(&mut world);
        assert_eq!(world.resource::<WorldGraph>().current(), RoomCoord::ORIGIN);
    }
}
