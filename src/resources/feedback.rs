//! Bridge to the audio/visual feedback collaborator.
//!
//! Use [`setup_feedback`] once to insert the [`FeedbackBridge`] and the
//! message queue; keep the returned receiver on the consumer side. Nothing in
//! the simulation waits on the consumer: the channel holds at most
//! [`FEEDBACK_CAPACITY`] pings, further ones are dropped until the consumer
//! drains it, and a dropped receiver is ignored.

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, bounded};

use crate::events::feedback::{FeedbackCmd, SegmentMarked};

/// Pings buffered for a consumer that has not drained the channel yet.
pub const FEEDBACK_CAPACITY: usize = 64;

#[derive(Resource)]
pub struct FeedbackBridge {
    /// Sender for [`FeedbackCmd`] values (simulation -> collaborator).
    pub tx_cmd: Sender<FeedbackCmd>,
}

/// Register the bridge and `Messages<SegmentMarked>`, returning the
/// receiving end of the channel.
pub fn setup_feedback(world: &mut World) -> Receiver<FeedbackCmd> {
    let (tx_cmd, rx_cmd) = bounded::<FeedbackCmd>(FEEDBACK_CAPACITY);
    world.insert_resource(FeedbackBridge { tx_cmd });
    world.insert_resource(Messages::<SegmentMarked>::default());
    rx_cmd
}
