//! Feedback forwarding.
//!
//! - [`forward_feedback_cmds`] turns each
//!   [`SegmentMarked`](crate::events::feedback::SegmentMarked) message into a
//!   [`FeedbackCmd`](crate::events::feedback::FeedbackCmd) and pushes it down
//!   the [`FeedbackBridge`](crate::resources::feedback::FeedbackBridge)
//!   channel.
//! - [`update_segment_messages`] advances the message queue once per step.
//!
//! Nothing waits on the receiving side: a full channel drops the ping. Without
//! a bridge the messages are simply left to expire.
use bevy_ecs::prelude::*;

use crate::events::feedback::{FeedbackCmd, SegmentMarked};
use crate::resources::feedback::FeedbackBridge;

/// Forward segment marks to the feedback collaborator.
pub fn forward_feedback_cmds(
    bridge: Option<Res<FeedbackBridge>>,
    mut reader: MessageReader<SegmentMarked>,
) {
    let Some(bridge) = bridge else {
        reader.clear();
        return;
    };
    for marked in reader.read() {
        // Full or disconnected; feedback is fire and forget.
        let _ = bridge.tx_cmd.try_send(FeedbackCmd::from(marked));
    }
}

/// Advance the ECS message queue for [`SegmentMarked`].
pub fn update_segment_messages(mut msgs: ResMut<Messages<SegmentMarked>>) {
    msgs.update();
}
