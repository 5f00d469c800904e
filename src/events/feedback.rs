//! Segment feedback messages.
//!
//! Lighting a segment writes a [`SegmentMarked`] message. The feedback
//! systems forward each one across the
//! [`FeedbackBridge`](crate::resources::feedback::FeedbackBridge) as a
//! [`FeedbackCmd`] for whatever plays sounds or flashes the screen.

use bevy_ecs::message::Message;
use glam::Vec2;

use crate::resources::segments::Segment;
use crate::resources::stage::StageId;

/// A segment lit for the first time in the current room.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct SegmentMarked {
    pub segment: Segment,
    /// Stage the actor was in.
    pub stage: StageId,
    /// Actor center when the segment lit.
    pub pos: Vec2,
}

/// Commands sent to the feedback collaborator. Fire and forget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedbackCmd {
    /// Short ping for a freshly lit segment.
    Ping {
        segment: Segment,
        stage: StageId,
        tone_hz: f32,
    },
}

impl From<&SegmentMarked> for FeedbackCmd {
    fn from(marked: &SegmentMarked) -> Self {
        FeedbackCmd::Ping {
            segment: marked.segment,
            stage: marked.stage,
            tone_hz: marked.segment.tone(),
        }
    }
}
