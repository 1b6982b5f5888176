//! Semantic garden events and the feedback seam.
//!
//! The core never talks to haptics or audio. It queues [`GardenEvent`]s which the
//! [`Garden`](super::Garden) forwards to an injected [`FeedbackSink`]. Sinks must not
//! block and the core does not care whether they succeed.

use serde::{Deserialize, Serialize};

use super::FlowerId;
use crate::schema::Palette;

/// Something noteworthy that happened to the garden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GardenEvent {
    Spawned(FlowerId),
    Grew { id: FlowerId, scale: f32 },
    StemPlanted(FlowerId),
    PaletteChanged(Palette),
    Cleared,
    /// The device was shaken. A reset follows.
    Shaken,
    Reset,
    WindGust { strength: f32, direction: f32 },
}

/// Device feedback style suggested for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackKind {
    Light,
    Soft,
    Medium,
    Heavy,
    Success,
    Warning,
}

impl GardenEvent {
    /// Suggested feedback for this event.
    pub fn feedback(&self) -> FeedbackKind {
        match self {
            GardenEvent::Spawned(_) | GardenEvent::Grew { .. } => FeedbackKind::Light,
            GardenEvent::StemPlanted(_) => FeedbackKind::Soft,
            GardenEvent::PaletteChanged(_) | GardenEvent::Cleared => FeedbackKind::Success,
            GardenEvent::Shaken => FeedbackKind::Warning,
            GardenEvent::Reset => FeedbackKind::Heavy,
            GardenEvent::WindGust { .. } => FeedbackKind::Medium,
        }
    }
}

/// Receiver of garden events.
pub trait FeedbackSink {
    fn notify(&mut self, event: &GardenEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn notify(&mut self, _event: &GardenEvent) {}
}

/// Logs every event at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn notify(&mut self, event: &GardenEvent) {
        log::debug!("feedback {:?} for {:?}", event.feedback(), event);
    }
}

/// Records events, mostly for tests and headless runs.
impl FeedbackSink for Vec<GardenEvent> {
    fn notify(&mut self, event: &GardenEvent) {
        self.push(event.clone());
    }
}

impl<S: FeedbackSink + ?Sized> FeedbackSink for Box<S> {
    fn notify(&mut self, event: &GardenEvent) {
        (**self).notify(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_mapping() {
        assert_eq!(GardenEvent::Spawned(FlowerId(1)).feedback(), FeedbackKind::Light);
        assert_eq!(GardenEvent::Cleared.feedback(), FeedbackKind::Success);
        assert_eq!(GardenEvent::Shaken.feedback(), FeedbackKind::Warning);
        assert_eq!(GardenEvent::Reset.feedback(), FeedbackKind::Heavy);
        assert_eq!(
            GardenEvent::PaletteChanged(Palette::Neon).feedback(),
            FeedbackKind::Success
        );
        assert_eq!(
            GardenEvent::WindGust {
                strength: 10.0,
                direction: 0.0
            }
            .feedback(),
            FeedbackKind::Medium
        );
    }

    #[test]
    fn test_vec_records() {
        let mut sink: Vec<GardenEvent> = Vec::new();
        sink.notify(&GardenEvent::Cleared);
        sink.notify(&GardenEvent::Spawned(FlowerId(3)));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1], GardenEvent::Spawned(FlowerId(3)));
    }

    #[test]
    fn test_boxed_sink_forwards() {
        let mut sink: Box<Vec<GardenEvent>> = Box::default();
        sink.notify(&GardenEvent::Reset);
        assert_eq!(sink.len(), 1);
    }
}
