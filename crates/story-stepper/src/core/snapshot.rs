use serde::Serialize;

use super::TimelineController;
use crate::control::GlobalControl;
use crate::observer::TimelineObserver;
use crate::sink::SinkFactory;
use crate::types::{AudioMode, NarrationStatus, PlaybackState, SegmentKey, StepId};

/// Point-in-time view of the controller for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSnapshot {
	pub generation: u64,
	pub state: PlaybackState,
	pub status: NarrationStatus,
	pub mode: AudioMode,
	pub audio_enabled: bool,
	pub ready: bool,
	/// Playlist position in segment mode
	pub position: Option<usize>,
	pub current_key: Option<SegmentKey>,
	/// Step to highlight
	pub highlighted_step: Option<StepId>,
	pub playlist: Vec<SegmentKey>,
	pub control: GlobalControl,
}

impl Default for TimelineSnapshot {
	fn default() -> Self {
		Self {
			generation: 0,
			state: PlaybackState::Idle,
			status: NarrationStatus::default(),
			mode: AudioMode::Silent,
			audio_enabled: false,
			ready: false,
			position: None,
			current_key: None,
			highlighted_step: None,
			playlist: Vec::new(),
			control: GlobalControl::derive(PlaybackState::Idle, NarrationStatus::default(), false),
		}
	}
}

impl<F: SinkFactory, O: TimelineObserver> TimelineController<F, O> {
	pub fn snapshot(&self) -> TimelineSnapshot {
		TimelineSnapshot {
			generation: self.session.generation,
			state: self.session.state,
			status: self.status,
			mode: self.mode(),
			audio_enabled: self.audio_enabled,
			ready: self.session.ready_notified,
			position: self.position(),
			current_key: self.current_entry().map(|e| e.key.clone()),
			highlighted_step: self.session.last_reported_step.clone(),
			playlist: self.index.keys().cloned().collect(),
			control: self.control(),
		}
	}
}
