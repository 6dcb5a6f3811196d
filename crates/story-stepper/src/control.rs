use serde::Serialize;
use std::fmt;

use crate::types::{NarrationStatus, PlaybackState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlLabel {
	Play,
	Pause,
	Replay,
}

impl ControlLabel {
	pub fn as_str(&self) -> &'static str {
		match self {
			ControlLabel::Play => "Play",
			ControlLabel::Pause => "Pause",
			ControlLabel::Replay => "Replay",
		}
	}
}

impl fmt::Display for ControlLabel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Presentation of the single play/pause affordance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlobalControl {
	pub label: ControlLabel,
	pub disabled: bool,
}

impl GlobalControl {
	pub fn derive(state: PlaybackState, status: NarrationStatus, has_any_audio: bool) -> Self {
		let label = match state {
			PlaybackState::Playing => ControlLabel::Pause,
			PlaybackState::Completed => ControlLabel::Replay,
			PlaybackState::Idle | PlaybackState::Paused => ControlLabel::Play,
		};
		Self {
			label,
			disabled: !has_any_audio || status.is_pending(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn label_follows_state() {
		let label = |state| GlobalControl::derive(state, NarrationStatus::Ready, true).label;
		assert_eq!(label(PlaybackState::Playing), ControlLabel::Pause);
		assert_eq!(label(PlaybackState::Completed), ControlLabel::Replay);
		assert_eq!(label(PlaybackState::Paused), ControlLabel::Play);
		assert_eq!(label(PlaybackState::Idle), ControlLabel::Play);
	}

	#[test]
	fn disabled_without_audio_or_while_pending() {
		assert!(GlobalControl::derive(PlaybackState::Idle, NarrationStatus::Ready, false).disabled);
		assert!(GlobalControl::derive(PlaybackState::Idle, NarrationStatus::Loading, true).disabled);
		assert!(GlobalControl::derive(PlaybackState::Idle, NarrationStatus::AwaitingAudio, true).disabled);
		assert!(!GlobalControl::derive(PlaybackState::Completed, NarrationStatus::Completed, true).disabled);
	}
}
