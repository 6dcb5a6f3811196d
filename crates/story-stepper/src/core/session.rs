use crate::sink::MediaSource;
use crate::types::{PlaybackState, SegmentKey, StepId};

/// Who asked for playback to start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlayOrigin {
	/// Direct user gesture: global control, review control
	User,
	/// Auto-start, auto-advance, whole-track resume on load
	Automatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingPlay {
	pub source: MediaSource,
	pub origin: PlayOrigin,
}

/// Playback bookkeeping for one input generation.
///
/// Replaced wholesale on identity change so nothing from an older
/// auto-advance chain can leak into the new one.
#[derive(Debug, Clone)]
pub(crate) struct Session {
	pub generation: u64,
	pub state: PlaybackState,
	/// Playlist position in segment mode; unused for the whole track
	pub position: usize,
	pub ready_notified: bool,
	pub last_reported_index: Option<usize>,
	pub last_reported_step: Option<StepId>,
	/// Talking point whose start has fired but whose end has not
	pub open_point: Option<SegmentKey>,
	pub pending: Option<PendingPlay>,
	pub track_step_index: Option<usize>,
	pub track_loaded: bool,
}

impl Session {
	pub fn new(generation: u64) -> Self {
		Self {
			generation,
			state: PlaybackState::Idle,
			position: 0,
			ready_notified: false,
			last_reported_index: None,
			last_reported_step: None,
			open_point: None,
			pending: None,
			track_step_index: None,
			track_loaded: false,
		}
	}

	/// Forget what was reported so the next start re-announces its step
	pub fn clear_reported(&mut self) {
		self.last_reported_index = None;
		self.last_reported_step = None;
		self.track_step_index = None;
	}

	pub fn pending_for(&self, source: MediaSource) -> Option<PendingPlay> {
		self.pending.filter(|p| p.source == source)
	}
}
