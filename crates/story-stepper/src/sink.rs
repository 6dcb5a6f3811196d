//! Media capability the controller drives.
//!
//! One sink exists per playlist entry in segment mode, or a single sink for
//! the whole narration track. Sinks never call back into the controller;
//! the host feeds their events through [`crate::TimelineController::handle_media_event`].

use serde::{Deserialize, Serialize};

/// Result of asking a sink to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayOutcome {
	/// Playback began synchronously.
	Started,
	/// The platform refused playback (autoplay policy or similar).
	Rejected,
	/// Completion will arrive later as [`MediaEventKind::PlayResolved`] or
	/// [`MediaEventKind::PlayRejected`].
	Pending,
}

/// Which media representation produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaSource {
	/// Playlist entry at this position.
	Segment(usize),
	/// The single whole-narration track.
	Track,
}

/// Address of one sink for one input generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SinkHandle {
	pub generation: u64,
	pub source: MediaSource,
}

impl SinkHandle {
	pub fn event(self, kind: MediaEventKind) -> MediaEvent {
		MediaEvent { handle: self, kind }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MediaEventKind {
	/// Native play notification.
	Play,
	/// Native pause notification.
	Pause,
	Ended,
	TimeUpdate { current_time: f64 },
	/// Enough data is buffered to play through.
	CanPlayThrough,
	/// A `Pending` play finished starting.
	PlayResolved,
	/// A `Pending` play was refused.
	PlayRejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediaEvent {
	pub handle: SinkHandle,
	pub kind: MediaEventKind,
}

pub trait AudioSink {
	fn play(&mut self) -> PlayOutcome;
	fn pause(&mut self);
	fn seek(&mut self, seconds: f64);
	fn current_time(&self) -> f64;
	/// Unknown until metadata is loaded.
	fn duration(&self) -> Option<f64>;
	/// Playback reached the end of the media.
	fn ended(&self) -> bool;
	/// Not currently playing: never started, paused, stopped or ended.
	fn paused(&self) -> bool;

	/// Pause and rewind to the start.
	fn stop(&mut self) {
		self.pause();
		self.seek(0.0);
	}
}

/// Creates sinks whenever the controller's inputs change identity.
pub trait SinkFactory {
	type Sink: AudioSink;

	fn create(&mut self, handle: SinkHandle, url: &str, content_type: &str) -> Self::Sink;
}
