//! Audio-synchronized timeline controller.
//!
//! Owns the derived playlist, the sinks for the current input generation and
//! the playback state machine. Everything is driven by calls from the host:
//! input changes, user controls and media events.

mod dispatch;
mod events;
mod media;
mod playback;
mod session;
mod snapshot;

use tracing::{debug, info};

use crate::anchor::{AnchorRegistry, StepAnchor};
use crate::config::PlayerConfig;
use crate::control::GlobalControl;
use crate::index::SegmentIndex;
use crate::observer::TimelineObserver;
use crate::sink::{MediaSource, SinkFactory};
use crate::types::{AudioMode, InputIdentity, NarrationStatus, OrderedSegmentEntry, PlaybackState, StepId, StoryInputs};

pub use snapshot::TimelineSnapshot;

use media::MediaSet;
use session::{PlayOrigin, Session};

pub struct TimelineController<F: SinkFactory, O: TimelineObserver> {
	config: PlayerConfig,
	factory: F,
	observer: O,
	inputs: StoryInputs,
	identity: InputIdentity,
	index: SegmentIndex,
	media: MediaSet<F::Sink>,
	session: Session,
	status: NarrationStatus,
	audio_enabled: bool,
	anchors: AnchorRegistry,
	active_step_id: Option<StepId>,
}

impl<F: SinkFactory, O: TimelineObserver> TimelineController<F, O> {
	pub fn new(config: PlayerConfig, factory: F, observer: O) -> Self {
		let audio_enabled = config.audio_enabled;
		Self {
			config,
			factory,
			observer,
			inputs: StoryInputs::default(),
			identity: InputIdentity::default(),
			index: SegmentIndex::default(),
			media: MediaSet::Silent,
			session: Session::new(0),
			status: NarrationStatus::default(),
			audio_enabled,
			anchors: AnchorRegistry::default(),
			active_step_id: None,
		}
	}

	/// Replace the caller-supplied story.
	///
	/// Same identity (step structure, segment collection, track URL) keeps the
	/// playback position; anything else cancels the current chain and starts
	/// over from the first entry.
	pub fn set_inputs(&mut self, inputs: StoryInputs) {
		let identity = inputs.identity();
		self.index = SegmentIndex::build(&inputs.steps, inputs.audio_segments.as_deref().unwrap_or_default());

		let pruned = self.anchors.retain_steps(&inputs.steps);
		if pruned > 0 {
			debug!(pruned, "dropped anchors for removed steps");
		}

		let changed = identity != self.identity;
		self.inputs = inputs;
		if changed {
			self.identity = identity;
			self.reset();
		}
	}

	fn reset(&mut self) {
		self.media.stop_all();
		let generation = self.session.generation.wrapping_add(1);
		self.session = Session::new(generation);
		self.media = MediaSet::build(&mut self.factory, generation, &self.index, &self.inputs, &self.config.default_content_type);
		info!(
			generation,
			mode = ?self.media.mode(),
			entries = self.index.len(),
			steps = self.inputs.steps.len(),
			"timeline inputs changed, playback reset"
		);
		self.maybe_autoplay();
	}

	pub fn set_status(&mut self, status: NarrationStatus) {
		if status == self.status {
			return;
		}
		debug!(from = ?self.status, to = ?status, "narration status changed");
		self.status = status;

		match status {
			NarrationStatus::Completed => self.force_state(PlaybackState::Completed),
			NarrationStatus::Loading | NarrationStatus::AwaitingAudio => self.force_state(PlaybackState::Idle),
			NarrationStatus::Ready => self.maybe_autoplay(),
		}
	}

	pub fn set_audio_enabled(&mut self, enabled: bool) {
		if enabled == self.audio_enabled {
			return;
		}
		self.audio_enabled = enabled;
		if enabled {
			self.maybe_autoplay();
		}
	}

	/// Scroll the externally highlighted step into view; playback is untouched
	pub fn set_active_step(&mut self, step_id: Option<StepId>) -> bool {
		let scrolled = step_id.as_deref().is_some_and(|id| self.anchors.scroll_to(id));
		self.active_step_id = step_id;
		scrolled
	}

	pub fn register_anchor(&mut self, step_id: impl Into<StepId>, anchor: Box<dyn StepAnchor>) {
		self.anchors.register(step_id, anchor);
	}

	pub fn unregister_anchor(&mut self, step_id: &str) -> bool {
		self.anchors.unregister(step_id)
	}

	pub fn state(&self) -> PlaybackState {
		self.session.state
	}

	pub fn status(&self) -> NarrationStatus {
		self.status
	}

	pub fn mode(&self) -> AudioMode {
		self.media.mode()
	}

	pub fn generation(&self) -> u64 {
		self.session.generation
	}

	pub fn audio_enabled(&self) -> bool {
		self.audio_enabled
	}

	pub fn has_any_audio(&self) -> bool {
		self.media.mode() != AudioMode::Silent
	}

	pub fn control(&self) -> GlobalControl {
		GlobalControl::derive(self.session.state, self.status, self.has_any_audio())
	}

	/// Playlist position in segment mode
	pub fn position(&self) -> Option<usize> {
		(self.media.mode() == AudioMode::Segments).then_some(self.session.position)
	}

	pub fn current_entry(&self) -> Option<&OrderedSegmentEntry> {
		self.position().and_then(|p| self.index.get(p))
	}

	/// Step most recently announced through `on_audio_step`
	pub fn reported_step(&self) -> Option<&str> {
		self.session.last_reported_step.as_deref()
	}

	pub fn active_step_id(&self) -> Option<&str> {
		self.active_step_id.as_deref()
	}

	pub fn index(&self) -> &SegmentIndex {
		&self.index
	}

	pub fn inputs(&self) -> &StoryInputs {
		&self.inputs
	}

	pub fn anchors(&self) -> &AnchorRegistry {
		&self.anchors
	}

	pub fn sink(&self, source: MediaSource) -> Option<&F::Sink> {
		self.media.get(source)
	}

	pub fn observer(&self) -> &O {
		&self.observer
	}

	pub fn observer_mut(&mut self) -> &mut O {
		&mut self.observer
	}

	pub fn factory(&self) -> &F {
		&self.factory
	}

	pub fn config(&self) -> &PlayerConfig {
		&self.config
	}
}
