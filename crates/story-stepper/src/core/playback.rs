use tracing::{debug, info, warn};

use super::{MediaSet, PlayOrigin, TimelineController};
use crate::observer::TimelineObserver;
use crate::sink::{AudioSink, MediaSource, PlayOutcome, SinkFactory};
use crate::track;
use crate::types::{AudioMode, PlaybackState};

use super::session::PendingPlay;

impl<F: SinkFactory, O: TimelineObserver> TimelineController<F, O> {
	/// The single play/pause affordance.
	///
	/// Pauses whatever is current while playing, restarts from the first entry
	/// once completed, and otherwise resumes at the current position.
	pub fn toggle_global_playback(&mut self) {
		if self.control().disabled {
			debug!(status = ?self.status, "global control disabled, ignoring toggle");
			return;
		}

		match self.session.state {
			PlaybackState::Playing => self.pause_current(),
			PlaybackState::Completed => {
				self.session.position = 0;
				self.session.clear_reported();
				if let Some(sink) = self.media.get_mut(MediaSource::Track) {
					sink.seek(0.0);
				}
				if let Some(sink) = self.media.get_mut(MediaSource::Segment(0)) {
					sink.seek(0.0);
				}
				info!("restarting narration from the beginning");
				self.start_current(PlayOrigin::User);
			}
			PlaybackState::Idle | PlaybackState::Paused => self.start_current(PlayOrigin::User),
		}
	}

	/// Jump to a step, or toggle it if it is the one playing now.
	pub fn review_step(&mut self, step_id: &str) {
		self.observer.on_review(step_id);

		match self.media.mode() {
			AudioMode::Segments => self.review_segment_step(step_id),
			AudioMode::WholeTrack => self.review_track_step(step_id),
			AudioMode::Silent => debug!(step_id, "review without audio"),
		}
	}

	fn review_segment_step(&mut self, step_id: &str) {
		let Some(target) = self.index.first_position_for_step(step_id) else {
			debug!(step_id, "no segment for step");
			return;
		};

		let current_step = self.index.get(self.session.position).map(|e| e.key.step_id.as_str());
		if self.session.state == PlaybackState::Playing && current_step == Some(step_id) {
			self.pause_current();
			return;
		}

		// Re-entering a step announces it again
		self.session.last_reported_index = None;
		if let Some(sink) = self.media.get_mut(MediaSource::Segment(target)) {
			sink.seek(0.0);
		}
		self.start_segment(target, PlayOrigin::User);
	}

	fn review_track_step(&mut self, step_id: &str) {
		let Some(step_index) = self.inputs.steps.iter().position(|s| s.id == step_id) else {
			debug!(step_id, "unknown step");
			return;
		};

		if self.session.state == PlaybackState::Playing && self.session.track_step_index == Some(step_index) {
			self.pause_current();
			return;
		}

		let step_count = self.inputs.steps.len();
		if let MediaSet::Track(sink) = &mut self.media {
			if let Some(start) = sink.duration().and_then(|d| track::step_start_time(step_index, d, step_count)) {
				sink.seek(start);
			}
		}
		self.session.track_step_index = None;
		self.start_track(PlayOrigin::User);
	}

	pub(super) fn start_current(&mut self, origin: PlayOrigin) {
		match self.media.mode() {
			AudioMode::Segments => self.start_segment(self.session.position, origin),
			AudioMode::WholeTrack => self.start_track(origin),
			AudioMode::Silent => {}
		}
	}

	/// Make `position` the current entry and start it, silencing every other
	/// segment before `play()` is issued.
	pub(super) fn start_segment(&mut self, position: usize, origin: PlayOrigin) {
		if position >= self.index.len() {
			debug!(position, "no segment at position");
			return;
		}

		self.close_point_unless(position);
		self.session.position = position;
		self.media.pause_all_but(position);

		let source = MediaSource::Segment(position);
		let Some(sink) = self.media.get_mut(source) else {
			return;
		};
		let outcome = sink.play();
		debug!(position, ?origin, ?outcome, "segment play requested");
		self.session.state = PlaybackState::Playing;
		self.settle(source, origin, outcome);
	}

	pub(super) fn start_track(&mut self, origin: PlayOrigin) {
		let Some(sink) = self.media.get_mut(MediaSource::Track) else {
			return;
		};
		let outcome = sink.play();
		debug!(?origin, ?outcome, "track play requested");
		self.session.state = PlaybackState::Playing;
		self.settle(MediaSource::Track, origin, outcome);
	}

	pub(super) fn settle(&mut self, source: MediaSource, origin: PlayOrigin, outcome: PlayOutcome) {
		match outcome {
			PlayOutcome::Started => {
				self.session.pending = None;
				self.on_started(source);
			}
			PlayOutcome::Rejected => self.on_rejected(origin),
			PlayOutcome::Pending => self.session.pending = Some(PendingPlay { source, origin }),
		}
	}

	/// Playback of `source` is confirmed
	pub(super) fn on_started(&mut self, source: MediaSource) {
		self.session.state = PlaybackState::Playing;
		self.notify_ready();
		match source {
			MediaSource::Segment(position) => self.report_segment(position),
			MediaSource::Track => self.report_track_position(),
		}
	}

	pub(super) fn on_rejected(&mut self, origin: PlayOrigin) {
		self.session.pending = None;
		self.session.state = PlaybackState::Paused;
		match origin {
			PlayOrigin::Automatic => {
				warn!("automatic playback blocked, waiting for a user gesture");
				self.observer.on_audio_autoplay_failure();
			}
			PlayOrigin::User => warn!("playback rejected after user gesture"),
		}
	}

	pub(super) fn pause_current(&mut self) {
		let Some(source) = self.current_source() else {
			return;
		};
		if let Some(sink) = self.media.get_mut(source) {
			sink.pause();
		}
		self.session.pending = None;
		self.session.state = PlaybackState::Paused;
		debug!(?source, "paused");
	}

	/// Move to the terminal state and tell the host
	pub(super) fn complete(&mut self) {
		self.session.pending = None;
		self.session.state = PlaybackState::Completed;
		info!(generation = self.session.generation, "narration completed");
		self.observer.on_audio_complete();
	}

	/// Apply a state imposed by the narration status, silencing media
	pub(super) fn force_state(&mut self, state: PlaybackState) {
		if self.session.state == PlaybackState::Playing {
			if let Some(source) = self.current_source() {
				if let Some(sink) = self.media.get_mut(source) {
					sink.pause();
				}
			}
		}
		self.session.pending = None;
		self.session.state = state;
		debug!(?state, "state forced by narration status");
	}

	/// Start on our own when the host allows it and nothing has started yet
	pub(super) fn maybe_autoplay(&mut self) {
		if !self.audio_enabled || self.status.is_pending() || self.session.state != PlaybackState::Idle {
			return;
		}
		match self.media.mode() {
			AudioMode::Segments => self.start_segment(self.session.position, PlayOrigin::Automatic),
			AudioMode::WholeTrack if self.session.track_loaded => self.start_track(PlayOrigin::Automatic),
			_ => {}
		}
	}

	pub(super) fn current_source(&self) -> Option<MediaSource> {
		match self.media.mode() {
			AudioMode::Segments => Some(MediaSource::Segment(self.session.position)),
			AudioMode::WholeTrack => Some(MediaSource::Track),
			AudioMode::Silent => None,
		}
	}
}
