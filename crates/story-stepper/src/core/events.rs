use tracing::{debug, trace};

use super::{PlayOrigin, TimelineController};
use crate::observer::TimelineObserver;
use crate::sink::{AudioSink, MediaEvent, MediaEventKind, MediaSource, SinkFactory};
use crate::track;
use crate::types::PlaybackState;

impl<F: SinkFactory, O: TimelineObserver> TimelineController<F, O> {
	/// Feed a sink event back into the state machine.
	///
	/// Events from sinks of an earlier input generation are dropped, which
	/// cancels any auto-advance chain that was running before the reset.
	pub fn handle_media_event(&mut self, event: MediaEvent) {
		if event.handle.generation != self.session.generation {
			trace!(stale = event.handle.generation, current = self.session.generation, "dropping stale media event");
			return;
		}
		let source = event.handle.source;
		if self.media.get(source).is_none() {
			trace!(?source, "event for unknown sink");
			return;
		}

		match event.kind {
			MediaEventKind::PlayResolved => {
				if self.session.pending_for(source).is_some() {
					self.session.pending = None;
					self.on_started(source);
				}
			}
			MediaEventKind::PlayRejected => {
				if let Some(pending) = self.session.pending_for(source) {
					self.on_rejected(pending.origin);
				}
			}
			MediaEventKind::Play => self.on_native_play(source),
			MediaEventKind::Pause => self.on_native_pause(source),
			MediaEventKind::Ended => self.on_ended(source),
			MediaEventKind::TimeUpdate { current_time } => self.on_time_update(source, current_time),
			MediaEventKind::CanPlayThrough => {
				if source == MediaSource::Track {
					self.session.track_loaded = true;
					self.maybe_autoplay();
				}
			}
		}
	}

	fn on_native_play(&mut self, source: MediaSource) {
		// Late event from a sink that has since been stopped
		if self.media.get(source).is_some_and(|sink| sink.paused()) {
			trace!(?source, "play event from a paused sink");
			return;
		}
		if self.session.pending_for(source).is_some() {
			// Confirmation arrives with PlayResolved
			self.session.state = PlaybackState::Playing;
			return;
		}

		if let MediaSource::Segment(position) = source {
			if position != self.session.position {
				// Started from the segment's own control
				debug!(position, "segment started outside the controller");
				self.close_point_unless(position);
				self.session.position = position;
				self.session.pending = None;
				self.media.pause_all_but(position);
			}
		}
		self.on_started(source);
	}

	fn on_native_pause(&mut self, source: MediaSource) {
		if Some(source) != self.current_source() {
			return;
		}
		if self.media.get(source).is_some_and(|sink| sink.ended()) {
			return;
		}
		if self.session.state == PlaybackState::Playing {
			self.session.pending = None;
			self.session.state = PlaybackState::Paused;
			debug!(?source, "paused by media");
		}
	}

	fn on_ended(&mut self, source: MediaSource) {
		if Some(source) != self.current_source() {
			return;
		}
		// A pause or forced status already stopped the chain
		if self.session.state != PlaybackState::Playing {
			debug!(?source, state = %self.session.state, "ended outside playback, not advancing");
			return;
		}

		match source {
			MediaSource::Segment(position) => {
				self.end_point_at(position);
				let next = self.index.get(position).and_then(|entry| self.index.next_after(&entry.key));
				match next {
					Some(next) => {
						debug!(from = position, to = next, "advancing");
						self.start_segment(next, PlayOrigin::Automatic);
					}
					None => self.complete(),
				}
			}
			MediaSource::Track => self.complete(),
		}
	}

	fn on_time_update(&mut self, source: MediaSource, current_time: f64) {
		if source != MediaSource::Track || self.session.state != PlaybackState::Playing {
			return;
		}
		let step_count = self.inputs.steps.len();
		let duration = self.media.get(source).and_then(|sink| sink.duration());
		if let Some(index) = duration.and_then(|d| track::step_index_at(current_time, d, step_count)) {
			self.report_track_index(index);
		}
	}
}
