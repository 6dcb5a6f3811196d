use tracing::{debug, info};

use super::{MediaSet, TimelineController};
use crate::observer::TimelineObserver;
use crate::sink::{AudioSink, SinkFactory};
use crate::track;

impl<F: SinkFactory, O: TimelineObserver> TimelineController<F, O> {
	pub(super) fn notify_ready(&mut self) {
		if self.session.ready_notified {
			return;
		}
		self.session.ready_notified = true;
		info!(generation = self.session.generation, "audio ready");
		self.observer.on_audio_ready();
	}

	/// Announce the entry at `position` unless it is already the reported one.
	///
	/// A new step always fires `on_audio_step`. A step-level entry of the same
	/// step fires it again; a talking-point entry of the same step only fires
	/// `on_talking_point_start`.
	pub(super) fn report_segment(&mut self, position: usize) {
		if self.session.last_reported_index == Some(position) {
			return;
		}
		let Some(entry) = self.index.get(position) else {
			return;
		};
		let key = entry.key.clone();

		self.close_open_point();

		let same_step = self.session.last_reported_step.as_deref() == Some(key.step_id.as_str());
		match &key.talking_point_id {
			None => self.observer.on_audio_step(&key.step_id),
			Some(point) => {
				if !same_step {
					self.observer.on_audio_step(&key.step_id);
				}
				self.observer.on_talking_point_start(&key.step_id, point);
			}
		}
		debug!(position, key = %key, "segment active");

		self.session.last_reported_index = Some(position);
		self.session.last_reported_step = Some(key.step_id.clone());
		if !key.is_step_level() {
			self.session.open_point = Some(key);
		}
	}

	/// Whole-track mode: announce the step under the current playhead
	pub(super) fn report_track_position(&mut self) {
		let step_count = self.inputs.steps.len();
		let index = match &self.media {
			MediaSet::Track(sink) => match sink.duration() {
				Some(duration) => track::step_index_at(sink.current_time(), duration, step_count),
				// Metadata not loaded yet; playback starts at the top
				None => (step_count > 0).then_some(0),
			},
			_ => None,
		};
		if let Some(index) = index {
			self.report_track_index(index);
		}
	}

	pub(super) fn report_track_index(&mut self, index: usize) {
		if self.session.track_step_index == Some(index) {
			return;
		}
		let Some(step) = self.inputs.steps.get(index) else {
			return;
		};
		let step_id = step.id.clone();
		self.session.track_step_index = Some(index);
		debug!(index, step_id = %step_id, "track step active");
		self.observer.on_audio_step(&step_id);
		self.session.last_reported_step = Some(step_id);
	}

	/// Close the open talking point if playback is moving to another entry
	pub(super) fn close_point_unless(&mut self, position: usize) {
		let moving = self.session.open_point.as_ref().is_some_and(|open| self.index.position_of(open) != Some(position));
		if moving {
			self.close_open_point();
			// Coming back to the closed point announces it again
			self.session.last_reported_index = None;
		}
	}

	/// A newly announced entry supersedes whatever talking point is open
	pub(super) fn close_open_point(&mut self) {
		let Some(key) = self.session.open_point.take() else {
			return;
		};
		if !self.config.close_interrupted_points {
			return;
		}
		if let Some(point) = key.talking_point_id.as_deref() {
			self.observer.on_talking_point_end(&key.step_id, point);
		}
	}

	/// The open talking point finished playing
	pub(super) fn end_point_at(&mut self, position: usize) {
		let Some(open) = self.session.open_point.as_ref() else {
			return;
		};
		if self.index.position_of(open) != Some(position) {
			return;
		}
		if let Some(key) = self.session.open_point.take() {
			if let Some(point) = key.talking_point_id.as_deref() {
				self.observer.on_talking_point_end(&key.step_id, point);
			}
		}
	}
}
