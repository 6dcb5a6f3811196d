use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::types::{StepId, TalkingPointId};

/// Lifecycle callbacks delivered to the hosting application
pub trait TimelineObserver {
	/// A step's review control was used, whether or not playback started
	fn on_review(&mut self, _step_id: &str) {}
	fn on_audio_step(&mut self, _step_id: &str) {}
	fn on_talking_point_start(&mut self, _step_id: &str, _talking_point_id: &str) {}
	fn on_talking_point_end(&mut self, _step_id: &str, _talking_point_id: &str) {}
	fn on_audio_complete(&mut self) {}
	fn on_audio_autoplay_failure(&mut self) {}
	fn on_audio_ready(&mut self) {}
}

/// Callbacks as values, for channel delivery and recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TimelineNotification {
	Review { step_id: StepId },
	AudioStep { step_id: StepId },
	TalkingPointStart { step_id: StepId, talking_point_id: TalkingPointId },
	TalkingPointEnd { step_id: StepId, talking_point_id: TalkingPointId },
	AudioComplete,
	AutoplayBlocked,
	AudioReady,
}

impl TimelineNotification {
	pub fn dispatch<O: TimelineObserver + ?Sized>(&self, observer: &mut O) {
		match self {
			TimelineNotification::Review { step_id } => observer.on_review(step_id),
			TimelineNotification::AudioStep { step_id } => observer.on_audio_step(step_id),
			TimelineNotification::TalkingPointStart { step_id, talking_point_id } => observer.on_talking_point_start(step_id, talking_point_id),
			TimelineNotification::TalkingPointEnd { step_id, talking_point_id } => observer.on_talking_point_end(step_id, talking_point_id),
			TimelineNotification::AudioComplete => observer.on_audio_complete(),
			TimelineNotification::AutoplayBlocked => observer.on_audio_autoplay_failure(),
			TimelineNotification::AudioReady => observer.on_audio_ready(),
		}
	}
}

/// Collects notifications in order
impl TimelineObserver for Vec<TimelineNotification> {
	fn on_review(&mut self, step_id: &str) {
		self.push(TimelineNotification::Review { step_id: step_id.into() });
	}
	fn on_audio_step(&mut self, step_id: &str) {
		self.push(TimelineNotification::AudioStep { step_id: step_id.into() });
	}
	fn on_talking_point_start(&mut self, step_id: &str, talking_point_id: &str) {
		self.push(TimelineNotification::TalkingPointStart {
			step_id: step_id.into(),
			talking_point_id: talking_point_id.into(),
		});
	}
	fn on_talking_point_end(&mut self, step_id: &str, talking_point_id: &str) {
		self.push(TimelineNotification::TalkingPointEnd {
			step_id: step_id.into(),
			talking_point_id: talking_point_id.into(),
		});
	}
	fn on_audio_complete(&mut self) {
		self.push(TimelineNotification::AudioComplete);
	}
	fn on_audio_autoplay_failure(&mut self) {
		self.push(TimelineNotification::AutoplayBlocked);
	}
	fn on_audio_ready(&mut self) {
		self.push(TimelineNotification::AudioReady);
	}
}

/// Forwards notifications to a channel; a closed receiver drops them
#[derive(Debug, Clone)]
pub struct ChannelObserver {
	tx: mpsc::UnboundedSender<TimelineNotification>,
}

impl ChannelObserver {
	pub fn new(tx: mpsc::UnboundedSender<TimelineNotification>) -> Self {
		Self { tx }
	}

	fn send(&self, notification: TimelineNotification) {
		if self.tx.send(notification).is_err() {
			tracing::debug!("notification receiver dropped");
		}
	}
}

impl TimelineObserver for ChannelObserver {
	fn on_review(&mut self, step_id: &str) {
		self.send(TimelineNotification::Review { step_id: step_id.into() });
	}
	fn on_audio_step(&mut self, step_id: &str) {
		self.send(TimelineNotification::AudioStep { step_id: step_id.into() });
	}
	fn on_talking_point_start(&mut self, step_id: &str, talking_point_id: &str) {
		self.send(TimelineNotification::TalkingPointStart {
			step_id: step_id.into(),
			talking_point_id: talking_point_id.into(),
		});
	}
	fn on_talking_point_end(&mut self, step_id: &str, talking_point_id: &str) {
		self.send(TimelineNotification::TalkingPointEnd {
			step_id: step_id.into(),
			talking_point_id: talking_point_id.into(),
		});
	}
	fn on_audio_complete(&mut self) {
		self.send(TimelineNotification::AudioComplete);
	}
	fn on_audio_autoplay_failure(&mut self) {
		self.send(TimelineNotification::AutoplayBlocked);
	}
	fn on_audio_ready(&mut self) {
		self.send(TimelineNotification::AudioReady);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dispatch_round_trips_through_recorder() {
		let notes = vec![
			TimelineNotification::Review { step_id: "a".into() },
			TimelineNotification::TalkingPointStart {
				step_id: "a".into(),
				talking_point_id: "t1".into(),
			},
			TimelineNotification::AudioComplete,
		];
		let mut recorded: Vec<TimelineNotification> = Vec::new();
		for note in &notes {
			note.dispatch(&mut recorded);
		}
		assert_eq!(recorded, notes);
	}

	#[test]
	fn channel_observer_survives_closed_receiver() {
		let (tx, rx) = mpsc::unbounded_channel();
		drop(rx);
		let mut observer = ChannelObserver::new(tx);
		observer.on_audio_ready();
	}

	#[test]
	fn serializes_with_type_tag() {
		let json = serde_json::to_value(TimelineNotification::AudioStep { step_id: "b".into() }).unwrap();
		assert_eq!(json["type"], "audioStep");
		assert_eq!(json["step_id"], "b");
	}
}
