use serde::{Deserialize, Serialize};
use std::fmt;

/// MIME type assumed for segments that do not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

pub type StepId = String;
pub type TalkingPointId = String;

/// Display-only metric attached to a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpi {
	pub label: String,
	pub value: String,
}

/// Finer-grained unit of a step that can be narrated on its own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkingPoint {
	pub id: TalkingPointId,
	#[serde(default)]
	pub markdown: String,
}

impl TalkingPoint {
	pub fn new(id: impl Into<TalkingPointId>, markdown: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			markdown: markdown.into(),
		}
	}
}

/// One beat of a narrated data story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
	pub id: StepId,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub markdown: String,
	#[serde(default)]
	pub talking_points: Vec<TalkingPoint>,
	#[serde(default)]
	pub kpis: Vec<Kpi>,
}

impl Step {
	pub fn new(id: impl Into<StepId>, title: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			markdown: String::new(),
			talking_points: Vec::new(),
			kpis: Vec::new(),
		}
	}

	pub fn with_markdown(mut self, markdown: impl Into<String>) -> Self {
		self.markdown = markdown.into();
		self
	}

	pub fn with_talking_point(mut self, point: TalkingPoint) -> Self {
		self.talking_points.push(point);
		self
	}

	pub fn with_kpi(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
		self.kpis.push(Kpi {
			label: label.into(),
			value: value.into(),
		});
		self
	}

	pub fn has_talking_point(&self, id: &str) -> bool {
		self.talking_points.iter().any(|p| p.id == id)
	}
}

/// A narration clip tied to a step, or to one talking point of a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSegment {
	/// Empty when the producer left it out; such segments never reach playback
	#[serde(default)]
	pub step_id: StepId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub talking_point_id: Option<TalkingPointId>,
	pub url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub content_type: Option<String>,
}

impl AudioSegment {
	pub fn for_step(step_id: impl Into<StepId>, url: impl Into<String>) -> Self {
		Self {
			step_id: step_id.into(),
			talking_point_id: None,
			url: url.into(),
			content_type: None,
		}
	}

	pub fn for_talking_point(step_id: impl Into<StepId>, talking_point_id: impl Into<TalkingPointId>, url: impl Into<String>) -> Self {
		Self {
			step_id: step_id.into(),
			talking_point_id: Some(talking_point_id.into()),
			url: url.into(),
			content_type: None,
		}
	}

	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());
		self
	}

	pub fn key(&self) -> SegmentKey {
		SegmentKey {
			step_id: self.step_id.clone(),
			talking_point_id: self.talking_point_id.clone(),
		}
	}

	pub fn content_type_or<'a>(&'a self, fallback: &'a str) -> &'a str {
		self.content_type.as_deref().filter(|c| !c.trim().is_empty()).unwrap_or(fallback)
	}

	pub(crate) fn is_well_formed(&self) -> bool {
		!self.step_id.trim().is_empty()
	}
}

/// Identity of a playlist entry: `stepId` or `stepId:talkingPointId`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentKey {
	pub step_id: StepId,
	pub talking_point_id: Option<TalkingPointId>,
}

impl SegmentKey {
	pub fn step(step_id: impl Into<StepId>) -> Self {
		Self {
			step_id: step_id.into(),
			talking_point_id: None,
		}
	}

	pub fn point(step_id: impl Into<StepId>, talking_point_id: impl Into<TalkingPointId>) -> Self {
		Self {
			step_id: step_id.into(),
			talking_point_id: Some(talking_point_id.into()),
		}
	}

	pub fn is_step_level(&self) -> bool {
		self.talking_point_id.is_none()
	}
}

impl fmt::Display for SegmentKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.talking_point_id {
			Some(point) => write!(f, "{}:{}", self.step_id, point),
			None => f.write_str(&self.step_id),
		}
	}
}

/// One position of the derived playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderedSegmentEntry {
	pub key: SegmentKey,
	pub segment: AudioSegment,
}

/// Global playback state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
	#[default]
	Idle,
	Playing,
	Paused,
	Completed,
}

impl PlaybackState {
	pub fn as_str(&self) -> &'static str {
		match self {
			PlaybackState::Idle => "idle",
			PlaybackState::Playing => "playing",
			PlaybackState::Paused => "paused",
			PlaybackState::Completed => "completed",
		}
	}
}

impl fmt::Display for PlaybackState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Externally driven narration status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NarrationStatus {
	Loading,
	AwaitingAudio,
	#[default]
	Ready,
	Completed,
}

impl NarrationStatus {
	/// Narration is still being produced; no playback may start
	pub fn is_pending(&self) -> bool {
		matches!(self, NarrationStatus::Loading | NarrationStatus::AwaitingAudio)
	}
}

/// Which media representation the controller is driving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioMode {
	Segments,
	WholeTrack,
	Silent,
}

/// Everything the caller supplies per render
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryInputs {
	#[serde(default)]
	pub steps: Vec<Step>,
	#[serde(default)]
	pub audio_segments: Option<Vec<AudioSegment>>,
	#[serde(default)]
	pub audio_url: Option<String>,
	#[serde(default)]
	pub audio_content_type: Option<String>,
}

impl StoryInputs {
	pub fn new(steps: Vec<Step>) -> Self {
		Self {
			steps,
			..Self::default()
		}
	}

	pub fn with_segments(mut self, segments: Vec<AudioSegment>) -> Self {
		self.audio_segments = Some(segments);
		self
	}

	pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
		self.audio_url = Some(url.into());
		self
	}

	pub fn with_audio_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.audio_content_type = Some(content_type.into());
		self
	}

	pub fn step_ids(&self) -> Vec<&str> {
		self.steps.iter().map(|s| s.id.as_str()).collect()
	}

	/// Identity used to decide whether playback must be reset
	pub(crate) fn identity(&self) -> InputIdentity {
		InputIdentity {
			structure: self
				.steps
				.iter()
				.map(|s| (s.id.clone(), s.talking_points.iter().map(|p| p.id.clone()).collect()))
				.collect(),
			segments: self.audio_segments.clone(),
			audio_url: self.audio_url.clone(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct InputIdentity {
	/// Step ids with their talking point ids, in order
	structure: Vec<(StepId, Vec<TalkingPointId>)>,
	segments: Option<Vec<AudioSegment>>,
	audio_url: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn segment_key_display() {
		assert_eq!(SegmentKey::step("a").to_string(), "a");
		assert_eq!(SegmentKey::point("a", "t1").to_string(), "a:t1");
	}

	#[test]
	fn content_type_falls_back_when_blank() {
		let seg = AudioSegment::for_step("a", "a.mp3").with_content_type("  ");
		assert_eq!(seg.content_type_or(DEFAULT_CONTENT_TYPE), DEFAULT_CONTENT_TYPE);

		let seg = AudioSegment::for_step("a", "a.ogg").with_content_type("audio/ogg");
		assert_eq!(seg.content_type_or(DEFAULT_CONTENT_TYPE), "audio/ogg");
	}

	#[test]
	fn inputs_deserialize_from_camel_case() {
		let json = r#"{
			"steps": [{"id": "a", "title": "Intro", "talkingPoints": [{"id": "t1", "markdown": "hi"}]}],
			"audioSegments": [{"stepId": "a", "talkingPointId": "t1", "url": "a-t1.mp3"}]
		}"#;
		let inputs: StoryInputs = serde_json::from_str(json).unwrap();
		assert_eq!(inputs.steps[0].talking_points[0].id, "t1");
		let segments = inputs.audio_segments.unwrap();
		assert_eq!(segments[0].key(), SegmentKey::point("a", "t1"));
	}

	#[test]
	fn missing_step_id_is_malformed() {
		let seg: AudioSegment = serde_json::from_str(r#"{"url": "x.mp3"}"#).unwrap();
		assert!(!seg.is_well_formed());
	}

	#[test]
	fn status_pending() {
		assert!(NarrationStatus::Loading.is_pending());
		assert!(NarrationStatus::AwaitingAudio.is_pending());
		assert!(!NarrationStatus::Ready.is_pending());
		assert!(!NarrationStatus::Completed.is_pending());
	}

	#[test]
	fn identity_tracks_talking_point_order() {
		let inputs = StoryInputs::new(vec![Step::new("a", "A").with_talking_point(TalkingPoint::new("t1", "")).with_talking_point(TalkingPoint::new("t2", ""))]);
		let mut reordered = inputs.clone();
		reordered.steps[0].talking_points.reverse();
		assert_ne!(inputs.identity(), reordered.identity());

		let mut retitled = inputs.clone();
		retitled.steps[0].title = "Renamed".into();
		assert_eq!(inputs.identity(), retitled.identity());
	}
}
