//! Story documents as produced by the narration backend.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};
use crate::types::{AudioSegment, Step, StoryInputs};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryDocument {
	#[serde(default)]
	pub title: Option<String>,
	pub steps: Vec<Step>,
	#[serde(default)]
	pub audio_segments: Option<Vec<AudioSegment>>,
	#[serde(default)]
	pub audio_url: Option<String>,
	#[serde(default)]
	pub audio_content_type: Option<String>,
}

impl StoryDocument {
	pub fn from_json(json: &str) -> Result<Self> {
		let doc: Self = serde_json::from_str(json)?;
		doc.validate()?;
		Ok(doc)
	}

	pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
		let json = std::fs::read_to_string(path)?;
		Self::from_json(&json)
	}

	/// Step ids and talking point ids within a step must be unique
	pub fn validate(&self) -> Result<()> {
		let mut seen = HashSet::new();
		for step in &self.steps {
			if step.id.trim().is_empty() {
				return Err(TimelineError::InvalidStory("step with empty id".to_string()));
			}
			if !seen.insert(step.id.as_str()) {
				return Err(TimelineError::InvalidStory(format!("duplicate step id '{}'", step.id)));
			}
			let mut points = HashSet::new();
			for point in &step.talking_points {
				if !points.insert(point.id.as_str()) {
					return Err(TimelineError::InvalidStory(format!("duplicate talking point '{}' in step '{}'", point.id, step.id)));
				}
			}
		}
		Ok(())
	}

	/// Whether the controller will get a segment or track sink for this story
	pub fn has_any_audio(&self) -> bool {
		let segments = self.audio_segments.iter().flatten().any(AudioSegment::is_well_formed);
		let track = self.audio_url.as_deref().is_some_and(|url| !url.trim().is_empty());
		segments || track
	}

	pub fn into_inputs(self) -> StoryInputs {
		StoryInputs {
			steps: self.steps,
			audio_segments: self.audio_segments,
			audio_url: self.audio_url,
			audio_content_type: self.audio_content_type,
		}
	}
}
