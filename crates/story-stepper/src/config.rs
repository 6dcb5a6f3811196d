use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};
use crate::types::DEFAULT_CONTENT_TYPE;

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
	/// MIME type handed to sinks for segments that declare none
	pub default_content_type: String,
	/// Whether automatic playback may start without a user gesture
	pub audio_enabled: bool,
	/// Close an open talking point when the user jumps away from it
	pub close_interrupted_points: bool,
}

impl PlayerConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_default_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.default_content_type = content_type.into();
		self
	}

	pub fn with_audio_enabled(mut self, enabled: bool) -> Self {
		self.audio_enabled = enabled;
		self
	}

	pub fn with_close_interrupted_points(mut self, enabled: bool) -> Self {
		self.close_interrupted_points = enabled;
		self
	}

	pub fn validate(&self) -> Result<()> {
		let content_type = self.default_content_type.trim();
		if content_type.is_empty() {
			return Err(TimelineError::InvalidConfig("default content type is empty".to_string()));
		}
		if !content_type.contains('/') {
			return Err(TimelineError::InvalidConfig(format!("'{}' is not a MIME type", content_type)));
		}
		Ok(())
	}
}

impl Default for PlayerConfig {
	fn default() -> Self {
		Self {
			default_content_type: DEFAULT_CONTENT_TYPE.to_string(),
			audio_enabled: false,
			close_interrupted_points: true,
		}
	}
}
