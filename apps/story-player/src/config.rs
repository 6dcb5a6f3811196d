use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "story-player")]
#[command(about = "Play a narrated data story against simulated audio", long_about = None)]
pub struct Config {
	/// Story document (JSON)
	#[arg(env = "STORY_PLAYER_STORY")]
	pub story: PathBuf,

	/// Clock resolution of the simulated media
	#[arg(long, env = "STORY_PLAYER_TICK_MS", default_value = "100")]
	pub tick_ms: u64,

	/// Playback rate of the simulated media
	#[arg(long, env = "STORY_PLAYER_SPEED", default_value = "1.0")]
	pub speed: f64,

	/// Length of every simulated segment; the whole track gets one clip per step
	#[arg(long, env = "STORY_PLAYER_CLIP_SECS", default_value = "2.0")]
	pub clip_secs: f64,

	/// Refuse this many play() calls, as a browser autoplay policy would
	#[arg(long, env = "STORY_PLAYER_REJECT_FIRST_PLAYS", default_value = "0")]
	pub reject_first_plays: u32,

	/// Allow playback to start without a user gesture
	#[arg(long, env = "STORY_PLAYER_AUDIO_ENABLED")]
	pub audio_enabled: bool,

	/// Review this step right after loading
	#[arg(long, env = "STORY_PLAYER_JUMP_TO")]
	pub jump_to: Option<String>,

	/// MIME type for segments that declare none
	#[arg(long, env = "STORY_PLAYER_CONTENT_TYPE", default_value = story_stepper::DEFAULT_CONTENT_TYPE)]
	pub content_type: String,

	/// Log filter used when RUST_LOG is unset
	#[arg(long, env = "STORY_PLAYER_LOG", default_value = "info,story_stepper=debug")]
	pub log_filter: String,
}

impl Config {
	pub fn validate(&self) -> Result<()> {
		if self.tick_ms == 0 {
			bail!("tick_ms must be greater than 0");
		}
		if !(self.speed.is_finite() && self.speed > 0.0) {
			bail!("speed must be a positive number");
		}
		if !(self.clip_secs.is_finite() && self.clip_secs > 0.0) {
			bail!("clip_secs must be a positive number");
		}
		Ok(())
	}
}
