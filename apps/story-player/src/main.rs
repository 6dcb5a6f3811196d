mod config;
mod sim;

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use story_stepper::{PlayerConfig, StoryDocument, TimelineNotification, TimelinePlayer};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use sim::{ClipRegistry, SimFactory};

#[tokio::main]
async fn main() -> Result<()> {
	dotenv::dotenv().ok();

	let config = Config::parse();
	config.validate()?;

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)))
		.with_target(true)
		.with_line_number(true)
		.init();

	let story = StoryDocument::from_path(&config.story).with_context(|| format!("failed to load story {}", config.story.display()))?;
	let titles: HashMap<String, String> = story.steps.iter().map(|s| (s.id.clone(), s.title.clone())).collect();
	info!(
		title = story.title.as_deref().unwrap_or("untitled"),
		steps = story.steps.len(),
		"🎬 Loaded story"
	);

	if !story.has_any_audio() {
		warn!("story has no narration, nothing to play");
		return Ok(());
	}

	let registry = ClipRegistry::new(config.reject_first_plays);
	let track_secs = config.clip_secs * story.steps.len().max(1) as f64;
	let factory = SimFactory::new(registry.clone(), config.clip_secs, track_secs);
	let player_config = PlayerConfig::new()
		.with_audio_enabled(config.audio_enabled)
		.with_default_content_type(config.content_type.clone());
	let (player, mut notifications) = TimelinePlayer::spawn(player_config, factory)?;

	player.set_inputs(story.into_inputs())?;
	match &config.jump_to {
		Some(step_id) => player.review_step(step_id.as_str())?,
		None if !config.audio_enabled => {
			info!("audio not enabled, pressing play");
			player.toggle_global_playback()?;
		}
		None => {}
	}

	let cancel = CancellationToken::new();
	let (media_tx, mut media_rx) = mpsc::unbounded_channel();
	let driver = tokio::spawn(sim::drive(
		registry.clone(),
		Duration::from_millis(config.tick_ms),
		config.speed,
		media_tx,
		cancel.clone(),
	));

	loop {
		tokio::select! {
			Some(event) = media_rx.recv() => player.media_event(event)?,
			note = notifications.recv() => {
				let Some(note) = note else {
					warn!("player stopped unexpectedly");
					break;
				};
				match note {
					TimelineNotification::Review { step_id } => info!(step = %step_id, "🔁 Review"),
					TimelineNotification::AudioReady => info!("🔊 Audio ready"),
					TimelineNotification::AudioStep { step_id } => {
						let title = titles.get(&step_id).map_or("", String::as_str);
						info!(step = %step_id, title, "▶️ Step");
					}
					TimelineNotification::TalkingPointStart { step_id, talking_point_id } => {
						info!(step = %step_id, point = %talking_point_id, "  talking point");
					}
					TimelineNotification::TalkingPointEnd { step_id, talking_point_id } => {
						debug!(step = %step_id, point = %talking_point_id, "  talking point done");
					}
					TimelineNotification::AutoplayBlocked => {
						warn!("autoplay blocked, simulating a click on play");
						player.toggle_global_playback()?;
					}
					TimelineNotification::AudioComplete => {
						info!("✅ Narration complete");
						break;
					}
				}
			}
			_ = tokio::signal::ctrl_c() => {
				info!("🛑 Received shutdown signal (Ctrl+C)");
				break;
			}
		}
	}

	cancel.cancel();
	if let Err(e) = driver.await {
		warn!("clip driver failed: {}", e);
	}

	let snapshot = player.sync().await?;
	info!(state = %snapshot.state, playing = registry.playing(), "final state");
	debug!("{}", serde_json::to_string_pretty(&snapshot)?);
	player.shutdown().await;

	info!("👋 Player stopped");
	Ok(())
}
