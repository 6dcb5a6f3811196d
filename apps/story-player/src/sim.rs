//! Clock-driven stand-in for real audio elements.
//!
//! Sinks only flip flags in a shared registry; [`drive`] advances the playing
//! clips on a timer and emits the media events a browser would.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use story_stepper::{AudioSink, MediaEvent, MediaEventKind, MediaSource, PlayOutcome, SinkFactory, SinkHandle};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct Clip {
	url: String,
	duration: f64,
	position: f64,
	playing: bool,
	ended: bool,
	/// Metadata announced through `CanPlayThrough`
	loaded: bool,
}

#[derive(Debug, Default)]
struct Registry {
	clips: HashMap<SinkHandle, Clip>,
	rejections_left: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ClipRegistry {
	inner: Arc<Mutex<Registry>>,
}

impl ClipRegistry {
	/// `rejections` play() calls are refused before any succeeds
	pub fn new(rejections: u32) -> Self {
		Self {
			inner: Arc::new(Mutex::new(Registry {
				clips: HashMap::new(),
				rejections_left: rejections,
			})),
		}
	}

	fn lock(&self) -> MutexGuard<'_, Registry> {
		self.inner.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Move every playing clip forward by `elapsed` seconds
	pub fn advance(&self, elapsed: f64) -> Vec<MediaEvent> {
		let mut registry = self.lock();
		let mut events = Vec::new();

		for (handle, clip) in &mut registry.clips {
			if !clip.loaded {
				clip.loaded = true;
				events.push(handle.event(MediaEventKind::CanPlayThrough));
			}
			if !clip.playing {
				continue;
			}

			clip.position = (clip.position + elapsed).min(clip.duration);
			if handle.source == MediaSource::Track {
				events.push(handle.event(MediaEventKind::TimeUpdate { current_time: clip.position }));
			}
			if clip.position >= clip.duration {
				clip.playing = false;
				clip.ended = true;
				debug!(url = %clip.url, "clip finished");
				events.push(handle.event(MediaEventKind::Pause));
				events.push(handle.event(MediaEventKind::Ended));
			}
		}
		events
	}

	pub fn playing(&self) -> usize {
		self.lock().clips.values().filter(|c| c.playing).count()
	}
}

pub struct SimFactory {
	registry: ClipRegistry,
	clip_secs: f64,
	track_secs: f64,
}

impl SimFactory {
	pub fn new(registry: ClipRegistry, clip_secs: f64, track_secs: f64) -> Self {
		Self {
			registry,
			clip_secs,
			track_secs,
		}
	}
}

impl SinkFactory for SimFactory {
	type Sink = SimSink;

	fn create(&mut self, handle: SinkHandle, url: &str, content_type: &str) -> SimSink {
		let duration = match handle.source {
			MediaSource::Segment(_) => self.clip_secs,
			MediaSource::Track => self.track_secs,
		};
		info!(generation = handle.generation, source = ?handle.source, url, content_type, "loading clip");
		self.registry.lock().clips.insert(
			handle,
			Clip {
				url: url.to_string(),
				duration,
				position: 0.0,
				playing: false,
				ended: false,
				loaded: false,
			},
		);
		SimSink {
			handle,
			registry: self.registry.clone(),
		}
	}
}

pub struct SimSink {
	handle: SinkHandle,
	registry: ClipRegistry,
}

impl SimSink {
	fn with_clip<T>(&self, default: T, f: impl FnOnce(&mut Clip) -> T) -> T {
		self.registry.lock().clips.get_mut(&self.handle).map_or(default, f)
	}
}

impl AudioSink for SimSink {
	fn play(&mut self) -> PlayOutcome {
		let mut guard = self.registry.lock();
		let registry = &mut *guard;
		if registry.rejections_left > 0 {
			registry.rejections_left -= 1;
			warn!(source = ?self.handle.source, "play() refused");
			return PlayOutcome::Rejected;
		}
		let Some(clip) = registry.clips.get_mut(&self.handle) else {
			return PlayOutcome::Rejected;
		};
		if clip.position >= clip.duration {
			clip.position = 0.0;
		}
		clip.playing = true;
		clip.ended = false;
		PlayOutcome::Started
	}

	fn pause(&mut self) {
		self.with_clip((), |clip| clip.playing = false);
	}

	fn seek(&mut self, seconds: f64) {
		self.with_clip((), |clip| {
			clip.position = seconds.clamp(0.0, clip.duration);
			clip.ended = false;
		});
	}

	fn current_time(&self) -> f64 {
		self.with_clip(0.0, |clip| clip.position)
	}

	fn duration(&self) -> Option<f64> {
		self.with_clip(None, |clip| clip.loaded.then_some(clip.duration))
	}

	fn ended(&self) -> bool {
		self.with_clip(false, |clip| clip.ended)
	}

	fn paused(&self) -> bool {
		self.with_clip(true, |clip| !clip.playing)
	}
}

impl Drop for SimSink {
	fn drop(&mut self) {
		self.registry.lock().clips.remove(&self.handle);
	}
}

/// Tick the registry until cancelled, forwarding media events
pub async fn drive(registry: ClipRegistry, tick: Duration, speed: f64, events: mpsc::UnboundedSender<MediaEvent>, cancel: CancellationToken) {
	let mut interval = tokio::time::interval(tick);
	let elapsed = tick.as_secs_f64() * speed;

	loop {
		tokio::select! {
			_ = interval.tick() => {
				for event in registry.advance(elapsed) {
					if events.send(event).is_err() {
						debug!("media event receiver gone");
						return;
					}
				}
			}
			() = cancel.cancelled() => {
				debug!("clip driver stopped");
				return;
			}
		}
	}
}
