#![allow(dead_code)]

use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, Mutex};

use story_stepper::*;

#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
	Create { handle: SinkHandle, url: String, content_type: String },
	Play(MediaSource),
	Pause(MediaSource),
	Seek(MediaSource, f64),
}

#[derive(Debug)]
struct Shared {
	calls: Vec<SinkCall>,
	outcomes: VecDeque<PlayOutcome>,
	default_outcome: PlayOutcome,
	playing: BTreeSet<(u64, SourceKey)>,
	/// Most sinks playing at the same time, ever
	peak_playing: usize,
	ended: BTreeSet<(u64, SourceKey)>,
	started: usize,
	track_duration: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SourceKey {
	Segment(usize),
	Track,
}

impl From<MediaSource> for SourceKey {
	fn from(source: MediaSource) -> Self {
		match source {
			MediaSource::Segment(p) => SourceKey::Segment(p),
			MediaSource::Track => SourceKey::Track,
		}
	}
}

/// Sink factory whose sinks record every call and answer `play()` from a script
#[derive(Debug, Clone)]
pub struct ScriptedFactory {
	shared: Arc<Mutex<Shared>>,
}

impl ScriptedFactory {
	pub fn new() -> Self {
		Self::with_default(PlayOutcome::Started)
	}

	pub fn with_default(outcome: PlayOutcome) -> Self {
		Self {
			shared: Arc::new(Mutex::new(Shared {
				calls: Vec::new(),
				outcomes: VecDeque::new(),
				default_outcome: outcome,
				playing: BTreeSet::new(),
				peak_playing: 0,
				ended: BTreeSet::new(),
				started: 0,
				track_duration: None,
			})),
		}
	}

	pub fn with_track_duration(self, seconds: f64) -> Self {
		self.shared.lock().unwrap().track_duration = Some(seconds);
		self
	}

	/// Answer the next `play()` calls with these outcomes, then the default
	pub fn queue(&self, outcomes: impl IntoIterator<Item = PlayOutcome>) {
		self.shared.lock().unwrap().outcomes.extend(outcomes);
	}

	pub fn set_default(&self, outcome: PlayOutcome) {
		self.shared.lock().unwrap().default_outcome = outcome;
	}

	pub fn calls(&self) -> Vec<SinkCall> {
		self.shared.lock().unwrap().calls.clone()
	}

	pub fn clear_calls(&self) {
		self.shared.lock().unwrap().calls.clear();
	}

	pub fn plays(&self) -> Vec<MediaSource> {
		self.calls()
			.into_iter()
			.filter_map(|c| match c {
				SinkCall::Play(source) => Some(source),
				_ => None,
			})
			.collect()
	}

	pub fn created(&self) -> Vec<SinkHandle> {
		self.calls()
			.into_iter()
			.filter_map(|c| match c {
				SinkCall::Create { handle, .. } => Some(handle),
				_ => None,
			})
			.collect()
	}

	/// The sink behind `handle` ran to the end of its media
	pub fn finish(&self, handle: SinkHandle) {
		let key: (u64, SourceKey) = (handle.generation, handle.source.into());
		let mut shared = self.shared.lock().unwrap();
		shared.playing.remove(&key);
		shared.ended.insert(key);
	}

	/// The sink behind `handle` was started from its own control
	pub fn start_natively(&self, handle: SinkHandle) {
		let key: (u64, SourceKey) = (handle.generation, handle.source.into());
		let mut shared = self.shared.lock().unwrap();
		shared.ended.remove(&key);
		shared.playing.insert(key);
		shared.peak_playing = shared.peak_playing.max(shared.playing.len());
	}

	/// The sink behind `handle` was paused from its own control
	pub fn pause_natively(&self, handle: SinkHandle) {
		let key: (u64, SourceKey) = (handle.generation, handle.source.into());
		self.shared.lock().unwrap().playing.remove(&key);
	}

	/// How many `play()` calls answered `Started`
	pub fn started_count(&self) -> usize {
		self.shared.lock().unwrap().started
	}

	pub fn playing_count(&self) -> usize {
		self.shared.lock().unwrap().playing.len()
	}

	pub fn peak_playing(&self) -> usize {
		self.shared.lock().unwrap().peak_playing
	}
}

impl SinkFactory for ScriptedFactory {
	type Sink = ScriptedSink;

	fn create(&mut self, handle: SinkHandle, url: &str, content_type: &str) -> ScriptedSink {
		let mut shared = self.shared.lock().unwrap();
		shared.calls.push(SinkCall::Create {
			handle,
			url: url.to_string(),
			content_type: content_type.to_string(),
		});
		let duration = match handle.source {
			MediaSource::Track => shared.track_duration,
			MediaSource::Segment(_) => Some(10.0),
		};
		ScriptedSink {
			handle,
			shared: Arc::clone(&self.shared),
			current_time: 0.0,
			duration,
		}
	}
}

#[derive(Debug)]
pub struct ScriptedSink {
	handle: SinkHandle,
	shared: Arc<Mutex<Shared>>,
	current_time: f64,
	duration: Option<f64>,
}

impl ScriptedSink {
	fn key(&self) -> (u64, SourceKey) {
		(self.handle.generation, self.handle.source.into())
	}
}

impl AudioSink for ScriptedSink {
	fn play(&mut self) -> PlayOutcome {
		let key = self.key();
		let mut shared = self.shared.lock().unwrap();
		shared.calls.push(SinkCall::Play(self.handle.source));
		let outcome = shared.outcomes.pop_front().unwrap_or(shared.default_outcome);
		if outcome == PlayOutcome::Started {
			shared.started += 1;
		}
		if outcome != PlayOutcome::Rejected {
			shared.ended.remove(&key);
			shared.playing.insert(key);
			shared.peak_playing = shared.peak_playing.max(shared.playing.len());
		}
		outcome
	}

	fn pause(&mut self) {
		let key = self.key();
		let mut shared = self.shared.lock().unwrap();
		shared.calls.push(SinkCall::Pause(self.handle.source));
		shared.playing.remove(&key);
	}

	fn seek(&mut self, seconds: f64) {
		self.current_time = seconds;
		self.shared.lock().unwrap().calls.push(SinkCall::Seek(self.handle.source, seconds));
	}

	fn current_time(&self) -> f64 {
		self.current_time
	}

	fn duration(&self) -> Option<f64> {
		self.duration
	}

	fn ended(&self) -> bool {
		self.shared.lock().unwrap().ended.contains(&self.key())
	}

	fn paused(&self) -> bool {
		!self.shared.lock().unwrap().playing.contains(&self.key())
	}
}

pub fn segment(generation: u64, position: usize) -> SinkHandle {
	SinkHandle {
		generation,
		source: MediaSource::Segment(position),
	}
}

pub fn track(generation: u64) -> SinkHandle {
	SinkHandle {
		generation,
		source: MediaSource::Track,
	}
}

pub type Controller = TimelineController<ScriptedFactory, Vec<TimelineNotification>>;

pub fn controller(factory: &ScriptedFactory) -> Controller {
	TimelineController::new(PlayerConfig::default(), factory.clone(), Vec::new())
}

pub fn step(id: &str) -> Step {
	Step::new(id, id.to_uppercase())
}

pub fn step_with_points(id: &str, points: &[&str]) -> Step {
	points.iter().fold(step(id), |s, p| s.with_talking_point(TalkingPoint::new(*p, format!("{} {}", id, p))))
}

pub fn audio_step(id: &str) -> TimelineNotification {
	TimelineNotification::AudioStep { step_id: id.into() }
}

pub fn point_start(step_id: &str, point: &str) -> TimelineNotification {
	TimelineNotification::TalkingPointStart {
		step_id: step_id.into(),
		talking_point_id: point.into(),
	}
}

pub fn point_end(step_id: &str, point: &str) -> TimelineNotification {
	TimelineNotification::TalkingPointEnd {
		step_id: step_id.into(),
		talking_point_id: point.into(),
	}
}

pub fn review(id: &str) -> TimelineNotification {
	TimelineNotification::Review { step_id: id.into() }
}

/// Two steps with one step-level clip each
pub fn two_step_inputs() -> StoryInputs {
	StoryInputs::new(vec![step("a"), step("b")]).with_segments(vec![AudioSegment::for_step("a", "a.mp3"), AudioSegment::for_step("b", "b.mp3")])
}

/// Step `a` narrated per talking point, step `b` with a step-level clip
pub fn mixed_inputs() -> StoryInputs {
	StoryInputs::new(vec![step_with_points("a", &["t1", "t2"]), step("b")]).with_segments(vec![
		AudioSegment::for_step("b", "b.mp3"),
		AudioSegment::for_talking_point("a", "t2", "a-t2.mp3"),
		AudioSegment::for_talking_point("a", "t1", "a-t1.mp3"),
	])
}
