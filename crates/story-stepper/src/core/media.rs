use tracing::debug;

use crate::index::SegmentIndex;
use crate::sink::{AudioSink, MediaSource, SinkFactory, SinkHandle};
use crate::types::{AudioMode, StoryInputs};

/// The sinks backing one input generation
pub(crate) enum MediaSet<S> {
	Segments(Vec<S>),
	Track(S),
	Silent,
}

impl<S: AudioSink> MediaSet<S> {
	pub fn build<F>(factory: &mut F, generation: u64, index: &SegmentIndex, inputs: &StoryInputs, default_content_type: &str) -> Self
	where
		F: SinkFactory<Sink = S>,
	{
		if !index.is_empty() {
			let sinks = index
				.entries()
				.iter()
				.enumerate()
				.map(|(position, entry)| {
					let handle = SinkHandle {
						generation,
						source: MediaSource::Segment(position),
					};
					factory.create(handle, &entry.segment.url, entry.segment.content_type_or(default_content_type))
				})
				.collect();
			return MediaSet::Segments(sinks);
		}

		match inputs.audio_url.as_deref().filter(|url| !url.trim().is_empty()) {
			Some(url) => {
				let handle = SinkHandle {
					generation,
					source: MediaSource::Track,
				};
				let content_type = inputs.audio_content_type.as_deref().filter(|c| !c.trim().is_empty()).unwrap_or(default_content_type);
				MediaSet::Track(factory.create(handle, url, content_type))
			}
			None => MediaSet::Silent,
		}
	}

	pub fn mode(&self) -> AudioMode {
		match self {
			MediaSet::Segments(_) => AudioMode::Segments,
			MediaSet::Track(_) => AudioMode::WholeTrack,
			MediaSet::Silent => AudioMode::Silent,
		}
	}

	pub fn get(&self, source: MediaSource) -> Option<&S> {
		match (self, source) {
			(MediaSet::Segments(sinks), MediaSource::Segment(position)) => sinks.get(position),
			(MediaSet::Track(sink), MediaSource::Track) => Some(sink),
			_ => None,
		}
	}

	pub fn get_mut(&mut self, source: MediaSource) -> Option<&mut S> {
		match (self, source) {
			(MediaSet::Segments(sinks), MediaSource::Segment(position)) => sinks.get_mut(position),
			(MediaSet::Track(sink), MediaSource::Track) => Some(sink),
			_ => None,
		}
	}

	/// Pause and rewind every segment sink except `keep`.
	///
	/// The only path that silences other segments; every start goes through it.
	pub fn pause_all_but(&mut self, keep: usize) {
		if let MediaSet::Segments(sinks) = self {
			for (position, sink) in sinks.iter_mut().enumerate() {
				if position != keep {
					sink.stop();
				}
			}
		}
	}

	pub fn stop_all(&mut self) {
		match self {
			MediaSet::Segments(sinks) => sinks.iter_mut().for_each(|sink| sink.stop()),
			MediaSet::Track(sink) => sink.stop(),
			MediaSet::Silent => {}
		}
		debug!("stopped all media");
	}
}
