//! Narrated data-story playback.
//!
//! Keeps a step/talking-point highlight in sync with audio that is either
//! split into many small segments or delivered as one whole-narration track.

pub mod actor;
pub mod anchor;
pub mod config;
pub mod control;
pub mod core;
pub mod error;
pub mod index;
pub mod observer;
pub mod sink;
pub mod story;
pub mod track;
pub mod types;

pub use actor::{PlayerCommand, TimelinePlayer};
pub use anchor::{AnchorRegistry, StepAnchor};
pub use config::PlayerConfig;
pub use control::{ControlLabel, GlobalControl};
pub use crate::core::{TimelineController, TimelineSnapshot};
pub use error::{Result, TimelineError};
pub use index::SegmentIndex;
pub use observer::{ChannelObserver, TimelineNotification, TimelineObserver};
pub use sink::{AudioSink, MediaEvent, MediaEventKind, MediaSource, PlayOutcome, SinkFactory, SinkHandle};
pub use story::StoryDocument;
pub use types::*;
