use thiserror::Error;

pub type Result<T> = std::result::Result<T, TimelineError>;

#[derive(Error, Debug)]
pub enum TimelineError {
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Invalid config: {0}")]
	InvalidConfig(String),

	#[error("Invalid story: {0}")]
	InvalidStory(String),

	#[error("Player closed")]
	PlayerClosed,
}
