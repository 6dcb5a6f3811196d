use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::PlayerConfig;
use crate::core::{TimelineController, TimelineSnapshot};
use crate::error::{Result, TimelineError};
use crate::observer::{ChannelObserver, TimelineNotification};
use crate::sink::{MediaEvent, SinkFactory};
use crate::types::{NarrationStatus, StepId, StoryInputs};

/// Messages accepted by the player task
#[derive(Debug)]
pub enum PlayerCommand {
	SetInputs(StoryInputs),
	SetStatus(NarrationStatus),
	SetAudioEnabled(bool),
	SetActiveStep(Option<StepId>),
	ToggleGlobalPlayback,
	ReviewStep(StepId),
	Media(MediaEvent),
	/// Reply once every earlier command has been applied
	Sync(oneshot::Sender<TimelineSnapshot>),
}

/// Controller running on its own task.
///
/// Commands are applied strictly in send order; a snapshot is published on
/// the watch channel after each one and callbacks are forwarded as
/// [`TimelineNotification`]s.
pub struct TimelinePlayer {
	command_tx: mpsc::UnboundedSender<PlayerCommand>,
	state_rx: watch::Receiver<TimelineSnapshot>,
	task_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
	cancel_token: CancellationToken,
}

impl TimelinePlayer {
	/// Spawn the player task. Must be called inside a tokio runtime.
	pub fn spawn<F>(config: PlayerConfig, factory: F) -> Result<(Self, mpsc::UnboundedReceiver<TimelineNotification>)>
	where
		F: SinkFactory + Send + 'static,
		F::Sink: Send + 'static,
	{
		config.validate()?;

		let (notify_tx, notify_rx) = mpsc::unbounded_channel();
		let (command_tx, command_rx) = mpsc::unbounded_channel();
		let controller = TimelineController::new(config, factory, ChannelObserver::new(notify_tx));
		let (state_tx, state_rx) = watch::channel(controller.snapshot());
		let cancel_token = CancellationToken::new();

		let task_handle = tokio::spawn(run(controller, command_rx, state_tx, cancel_token.clone()));
		info!("TimelinePlayer started");

		Ok((
			Self {
				command_tx,
				state_rx,
				task_handle: Arc::new(Mutex::new(Some(task_handle))),
				cancel_token,
			},
			notify_rx,
		))
	}

	pub fn send(&self, command: PlayerCommand) -> Result<()> {
		self.command_tx.send(command).map_err(|_| TimelineError::PlayerClosed)
	}

	pub fn set_inputs(&self, inputs: StoryInputs) -> Result<()> {
		self.send(PlayerCommand::SetInputs(inputs))
	}

	pub fn set_status(&self, status: NarrationStatus) -> Result<()> {
		self.send(PlayerCommand::SetStatus(status))
	}

	pub fn set_audio_enabled(&self, enabled: bool) -> Result<()> {
		self.send(PlayerCommand::SetAudioEnabled(enabled))
	}

	pub fn set_active_step(&self, step_id: Option<StepId>) -> Result<()> {
		self.send(PlayerCommand::SetActiveStep(step_id))
	}

	pub fn toggle_global_playback(&self) -> Result<()> {
		self.send(PlayerCommand::ToggleGlobalPlayback)
	}

	pub fn review_step(&self, step_id: impl Into<StepId>) -> Result<()> {
		self.send(PlayerCommand::ReviewStep(step_id.into()))
	}

	pub fn media_event(&self, event: MediaEvent) -> Result<()> {
		self.send(PlayerCommand::Media(event))
	}

	/// Wait until all earlier commands are applied and return the state
	pub async fn sync(&self) -> Result<TimelineSnapshot> {
		let (tx, rx) = oneshot::channel();
		self.send(PlayerCommand::Sync(tx))?;
		rx.await.map_err(|_| TimelineError::PlayerClosed)
	}

	pub fn subscribe(&self) -> watch::Receiver<TimelineSnapshot> {
		self.state_rx.clone()
	}

	pub fn current_state(&self) -> TimelineSnapshot {
		self.state_rx.borrow().clone()
	}

	pub async fn shutdown(&self) {
		self.cancel_token.cancel();
		if let Some(handle) = self.task_handle.lock().await.take() {
			let _ = handle.await;
		}
	}
}

async fn run<F>(
	mut controller: TimelineController<F, ChannelObserver>,
	mut command_rx: mpsc::UnboundedReceiver<PlayerCommand>,
	state_tx: watch::Sender<TimelineSnapshot>,
	cancel: CancellationToken,
) where
	F: SinkFactory,
{
	loop {
		tokio::select! {
			command = command_rx.recv() => {
				let Some(command) = command else {
					debug!("all player handles dropped");
					break;
				};
				apply(&mut controller, command);
				state_tx.send_replace(controller.snapshot());
			}
			_ = cancel.cancelled() => {
				info!("TimelinePlayer cancelled");
				break;
			}
		}
	}
}

fn apply<F: SinkFactory>(controller: &mut TimelineController<F, ChannelObserver>, command: PlayerCommand) {
	match command {
		PlayerCommand::SetInputs(inputs) => controller.set_inputs(inputs),
		PlayerCommand::SetStatus(status) => controller.set_status(status),
		PlayerCommand::SetAudioEnabled(enabled) => controller.set_audio_enabled(enabled),
		PlayerCommand::SetActiveStep(step_id) => {
			controller.set_active_step(step_id);
		}
		PlayerCommand::ToggleGlobalPlayback => controller.toggle_global_playback(),
		PlayerCommand::ReviewStep(step_id) => controller.review_step(&step_id),
		PlayerCommand::Media(event) => controller.handle_media_event(event),
		PlayerCommand::Sync(reply) => {
			let _ = reply.send(controller.snapshot());
		}
	}
}
