// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::commands::{ArgumentError, CommandArguments, CommandInvocation, CommandRegistry, RegistryError};
use super::event::InteractionEvent;
use super::identity::{IdentityError, resolve_actor};
use super::utils::responses::{CommandError, Reply, error_reply};
use async_trait::async_trait;
use miette::Diagnostic;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Sends the single reply an interaction gets.
#[async_trait]
pub trait InteractionResponder: Send + Sync {
	async fn respond(&self, event: &InteractionEvent, reply: &Reply) -> Result<(), ReplyError>;
}

#[derive(Debug, Diagnostic)]
pub struct ReplyError(pub Box<dyn Error + Send + Sync>);

impl fmt::Display for ReplyError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "failed to send interaction reply: {}", self.0)
	}
}

impl Error for ReplyError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		Some(self.0.as_ref())
	}
}

/// Why an invocation ended with an error reply.
#[derive(Debug, Diagnostic)]
pub enum DispatchError {
	Identity(IdentityError),
	Registry(RegistryError),
	Arguments(ArgumentError),
	Command(CommandError),
}

impl Error for DispatchError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Identity(error) => Some(error),
			Self::Registry(error) => Some(error),
			Self::Arguments(error) => Some(error),
			Self::Command(error) => Some(error),
		}
	}
}

impl fmt::Display for DispatchError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Identity(error) => write!(f, "couldn't identify the invoking user: {}", error),
			Self::Registry(error) => write!(f, "couldn't find the command: {}", error),
			Self::Arguments(error) => write!(f, "couldn't bind command arguments: {}", error),
			Self::Command(error) => write!(f, "command failed: {}", error),
		}
	}
}

/// How an invocation finished. Both variants mean a reply was attempted exactly once.
#[derive(Debug)]
pub enum InvocationOutcome {
	Replied,
	Failed(DispatchError),
}

impl InvocationOutcome {
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Replied)
	}
}

pub struct Dispatcher<R> {
	registry: Arc<CommandRegistry>,
	responder: R,
	response_window: Duration,
}

impl<R: InteractionResponder> Dispatcher<R> {
	pub fn new(registry: Arc<CommandRegistry>, responder: R, response_window: Duration) -> Self {
		Self {
			registry,
			responder,
			response_window,
		}
	}

	/// Runs one command invocation through to its reply.
	pub async fn dispatch(&self, event: InteractionEvent) -> InvocationOutcome {
		let received_at = Instant::now();
		let result = self.run_command(&event).await;

		let (reply, outcome) = match result {
			Ok(content) => (Reply::success(content), InvocationOutcome::Replied),
			Err(error) => {
				let reply = match &error {
					DispatchError::Command(command_error) => error_reply(command_error),
					_ => Reply::generic_failure(),
				};
				log_failure(&event, &error);
				(reply, InvocationOutcome::Failed(error))
			}
		};

		if let Err(error) = self.responder.respond(&event, &reply).await {
			tracing::warn!(command = %event.command_name, source = ?error, "Failed to send interaction reply");
		}

		let elapsed = received_at.elapsed();
		if elapsed > self.response_window {
			tracing::warn!(
				command = %event.command_name,
				elapsed_ms = elapsed.as_millis() as u64,
				"Interaction reply took longer than the response window"
			);
		}

		outcome
	}

	async fn run_command(&self, event: &InteractionEvent) -> Result<String, DispatchError> {
		let actor = resolve_actor(event).map_err(DispatchError::Identity)?.actor_id();
		let descriptor = self
			.registry
			.lookup(&event.command_name)
			.map_err(DispatchError::Registry)?;
		let arguments =
			CommandArguments::bind(descriptor.parameters(), &event.options).map_err(DispatchError::Arguments)?;

		tracing::debug!(command = descriptor.name(), %actor, "Dispatching command");
		let invocation = CommandInvocation { actor, arguments };
		let handler = Arc::clone(descriptor.handler());
		// A panicking handler must still end in a reply, so it runs in its own task.
		let handler_task = tokio::spawn(async move { handler.handle(invocation).await });
		match handler_task.await {
			Ok(result) => result.map_err(DispatchError::Command),
			Err(join_error) => Err(DispatchError::Command(CommandError::internal(format!(
				"command handler stopped unexpectedly: {}",
				join_error
			)))),
		}
	}
}

fn log_failure(event: &InteractionEvent, error: &DispatchError) {
	match error {
		DispatchError::Command(CommandError::UserSafe(message)) => {
			tracing::debug!(command = %event.command_name, reason = %message, "Command rejected the request");
		}
		DispatchError::Command(CommandError::Internal(source)) => {
			tracing::error!(command = %event.command_name, ?source, "Command failed");
		}
		DispatchError::Identity(source) => {
			tracing::error!(command = %event.command_name, ?source, "Interaction carried no usable actor");
		}
		DispatchError::Registry(source) => {
			tracing::error!(command = %event.command_name, ?source, "Interaction named a command that isn't registered");
		}
		DispatchError::Arguments(source) => {
			tracing::error!(command = %event.command_name, ?source, "Interaction arguments didn't match the declaration");
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::discord::commands::{CommandDescriptor, CommandHandler};
	use std::fmt::Debug;
	use std::sync::Mutex;
	use tracing::field::{Field, Visit};
	use tracing::subscriber::DefaultGuard;
	use tracing::{Event, Level, Subscriber};
	use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
	use twilight_model::id::Id;

	#[derive(Default)]
	struct FailingResponder {
		attempts: Mutex<u32>,
	}

	#[async_trait]
	impl InteractionResponder for FailingResponder {
		async fn respond(&self, _event: &InteractionEvent, _reply: &Reply) -> Result<(), ReplyError> {
			*self.attempts.lock().expect("lock shouldn't be poisoned") += 1;
			Err(ReplyError("interaction already acknowledged".into()))
		}
	}

	struct Slow;

	#[async_trait]
	impl CommandHandler for Slow {
		async fn handle(&self, _invocation: CommandInvocation) -> Result<String, CommandError> {
			tokio::time::sleep(Duration::from_millis(20)).await;
			Ok(String::from("done"))
		}
	}

	/// A log line as seen by the test subscriber.
	#[derive(Debug)]
	struct CapturedEvent {
		level: Level,
		text: String,
	}

	#[derive(Clone, Default)]
	struct CaptureLayer {
		events: Arc<Mutex<Vec<CapturedEvent>>>,
	}

	struct TextVisitor<'a>(&'a mut String);

	impl Visit for TextVisitor<'_> {
		fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
			self.0.push_str(&format!("{}={:?} ", field.name(), value));
		}
	}

	impl<S: Subscriber> Layer<S> for CaptureLayer {
		fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
			let mut text = String::new();
			event.record(&mut TextVisitor(&mut text));
			self.events
				.lock()
				.expect("lock shouldn't be poisoned")
				.push(CapturedEvent {
					level: *event.metadata().level(),
					text,
				});
		}
	}

	impl CaptureLayer {
		fn install(&self) -> DefaultGuard {
			tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
		}

		fn contains(&self, level: Level, needle: &str) -> bool {
			self.events
				.lock()
				.expect("lock shouldn't be poisoned")
				.iter()
				.any(|event| event.level == level && event.text.contains(needle))
		}
	}

	fn dispatcher(responder: FailingResponder, window: Duration) -> Dispatcher<FailingResponder> {
		let mut registry = CommandRegistry::new();
		registry
			.register(CommandDescriptor::new("slow", "A slow command", Arc::new(Slow)))
			.expect("registration should succeed");
		Dispatcher::new(Arc::new(registry), responder, window)
	}

	fn event(command: &str) -> InteractionEvent {
		let mut event = InteractionEvent::new(Id::new(1), "token", command);
		event.user_id = Some(Id::new(5));
		event
	}

	#[tokio::test]
	async fn failed_delivery_is_logged_and_not_retried() {
		let capture = CaptureLayer::default();
		let _guard = capture.install();
		let dispatcher = dispatcher(FailingResponder::default(), Duration::from_secs(3));

		let outcome = dispatcher.dispatch(event("slow")).await;

		assert!(outcome.is_success());
		assert_eq!(*dispatcher.responder.attempts.lock().expect("lock shouldn't be poisoned"), 1);
		assert!(capture.contains(Level::WARN, "Failed to send interaction reply"));
		assert!(capture.contains(Level::WARN, "interaction already acknowledged"));
	}

	#[tokio::test]
	async fn exceeding_the_response_window_logs_a_warning() {
		let capture = CaptureLayer::default();
		let _guard = capture.install();
		let dispatcher = dispatcher(FailingResponder::default(), Duration::from_millis(1));

		let outcome = dispatcher.dispatch(event("slow")).await;

		assert!(outcome.is_success());
		assert_eq!(*dispatcher.responder.attempts.lock().expect("lock shouldn't be poisoned"), 1);
		assert!(capture.contains(Level::WARN, "longer than the response window"));
	}

	#[tokio::test]
	async fn replies_inside_the_response_window_do_not_warn() {
		let capture = CaptureLayer::default();
		let _guard = capture.install();
		let dispatcher = dispatcher(FailingResponder::default(), Duration::from_secs(3));

		dispatcher.dispatch(event("slow")).await;

		assert!(!capture.contains(Level::WARN, "longer than the response window"));
	}

	#[tokio::test]
	async fn unknown_commands_are_logged_as_errors() {
		let capture = CaptureLayer::default();
		let _guard = capture.install();
		let dispatcher = dispatcher(FailingResponder::default(), Duration::from_secs(3));

		let outcome = dispatcher.dispatch(event("use")).await;

		assert!(matches!(
			outcome,
			InvocationOutcome::Failed(DispatchError::Registry(RegistryError::UnknownCommand(_)))
		));
		assert!(capture.contains(Level::ERROR, "isn't registered"));
		assert_eq!(*dispatcher.responder.attempts.lock().expect("lock shouldn't be poisoned"), 1);
	}
}
