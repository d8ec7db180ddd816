//! Event bus for lifecycle notifications.
//!
//! Applied commands publish typed events on a broadcast channel so that
//! out-of-scope collaborators (notification fan-out, timeline views) can
//! react without being wired into the command path. Publishing is
//! fire-and-forget: a command never fails because nobody is subscribed.

use lifecycle_types::LifecycleEvent;
use tokio::sync::broadcast;

/// Broadcast bus carrying [`LifecycleEvent`]s to any number of subscribers.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<LifecycleEvent>,
}

impl EventBus {
	/// Creates a new event bus retaining up to `capacity` undelivered
	/// events per subscriber before older ones are dropped.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns the number of subscribers the event reached; an error means
	/// there are none, which callers may ignore.
	pub fn publish(
		&self,
		event: LifecycleEvent,
	) -> Result<usize, broadcast::error::SendError<LifecycleEvent>> {
		self.sender.send(event)
	}

	/// Creates a new subscription receiving all events published from now
	/// on.
	pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
		self.sender.subscribe()
	}
}
