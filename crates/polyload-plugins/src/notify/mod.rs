//! User-facing notifications emitted by a loading pass.
//!
//! The loader never talks to a UI toolkit. It pushes a [`LoadNotification`]
//! through a [`Notifier`] and carries on; the host's UI layer drains the
//! channel whenever it likes.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use serde::Serialize;
use tracing::warn;

/// Tracing target for notification delivery.
const NOTIFY_TARGET: &str = "polyload_plugins::notify";

/// A message intended for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadNotification {
    /// One or more native modules failed to load during a pass.
    NativePluginsFailed {
        /// Names of the failed plugins, in catalog order.
        names: Vec<String>,
    },
}

impl std::fmt::Display for LoadNotification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NativePluginsFailed { names } => {
                write!(f, "failed to load native plugins: {}", names.join(", "))
            }
        }
    }
}

/// Sink for user notifications.
///
/// Implementations must not block the caller.
pub trait Notifier {
    /// Queues a notification for delivery.
    fn notify(&self, notification: LoadNotification);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, notification: LoadNotification) {
        (**self).notify(notification);
    }
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notification: LoadNotification) {
        (**self).notify(notification);
    }
}

/// Delivers notifications over an unbounded channel.
///
/// # Example
///
/// ```
/// use polyload_plugins::{ChannelNotifier, LoadNotification, Notifier};
///
/// let (notifier, receiver) = ChannelNotifier::unbounded();
/// notifier.notify(LoadNotification::NativePluginsFailed {
///     names: vec!["calc".into()],
/// });
/// assert_eq!(receiver.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: Sender<LoadNotification>,
}

impl ChannelNotifier {
    /// Wraps an existing sender.
    #[must_use]
    pub const fn new(sender: Sender<LoadNotification>) -> Self {
        Self { sender }
    }

    /// Creates a notifier together with the receiving end for the UI layer.
    #[must_use]
    pub fn unbounded() -> (Self, Receiver<LoadNotification>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self::new(sender), receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: LoadNotification) {
        if let Err(err) = self.sender.try_send(notification) {
            warn!(
                target: NOTIFY_TARGET,
                notification = %err.into_inner(),
                "notification dropped; no receiver is listening"
            );
        }
    }
}

#[cfg(test)]
mod tests;
