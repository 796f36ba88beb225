//! Tests for load notifications.

use super::*;

#[test]
fn display_lists_every_name() {
    let notification = LoadNotification::NativePluginsFailed {
        names: vec!["calc".into(), "clock".into()],
    };
    assert_eq!(
        notification.to_string(),
        "failed to load native plugins: calc, clock"
    );
}

#[test]
fn channel_notifier_delivers_in_order() {
    let (notifier, receiver) = ChannelNotifier::unbounded();
    notifier.notify(LoadNotification::NativePluginsFailed {
        names: vec!["a".into()],
    });
    notifier.notify(LoadNotification::NativePluginsFailed {
        names: vec!["b".into()],
    });
    let received: Vec<LoadNotification> = receiver.try_iter().collect();
    assert_eq!(received.len(), 2);
    assert_eq!(
        received.first(),
        Some(&LoadNotification::NativePluginsFailed {
            names: vec!["a".into()]
        })
    );
}

#[test]
fn disconnected_receiver_is_tolerated() {
    let (notifier, receiver) = ChannelNotifier::unbounded();
    drop(receiver);
    notifier.notify(LoadNotification::NativePluginsFailed {
        names: vec!["calc".into()],
    });
}

#[test]
fn serialises_with_kind_tag() {
    let json = serde_json::to_string(&LoadNotification::NativePluginsFailed {
        names: vec!["calc".into()],
    })
    .expect("serialise");
    assert_eq!(json, r#"{"kind":"native_plugins_failed","names":["calc"]}"#);
}
