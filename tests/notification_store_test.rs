use actions_dashboard::clients::{NotificationClient, StoreClient};
use actions_dashboard::framework::{ManualScheduler, TokioScheduler};
use actions_dashboard::notification_store::{
    NotificationContext, NotificationKind, NotificationMessage,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

fn start(scheduler: ManualScheduler) -> (NotificationClient, JoinHandle<()>) {
    let (actor, client) = actions_dashboard::notification_store::new();
    let handle = tokio::spawn(actor.run(NotificationContext {
        scheduler: Arc::new(scheduler),
    }));
    (client, handle)
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[tokio::test]
async fn test_notification_expires_after_its_duration() {
    let clock = ManualScheduler::new();
    let (client, handle) = start(clock.clone());

    let id = client
        .push("Saved", NotificationKind::Success, ms(3000))
        .await
        .unwrap();
    assert_eq!(client.list().await.unwrap()[0].id, id);

    clock.advance(ms(2999));
    assert_eq!(client.list().await.unwrap().len(), 1);

    clock.advance(ms(1));
    assert!(client.list().await.unwrap().is_empty());
    assert_eq!(clock.pending(), 0);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_expiry_is_not_lost_when_the_mailbox_is_full() {
    let clock = ManualScheduler::new();
    let (client, handle) = start(clock.clone());
    client
        .push("Saved", NotificationKind::Success, ms(3000))
        .await
        .unwrap();

    // Fill every slot while the store is not running.
    let mut answers = Vec::new();
    loop {
        let (respond_to, answer) = oneshot::channel();
        if client
            .mailbox()
            .try_post(NotificationMessage::List(respond_to))
            .is_err()
        {
            break;
        }
        answers.push(answer);
    }
    assert_eq!(answers.len(), 64);

    clock.advance(ms(3000));
    assert_eq!(clock.pending(), 0);

    for answer in answers {
        assert_eq!(answer.await.unwrap().len(), 1);
    }
    assert!(client.list().await.unwrap().is_empty());

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_zero_duration_is_sticky() {
    let clock = ManualScheduler::new();
    let (client, handle) = start(clock.clone());

    client
        .push("Read me", NotificationKind::Warning, Duration::ZERO)
        .await
        .unwrap();
    assert_eq!(clock.pending(), 0);

    clock.advance(Duration::from_secs(3600));
    let shown = client.list().await.unwrap();
    assert_eq!(shown.len(), 1);
    assert!(shown[0].is_sticky());

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_helpers_use_default_durations() {
    let clock = ManualScheduler::new();
    let (client, handle) = start(clock.clone());

    client.success("ok").await.unwrap();
    client.error("failed").await.unwrap();
    client.warning("careful").await.unwrap();
    client.info("fyi").await.unwrap();

    let kinds: Vec<_> = client
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|n| (n.kind, n.expires_after))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (NotificationKind::Success, ms(3000)),
            (NotificationKind::Error, ms(5000)),
            (NotificationKind::Warning, ms(4000)),
            (NotificationKind::Info, ms(3000)),
        ]
    );

    // Success and info go first; the error outlives the warning.
    clock.advance(ms(3000));
    clock.advance(ms(1000));
    let left: Vec<_> = client.list().await.unwrap().into_iter().map(|n| n.kind).collect();
    assert_eq!(left, vec![NotificationKind::Error]);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_remove_cancels_the_timer() {
    let clock = ManualScheduler::new();
    let (client, handle) = start(clock.clone());

    let first = client.success("one").await.unwrap();
    client.success("two").await.unwrap();
    assert_eq!(clock.pending(), 2);

    assert!(client.remove(&first).await.unwrap());
    assert_eq!(clock.pending(), 1);
    assert!(!client.remove(&first).await.unwrap());
    assert!(!client.remove("toast-404").await.unwrap());

    let shown = client.list().await.unwrap();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].message, "two");

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_clear_leaves_timers_that_fire_harmlessly() {
    let clock = ManualScheduler::new();
    let (client, handle) = start(clock.clone());

    client.success("one").await.unwrap();
    client.error("two").await.unwrap();
    client.clear().await.unwrap();
    assert!(client.list().await.unwrap().is_empty());
    assert_eq!(clock.pending(), 2);

    let later = client.info("three").await.unwrap();
    clock.advance(ms(5000));

    assert!(client.list().await.unwrap().is_empty());
    assert_eq!(later, "toast-3");

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_insertion_order_and_duplicates() {
    let clock = ManualScheduler::new();
    let (client, handle) = start(clock);

    let a = client.info("same").await.unwrap();
    let b = client.info("same").await.unwrap();
    assert_eq!((a.as_str(), b.as_str()), ("toast-1", "toast-2"));

    let shown = client.list().await.unwrap();
    assert_eq!(shown.len(), 2);
    assert_eq!(shown[0].id, "toast-1");
    assert_eq!(shown[1].id, "toast-2");
    assert_eq!(shown[0].message, shown[1].message);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_timer_firing_after_shutdown_is_ignored() {
    let clock = ManualScheduler::new();
    let (client, handle) = start(clock.clone());

    client.success("bye").await.unwrap();
    drop(client);
    handle.await.unwrap();

    // The store is gone; the expiry has nowhere to go.
    clock.advance(ms(3000));
    assert_eq!(clock.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_real_timer_expires_notification() {
    let (actor, client) = actions_dashboard::notification_store::new();
    let handle = tokio::spawn(actor.run(NotificationContext {
        scheduler: Arc::new(TokioScheduler),
    }));

    client.error("Network down").await.unwrap();
    tokio::time::sleep(ms(4999)).await;
    assert_eq!(client.list().await.unwrap().len(), 1);

    tokio::time::sleep(ms(2)).await;
    assert!(client.list().await.unwrap().is_empty());

    drop(client);
    handle.await.unwrap();
}
