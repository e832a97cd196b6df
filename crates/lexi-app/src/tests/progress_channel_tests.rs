use std::time::Duration;

use lexi_types::LoaderEvent;
use tokio::time::timeout;

#[tokio::test]
async fn spawned_loader_task_delivers_events() {
    let (tx, rx) = kanal::unbounded_async::<LoaderEvent>();

    tokio::spawn(async move {
        tx.send(LoaderEvent::ChunkLoaded {
            chunk_number: 1,
            word_count: 512,
            from_cache: true,
        })
        .await
        .expect("send failed");
    });

    let result = timeout(Duration::from_secs(2), rx.recv()).await;

    match result {
        Ok(Ok(LoaderEvent::ChunkLoaded {
            chunk_number,
            word_count,
            from_cache,
        })) => {
            assert_eq!(chunk_number, 1);
            assert_eq!(word_count, 512);
            assert!(from_cache);
        }
        Ok(Ok(_)) => panic!("Wrong event type"),
        Ok(Err(e)) => panic!("Channel error: {}", e),
        Err(_) => panic!("Timeout - event never arrived!"),
    }
}

#[tokio::test]
async fn events_from_one_sender_arrive_in_order() {
    let (tx, rx) = kanal::bounded_async::<LoaderEvent>(8);

    tokio::spawn(async move {
        for n in 1..=5u32 {
            tx.send(LoaderEvent::ChunkLoaded {
                chunk_number: n,
                word_count: 0,
                from_cache: false,
            })
            .await
            .expect("send failed");
        }
        tx.send(LoaderEvent::Complete { total_words: 42 })
            .await
            .expect("send failed");
    });

    let result = timeout(Duration::from_secs(2), async {
        let mut expected = 1u32;
        loop {
            match rx.recv().await.expect("recv failed") {
                LoaderEvent::ChunkLoaded { chunk_number, .. } => {
                    assert_eq!(chunk_number, expected);
                    expected += 1;
                }
                LoaderEvent::Complete { total_words } => {
                    assert_eq!(expected, 6);
                    assert_eq!(total_words, 42);
                    break;
                }
                other => panic!("Unexpected event: {:?}", other),
            }
        }
    })
    .await;

    assert!(result.is_ok(), "Timeout waiting for events!");
}

#[tokio::test]
async fn dropped_receiver_does_not_wedge_the_sender() {
    let (tx, rx) = kanal::bounded_async::<LoaderEvent>(1);
    drop(rx);

    // The loader ignores send failures; a closed channel must surface
    // as an error rather than blocking forever.
    let result = timeout(
        Duration::from_secs(2),
        tx.send(LoaderEvent::Complete { total_words: 0 }),
    )
    .await;

    match result {
        Ok(send_result) => assert!(send_result.is_err()),
        Err(_) => panic!("Timeout - send blocked on a closed channel!"),
    }
}
