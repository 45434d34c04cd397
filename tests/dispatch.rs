//! Dispatch path: ordering across producers and non-blocking enqueue.

pub mod common;

use common::harness::{Call, Recorder, init_tracing, new_log};
use mtp_receiver::{DispatchOutcome, MtpReceiver, Notification, ReceiverConfig, ShutdownPolicy};
use std::{
    collections::HashMap,
    sync::{Arc, Barrier},
    time::{Duration, Instant},
};

const PRODUCERS: usize = 4;
const PER_PRODUCER: usize = 50;

#[test]
fn test_concurrent_producers_keep_their_order() {
    init_tracing();
    let log = new_log();
    let receiver = Arc::new(MtpReceiver::default());
    receiver.start().unwrap();
    let barrier = Arc::new(Barrier::new(PRODUCERS));

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let receiver = receiver.clone();
            let barrier = barrier.clone();
            let log = log.clone();
            std::thread::spawn(move || {
                barrier.wait();
                let mut seqs = Vec::with_capacity(PER_PRODUCER);
                for i in 0..PER_PRODUCER {
                    // Each item carries its own tag so the log shows who sent it.
                    let tag = producer * PER_PRODUCER + i;
                    let ctx = Recorder::new(tag, log.clone()).into_context();
                    let connected = i % 2 == 0;
                    let notification = Notification::usb_state(connected, true, false, true);
                    let outcome = receiver.on_receive(&notification, &ctx).unwrap();
                    match outcome {
                        DispatchOutcome::Enqueued(seq) => seqs.push(seq),
                        DispatchOutcome::Ignored => panic!("USB_STATE must be queued"),
                    }
                }
                seqs
            })
        })
        .collect();

    let mut seq_of_tag = HashMap::new();
    for (producer, handle) in producers.into_iter().enumerate() {
        let seqs = handle.join().unwrap();
        assert!(seqs.windows(2).all(|w| w[0] < w[1]));
        for (i, seq) in seqs.into_iter().enumerate() {
            seq_of_tag.insert(producer * PER_PRODUCER + i, seq);
        }
    }

    let stats = receiver.shutdown().unwrap().unwrap();
    assert_eq!(stats.processed as usize, PRODUCERS * PER_PRODUCER);

    let log = log.lock().unwrap().clone();
    assert_eq!(log.len(), PRODUCERS * PER_PRODUCER * 2);

    // Items are handled one at a time: each service call is immediately
    // followed by its own data-layer notification.
    for pair in log.chunks(2) {
        assert_eq!(pair[0].tag, pair[1].tag);
        match (pair[0].call, pair[1].call) {
            (Call::Start(_), Call::NotifyConnected) | (Call::Stop, Call::NotifyDisconnected) => {}
            other => panic!("unexpected call pair {other:?}"),
        }
    }

    // Processing order is the enqueue order.
    let processed: Vec<u64> = log.chunks(2).map(|pair| seq_of_tag[&pair[0].tag]).collect();
    let mut sorted = processed.clone();
    sorted.sort_unstable();
    assert_eq!(processed, sorted);
    sorted.dedup();
    assert_eq!(sorted.len(), PRODUCERS * PER_PRODUCER);

    // And within each producer, submission order.
    for producer in 0..PRODUCERS {
        let range = producer * PER_PRODUCER..(producer + 1) * PER_PRODUCER;
        let tags: Vec<usize> = log
            .chunks(2)
            .map(|pair| pair[0].tag)
            .filter(|tag| range.contains(tag))
            .collect();
        assert!(tags.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_dispatch_does_not_wait_for_slow_service() {
    init_tracing();
    let log = new_log();
    let config = ReceiverConfig::default().with_shutdown_policy(ShutdownPolicy::Discard);
    let receiver = MtpReceiver::new(config);
    receiver.start().unwrap();

    let slow_call = Duration::from_millis(200);
    let ctx = Recorder::new(0, log.clone())
        .with_delay(slow_call)
        .into_context();

    let begin = Instant::now();
    for i in 0..100 {
        let notification = Notification::usb_state(i % 2 == 0, true, true, true);
        receiver.on_receive(&notification, &ctx).unwrap();
    }
    let total = begin.elapsed();

    // A hundred dispatches finish well within a single slow service call.
    assert!(total < slow_call, "dispatching took {total:?}");

    let stats = receiver.shutdown().unwrap().unwrap();
    assert_eq!(stats.enqueued, 100);
    assert_eq!(stats.processed + stats.discarded, 100);
}

#[test]
fn test_missing_attributes_decide_stop() {
    init_tracing();
    let log = new_log();
    let receiver = MtpReceiver::default();
    receiver.start().unwrap();
    let ctx = Recorder::new(0, log.clone()).into_context();

    let empty = Notification::new(mtp_receiver::Action::UsbState, Default::default());
    receiver.on_receive(&empty, &ctx).unwrap();
    receiver.shutdown().unwrap();

    assert_eq!(
        common::harness::calls(&log),
        vec![Call::Stop, Call::NotifyDisconnected]
    );
}
