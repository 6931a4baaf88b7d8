//! Notification delivery, routing, and teardown racing foreign threads.

use crate::helpers::*;
use approx::assert_relative_eq;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use switchbridge::mixer::fake::{FakeInput, FakeSwitcher};
use switchbridge::prelude::*;
use switchbridge::{Discriminant, Input};

#[test]
fn test_each_wrapper_gets_its_own_delivery() {
    let (fake, switcher) = studio();
    let first = switcher.input_by_id(InputId(1)).unwrap();
    let second = switcher.input_by_id(InputId(1)).unwrap();
    let senders = Arc::new(Mutex::new(Vec::new()));

    for input in [&first, &second] {
        let s = Arc::clone(&senders);
        input.on_program_tally_changed(move |sender| s.lock().push(sender));
    }

    fake.inputs()[1].set_tally(true, false);

    let senders = senders.lock();
    assert_eq!(senders.len(), 2);
    assert!(senders.contains(&first.id()));
    assert!(senders.contains(&second.id()));
}

#[test]
fn test_events_route_to_their_own_entity() {
    let (fake, switcher) = studio();
    let (mode_changes, on_mode) = counter();
    let (power_changes, on_power) = counter();
    switcher.on_video_mode_changed(on_mode);
    switcher.on_power_status_changed(on_power);

    fake.fire(SwitcherEvent::VideoModeChanged);
    fake.fire(SwitcherEvent::VideoModeChanged);
    fake.fire(SwitcherEvent::PowerStatusChanged);

    assert_eq!(load(&mode_changes), 2);
    assert_eq!(load(&power_changes), 1);
}

#[test]
fn test_unknown_discriminant_is_ignored() {
    let (fake, switcher) = studio();
    let (count, handler) = counter();
    switcher.on_disconnected(handler);

    fake.fire_raw(0xdead_beef);
    assert_eq!(load(&count), 0);
    fake.fire(SwitcherEvent::Disconnected);
    assert_eq!(load(&count), 1);
}

#[test]
fn test_cut_notifies_program_then_preview() {
    let (fake, switcher) = studio();
    let me = switcher.mix_effect_blocks().unwrap().next().unwrap().unwrap();
    let order = Arc::new(Mutex::new(Vec::new()));

    for event in [MixEffectEvent::PreviewInputChanged, MixEffectEvent::ProgramInputChanged] {
        let o = Arc::clone(&order);
        me.subscribe(event, move |_, e| o.lock().push(*e));
    }

    me.set_program_input(InputId(1)).unwrap();
    me.set_preview_input(InputId(2)).unwrap();
    assert!(order.lock().is_empty());

    me.perform_cut().unwrap();
    assert_eq!(
        *order.lock(),
        vec![MixEffectEvent::ProgramInputChanged, MixEffectEvent::PreviewInputChanged]
    );
    assert_eq!(me.program_input().unwrap(), InputId(2));

    fake.mix_effect_blocks()[0].complete_transition();
    assert_eq!(order.lock().len(), 4);
}

#[test]
fn test_levels_from_foreign_thread() {
    let (fake, switcher) = studio();
    let audio = switcher.audio_inputs().unwrap().next().unwrap().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    audio.on_levels_changed(move |_, levels| s.lock().push(levels.max_level()));

    let foreign = fake.audio_inputs()[0].clone();
    thread::spawn(move || {
        for db in [-30.0, -20.0, -10.0] {
            foreign.fire_levels(&AudioLevels::stereo(db, db - 1.0, db + 3.0, db + 2.0));
        }
    })
    .join()
    .unwrap();

    let seen = seen.lock();
    assert_eq!(seen.len(), 3);
    for (level, expected) in seen.iter().zip([-30.0, -20.0, -10.0]) {
        assert_relative_eq!(level.unwrap(), expected);
    }
}

#[test]
fn test_drop_waits_for_running_handler() {
    let (fake, switcher) = studio();
    let (entered_tx, entered_rx) = mpsc::channel();
    let entered_tx = Mutex::new(entered_tx);
    let finished = Arc::new(AtomicBool::new(false));

    let f = Arc::clone(&finished);
    switcher.on_video_mode_changed(move |_| {
        let _ = entered_tx.lock().send(());
        thread::sleep(Duration::from_millis(100));
        f.store(true, Ordering::SeqCst);
    });

    let foreign = fake.clone();
    let firing = thread::spawn(move || foreign.fire(SwitcherEvent::VideoModeChanged));

    entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    drop(switcher);
    // Teardown may not return while the handler is still running.
    assert!(finished.load(Ordering::SeqCst));
    assert!(fake.notifier().is_released());

    firing.join().unwrap();
}

#[test]
fn test_no_delivery_after_dispose_under_load() {
    let (fake, switcher) = studio();
    let (count, handler) = counter();
    switcher.on_video_mode_changed(handler);

    let stop = Arc::new(AtomicBool::new(false));
    let storms: Vec<_> = (0..4)
        .map(|_| {
            let foreign = fake.clone();
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::SeqCst) {
                    foreign.fire(SwitcherEvent::VideoModeChanged);
                }
            })
        })
        .collect();

    while load(&count) < 100 {
        thread::yield_now();
    }
    switcher.dispose();
    let at_dispose = load(&count);

    thread::sleep(Duration::from_millis(20));
    stop.store(true, Ordering::SeqCst);
    for storm in storms {
        storm.join().unwrap();
    }

    assert_eq!(load(&count), at_dispose);
    assert!(fake.notifier().is_released());
}

#[test]
fn test_handler_may_dispose_its_own_object() {
    let (fake, switcher) = studio();
    let camera: Input<FakeInput> = switcher.input_by_id(InputId(1)).unwrap();
    let camera_fake = fake.inputs()[1].clone();

    let slot = Arc::new(Mutex::new(Some(camera)));
    let s = Arc::clone(&slot);
    let (count, bump) = counter();
    slot.lock().as_ref().unwrap().on_program_tally_changed(move |sender| {
        bump(sender);
        let taken = s.lock().take();
        if let Some(camera) = taken {
            camera.dispose();
        }
    });

    camera_fake.set_tally(true, true);
    assert!(slot.lock().is_none());
    assert_eq!(load(&count), 1);
    assert_eq!(camera_fake.notifier().outstanding(), 1);
    assert_eq!(camera_fake.notifier().registered(), 0);

    camera_fake.set_tally(false, false);
    assert_eq!(load(&count), 1);
}

#[test]
fn test_unsubscribed_handler_stops_receiving() {
    let (fake, switcher) = studio();
    let (count, handler) = counter();
    let id = switcher.on_power_status_changed(handler);

    fake.fire(SwitcherEvent::PowerStatusChanged);
    assert!(switcher.unsubscribe(SwitcherEvent::PowerStatusChanged, id));
    assert!(!switcher.unsubscribe(SwitcherEvent::PowerStatusChanged, id));
    fake.fire(SwitcherEvent::PowerStatusChanged);

    assert_eq!(load(&count), 1);
}

#[test]
fn test_attach_with_events_sees_state_reported_on_registration() {
    init_tracing();
    let fake = FakeSwitcher::studio();
    fake.notifier().fire_on_add(SwitcherEvent::PowerStatusChanged.raw());

    let (count, handler) = counter();
    let events = EventTable::new();
    events.subscribe(SwitcherEvent::PowerStatusChanged, move |sender, _| {
        handler(sender)
    });
    let switcher = session(ErrorPolicy::Narrow)
        .attach_with_events(fake.clone(), events)
        .unwrap();
    assert_eq!(load(&count), 1);

    fake.fire(SwitcherEvent::PowerStatusChanged);
    assert_eq!(load(&count), 2);

    drop(switcher);
    assert!(fake.notifier().is_released());
}
