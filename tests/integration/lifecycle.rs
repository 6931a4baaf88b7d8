//! Reference ownership across the whole object tree.
//!
//! Every wrapper owns exactly one foreign reference and gives it back exactly
//! once, after its callback registration is gone.

use crate::helpers::*;
use switchbridge::core::testing::AddRef;
use switchbridge::mixer::fake::{FakeInput, FakeSwitcher};
use switchbridge::prelude::*;
use switchbridge::Input;

#[test]
fn test_attach_registers_and_drop_releases() {
    let (fake, switcher) = studio();
    assert_eq!(fake.notifier().registered(), 1);

    drop(switcher);
    let counts = fake.notifier().counts();
    assert_eq!(counts.add_callback, 1);
    assert_eq!(counts.remove_callback, 1);
    assert_eq!(counts.release, 1);
    assert_eq!(fake.notifier().registered(), 0);
    assert!(fake.notifier().is_released());
}

#[test]
fn test_dispose_releases_immediately() {
    let (fake, switcher) = studio();
    switcher.dispose();
    assert!(fake.notifier().is_released());
    assert_eq!(fake.notifier().counts().release, 1);
}

#[test]
fn test_failed_registration_releases_without_remove() {
    init_tracing();
    let fake = FakeSwitcher::studio();
    fake.notifier().fail_next_add(Status::FAIL);

    let err = session(ErrorPolicy::Narrow).attach(fake.clone()).unwrap_err();
    assert_eq!(
        err,
        Error::OperationFailed {
            operation: "add_callback",
            status: Status::FAIL
        }
    );

    let counts = fake.notifier().counts();
    assert_eq!(counts.add_callback, 1);
    assert_eq!(counts.remove_callback, 0);
    assert_eq!(counts.release, 1);
}

#[test]
fn test_tree_references_returned_after_drop() {
    let (fake, switcher) = studio();
    let me_fake = fake.mix_effect_blocks()[0].clone();
    let keyer_fakes = me_fake.keyers();
    let dve_fake = keyer_fakes[1].dve().unwrap();
    let audio_fakes = fake.audio_inputs();

    {
        let inputs: Vec<_> = switcher.inputs().unwrap().collect::<Result<_>>().unwrap();
        let blocks: Vec<_> = switcher.mix_effect_blocks().unwrap().collect::<Result<_>>().unwrap();
        let keyers: Vec<_> = blocks[0].keyers().unwrap().collect::<Result<_>>().unwrap();
        let dve = keyers[1].dve().unwrap();
        let audio: Vec<_> = switcher.audio_inputs().unwrap().collect::<Result<_>>().unwrap();
        let bands: Vec<_> = audio[0].equalizer_bands().unwrap().collect::<Result<_>>().unwrap();

        assert_eq!(inputs.len(), 4);
        assert_eq!(bands.len(), 4);
        for input in fake.inputs() {
            assert_eq!(input.notifier().registered(), 1);
            assert_eq!(input.notifier().outstanding(), 2);
        }
        assert_eq!(dve_fake.notifier().registered(), 1);
        drop(dve);
        assert_eq!(dve_fake.notifier().registered(), 0);
    }

    drop(switcher);

    assert!(fake.notifier().is_released());
    // The fake tree keeps its own reference to every child; nothing else may.
    for input in fake.inputs() {
        assert_eq!(input.notifier().outstanding(), 1);
        assert_eq!(input.notifier().registered(), 0);
    }
    assert_eq!(me_fake.notifier().outstanding(), 1);
    for keyer in &keyer_fakes {
        assert_eq!(keyer.notifier().outstanding(), 1);
    }
    assert_eq!(dve_fake.notifier().outstanding(), 1);
    for audio in &audio_fakes {
        assert_eq!(audio.notifier().outstanding(), 1);
        for band in audio.bands() {
            assert_eq!(band.notifier().outstanding(), 1);
            assert_eq!(band.notifier().registered(), 0);
        }
    }
}

#[test]
fn test_children_outlive_parent() {
    let (fake, switcher) = studio();
    let camera: Input<FakeInput> = switcher.input_by_id(InputId(1)).unwrap();

    drop(switcher);
    assert!(fake.notifier().is_released());

    // The child holds its own reference and keeps working.
    assert_eq!(camera.long_name().unwrap(), "Camera 1");
    let camera_fake = fake.inputs()[1].clone();
    assert_eq!(camera_fake.notifier().registered(), 1);
    drop(camera);
    assert_eq!(camera_fake.notifier().outstanding(), 1);
}

#[test]
fn test_session_wraps_foreign_reference() {
    init_tracing();
    let fake = FakeSwitcher::studio();
    let camera_fake = fake.inputs()[2].clone();

    let camera: Input<FakeInput> = session(ErrorPolicy::Classify)
        .wrap(camera_fake.add_ref())
        .unwrap();
    assert_eq!(camera.short_name().unwrap(), "CAM2");
    assert_eq!(camera_fake.notifier().outstanding(), 2);

    camera.dispose();
    assert_eq!(camera_fake.notifier().outstanding(), 1);
    assert_eq!(camera_fake.notifier().registered(), 0);
}

#[test]
fn test_wrappers_have_distinct_identities() {
    let (_fake, switcher) = studio();
    let first = switcher.input_by_id(InputId(1)).unwrap();
    let second = switcher.input_by_id(InputId(1)).unwrap();

    assert_ne!(first.id(), second.id());
    assert_ne!(first.id(), switcher.id());
}
