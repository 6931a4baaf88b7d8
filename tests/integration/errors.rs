//! Status translation under both error policies.

use crate::helpers::*;
use approx::relative_eq;
use proptest::prelude::*;
use switchbridge::prelude::*;

#[test]
fn test_narrow_policy_across_tree() {
    let (fake, switcher) = studio();
    let camera = switcher.input_by_id(InputId(1)).unwrap();

    // Rejected by the device: passed through untouched.
    let err = camera.set_short_name("CAMERA").unwrap_err();
    assert_eq!(err.status(), Some(Status::INVALID_ARG));
    assert!(err.is_platform());
    assert_eq!(camera.short_name().unwrap(), "CAM1");

    // Generic failure: the one status the narrow policy names.
    fake.inputs()[1].fail_next(Status::FAIL);
    let err = camera.set_long_name("Wide").unwrap_err();
    assert_eq!(
        err,
        Error::OperationFailed {
            operation: "set_long_name",
            status: Status::FAIL
        }
    );
    assert_eq!(camera.long_name().unwrap(), "Camera 1");
}

#[test]
fn test_classify_policy_inherited_by_children() {
    let (fake, switcher) = studio_with(ErrorPolicy::Classify);
    assert_eq!(switcher.config().error_policy, ErrorPolicy::Classify);

    let camera = switcher.input_by_id(InputId(1)).unwrap();
    assert!(matches!(
        camera.set_short_name("CAMERA"),
        Err(Error::InvalidArgument(_))
    ));

    let me = switcher.mix_effect_blocks().unwrap().next().unwrap().unwrap();
    let keyer = me.keyers().unwrap().nth(1).unwrap().unwrap();
    let dve = keyer.dve().unwrap();
    fake.mix_effect_blocks()[0].keyers()[1]
        .dve()
        .unwrap()
        .fail_next(Status::NOT_IMPL);
    assert!(matches!(dve.set_rotation(45.0), Err(Error::NotSupported { .. })));
}

#[test]
fn test_unsupported_video_mode() {
    let (fake, switcher) = studio_with(ErrorPolicy::Classify);
    assert!(!switcher.supports_video_mode(VideoMode::Uhd2160p25).unwrap());
    assert!(matches!(
        switcher.set_video_mode(VideoMode::Uhd2160p25),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(switcher.video_mode().unwrap(), VideoMode::Hd1080p50);

    fake.fail_next(Status::ABORT);
    let err = switcher.set_video_mode(VideoMode::Hd720p50).unwrap_err();
    assert!(err.is_operation_failed());
    assert_eq!(err.status(), Some(Status::ABORT));
}

#[test]
fn test_missing_capability_is_not_supported() {
    let (_fake, switcher) = studio();
    let me = switcher.mix_effect_blocks().unwrap().next().unwrap().unwrap();
    let plain = me.keyers().unwrap().next().unwrap().unwrap();

    assert_eq!(plain.dve().unwrap_err(), Error::NotSupported { interface: "Dve" });
    assert_eq!(plain.dve().unwrap_err().status(), None);
}

#[test]
fn test_failures_are_reported_once() {
    let (fake, switcher) = studio();
    let me = switcher.mix_effect_blocks().unwrap().next().unwrap().unwrap();

    fake.mix_effect_blocks()[0].fail_next(Status::FAIL);
    assert!(me.perform_cut().unwrap_err().is_operation_failed());
    // Not retried: the next call sees a healthy device.
    me.perform_cut().unwrap();
}

#[test]
fn test_error_messages() {
    let (_fake, switcher) = studio();
    let camera = switcher.input_by_id(InputId(2)).unwrap();
    let err = camera.set_short_name("TOO LONG").unwrap_err();
    assert!(err.to_string().contains("foreign call returned"));

    let miss = switcher.input_by_id(InputId(42)).unwrap_err();
    assert!(miss.to_string().starts_with("Invalid argument"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rejected_write_keeps_status_and_value(code in i32::MIN..0, gain in -60.0f64..6.0) {
        let (fake, switcher) = studio();
        let audio = switcher.audio_inputs().unwrap().next().unwrap().unwrap();
        let before = audio.gain().unwrap();

        let status = Status::from_code(code);
        fake.audio_inputs()[0].fail_next(status);
        let err = audio.set_gain(gain).unwrap_err();
        prop_assert_eq!(err.status(), Some(status));
        prop_assert!(relative_eq!(audio.gain().unwrap(), before));

        audio.set_gain(gain).unwrap();
        prop_assert!(relative_eq!(audio.gain().unwrap(), gain));
    }
}
