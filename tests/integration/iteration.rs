//! Enumeration and lookup of child objects.

use crate::helpers::*;
use switchbridge::prelude::*;

#[test]
fn test_every_input_reachable_by_id() {
    let (_fake, switcher) = studio();

    let ids: Vec<InputId> = switcher
        .inputs()
        .unwrap()
        .map(|input| input.and_then(|i| i.input_id()))
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(ids, vec![InputId::BLACK, InputId(1), InputId(2), InputId(1000)]);

    for id in ids {
        let input = switcher.input_by_id(id).unwrap();
        assert_eq!(input.input_id().unwrap(), id);
    }
}

#[test]
fn test_enumerations_are_independent() {
    let (_fake, switcher) = studio();
    let mut first = switcher.inputs().unwrap();
    let mut second = switcher.inputs().unwrap();

    first.next().unwrap().unwrap();
    first.next().unwrap().unwrap();
    let head = second.next().unwrap().unwrap();
    assert_eq!(head.long_name().unwrap(), "Black");
    assert_eq!(first.count(), 2);
    assert_eq!(second.count(), 3);
}

#[test]
fn test_exhausted_enumeration_stays_exhausted() {
    let (_fake, switcher) = studio();
    let mut blocks = switcher.mix_effect_blocks().unwrap();

    assert!(blocks.next().is_some());
    assert!(blocks.next().is_none());
    assert!(blocks.is_exhausted());
    assert!(blocks.next().is_none());
}

#[test]
fn test_partial_enumeration_releases_iterator_and_children() {
    let (fake, switcher) = studio();
    let taken: Vec<_> = switcher.inputs().unwrap().take(2).collect::<Result<_>>().unwrap();
    assert_eq!(taken.len(), 2);
    drop(taken);

    for input in fake.inputs() {
        assert_eq!(input.notifier().outstanding(), 1);
    }
}

#[test]
fn test_enumeration_failure_is_translated() {
    let (fake, switcher) = studio();
    fake.fail_next_enumeration(Status::FAIL);

    let err = switcher.inputs().unwrap_err();
    assert_eq!(
        err,
        Error::OperationFailed {
            operation: "create_iterator",
            status: Status::FAIL
        }
    );
    // Only that one call failed.
    assert_eq!(switcher.inputs().unwrap().count(), 4);
}

#[test]
fn test_lookup_failure_under_classify() {
    let (fake, switcher) = studio_with(ErrorPolicy::Classify);
    fake.fail_next_enumeration(Status::NOT_IMPL);

    assert!(matches!(
        switcher.input_by_id(InputId(1)),
        Err(Error::NotSupported { .. })
    ));
}

#[test]
fn test_nested_enumeration_reaches_leaves() {
    let (fake, switcher) = studio();

    let audio: Vec<_> = switcher.audio_inputs().unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(audio.len(), 2);
    let bands: Vec<_> = audio[1].equalizer_bands().unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(bands.len(), 4);

    bands[2].set_gain(4.5).unwrap();
    bands[2].set_shape(BandShape::HighShelf).unwrap();
    assert_eq!(fake.audio_inputs()[1].bands()[2].gain_value(), 4.5);
    assert_eq!(fake.audio_inputs()[0].bands()[2].gain_value(), 0.0);
    assert_eq!(bands[2].shape().unwrap(), BandShape::HighShelf);

    let me = switcher.mix_effect_blocks().unwrap().next().unwrap().unwrap();
    let keyers: Vec<_> = me.keyers().unwrap().collect::<Result<_>>().unwrap();
    assert!(keyers[0].try_dve().unwrap().is_none());
    let dve = keyers[1].dve().unwrap();
    dve.set_position(0.25, -0.25).unwrap();
    assert_eq!(dve.position().unwrap(), (0.25, -0.25));
}
