//! Echoing fake handles for every entity.
//!
//! Setters store the value and return success; getters return what was
//! stored. Setters never raise notifications on their own: tests fire them
//! explicitly with `fire`. Actions (`perform_cut` and friends) change state
//! and notify the way the device does.
//!
//! Each fake is a cheap clone over shared state. Keep one clone to inspect
//! and drive the fake, hand another to the wrapper under test.

use crate::audio_input::{
    AudioInputEvent, AudioInputFamily, AudioInputHandle, AudioLevels, AUDIO_INPUT_IID,
};
use crate::dve::{DveEvent, DveFamily, DveHandle, DVE_IID};
use crate::equalizer::{
    EqualizerBandEvent, EqualizerBandFamily, EqualizerBandHandle, EQUALIZER_BAND_IID,
};
use crate::input::{InputEvent, InputFamily, InputHandle, INPUT_IID};
use crate::keyer::{KeyerEvent, KeyerFamily, KeyerHandle, KEYER_IID};
use crate::mix_effect::{
    MixEffectBlockHandle, MixEffectEvent, MixEffectFamily, MIX_EFFECT_BLOCK_IID,
};
use crate::switcher::{SwitcherEvent, SwitcherFamily, SwitcherHandle, SWITCHER_IID};
use crate::types::{AudioMixOption, BandShape, InputId, VideoMode};
use parking_lot::Mutex;
use std::sync::Arc;
use switchbridge_core::testing::{AddRef, FakeIterator, FakeNotifier};
use switchbridge_core::{
    CreateIterator, Discriminant, EventFamily, ForeignHandle, InterfaceId, Notifier,
    QueryCapability, SinkRef, Status,
};

type Reply<T> = std::result::Result<T, Status>;

struct FakeState<F: EventFamily, V> {
    notifier: FakeNotifier<F>,
    fail: Mutex<Option<Status>>,
    values: Mutex<V>,
}

impl<F: EventFamily, V> FakeState<F, V> {
    fn new(values: V) -> Arc<Self> {
        Arc::new(Self {
            notifier: FakeNotifier::new(),
            fail: Mutex::new(None),
            values: Mutex::new(values),
        })
    }

    fn read<T>(&self, read: impl FnOnce(&V) -> T) -> Reply<T> {
        Ok(read(&self.values.lock()))
    }

    fn write(&self, write: impl FnOnce(&mut V)) -> Status {
        self.try_write(|values| {
            write(values);
            Status::OK
        })
    }

    fn try_write(&self, write: impl FnOnce(&mut V) -> Status) -> Status {
        if let Some(status) = self.fail.lock().take() {
            return status;
        }
        write(&mut self.values.lock())
    }
}

/// Foreign plumbing shared by every fake: reference counting, callback
/// registration, and the test-facing drive methods.
macro_rules! fake_plumbing {
    ($fake:ident, $family:ty, $event:ty, $iid:expr) => {
        impl ForeignHandle for $fake {
            const INTERFACE: InterfaceId = $iid;

            fn release(&self) {
                self.state.notifier.release();
            }
        }

        impl Notifier for $fake {
            type Family = $family;

            fn add_callback(&self, sink: &SinkRef<$family>) -> Status {
                self.state.notifier.add_callback(sink)
            }

            fn remove_callback(&self, sink: &SinkRef<$family>) -> Status {
                self.state.notifier.remove_callback(sink)
            }
        }

        impl AddRef for $fake {
            fn add_ref(&self) -> Self {
                self.state.notifier.add_ref();
                self.clone()
            }
        }

        impl $fake {
            pub fn notifier(&self) -> &FakeNotifier<$family> {
                &self.state.notifier
            }

            /// Raise a notification, as the device would.
            pub fn fire(&self, event: $event) {
                self.state.notifier.fire(event.raw());
            }

            /// Raise a raw discriminant, known or not.
            pub fn fire_raw(&self, raw: u32) {
                self.state.notifier.fire(raw);
            }

            /// Make the next setter or action fail with `status`.
            pub fn fail_next(&self, status: Status) {
                *self.state.fail.lock() = Some(status);
            }
        }

        impl std::fmt::Debug for $fake {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($fake))
                    .field("notifier", &self.state.notifier)
                    .finish()
            }
        }
    };
}

fn enumerate<T: Clone>(items: &[T]) -> Vec<(u64, T)> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (i as u64, item.clone()))
        .collect()
}

// --- EqualizerBand ---

#[derive(Debug, Clone, PartialEq)]
struct BandValues {
    enabled: bool,
    shape: BandShape,
    frequency: u32,
    gain: f64,
    q_factor: f64,
}

impl Default for BandValues {
    fn default() -> Self {
        Self {
            enabled: false,
            shape: BandShape::Bell,
            frequency: 1000,
            gain: 0.0,
            q_factor: 0.7,
        }
    }
}

#[derive(Clone)]
pub struct FakeEqualizerBand {
    state: Arc<FakeState<EqualizerBandFamily, BandValues>>,
}

fake_plumbing!(FakeEqualizerBand, EqualizerBandFamily, EqualizerBandEvent, EQUALIZER_BAND_IID);

impl FakeEqualizerBand {
    /// Flat band: disabled bell at 1 kHz, 0 dB, Q 0.7.
    pub fn new() -> Self {
        Self {
            state: FakeState::new(BandValues::default()),
        }
    }

    pub fn gain_value(&self) -> f64 {
        self.state.values.lock().gain
    }
}

impl Default for FakeEqualizerBand {
    fn default() -> Self {
        Self::new()
    }
}

impl EqualizerBandHandle for FakeEqualizerBand {
    fn enabled(&self) -> Reply<bool> {
        self.state.read(|v| v.enabled)
    }

    fn set_enabled(&self, enabled: bool) -> Status {
        self.state.write(|v| v.enabled = enabled)
    }

    fn shape(&self) -> Reply<BandShape> {
        self.state.read(|v| v.shape)
    }

    fn set_shape(&self, shape: BandShape) -> Status {
        self.state.write(|v| v.shape = shape)
    }

    fn frequency(&self) -> Reply<u32> {
        self.state.read(|v| v.frequency)
    }

    fn set_frequency(&self, hz: u32) -> Status {
        self.state.write(|v| v.frequency = hz)
    }

    fn gain(&self) -> Reply<f64> {
        self.state.read(|v| v.gain)
    }

    fn set_gain(&self, db: f64) -> Status {
        self.state.write(|v| v.gain = db)
    }

    fn q_factor(&self) -> Reply<f64> {
        self.state.read(|v| v.q_factor)
    }

    fn set_q_factor(&self, q: f64) -> Status {
        self.state.write(|v| v.q_factor = q)
    }

    fn reset(&self) -> Status {
        self.state.write(|v| *v = BandValues::default())
    }
}

// --- AudioInput ---

#[derive(Debug, Default)]
struct AudioInputValues {
    gain: f64,
    balance: f64,
    mix_option: AudioMixOption,
    peak_resets: usize,
}

#[derive(Clone)]
pub struct FakeAudioInput {
    state: Arc<FakeState<AudioInputFamily, AudioInputValues>>,
    bands: Arc<Vec<FakeEqualizerBand>>,
}

fake_plumbing!(FakeAudioInput, AudioInputFamily, AudioInputEvent, AUDIO_INPUT_IID);

impl FakeAudioInput {
    pub fn new() -> Self {
        Self::with_bands(Vec::new())
    }

    pub fn with_bands(bands: Vec<FakeEqualizerBand>) -> Self {
        Self {
            state: FakeState::new(AudioInputValues::default()),
            bands: Arc::new(bands),
        }
    }

    pub fn bands(&self) -> Vec<FakeEqualizerBand> {
        self.bands.to_vec()
    }

    /// Deliver one metering callback.
    pub fn fire_levels(&self, levels: &AudioLevels) {
        self.state.notifier.fire_payload(levels);
    }

    pub fn peak_resets(&self) -> usize {
        self.state.values.lock().peak_resets
    }
}

impl Default for FakeAudioInput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioInputHandle for FakeAudioInput {
    type EqualizerBand = FakeEqualizerBand;
    type EqualizerBandIterator = FakeIterator<FakeEqualizerBand>;

    fn gain(&self) -> Reply<f64> {
        self.state.read(|v| v.gain)
    }

    fn set_gain(&self, db: f64) -> Status {
        self.state.write(|v| v.gain = db)
    }

    fn balance(&self) -> Reply<f64> {
        self.state.read(|v| v.balance)
    }

    fn set_balance(&self, balance: f64) -> Status {
        self.state.write(|v| v.balance = balance)
    }

    fn mix_option(&self) -> Reply<AudioMixOption> {
        self.state.read(|v| v.mix_option)
    }

    fn set_mix_option(&self, option: AudioMixOption) -> Status {
        self.state.write(|v| v.mix_option = option)
    }

    fn is_mixed_in(&self) -> Reply<bool> {
        self.state.read(|v| v.mix_option == AudioMixOption::On)
    }

    fn reset_peak_levels(&self) -> Status {
        self.state.write(|v| v.peak_resets += 1)
    }
}

impl CreateIterator<FakeIterator<FakeEqualizerBand>> for FakeAudioInput {
    fn create_iterator(&self) -> Reply<Option<FakeIterator<FakeEqualizerBand>>> {
        Ok(Some(FakeIterator::new(enumerate(&self.bands))))
    }
}

// --- Input ---

#[derive(Debug)]
struct InputValues {
    id: InputId,
    long_name: String,
    short_name: String,
    program_tally: bool,
    preview_tally: bool,
}

#[derive(Clone)]
pub struct FakeInput {
    state: Arc<FakeState<InputFamily, InputValues>>,
}

fake_plumbing!(FakeInput, InputFamily, InputEvent, INPUT_IID);

impl FakeInput {
    pub const MAX_SHORT_NAME: usize = 4;

    pub fn new(id: InputId, long_name: &str, short_name: &str) -> Self {
        Self {
            state: FakeState::new(InputValues {
                id,
                long_name: long_name.to_owned(),
                short_name: short_name.to_owned(),
                program_tally: false,
                preview_tally: false,
            }),
        }
    }

    pub fn id(&self) -> InputId {
        self.state.values.lock().id
    }

    /// Change tally state and notify both tally events.
    pub fn set_tally(&self, program: bool, preview: bool) {
        {
            let mut values = self.state.values.lock();
            values.program_tally = program;
            values.preview_tally = preview;
        }
        self.fire(InputEvent::IsProgramTalliedChanged);
        self.fire(InputEvent::IsPreviewTalliedChanged);
    }
}

impl InputHandle for FakeInput {
    fn input_id(&self) -> Reply<InputId> {
        self.state.read(|v| v.id)
    }

    fn long_name(&self) -> Reply<String> {
        self.state.read(|v| v.long_name.clone())
    }

    fn set_long_name(&self, name: &str) -> Status {
        self.state.write(|v| v.long_name = name.to_owned())
    }

    fn short_name(&self) -> Reply<String> {
        self.state.read(|v| v.short_name.clone())
    }

    fn set_short_name(&self, name: &str) -> Status {
        self.state.try_write(|v| {
            if name.chars().count() > Self::MAX_SHORT_NAME {
                return Status::INVALID_ARG;
            }
            v.short_name = name.to_owned();
            Status::OK
        })
    }

    fn is_program_tallied(&self) -> Reply<bool> {
        self.state.read(|v| v.program_tally)
    }

    fn is_preview_tallied(&self) -> Reply<bool> {
        self.state.read(|v| v.preview_tally)
    }
}

// --- DVE ---

#[derive(Debug)]
struct DveValues {
    size: (f64, f64),
    position: (f64, f64),
    rotation: f64,
}

#[derive(Clone)]
pub struct FakeDve {
    state: Arc<FakeState<DveFamily, DveValues>>,
}

fake_plumbing!(FakeDve, DveFamily, DveEvent, DVE_IID);

impl FakeDve {
    /// Half-size box, centred, unrotated.
    pub fn new() -> Self {
        Self {
            state: FakeState::new(DveValues {
                size: (0.5, 0.5),
                position: (0.0, 0.0),
                rotation: 0.0,
            }),
        }
    }

    pub fn rotation_value(&self) -> f64 {
        self.state.values.lock().rotation
    }
}

impl Default for FakeDve {
    fn default() -> Self {
        Self::new()
    }
}

impl DveHandle for FakeDve {
    fn size(&self) -> Reply<(f64, f64)> {
        self.state.read(|v| v.size)
    }

    fn set_size(&self, x: f64, y: f64) -> Status {
        self.state.write(|v| v.size = (x, y))
    }

    fn position(&self) -> Reply<(f64, f64)> {
        self.state.read(|v| v.position)
    }

    fn set_position(&self, x: f64, y: f64) -> Status {
        self.state.write(|v| v.position = (x, y))
    }

    fn rotation(&self) -> Reply<f64> {
        self.state.read(|v| v.rotation)
    }

    fn set_rotation(&self, degrees: f64) -> Status {
        self.state.write(|v| v.rotation = degrees)
    }
}

// --- Keyer ---

#[derive(Debug, Default)]
struct KeyerValues {
    on_air: bool,
    fill: InputId,
    cut: InputId,
}

#[derive(Clone)]
pub struct FakeKeyer {
    state: Arc<FakeState<KeyerFamily, KeyerValues>>,
    dve: Option<FakeDve>,
}

fake_plumbing!(FakeKeyer, KeyerFamily, KeyerEvent, KEYER_IID);

impl FakeKeyer {
    /// A keyer without DVE capability.
    pub fn new() -> Self {
        Self {
            state: FakeState::new(KeyerValues::default()),
            dve: None,
        }
    }

    pub fn with_dve() -> Self {
        Self {
            state: FakeState::new(KeyerValues::default()),
            dve: Some(FakeDve::new()),
        }
    }

    /// The keyer's DVE object, for inspection.
    pub fn dve(&self) -> Option<FakeDve> {
        self.dve.clone()
    }
}

impl Default for FakeKeyer {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyerHandle for FakeKeyer {
    type Dve = FakeDve;

    fn on_air(&self) -> Reply<bool> {
        self.state.read(|v| v.on_air)
    }

    fn set_on_air(&self, on_air: bool) -> Status {
        self.state.write(|v| v.on_air = on_air)
    }

    fn fill_input(&self) -> Reply<InputId> {
        self.state.read(|v| v.fill)
    }

    fn set_fill_input(&self, input: InputId) -> Status {
        self.state.write(|v| v.fill = input)
    }

    fn cut_input(&self) -> Reply<InputId> {
        self.state.read(|v| v.cut)
    }

    fn set_cut_input(&self, input: InputId) -> Status {
        self.state.write(|v| v.cut = input)
    }
}

impl QueryCapability<FakeDve> for FakeKeyer {
    fn query_capability(&self) -> Option<FakeDve> {
        self.dve.as_ref().map(AddRef::add_ref)
    }
}

// --- MixEffectBlock ---

#[derive(Debug, Default)]
struct MixEffectValues {
    program: InputId,
    preview: InputId,
    position: f64,
    in_transition: bool,
    fully_black: bool,
}

#[derive(Clone)]
pub struct FakeMixEffectBlock {
    state: Arc<FakeState<MixEffectFamily, MixEffectValues>>,
    keyers: Arc<Vec<FakeKeyer>>,
}

fake_plumbing!(FakeMixEffectBlock, MixEffectFamily, MixEffectEvent, MIX_EFFECT_BLOCK_IID);

impl FakeMixEffectBlock {
    pub fn new(keyers: Vec<FakeKeyer>) -> Self {
        Self {
            state: FakeState::new(MixEffectValues::default()),
            keyers: Arc::new(keyers),
        }
    }

    pub fn keyers(&self) -> Vec<FakeKeyer> {
        self.keyers.to_vec()
    }

    /// Finish a running auto transition: swap buses and notify.
    pub fn complete_transition(&self) {
        {
            let mut guard = self.state.values.lock();
            let v = &mut *guard;
            std::mem::swap(&mut v.program, &mut v.preview);
            v.position = 0.0;
            v.in_transition = false;
        }
        self.fire(MixEffectEvent::ProgramInputChanged);
        self.fire(MixEffectEvent::PreviewInputChanged);
        self.fire(MixEffectEvent::InTransitionChanged);
    }
}

impl MixEffectBlockHandle for FakeMixEffectBlock {
    type Keyer = FakeKeyer;
    type KeyerIterator = FakeIterator<FakeKeyer>;

    fn program_input(&self) -> Reply<InputId> {
        self.state.read(|v| v.program)
    }

    fn set_program_input(&self, input: InputId) -> Status {
        self.state.write(|v| v.program = input)
    }

    fn preview_input(&self) -> Reply<InputId> {
        self.state.read(|v| v.preview)
    }

    fn set_preview_input(&self, input: InputId) -> Status {
        self.state.write(|v| v.preview = input)
    }

    fn transition_position(&self) -> Reply<f64> {
        self.state.read(|v| v.position)
    }

    fn set_transition_position(&self, position: f64) -> Status {
        self.state.write(|v| v.position = position)
    }

    fn in_transition(&self) -> Reply<bool> {
        self.state.read(|v| v.in_transition)
    }

    fn fade_to_black_fully_black(&self) -> Reply<bool> {
        self.state.read(|v| v.fully_black)
    }

    fn perform_cut(&self) -> Status {
        let status = self
            .state
            .write(|v| std::mem::swap(&mut v.program, &mut v.preview));
        if status.is_success() {
            self.fire(MixEffectEvent::ProgramInputChanged);
            self.fire(MixEffectEvent::PreviewInputChanged);
        }
        status
    }

    fn perform_auto_transition(&self) -> Status {
        let status = self.state.write(|v| v.in_transition = true);
        if status.is_success() {
            self.fire(MixEffectEvent::InTransitionChanged);
        }
        status
    }

    fn perform_fade_to_black(&self) -> Status {
        let status = self.state.write(|v| v.fully_black = !v.fully_black);
        if status.is_success() {
            self.fire(MixEffectEvent::FadeToBlackFullyBlackChanged);
        }
        status
    }
}

impl CreateIterator<FakeIterator<FakeKeyer>> for FakeMixEffectBlock {
    fn create_iterator(&self) -> Reply<Option<FakeIterator<FakeKeyer>>> {
        Ok(Some(FakeIterator::new(enumerate(&self.keyers))))
    }
}

// --- Switcher ---

#[derive(Debug)]
struct SwitcherValues {
    product_name: String,
    video_mode: VideoMode,
    supported_modes: Vec<VideoMode>,
    power_status: u32,
}

#[derive(Clone)]
pub struct FakeSwitcher {
    state: Arc<FakeState<SwitcherFamily, SwitcherValues>>,
    inputs: Arc<Vec<FakeInput>>,
    mix_effect_blocks: Arc<Vec<FakeMixEffectBlock>>,
    audio_inputs: Arc<Vec<FakeAudioInput>>,
    fail_enumeration: Arc<Mutex<Option<Status>>>,
}

fake_plumbing!(FakeSwitcher, SwitcherFamily, SwitcherEvent, SWITCHER_IID);

impl FakeSwitcher {
    pub fn new(
        inputs: Vec<FakeInput>,
        mix_effect_blocks: Vec<FakeMixEffectBlock>,
        audio_inputs: Vec<FakeAudioInput>,
    ) -> Self {
        Self {
            state: FakeState::new(SwitcherValues {
                product_name: "Fake Production Switcher".to_owned(),
                video_mode: VideoMode::Hd1080p50,
                supported_modes: vec![
                    VideoMode::Hd720p50,
                    VideoMode::Hd720p5994,
                    VideoMode::Hd1080i50,
                    VideoMode::Hd1080i5994,
                    VideoMode::Hd1080p25,
                    VideoMode::Hd1080p50,
                ],
                power_status: 0b01,
            }),
            inputs: Arc::new(inputs),
            mix_effect_blocks: Arc::new(mix_effect_blocks),
            audio_inputs: Arc::new(audio_inputs),
            fail_enumeration: Arc::new(Mutex::new(None)),
        }
    }

    /// A small HD studio: four inputs, one M/E with two keyers (the second
    /// with DVE), two audio inputs with a four-band EQ each.
    pub fn studio() -> Self {
        let inputs = vec![
            FakeInput::new(InputId::BLACK, "Black", "BLK"),
            FakeInput::new(InputId(1), "Camera 1", "CAM1"),
            FakeInput::new(InputId(2), "Camera 2", "CAM2"),
            FakeInput::new(InputId(1000), "Color Bars", "BARS"),
        ];
        let me = FakeMixEffectBlock::new(vec![FakeKeyer::new(), FakeKeyer::with_dve()]);
        let audio = (0..2)
            .map(|_| FakeAudioInput::with_bands((0..4).map(|_| FakeEqualizerBand::new()).collect()))
            .collect();
        Self::new(inputs, vec![me], audio)
    }

    pub fn inputs(&self) -> Vec<FakeInput> {
        self.inputs.to_vec()
    }

    pub fn mix_effect_blocks(&self) -> Vec<FakeMixEffectBlock> {
        self.mix_effect_blocks.to_vec()
    }

    pub fn audio_inputs(&self) -> Vec<FakeAudioInput> {
        self.audio_inputs.to_vec()
    }

    /// Make the next `create_iterator` of any kind fail with `status`.
    pub fn fail_next_enumeration(&self, status: Status) {
        *self.fail_enumeration.lock() = Some(status);
    }

    fn check_enumeration(&self) -> Reply<()> {
        match self.fail_enumeration.lock().take() {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }
}

impl SwitcherHandle for FakeSwitcher {
    type Input = FakeInput;
    type InputIterator = FakeIterator<FakeInput, InputId>;
    type MixEffectBlock = FakeMixEffectBlock;
    type MixEffectIterator = FakeIterator<FakeMixEffectBlock>;
    type AudioInput = FakeAudioInput;
    type AudioInputIterator = FakeIterator<FakeAudioInput>;

    fn product_name(&self) -> Reply<String> {
        self.state.read(|v| v.product_name.clone())
    }

    fn video_mode(&self) -> Reply<VideoMode> {
        self.state.read(|v| v.video_mode)
    }

    fn set_video_mode(&self, mode: VideoMode) -> Status {
        self.state.try_write(|v| {
            if !v.supported_modes.contains(&mode) {
                return Status::INVALID_ARG;
            }
            v.video_mode = mode;
            Status::OK
        })
    }

    fn supports_video_mode(&self, mode: VideoMode) -> Reply<bool> {
        self.state.read(|v| v.supported_modes.contains(&mode))
    }

    fn power_status(&self) -> Reply<u32> {
        self.state.read(|v| v.power_status)
    }
}

impl CreateIterator<FakeIterator<FakeInput, InputId>> for FakeSwitcher {
    fn create_iterator(&self) -> Reply<Option<FakeIterator<FakeInput, InputId>>> {
        self.check_enumeration()?;
        let items = self.inputs.iter().map(|input| (input.id(), input.clone())).collect();
        Ok(Some(FakeIterator::new(items)))
    }
}

impl CreateIterator<FakeIterator<FakeMixEffectBlock>> for FakeSwitcher {
    fn create_iterator(&self) -> Reply<Option<FakeIterator<FakeMixEffectBlock>>> {
        self.check_enumeration()?;
        Ok(Some(FakeIterator::new(enumerate(&self.mix_effect_blocks))))
    }
}

impl CreateIterator<FakeIterator<FakeAudioInput>> for FakeSwitcher {
    fn create_iterator(&self) -> Reply<Option<FakeIterator<FakeAudioInput>>> {
        self.check_enumeration()?;
        Ok(Some(FakeIterator::new(enumerate(&self.audio_inputs))))
    }
}
