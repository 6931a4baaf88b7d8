//! Audio mixer input: gain, balance, routing, and level metering.

use crate::equalizer::{EqualizerBand, EqualizerBandHandle};
use crate::types::AudioMixOption;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use switchbridge_core::{
    discriminants, BridgeConfig, CreateIterator, EventFamily, EventTable, ForeignIterator,
    FromHandle, InterfaceId, IteratorAdapter, Notifier, ObjectId, Result, Status, SubscriptionId,
    Wrapper,
};

discriminants! {
    pub enum AudioInputEvent {
        GainChanged = 0x6761_696e,
        BalanceChanged = 0x626c_6e63,
        MixOptionChanged = 0x6d69_786f,
        IsMixedInChanged = 0x6d78_696e,
    }
}

/// One metering callback: per-channel levels and their held peaks, in dB.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioLevels {
    pub levels: SmallVec<[f64; 2]>,
    pub peaks: SmallVec<[f64; 2]>,
}

impl AudioLevels {
    pub fn stereo(left: f64, right: f64, left_peak: f64, right_peak: f64) -> Self {
        Self {
            levels: SmallVec::from_buf([left, right]),
            peaks: SmallVec::from_buf([left_peak, right_peak]),
        }
    }

    /// Loudest channel level, or `None` with no channels.
    pub fn max_level(&self) -> Option<f64> {
        self.levels.iter().copied().reduce(f64::max)
    }

    pub fn max_peak(&self) -> Option<f64> {
        self.peaks.iter().copied().reduce(f64::max)
    }
}

pub struct AudioInputFamily;

impl EventFamily for AudioInputFamily {
    const NAME: &'static str = "AudioInput";
    type Discriminant = AudioInputEvent;
    type Payload = AudioLevels;
}

pub const AUDIO_INPUT_IID: InterfaceId =
    InterfaceId::new("AudioInput", 0x2ed8_6c1f_83a4_4f59_b1e2_0c7d_94a3_5b68);

/// Foreign audio input interface.
///
/// Bindings deliver the level-metering callback through
/// [`Sink::notify_payload`](switchbridge_core::Sink::notify_payload).
pub trait AudioInputHandle: Notifier<Family = AudioInputFamily> {
    type EqualizerBand: EqualizerBandHandle;
    type EqualizerBandIterator: ForeignIterator<Item = Self::EqualizerBand>;

    /// Gain in dB.
    fn gain(&self) -> std::result::Result<f64, Status>;
    fn set_gain(&self, db: f64) -> Status;

    /// -1.0 (left) to 1.0 (right).
    fn balance(&self) -> std::result::Result<f64, Status>;
    fn set_balance(&self, balance: f64) -> Status;

    fn mix_option(&self) -> std::result::Result<AudioMixOption, Status>;
    fn set_mix_option(&self, option: AudioMixOption) -> Status;

    fn is_mixed_in(&self) -> std::result::Result<bool, Status>;

    fn reset_peak_levels(&self) -> Status;
}

pub struct AudioInput<H: AudioInputHandle> {
    wrapper: Wrapper<H>,
}

impl<H: AudioInputHandle> AudioInput<H> {
    pub fn new(handle: Option<H>, config: &BridgeConfig) -> Result<Self> {
        Self::with_events(handle, EventTable::new(), config)
    }

    /// Observers on `events` see notifications raised during registration.
    pub fn with_events(
        handle: Option<H>,
        events: EventTable<AudioInputFamily>,
        config: &BridgeConfig,
    ) -> Result<Self> {
        Ok(Self {
            wrapper: Wrapper::with_events(handle, events, config)?,
        })
    }

    pub fn gain(&self) -> Result<f64> {
        self.wrapper.get("gain", |h| h.gain())
    }

    pub fn set_gain(&self, db: f64) -> Result<()> {
        self.wrapper.invoke("set_gain", |h| h.set_gain(db))
    }

    pub fn balance(&self) -> Result<f64> {
        self.wrapper.get("balance", |h| h.balance())
    }

    pub fn set_balance(&self, balance: f64) -> Result<()> {
        self.wrapper.invoke("set_balance", |h| h.set_balance(balance))
    }

    pub fn mix_option(&self) -> Result<AudioMixOption> {
        self.wrapper.get("mix_option", |h| h.mix_option())
    }

    pub fn set_mix_option(&self, option: AudioMixOption) -> Result<()> {
        self.wrapper.invoke("set_mix_option", |h| h.set_mix_option(option))
    }

    /// Whether the input is currently audible in the program mix.
    pub fn is_mixed_in(&self) -> Result<bool> {
        self.wrapper.get("is_mixed_in", |h| h.is_mixed_in())
    }

    pub fn reset_peak_levels(&self) -> Result<()> {
        self.wrapper.invoke("reset_peak_levels", |h| h.reset_peak_levels())
    }

    /// The input's equalizer bands, freshly enumerated.
    pub fn equalizer_bands(
        &self,
    ) -> Result<IteratorAdapter<H::EqualizerBandIterator, EqualizerBand<H::EqualizerBand>>>
    where
        H: CreateIterator<H::EqualizerBandIterator>,
    {
        self.wrapper.iterate()
    }

    /// Subscribe to level metering. The handler gets the whole callback.
    pub fn on_levels_changed<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(ObjectId, &AudioLevels) + Send + Sync + 'static,
    {
        self.wrapper.events().subscribe_payload(handler)
    }

    pub fn unsubscribe_levels(&self, id: SubscriptionId) -> bool {
        self.wrapper.events().unsubscribe_payload(id)
    }

    entity_events! {
        AudioInputEvent {
            on_gain_changed => GainChanged,
            on_balance_changed => BalanceChanged,
            on_mix_option_changed => MixOptionChanged,
            on_is_mixed_in_changed => IsMixedInChanged,
        }
    }
}

impl<H: AudioInputHandle> FromHandle<H> for AudioInput<H> {
    fn from_handle(handle: H, config: &BridgeConfig) -> Result<Self> {
        Self::new(Some(handle), config)
    }
}

impl<H: AudioInputHandle> std::fmt::Debug for AudioInput<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioInput").field("id", &self.id()).finish()
    }
}
