//! Equalizer band of an audio input.

use crate::types::BandShape;
use switchbridge_core::{
    discriminants, BridgeConfig, EventFamily, EventTable, FromHandle, InterfaceId, Notifier, Result,
    Status, Wrapper,
};

discriminants! {
    pub enum EqualizerBandEvent {
        EnabledChanged = 0x656e_626c,
        ShapeChanged = 0x7368_7065,
        FrequencyChanged = 0x6672_6571,
        GainChanged = 0x6761_696e,
        QFactorChanged = 0x7166_6374,
    }
}

pub struct EqualizerBandFamily;

impl EventFamily for EqualizerBandFamily {
    const NAME: &'static str = "EqualizerBand";
    type Discriminant = EqualizerBandEvent;
    type Payload = ();
}

pub const EQUALIZER_BAND_IID: InterfaceId =
    InterfaceId::new("EqualizerBand", 0x5bc7_b2a1_5c4e_4b2f_8d4e_91a6_7f3c_0e21);

/// Foreign equalizer band interface.
pub trait EqualizerBandHandle: Notifier<Family = EqualizerBandFamily> {
    fn enabled(&self) -> std::result::Result<bool, Status>;
    fn set_enabled(&self, enabled: bool) -> Status;

    fn shape(&self) -> std::result::Result<BandShape, Status>;
    fn set_shape(&self, shape: BandShape) -> Status;

    /// Centre frequency in Hz.
    fn frequency(&self) -> std::result::Result<u32, Status>;
    fn set_frequency(&self, hz: u32) -> Status;

    /// Gain in dB.
    fn gain(&self) -> std::result::Result<f64, Status>;
    fn set_gain(&self, db: f64) -> Status;

    fn q_factor(&self) -> std::result::Result<f64, Status>;
    fn set_q_factor(&self, q: f64) -> Status;

    fn reset(&self) -> Status;
}

pub struct EqualizerBand<H: EqualizerBandHandle> {
    wrapper: Wrapper<H>,
}

impl<H: EqualizerBandHandle> EqualizerBand<H> {
    pub fn new(handle: Option<H>, config: &BridgeConfig) -> Result<Self> {
        Self::with_events(handle, EventTable::new(), config)
    }

    /// Like [`new`](Self::new), with observers already subscribed on `events`.
    ///
    /// Notifications the device raises while the callback is being
    /// registered reach those observers.
    pub fn with_events(
        handle: Option<H>,
        events: EventTable<EqualizerBandFamily>,
        config: &BridgeConfig,
    ) -> Result<Self> {
        Ok(Self {
            wrapper: Wrapper::with_events(handle, events, config)?,
        })
    }

    pub fn enabled(&self) -> Result<bool> {
        self.wrapper.get("enabled", |h| h.enabled())
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.wrapper.invoke("set_enabled", |h| h.set_enabled(enabled))
    }

    pub fn shape(&self) -> Result<BandShape> {
        self.wrapper.get("shape", |h| h.shape())
    }

    pub fn set_shape(&self, shape: BandShape) -> Result<()> {
        self.wrapper.invoke("set_shape", |h| h.set_shape(shape))
    }

    pub fn frequency(&self) -> Result<u32> {
        self.wrapper.get("frequency", |h| h.frequency())
    }

    pub fn set_frequency(&self, hz: u32) -> Result<()> {
        self.wrapper.invoke("set_frequency", |h| h.set_frequency(hz))
    }

    pub fn gain(&self) -> Result<f64> {
        self.wrapper.get("gain", |h| h.gain())
    }

    pub fn set_gain(&self, db: f64) -> Result<()> {
        self.wrapper.invoke("set_gain", |h| h.set_gain(db))
    }

    pub fn q_factor(&self) -> Result<f64> {
        self.wrapper.get("q_factor", |h| h.q_factor())
    }

    pub fn set_q_factor(&self, q: f64) -> Result<()> {
        self.wrapper.invoke("set_q_factor", |h| h.set_q_factor(q))
    }

    /// Back to the band's factory settings.
    pub fn reset(&self) -> Result<()> {
        self.wrapper.invoke("reset", |h| h.reset())
    }

    entity_events! {
        EqualizerBandEvent {
            on_enabled_changed => EnabledChanged,
            on_shape_changed => ShapeChanged,
            on_frequency_changed => FrequencyChanged,
            on_gain_changed => GainChanged,
            on_q_factor_changed => QFactorChanged,
        }
    }
}

impl<H: EqualizerBandHandle> FromHandle<H> for EqualizerBand<H> {
    fn from_handle(handle: H, config: &BridgeConfig) -> Result<Self> {
        Self::new(Some(handle), config)
    }
}

impl<H: EqualizerBandHandle> std::fmt::Debug for EqualizerBand<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EqualizerBand").field("id", &self.id()).finish()
    }
}
