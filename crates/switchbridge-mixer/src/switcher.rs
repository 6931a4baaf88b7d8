//! Root entity of a connected switcher.

use crate::audio_input::{AudioInput, AudioInputHandle};
use crate::input::{Input, InputHandle};
use crate::mix_effect::{MixEffectBlock, MixEffectBlockHandle};
use crate::types::{InputId, VideoMode};
use switchbridge_core::{
    discriminants, BridgeConfig, CreateIterator, EventFamily, EventTable, ForeignIterator,
    FromHandle, InterfaceId, IteratorAdapter, LookupById, Notifier, Result, Status, Wrapper,
};

discriminants! {
    pub enum SwitcherEvent {
        VideoModeChanged = 0x7664_6d64,
        PowerStatusChanged = 0x7077_7273,
        Disconnected = 0x6463_6f6e,
    }
}

pub struct SwitcherFamily;

impl EventFamily for SwitcherFamily {
    const NAME: &'static str = "Switcher";
    type Discriminant = SwitcherEvent;
    type Payload = ();
}

pub const SWITCHER_IID: InterfaceId =
    InterfaceId::new("Switcher", 0x4b6d_e2a0_9c17_4e3f_b5a8_7d01_c39e_28f4);

/// Foreign switcher interface, the root every other handle is reached from.
pub trait SwitcherHandle: Notifier<Family = SwitcherFamily> {
    type Input: InputHandle;
    type InputIterator: LookupById<Item = Self::Input, Id = InputId>;
    type MixEffectBlock: MixEffectBlockHandle;
    type MixEffectIterator: ForeignIterator<Item = Self::MixEffectBlock>;
    type AudioInput: AudioInputHandle;
    type AudioInputIterator: ForeignIterator<Item = Self::AudioInput>;

    fn product_name(&self) -> std::result::Result<String, Status>;

    fn video_mode(&self) -> std::result::Result<VideoMode, Status>;
    fn set_video_mode(&self, mode: VideoMode) -> Status;
    fn supports_video_mode(&self, mode: VideoMode) -> std::result::Result<bool, Status>;

    /// Bit per power supply, set when that supply is delivering power.
    fn power_status(&self) -> std::result::Result<u32, Status>;
}

pub struct Switcher<H: SwitcherHandle> {
    wrapper: Wrapper<H>,
}

impl<H: SwitcherHandle> Switcher<H> {
    pub fn new(handle: Option<H>, config: &BridgeConfig) -> Result<Self> {
        Self::with_events(handle, EventTable::new(), config)
    }

    /// Like [`new`](Self::new), with observers already subscribed on `events`.
    pub fn with_events(
        handle: Option<H>,
        events: EventTable<SwitcherFamily>,
        config: &BridgeConfig,
    ) -> Result<Self> {
        let switcher = Self {
            wrapper: Wrapper::with_events(handle, events, config)?,
        };
        tracing::debug!(id = %switcher.id(), policy = %config.error_policy, "attached switcher");
        Ok(switcher)
    }

    pub fn config(&self) -> &BridgeConfig {
        self.wrapper.config()
    }

    pub fn product_name(&self) -> Result<String> {
        self.wrapper.get("product_name", |h| h.product_name())
    }

    pub fn video_mode(&self) -> Result<VideoMode> {
        self.wrapper.get("video_mode", |h| h.video_mode())
    }

    pub fn set_video_mode(&self, mode: VideoMode) -> Result<()> {
        self.wrapper.invoke("set_video_mode", |h| h.set_video_mode(mode))
    }

    pub fn supports_video_mode(&self, mode: VideoMode) -> Result<bool> {
        self.wrapper
            .get("supports_video_mode", |h| h.supports_video_mode(mode))
    }

    pub fn power_status(&self) -> Result<u32> {
        self.wrapper.get("power_status", |h| h.power_status())
    }

    /// Every video input, freshly enumerated.
    pub fn inputs(&self) -> Result<IteratorAdapter<H::InputIterator, Input<H::Input>>>
    where
        H: CreateIterator<H::InputIterator>,
    {
        self.wrapper.iterate()
    }

    /// `InvalidArgument` if the switcher has no input `id`.
    pub fn input_by_id(&self, id: InputId) -> Result<Input<H::Input>>
    where
        H: CreateIterator<H::InputIterator>,
    {
        self.inputs()?.get_by_id(id)
    }

    pub fn mix_effect_blocks(
        &self,
    ) -> Result<IteratorAdapter<H::MixEffectIterator, MixEffectBlock<H::MixEffectBlock>>>
    where
        H: CreateIterator<H::MixEffectIterator>,
    {
        self.wrapper.iterate()
    }

    pub fn audio_inputs(
        &self,
    ) -> Result<IteratorAdapter<H::AudioInputIterator, AudioInput<H::AudioInput>>>
    where
        H: CreateIterator<H::AudioInputIterator>,
    {
        self.wrapper.iterate()
    }

    entity_events! {
        SwitcherEvent {
            on_video_mode_changed => VideoModeChanged,
            on_power_status_changed => PowerStatusChanged,
            on_disconnected => Disconnected,
        }
    }
}

impl<H: SwitcherHandle> FromHandle<H> for Switcher<H> {
    fn from_handle(handle: H, config: &BridgeConfig) -> Result<Self> {
        Self::new(Some(handle), config)
    }
}

impl<H: SwitcherHandle> std::fmt::Debug for Switcher<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Switcher").field("id", &self.id()).finish()
    }
}
