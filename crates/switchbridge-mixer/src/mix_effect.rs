//! Mix-effect blocks: program/preview buses, transitions, keyers.

use crate::keyer::{Keyer, KeyerHandle};
use crate::types::InputId;
use switchbridge_core::{
    discriminants, BridgeConfig, CreateIterator, EventFamily, EventTable, ForeignIterator,
    FromHandle, InterfaceId, IteratorAdapter, Notifier, Result, Status, Wrapper,
};

discriminants! {
    pub enum MixEffectEvent {
        ProgramInputChanged = 0x7069_6e70,
        PreviewInputChanged = 0x7669_6e70,
        TransitionPositionChanged = 0x7470_6f73,
        InTransitionChanged = 0x696e_7472,
        FadeToBlackFullyBlackChanged = 0x6674_6266,
    }
}

pub struct MixEffectFamily;

impl EventFamily for MixEffectFamily {
    const NAME: &'static str = "MixEffectBlock";
    type Discriminant = MixEffectEvent;
    type Payload = ();
}

pub const MIX_EFFECT_BLOCK_IID: InterfaceId =
    InterfaceId::new("MixEffectBlock", 0x91c5_3e7a_0fd8_4b26_8a1c_d4e2_67b0_3f95);

/// Foreign mix-effect block interface.
pub trait MixEffectBlockHandle: Notifier<Family = MixEffectFamily> {
    type Keyer: KeyerHandle;
    type KeyerIterator: ForeignIterator<Item = Self::Keyer>;

    fn program_input(&self) -> std::result::Result<InputId, Status>;
    fn set_program_input(&self, input: InputId) -> Status;

    fn preview_input(&self) -> std::result::Result<InputId, Status>;
    fn set_preview_input(&self, input: InputId) -> Status;

    /// 0.0 to 1.0 through the current transition.
    fn transition_position(&self) -> std::result::Result<f64, Status>;
    fn set_transition_position(&self, position: f64) -> Status;

    fn in_transition(&self) -> std::result::Result<bool, Status>;

    fn fade_to_black_fully_black(&self) -> std::result::Result<bool, Status>;

    fn perform_cut(&self) -> Status;
    fn perform_auto_transition(&self) -> Status;
    fn perform_fade_to_black(&self) -> Status;
}

pub struct MixEffectBlock<H: MixEffectBlockHandle> {
    wrapper: Wrapper<H>,
}

impl<H: MixEffectBlockHandle> MixEffectBlock<H> {
    pub fn new(handle: Option<H>, config: &BridgeConfig) -> Result<Self> {
        Self::with_events(handle, EventTable::new(), config)
    }

    pub fn with_events(
        handle: Option<H>,
        events: EventTable<MixEffectFamily>,
        config: &BridgeConfig,
    ) -> Result<Self> {
        Ok(Self {
            wrapper: Wrapper::with_events(handle, events, config)?,
        })
    }

    pub fn program_input(&self) -> Result<InputId> {
        self.wrapper.get("program_input", |h| h.program_input())
    }

    pub fn set_program_input(&self, input: InputId) -> Result<()> {
        self.wrapper.invoke("set_program_input", |h| h.set_program_input(input))
    }

    pub fn preview_input(&self) -> Result<InputId> {
        self.wrapper.get("preview_input", |h| h.preview_input())
    }

    pub fn set_preview_input(&self, input: InputId) -> Result<()> {
        self.wrapper.invoke("set_preview_input", |h| h.set_preview_input(input))
    }

    pub fn transition_position(&self) -> Result<f64> {
        self.wrapper.get("transition_position", |h| h.transition_position())
    }

    /// Drive the transition manually, as with a T-bar.
    pub fn set_transition_position(&self, position: f64) -> Result<()> {
        self.wrapper
            .invoke("set_transition_position", |h| h.set_transition_position(position))
    }

    pub fn in_transition(&self) -> Result<bool> {
        self.wrapper.get("in_transition", |h| h.in_transition())
    }

    pub fn fade_to_black_fully_black(&self) -> Result<bool> {
        self.wrapper
            .get("fade_to_black_fully_black", |h| h.fade_to_black_fully_black())
    }

    /// Swap program and preview immediately.
    pub fn perform_cut(&self) -> Result<()> {
        self.wrapper.invoke("perform_cut", |h| h.perform_cut())
    }

    pub fn perform_auto_transition(&self) -> Result<()> {
        self.wrapper
            .invoke("perform_auto_transition", |h| h.perform_auto_transition())
    }

    pub fn perform_fade_to_black(&self) -> Result<()> {
        self.wrapper
            .invoke("perform_fade_to_black", |h| h.perform_fade_to_black())
    }

    /// The block's upstream keyers, freshly enumerated.
    pub fn keyers(&self) -> Result<IteratorAdapter<H::KeyerIterator, Keyer<H::Keyer>>>
    where
        H: CreateIterator<H::KeyerIterator>,
    {
        self.wrapper.iterate()
    }

    entity_events! {
        MixEffectEvent {
            on_program_input_changed => ProgramInputChanged,
            on_preview_input_changed => PreviewInputChanged,
            on_transition_position_changed => TransitionPositionChanged,
            on_in_transition_changed => InTransitionChanged,
            on_fade_to_black_changed => FadeToBlackFullyBlackChanged,
        }
    }
}

impl<H: MixEffectBlockHandle> FromHandle<H> for MixEffectBlock<H> {
    fn from_handle(handle: H, config: &BridgeConfig) -> Result<Self> {
        Self::new(Some(handle), config)
    }
}

impl<H: MixEffectBlockHandle> std::fmt::Debug for MixEffectBlock<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixEffectBlock").field("id", &self.id()).finish()
    }
}
