//! Upstream keyers of a mix-effect block.

use crate::dve::{DveHandle, DveParameters};
use crate::types::InputId;
use switchbridge_core::{
    discriminants, BridgeConfig, EventFamily, EventTable, FromHandle, InterfaceId, Notifier,
    QueryCapability, Result, Status, Wrapper,
};

discriminants! {
    pub enum KeyerEvent {
        OnAirChanged = 0x6f6e_6169,
        FillInputChanged = 0x6669_6c6c,
        CutInputChanged = 0x6375_7469,
    }
}

pub struct KeyerFamily;

impl EventFamily for KeyerFamily {
    const NAME: &'static str = "Keyer";
    type Discriminant = KeyerEvent;
    type Payload = ();
}

pub const KEYER_IID: InterfaceId =
    InterfaceId::new("Keyer", 0x7a04_9cd3_e61b_4f87_a35d_28e9_0b4c_71f6);

/// Foreign keyer interface.
pub trait KeyerHandle: Notifier<Family = KeyerFamily> {
    /// DVE view of this keyer, when the hardware has one.
    type Dve: DveHandle;

    fn on_air(&self) -> std::result::Result<bool, Status>;
    fn set_on_air(&self, on_air: bool) -> Status;

    fn fill_input(&self) -> std::result::Result<InputId, Status>;
    fn set_fill_input(&self, input: InputId) -> Status;

    fn cut_input(&self) -> std::result::Result<InputId, Status>;
    fn set_cut_input(&self, input: InputId) -> Status;
}

pub struct Keyer<H: KeyerHandle> {
    wrapper: Wrapper<H>,
}

impl<H: KeyerHandle> Keyer<H> {
    pub fn new(handle: Option<H>, config: &BridgeConfig) -> Result<Self> {
        Self::with_events(handle, EventTable::new(), config)
    }

    pub fn with_events(
        handle: Option<H>,
        events: EventTable<KeyerFamily>,
        config: &BridgeConfig,
    ) -> Result<Self> {
        Ok(Self {
            wrapper: Wrapper::with_events(handle, events, config)?,
        })
    }

    pub fn on_air(&self) -> Result<bool> {
        self.wrapper.get("on_air", |h| h.on_air())
    }

    pub fn set_on_air(&self, on_air: bool) -> Result<()> {
        self.wrapper.invoke("set_on_air", |h| h.set_on_air(on_air))
    }

    pub fn fill_input(&self) -> Result<InputId> {
        self.wrapper.get("fill_input", |h| h.fill_input())
    }

    pub fn set_fill_input(&self, input: InputId) -> Result<()> {
        self.wrapper.invoke("set_fill_input", |h| h.set_fill_input(input))
    }

    pub fn cut_input(&self) -> Result<InputId> {
        self.wrapper.get("cut_input", |h| h.cut_input())
    }

    pub fn set_cut_input(&self, input: InputId) -> Result<()> {
        self.wrapper.invoke("set_cut_input", |h| h.set_cut_input(input))
    }

    /// DVE parameters, or `None` if this keyer has no DVE.
    pub fn try_dve(&self) -> Result<Option<DveParameters<H::Dve>>>
    where
        H: QueryCapability<H::Dve>,
    {
        self.wrapper.try_capability::<H::Dve, DveParameters<H::Dve>>()
    }

    /// DVE parameters; `NotSupported` if this keyer has no DVE.
    pub fn dve(&self) -> Result<DveParameters<H::Dve>>
    where
        H: QueryCapability<H::Dve>,
    {
        self.wrapper.require_capability::<H::Dve, DveParameters<H::Dve>>()
    }

    entity_events! {
        KeyerEvent {
            on_on_air_changed => OnAirChanged,
            on_fill_input_changed => FillInputChanged,
            on_cut_input_changed => CutInputChanged,
        }
    }
}

impl<H: KeyerHandle> FromHandle<H> for Keyer<H> {
    fn from_handle(handle: H, config: &BridgeConfig) -> Result<Self> {
        Self::new(Some(handle), config)
    }
}

impl<H: KeyerHandle> std::fmt::Debug for Keyer<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keyer").field("id", &self.id()).finish()
    }
}
