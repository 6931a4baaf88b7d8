//! Video inputs and their tally state.

use crate::types::InputId;
use switchbridge_core::{
    discriminants, BridgeConfig, EventFamily, EventTable, FromHandle, InterfaceId, Notifier, Result,
    Status, Wrapper,
};

discriminants! {
    pub enum InputEvent {
        LongNameChanged = 0x6c6e_616d,
        ShortNameChanged = 0x736e_616d,
        IsProgramTalliedChanged = 0x7074_6c79,
        IsPreviewTalliedChanged = 0x7674_6c79,
    }
}

pub struct InputFamily;

impl EventFamily for InputFamily {
    const NAME: &'static str = "Input";
    type Discriminant = InputEvent;
    type Payload = ();
}

pub const INPUT_IID: InterfaceId =
    InterfaceId::new("Input", 0xbc8a_07e4_1d3f_4a8e_9b25_6f01_c7d2_e943);

/// Foreign video input interface.
pub trait InputHandle: Notifier<Family = InputFamily> {
    fn input_id(&self) -> std::result::Result<InputId, Status>;

    fn long_name(&self) -> std::result::Result<String, Status>;
    fn set_long_name(&self, name: &str) -> Status;

    fn short_name(&self) -> std::result::Result<String, Status>;
    fn set_short_name(&self, name: &str) -> Status;

    fn is_program_tallied(&self) -> std::result::Result<bool, Status>;
    fn is_preview_tallied(&self) -> std::result::Result<bool, Status>;
}

pub struct Input<H: InputHandle> {
    wrapper: Wrapper<H>,
}

impl<H: InputHandle> Input<H> {
    pub fn new(handle: Option<H>, config: &BridgeConfig) -> Result<Self> {
        Self::with_events(handle, EventTable::new(), config)
    }

    pub fn with_events(
        handle: Option<H>,
        events: EventTable<InputFamily>,
        config: &BridgeConfig,
    ) -> Result<Self> {
        Ok(Self {
            wrapper: Wrapper::with_events(handle, events, config)?,
        })
    }

    pub fn input_id(&self) -> Result<InputId> {
        self.wrapper.get("input_id", |h| h.input_id())
    }

    pub fn long_name(&self) -> Result<String> {
        self.wrapper.get("long_name", |h| h.long_name())
    }

    pub fn set_long_name(&self, name: &str) -> Result<()> {
        self.wrapper.invoke("set_long_name", |h| h.set_long_name(name))
    }

    pub fn short_name(&self) -> Result<String> {
        self.wrapper.get("short_name", |h| h.short_name())
    }

    /// Short names are at most four characters on the device.
    pub fn set_short_name(&self, name: &str) -> Result<()> {
        self.wrapper.invoke("set_short_name", |h| h.set_short_name(name))
    }

    pub fn is_program_tallied(&self) -> Result<bool> {
        self.wrapper.get("is_program_tallied", |h| h.is_program_tallied())
    }

    pub fn is_preview_tallied(&self) -> Result<bool> {
        self.wrapper.get("is_preview_tallied", |h| h.is_preview_tallied())
    }

    entity_events! {
        InputEvent {
            on_long_name_changed => LongNameChanged,
            on_short_name_changed => ShortNameChanged,
            on_program_tally_changed => IsProgramTalliedChanged,
            on_preview_tally_changed => IsPreviewTalliedChanged,
        }
    }
}

impl<H: InputHandle> FromHandle<H> for Input<H> {
    fn from_handle(handle: H, config: &BridgeConfig) -> Result<Self> {
        Self::new(Some(handle), config)
    }
}

impl<H: InputHandle> std::fmt::Debug for Input<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Input").field("id", &self.id()).finish()
    }
}
