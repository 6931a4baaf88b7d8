//! DVE parameters, a capability some keyers expose.

use switchbridge_core::{
    discriminants, BridgeConfig, EventFamily, EventTable, FromHandle, InterfaceId, Notifier, Result,
    Status, Wrapper,
};

discriminants! {
    pub enum DveEvent {
        SizeXChanged = 0x7378_7a65,
        SizeYChanged = 0x7379_7a65,
        PositionXChanged = 0x7078_706f,
        PositionYChanged = 0x7079_706f,
        RotationChanged = 0x726f_7461,
    }
}

pub struct DveFamily;

impl EventFamily for DveFamily {
    const NAME: &'static str = "Dve";
    type Discriminant = DveEvent;
    type Payload = ();
}

pub const DVE_IID: InterfaceId =
    InterfaceId::new("Dve", 0x3f1e_a85c_7b92_4d60_8ec4_15b7_a029_6df1);

/// Foreign DVE-parameters interface.
pub trait DveHandle: Notifier<Family = DveFamily> {
    fn size(&self) -> std::result::Result<(f64, f64), Status>;
    fn set_size(&self, x: f64, y: f64) -> Status;

    fn position(&self) -> std::result::Result<(f64, f64), Status>;
    fn set_position(&self, x: f64, y: f64) -> Status;

    /// Degrees, clockwise.
    fn rotation(&self) -> std::result::Result<f64, Status>;
    fn set_rotation(&self, degrees: f64) -> Status;
}

pub struct DveParameters<H: DveHandle> {
    wrapper: Wrapper<H>,
}

impl<H: DveHandle> DveParameters<H> {
    pub fn new(handle: Option<H>, config: &BridgeConfig) -> Result<Self> {
        Self::with_events(handle, EventTable::new(), config)
    }

    pub fn with_events(
        handle: Option<H>,
        events: EventTable<DveFamily>,
        config: &BridgeConfig,
    ) -> Result<Self> {
        Ok(Self {
            wrapper: Wrapper::with_events(handle, events, config)?,
        })
    }

    /// Scale factors, 1.0 is full frame.
    pub fn size(&self) -> Result<(f64, f64)> {
        self.wrapper.get("size", |h| h.size())
    }

    pub fn set_size(&self, x: f64, y: f64) -> Result<()> {
        self.wrapper.invoke("set_size", |h| h.set_size(x, y))
    }

    pub fn position(&self) -> Result<(f64, f64)> {
        self.wrapper.get("position", |h| h.position())
    }

    pub fn set_position(&self, x: f64, y: f64) -> Result<()> {
        self.wrapper.invoke("set_position", |h| h.set_position(x, y))
    }

    pub fn rotation(&self) -> Result<f64> {
        self.wrapper.get("rotation", |h| h.rotation())
    }

    pub fn set_rotation(&self, degrees: f64) -> Result<()> {
        self.wrapper.invoke("set_rotation", |h| h.set_rotation(degrees))
    }

    entity_events! {
        DveEvent {
            on_size_x_changed => SizeXChanged,
            on_size_y_changed => SizeYChanged,
            on_position_x_changed => PositionXChanged,
            on_position_y_changed => PositionYChanged,
            on_rotation_changed => RotationChanged,
        }
    }
}

impl<H: DveHandle> FromHandle<H> for DveParameters<H> {
    fn from_handle(handle: H, config: &BridgeConfig) -> Result<Self> {
        Self::new(Some(handle), config)
    }
}

impl<H: DveHandle> std::fmt::Debug for DveParameters<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DveParameters").field("id", &self.id()).finish()
    }
}
