//! # switchbridge - Bindings over broadcast switcher handles
//!
//! Safe ownership, typed events and iterators over a vendor switcher API
//! whose objects are reference-counted foreign handles.
//!
//! ## Architecture
//!
//! switchbridge is an umbrella crate that coordinates:
//! - **switchbridge-core** - Handle ownership, callback sinks and observer fan-out,
//!   iterator adaptation, status translation
//! - **switchbridge-mixer** - Typed entities (Switcher, Input, MixEffectBlock, Keyer,
//!   DveParameters, AudioInput, EqualizerBand)
//!
//! ## Quick Start
//!
//! ```ignore
//! use switchbridge::prelude::*;
//!
//! let session = Session::builder().build()?;
//! let switcher = session.attach(handle)?;
//!
//! // Observe the device
//! switcher.on_disconnected(|sender| eprintln!("{sender} went away"));
//!
//! // Drive the first mix-effect block
//! if let Some(me) = switcher.mix_effect_blocks()?.next() {
//!     let me = me?;
//!     me.set_preview_input(InputId(1))?;
//!     me.perform_auto_transition()?;
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Core plus typed entities
//! - `mixer` - Typed switcher entities
//! - `testing` - Fake foreign handles for tests

/// Re-export of switchbridge-core for direct access
pub use switchbridge_core as core;

pub use switchbridge_core::{
    // Configuration
    BridgeConfig,
    ErrorPolicy,

    // Errors
    Error,
    PlatformError,
    Result,
    Status,

    // Events
    ChangeEvent,
    Discriminant,
    EventFamily,
    EventTable,
    ObjectId,
    SubscriptionId,

    // Handle contracts
    CreateIterator,
    ForeignHandle,
    ForeignIterator,
    FromHandle,
    InterfaceId,
    LookupById,
    Notifier,
    QueryCapability,

    // Wrappers
    IteratorAdapter,
    Wrapper,
};

#[cfg(feature = "mixer")]
pub use switchbridge_mixer as mixer;

#[cfg(feature = "mixer")]
pub use switchbridge_mixer::{
    AudioInput, AudioLevels, AudioMixOption, BandShape, DveParameters, EqualizerBand, Input,
    InputId, Keyer, MixEffectBlock, Switcher, VideoMode,
};

mod session;

pub use session::{Session, SessionBuilder};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{Session, SessionBuilder};

    pub use crate::core::{BridgeConfig, Error, ErrorPolicy, EventTable, ObjectId, Result, Status};

    #[cfg(feature = "mixer")]
    pub use crate::mixer::{
        AudioInputEvent, AudioLevels, AudioMixOption, BandShape, EqualizerBandEvent, InputEvent,
        InputId, KeyerEvent, MixEffectEvent, Switcher, SwitcherEvent, VideoMode,
    };
}
