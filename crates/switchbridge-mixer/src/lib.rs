//! Switcher entities for switchbridge.
//!
//! Every entity is a thin typed layer over a [`Wrapper`](switchbridge_core::Wrapper):
//! a per-interface handle trait the binding implements, a discriminant table,
//! and typed getters, setters and `on_*_changed` subscriptions.
//!
//! ```text
//! Switcher
//! ├── inputs()             -> Input            (lookup by InputId)
//! ├── mix_effect_blocks()  -> MixEffectBlock
//! │                           └── keyers()     -> Keyer
//! │                                               └── try_dve() -> DveParameters
//! └── audio_inputs()       -> AudioInput
//!                             └── equalizer_bands() -> EqualizerBand
//! ```
//!
//! Feature gates: `testing` (echoing fake handles in [`fake`]).

/// Generates the subscription surface shared by every entity: identity,
/// raw subscribe/unsubscribe, `dispose`, and one `on_*` helper per event.
macro_rules! entity_events {
    ($event:ident { $($method:ident => $variant:ident),+ $(,)? }) => {
        /// Identity passed as the sender to every handler of this entity.
        pub fn id(&self) -> switchbridge_core::ObjectId {
            self.wrapper.id()
        }

        pub fn subscribe<F>(&self, event: $event, handler: F) -> switchbridge_core::SubscriptionId
        where
            F: Fn(switchbridge_core::ObjectId, &$event) + Send + Sync + 'static,
        {
            self.wrapper.subscribe(event, handler)
        }

        pub fn unsubscribe(&self, event: $event, id: switchbridge_core::SubscriptionId) -> bool {
            self.wrapper.events().unsubscribe(event, id)
        }

        /// Unregister and release the handle now.
        pub fn dispose(self) {
            self.wrapper.dispose();
        }

        $(
            #[doc = concat!(
                "Subscribe to [`", stringify!($event), "::", stringify!($variant), "`]."
            )]
            pub fn $method<F>(&self, handler: F) -> switchbridge_core::SubscriptionId
            where
                F: Fn(switchbridge_core::ObjectId) + Send + Sync + 'static,
            {
                self.wrapper.subscribe($event::$variant, move |sender, _| handler(sender))
            }
        )+
    };
}

pub mod types;
pub use types::{AudioMixOption, BandShape, InputId, VideoMode};

pub mod equalizer;
pub use equalizer::{EqualizerBand, EqualizerBandEvent, EqualizerBandFamily, EqualizerBandHandle};

pub mod audio_input;
pub use audio_input::{AudioInput, AudioInputEvent, AudioInputFamily, AudioInputHandle, AudioLevels};

pub mod input;
pub use input::{Input, InputEvent, InputFamily, InputHandle};

pub mod dve;
pub use dve::{DveEvent, DveFamily, DveHandle, DveParameters};

pub mod keyer;
pub use keyer::{Keyer, KeyerEvent, KeyerFamily, KeyerHandle};

pub mod mix_effect;
pub use mix_effect::{MixEffectBlock, MixEffectEvent, MixEffectFamily, MixEffectBlockHandle};

pub mod switcher;
pub use switcher::{Switcher, SwitcherEvent, SwitcherFamily, SwitcherHandle};

#[cfg(any(test, feature = "testing"))]
pub mod fake;
