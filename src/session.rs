//! Entry point for attaching foreign switcher handles.

use crate::core::{BridgeConfig, Error, ErrorPolicy, FromHandle, Result};

#[cfg(feature = "mixer")]
use crate::core::EventTable;

#[cfg(feature = "mixer")]
use crate::mixer::{Switcher, SwitcherFamily, SwitcherHandle};

/// Shared settings for every object obtained through one session.
///
/// A session holds no foreign state of its own. Each wrapper it produces
/// copies the session's [`BridgeConfig`] and passes it on to the children it
/// enumerates, so a whole object tree follows one error policy.
///
/// # Example
///
/// ```ignore
/// use switchbridge::prelude::*;
///
/// let session = Session::builder()
///     .error_policy(ErrorPolicy::Classify)
///     .drain_timeout_ms(1000)
///     .build()?;
///
/// let switcher = session.attach(handle)?;
/// switcher.on_video_mode_changed(|_| println!("mode changed"));
/// for input in switcher.inputs()? {
///     println!("{}", input?.long_name()?);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: BridgeConfig,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Wrap a switcher handle. The session's configuration is inherited by
    /// every entity reached from the returned switcher.
    #[cfg(feature = "mixer")]
    pub fn attach<H: SwitcherHandle>(&self, handle: H) -> Result<Switcher<H>> {
        Switcher::new(Some(handle), &self.config)
    }

    /// Like [`attach`](Self::attach), with observers already in place when
    /// the callback is registered. A device that reports its state as soon
    /// as a callback arrives is seen by `events`.
    #[cfg(feature = "mixer")]
    pub fn attach_with_events<H: SwitcherHandle>(
        &self,
        handle: H,
        events: EventTable<SwitcherFamily>,
    ) -> Result<Switcher<H>> {
        Switcher::with_events(Some(handle), events, &self.config)
    }

    /// Wrap any handle the caller already owns, e.g. one obtained from a
    /// binding outside the entity tree.
    pub fn wrap<H, W: FromHandle<H>>(&self, handle: H) -> Result<W> {
        W::from_handle(handle, &self.config)
    }
}

/// Defaults: narrow error policy, 5 s drain timeout, unknown discriminants
/// logged.
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    config: BridgeConfig,
}

impl SessionBuilder {
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.config.error_policy = policy;
        self
    }

    /// Upper bound on how long teardown waits for a notification still being
    /// dispatched on another thread. Must be non-zero.
    pub fn drain_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.drain_timeout_ms = timeout_ms;
        self
    }

    pub fn log_unknown_discriminants(mut self, enabled: bool) -> Self {
        self.config.log_unknown_discriminants = enabled;
        self
    }

    /// Replace every setting at once, e.g. with a deserialized config.
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Session> {
        if self.config.drain_timeout_ms == 0 {
            return Err(Error::InvalidArgument(
                "drain timeout must be non-zero".to_string(),
            ));
        }
        tracing::debug!(
            policy = %self.config.error_policy,
            drain_timeout_ms = self.config.drain_timeout_ms,
            "session configured"
        );
        Ok(Session {
            config: self.config,
        })
    }
}
