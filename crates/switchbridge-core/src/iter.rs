//! Adapter from a foreign pull-based enumeration to a Rust [`Iterator`].

use crate::config::BridgeConfig;
use crate::error::{translate_value, Error, Result};
use crate::handle::{ForeignHandle, ForeignIterator, FromHandle, LookupById};
use crate::wrapper::NativeHandle;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// Yields one freshly built wrapper `W` per foreign element.
///
/// Single pass. Once the foreign side reports the end, or a step fails,
/// every further call to `next` returns `None` without touching the foreign
/// iterator. Ask the parent for a new iterator to enumerate again.
pub struct IteratorAdapter<I: ForeignIterator, W> {
    iterator: NativeHandle<I>,
    exhausted: bool,
    config: BridgeConfig,
    _marker: PhantomData<fn() -> W>,
}

impl<I: ForeignIterator, W: FromHandle<I::Item>> IteratorAdapter<I, W> {
    pub fn new(iterator: Option<I>, config: &BridgeConfig) -> Result<Self> {
        Ok(Self {
            iterator: NativeHandle::new(iterator)?,
            exhausted: false,
            config: *config,
            _marker: PhantomData,
        })
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Look one element up without advancing the enumeration.
    ///
    /// A miss is `InvalidArgument`.
    pub fn get_by_id(&self, id: I::Id) -> Result<W>
    where
        I: LookupById,
    {
        let found = translate_value(
            self.iterator.get().handle_by_id(id),
            "get_by_id",
            self.config.error_policy,
        )?;
        match found {
            Some(handle) => W::from_handle(handle, &self.config),
            None => Err(Error::InvalidArgument(format!(
                "no {} with id {:?}",
                <I::Item as ForeignHandle>::INTERFACE.name,
                id
            ))),
        }
    }
}

impl<I: ForeignIterator, W: FromHandle<I::Item>> Iterator for IteratorAdapter<I, W> {
    type Item = Result<W>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        match translate_value(self.iterator.get().next_handle(), "next", self.config.error_policy) {
            Ok(Some(handle)) => Some(W::from_handle(handle, &self.config)),
            Ok(None) => {
                self.exhausted = true;
                tracing::trace!(interface = I::INTERFACE.name, "enumeration exhausted");
                None
            }
            Err(e) => {
                self.exhausted = true;
                tracing::debug!(interface = I::INTERFACE.name, "enumeration stopped: {}", e);
                Some(Err(e))
            }
        }
    }
}

impl<I: ForeignIterator, W: FromHandle<I::Item>> FusedIterator for IteratorAdapter<I, W> {}

impl<I: ForeignIterator, W> fmt::Debug for IteratorAdapter<I, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IteratorAdapter")
            .field("interface", &I::INTERFACE.name)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorPolicy;
    use crate::handle::InterfaceId;
    use crate::status::Status;
    use crate::testing::{AddRef, FakeIterator};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct Tile {
        label: &'static str,
        releases: Arc<AtomicUsize>,
    }

    impl ForeignHandle for Tile {
        const INTERFACE: InterfaceId = InterfaceId::new("Tile", 7);

        fn release(&self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl AddRef for Tile {
        fn add_ref(&self) -> Self {
            self.clone()
        }
    }

    struct TileView(NativeHandle<Tile>);

    impl FromHandle<Tile> for TileView {
        fn from_handle(handle: Tile, _config: &BridgeConfig) -> Result<Self> {
            NativeHandle::new(Some(handle)).map(TileView)
        }
    }

    impl TileView {
        fn label(&self) -> &'static str {
            self.0.get().label
        }
    }

    fn tiles(labels: &[&'static str]) -> (FakeIterator<Tile>, Arc<AtomicUsize>) {
        let releases = Arc::new(AtomicUsize::new(0));
        let items = labels
            .iter()
            .enumerate()
            .map(|(i, &label)| {
                (
                    i as u64 + 1,
                    Tile {
                        label,
                        releases: Arc::clone(&releases),
                    },
                )
            })
            .collect();
        (FakeIterator::new(items), releases)
    }

    fn adapter(fake: &FakeIterator<Tile>) -> IteratorAdapter<FakeIterator<Tile>, TileView> {
        IteratorAdapter::new(Some(fake.clone()), &BridgeConfig::default()).unwrap()
    }

    #[test]
    fn test_yields_each_element_then_stops() {
        let (fake, releases) = tiles(&["cam1", "cam2", "black"]);
        let mut it = adapter(&fake);

        let labels: Vec<_> = it.by_ref().map(|t| t.unwrap().label()).collect();
        assert_eq!(labels, vec!["cam1", "cam2", "black"]);
        assert!(it.is_exhausted());

        // Each yielded wrapper owned and released its reference.
        assert_eq!(releases.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_exhausted_adapter_does_not_call_foreign_next() {
        let (fake, _) = tiles(&["cam1"]);
        let mut it = adapter(&fake);

        assert!(it.next().is_some());
        assert!(it.next().is_none());
        let calls = fake.next_calls();
        assert!(it.next().is_none());
        assert!(it.next().is_none());
        assert_eq!(fake.next_calls(), calls);
    }

    #[test]
    fn test_empty_collection() {
        let (fake, _) = tiles(&[]);
        let mut it = adapter(&fake);
        assert!(it.next().is_none());
        assert!(it.is_exhausted());
    }

    #[test]
    fn test_null_iterator_rejected() {
        let err =
            IteratorAdapter::<FakeIterator<Tile>, TileView>::new(None, &BridgeConfig::default())
                .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_step_failure_yields_one_error() {
        let (fake, _) = tiles(&["cam1", "cam2", "cam3"]);
        fake.fail_at(1, Status::FAIL);
        let mut it = adapter(&fake);

        assert_eq!(it.next().unwrap().unwrap().label(), "cam1");
        let err = it.next().unwrap().err().unwrap();
        assert_eq!(
            err,
            Error::OperationFailed {
                operation: "next",
                status: Status::FAIL
            }
        );
        assert!(it.next().is_none());
    }

    #[test]
    fn test_get_by_id() {
        let (fake, _) = tiles(&["cam1", "cam2"]);
        let mut it = adapter(&fake);

        assert_eq!(it.get_by_id(2).unwrap().label(), "cam2");
        // Lookup does not move the cursor.
        assert_eq!(it.next().unwrap().unwrap().label(), "cam1");
    }

    #[test]
    fn test_get_by_id_miss_is_invalid_argument() {
        let (fake, _) = tiles(&["cam1"]);
        let it = adapter(&fake);

        let err = it.get_by_id(99).err().unwrap();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let msg = err.to_string();
        assert!(msg.contains("Tile") && msg.contains("99"));
    }

    #[test]
    fn test_lookup_failure_translated_with_policy() {
        let (fake, _) = tiles(&["cam1"]);
        fake.fail_lookup(Status::INVALID_ARG);
        let config = BridgeConfig::default().with_error_policy(ErrorPolicy::Classify);
        let it: IteratorAdapter<_, TileView> =
            IteratorAdapter::new(Some(fake.clone()), &config).unwrap();

        assert!(matches!(it.get_by_id(1), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_iterator_released_on_drop() {
        let (fake, _) = tiles(&["cam1"]);
        let it = adapter(&fake);
        assert!(!fake.is_released());
        drop(it);
        assert!(fake.is_released());
    }
}
