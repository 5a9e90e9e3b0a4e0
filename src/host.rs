//! Mount/unmount lifecycle for views.
//!
//! A mounted view owns a state container (a `watch` channel) and one side
//! effect spawned right after mounting. The effect writes state through a
//! [`StateSetter`]; observers of the [`Mounted`] handle wake on every change.
//! Unmounting cancels the mount's token: pending effects should stop, and any
//! write that still reaches the setter is discarded.

use std::future::Future;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Write side of a mounted view's state.
pub struct StateSetter<S> {
    tx: watch::Sender<S>,
    lifetime: CancellationToken,
}

impl<S> StateSetter<S> {
    pub fn is_active(&self) -> bool {
        !self.lifetime.is_cancelled()
    }

    /// Resolves once the owning view has been unmounted.
    pub async fn unmounted(&self) {
        self.lifetime.cancelled().await
    }

    /// Applies `update` and wakes observers. Returns `false`, without
    /// touching state, when the view is no longer mounted.
    pub fn update(&self, update: impl FnOnce(&mut S)) -> bool {
        if !self.is_active() {
            warn!("State update on an unmounted view was discarded");
            return false;
        }
        self.tx.send_modify(update);
        true
    }
}

/// Handle to a mounted view. Dropping it unmounts the view.
pub struct Mounted<S> {
    state: watch::Receiver<S>,
    lifetime: CancellationToken,
}

impl<S> Mounted<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Mounts a view with `initial` state and spawns `effect` once.
    pub fn mount<F, Fut>(initial: S, effect: F) -> Self
    where
        F: FnOnce(StateSetter<S>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, state) = watch::channel(initial);
        let lifetime = CancellationToken::new();

        let setter = StateSetter {
            tx,
            lifetime: lifetime.clone(),
        };
        tokio::spawn(effect(setter));

        Self { state, lifetime }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> S {
        self.state.borrow().clone()
    }

    /// Waits for the next state change. Returns `false` once the effect has
    /// finished and no further change can arrive.
    pub async fn changed(&mut self) -> bool {
        self.state.changed().await.is_ok()
    }

    pub fn unmount(self) {
        // Drop does the work
    }
}

impl<S> Drop for Mounted<S> {
    fn drop(&mut self) {
        if !self.lifetime.is_cancelled() {
            debug!("Unmounting view");
            self.lifetime.cancel();
        }
    }
}
