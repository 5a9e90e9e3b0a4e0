use std::sync::{Arc, Mutex};

use tracing::{Event, Level, Subscriber, subscriber::DefaultGuard};
use tracing_subscriber::{
    Layer,
    layer::{Context, SubscriberExt},
};

/// Records the level of every event emitted by this crate while installed.
#[derive(Clone, Default)]
pub struct EventCounter {
    levels: Arc<Mutex<Vec<Level>>>,
}

impl EventCounter {
    /// Installs the counter as the current thread's default subscriber.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    pub fn count(&self, level: Level) -> usize {
        self.levels
            .lock()
            .unwrap()
            .iter()
            .filter(|l| **l == level)
            .count()
    }
}

impl<S: Subscriber> Layer<S> for EventCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target().starts_with(env!("CARGO_CRATE_NAME")) {
            self.levels.lock().unwrap().push(*event.metadata().level());
        }
    }
}
