//! Process-wide settings store.
//!
//! The host opens one store at startup and hands clones of the handle to
//! every component. Subscribers are called synchronously, in subscription
//! order, before [`ConfigStore::update`] returns.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::glass::GlassStyle;
use super::settings::{Config, ConfigPatch};
use super::storage::{ConfigStorage, MemoryStorage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Rc<dyn Fn(&Config)>;

struct StoreInner {
    config: Config,
    storage: Box<dyn ConfigStorage>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

/// Cheap-to-clone handle to the shared settings.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ConfigStore")
            .field("config", &inner.config)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl ConfigStore {
    /// Opens the store, loading persisted settings from `storage`.
    ///
    /// Missing or unreadable data falls back to defaults.
    pub fn open(storage: impl ConfigStorage + 'static) -> Self {
        let config = load_config(&storage);
        info!(
            speed = config.animation_speed_multiplier,
            intensity = config.visual_intensity,
            "settings loaded"
        );
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                config,
                storage: Box::new(storage),
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// A store backed by throwaway memory.
    pub fn in_memory() -> Self {
        Self::open(MemoryStorage::new())
    }

    /// Snapshot of the current settings.
    pub fn get(&self) -> Config {
        self.inner.borrow().config.clone()
    }

    pub fn animation_speed(&self) -> f32 {
        self.inner.borrow().config.animation_speed_multiplier
    }

    pub fn visual_intensity(&self) -> f32 {
        self.inner.borrow().config.visual_intensity
    }

    /// `base` divided by the multiplier in effect right now.
    pub fn scaled(&self, base: Duration) -> Duration {
        let nanos = base.as_nanos() as f64 / f64::from(self.animation_speed());
        Duration::from_nanos(nanos.round() as u64)
    }

    pub fn glass_style(&self) -> GlassStyle {
        GlassStyle::from_intensity(self.visual_intensity())
    }

    /// Merges `patch`, persists, then notifies every subscriber.
    ///
    /// A failed save is logged and the in-memory value is kept. A subscriber
    /// removed during delivery is not called afterwards; one added during
    /// delivery first hears the next update.
    pub fn update(&self, patch: ConfigPatch) {
        let (snapshot, subscribers) = {
            let mut inner = self.inner.borrow_mut();
            patch.apply_to(&mut inner.config);
            let snapshot = inner.config.clone();
            persist(inner.storage.as_ref(), &snapshot);
            let subscribers: Vec<(SubscriptionId, Subscriber)> = inner
                .subscribers
                .iter()
                .map(|(id, s)| (*id, Rc::clone(s)))
                .collect();
            (snapshot, subscribers)
        };
        debug!(
            speed = snapshot.animation_speed_multiplier,
            intensity = snapshot.visual_intensity,
            subscribers = subscribers.len(),
            "settings updated"
        );
        for (id, subscriber) in subscribers {
            if self.is_subscribed(id) {
                subscriber(&snapshot);
            }
        }
    }

    /// Restores every setting to its default.
    pub fn reset(&self) {
        self.update(ConfigPatch::from(Config::default()));
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Config) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, Rc::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sub_id, _)| *sub_id != id);
        inner.subscribers.len() != before
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner.borrow().subscribers.iter().any(|(sub_id, _)| *sub_id == id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

fn load_config(storage: &dyn ConfigStorage) -> Config {
    match storage.load() {
        Ok(Some(blob)) => match serde_json::from_str::<Config>(&blob) {
            Ok(mut config) => {
                config.sanitize();
                config
            }
            Err(e) => {
                warn!(error = %e, "corrupt settings, using defaults");
                Config::default()
            }
        },
        Ok(None) => {
            debug!("no saved settings, using defaults");
            Config::default()
        }
        Err(e) => {
            warn!(error = %format!("{:#}", e), "failed to load settings, using defaults");
            Config::default()
        }
    }
}

fn persist(storage: &dyn ConfigStorage, config: &Config) {
    let blob = match serde_json::to_string_pretty(config) {
        Ok(blob) => blob,
        Err(e) => {
            warn!(error = %e, "failed to serialize settings");
            return;
        }
    };
    if let Err(e) = storage.save(&blob) {
        warn!(error = %format!("{:#}", e), "failed to save settings");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrbPreset;
    use crate::constants::MIN_ANIMATION_SPEED;
    use std::cell::{Cell, RefCell};

    #[test]
    fn zero_speed_stays_positive() {
        let store = ConfigStore::in_memory();
        store.update(ConfigPatch::new().animation_speed(0.0));
        assert!(store.get().animation_speed_multiplier > 0.0);
        assert_eq!(store.animation_speed(), MIN_ANIMATION_SPEED);
    }

    #[test]
    fn intensity_above_one_is_clamped() {
        let store = ConfigStore::in_memory();
        store.update(ConfigPatch::new().visual_intensity(1.5));
        assert_eq!(store.get().visual_intensity, 1.0);
    }

    #[test]
    fn subscribers_run_in_order_before_update_returns() {
        let store = ConfigStore::in_memory();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        store.subscribe(move |c| first.borrow_mut().push(("first", c.animation_speed_multiplier)));
        let second = Rc::clone(&log);
        store.subscribe(move |c| second.borrow_mut().push(("second", c.animation_speed_multiplier)));

        store.update(ConfigPatch::new().animation_speed(2.0));

        assert_eq!(*log.borrow(), vec![("first", 2.0), ("second", 2.0)]);
    }

    #[test]
    fn unsubscribed_callbacks_are_not_called() {
        let store = ConfigStore::in_memory();
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let id = store.subscribe(move |_| *counter.borrow_mut() += 1);

        store.update(ConfigPatch::new().visual_intensity(0.2));
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.update(ConfigPatch::new().visual_intensity(0.3));

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn subscriber_may_read_the_store() {
        let store = ConfigStore::in_memory();
        let seen = Rc::new(RefCell::new(None));
        let reader = store.clone();
        let sink = Rc::clone(&seen);
        store.subscribe(move |_| *sink.borrow_mut() = Some(reader.get().orb_preset));

        store.update(ConfigPatch::new().orb_preset(OrbPreset::Fire));

        assert_eq!(*seen.borrow(), Some(OrbPreset::Fire));
    }

    #[test]
    fn every_update_is_persisted() {
        let storage = MemoryStorage::new();
        let store = ConfigStore::open(storage.clone());
        store.update(ConfigPatch::new().animation_speed(1.5));
        store.update(ConfigPatch::new().visual_intensity(0.1));

        assert_eq!(storage.save_count(), 2);
        let saved: Config = serde_json::from_str(&storage.contents().unwrap()).unwrap();
        assert_eq!(saved.animation_speed_multiplier, 1.5);
        assert_eq!(saved.visual_intensity, 0.1);
    }

    #[test]
    fn save_failure_keeps_in_memory_value() {
        let storage = MemoryStorage::new();
        let store = ConfigStore::open(storage.clone());
        storage.set_failing(true);

        let notified = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&notified);
        store.subscribe(move |_| *flag.borrow_mut() = true);
        store.update(ConfigPatch::new().animation_speed(3.0));

        assert_eq!(store.animation_speed(), 3.0);
        assert!(*notified.borrow());
        assert!(storage.contents().is_none());
    }

    #[test]
    fn corrupt_blob_loads_defaults() {
        let store = ConfigStore::open(MemoryStorage::with_blob("{not json"));
        assert_eq!(store.get(), Config::default());
    }

    #[test]
    fn unreadable_storage_loads_defaults() {
        let storage = MemoryStorage::with_blob(r#"{"animationSpeedMultiplier": 2.0}"#);
        storage.set_failing(true);
        let store = ConfigStore::open(storage);
        assert_eq!(store.get(), Config::default());
    }

    #[test]
    fn scaled_reads_the_live_multiplier() {
        let store = ConfigStore::in_memory();
        let base = Duration::from_millis(200);
        assert_eq!(store.scaled(base), Duration::from_millis(200));
        store.update(ConfigPatch::new().animation_speed(2.0));
        assert_eq!(store.scaled(base), Duration::from_millis(100));
    }

    #[test]
    fn reset_restores_defaults() {
        let store = ConfigStore::in_memory();
        store.update(ConfigPatch::new().animation_speed(4.0).orb_preset(OrbPreset::Ocean));
        store.reset();
        assert_eq!(store.get(), Config::default());
    }

    #[test]
    fn unsubscribe_during_delivery_skips_removed_subscribers() {
        let store = ConfigStore::in_memory();
        let log = Rc::new(RefCell::new(Vec::new()));
        let own_id = Rc::new(Cell::new(None::<SubscriptionId>));
        let next_id = Rc::new(Cell::new(None::<SubscriptionId>));

        let a = {
            let (handle, log) = (store.clone(), Rc::clone(&log));
            let (own_id, next_id) = (Rc::clone(&own_id), Rc::clone(&next_id));
            store.subscribe(move |_| {
                log.borrow_mut().push("a");
                for id in [own_id.get(), next_id.get()].into_iter().flatten() {
                    handle.unsubscribe(id);
                }
            })
        };
        let sink = Rc::clone(&log);
        let b = store.subscribe(move |_| sink.borrow_mut().push("b"));
        let sink = Rc::clone(&log);
        store.subscribe(move |_| sink.borrow_mut().push("c"));
        own_id.set(Some(a));
        next_id.set(Some(b));

        store.update(ConfigPatch::new().animation_speed(1.5));
        assert_eq!(*log.borrow(), vec!["a", "c"]);
        assert_eq!(store.subscriber_count(), 1);

        store.update(ConfigPatch::new().animation_speed(2.0));
        assert_eq!(*log.borrow(), vec!["a", "c", "c"]);
    }

    #[test]
    fn subscribe_during_delivery_waits_for_next_update() {
        let store = ConfigStore::in_memory();
        let log = Rc::new(RefCell::new(Vec::new()));
        let added = Rc::new(Cell::new(false));
        {
            let (inner_store, log, added) = (store.clone(), Rc::clone(&log), Rc::clone(&added));
            store.subscribe(move |_| {
                if !added.replace(true) {
                    let sink = Rc::clone(&log);
                    inner_store.subscribe(move |_| sink.borrow_mut().push("late"));
                }
            });
        }

        store.update(ConfigPatch::new().animation_speed(1.5));
        assert!(log.borrow().is_empty());
        store.update(ConfigPatch::new().animation_speed(2.0));
        assert_eq!(*log.borrow(), vec!["late"]);
    }
}
