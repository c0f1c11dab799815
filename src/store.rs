//! The active locale, with explicit change notification.
//!
//! # Invariants
//!
//! 1. There is exactly one active locale; it is replaced whole, never edited.
//! 2. Subscribers run synchronously, in subscription order, after the new
//!    value is in place, so they always observe the post-switch locale.
//! 3. Setting the current value again notifies nobody.

use std::fmt;

use bevy::log::debug;

/// Payload handed to subscribers on every effective switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleChange {
    pub previous: String,
    pub current: String,
}

/// Handle returned by [`LocaleStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&LocaleChange) + Send + Sync>;

/// Holds the active and fallback locale for the lifetime of the app.
pub struct LocaleStore {
    active: String,
    fallback: String,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl LocaleStore {
    pub fn create(fallback: impl Into<String>, initial: impl Into<String>) -> Self {
        let store = Self {
            active: initial.into(),
            fallback: fallback.into(),
            subscribers: Vec::new(),
            next_id: 0,
        };
        debug!("Locale store created (active '{}', fallback '{}')", store.active, store.fallback);
        store
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Switches the active locale and notifies subscribers.
    ///
    /// The code is not checked against any supported set. Returns `None`
    /// when `code` already is the active locale.
    pub fn set_locale(&mut self, code: impl Into<String>) -> Option<LocaleChange> {
        let code = code.into();
        if code == self.active {
            return None;
        }

        let previous = std::mem::replace(&mut self.active, code);
        let change = LocaleChange { previous, current: self.active.clone() };
        for (_, subscriber) in &self.subscribers {
            subscriber(&change);
        }
        Some(change)
    }

    pub fn subscribe(&mut self, subscriber: impl Fn(&LocaleChange) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Drops every subscriber. The store keeps working but notifies nobody.
    pub fn dispose(&mut self) {
        debug!("Locale store disposed ({} subscriber(s) dropped)", self.subscribers.len());
        self.subscribers.clear();
    }
}

impl fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleStore")
            .field("active", &self.active)
            .field("fallback", &self.fallback)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
