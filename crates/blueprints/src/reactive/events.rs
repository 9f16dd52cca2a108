use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::party::PartyRoster;
use crate::registry::AssetRegistry;

/// Identity of a subscriber; a source holds at most one handler per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberKey(pub &'static str);

impl fmt::Display for SubscriberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Live state handed to handlers while an event is delivered.
pub struct CombatContext<'a> {
    pub registry: &'a AssetRegistry,
    pub party: &'a mut dyn PartyRoster,
}

pub trait PartyCombatHandler {
    fn key(&self) -> SubscriberKey;

    fn handle_party_combat_state_changed(&self, in_combat: bool, context: &mut CombatContext<'_>);
}

pub trait CombatEventSource {
    /// Returns false when a handler with the same key is already subscribed.
    fn subscribe(&mut self, handler: Rc<dyn PartyCombatHandler>) -> bool;

    /// Returns false when nothing was subscribed under `key`.
    fn unsubscribe(&mut self, key: SubscriberKey) -> bool;

    fn is_subscribed(&self, key: SubscriberKey) -> bool;
}

/// In-process event source. Delivers synchronously in subscription order.
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<Rc<dyn PartyCombatHandler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    /// Returns how many handlers saw the event.
    pub fn raise_party_combat_state_changed(
        &self,
        in_combat: bool,
        context: &mut CombatContext<'_>,
    ) -> usize {
        debug!(
            in_combat,
            subscribers = self.handlers.len(),
            "party_combat_state_changed"
        );
        for handler in &self.handlers {
            handler.handle_party_combat_state_changed(in_combat, context);
        }
        self.handlers.len()
    }
}

impl CombatEventSource for EventBus {
    fn subscribe(&mut self, handler: Rc<dyn PartyCombatHandler>) -> bool {
        let key = handler.key();
        if self.is_subscribed(key) {
            debug!(key = %key, "combat_subscriber_already_present");
            return false;
        }
        self.handlers.push(handler);
        debug!(key = %key, "combat_subscriber_added");
        true
    }

    fn unsubscribe(&mut self, key: SubscriberKey) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|handler| handler.key() != key);
        let removed = self.handlers.len() != before;
        if removed {
            debug!(key = %key, "combat_subscriber_removed");
        }
        removed
    }

    fn is_subscribed(&self, key: SubscriberKey) -> bool {
        self.handlers.iter().any(|handler| handler.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::reactive::Party;

    struct Counter {
        key: &'static str,
        calls: Cell<u32>,
    }

    impl PartyCombatHandler for Counter {
        fn key(&self) -> SubscriberKey {
            SubscriberKey(self.key)
        }

        fn handle_party_combat_state_changed(&self, _: bool, _: &mut CombatContext<'_>) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    fn counter(key: &'static str) -> Rc<Counter> {
        Rc::new(Counter {
            key,
            calls: Cell::new(0),
        })
    }

    #[test]
    fn same_key_subscribes_once() {
        let mut bus = EventBus::new();
        let first = counter("a");
        assert!(bus.subscribe(first.clone()));
        assert!(!bus.subscribe(counter("a")));
        assert!(bus.subscribe(counter("b")));
        assert_eq!(bus.subscriber_count(), 2);

        let registry = AssetRegistry::default();
        let mut party = Party::new();
        let mut context = CombatContext {
            registry: &registry,
            party: &mut party,
        };
        assert_eq!(bus.raise_party_combat_state_changed(false, &mut context), 2);
        assert_eq!(first.calls.get(), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let handler = counter("a");
        bus.subscribe(handler.clone());
        assert!(bus.unsubscribe(SubscriberKey("a")));
        assert!(!bus.unsubscribe(SubscriberKey("a")));
        assert!(!bus.is_subscribed(SubscriberKey("a")));

        let registry = AssetRegistry::default();
        let mut party = Party::new();
        let mut context = CombatContext {
            registry: &registry,
            party: &mut party,
        };
        assert_eq!(bus.raise_party_combat_state_changed(false, &mut context), 0);
        assert_eq!(handler.calls.get(), 0);
    }
}
