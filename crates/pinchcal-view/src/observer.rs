#![forbid(unsafe_code)]

//! Presentation-side subscriptions.
//!
//! Observers are called synchronously, in subscription order, from inside the
//! engine call that caused the change. Every method defaults to a no-op so an
//! observer only implements what it draws.

use pinchcal_core::{PinchEvent, PointerPosition};

use crate::calendar::{CalendarCursor, MonthIndex};
use crate::view::ViewSnapshot;

/// Receives engine notifications.
pub trait EngineObserver {
    /// Every phase change, and every immediate view switch.
    fn on_view_state_changed(&mut self, _snapshot: &ViewSnapshot) {}

    /// The tracked pointer (or two-touch midpoint) moved.
    fn on_pointer_position_changed(&mut self, _pos: PointerPosition) {}

    /// The month preview under the pointer changed (year view only).
    fn on_hovered_month_changed(&mut self, _month: Option<MonthIndex>) {}

    /// A pinch was recognized, before it is routed.
    fn on_pinch(&mut self, _event: &PinchEvent) {}

    /// The month or year on screen changed (navigation, selection, year-view
    /// pinch-out over a month).
    fn on_cursor_changed(&mut self, _cursor: CalendarCursor) {}
}

/// Handle returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered set of observers.
#[derive(Default)]
pub struct ObserverRegistry {
    entries: Vec<(SubscriptionId, Box<dyn EngineObserver>)>,
    next_id: u64,
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl ObserverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn EngineObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    /// Remove an observer. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(sid, _)| *sid != id);
        self.entries.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call `f` on every observer in subscription order.
    pub fn notify(&mut self, mut f: impl FnMut(&mut dyn EngineObserver)) {
        for (_, observer) in &mut self.entries {
            f(observer.as_mut());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Tagged(&'static str, Rc<RefCell<Vec<&'static str>>>);

    impl EngineObserver for Tagged {
        fn on_hovered_month_changed(&mut self, _month: Option<MonthIndex>) {
            self.1.borrow_mut().push(self.0);
        }
    }

    #[test]
    fn notifies_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = ObserverRegistry::new();
        reg.subscribe(Box::new(Tagged("a", log.clone())));
        reg.subscribe(Box::new(Tagged("b", log.clone())));
        reg.notify(|o| o.on_hovered_month_changed(None));
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn unsubscribe_removes_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = ObserverRegistry::new();
        let a = reg.subscribe(Box::new(Tagged("a", log.clone())));
        reg.subscribe(Box::new(Tagged("b", log.clone())));
        assert!(reg.unsubscribe(a));
        assert!(!reg.unsubscribe(a));
        assert_eq!(reg.len(), 1);
        reg.notify(|o| o.on_hovered_month_changed(None));
        assert_eq!(*log.borrow(), vec!["b"]);
    }

    #[test]
    fn default_methods_are_noops() {
        struct Silent;
        impl EngineObserver for Silent {}
        let mut reg = ObserverRegistry::new();
        reg.subscribe(Box::new(Silent));
        reg.notify(|o| o.on_pointer_position_changed(PointerPosition::default()));
    }
}
