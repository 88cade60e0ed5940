/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

/// A list of change callbacks for a value of type `T`.
///
/// Callbacks run synchronously, in subscription order, on every
/// [`notify`](Observers::notify).
pub struct Observers<T> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T> Observers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, value: &T) {
        for (_, callback) in &mut self.entries {
            callback(value);
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn notifies_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::new();
        for tag in ["a", "b"] {
            let log = Rc::clone(&log);
            observers.subscribe(move |v: &i32| log.borrow_mut().push(format!("{tag}{v}")));
        }
        observers.notify(&7);
        assert_eq!(*log.borrow(), vec!["a7".to_string(), "b7".to_string()]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut observers = Observers::new();
        let id = {
            let count = Rc::clone(&count);
            observers.subscribe(move |_: &()| *count.borrow_mut() += 1)
        };
        observers.notify(&());
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify(&());
        assert_eq!(*count.borrow(), 1);
        assert_eq!(observers.len(), 0);
    }
}
