//! # Observable List
//!
//! A list owned by exactly one writer and watched by any number of readers.
//!
//! - [`ObservableList`] is the writer's handle. Only it can [`replace`] the
//!   contents.
//! - [`ListReader`] is what readers get: the current snapshot plus
//!   [`ListReader::subscribe`]. Readers never hold a mutable reference.
//!
//! Every publish hands subscribers an `Rc<[T]>`, an immutable snapshot that
//! stays valid no matter what the writer does next. Publishing is always a
//! whole-list replacement; there is no incremental diff.
//!
//! [`replace`]: ObservableList::replace

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<T> = Box<dyn FnMut(&Rc<[T]>)>;
type SubscriberId = u64;

struct Inner<T> {
    items: Rc<[T]>,
    next_id: SubscriberId,
    subscribers: Vec<(SubscriberId, Option<Callback<T>>)>,
}

trait SubscriberHost {
    fn remove_subscriber(&mut self, id: SubscriberId);
}

impl<T> SubscriberHost for Inner<T> {
    fn remove_subscriber(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }
}

/// Writer handle.
pub struct ObservableList<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

/// Read-only handle to an [`ObservableList`].
pub struct ListReader<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for ListReader<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Keeps a subscriber attached. Dropping it unsubscribes.
pub struct Subscription {
    id: SubscriberId,
    host: Option<Weak<RefCell<dyn SubscriberHost>>>,
}

impl Subscription {
    pub fn cancel(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let Some(host) = self.host.take().and_then(|weak| weak.upgrade()) {
            host.borrow_mut().remove_subscriber(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<T: 'static> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ObservableList<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                items: Rc::from(Vec::new()),
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn reader(&self) -> ListReader<T> {
        ListReader {
            inner: self.inner.clone(),
        }
    }

    pub fn snapshot(&self) -> Rc<[T]> {
        self.inner.borrow().items.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Swap in `items` and publish the new snapshot to every subscriber.
    pub fn replace(&self, items: Vec<T>) {
        let snapshot: Rc<[T]> = Rc::from(items);
        let ids: Vec<SubscriberId> = {
            let mut inner = self.inner.borrow_mut();
            inner.items = snapshot.clone();
            inner.subscribers.iter().map(|(id, _)| *id).collect()
        };

        for id in ids {
            let callback = {
                let mut inner = self.inner.borrow_mut();
                inner
                    .subscribers
                    .iter_mut()
                    .find(|(sid, _)| *sid == id)
                    .and_then(|(_, cb)| cb.take())
            };
            let Some(mut callback) = callback else {
                continue;
            };
            callback(&snapshot);
            let mut inner = self.inner.borrow_mut();
            if let Some(slot) = inner.subscribers.iter_mut().find(|(sid, _)| *sid == id) {
                slot.1 = Some(callback);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

impl<T: 'static> ListReader<T> {
    pub fn snapshot(&self) -> Rc<[T]> {
        self.inner.borrow().items.clone()
    }

    /// Call `callback` with every future snapshot. The current one is not replayed;
    /// read it with [`ListReader::snapshot`].
    pub fn subscribe(&self, callback: impl FnMut(&Rc<[T]>) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Some(Box::new(callback))));
            id
        };
        let host: Rc<RefCell<dyn SubscriberHost>> = self.inner.clone();
        Subscription {
            id,
            host: Some(Rc::downgrade(&host)),
        }
    }
}
