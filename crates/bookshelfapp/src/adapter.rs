//! # List Adapter
//!
//! Turns the listing's snapshots into displayable rows.
//!
//! The adapter subscribes to a [`ListReader`] and keeps the latest snapshot it
//! was handed. It never writes to the list. Every snapshot it receives is a
//! full invalidation: the generation counter goes up by one and the
//! data-set-changed hook (if any) fires. There is no per-row diffing.
//!
//! Binding a row never blocks on images. If the record has a photo URL, a load
//! is handed to the [`ImageLoader`] and the row says [`PhotoState::Loading`].
//! Without a URL no load is attempted.

use crate::model::Record;
use crate::observable::{ListReader, Subscription};
use std::cell::RefCell;
use std::rc::Rc;

/// Fetches and shows a row's photo in the background.
pub trait ImageLoader {
    fn load(&self, url: &str, row: usize);
}

/// Receives row taps.
pub trait ItemClickListener {
    fn on_item_click(&self, index: usize);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoState {
    None,
    Loading(String),
}

/// One bound row. Absent record fields render as empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRow {
    pub owner: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub photo: PhotoState,
}

type ChangeHook = Box<dyn FnMut(u64)>;

struct AdapterState {
    rows: Rc<[Record]>,
    generation: u64,
    // None while the hook is running
    on_changed: Option<ChangeHook>,
}

pub struct BookListAdapter {
    state: Rc<RefCell<AdapterState>>,
    loader: Rc<dyn ImageLoader>,
    click_listener: Option<Rc<dyn ItemClickListener>>,
    _subscription: Subscription,
}

impl BookListAdapter {
    pub fn new(books: &ListReader<Record>, loader: Rc<dyn ImageLoader>) -> Self {
        let state = Rc::new(RefCell::new(AdapterState {
            rows: books.snapshot(),
            generation: 0,
            on_changed: None,
        }));

        let weak = Rc::downgrade(&state);
        let subscription = books.subscribe(move |rows| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let (generation, hook) = {
                let mut state = state.borrow_mut();
                state.rows = rows.clone();
                state.generation += 1;
                (state.generation, state.on_changed.take())
            };
            if let Some(mut hook) = hook {
                hook(generation);
                let mut state = state.borrow_mut();
                if state.on_changed.is_none() {
                    state.on_changed = Some(hook);
                }
            }
        });

        Self {
            state,
            loader,
            click_listener: None,
            _subscription: subscription,
        }
    }

    pub fn set_click_listener(&mut self, listener: Rc<dyn ItemClickListener>) {
        self.click_listener = Some(listener);
    }

    /// Called with the new generation after every snapshot.
    pub fn set_on_data_set_changed(&self, hook: impl FnMut(u64) + 'static) {
        self.state.borrow_mut().on_changed = Some(Box::new(hook));
    }

    pub fn row_count(&self) -> usize {
        self.state.borrow().rows.len()
    }

    /// Number of snapshots received so far.
    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    pub fn record(&self, index: usize) -> Option<Record> {
        self.state.borrow().rows.get(index).cloned()
    }

    pub fn bind_row(&self, index: usize) -> Option<BookRow> {
        let record = self.record(index)?;
        let photo = match record.photo_url {
            Some(url) => {
                self.loader.load(&url, index);
                PhotoState::Loading(url)
            }
            None => PhotoState::None,
        };
        Some(BookRow {
            owner: record.owner.unwrap_or_default(),
            title: record.title.unwrap_or_default(),
            author: record.author.unwrap_or_default(),
            content: record.content.unwrap_or_default(),
            photo,
        })
    }

    /// Forward a tap to the click listener. The index is passed through as is.
    pub fn on_row_tapped(&self, index: usize) {
        if let Some(listener) = &self.click_listener {
            listener.on_item_click(index);
        }
    }
}
