//! The hosting window's size plus its resize listeners.

use std::fmt;

use crate::surface::Size;

/// Handle returned by [`Viewport::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ResizeListener = Box<dyn FnMut(Size)>;

/// Current viewport size and the callbacks to notify when it changes.
pub struct Viewport {
    size: Size,
    listeners: Vec<(ListenerId, ResizeListener)>,
    next_id: u64,
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("size", &self.size)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Viewport {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Registers a callback invoked with the new size on every resize.
    pub fn subscribe(&mut self, listener: impl FnMut(Size) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Updates the size and notifies every listener, in subscription order.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        for (_, listener) in &mut self.listeners {
            listener(size);
        }
    }
}
