//! Bookkeeping for debounced edits.
//!
//! The timer itself belongs to whoever owns the value (a component, in the
//! UI). Each edit hands out a [`Ticket`]; when a timer fires it offers its
//! ticket back through [`Debounced::settle`], which only yields the value for
//! the most recent edit. Stale timers and timers that fire after
//! [`Debounced::cancel`] get nothing.

use crate::filters::{FilterField, PropertyFilters};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Debounced<T> {
    value: T,
    generation: u64,
    pending: bool,
}

impl<T: Clone> Debounced<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            generation: 0,
            pending: false,
        }
    }

    /// The current value, including edits that have not settled yet.
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Apply an edit immediately and return the ticket for the timer that
    /// should deliver it. Earlier tickets become stale.
    pub fn edit(&mut self, f: impl FnOnce(&mut T)) -> Ticket {
        f(&mut self.value);
        self.generation += 1;
        self.pending = true;
        Ticket(self.generation)
    }

    /// Called when a timer fires. Returns the value to forward if `ticket`
    /// belongs to the latest edit and nothing has cancelled it.
    pub fn settle(&mut self, ticket: Ticket) -> Option<T> {
        if self.pending && ticket.0 == self.generation {
            self.pending = false;
            Some(self.value.clone())
        } else {
            None
        }
    }

    /// Drop any pending delivery, e.g. on unmount.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// Replace the value from outside (back button, shared link) without
    /// scheduling a delivery. Any pending edit is discarded.
    pub fn reset(&mut self, value: T) {
        self.value = value;
        self.pending = false;
    }
}

impl Debounced<PropertyFilters> {
    /// Edit one filter field: sanitized, page reset to 0.
    pub fn edit_field(&mut self, field: FilterField, value: &str) -> Ticket {
        self.edit(|filters| filters.set(field, value))
    }
}
