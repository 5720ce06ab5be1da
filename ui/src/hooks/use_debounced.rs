use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use payloads::debounce::Debounced;
use yew::prelude::*;

/// A value edited immediately but reported through `on_settle` only once
/// `delay_ms` pass without another edit.
pub struct DebouncedHandle<T: 'static> {
    debounced: Rc<RefCell<Debounced<T>>>,
    timer: Rc<RefCell<Option<Timeout>>>,
    delay_ms: u32,
    on_settle: Callback<T>,
    rerender: UseForceUpdateHandle,
}

impl<T: 'static> Clone for DebouncedHandle<T> {
    fn clone(&self) -> Self {
        Self {
            debounced: self.debounced.clone(),
            timer: self.timer.clone(),
            delay_ms: self.delay_ms,
            on_settle: self.on_settle.clone(),
            rerender: self.rerender.clone(),
        }
    }
}

impl<T: Clone + 'static> DebouncedHandle<T> {
    pub fn value(&self) -> T {
        self.debounced.borrow().value().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.debounced.borrow().is_pending()
    }

    /// Apply `edit` now and restart the quiet period.
    pub fn edit(&self, edit: impl FnOnce(&mut T)) {
        let ticket = self.debounced.borrow_mut().edit(edit);

        let debounced = self.debounced.clone();
        let on_settle = self.on_settle.clone();
        let timeout = Timeout::new(self.delay_ms, move || {
            let settled = debounced.borrow_mut().settle(ticket);
            if let Some(value) = settled {
                on_settle.emit(value);
            }
        });
        // replacing the handle drops, and so cancels, the previous timer
        self.timer.borrow_mut().replace(timeout);
        self.rerender.force_update();
    }

    /// Replace the value without reporting it, discarding a pending edit.
    pub fn reset(&self, value: T) {
        self.timer.borrow_mut().take();
        self.debounced.borrow_mut().reset(value);
        self.rerender.force_update();
    }
}

#[hook]
pub fn use_debounced<T>(
    initial: T,
    delay_ms: u32,
    on_settle: Callback<T>,
) -> DebouncedHandle<T>
where
    T: Clone + 'static,
{
    let debounced = use_mut_ref(move || Debounced::new(initial));
    let timer = use_mut_ref(|| None::<Timeout>);
    let rerender = use_force_update();

    // Cancel a pending report on unmount
    {
        let debounced = debounced.clone();
        let timer = timer.clone();
        use_effect_with((), move |_| {
            move || {
                timer.borrow_mut().take();
                debounced.borrow_mut().cancel();
            }
        });
    }

    DebouncedHandle {
        debounced,
        timer,
        delay_ms,
        on_settle,
        rerender,
    }
}
