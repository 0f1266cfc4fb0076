//! Expandable disclosure region.

use std::sync::Arc;

use chatkit_core::{Property, Signal};

/// An open/closed region with a toggle notification.
///
/// Mirrors a native `details` element: the `toggled` signal fires after every
/// actual change of the open state, whether the user clicked the summary or
/// the state was set programmatically.
///
/// # Signals
///
/// - `toggle_signal()`: Emitted after the open state changes.
#[derive(Debug)]
pub struct Disclosure {
    open: Property<bool>,
    toggled: Arc<Signal<()>>,
}

impl Disclosure {
    /// Create a disclosure in the given state.
    pub fn new(open: bool) -> Self {
        Self {
            open: Property::new(open),
            toggled: Arc::new(Signal::new()),
        }
    }

    /// Whether the region is expanded.
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Set the open state. Emits only if the state changed.
    pub fn set_open(&self, open: bool) {
        if self.open.set(open) {
            self.toggled.emit(());
        }
    }

    /// Flip the open state, as a click on the summary does.
    pub fn toggle(&self) {
        self.set_open(!self.is_open());
    }

    /// Signal emitted after the open state changes.
    pub fn toggle_signal(&self) -> &Arc<Signal<()>> {
        &self.toggled
    }
}

impl Default for Disclosure {
    fn default() -> Self {
        Self::new(false)
    }
}
