//! Reactive properties.
//!
//! A [`Property<T>`] wraps a value and reports whether a write actually
//! changed it, which is what components use to decide when to re-render.
//! [`ReflectedProperty`] additionally carries the attribute name under which a
//! component exposes the value to the outside world.
//!
//! # Example
//!
//! ```
//! use chatkit_core::Property;
//!
//! let prop = Property::new(42);
//! assert!(!prop.set(42));
//! assert!(prop.set(100));
//! assert_eq!(prop.get(), 100);
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A value whose writes report whether anything changed.
///
/// Shared through `&self`; `Send + Sync` when `T` is.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Wrap `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// A clone of the value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Borrow the value for the duration of `f`.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Store `value`; `true` if it differs from the previous one.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Store `value`, handing back the previous one if it differed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &*self.value.read())
            .finish()
    }
}

/// A property mirrored outward as a named attribute.
///
/// Boolean reflection follows HTML conventions: the attribute is present when
/// the value is `true` and absent otherwise.
#[derive(Debug)]
pub struct ReflectedProperty<T> {
    attribute: &'static str,
    inner: Property<T>,
}

impl<T: Clone> ReflectedProperty<T> {
    /// Create a reflected property.
    pub fn new(attribute: &'static str, value: T) -> Self {
        Self {
            attribute,
            inner: Property::new(value),
        }
    }

    /// The attribute name this property reflects to.
    pub fn attribute(&self) -> &'static str {
        self.attribute
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.inner.get()
    }
}

impl<T: Clone + PartialEq> ReflectedProperty<T> {
    /// Set the value, returning `true` if it changed.
    pub fn set(&self, value: T) -> bool {
        self.inner.set(value)
    }
}

impl ReflectedProperty<bool> {
    /// The reflected attribute, if present.
    pub fn reflect(&self) -> Option<(&'static str, String)> {
        self.get().then(|| (self.attribute, String::new()))
    }
}

impl ReflectedProperty<String> {
    /// The reflected attribute with its value.
    pub fn reflect(&self) -> Option<(&'static str, String)> {
        Some((self.attribute, self.get()))
    }
}
