//! Name-keyed observable property storage.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// Typed, explicitly named property key.
///
/// Screens declare one `const` key per observable property, so the name is
/// fixed at compile time and the value type cannot drift between `get` and
/// `set`.
pub struct PropertyKey<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> PropertyKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for PropertyKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PropertyKey<T> {}

impl<T> Debug for PropertyKey<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PropertyKey").field(&self.name).finish()
    }
}

/// Current values of every observable property of one view state.
///
/// An unset property reads as `T::default()`.
#[derive(Default)]
pub struct Properties {
    values: HashMap<&'static str, Box<dyn Any + Send>>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the current value, or `T::default()` when unset.
    pub fn get<T: Clone + Default + 'static>(&self, key: &PropertyKey<T>) -> T {
        self.get_ref(key).cloned().unwrap_or_default()
    }

    /// Borrow of the current value, `None` when unset.
    pub fn get_ref<T: 'static>(&self, key: &PropertyKey<T>) -> Option<&T> {
        self.values
            .get(key.name())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Stores `value`; returns whether it differs from the previous value.
    ///
    /// An unset property compares as `T::default()`, so writing the default
    /// into a fresh key records the key but reports no change.
    pub(crate) fn set<T>(&mut self, key: &PropertyKey<T>, value: T) -> bool
    where
        T: PartialEq + Default + Send + 'static,
    {
        if let Some(current) = self
            .values
            .get_mut(key.name())
            .and_then(|current| current.downcast_mut::<T>())
        {
            if *current == value {
                return false;
            }
            *current = value;
            return true;
        }

        let changed = value != T::default();
        self.values.insert(key.name(), Box::new(value));
        changed
    }
}

impl Debug for Properties {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut names = self.values.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("Properties").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Properties, PropertyKey};

    const TITLE: PropertyKey<String> = PropertyKey::new("Title");
    const COUNT: PropertyKey<u32> = PropertyKey::new("Count");

    #[test]
    fn unset_property_reads_default() {
        let properties = Properties::new();
        assert_eq!(properties.get(&TITLE), "");
        assert_eq!(properties.get(&COUNT), 0);
        assert!(properties.get_ref(&TITLE).is_none());
    }

    #[test]
    fn set_reports_change_only_for_different_values() {
        let mut properties = Properties::new();
        assert!(properties.set(&TITLE, "Groceries".to_string()));
        assert!(!properties.set(&TITLE, "Groceries".to_string()));
        assert!(properties.set(&TITLE, "Chores".to_string()));
        assert_eq!(properties.get(&TITLE), "Chores");
    }

    #[test]
    fn writing_default_into_fresh_key_is_not_a_change() {
        let mut properties = Properties::new();
        assert!(!properties.set(&COUNT, 0));
        assert_eq!(properties.get_ref(&COUNT), Some(&0));
        assert!(properties.set(&COUNT, 3));
    }
}
