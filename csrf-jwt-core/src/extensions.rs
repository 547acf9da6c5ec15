//! Typed, request-scoped data.
//!
//! Routes attach their registration metadata here at dispatch time and
//! middleware uses it to hand values (such as the CSRF token issued for the
//! request) to the handler.
//!
//! ```rust
//! use csrf_jwt_core::Extensions;
//!
//! let mut ext = Extensions::new();
//! ext.insert(42i32);
//!
//! assert_eq!(ext.get::<i32>(), Some(&42));
//! assert_eq!(ext.get::<String>(), None);
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Map from a value's type to a shared instance of it.
#[derive(Clone, Default)]
pub struct Extensions {
    map: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Extensions {
    #[inline]
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Insert a typed value, replacing any previous value of the same type.
    #[inline]
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.map.insert(TypeId::of::<T>(), Arc::new(value));
    }

    #[inline]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|arc| arc.downcast_ref::<T>())
    }

    #[inline]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    /// Remove a typed value. Returns true if it existed.
    #[inline]
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> bool {
        self.map.remove(&TypeId::of::<T>()).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Copy every entry of `other` into `self`, sharing the stored values.
    ///
    /// Values from `other` overwrite values of the same type.
    pub fn extend_from(&mut self, other: &Extensions) {
        self.map
            .extend(other.map.iter().map(|(id, value)| (*id, Arc::clone(value))));
    }
}

impl std::fmt::Debug for Extensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extensions")
            .field("count", &self.map.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces() {
        let mut ext = Extensions::new();

        ext.insert(42i32);
        ext.insert(100i32);

        assert_eq!(ext.get::<i32>(), Some(&100));
        assert_eq!(ext.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut ext = Extensions::new();
        ext.insert(42i32);

        assert!(ext.remove::<i32>());
        assert!(!ext.contains::<i32>());
        assert!(!ext.remove::<i32>());
    }

    #[test]
    fn test_extend_from_overwrites() {
        let mut route = Extensions::new();
        route.insert("route".to_string());

        let mut request = Extensions::new();
        request.insert("stale".to_string());
        request.insert(7u8);
        request.extend_from(&route);

        assert_eq!(request.get::<String>().map(String::as_str), Some("route"));
        assert_eq!(request.get::<u8>(), Some(&7));
        assert_eq!(route.len(), 1);
    }
}
