//! Class and singleton registry.
//!
//! Read-mostly: lookups happen on every decode of a `Class`, `SingletonRef`
//! or `Reduced` value, while registration happens once per class/singleton
//! at startup. Backed by `RwLock` rather than a lock-free structure for
//! that reason.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use msgpack_value::{Construct, Value};

use crate::Error;

/// Reconstructs an instance of a registered class from a [`Construct`] value's
/// pieces.
pub type Constructor =
    dyn Fn(&[Value], Option<&Value>, &[Value], &[(Value, Value)]) -> Result<Value, String>
        + Send
        + Sync;

/// An opaque handle bound to a `(module, name)` pair, wrapping the closure
/// used to reconstruct instances of that class from a [`Construct`] payload.
#[derive(Clone)]
pub struct ClassHandle {
    module: String,
    name: String,
    construct: Arc<Constructor>,
}

impl ClassHandle {
    /// Build a handle for the class `module.name`, backed by `construct`.
    pub fn new(
        module: impl Into<String>,
        name: impl Into<String>,
        construct: impl Fn(&[Value], Option<&Value>, &[Value], &[(Value, Value)]) -> Result<Value, String>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            construct: Arc::new(construct),
        }
    }

    /// The class's module/namespace.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The class's qualified name within its module.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn construct(
        &self,
        args: &[Value],
        state: Option<&Value>,
        list_items: &[Value],
        dict_items: &[(Value, Value)],
    ) -> Result<Value, Error> {
        (self.construct)(args, state, list_items, dict_items).map_err(|reason| {
            Error::ReduceFailed {
                module: self.module.clone(),
                name: self.name.clone(),
                reason,
            }
        })
    }
}

impl fmt::Debug for ClassHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassHandle")
            .field("module", &self.module)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Bidirectional class/singleton registry.
///
/// Singletons are stored behind `Arc<Value>` so that two lookups of the same
/// registered name return pointer-equal handles: object identity has no
/// counterpart in a value type, so `Arc::ptr_eq` is the operational
/// stand-in exposed by [`Registry::singleton_identity_eq`].
#[derive(Default)]
pub struct Registry {
    classes: RwLock<HashMap<(String, String), ClassHandle>>,
    singletons: RwLock<HashMap<String, Arc<Value>>>,
}

impl Registry {
    /// Build an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class handle.
    ///
    /// Idempotent: registering the same `(module, name)` with a handle that
    /// wraps the same constructor closure (checked via `Arc::ptr_eq`) is a
    /// no-op. Registering a different closure under an already-bound name
    /// fails with [`Error::ClassConflict`].
    pub fn register_class(&self, handle: ClassHandle) -> Result<(), Error> {
        let key = (handle.module.clone(), handle.name.clone());
        let mut classes = self.classes.write().expect("registry lock poisoned");
        match classes.get(&key) {
            Some(existing) if Arc::ptr_eq(&existing.construct, &handle.construct) => Ok(()),
            Some(_) => {
                tracing::warn!(module = %key.0, name = %key.1, "rejected conflicting class registration");
                Err(Error::ClassConflict {
                    module: key.0,
                    name: key.1,
                })
            }
            None => {
                tracing::debug!(module = %key.0, name = %key.1, "registered class");
                classes.insert(key, handle);
                Ok(())
            }
        }
    }

    /// Register a singleton value under `name`, returning the shared handle
    /// backing it.
    ///
    /// Idempotent: registering the same name with an equal value is a
    /// no-op that returns the existing handle. Registering a different
    /// value under an already-bound name fails with
    /// [`Error::SingletonConflict`].
    pub fn register_singleton(
        &self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<Arc<Value>, Error> {
        let name = name.into();
        let mut singletons = self.singletons.write().expect("registry lock poisoned");
        match singletons.get(&name) {
            Some(existing) if **existing == value => Ok(Arc::clone(existing)),
            Some(_) => {
                tracing::warn!(%name, "rejected conflicting singleton registration");
                Err(Error::SingletonConflict { name })
            }
            None => {
                tracing::debug!(%name, "registered singleton");
                let handle = Arc::new(value);
                singletons.insert(name, Arc::clone(&handle));
                Ok(handle)
            }
        }
    }

    /// Look up a registered class handle.
    pub fn class(&self, module: &str, name: &str) -> Option<ClassHandle> {
        self.classes
            .read()
            .expect("registry lock poisoned")
            .get(&(module.to_owned(), name.to_owned()))
            .cloned()
    }

    /// Look up a registered singleton, returning the shared handle backing it.
    pub fn singleton(&self, name: &str) -> Option<Arc<Value>> {
        self.singletons
            .read()
            .expect("registry lock poisoned")
            .get(name)
            .cloned()
    }

    /// True if `a` and `b` are handles to the *same* registered singleton
    /// (not merely equal values), i.e. both came from [`Registry::singleton`]
    /// for the same name.
    pub fn singleton_identity_eq(a: &Arc<Value>, b: &Arc<Value>) -> bool {
        Arc::ptr_eq(a, b)
    }

    pub(crate) fn reconstruct(
        &self,
        module: &str,
        name: &str,
        construct: &Construct,
    ) -> Result<Value, Error> {
        let handle = self
            .class(module, name)
            .ok_or_else(|| Error::UnknownClass {
                module: module.to_owned(),
                name: name.to_owned(),
            })?;
        handle.construct(
            &construct.args,
            construct.state.as_ref(),
            &construct.list_items,
            &construct.dict_items,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registering_the_same_class_twice_is_idempotent() {
        let registry = Registry::new();
        let handle = ClassHandle::new("pkg", "Point", |_, _, _, _| Ok(Value::Nil));
        registry.register_class(handle.clone()).unwrap();
        registry.register_class(handle).unwrap();
    }

    #[test]
    fn registering_a_conflicting_class_fails() {
        let registry = Registry::new();
        registry
            .register_class(ClassHandle::new("pkg", "Point", |_, _, _, _| Ok(Value::Nil)))
            .unwrap();
        let err = registry
            .register_class(ClassHandle::new("pkg", "Point", |_, _, _, _| Ok(Value::Nil)))
            .unwrap_err();
        assert!(matches!(err, Error::ClassConflict { .. }));
    }

    #[test]
    fn registering_the_same_singleton_value_twice_is_idempotent() {
        let registry = Registry::new();
        registry
            .register_singleton("pkg.UNSET", Value::Str("unset".into()))
            .unwrap();
        registry
            .register_singleton("pkg.UNSET", Value::Str("unset".into()))
            .unwrap();
    }

    #[test]
    fn registering_a_conflicting_singleton_fails() {
        let registry = Registry::new();
        registry
            .register_singleton("pkg.UNSET", Value::Str("a".into()))
            .unwrap();
        let err = registry
            .register_singleton("pkg.UNSET", Value::Str("b".into()))
            .unwrap_err();
        assert!(matches!(err, Error::SingletonConflict { .. }));
    }

    #[test]
    fn singleton_lookups_share_identity() {
        let registry = Registry::new();
        registry
            .register_singleton("pkg.UNSET", Value::Nil)
            .unwrap();
        let a = registry.singleton("pkg.UNSET").unwrap();
        let b = registry.singleton("pkg.UNSET").unwrap();
        assert!(Registry::singleton_identity_eq(&a, &b));
    }
}
