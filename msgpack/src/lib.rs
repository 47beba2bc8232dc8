//! Public entry point: packs and unpacks [`Value`], resolving the
//! `Class`/`SingletonRef`/`Reduced` extension values against a
//! [`Registry`] of registered classes and singletons.
//!
//! Most callers only need the free functions ([`pack`], [`unpack`],
//! [`register_class`], [`register_singleton`]), which operate against a
//! process-wide default registry. Construct a [`Codec`] directly when you
//! need an isolated registry, e.g. in tests that register conflicting
//! classes under the same name.

use std::sync::{Arc, OnceLock};

pub use msgpack_ext::{to_value, ClassHandle, Constructor, Error, Reduced, Reducible, Registry};
pub use msgpack_value::{Construct, Limits, Number, Timestamp, Value};

/// A codec bound to its own [`Registry`].
#[derive(Default)]
pub struct Codec {
    registry: Registry,
}

impl Codec {
    /// Build a codec with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the underlying registry, to register classes and singletons.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Pack `value` to bytes.
    pub fn pack(&self, value: &Value) -> Result<Vec<u8>, Error> {
        Ok(msgpack_value::pack(value)?)
    }

    /// Unpack bytes into a value, resolving extension values against this
    /// codec's registry, using the default recursion-depth limit.
    pub fn unpack(&self, bytes: &[u8]) -> Result<Value, Error> {
        msgpack_ext::unpack_resolved(bytes, &self.registry)
    }

    /// Register a singleton value, returning the shared handle backing it.
    pub fn register_singleton(
        &self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<Arc<Value>, Error> {
        self.registry.register_singleton(name, value)
    }

    /// Like [`Codec::unpack`], but with an explicit recursion-depth limit.
    pub fn unpack_with_limits(&self, bytes: &[u8], limits: Limits) -> Result<Value, Error> {
        msgpack_ext::unpack_resolved_with_limits(bytes, limits, &self.registry)
    }
}

fn default_codec() -> &'static Codec {
    static CODEC: OnceLock<Codec> = OnceLock::new();
    CODEC.get_or_init(Codec::new)
}

/// Pack `value` to bytes.
pub fn pack(value: &Value) -> Result<Vec<u8>, Error> {
    default_codec().pack(value)
}

/// Unpack bytes into a value, resolving extension values against the
/// process-wide default registry.
pub fn unpack(bytes: &[u8]) -> Result<Value, Error> {
    default_codec().unpack(bytes)
}

/// Like [`unpack`], but with an explicit recursion-depth limit.
pub fn unpack_with_limits(bytes: &[u8], limits: Limits) -> Result<Value, Error> {
    default_codec().unpack_with_limits(bytes, limits)
}

/// Register a class handle with the process-wide default registry.
pub fn register_class(handle: ClassHandle) -> Result<(), Error> {
    default_codec().registry().register_class(handle)
}

/// Register a singleton value with the process-wide default registry,
/// returning the shared handle backing it.
pub fn register_singleton(name: impl Into<String>, value: Value) -> Result<Arc<Value>, Error> {
    default_codec().registry().register_singleton(name, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_and_unpacks_a_plain_value_without_registration() {
        let codec = Codec::new();
        let value = Value::Array(vec![Value::from(1i64), Value::Str("hi".into())]);
        let bytes = codec.pack(&value).unwrap();
        assert_eq!(codec.unpack(&bytes).unwrap(), value);
    }

    #[test]
    fn unpacking_an_unregistered_singleton_reference_fails() {
        let codec = Codec::new();
        let bytes = msgpack_value::pack(&Value::SingletonRef("pkg.UNSET".into())).unwrap();
        assert!(matches!(
            codec.unpack(&bytes),
            Err(Error::UnknownSingleton { .. })
        ));
    }

    #[test]
    fn reconstructs_a_registered_reduced_object() {
        let codec = Codec::new();
        codec
            .registry()
            .register_class(ClassHandle::new("pkg", "Point", |args, _, _, _| {
                Ok(Value::Array(args.to_vec()))
            }))
            .unwrap();
        let construct = Construct {
            class: ("pkg".into(), "Point".into()),
            args: vec![Value::from(1i64), Value::from(2i64)],
            state: None,
            list_items: vec![],
            dict_items: vec![],
        };
        let bytes = codec.pack(&Value::Reduced(Box::new(construct))).unwrap();
        assert_eq!(
            codec.unpack(&bytes).unwrap(),
            Value::Array(vec![Value::from(1i64), Value::from(2i64)])
        );
    }

    struct Unset;

    impl Reducible for Unset {
        fn class() -> (String, String) {
            ("pkg".into(), "Unset".into())
        }

        fn reduce(&self) -> Reduced {
            Reduced::Singleton("pkg.UNSET".into())
        }
    }

    #[test]
    fn a_reducible_singleton_resolves_against_its_registered_name() {
        let codec = Codec::new();
        codec
            .register_singleton("pkg.UNSET", Value::Str("unset".into()))
            .unwrap();
        let bytes = codec.pack(&to_value(&Unset)).unwrap();
        assert_eq!(
            codec.unpack(&bytes).unwrap(),
            Value::SingletonRef("pkg.UNSET".into())
        );
    }
}
