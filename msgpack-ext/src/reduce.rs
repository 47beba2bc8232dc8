//! Encode-side counterpart to [`crate::resolve`]: host types that want to
//! round-trip through the reducer protocol implement [`Reducible`] instead
//! of hand-building a [`Value::Reduced`] or [`Value::SingletonRef`] directly.

use msgpack_value::{Construct, Value};

/// What a host reducer decomposes a value into: either the qualified name of
/// a registered singleton, or the pieces needed to reconstruct an instance
/// via a registered class.
#[derive(Debug, Clone, PartialEq)]
pub enum Reduced {
    /// This value is the one registered singleton `name` refers to.
    Singleton(String),
    /// This value reconstructs via the given class and arguments.
    Construct(Construct),
}

/// A host type that knows how to decompose itself for packing, mirroring
/// the constructor a [`crate::ClassHandle`] supplies for decoding.
pub trait Reducible {
    /// The `(module, name)` this type is registered under. Ignored for a
    /// [`Reduced::Singleton`] result.
    fn class() -> (String, String);

    /// Decompose `self` into its reducer-protocol result.
    fn reduce(&self) -> Reduced;
}

/// Pack a [`Reducible`] host value, routing a [`Reduced::Singleton`] result
/// through [`Value::SingletonRef`] (ext tag `0x07`) and a
/// [`Reduced::Construct`] result through [`Value::Reduced`] (ext tag `0x7f`).
pub fn to_value<T: Reducible>(value: &T) -> Value {
    match value.reduce() {
        Reduced::Singleton(name) => Value::SingletonRef(name),
        Reduced::Construct(mut construct) => {
            construct.class = T::class();
            Value::Reduced(Box::new(construct))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i64,
        y: i64,
    }

    impl Reducible for Point {
        fn class() -> (String, String) {
            ("pkg".into(), "Point".into())
        }

        fn reduce(&self) -> Reduced {
            Reduced::Construct(Construct {
                class: Self::class(),
                args: vec![Value::from(self.x), Value::from(self.y)],
                state: None,
                list_items: vec![],
                dict_items: vec![],
            })
        }
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
    fn wraps_a_construct_value_for_packing() {
        let point = Point { x: 1, y: 2 };
        let value = to_value(&point);
        match value {
            Value::Reduced(construct) => {
                assert_eq!(construct.class, ("pkg".into(), "Point".into()));
                assert_eq!(construct.args, vec![Value::from(1i64), Value::from(2i64)]);
            }
            other => panic!("expected Value::Reduced, got {other:?}"),
        }
    }

    #[test]
    fn wraps_a_singleton_value_as_a_singleton_ref() {
        let value = to_value(&Unset);
        assert_eq!(value, Value::SingletonRef("pkg.UNSET".into()));
    }
}
