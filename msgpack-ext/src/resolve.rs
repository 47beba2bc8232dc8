//! Post-decode resolution: walks a [`Value`] tree produced by
//! `msgpack_value::unpack` and resolves `Class`, `SingletonRef` and
//! `Reduced` nodes against a [`Registry`].

use msgpack_value::Value;

use crate::{Error, Registry};

/// Resolve every `Class`/`SingletonRef`/`Reduced` node in `value` against
/// `registry`, recursing into containers bottom-up so that a `Reduced`
/// nested inside another `Reduced`'s arguments is reconstructed before its
/// parent.
pub fn resolve(value: Value, registry: &Registry) -> Result<Value, Error> {
    match value {
        Value::Array(items) => Ok(Value::Array(resolve_all(items, registry)?)),
        Value::List(items) => Ok(Value::List(resolve_all(items, registry)?)),
        Value::Set(items) => Ok(Value::Set(resolve_all(items, registry)?)),
        Value::FrozenSet(items) => Ok(Value::FrozenSet(resolve_all(items, registry)?)),
        Value::Map(entries) => {
            let mut resolved = Vec::with_capacity(entries.len());
            for (k, v) in entries {
                resolved.push((resolve(k, registry)?, resolve(v, registry)?));
            }
            Ok(Value::Map(resolved))
        }
        Value::Class { module, name } => {
            if registry.class(&module, &name).is_some() {
                Ok(Value::Class { module, name })
            } else {
                Err(Error::UnknownClass { module, name })
            }
        }
        Value::SingletonRef(name) => {
            if registry.singleton(&name).is_some() {
                Ok(Value::SingletonRef(name))
            } else {
                Err(Error::UnknownSingleton { name })
            }
        }
        Value::Reduced(construct) => {
            let (module, name) = construct.class.clone();
            let mut construct = *construct;
            construct.args = resolve_all(construct.args, registry)?;
            construct.state = construct.state.map(|s| resolve(s, registry)).transpose()?;
            construct.list_items = resolve_all(construct.list_items, registry)?;
            let mut dict_items = Vec::with_capacity(construct.dict_items.len());
            for (k, v) in std::mem::take(&mut construct.dict_items) {
                dict_items.push((resolve(k, registry)?, resolve(v, registry)?));
            }
            construct.dict_items = dict_items;
            registry.reconstruct(&module, &name, &construct)
        }
        leaf => Ok(leaf),
    }
}

fn resolve_all(items: Vec<Value>, registry: &Registry) -> Result<Vec<Value>, Error> {
    items.into_iter().map(|v| resolve(v, registry)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgpack_value::Construct;

    use crate::ClassHandle;

    #[test]
    fn resolves_a_reduced_object_via_its_class_handle() {
        let registry = Registry::new();
        registry
            .register_class(ClassHandle::new("pkg", "Point", |args, _, _, _| {
                Ok(Value::Array(args.to_vec()))
            }))
            .unwrap();
        let value = Value::Reduced(Box::new(Construct {
            class: ("pkg".into(), "Point".into()),
            args: vec![Value::from(1i64), Value::from(2i64)],
            state: None,
            list_items: vec![],
            dict_items: vec![],
        }));
        let resolved = resolve(value, &registry).unwrap();
        assert_eq!(
            resolved,
            Value::Array(vec![Value::from(1i64), Value::from(2i64)])
        );
    }

    #[test]
    fn unregistered_class_reference_fails() {
        let registry = Registry::new();
        let value = Value::Class {
            module: "pkg".into(),
            name: "Missing".into(),
        };
        assert!(matches!(
            resolve(value, &registry),
            Err(Error::UnknownClass { .. })
        ));
    }

    #[test]
    fn unregistered_singleton_reference_fails() {
        let registry = Registry::new();
        let value = Value::SingletonRef("pkg.MISSING".into());
        assert!(matches!(
            resolve(value, &registry),
            Err(Error::UnknownSingleton { .. })
        ));
    }

    #[test]
    fn propagates_reduce_failures() {
        let registry = Registry::new();
        registry
            .register_class(ClassHandle::new("pkg", "Strict", |_, _, _, _| {
                Err("bad args".to_owned())
            }))
            .unwrap();
        let value = Value::Reduced(Box::new(Construct {
            class: ("pkg".into(), "Strict".into()),
            args: vec![],
            state: None,
            list_items: vec![],
            dict_items: vec![],
        }));
        assert!(matches!(
            resolve(value, &registry),
            Err(Error::ReduceFailed { .. })
        ));
    }
}
