//! The dynamic-type dispatcher (§4.F): encodes a trait-object value either
//! directly, when its dynamic type matches what the caller statically
//! expects, or wrapped in a `{typeFieldName: name, valueFieldName: value}`
//! envelope when it doesn't.

use std::{any::Any, any::TypeId, collections::HashMap, marker::PhantomData};

use crate::{
    result::{DataError, DataResult},
    serialization::{Codec, CodecOps, MapView},
};

/// Rust has no runtime reflection, so dynamic-type dispatch needs a way to
/// ask "what concrete type is this, really" and get it back out again.
/// `DynAny` is that hook, grounded on the `downcast_ref`-over-`TypeId`
/// idiom used for dynamic codec dispatch in the wider ecosystem.
pub trait DynAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> DynAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

type EncodeFn<S, OT, O> = Box<dyn Fn(&O, &S) -> DataResult<OT>>;
type DecodeFn<OT, O, S> = Box<dyn Fn(&O, &mut OT) -> DataResult<Box<S>>>;

/// Per static-type-boundary registry mapping a concrete variant's
/// `TypeId` to an encode closure, and a variant name to a decode closure —
/// the `nameToClass`/`classToName` pair from §3, scoped to one trait
/// hierarchy instead of kept process-wide (see §9's note against a global
/// mutable registry).
pub struct PolyRegistry<S: ?Sized + DynAny, OT, O: CodecOps<OT>> {
    names_by_type: HashMap<TypeId, &'static str>,
    encoders: HashMap<TypeId, EncodeFn<S, OT, O>>,
    decoders: HashMap<&'static str, DecodeFn<OT, O, S>>,
    _phantom: PhantomData<fn() -> (OT, O)>,
}

impl<S: ?Sized + DynAny, OT, O: CodecOps<OT>> Default for PolyRegistry<S, OT, O> {
    fn default() -> Self {
        PolyRegistry {
            names_by_type: HashMap::new(),
            encoders: HashMap::new(),
            decoders: HashMap::new(),
            _phantom: PhantomData,
        }
    }
}

impl<S: ?Sized + DynAny, OT, O: CodecOps<OT>> PolyRegistry<S, OT, O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one concrete variant `V` of the trait object family `S`
    /// under `name`, together with the codec used to encode/decode it and
    /// the narrowing/widening functions between `V` and `S`.
    pub fn register<V: Any + 'static, C: Codec<V, OT, O> + 'static>(
        mut self,
        name: &'static str,
        codec: C,
        widen: fn(V) -> Box<S>,
    ) -> Self {
        let type_id = TypeId::of::<V>();
        self.names_by_type.insert(type_id, name);
        self.encoders.insert(
            type_id,
            Box::new(move |ops, value: &S| {
                let narrowed = value
                    .as_any()
                    .downcast_ref::<V>()
                    .expect("type_id match guarantees downcast succeeds");
                codec.encode(ops, narrowed)
            }),
        );
        self.decoders.insert(
            name,
            Box::new(move |ops, value| Ok(widen(codec.decode(ops, value)?))),
        );
        self
    }

    fn name_for(&self, value: &S) -> Option<&'static str> {
        self.names_by_type.get(&value.as_any().type_id()).copied()
    }
}

/// Wraps a [`PolyRegistry`] and implements the envelope rule from §4.F:
/// same dynamic type as the caller's static expectation (`expected_name`)
/// encodes directly; anything else is wrapped in
/// `{typeFieldName: name, valueFieldName: value}`. Decode peeks the map's
/// key set: exactly `{typeFieldName, valueFieldName}` is an envelope
/// (§8 "Envelope discrimination"), anything else decodes as the expected
/// type directly.
pub struct DispatchCodec<S: ?Sized + DynAny, OT, O: CodecOps<OT>> {
    registry: PolyRegistry<S, OT, O>,
    expected_name: &'static str,
    type_field_name: String,
    value_field_name: String,
}

impl<S: ?Sized + DynAny, OT, O: CodecOps<OT>> DispatchCodec<S, OT, O> {
    pub fn new(
        registry: PolyRegistry<S, OT, O>,
        expected_name: &'static str,
        type_field_name: impl Into<String>,
        value_field_name: impl Into<String>,
    ) -> Self {
        DispatchCodec {
            registry,
            expected_name,
            type_field_name: type_field_name.into(),
            value_field_name: value_field_name.into(),
        }
    }

    pub fn encode(&self, ops: &O, value: &S) -> DataResult<OT> {
        let name = self
            .registry
            .name_for(value)
            .ok_or_else(|| DataError::unknown_type("<unregistered dynamic type>"))?;
        let encoder = self
            .registry
            .encoders
            .get(&value.as_any().type_id())
            .expect("name_for found an entry implies encoders has one too");
        let encoded = encoder(ops, value)?;

        if name == self.expected_name {
            Ok(encoded)
        } else {
            Ok(ops.create_map([
                (self.type_field_name.clone(), ops.create_string(name)),
                (self.value_field_name.clone(), encoded),
            ]))
        }
    }

    pub fn decode(&self, ops: &O, value: &mut OT) -> DataResult<Box<S>> {
        let is_envelope = match ops.get_map(value) {
            Ok(map) => map.has_exactly_keys(&[&self.type_field_name, &self.value_field_name]),
            Err(_) => false,
        };

        if is_envelope {
            let mut map = ops.get_map(value)?;
            let type_slot = map.get(&self.type_field_name)?;
            let name = ops.get_string(type_slot)?;
            let decoder = self
                .registry
                .decoders
                .get(name.as_str())
                .ok_or_else(|| DataError::unknown_type(name.clone()))?;
            let value_slot = map.get(&self.value_field_name)?;
            decoder(ops, value_slot)
        } else {
            let decoder = self
                .registry
                .decoders
                .get(self.expected_name)
                .ok_or_else(|| DataError::unknown_type(self.expected_name))?;
            decoder(ops, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::{
        json::{JsonOps, JsonValue},
        CodecAdapters, DefaultCodec,
    };

    trait Shape: DynAny {
        fn area(&self) -> f64;
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Circle {
        radius: f64,
    }

    impl Shape for Circle {
        fn area(&self) -> f64 {
            std::f64::consts::PI * self.radius * self.radius
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Square {
        side: f64,
    }

    impl Shape for Square {
        fn area(&self) -> f64 {
            self.side * self.side
        }
    }

    fn registry() -> PolyRegistry<dyn Shape, JsonValue, JsonOps> {
        PolyRegistry::new()
            .register::<Circle, _>(
                "circle",
                f64::codec().xmap(|r: &f64| Circle { radius: *r }, |c: &Circle| c.radius),
                |c| Box::new(c),
            )
            .register::<Square, _>(
                "square",
                f64::codec().xmap(|s: &f64| Square { side: *s }, |s: &Square| s.side),
                |s| Box::new(s),
            )
    }

    #[test]
    fn matching_dynamic_type_encodes_without_envelope() {
        let codec = DispatchCodec::new(registry(), "circle", "@type", "@value");
        let shape: Box<dyn Shape> = Box::new(Circle { radius: 2.0 });
        let mut encoded = codec.encode(&JsonOps, shape.as_ref()).unwrap();
        assert!(encoded.is_number());
        let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();
        assert_eq!(decoded.area(), shape.area());
    }

    #[test]
    fn mismatched_dynamic_type_gets_envelope() {
        let codec = DispatchCodec::new(registry(), "circle", "@type", "@value");
        let shape: Box<dyn Shape> = Box::new(Square { side: 3.0 });
        let mut encoded = codec.encode(&JsonOps, shape.as_ref()).unwrap();
        assert!(encoded.is_object());
        let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();
        assert_eq!(decoded.area(), shape.area());
    }
}
