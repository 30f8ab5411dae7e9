//! The codec registry: named lookup, custom-codec/proxy registration, and
//! the thread-safe lazy-forwarding mechanism self-referential named types
//! need (§4.A, §4.G, §4.I).

use std::{
    any::Any,
    collections::HashMap,
    sync::{Arc, OnceLock, RwLock},
};

use log::{debug, trace};

use crate::{
    result::{DataError, DataResult},
    serialization::{Codec, CodecOps},
};

trait ErasedCodec<OT, O>: Send + Sync {
    fn encode_any(&self, ops: &O, value: &dyn Any) -> DataResult<OT>;
    fn decode_any(&self, ops: &O, value: &mut OT) -> DataResult<Box<dyn Any>>;
}

struct TypedCodec<T, C> {
    codec: C,
    _phantom: std::marker::PhantomData<fn() -> T>,
}

impl<T, C, OT, O> ErasedCodec<OT, O> for TypedCodec<T, C>
where
    T: Any + 'static,
    C: Codec<T, OT, O> + Send + Sync,
{
    fn encode_any(&self, ops: &O, value: &dyn Any) -> DataResult<OT> {
        let narrowed = value
            .downcast_ref::<T>()
            .expect("registry only narrows values under the type name they were registered with");
        self.codec.encode(ops, narrowed)
    }

    fn decode_any(&self, ops: &O, value: &mut OT) -> DataResult<Box<dyn Any>> {
        Ok(Box::new(self.codec.decode(ops, value)?))
    }
}

/// One named slot in the registry. Starts empty; `register_codec`
/// publishes into it exactly once via [`OnceLock::set`], which gives the
/// release/acquire ordering §4.G's forwarding-cell algorithm asks for
/// without hand-rolled atomics.
type Slot<OT, O> = Arc<OnceLock<Arc<dyn ErasedCodec<OT, O>>>>;

/// Owns every named codec registered for one wire format (`OT`/`O` pair),
/// plus the proxy table `register_type_proxy` populates. Not a
/// process-wide singleton — callers construct and hold their own
/// [`TypeRegistry`] (§4.H's "expose explicit core-instance construction").
pub struct TypeRegistry<OT, O: CodecOps<OT>> {
    codecs: RwLock<HashMap<String, Slot<OT, O>>>,
    proxies: RwLock<HashMap<String, String>>,
    _phantom: std::marker::PhantomData<fn() -> O>,
}

impl<OT, O: CodecOps<OT>> Default for TypeRegistry<OT, O> {
    fn default() -> Self {
        TypeRegistry {
            codecs: RwLock::new(HashMap::new()),
            proxies: RwLock::new(HashMap::new()),
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<OT: 'static, O: CodecOps<OT> + 'static> TypeRegistry<OT, O> {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_for(&self, name: &str) -> Slot<OT, O> {
        if let Some(slot) = self.codecs.read().unwrap().get(name) {
            return slot.clone();
        }
        self.codecs
            .write()
            .unwrap()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(OnceLock::new()))
            .clone()
    }

    /// Registers a codec under `name`. Insert-only: a second registration
    /// under the same name is a no-op (§5/§9, no concurrent-safe
    /// overwrite), so registration order across threads doesn't matter.
    pub fn register_codec<T, C>(&self, name: impl Into<String>, codec: C)
    where
        T: Any + Send + Sync + 'static,
        C: Codec<T, OT, O> + Send + Sync + 'static,
    {
        let name = name.into();
        let slot = self.slot_for(&name);
        let erased: Arc<dyn ErasedCodec<OT, O>> = Arc::new(TypedCodec {
            codec,
            _phantom: std::marker::PhantomData,
        });
        if slot.set(erased).is_err() {
            debug!("codec {name:?} already registered, ignoring duplicate registration");
        } else {
            trace!("registered codec {name:?}");
        }
    }

    /// Registers `from` as an alias resolving to `to`. Applied exactly
    /// once per lookup, not recursively (§4.A): if `to` is itself a proxy,
    /// that second hop is not followed.
    pub fn register_type_proxy(&self, from: impl Into<String>, to: impl Into<String>) {
        self.proxies
            .write()
            .unwrap()
            .entry(from.into())
            .or_insert_with(|| to.into());
    }

    fn resolve_name(&self, name: &str) -> String {
        match self.proxies.read().unwrap().get(name) {
            Some(target) => target.clone(),
            None => name.to_string(),
        }
    }

    fn lookup_erased(&self, name: &str) -> DataResult<Arc<dyn ErasedCodec<OT, O>>> {
        let resolved = self.resolve_name(name);
        let slot = self.slot_for(&resolved);
        match slot.get() {
            Some(codec) => {
                trace!("codec lookup hit for {resolved:?}");
                Ok(codec.clone())
            }
            None => {
                debug!("codec lookup miss for {resolved:?}");
                Err(DataError::unknown_type(resolved))
            }
        }
    }

    pub fn encode<T: Any + 'static>(&self, name: &str, ops: &O, value: &T) -> DataResult<OT> {
        self.lookup_erased(name)?.encode_any(ops, value)
    }

    pub fn decode<T: Any + 'static>(&self, name: &str, ops: &O, value: &mut OT) -> DataResult<T> {
        let boxed = self.lookup_erased(name)?.decode_any(ops, value)?;
        boxed
            .downcast::<T>()
            .map(|b| *b)
            .map_err(|_| DataError::wrong_shape("the registered Rust type", "a different Rust type"))
    }

    /// A codec that looks `name` up in this registry at encode/decode
    /// time instead of at construction time — the named, thread-safe
    /// generalisation of [`crate::serialization::Codecs::recursive`],
    /// letting a type's codec reference a sibling type that may not be
    /// registered yet.
    pub fn forwarding_codec<T: Any + 'static>(
        self: &Arc<Self>,
        name: impl Into<String>,
    ) -> impl Codec<T, OT, O> {
        ForwardingCodec {
            registry: self.clone(),
            name: name.into(),
            _phantom: std::marker::PhantomData,
        }
    }
}

struct ForwardingCodec<T, OT, O: CodecOps<OT>> {
    registry: Arc<TypeRegistry<OT, O>>,
    name: String,
    _phantom: std::marker::PhantomData<fn() -> T>,
}

impl<T: Any + 'static, OT: 'static, O: CodecOps<OT> + 'static> Codec<T, OT, O>
    for ForwardingCodec<T, OT, O>
{
    fn encode(&self, ops: &O, value: &T) -> DataResult<OT> {
        self.registry.encode(&self.name, ops, value)
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<T> {
        self.registry.decode(&self.name, ops, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::{json, json::JsonOps, Codec, DefaultCodec};

    #[test]
    fn registers_and_looks_up_by_name() {
        let registry: TypeRegistry<json::JsonValue, JsonOps> = TypeRegistry::new();
        registry.register_codec::<i32, _>("count", i32::codec());

        let mut encoded = registry.encode("count", &JsonOps, &7i32).unwrap();
        let decoded: i32 = registry.decode("count", &JsonOps, &mut encoded).unwrap();
        assert_eq!(decoded, 7);
    }

    #[test]
    fn unregistered_name_is_an_error() {
        let registry: TypeRegistry<json::JsonValue, JsonOps> = TypeRegistry::new();
        let mut encoded = JsonOps.create_number(&1.0);
        assert!(registry.decode::<i32>("missing", &JsonOps, &mut encoded).is_err());
    }

    #[test]
    fn second_registration_under_same_name_is_ignored() {
        let registry: TypeRegistry<json::JsonValue, JsonOps> = TypeRegistry::new();
        registry.register_codec::<i32, _>("count", i32::codec());
        registry.register_codec::<i32, _>("count", i32::codec().bounded(0..1));

        let mut encoded = registry.encode("count", &JsonOps, &500i32).unwrap();
        let decoded: i32 = registry.decode("count", &JsonOps, &mut encoded).unwrap();
        assert_eq!(decoded, 500);
    }

    #[test]
    fn proxy_is_applied_exactly_once() {
        let registry: TypeRegistry<json::JsonValue, JsonOps> = TypeRegistry::new();
        registry.register_codec::<i32, _>("real", i32::codec());
        registry.register_type_proxy("alias", "real");
        registry.register_type_proxy("double-alias", "alias");

        let mut encoded = registry.encode("alias", &JsonOps, &3i32).unwrap();
        assert_eq!(registry.decode::<i32>("alias", &JsonOps, &mut encoded).unwrap(), 3);

        assert!(registry.encode("double-alias", &JsonOps, &3i32).is_err());
    }

    #[test]
    fn forwarding_codec_resolves_once_registered() {
        use crate::serialization::CodecAdapters;

        let registry = Arc::new(TypeRegistry::<json::JsonValue, JsonOps>::new());
        let forward = registry.forwarding_codec::<i32>("count");
        registry.register_codec::<i32, _>("count", i32::codec().bounded(0..100));

        let mut encoded = forward.encode(&JsonOps, &42).unwrap();
        let decoded = forward.decode(&JsonOps, &mut encoded).unwrap();
        assert_eq!(decoded, 42);
    }
}
