//! A format-pluggable object serialization engine: one codec core, many
//! wire formats.
//!
//! [`serialization::Codec`]/[`serialization::CodecOps`] are the core
//! abstraction — a [`serialization::Codec<T, OT, O>`] knows how to move a
//! Rust value of type `T` to and from a format's wire type `OT`, for any
//! format that implements [`serialization::CodecOps<OT>`]. Five formats
//! ship under [`serialization::json`], [`serialization::json_stream`],
//! [`serialization::xml`], [`serialization::msgpack`] and
//! [`serialization::binary`]. [`CodecCore`] bundles a [`Config`] with a
//! [`TypeRegistry`] for callers who need named lookup, dynamic-type
//! dispatch or cross-type forwarding instead of a single static codec.

pub mod config;
pub mod dynamic;
pub mod registry;
pub mod result;
pub mod serialization;

pub use config::Config;
pub use registry::TypeRegistry;
pub use result::{DataError, DataResult};
pub use serialization::{Codec, CodecAdapters, CodecOps, Codecs, DefaultCodec};

use std::{any::Any, sync::Arc};

/// Encodes `value` with `codec` against `ops`. A thin pass-through to
/// [`Codec::encode`] — the entry point for callers who already have a
/// static codec and don't need named lookup or a [`TypeRegistry`].
pub fn encode<T, OT, O: CodecOps<OT>>(
    ops: &O,
    codec: &impl Codec<T, OT, O>,
    value: &T,
) -> DataResult<OT> {
    codec.encode(ops, value)
}

/// Decodes `value` with `codec` against `ops`. A thin pass-through to
/// [`Codec::decode`].
pub fn decode<T, OT, O: CodecOps<OT>>(
    ops: &O,
    codec: &impl Codec<T, OT, O>,
    value: &mut OT,
) -> DataResult<T> {
    codec.decode(ops, value)
}

/// The explicit, owned handle to one wire format's codec core: a
/// [`Config`] plus the [`TypeRegistry`] named codecs get registered
/// against. Deliberately not a process-wide global (§9's "expose
/// explicit core-instance construction") — callers construct as many of
/// these as they need, one per format they speak, and pass them around
/// like any other value.
pub struct CodecCore<OT, O: CodecOps<OT>> {
    pub config: Config,
    registry: Arc<TypeRegistry<OT, O>>,
}

impl<OT, O: CodecOps<OT>> Clone for CodecCore<OT, O> {
    fn clone(&self) -> Self {
        CodecCore {
            config: self.config.clone(),
            registry: self.registry.clone(),
        }
    }
}

impl<OT: 'static, O: CodecOps<OT> + 'static> CodecCore<OT, O> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        CodecCore {
            config,
            registry: Arc::new(TypeRegistry::new()),
        }
    }

    pub fn registry(&self) -> &TypeRegistry<OT, O> {
        &self.registry
    }

    /// Registers a codec under `name` so it can be reached by
    /// [`CodecCore::encode_named`]/[`CodecCore::decode_named`] and by any
    /// [`TypeRegistry::forwarding_codec`] built against `name` beforehand.
    pub fn register_codec<T, C>(&self, name: impl Into<String>, codec: C)
    where
        T: Any + Send + Sync + 'static,
        C: Codec<T, OT, O> + Send + Sync + 'static,
    {
        self.registry.register_codec(name, codec);
    }

    pub fn register_type_proxy(&self, from: impl Into<String>, to: impl Into<String>) {
        self.registry.register_type_proxy(from, to);
    }

    pub fn encode_named<T: Any + 'static>(&self, name: &str, ops: &O, value: &T) -> DataResult<OT> {
        self.registry.encode(name, ops, value)
    }

    pub fn decode_named<T: Any + 'static>(&self, name: &str, ops: &O, value: &mut OT) -> DataResult<T> {
        self.registry.decode(name, ops, value)
    }

    /// A codec for `T` that defers the actual lookup to `name` in this
    /// core's registry — see [`TypeRegistry::forwarding_codec`].
    pub fn forwarding_codec<T: Any + 'static>(&self, name: impl Into<String>) -> impl Codec<T, OT, O> {
        self.registry.forwarding_codec(name)
    }
}

impl<OT: 'static, O: CodecOps<OT> + 'static> Default for CodecCore<OT, O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::json::{self, JsonOps};

    #[test]
    fn free_functions_round_trip() {
        let mut encoded = encode(&JsonOps, &i32::codec(), &5).unwrap();
        let decoded: i32 = decode(&JsonOps, &i32::codec(), &mut encoded).unwrap();
        assert_eq!(decoded, 5);
    }

    #[test]
    fn core_registers_and_resolves_named_codecs() {
        let core: CodecCore<json::JsonValue, JsonOps> = CodecCore::new();
        core.register_codec::<i32, _>("count", i32::codec());

        let mut encoded = core.encode_named("count", &JsonOps, &9i32).unwrap();
        let decoded: i32 = core.decode_named("count", &JsonOps, &mut encoded).unwrap();
        assert_eq!(decoded, 9);
    }

    #[test]
    fn core_clone_shares_the_same_registry() {
        let core: CodecCore<json::JsonValue, JsonOps> = CodecCore::new();
        let other = core.clone();
        other.register_codec::<i32, _>("shared", i32::codec());

        let mut encoded = core.encode_named("shared", &JsonOps, &1i32).unwrap();
        assert_eq!(core.decode_named::<i32>("shared", &JsonOps, &mut encoded).unwrap(), 1);
    }
}
