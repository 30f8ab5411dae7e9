use std::marker::PhantomData;

use crate::{
    config::Config,
    result::{DataError, DataResult},
    serialization::{Codec, CodecOps, MapView},
};

use super::records::{OptionalField, RecordField};

/// Something that can contribute one entry (or, for an optional field, zero
/// or one entries) to a record's map representation, and can read its own
/// value back out of a decoded map. [`RecordField`] and [`OptionalField`]
/// are the only implementors; [`MapCodecBuilder`] is generic over this
/// trait purely so both field kinds can be mixed in the same builder chain.
pub trait FieldLike<Struct, OT, O: CodecOps<OT>> {
    type Value;

    fn encode_entry(&self, ops: &O, value: &Struct) -> DataResult<Option<(String, OT)>>;
    fn decode_entry<M: MapView<OT>>(&self, ops: &O, map: &mut M) -> DataResult<Self::Value>;
    /// The key this field claims in the record's map representation, used
    /// by strict decode (`fail_on_unknown_fields`) to tell a field the
    /// record doesn't recognize from one it does.
    fn field_name(&self) -> &str;
}

impl<T, C: Codec<T, OT, O>, Struct, OT, O: CodecOps<OT>> FieldLike<Struct, OT, O>
    for RecordField<T, C, Struct, OT, O>
{
    type Value = T;

    fn encode_entry(&self, ops: &O, value: &Struct) -> DataResult<Option<(String, OT)>> {
        self.encode_entry(ops, value).map(Some)
    }

    fn decode_entry<M: MapView<OT>>(&self, ops: &O, map: &mut M) -> DataResult<T> {
        self.decode_entry(ops, map)
    }

    fn field_name(&self) -> &str {
        &self.field_name
    }
}

impl<T, C: Codec<T, OT, O>, Struct, OT, O: CodecOps<OT>> FieldLike<Struct, OT, O>
    for OptionalField<T, C, Struct, OT, O>
{
    type Value = Option<T>;

    fn encode_entry(&self, ops: &O, value: &Struct) -> DataResult<Option<(String, OT)>> {
        self.encode_entry(ops, value)
    }

    fn decode_entry<M: MapView<OT>>(&self, ops: &O, map: &mut M) -> DataResult<Option<T>> {
        self.decode_entry(ops, map)
    }

    fn field_name(&self) -> &str {
        &self.field_name
    }
}

/// Rejects a decoded map under `fail_on_unknown_fields` if it carries any
/// key outside `known`. Skipped entirely when the config allows unknown
/// fields, so tolerant decoding never pays for a `keys()` call.
fn check_unknown_fields<T, M: MapView<T>>(map: &M, config: &Config, known: &[&str]) -> DataResult<()> {
    if !config.fail_on_unknown_fields {
        return Ok(());
    }
    for key in map.keys() {
        if !known.contains(&key.as_str()) {
            return Err(DataError::unknown_field(key));
        }
    }
    Ok(())
}

/// Entry point for assembling a record (struct) codec out of per-field
/// codecs, mirroring the shape of `.field(...).field(...).build(ctor)`
/// builders elsewhere in the ecosystem. Each `.field` call narrows the
/// builder to one more arity; `.build` takes a plain function pointer
/// constructor of exactly that arity.
///
/// Supports records of up to six fields. A struct with more fields than
/// that should be built out of nested records instead.
pub struct MapCodecBuilder;

impl MapCodecBuilder {
    pub fn new() -> MapCodecBuilder0 {
        MapCodecBuilder0
    }
}

pub struct MapCodecBuilder0;

impl MapCodecBuilder0 {
    pub fn field<F>(self, field: F) -> MapCodecBuilder1<F> {
        MapCodecBuilder1 { f1: field }
    }
}

pub struct MapCodecBuilder1<F1> {
    f1: F1,
}

impl<F1> MapCodecBuilder1<F1> {
    pub fn field<F2>(self, field: F2) -> MapCodecBuilder2<F1, F2> {
        MapCodecBuilder2 { f1: self.f1, f2: field }
    }

    pub fn build<Struct, OT, O, R>(self, ctor: R) -> impl Codec<Struct, OT, O>
    where
        O: CodecOps<OT>,
        F1: FieldLike<Struct, OT, O>,
        R: Fn(F1::Value) -> Struct,
    {
        self.build_with_config(ctor, Config::default())
    }

    pub fn build_with_config<Struct, OT, O, R>(self, ctor: R, config: Config) -> impl Codec<Struct, OT, O>
    where
        O: CodecOps<OT>,
        F1: FieldLike<Struct, OT, O>,
        R: Fn(F1::Value) -> Struct,
    {
        RecordCodec1 { f1: self.f1, ctor, config, _phantom: PhantomData }
    }
}

pub struct MapCodecBuilder2<F1, F2> {
    f1: F1,
    f2: F2,
}

impl<F1, F2> MapCodecBuilder2<F1, F2> {
    pub fn field<F3>(self, field: F3) -> MapCodecBuilder3<F1, F2, F3> {
        MapCodecBuilder3 { f1: self.f1, f2: self.f2, f3: field }
    }

    pub fn build<Struct, OT, O, R>(self, ctor: R) -> impl Codec<Struct, OT, O>
    where
        O: CodecOps<OT>,
        F1: FieldLike<Struct, OT, O>,
        F2: FieldLike<Struct, OT, O>,
        R: Fn(F1::Value, F2::Value) -> Struct,
    {
        self.build_with_config(ctor, Config::default())
    }

    pub fn build_with_config<Struct, OT, O, R>(self, ctor: R, config: Config) -> impl Codec<Struct, OT, O>
    where
        O: CodecOps<OT>,
        F1: FieldLike<Struct, OT, O>,
        F2: FieldLike<Struct, OT, O>,
        R: Fn(F1::Value, F2::Value) -> Struct,
    {
        RecordCodec2 { f1: self.f1, f2: self.f2, ctor, config, _phantom: PhantomData }
    }
}

pub struct MapCodecBuilder3<F1, F2, F3> {
    f1: F1,
    f2: F2,
    f3: F3,
}

impl<F1, F2, F3> MapCodecBuilder3<F1, F2, F3> {
    pub fn field<F4>(self, field: F4) -> MapCodecBuilder4<F1, F2, F3, F4> {
        MapCodecBuilder4 { f1: self.f1, f2: self.f2, f3: self.f3, f4: field }
    }

    pub fn build<Struct, OT, O, R>(self, ctor: R) -> impl Codec<Struct, OT, O>
    where
        O: CodecOps<OT>,
        F1: FieldLike<Struct, OT, O>,
        F2: FieldLike<Struct, OT, O>,
        F3: FieldLike<Struct, OT, O>,
        R: Fn(F1::Value, F2::Value, F3::Value) -> Struct,
    {
        self.build_with_config(ctor, Config::default())
    }

    pub fn build_with_config<Struct, OT, O, R>(self, ctor: R, config: Config) -> impl Codec<Struct, OT, O>
    where
        O: CodecOps<OT>,
        F1: FieldLike<Struct, OT, O>,
        F2: FieldLike<Struct, OT, O>,
        F3: FieldLike<Struct, OT, O>,
        R: Fn(F1::Value, F2::Value, F3::Value) -> Struct,
    {
        RecordCodec3 { f1: self.f1, f2: self.f2, f3: self.f3, ctor, config, _phantom: PhantomData }
    }
}

pub struct MapCodecBuilder4<F1, F2, F3, F4> {
    f1: F1,
    f2: F2,
    f3: F3,
    f4: F4,
}

impl<F1, F2, F3, F4> MapCodecBuilder4<F1, F2, F3, F4> {
    pub fn field<F5>(self, field: F5) -> MapCodecBuilder5<F1, F2, F3, F4, F5> {
        MapCodecBuilder5 { f1: self.f1, f2: self.f2, f3: self.f3, f4: self.f4, f5: field }
    }

    pub fn build<Struct, OT, O, R>(self, ctor: R) -> impl Codec<Struct, OT, O>
    where
        O: CodecOps<OT>,
        F1: FieldLike<Struct, OT, O>,
        F2: FieldLike<Struct, OT, O>,
        F3: FieldLike<Struct, OT, O>,
        F4: FieldLike<Struct, OT, O>,
        R: Fn(F1::Value, F2::Value, F3::Value, F4::Value) -> Struct,
    {
        self.build_with_config(ctor, Config::default())
    }

    pub fn build_with_config<Struct, OT, O, R>(self, ctor: R, config: Config) -> impl Codec<Struct, OT, O>
    where
        O: CodecOps<OT>,
        F1: FieldLike<Struct, OT, O>,
        F2: FieldLike<Struct, OT, O>,
        F3: FieldLike<Struct, OT, O>,
        F4: FieldLike<Struct, OT, O>,
        R: Fn(F1::Value, F2::Value, F3::Value, F4::Value) -> Struct,
    {
        RecordCodec4 { f1: self.f1, f2: self.f2, f3: self.f3, f4: self.f4, ctor, config, _phantom: PhantomData }
    }
}

pub struct MapCodecBuilder5<F1, F2, F3, F4, F5> {
    f1: F1,
    f2: F2,
    f3: F3,
    f4: F4,
    f5: F5,
}

impl<F1, F2, F3, F4, F5> MapCodecBuilder5<F1, F2, F3, F4, F5> {
    pub fn field<F6>(self, field: F6) -> MapCodecBuilder6<F1, F2, F3, F4, F5, F6> {
        MapCodecBuilder6 {
            f1: self.f1,
            f2: self.f2,
            f3: self.f3,
            f4: self.f4,
            f5: self.f5,
            f6: field,
        }
    }

    pub fn build<Struct, OT, O, R>(self, ctor: R) -> impl Codec<Struct, OT, O>
    where
        O: CodecOps<OT>,
        F1: FieldLike<Struct, OT, O>,
        F2: FieldLike<Struct, OT, O>,
        F3: FieldLike<Struct, OT, O>,
        F4: FieldLike<Struct, OT, O>,
        F5: FieldLike<Struct, OT, O>,
        R: Fn(F1::Value, F2::Value, F3::Value, F4::Value, F5::Value) -> Struct,
    {
        self.build_with_config(ctor, Config::default())
    }

    pub fn build_with_config<Struct, OT, O, R>(self, ctor: R, config: Config) -> impl Codec<Struct, OT, O>
    where
        O: CodecOps<OT>,
        F1: FieldLike<Struct, OT, O>,
        F2: FieldLike<Struct, OT, O>,
        F3: FieldLike<Struct, OT, O>,
        F4: FieldLike<Struct, OT, O>,
        F5: FieldLike<Struct, OT, O>,
        R: Fn(F1::Value, F2::Value, F3::Value, F4::Value, F5::Value) -> Struct,
    {
        RecordCodec5 {
            f1: self.f1,
            f2: self.f2,
            f3: self.f3,
            f4: self.f4,
            f5: self.f5,
            ctor,
            config,
            _phantom: PhantomData,
        }
    }
}

pub struct MapCodecBuilder6<F1, F2, F3, F4, F5, F6> {
    f1: F1,
    f2: F2,
    f3: F3,
    f4: F4,
    f5: F5,
    f6: F6,
}

impl<F1, F2, F3, F4, F5, F6> MapCodecBuilder6<F1, F2, F3, F4, F5, F6> {
    pub fn build<Struct, OT, O, R>(self, ctor: R) -> impl Codec<Struct, OT, O>
    where
        O: CodecOps<OT>,
        F1: FieldLike<Struct, OT, O>,
        F2: FieldLike<Struct, OT, O>,
        F3: FieldLike<Struct, OT, O>,
        F4: FieldLike<Struct, OT, O>,
        F5: FieldLike<Struct, OT, O>,
        F6: FieldLike<Struct, OT, O>,
        R: Fn(F1::Value, F2::Value, F3::Value, F4::Value, F5::Value, F6::Value) -> Struct,
    {
        self.build_with_config(ctor, Config::default())
    }

    pub fn build_with_config<Struct, OT, O, R>(self, ctor: R, config: Config) -> impl Codec<Struct, OT, O>
    where
        O: CodecOps<OT>,
        F1: FieldLike<Struct, OT, O>,
        F2: FieldLike<Struct, OT, O>,
        F3: FieldLike<Struct, OT, O>,
        F4: FieldLike<Struct, OT, O>,
        F5: FieldLike<Struct, OT, O>,
        F6: FieldLike<Struct, OT, O>,
        R: Fn(F1::Value, F2::Value, F3::Value, F4::Value, F5::Value, F6::Value) -> Struct,
    {
        RecordCodec6 {
            f1: self.f1,
            f2: self.f2,
            f3: self.f3,
            f4: self.f4,
            f5: self.f5,
            f6: self.f6,
            ctor,
            config,
            _phantom: PhantomData,
        }
    }
}

struct RecordCodec1<Struct, OT, O: CodecOps<OT>, F1: FieldLike<Struct, OT, O>, R: Fn(F1::Value) -> Struct> {
    f1: F1,
    ctor: R,
    config: Config,
    _phantom: PhantomData<fn() -> (Struct, OT, O)>,
}

impl<Struct, OT, O: CodecOps<OT>, F1: FieldLike<Struct, OT, O>, R: Fn(F1::Value) -> Struct>
    Codec<Struct, OT, O> for RecordCodec1<Struct, OT, O, F1, R>
{
    fn encode(&self, ops: &O, value: &Struct) -> DataResult<OT> {
        ops.create_map_special([self.f1.encode_entry(ops, value)?.map(Ok)])
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<Struct> {
        let mut map = ops.get_map(value)?;
        check_unknown_fields(&map, &self.config, &[self.f1.field_name()])?;
        Ok((self.ctor)(self.f1.decode_entry(ops, &mut map)?))
    }
}

struct RecordCodec2<
    Struct,
    OT,
    O: CodecOps<OT>,
    F1: FieldLike<Struct, OT, O>,
    F2: FieldLike<Struct, OT, O>,
    R: Fn(F1::Value, F2::Value) -> Struct,
> {
    f1: F1,
    f2: F2,
    ctor: R,
    config: Config,
    _phantom: PhantomData<fn() -> (Struct, OT, O)>,
}

impl<
    Struct,
    OT,
    O: CodecOps<OT>,
    F1: FieldLike<Struct, OT, O>,
    F2: FieldLike<Struct, OT, O>,
    R: Fn(F1::Value, F2::Value) -> Struct,
> Codec<Struct, OT, O> for RecordCodec2<Struct, OT, O, F1, F2, R>
{
    fn encode(&self, ops: &O, value: &Struct) -> DataResult<OT> {
        ops.create_map_special([
            self.f1.encode_entry(ops, value)?.map(Ok),
            self.f2.encode_entry(ops, value)?.map(Ok),
        ])
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<Struct> {
        let mut map = ops.get_map(value)?;
        check_unknown_fields(&map, &self.config, &[self.f1.field_name(), self.f2.field_name()])?;
        let v1 = self.f1.decode_entry(ops, &mut map)?;
        let v2 = self.f2.decode_entry(ops, &mut map)?;
        Ok((self.ctor)(v1, v2))
    }
}

struct RecordCodec3<
    Struct,
    OT,
    O: CodecOps<OT>,
    F1: FieldLike<Struct, OT, O>,
    F2: FieldLike<Struct, OT, O>,
    F3: FieldLike<Struct, OT, O>,
    R: Fn(F1::Value, F2::Value, F3::Value) -> Struct,
> {
    f1: F1,
    f2: F2,
    f3: F3,
    ctor: R,
    config: Config,
    _phantom: PhantomData<fn() -> (Struct, OT, O)>,
}

impl<
    Struct,
    OT,
    O: CodecOps<OT>,
    F1: FieldLike<Struct, OT, O>,
    F2: FieldLike<Struct, OT, O>,
    F3: FieldLike<Struct, OT, O>,
    R: Fn(F1::Value, F2::Value, F3::Value) -> Struct,
> Codec<Struct, OT, O> for RecordCodec3<Struct, OT, O, F1, F2, F3, R>
{
    fn encode(&self, ops: &O, value: &Struct) -> DataResult<OT> {
        ops.create_map_special([
            self.f1.encode_entry(ops, value)?.map(Ok),
            self.f2.encode_entry(ops, value)?.map(Ok),
            self.f3.encode_entry(ops, value)?.map(Ok),
        ])
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<Struct> {
        let mut map = ops.get_map(value)?;
        check_unknown_fields(
            &map,
            &self.config,
            &[self.f1.field_name(), self.f2.field_name(), self.f3.field_name()],
        )?;
        let v1 = self.f1.decode_entry(ops, &mut map)?;
        let v2 = self.f2.decode_entry(ops, &mut map)?;
        let v3 = self.f3.decode_entry(ops, &mut map)?;
        Ok((self.ctor)(v1, v2, v3))
    }
}

struct RecordCodec4<
    Struct,
    OT,
    O: CodecOps<OT>,
    F1: FieldLike<Struct, OT, O>,
    F2: FieldLike<Struct, OT, O>,
    F3: FieldLike<Struct, OT, O>,
    F4: FieldLike<Struct, OT, O>,
    R: Fn(F1::Value, F2::Value, F3::Value, F4::Value) -> Struct,
> {
    f1: F1,
    f2: F2,
    f3: F3,
    f4: F4,
    ctor: R,
    config: Config,
    _phantom: PhantomData<fn() -> (Struct, OT, O)>,
}

impl<
    Struct,
    OT,
    O: CodecOps<OT>,
    F1: FieldLike<Struct, OT, O>,
    F2: FieldLike<Struct, OT, O>,
    F3: FieldLike<Struct, OT, O>,
    F4: FieldLike<Struct, OT, O>,
    R: Fn(F1::Value, F2::Value, F3::Value, F4::Value) -> Struct,
> Codec<Struct, OT, O> for RecordCodec4<Struct, OT, O, F1, F2, F3, F4, R>
{
    fn encode(&self, ops: &O, value: &Struct) -> DataResult<OT> {
        ops.create_map_special([
            self.f1.encode_entry(ops, value)?.map(Ok),
            self.f2.encode_entry(ops, value)?.map(Ok),
            self.f3.encode_entry(ops, value)?.map(Ok),
            self.f4.encode_entry(ops, value)?.map(Ok),
        ])
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<Struct> {
        let mut map = ops.get_map(value)?;
        check_unknown_fields(
            &map,
            &self.config,
            &[
                self.f1.field_name(),
                self.f2.field_name(),
                self.f3.field_name(),
                self.f4.field_name(),
            ],
        )?;
        let v1 = self.f1.decode_entry(ops, &mut map)?;
        let v2 = self.f2.decode_entry(ops, &mut map)?;
        let v3 = self.f3.decode_entry(ops, &mut map)?;
        let v4 = self.f4.decode_entry(ops, &mut map)?;
        Ok((self.ctor)(v1, v2, v3, v4))
    }
}

struct RecordCodec5<
    Struct,
    OT,
    O: CodecOps<OT>,
    F1: FieldLike<Struct, OT, O>,
    F2: FieldLike<Struct, OT, O>,
    F3: FieldLike<Struct, OT, O>,
    F4: FieldLike<Struct, OT, O>,
    F5: FieldLike<Struct, OT, O>,
    R: Fn(F1::Value, F2::Value, F3::Value, F4::Value, F5::Value) -> Struct,
> {
    f1: F1,
    f2: F2,
    f3: F3,
    f4: F4,
    f5: F5,
    ctor: R,
    config: Config,
    _phantom: PhantomData<fn() -> (Struct, OT, O)>,
}

impl<
    Struct,
    OT,
    O: CodecOps<OT>,
    F1: FieldLike<Struct, OT, O>,
    F2: FieldLike<Struct, OT, O>,
    F3: FieldLike<Struct, OT, O>,
    F4: FieldLike<Struct, OT, O>,
    F5: FieldLike<Struct, OT, O>,
    R: Fn(F1::Value, F2::Value, F3::Value, F4::Value, F5::Value) -> Struct,
> Codec<Struct, OT, O> for RecordCodec5<Struct, OT, O, F1, F2, F3, F4, F5, R>
{
    fn encode(&self, ops: &O, value: &Struct) -> DataResult<OT> {
        ops.create_map_special([
            self.f1.encode_entry(ops, value)?.map(Ok),
            self.f2.encode_entry(ops, value)?.map(Ok),
            self.f3.encode_entry(ops, value)?.map(Ok),
            self.f4.encode_entry(ops, value)?.map(Ok),
            self.f5.encode_entry(ops, value)?.map(Ok),
        ])
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<Struct> {
        let mut map = ops.get_map(value)?;
        check_unknown_fields(
            &map,
            &self.config,
            &[
                self.f1.field_name(),
                self.f2.field_name(),
                self.f3.field_name(),
                self.f4.field_name(),
                self.f5.field_name(),
            ],
        )?;
        let v1 = self.f1.decode_entry(ops, &mut map)?;
        let v2 = self.f2.decode_entry(ops, &mut map)?;
        let v3 = self.f3.decode_entry(ops, &mut map)?;
        let v4 = self.f4.decode_entry(ops, &mut map)?;
        let v5 = self.f5.decode_entry(ops, &mut map)?;
        Ok((self.ctor)(v1, v2, v3, v4, v5))
    }
}

struct RecordCodec6<
    Struct,
    OT,
    O: CodecOps<OT>,
    F1: FieldLike<Struct, OT, O>,
    F2: FieldLike<Struct, OT, O>,
    F3: FieldLike<Struct, OT, O>,
    F4: FieldLike<Struct, OT, O>,
    F5: FieldLike<Struct, OT, O>,
    F6: FieldLike<Struct, OT, O>,
    R: Fn(F1::Value, F2::Value, F3::Value, F4::Value, F5::Value, F6::Value) -> Struct,
> {
    f1: F1,
    f2: F2,
    f3: F3,
    f4: F4,
    f5: F5,
    f6: F6,
    ctor: R,
    config: Config,
    _phantom: PhantomData<fn() -> (Struct, OT, O)>,
}

impl<
    Struct,
    OT,
    O: CodecOps<OT>,
    F1: FieldLike<Struct, OT, O>,
    F2: FieldLike<Struct, OT, O>,
    F3: FieldLike<Struct, OT, O>,
    F4: FieldLike<Struct, OT, O>,
    F5: FieldLike<Struct, OT, O>,
    F6: FieldLike<Struct, OT, O>,
    R: Fn(F1::Value, F2::Value, F3::Value, F4::Value, F5::Value, F6::Value) -> Struct,
> Codec<Struct, OT, O> for RecordCodec6<Struct, OT, O, F1, F2, F3, F4, F5, F6, R>
{
    fn encode(&self, ops: &O, value: &Struct) -> DataResult<OT> {
        ops.create_map_special([
            self.f1.encode_entry(ops, value)?.map(Ok),
            self.f2.encode_entry(ops, value)?.map(Ok),
            self.f3.encode_entry(ops, value)?.map(Ok),
            self.f4.encode_entry(ops, value)?.map(Ok),
            self.f5.encode_entry(ops, value)?.map(Ok),
            self.f6.encode_entry(ops, value)?.map(Ok),
        ])
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<Struct> {
        let mut map = ops.get_map(value)?;
        check_unknown_fields(
            &map,
            &self.config,
            &[
                self.f1.field_name(),
                self.f2.field_name(),
                self.f3.field_name(),
                self.f4.field_name(),
                self.f5.field_name(),
                self.f6.field_name(),
            ],
        )?;
        let v1 = self.f1.decode_entry(ops, &mut map)?;
        let v2 = self.f2.decode_entry(ops, &mut map)?;
        let v3 = self.f3.decode_entry(ops, &mut map)?;
        let v4 = self.f4.decode_entry(ops, &mut map)?;
        let v5 = self.f5.decode_entry(ops, &mut map)?;
        let v6 = self.f6.decode_entry(ops, &mut map)?;
        Ok((self.ctor)(v1, v2, v3, v4, v5, v6))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config,
        result::DataError,
        serialization::{json::JsonOps, Codec, CodecAdapters, CodecOps, DefaultCodec},
    };

    use super::MapCodecBuilder;

    #[derive(Debug, PartialEq, Clone)]
    struct Point {
        x: i32,
        y: i32,
        label: Option<String>,
    }

    #[test]
    fn three_field_record_round_trips() {
        let codec = MapCodecBuilder::new()
            .field(i32::codec().field_of("x", |p: &Point| &p.x))
            .field(i32::codec().field_of("y", |p: &Point| &p.y))
            .field(String::codec().optional_field_of("label", |p: &Point| &p.label))
            .build(|x, y, label| Point { x, y, label });

        let value = Point { x: 1, y: 2, label: Some("origin".to_string()) };
        let mut encoded = codec.encode(&JsonOps, &value).unwrap();
        let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn optional_field_omitted_when_absent() {
        let codec = MapCodecBuilder::new()
            .field(i32::codec().field_of("x", |p: &Point| &p.x))
            .field(i32::codec().field_of("y", |p: &Point| &p.y))
            .field(String::codec().optional_field_of("label", |p: &Point| &p.label))
            .build(|x, y, label| Point { x, y, label });

        let value = Point { x: 5, y: 6, label: None };
        let mut encoded = codec.encode(&JsonOps, &value).unwrap();
        let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn strict_mode_rejects_a_field_no_field_claimed() {
        let codec = MapCodecBuilder::new()
            .field(i32::codec().field_of("x", |p: &Point| &p.x))
            .field(i32::codec().field_of("y", |p: &Point| &p.y))
            .field(String::codec().optional_field_of("label", |p: &Point| &p.label))
            .build_with_config(
                |x, y, label| Point { x, y, label },
                Config::new().with_fail_on_unknown_fields(true),
            );

        let mut encoded = JsonOps.create_map([
            ("x".to_string(), JsonOps.create_number(&1.0)),
            ("y".to_string(), JsonOps.create_number(&2.0)),
            ("z".to_string(), JsonOps.create_number(&3.0)),
        ]);
        let err = codec.decode(&JsonOps, &mut encoded).unwrap_err();
        assert_eq!(err, DataError::unknown_field("z"));
    }

    #[test]
    fn strict_mode_accepts_an_object_with_only_known_fields() {
        let codec = MapCodecBuilder::new()
            .field(i32::codec().field_of("x", |p: &Point| &p.x))
            .field(i32::codec().field_of("y", |p: &Point| &p.y))
            .field(String::codec().optional_field_of("label", |p: &Point| &p.label))
            .build_with_config(
                |x, y, label| Point { x, y, label },
                Config::new().with_fail_on_unknown_fields(true),
            );

        let value = Point { x: 1, y: 2, label: None };
        let mut encoded = codec.encode(&JsonOps, &value).unwrap();
        let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();
        assert_eq!(value, decoded);
    }
}
