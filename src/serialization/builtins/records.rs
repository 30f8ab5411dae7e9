use std::marker::PhantomData;

use crate::{
    result::DataResult,
    serialization::{Codec, CodecOps},
};

/// A single required field of a record, produced by [`crate::serialization::CodecAdapters::field_of`].
/// [`MapCodecBuilder`] combines several of these (or [`OptionalField`]s) into
/// a codec for the whole struct.
pub struct RecordField<T, C: Codec<T, OT, O>, Struct, OT, O: CodecOps<OT>> {
    pub(crate) field_name: String,
    pub(crate) getter: fn(&Struct) -> &T,
    pub(crate) codec: C,
    pub(crate) _phantom: PhantomData<fn() -> (T, Struct, OT, O)>,
}

impl<T, C: Codec<T, OT, O>, Struct, OT, O: CodecOps<OT>> RecordField<T, C, Struct, OT, O> {
    pub(crate) fn encode_entry(&self, ops: &O, value: &Struct) -> DataResult<(String, OT)> {
        Ok((self.field_name.clone(), self.codec.encode(ops, (self.getter)(value))?))
    }

    pub(crate) fn decode_entry(
        &self,
        ops: &O,
        map: &mut impl crate::serialization::MapView<OT>,
    ) -> DataResult<T> {
        let field = map.get(&self.field_name)?;
        self.codec
            .decode(ops, field)
            .map_err(|e| e.with_path_segment(self.field_name.clone()))
    }
}

/// A single optional field of a record, produced by
/// [`crate::serialization::CodecAdapters::optional_field_of`]. Absent on
/// encode when the getter returns `None`; decodes to `None` when the key is
/// missing entirely, rather than failing.
pub struct OptionalField<T, C: Codec<T, OT, O>, Struct, OT, O: CodecOps<OT>> {
    pub(crate) field_name: String,
    pub(crate) getter: fn(&Struct) -> &Option<T>,
    pub(crate) codec: C,
    pub(crate) _phantom: PhantomData<fn() -> (T, Struct, OT, O)>,
}

impl<T, C: Codec<T, OT, O>, Struct, OT, O: CodecOps<OT>> OptionalField<T, C, Struct, OT, O> {
    pub(crate) fn encode_entry(&self, ops: &O, value: &Struct) -> DataResult<Option<(String, OT)>> {
        match (self.getter)(value) {
            Some(v) => Ok(Some((self.field_name.clone(), self.codec.encode(ops, v)?))),
            None => Ok(None),
        }
    }

    pub(crate) fn decode_entry(
        &self,
        ops: &O,
        map: &mut impl crate::serialization::MapView<OT>,
    ) -> DataResult<Option<T>> {
        match map.get(&self.field_name) {
            Ok(field) => self
                .codec
                .decode(ops, field)
                .map(Some)
                .map_err(|e| e.with_path_segment(self.field_name.clone())),
            Err(_) => Ok(None),
        }
    }
}

/// The codec for `()`: an empty map on the wire, nothing on the Rust side.
pub(crate) struct UnitCodec;

impl<OT, O: CodecOps<OT>> Codec<(), OT, O> for UnitCodec {
    fn encode(&self, ops: &O, _value: &()) -> DataResult<OT> {
        Ok(ops.create_unit())
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<()> {
        ops.get_unit(value)
    }
}
