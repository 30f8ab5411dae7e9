use std::{
    collections::{HashMap, HashSet},
    fmt::Debug,
    hash::Hash,
    marker::PhantomData,
    ops::RangeBounds,
    sync::Arc,
};

use either::Either;

use crate::{
    result::{DataError, DataResult},
    serialization::{Codec, CodecAdapters, CodecOps, DefaultCodec, ListView, MapView},
};

pub(crate) struct F64Codec;

impl<OT, O: CodecOps<OT>> Codec<f64, OT, O> for F64Codec {
    fn encode(&self, ops: &O, value: &f64) -> DataResult<OT> {
        Ok(ops.create_number(value))
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<f64> {
        ops.get_number(value)
    }
}

impl<U, O: CodecOps<U>> DefaultCodec<U, O> for f64 {
    fn codec() -> impl Codec<Self, U, O> {
        F64Codec
    }
}

pub(crate) struct StringCodec;

impl<U, O: CodecOps<U>> Codec<String, U, O> for StringCodec {
    fn encode(&self, ops: &O, value: &String) -> DataResult<U> {
        Ok(ops.create_string(value))
    }

    fn decode(&self, ops: &O, value: &mut U) -> DataResult<String> {
        ops.get_string(value)
    }
}

impl<U, O: CodecOps<U>> DefaultCodec<U, O> for String {
    fn codec() -> impl Codec<Self, U, O> {
        StringCodec
    }
}

pub(crate) struct BoolCodec;

impl<U, O: CodecOps<U>> Codec<bool, U, O> for BoolCodec {
    fn encode(&self, ops: &O, value: &bool) -> DataResult<U> {
        Ok(ops.create_boolean(value))
    }

    fn decode(&self, ops: &O, value: &mut U) -> DataResult<bool> {
        ops.get_boolean(value)
    }
}

impl<U, O: CodecOps<U>> DefaultCodec<U, O> for bool {
    fn codec() -> impl Codec<Self, U, O> {
        BoolCodec
    }
}

/// Encodes `char` as a one-code-unit string; decode fails with
/// [`DataError::MalformedScalar`] if the string's length isn't exactly one
/// character (§4.C).
pub(crate) struct CharCodec;

impl<U, O: CodecOps<U>> Codec<char, U, O> for CharCodec {
    fn encode(&self, ops: &O, value: &char) -> DataResult<U> {
        let mut buf = [0u8; 4];
        Ok(ops.create_string(value.encode_utf8(&mut buf)))
    }

    fn decode(&self, ops: &O, value: &mut U) -> DataResult<char> {
        let s = ops.get_string(value)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(DataError::malformed_scalar(format!(
                "expected a single character, found {s:?}"
            ))),
        }
    }
}

impl<U, O: CodecOps<U>> DefaultCodec<U, O> for char {
    fn codec() -> impl Codec<Self, U, O> {
        CharCodec
    }
}

pub(crate) trait F64Convertable
where
    Self: Sized + Copy,
{
    fn into_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_f64_convertable {
    ($($t:ty),*) => {
        $(
            impl F64Convertable for $t {
                fn into_f64(self) -> f64 {
                    self as f64
                }

                fn from_f64(value: f64) -> Self {
                    value as $t
                }
            }

            impl<U, O: CodecOps<U>> DefaultCodec<U, O> for $t {
                fn codec() -> impl Codec<Self, U, O> {
                    NumberCodec {
                        _phantom: PhantomData,
                    }
                }
            }
        )*
    };
}

impl_f64_convertable! { i8, i16, i32, i64, u8, u16, u32, u64, f32, usize, isize }

pub(crate) struct NumberCodec<N: F64Convertable, U, O: CodecOps<U>> {
    pub(crate) _phantom: PhantomData<fn() -> (N, U, O)>,
}

impl<U, O: CodecOps<U>, N: F64Convertable> Codec<N, U, O> for NumberCodec<N, U, O> {
    fn encode(&self, ops: &O, value: &N) -> DataResult<U> {
        Ok(ops.create_number(&value.into_f64()))
    }

    fn decode(&self, ops: &O, value: &mut U) -> DataResult<N> {
        Ok(N::from_f64(ops.get_number(value)?))
    }
}

pub(crate) struct ListCodec<T, C: Codec<T, U, O>, U, O: CodecOps<U>> {
    pub(crate) inner: C,
    pub(crate) _phantom: PhantomData<fn() -> (T, U, O)>,
}

impl<T, C: Codec<T, U, O>, U, O: CodecOps<U>> Codec<Vec<T>, U, O> for ListCodec<T, C, U, O> {
    fn encode(&self, ops: &O, value: &Vec<T>) -> DataResult<U> {
        let mut list = Vec::new();
        for element in value {
            list.push(self.inner.encode(ops, element)?);
        }
        Ok(ops.create_list(list))
    }

    fn decode(&self, ops: &O, value: &mut U) -> DataResult<Vec<T>> {
        let list = ops.get_list(value)?;
        let mut vec = Vec::new();
        for mut item in list.into_iter() {
            vec.push(self.inner.decode(ops, &mut item)?);
        }
        Ok(vec)
    }
}

/// Same wire shape as [`ListCodec`] (an array of the element codec); decodes
/// into an unordered [`HashSet`] instead of a [`Vec`], for the "collection"
/// shape family beyond ordered lists (§4.D).
pub(crate) struct SetCodec<T, C: Codec<T, U, O>, U, O: CodecOps<U>> {
    pub(crate) inner: C,
    pub(crate) _phantom: PhantomData<fn() -> (T, U, O)>,
}

impl<T: Hash + Eq, C: Codec<T, U, O>, U, O: CodecOps<U>> Codec<HashSet<T>, U, O>
    for SetCodec<T, C, U, O>
{
    fn encode(&self, ops: &O, value: &HashSet<T>) -> DataResult<U> {
        let mut list = Vec::new();
        for element in value {
            list.push(self.inner.encode(ops, element)?);
        }
        Ok(ops.create_list(list))
    }

    fn decode(&self, ops: &O, value: &mut U) -> DataResult<HashSet<T>> {
        let list = ops.get_list(value)?;
        let mut set = HashSet::new();
        for mut item in list.into_iter() {
            set.insert(self.inner.decode(ops, &mut item)?);
        }
        Ok(set)
    }
}

/// The "object" realisation of a map: keys are written directly as field
/// names, so this only works for `HashMap<String, V>` (§4.D).
pub(crate) struct StringMapCodec<V, C: Codec<V, OT, O>, OT, O: CodecOps<OT>> {
    pub(crate) value_codec: C,
    pub(crate) _phantom: PhantomData<fn() -> (V, OT, O)>,
}

impl<V, C: Codec<V, OT, O>, OT, O: CodecOps<OT>> Codec<HashMap<String, V>, OT, O>
    for StringMapCodec<V, C, OT, O>
{
    fn encode(&self, ops: &O, value: &HashMap<String, V>) -> DataResult<OT> {
        let mut entries = Vec::new();
        for (k, v) in value {
            entries.push((k.clone(), self.value_codec.encode(ops, v)?));
        }
        Ok(ops.create_map(entries))
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<HashMap<String, V>> {
        let mut map = ops.get_map(value)?;
        let mut result = HashMap::new();
        for key in map.keys() {
            let entry = map.get(&key)?;
            let decoded = self
                .value_codec
                .decode(ops, entry)
                .map_err(|e| e.with_path_segment(key.clone()))?;
            result.insert(key, decoded);
        }
        Ok(result)
    }
}

/// The "array of pairs" realisation of a map, for keys that aren't
/// themselves strings: `[{keyFieldName: K, valueFieldName: V}, …]` (§4.D).
pub(crate) struct MapCodec<K, V, Kc: Codec<K, OT, O>, Vc: Codec<V, OT, O>, OT, O: CodecOps<OT>> {
    pub(crate) key_codec: Kc,
    pub(crate) value_codec: Vc,
    pub(crate) key_field_name: String,
    pub(crate) value_field_name: String,
    pub(crate) _phantom: PhantomData<fn() -> (K, V, OT, O)>,
}

impl<K: Eq + Hash, V, Kc: Codec<K, OT, O>, Vc: Codec<V, OT, O>, OT, O: CodecOps<OT>>
    Codec<HashMap<K, V>, OT, O> for MapCodec<K, V, Kc, Vc, OT, O>
{
    fn encode(&self, ops: &O, value: &HashMap<K, V>) -> DataResult<OT> {
        let mut list = Vec::new();
        for (k, v) in value {
            list.push(ops.create_map([
                (self.key_field_name.clone(), self.key_codec.encode(ops, k)?),
                (self.value_field_name.clone(), self.value_codec.encode(ops, v)?),
            ]));
        }
        Ok(ops.create_list(list))
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<HashMap<K, V>> {
        let list = ops.get_list(value)?;
        let mut result = HashMap::new();
        for mut entry in list.into_iter() {
            let mut obj = ops.get_map(&mut entry)?;
            let key_slot = obj.get(&self.key_field_name)?;
            let key = self.key_codec.decode(ops, key_slot)?;
            let value_slot = obj.get(&self.value_field_name)?;
            let val = self.value_codec.decode(ops, value_slot)?;
            result.insert(key, val);
        }
        Ok(result)
    }
}

/// A codec for `Option<T>` that tolerates and produces the format's null
/// representation, per §3's "nullable codecs for reference-typed values".
/// This is distinct from [`crate::serialization::builtins::records::OptionalField`],
/// which omits the field from the enclosing object entirely rather than
/// writing an explicit null.
pub(crate) struct NullableCodec<T, C: Codec<T, U, O>, U, O: CodecOps<U>> {
    pub(crate) inner: C,
    pub(crate) _phantom: PhantomData<fn() -> (T, U, O)>,
}

impl<T, C: Codec<T, U, O>, U, O: CodecOps<U>> Codec<Option<T>, U, O>
    for NullableCodec<T, C, U, O>
{
    fn encode(&self, ops: &O, value: &Option<T>) -> DataResult<U> {
        match value {
            Some(v) => self.inner.encode(ops, v),
            None => Ok(ops.create_null()),
        }
    }

    fn decode(&self, ops: &O, value: &mut U) -> DataResult<Option<T>> {
        if ops.is_null(value) {
            Ok(None)
        } else {
            Ok(Some(self.inner.decode(ops, value)?))
        }
    }
}

pub(crate) struct XMapCodec<OLT, NT, C, F1, F2, U, O: CodecOps<U>>
where
    C: Codec<OLT, U, O>,
    F1: Fn(&OLT) -> NT,
    F2: Fn(&NT) -> OLT,
{
    pub(crate) inner: C,
    pub(crate) f1: F1,
    pub(crate) f2: F2,
    pub(crate) _phantom: PhantomData<fn() -> (OLT, NT, U, O)>,
}

impl<OLT, NT, C, F1, F2, OT, O: CodecOps<OT>> Codec<NT, OT, O>
    for XMapCodec<OLT, NT, C, F1, F2, OT, O>
where
    C: Codec<OLT, OT, O>,
    F1: Fn(&OLT) -> NT,
    F2: Fn(&NT) -> OLT,
{
    fn encode(&self, ops: &O, value: &NT) -> DataResult<OT> {
        self.inner.encode(ops, &(self.f2)(value))
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<NT> {
        Ok((self.f1)(&self.inner.decode(ops, value)?))
    }
}

pub(crate) struct PairCodec<L, R, Lc: Codec<L, OT, O>, Rc: Codec<R, OT, O>, OT, O: CodecOps<OT>> {
    pub(crate) left: Lc,
    pub(crate) right: Rc,
    pub(crate) _phantom: PhantomData<fn() -> (L, R, OT, O)>,
}
impl<L, R, Lc: Codec<L, OT, O>, Rc: Codec<R, OT, O>, OT, O: CodecOps<OT>> Codec<(L, R), OT, O>
    for PairCodec<L, R, Lc, Rc, OT, O>
{
    fn encode(&self, ops: &O, value: &(L, R)) -> DataResult<OT> {
        Ok(ops.create_map([
            ("left".to_string(), self.left.encode(ops, &value.0)?),
            ("right".to_string(), self.right.encode(ops, &value.1)?),
        ]))
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<(L, R)> {
        let mut obj = ops.get_map(value)?;
        let left = obj.get("left")?;
        let p1 = self.left.decode(ops, left)?;
        let right = obj.get("right")?;
        let p2 = self.right.decode(ops, right)?;
        Ok((p1, p2))
    }
}

pub(crate) struct BoundedCodec<
    T: PartialOrd + Debug,
    C: Codec<T, OT, O>,
    R: RangeBounds<T>,
    OT,
    O: CodecOps<OT>,
> {
    pub(crate) codec: C,
    pub(crate) range: R,
    pub(crate) _phantom: PhantomData<fn() -> (T, OT, O)>,
}

impl<T: PartialOrd + Debug, C: Codec<T, OT, O>, R: RangeBounds<T>, OT, O: CodecOps<OT>>
    Codec<T, OT, O> for BoundedCodec<T, C, R, OT, O>
{
    fn encode(&self, ops: &O, value: &T) -> DataResult<OT> {
        if !self.range.contains(value) {
            Err(DataError::new_custom(format!(
                "value must be in bounds of {:?} to {:?}",
                self.range.start_bound(),
                self.range.end_bound()
            )))
        } else {
            self.codec.encode(ops, value)
        }
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<T> {
        let decoded = self.codec.decode(ops, value)?;
        if self.range.contains(&decoded) {
            Ok(decoded)
        } else {
            Err(DataError::new_custom(format!(
                "value must be in bounds of {:?} to {:?}",
                self.range.start_bound(),
                self.range.end_bound()
            )))
        }
    }
}

/// Encodes and decodes through a caller-supplied pair of functions instead
/// of a `Codec` impl — the building block [`crate::serialization::Codecs::recursive`]
/// uses to break a cycle before the real codec exists yet.
pub(crate) struct FnCodec<T, OT, O: CodecOps<OT>> {
    #[allow(clippy::type_complexity)]
    pub(crate) encode: Box<dyn Fn(&O, &T) -> DataResult<OT>>,
    #[allow(clippy::type_complexity)]
    pub(crate) decode: Box<dyn Fn(&O, &mut OT) -> DataResult<T>>,
}

impl<T, OT, O: CodecOps<OT>> Codec<T, OT, O> for FnCodec<T, OT, O> {
    fn encode(&self, ops: &O, value: &T) -> DataResult<OT> {
        (self.encode)(ops, value)
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<T> {
        (self.decode)(ops, value)
    }
}

pub struct DynamicCodec<T, OT, O: CodecOps<OT>> {
    pub(crate) codec: Box<dyn Codec<T, OT, O>>,
}

impl<T, OT, O: CodecOps<OT>> Codec<T, OT, O> for DynamicCodec<T, OT, O> {
    fn encode(&self, ops: &O, value: &T) -> DataResult<OT> {
        self.codec.as_ref().encode(ops, value)
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<T> {
        self.codec.as_ref().decode(ops, value)
    }
}

pub struct ArcCodec<T, OT, O: CodecOps<OT>> {
    pub(crate) codec: Arc<dyn Codec<T, OT, O>>,
}

impl<T, OT, O: CodecOps<OT>> Clone for ArcCodec<T, OT, O> {
    fn clone(&self) -> Self {
        ArcCodec {
            codec: self.codec.clone(),
        }
    }
}

impl<T, OT, O: CodecOps<OT>> Codec<T, OT, O> for ArcCodec<T, OT, O> {
    fn encode(&self, ops: &O, value: &T) -> DataResult<OT> {
        self.codec.as_ref().encode(ops, value)
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<T> {
        self.codec.as_ref().decode(ops, value)
    }
}

/// Wraps the value being serialized or deserialized in a [`Box`], so the
/// outer codec can be stored without knowing `T`'s size (needed for
/// self-referential types such as a linked list's `next` field).
pub struct BoxCodec<T, OT, O: CodecOps<OT>, C: Codec<T, OT, O>> {
    pub(crate) inner: C,
    pub(crate) _phantom: PhantomData<fn() -> (T, OT, O)>,
}

impl<T, OT, O: CodecOps<OT>, C: Codec<T, OT, O>> Codec<Box<T>, OT, O> for BoxCodec<T, OT, O, C> {
    fn encode(&self, ops: &O, value: &Box<T>) -> DataResult<OT> {
        self.inner.encode(ops, value)
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<Box<T>> {
        Ok(Box::new(self.inner.decode(ops, value)?))
    }
}

/// Encodes/decodes an [`Either`] by trying the left codec, then the right.
pub(crate) struct EitherCodec<T, T2, Lc: Codec<T, OT, O>, Rc: Codec<T2, OT, O>, OT, O: CodecOps<OT>>
{
    pub(crate) lc: Lc,
    pub(crate) rc: Rc,
    pub(crate) _phantom: PhantomData<fn() -> (T, T2, OT, O)>,
}

impl<T, T2, Lc: Codec<T, OT, O>, Rc: Codec<T2, OT, O>, OT: Clone, O: CodecOps<OT>>
    Codec<Either<T, T2>, OT, O> for EitherCodec<T, T2, Lc, Rc, OT, O>
{
    fn encode(&self, ops: &O, value: &Either<T, T2>) -> DataResult<OT> {
        match value {
            Either::Left(v) => self.lc.encode(ops, v),
            Either::Right(v) => self.rc.encode(ops, v),
        }
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<Either<T, T2>> {
        let mut attempt = value.clone();
        match self.lc.decode(ops, &mut attempt) {
            Ok(v) => Ok(Either::Left(v)),
            Err(_) => Ok(Either::Right(self.rc.decode(ops, value)?)),
        }
    }
}

/// Falls back to `rc` if `lc` fails to encode or decode.
pub(crate) struct TryElseCodec<T, Lc: Codec<T, OT, O>, Rc: Codec<T, OT, O>, OT, O: CodecOps<OT>> {
    pub(crate) lc: Lc,
    pub(crate) rc: Rc,
    pub(crate) _phantom: PhantomData<fn() -> (T, OT, O)>,
}

impl<T, Lc: Codec<T, OT, O>, Rc: Codec<T, OT, O>, OT: Clone, O: CodecOps<OT>> Codec<T, OT, O>
    for TryElseCodec<T, Lc, Rc, OT, O>
{
    fn encode(&self, ops: &O, value: &T) -> DataResult<OT> {
        self.lc.encode(ops, value).or_else(|_| self.rc.encode(ops, value))
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<T> {
        let mut attempt = value.clone();
        match self.lc.decode(ops, &mut attempt) {
            Ok(v) => Ok(v),
            Err(_) => self.rc.decode(ops, value),
        }
    }
}

/// If decoding fails, falls back to a caller-supplied default value.
pub(crate) struct OrElseCodec<T, C: Codec<T, OT, O>, F: Fn() -> T, OT, O: CodecOps<OT>> {
    pub(crate) codec: C,
    pub(crate) default: F,
    pub(crate) _phantom: PhantomData<fn() -> (T, OT, O)>,
}

impl<T, C: Codec<T, OT, O>, F: Fn() -> T, OT, O: CodecOps<OT>> Codec<T, OT, O>
    for OrElseCodec<T, C, F, OT, O>
{
    fn encode(&self, ops: &O, value: &T) -> DataResult<OT> {
        self.codec.encode(ops, value)
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<T> {
        match self.codec.decode(ops, value) {
            Ok(v) => Ok(v),
            Err(_) => Ok((self.default)()),
        }
    }
}

/// Picks a codec at encode/decode time based on the value or the wire
/// value, the low-level primitive the dynamic-type dispatcher
/// ([`crate::serialization::dispatch`]) is built on top of.
pub(crate) struct DispatchCodec<
    T,
    OT,
    O: CodecOps<OT>,
    E: Fn(&T) -> DataResult<DynamicCodec<T, OT, O>>,
    F: Fn(&O, &OT) -> DataResult<DynamicCodec<T, OT, O>>,
> {
    pub(crate) from_type_to_codec: E,
    pub(crate) from_ops_to_codec: F,
    pub(crate) _phantom: PhantomData<fn() -> (T, OT, O)>,
}

impl<
    T,
    OT,
    O: CodecOps<OT>,
    E: Fn(&T) -> DataResult<DynamicCodec<T, OT, O>>,
    F: Fn(&O, &OT) -> DataResult<DynamicCodec<T, OT, O>>,
> Codec<T, OT, O> for DispatchCodec<T, OT, O, E, F>
{
    fn encode(&self, ops: &O, value: &T) -> DataResult<OT> {
        (self.from_type_to_codec)(value)?.encode(ops, value)
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<T> {
        (self.from_ops_to_codec)(ops, value)?.decode(ops, value)
    }
}

/// Sugar for a codec that round-trips through a string representation
/// (`registerStringProxyCodec`), built via [`crate::serialization::Codecs::string_proxy`].
pub(crate) struct StringProxyCodec<T, F1: Fn(&T) -> String, F2: Fn(&str) -> DataResult<T>, OT, O: CodecOps<OT>> {
    pub(crate) to_string: F1,
    pub(crate) from_string: F2,
    pub(crate) _phantom: PhantomData<fn() -> (T, OT, O)>,
}

impl<T, F1: Fn(&T) -> String, F2: Fn(&str) -> DataResult<T>, OT, O: CodecOps<OT>> Codec<T, OT, O>
    for StringProxyCodec<T, F1, F2, OT, O>
{
    fn encode(&self, ops: &O, value: &T) -> DataResult<OT> {
        Ok(ops.create_string(&(self.to_string)(value)))
    }

    fn decode(&self, ops: &O, value: &mut OT) -> DataResult<T> {
        let s = ops.get_string(value)?;
        (self.from_string)(&s)
    }
}

#[cfg(test)]
mod tests {
    use crate::serialization::{Codec, CodecAdapters, DefaultCodec, json::JsonOps};

    #[test]
    fn f64_codec() {
        let value = 10.0;
        let mut encoded = f64::codec().encode(&JsonOps, &value).unwrap();
        let decoded = f64::codec().decode(&JsonOps, &mut encoded).unwrap();

        assert_eq!(value, decoded);
    }

    #[test]
    fn string_codec() {
        let value = "Hello!".to_string();
        let mut encoded = String::codec().encode(&JsonOps, &value).unwrap();
        let decoded = String::codec().decode(&JsonOps, &mut encoded).unwrap();

        assert_eq!(value, decoded);
    }

    #[test]
    fn bool_codec() {
        let value = true;
        let mut encoded = bool::codec().encode(&JsonOps, &value).unwrap();
        let decoded = bool::codec().decode(&JsonOps, &mut encoded).unwrap();

        assert_eq!(value, decoded);
    }

    #[test]
    fn char_codec_round_trips() {
        let value = 'x';
        let mut encoded = char::codec().encode(&JsonOps, &value).unwrap();
        let decoded = char::codec().decode(&JsonOps, &mut encoded).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn char_codec_rejects_multi_character_strings() {
        let mut encoded = String::codec().encode(&JsonOps, &"ab".to_string()).unwrap();
        assert!(char::codec().decode(&JsonOps, &mut encoded).is_err());
    }

    #[test]
    fn numeric_codec() {
        let value = 10;
        let mut encoded = i32::codec().encode(&JsonOps, &value).unwrap();
        let decoded = i32::codec().decode(&JsonOps, &mut encoded).unwrap();

        assert_eq!(value, decoded);

        let value = 10;
        let mut encoded = i64::codec().encode(&JsonOps, &value).unwrap();
        let decoded = i64::codec().decode(&JsonOps, &mut encoded).unwrap();

        assert_eq!(value, decoded);
    }

    #[test]
    fn list_codec() {
        let value = vec![10, 20, 30];
        let mut encoded = i32::codec().list_of().encode(&JsonOps, &value).unwrap();
        let decoded = i32::codec()
            .list_of()
            .decode(&JsonOps, &mut encoded)
            .unwrap();

        assert_eq!(value, decoded);
    }

    #[test]
    fn set_codec() {
        let value: std::collections::HashSet<i32> = [10, 20, 30].into_iter().collect();
        let mut encoded = i32::codec().set_of().encode(&JsonOps, &value).unwrap();
        let decoded = i32::codec().set_of().decode(&JsonOps, &mut encoded).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn xmap_codec() {
        let value = 15;
        let codec = i32::codec().xmap(|x| x * 5, |x| x / 5);
        let mut encoded = codec.encode(&JsonOps, &value).unwrap();
        let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();

        assert_eq!(value, decoded);
    }

    #[test]
    fn pair_codec() {
        let value = (15, "Hello".to_string());
        let codec = i32::codec().pair(String::codec());
        let mut encoded = codec.encode(&JsonOps, &value).unwrap();
        let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();

        assert_eq!(value, decoded);
    }

    #[test]
    fn bounded_codec() {
        let value = 15;
        let codec = i32::codec().bounded(1..30);
        let mut encoded = codec.encode(&JsonOps, &value).unwrap();
        let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();

        assert_eq!(value, decoded);

        assert!(codec.encode(&JsonOps, &75).is_err());
        assert!(codec.encode(&JsonOps, &1).is_ok());
        assert!(codec.encode(&JsonOps, &30).is_err());
    }

    #[test]
    fn dynamic_codec() {
        let value = 10.0;
        let mut encoded = f64::codec().dynamic().encode(&JsonOps, &value).unwrap();
        let decoded = f64::codec()
            .dynamic()
            .decode(&JsonOps, &mut encoded)
            .unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn arc_codec() {
        let value = 10.0;
        let mut encoded = f64::codec().arc().encode(&JsonOps, &value).unwrap();
        let decoded = f64::codec()
            .dynamic()
            .decode(&JsonOps, &mut encoded)
            .unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn either_codec() {
        use crate::serialization::Codecs;
        use either::Either;

        let codec = Codecs::either(i32::codec(), String::codec());
        let value: Either<i32, String> = Either::Left(5);
        let mut encoded = codec.encode(&JsonOps, &value).unwrap();
        let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();
        assert_eq!(value, decoded);

        let value: Either<i32, String> = Either::Right("hi".to_string());
        let mut encoded = codec.encode(&JsonOps, &value).unwrap();
        let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn try_else_codec() {
        let codec = i32::codec()
            .bounded(0..10)
            .try_else(i32::codec().bounded(100..200));
        let mut encoded = i32::codec().encode(&JsonOps, &150).unwrap();
        let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();
        assert_eq!(decoded, 150);
    }

    #[test]
    fn or_else_codec() {
        let codec = i32::codec().bounded(0..10).or_else(|| -1);
        let mut encoded = i32::codec().encode(&JsonOps, &150).unwrap();
        let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();
        assert_eq!(decoded, -1);
    }

    #[test]
    fn string_proxy_codec() {
        use crate::serialization::Codecs;

        let codec: _ = Codecs::string_proxy::<u32, _, JsonOps>(
            |v: &u32| v.to_string(),
            |s: &str| {
                s.parse::<u32>()
                    .map_err(|e| crate::result::DataError::malformed_scalar(e.to_string()))
            },
        );
        let mut encoded = codec.encode(&JsonOps, &42).unwrap();
        let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();
        assert_eq!(decoded, 42);
    }
}
