//! MessagePack DOM realisation of the format adapter contract, backed by
//! `rmpv::Value`. A value-tree realisation like [`super::json`] — `rmpv`
//! already hands back a parsed tree, so there's no push/pull surface to
//! write here. [`encode_bytes`]/[`decode_bytes`] round-trip a [`Value`]
//! through real MessagePack bytes via `rmpv::encode`/`rmpv::decode`.

use rmpv::Value;

use crate::{
    result::{DataError, DataResult},
    serialization::{CodecOps, ListView, MapView},
};

#[derive(Clone, Copy, Debug, Default)]
pub struct MsgPackOps;

impl CodecOps<Value> for MsgPackOps {
    fn create_number(&self, value: &f64) -> Value {
        Value::from(*value)
    }

    fn create_string(&self, value: &str) -> Value {
        Value::from(value)
    }

    fn create_boolean(&self, value: &bool) -> Value {
        Value::from(*value)
    }

    fn create_list(&self, value: impl IntoIterator<Item = Value>) -> Value {
        Value::Array(value.into_iter().collect())
    }

    fn create_map(&self, pairs: impl IntoIterator<Item = (String, Value)>) -> Value {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (Value::from(k), v))
                .collect(),
        )
    }

    fn create_unit(&self) -> Value {
        Value::Map(Vec::new())
    }

    fn create_null(&self) -> Value {
        Value::Nil
    }

    fn get_number(&self, value: &Value) -> DataResult<f64> {
        value
            .as_f64()
            .ok_or_else(|| DataError::wrong_shape("number", shape_name(value)))
    }

    fn get_string(&self, value: &Value) -> DataResult<String> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DataError::wrong_shape("string", shape_name(value)))
    }

    fn get_boolean(&self, value: &Value) -> DataResult<bool> {
        value
            .as_bool()
            .ok_or_else(|| DataError::wrong_shape("boolean", shape_name(value)))
    }

    fn get_list(&self, value: &mut Value) -> DataResult<impl ListView<Value>> {
        match value {
            Value::Array(_) => Ok(MsgPackListView { value }),
            other => Err(DataError::wrong_shape("array", shape_name(other))),
        }
    }

    fn get_map(&self, value: &mut Value) -> DataResult<impl MapView<Value>> {
        match value {
            Value::Map(_) => Ok(MsgPackMapView { value }),
            other => Err(DataError::wrong_shape("object", shape_name(other))),
        }
    }

    fn get_unit(&self, value: &Value) -> DataResult<()> {
        match value {
            Value::Map(m) if m.is_empty() => Ok(()),
            other => Err(DataError::wrong_shape("unit", shape_name(other))),
        }
    }

    fn is_null(&self, value: &Value) -> bool {
        value.is_nil()
    }
}

/// Serialises a [`Value`] to real MessagePack bytes, the compact byte
/// framing `rmpv` exists for. [`CodecOps`] above only builds and reads the
/// in-memory tree; this is the wire-level half of the dual realisation.
pub fn encode_bytes(value: &Value) -> DataResult<Vec<u8>> {
    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, value).map_err(|e| DataError::new_custom(e.to_string()))?;
    Ok(buf)
}

/// Parses MessagePack bytes back into a [`Value`] tree.
pub fn decode_bytes(bytes: &[u8]) -> DataResult<Value> {
    let mut cursor = std::io::Cursor::new(bytes);
    rmpv::decode::read_value(&mut cursor).map_err(|e| DataError::new_custom(e.to_string()))
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Nil => "null",
        Value::Boolean(_) => "boolean",
        Value::Integer(_) | Value::F32(_) | Value::F64(_) => "number",
        Value::String(_) => "string",
        Value::Binary(_) => "binary",
        Value::Array(_) => "array",
        Value::Map(_) => "object",
        Value::Ext(..) => "extension",
    }
}

struct MsgPackListView<'a> {
    value: &'a mut Value,
}

impl<'a> ListView<Value> for MsgPackListView<'a> {
    fn append(&mut self, value: Value) {
        if let Value::Array(v) = self.value {
            v.push(value);
        }
    }

    fn get(&mut self, index: usize) -> DataResult<&mut Value> {
        let Value::Array(v) = self.value else {
            unreachable!("constructed only for Array values")
        };
        let len = v.len();
        v.get_mut(index)
            .ok_or_else(|| DataError::list_index_out_of_bounds(index, len))
    }

    fn len(&self) -> usize {
        match self.value {
            Value::Array(v) => v.len(),
            _ => 0,
        }
    }

    fn into_iter(self) -> impl Iterator<Item = Value> {
        match self.value {
            Value::Array(v) => std::mem::take(v).into_iter(),
            _ => Vec::new().into_iter(),
        }
    }
}

struct MsgPackMapView<'a> {
    value: &'a mut Value,
}

impl<'a> MsgPackMapView<'a> {
    fn position(entries: &[(Value, Value)], name: &str) -> Option<usize> {
        entries.iter().position(|(k, _)| k.as_str() == Some(name))
    }
}

impl<'a> MapView<Value> for MsgPackMapView<'a> {
    fn get(&mut self, name: &str) -> DataResult<&mut Value> {
        let Value::Map(entries) = self.value else {
            unreachable!("constructed only for Map values")
        };
        let index =
            Self::position(entries, name).ok_or_else(|| DataError::key_not_found(name))?;
        Ok(&mut entries[index].1)
    }

    fn set(&mut self, name: &str, value: Value) {
        let Value::Map(entries) = self.value else {
            return;
        };
        if let Some(index) = Self::position(entries, name) {
            entries[index].1 = value;
        } else {
            entries.push((Value::from(name), value));
        }
    }

    fn remove(&mut self, key: &str) -> DataResult<Value> {
        let Value::Map(entries) = self.value else {
            unreachable!("constructed only for Map values")
        };
        let index = Self::position(entries, key).ok_or_else(|| DataError::key_not_found(key))?;
        Ok(entries.remove(index).1)
    }

    fn keys(&self) -> Vec<String> {
        match self.value {
            Value::Map(entries) => entries
                .iter()
                .filter_map(|(k, _)| k.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::{Codec, CodecAdapters, DefaultCodec};

    #[test]
    fn round_trips_scalars() {
        let ops = MsgPackOps;
        assert_eq!(ops.get_number(&ops.create_number(&42.0)).unwrap(), 42.0);
        assert_eq!(ops.get_string(&ops.create_string("hi")).unwrap(), "hi");
        assert!(ops.get_boolean(&ops.create_boolean(&true)).unwrap());
        assert!(ops.is_null(&ops.create_null()));
    }

    #[test]
    fn list_codec_round_trips() {
        let value = vec![1, 2, 3];
        let mut encoded = i32::codec().list_of().encode(&MsgPackOps, &value).unwrap();
        let decoded = i32::codec().list_of().decode(&MsgPackOps, &mut encoded).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn round_trips_through_real_messagepack_bytes() {
        let ops = MsgPackOps;
        let value = ops.create_map([
            ("name".to_string(), ops.create_string("lantern")),
            ("lit".to_string(), ops.create_boolean(&true)),
            (
                "fuel".to_string(),
                ops.create_list([ops.create_number(&1.0), ops.create_number(&2.0)]),
            ),
        ]);

        let bytes = encode_bytes(&value).unwrap();
        let decoded = decode_bytes(&bytes).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn encoded_bytes_match_the_msgpack_fixmap_prefix() {
        let ops = MsgPackOps;
        let value = ops.create_map([("a".to_string(), ops.create_number(&1.0))]);
        let bytes = encode_bytes(&value).unwrap();
        // a fixmap with one entry is tagged 0x81 per the MessagePack spec.
        assert_eq!(bytes[0], 0x81);
    }
}
