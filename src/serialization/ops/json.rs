//! JSON DOM realisation of the format adapter contract, backed by the
//! `json` crate's [`JsonValue`] tree.

use json::object::Object;

pub use json::JsonValue;

use crate::{
    result::{DataError, DataResult},
    serialization::{CodecOps, ListView, MapView},
};

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonOps;

impl CodecOps<JsonValue> for JsonOps {
    fn create_number(&self, value: &f64) -> JsonValue {
        JsonValue::from(*value)
    }

    fn create_string(&self, value: &str) -> JsonValue {
        JsonValue::from(value)
    }

    fn create_boolean(&self, value: &bool) -> JsonValue {
        JsonValue::from(*value)
    }

    fn create_list(&self, value: impl IntoIterator<Item = JsonValue>) -> JsonValue {
        JsonValue::Array(value.into_iter().collect())
    }

    fn create_map(&self, pairs: impl IntoIterator<Item = (String, JsonValue)>) -> JsonValue {
        let mut object = Object::new();
        for (key, value) in pairs {
            object.insert(&key, value);
        }
        JsonValue::Object(object)
    }

    fn create_unit(&self) -> JsonValue {
        JsonValue::Object(Object::new())
    }

    fn create_null(&self) -> JsonValue {
        JsonValue::Null
    }

    fn get_number(&self, value: &JsonValue) -> DataResult<f64> {
        value
            .as_f64()
            .ok_or_else(|| DataError::wrong_shape("number", shape_name(value)))
    }

    fn get_string(&self, value: &JsonValue) -> DataResult<String> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DataError::wrong_shape("string", shape_name(value)))
    }

    fn get_boolean(&self, value: &JsonValue) -> DataResult<bool> {
        value
            .as_bool()
            .ok_or_else(|| DataError::wrong_shape("boolean", shape_name(value)))
    }

    fn get_list(&self, value: &mut JsonValue) -> DataResult<impl ListView<JsonValue>> {
        match value {
            JsonValue::Array(_) => Ok(JsonListView { value }),
            other => Err(DataError::wrong_shape("array", shape_name(other))),
        }
    }

    fn get_map(&self, value: &mut JsonValue) -> DataResult<impl MapView<JsonValue>> {
        match value {
            JsonValue::Object(_) => Ok(JsonMapView { value }),
            other => Err(DataError::wrong_shape("object", shape_name(other))),
        }
    }

    fn get_unit(&self, value: &JsonValue) -> DataResult<()> {
        match value {
            JsonValue::Object(o) if o.is_empty() => Ok(()),
            other => Err(DataError::wrong_shape("unit", shape_name(other))),
        }
    }

    fn is_null(&self, value: &JsonValue) -> bool {
        value.is_null()
    }
}

fn shape_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Short(_) | JsonValue::String(_) => "string",
        JsonValue::Number(_) => "number",
        JsonValue::Boolean(_) => "boolean",
        JsonValue::Object(_) => "object",
        JsonValue::Array(_) => "array",
    }
}

struct JsonListView<'a> {
    value: &'a mut JsonValue,
}

impl<'a> ListView<JsonValue> for JsonListView<'a> {
    fn append(&mut self, value: JsonValue) {
        if let JsonValue::Array(v) = self.value {
            v.push(value);
        }
    }

    fn get(&mut self, index: usize) -> DataResult<&mut JsonValue> {
        let JsonValue::Array(v) = self.value else {
            unreachable!("constructed only for Array values")
        };
        let len = v.len();
        v.get_mut(index)
            .ok_or_else(|| DataError::list_index_out_of_bounds(index, len))
    }

    fn len(&self) -> usize {
        match self.value {
            JsonValue::Array(v) => v.len(),
            _ => 0,
        }
    }

    fn into_iter(self) -> impl Iterator<Item = JsonValue> {
        match self.value {
            JsonValue::Array(v) => std::mem::take(v).into_iter(),
            _ => Vec::new().into_iter(),
        }
    }
}

struct JsonMapView<'a> {
    value: &'a mut JsonValue,
}

impl<'a> MapView<JsonValue> for JsonMapView<'a> {
    fn get(&mut self, name: &str) -> DataResult<&mut JsonValue> {
        let JsonValue::Object(o) = self.value else {
            unreachable!("constructed only for Object values")
        };
        o.get_mut(name).ok_or_else(|| DataError::key_not_found(name))
    }

    fn set(&mut self, name: &str, value: JsonValue) {
        if let JsonValue::Object(o) = self.value {
            o.insert(name, value);
        }
    }

    fn remove(&mut self, key: &str) -> DataResult<JsonValue> {
        let JsonValue::Object(o) = self.value else {
            unreachable!("constructed only for Object values")
        };
        if o.get(key).is_some() {
            Ok(o.remove(key))
        } else {
            Err(DataError::key_not_found(key))
        }
    }

    fn keys(&self) -> Vec<String> {
        match self.value {
            JsonValue::Object(o) => o.iter().map(|(key, _)| key.to_string()).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_scalars() {
        let ops = JsonOps;
        assert_eq!(ops.get_number(&ops.create_number(&42.0)).unwrap(), 42.0);
        assert_eq!(
            ops.get_string(&ops.create_string("hi")).unwrap(),
            "hi".to_string()
        );
        assert!(ops.get_boolean(&ops.create_boolean(&true)).unwrap());
        assert!(ops.is_null(&ops.create_null()));
    }

    #[test]
    fn map_view_reports_missing_key() {
        let ops = JsonOps;
        let mut value = ops.create_map([("a".to_string(), ops.create_number(&1.0))]);
        let mut map = ops.get_map(&mut value).unwrap();
        assert!(map.get("missing").is_err());
        assert!(map.remove("missing").is_err());
    }

    #[test]
    fn list_view_reports_out_of_bounds() {
        let ops = JsonOps;
        let mut value = ops.create_list([ops.create_number(&1.0)]);
        let mut list = ops.get_list(&mut value).unwrap();
        assert!(list.get(5).is_err());
    }
}
