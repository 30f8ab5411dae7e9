//! Compact binary realisation of the format adapter contract.
//!
//! [`BinValue`] is the in-memory tree [`super::CodecOps`] is implemented
//! against, same as [`super::json::JsonValue`] for JSON. [`BinWriter`] and
//! [`BinReader`] are the literal, bracketed push/pull surface
//! ([`super::adapter::FormatOutput`]/[`super::adapter::FormatInput`]) that
//! actually turns a [`BinValue`] into bytes and back — the realisation
//! §4.B describes for formats that don't already come with a DOM parser.

use std::collections::VecDeque;

use byteorder::{ReadBytesExt, WriteBytesExt, LE};

use crate::{
    result::{DataError, DataResult},
    serialization::{
        ops::adapter::{Event, FormatInput, FormatOutput, LOOKAHEAD},
        CodecOps, ListView, MapView,
    },
};

#[derive(Clone, Debug, PartialEq)]
pub enum BinValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<BinValue>),
    Map(Vec<(String, BinValue)>),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BinOps;

impl CodecOps<BinValue> for BinOps {
    fn create_number(&self, value: &f64) -> BinValue {
        BinValue::Number(*value)
    }

    fn create_string(&self, value: &str) -> BinValue {
        BinValue::Str(value.to_string())
    }

    fn create_boolean(&self, value: &bool) -> BinValue {
        BinValue::Bool(*value)
    }

    fn create_list(&self, value: impl IntoIterator<Item = BinValue>) -> BinValue {
        BinValue::List(value.into_iter().collect())
    }

    fn create_map(&self, pairs: impl IntoIterator<Item = (String, BinValue)>) -> BinValue {
        BinValue::Map(pairs.into_iter().collect())
    }

    fn create_unit(&self) -> BinValue {
        BinValue::Map(Vec::new())
    }

    fn create_null(&self) -> BinValue {
        BinValue::Null
    }

    fn get_number(&self, value: &BinValue) -> DataResult<f64> {
        match value {
            BinValue::Number(n) => Ok(*n),
            other => Err(DataError::wrong_shape("number", shape_name(other))),
        }
    }

    fn get_string(&self, value: &BinValue) -> DataResult<String> {
        match value {
            BinValue::Str(s) => Ok(s.clone()),
            other => Err(DataError::wrong_shape("string", shape_name(other))),
        }
    }

    fn get_boolean(&self, value: &BinValue) -> DataResult<bool> {
        match value {
            BinValue::Bool(b) => Ok(*b),
            other => Err(DataError::wrong_shape("boolean", shape_name(other))),
        }
    }

    fn get_list(&self, value: &mut BinValue) -> DataResult<impl ListView<BinValue>> {
        match value {
            BinValue::List(_) => Ok(BinListView { value }),
            other => Err(DataError::wrong_shape("array", shape_name(other))),
        }
    }

    fn get_map(&self, value: &mut BinValue) -> DataResult<impl MapView<BinValue>> {
        match value {
            BinValue::Map(_) => Ok(BinMapView { value }),
            other => Err(DataError::wrong_shape("object", shape_name(other))),
        }
    }

    fn get_unit(&self, value: &BinValue) -> DataResult<()> {
        match value {
            BinValue::Map(m) if m.is_empty() => Ok(()),
            other => Err(DataError::wrong_shape("unit", shape_name(other))),
        }
    }

    fn is_null(&self, value: &BinValue) -> bool {
        matches!(value, BinValue::Null)
    }
}

fn shape_name(value: &BinValue) -> &'static str {
    match value {
        BinValue::Null => "null",
        BinValue::Bool(_) => "boolean",
        BinValue::Number(_) => "number",
        BinValue::Str(_) => "string",
        BinValue::List(_) => "array",
        BinValue::Map(_) => "object",
    }
}

struct BinListView<'a> {
    value: &'a mut BinValue,
}

impl<'a> ListView<BinValue> for BinListView<'a> {
    fn append(&mut self, value: BinValue) {
        if let BinValue::List(v) = self.value {
            v.push(value);
        }
    }

    fn get(&mut self, index: usize) -> DataResult<&mut BinValue> {
        let BinValue::List(v) = self.value else {
            unreachable!("constructed only for List values")
        };
        let len = v.len();
        v.get_mut(index)
            .ok_or_else(|| DataError::list_index_out_of_bounds(index, len))
    }

    fn len(&self) -> usize {
        match self.value {
            BinValue::List(v) => v.len(),
            _ => 0,
        }
    }

    fn into_iter(self) -> impl Iterator<Item = BinValue> {
        match self.value {
            BinValue::List(v) => std::mem::take(v).into_iter(),
            _ => Vec::new().into_iter(),
        }
    }
}

struct BinMapView<'a> {
    value: &'a mut BinValue,
}

impl<'a> MapView<BinValue> for BinMapView<'a> {
    fn get(&mut self, name: &str) -> DataResult<&mut BinValue> {
        let BinValue::Map(entries) = self.value else {
            unreachable!("constructed only for Map values")
        };
        entries
            .iter_mut()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
            .ok_or_else(|| DataError::key_not_found(name))
    }

    fn set(&mut self, name: &str, value: BinValue) {
        let BinValue::Map(entries) = self.value else {
            return;
        };
        if let Some(slot) = entries.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value;
        } else {
            entries.push((name.to_string(), value));
        }
    }

    fn remove(&mut self, key: &str) -> DataResult<BinValue> {
        let BinValue::Map(entries) = self.value else {
            unreachable!("constructed only for Map values")
        };
        let index = entries
            .iter()
            .position(|(k, _)| k == key)
            .ok_or_else(|| DataError::key_not_found(key))?;
        Ok(entries.remove(index).1)
    }

    fn keys(&self) -> Vec<String> {
        match self.value {
            BinValue::Map(entries) => entries.iter().map(|(k, _)| k.clone()).collect(),
            _ => Vec::new(),
        }
    }
}

const TAG_NULL: u8 = 0;
const TAG_FALSE: u8 = 1;
const TAG_TRUE: u8 = 2;
const TAG_NUMBER: u8 = 3;
const TAG_STRING: u8 = 4;
const TAG_START_OBJECT: u8 = 5;
const TAG_FIELD_NAME: u8 = 6;
const TAG_END_OBJECT: u8 = 7;
const TAG_START_ARRAY: u8 = 8;
const TAG_END_ARRAY: u8 = 9;

/// Tag-framed [`FormatOutput`] writing directly into an owned byte buffer.
#[derive(Default)]
pub struct BinWriter {
    buf: Vec<u8>,
}

impl BinWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn write_tagged_string(&mut self, tag: u8, value: &str) -> DataResult<()> {
        self.buf.push(tag);
        let bytes = value.as_bytes();
        self.buf
            .write_u32::<LE>(bytes.len() as u32)
            .map_err(|e| DataError::new_custom(e.to_string()))?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }
}

impl FormatOutput for BinWriter {
    fn write_null(&mut self) -> DataResult<()> {
        self.buf.push(TAG_NULL);
        Ok(())
    }

    fn write_bool(&mut self, value: bool) -> DataResult<()> {
        self.buf.push(if value { TAG_TRUE } else { TAG_FALSE });
        Ok(())
    }

    fn write_number(&mut self, value: f64) -> DataResult<()> {
        self.buf.push(TAG_NUMBER);
        self.buf
            .write_f64::<LE>(value)
            .map_err(|e| DataError::new_custom(e.to_string()))
    }

    fn write_string(&mut self, value: &str) -> DataResult<()> {
        self.write_tagged_string(TAG_STRING, value)
    }

    fn start_object(&mut self) -> DataResult<()> {
        self.buf.push(TAG_START_OBJECT);
        Ok(())
    }

    fn write_field(&mut self, name: &str) -> DataResult<()> {
        self.write_tagged_string(TAG_FIELD_NAME, name)
    }

    fn end_object(&mut self) -> DataResult<()> {
        self.buf.push(TAG_END_OBJECT);
        Ok(())
    }

    fn start_array(&mut self) -> DataResult<()> {
        self.buf.push(TAG_START_ARRAY);
        Ok(())
    }

    fn end_array(&mut self) -> DataResult<()> {
        self.buf.push(TAG_END_ARRAY);
        Ok(())
    }
}

/// Tag-framed [`FormatInput`] with a lookahead queue of [`LOOKAHEAD`]
/// parsed [`Event`]s.
pub struct BinReader<'a> {
    cursor: std::io::Cursor<&'a [u8]>,
    pending: VecDeque<Event>,
    exhausted: bool,
}

impl<'a> BinReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        BinReader {
            cursor: std::io::Cursor::new(bytes),
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    fn read_tagged_string(&mut self) -> DataResult<String> {
        let len = self
            .cursor
            .read_u32::<LE>()
            .map_err(|e| DataError::new_custom(e.to_string()))? as usize;
        let start = self.cursor.position() as usize;
        let bytes = self.cursor.get_ref();
        let end = start + len;
        if end > bytes.len() {
            return Err(DataError::malformed_scalar("truncated string"));
        }
        let s = String::from_utf8(bytes[start..end].to_vec())
            .map_err(|e| DataError::malformed_scalar(e.to_string()))?;
        self.cursor.set_position(end as u64);
        Ok(s)
    }

    fn next_raw_event(&mut self) -> DataResult<Event> {
        if self.exhausted {
            return Ok(Event::Eof);
        }
        let tag = match self.cursor.read_u8() {
            Ok(tag) => tag,
            Err(_) => {
                self.exhausted = true;
                return Ok(Event::Eof);
            }
        };
        match tag {
            TAG_NULL => Ok(Event::Null),
            TAG_FALSE => Ok(Event::Bool(false)),
            TAG_TRUE => Ok(Event::Bool(true)),
            TAG_NUMBER => self
                .cursor
                .read_f64::<LE>()
                .map(Event::Number)
                .map_err(|e| DataError::new_custom(e.to_string())),
            TAG_STRING => self.read_tagged_string().map(Event::Str),
            TAG_START_OBJECT => Ok(Event::StartObject),
            TAG_FIELD_NAME => self.read_tagged_string().map(Event::FieldName),
            TAG_END_OBJECT => Ok(Event::EndObject),
            TAG_START_ARRAY => Ok(Event::StartArray),
            TAG_END_ARRAY => Ok(Event::EndArray),
            other => Err(DataError::malformed_scalar(format!("unknown tag byte {other}"))),
        }
    }

    fn ensure(&mut self, depth: usize) -> DataResult<()> {
        while self.pending.len() <= depth {
            let event = self.next_raw_event()?;
            let eof = matches!(event, Event::Eof);
            self.pending.push_back(event);
            if eof {
                break;
            }
        }
        Ok(())
    }

    fn pop_expecting(&mut self, what: &'static str) -> DataResult<Event> {
        self.ensure(0)?;
        self.pending
            .pop_front()
            .ok_or_else(|| DataError::malformed_scalar(format!("expected {what}, found end of input")))
    }
}

impl<'a> FormatInput for BinReader<'a> {
    fn current_event(&mut self) -> DataResult<Event> {
        self.ensure(0)?;
        Ok(self.pending[0].clone())
    }

    fn peek(&mut self, lookahead: usize) -> DataResult<Event> {
        assert!(lookahead < LOOKAHEAD, "lookahead exceeds the guaranteed bound");
        self.ensure(lookahead)?;
        Ok(self.pending[lookahead].clone())
    }

    fn read_null(&mut self) -> DataResult<()> {
        match self.pop_expecting("null")? {
            Event::Null => Ok(()),
            other => Err(DataError::wrong_shape("null", event_shape_name(&other))),
        }
    }

    fn read_bool(&mut self) -> DataResult<bool> {
        match self.pop_expecting("bool")? {
            Event::Bool(b) => Ok(b),
            other => Err(DataError::wrong_shape("boolean", event_shape_name(&other))),
        }
    }

    fn read_number(&mut self) -> DataResult<f64> {
        match self.pop_expecting("number")? {
            Event::Number(n) => Ok(n),
            other => Err(DataError::wrong_shape("number", event_shape_name(&other))),
        }
    }

    fn read_string(&mut self) -> DataResult<String> {
        match self.pop_expecting("string")? {
            Event::Str(s) => Ok(s),
            other => Err(DataError::wrong_shape("string", event_shape_name(&other))),
        }
    }

    fn start_object(&mut self) -> DataResult<()> {
        match self.pop_expecting("start of object")? {
            Event::StartObject => Ok(()),
            other => Err(DataError::wrong_shape("object", event_shape_name(&other))),
        }
    }

    fn read_field_name(&mut self) -> DataResult<String> {
        match self.pop_expecting("field name")? {
            Event::FieldName(name) => Ok(name),
            other => Err(DataError::wrong_shape("field name", event_shape_name(&other))),
        }
    }

    fn end_object(&mut self) -> DataResult<()> {
        match self.pop_expecting("end of object")? {
            Event::EndObject => Ok(()),
            other => Err(DataError::wrong_shape("end of object", event_shape_name(&other))),
        }
    }

    fn start_array(&mut self) -> DataResult<()> {
        match self.pop_expecting("start of array")? {
            Event::StartArray => Ok(()),
            other => Err(DataError::wrong_shape("array", event_shape_name(&other))),
        }
    }

    fn end_array(&mut self) -> DataResult<()> {
        match self.pop_expecting("end of array")? {
            Event::EndArray => Ok(()),
            other => Err(DataError::wrong_shape("end of array", event_shape_name(&other))),
        }
    }

    fn skip_node(&mut self) -> DataResult<()> {
        match self.pop_expecting("a value")? {
            Event::StartObject => {
                loop {
                    match self.peek(0)? {
                        Event::EndObject => {
                            self.pop_expecting("end of object")?;
                            break;
                        }
                        Event::FieldName(_) => {
                            self.pop_expecting("field name")?;
                            self.skip_node()?;
                        }
                        _ => return Err(DataError::structural_mismatch("malformed object while skipping")),
                    }
                }
                Ok(())
            }
            Event::StartArray => {
                loop {
                    match self.peek(0)? {
                        Event::EndArray => {
                            self.pop_expecting("end of array")?;
                            break;
                        }
                        _ => self.skip_node()?,
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn not_eof(&mut self) -> DataResult<bool> {
        self.ensure(0)?;
        Ok(!matches!(self.pending[0], Event::Eof))
    }

    fn location(&self) -> String {
        format!("byte offset {}", self.cursor.position())
    }
}

fn event_shape_name(event: &Event) -> &'static str {
    match event {
        Event::Null => "null",
        Event::Bool(_) => "boolean",
        Event::Number(_) => "number",
        Event::Str(_) => "string",
        Event::StartObject => "start of object",
        Event::FieldName(_) => "field name",
        Event::EndObject => "end of object",
        Event::StartArray => "start of array",
        Event::EndArray => "end of array",
        Event::Eof => "end of input",
    }
}

/// Walks a [`BinValue`] tree through a [`FormatOutput`], the "materialise
/// outward" half of the dual realisation.
pub fn write_value(out: &mut impl FormatOutput, value: &BinValue) -> DataResult<()> {
    match value {
        BinValue::Null => out.write_null(),
        BinValue::Bool(b) => out.write_bool(*b),
        BinValue::Number(n) => out.write_number(*n),
        BinValue::Str(s) => out.write_string(s),
        BinValue::List(items) => {
            out.start_array()?;
            for item in items {
                write_value(out, item)?;
            }
            out.end_array()
        }
        BinValue::Map(entries) => {
            out.start_object()?;
            for (key, v) in entries {
                out.write_field(key)?;
                write_value(out, v)?;
            }
            out.end_object()
        }
    }
}

/// Walks a [`FormatInput`] into a [`BinValue`] tree, the "materialise
/// inward" half of the dual realisation.
pub fn read_value(input: &mut impl FormatInput) -> DataResult<BinValue> {
    match input.current_event()? {
        Event::Null => {
            input.read_null()?;
            Ok(BinValue::Null)
        }
        Event::Bool(_) => input.read_bool().map(BinValue::Bool),
        Event::Number(_) => input.read_number().map(BinValue::Number),
        Event::Str(_) => input.read_string().map(BinValue::Str),
        Event::StartArray => {
            input.start_array()?;
            let mut items = Vec::new();
            while !matches!(input.current_event()?, Event::EndArray) {
                items.push(read_value(input)?);
            }
            input.end_array()?;
            Ok(BinValue::List(items))
        }
        Event::StartObject => {
            input.start_object()?;
            let mut entries = Vec::new();
            while !matches!(input.current_event()?, Event::EndObject) {
                let name = input.read_field_name()?;
                entries.push((name, read_value(input)?));
            }
            input.end_object()?;
            Ok(BinValue::Map(entries))
        }
        other => Err(DataError::structural_mismatch(format!(
            "unexpected {} at top level",
            event_shape_name(&other)
        ))),
    }
}

/// Serialises a [`BinValue`] to the compact binary wire format.
pub fn encode_bytes(value: &BinValue) -> DataResult<Vec<u8>> {
    let mut writer = BinWriter::new();
    write_value(&mut writer, value)?;
    Ok(writer.into_bytes())
}

/// Parses the compact binary wire format back into a [`BinValue`].
pub fn decode_bytes(bytes: &[u8]) -> DataResult<BinValue> {
    let mut reader = BinReader::new(bytes);
    read_value(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_nested_value() {
        let value = BinValue::Map(vec![
            ("name".to_string(), BinValue::Str("lantern".to_string())),
            ("lit".to_string(), BinValue::Bool(true)),
            (
                "tags".to_string(),
                BinValue::List(vec![BinValue::Number(1.0), BinValue::Number(2.0)]),
            ),
            ("owner".to_string(), BinValue::Null),
        ]);

        let bytes = encode_bytes(&value).unwrap();
        let decoded = decode_bytes(&bytes).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn skip_node_consumes_a_whole_object() {
        let value = BinValue::Map(vec![
            ("a".to_string(), BinValue::Number(1.0)),
            ("b".to_string(), BinValue::List(vec![BinValue::Number(2.0)])),
        ]);
        let bytes = encode_bytes(&value).unwrap();
        let mut reader = BinReader::new(&bytes);
        reader.start_object().unwrap();
        reader.read_field_name().unwrap();
        reader.skip_node().unwrap();
        assert_eq!(reader.read_field_name().unwrap(), "b");
        reader.skip_node().unwrap();
        reader.end_object().unwrap();
        assert!(!reader.not_eof().unwrap());
    }

    #[test]
    fn codec_ops_round_trip_through_bin_value() {
        use crate::serialization::{Codec, DefaultCodec};

        let mut encoded = i32::codec().encode(&BinOps, &42).unwrap();
        let decoded: i32 = i32::codec().decode(&BinOps, &mut encoded).unwrap();
        assert_eq!(decoded, 42);
    }
}
