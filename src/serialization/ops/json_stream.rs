//! Event-stream realisation of the JSON format: a hand-rolled tokenizer
//! implementing [`FormatInput`]/[`FormatOutput`] directly over text, then
//! materialised into the same [`json::JsonValue`] tree [`super::json::JsonOps`]
//! already drives. Exists alongside the DOM-based [`super::json`] module
//! because §4.B calls for one push/pull realisation of the contract in
//! addition to the value-tree ones.

use std::{collections::VecDeque, iter::Peekable, str::Chars};

use json::object::Object;
use json::JsonValue;

use crate::{
    result::{DataError, DataResult},
    serialization::ops::adapter::{Event, FormatInput, FormatOutput, LOOKAHEAD},
};

/// Writes JSON text token-by-token, tracking whether a comma is needed
/// before the next sibling at each nesting level.
#[derive(Default)]
pub struct JsonStreamWriter {
    buf: String,
    need_comma: Vec<bool>,
}

impl JsonStreamWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    fn before_value(&mut self) {
        if let Some(needs) = self.need_comma.last_mut() {
            if *needs {
                self.buf.push(',');
            }
            *needs = true;
        }
    }

    fn push_escaped_string(&mut self, value: &str) {
        self.buf.push('"');
        for c in value.chars() {
            match c {
                '"' => self.buf.push_str("\\\""),
                '\\' => self.buf.push_str("\\\\"),
                '\n' => self.buf.push_str("\\n"),
                '\r' => self.buf.push_str("\\r"),
                '\t' => self.buf.push_str("\\t"),
                c if (c as u32) < 0x20 => self.buf.push_str(&format!("\\u{:04x}", c as u32)),
                c => self.buf.push(c),
            }
        }
        self.buf.push('"');
    }
}

impl FormatOutput for JsonStreamWriter {
    fn write_null(&mut self) -> DataResult<()> {
        self.before_value();
        self.buf.push_str("null");
        Ok(())
    }

    fn write_bool(&mut self, value: bool) -> DataResult<()> {
        self.before_value();
        self.buf.push_str(if value { "true" } else { "false" });
        Ok(())
    }

    fn write_number(&mut self, value: f64) -> DataResult<()> {
        self.before_value();
        if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
            self.buf.push_str(&format!("{}", value as i64));
        } else {
            self.buf.push_str(&value.to_string());
        }
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> DataResult<()> {
        self.before_value();
        self.push_escaped_string(value);
        Ok(())
    }

    fn start_object(&mut self) -> DataResult<()> {
        self.before_value();
        self.buf.push('{');
        self.need_comma.push(false);
        Ok(())
    }

    fn write_field(&mut self, name: &str) -> DataResult<()> {
        if let Some(needs) = self.need_comma.last_mut() {
            if *needs {
                self.buf.push(',');
            }
            *needs = true;
        }
        self.push_escaped_string(name);
        self.buf.push(':');
        Ok(())
    }

    fn end_object(&mut self) -> DataResult<()> {
        self.need_comma.pop();
        self.buf.push('}');
        Ok(())
    }

    fn start_array(&mut self) -> DataResult<()> {
        self.before_value();
        self.buf.push('[');
        self.need_comma.push(false);
        Ok(())
    }

    fn end_array(&mut self) -> DataResult<()> {
        self.need_comma.pop();
        self.buf.push(']');
        Ok(())
    }
}

/// Tokenizes JSON text on demand, keeping a queue of up to [`LOOKAHEAD`]
/// parsed [`Event`]s so the dynamic-type dispatcher can peek ahead of the
/// cursor before committing to a decode strategy.
pub struct JsonStreamReader<'a> {
    chars: Peekable<Chars<'a>>,
    offset: usize,
    pending: VecDeque<Event>,
    /// Tracks whether the next token at the current nesting level is a
    /// field name (inside an object, before a value) or a plain value.
    expect_field_name: Vec<bool>,
}

impl<'a> JsonStreamReader<'a> {
    pub fn new(text: &'a str) -> Self {
        JsonStreamReader {
            chars: text.chars().peekable(),
            offset: 0,
            pending: VecDeque::new(),
            expect_field_name: Vec::new(),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.offset += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn parse_string_body(&mut self) -> DataResult<String> {
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(s),
                Some('\\') => match self.bump() {
                    Some('"') => s.push('"'),
                    Some('\\') => s.push('\\'),
                    Some('/') => s.push('/'),
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some('u') => {
                        let mut code = 0u32;
                        for _ in 0..4 {
                            let digit = self
                                .bump()
                                .and_then(|c| c.to_digit(16))
                                .ok_or_else(|| DataError::malformed_scalar("invalid \\u escape"))?;
                            code = code * 16 + digit;
                        }
                        s.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
                    }
                    _ => return Err(DataError::malformed_scalar("invalid escape sequence")),
                },
                Some(c) => s.push(c),
                None => return Err(DataError::malformed_scalar("unterminated string literal")),
            }
        }
    }

    fn parse_literal_event(&mut self) -> DataResult<Event> {
        self.skip_whitespace();
        match self.chars.peek() {
            None => Ok(Event::Eof),
            Some('{') => {
                self.bump();
                Ok(Event::StartObject)
            }
            Some('}') => {
                self.bump();
                Ok(Event::EndObject)
            }
            Some('[') => {
                self.bump();
                Ok(Event::StartArray)
            }
            Some(']') => {
                self.bump();
                Ok(Event::EndArray)
            }
            Some(',') | Some(':') => {
                self.bump();
                self.parse_literal_event()
            }
            Some('"') => {
                self.bump();
                self.parse_string_body().map(Event::Str)
            }
            Some('t') => {
                self.expect_literal("true")?;
                Ok(Event::Bool(true))
            }
            Some('f') => {
                self.expect_literal("false")?;
                Ok(Event::Bool(false))
            }
            Some('n') => {
                self.expect_literal("null")?;
                Ok(Event::Null)
            }
            Some(c) if c.is_ascii_digit() || *c == '-' => self.parse_number().map(Event::Number),
            Some(other) => Err(DataError::malformed_scalar(format!(
                "unexpected character {other:?}"
            ))),
        }
    }

    fn expect_literal(&mut self, literal: &str) -> DataResult<()> {
        for expected in literal.chars() {
            match self.bump() {
                Some(c) if c == expected => {}
                _ => return Err(DataError::malformed_scalar(format!("expected literal {literal:?}"))),
            }
        }
        Ok(())
    }

    fn parse_number(&mut self) -> DataResult<f64> {
        let mut raw = String::new();
        if matches!(self.chars.peek(), Some('-')) {
            raw.push(self.bump().unwrap());
        }
        while matches!(self.chars.peek(), Some(c) if c.is_ascii_digit() || *c == '.' || *c == 'e' || *c == 'E' || *c == '+' || *c == '-')
        {
            raw.push(self.bump().unwrap());
        }
        raw.parse::<f64>()
            .map_err(|e| DataError::malformed_scalar(e.to_string()))
    }

    /// Reads one raw token, deciding whether an object key slot expects a
    /// field name rather than a value based on `expect_field_name`.
    fn next_raw_event(&mut self) -> DataResult<Event> {
        self.skip_whitespace();
        if matches!(self.chars.peek(), Some(',')) {
            self.bump();
            self.skip_whitespace();
        }

        if let Some(true) = self.expect_field_name.last() {
            if matches!(self.chars.peek(), Some('}')) {
                self.bump();
                self.expect_field_name.pop();
                return Ok(Event::EndObject);
            }
            *self.expect_field_name.last_mut().unwrap() = false;
            return match self.bump() {
                Some('"') => {
                    let name = self.parse_string_body()?;
                    self.skip_whitespace();
                    if matches!(self.chars.peek(), Some(':')) {
                        self.bump();
                    }
                    Ok(Event::FieldName(name))
                }
                _ => Err(DataError::malformed_scalar("expected a field name")),
            };
        }

        let event = self.parse_literal_event()?;
        match event {
            Event::StartObject => self.expect_field_name.push(true),
            Event::EndObject | Event::EndArray => {
                self.expect_field_name.pop();
            }
            Event::StartArray => self.expect_field_name.push(false),
            _ => {}
        }
        Ok(event)
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

impl<'a> FormatInput for JsonStreamReader<'a> {
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
        format!("character offset {}", self.offset)
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

/// Walks a [`JsonValue`] tree through a [`FormatOutput`].
pub fn write_value(out: &mut impl FormatOutput, value: &JsonValue) -> DataResult<()> {
    match value {
        JsonValue::Null => out.write_null(),
        JsonValue::Boolean(b) => out.write_bool(*b),
        JsonValue::Number(_) => out.write_number(value.as_f64().unwrap_or_default()),
        JsonValue::Short(_) | JsonValue::String(_) => {
            out.write_string(value.as_str().unwrap_or_default())
        }
        JsonValue::Array(items) => {
            out.start_array()?;
            for item in items {
                write_value(out, item)?;
            }
            out.end_array()
        }
        JsonValue::Object(object) => {
            out.start_object()?;
            for (key, v) in object.iter() {
                out.write_field(key)?;
                write_value(out, v)?;
            }
            out.end_object()
        }
    }
}

/// Walks a [`FormatInput`] into a [`JsonValue`] tree.
pub fn read_value(input: &mut impl FormatInput) -> DataResult<JsonValue> {
    match input.current_event()? {
        Event::Null => {
            input.read_null()?;
            Ok(JsonValue::Null)
        }
        Event::Bool(_) => input.read_bool().map(JsonValue::from),
        Event::Number(_) => input.read_number().map(JsonValue::from),
        Event::Str(_) => input.read_string().map(JsonValue::from),
        Event::StartArray => {
            input.start_array()?;
            let mut items = Vec::new();
            while !matches!(input.current_event()?, Event::EndArray) {
                items.push(read_value(input)?);
            }
            input.end_array()?;
            Ok(JsonValue::Array(items))
        }
        Event::StartObject => {
            input.start_object()?;
            let mut object = Object::new();
            while !matches!(input.current_event()?, Event::EndObject) {
                let name = input.read_field_name()?;
                object.insert(&name, read_value(input)?);
            }
            input.end_object()?;
            Ok(JsonValue::Object(object))
        }
        other => Err(DataError::structural_mismatch(format!(
            "unexpected {} at top level",
            event_shape_name(&other)
        ))),
    }
}

/// Serialises a [`JsonValue`] to a JSON text string via the event stream.
pub fn to_string(value: &JsonValue) -> DataResult<String> {
    let mut writer = JsonStreamWriter::new();
    write_value(&mut writer, value)?;
    Ok(writer.into_string())
}

/// Parses a JSON text string into a [`JsonValue`] via the event stream.
pub fn from_str(text: &str) -> DataResult<JsonValue> {
    let mut reader = JsonStreamReader::new(text);
    read_value(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_nested_object() {
        let mut object = Object::new();
        object.insert("name", JsonValue::from("lantern"));
        object.insert("lit", JsonValue::from(true));
        object.insert("tags", JsonValue::Array(vec![JsonValue::from(1), JsonValue::from(2)]));
        object.insert("owner", JsonValue::Null);
        let value = JsonValue::Object(object);

        let text = to_string(&value).unwrap();
        let decoded = from_str(&text).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn escapes_special_characters_in_strings() {
        let value = JsonValue::from("line\nbreak\t\"quoted\"");
        let text = to_string(&value).unwrap();
        let decoded = from_str(&text).unwrap();
        assert_eq!(value, decoded);
    }
}
