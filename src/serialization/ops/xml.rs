//! XML DOM realisation of the format adapter contract.
//!
//! XML has no native scalar/list/map distinction the way JSON does, so
//! [`XmlValue`] picks one convention and sticks to it: maps become an
//! element with one child per key, lists become an element with repeated
//! `<item>` children, and scalars become an element's text content. The
//! convention only matters at the boundary with actual XML text
//! ([`to_xml_string`]/[`from_xml_str`]) — everything above that boundary
//! drives [`super::CodecOps`] exactly like the other formats.

use quick_xml::{
    events::{BytesEnd, BytesStart, BytesText, Event},
    Reader, Writer,
};

use crate::{
    result::{DataError, DataResult},
    serialization::{CodecOps, ListView, MapView},
};

const LIST_ITEM_TAG: &str = "item";
const NULL_MARKER_ATTR: &str = "nil";

#[derive(Clone, Debug, PartialEq)]
pub enum XmlValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<XmlValue>),
    Map(Vec<(String, XmlValue)>),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct XmlOps;

impl CodecOps<XmlValue> for XmlOps {
    fn create_number(&self, value: &f64) -> XmlValue {
        XmlValue::Number(*value)
    }

    fn create_string(&self, value: &str) -> XmlValue {
        XmlValue::Text(value.to_string())
    }

    fn create_boolean(&self, value: &bool) -> XmlValue {
        XmlValue::Bool(*value)
    }

    fn create_list(&self, value: impl IntoIterator<Item = XmlValue>) -> XmlValue {
        XmlValue::List(value.into_iter().collect())
    }

    fn create_map(&self, pairs: impl IntoIterator<Item = (String, XmlValue)>) -> XmlValue {
        XmlValue::Map(pairs.into_iter().collect())
    }

    fn create_unit(&self) -> XmlValue {
        XmlValue::Map(Vec::new())
    }

    fn create_null(&self) -> XmlValue {
        XmlValue::Null
    }

    fn get_number(&self, value: &XmlValue) -> DataResult<f64> {
        match value {
            XmlValue::Number(n) => Ok(*n),
            other => Err(DataError::wrong_shape("number", shape_name(other))),
        }
    }

    fn get_string(&self, value: &XmlValue) -> DataResult<String> {
        match value {
            XmlValue::Text(s) => Ok(s.clone()),
            other => Err(DataError::wrong_shape("string", shape_name(other))),
        }
    }

    fn get_boolean(&self, value: &XmlValue) -> DataResult<bool> {
        match value {
            XmlValue::Bool(b) => Ok(*b),
            other => Err(DataError::wrong_shape("boolean", shape_name(other))),
        }
    }

    fn get_list(&self, value: &mut XmlValue) -> DataResult<impl ListView<XmlValue>> {
        match value {
            XmlValue::List(_) => Ok(XmlListView { value }),
            other => Err(DataError::wrong_shape("array", shape_name(other))),
        }
    }

    fn get_map(&self, value: &mut XmlValue) -> DataResult<impl MapView<XmlValue>> {
        match value {
            XmlValue::Map(_) => Ok(XmlMapView { value }),
            other => Err(DataError::wrong_shape("object", shape_name(other))),
        }
    }

    fn get_unit(&self, value: &XmlValue) -> DataResult<()> {
        match value {
            XmlValue::Map(m) if m.is_empty() => Ok(()),
            other => Err(DataError::wrong_shape("unit", shape_name(other))),
        }
    }

    fn is_null(&self, value: &XmlValue) -> bool {
        matches!(value, XmlValue::Null)
    }
}

fn shape_name(value: &XmlValue) -> &'static str {
    match value {
        XmlValue::Null => "null",
        XmlValue::Bool(_) => "boolean",
        XmlValue::Number(_) => "number",
        XmlValue::Text(_) => "string",
        XmlValue::List(_) => "array",
        XmlValue::Map(_) => "object",
    }
}

struct XmlListView<'a> {
    value: &'a mut XmlValue,
}

impl<'a> ListView<XmlValue> for XmlListView<'a> {
    fn append(&mut self, value: XmlValue) {
        if let XmlValue::List(v) = self.value {
            v.push(value);
        }
    }

    fn get(&mut self, index: usize) -> DataResult<&mut XmlValue> {
        let XmlValue::List(v) = self.value else {
            unreachable!("constructed only for List values")
        };
        let len = v.len();
        v.get_mut(index)
            .ok_or_else(|| DataError::list_index_out_of_bounds(index, len))
    }

    fn len(&self) -> usize {
        match self.value {
            XmlValue::List(v) => v.len(),
            _ => 0,
        }
    }

    fn into_iter(self) -> impl Iterator<Item = XmlValue> {
        match self.value {
            XmlValue::List(v) => std::mem::take(v).into_iter(),
            _ => Vec::new().into_iter(),
        }
    }
}

struct XmlMapView<'a> {
    value: &'a mut XmlValue,
}

impl<'a> MapView<XmlValue> for XmlMapView<'a> {
    fn get(&mut self, name: &str) -> DataResult<&mut XmlValue> {
        let XmlValue::Map(entries) = self.value else {
            unreachable!("constructed only for Map values")
        };
        entries
            .iter_mut()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
            .ok_or_else(|| DataError::key_not_found(name))
    }

    fn set(&mut self, name: &str, value: XmlValue) {
        let XmlValue::Map(entries) = self.value else {
            return;
        };
        if let Some(slot) = entries.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value;
        } else {
            entries.push((name.to_string(), value));
        }
    }

    fn remove(&mut self, key: &str) -> DataResult<XmlValue> {
        let XmlValue::Map(entries) = self.value else {
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
            XmlValue::Map(entries) => entries.iter().map(|(k, _)| k.clone()).collect(),
            _ => Vec::new(),
        }
    }
}

fn write_element(
    writer: &mut Writer<std::io::Cursor<Vec<u8>>>,
    tag: &str,
    value: &XmlValue,
) -> DataResult<()> {
    let io_err = |e: quick_xml::Error| DataError::new_custom(e.to_string());

    match value {
        XmlValue::Null => {
            let mut start = BytesStart::new(tag);
            start.push_attribute((NULL_MARKER_ATTR, "true"));
            writer.write_event(Event::Empty(start)).map_err(io_err)
        }
        XmlValue::Bool(b) => write_text_element(writer, tag, &b.to_string()),
        XmlValue::Number(n) => write_text_element(writer, tag, &n.to_string()),
        XmlValue::Text(s) => write_text_element(writer, tag, s),
        XmlValue::List(items) => {
            writer
                .write_event(Event::Start(BytesStart::new(tag)))
                .map_err(io_err)?;
            for item in items {
                write_element(writer, LIST_ITEM_TAG, item)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(tag)))
                .map_err(io_err)
        }
        XmlValue::Map(entries) => {
            writer
                .write_event(Event::Start(BytesStart::new(tag)))
                .map_err(io_err)?;
            for (key, v) in entries {
                write_element(writer, key, v)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(tag)))
                .map_err(io_err)
        }
    }
}

fn write_text_element(
    writer: &mut Writer<std::io::Cursor<Vec<u8>>>,
    tag: &str,
    text: &str,
) -> DataResult<()> {
    let io_err = |e: quick_xml::Error| DataError::new_custom(e.to_string());
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(io_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(io_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(io_err)
}

/// Serialises `value` to an XML document with `root_name` as the
/// document's single root element.
pub fn to_xml_string(root_name: &str, value: &XmlValue) -> DataResult<String> {
    let mut writer = Writer::new(std::io::Cursor::new(Vec::new()));
    write_element(&mut writer, root_name, value)?;
    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| DataError::new_custom(e.to_string()))
}

/// A parsed element, before it has been classified into scalar, list, or
/// map shape by [`classify`].
struct ParsedElement {
    children: Vec<(String, ParsedElement)>,
    text: String,
    is_nil: bool,
}

fn parse_into(reader: &mut Reader<&[u8]>, buf: &mut Vec<u8>) -> DataResult<ParsedElement> {
    let mut children = Vec::new();
    let mut text = String::new();
    loop {
        match reader.read_event_into(buf).map_err(|e| DataError::new_custom(e.to_string()))? {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
                let mut inner_buf = Vec::new();
                let child = parse_into(reader, &mut inner_buf)?;
                children.push((name, child));
            }
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
                let is_nil = start
                    .attributes()
                    .filter_map(|a| a.ok())
                    .any(|a| a.key.as_ref() == NULL_MARKER_ATTR.as_bytes());
                children.push((
                    name,
                    ParsedElement {
                        children: Vec::new(),
                        text: String::new(),
                        is_nil,
                    },
                ));
            }
            Event::Text(bytes_text) => {
                text.push_str(
                    &bytes_text
                        .unescape()
                        .map_err(|e| DataError::new_custom(e.to_string()))?,
                );
            }
            Event::End(_) => {
                return Ok(ParsedElement {
                    children,
                    text,
                    is_nil: false,
                });
            }
            Event::Eof => {
                return Ok(ParsedElement {
                    children,
                    text,
                    is_nil: false,
                });
            }
            _ => {}
        }
        buf.clear();
    }
}

fn classify(element: ParsedElement) -> XmlValue {
    if element.is_nil {
        return XmlValue::Null;
    }
    if !element.children.is_empty() {
        if element.children.iter().all(|(name, _)| name == LIST_ITEM_TAG) {
            return XmlValue::List(
                element
                    .children
                    .into_iter()
                    .map(|(_, child)| classify(child))
                    .collect(),
            );
        }
        return XmlValue::Map(
            element
                .children
                .into_iter()
                .map(|(name, child)| (name, classify(child)))
                .collect(),
        );
    }
    let trimmed = element.text.trim();
    if trimmed.is_empty() {
        XmlValue::Map(Vec::new())
    } else if let Ok(n) = trimmed.parse::<f64>() {
        XmlValue::Number(n)
    } else if trimmed == "true" || trimmed == "false" {
        XmlValue::Bool(trimmed == "true")
    } else {
        XmlValue::Text(element.text)
    }
}

/// Parses an XML document, returning its root element's name and the
/// [`XmlValue`] classified from its content.
pub fn from_xml_str(text: &str) -> DataResult<(String, XmlValue)> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text = true;
    let mut buf = Vec::new();
    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| DataError::new_custom(e.to_string()))?
        {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
                let mut inner_buf = Vec::new();
                let element = parse_into(&mut reader, &mut inner_buf)?;
                return Ok((name, classify(element)));
            }
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
                return Ok((name, XmlValue::Map(Vec::new())));
            }
            Event::Eof => {
                return Err(DataError::malformed_scalar("empty XML document"));
            }
            _ => {}
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_nested_value() {
        let value = XmlValue::Map(vec![
            ("name".to_string(), XmlValue::Text("lantern".to_string())),
            ("lit".to_string(), XmlValue::Bool(true)),
            (
                "tags".to_string(),
                XmlValue::List(vec![XmlValue::Number(1.0), XmlValue::Number(2.0)]),
            ),
        ]);

        let text = to_xml_string("root", &value).unwrap();
        let (root_name, decoded) = from_xml_str(&text).unwrap();
        assert_eq!(root_name, "root");
        assert_eq!(decoded, value);
    }

    #[test]
    fn null_round_trips_via_nil_attribute() {
        let value = XmlValue::Map(vec![("owner".to_string(), XmlValue::Null)]);
        let text = to_xml_string("root", &value).unwrap();
        let (_, decoded) = from_xml_str(&text).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn codec_ops_round_trip_through_xml_value() {
        use crate::serialization::{Codec, DefaultCodec};

        let mut encoded = String::codec().encode(&XmlOps, &"hi".to_string()).unwrap();
        let decoded: String = String::codec().decode(&XmlOps, &mut encoded).unwrap();
        assert_eq!(decoded, "hi");
    }
}
