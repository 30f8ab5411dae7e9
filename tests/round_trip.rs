//! Round-trip law (§8): `decode(encode(v)) == v` for every supported
//! shape, across every format adapter.

use codectree::serialization::{
    binary::{self, BinOps},
    json::JsonOps,
    json_stream,
    msgpack::{self, MsgPackOps},
    xml::{self, XmlOps},
    Codec, CodecAdapters, DefaultCodec,
};
use proptest::prelude::*;

#[test]
fn primitives_round_trip_every_format() {
    let n = 42i32;
    let mut json = i32::codec().encode(&JsonOps, &n).unwrap();
    assert_eq!(i32::codec().decode(&JsonOps, &mut json).unwrap(), n);

    let msgpack_value = i32::codec().encode(&MsgPackOps, &n).unwrap();
    let msgpack_bytes = msgpack::encode_bytes(&msgpack_value).unwrap();
    let mut decoded_msgpack = msgpack::decode_bytes(&msgpack_bytes).unwrap();
    assert_eq!(i32::codec().decode(&MsgPackOps, &mut decoded_msgpack).unwrap(), n);

    let mut xml_value = i32::codec().encode(&XmlOps, &n).unwrap();
    assert_eq!(i32::codec().decode(&XmlOps, &mut xml_value).unwrap(), n);

    let bin_value = i32::codec().encode(&BinOps, &n).unwrap();
    let bytes = binary::encode_bytes(&bin_value).unwrap();
    let mut decoded_bin = binary::decode_bytes(&bytes).unwrap();
    assert_eq!(i32::codec().decode(&BinOps, &mut decoded_bin).unwrap(), n);

    let json_value = i32::codec().encode(&JsonOps, &n).unwrap();
    let text = json_stream::to_string(&json_value).unwrap();
    let mut streamed = json_stream::from_str(&text).unwrap();
    assert_eq!(i32::codec().decode(&JsonOps, &mut streamed).unwrap(), n);
}

#[test]
fn json_adapter_exact_wire_form_for_int() {
    let encoded = i32::codec().encode(&JsonOps, &42).unwrap();
    assert_eq!(encoded.to_string(), "42");
}

#[test]
fn lists_and_maps_round_trip_under_xml() {
    let values = vec![1, 2, 3, 4];
    let mut encoded = i32::codec().list_of().encode(&XmlOps, &values).unwrap();
    let decoded = i32::codec().list_of().decode(&XmlOps, &mut encoded).unwrap();
    assert_eq!(values, decoded);

    let text = xml::to_xml_string("root", &encoded).unwrap();
    let (_, mut reparsed) = xml::from_xml_str(&text).unwrap();
    let decoded_again = i32::codec().list_of().decode(&XmlOps, &mut reparsed).unwrap();
    assert_eq!(values, decoded_again);
}

#[test]
fn string_map_round_trips_under_msgpack() {
    let mut map = std::collections::HashMap::new();
    map.insert("a".to_string(), 1i32);
    map.insert("b".to_string(), 2i32);

    let encoded = i32::codec().string_map_of().encode(&MsgPackOps, &map).unwrap();
    let bytes = msgpack::encode_bytes(&encoded).unwrap();
    let mut decoded_value = msgpack::decode_bytes(&bytes).unwrap();
    let decoded = i32::codec().string_map_of().decode(&MsgPackOps, &mut decoded_value).unwrap();
    assert_eq!(map, decoded);
}

proptest! {
    #[test]
    fn i32_round_trips_under_json(n: i32) {
        let mut encoded = i32::codec().encode(&JsonOps, &n).unwrap();
        prop_assert_eq!(i32::codec().decode(&JsonOps, &mut encoded).unwrap(), n);
    }

    #[test]
    fn i32_round_trips_under_binary(n: i32) {
        let bin_value = i32::codec().encode(&BinOps, &n).unwrap();
        let bytes = binary::encode_bytes(&bin_value).unwrap();
        let mut decoded_bin = binary::decode_bytes(&bytes).unwrap();
        prop_assert_eq!(i32::codec().decode(&BinOps, &mut decoded_bin).unwrap(), n);
    }

    #[test]
    fn string_round_trips_under_json_stream(s: String) {
        let json_value = String::codec().encode(&JsonOps, &s).unwrap();
        let text = json_stream::to_string(&json_value).unwrap();
        let mut streamed = json_stream::from_str(&text).unwrap();
        prop_assert_eq!(String::codec().decode(&JsonOps, &mut streamed).unwrap(), s);
    }

    #[test]
    fn vec_of_i32_round_trips_under_msgpack(values: Vec<i32>) {
        let encoded = i32::codec().list_of().encode(&MsgPackOps, &values).unwrap();
        let bytes = msgpack::encode_bytes(&encoded).unwrap();
        let mut decoded_value = msgpack::decode_bytes(&bytes).unwrap();
        let decoded = i32::codec().list_of().decode(&MsgPackOps, &mut decoded_value).unwrap();
        prop_assert_eq!(values, decoded);
    }
}
