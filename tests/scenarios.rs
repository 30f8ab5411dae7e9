//! The concrete end-to-end scenarios from §8. Scenario 5 (a subclass
//! field shadowing a superclass field of the same name) has no Rust
//! analogue — Rust structs don't have field inheritance — so it's
//! omitted; see DESIGN.md's resolved open questions.

use codectree::serialization::{
    dispatch::{DynAny, PolyRegistry},
    json,
    json::JsonOps,
    Codec, CodecAdapters, CodecOps, Codecs, DefaultCodec, DispatchCodec, MapCodecBuilder,
};

// Scenario 1: primitive round-trip.
#[test]
fn scenario_1_primitive_round_trip() {
    let encoded = i32::codec().encode(&JsonOps, &42).unwrap();
    assert_eq!(encoded.to_string(), "42");

    let mut encoded = encoded;
    assert_eq!(i32::codec().decode(&JsonOps, &mut encoded).unwrap(), 42);
}

// Scenario 2: Box<T> wrapping a string under static type Box<Object>.
#[test]
fn scenario_2_optional_style_object() {
    trait Object: DynAny {}
    impl Object for String {}

    let registry = PolyRegistry::<dyn Object, json::JsonValue, JsonOps>::new().register::<String, _>(
        "string",
        String::codec(),
        |s| Box::new(s),
    );
    let object_codec = DispatchCodec::new(registry, "<never matches>", "@type", "@value");

    let value: Box<dyn Object> = Box::new("hi".to_string());
    let encoded_value = object_codec.encode(&JsonOps, value.as_ref()).unwrap();
    let wrapper = JsonOps.create_map([("value".to_string(), encoded_value)]);

    assert_eq!(wrapper["value"]["@type"], "string");
    assert_eq!(wrapper["value"]["@value"], "hi");

    let mut wrapper = wrapper;
    let mut map = JsonOps.get_map(&mut wrapper).unwrap();
    let decoded = object_codec.decode(&JsonOps, map.get("value").unwrap()).unwrap();
    assert_eq!(decoded.as_any().downcast_ref::<String>().unwrap(), "hi");
}

// Scenario 3: a map with non-string (integer) keys.
#[test]
fn scenario_3_map_with_integer_keys() {
    let codec = Codecs::map(i32::codec(), String::codec(), "@key", "@value");

    let mut map = std::collections::HashMap::new();
    map.insert(1, "a".to_string());
    map.insert(2, "b".to_string());

    let mut encoded = codec.encode(&JsonOps, &map).unwrap();
    assert!(encoded.is_array());
    assert_eq!(JsonOps.get_list(&mut encoded).unwrap().len(), 2);

    let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();
    assert_eq!(map, decoded);
}

// Scenario 4: inheritance dispatch over a `List<Shape>`.
#[test]
fn scenario_4_inheritance_dispatch() {
    trait Shape: DynAny {
        fn area(&self) -> f64;
    }

    #[derive(Debug)]
    struct Circle {
        r: f64,
    }
    impl Shape for Circle {
        fn area(&self) -> f64 {
            std::f64::consts::PI * self.r * self.r
        }
    }

    #[derive(Debug)]
    struct Square {
        s: f64,
    }
    impl Shape for Square {
        fn area(&self) -> f64 {
            self.s * self.s
        }
    }

    let registry = PolyRegistry::<dyn Shape, json::JsonValue, JsonOps>::new()
        .register::<Circle, _>("circle", f64::codec().xmap(|r: &f64| Circle { r: *r }, |c: &Circle| c.r), |c| {
            Box::new(c)
        })
        .register::<Square, _>("square", f64::codec().xmap(|s: &f64| Square { s: *s }, |s: &Square| s.s), |s| {
            Box::new(s)
        });
    let codec = DispatchCodec::new(registry, "<never matches>", "@type", "@value");

    let shapes: Vec<Box<dyn Shape>> = vec![Box::new(Circle { r: 1.0 }), Box::new(Square { s: 2.0 })];

    let mut encoded = JsonOps.create_list(
        shapes
            .iter()
            .map(|shape| codec.encode(&JsonOps, shape.as_ref()).unwrap()),
    );
    let mut list = JsonOps.get_list(&mut encoded).unwrap();
    assert!(list.get(0).unwrap().is_object());
    assert!(list.get(1).unwrap().is_object());

    let mut decoded = Vec::new();
    for index in 0..list.len() {
        decoded.push(codec.decode(&JsonOps, list.get(index).unwrap()).unwrap());
    }
    assert_eq!(decoded[0].area(), shapes[0].area());
    assert_eq!(decoded[1].area(), shapes[1].area());
}

// Scenario 6: a cycle in the codec graph (not the value graph).
#[test]
fn scenario_6_cycle_in_codec_graph() {
    #[derive(Clone, Debug, PartialEq)]
    struct Node {
        v: i32,
        next: Option<Box<Node>>,
    }
    impl Node {
        fn new(v: i32, next: Option<Box<Node>>) -> Node {
            Node { v, next }
        }
    }

    let codec = Codecs::recursive(|codec| {
        MapCodecBuilder::new()
            .field(i32::codec().field_of("v", |n: &Node| &n.v))
            .field(codec.boxed().optional_field_of("next", |n: &Node| &n.next))
            .build(Node::new)
    });

    let chain = Node::new(1, Some(Box::new(Node::new(2, None))));
    let mut encoded = codec.encode(&JsonOps, &chain).unwrap();
    let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();
    assert_eq!(decoded, chain);
}
