//! Scenario 6: a self-referential `Node { v: int, next: Node? }` chain,
//! built with `Codecs::recursive` so the codec can reference itself
//! before its own construction finishes.

use codectree::serialization::{json, json::JsonOps, Codec, CodecAdapters, Codecs, DefaultCodec, MapCodecBuilder};

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

fn node_codec() -> impl Codec<Node, json::JsonValue, JsonOps> {
    Codecs::recursive(|codec| {
        MapCodecBuilder::new()
            .field(i32::codec().field_of("v", |n: &Node| &n.v))
            .field(codec.boxed().optional_field_of("next", |n: &Node| &n.next))
            .build(Node::new)
    })
}

fn main() {
    env_logger::init();

    let chain = Node::new(1, Some(Box::new(Node::new(2, None))));
    let codec = node_codec();

    let mut encoded = codec.encode(&JsonOps, &chain).unwrap();
    println!("wire form: {encoded}");

    let decoded = codec.decode(&JsonOps, &mut encoded).unwrap();
    assert_eq!(decoded, chain);
    println!("round-trip ok: {decoded:?}");
}
