//! Scenario 2: a `Container { value: Object }` wrapping a string under a
//! statically-unknown `Object` type. Since no variant is ever "the
//! expected type" of an `Object` field, every value gets envelope-wrapped
//! with its dynamic type name.

use codectree::serialization::{
    dispatch::{DynAny, PolyRegistry},
    json,
    json::JsonOps,
    CodecOps, DefaultCodec, DispatchCodec,
};

trait Object: DynAny + std::fmt::Debug {}

impl Object for String {}

struct Container {
    value: Box<dyn Object>,
}

fn object_codec() -> DispatchCodec<dyn Object, json::JsonValue, JsonOps> {
    let registry = PolyRegistry::<dyn Object, json::JsonValue, JsonOps>::new().register::<String, _>(
        "string",
        String::codec(),
        |s| Box::new(s),
    );
    DispatchCodec::new(registry, "<no static expectation>", "@type", "@value")
}

fn container_codec(
    object_codec: DispatchCodec<dyn Object, json::JsonValue, JsonOps>,
) -> impl Fn(&JsonOps, &Container) -> codectree::DataResult<json::JsonValue> {
    move |ops, container| {
        let encoded_value = object_codec.encode(ops, container.value.as_ref())?;
        Ok(ops.create_map([("value".to_string(), encoded_value)]))
    }
}

fn main() {
    env_logger::init();

    let container = Container {
        value: Box::new("hi".to_string()),
    };
    let object_codec = object_codec();

    let encoded = container_codec(object_codec)(&JsonOps, &container).unwrap();
    println!("wire form: {encoded}");
    assert_eq!(encoded["value"]["@type"], "string");
    assert_eq!(encoded["value"]["@value"], "hi");
}
