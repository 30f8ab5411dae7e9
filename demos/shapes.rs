//! Scenario 4: an abstract `Shape` with concrete `Circle`/`Square`
//! variants, serialized as a list under the JSON adapter. Each element
//! gets envelope-wrapped since no single variant is the "expected" type
//! of the list itself.

use codectree::serialization::{
    dispatch::{DynAny, PolyRegistry},
    json,
    json::JsonOps,
    CodecAdapters, CodecOps, DefaultCodec, DispatchCodec,
};

trait Shape: DynAny {
    fn area(&self) -> f64;
}

#[derive(Debug)]
struct Circle {
    radius: f64,
}

impl Shape for Circle {
    fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

#[derive(Debug)]
struct Square {
    side: f64,
}

impl Shape for Square {
    fn area(&self) -> f64 {
        self.side * self.side
    }
}

fn shape_codec() -> DispatchCodec<dyn Shape, json::JsonValue, JsonOps> {
    let registry = PolyRegistry::<dyn Shape, json::JsonValue, JsonOps>::new()
        .register::<Circle, _>(
            "circle",
            f64::codec().xmap(|r: &f64| Circle { radius: *r }, |c: &Circle| c.radius),
            |c| Box::new(c),
        )
        .register::<Square, _>(
            "square",
            f64::codec().xmap(|s: &f64| Square { side: *s }, |s: &Square| s.side),
            |s| Box::new(s),
        );
    DispatchCodec::new(registry, "circle", "@type", "@value")
}

fn main() {
    env_logger::init();

    let codec = shape_codec();
    let shapes: Vec<Box<dyn Shape>> = vec![Box::new(Circle { radius: 1.0 }), Box::new(Square { side: 2.0 })];

    let mut encoded = JsonOps.create_list(
        shapes
            .iter()
            .map(|shape| codec.encode(&JsonOps, shape.as_ref()).unwrap()),
    );
    println!("wire form: {encoded}");

    let mut decoded_shapes = Vec::new();
    let mut list = JsonOps.get_list(&mut encoded).unwrap();
    for index in 0..list.len() {
        decoded_shapes.push(codec.decode(&JsonOps, list.get(index).unwrap()).unwrap());
    }

    for shape in &decoded_shapes {
        println!("decoded area: {}", shape.area());
    }
}
