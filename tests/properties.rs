//! The remaining testable properties from §8 not already covered by
//! `scenarios.rs`/`round_trip.rs`: idempotent registration, field order
//! stability, unknown-field skip, and envelope discrimination.

use codectree::{
    serialization::{json, json::JsonOps, Codec, CodecAdapters, CodecOps, DefaultCodec, MapCodecBuilder},
    CodecCore,
};

#[test]
fn idempotent_registration_does_not_invalidate_a_dependent_codec() {
    let core: CodecCore<json::JsonValue, JsonOps> = CodecCore::new();
    core.register_codec::<i32, _>("count", i32::codec());

    // a codec built against the registry in between the two registrations
    let forward = core.forwarding_codec::<i32>("count");
    let mut encoded = forward.encode(&JsonOps, &7).unwrap();
    assert_eq!(forward.decode(&JsonOps, &mut encoded).unwrap(), 7);

    // registering the same name again must not disturb the existing binding
    core.register_codec::<i32, _>("count", i32::codec());
    let mut encoded = forward.encode(&JsonOps, &7).unwrap();
    assert_eq!(forward.decode(&JsonOps, &mut encoded).unwrap(), 7);
}

#[derive(Clone, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
    label: String,
}

fn point_codec() -> impl Codec<Point, json::JsonValue, JsonOps> {
    MapCodecBuilder::new()
        .field(i32::codec().field_of("x", |p: &Point| &p.x))
        .field(i32::codec().field_of("y", |p: &Point| &p.y))
        .field(String::codec().field_of("label", |p: &Point| &p.label))
        .build(|x, y, label| Point { x, y, label })
}

#[test]
fn field_order_is_declaration_order() {
    let point = Point {
        x: 1,
        y: 2,
        label: "origin".to_string(),
    };
    let mut encoded = point_codec().encode(&JsonOps, &point).unwrap();
    let map = JsonOps.get_map(&mut encoded).unwrap();
    assert_eq!(map.keys(), vec!["x".to_string(), "y".to_string(), "label".to_string()]);
}

#[test]
fn unknown_field_between_known_ones_is_skipped_on_decode() {
    let point = Point {
        x: 1,
        y: 2,
        label: "origin".to_string(),
    };
    let mut encoded = point_codec().encode(&JsonOps, &point).unwrap();
    {
        let mut map = JsonOps.get_map(&mut encoded).unwrap();
        map.set("extra", JsonOps.create_string("unused"));
    }

    let decoded = point_codec().decode(&JsonOps, &mut encoded).unwrap();
    assert_eq!(decoded, point);
}

#[test]
fn strict_decode_rejects_an_object_carrying_an_unclaimed_key() {
    use codectree::{config::Config, result::DataError};

    let strict_codec = MapCodecBuilder::new()
        .field(i32::codec().field_of("x", |p: &Point| &p.x))
        .field(i32::codec().field_of("y", |p: &Point| &p.y))
        .field(String::codec().field_of("label", |p: &Point| &p.label))
        .build_with_config(
            |x, y, label| Point { x, y, label },
            Config::new().with_fail_on_unknown_fields(true),
        );

    let point = Point {
        x: 1,
        y: 2,
        label: "origin".to_string(),
    };
    let mut encoded = point_codec().encode(&JsonOps, &point).unwrap();
    {
        let mut map = JsonOps.get_map(&mut encoded).unwrap();
        map.set("extra", JsonOps.create_string("unused"));
    }

    let err = strict_codec.decode(&JsonOps, &mut encoded).unwrap_err();
    assert_eq!(err, DataError::unknown_field("extra"));
}

#[test]
fn object_with_type_field_but_no_value_field_is_not_an_envelope() {
    use codectree::serialization::MapView;

    let mut value = JsonOps.create_map([
        ("@type".to_string(), JsonOps.create_string("not-a-discriminator")),
        ("other".to_string(), JsonOps.create_number(&1.0)),
    ]);
    let map = JsonOps.get_map(&mut value).unwrap();
    assert!(!map.has_exactly_keys(&["@type", "@value"]));
}
