/// Generates a [`crate::serialization::DefaultCodec`] impl for a
/// fieldless enum, encoding each variant to its name and failing decode
/// with [`crate::result::DataError::unknown_enum_constant`] on no match.
///
/// Rust has no runtime enumeration of variant names, so this stands in for
/// the reflective `TypeDescriptor` the enum codec factory (§4.D) assumes —
/// the caller spells out the variant list once, here, instead of the
/// codec walking them at runtime.
///
/// ```ignore
/// enum_codec!(Direction { North, South, East, West });
/// ```
#[macro_export]
macro_rules! enum_codec {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        impl<OT, O: $crate::serialization::CodecOps<OT>> $crate::serialization::DefaultCodec<OT, O> for $name {
            fn codec() -> impl $crate::serialization::Codec<Self, OT, O> {
                struct GeneratedEnumCodec;

                impl<OT, O: $crate::serialization::CodecOps<OT>> $crate::serialization::Codec<$name, OT, O> for GeneratedEnumCodec {
                    fn encode(&self, ops: &O, value: &$name) -> $crate::result::DataResult<OT> {
                        let name = match value {
                            $($name::$variant => stringify!($variant),)+
                        };
                        Ok(ops.create_string(name))
                    }

                    fn decode(&self, ops: &O, value: &mut OT) -> $crate::result::DataResult<$name> {
                        let found = ops.get_string(value)?;
                        match found.as_str() {
                            $(stringify!($variant) => Ok($name::$variant),)+
                            other => Err($crate::result::DataError::unknown_enum_constant(
                                stringify!($name),
                                other,
                            )),
                        }
                    }
                }

                GeneratedEnumCodec
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::serialization::{json::JsonOps, Codec, DefaultCodec};

    #[derive(Debug, PartialEq, Clone, Copy)]
    enum Direction {
        North,
        South,
        East,
        West,
    }

    enum_codec!(Direction { North, South, East, West });

    #[test]
    fn round_trips_known_variant() {
        let mut encoded = Direction::codec().encode(&JsonOps, &Direction::East).unwrap();
        let decoded = Direction::codec().decode(&JsonOps, &mut encoded).unwrap();
        assert_eq!(decoded, Direction::East);
    }

    #[test]
    fn rejects_unknown_variant_name() {
        use crate::serialization::CodecOps;

        let mut encoded = JsonOps.create_string("Northwest");
        assert!(Direction::codec().decode(&JsonOps, &mut encoded).is_err());
    }
}
