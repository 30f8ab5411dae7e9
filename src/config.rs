//! Runtime-tunable names and behaviour for the codec core (§1, §6).
//!
//! Plain struct, `Clone` + `Default`, `with_*` builder methods — the same
//! shape the teacher reaches for instead of pulling in a configuration
//! crate for a handful of fields.

/// Field names and decode strictness shared across a [`crate::CodecCore`].
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Key used for the discriminator field in dynamic-type envelopes
    /// (§4.F) — `{type_field_name: "...", value_field_name: ...}`.
    pub type_field_name: String,
    /// Key used for the payload field in dynamic-type envelopes.
    pub value_field_name: String,
    /// Key used for the key slot of each pair in [`crate::serialization::MapCodec`]'s
    /// array-of-pairs realisation of non-string-keyed maps.
    pub map_key_field_name: String,
    /// Key used for the value slot of each pair in the same realisation.
    pub map_value_field_name: String,
    /// Whether record decode should reject input objects that carry keys
    /// none of the record's fields claimed. Consulted by
    /// [`crate::serialization::MapCodecBuilder`]'s generated record codecs
    /// when built via `build_with_config` (see DESIGN.md); codecs built
    /// through plain `build` stay tolerant, matching this field's default.
    pub fail_on_unknown_fields: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            type_field_name: "@type".to_string(),
            value_field_name: "@value".to_string(),
            map_key_field_name: "@key".to_string(),
            map_value_field_name: "@value".to_string(),
            fail_on_unknown_fields: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type_field_name(mut self, name: impl Into<String>) -> Self {
        self.type_field_name = name.into();
        self
    }

    pub fn with_value_field_name(mut self, name: impl Into<String>) -> Self {
        self.value_field_name = name.into();
        self
    }

    pub fn with_map_key_field_name(mut self, name: impl Into<String>) -> Self {
        self.map_key_field_name = name.into();
        self
    }

    pub fn with_map_value_field_name(mut self, name: impl Into<String>) -> Self {
        self.map_value_field_name = name.into();
        self
    }

    pub fn with_fail_on_unknown_fields(mut self, fail: bool) -> Self {
        self.fail_on_unknown_fields = fail;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_dynamic_dispatch_defaults() {
        let config = Config::default();
        assert_eq!(config.type_field_name, "@type");
        assert_eq!(config.value_field_name, "@value");
        assert!(!config.fail_on_unknown_fields);
    }

    #[test]
    fn builder_methods_override_individually() {
        let config = Config::new()
            .with_type_field_name("kind")
            .with_fail_on_unknown_fields(true);
        assert_eq!(config.type_field_name, "kind");
        assert_eq!(config.value_field_name, "@value");
        assert!(config.fail_on_unknown_fields);
    }
}
