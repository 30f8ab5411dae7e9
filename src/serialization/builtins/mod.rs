pub(crate) mod codecs;
pub mod enum_codec;
pub mod record_builder;
pub(crate) mod records;
