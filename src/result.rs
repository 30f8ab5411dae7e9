/// The error taxonomy a codec invocation can fail with.
///
/// A codec never fails silently: it either finishes the structural unit it
/// started (object/array/scalar) or returns one of these variants. `path`
/// is filled in as the error crosses object/list boundaries on its way back
/// out, so the outermost caller sees a breadcrumb even though each codec
/// only knows its own local field/index.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("key {key:?} not found in map{}", fmt_path(.path))]
    KeyNotFoundInMap { key: String, path: Vec<String> },

    #[error("list index {index} out of bounds (len {len}){}", fmt_path(.path))]
    ListIndexOutOfBounds {
        index: usize,
        len: usize,
        path: Vec<String>,
    },

    #[error("expected {expected}, found {found}{}", fmt_path(.path))]
    WrongShape {
        expected: &'static str,
        found: &'static str,
        path: Vec<String>,
    },

    #[error("unknown type {name:?}; did you forget to register a codec for it?{}", fmt_path(.path))]
    UnknownType { name: String, path: Vec<String> },

    #[error("unknown field {name:?}; no field in this record claims it{}", fmt_path(.path))]
    UnknownField { name: String, path: Vec<String> },

    #[error("{constant:?} is not a constant of enum {enum_name}{}", fmt_path(.path))]
    UnknownEnumConstant {
        enum_name: &'static str,
        constant: String,
        path: Vec<String>,
    },

    #[error("no constructor registered for type {name:?}{}", fmt_path(.path))]
    MissingConstructor { name: String, path: Vec<String> },

    #[error("malformed scalar: {message}{}", fmt_path(.path))]
    MalformedScalar { message: String, path: Vec<String> },

    #[error("structural mismatch: {message}{}", fmt_path(.path))]
    StructuralMismatch { message: String, path: Vec<String> },

    #[error("{message}{}", fmt_path(.path))]
    Custom { message: String, path: Vec<String> },
}

fn fmt_path(path: &[String]) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" (at {})", path.join("."))
    }
}

impl DataError {
    pub fn key_not_found(key: impl Into<String>) -> Self {
        DataError::KeyNotFoundInMap {
            key: key.into(),
            path: Vec::new(),
        }
    }

    pub fn list_index_out_of_bounds(index: usize, len: usize) -> Self {
        DataError::ListIndexOutOfBounds {
            index,
            len,
            path: Vec::new(),
        }
    }

    pub fn wrong_shape(expected: &'static str, found: &'static str) -> Self {
        DataError::WrongShape {
            expected,
            found,
            path: Vec::new(),
        }
    }

    pub fn unknown_type(name: impl Into<String>) -> Self {
        DataError::UnknownType {
            name: name.into(),
            path: Vec::new(),
        }
    }

    pub fn unknown_field(name: impl Into<String>) -> Self {
        DataError::UnknownField {
            name: name.into(),
            path: Vec::new(),
        }
    }

    pub fn unknown_enum_constant(enum_name: &'static str, constant: impl Into<String>) -> Self {
        DataError::UnknownEnumConstant {
            enum_name,
            constant: constant.into(),
            path: Vec::new(),
        }
    }

    pub fn missing_constructor(name: impl Into<String>) -> Self {
        DataError::MissingConstructor {
            name: name.into(),
            path: Vec::new(),
        }
    }

    pub fn malformed_scalar(message: impl Into<String>) -> Self {
        DataError::MalformedScalar {
            message: message.into(),
            path: Vec::new(),
        }
    }

    pub fn structural_mismatch(message: impl Into<String>) -> Self {
        DataError::StructuralMismatch {
            message: message.into(),
            path: Vec::new(),
        }
    }

    pub fn new_custom(message: impl Into<String>) -> Self {
        DataError::Custom {
            message: message.into(),
            path: Vec::new(),
        }
    }

    /// Prepends a path segment, innermost-first, as the error unwinds
    /// through nested objects/lists. Used by [`MapView`]/[`ListView`]
    /// callers, not by leaf codecs.
    ///
    /// [`MapView`]: crate::serialization::MapView
    /// [`ListView`]: crate::serialization::ListView
    #[must_use]
    pub fn with_path_segment(mut self, segment: impl Into<String>) -> Self {
        let path = match &mut self {
            DataError::KeyNotFoundInMap { path, .. }
            | DataError::ListIndexOutOfBounds { path, .. }
            | DataError::WrongShape { path, .. }
            | DataError::UnknownType { path, .. }
            | DataError::UnknownField { path, .. }
            | DataError::UnknownEnumConstant { path, .. }
            | DataError::MissingConstructor { path, .. }
            | DataError::MalformedScalar { path, .. }
            | DataError::StructuralMismatch { path, .. }
            | DataError::Custom { path, .. } => path,
        };
        path.insert(0, segment.into());
        self
    }
}

pub type DataResult<T> = Result<T, DataError>;

/// Alias used at the public façade, where callers don't care about the
/// distinction between a codec error and anything else.
pub type CodecResult<T> = DataResult<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_accumulate_innermost_first() {
        let err = DataError::key_not_found("volume")
            .with_path_segment("settings")
            .with_path_segment("config");
        assert_eq!(err.to_string(), "key \"volume\" not found in map (at config.settings)");
    }
}
