use crate::{
    result::DataResult,
    serialization::{CodecOps, ListView, MapView},
};

/// A value of some format's wire type `T`, paired with the [`CodecOps`]
/// that knows how to interpret it. Lets callers poke at an already-decoded
/// or not-yet-encoded value without committing to a static Rust type —
/// the dynamic-type half of the static/dynamic split this crate is built
/// around.
pub struct Dynamic<'a, T, O: CodecOps<T>> {
    ops: O,
    value: &'a mut T,
}

impl<'a, T, O: CodecOps<T>> Dynamic<'a, T, O> {
    pub fn new(ops: O, value: &'a mut T) -> Dynamic<'a, T, O> {
        Dynamic { ops, value }
    }

    pub fn value(&self) -> &T {
        self.value
    }

    pub fn into_inner(self) -> &'a mut T {
        self.value
    }

    pub fn ops(&self) -> &O {
        &self.ops
    }

    pub fn mutate<F: FnOnce(&mut T)>(&mut self, f: F) {
        f(self.value);
    }

    pub fn as_number(&self) -> DataResult<f64> {
        self.ops.get_number(self.value)
    }

    pub fn as_string(&self) -> DataResult<String> {
        self.ops.get_string(self.value)
    }

    pub fn as_boolean(&self) -> DataResult<bool> {
        self.ops.get_boolean(self.value)
    }

    pub fn as_unit(&self) -> DataResult<()> {
        self.ops.get_unit(self.value)
    }

    pub fn as_map(&mut self) -> DataResult<impl MapView<T> + '_> {
        self.ops.get_map(self.value)
    }

    pub fn as_list(&mut self) -> DataResult<impl ListView<T> + '_> {
        self.ops.get_list(self.value)
    }
}
