/// Pure, order-independent element-wise operation. Workers apply it to their
/// local buffer; the master applies it directly to the fallback suffix. The
/// protocol makes no assumption about the operation beyond purity.
pub trait Transform: Send + Sync + 'static {
    fn apply(&self, value: i64) -> i64;

    fn apply_in_place(&self, values: &mut [i64]) {
        for value in values.iter_mut() {
            *value = self.apply(*value);
        }
    }
}

/// The stock transform: add one to every element.
pub struct Increment;

impl Transform for Increment {
    fn apply(&self, value: i64) -> i64 {
        value + 1
    }
}
