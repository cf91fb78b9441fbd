use bytemuck::NoUninit;
use num_traits::{One, WrappingAdd, WrappingSub, Zero};

/// The number kinds a [`SynchronizedCounter`](crate::SynchronizedCounter) can hold.
///
/// The set is closed: it is implemented for `i8`, `i16`, `i32`, `i64`, `isize`, `u8`, `u16`,
/// `u32`, `u64`, `usize`, `f32` and `f64`.  `NoUninit` lets the value live in an
/// [`atomic::Atomic`] cell so that the relaxed read path never observes a torn value.
pub trait Countable:
    NoUninit
    + Zero
    + One
    + Copy
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + std::fmt::Debug
    + std::fmt::Display
    + 'static
{
    /// Add `rhs` to `self`.  Integers wrap around on overflow.  Floats follow IEEE addition.
    fn counter_add(self, rhs: Self) -> Self;
    /// Subtract `rhs` from `self`.  Integers wrap around on overflow.  Floats follow IEEE
    /// subtraction.
    fn counter_sub(self, rhs: Self) -> Self;
}

macro_rules! impl_countable_for_int {
    ($t: ty) => {
        impl Countable for $t {
            #[inline(always)]
            fn counter_add(self, rhs: Self) -> Self {
                WrappingAdd::wrapping_add(&self, &rhs)
            }
            #[inline(always)]
            fn counter_sub(self, rhs: Self) -> Self {
                WrappingSub::wrapping_sub(&self, &rhs)
            }
        }
    };
}
impl_countable_for_int!(i8);
impl_countable_for_int!(i16);
impl_countable_for_int!(i32);
impl_countable_for_int!(i64);
impl_countable_for_int!(isize);
impl_countable_for_int!(u8);
impl_countable_for_int!(u16);
impl_countable_for_int!(u32);
impl_countable_for_int!(u64);
impl_countable_for_int!(usize);

macro_rules! impl_countable_for_float {
    ($t: ty) => {
        impl Countable for $t {
            #[inline(always)]
            fn counter_add(self, rhs: Self) -> Self {
                self + rhs
            }
            #[inline(always)]
            fn counter_sub(self, rhs: Self) -> Self {
                self - rhs
            }
        }
    };
}
impl_countable_for_float!(f32);
impl_countable_for_float!(f64);

#[cfg(test)]
mod tests {
    use super::Countable;

    #[test]
    fn test_int_wraps_around() {
        assert_eq!(u8::MAX.counter_add(1), 0);
        assert_eq!(0u8.counter_sub(1), u8::MAX);
        assert_eq!(i32::MAX.counter_add(1), i32::MIN);
        assert_eq!(i64::MIN.counter_sub(1), i64::MAX);
        assert_eq!(0usize.counter_sub(3), usize::MAX - 2);
    }

    #[test]
    fn test_float_arithmetic() {
        assert_eq!(1.5f64.counter_add(2.25), 3.75);
        assert_eq!(1.5f32.counter_sub(2.0), -0.5);
        assert!(f64::INFINITY.counter_sub(f64::INFINITY).is_nan());
    }
}
