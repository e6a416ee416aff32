//! Check primitives backing `check_eq!` and `check!`
//!
//! The macros expand inline so their messages carry the stringified
//! expressions. The functions here are the composable form: they return an
//! [`Outcome`] and record the caller's location, so a body can chain them
//! with `?`.

use crate::failure::{Failure, Outcome, SourceLocation};

/// Values a truthiness check accepts: `false`, zero, `None` and null pointers
/// are not true.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

macro_rules! impl_truthy_nonzero {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Truthy for $ty {
                fn is_truthy(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

impl_truthy_nonzero!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Truthy for f32 {
    fn is_truthy(&self) -> bool {
        *self != 0.0
    }
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0
    }
}

impl<T> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}

impl<T: ?Sized> Truthy for *const T {
    fn is_truthy(&self) -> bool {
        !self.is_null()
    }
}

impl<T: ?Sized> Truthy for *mut T {
    fn is_truthy(&self) -> bool {
        !self.is_null()
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T: Truthy + ?Sized> Truthy for &mut T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

/// Fail with `message` unless `left == right`
#[track_caller]
pub fn ensure_eq<L, R>(left: &L, right: &R, message: &'static str) -> Outcome
where
    L: PartialEq<R> + ?Sized,
    R: ?Sized,
{
    if left == right {
        Ok(())
    } else {
        Err(Failure::new(message, SourceLocation::caller()))
    }
}

/// Fail with `message` unless `value` is truthy
#[track_caller]
pub fn ensure<T: Truthy + ?Sized>(value: &T, message: &'static str) -> Outcome {
    if value.is_truthy() {
        Ok(())
    } else {
        Err(Failure::new(message, SourceLocation::caller()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true, true)]
    #[case(false, false)]
    fn test_bool_truthiness(#[case] value: bool, #[case] expected: bool) {
        assert_eq!(value.is_truthy(), expected);
    }

    #[test]
    fn test_zero_is_not_true() {
        assert!(!0i32.is_truthy());
        assert!(!0u8.is_truthy());
        assert!(!0.0f64.is_truthy());
        assert!((-1i64).is_truthy());
        assert!(7usize.is_truthy());
        assert!(0.5f32.is_truthy());
    }

    #[test]
    fn test_option_and_pointer_truthiness() {
        assert!(Some(0).is_truthy());
        assert!(!None::<u8>.is_truthy());

        let value = 5;
        let ptr: *const i32 = &value;
        assert!(ptr.is_truthy());
        assert!(!std::ptr::null::<i32>().is_truthy());
        assert!(!std::ptr::null_mut::<i32>().is_truthy());
    }

    #[test]
    fn test_references_forward() {
        let flag = true;
        let nested = &&flag;
        assert!(nested.is_truthy());
        assert!(!(&0u32).is_truthy());
    }

    #[test]
    fn test_ensure_eq_records_caller() {
        assert!(ensure_eq(&2, &2, "2 != 2").is_ok());

        let failure = ensure_eq(&(1 + 1), &3, "1 + 1 != 3").unwrap_err();
        assert_eq!(failure.message(), "1 + 1 != 3");
        assert_eq!(failure.location().line, line!() - 2);
        assert!(failure.location().file.ends_with("check.rs"));
    }

    #[test]
    fn test_ensure_eq_unsized() {
        assert!(ensure_eq("abc", "abc", "\"abc\" != \"abc\"").is_ok());
        assert!(ensure_eq(&[1, 2][..], &[1, 3][..], "slices differ").is_err());
    }

    #[test]
    fn test_ensure_chains_with_question_mark() {
        fn body() -> Outcome {
            ensure(&true, "true is not true")?;
            ensure(&0u8, "0u8 is not true")?;
            ensure(&true, "unreachable")
        }

        let failure = body().unwrap_err();
        assert_eq!(failure.message(), "0u8 is not true");
    }
}
