//! Declaration surface: `test_case!`, `check_eq!`, `check!`
//!
//! Each macro has two definitions. Which one is exported is decided when this
//! crate is compiled, so every caller sees the mode selected by the
//! `tests-active` feature regardless of its own features.

/// Declare a test case next to the code it exercises
///
/// ```
/// selftest::test_case!(addition_wraps {
///     selftest::check_eq!(250u8.wrapping_add(10), 4);
/// });
/// ```
///
/// The body runs with `return`-style early exit: a failing check ends the
/// body. It may also use `?` on any [`Outcome`](crate::Outcome), and may end
/// with one, in which case that value is the case's result.
#[cfg(feature = "tests-active")]
#[macro_export]
macro_rules! test_case {
    ($name:ident $body:block) => {
        const _: () = {
            #[allow(unknown_lints, dependency_on_unit_never_type_fallback, unreachable_code, clippy::unit_arg)]
            fn __selftest_body() -> $crate::Outcome {
                $crate::__private::IntoOutcome::into_outcome($body)
            }

            $crate::__private::inventory::submit! {
                $crate::TestCase::new(
                    ::core::stringify!($name),
                    ::core::file!(),
                    ::core::line!(),
                    __selftest_body,
                )
            }
        };
    };
}

/// Declare a test case next to the code it exercises
///
/// Tests are stripped in this build: the body is type-checked but never
/// registered or called.
#[cfg(not(feature = "tests-active"))]
#[macro_export]
macro_rules! test_case {
    ($name:ident $body:block) => {
        const _: () = {
            #[allow(unknown_lints, dependency_on_unit_never_type_fallback, dead_code, unreachable_code, clippy::unit_arg)]
            fn __selftest_body() -> $crate::Outcome {
                $crate::__private::IntoOutcome::into_outcome($body)
            }
        };
    };
}

/// End the current test case with a failure unless both sides are equal
///
/// The failure message is the source text `left != right`.
#[cfg(feature = "tests-active")]
#[macro_export]
macro_rules! check_eq {
    ($left:expr, $right:expr $(,)?) => {
        match (&$left, &$right) {
            (left, right) => {
                if !(*left == *right) {
                    return ::core::result::Result::Err(::core::convert::From::from(
                        $crate::Failure::new(
                            ::core::concat!(
                                ::core::stringify!($left),
                                " != ",
                                ::core::stringify!($right)
                            ),
                            $crate::SourceLocation::new(::core::file!(), ::core::line!()),
                        ),
                    ));
                }
            }
        }
    };
}

/// Evaluates both sides; tests are stripped in this build
#[cfg(not(feature = "tests-active"))]
#[macro_export]
macro_rules! check_eq {
    ($left:expr, $right:expr $(,)?) => {
        match (&$left, &$right) {
            (left, right) => {
                let _ = *left == *right;
            }
        }
    };
}

/// End the current test case with a failure unless the value is truthy
///
/// `false`, zero, `None` and null pointers fail with `value is not true`.
#[cfg(feature = "tests-active")]
#[macro_export]
macro_rules! check {
    ($value:expr $(,)?) => {
        if !$crate::Truthy::is_truthy(&$value) {
            return ::core::result::Result::Err(::core::convert::From::from(
                $crate::Failure::new(
                    ::core::concat!(::core::stringify!($value), " is not true"),
                    $crate::SourceLocation::new(::core::file!(), ::core::line!()),
                ),
            ));
        }
    };
}

/// Evaluates the value; tests are stripped in this build
#[cfg(not(feature = "tests-active"))]
#[macro_export]
macro_rules! check {
    ($value:expr $(,)?) => {{
        let _ = $crate::Truthy::is_truthy(&$value);
    }};
}
