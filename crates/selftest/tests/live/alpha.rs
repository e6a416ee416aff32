//! First source file of the two-file scenario

selftest::test_case!(add_ok {
    selftest::check_eq!(1 + 1, 2);
});

selftest::test_case!(add_bad {
    selftest::check_eq!(1 + 1, 3);
});

/// Line of the failing check above
pub const ADD_BAD_CHECK_LINE: u32 = 8;
