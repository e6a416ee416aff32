//! Second source file of the two-file scenario

fn feature_enabled() -> bool {
    true
}

selftest::test_case!(flag_is_set {
    selftest::check!(feature_enabled());
});
