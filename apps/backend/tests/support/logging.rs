//! Installs test logging once per integration test binary.
//! Set `TEST_LOG=debug` to see session and game traces.

#[ctor::ctor]
fn _auto_init_for_integration_tests() {
    backend_test_support::logging::init();
}
