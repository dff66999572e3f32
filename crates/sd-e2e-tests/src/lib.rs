//! Test-only crate. The end-to-end suites live under `tests/` and wire
//! the gateway router, the bridge, and an in-process tool provider
//! together; there is no runtime code here.
