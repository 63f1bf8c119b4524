//! Test-only crate; scenarios live under `tests/`.
