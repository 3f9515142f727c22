// Unit tests that exercise public APIs from outside the crate, mirroring
// the layering of the inline `#[cfg(test)]` modules but against fixtures
// that are easier to express as real files on disk.

mod unit {
    mod config_test;
    mod dependency_resolver_test;
}
