//! CLI error handling specs.

use crate::prelude::*;

#[test]
fn unknown_argument_fails_with_usage_hint() {
    let mut cmd = cli();
    cmd.arg("--bogus");
    cmd.run().fails().stderr_has("Usage: xcore");
}
