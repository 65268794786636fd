//! CLI surface specs: `xcore`, `xcore version`, `xcore --help`.

use crate::prelude::*;

#[test]
fn version_subcommand_prints_a_version_string() {
    let mut cmd = cli();
    cmd.arg("version");
    cmd.run().passes().stdout_has("xcore");
}

#[test]
fn version_flag_prints_a_version_string() {
    let mut cmd = cli();
    cmd.arg("--version");
    cmd.run().passes().stdout_has("xcore");
}

#[test]
fn help_flag_shows_usage() {
    let mut cmd = cli();
    cmd.arg("--help");
    cmd.run().passes().stdout_has("USAGE");
}
