//! Tests for configuration argument handling.

use super::*;
use rstest::rstest;

fn os_args(args: &[&str]) -> Vec<OsString> {
    args.iter().map(OsString::from).collect()
}

#[rstest]
#[case("--log-filter=debug", ArgumentRole::Config { needs_value: false })]
#[case("--log-filter", ArgumentRole::Config { needs_value: true })]
#[case("--interpreter-directory", ArgumentRole::Config { needs_value: true })]
#[case("--catalog", ArgumentRole::Command)]
#[case("plugins.json", ArgumentRole::Command)]
#[case("--", ArgumentRole::Terminator)]
fn arguments_are_classified(#[case] argument: &str, #[case] expected: ArgumentRole) {
    assert_eq!(classify_argument(OsStr::new(argument)), expected);
}

#[rstest]
fn config_flags_are_routed_regardless_of_position() {
    let args = os_args(&[
        "polyload",
        "--catalog",
        "plugins.json",
        "--log-format",
        "compact",
        "--query",
        "calc",
        "1+1",
        "--interpreter-directory=/opt/python",
    ]);

    let partition = partition_arguments(&args);

    assert_eq!(
        partition.config_arguments,
        os_args(&[
            "polyload",
            "--log-format",
            "compact",
            "--interpreter-directory=/opt/python",
        ])
    );
    assert_eq!(
        partition.cli_arguments,
        os_args(&["polyload", "--catalog", "plugins.json", "--query", "calc", "1+1"])
    );
}

#[rstest]
fn arguments_after_terminator_stay_with_the_command() {
    let args = os_args(&["polyload", "--catalog", "c.json", "--", "--log-filter"]);

    let partition = partition_arguments(&args);

    assert_eq!(partition.config_arguments, os_args(&["polyload"]));
    assert_eq!(
        partition.cli_arguments,
        os_args(&["polyload", "--catalog", "c.json", "--", "--log-filter"])
    );
}

#[rstest]
fn trailing_flag_without_value_is_passed_through() {
    let args = os_args(&["polyload", "--log-filter"]);

    let partition = partition_arguments(&args);

    assert_eq!(partition.config_arguments, os_args(&["polyload", "--log-filter"]));
    assert_eq!(partition.cli_arguments, os_args(&["polyload"]));
}

#[rstest]
fn empty_arguments_produce_empty_partition() {
    assert_eq!(partition_arguments(&[]), ArgumentPartition::default());
}
