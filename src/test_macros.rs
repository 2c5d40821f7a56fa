//! Declarative macros for generating command tests.
//!
//! This module provides macros to reduce boilerplate in CLI parsing, execute
//! and output tests.
//! Instead of writing repetitive test functions, you can declare the test cases
//! and let the macro generate the actual test code.

/// Generate a test for default values when a command is invoked with minimal args.
#[macro_export]
macro_rules! cli_defaults_test {
    (
        command: $cmd:literal,
        variant: $variant:ident,
        required_args: [$($req_arg:literal),*],
        defaults: {
            $($def_field:ident : $def_expected:expr),* $(,)?
        } $(,)?
    ) => {
        #[rstest]
        fn test_defaults() {
            let args = Args::try_parse_from(["query_agent", $cmd, $($req_arg),*]).unwrap();
            match args.command {
                crate::commands::Command::$variant(cmd) => {
                    $(
                        assert_eq!(cmd.$def_field, $def_expected,
                            concat!("Default value mismatch for field: ", stringify!($def_field)));
                    )*
                }
                _ => panic!(concat!("Expected ", stringify!($variant), " command")),
            }
        }
    };
}

/// Generate a single CLI option test.
#[macro_export]
macro_rules! cli_option_test {
    (
        command: $cmd:literal,
        variant: $variant:ident,
        test_name: $test_name:ident,
        args: [$($arg:literal),+],
        field: $field:ident,
        expected: $expected:expr $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let args = Args::try_parse_from([
                "query_agent",
                $cmd,
                $($arg),+
            ]).unwrap();
            match args.command {
                crate::commands::Command::$variant(cmd) => {
                    assert_eq!(cmd.$field, $expected,
                        concat!("Field ", stringify!($field), " mismatch"));
                }
                _ => panic!(concat!("Expected ", stringify!($variant), " command")),
            }
        }
    };
}

/// Generate a test that verifies a command requires a specific argument.
///
/// # Example
///
/// ```ignore
/// cli_required_arg_test! {
///     command: "exec",
///     test_name: test_exec_requires_sql,
///     required_arg: "--sql",
/// }
/// ```
#[macro_export]
macro_rules! cli_required_arg_test {
    (
        command: $cmd:literal,
        test_name: $test_name:ident,
        required_arg: $arg:literal $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let result = Args::try_parse_from(["query_agent", $cmd]);
            assert!(result.is_err(), concat!("Command should require ", $arg));
            assert!(
                result.unwrap_err().to_string().contains($arg),
                concat!("Error should mention ", $arg)
            );
        }
    };
}

/// Generate a test that verifies parsing fails with specific invalid args.
///
/// # Example
///
/// ```ignore
/// cli_error_test! {
///     command: "ask",
///     test_name: test_ask_rejects_unknown_strategy,
///     args: ["catchments", "--strategy", "swarm"],
/// }
/// ```
#[macro_export]
macro_rules! cli_error_test {
    (
        command: $cmd:literal,
        test_name: $test_name:ident,
        args: [$($arg:literal),+] $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let result = Args::try_parse_from([
                "query_agent",
                $cmd,
                $($arg),+
            ]);
            assert!(result.is_err());
        }
    };
}

// =============================================================================
// Execute Test Macros
// =============================================================================

/// Generate a test that runs a command against an agent fixture.
///
/// The fixture must yield a `QueryAgent`; `assertions` receives the
/// command's output by value.
///
/// # Example
///
/// ```ignore
/// execute_test! {
///     test_name: test_exec_zero_rows,
///     fixture: country_agent,
///     cmd: ExecCmd { sql: "SELECT 1 WHERE false".to_string() },
///     assertions: |result| {
///         assert_eq!(result.result.row_count, 0);
///     },
/// }
/// ```
#[macro_export]
macro_rules! execute_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        cmd: $cmd:expr,
        assertions: |$result:ident| $body:block $(,)?
    ) => {
        #[rstest]
        fn $test_name(mut $fixture: crate::agent::QueryAgent) {
            use crate::commands::Execute;
            let $result = $cmd.execute(&mut $fixture).expect("Execute should succeed");
            $body
        }
    };
}

/// Generate a test that verifies a command returns `Err` against a fixture.
#[macro_export]
macro_rules! execute_error_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        cmd: $cmd:expr,
        contains: $needle:literal $(,)?
    ) => {
        #[rstest]
        fn $test_name(mut $fixture: crate::agent::QueryAgent) {
            use crate::commands::Execute;
            let err = $cmd.execute(&mut $fixture).expect_err("Execute should fail");
            assert!(
                err.to_string().contains($needle),
                concat!("Error should mention: ", $needle)
            );
        }
    };
}

// =============================================================================
// Output Test Macros
// =============================================================================

/// Generate a test that verifies table output matches expected string.
///
/// Works with rstest fixtures by accepting a fixture parameter.
///
/// # Example
/// ```ignore
/// output_table_test! {
///     test_name: test_to_table_empty,
///     fixture: empty_result,
///     fixture_type: ExecResult,
///     expected: EMPTY_TABLE_OUTPUT,
/// }
/// ```
#[macro_export]
macro_rules! output_table_test {
    // With format parameter (Json, Toon)
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        expected: $expected:expr,
        format: $format:ident $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use crate::output::{Outputable, OutputFormat};
            assert_eq!($fixture.format(OutputFormat::$format), $expected);
        }
    };
    // Default table format
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        expected: $expected:expr $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use crate::output::Outputable;
            assert_eq!($fixture.to_table(), $expected);
        }
    };
}

/// Generate a test that checks table output line by line.
///
/// Each `lines` entry must appear as a whole output line; no `absent`
/// entry may appear anywhere. Use this when the surrounding layout (grid
/// widths, preceding sections) is not what the test is about.
///
/// # Example
/// ```ignore
/// output_table_contains_test! {
///     test_name: test_to_table_execution_failed,
///     fixture: execution_failed_result,
///     fixture_type: AskResult,
///     lines: ["Execution failed: ERROR: division by zero"],
///     absent: ["row)", "rows)"],
/// }
/// ```
#[macro_export]
macro_rules! output_table_contains_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        lines: [$($line:expr),* $(,)?]
        $(, absent: [$($absent:expr),* $(,)?])? $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use crate::output::Outputable;
            let output = $fixture.to_table();
            $(
                assert!(
                    output.lines().any(|l| l == $line),
                    "missing line {:?} in:\n{}", $line, output
                );
            )*
            $($(
                assert!(
                    !output.contains($absent),
                    "unexpected {:?} in:\n{}", $absent, output
                );
            )*)?
        }
    };
}

/// Generate a test that verifies JSON output is valid and contains expected fields.
///
/// # Example
/// ```ignore
/// output_json_test! {
///     test_name: test_format_json,
///     fixture: single_result,
///     fixture_type: ExecResult,
///     assertions: {
///         "sql": "SELECT 1",
///         "row_count": 1,
///     },
/// }
/// ```
#[macro_export]
macro_rules! output_json_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        assertions: { $($field:literal : $expected:expr),* $(,)? } $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use crate::output::{Outputable, OutputFormat};
            let output = $fixture.format(OutputFormat::Json);
            let parsed: serde_json::Value = serde_json::from_str(&output)
                .expect("Should produce valid JSON");
            $(
                assert_eq!(parsed[$field], $expected, concat!("JSON field mismatch: ", $field));
            )*
        }
    };
}

/// Generate a test that verifies Toon output contains expected strings.
///
/// # Example
/// ```ignore
/// output_toon_test! {
///     test_name: test_format_toon,
///     fixture: single_result,
///     fixture_type: ExecResult,
///     contains: ["row_count: 1", "columns["],
/// }
/// ```
#[macro_export]
macro_rules! output_toon_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        contains: [$($needle:literal),* $(,)?] $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use crate::output::{Outputable, OutputFormat};
            let output = $fixture.format(OutputFormat::Toon);
            $(
                assert!(output.contains($needle), concat!("Toon output should contain: ", $needle));
            )*
        }
    };
}
