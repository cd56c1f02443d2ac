//! Test-generating macros shared by the command modules.
//!
//! Three groups: CLI parsing (`cli_*`), running a command against an
//! executor fixture (`execute_*`), and rendering results (`output_*`).
//! CLI macros parse with `sistation` as the binary name.

/// Parses `$cmd` plus `$args` and yields the `Command` for matching.
#[doc(hidden)]
#[macro_export]
macro_rules! parse_cli {
    ($cmd:literal $(, $arg:literal)* $(,)?) => {
        <$crate::cli::Args as clap::Parser>::try_parse_from(
            ["sistation", $cmd $(, $arg)*]
        )
    };
}

/// Asserts field values produced by clap defaults.
///
/// Expands to a single test named `test_defaults`, so use it once per module.
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
            let parsed = $crate::parse_cli!($cmd $(, $req_arg)*).unwrap();
            let $crate::commands::Command::$variant(cmd) = parsed.command else {
                panic!("{} did not parse as {}", $cmd, stringify!($variant));
            };
            $(
                assert_eq!(cmd.$def_field, $def_expected, "default for {}", stringify!($def_field));
            )*
        }
    };
}

/// Asserts one (possibly nested) field after parsing `args`.
#[macro_export]
macro_rules! cli_option_test {
    (
        command: $cmd:literal,
        variant: $variant:ident,
        test_name: $test_name:ident,
        args: [$($arg:literal),+],
        field: $($field:ident).+,
        expected: $expected:expr $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let parsed = $crate::parse_cli!($cmd $(, $arg)+).unwrap();
            let $crate::commands::Command::$variant(cmd) = parsed.command else {
                panic!("{} did not parse as {}", $cmd, stringify!($variant));
            };
            assert_eq!(cmd.$($field).+, $expected, "field {}", stringify!($($field).+));
        }
    };
}

/// Asserts that the bare subcommand is rejected and the error names `$arg`.
#[macro_export]
macro_rules! cli_required_arg_test {
    (
        command: $cmd:literal,
        test_name: $test_name:ident,
        required_arg: $arg:literal $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let message = match $crate::parse_cli!($cmd) {
                Ok(_) => panic!("{} parsed without {}", $cmd, $arg),
                Err(e) => e.to_string(),
            };
            assert!(message.contains($arg), "error does not name {}: {}", $arg, message);
        }
    };
}

/// Asserts that parsing `args` fails.
#[macro_export]
macro_rules! cli_error_test {
    (
        command: $cmd:literal,
        test_name: $test_name:ident,
        args: [$($arg:literal),+] $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            assert!($crate::parse_cli!($cmd $(, $arg)+).is_err());
        }
    };
}

// -----------------------------------------------------------------------------
// Execution
// -----------------------------------------------------------------------------

/// Runs `cmd` against a `(TempDir, Executor)` fixture and hands the output
/// to `assertions`. The temp dir lives until the test ends.
///
/// ```ignore
/// execute_test! {
///     test_name: test_query_users,
///     fixture: user_db,
///     cmd: query("SELECT * FROM UserTable", vec![]),
///     assertions: |table| {
///         assert_eq!(table.len(), 2);
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
        fn $test_name($fixture: (tempfile::TempDir, $crate::db::Executor)) {
            use $crate::commands::Execute;
            let (_dir, executor) = $fixture;
            let $result = match $cmd.execute(&executor) {
                Ok(output) => output,
                Err(e) => panic!("{} failed: {}", stringify!($test_name), e),
            };
            $body
        }
    };
}

/// Runs `cmd` against a fixture and asserts it returns an error.
#[macro_export]
macro_rules! execute_error_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        cmd: $cmd:expr $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: (tempfile::TempDir, $crate::db::Executor)) {
            use $crate::commands::Execute;
            let (_dir, executor) = $fixture;
            assert!($cmd.execute(&executor).is_err(), "{} succeeded", stringify!($test_name));
        }
    };
}

// -----------------------------------------------------------------------------
// Rendering
// -----------------------------------------------------------------------------

/// Compares the table rendering with `expected` exactly.
#[macro_export]
macro_rules! output_table_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        expected: $expected:expr $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use $crate::output::Outputable;
            assert_eq!($fixture.to_table(), $expected);
        }
    };
}

/// Checks the table rendering for each substring in `contains`.
#[macro_export]
macro_rules! output_table_contains_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        contains: [$($needle:literal),* $(,)?] $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use $crate::output::Outputable;
            let rendered = $fixture.to_table();
            $(
                assert!(rendered.contains($needle), "missing {:?} in:\n{}", $needle, rendered);
            )*
        }
    };
}

/// Parses the JSON rendering and compares top-level fields.
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
            use $crate::output::{OutputFormat, Outputable};
            let parsed: serde_json::Value =
                serde_json::from_str(&$fixture.format(OutputFormat::Json)).unwrap();
            $(
                assert_eq!(parsed[$field], $expected, "json field {}", $field);
            )*
        }
    };
}

/// Checks the toon rendering for each substring in `contains`.
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
            use $crate::output::{OutputFormat, Outputable};
            let rendered = $fixture.format(OutputFormat::Toon);
            $(
                assert!(rendered.contains($needle), "missing {:?} in:\n{}", $needle, rendered);
            )*
        }
    };
}
