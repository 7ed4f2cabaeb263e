use crate::cli::{exit_code, run_cli, Cli};

/// This is used by several places for testing. Also checks that nothing was reported on stdout
#[doc(hidden)]
pub fn assert_cli_error(cli: Cli, expected: &[&str], expected_exit_code: i32) {
    let mut out = Vec::new();
    if let Err(err) = run_cli(cli, &mut out) {
        let actual = err.chain().map(|e| e.to_string()).collect::<Vec<_>>();
        assert_eq!(expected, actual);
        assert_eq!(exit_code(&err), expected_exit_code);
        assert_eq!(String::from_utf8_lossy(&out), "");
    } else {
        panic!("Should have errored");
    }
}
