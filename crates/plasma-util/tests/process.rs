use plasma_util::process::CommandBuilder;

#[test]
fn test_builder_captures_trimmed_stdout() {
    let output = CommandBuilder::new("echo").args(["hello"]).exec().unwrap();
    assert!(output.success);
    assert_eq!(output.stdout, "hello");
}

#[test]
fn test_builder_reports_nonzero_exit() {
    let output = CommandBuilder::new("sh")
        .args(["-c", "echo oops >&2; exit 3"])
        .exec()
        .unwrap();
    assert!(!output.success);
    assert_eq!(output.stderr, "oops");
}

#[test]
fn test_builder_with_cwd() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::write(tmp.path().join("marker.txt"), "found").unwrap();

    let output = CommandBuilder::new("cat")
        .args(["marker.txt"])
        .cwd(tmp.path())
        .exec()
        .unwrap();
    assert!(output.success);
    assert_eq!(output.stdout, "found");
}

#[test]
fn test_builder_missing_program_errors() {
    let result = CommandBuilder::new("definitely-not-a-real-program-xyz").exec();
    assert!(result.is_err());
}
