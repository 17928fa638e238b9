use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

const MESSAGES: &str = r#"{"foo": {"bar": "Hello", "baz": "World"}}"#;

#[test]
fn test_comment_mode_annotates_file() -> Result<()> {
    let test = CliTest::with_messages(MESSAGES)?;
    test.write_file("src/app.ts", "const a = t(\"foo.bar\");\nconst b = 1;\n")?;

    let out = run(test.inject_command())?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert_eq!(
        test.read_file("src/app.ts")?,
        "const a = t(\"foo.bar\"); // skiver: (en) Hello;\nconst b = 1;\n"
    );
    assert!(out.stdout.contains("Updated src/app.ts (1 replacement)"));
    assert!(out.stdout.contains("Scanned 1 file, 1 file changed, 0 warnings"));
    Ok(())
}

#[test]
fn test_second_run_changes_nothing() -> Result<()> {
    let test = CliTest::with_messages(MESSAGES)?;
    test.write_file("src/app.ts", "t('foo.baz');\n")?;

    run(test.inject_command())?;
    let first = test.read_file("src/app.ts")?;
    let out = run(test.inject_command())?;

    assert_eq!(out.code, Some(0));
    assert_eq!(test.read_file("src/app.ts")?, first);
    assert!(out.stdout.contains("0 files changed"));
    Ok(())
}

#[test]
fn test_dry_run_leaves_files_untouched() -> Result<()> {
    let test = CliTest::with_messages(MESSAGES)?;
    let source = "const a = t(\"foo.bar\");\n";
    test.write_file("src/app.ts", source)?;

    let out = run({
        let mut cmd = test.inject_command();
        cmd.arg("--dry-run");
        cmd
    })?;

    assert_eq!(out.code, Some(1));
    assert_eq!(test.read_file("src/app.ts")?, source);
    assert!(out.stdout.contains("Would update src/app.ts"));
    assert!(out.stdout.contains("1 file would change"));
    Ok(())
}

#[test]
fn test_identifier_mode_rewrites_and_imports() -> Result<()> {
    let test = CliTest::with_messages(MESSAGES)?;
    let module = "export default {} as const;\n";
    test.write_file("src/tKeys.ts", module)?;
    test.write_file(
        "src/app/page.tsx",
        "const a = t(\"foo.bar\");\nconst b = t('foo.baz', { n: 1 });\n",
    )?;

    let out = run({
        let mut cmd = test.inject_command();
        cmd.args(["--mode", "tKeys"]);
        cmd
    })?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert_eq!(
        test.read_file("src/app/page.tsx")?,
        "import tKeys from \"../tKeys\"\n\
         const a = t(tKeys.foo.bar);\n\
         const b = t(tKeys.foo.baz, { n: 1 });\n"
    );
    assert_eq!(test.read_file("src/tKeys.ts")?, module);
    assert!(out.stdout.contains("(2 replacements, import added)"));
    Ok(())
}

#[test]
fn test_identifier_mode_reports_mismatch() -> Result<()> {
    let test = CliTest::with_messages(MESSAGES)?;
    test.write_file("tKeys.ts", "export default {};\n")?;
    let source = "const x = \"foo.bar\";\n";
    test.write_file("a.ts", source)?;

    let out = run({
        let mut cmd = test.inject_command();
        cmd.args(["--mode", "identifier-replacement"]);
        cmd
    })?;

    assert_eq!(out.code, Some(0));
    assert_eq!(test.read_file("a.ts")?, source);
    assert!(out.stdout.contains("warning: \"foo.bar\"  restriction-mismatch"));
    assert!(out.stdout.contains("--> a.ts:1:11"));
    assert!(out.stdout.contains("0 files changed, 1 warning"));
    Ok(())
}

#[test]
fn test_identifier_mode_requires_module() -> Result<()> {
    let test = CliTest::with_messages(MESSAGES)?;
    test.write_file("a.ts", "t(\"foo.bar\");\n")?;

    let out = run({
        let mut cmd = test.inject_command();
        cmd.args(["--mode", "tKeys"]);
        cmd
    })?;

    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("tKeys.ts"));
    assert_eq!(test.read_file("a.ts")?, "t(\"foo.bar\");\n");
    Ok(())
}

#[test]
fn test_tokenize_error_does_not_stop_run() -> Result<()> {
    let test = CliTest::with_messages(MESSAGES)?;
    test.write_file("src/broken.ts", "const s = `foo.bar\n")?;
    test.write_file("src/ok.ts", "t(\"foo.bar\");\n")?;

    let out = run(test.inject_command())?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("tokenize-error"));
    assert!(out.stdout.contains("--> src/broken.ts"));
    assert!(out.stdout.contains("Updated src/ok.ts"));
    assert_eq!(test.read_file("src/broken.ts")?, "const s = `foo.bar\n");
    Ok(())
}

#[test]
fn test_ignores_and_extensions() -> Result<()> {
    let test = CliTest::with_messages(MESSAGES)?;
    test.write_file("src/a.ts", "t(\"foo.bar\");\n")?;
    test.write_file("src/gen/b.ts", "t(\"foo.bar\");\n")?;
    test.write_file("src/c.js", "t(\"foo.bar\");\n")?;
    test.write_file("node_modules/pkg/d.ts", "t(\"foo.bar\");\n")?;

    let out = run({
        let mut cmd = test.inject_command();
        cmd.args(["--ignore", "src/gen", "--extension", "ts", "--extension", "js"]);
        cmd
    })?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(test.read_file("src/a.ts")?.contains("// skiver:"));
    assert!(test.read_file("src/c.js")?.contains("// skiver:"));
    assert_eq!(test.read_file("src/gen/b.ts")?, "t(\"foo.bar\");\n");
    assert_eq!(test.read_file("node_modules/pkg/d.ts")?, "t(\"foo.bar\");\n");
    Ok(())
}

#[test]
fn test_config_file_is_used() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".skiverrc.json",
        r#"{ "sourceRoot": "./web", "messagesRoot": "./i18n", "locales": ["no"] }"#,
    )?;
    test.write_file("i18n/en.json", r#"{"nav": "Home"}"#)?;
    test.write_file("i18n/no.json", r#"{"nav": "Hjem"}"#)?;
    test.write_file("web/menu.ts", "t(\"nav\");\n")?;

    let out = run(test.inject_command())?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert_eq!(test.read_file("web/menu.ts")?, "t(\"nav\"); // skiver: (no) Hjem;\n");
    Ok(())
}

#[test]
fn test_missing_directory_is_fatal() -> Result<()> {
    let test = CliTest::with_messages(MESSAGES)?;

    let out = run({
        let mut cmd = test.inject_command();
        cmd.arg("does-not-exist");
        cmd
    })?;

    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("does not exist"));
    Ok(())
}

#[test]
fn test_missing_messages_is_fatal() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("a.ts", "t(\"foo.bar\");\n")?;

    let out = run(test.inject_command())?;

    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("Messages directory"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_on_replace_runs_for_changed_files() -> Result<()> {
    let test = CliTest::with_messages(MESSAGES)?;
    test.write_file("a.ts", "t(\"foo.bar\");\n")?;
    test.write_file("b.ts", "const unrelated = 1;\n")?;

    let out = run({
        let mut cmd = test.inject_command();
        cmd.args(["--on-replace", "echo '// formatted' >>"]);
        cmd
    })?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert_eq!(
        test.read_file("a.ts")?,
        "t(\"foo.bar\"); // skiver: (en) Hello;\n// formatted\n"
    );
    assert_eq!(test.read_file("b.ts")?, "const unrelated = 1;\n");
    assert!(out.stdout.contains("(1 replacement, formatted)"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_failing_on_replace_is_a_warning() -> Result<()> {
    let test = CliTest::with_messages(MESSAGES)?;
    test.write_file("a.ts", "t(\"foo.bar\");\n")?;

    let out = run({
        let mut cmd = test.inject_command();
        cmd.args(["--on-replace", "false"]);
        cmd
    })?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("on-replace-failed"));
    assert!(test.read_file("a.ts")?.contains("// skiver:"));
    Ok(())
}
