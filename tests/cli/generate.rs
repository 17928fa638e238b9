use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

const MESSAGES: &str = r#"{"foo": {"bar": "Hello", "baz": "World"}, "nav": "Home"}"#;

#[test]
fn test_generate_to_stdout() -> Result<()> {
    let test = CliTest::with_messages(MESSAGES)?;

    let out = run(test.generate_command())?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert_eq!(
        out.stdout,
        "// Generated by skiver. Do not edit by hand.\n\
         const tKeys = {\n\
         \x20 foo: {\n\
         \x20   bar: \"foo.bar\",\n\
         \x20   baz: \"foo.baz\",\n\
         \x20 },\n\
         \x20 nav: \"nav\",\n\
         } as const;\n\
         \n\
         export default tKeys;\n"
    );
    Ok(())
}

#[test]
fn test_generate_to_path() -> Result<()> {
    let test = CliTest::with_messages(MESSAGES)?;

    let out = run({
        let mut cmd = test.generate_command();
        cmd.args(["--path", "src/i18n/tKeys.ts"]);
        cmd
    })?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("with 3 keys"));
    let module = test.read_file("src/i18n/tKeys.ts")?;
    assert_snapshot!(module.lines().last().unwrap_or_default(), @"export default tKeys;");
    Ok(())
}

#[test]
fn test_generate_uses_configured_path_and_alias() -> Result<()> {
    let test = CliTest::with_messages(r#"{"a": "A"}"#)?;
    test.write_file(
        ".skiverrc.json",
        r#"{ "generatePath": "src/keys.ts", "identifierAlias": "K" }"#,
    )?;

    let out = run(test.generate_command())?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(test.root().join("src/keys.ts").exists());
    assert!(test.read_file("src/keys.ts")?.contains("const K = {\n  a: \"a\",\n}"));
    Ok(())
}

#[test]
fn test_generate_reports_conflicting_keys() -> Result<()> {
    let test = CliTest::with_messages(r#"{"a": "A", "a.b": "AB"}"#)?;

    let out = run(test.generate_command())?;

    assert_eq!(out.code, Some(0));
    assert!(out.stderr.contains("key \"a\" is also a prefix of other keys"));
    assert!(out.stdout.contains("b: \"a.b\""));
    Ok(())
}

#[test]
fn test_generated_module_drives_identifier_mode() -> Result<()> {
    let test = CliTest::with_messages(MESSAGES)?;
    test.write_file("src/menu.ts", "t(\"nav\");\n")?;

    let out = run({
        let mut cmd = test.generate_command();
        cmd.args(["--path", "src/tKeys.ts"]);
        cmd
    })?;
    assert_eq!(out.code, Some(0));

    let out = run({
        let mut cmd = test.inject_command();
        cmd.args(["--mode", "tKeys"]);
        cmd
    })?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert_eq!(
        test.read_file("src/menu.ts")?,
        "import tKeys from \"./tKeys\"\nt(tKeys.nav);\n"
    );
    assert!(out.stdout.contains("1 file changed, 0 warnings"));
    Ok(())
}
