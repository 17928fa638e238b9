use anyhow::{Context, Result};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["sourceRoot", "messagesRoot", "mode", "onReplace", "identifierModule"] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{}' field",
            field
        );
    }
    assert_eq!(parsed["mode"], "comment");

    // 2-space indentation
    assert!(content.contains("\n  \"sourceRoot\""));

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let out = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    assert_eq!(out.code, Some(0));
    assert_snapshot!(out.stdout.trim_end(), @"✓ Created .skiverrc.json");
    assert!(test.root().join(".skiverrc.json").exists());
    assert_config_content(&test.read_file(".skiverrc.json")?)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".skiverrc.json", "{}")?;

    let out = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains(".skiverrc.json already exists"));
    assert_eq!(test.read_file(".skiverrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    test.write_file("src/app.tsx", "const a = t(\"home.title\");\n")?;
    test.write_file("messages/en.json", r#"{"home": {"title": "Welcome"}}"#)?;

    let out = run({
        let mut cmd = test.command();
        cmd.arg("inject");
        cmd
    })?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert_eq!(
        test.read_file("src/app.tsx")?,
        "const a = t(\"home.title\"); // skiver: (en) Welcome;\n"
    );

    Ok(())
}
