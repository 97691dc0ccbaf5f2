use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .langjsrc.json

    ----- stderr -----
    ");

    let content = test.read_file(".langjsrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["levels"], serde_json::json!(["blocks"]));
    assert_eq!(parsed["dirSuffix"], ".i18n");
    assert_eq!(parsed["target"], "?.lang.{lang}.js");
    assert!(parsed.get("i18nFile").is_none());

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".langjsrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    Error: .langjsrc.json already exists
    ");

    assert_eq!(test.read_file(".langjsrc.json")?, "{}");
    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;

    test.write_file(
        "blocks/button/button.i18n/en.js",
        r#"module.exports = { button: { label: "Press" } };"#,
    )?;

    let output = test.build_command().output()?;
    assert!(
        output.status.success(),
        "Build should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let base = test
        .root()
        .file_name()
        .and_then(|n| n.to_str())
        .context("temp dir has a name")?
        .to_string();
    let artifact = test.read_file(&format!("{}.lang.en.js", base))?;
    assert!(artifact.contains(r#""label": "Press""#));

    Ok(())
}
