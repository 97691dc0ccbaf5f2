use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

const RUNTIME: &str = "(function () { return function i18n() {}; })();";

/// Two levels, the second overriding `greeting.hello` for English.
fn project() -> Result<CliTest> {
    let test = CliTest::with_file(
        ".langjsrc.json",
        r#"{
          "levels": ["common.blocks", "desktop.blocks"],
          "langs": ["en", "ru"],
          "i18nFile": "runtime.js",
          "base": "index"
      }"#,
    )?;
    test.write_file("runtime.js", RUNTIME)?;
    test.write_file(
        "common.blocks/greeting/greeting.i18n/en.js",
        r#"module.exports = {
    greeting: { hello: "Hello, {name}!", bye: "Bye" }
};"#,
    )?;
    test.write_file(
        "common.blocks/greeting/greeting.i18n/ru.js",
        r#"module.exports = {
    greeting: { hello: "Привет, {name}!" }
};"#,
    )?;
    test.write_file(
        "desktop.blocks/greeting/greeting.i18n/en.js",
        r#"module.exports = {
    greeting: { hello: "Hi, {name}!" }
};"#,
    )?;
    Ok(test)
}

#[test]
fn test_build_all_languages() -> Result<()> {
    let test = project()?;

    assert_cmd_snapshot!(test.build_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Built index.lang.en.js (1 keyset, 2 keys)
    ✓ Built index.lang.ru.js (1 keyset, 1 key)

    ----- stderr -----
    ");

    let en = test.read_file("index.lang.en.js")?;
    let expected = format!(
        "\
(function(){{
function initKeyset(i18n) {{
if (!i18n || typeof i18n !== \"function\") {{
i18n = {}
}}


i18n.add('greeting', {{
    \"hello\": function(params) {{ return \"Hi, \" + params.name + \"!\"; }},
    \"bye\": \"Bye\"
}});
i18n.setLanguage('en');
return i18n;
}}
if (typeof modules !== 'undefined') {{
    modules.define('y-i18n', function (provide, i18n) {{
        provide(initKeyset(i18n));
    }});
}} else if (typeof module !== 'undefined') {{
    module.exports = function() {{return initKeyset();}};
}} else if (typeof window !== 'undefined') {{
    window.i18n = initKeyset();
}} else {{
    i18n = initKeyset();
}}
}})();",
        RUNTIME
    );
    assert_eq!(en, expected);

    let ru = test.read_file("index.lang.ru.js")?;
    assert!(ru.contains("i18n.setLanguage('ru');"));
    assert!(ru.contains(r#"return "Привет, " + params.name + "!";"#));

    Ok(())
}

#[test]
fn test_second_build_is_up_to_date() -> Result<()> {
    let test = project()?;
    test.build_command().output()?;

    assert_cmd_snapshot!(test.build_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    - Up to date index.lang.en.js
    - Up to date index.lang.ru.js

    ----- stderr -----
    ");

    assert_cmd_snapshot!(test.build_command().arg("--force"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Built index.lang.en.js (1 keyset, 2 keys)
    ✓ Built index.lang.ru.js (1 keyset, 1 key)

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_deleted_artifact_is_rebuilt() -> Result<()> {
    let test = project()?;
    test.build_command().output()?;
    std::fs::remove_file(test.root().join("index.lang.ru.js"))?;

    assert_cmd_snapshot!(test.build_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    - Up to date index.lang.en.js
    ✓ Built index.lang.ru.js (1 keyset, 1 key)

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_failing_language_exits_with_failure() -> Result<()> {
    let test = project()?;
    test.write_file(
        "desktop.blocks/greeting/greeting.i18n/ru.js",
        r#"module.exports = { greeting: { hello: "Привет, {name" } };"#,
    )?;

    assert_cmd_snapshot!(test.build_command(), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    ✓ Built index.lang.en.js (1 keyset, 2 keys)
    ✘ index.lang.ru.js: Failed to compact greeting.hello: Unclosed `{` (at offset 14)

    ✘ 1 of 2 targets failed

    ----- stderr -----
    ");

    assert!(test.root().join("index.lang.en.js").exists());
    assert!(!test.root().join("index.lang.ru.js").exists());
    Ok(())
}

#[test]
fn test_unsupported_value_reports_file_and_line() -> Result<()> {
    let test = project()?;
    test.write_file(
        "desktop.blocks/greeting/greeting.i18n/ru.js",
        "module.exports = {\n    greeting: {\n        count: 3\n    }\n};",
    )?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("desktop.blocks/greeting/greeting.i18n/ru.js:3:"),
        "{}",
        stdout
    );

    Ok(())
}

#[test]
fn test_missing_runtime_class_fails_every_target() -> Result<()> {
    let test = project()?;
    std::fs::remove_file(test.root().join("runtime.js"))?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✘ index.lang.en.js: Failed to read runtime class file"));
    assert!(stdout.contains("✘ 2 of 2 targets failed"));

    Ok(())
}

#[test]
fn test_all_artifact_has_keysets_only() -> Result<()> {
    let test = project()?;
    test.write_file(
        "common.blocks/greeting/greeting.i18n/all.js",
        r#"module.exports = { brand: { name: "Acme" } };"#,
    )?;

    let output = test.build_command().args(["--lang", "all"]).output()?;
    assert!(output.status.success());
    assert_eq!(
        test.read_file("index.lang.all.js")?,
        "\ni18n.add('brand', {\n    \"name\": \"Acme\"\n});\n"
    );

    Ok(())
}

#[test]
fn test_level_override() -> Result<()> {
    let test = project()?;

    let output = test
        .build_command()
        .args(["--level", "common.blocks", "--lang", "en"])
        .output()?;
    assert!(output.status.success());

    let en = test.read_file("index.lang.en.js")?;
    assert!(en.contains(r#"return "Hello, " + params.name + "!";"#));
    assert!(!test.root().join("index.lang.ru.js").exists());

    Ok(())
}

#[test]
fn test_verbose_lists_sources() -> Result<()> {
    let test = project()?;

    let output = test.build_command().args(["--lang", "en", "-v"]).output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(
        "  en | common.blocks/greeting/greeting.i18n/en.js\n     | desktop.blocks/greeting/greeting.i18n/en.js\n"
    ));

    Ok(())
}

#[test]
fn test_missing_level_warns() -> Result<()> {
    let test = project()?;

    let output = test
        .build_command()
        .args(["--level", "touch.blocks", "--lang", "en"])
        .output()?;
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning: no keyset directories found"));

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file(".langjsrc.json", r#"{ "langs": [] }"#)?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'langs' must list at least one language"));

    Ok(())
}
