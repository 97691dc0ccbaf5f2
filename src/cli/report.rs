//! Report formatting and printing utilities.
//!
//! Separate from the build logic to allow langjs to be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    BuildSummary, CommandResult, CommandSummary, InitSummary, TargetOutcome, TargetResult,
};
use crate::config::CONFIG_FILE_NAME;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Mark for targets that were left untouched.
pub const SKIPPED_MARK: &str = "-";

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Build(summary) => {
            print_build_to(summary, verbose, &mut io::stdout().lock());
            print_build_warnings_to(summary, verbose, &mut io::stderr().lock());
        }
        CommandSummary::Init(summary) => print_init(summary),
    }
}

/// Print one line per target, in configured language order.
pub fn print_build_to<W: Write>(summary: &BuildSummary, verbose: bool, writer: &mut W) {
    if verbose {
        let config = if summary.config_from_file {
            CONFIG_FILE_NAME
        } else {
            "defaults"
        };
        let _ = writeln!(
            writer,
            "{} {} keyset {} (config: {}, layers: {})",
            "Found".bold(),
            summary.keyset_dir_count,
            if summary.keyset_dir_count == 1 { "directory" } else { "directories" },
            config,
            summary.layers.join(", ")
        );
    }

    let lang_width = summary
        .targets
        .iter()
        .map(|t| UnicodeWidthStr::width(t.lang.as_str()))
        .max()
        .unwrap_or(0);

    for target in &summary.targets {
        print_target(target, verbose, lang_width, writer);
    }

    let failed = summary
        .targets
        .iter()
        .filter(|t| t.outcome.is_failed())
        .count();
    if failed > 0 {
        let _ = writeln!(
            writer,
            "\n{} {} of {} {} failed",
            FAILURE_MARK.red(),
            failed,
            summary.targets.len(),
            if summary.targets.len() == 1 { "target" } else { "targets" }
        );
    } else if verbose {
        let _ = writeln!(
            writer,
            "{} {} keyset {} read",
            "Done".bold(),
            summary.cached_modules,
            if summary.cached_modules == 1 { "module" } else { "modules" }
        );
    }
}

fn print_target<W: Write>(target: &TargetResult, verbose: bool, lang_width: usize, writer: &mut W) {
    match &target.outcome {
        TargetOutcome::Built {
            keyset_count,
            key_count,
            sources,
        } => {
            let _ = writeln!(
                writer,
                "{} {} ({} {}, {} {})",
                SUCCESS_MARK.green(),
                format!("Built {}", target.display_path).green(),
                keyset_count,
                if *keyset_count == 1 { "keyset" } else { "keysets" },
                key_count,
                if *key_count == 1 { "key" } else { "keys" }
            );
            if verbose {
                print_sources(target.lang.as_str(), sources, lang_width, writer);
            }
        }
        TargetOutcome::UpToDate => {
            let _ = writeln!(
                writer,
                "{} {}",
                SKIPPED_MARK.dimmed(),
                format!("Up to date {}", target.display_path).dimmed()
            );
        }
        TargetOutcome::Failed(message) => {
            let _ = writeln!(
                writer,
                "{} {}: {}",
                FAILURE_MARK.red(),
                target.display_path.bold(),
                message
            );
        }
    }
}

/// List the merged keyset files under the language tag:
///
/// ```text
///   en | blocks/a/a.i18n/en.js
///      | blocks/b/b.i18n/en.js
/// ```
fn print_sources<W: Write>(lang: &str, sources: &[String], lang_width: usize, writer: &mut W) {
    if sources.is_empty() {
        let _ = writeln!(
            writer,
            "  {:>width$} {} {}",
            lang,
            "|".blue(),
            "(no keyset files)".dimmed(),
            width = lang_width
        );
        return;
    }
    for (i, source) in sources.iter().enumerate() {
        let label = if i == 0 { lang } else { "" };
        let _ = writeln!(
            writer,
            "  {:>width$} {} {}",
            label,
            "|".blue(),
            source,
            width = lang_width
        );
    }
}

/// Print scanner warnings; details are only available with `-v`.
pub fn print_build_warnings_to<W: Write>(summary: &BuildSummary, verbose: bool, writer: &mut W) {
    if summary.keyset_dir_count == 0 {
        let _ = writeln!(
            writer,
            "{} no keyset directories found in the configured levels",
            "warning:".bold().yellow()
        );
    }
    if summary.skipped_count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} path(s) could not be read (use {} for details)",
            "warning:".bold().yellow(),
            summary.skipped_count,
            "-v".cyan()
        );
    }
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", summary.path.display()).green()
        );
    } else {
        eprintln!("Error: {} already exists", summary.path.display());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::Lang;

    fn summary(targets: Vec<TargetResult>) -> BuildSummary {
        BuildSummary {
            targets,
            keyset_dir_count: 2,
            skipped_count: 0,
            config_from_file: true,
            cached_modules: 2,
            layers: vec!["i18n"],
        }
    }

    fn built(lang: &str, sources: &[&str]) -> TargetResult {
        TargetResult {
            lang: Lang::Named(lang.to_string()),
            display_path: format!("index.lang.{}.js", lang),
            outcome: TargetOutcome::Built {
                keyset_count: 2,
                key_count: 1,
                sources: sources.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    fn render(summary: &BuildSummary, verbose: bool) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        print_build_to(summary, verbose, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_build_lines() {
        let summary = summary(vec![
            built("en", &[]),
            TargetResult {
                lang: Lang::Named("ru".to_string()),
                display_path: "index.lang.ru.js".to_string(),
                outcome: TargetOutcome::UpToDate,
            },
        ]);
        assert_eq!(
            render(&summary, false),
            "✓ Built index.lang.en.js (2 keysets, 1 key)\n- Up to date index.lang.ru.js\n"
        );
    }

    #[test]
    fn test_failure_summary() {
        let summary = summary(vec![
            built("en", &[]),
            TargetResult {
                lang: Lang::All,
                display_path: "index.lang.all.js".to_string(),
                outcome: TargetOutcome::Failed("boom".to_string()),
            },
        ]);
        let text = render(&summary, false);
        assert!(text.contains("✘ index.lang.all.js: boom\n"));
        assert!(text.ends_with("\n✘ 1 of 2 targets failed\n"));
    }

    #[test]
    fn test_verbose_sources_are_aligned() {
        let summary = summary(vec![
            built("en", &["a.i18n/en.js", "b.i18n/en.js"]),
            TargetResult {
                lang: Lang::Named("ru-RU".to_string()),
                display_path: "index.lang.ru-RU.js".to_string(),
                outcome: TargetOutcome::UpToDate,
            },
        ]);
        let text = render(&summary, true);
        assert!(text.starts_with(
            "Found 2 keyset directories (config: .langjsrc.json, layers: i18n)\n"
        ));
        assert!(text.contains("     en | a.i18n/en.js\n        | b.i18n/en.js\n"));
        assert!(text.ends_with("Done 2 keyset modules read\n"));
    }

    #[test]
    fn test_warnings() {
        colored::control::set_override(false);
        let mut summary = summary(Vec::new());
        summary.keyset_dir_count = 0;
        summary.skipped_count = 3;

        let mut out = Vec::new();
        print_build_warnings_to(&summary, false, &mut out);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("warning: no keyset directories found"));
        assert!(text.contains("warning: 3 path(s) could not be read (use -v for details)"));

        let mut out = Vec::new();
        print_build_warnings_to(&summary, true, &mut out);
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("could not be read"));
    }
}
