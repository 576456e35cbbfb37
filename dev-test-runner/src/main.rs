//! Fixture runner: every `fixtures/*.json` names a recipe, a target and a tree,
//! plus substrings the printed result must (or must not) contain.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use colored::Colorize;
use serde::Deserialize;
use value_forge::{GeneratorConfig, KnownTypes, Recipe, Semantics, SyntaxTree, Target, path_de, render_tree};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Fixture {
    recipe: Recipe,
    target: Target,
    #[serde(default)]
    config: GeneratorConfig,
    tree: SyntaxTree,
    #[serde(default)]
    expect: Vec<String>,
    #[serde(default)]
    reject: Vec<String>,
    /// The recipe must fail with a message containing this.
    #[serde(default)]
    expect_error: Option<String>,
}

fn run_fixture(path: &Path) -> anyhow::Result<()> {
    let fixture: Fixture = path_de::read_json(path)?;
    let known = KnownTypes::for_tree(&fixture.tree, &fixture.config);
    let semantics = Semantics::new(&known).with_unresolved(fixture.config.unresolved_kind);
    let result = fixture.recipe.apply(&fixture.tree, &fixture.target, &semantics);

    match (result, fixture.expect_error.as_deref()) {
        (Err(error), Some(wanted)) => {
            if !error.to_string().contains(wanted) {
                bail!("error `{error}` does not mention `{wanted}`");
            }
            Ok(())
        }
        (Err(error), None) => Err(error).context("recipe failed"),
        (Ok(_), Some(wanted)) => bail!("expected an error mentioning `{wanted}`"),
        (Ok(tree), None) => {
            let source = render_tree(&tree, fixture.config.indent);
            for wanted in &fixture.expect {
                if !source.contains(wanted.as_str()) {
                    bail!("missing `{wanted}` in:\n{source}");
                }
            }
            for unwanted in &fixture.reject {
                if source.contains(unwanted.as_str()) {
                    bail!("unexpected `{unwanted}` in:\n{source}");
                }
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let pattern = std::env::args()
        .nth(1)
        .unwrap_or_else(|| format!("{}/fixtures/*.json", env!("CARGO_MANIFEST_DIR")));
    let paths: Vec<PathBuf> = match glob::glob(&pattern) {
        Ok(paths) => paths.filter_map(Result::ok).collect(),
        Err(error) => {
            eprintln!("{} {error}", "invalid pattern:".red());
            return ExitCode::FAILURE;
        }
    };

    let mut failed = 0;
    for path in &paths {
        let name = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        match run_fixture(path) {
            Ok(()) => eprintln!("{} {name}", "PASS".green().bold()),
            Err(error) => {
                failed += 1;
                eprintln!("{} {name}: {error:#}", "FAIL".red().bold());
            }
        }
    }

    eprintln!("—— {} passed, {} failed ——", paths.len() - failed, failed);
    if failed > 0 || paths.is_empty() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
