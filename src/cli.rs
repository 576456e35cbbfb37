//! CLI: decode → apply recipe → (csharp | json)
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use tracing::{debug, info};

use value_forge::{
    GeneratorConfig, KnownTypes, Recipe, Semantics, SyntaxTree, Target, TypeKind, offers, path_de,
    render_tree,
};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// apply value-semantics recipes (equality, readonly, operators, record) to C# syntax trees stored as JSON
#[derive(Parser, Debug)]
#[command(name = "value-forge", version)]
pub struct CommandLineInterface {
    /// log generator decisions (same as RUST_LOG=value_forge=debug)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// add Equals(T), Equals(object) and GetHashCode over the data properties
    Equality(TypeRecipeOut),
    /// drop property setters and add an assigning constructor
    Readonly(TypeRecipeOut),
    /// readonly, then structural equality
    Record(TypeRecipeOut),
    /// generate ==, !=, >, <, >=, <= comparing one property
    Operators(OperatorsOut),
    /// print the input documents without changing them
    Print(PrintOut),
    /// list every recipe that applies to each declaration
    List(ListOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// generator settings (JSON); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// kind assumed for property types that cannot be classified
    #[arg(long, value_enum)]
    unresolved: Option<TypeKind>,

    /// treat this type name as a reference type (repeatable)
    #[arg(long = "reference-type")]
    reference_types: Vec<String>,

    /// treat this type name as a value type (repeatable)
    #[arg(long = "value-type")]
    value_types: Vec<String>,

    /// spaces per indentation level in printed source
    #[arg(long)]
    indent: Option<usize>,
}

#[derive(Args, Debug, Clone)]
struct OutputSettings {
    /// output format
    #[arg(long, value_enum, default_value_t = Emit::Csharp)]
    emit: Emit,

    /// output file for a single input, directory for several (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Emit {
    Csharp,
    Json,
}

#[derive(clap::Parser, Debug)]
struct TypeRecipeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// type declaration to transform (simple or namespace-qualified name)
    #[arg(long = "type")]
    type_name: String,
}

#[derive(clap::Parser, Debug)]
struct OperatorsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// type declaring the property
    #[arg(long = "type")]
    type_name: String,

    /// property the operators compare
    #[arg(long)]
    property: String,
}

#[derive(clap::Parser, Debug)]
struct PrintOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,
}

#[derive(clap::Parser, Debug)]
struct ListOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,
}

/// What to do with each decoded document.
enum Action {
    Apply(Recipe, Target),
    Print,
    List,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_config(&self) -> anyhow::Result<GeneratorConfig> {
        let mut config = match self.config.as_ref() {
            Some(path) => GeneratorConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };
        if let Some(kind) = self.unresolved {
            config.unresolved_kind = kind;
        }
        if let Some(indent) = self.indent {
            config.indent = indent;
        }
        config.reference_types.extend(self.reference_types.iter().cloned());
        config.value_types.extend(self.value_types.iter().cloned());
        Ok(config)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn run(&self) -> anyhow::Result<ExitCode> {
        let (input, output, action) = match &self.cmd {
            Command::Equality(target) => (
                &target.input_settings,
                &target.output_settings,
                Action::Apply(Recipe::StructuralEquality, Target::Type(target.type_name.clone())),
            ),
            Command::Readonly(target) => (
                &target.input_settings,
                &target.output_settings,
                Action::Apply(Recipe::Readonly, Target::Type(target.type_name.clone())),
            ),
            Command::Record(target) => (
                &target.input_settings,
                &target.output_settings,
                Action::Apply(Recipe::ValueType, Target::Type(target.type_name.clone())),
            ),
            Command::Operators(target) => (
                &target.input_settings,
                &target.output_settings,
                Action::Apply(
                    Recipe::ComparisonOperators,
                    Target::Property {
                        type_name: target.type_name.clone(),
                        property: target.property.clone(),
                    },
                ),
            ),
            Command::Print(target) => (&target.input_settings, &target.output_settings, Action::Print),
            Command::List(target) => (&target.input_settings, &target.output_settings, Action::List),
        };

        let config = input.load_config()?;
        debug!(?config, "generator settings");
        let source_paths = resolve_file_path_patterns(&input.input)?;
        let destinations = output.destinations(&source_paths)?;

        // 1) transform every document independently
        let results: Vec<anyhow::Result<String>> = source_paths
            .par_iter()
            .map(|path| {
                process_file(path, &config, &action, output.emit)
                    .with_context(|| format!("failed to process {}", path.display()))
            })
            .collect();

        // 2) write in input order so stdout stays deterministic
        let mut failures = 0usize;
        for ((source_path, result), destination) in source_paths.iter().zip(results).zip(destinations) {
            let written = result.and_then(|text| write_output(destination.as_deref(), &text));
            match written {
                Ok(()) => {
                    let shown = source_path.display().to_string();
                    eprintln!("{} {}", "✓".green().bold(), shown.dimmed());
                }
                Err(error) => {
                    failures += 1;
                    eprintln!("{} {error:#}", "✗".red().bold());
                }
            }
        }

        if failures > 0 {
            eprintln!(
                "{}",
                format!("{failures} of {} inputs failed", source_paths.len()).red()
            );
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }
}

impl OutputSettings {
    /// One destination per input: `None` means stdout.
    fn destinations(&self, sources: &[PathBuf]) -> anyhow::Result<Vec<Option<PathBuf>>> {
        let Some(out) = self.out.as_ref() else {
            return Ok(vec![None; sources.len()]);
        };
        if sources.len() == 1 && !out.is_dir() {
            return Ok(vec![Some(out.clone())]);
        }
        if out.exists() && !out.is_dir() {
            bail!("--out {} must be a directory when there are several inputs", out.display());
        }
        let extension = match self.emit {
            Emit::Csharp => "cs",
            Emit::Json => "json",
        };
        sources
            .iter()
            .map(|source| {
                let stem = source
                    .file_stem()
                    .with_context(|| format!("input {} has no file name", source.display()))?;
                Ok(Some(out.join(format!("{}.{extension}", stem.to_string_lossy()))))
            })
            .collect()
    }
}

fn process_file(
    path: &Path,
    config: &GeneratorConfig,
    action: &Action,
    emit: Emit,
) -> anyhow::Result<String> {
    let tree: SyntaxTree = path_de::read_json(path)?;
    let known = KnownTypes::for_tree(&tree, config);
    debug!(path = %path.display(), known_types = known.len(), "decoded document");
    let semantics = Semantics::new(&known).with_unresolved(config.unresolved_kind);

    let tree = match action {
        Action::Apply(recipe, target) => recipe.apply(&tree, target, &semantics)?,
        Action::Print => tree,
        Action::List => {
            let offers = offers(&tree);
            info!(path = %path.display(), count = offers.len(), "listed recipes");
            return match emit {
                Emit::Json => Ok(serde_json::to_string_pretty(&offers)?),
                Emit::Csharp => Ok(offers
                    .iter()
                    .map(|offer| {
                        format!("{:<10} {:<48} {}\n", offer.recipe.name(), offer.target.to_string(), offer.recipe.title())
                    })
                    .collect()),
            };
        }
    };
    match emit {
        Emit::Csharp => Ok(render_tree(&tree, config.indent)),
        Emit::Json => Ok(serde_json::to_string_pretty(&tree)? + "\n"),
    }
}

fn write_output(destination: Option<&Path>, text: &str) -> anyhow::Result<()> {
    let Some(out) = destination else {
        print!("{text}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
