//! Minimal CLI: grammar → (generate | check | model)
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::codegen::{Codegen, Settings, Unit};
use crate::ir::Grammar;
use crate::target::Target;
use crate::writer::{self, Drift};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// How a successful run ended; `main` turns this into the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Done,
    OutOfDate,
}

/// generate AST node types and their visitor interface from a node grammar
#[derive(Parser, Debug)]
#[command(name = "expr-gen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// render every node type and the visitor, then write them to the output directory
    Generate(GenerateOut),
    /// render and compare with the output directory; exit code 1 when out of date
    Check(CheckOut),
    /// parse the grammar and print the node model as JSON
    Model(ModelOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// grammar file, one `Name : Type field, Type field` per line
    #[arg(long, short, default_value = "ExpGenerator/expressions.txt")]
    input: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct CodegenSettings {
    /// language of the generated sources
    #[arg(long, value_enum, default_value_t = Target::CSharp)]
    target: Target,

    /// abstract node base type; also names the visitor (`Expr` → `IExprVisitor`)
    #[arg(long, default_value = "Expr")]
    base: String,

    /// namespace of the generated C# types
    #[arg(long, default_value = "SeeSharp.Expressions")]
    namespace: String,

    /// directory with `node.hbs` and `visitor.hbs` replacing the built-in templates
    #[arg(long)]
    templates: Option<PathBuf>,

    /// generated-code directory (holds generated files only)
    #[arg(long, short, default_value = "SeeSharp/Expressions/Autogenerated")]
    out: PathBuf,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    codegen_settings: CodegenSettings,

    /// delete generated files whose node type no longer exists
    #[arg(long)]
    prune: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    codegen_settings: CodegenSettings,
}

#[derive(clap::Parser, Debug)]
struct ModelOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_grammar(&self) -> anyhow::Result<Grammar> {
        let grammar = crate::grammar::parse_file(&self.input)
            .with_context(|| format!("failed to load grammar {}", self.input.display()))?;
        info!(input = %self.input.display(), nodes = grammar.len(), "grammar loaded");
        Ok(grammar)
    }
}

impl CodegenSettings {
    fn codegen(&self) -> anyhow::Result<Codegen> {
        let settings = Settings {
            target: self.target,
            base: self.base.clone(),
            namespace: self.namespace.clone(),
        };
        let codegen = match self.templates.as_ref() {
            None => Codegen::new(settings)?,
            Some(dir) => Codegen::from_template_dir(settings, dir)
                .with_context(|| format!("failed to load templates from {}", dir.display()))?,
        };
        Ok(codegen)
    }

    fn render(&self, grammar: &Grammar) -> anyhow::Result<Vec<Unit>> {
        Ok(self.codegen()?.render_all(grammar)?)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<Status> {
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(Status::Done)
                }

                // 1) parse + render everything, then write
                let input = &target.input_settings.input;
                let source = std::fs::read_to_string(input)
                    .with_context(|| format!("failed to read grammar {}", input.display()))?;
                let codegen = target.codegen_settings.codegen()?;
                let out = &target.codegen_settings.out;
                let written = crate::generate(&source, out, &codegen)
                    .with_context(|| format!("failed to generate from {}", input.display()))?;

                // 2) drop files of node types that are gone
                if target.prune {
                    let extension = codegen.settings().target.extension();
                    writer::prune_stale(out, &written, extension)?;
                }
                Ok(Status::Done)
            }
            Command::Check(target) => {
                let grammar = target.input_settings.load_grammar()?;
                let units = target.codegen_settings.render(&grammar)?;
                let drift = writer::check_units(&target.codegen_settings.out, &units)?;
                if drift.is_empty() {
                    info!(files = units.len(), "generated sources are up to date");
                    return Ok(Status::Done)
                }
                for d in &drift {
                    match d {
                        Drift::Missing(path) => warn!(path = %path.display(), "missing"),
                        Drift::Changed(path) => warn!(path = %path.display(), "out of date"),
                    }
                }
                Ok(Status::OutOfDate)
            }
            Command::Model(target) => {
                let grammar = target.input_settings.load_grammar()?;
                let model_src = serde_json::to_string_pretty(&grammar)?;
                match target.out.as_ref() {
                    Some(out) => write_file(out, &model_src)?,
                    None => println!("{model_src}"),
                }
                Ok(Status::Done)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_file(out: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))
}
