//! Node model -> source text.
//!
//! One `Codegen` owns one handlebars registry holding exactly two templates:
//! `node` (rendered once per node type) and `visitor` (rendered once per
//! grammar). Rendering is pure: same model + same settings, same bytes.
use std::path::Path;

use handlebars::Handlebars;
use indexmap::IndexSet;
use serde::Serialize;

use crate::error::{GenError, Result};
use crate::ir::{Field, Grammar, NodeType};
use crate::target::{snake_case, Target};

const NODE_TEMPLATE: &str = "node";
const VISITOR_TEMPLATE: &str = "visitor";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub struct Settings {
    pub target: Target,
    /// Abstract node base (`Expr`, `Stmt`, ...); also names the visitor.
    pub base: String,
    /// Only used by the C# templates.
    pub namespace: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: Target::CSharp,
            base: "Expr".to_string(),
            namespace: "SeeSharp.Expressions".to_string(),
        }
    }
}

/// One rendered output file, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub name: String,
    pub content: String,
}

pub struct Codegen {
    settings: Settings,
    visitor: String,
    handlebars: Handlebars<'static>,
}

#[derive(Serialize)]
struct NodeContext<'a> {
    name: &'a str,
    fields: &'a [Field],
    base: &'a str,
    visitor: &'a str,
    namespace: &'a str,
}

#[derive(Serialize)]
struct VisitorContext<'a> {
    names: Vec<&'a str>,
    base: &'a str,
    visitor: &'a str,
    namespace: &'a str,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Codegen {
    /// Engine with the built-in templates for `settings.target`.
    pub fn new(settings: Settings) -> Result<Self> {
        let (node, visitor) = settings.target.builtin_templates();
        Self::with_templates(settings, node, visitor)
    }

    /// Engine with templates loaded from `dir/node.hbs` and `dir/visitor.hbs`.
    pub fn from_template_dir(settings: Settings, dir: &Path) -> Result<Self> {
        let read = |file: &str| {
            let path = dir.join(file);
            std::fs::read_to_string(&path).map_err(|e| GenError::io(path, e))
        };
        let node = read("node.hbs")?;
        let visitor = read("visitor.hbs")?;
        Self::with_templates(settings, &node, &visitor)
    }

    pub fn with_templates(settings: Settings, node: &str, visitor: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        // generated code is not HTML: `List<Expr>` must survive as-is
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);
        handlebars.register_helper("snake_case", Box::new(snake_case_helper));

        handlebars
            .register_template_string(NODE_TEMPLATE, node)
            .map_err(|e| GenError::Render { unit: "node template".to_string(), cause: e.to_string() })?;
        handlebars
            .register_template_string(VISITOR_TEMPLATE, visitor)
            .map_err(|e| GenError::Render { unit: "visitor template".to_string(), cause: e.to_string() })?;

        let visitor = settings.target.visitor_type(&settings.base);
        Ok(Self { settings, visitor, handlebars })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn render_node(&self, node: &NodeType) -> Result<Unit> {
        let name = self.settings.target.node_unit_name(&node.name);
        let context = NodeContext {
            name: &node.name,
            fields: &node.fields,
            base: &self.settings.base,
            visitor: &self.visitor,
            namespace: &self.settings.namespace,
        };
        let content = self.render(NODE_TEMPLATE, &context, &name)?;
        Ok(Unit { name, content })
    }

    pub fn render_visitor(&self, grammar: &Grammar) -> Result<Unit> {
        let name = self.settings.target.visitor_unit_name(&self.settings.base);
        let context = VisitorContext {
            names: grammar.names().collect(),
            base: &self.settings.base,
            visitor: &self.visitor,
            namespace: &self.settings.namespace,
        };
        let content = self.render(VISITOR_TEMPLATE, &context, &name)?;
        Ok(Unit { name, content })
    }

    /// Every unit of one run: node types in grammar order, then the visitor.
    ///
    /// Nothing is written here; a failure leaves the output directory untouched.
    pub fn render_all(&self, grammar: &Grammar) -> Result<Vec<Unit>> {
        if grammar.is_empty() {
            return Err(GenError::EmptyGrammar);
        }
        let mut units = Vec::with_capacity(grammar.len() + 1);
        for node in grammar.nodes() {
            units.push(self.render_node(node)?);
        }
        units.push(self.render_visitor(grammar)?);

        // case-folded: `Binary.cs` and `binary.cs` are one file on Windows/macOS
        let mut names = IndexSet::<String>::new();
        for unit in &units {
            if !names.insert(unit.name.to_ascii_lowercase()) {
                return Err(GenError::Render {
                    unit: unit.name.clone(),
                    cause: "two generated units map to the same file name".to_string(),
                });
            }
        }
        Ok(units)
    }

    fn render<T: Serialize>(&self, template: &str, context: &T, unit: &str) -> Result<String> {
        self.handlebars
            .render(template, context)
            .map_err(|e| GenError::Render { unit: unit.to_string(), cause: e.to_string() })
    }
}

// Handlebars helpers

fn snake_case_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let param = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    out.write(&snake_case(param))?;
    Ok(())
}
