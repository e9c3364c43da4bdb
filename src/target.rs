//! Output language + the naming rules that go with it.
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    /// C# classes + `I<Base>Visitor<T>` interface
    #[value(name = "csharp")]
    CSharp,
    /// Rust structs + `<Base>Visitor<T>` trait
    Rust,
}

impl Target {
    pub fn extension(self) -> &'static str {
        match self {
            Target::CSharp => "cs",
            Target::Rust => "rs",
        }
    }

    /// Name of the generated visitor type for node base `base` (e.g. `Expr`).
    pub fn visitor_type(self, base: &str) -> String {
        match self {
            Target::CSharp => format!("I{base}Visitor"),
            Target::Rust => format!("{base}Visitor"),
        }
    }

    pub fn node_unit_name(self, node: &str) -> String {
        match self {
            Target::CSharp => format!("{node}.cs"),
            Target::Rust => format!("{}.rs", snake_case(node)),
        }
    }

    pub fn visitor_unit_name(self, base: &str) -> String {
        match self {
            Target::CSharp => format!("{}.cs", self.visitor_type(base)),
            Target::Rust => format!("{}.rs", snake_case(&self.visitor_type(base))),
        }
    }

    pub(crate) fn builtin_templates(self) -> (&'static str, &'static str) {
        match self {
            Target::CSharp => (
                include_str!("../templates/csharp/node.hbs"),
                include_str!("../templates/csharp/visitor.hbs"),
            ),
            Target::Rust => (
                include_str!("../templates/rust/node.hbs"),
                include_str!("../templates/rust/visitor.hbs"),
            ),
        }
    }
}

/// `BinaryExpr` -> `binary_expr`, `IOError` -> `io_error`.
pub fn snake_case(ident: &str) -> String {
    let chars = ident.chars().collect::<Vec<_>>();
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 && !out.ends_with('_') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}
