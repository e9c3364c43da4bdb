//! Line-oriented node grammar.
//!
//! One node type per line:
//!
//! ```text
//! Binary : Expr left, Token op, Expr right
//! ```
//!
//! - split once on the first `:` (so type tokens may still contain `::`);
//! - split the field list on `,`;
//! - each field is exactly `Type name`.
//!
//! Blank lines are skipped. The first bad line aborts the whole parse; there is
//! no partial model.
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{GenError, Result};
use crate::ir::{Field, Grammar, NodeType};

// Node and field names end up as type, member and file names.
static IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

pub fn parse_file(path: &Path) -> Result<Grammar> {
    let source = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
    parse(&source)
}

pub fn parse(source: &str) -> Result<Grammar> {
    // editors on Windows like to prepend a BOM; it is not part of the first name
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut seen = IndexMap::<String, usize>::new(); // node name -> line
    let mut nodes = Vec::<NodeType>::new();

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let node = parse_line(raw, line)?;
        if let Some(first) = seen.get(&node.name) {
            return Err(GenError::malformed(
                line,
                format!("duplicate node type `{}` (first declared on line {first})", node.name),
            ));
        }
        debug!(line, node = %node.name, signature = %node.signature(), "parsed node type");
        seen.insert(node.name.clone(), line);
        nodes.push(node);
    }

    Ok(Grammar::from_nodes(nodes))
}

fn parse_line(raw: &str, line: usize) -> Result<NodeType> {
    let Some((head, tail)) = raw.split_once(':') else {
        return Err(GenError::malformed(
            line,
            format!("missing `:` between node name and field list in `{}`", raw.trim()),
        ));
    };

    let name = head.trim();
    if name.is_empty() {
        return Err(GenError::malformed(line, "node name is empty"));
    }
    if !IDENT.is_match(name) {
        return Err(GenError::malformed(
            line,
            format!("node name `{name}` is not a valid identifier"),
        ));
    }
    if tail.trim().is_empty() {
        return Err(GenError::malformed(line, format!("node `{name}` declares no fields")));
    }

    let mut field_names = IndexSet::<&str>::new();
    let mut fields = Vec::<Field>::new();
    for decl in tail.split(',') {
        let tokens = decl.split_whitespace().collect::<Vec<_>>();
        let (ty, field_name) = match tokens.as_slice() {
            [ty, field_name] => (*ty, *field_name),
            [] => {
                return Err(GenError::malformed(
                    line,
                    format!("empty field declaration in node `{name}`"),
                ));
            }
            _ => {
                return Err(GenError::malformed(
                    line,
                    format!(
                        "field declaration `{}` must be `Type name`, found {} token(s)",
                        decl.trim(),
                        tokens.len(),
                    ),
                ));
            }
        };
        if !IDENT.is_match(field_name) {
            return Err(GenError::malformed(
                line,
                format!("field name `{field_name}` in node `{name}` is not a valid identifier"),
            ));
        }
        if !field_names.insert(field_name) {
            return Err(GenError::malformed(
                line,
                format!("duplicate field `{field_name}` in node `{name}`"),
            ));
        }
        fields.push(Field { ty: ty.to_string(), name: field_name.to_string() });
    }

    Ok(NodeType { name: name.to_string(), fields })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed_line(err: GenError) -> (usize, String) {
        match err {
            GenError::MalformedGrammarLine { line, reason } => (line, reason),
            other => panic!("expected MalformedGrammarLine, got {other:?}"),
        }
    }

    #[test]
    fn parses_nodes_in_file_order() {
        let grammar = parse("Literal : object value\nBinary : Expr left, Token op, Expr right\n").unwrap();
        assert_eq!(grammar.names().collect::<Vec<_>>(), ["Literal", "Binary"]);

        let binary = grammar.get("Binary").unwrap();
        let fields = binary.fields.iter()
            .map(|f| (f.ty.as_str(), f.name.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(fields, [("Expr", "left"), ("Token", "op"), ("Expr", "right")]);
    }

    #[test]
    fn field_order_is_declaration_order() {
        let grammar = parse("Type: int a, string b").unwrap();
        assert_eq!(grammar.nodes()[0].signature(), "(a: int, b: string)");

        let grammar = parse("Type: string b, int a").unwrap();
        assert_eq!(grammar.nodes()[0].signature(), "(b: string, a: int)");
    }

    #[test]
    fn whitespace_is_insignificant() {
        let grammar = parse("   Unary   :Token   op ,Expr right   \r\n").unwrap();
        let unary = &grammar.nodes()[0];
        assert_eq!(unary.name, "Unary");
        assert_eq!(unary.signature(), "(op: Token, right: Expr)");
    }

    #[test]
    fn blank_lines_are_skipped_but_still_counted() {
        let err = parse("\n   \nLiteral : object value\n\t\nFoo int a\n").unwrap_err();
        let (line, reason) = malformed_line(err);
        assert_eq!(line, 5);
        assert!(reason.contains("missing `:`"), "{reason}");
    }

    #[test]
    fn leading_byte_order_mark_is_ignored() {
        let grammar = parse("\u{feff}Binary : Expr left, Token op, Expr right\n").unwrap();
        assert_eq!(grammar.names().collect::<Vec<_>>(), ["Binary"]);

        // only a leading one; anywhere else it is still part of the line
        let (line, _) = malformed_line(parse("Literal : object value\n\u{feff}Binary : Expr left").unwrap_err());
        assert_eq!(line, 2);
    }

    #[test]
    fn type_tokens_may_contain_path_separators_and_generics() {
        let grammar = parse("Call : Box<Expr> callee, std::vec::Vec<Expr> args").unwrap();
        assert_eq!(grammar.nodes()[0].signature(), "(callee: Box<Expr>, args: std::vec::Vec<Expr>)");
    }

    #[test]
    fn rejects_missing_separator() {
        let (line, _) = malformed_line(parse("Foo int a").unwrap_err());
        assert_eq!(line, 1);
    }

    #[test]
    fn rejects_wrong_token_count() {
        let (line, reason) = malformed_line(parse("Literal : object value\nBinary : Expr left, Token, Expr right").unwrap_err());
        assert_eq!(line, 2);
        assert!(reason.contains("found 1 token"), "{reason}");

        let (_, reason) = malformed_line(parse("Literal : object big value").unwrap_err());
        assert!(reason.contains("found 3 token"), "{reason}");
    }

    #[test]
    fn rejects_empty_and_trailing_field_declarations() {
        let (_, reason) = malformed_line(parse("Nil :").unwrap_err());
        assert!(reason.contains("declares no fields"), "{reason}");

        let (_, reason) = malformed_line(parse("Grouping : Expr expression,").unwrap_err());
        assert!(reason.contains("empty field declaration"), "{reason}");
    }

    #[test]
    fn rejects_duplicate_node_names() {
        let src = "Binary : Expr left, Token op, Expr right\nLiteral : object value\nBinary : Expr a, Expr b";
        let (line, reason) = malformed_line(parse(src).unwrap_err());
        assert_eq!(line, 3);
        assert!(reason.contains("first declared on line 1"), "{reason}");
    }

    #[test]
    fn rejects_duplicate_field_names() {
        let (line, reason) = malformed_line(parse("Binary : Expr side, Token op, Expr side").unwrap_err());
        assert_eq!(line, 1);
        assert!(reason.contains("duplicate field `side`"), "{reason}");
    }

    #[test]
    fn rejects_bad_identifiers() {
        let (_, reason) = malformed_line(parse(" : int a").unwrap_err());
        assert_eq!(reason, "node name is empty");

        let (_, reason) = malformed_line(parse("../Evil : int a").unwrap_err());
        assert!(reason.contains("not a valid identifier"), "{reason}");

        let (_, reason) = malformed_line(parse("Ok : int 1st").unwrap_err());
        assert!(reason.contains("field name `1st`"), "{reason}");
    }

    #[test]
    fn empty_source_is_an_empty_grammar() {
        assert!(parse("\n  \n").unwrap().is_empty());
    }
}
