// In-memory node model. Built once by `grammar::parse`, read-only afterwards.
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeType {
    pub name: String,
    pub fields: Vec<Field>,    // declaration order == constructor parameter order
}

/// All node types of one grammar, in file order.
///
/// The order is load-bearing: it is the method order of the generated visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Grammar {
    nodes: Vec<NodeType>,
}

impl Grammar {
    pub(crate) fn from_nodes(nodes: Vec<NodeType>) -> Self {
        Self { nodes }
    }
    pub fn nodes(&self) -> &[NodeType] {
        &self.nodes
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name.as_str())
    }
    #[cfg(test)]
    pub(crate) fn get(&self, name: &str) -> Option<&NodeType> {
        self.nodes.iter().find(|n| n.name == name)
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl NodeType {
    /// `(a: int, b: string)` style signature, mostly for logs and tests.
    pub fn signature(&self) -> String {
        let params = self.fields.iter()
            .map(|f| format!("{}: {}", f.name, f.ty))
            .collect::<Vec<_>>();
        format!("({})", params.join(", "))
    }
}
