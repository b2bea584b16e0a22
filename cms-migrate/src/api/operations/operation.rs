//! Core GraphQL operation types for Manage API queries and mutations

use std::fmt::Write;

/// Kind of request an operation performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Listing of content models and groups
    ListModels,
    /// Cursor-paginated entry listing
    List,
    /// Create a brand new entry
    Create,
    /// Create a new revision from an existing revision
    CreateRevision,
    /// Publish a revision
    Publish,
    /// Delete an entry with all of its revisions
    Delete,
}

impl OperationKind {
    /// Get the operation type as a string
    pub fn operation_type(&self) -> &'static str {
        match self {
            Self::ListModels => "list_models",
            Self::List => "list",
            Self::Create => "create",
            Self::CreateRevision => "create_revision",
            Self::Publish => "publish",
            Self::Delete => "delete",
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::ListModels | Self::List)
    }
}

/// One node of a selection set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Leaf(String),
    Nested(String, Vec<Selection>),
}

impl Selection {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::Leaf(name.into())
    }

    pub fn nested(name: impl Into<String>, children: Vec<Selection>) -> Self {
        Self::Nested(name.into(), children)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Leaf(name) | Self::Nested(name, _) => name,
        }
    }

    fn render(&self, out: &mut String, depth: usize) {
        let indent = "    ".repeat(depth);
        match self {
            Self::Leaf(name) => {
                let _ = writeln!(out, "{}{}", indent, name);
            }
            Self::Nested(name, children) => {
                let _ = writeln!(out, "{}{} {{", indent, name);
                for child in children {
                    child.render(out, depth + 1);
                }
                let _ = writeln!(out, "{}}}", indent);
            }
        }
    }
}

/// Render a selection list at the given depth
pub fn render_selections(selections: &[Selection], depth: usize) -> String {
    let mut out = String::new();
    for selection in selections {
        selection.render(&mut out, depth);
    }
    out
}

/// A model-specialized request template sent to the Manage API
///
/// The document is rendered once when the operation is built; the same model
/// always renders to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphqlOperation {
    kind: OperationKind,
    model_id: Option<String>,
    name: String,
    root_field: String,
    document: String,
}

impl GraphqlOperation {
    pub fn new(
        kind: OperationKind,
        model_id: Option<String>,
        name: impl Into<String>,
        root_field: impl Into<String>,
        document: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            model_id,
            name: name.into(),
            root_field: root_field.into(),
            document: document.into(),
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    /// Declared operation name (e.g. `CmsEntriesCreateArticle`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Service field the operation calls (e.g. `createArticle`)
    pub fn root_field(&self) -> &str {
        &self.root_field
    }

    pub fn document(&self) -> &str {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested_selection() {
        let selections = vec![
            Selection::leaf("id"),
            Selection::nested("author", vec![Selection::leaf("id"), Selection::leaf("modelId")]),
        ];

        assert_eq!(
            render_selections(&selections, 1),
            "    id\n    author {\n        id\n        modelId\n    }\n"
        );
        assert_eq!(selections[1].name(), "author");
    }

    #[test]
    fn test_operation_kind_types() {
        assert_eq!(OperationKind::CreateRevision.operation_type(), "create_revision");
        assert!(OperationKind::Publish.is_mutation());
        assert!(!OperationKind::List.is_mutation());
    }
}
