//! Schema-driven construction of the per-model entry operations
//!
//! Operation and type names are generated by the service from the model id,
//! so they are derived here with the same rules:
//!
//! | kind            | operation name          | root field          |
//! |-----------------|-------------------------|---------------------|
//! | list            | `CmsEntriesList{P}`     | `list{P}`           |
//! | create          | `CmsEntriesCreate{M}`   | `create{M}`         |
//! | create revision | `CmsCreate{M}From`      | `create{M}From`     |
//! | publish         | `CmsPublish{M}`         | `publish{M}`        |
//! | delete          | `CmsEntriesDelete{M}`   | `delete{M}`         |
//!
//! `M` is the model id with an upper-cased first letter, `P` the same for its plural.
//! The root field is always aliased to `content`.

use super::operation::{GraphqlOperation, OperationKind, Selection, render_selections};
use crate::api::models::{ContentModel, Field};
use crate::api::pluralization::{pluralize_model_id, upper_first};

/// Query listing every content model group and model with full field definitions
pub const LIST_CONTENT_MODELS_WITH_GROUPS: &str = r#"query CmsListContentModelsWithGroups {
    listContentModelGroups {
        data {
            id
            name
            icon
            slug
            description
        }
    }
    listContentModels {
        data {
            name
            modelId
            description
            group {
                id
            }
            fields {
                id
                fieldId
                label
                helpText
                placeholderText
                type
                multipleValues
                predefinedValues {
                    enabled
                    values {
                        label
                        value
                    }
                }
                renderer {
                    name
                }
                validation {
                    name
                    message
                    settings
                }
                listValidation {
                    name
                    message
                    settings
                }
                settings
            }
            layout
            titleFieldId
        }
    }
}
"#;

pub fn build_list_models_operation() -> GraphqlOperation {
    GraphqlOperation::new(
        OperationKind::ListModels,
        None,
        "CmsListContentModelsWithGroups",
        "listContentModels",
        LIST_CONTENT_MODELS_WITH_GROUPS,
    )
}

fn meta_selection() -> Selection {
    Selection::nested(
        "meta",
        ["title", "publishedOn", "version", "locked", "status"]
            .into_iter()
            .map(Selection::leaf)
            .collect(),
    )
}

fn error_selection() -> Selection {
    Selection::nested(
        "error",
        ["message", "code", "data"]
            .into_iter()
            .map(Selection::leaf)
            .collect(),
    )
}

/// Map a model field to its selection; references select the target identity
fn field_selection(field: &Field) -> Selection {
    if field.is_ref() {
        Selection::nested(
            field.field_id.clone(),
            vec![Selection::leaf("id"), Selection::leaf("modelId")],
        )
    } else {
        Selection::leaf(field.field_id.clone())
    }
}

fn field_selections(model: &ContentModel) -> Vec<Selection> {
    model.fields.iter().map(field_selection).collect()
}

/// Variable declaration and the argument that forwards it to the root field
struct Variable {
    name: &'static str,
    type_name: String,
}

impl Variable {
    fn new(name: &'static str, type_name: impl Into<String>) -> Self {
        Self {
            name,
            type_name: type_name.into(),
        }
    }
}

struct DocumentSpec<'a> {
    kind: OperationKind,
    model: &'a ContentModel,
    name: String,
    root_field: String,
    variables: Vec<Variable>,
    content: Vec<Selection>,
}

fn render(spec: DocumentSpec<'_>) -> GraphqlOperation {
    let keyword = if spec.kind.is_mutation() {
        "mutation"
    } else {
        "query"
    };
    let declarations = spec
        .variables
        .iter()
        .map(|v| format!("${}: {}", v.name, v.type_name))
        .collect::<Vec<_>>()
        .join(", ");
    let arguments = spec
        .variables
        .iter()
        .map(|v| format!("{}: ${}", v.name, v.name))
        .collect::<Vec<_>>()
        .join(", ");

    let document = format!(
        "{} {}({}) {{\n    content: {}({}) {{\n{}    }}\n}}\n",
        keyword,
        spec.name,
        declarations,
        spec.root_field,
        arguments,
        render_selections(&spec.content, 2),
    );

    GraphqlOperation::new(
        spec.kind,
        Some(spec.model.model_id.clone()),
        spec.name,
        spec.root_field,
        document,
    )
}

/// Cursor-paginated listing: `where`, `sort`, `limit`, `after`
pub fn build_list_operation(model: &ContentModel) -> GraphqlOperation {
    let singular = upper_first(&model.model_id);
    let plural = upper_first(&pluralize_model_id(&model.model_id));

    let mut data = vec![
        Selection::leaf("id"),
        Selection::leaf("entryId"),
        Selection::nested("createdBy", vec![Selection::leaf("id")]),
        Selection::leaf("savedOn"),
        meta_selection(),
    ];
    data.extend(field_selections(model));

    render(DocumentSpec {
        kind: OperationKind::List,
        model,
        name: format!("CmsEntriesList{}", plural),
        root_field: format!("list{}", plural),
        variables: vec![
            Variable::new("where", format!("{}ListWhereInput", singular)),
            Variable::new("sort", format!("[{}ListSorter]", singular)),
            Variable::new("limit", "Int"),
            Variable::new("after", "String"),
        ],
        content: vec![
            Selection::nested("data", data),
            Selection::nested(
                "meta",
                vec![
                    Selection::leaf("cursor"),
                    Selection::leaf("hasMoreItems"),
                    Selection::leaf("totalCount"),
                ],
            ),
            error_selection(),
        ],
    })
}

pub fn build_create_operation(model: &ContentModel) -> GraphqlOperation {
    let singular = upper_first(&model.model_id);

    render(DocumentSpec {
        kind: OperationKind::Create,
        model,
        name: format!("CmsEntriesCreate{}", singular),
        root_field: format!("create{}", singular),
        variables: vec![Variable::new("data", format!("{}Input!", singular))],
        content: vec![
            Selection::nested(
                "data",
                vec![Selection::leaf("id"), Selection::leaf("savedOn"), meta_selection()],
            ),
            error_selection(),
        ],
    })
}

/// New revision of an existing entry; `data` is optional on the service side
pub fn build_create_revision_operation(model: &ContentModel) -> GraphqlOperation {
    let singular = upper_first(&model.model_id);

    let mut data = vec![Selection::leaf("id"), Selection::leaf("savedOn")];
    data.extend(field_selections(model));
    data.push(meta_selection());

    render(DocumentSpec {
        kind: OperationKind::CreateRevision,
        model,
        name: format!("CmsCreate{}From", singular),
        root_field: format!("create{}From", singular),
        variables: vec![
            Variable::new("revision", "ID!"),
            Variable::new("data", format!("{}Input", singular)),
        ],
        content: vec![Selection::nested("data", data), error_selection()],
    })
}

pub fn build_publish_operation(model: &ContentModel) -> GraphqlOperation {
    let singular = upper_first(&model.model_id);

    render(DocumentSpec {
        kind: OperationKind::Publish,
        model,
        name: format!("CmsPublish{}", singular),
        root_field: format!("publish{}", singular),
        variables: vec![Variable::new("revision", "ID!")],
        content: vec![
            Selection::nested("data", vec![Selection::leaf("id"), meta_selection()]),
            error_selection(),
        ],
    })
}

/// Delete by entry id removes the entry together with all its revisions
pub fn build_delete_operation(model: &ContentModel) -> GraphqlOperation {
    let singular = upper_first(&model.model_id);

    render(DocumentSpec {
        kind: OperationKind::Delete,
        model,
        name: format!("CmsEntriesDelete{}", singular),
        root_field: format!("delete{}", singular),
        variables: vec![Variable::new("revision", "ID!")],
        content: vec![Selection::leaf("data"), error_selection()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn category_model() -> ContentModel {
        serde_json::from_value(json!({
            "modelId": "productCategory",
            "name": "Product Category",
            "fields": [
                {"fieldId": "name", "type": "text"},
                {"fieldId": "parent", "type": "ref"},
                {"fieldId": "tags", "type": "text", "multipleValues": true}
            ],
            "layout": []
        }))
        .unwrap()
    }

    #[test]
    fn test_list_operation_names() {
        let op = build_list_operation(&category_model());

        assert_eq!(op.kind(), OperationKind::List);
        assert_eq!(op.model_id(), Some("productCategory"));
        assert_eq!(op.name(), "CmsEntriesListProductCategories");
        assert_eq!(op.root_field(), "listProductCategories");
        assert!(op.document().starts_with(
            "query CmsEntriesListProductCategories($where: ProductCategoryListWhereInput, \
             $sort: [ProductCategoryListSorter], $limit: Int, $after: String) {\n"
        ));
        assert!(op.document().contains(
            "    content: listProductCategories(where: $where, sort: $sort, limit: $limit, after: $after) {\n"
        ));
    }

    #[test]
    fn test_list_operation_selects_system_fields_and_cursor() {
        let doc = build_list_operation(&category_model()).document().to_string();

        for needle in [
            "            entryId\n",
            "            createdBy {\n                id\n            }\n",
            "                status\n",
            "            name\n",
            "            tags\n",
            "        meta {\n            cursor\n            hasMoreItems\n            totalCount\n        }\n",
            "        error {\n            message\n            code\n            data\n        }\n",
        ] {
            assert!(doc.contains(needle), "missing {:?} in\n{}", needle, doc);
        }
    }

    #[test]
    fn test_ref_fields_select_identity() {
        let doc = build_create_revision_operation(&category_model())
            .document()
            .to_string();
        assert!(doc.contains("            parent {\n                id\n                modelId\n            }\n"));
    }

    #[test]
    fn test_mutation_signatures() {
        let model = category_model();

        let create = build_create_operation(&model);
        assert!(create.document().starts_with(
            "mutation CmsEntriesCreateProductCategory($data: ProductCategoryInput!) {\n    \
             content: createProductCategory(data: $data) {\n"
        ));

        let revision = build_create_revision_operation(&model);
        assert_eq!(revision.name(), "CmsCreateProductCategoryFrom");
        assert!(revision.document().contains(
            "($revision: ID!, $data: ProductCategoryInput) {\n    \
             content: createProductCategoryFrom(revision: $revision, data: $data) {\n"
        ));

        let publish = build_publish_operation(&model);
        assert_eq!(publish.root_field(), "publishProductCategory");
        assert!(publish.document().contains("CmsPublishProductCategory($revision: ID!)"));

        let delete = build_delete_operation(&model);
        assert_eq!(delete.name(), "CmsEntriesDeleteProductCategory");
        assert!(delete.document().contains("        data\n        error {\n"));
    }

    #[test]
    fn test_create_does_not_select_model_fields() {
        let doc = build_create_operation(&category_model()).document().to_string();
        assert!(!doc.contains("parent"));
        assert!(doc.contains("            savedOn\n"));
    }

    #[test]
    fn test_builder_is_deterministic() {
        let model = category_model();
        assert_eq!(build_list_operation(&model), build_list_operation(&model));
        assert_eq!(
            build_create_revision_operation(&model).document(),
            build_create_revision_operation(&model.clone()).document()
        );
    }

    #[test]
    fn test_list_models_operation() {
        let op = build_list_models_operation();
        assert_eq!(op.kind(), OperationKind::ListModels);
        assert_eq!(op.model_id(), None);
        assert!(op.document().contains("titleFieldId"));
    }
}
