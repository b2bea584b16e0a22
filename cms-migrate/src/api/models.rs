//! Content model and entry types exchanged with the Manage API

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// System-managed entry attributes assigned by the destination service
pub const SYSTEM_FIELDS: [&str; 5] = ["id", "entryId", "createdBy", "savedOn", "meta"];

/// Separator between the stable entry id and the revision marker in `id`
pub const REVISION_SEPARATOR: char = '#';

/// The service sends `null` for unset lists and flags
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Field data types of a content model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    LongText,
    RichText,
    Number,
    Boolean,
    DateTime,
    File,
    Object,
    Ref,
    Other(String),
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "text" => FieldType::Text,
            "long-text" => FieldType::LongText,
            "rich-text" => FieldType::RichText,
            "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            "datetime" => FieldType::DateTime,
            "file" => FieldType::File,
            "object" => FieldType::Object,
            "ref" => FieldType::Ref,
            _ => FieldType::Other(value),
        }
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        match value {
            FieldType::Text => "text".to_string(),
            FieldType::LongText => "long-text".to_string(),
            FieldType::RichText => "rich-text".to_string(),
            FieldType::Number => "number".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::DateTime => "datetime".to_string(),
            FieldType::File => "file".to_string(),
            FieldType::Object => "object".to_string(),
            FieldType::Ref => "ref".to_string(),
            FieldType::Other(other) => other,
        }
    }
}

/// A single field of a content model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub field_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub multiple_values: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub validation: Vec<Value>,
    /// Renderer, settings, predefined values and anything else the service sends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Field {
    pub fn is_ref(&self) -> bool {
        self.field_type == FieldType::Ref
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Schema definition for a class of entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModel {
    pub model_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_field_id: Option<String>,
    #[serde(default)]
    pub layout: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentModel {
    /// Field used to label entries, if the model declares a meaningful one
    pub fn title_field(&self) -> Option<&str> {
        match self.title_field_id.as_deref() {
            None | Some("") | Some("id") => None,
            Some(field) => Some(field),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentModelGroup {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `{ data: [...] }` wrapper used by the list queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct DataList<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub data: Vec<T>,
}

/// Shape of `exported-models.json` and of the models listing query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsSnapshot {
    pub list_content_model_groups: DataList<ContentModelGroup>,
    pub list_content_models: DataList<ContentModel>,
}

impl ModelsSnapshot {
    pub fn models(&self) -> &[ContentModel] {
        &self.list_content_models.data
    }

    pub fn find_model(&self, model_id: &str) -> Option<&ContentModel> {
        self.models().iter().find(|m| m.model_id == model_id)
    }
}

/// One content record, kept as raw JSON so every model field round-trips
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry(pub Map<String, Value>);

impl Entry {
    /// Composite `<entryId>#<revision>` id, if present and non-null
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn entry_id(&self) -> Option<&str> {
        self.0.get("entryId").and_then(Value::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.0
            .get("meta")
            .and_then(|meta| meta.get("status"))
            .and_then(Value::as_str)
    }

    pub fn is_published(&self) -> bool {
        self.status() == Some("published")
    }

    /// Copy of the entry without system-managed attributes, ready to be sent as input
    pub fn to_input(&self) -> Value {
        let fields = self
            .0
            .iter()
            .filter(|(key, _)| !SYSTEM_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Value::Object(fields)
    }

    /// Human readable label: title field value, then id
    pub fn label(&self, model: &ContentModel) -> Option<String> {
        let title = model
            .title_field()
            .and_then(|field| self.0.get(field))
            .and_then(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
        title.or_else(|| self.id().map(str::to_string))
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Entry(fields),
            _ => Entry::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_more_items: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_count: u64,
}

/// One page of a cursor-paginated list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Entry>,
    pub meta: PageMeta,
}
