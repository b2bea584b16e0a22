//! Headless CMS Manage API module
//!
//! GraphQL client, content model and entry types, and the schema-driven
//! operation builder used by the migration engine.

pub mod client;
pub mod error;
pub mod models;
pub mod operations;
pub mod pluralization;

#[cfg(test)]
pub mod mock;

pub use client::{CmsClient, ContentApi, content_data, content_payload, fetch_models};
pub use error::{ApiError, RemoteError};
pub use models::{
    ContentModel, ContentModelGroup, CursorPage, Entry, Field, FieldType, ModelsSnapshot, PageMeta,
};
pub use operations::{GraphqlOperation, ModelOperations, OperationCache, OperationKind};
