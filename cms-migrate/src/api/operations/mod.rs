//! Manage API operations module
//!
//! Model-specialized GraphQL request templates, the builder that derives
//! them from a content model, and the per-model cache.

pub mod builder;
pub mod cache;
pub mod operation;

pub use builder::{
    build_create_operation, build_create_revision_operation, build_delete_operation,
    build_list_models_operation, build_list_operation, build_publish_operation,
};
pub use cache::{ModelOperations, OperationCache};
pub use operation::{GraphqlOperation, OperationKind, Selection};
