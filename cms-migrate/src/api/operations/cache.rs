//! Per-model operation sets, built once and shared

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::builder::{
    build_create_operation, build_create_revision_operation, build_delete_operation,
    build_list_operation, build_publish_operation,
};
use super::operation::GraphqlOperation;
use crate::api::models::ContentModel;

/// Every entry operation the migration engine needs for one model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOperations {
    pub list: GraphqlOperation,
    pub create: GraphqlOperation,
    pub create_revision: GraphqlOperation,
    pub publish: GraphqlOperation,
    pub delete: GraphqlOperation,
}

impl ModelOperations {
    pub fn build(model: &ContentModel) -> Self {
        Self {
            list: build_list_operation(model),
            create: build_create_operation(model),
            create_revision: build_create_revision_operation(model),
            publish: build_publish_operation(model),
            delete: build_delete_operation(model),
        }
    }
}

/// Operation sets keyed by model id
#[derive(Debug, Default)]
pub struct OperationCache {
    entries: Mutex<HashMap<String, Arc<ModelOperations>>>,
}

impl OperationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached operations for `model`, building them on first use
    pub fn get_or_build(&self, model: &ContentModel) -> Arc<ModelOperations> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .entry(model.model_id.clone())
            .or_insert_with(|| {
                log::debug!("Building operations for model '{}'", model.model_id);
                Arc::new(ModelOperations::build(model))
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
