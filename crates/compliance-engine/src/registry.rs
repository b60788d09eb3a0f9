//! Binding registry
//!
//! Read-only lookup from question id to the document fields it affects and
//! the legal statement for each compliance status. Entries are loaded from a
//! JSON data file into an immutable map; the built-in rule set ships as
//! `data/bindings.json`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use serde::Deserialize;
use shared_types::{ComplianceStatus, QuestionBinding};

use crate::error::RegistryError;

const BUILTIN_BINDINGS: &str = include_str!("../data/bindings.json");

lazy_static! {
    static ref BUILTIN_REGISTRY: BindingRegistry = BindingRegistry::from_json(BUILTIN_BINDINGS)
        .expect("embedded data/bindings.json must be a valid registry");
}

/// On-disk registry layout
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    version: Option<String>,
    questions: Vec<QuestionBinding>,
}

/// Immutable question-id to binding map
#[derive(Debug, Clone, Default)]
pub struct BindingRegistry {
    version: Option<String>,
    bindings: BTreeMap<String, QuestionBinding>,
}

impl BindingRegistry {
    /// The rule set compiled into the crate
    pub fn builtin() -> &'static BindingRegistry {
        &BUILTIN_REGISTRY
    }

    /// Load and validate a registry from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate a registry from JSON text
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(json)?;
        Self::from_bindings(file.questions).map(|mut registry| {
            registry.version = file.version;
            registry
        })
    }

    /// Build a registry from already-parsed bindings
    pub fn from_bindings(
        bindings: impl IntoIterator<Item = QuestionBinding>,
    ) -> Result<Self, RegistryError> {
        let mut map = BTreeMap::new();

        for binding in bindings {
            validate_binding(&binding)?;
            if map.contains_key(&binding.question_id) {
                return Err(RegistryError::DuplicateQuestion(binding.question_id));
            }
            map.insert(binding.question_id.clone(), binding);
        }

        Ok(Self {
            version: None,
            bindings: map,
        })
    }

    /// Look up a question; `None` means the question contributes nothing
    pub fn get_binding(&self, question_id: &str) -> Option<&QuestionBinding> {
        self.bindings.get(question_id)
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Registered question ids in sorted order
    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Every document any question contributes to, sorted
    pub fn document_names(&self) -> BTreeSet<&str> {
        self.bindings
            .values()
            .flat_map(|b| b.affects.iter().map(|a| a.document_name.as_str()))
            .collect()
    }

    /// Every field of `document_name` that some question can populate, sorted
    pub fn fields_for(&self, document_name: &str) -> BTreeSet<&str> {
        self.bindings
            .values()
            .flat_map(|b| b.affects.iter())
            .filter(|a| a.document_name == document_name)
            .map(|a| a.field_name.as_str())
            .collect()
    }
}

fn validate_binding(binding: &QuestionBinding) -> Result<(), RegistryError> {
    if binding.affects.is_empty() {
        return Err(RegistryError::NoAffectedFields(binding.question_id.clone()));
    }

    if binding
        .affects
        .iter()
        .any(|a| a.document_name.trim().is_empty() || a.field_name.trim().is_empty())
    {
        return Err(RegistryError::EmptyFieldName(binding.question_id.clone()));
    }

    for status in ComplianceStatus::ALL {
        if binding.statement(status).trim().is_empty() {
            return Err(RegistryError::EmptyStatement {
                question_id: binding.question_id.clone(),
                status: status.as_str(),
            });
        }
    }

    Ok(())
}
