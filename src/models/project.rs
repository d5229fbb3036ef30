//! Project entity and creation payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::work::{ChatMessage, FileSystemSnapshot};

/// Project entity
///
/// Owned by the project store; this core only ever receives it back from
/// `create_project`/`list_projects` and reads its `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub messages: Vec<ChatMessage>,
    pub data: FileSystemSnapshot,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New project creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub messages: Vec<ChatMessage>,
    pub data: FileSystemSnapshot,
}

impl NewProject {
    /// An empty project with the given name
    pub fn empty(name: impl Into<String>) -> Self {
        NewProject {
            name: name.into(),
            messages: Vec::new(),
            data: FileSystemSnapshot::new(),
        }
    }
}
