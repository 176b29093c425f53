use std::path::PathBuf;

use crate::model::Database;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Database>,
}

impl AppState {
    /// Install a freshly built snapshot, persisting it first. If the save
    /// fails the old snapshot stays in place, so a reported error never
    /// leaves memory and disk disagreeing.
    pub fn commit(&mut self, next: Database) -> anyhow::Result<()> {
        if let Some(workspace) = &self.workspace {
            crate::persist::save(workspace, &next)?;
        }
        self.db = Some(next);
        Ok(())
    }
}
