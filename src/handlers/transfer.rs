//! Export and import tools

use mcp_attr::{Result as McpResult, bail, bail_public};
use std::path::PathBuf;

use crate::transfer::ExportBundle;
use crate::{AnjezServerHandler, StoreError, fail};

impl AnjezServerHandler {
    pub async fn handle_export(&self, path: String) -> McpResult<String> {
        let path = PathBuf::from(path.trim());
        let repo = self.repository().await?;
        let bundle = repo.export_snapshot().await;
        if let Err(e) = bundle.write_to(&path).await {
            bail!("Failed to write export to {}: {}", path.display(), e);
        }
        Ok(format!(
            "Exported {} task(s) and {} subtask(s) to {}",
            bundle.tasks.len(),
            bundle.subtasks.len(),
            path.display()
        ))
    }

    pub async fn handle_import(&self, path: String) -> McpResult<String> {
        let path = PathBuf::from(path.trim());
        let bundle = match ExportBundle::read_from(&path).await {
            Ok(bundle) => bundle,
            Err(StoreError::Deserialize(e)) => {
                bail_public!(_, "'{}' is not a valid export file: {}", path.display(), e)
            }
            Err(e) => bail_public!(_, "Failed to read {}: {}", path.display(), e),
        };

        let repo = self.repository().await?;
        let report = repo.import_bundle(bundle).await.or_else(fail)?;
        Ok(format!(
            "Imported {} task(s) and {} subtask(s) from {}",
            report.tasks,
            report.subtasks,
            path.display()
        ))
    }
}
