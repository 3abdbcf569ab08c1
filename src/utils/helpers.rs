use crate::error::SnapshotError;
use crate::models::ChainSnapshot;
use std::path::Path;

pub async fn load_snapshot_file(file_path: &Path) -> Result<ChainSnapshot, SnapshotError> {
    let raw_data = tokio::fs::read_to_string(file_path)
        .await
        .map_err(|source| SnapshotError::Io {
            path: file_path.display().to_string(),
            source,
        })?;
    parse_snapshot(&raw_data)
}

pub fn parse_snapshot(raw_data: &str) -> Result<ChainSnapshot, SnapshotError> {
    let snapshot: ChainSnapshot = serde_json::from_str(raw_data)?;
    Ok(snapshot)
}
