use crate::error::SnapshotError;
use crate::models::ChainSnapshot;
use crate::utils::helpers::{load_snapshot_file, parse_snapshot};
use log::{error, info, warn};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    File(PathBuf),
    Http {
        primary: String,
        secondary: Option<String>,
    },
}

pub async fn load_snapshot(source: &SnapshotSource) -> Result<ChainSnapshot, SnapshotError> {
    let snapshot = match source {
        SnapshotSource::File(path) => {
            info!("Loading snapshot from {}", path.display());
            load_snapshot_file(path).await?
        }
        SnapshotSource::Http { primary, secondary } => {
            let client = reqwest::Client::new();
            fetch_snapshot(&client, primary, secondary.as_deref()).await?
        }
    };
    check_ledgers(&snapshot);
    info!(
        "Snapshot at era {}: {} ledgers, {} nominators, {} pools, {} members",
        snapshot.current_era,
        snapshot.ledgers.len(),
        snapshot.nominators.len(),
        snapshot.bonded_pools.len(),
        snapshot.pool_members.len()
    );
    Ok(snapshot)
}

/// Tries the primary URL and falls back to the secondary once.
pub async fn fetch_snapshot(
    client: &reqwest::Client,
    primary: &str,
    secondary: Option<&str>,
) -> Result<ChainSnapshot, SnapshotError> {
    info!("Fetching snapshot from primary source");
    match fetch_from(client, primary).await {
        Ok(snapshot) => {
            info!("Snapshot fetched from primary source");
            Ok(snapshot)
        }
        Err(primary_error) => match secondary {
            Some(url) => {
                warn!(
                    "Primary snapshot source failed ({}), trying secondary",
                    primary_error
                );
                fetch_from(client, url).await.map_err(|e| {
                    error!("Both snapshot sources failed: {}", e);
                    e
                })
            }
            None => {
                error!("Primary snapshot source failed: {}", primary_error);
                Err(primary_error)
            }
        },
    }
}

async fn fetch_from(client: &reqwest::Client, url: &str) -> Result<ChainSnapshot, SnapshotError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SnapshotError::Status {
            url: url.to_string(),
            status,
        });
    }
    let body = response.text().await?;
    parse_snapshot(&body)
}

/// Logs ledgers whose total differs from active plus unlocking. Returns how
/// many were found.
pub fn check_ledgers(snapshot: &ChainSnapshot) -> usize {
    let inconsistent = snapshot
        .ledgers
        .iter()
        .filter(|ledger| !ledger.is_consistent())
        .inspect(|ledger| {
            warn!(
                "Ledger for {} has total {} but active {} with {} unlocking chunks",
                ledger.stash,
                ledger.total,
                ledger.active,
                ledger.unlocking.len()
            )
        })
        .count();
    if inconsistent > 0 {
        warn!("{} ledgers break total == active + unlocking", inconsistent);
    }
    inconsistent
}
