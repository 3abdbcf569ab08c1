use crate::models::{AccountId, PoolId};
use crate::services::gateway::Constant;
use thiserror::Error;

/// Any failed or timed-out read against the chain data gateway. Fatal for the
/// run.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

/// A per-pool anomaly. Recorded against the pool; the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichmentError {
    #[error("pool {pool_id}: bonded account {bonded_account} has no staking ledger")]
    MissingLedger {
        pool_id: PoolId,
        bonded_account: AccountId,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("required constant {0} is not available")]
    MissingConstant(Constant),
    #[error("constant {0} has an unexpected type")]
    ConstantType(Constant),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("snapshot source {url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}
