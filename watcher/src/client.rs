//! HTTP client for the watcher's JSON-RPC-over-POST endpoints.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use splitter_engine::{FeeSchedule, SplitError, Submitter, UtxoSource};
use splitter_types::{Address, FeeInfo, SignedTransaction, SubmissionResult, Utxo};

use crate::error::WatcherError;
use crate::wire::{Envelope, SubmitRequest, UtxoQuery, WireFee, WireUtxo};

/// Default timeout for watcher requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// UTXOs requested per `account.get_utxos` page.
pub const DEFAULT_PAGE_LIMIT: usize = 200;

/// Client for one watcher deployment.
///
/// Every call is `POST {base_url}/{method}` with a JSON body.
#[derive(Clone)]
pub struct WatcherClient {
    /// HTTP client (reusable connection pool).
    http: reqwest::Client,
    base_url: String,
    page_limit: usize,
}

impl WatcherClient {
    pub fn new(base_url: &str) -> Result<Self, WatcherError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, WatcherError> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(WatcherError::InvalidUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| WatcherError::RequestFailed(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
        })
    }

    /// Request `limit` UTXOs per page instead of the default.
    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Every UTXO owned by `address`, following pagination to the end.
    ///
    /// Pages are requested from 1 upwards until one comes back shorter than
    /// the page size.
    pub async fn get_utxos(&self, address: &Address) -> Result<Vec<Utxo>, WatcherError> {
        let mut utxos = Vec::new();
        let mut page = 1;
        loop {
            let query = UtxoQuery {
                address,
                limit: self.page_limit,
                page,
            };
            let envelope = self.post("account.get_utxos", &query).await?;
            let limit = envelope
                .data_paging
                .as_ref()
                .map_or(self.page_limit, |p| p.limit);
            let batch: Vec<WireUtxo> = envelope.into_data()?;
            let count = batch.len();
            for wire in batch {
                utxos.push(Utxo::try_from(wire)?);
            }
            tracing::debug!(page, count, "fetched utxo page");
            if count < limit || count == 0 {
                break;
            }
            page += 1;
        }
        tracing::debug!(%address, total = utxos.len(), "fetched utxos");
        Ok(utxos)
    }

    /// The fee schedule, keyed by fee tier.
    pub async fn get_fees(&self) -> Result<HashMap<String, Vec<FeeInfo>>, WatcherError> {
        let tiers: HashMap<String, Vec<WireFee>> =
            self.post("fees.all", &serde_json::json!({})).await?.into_data()?;
        tiers
            .into_iter()
            .map(|(tier, fees)| {
                let fees = fees
                    .into_iter()
                    .map(FeeInfo::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok::<_, WatcherError>((tier, fees))
            })
            .collect()
    }

    /// Submit an encoded, signed transaction.
    pub async fn submit_transaction(
        &self,
        encoded: &[u8],
    ) -> Result<SubmissionResult, WatcherError> {
        let request = SubmitRequest {
            transaction: format!("0x{}", hex::encode(encoded)),
        };
        self.post("transaction.submit", &request)
            .await?
            .into_data()
    }

    async fn post(&self, method: &str, body: &impl Serialize) -> Result<Envelope, WatcherError> {
        let url = format!("{}/{}", self.base_url, method);
        tracing::debug!(%url, "watcher request");

        let response = self.http.post(&url).json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                WatcherError::Unreachable(format!("request timed out: {e}"))
            } else if e.is_connect() {
                WatcherError::Unreachable(format!("connection failed: {e}"))
            } else {
                WatcherError::RequestFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(WatcherError::RequestFailed(format!(
                "{method}: HTTP status {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| {
            WatcherError::InvalidResponse(format!("failed to parse {method} response: {e}"))
        })
    }
}

impl UtxoSource for WatcherClient {
    async fn fetch_utxos(&self, address: &Address) -> Result<Vec<Utxo>, SplitError> {
        Ok(self.get_utxos(address).await?)
    }
}

impl FeeSchedule for WatcherClient {
    async fn fetch_fee_schedule(&self) -> Result<HashMap<String, Vec<FeeInfo>>, SplitError> {
        Ok(self.get_fees().await?)
    }
}

impl Submitter for WatcherClient {
    async fn submit(&self, tx: &SignedTransaction) -> Result<SubmissionResult, SplitError> {
        self.submit_transaction(&tx.encoded)
            .await
            .map_err(|e| SplitError::Submission(e.to_string()))
    }
}
