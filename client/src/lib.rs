//! HTTP client for the waste-calculation endpoints.
//!
//! # Architecture
//!
//! - [`CalculationClient::calculate`] - the primary path: validate input,
//!   issue the request, normalize the response. Failures after validation
//!   become [`ClientError::CalculationFailed`] with the cause attached.
//! - [`CalculationClient::calculate_with_policy`] - wraps the primary path
//!   with the configured [`FallbackPolicy`]: either surface the failure or
//!   degrade to the local [`estimate`], tagging the result with its
//!   [`CalculationSource`].
//! - [`CalculationClient::print_types`] - the types listing, sorted, with
//!   a fixed built-in list as the failure fallback.
//!
//! The remote call is the only suspension point in the application; the
//! caller awaits it and then mutates the history cache before rendering.

pub mod estimate;

mod error;
mod wire;

pub use error::{ClientBuildError, ClientError, FailureCause};

use std::time::Duration;

use url::Url;

use offcut_types::{CalculationResult, FallbackPolicy, ServerSettings, validate_print_run};

use crate::wire::WasteCalculationWire;

/// Query path of the waste-calculation endpoint.
pub const WASTE_CALCULATION_PATH: &str = "/api/waste-calculation";

/// Query path of the print-types listing endpoint.
pub const PRINT_TYPES_PATH: &str = "/api/print-types";

/// Built-in print types used when the listing endpoint is unreachable.
pub const DEFAULT_PRINT_TYPES: [&str; 8] =
    ["4/0", "4/4", "2/2", "2/0", "1/1", "1/0", "5/5", "5/0"];

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Where a calculation result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationSource {
    /// The server computed it.
    Server,
    /// The endpoint failed and the local estimator filled in.
    LocalEstimate,
}

/// A normalized result plus its provenance.
#[derive(Debug, Clone)]
pub struct Calculation {
    pub result: CalculationResult,
    pub source: CalculationSource,
}

/// Client for the remote waste-calculation service.
#[derive(Debug, Clone)]
pub struct CalculationClient {
    http: reqwest::Client,
    waste_url: Url,
    types_url: Url,
    policy: FallbackPolicy,
}

impl CalculationClient {
    /// Build a client from validated settings.
    ///
    /// # Errors
    ///
    /// Returns `ClientBuildError` when the base URL does not parse or the
    /// HTTP client cannot be constructed.
    pub fn new(
        settings: &ServerSettings,
        policy: FallbackPolicy,
    ) -> Result<Self, ClientBuildError> {
        let invalid_base = |source| ClientBuildError::InvalidBaseUrl {
            url: settings.base_url().to_string(),
            source,
        };
        let base_url = Url::parse(settings.base_url()).map_err(invalid_base)?;
        // Resolve both endpoints up front so per-request URL construction
        // cannot fail.
        let waste_url = base_url.join(WASTE_CALCULATION_PATH).map_err(invalid_base)?;
        let types_url = base_url.join(PRINT_TYPES_PATH).map_err(invalid_base)?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(settings.timeout_secs()))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            http,
            waste_url,
            types_url,
            policy,
        })
    }

    #[must_use]
    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Issue a waste calculation against the server.
    ///
    /// Input is validated before any request is sent: a zero or oversized
    /// run fails with [`ClientError::InvalidInput`] locally. Everything
    /// after that - transport failure, non-2xx status, unparseable or
    /// invalid body - is a [`ClientError::CalculationFailed`].
    pub async fn calculate(
        &self,
        print_type: &str,
        print_run: u32,
    ) -> Result<CalculationResult, ClientError> {
        if print_type.trim().is_empty() {
            return Err(offcut_types::InputError::EmptyPrintType.into());
        }
        validate_print_run(print_run)?;

        let mut url = self.waste_url.clone();
        url.query_pairs_mut()
            .append_pair("print_type", print_type)
            .append_pair("print_run", &print_run.to_string());

        tracing::debug!(%url, "Requesting waste calculation");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ClientError::failed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::failed(FailureCause::Status(status)));
        }

        let body = response.bytes().await.map_err(ClientError::failed)?;
        let wire: WasteCalculationWire =
            serde_json::from_slice(&body).map_err(ClientError::failed)?;
        wire.into_result()
            .map_err(|e| ClientError::failed(FailureCause::InvalidPayload(e)))
    }

    /// Calculate, applying the configured fallback policy on failure.
    ///
    /// Invalid input always surfaces - the estimator is a degraded stand-in
    /// for the server, not for validation.
    pub async fn calculate_with_policy(
        &self,
        print_type: &str,
        print_run: u32,
    ) -> Result<Calculation, ClientError> {
        match self.calculate(print_type, print_run).await {
            Ok(result) => Ok(Calculation {
                result,
                source: CalculationSource::Server,
            }),
            Err(e) if e.is_invalid_input() => Err(e),
            Err(e) => match self.policy {
                FallbackPolicy::Surface => Err(e),
                FallbackPolicy::Approximate => {
                    tracing::warn!("Calculation endpoint failed, using local estimate: {e}");
                    let result = estimate::approximate_waste(print_type, print_run)
                        .map_err(ClientError::InvalidInput)?;
                    Ok(Calculation {
                        result,
                        source: CalculationSource::LocalEstimate,
                    })
                }
            },
        }
    }

    /// Fetch the available print types, sorted for display.
    ///
    /// Failures degrade to the fixed built-in list rather than erroring -
    /// the form stays usable without the server.
    pub async fn print_types(&self) -> Vec<String> {
        match self.fetch_print_types().await {
            Ok(mut types) => {
                types.sort();
                types
            }
            Err(e) => {
                tracing::warn!("Print-types endpoint failed, using built-in list: {e}");
                default_print_types()
            }
        }
    }

    async fn fetch_print_types(&self) -> Result<Vec<String>, ClientError> {
        let response = self
            .http
            .get(self.types_url.clone())
            .send()
            .await
            .map_err(ClientError::failed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::failed(FailureCause::Status(status)));
        }

        let body = response.bytes().await.map_err(ClientError::failed)?;
        let types: Vec<String> = serde_json::from_slice(&body).map_err(ClientError::failed)?;
        Ok(types)
    }
}

/// The built-in fallback list, in display (sorted) order.
#[must_use]
pub fn default_print_types() -> Vec<String> {
    let mut types: Vec<String> = DEFAULT_PRINT_TYPES.iter().map(ToString::to_string).collect();
    types.sort();
    types
}
