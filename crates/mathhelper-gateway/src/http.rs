//! reqwest-backed gateway client.

use async_trait::async_trait;
use mathhelper_common::config::ApiConfig;
use mathhelper_common::number::canonical_number;
use mathhelper_common::sandbox::SandboxClient as Client;
use mathhelper_common::{Equation, EquationId, NewEquation};
use reqwest::header::LOCATION;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::query::ListQuery;
use crate::{CreateOutcome, DeleteOutcome, EquationGateway, GatewayError, Result, COLLECTION_PATH};

pub struct HttpEquationGateway {
    client: Client,
}

impl HttpEquationGateway {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut client = Client::new(&config.base_url, config.timeout())?;
        for host in &config.allowed_hosts {
            client.allow_domain(host);
        }
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn base_url(&self) -> &str {
        self.client.base().as_str()
    }

    fn record_path(id: EquationId) -> String {
        format!("{COLLECTION_PATH}/{id}")
    }

    async fn get_record(&self, locator: &str) -> Result<Equation> {
        let url = self.client.resolve(locator)?;
        let resp = self.client.get(url)?.send().await.map_err(transport)?;
        match resp.status() {
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound(locator.to_string())),
            s if s.is_success() => decode(resp).await,
            _ => Err(rejection(resp).await),
        }
    }
}

#[async_trait]
impl EquationGateway for HttpEquationGateway {
    #[instrument(skip(self))]
    async fn fetch_by_id(&self, id: EquationId) -> Result<Equation> {
        self.get_record(&Self::record_path(id)).await
    }

    #[instrument(skip(self))]
    async fn fetch_by_location(&self, location: &str) -> Result<Equation> {
        self.get_record(location).await
    }

    #[instrument(skip(self))]
    async fn fetch_all(&self, query: &ListQuery) -> Result<Vec<Equation>> {
        let url = self.client.resolve(COLLECTION_PATH)?;
        let resp = self
            .client
            .get(url)?
            .query(&query.params())
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        let equations: Vec<Equation> = decode(resp).await?;
        debug!(n = equations.len(), "Equation list fetched");
        Ok(equations)
    }

    #[instrument(skip(self))]
    async fn create(&self, equation: &str) -> Result<CreateOutcome> {
        let url = self.client.resolve(COLLECTION_PATH)?;
        let resp = self
            .client
            .post(url)?
            .json(&NewEquation::new(equation))
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.map_err(transport)?;
            warn!(status, %message, "Equation rejected");
            return Ok(CreateOutcome::Rejected { message });
        }

        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(GatewayError::MissingLocation)?;
        debug!(%location, "Equation created");
        Ok(CreateOutcome::Created { location })
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: EquationId) -> Result<DeleteOutcome> {
        let url = self.client.resolve(&Self::record_path(id))?;
        let resp = self.client.delete(url)?.send().await.map_err(transport)?;

        if resp.status().is_success() {
            return Ok(DeleteOutcome::Deleted);
        }
        let status = resp.status().as_u16();
        let message = resp.text().await.map_err(transport)?;
        warn!(status, %message, "Delete rejected");
        Ok(DeleteOutcome::Rejected { message })
    }

    #[instrument(skip(self))]
    async fn try_add_solution(&self, id: EquationId, value: f64) -> Result<bool> {
        let url = self
            .client
            .resolve(&format!("{}/solutions", Self::record_path(id)))?;
        let resp = self
            .client
            .post(url)?
            .query(&[("x", canonical_number(value))])
            .send()
            .await
            .map_err(transport)?;

        let accepted = resp.status().is_success();
        debug!(accepted, status = resp.status().as_u16(), "Solution proposal answered");
        Ok(accepted)
    }
}

// ── Response handling ──────────────────────────────────────────────────────

fn transport(err: reqwest::Error) -> GatewayError {
    if err.is_decode() {
        GatewayError::Decode(err.to_string())
    } else {
        GatewayError::Transport(err)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let body = resp.text().await.map_err(transport)?;
    serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
}

async fn rejection(resp: Response) -> GatewayError {
    let status = resp.status().as_u16();
    let message = resp.text().await.unwrap_or_default();
    GatewayError::Rejected { status, message }
}
