//! JSON-over-HTTP client for the `test_resources.Stats` service.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::{
  FetchDirectoryMetricsRequest, FetchDirectoryMetricsResponse, FetchTestMetricsRequest, FetchTestMetricsResponse,
};

use super::MetricsApi;

const SERVICE: &str = "test_resources.Stats";
// Anti-XSSI guard the server prepends to every JSON body.
const XSSI_PREFIX: &str = ")]}'";

/// Where to send requests and with which credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub host: String,
  pub token: Option<String>,
}

impl Session {
  pub fn new(host: &str, token: Option<String>) -> Self {
    Self {
      host: host.trim_end_matches('/').to_string(),
      token,
    }
  }

  /// `host` with a scheme; bare hosts default to https.
  pub fn base_url(&self) -> String {
    if self.host.starts_with("http://") || self.host.starts_with("https://") {
      self.host.clone()
    } else {
      format!("https://{}", self.host)
    }
  }

  pub fn method_url(&self, method: &str) -> String {
    format!("{}/prpc/{}/{}", self.base_url(), SERVICE, method)
  }
}

pub struct HttpApi {
  agent: ureq::Agent,
  session: Session,
}

impl HttpApi {
  pub fn new(session: Session) -> Self {
    let agent = ureq::AgentBuilder::new().user_agent("test-metrics-tree").build();
    Self { agent, session }
  }

  fn call<Req, Resp>(&self, method: &str, body: &Req) -> Result<Resp>
  where
    Req: Serialize,
    Resp: DeserializeOwned,
  {
    let url = self.session.method_url(method);
    tracing::debug!(%url, "POST");

    let mut request = self
      .agent
      .post(&url)
      .set("Accept", "application/json")
      .set("Content-Type", "application/json");

    if let Some(token) = &self.session.token {
      request = request.set("Authorization", &format!("Bearer {}", token));
    }

    let response = match request.send_json(body) {
      Ok(r) => r,
      Err(ureq::Error::Status(code, r)) => {
        let text = r.into_string().unwrap_or_default();
        bail!("{} failed: HTTP {}: {}", method, code, text.trim())
      }
      Err(e) => return Err(e).with_context(|| format!("{} transport error", method)),
    };

    let text = response
      .into_string()
      .with_context(|| format!("reading {} response body", method))?;

    decode_body(&text).with_context(|| format!("decoding {} response", method))
  }
}

/// Strip the anti-XSSI prefix (when present) and parse JSON.
pub fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T> {
  let body = text.strip_prefix(XSSI_PREFIX).unwrap_or(text);
  Ok(serde_json::from_str(body.trim_start())?)
}

impl MetricsApi for HttpApi {
  fn fetch_directory_metrics(&self, req: &FetchDirectoryMetricsRequest) -> Result<FetchDirectoryMetricsResponse> {
    self.call("FetchDirectoryMetrics", req)
  }

  fn fetch_test_metrics(&self, req: &FetchTestMetricsRequest) -> Result<FetchTestMetricsResponse> {
    self.call("FetchTestMetrics", req)
  }
}
