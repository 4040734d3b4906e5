use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Response};
use shared::{
    domain::ScaleQuery,
    protocol::{
        encode_diagram_query, encode_static_query, DiagramEnvelope, DIAGRAM_PATH,
        STATIC_DIAGRAM_PATH,
    },
};
use tracing::debug;
use url::Url;

pub mod chord_options;
pub mod config;
pub mod controller;
pub mod error;
pub mod parameters;

pub use chord_options::ChordOptions;
pub use config::{load_settings, load_settings_from, ClientSettings};
pub use controller::{
    Completion, ControllerEvent, ControllerState, RequestToken, SelectionController, UiState,
};
pub use error::ClientError;
pub use parameters::{ChangeKind, ParameterChange, ParameterField, ParameterModel};

/// One successful diagram fetch. Replaced wholesale by the next result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramResult {
    pub picture_bytes: Vec<u8>,
    /// Chord names valid for the query's root, scale and tuning, in backend order.
    pub chords: Vec<String>,
}

impl TryFrom<DiagramEnvelope> for DiagramResult {
    type Error = ClientError;

    fn try_from(envelope: DiagramEnvelope) -> Result<Self, Self::Error> {
        let picture_bytes = STANDARD
            .decode(envelope.picture.trim())
            .map_err(|err| ClientError::Decode(format!("picture is not valid base64: {err}")))?;
        Ok(Self {
            picture_bytes,
            chords: envelope.chords,
        })
    }
}

#[async_trait]
pub trait DiagramClient: Send + Sync {
    /// Single attempt, no retry.
    async fn fetch(&self, query: &ScaleQuery) -> Result<DiagramResult, ClientError>;
}

pub struct HttpDiagramClient {
    http: Client,
    server_url: String,
    diagram_path: String,
    static_path: String,
}

impl HttpDiagramClient {
    pub fn new(server_url: &Url) -> Self {
        Self::with_paths(server_url, DIAGRAM_PATH, STATIC_DIAGRAM_PATH)
    }

    pub fn with_paths(
        server_url: &Url,
        diagram_path: impl Into<String>,
        static_path: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.as_str().trim_end_matches('/').to_string(),
            diagram_path: diagram_path.into(),
            static_path: static_path.into(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> anyhow::Result<Self> {
        let server_url = settings.parsed_server_url()?;
        Ok(Self::with_paths(
            &server_url,
            settings.diagram_path.clone(),
            settings.static_path.clone(),
        ))
    }

    pub fn diagram_url(&self, query: &ScaleQuery) -> String {
        format!(
            "{}{}?{}",
            self.server_url,
            self.diagram_path,
            encode_diagram_query(query)
        )
    }

    /// Image URL for the static variant, suitable for direct embedding.
    pub fn static_image_url(&self, query: &ScaleQuery) -> String {
        format!(
            "{}{}?{}",
            self.server_url,
            self.static_path,
            encode_static_query(query)
        )
    }

    pub async fn fetch_static_image(&self, query: &ScaleQuery) -> Result<Vec<u8>, ClientError> {
        let url = self.static_image_url(query);
        debug!(%url, "requesting static diagram image");
        let res = checked(self.http.get(&url).send().await?).await?;
        Ok(res.bytes().await?.to_vec())
    }
}

/// Maps a non-2xx response to a transport error carrying the status and body.
async fn checked(res: Response) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    let message = match body.trim() {
        "" => status.canonical_reason().unwrap_or("request failed").to_string(),
        text => text.to_string(),
    };
    Err(ClientError::Transport {
        status: Some(status.as_u16()),
        message,
    })
}

#[async_trait]
impl DiagramClient for HttpDiagramClient {
    async fn fetch(&self, query: &ScaleQuery) -> Result<DiagramResult, ClientError> {
        let url = self.diagram_url(query);
        debug!(%url, "requesting diagram");
        let res = checked(self.http.get(&url).send().await?).await?;
        let body = res.bytes().await?;
        let envelope: DiagramEnvelope = serde_json::from_slice(&body)
            .map_err(|err| ClientError::Decode(err.to_string()))?;
        envelope.try_into()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
