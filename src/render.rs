//! Hand-off to the symbol renderer and document exporter.
//!
//! Neither collaborator is implemented here. The QR renderer only needs a
//! payload string and [`RenderOptions`]; the exporter takes the rendered
//! image with a title and subtitle. [`PayloadService`] wires a codec
//! request to a renderer so callers have one entry point.

use crate::codec::{EncodingRequest, EventCodec};
use crate::error::PayloadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

/// Options forwarded verbatim to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Pixels per module
    pub module_size: u32,
    /// Quiet zone, in modules
    pub margin: u32,
    pub error_correction: ErrorCorrection,
    pub foreground: String,
    pub background: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module_size: 8,
            margin: 4,
            error_correction: ErrorCorrection::M,
            foreground: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

/// Turns a payload string into an image. Implemented outside this crate.
pub trait SymbolRenderer: Send + Sync {
    type Image;
    type Error: std::error::Error + Send + Sync + 'static;

    fn render(&self, payload: &str, options: &RenderOptions) -> Result<Self::Image, Self::Error>;
}

/// Lays a rendered image out in a document. Implemented outside this crate.
pub trait DocumentExporter<Image>: Send + Sync {
    type Document;
    type Error: std::error::Error + Send + Sync + 'static;

    fn export(
        &self,
        image: &Image,
        title: &str,
        subtitle: &str,
    ) -> Result<Self::Document, Self::Error>;
}

/// Failure anywhere in encode → render → export.
#[derive(Debug)]
pub enum PipelineError {
    /// The request itself was rejected
    Payload(PayloadError),
    /// A collaborator failed
    Collaborator {
        stage: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payload(err) => write!(f, "{}", err),
            Self::Collaborator { stage, source } => write!(f, "{} failed: {}", stage, source),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Payload(err) => Some(err),
            Self::Collaborator { source, .. } => Some(source.as_ref()),
        }
    }
}

impl From<PayloadError> for PipelineError {
    fn from(err: PayloadError) -> Self {
        Self::Payload(err)
    }
}

/// Rendered symbol together with the payload it encodes.
#[derive(Debug, Clone)]
pub struct Rendered<Image> {
    pub payload: String,
    pub image: Image,
}

/// Encodes requests and forwards the payloads to a renderer.
pub struct PayloadService<R: SymbolRenderer> {
    renderer: R,
    events: EventCodec,
    options: RenderOptions,
}

impl<R: SymbolRenderer> PayloadService<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            events: EventCodec::default(),
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_event_codec(mut self, events: EventCodec) -> Self {
        self.events = events;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Validates and encodes `request`, then renders the payload.
    #[instrument(skip_all, fields(tool = request.tool()))]
    pub fn generate(&self, request: &EncodingRequest) -> Result<Rendered<R::Image>, PipelineError> {
        let payload = request.encode_with(&self.events)?;
        let image = self
            .renderer
            .render(&payload, &self.options)
            .map_err(|err| PipelineError::Collaborator {
                stage: "render",
                source: Box::new(err),
            })?;
        debug!(bytes = payload.len(), "rendered payload");
        Ok(Rendered { payload, image })
    }

    /// [`PayloadService::generate`] followed by a document export.
    pub fn export<E: DocumentExporter<R::Image>>(
        &self,
        request: &EncodingRequest,
        exporter: &E,
        title: &str,
        subtitle: &str,
    ) -> Result<E::Document, PipelineError> {
        let rendered = self.generate(request)?;
        exporter
            .export(&rendered.image, title, subtitle)
            .map_err(|err| PipelineError::Collaborator {
                stage: "export",
                source: Box::new(err),
            })
    }
}
