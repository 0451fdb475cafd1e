//! Turns a board snapshot into a displayable frame via the server's `/image`.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::network::{Endpoint, Transport};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use macroquad::prelude::Image;
use shared::{BoardSnapshot, ImageReply, Protocol, Reply};

pub struct BoardRenderer {
    config: RenderConfig,
    protocol: Protocol,
}

impl BoardRenderer {
    pub fn new(config: RenderConfig, protocol: Protocol) -> Self {
        Self { config, protocol }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Requests and decodes one frame. Every failure here is recoverable;
    /// callers keep showing whatever frame they had.
    pub fn render<T: Transport + ?Sized>(
        &self,
        transport: &T,
        snapshot: &BoardSnapshot,
    ) -> Result<Image, RenderError> {
        let body = self
            .protocol
            .encode(&self.config.image_request(snapshot))
            .map_err(|e| RenderError::Encode(e.to_string()))?;

        let reply = transport.post(Endpoint::Image, &body)?;

        match self.protocol.decode::<ImageReply>(reply) {
            Ok(Reply::Ok(ImageReply { image })) => decode_png(&image),
            Ok(Reply::Error(message)) => Err(RenderError::Server(message)),
            Err(e) => Err(RenderError::Decode(format!("unexpected reply: {}", e))),
        }
    }
}

/// base64 text -> PNG bytes -> RGBA image. The format is sniffed from the
/// payload's magic bytes.
pub fn decode_png(payload: &str) -> Result<Image, RenderError> {
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| RenderError::Decode(format!("invalid base64: {}", e)))?;

    Image::from_file_with_format(&bytes, None)
        .map_err(|e| RenderError::Decode(format!("invalid PNG: {:?}", e)))
}
