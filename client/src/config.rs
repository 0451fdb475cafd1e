//! Static client configuration, resolved once at startup.

use crate::network::DEFAULT_SERVER_URL;
use crate::ticker::DEFAULT_TICK_INTERVAL;
use shared::{BoardSnapshot, ImageRequest, Protocol, Rgb, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};
use std::time::Duration;

/// Pixels of border the server draws after every block.
pub const BORDER_WIDTH: u32 = 1;

pub const DEFAULT_STARTUP_GRACE: Duration = Duration::from_secs(3);

/// Colours and block size merged into every `/image` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub head_colour: Rgb,
    pub body_colour: Rgb,
    pub apple_colour: Rgb,
    pub background_colour: Rgb,
    pub border_colour: Rgb,
    pub block_width: u32,
    pub block_height: u32,
}

impl RenderConfig {
    pub const DEFAULT_HEAD: Rgb = Rgb::new(0, 0, 255);
    pub const DEFAULT_BODY: Rgb = Rgb::new(50, 130, 170);
    pub const DEFAULT_APPLE: Rgb = Rgb::new(255, 0, 0);
    pub const DEFAULT_BACKGROUND: Rgb = Rgb::new(60, 170, 50);
    pub const DEFAULT_BORDER: Rgb = Rgb::new(255, 255, 255);
    pub const DEFAULT_BLOCK_SIZE: u32 = 50;

    pub fn image_request<'a>(&self, board: &'a BoardSnapshot) -> ImageRequest<'a> {
        ImageRequest {
            board_positions: board,
            head_colour: self.head_colour,
            body_colour: self.body_colour,
            apple_colour: self.apple_colour,
            background_colour: self.background_colour,
            border_colour: self.border_colour,
            block_width: self.block_width,
            block_height: self.block_height,
        }
    }

    /// Pixel size of the image the server renders for a board of this size.
    pub fn image_size(&self, board_width: u32, board_height: u32) -> (u32, u32) {
        (
            board_width * (self.block_width + BORDER_WIDTH),
            board_height * (self.block_height + BORDER_WIDTH),
        )
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            head_colour: Self::DEFAULT_HEAD,
            body_colour: Self::DEFAULT_BODY,
            apple_colour: Self::DEFAULT_APPLE,
            background_colour: Self::DEFAULT_BACKGROUND,
            border_colour: Self::DEFAULT_BORDER,
            block_width: Self::DEFAULT_BLOCK_SIZE,
            block_height: Self::DEFAULT_BLOCK_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub board_width: u32,
    pub board_height: u32,
    pub render: RenderConfig,
    /// Used by the window for stats and banners only, never sent.
    pub text_colour: Rgb,
    pub tick_interval: Duration,
    /// Pause before the very first tick. Restarts skip it.
    pub startup_grace: Duration,
    pub request_timeout: Option<Duration>,
    pub protocol: Protocol,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            render: RenderConfig::default(),
            text_colour: Rgb::new(255, 255, 255),
            tick_interval: DEFAULT_TICK_INTERVAL,
            startup_grace: DEFAULT_STARTUP_GRACE,
            request_timeout: None,
            protocol: Protocol::default(),
        }
    }
}
