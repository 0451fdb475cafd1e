//! # Snake Client Library
//!
//! Client side of a server-authoritative snake game. The server owns the
//! board, the snake and every rule; this crate only steers, polls and shows
//! what comes back.
//!
//! ## Architecture Overview
//!
//! A single task runs the window's frame loop. Key presses go straight into
//! the direction buffer. On a fixed, drift-corrected cadence the session
//! controller sends the buffered direction to `/move`, interprets the reply
//! and asks `/image` to turn the returned board into a frame.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! The session controller and its state machine:
//! - Game creation and token ownership
//! - Tick handling and dead/won detection
//! - Restart after a finished game
//! - The closing guard shared by every entry point
//!
//! ### Input Module (`input`)
//! Arrow-key handling and the no-reversal rule.
//!
//! ### Network Module (`network`)
//! Blocking JSON-over-HTTP transport and the endpoint list.
//!
//! ### Board Image Module (`board_image`)
//! Merges a board with the colour/block configuration, fetches the rendered
//! PNG and decodes it.
//!
//! ### Rendering Module (`rendering`)
//! The display sink trait and the macroquad window implementing it.
//!
//! ### Ticker Module (`ticker`)
//! Phase-aligned tick scheduling.
//!
//! ## Usage Example
//!
//! ```no_run
//! use client::config::ClientConfig;
//! use client::game::SessionController;
//! use client::network::HttpTransport;
//! use client::rendering::Renderer;
//! use client::ticker::TickScheduler;
//! use std::time::Instant;
//!
//! # async fn play() -> Result<(), client::error::ClientError> {
//! let config = ClientConfig::default();
//! let transport = HttpTransport::new(&config.server_url, config.request_timeout)?;
//! let mut game = SessionController::start(transport, Renderer::new(&config), &config)?;
//! let mut ticks = TickScheduler::new(Instant::now() + config.startup_grace, config.tick_interval);
//!
//! while !game.is_closing() {
//!     if ticks.poll(Instant::now()) {
//!         game.tick()?;
//!     }
//!     game.sink().draw();
//!     macroquad::window::next_frame().await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod board_image;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
pub mod ticker;

#[cfg(test)]
mod testing;
