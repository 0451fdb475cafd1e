use crate::config::ClientConfig;
use macroquad::prelude::*;
use shared::Rgb;
use std::fmt;

/// Height of the status strip drawn under the board.
pub const STATUS_BAR_HEIGHT: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub length: u32,
    pub eaten: u32,
}

/// How a game ended, with the final snake length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won { length: u32 },
    Died { length: u32 },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Won { length } => write!(f, "You Won! Final Length {}", length),
            Outcome::Died { length } => write!(f, "You Died! Final Length {}", length),
        }
    }
}

/// Where the session controller sends everything the player should see.
pub trait DisplaySink {
    fn show_frame(&mut self, image: &Image);
    fn show_stats(&mut self, stats: Stats);
    fn show_outcome(&mut self, outcome: Outcome);
    fn clear_outcome(&mut self);
}

/// macroquad window: the latest board frame, a status line and, once the
/// game is over, a banner.
pub struct Renderer {
    frame: Option<Texture2D>,
    stats: Stats,
    outcome: Option<Outcome>,
    text_colour: Color,
    board_width: f32,
    board_height: f32,
}

impl Renderer {
    pub fn new(config: &ClientConfig) -> Self {
        let (width, height) = config
            .render
            .image_size(config.board_width, config.board_height);

        Renderer {
            frame: None,
            stats: Stats::default(),
            outcome: None,
            text_colour: colour(config.text_colour),
            board_width: width as f32,
            board_height: height as f32,
        }
    }

    /// Window size that fits the board plus the status strip.
    pub fn window_size(config: &ClientConfig) -> (i32, i32) {
        let (width, height) = config
            .render
            .image_size(config.board_width, config.board_height);
        (width.max(200) as i32, height as i32 + STATUS_BAR_HEIGHT as i32)
    }

    pub fn draw(&self) {
        clear_background(Color::from_rgba(26, 26, 26, 255));

        if let Some(frame) = &self.frame {
            draw_texture(frame, 0.0, 0.0, WHITE);
        }

        let status = format!("Length: {}   Eaten: {}", self.stats.length, self.stats.eaten);
        draw_text(&status, 10.0, self.board_height + 25.0, 22.0, self.text_colour);
        draw_text(
            "Arrows to steer, Esc to quit",
            10.0,
            self.board_height + 48.0,
            16.0,
            self.text_colour,
        );

        if let Some(outcome) = self.outcome {
            self.draw_banner(outcome);
        }
    }

    fn draw_banner(&self, outcome: Outcome) {
        let banner_height = 70.0;
        let top = (self.board_height - banner_height) / 2.0;
        draw_rectangle(
            0.0,
            top,
            self.board_width,
            banner_height,
            Color::from_rgba(0, 0, 0, 180),
        );

        let headline = outcome.to_string();
        let size = measure_text(&headline, None, 30, 1.0);
        draw_text(
            &headline,
            (self.board_width - size.width) / 2.0,
            top + 32.0,
            30.0,
            self.text_colour,
        );

        let hint = "Press R to play again";
        let size = measure_text(hint, None, 18, 1.0);
        draw_text(
            hint,
            (self.board_width - size.width) / 2.0,
            top + 56.0,
            18.0,
            self.text_colour,
        );
    }
}

impl DisplaySink for Renderer {
    fn show_frame(&mut self, image: &Image) {
        let texture = Texture2D::from_image(image);
        texture.set_filter(FilterMode::Nearest);
        self.frame = Some(texture);
    }

    fn show_stats(&mut self, stats: Stats) {
        self.stats = stats;
    }

    fn show_outcome(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }

    fn clear_outcome(&mut self) {
        self.outcome = None;
        self.stats = Stats::default();
    }
}

fn colour(rgb: Rgb) -> Color {
    Color::from_rgba(rgb.r(), rgb.g(), rgb.b(), 255)
}
