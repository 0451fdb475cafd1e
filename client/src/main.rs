use clap::Parser;
use client::config::{ClientConfig, RenderConfig};
use client::error::ClientError;
use client::game::SessionController;
use client::input::STEERING_KEYS;
use client::network::{HttpTransport, DEFAULT_SERVER_URL};
use client::rendering::Renderer;
use client::ticker::TickScheduler;
use log::{error, info};
use macroquad::prelude::*;
use shared::{DirectionEncoding, Protocol, ProtocolVersion, Rgb};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the snake server
    #[arg(short = 's', long, default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Board width in blocks
    #[arg(short = 'w', long, default_value_t = shared::DEFAULT_BOARD_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Board height in blocks (no short flag to avoid conflict with --help)
    #[arg(long, default_value_t = shared::DEFAULT_BOARD_HEIGHT, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Block width in pixels
    #[arg(long, default_value_t = RenderConfig::DEFAULT_BLOCK_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    block_width: u32,

    /// Block height in pixels
    #[arg(long, default_value_t = RenderConfig::DEFAULT_BLOCK_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    block_height: u32,

    /// Snake head colour as r,g,b
    #[arg(long, default_value = "0,0,255")]
    head_colour: Rgb,

    /// Snake body colour as r,g,b
    #[arg(long, default_value = "50,130,170")]
    body_colour: Rgb,

    /// Apple colour as r,g,b
    #[arg(long, default_value = "255,0,0")]
    apple_colour: Rgb,

    /// Empty square colour as r,g,b
    #[arg(long, default_value = "60,170,50")]
    background_colour: Rgb,

    /// Grid line colour as r,g,b
    #[arg(long, default_value = "255,255,255")]
    border_colour: Rgb,

    /// Status and banner text colour as r,g,b
    #[arg(long, default_value = "255,255,255")]
    text_colour: Rgb,

    /// Milliseconds between moves
    #[arg(short = 't', long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Pause before the first move of the first game, in milliseconds
    #[arg(long, default_value_t = 3000)]
    startup_grace_ms: u64,

    /// Give up on a request after this many milliseconds (default: wait)
    #[arg(long)]
    request_timeout_ms: Option<u64>,

    /// Wire key casing: v2 (snake_case) or v1 (PascalCase)
    #[arg(long, default_value = "v2")]
    protocol: ProtocolVersion,

    /// How directions are spelled: word ("up") or letter ("u")
    #[arg(long, default_value = "word")]
    direction_encoding: DirectionEncoding,
}

impl Args {
    fn into_config(self) -> ClientConfig {
        ClientConfig {
            server_url: self.server,
            board_width: self.width,
            board_height: self.height,
            render: RenderConfig {
                head_colour: self.head_colour,
                body_colour: self.body_colour,
                apple_colour: self.apple_colour,
                background_colour: self.background_colour,
                border_colour: self.border_colour,
                block_width: self.block_width,
                block_height: self.block_height,
            },
            text_colour: self.text_colour,
            tick_interval: Duration::from_millis(self.tick_ms),
            startup_grace: Duration::from_millis(self.startup_grace_ms),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            protocol: Protocol::new(self.protocol, self.direction_encoding),
        }
    }
}

fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let config = Args::parse().into_config();

    info!("Starting client...");
    info!("Connecting to: {}", config.server_url);
    info!(
        "Board {}x{}, one move every {:?}",
        config.board_width, config.board_height, config.tick_interval
    );
    info!("Controls: arrow keys to steer, R to play again after a game ends, Esc to quit");

    let (width, height) = Renderer::window_size(&config);
    let window = Conf {
        window_title: "Snake".to_string(),
        window_width: width,
        window_height: height,
        window_resizable: false,
        ..Default::default()
    };

    macroquad::Window::from_config(window, run(config));
}

async fn run(config: ClientConfig) {
    if let Err(e) = play(&config).await {
        error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn play(config: &ClientConfig) -> Result<(), ClientError> {
    prevent_quit();

    let transport = HttpTransport::new(&config.server_url, config.request_timeout)?;
    let mut game = SessionController::start(transport, Renderer::new(config), config)?;
    let mut ticks = TickScheduler::new(Instant::now() + config.startup_grace, config.tick_interval);

    loop {
        if is_quit_requested() || is_key_pressed(KeyCode::Escape) {
            game.close();
        }

        if game.is_closing() {
            break;
        }

        for key in STEERING_KEYS {
            if is_key_pressed(key) {
                game.on_key(key);
            }
        }

        if is_key_pressed(KeyCode::R) && game.restart()? {
            ticks.reset(Instant::now());
        }

        if ticks.poll(Instant::now()) {
            game.tick()?;
        }

        game.sink().draw();
        next_frame().await;
    }

    Ok(())
}
