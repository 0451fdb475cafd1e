//! Wire protocol shared by the snake client and its tests.
//!
//! The server speaks JSON over HTTP POST. Request and reply bodies are plain
//! serde structs written in the current snake_case form; [`Protocol`] takes
//! care of the key casing of older servers and of how directions are spelled.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BOARD_WIDTH: u32 = 10;
pub const DEFAULT_BOARD_HEIGHT: u32 = 10;

/// Reserved reply key carrying a server-side (soft) error.
pub const ERROR_KEY: &str = "error";

/// A JSON object as sent to and received from the server.
pub type JsonObject = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The one direction that may never follow `self`.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_word(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn as_letter(self) -> &'static str {
        match self {
            Direction::Up => "u",
            Direction::Down => "d",
            Direction::Left => "l",
            Direction::Right => "r",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_word())
    }
}

/// A single board square as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Head,
    Body,
    Apple,
}

impl Cell {
    pub fn marker(self) -> &'static str {
        match self {
            Cell::Empty => " ",
            Cell::Head => "h",
            Cell::Body => "s",
            Cell::Apple => "a",
        }
    }

    /// Markers are case-insensitive; anything unknown renders as background.
    pub fn from_marker(marker: &str) -> Cell {
        match marker.to_ascii_lowercase().as_str() {
            "h" => Cell::Head,
            "s" => Cell::Body,
            "a" => Cell::Apple,
            _ => Cell::Empty,
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.marker())
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let marker = String::deserialize(deserializer)?;
        Ok(Cell::from_marker(&marker))
    }
}

/// One authoritative board received from the server, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardSnapshot {
    rows: Vec<Vec<Cell>>,
}

impl BoardSnapshot {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// An all-empty board, used for the frame shown before the first move.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            rows: vec![vec![Cell::Empty; width as usize]; height as usize],
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb([r, g, b])
    }

    pub fn r(self) -> u8 {
        self.0[0]
    }

    pub fn g(self) -> u8 {
        self.0[1]
    }

    pub fn b(self) -> u8 {
        self.0[2]
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <[u8; 3]>::deserialize(deserializer).map(Rgb)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r(), self.g(), self.b())
    }
}

impl FromStr for Rgb {
    type Err = String;

    /// Parses `r,g,b` with each component in `0..=255`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(format!("expected r,g,b but got '{}'", s));
        }

        let mut channels = [0u8; 3];
        for (channel, part) in channels.iter_mut().zip(&parts) {
            *channel = part
                .parse()
                .map_err(|_| format!("colour component '{}' is not in 0..=255", part))?;
        }

        Ok(Rgb(channels))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartRequest {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartReply {
    pub token: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveRequest<'a> {
    pub token: &'a str,
    pub direction: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoveReply {
    pub alive: bool,
    pub won: bool,
    pub length: u32,
    pub eaten: u32,
    pub board: BoardSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest<'a> {
    pub board_positions: &'a BoardSnapshot,
    pub head_colour: Rgb,
    pub body_colour: Rgb,
    pub apple_colour: Rgb,
    pub background_colour: Rgb,
    pub border_colour: Rgb,
    pub block_width: u32,
    pub block_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageReply {
    pub image: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DestroyRequest<'a> {
    pub token: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DestroyReply {
    #[serde(default)]
    pub message: Option<String>,
}

/// A parsed reply: either the endpoint's payload or the server's soft error.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Ok(T),
    Error(String),
}

/// Key casing used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolVersion {
    /// Previous generation: `Token`, `BoardPositions`, `Error`, ...
    V1,
    /// Current: `token`, `board_positions`, `error`, ...
    #[default]
    V2,
}

impl FromStr for ProtocolVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(ProtocolVersion::V1),
            "v2" | "2" => Ok(ProtocolVersion::V2),
            other => Err(format!("unknown protocol version '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionEncoding {
    /// `"up"`, `"down"`, `"left"`, `"right"`
    #[default]
    Word,
    /// `"u"`, `"d"`, `"l"`, `"r"`
    Letter,
}

impl FromStr for DirectionEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "word" => Ok(DirectionEncoding::Word),
            "letter" => Ok(DirectionEncoding::Letter),
            other => Err(format!("unknown direction encoding '{}'", other)),
        }
    }
}

/// The negotiated wire format: which key casing and direction spelling the
/// server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Protocol {
    pub version: ProtocolVersion,
    pub directions: DirectionEncoding,
}

impl Protocol {
    pub fn new(version: ProtocolVersion, directions: DirectionEncoding) -> Self {
        Self {
            version,
            directions,
        }
    }

    pub fn direction(&self, direction: Direction) -> &'static str {
        match self.directions {
            DirectionEncoding::Word => direction.as_word(),
            DirectionEncoding::Letter => direction.as_letter(),
        }
    }

    /// Serializes a request body into an object keyed for this protocol.
    pub fn encode<T: Serialize>(&self, body: &T) -> Result<JsonObject, serde_json::Error> {
        let object = match serde_json::to_value(body)? {
            Value::Object(object) => object,
            _ => {
                return Err(serde::ser::Error::custom(
                    "request body must serialize to a JSON object",
                ))
            }
        };

        Ok(match self.version {
            ProtocolVersion::V2 => object,
            ProtocolVersion::V1 => object
                .into_iter()
                .map(|(key, value)| (snake_to_pascal(&key), value))
                .collect(),
        })
    }

    /// Interprets a reply object. The soft `error` key wins over any payload
    /// fields; a missing or mistyped payload field is a decode error.
    pub fn decode<T: DeserializeOwned>(
        &self,
        reply: JsonObject,
    ) -> Result<Reply<T>, serde_json::Error> {
        let reply: JsonObject = match self.version {
            ProtocolVersion::V2 => reply,
            ProtocolVersion::V1 => reply
                .into_iter()
                .map(|(key, value)| (pascal_to_snake(&key), value))
                .collect(),
        };

        if let Some(error) = reply.get(ERROR_KEY) {
            let message = match error {
                Value::String(message) => message.clone(),
                other => other.to_string(),
            };
            return Ok(Reply::Error(message));
        }

        serde_json::from_value(Value::Object(reply)).map(Reply::Ok)
    }
}

/// `board_positions` -> `BoardPositions`
pub fn snake_to_pascal(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// `BoardPositions` -> `board_positions`
pub fn pascal_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
