//! Session controller: owns the server token and drives the game through
//! `Uninitialized -> Starting -> Running -> Dead | Won`, with restart from the
//! terminal states and an orthogonal, terminal closing flag.

use crate::board_image::BoardRenderer;
use crate::config::ClientConfig;
use crate::error::{ClientError, ConnectivityError};
use crate::input::DirectionBuffer;
use crate::network::{Endpoint, Transport};
use crate::rendering::{DisplaySink, Outcome, Stats};
use log::{debug, info, trace, warn};
use macroquad::prelude::KeyCode;
use shared::{
    BoardSnapshot, DestroyReply, DestroyRequest, Direction, MoveReply, MoveRequest, Protocol,
    Reply, StartReply, StartRequest,
};
use std::time::Duration;

/// How long closing waits for the server to release a running game.
pub const RELEASE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Starting,
    Running,
    Dead,
    Won,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Dead | SessionState::Won)
    }
}

/// Client-side record of one game, keyed by the server-issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    pub direction: Direction,
    pub alive: bool,
    pub won: bool,
    pub length: u32,
    pub eaten: u32,
    locked: bool,
}

impl Session {
    fn new(token: String, direction: Direction) -> Self {
        Self {
            token,
            direction,
            alive: true,
            won: false,
            length: 0,
            eaten: 0,
            locked: false,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Set once, by the first dead or won reply.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Board and counters updated.
    Advanced,
    /// The server answered with a soft error; nothing changed.
    Rejected,
    Finished(Outcome),
    /// No game is running, so no request was made.
    Suppressed,
    Closed,
}

pub struct SessionController<T: Transport, D: DisplaySink> {
    transport: T,
    sink: D,
    renderer: BoardRenderer,
    protocol: Protocol,
    board_width: u32,
    board_height: u32,
    buffer: DirectionBuffer,
    session: Option<Session>,
    state: SessionState,
    closing: bool,
}

impl<T: Transport, D: DisplaySink> SessionController<T, D> {
    /// Shows the empty board and creates the first game. Failing to create
    /// it is fatal: there is no session to fall back to.
    pub fn start(transport: T, sink: D, config: &ClientConfig) -> Result<Self, ClientError> {
        let mut controller = SessionController {
            transport,
            sink,
            renderer: BoardRenderer::new(config.render, config.protocol),
            protocol: config.protocol,
            board_width: config.board_width,
            board_height: config.board_height,
            buffer: DirectionBuffer::new(),
            session: None,
            state: SessionState::Uninitialized,
            closing: false,
        };

        controller.begin_session()?;
        Ok(controller)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Direction the next tick will send.
    pub fn direction(&self) -> Direction {
        self.buffer.current()
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn on_key(&mut self, key: KeyCode) -> bool {
        self.guarded("key press", |c| c.buffer.on_key(key)).unwrap_or(false)
    }

    /// One `/move` round-trip. Only a lost connection is an error; soft
    /// errors and terminal replies are reported through [`TickOutcome`].
    pub fn tick(&mut self) -> Result<TickOutcome, ClientError> {
        self.guarded("tick", Self::poll_server).unwrap_or(Ok(TickOutcome::Closed))
    }

    /// Replaces a finished session with a fresh one. Returns `Ok(false)` when
    /// nothing was restarted (game still running, or closing).
    pub fn restart(&mut self) -> Result<bool, ClientError> {
        self.guarded("restart", |c| {
            if !c.state.is_terminal() {
                debug!("Restart ignored while {:?}", c.state);
                return Ok(false);
            }

            info!("Restarting");
            c.sink.clear_outcome();
            c.begin_session()?;
            Ok(true)
        })
        .unwrap_or(Ok(false))
    }

    /// Enters the closing state. A game still in progress is handed back to
    /// the server first; after this every entry point is a no-op.
    pub fn close(&mut self) {
        self.guarded("close", |c| {
            if c.state == SessionState::Running {
                if let Some(session) = &c.session {
                    c.destroy_game(session.token());
                }
            }

            info!("Closing");
            c.closing = true;
        });
    }

    /// The single entry check for every externally triggered operation.
    fn guarded<R>(&mut self, operation: &str, action: impl FnOnce(&mut Self) -> R) -> Option<R> {
        if self.closing {
            trace!("Ignoring {} while closing", operation);
            return None;
        }

        Some(action(self))
    }

    fn begin_session(&mut self) -> Result<(), ClientError> {
        self.state = SessionState::Starting;
        self.session = None;
        self.buffer.reset();

        let empty = BoardSnapshot::empty(self.board_width, self.board_height);
        self.show_board(&empty);

        let token = self.create_game()?;
        info!("Game started");
        debug!("Session token {}", token);

        self.session = Some(Session::new(token, self.buffer.current()));
        self.state = SessionState::Running;
        Ok(())
    }

    fn create_game(&self) -> Result<String, ClientError> {
        let body = self.protocol.encode(&StartRequest {
            width: self.board_width,
            height: self.board_height,
        })?;

        let reply = self.transport.post(Endpoint::Start, &body)?;

        match self.protocol.decode::<StartReply>(reply) {
            Ok(Reply::Ok(StartReply { token, message })) => {
                if let Some(message) = message {
                    debug!("Server: {}", message);
                }
                if token.is_empty() {
                    return Err(ClientError::StartRejected(
                        "server issued an empty token".to_string(),
                    ));
                }
                Ok(token)
            }
            Ok(Reply::Error(message)) => Err(ClientError::StartRejected(message)),
            Err(e) => Err(malformed(Endpoint::Start, e).into()),
        }
    }

    fn poll_server(&mut self) -> Result<TickOutcome, ClientError> {
        let token = match (&self.state, &self.session) {
            (SessionState::Running, Some(session)) if !session.is_locked() => session.token.clone(),
            _ => return Ok(TickOutcome::Suppressed),
        };

        // Committed only once the server has accepted the move
        let direction = self.buffer.current();
        let body = self.protocol.encode(&MoveRequest {
            token: &token,
            direction: self.protocol.direction(direction),
        })?;

        let reply = self.transport.post(Endpoint::Move, &body)?;

        match self.protocol.decode::<MoveReply>(reply) {
            Ok(Reply::Ok(reply)) => {
                self.buffer.commit();
                Ok(self.apply_move(direction, reply))
            }
            Ok(Reply::Error(message)) => {
                warn!("Server rejected move: {}", message);
                Ok(TickOutcome::Rejected)
            }
            Err(e) => Err(malformed(Endpoint::Move, e).into()),
        }
    }

    fn apply_move(&mut self, direction: Direction, reply: MoveReply) -> TickOutcome {
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Suppressed;
        };

        session.direction = direction;
        session.alive = reply.alive;
        session.won = reply.won;
        session.length = reply.length;
        session.eaten = reply.eaten;

        let stats = Stats {
            length: reply.length,
            eaten: reply.eaten,
        };

        let finished = if !reply.alive {
            Some((SessionState::Dead, Outcome::Died { length: reply.length }))
        } else if reply.won {
            Some((SessionState::Won, Outcome::Won { length: reply.length }))
        } else {
            None
        };

        if let Some((state, outcome)) = finished {
            session.locked = true;
            self.state = state;
            info!("{}", outcome);
            self.sink.show_stats(stats);
            self.sink.show_outcome(outcome);
            return TickOutcome::Finished(outcome);
        }

        trace!("Moved {} (length {}, eaten {})", direction, reply.length, reply.eaten);
        self.sink.show_stats(stats);
        self.show_board(&reply.board);
        TickOutcome::Advanced
    }

    /// A failed frame is never fatal; the previous one stays up.
    fn show_board(&mut self, board: &BoardSnapshot) {
        match self.renderer.render(&self.transport, board) {
            Ok(image) => self.sink.show_frame(&image),
            Err(e) => warn!("Keeping previous frame: {}", e),
        }
    }

    fn destroy_game(&self, token: &str) {
        let body = match self.protocol.encode(&DestroyRequest { token }) {
            Ok(body) => body,
            Err(e) => {
                warn!("Could not encode destroy request: {}", e);
                return;
            }
        };

        match self.transport.post_within(Endpoint::Destroy, &body, RELEASE_TIMEOUT) {
            Ok(reply) => match self.protocol.decode::<DestroyReply>(reply) {
                Ok(Reply::Ok(_)) => debug!("Server released the game"),
                Ok(Reply::Error(message)) => debug!("Server did not release the game: {}", message),
                Err(e) => debug!("Unexpected destroy reply: {}", e),
            },
            Err(e) => warn!("Could not release game on close: {}", e),
        }
    }
}

fn malformed(endpoint: Endpoint, error: serde_json::Error) -> ConnectivityError {
    ConnectivityError::Malformed {
        url: endpoint.to_string(),
        reason: error.to_string(),
    }
}
