//! Line-oriented message transport.
//!
//! Reads one JSON document per line from the server and writes one JSON
//! action per line back, flushing after each so the server never waits on
//! a buffered response.

use std::io::{self, BufRead, Write};

use serde::de::DeserializeOwned;

use super::message::{
    parse_message, Envelope, Handshake, InitPayload, TurnPayload, END_INIT_SIGNAL, END_SIGNAL,
};
use crate::engine::Action;
use crate::world::{ObjectBatch, Turn};

/// Errors raised while talking to the server.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input closed before the game ended")]
    UnexpectedEof,

    #[error("unexpected signal '{0}'")]
    UnexpectedSignal(String),
}

/// Reads server messages from a buffered input.
pub struct MessageReader<R> {
    input: R,
    line: String,
}

impl<R: BufRead> MessageReader<R> {
    pub fn new(input: R) -> Self {
        MessageReader {
            input,
            line: String::new(),
        }
    }

    /// Reads the next non-blank line and decodes it.
    fn next_envelope<T: DeserializeOwned>(&mut self) -> Result<Envelope<T>, ProtocolError> {
        loop {
            self.line.clear();
            if self.input.read_line(&mut self.line)? == 0 {
                return Err(ProtocolError::UnexpectedEof);
            }
            if !self.line.trim().is_empty() {
                return Ok(parse_message(&self.line)?);
            }
        }
    }

    /// Reads the opening handshake.
    pub fn read_handshake(&mut self) -> Result<Handshake, ProtocolError> {
        match self.next_envelope::<Handshake>()? {
            Envelope::Message { message } => Ok(message),
            Envelope::Signal(s) => Err(ProtocolError::UnexpectedSignal(s)),
        }
    }

    /// Reads init batches up to and including the end-of-init signal.
    pub fn read_init(&mut self) -> Result<Vec<ObjectBatch>, ProtocolError> {
        let mut batches = Vec::new();
        loop {
            match self.next_envelope::<InitPayload>()? {
                Envelope::Message { message } => batches.push(message.updated_objects),
                Envelope::Signal(s) if s == END_INIT_SIGNAL => return Ok(batches),
                Envelope::Signal(s) => return Err(ProtocolError::UnexpectedSignal(s)),
            }
        }
    }

    /// Reads one turn. The end-of-game signal maps to `Turn::End`.
    pub fn read_turn(&mut self) -> Result<Turn, ProtocolError> {
        match self.next_envelope::<TurnPayload>()? {
            Envelope::Message { message } => Ok(Turn::Update(message.into())),
            Envelope::Signal(s) if s == END_SIGNAL => Ok(Turn::End),
            Envelope::Signal(s) => Err(ProtocolError::UnexpectedSignal(s)),
        }
    }
}

/// Writes actions to the server.
pub struct MessageWriter<W> {
    output: W,
}

impl<W: Write> MessageWriter<W> {
    pub fn new(output: W) -> Self {
        MessageWriter { output }
    }

    /// Writes one action as a single JSON line and flushes.
    pub fn post_action(&mut self, action: &Action) -> Result<(), ProtocolError> {
        serde_json::to_writer(&mut self.output, action)?;
        writeln!(self.output)?;
        self.output.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}
