//! Game server protocol.
//!
//! The server speaks line-delimited JSON over stdin/stdout: a handshake,
//! a stream of init batches closed by `"END_INIT"`, then one turn message
//! per tick until `"END"`. We answer every turn with exactly one action.

pub mod channel;
pub mod message;

pub use channel::{MessageReader, MessageWriter, ProtocolError};
pub use message::{
    parse_message, Envelope, Handshake, InitPayload, TurnPayload, END_INIT_SIGNAL, END_SIGNAL,
};
