//! Reference transports
//!
//! The conversation core is transport-agnostic; this module wires it to a
//! WebSocket server with a small JSON envelope. The binary also offers a
//! stdin REPL, which needs no server machinery.

pub mod ws;

pub use ws::{run, serve};
