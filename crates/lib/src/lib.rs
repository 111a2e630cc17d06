//! Weather bot core library: webhook server, chat platform client, weather and zip
//! lookups, shared by the CLI.

pub mod channels;
pub mod config;
pub mod responder;
pub mod weather;
pub mod webhook;
