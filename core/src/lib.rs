pub mod api;
pub mod checkpoint;
pub mod config;
pub mod controller;
pub mod error;
pub mod events_out;
pub mod fields;
pub mod handshake;
pub mod scheduler;
pub mod scheme;

mod xml;
