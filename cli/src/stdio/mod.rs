pub mod input;

pub use input::{decode_handshake_bytes, read_handshake};
