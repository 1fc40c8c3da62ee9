mod event;
mod writer;

pub use event::{Event, EventDefaults};
pub use writer::{EventStream, EventWriter};
