pub mod constants;
pub mod context;
pub mod event;
pub mod sample;

pub use context::PublishContext;
pub use event::{Event, EventState};
pub use sample::{Metadata, Sample};
