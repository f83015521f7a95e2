pub mod config_manager;
pub mod destination;
pub mod error;
pub mod exporters;
pub mod mapping;
pub mod publisher;

pub use destination::{Destination, TransportKind};
pub use error::ForwarderError;
pub use publisher::{RiemannPublisher, SamplePublisher};
