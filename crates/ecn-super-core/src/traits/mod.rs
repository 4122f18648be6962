//! Collaborator seams for the driver.
//!
//! The analysis crate depends only on these traits; the storage crate
//! implements them over SQLite.

pub mod observation_sink;
pub mod observation_source;
pub mod window_source;

pub use observation_sink::ObservationSink;
pub use observation_source::ObservationSource;
pub use window_source::WindowSource;
