//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the learning core and the
//! outside world. Following hexagonal architecture, these traits are owned by
//! the domain and implemented by adapters.

pub mod learner;
pub mod observer;
pub mod repository;

pub use learner::Learner;
pub use observer::{EpisodeReport, EpisodeResult, Observer};
pub use repository::ValueMapRepository;
