//! Loading schedules and advisory payloads from JSON.
//!
//! Loaders combine parsing, validation and checksumming. They report errors
//! with `anyhow` context and are meant for the edges of an application; the
//! engine itself only sees in-memory values.
//!
//! # Example
//!
//! ```no_run
//! use trial_burden::io::loaders::ScheduleLoader;
//! use std::path::Path;
//!
//! let loaded = ScheduleLoader::load_from_file(Path::new("schedule.json"))
//!     .expect("Failed to load");
//! println!("Loaded {} visits ({})", loaded.schedule.visits.len(), loaded.checksum);
//! ```

pub mod loaders;


pub use loaders::{
    calculate_checksum, schedule_checksum, AdvisoryLoader, ScheduleLoadResult, ScheduleLoader,
};
