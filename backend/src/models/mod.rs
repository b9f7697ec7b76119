pub mod findings;
pub mod schedule;
pub mod scores;

pub use findings::*;
pub use schedule::*;
pub use scores::*;
