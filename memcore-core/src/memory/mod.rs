pub mod episode;
pub mod importance;
pub mod record;
pub mod tier;

pub use episode::Episode;
pub use importance::Importance;
pub use record::{Record, RecordKind};
pub use tier::{CacheTier, CompressionPolicy};
