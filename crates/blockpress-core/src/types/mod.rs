pub mod slug;
pub mod timestamp;
pub mod ulid;

pub use slug::{Slug, SlugError};
pub use timestamp::{Timestamp, TimestampError};
pub use ulid::{Ulid, UlidDecodeError, UlidError};
