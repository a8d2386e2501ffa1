//! Domain logic - pure business rules independent of git operations

pub mod commit;
pub mod tag;
pub mod version;

pub use commit::{CommitParser, ParsedCommit};
pub use tag::TagPattern;
pub use version::{increment, parse_version, Bump};
