//! Analysis engine for determining version bumps from commits

pub mod classifier;
pub mod detector;

pub use classifier::CommitClassifier;
pub use detector::{ReleaseDetector, ReleasePlan};
