//! Descriptor commands
//!
//! A sub-project descriptor may declare shell commands for two points of a
//! release:
//! - setNewVersion: replaces the built-in version file rewrite
//! - publishNewVersion: runs after the release commit and tag are pushed

pub mod context;
pub mod executor;

pub use context::{HookContext, HookStage};
pub use executor::{CommandRunner, RecordedCommand, RecordingRunner, ShellRunner};
