pub mod loader;
pub mod logging;
pub mod presets;
pub mod rules;

pub use loader::{BracketRecord, RuleSetLoader, RuleSetLoaderError};
pub use presets::ProfilePreset;
