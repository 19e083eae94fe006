//! Project configuration loaded from `.chaffvault.toml`.

mod settings;

pub use settings::Settings;
