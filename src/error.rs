use std::path::PathBuf;

/// Errors raised while reading configuration or building catalog entries.
///
/// Only `EmptyName` and `InvalidName` can abort a group; everything else is
/// raised by emoji construction or by the loader. The tree builder turns all
/// of them into per-key warnings, so none of these ever abort a whole load.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The key normalised to nothing (for example `"___"` or `"!!!"`).
    #[error("the name '{key}' is empty once normalised")]
    EmptyName { key: String },

    /// No name-shaped segment could be read from the key.
    #[error("no valid name could be read from '{key}'")]
    InvalidName { key: String },

    /// An emoji definition without a single usable emoticon.
    #[error("'{key}' does not define any emoticons")]
    MissingEmoticons { key: String },

    /// An emoji definition without a single usable emoji.
    #[error("'{key}' does not define any emojis")]
    MissingEmojis { key: String },

    /// The emoticons of `key` could not be compiled into a matcher.
    #[error("the emoticons of '{key}' could not be compiled: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    /// A value that was expected to be a nested mapping is something else.
    #[error("'{path}' is not a configuration section")]
    NotASection { path: String },

    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
