pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("viewport width {width} ingested out of order (last ingested width: {last})")]
    OutOfOrderWidth { width: i32, last: i32 },

    #[error("no resolvable parent candidate for '{path}' at width {width}")]
    NoParentCandidate { path: String, width: i32 },

    #[error("structural path '{path}' is not present in the graph")]
    UnknownPath { path: String },

    #[error("cannot parse '{value}' of property '{property}' as a pixel length")]
    PixelUnit { property: String, value: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("driver: {message}")]
    Driver { message: String },
}

impl Error {
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }
}
