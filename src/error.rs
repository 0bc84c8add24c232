/// Errors raised at the edges of the crate: config files, image output and
/// the browser host. The effect engine itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum FxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("JavaScript error: {0}")]
    Js(String),
}

pub type FxResult<T> = Result<T, FxError>;
