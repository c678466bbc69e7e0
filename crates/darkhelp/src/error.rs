use crate::network::BoxError;

/// An error type for the predictor.
#[derive(thiserror::Error, Debug)]
pub enum DarkHelpError {
    /// The network configuration filename is empty.
    #[error("Network configuration filename cannot be empty")]
    EmptyConfigFilename,

    /// The network weights filename is empty.
    #[error("Network weights filename cannot be empty")]
    EmptyWeightsFilename,

    /// The engine failed to load the configuration, the weights, or both.
    #[error("Failed to load the network. {0}")]
    NetworkLoadError(#[source] BoxError),

    /// The engine failed to run inference.
    #[error("Failed to run the network. {0}")]
    InferenceError(#[source] BoxError),

    /// Prediction was requested on an image without pixels.
    #[error("Cannot predict with an empty image")]
    EmptyImage,

    /// Annotation was requested before any prediction.
    #[error("Cannot annotate an empty image, predict must be called first")]
    NotPredicted,

    /// Error to manipulate an image.
    #[error(transparent)]
    ImageError(#[from] darkhelp_image::ImageError),

    /// Error to read or write an image file.
    #[error(transparent)]
    IoError(#[from] darkhelp_io::IoError),

    /// Error to read a names or configuration file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to parse a configuration.
    #[error("Failed to parse the configuration. {0}")]
    ConfigError(#[from] serde_json::Error),
}
