use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ManifestError {
    #[error("yaml error: {0}")]
    Yaml(String),

    #[error("manifest is not valid utf-8")]
    Encoding,

    #[error("{0}")]
    Invalid(String),
}

impl From<serde_yaml::Error> for ManifestError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value.to_string())
    }
}
