use std::path::PathBuf;
use thiserror::Error;

/// Transport-level failures talking to the chat completions endpoint.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("missing API key")]
    MissingCredentials,

    #[error("request failed: {0}")]
    Request(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("empty response from the model")]
    EmptyResponse,

    #[error("failed to parse model response: {0}")]
    Parse(String),
}

/// The only failures that reach the controller as errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("Missing API key. Set OPENROUTER_API_KEY to enable AI questions.")]
    MissingCredentials,

    #[error("Could not generate questions via AI.")]
    Generation,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no files selected")]
    NoFiles,
}
