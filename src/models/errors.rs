use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Unexpected response from {endpoint}: {reason}")]
    UnexpectedResponse { endpoint: String, reason: String },
    #[error("Runner returned no runs for {src}:{test}")]
    NoRuns { src: String, test: String },
    #[error("Runner returned an error for {endpoint}: {message}")]
    Rejected { endpoint: String, message: String },
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("No trace recorded under label {label}")]
    UnknownLabel { label: String },
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unknown test {test} in {src}")]
    UnknownTest { src: String, test: String },
    #[error("Unknown test source {src}")]
    UnknownSource { src: String },
}
