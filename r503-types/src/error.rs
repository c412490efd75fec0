pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    pub(crate) fn short(what: &str, expected: usize, actual: usize) -> Self {
        Self::Parse(format!(
            "{} payload too short: expected {} bytes, got {}",
            what, expected, actual
        ))
    }
}
