use crate::data::SourceError;
use crate::render::RenderError;

/// Exit codes: 2 = usage/IO, 3 = nothing to render, 4 = data source failure.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        let code = match err {
            SourceError::Io { .. } => 2,
            _ => 4,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::new(3, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_errors_map_to_exit_codes() {
        let io = SourceError::Io {
            path: "x.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(AppError::from(io).exit_code(), 2);

        let parse = crate::data::parse_dataset("{").unwrap_err();
        let app = AppError::from(parse);
        assert_eq!(app.exit_code(), 4);
        assert!(app.to_string().starts_with("failed to parse GDP dataset"));

        assert_eq!(AppError::from(RenderError::EmptyDataset).exit_code(), 3);
    }
}
