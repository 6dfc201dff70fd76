use std::{error::Error, fmt};

pub type GenericError = Box<dyn Error + Send + Sync + 'static>;

pub type PingResult<T> = std::result::Result<T, GenericError>;

#[derive(Debug)]
pub struct PingError {
    pub message: String,
}

impl fmt::Display for PingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.message.is_empty() {
            write!(f, "ping error")
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl Error for PingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl From<std::io::Error> for PingError {
    fn from(error: std::io::Error) -> PingError {
        PingError {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn fmt_with_message() {
        let ping_error = PingError {
            message: "socket closed".to_string(),
        };
        assert_eq!("socket closed", format!("{ping_error}"));
    }

    #[test]
    fn fmt_without_message() {
        let ping_error = PingError {
            message: String::new(),
        };
        assert_eq!("ping error", format!("{ping_error}"));
    }

    #[test]
    fn from_std_io_error_keeps_the_message() {
        let std_io_error = std::io::Error::new(ErrorKind::Other, "no route to host");
        let ping_error = PingError::from(std_io_error);
        assert_eq!("no route to host", ping_error.message);
        assert!(ping_error.source().is_none());
    }
}
