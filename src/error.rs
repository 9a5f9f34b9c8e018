use thiserror::Error;

#[derive(Error, Debug)]
pub enum VarThumbError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive could not be read: {message}")]
    Zip {
        message: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Image operation failed: {message}")]
    Image {
        message: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Font could not be loaded: {path}")]
    Font { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Archive entry {entry} is too large ({size} bytes, limit {limit})")]
    EntryTooLarge { entry: String, size: u64, limit: u64 },

    #[error("Grid {rows}x{cols} cannot hold {images} images")]
    InvalidGrid { rows: u32, cols: u32, images: usize },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for VarThumbError {
    fn user_message(&self) -> String {
        match self {
            VarThumbError::Zip { message, .. } => {
                format!("Archive could not be read: {}", message)
            }
            VarThumbError::Image { message, .. } => {
                format!("Image operation failed: {}", message)
            }
            VarThumbError::Font { path } => {
                format!("Font could not be loaded from: {}", path)
            }
            VarThumbError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            VarThumbError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            VarThumbError::InvalidGrid { rows, cols, images } => {
                format!(
                    "A {}x{} grid has {} cells but {} images were given",
                    rows,
                    cols,
                    rows * cols,
                    images
                )
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            VarThumbError::Zip { .. } => Some(
                "The file may be truncated or not a ZIP container. Re-download the package and try again.".to_string()
            ),
            VarThumbError::EntryTooLarge { .. } => Some(
                "The archive declares an implausibly large preview image. It is probably corrupt; re-download the package.".to_string()
            ),
            VarThumbError::Font { .. } => Some(
                "Point --font (or montage.font_path) at a readable TrueType or OpenType font file.".to_string()
            ),
            VarThumbError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config.".to_string()
            ),
            VarThumbError::InvalidPath { .. } => Some(
                "Check that the source path exists and that you can read it.".to_string()
            ),
            VarThumbError::InvalidGrid { .. } => Some(
                "Omit --grid to size the grid automatically, or pick ROWSxCOLS large enough for every image.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for VarThumbError {
    fn from(error: zip::result::ZipError) -> Self {
        match error {
            zip::result::ZipError::Io(io) => VarThumbError::Io(io),
            other => VarThumbError::Zip {
                message: other.to_string(),
                source: other,
            },
        }
    }
}

impl From<image::ImageError> for VarThumbError {
    fn from(error: image::ImageError) -> Self {
        match error {
            image::ImageError::IoError(io) => VarThumbError::Io(io),
            other => VarThumbError::Image {
                message: other.to_string(),
                source: other,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, VarThumbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = VarThumbError::InvalidGrid {
            rows: 2,
            cols: 2,
            images: 5,
        };
        assert!(error.user_message().contains("4 cells"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_zip_error_conversion() {
        let zip_error = zip::result::ZipError::InvalidArchive("bad magic".into());
        let error = VarThumbError::from(zip_error);
        assert!(matches!(error, VarThumbError::Zip { .. }));
        assert!(error.user_message().contains("bad magic"));
    }

    #[test]
    fn test_zip_io_error_unwraps_to_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = VarThumbError::from(zip::result::ZipError::Io(io));
        assert!(matches!(error, VarThumbError::Io(_)));
        assert!(error.suggestion().is_none());
    }
}
