use bridge_traits::error::BridgeError;
use bridge_traits::types::FolderId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// The MIME type of a picked file has no matching media extension
    #[error("Wrong file type: {mime}")]
    WrongFileType { mime: String },

    #[error("Cannot move folder {folder_id} into folder {target_id}: the target is the folder itself or lies below it")]
    InvalidMoveTarget {
        folder_id: FolderId,
        target_id: FolderId,
    },

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },
}

impl LibraryError {
    pub(crate) fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
