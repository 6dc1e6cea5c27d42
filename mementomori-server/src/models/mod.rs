//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod email;
pub mod user;
pub mod folder;
pub mod bubble;
pub mod record_id;
pub mod picture;

pub use validation::{required, ValidationError};
pub use email::Email;
pub use user::Username;
pub use folder::FolderName;
pub use bubble::Description;
pub use record_id::{IdInput, RecordId};
pub use picture::{to_data_uri, ImageKind, Picture, MAX_PICTURE_BYTES};
