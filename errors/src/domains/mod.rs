//! Domain error enums, one module per error code domain.

mod document;
mod enums;
mod filesystem;
mod internal;

pub use document::DocumentError;
pub use enums::EnumError;
pub use filesystem::FilesystemError;
pub use internal::InternalError;
