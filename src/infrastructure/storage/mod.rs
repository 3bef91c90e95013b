mod paths;
mod fs_image_storage;
pub use paths::*;
pub use fs_image_storage::FsImageStorage;
