pub mod archive;
pub mod header;
pub mod image_io;
pub mod sidecar;
pub mod table;

pub use archive::Archive;
pub use header::CommentHeader;
pub use table::{write_table, Record, Table};
