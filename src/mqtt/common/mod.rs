pub mod cursor;
pub mod tracing;

pub use cursor::ByteReader;
