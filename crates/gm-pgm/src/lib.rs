//! Raw PGM (`P5`) codec.
//!
//! Header layout: `P5`, whitespace, width, whitespace, height, whitespace,
//! maxval, exactly one whitespace byte, then `width * height` raw samples in
//! raster order. `#` comments running to end of line may appear wherever
//! header whitespace is allowed.
//!
//! Width and height must be positive and maxval must lie in `1..=255`.
//! Readers never return a partially decoded image. Writers emit
//! `P5\n<width> <height>\n<maxval>\n`; a failed [`save`] may leave a truncated
//! file behind.

mod error;
mod read;
mod write;

pub use error::{HeaderField, PgmError};
pub use read::{load, read_pgm};
pub use write::{save, write_pgm};
