use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use gm_core::{GrayImage, instr};
use log::debug;

use crate::error::PgmError;

/// Encodes `img` as raw PGM into `writer`.
pub fn write_pgm<W: Write>(img: &GrayImage, mut writer: W) -> Result<(), PgmError> {
    write!(
        writer,
        "P5\n{} {}\n{}\n",
        img.width(),
        img.height(),
        img.maxval()
    )?;
    writer.write_all(img.data())?;
    instr::add_pixmem(img.data().len() as u64);
    Ok(())
}

/// Writes `img` to `path`, replacing any existing file.
pub fn save(img: &GrayImage, path: impl AsRef<Path>) -> Result<(), PgmError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_pgm(img, &mut writer)?;
    writer.flush()?;
    debug!(
        "saved {} ({}x{}, maxval {})",
        path.display(),
        img.width(),
        img.height(),
        img.maxval()
    );
    Ok(())
}
