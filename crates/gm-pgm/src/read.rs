use std::fs::File;
use std::io::{self, BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use gm_core::{GrayImage, instr};
use log::debug;

use crate::error::{HeaderField, PgmError};

/// Decodes one raw PGM image from `reader`.
pub fn read_pgm<R: BufRead>(mut reader: R) -> Result<GrayImage, PgmError> {
    let mut magic = [0u8; 2];
    match reader.read_exact(&mut magic) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Err(PgmError::BadMagic),
        Err(e) => return Err(e.into()),
    }
    if &magic != b"P5" {
        return Err(PgmError::BadMagic);
    }

    let width = read_header_value(&mut reader, HeaderField::Width)?;
    let height = read_header_value(&mut reader, HeaderField::Height)?;
    let maxval = read_header_value(&mut reader, HeaderField::Maxval)?;
    if width == 0 {
        return Err(PgmError::BadHeader {
            field: HeaderField::Width,
        });
    }
    if height == 0 {
        return Err(PgmError::BadHeader {
            field: HeaderField::Height,
        });
    }
    let maxval = match u8::try_from(maxval) {
        Ok(v) if v > 0 => v,
        _ => {
            return Err(PgmError::BadHeader {
                field: HeaderField::Maxval,
            });
        }
    };

    match peek_byte(&mut reader)? {
        Some(b) if b.is_ascii_whitespace() => reader.consume(1),
        _ => return Err(PgmError::MissingSeparator),
    }

    let expected = width.checked_mul(height).ok_or(PgmError::BadHeader {
        field: HeaderField::Height,
    })?;
    // Grows with the bytes actually present, not with the header's claim.
    let mut data = Vec::new();
    read_payload(&mut reader, expected, &mut data)?;
    if data.len() != expected {
        return Err(PgmError::Truncated {
            expected,
            actual: data.len(),
        });
    }

    instr::add_pixmem(expected as u64);
    Ok(GrayImage::from_vec(width, height, maxval, data)?)
}

/// Opens and decodes the PGM file at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<GrayImage, PgmError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let img = read_pgm(BufReader::new(file))?;
    debug!(
        "loaded {} ({}x{}, maxval {})",
        path.display(),
        img.width(),
        img.height(),
        img.maxval()
    );
    Ok(img)
}

fn peek_byte<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    loop {
        match reader.fill_buf() {
            Ok(buf) => return Ok(buf.first().copied()),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Skips whitespace and `#` comment lines between header tokens.
fn skip_separators<R: BufRead>(reader: &mut R) -> io::Result<()> {
    let mut in_comment = false;
    while let Some(b) = peek_byte(reader)? {
        if in_comment {
            in_comment = b != b'\n';
        } else if b == b'#' {
            in_comment = true;
        } else if !b.is_ascii_whitespace() {
            break;
        }
        reader.consume(1);
    }
    Ok(())
}

/// Parses a non-negative decimal header value. The byte that ends the value
/// is left unread.
fn read_header_value<R: BufRead>(reader: &mut R, field: HeaderField) -> Result<usize, PgmError> {
    skip_separators(reader)?;

    let mut value: Option<usize> = None;
    while let Some(b) = peek_byte(reader)? {
        if !b.is_ascii_digit() {
            break;
        }
        let digit = usize::from(b - b'0');
        value = Some(
            value
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .ok_or(PgmError::BadHeader { field })?,
        );
        reader.consume(1);
    }

    value.ok_or(PgmError::BadHeader { field })
}

fn read_payload<R: BufRead>(reader: &mut R, len: usize, buf: &mut Vec<u8>) -> io::Result<()> {
    let limit = u64::try_from(len).unwrap_or(u64::MAX);
    reader.take(limit).read_to_end(buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::error::{HeaderField, PgmError};
    use crate::read::read_pgm;

    fn decode(bytes: &[u8]) -> Result<gm_core::GrayImage, PgmError> {
        read_pgm(Cursor::new(bytes))
    }

    #[test]
    fn reads_minimal_file() {
        let img = decode(b"P5\n3 2\n255\n\x01\x02\x03\x04\x05\x06").expect("valid pgm");
        assert_eq!(img.dims(), (3, 2));
        assert_eq!(img.maxval(), 255);
        assert_eq!(img.data(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn skips_comments_between_tokens() {
        let bytes = b"P5\n# made by hand\n2 # width\n# height next\n1\n# maxval\n100\n\x0a\x20";
        let img = decode(bytes).expect("valid pgm");
        assert_eq!(img.dims(), (2, 1));
        assert_eq!(img.maxval(), 100);
        // payload bytes that look like whitespace are still samples
        assert_eq!(img.data(), &[0x0a, 0x20]);
    }

    #[test]
    fn rejects_other_magic() {
        assert!(matches!(decode(b"P2\n1 1\n255\n0"), Err(PgmError::BadMagic)));
        assert!(matches!(decode(b"P"), Err(PgmError::BadMagic)));
    }

    #[test]
    fn rejects_bad_dimensions_and_maxval() {
        let cases: [(&[u8], HeaderField); 5] = [
            (b"P5\n0 1\n255\n", HeaderField::Width),
            (b"P5\n1 0\n255\n", HeaderField::Height),
            (b"P5\n-1 1\n255\n", HeaderField::Width),
            (b"P5\n1 1\n0\n", HeaderField::Maxval),
            (b"P5\n1 1\n256\n\x00", HeaderField::Maxval),
        ];
        for (bytes, field) in cases {
            match decode(bytes) {
                Err(PgmError::BadHeader { field: got }) => assert_eq!(got, field),
                other => panic!("expected bad {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_missing_separator_after_maxval() {
        assert!(matches!(
            decode(b"P5\n1 1\n255"),
            Err(PgmError::MissingSeparator)
        ));
    }

    #[test]
    fn huge_header_without_payload_fails_fast() {
        match decode(b"P5\n60000 60000\n255\n\x07") {
            Err(PgmError::Truncated { expected, actual }) => {
                assert_eq!((expected, actual), (3_600_000_000, 1));
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn overflowing_dimensions_are_bad_header() {
        let bytes = format!("P5\n{} 2\n255\n", usize::MAX);
        assert!(matches!(
            decode(bytes.as_bytes()),
            Err(PgmError::BadHeader {
                field: HeaderField::Height
            })
        ));
    }

    #[test]
    fn trailing_bytes_after_payload_are_ignored() {
        let img = decode(b"P5\n1 1\n255\n\x2a\xff\xff").expect("valid pgm");
        assert_eq!(img.data(), &[42]);
    }

    #[test]
    fn rejects_short_payload() {
        match decode(b"P5\n2 2\n255\n\x01\x02\x03") {
            Err(PgmError::Truncated { expected, actual }) => {
                assert_eq!((expected, actual), (4, 3));
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }
}
