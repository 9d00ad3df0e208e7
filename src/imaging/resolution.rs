//! Minimal resolution (DPI) reader for JPEG, PNG and TIFF bytes.
//!
//! Sources, in the order they are consulted:
//! - JPEG: JFIF APP0 density (units 1 = dots/inch, 2 = dots/cm), then the
//!   EXIF APP1 block's IFD0 `XResolution`/`YResolution`/`ResolutionUnit`.
//! - PNG: the `pHYs` chunk (unit 1 = pixels per metre).
//! - TIFF: IFD0 resolution tags, same as EXIF.
//!
//! Aspect-ratio-only densities (unit 0) and anything malformed yield no
//! resolution. Never panics on truncated input.

/// Horizontal and vertical resolution in dots per inch, when known.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Resolution {
    pub dpi_x: Option<f64>,
    pub dpi_y: Option<f64>,
}

impl Resolution {
    fn both(dpi_x: f64, dpi_y: f64) -> Self {
        Self {
            dpi_x: Some(dpi_x),
            dpi_y: Some(dpi_y),
        }
    }

    pub fn is_known(&self) -> bool {
        self.dpi_x.is_some() || self.dpi_y.is_some()
    }
}

const CM_PER_INCH: f64 = 2.54;
const METRES_PER_INCH: f64 = 0.0254;
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Read resolution metadata from encoded image bytes, dispatching on magic
/// bytes. Returns [`Resolution::default`] when nothing usable is found.
pub fn read_resolution(data: &[u8]) -> Resolution {
    if data.starts_with(&[0xFF, 0xD8]) {
        read_jpeg_resolution(data)
    } else if data.starts_with(PNG_SIGNATURE) {
        read_png_resolution(data)
    } else if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
        read_tiff_resolution(data).unwrap_or_default()
    } else {
        Resolution::default()
    }
}

fn be_u16(data: &[u8], pos: usize) -> Option<u16> {
    let bytes = data.get(pos..pos.checked_add(2)?)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn be_u32(data: &[u8], pos: usize) -> Option<u32> {
    let bytes = data.get(pos..pos.checked_add(4)?)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

// ---------------------------------------------------------------------------
// JPEG: JFIF APP0 and EXIF APP1
// ---------------------------------------------------------------------------

const JFIF_HEADER: &[u8] = b"JFIF\0";
const EXIF_HEADER: &[u8] = b"Exif\0\0";

fn read_jpeg_resolution(data: &[u8]) -> Resolution {
    let mut exif = None;
    let mut pos = 2;

    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            break;
        }
        let marker = data[pos + 1];
        // Fill bytes and standalone markers carry no length
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        if marker == 0x01 || (0xD0..=0xD8).contains(&marker) {
            pos += 2;
            continue;
        }
        // SOS or EOI: metadata segments are over
        if marker == 0xDA || marker == 0xD9 {
            break;
        }

        let Some(len) = be_u16(data, pos + 2) else {
            break;
        };
        let seg_start = pos + 4;
        let seg_end = (pos + 2 + len as usize).min(data.len());
        if seg_end < seg_start {
            break;
        }
        let segment = &data[seg_start..seg_end];

        if marker == 0xE0 && segment.starts_with(JFIF_HEADER) {
            if let Some(res) = parse_jfif_density(segment) {
                return res;
            }
        }
        if marker == 0xE1 && exif.is_none() && segment.starts_with(EXIF_HEADER) {
            exif = read_tiff_resolution(&segment[EXIF_HEADER.len()..]);
        }

        pos += 2 + len as usize;
    }

    exif.unwrap_or_default()
}

/// JFIF APP0 layout after the identifier: version (2), units (1),
/// x density (2), y density (2).
fn parse_jfif_density(segment: &[u8]) -> Option<Resolution> {
    let units = *segment.get(7)?;
    let x = be_u16(segment, 8)? as f64;
    let y = be_u16(segment, 10)? as f64;
    if x == 0.0 || y == 0.0 {
        return None;
    }
    match units {
        1 => Some(Resolution::both(x, y)),
        2 => Some(Resolution::both(x * CM_PER_INCH, y * CM_PER_INCH)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// PNG: pHYs chunk
// ---------------------------------------------------------------------------

fn read_png_resolution(data: &[u8]) -> Resolution {
    let mut pos = PNG_SIGNATURE.len();

    while let (Some(len), Some(kind)) = (be_u32(data, pos), data.get(pos + 4..pos + 8)) {
        let body = pos + 8;
        match kind {
            b"pHYs" => {
                let (Some(x), Some(y), Some(&unit)) =
                    (be_u32(data, body), be_u32(data, body + 4), data.get(body + 8))
                else {
                    break;
                };
                if unit == 1 && x > 0 && y > 0 {
                    return Resolution::both(x as f64 * METRES_PER_INCH, y as f64 * METRES_PER_INCH);
                }
                break;
            }
            // pHYs must precede the image data
            b"IDAT" | b"IEND" => break,
            _ => {}
        }
        let Some(next) = body.checked_add(len as usize).and_then(|p| p.checked_add(4)) else {
            break;
        };
        pos = next;
    }

    Resolution::default()
}

// ---------------------------------------------------------------------------
// TIFF / EXIF: IFD0 resolution tags
// ---------------------------------------------------------------------------

const TAG_X_RESOLUTION: u16 = 0x011A;
const TAG_Y_RESOLUTION: u16 = 0x011B;
const TAG_RESOLUTION_UNIT: u16 = 0x0128;

/// Read resolution tags from a TIFF structure (a TIFF file, or the payload of
/// an EXIF block). Offsets are relative to the start of `data`.
fn read_tiff_resolution(data: &[u8]) -> Option<Resolution> {
    let big_endian = match data.get(0..2)? {
        b"MM" => true,
        b"II" => false,
        _ => return None,
    };

    let read_u16 = |offset: usize| -> Option<u16> {
        let b = data.get(offset..offset.checked_add(2)?)?;
        Some(if big_endian {
            u16::from_be_bytes([b[0], b[1]])
        } else {
            u16::from_le_bytes([b[0], b[1]])
        })
    };
    let read_u32 = |offset: usize| -> Option<u32> {
        let b = data.get(offset..offset.checked_add(4)?)?;
        Some(if big_endian {
            u32::from_be_bytes([b[0], b[1], b[2], b[3]])
        } else {
            u32::from_le_bytes([b[0], b[1], b[2], b[3]])
        })
    };
    // RATIONAL: two u32s (numerator, denominator) stored at the given offset
    let read_rational = |offset: usize| -> Option<f64> {
        let num = read_u32(offset)?;
        let den = read_u32(offset + 4)?;
        (den != 0).then(|| num as f64 / den as f64)
    };

    if read_u16(2)? != 42 {
        return None;
    }
    let ifd = read_u32(4)? as usize;
    let entry_count = read_u16(ifd)? as usize;

    let mut x = None;
    let mut y = None;
    // Inches unless stated otherwise
    let mut unit = 2;

    for i in 0..entry_count {
        let entry = ifd + 2 + i * 12;
        let tag = read_u16(entry)?;
        match tag {
            TAG_X_RESOLUTION => x = read_rational(read_u32(entry + 8)? as usize),
            TAG_Y_RESOLUTION => y = read_rational(read_u32(entry + 8)? as usize),
            TAG_RESOLUTION_UNIT => unit = read_u16(entry + 8)?,
            _ => {}
        }
    }

    let scale = match unit {
        2 => 1.0,
        3 => CM_PER_INCH,
        _ => return None,
    };
    let positive = |v: Option<f64>| v.filter(|d| *d > 0.0).map(|d| d * scale);
    let res = Resolution {
        dpi_x: positive(x),
        dpi_y: positive(y),
    };
    res.is_known().then_some(res)
}
