use crate::error::FormatError;
use crate::model::{Layer, MaxCoordinates, Point, Stroke, StrokeDocument};
use byteorder::{ByteOrder, LittleEndian};
use std::io::{self, Read};

/// The version 5 signature, without its terminating byte.
pub const HEADER: &str = "reMarkable .lines file, version=5         ";

/// Bytes occupied by the signature and its terminator.
pub const HEADER_LEN: usize = 43;

/// pen, colour, unknown, width, unknown, segment count
pub const PATH_RECORD_LEN: usize = 24;

/// x, y, pressure, tilt, two unknown floats
pub const SEGMENT_RECORD_LEN: usize = 24;

const VERSION_PREFIX: &str = "reMarkable .lines file, version=";

// Upper bound on speculative allocation from counts read out of the file.
const MAX_PREALLOC: usize = 4096;

/// Decodes a complete stroke file.
///
/// Returns an error only when the header is unusable. A stream that ends part
/// way through the body yields the layers and strokes read completely up to
/// that point, with [`StrokeDocument::is_truncated`] set.
pub fn decode<R: Read>(mut reader: R) -> Result<StrokeDocument, FormatError> {
    check_header(&mut reader)?;

    let mut doc = StrokeDocument::default();
    let Some(buf) = read_record::<_, 4>(&mut reader)? else {
        log::warn!("stroke file ends before its layer count");
        doc.truncated = true;
        return Ok(doc);
    };
    let declared_layers = LittleEndian::read_u32(&buf);
    if declared_layers < 1 {
        return Err(FormatError::NoLayers);
    }
    doc.declared_layers = declared_layers;

    for layer_no in 1..=declared_layers {
        let Some(buf) = read_record::<_, 4>(&mut reader)? else {
            doc.truncated = true;
            break;
        };
        let path_count = LittleEndian::read_u32(&buf);
        let mut layer = Layer {
            strokes: Vec::with_capacity((path_count as usize).min(MAX_PREALLOC)),
        };

        for _ in 0..path_count {
            match read_stroke(&mut reader, &mut doc.max_coordinates)? {
                Some(stroke) => layer.strokes.push(stroke),
                None => {
                    doc.truncated = true;
                    break;
                }
            }
        }

        log::trace!("decoded layer {} with {} strokes", layer_no, layer.strokes.len());
        doc.layers.push(layer);
        if doc.truncated {
            break;
        }
    }

    if doc.truncated {
        log::warn!(
            "stroke file truncated: read {} of {} layers, {} complete strokes",
            doc.layers.len(),
            declared_layers,
            doc.stroke_count()
        );
    }
    Ok(doc)
}

fn check_header<R: Read>(reader: &mut R) -> Result<(), FormatError> {
    let Some(header) = read_record::<_, HEADER_LEN>(reader)? else {
        return Err(FormatError::BadHeader);
    };
    // the final byte is a terminator and is not compared
    let signature = &header[..HEADER_LEN - 1];
    if signature == HEADER.as_bytes() {
        return Ok(());
    }

    if let Some(rest) = signature.strip_prefix(VERSION_PREFIX.as_bytes()) {
        let digits: Vec<u8> = rest.iter().copied().take_while(u8::is_ascii_digit).collect();
        if let Some(version) = std::str::from_utf8(&digits).ok().and_then(|d| d.parse::<u32>().ok())
            && version != 5
        {
            return Err(FormatError::UnsupportedVersion(version));
        }
    }
    Err(FormatError::BadHeader)
}

/// Reads one path record and its segments. `None` means the stream ended
/// before the stroke was complete.
fn read_stroke<R: Read>(
    reader: &mut R,
    max: &mut MaxCoordinates,
) -> Result<Option<Stroke>, FormatError> {
    let Some(path) = read_record::<_, PATH_RECORD_LEN>(reader)? else {
        return Ok(None);
    };
    let pen_code = LittleEndian::read_u32(&path[0..4]);
    let color_code = LittleEndian::read_u32(&path[4..8]);
    let base_width = LittleEndian::read_f32(&path[12..16]);
    let segment_count = LittleEndian::read_u32(&path[20..24]) as usize;

    let mut points = Vec::with_capacity(segment_count.min(MAX_PREALLOC));
    for _ in 0..segment_count {
        let Some(segment) = read_record::<_, SEGMENT_RECORD_LEN>(reader)? else {
            return Ok(None);
        };
        points.push(Point {
            x: LittleEndian::read_f32(&segment[0..4]),
            y: LittleEndian::read_f32(&segment[4..8]),
            pressure: LittleEndian::read_f32(&segment[8..12]),
            tilt: LittleEndian::read_f32(&segment[12..16]),
        });
    }

    for point in &points {
        max.record(point);
    }
    Ok(Some(Stroke {
        pen_code,
        color_code,
        base_width,
        points,
    }))
}

/// Reads exactly `N` bytes, mapping a short read to `None`.
fn read_record<R: Read, const N: usize>(reader: &mut R) -> Result<Option<[u8; N]>, FormatError> {
    let mut buf = [0u8; N];
    match reader.read_exact(&mut buf) {
        Ok(()) => Ok(Some(buf)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(FormatError::Io(e)),
    }
}
