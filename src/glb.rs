//! GLB container parser (spec §4.4).
//!
//! Grounded on the reference loader's chunk-framing logic (`gltf_parse.c`'s
//! binary front end) and on the upstream `gltf` crate's `binary::Glb`
//! (`import/binary.rs`), whose header/chunk split this follows closely;
//! this version is stricter than both, per spec §9's REDESIGN note: the
//! JSON chunk must come first and duplicate JSON/BIN chunks are rejected
//! rather than silently accepted.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{ErrorKind, GltfError, Path};

const MAGIC: u32 = 0x4654_6C67; // b"glTF" little-endian
const JSON_CHUNK_TYPE: u32 = 0x4E4F_534A; // b"JSON"
const BIN_CHUNK_TYPE: u32 = 0x004E_4942; // b"BIN\0"
const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// The split contents of a parsed `.glb` stream: the JSON chunk bytes and an
/// optional BIN chunk.
pub struct Glb {
    pub json: Vec<u8>,
    pub bin: Option<Vec<u8>>,
}

fn parse_error(msg: &'static str) -> GltfError {
    GltfError::new(ErrorKind::Parse, msg, Path::new().field("glb"))
}

/// Parses a complete in-memory GLB buffer per spec §4.4.
pub fn parse(data: &[u8]) -> Result<Glb, GltfError> {
    if data.len() < HEADER_LEN {
        return Err(parse_error("glb header truncated"));
    }
    let magic = LittleEndian::read_u32(&data[0..4]);
    if magic != MAGIC {
        return Err(parse_error("glb magic mismatch"));
    }
    let version = LittleEndian::read_u32(&data[4..8]);
    if version != 2 {
        return Err(parse_error("unsupported glb version"));
    }
    let length = LittleEndian::read_u32(&data[8..12]) as usize;
    if length != data.len() {
        return Err(parse_error("glb length does not match buffer size"));
    }

    let mut offset = HEADER_LEN;
    let mut json: Option<Vec<u8>> = None;
    let mut bin: Option<Vec<u8>> = None;
    let mut first_chunk = true;

    while offset < data.len() {
        if data.len() - offset < CHUNK_HEADER_LEN {
            return Err(parse_error("chunk header truncated"));
        }
        let chunk_len = LittleEndian::read_u32(&data[offset..offset + 4]) as usize;
        let chunk_type = LittleEndian::read_u32(&data[offset + 4..offset + 8]);
        if chunk_len % 4 != 0 {
            return Err(parse_error("chunk length not a multiple of four"));
        }
        let body_start = offset + CHUNK_HEADER_LEN;
        let body_end = body_start
            .checked_add(chunk_len)
            .ok_or_else(|| parse_error("chunk length overflow"))?;
        if body_end > data.len() {
            return Err(parse_error("chunk length exceeds remaining buffer"));
        }
        let body = &data[body_start..body_end];

        if chunk_type == JSON_CHUNK_TYPE {
            if !first_chunk {
                return Err(parse_error("JSON chunk must be first"));
            }
            if json.is_some() {
                return Err(parse_error("duplicate JSON chunk"));
            }
            json = Some(body.to_vec());
        } else if chunk_type == BIN_CHUNK_TYPE {
            if bin.is_some() {
                return Err(parse_error("duplicate BIN chunk"));
            }
            bin = Some(body.to_vec());
        }
        // Any other chunk type is silently ignored (spec §4.4).

        first_chunk = false;
        offset = body_end;
    }

    let json = json.ok_or_else(|| parse_error("missing JSON chunk"))?;
    Ok(Glb { json, bin })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_chunk(buf: &mut Vec<u8>, ty: u32, body: &[u8]) {
        buf.extend_from_slice(&(body.len() as u32).to_le_bytes());
        buf.extend_from_slice(&ty.to_le_bytes());
        buf.extend_from_slice(body);
    }

    fn build_glb(json: &[u8], bin: Option<&[u8]>) -> Vec<u8> {
        let mut body = Vec::new();
        push_chunk(&mut body, JSON_CHUNK_TYPE, json);
        if let Some(bin) = bin {
            push_chunk(&mut body, BIN_CHUNK_TYPE, bin);
        }
        let mut out = Vec::new();
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&((HEADER_LEN + body.len()) as u32).to_le_bytes());
        out.extend_from_slice(&body);
        out
    }

    #[test]
    fn parses_json_and_bin_chunks() {
        let glb = build_glb(b"{}  ", Some(b"1234"));
        let parsed = parse(&glb).unwrap();
        assert_eq!(parsed.json, b"{}  ");
        assert_eq!(parsed.bin.unwrap(), b"1234");
    }

    #[test]
    fn parses_json_only() {
        let glb = build_glb(b"{}  ", None);
        let parsed = parse(&glb).unwrap();
        assert!(parsed.bin.is_none());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut glb = build_glb(b"{}  ", None);
        glb[0] = b'x';
        assert_eq!(parse(&glb).unwrap_err().kind, ErrorKind::Parse);
    }

    #[test]
    fn rejects_bin_before_json() {
        let mut body = Vec::new();
        push_chunk(&mut body, BIN_CHUNK_TYPE, b"1234");
        push_chunk(&mut body, JSON_CHUNK_TYPE, b"{}  ");
        let mut out = Vec::new();
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&((HEADER_LEN + body.len()) as u32).to_le_bytes());
        out.extend_from_slice(&body);
        assert!(parse(&out).is_err());
    }

    #[test]
    fn rejects_duplicate_json_chunk() {
        let mut body = Vec::new();
        push_chunk(&mut body, JSON_CHUNK_TYPE, b"{}  ");
        push_chunk(&mut body, JSON_CHUNK_TYPE, b"{}  ");
        let mut out = Vec::new();
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&((HEADER_LEN + body.len()) as u32).to_le_bytes());
        out.extend_from_slice(&body);
        assert!(parse(&out).is_err());
    }

    #[test]
    fn rejects_length_mismatch() {
        let mut glb = build_glb(b"{}  ", None);
        let bad_len = (glb.len() as u32) + 4;
        glb[8..12].copy_from_slice(&bad_len.to_le_bytes());
        assert!(parse(&glb).is_err());
    }
}
