//! Binary layout of a durable cache record.
//!
//! ```text
//! <digest bytes><SEP><name1><NUL><value1><SEP><name2><NUL><value2>...
//! ```
//!
//! `SEP` is `\n\0\n`. Since neither names nor values may contain a NUL byte,
//! the separator never occurs inside a field. The digest has a fixed length
//! per hash algorithm, so it is read by length rather than by delimiter.

use crate::{CacheError, Digest};

/// Separator between the digest and each field.
pub const SEP: &[u8] = b"\n\0\n";
/// Separator between a field name and its value.
pub const NUL: u8 = 0;

/// Encode a record.
///
/// # Errors
///
/// Returns [`CacheError::UnencodableField`] if a name or value contains a NUL
/// byte.
pub fn encode(digest: &Digest, fields: &[(String, String)]) -> Result<Vec<u8>, CacheError> {
    let size = digest.as_bytes().len()
        + fields
            .iter()
            .map(|(name, value)| SEP.len() + name.len() + 1 + value.len())
            .sum::<usize>();
    let mut buf = Vec::with_capacity(size);
    buf.extend_from_slice(digest.as_bytes());

    for (name, value) in fields {
        if name.as_bytes().contains(&NUL) || value.as_bytes().contains(&NUL) {
            return Err(CacheError::UnencodableField(name.clone()));
        }
        buf.extend_from_slice(SEP);
        buf.extend_from_slice(name.as_bytes());
        buf.push(NUL);
        buf.extend_from_slice(value.as_bytes());
    }

    Ok(buf)
}

/// Read only the digest prefix of a record.
///
/// # Errors
///
/// Returns [`CacheError::CorruptRecord`] if the record is shorter than the
/// digest.
pub fn decode_digest(bytes: &[u8], digest_len: usize) -> Result<Digest, CacheError> {
    bytes
        .get(..digest_len)
        .map(Digest::from_bytes)
        .ok_or(CacheError::CorruptRecord("record shorter than digest"))
}

/// Decode a full record into its digest and fields.
///
/// # Errors
///
/// Returns [`CacheError::CorruptRecord`] if the layout is broken or a field is
/// not UTF-8.
pub fn decode(
    bytes: &[u8],
    digest_len: usize,
) -> Result<(Digest, Vec<(String, String)>), CacheError> {
    let digest = decode_digest(bytes, digest_len)?;
    let rest = &bytes[digest_len..];
    if rest.is_empty() {
        return Ok((digest, Vec::new()));
    }

    let rest = rest
        .strip_prefix(SEP)
        .ok_or(CacheError::CorruptRecord("missing separator after digest"))?;

    let fields = split(rest)
        .map(|chunk| -> Result<(String, String), CacheError> {
            let at = chunk
                .iter()
                .position(|&b| b == NUL)
                .ok_or(CacheError::CorruptRecord("field without name terminator"))?;
            let name = utf8(&chunk[..at])?;
            let value = utf8(&chunk[at + 1..])?;
            Ok((name, value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((digest, fields))
}

fn utf8(bytes: &[u8]) -> Result<String, CacheError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| CacheError::CorruptRecord("field is not UTF-8"))
}

/// Split on every occurrence of [`SEP`].
fn split(mut bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        match bytes.windows(SEP.len()).position(|window| window == SEP) {
            Some(at) => {
                let chunk = &bytes[..at];
                bytes = &bytes[at + SEP.len()..];
                Some(chunk)
            }
            None => {
                done = true;
                Some(bytes)
            }
        }
    })
}
