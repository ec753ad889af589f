use ghsite::{Reference, SourceError};

/// Hex lengths of SHA-1 and SHA-256 object ids.
const OBJECT_ID_LENGTHS: [usize; 2] = [40, 64];

/// Parse a smart-HTTP reference advertisement
/// (`GET /<owner>/<repo>.git/info/refs?service=git-upload-pack`).
///
/// The body is a sequence of pkt-lines: a four-digit hex length (which
/// counts itself) followed by the payload. `0000` is a flush packet.
/// The first reference line carries capabilities after a NUL byte.
pub fn parse_advertisement(body: &[u8]) -> Result<Vec<Reference>, SourceError> {
    let mut references = Vec::new();
    let mut pos = 0;

    while pos < body.len() {
        let header = body
            .get(pos..pos + 4)
            .ok_or_else(|| SourceError::Parse("truncated pkt-line header".into()))?;
        let header = std::str::from_utf8(header)
            .map_err(|_| SourceError::Parse("non-ASCII pkt-line header".into()))?;
        let len = usize::from_str_radix(header, 16)
            .map_err(|_| SourceError::Parse(format!("invalid pkt-line length {header:?}")))?;

        if len == 0 {
            pos += 4;
            continue;
        }
        if len < 4 {
            return Err(SourceError::Parse(format!("invalid pkt-line length {len}")));
        }

        let payload = body
            .get(pos + 4..pos + len)
            .ok_or_else(|| SourceError::Parse("truncated pkt-line payload".into()))?;
        pos += len;

        if let Some(reference) = parse_line(payload) {
            references.push(reference);
        }
    }

    Ok(references)
}

fn parse_line(payload: &[u8]) -> Option<Reference> {
    let line = String::from_utf8_lossy(payload);
    let line = line.trim_end_matches('\n');

    // "# service=git-upload-pack"
    if line.starts_with('#') {
        return None;
    }

    let line = line.split('\0').next().unwrap_or(line);
    let (sha, name) = line.split_once(' ')?;

    if !OBJECT_ID_LENGTHS.contains(&sha.len()) || !sha.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    Some(Reference {
        name: name.to_owned(),
        sha: sha.to_owned(),
    })
}
