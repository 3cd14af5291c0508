//! Request path normalization and route pattern segments.

/// One segment of a compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Literal(String),
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Option<Self> {
        match raw.strip_prefix(':') {
            Some(name) if is_param_name(name) => Some(Self::Param(name.to_string())),
            Some(_) => None,
            None if is_valid_segment(raw) => Some(Self::Literal(raw.to_string())),
            None => None,
        }
    }
}

/// Compile a pattern such as `/api/v1/items/:id` into segments.
///
/// Returns `None` when the pattern itself is malformed.
pub(crate) fn compile_pattern(pattern: &str) -> Option<Vec<Segment>> {
    split(pattern)?.into_iter().map(Segment::parse).collect()
}

/// Normalize a request path into its segments.
///
/// `/` yields no segments; a single trailing slash is dropped. Empty paths,
/// relative paths, empty inner segments and characters outside RFC 3986
/// `pchar` make the path malformed.
pub(crate) fn normalize(path: &str) -> Option<Vec<&str>> {
    let segments = split(path)?;
    if segments.iter().all(|segment| is_valid_segment(segment)) {
        Some(segments)
    } else {
        None
    }
}

fn split(path: &str) -> Option<Vec<&str>> {
    let rest = path.strip_prefix('/')?;
    if rest.is_empty() {
        return Some(Vec::new());
    }

    let rest = rest.strip_suffix('/').unwrap_or(rest);
    let segments: Vec<&str> = rest.split('/').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }

    Some(segments)
}

fn is_param_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(first) if first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_valid_segment(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'%' => {
                let escape = bytes.get(idx + 1..idx + 3);
                if !matches!(escape, Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit())
                {
                    return false;
                }
                idx += 3;
            }
            byte if is_pchar(byte) => idx += 1,
            _ => return false,
        }
    }
    true
}

fn is_pchar(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'-' | b'.'
                | b'_'
                | b'~'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b':'
                | b'@'
        )
}
