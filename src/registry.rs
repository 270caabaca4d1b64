//! Function registry name packing and string escaping
//!
//! The generated system-library source embeds the full function name
//! list as one packed string: a leading count byte followed by each
//! name, NUL-terminated. The runtime loader indexes the pointer table
//! by position in this list, so order matters.

use crate::error::{MetaError, MetaResult};

/// Pack a function name list into the registry name blob.
///
/// Layout: one count byte, then each name followed by a NUL byte. The
/// count byte caps the registry at 255 names; longer lists are
/// rejected rather than truncated.
pub fn generate_func_registry_names(func_names: &[String]) -> MetaResult<Vec<u8>> {
    if func_names.len() > u8::MAX as usize {
        return Err(MetaError::InvalidArgument(format!(
            "function registry holds at most {} names, got {}",
            u8::MAX,
            func_names.len()
        )));
    }
    let mut blob = Vec::new();
    blob.push(func_names.len() as u8);
    for name in func_names {
        blob.extend_from_slice(name.as_bytes());
        blob.push(0);
    }
    Ok(blob)
}

/// Inverse of [`generate_func_registry_names`]
pub fn parse_func_registry_names(blob: &[u8]) -> MetaResult<Vec<String>> {
    let (&count, mut rest) = blob
        .split_first()
        .ok_or_else(|| MetaError::DeserializationFailed("empty registry name blob".to_string()))?;
    let mut names = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| MetaError::DeserializationFailed("unterminated registry name".to_string()))?;
        let name = std::str::from_utf8(&rest[..nul])
            .map_err(|e| MetaError::DeserializationFailed(format!("registry name is not utf-8: {}", e)))?;
        names.push(name.to_string());
        rest = &rest[nul + 1..];
    }
    if !rest.is_empty() {
        return Err(MetaError::DeserializationFailed(
            "trailing bytes after registry names".to_string(),
        ));
    }
    Ok(names)
}

/// Escape a byte string into the body of a C string literal.
///
/// Printable ASCII passes through, quotes and backslashes are escaped,
/// everything else becomes a three-digit octal escape.
pub fn str_escape(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    for &b in data {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\{:03o}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_parse_round_trip() {
        let names = vec!["run0".to_string(), "run1".to_string()];
        let blob = generate_func_registry_names(&names).unwrap();
        assert_eq!(blob[0], 2);
        let parsed = parse_func_registry_names(&blob).unwrap();
        assert_eq!(parsed, names);
    }

    #[test]
    fn test_pack_empty_list() {
        let blob = generate_func_registry_names(&[]).unwrap();
        assert_eq!(blob, vec![0]);
        assert!(parse_func_registry_names(&blob).unwrap().is_empty());
    }

    #[test]
    fn test_pack_rejects_more_than_255_names() {
        let names: Vec<String> = (0..256).map(|i| format!("f{}", i)).collect();
        let err = generate_func_registry_names(&names).unwrap_err();
        assert!(matches!(err, MetaError::InvalidArgument(_)));

        let names: Vec<String> = (0..255).map(|i| format!("f{}", i)).collect();
        let blob = generate_func_registry_names(&names).unwrap();
        assert_eq!(blob[0], 255);
        assert_eq!(parse_func_registry_names(&blob).unwrap(), names);
    }

    #[test]
    fn test_parse_rejects_unterminated_name() {
        let err = parse_func_registry_names(&[1, b'a', b'b']).unwrap_err();
        assert!(matches!(err, MetaError::DeserializationFailed(_)));
    }

    #[test]
    fn test_str_escape_output() {
        let names = vec!["run0".to_string(), "run1".to_string()];
        let blob = generate_func_registry_names(&names).unwrap();
        assert_eq!(str_escape(&blob), "\\002run0\\000run1\\000");
    }

    #[test]
    fn test_str_escape_quotes_and_backslash() {
        assert_eq!(str_escape(br#"a"b\c"#), "a\\\"b\\\\c");
    }
}
