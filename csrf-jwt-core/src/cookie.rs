//! Parsing of the `Cookie` request header.

/// Split a `Cookie` header into `(name, value)` pairs, in header order.
///
/// Pairs without `=` are skipped, surrounding whitespace is trimmed and a
/// value wrapped in double quotes is unquoted. A raw `Set-Cookie` line is
/// accepted too: its attributes (`Path=/`, `HttpOnly`, ...) simply show up
/// as extra pairs or are dropped.
pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|part| {
            let (name, value) = part.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_pairs() {
        let pairs = parse_cookie_header("a=1; b=2");
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_set_cookie_line() {
        let pairs = parse_cookie_header("jwt=abc.def.ghi; Path=/; HttpOnly; SameSite=Strict");
        assert_eq!(pairs[0], ("jwt".to_string(), "abc.def.ghi".to_string()));
        assert!(!pairs.iter().any(|(name, _)| name == "HttpOnly"));
    }

    #[test]
    fn test_parse_quoted_and_empty() {
        let pairs = parse_cookie_header("token=\"xyz\"; =orphan; ; flag");
        assert_eq!(pairs, vec![("token".to_string(), "xyz".to_string())]);
    }
}
