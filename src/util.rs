//! Small utility helpers used across modules.

/// Case-insensitive equality the way answers are compared (full Unicode lowercase).
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
  a == b || a.to_lowercase() == b.to_lowercase()
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) { cut -= 1; }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn case_insensitive_match() {
    assert!(eq_ignore_case("Paris", "paris"));
    assert!(eq_ignore_case("ÉCOLE", "école"));
    assert!(!eq_ignore_case("Paris", "Pari"));
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("short", 10), "short");
    let t = trunc_for_log("ééééé", 3);
    assert!(t.starts_with('é'));
    assert!(t.ends_with("(10 bytes total)"));
  }
}
