// Copyright 2025 the keel authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Extension methods on string slices.

/// Convenience methods for everyday string slicing and display work.
pub trait StrExt {
    /// Returns the text between the first `open` marker and the next `close`
    /// marker after it.
    ///
    /// Returns `None` when either marker is missing or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use keel_core::text::StrExt;
    ///
    /// assert_eq!("size [12x8] px".extract_between("[", "]"), Some("12x8"));
    /// assert_eq!("no markers".extract_between("[", "]"), None);
    /// ```
    fn extract_between<'a>(&'a self, open: &str, close: &str) -> Option<&'a str>;

    /// Returns every non-overlapping stretch of text between `open` and
    /// `close` marker pairs, scanning left to right.
    fn extract_all_between<'a>(&'a self, open: &str, close: &str) -> Vec<&'a str>;

    /// Returns the string with its first letter uppercased.
    fn capitalize_first(&self) -> String;

    /// Shortens the string to at most `max_chars` characters, replacing the
    /// cut tail with a single `…`.
    ///
    /// Strings that already fit are returned unchanged. The ellipsis counts
    /// towards the limit.
    fn truncate_with_ellipsis(&self, max_chars: usize) -> String;

    /// Turns an identifier into a display name.
    ///
    /// Strips `m_`, `_`, and Hungarian `k` prefixes, splits camelCase on
    /// word boundaries while keeping acronym runs intact, converts
    /// underscores to spaces, and capitalizes the first letter.
    ///
    /// # Examples
    ///
    /// ```
    /// use keel_core::text::StrExt;
    ///
    /// assert_eq!("m_enableHDR".nicify(), "Enable HDR");
    /// assert_eq!("maxRetryCount".nicify(), "Max Retry Count");
    /// ```
    fn nicify(&self) -> String;
}

impl StrExt for str {
    fn extract_between<'a>(&'a self, open: &str, close: &str) -> Option<&'a str> {
        if open.is_empty() || close.is_empty() {
            return None;
        }
        let start = self.find(open)? + open.len();
        let end = self[start..].find(close)? + start;
        Some(&self[start..end])
    }

    fn extract_all_between<'a>(&'a self, open: &str, close: &str) -> Vec<&'a str> {
        let mut found = Vec::new();
        if open.is_empty() || close.is_empty() {
            return found;
        }
        let mut cursor = 0;
        while let Some(open_at) = self[cursor..].find(open) {
            let start = cursor + open_at + open.len();
            match self[start..].find(close) {
                Some(close_at) => {
                    found.push(&self[start..start + close_at]);
                    cursor = start + close_at + close.len();
                }
                None => break,
            }
        }
        found
    }

    fn capitalize_first(&self) -> String {
        let mut chars = self.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    fn truncate_with_ellipsis(&self, max_chars: usize) -> String {
        if self.chars().count() <= max_chars {
            return self.to_string();
        }
        if max_chars == 0 {
            return String::new();
        }
        let mut shortened: String = self.chars().take(max_chars - 1).collect();
        shortened.push('…');
        shortened
    }

    fn nicify(&self) -> String {
        let stripped = if let Some(rest) = self.strip_prefix("m_") {
            rest
        } else if let Some(rest) = self.strip_prefix('_') {
            rest
        } else {
            // A Hungarian constant prefix like `kMaxSize`
            match self.strip_prefix('k') {
                Some(rest) if rest.starts_with(char::is_uppercase) => rest,
                _ => self,
            }
        };

        let chars: Vec<char> = stripped.chars().collect();
        let mut name = String::with_capacity(stripped.len() + 8);
        for (i, &c) in chars.iter().enumerate() {
            if c == '_' {
                if !name.is_empty() && !name.ends_with(' ') {
                    name.push(' ');
                }
                continue;
            }
            if i > 0 && c.is_uppercase() {
                let prev = chars[i - 1];
                let starts_word_after_acronym = prev.is_uppercase()
                    && chars.get(i + 1).is_some_and(|next| next.is_lowercase());
                if prev.is_lowercase() || prev.is_ascii_digit() || starts_word_after_acronym {
                    if !name.ends_with(' ') {
                        name.push(' ');
                    }
                }
            }
            if name.is_empty() {
                name.extend(c.to_uppercase());
            } else {
                name.push(c);
            }
        }
        name
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_between() {
        assert_eq!("a [b] c".extract_between("[", "]"), Some("b"));
        assert_eq!("<tag>body</tag>".extract_between("<tag>", "</tag>"), Some("body"));
        // First open marker wins
        assert_eq!("[x] [y]".extract_between("[", "]"), Some("x"));
        // Empty capture between adjacent markers
        assert_eq!("[]".extract_between("[", "]"), Some(""));

        assert_eq!("no markers".extract_between("[", "]"), None);
        assert_eq!("only [open".extract_between("[", "]"), None);
        assert_eq!("only close]".extract_between("[", "]"), None);
        assert_eq!("anything".extract_between("", "]"), None);
    }

    #[test]
    fn test_extract_between_close_before_open() {
        // The close marker must come after the open marker
        assert_eq!("] then [ nothing".extract_between("[", "]"), None);
    }

    #[test]
    fn test_extract_all_between() {
        assert_eq!(
            "{a} mid {b} end {c}".extract_all_between("{", "}"),
            vec!["a", "b", "c"]
        );
        // Unterminated final pair is skipped
        assert_eq!("{a} {b".extract_all_between("{", "}"), vec!["a"]);
        assert!("plain".extract_all_between("{", "}").is_empty());
        assert!("{a}".extract_all_between("", "}").is_empty());
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!("hello world".capitalize_first(), "Hello world");
        assert_eq!("Hello".capitalize_first(), "Hello");
        assert_eq!("".capitalize_first(), "");
        assert_eq!("x".capitalize_first(), "X");
        // Multi-byte first character
        assert_eq!("über".capitalize_first(), "Über");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!("short".truncate_with_ellipsis(10), "short");
        assert_eq!("exactly".truncate_with_ellipsis(7), "exactly");
        assert_eq!("abcdefgh".truncate_with_ellipsis(4), "abc…");
        assert_eq!("abcdefgh".truncate_with_ellipsis(1), "…");
        assert_eq!("abcdefgh".truncate_with_ellipsis(0), "");
        // The limit counts characters, not bytes
        assert_eq!("ééééé".truncate_with_ellipsis(3), "éé…");
    }

    #[test]
    fn test_nicify_prefixes() {
        assert_eq!("m_enableHDR".nicify(), "Enable HDR");
        assert_eq!("_privateField".nicify(), "Private Field");
        assert_eq!("kMaxSize".nicify(), "Max Size");
        // A lone `k` word is not a prefix
        assert_eq!("keyCode".nicify(), "Key Code");
    }

    #[test]
    fn test_nicify_word_boundaries() {
        assert_eq!("maxRetryCount".nicify(), "Max Retry Count");
        assert_eq!("playerID".nicify(), "Player ID");
        assert_eq!("HTTPServer".nicify(), "HTTP Server");
        assert_eq!("snake_case_name".nicify(), "Snake case name");
        assert_eq!("alreadyNice".nicify(), "Already Nice");
        assert_eq!("value2Wins".nicify(), "Value2 Wins");
        assert_eq!("".nicify(), "");
    }
}
