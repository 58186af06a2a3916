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

//! Reversible escaping of strings into safe file names.
//!
//! Characters that are forbidden in file names on common platforms are
//! replaced by `$HH$` tokens holding the character's code in uppercase hex.
//! `$` escapes itself, which makes the mapping injective: unescaping an
//! escaped string always returns the original, for every input.

/// Checks whether `c` cannot appear in a file name on common platforms.
///
/// Covers the Windows reserved set and ASCII control characters, the union
/// of what mainstream filesystems reject.
pub fn is_invalid_filename_char(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_ascii_control()
}

/// Checks whether `name` contains any character a filesystem would reject.
///
/// Note that [`escape_filename`] may still rewrite a name this function
/// accepts, because the `$` marker is escaped despite being a legal
/// file name character.
pub fn has_invalid_filename_chars(name: &str) -> bool {
    name.chars().any(is_invalid_filename_char)
}

/// The escape set: every invalid character plus the `$` marker itself.
fn needs_escape(c: char) -> bool {
    is_invalid_filename_char(c) || c == '$'
}

/// Replaces every character that is invalid in a file name with a `$HH$`
/// escape token.
///
/// Characters outside ASCII are left alone; modern filesystems accept them.
///
/// # Examples
///
/// ```
/// use keel_core::fs::escape_filename;
///
/// assert_eq!(escape_filename("save/slot:1"), "save$2F$slot$3A$1");
/// assert_eq!(escape_filename("9$ bounty"), "9$24$ bounty");
/// ```
pub fn escape_filename(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if needs_escape(c) {
            escaped.push_str(&format!("${:02X}$", c as u32));
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Decodes the `$HH$` tokens produced by [`escape_filename`].
///
/// Anything that does not form a complete token, like a lone `$` or `$GZ$`,
/// passes through unchanged, so the function is safe to run on names that
/// were never escaped.
pub fn unescape_filename(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut unescaped = String::with_capacity(name.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '$' && i + 3 < chars.len() && chars[i + 3] == '$' {
            if let (Some(high), Some(low)) =
                (chars[i + 1].to_digit(16), chars[i + 2].to_digit(16))
            {
                unescaped.push((high * 16 + low) as u8 as char);
                i += 4;
                continue;
            }
        }
        unescaped.push(chars[i]);
        i += 1;
    }
    unescaped
}
