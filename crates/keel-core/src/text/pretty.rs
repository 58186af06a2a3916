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

//! Human-oriented value formatting for logs and consoles.
//!
//! The output is JSON-like but tuned for reading, not parsing: two-space
//! indentation, keys without quotes, and no separating commas. Field order
//! follows declaration order.

use serde::Serialize;
use serde_json::Value;

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (key, child) in map {
                push_indent(out, depth + 1);
                out.push_str(key);
                out.push_str(": ");
                write_value(out, child, depth + 1);
                out.push('\n');
            }
            push_indent(out, depth);
            out.push('}');
        }
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            out.push_str("[\n");
            for child in items {
                push_indent(out, depth + 1);
                write_value(out, child, depth + 1);
                out.push('\n');
            }
            push_indent(out, depth);
            out.push(']');
        }
        // Strings keep their quotes and JSON escaping; scalars print as is
        other => out.push_str(&other.to_string()),
    }
}

/// Formats a [`serde_json::Value`] tree for human eyes.
pub fn pretty_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

/// Readable formatting for any serializable value.
///
/// Blanket-implemented for everything that implements [`Serialize`], so any
/// config struct or report can be dumped into a log without writing a
/// `Display` impl first.
pub trait PrettyPrint: Serialize {
    /// Renders the value in the indented bare-key format.
    fn to_pretty_string(&self) -> Result<String, serde_json::Error> {
        Ok(pretty_value(&serde_json::to_value(self)?))
    }

    /// Logs the value at debug level under a label.
    ///
    /// Values that cannot be serialized log a warning instead of panicking.
    fn log_pretty(&self, label: &str) {
        match self.to_pretty_string() {
            Ok(body) => log::debug!("{label}:\n{body}"),
            Err(error) => log::warn!("Could not pretty print {label}: {error}"),
        }
    }
}

impl<T: Serialize> PrettyPrint for T {}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_print_plainly() {
        assert_eq!(pretty_value(&json!(42)), "42");
        assert_eq!(pretty_value(&json!(2.5)), "2.5");
        assert_eq!(pretty_value(&json!(true)), "true");
        assert_eq!(pretty_value(&json!(null)), "null");
        // Strings keep quotes and escaping
        assert_eq!(pretty_value(&json!("say \"hi\"")), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_object_with_bare_keys() {
        let value = json!({"name": "keel", "version": 2});
        assert_eq!(
            pretty_value(&value),
            "{\n  name: \"keel\"\n  version: 2\n}"
        );
    }

    #[test]
    fn test_nested_structure_indents() {
        let value = json!({
            "window": {"width": 800, "height": 600},
            "tags": ["a", "b"],
        });
        let expected = concat!(
            "{\n",
            "  window: {\n",
            "    width: 800\n",
            "    height: 600\n",
            "  }\n",
            "  tags: [\n",
            "    \"a\"\n",
            "    \"b\"\n",
            "  ]\n",
            "}",
        );
        assert_eq!(pretty_value(&value), expected);
    }

    #[test]
    fn test_empty_containers_stay_inline() {
        assert_eq!(pretty_value(&json!({})), "{}");
        assert_eq!(pretty_value(&json!([])), "[]");
        assert_eq!(
            pretty_value(&json!({"empty": {}, "none": []})),
            "{\n  empty: {}\n  none: []\n}"
        );
    }

    #[test]
    fn test_derived_struct_keeps_field_order() {
        #[derive(Serialize)]
        struct Report {
            zebra: u32,
            apple: u32,
        }

        let text = Report { zebra: 1, apple: 2 }.to_pretty_string().unwrap();
        // Declaration order, not alphabetical
        assert_eq!(text, "{\n  zebra: 1\n  apple: 2\n}");
    }

    #[test]
    fn test_log_pretty_does_not_panic() {
        #[derive(Serialize)]
        struct Tiny {
            value: bool,
        }
        Tiny { value: true }.log_pretty("tiny");
    }
}
