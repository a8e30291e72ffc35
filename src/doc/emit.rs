//! Plain-text YAML rendering of dumped value trees.
//!
//! `serde_yaml`'s emitter cannot select scalar styles, and the backlog file
//! is meant to be edited by hand: multi-line notes must come out as literal
//! blocks, not escaped flow strings. This writer covers exactly the shapes
//! the dumper produces (mappings, sequences, strings, integers, nulls) and
//! its output re-parses under `serde_yaml` to an equivalent tree.

use serde_yaml::Value;

const INDENT: usize = 2;

/// Render a dumped value tree as a YAML document.
pub fn to_yaml_string(root: &Value) -> String {
    let mut out = String::new();
    match root {
        Value::Mapping(map) if !map.is_empty() => emit_mapping_entries(&mut out, root, 0),
        Value::Sequence(items) if !items.is_empty() => emit_sequence(&mut out, items, 0),
        other => {
            out.push_str(&render_scalar(other));
            out.push('\n');
        }
    }
    out
}

fn emit_mapping_entries(out: &mut String, node: &Value, indent: usize) {
    let Value::Mapping(map) = node else { return };
    for (key, value) in map {
        push_pad(out, indent);
        emit_entry(out, key, value, indent);
    }
}

/// Write one `key: value` entry. The caller has already written indentation
/// (or a sequence dash) up to the key position.
fn emit_entry(out: &mut String, key: &Value, value: &Value, indent: usize) {
    out.push_str(&render_scalar(key));
    out.push(':');
    match value {
        Value::Mapping(map) if !map.is_empty() => {
            out.push('\n');
            emit_mapping_entries(out, value, indent + INDENT);
        }
        Value::Sequence(items) if !items.is_empty() => {
            out.push('\n');
            emit_sequence(out, items, indent + INDENT);
        }
        Value::String(text) if text.contains('\n') => {
            out.push(' ');
            emit_literal_block(out, text, indent + INDENT);
        }
        other => {
            out.push(' ');
            out.push_str(&render_scalar(other));
            out.push('\n');
        }
    }
}

fn emit_sequence(out: &mut String, items: &[Value], indent: usize) {
    for item in items {
        match item {
            Value::Mapping(map) if !map.is_empty() => {
                let mut first = true;
                for (key, value) in map {
                    if first {
                        push_pad(out, indent);
                        out.push_str("- ");
                        first = false;
                    } else {
                        push_pad(out, indent + INDENT);
                    }
                    emit_entry(out, key, value, indent + INDENT);
                }
            }
            Value::Sequence(nested) if !nested.is_empty() => {
                push_pad(out, indent);
                out.push_str("-\n");
                emit_sequence(out, nested, indent + INDENT);
            }
            Value::String(text) if text.contains('\n') => {
                push_pad(out, indent);
                out.push_str("- ");
                emit_literal_block(out, text, indent + INDENT);
            }
            other => {
                push_pad(out, indent);
                out.push_str("- ");
                out.push_str(&render_scalar(other));
                out.push('\n');
            }
        }
    }
}

fn emit_literal_block(out: &mut String, text: &str, indent: usize) {
    out.push_str("|-\n");
    for line in text.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            push_pad(out, indent);
            out.push_str(line);
            out.push('\n');
        }
    }
}

fn push_pad(out: &mut String, width: usize) {
    for _ in 0..width {
        out.push(' ');
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => "~".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if needs_quoting(s) => quote(s),
        Value::String(s) => s.clone(),
        // Structured scalars never reach here from the dumper.
        other => serde_yaml::to_string(other)
            .unwrap_or_default()
            .trim_end()
            .to_string(),
    }
}

fn needs_quoting(s: &str) -> bool {
    if s.is_empty() || s.trim() != s {
        return true;
    }
    if matches!(
        s.to_ascii_lowercase().as_str(),
        "~" | "null" | "true" | "false" | "yes" | "no" | "on" | "off"
    ) {
        return true;
    }
    if s.parse::<f64>().is_ok() {
        return true;
    }
    let first = s.chars().next().unwrap_or(' ');
    if "-?:#&*!|>'\"%@`[]{},".contains(first) {
        return true;
    }
    s.contains(": ")
        || s.ends_with(':')
        || s.contains(" #")
        || s.chars().any(|c| c.is_control())
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
