//! Minimal LDIF record writer for command output.

use base64::{Engine, engine::general_purpose::STANDARD};
use olc_types::Entry;
use olc_types::ldif::LdifWriter;

/// Writes `name: value` lines, switching to `name:: <base64>` for values
/// LDIF cannot carry verbatim. Lines are not folded.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainLdif;

fn is_safe(value: &str) -> bool {
    let bytes = value.as_bytes();
    let safe_start = !matches!(bytes.first(), Some(b' ' | b':' | b'<'));
    let safe_end = !value.ends_with(' ');
    safe_start
        && safe_end
        && bytes
            .iter()
            .all(|&b| b.is_ascii() && !matches!(b, b'\0' | b'\n' | b'\r'))
}

fn push_line(out: &mut String, name: &str, value: &str) {
    if is_safe(value) {
        out.push_str(&format!("{name}: {value}\n"));
    } else {
        out.push_str(&format!("{name}:: {}\n", STANDARD.encode(value)));
    }
}

impl LdifWriter for PlainLdif {
    fn write_record(&self, entry: &Entry) -> String {
        let mut out = String::new();
        push_line(&mut out, "dn", entry.dn());
        for attr in entry.attributes() {
            for value in attr.values() {
                push_line(&mut out, attr.name(), value);
            }
        }
        out
    }
}
