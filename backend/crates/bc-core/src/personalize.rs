//! Per-recipient message personalization.
//!
//! Only deterministic placeholder substitution is performed; the campaign's
//! stored template is never modified.

use crate::Recipient;

pub const NAME_PLACEHOLDER: &str = "{name}";
pub const PHONE_PLACEHOLDER: &str = "{phone}";

/// Fill `{name}` and `{phone}` placeholders for one recipient
pub fn render_message(template: &str, recipient: &Recipient) -> String {
    if !has_placeholders(template) {
        return template.to_string();
    }

    // Single pass; substituted values are never rescanned
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix(NAME_PLACEHOLDER) {
            out.push_str(recipient.name.trim());
            rest = after;
        } else if let Some(after) = tail.strip_prefix(PHONE_PLACEHOLDER) {
            out.push_str(&recipient.destination);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

pub fn has_placeholders(template: &str) -> bool {
    template.contains(NAME_PLACEHOLDER) || template.contains(PHONE_PLACEHOLDER)
}
