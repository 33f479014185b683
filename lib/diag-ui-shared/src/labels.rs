//! Translation keys used by the section, with their English texts.

pub const RETRIEVE_DIAGNOSTICS: &str = "label.retrievediagnostics.diagnostics";
pub const NAME: &str = "label.name";
pub const TYPE: &str = "label.type";
pub const SYSTEM_VM_NAME: &str = "label.systemvm.name";
pub const DIAGNOSTICS_TYPE: &str = "label.diagnosticstype";
pub const DETAIL: &str = "label.retrievediagnostics.detail";
pub const DETAILS: &str = "label.details";
pub const INSTANCES: &str = "label.instances";

const ENGLISH: &[(&str, &str)] = &[
    (RETRIEVE_DIAGNOSTICS, "Retrieve Diagnostics"),
    (NAME, "Name"),
    (TYPE, "Type"),
    (SYSTEM_VM_NAME, "System VM"),
    (DIAGNOSTICS_TYPE, "Diagnostics Type"),
    (DETAIL, "Detail"),
    (DETAILS, "Details"),
    (INSTANCES, "Instances"),
];

/// English text for a key, `None` for keys this section does not define.
fn default_text(key: &str) -> Option<&'static str> {
    ENGLISH
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, text)| *text)
}

/// English text for a key, falling back to the key itself.
pub fn text(key: &str) -> &str {
    default_text(key).unwrap_or(key)
}
