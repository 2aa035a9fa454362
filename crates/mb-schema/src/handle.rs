//! Connection handle naming
//!
//! Each field exposes two handles on its node: `<field>-source` for outgoing
//! edges and `<field>-target` for incoming ones.

const SOURCE_SUFFIX: &str = "-source";
const TARGET_SUFFIX: &str = "-target";

/// Field name assumed when an edge carries no handle
pub const DEFAULT_HANDLE_FIELD: &str = "id";

/// Handle id for edges leaving `field`
#[inline]
#[must_use]
pub fn source_handle(field: &str) -> String {
    format!("{field}{SOURCE_SUFFIX}")
}

/// Handle id for edges entering `field`
#[inline]
#[must_use]
pub fn target_handle(field: &str) -> String {
    format!("{field}{TARGET_SUFFIX}")
}

/// Recover the field name from a handle id
///
/// Strips the first `-source` and then the first `-target` occurrence, so
/// handles written by other tools degrade to the raw string.
#[must_use]
pub fn field_from_handle(handle: Option<&str>) -> String {
    match handle {
        Some(h) if !h.is_empty() => h
            .replacen(SOURCE_SUFFIX, "", 1)
            .replacen(TARGET_SUFFIX, "", 1),
        _ => DEFAULT_HANDLE_FIELD.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_roundtrip() {
        assert_eq!(field_from_handle(Some(&source_handle("dept_id"))), "dept_id");
        assert_eq!(field_from_handle(Some(&target_handle("id"))), "id");
    }

    #[test]
    fn missing_handle_defaults_to_id() {
        assert_eq!(field_from_handle(None), "id");
        assert_eq!(field_from_handle(Some("")), "id");
    }

    #[test]
    fn foreign_handle_passthrough() {
        assert_eq!(field_from_handle(Some("left")), "left");
    }
}
