//! Dotted-path resolution against nested documents.

use serde_json::Value;

use crate::FieldPath;

/// Outcome of resolving a [`FieldPath`] against a document.
///
/// A key that is missing is distinct from a key that is present and holds an
/// explicit null; only the latter counts as a null-constraint violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The path does not lead to a value.
    Absent,
    /// The path leads to an explicit JSON null.
    Null,
    /// The path leads to a non-null value.
    Value(&'a Value),
}

/// Walks `doc` along the dotted `path`, descending only through objects.
///
/// A missing key, or an intermediate value that is not an object (a scalar,
/// an array, or a null), ends the walk as [`Resolution::Absent`].
pub fn resolve_path<'a>(doc: &'a Value, path: &FieldPath) -> Resolution<'a> {
    let mut current = doc;
    for segment in path.segments() {
        match current.as_object().and_then(|obj| obj.get(segment)) {
            Some(value) => current = value,
            None => return Resolution::Absent,
        }
    }
    if current.is_null() {
        Resolution::Null
    } else {
        Resolution::Value(current)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn resolve<'a>(doc: &'a Value, path: &str) -> Resolution<'a> {
        resolve_path(doc, &FieldPath::from(path))
    }

    #[test]
    fn present_value_at_root_and_nested() {
        let doc = json!({ "a": 1, "obj": { "b": "hello" } });
        assert_eq!(resolve(&doc, "a"), Resolution::Value(&json!(1)));
        assert_eq!(resolve(&doc, "obj.b"), Resolution::Value(&json!("hello")));
    }

    #[test]
    fn explicit_null_is_null() {
        let doc = json!({ "a": null, "obj": { "b": null } });
        assert_eq!(resolve(&doc, "a"), Resolution::Null);
        assert_eq!(resolve(&doc, "obj.b"), Resolution::Null);
    }

    #[test]
    fn missing_key_is_absent() {
        let doc = json!({ "a": 1 });
        assert_eq!(resolve(&doc, "b"), Resolution::Absent);
        assert_eq!(resolve(&doc, "a.b"), Resolution::Absent);
        assert_eq!(resolve(&json!({}), "a"), Resolution::Absent);
    }

    #[test]
    fn non_object_intermediate_is_absent() {
        let doc = json!({ "s": "text", "n": 7, "arr": [{ "x": null }] });
        assert_eq!(resolve(&doc, "s.inner"), Resolution::Absent);
        assert_eq!(resolve(&doc, "n.inner"), Resolution::Absent);
        // Array indexing is not part of path resolution.
        assert_eq!(resolve(&doc, "arr.x"), Resolution::Absent);
    }

    #[test]
    fn null_intermediate_is_absent_for_deeper_paths() {
        // The null itself is only reportable at its own path.
        let doc = json!({ "obj": null });
        assert_eq!(resolve(&doc, "obj"), Resolution::Null);
        assert_eq!(resolve(&doc, "obj.b"), Resolution::Absent);
    }
}
