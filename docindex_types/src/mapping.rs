//! Mapping schema model and extraction of `non-nullable` field paths.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Dot-joined sequence of property names locating a field within a nested
/// document, e.g. `obj.message2`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The property names making up this path, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// A node in a document type's mapping tree, in the wire format accepted by
/// the `_mapping` API.
///
/// Only two attributes are interpreted on this side of the wire: the nested
/// `properties` map and the `non-nullable` marker. Everything else a mapping
/// carries (`type`, `store`, analyzer settings, ...) is kept intact in
/// [`attributes`](Self::attributes) so that forwarding a mapping to the
/// server never drops schema detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingNode {
    /// Child properties, keyed by property name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, MappingNode>,

    /// Marks this property as rejecting an explicit null on write.
    #[serde(
        rename = "non-nullable",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub non_nullable: bool,

    /// Attributes this client does not interpret.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl MappingNode {
    /// Collects the dotted path of every property marked `non-nullable`, at
    /// any depth of the mapping tree.
    ///
    /// A flagged property is emitted and then still descended into, since it
    /// may itself contain flagged children. The flag on the root node is
    /// ignored: the root is the type-level mapping and has no name to build
    /// a path from. An empty mapping yields an empty set.
    pub fn non_nullable_paths(&self) -> BTreeSet<FieldPath> {
        let mut paths = BTreeSet::new();
        collect_non_nullable(self, None, &mut paths);
        paths
    }
}

fn collect_non_nullable(node: &MappingNode, prefix: Option<&str>, out: &mut BTreeSet<FieldPath>) {
    for (name, child) in &node.properties {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.clone(),
        };
        if child.non_nullable {
            out.insert(FieldPath::new(path.as_str()));
        }
        collect_non_nullable(child, Some(&path), out);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn mapping(value: serde_json::Value) -> MappingNode {
        serde_json::from_value(value).expect("deserialize mapping")
    }

    fn paths(mapping: &MappingNode) -> Vec<String> {
        mapping
            .non_nullable_paths()
            .iter()
            .map(|p| p.as_str().to_owned())
            .collect()
    }

    #[test]
    fn extracts_root_and_nested_fields() {
        let mapping = mapping(json!({
            "properties": {
                "message1": { "type": "string", "store": true },
                "message2": { "type": "string", "store": true, "non-nullable": true },
                "obj": {
                    "properties": {
                        "message1": { "type": "string" },
                        "message2": { "type": "string", "non-nullable": true }
                    }
                }
            }
        }));

        assert_eq!(paths(&mapping), ["message2", "obj.message2"]);
    }

    #[test]
    fn flagged_node_with_flagged_descendants_emits_both() {
        let mapping = mapping(json!({
            "properties": {
                "obj": {
                    "non-nullable": true,
                    "properties": {
                        "inner": { "non-nullable": true },
                        "deeper": {
                            "properties": {
                                "leaf": { "non-nullable": true }
                            }
                        }
                    }
                }
            }
        }));

        assert_eq!(paths(&mapping), ["obj", "obj.deeper.leaf", "obj.inner"]);
    }

    #[test]
    fn unflagged_fields_are_not_emitted() {
        let mapping = mapping(json!({
            "properties": {
                "a": { "type": "string" },
                "b": { "properties": { "c": { "type": "long" } } }
            }
        }));

        assert!(mapping.non_nullable_paths().is_empty());
    }

    #[test]
    fn empty_and_leaf_mappings_yield_no_paths() {
        assert!(mapping(json!({})).non_nullable_paths().is_empty());
        // A root-level flag has no name to build a path from.
        assert!(
            mapping(json!({ "non-nullable": true }))
                .non_nullable_paths()
                .is_empty()
        );
    }

    #[test]
    fn uninterpreted_attributes_survive_a_round_trip() {
        let raw = json!({
            "properties": {
                "message2": { "type": "string", "store": true, "non-nullable": true }
            }
        });
        let node = mapping(raw.clone());
        assert_eq!(serde_json::to_value(&node).expect("serialize mapping"), raw);

        let message2 = &node.properties["message2"];
        assert!(message2.non_nullable);
        assert_eq!(message2.attributes["type"], json!("string"));
        assert_eq!(message2.attributes["store"], json!(true));
    }

    #[test]
    fn field_path_segments_split_on_dots() {
        let path = FieldPath::from("a.b.c");
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(path.to_string(), "a.b.c");
    }
}
