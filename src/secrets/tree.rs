//! Rebuilds nested secret values from flat, path-named parameters.
//!
//! A lookup of `/app/db` that returns
//!
//! ```text
//! /app/db/name         = dbName
//! /app/db/extra/test1  = test1
//! /app/db/user         = dbUser
//! ```
//!
//! reconstructs to `{name: dbName, extra: {test1: test1}, user: dbUser}`.
//! When exactly one parameter came back, the tree is unwrapped to the single
//! value it contains, so a flat parameter reads back as a scalar.

use indexmap::IndexMap;

use super::types::SecretValue;
use crate::parameter_store::PATH_SEPARATOR;

/// Accumulates parameters found under one prefix into a single value.
#[derive(Debug)]
pub struct TreeBuilder<'a> {
    prefix: &'a str,
    root: IndexMap<String, SecretValue>,
    count: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(prefix: &'a str) -> Self {
        Self { prefix, root: IndexMap::new(), count: 0 }
    }

    /// Path segments of `name` relative to the prefix.
    ///
    /// A name equal to the prefix has an empty relative path and lands under
    /// the `""` key. When it is the only parameter, [`finish`](Self::finish)
    /// unwraps it to its bare value.
    pub fn segments<'n>(&self, name: &'n str) -> Vec<&'n str> {
        let rest = match name.strip_prefix(self.prefix) {
            Some(rest) => rest.strip_prefix(PATH_SEPARATOR).unwrap_or(rest),
            None => name.trim_start_matches(PATH_SEPARATOR),
        };
        rest.split(PATH_SEPARATOR).collect()
    }

    /// Places `value` at the location `name` describes. A later insert at
    /// the same location, or one that needs a branch where a leaf sits,
    /// replaces what was there.
    pub fn insert(&mut self, name: &str, value: SecretValue) {
        let segments = self.segments(name);
        insert_path(&mut self.root, &segments, value);
        self.count += 1;
    }

    /// Number of parameters inserted so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Finishes the reconstruction.
    ///
    /// Returns `None` if nothing was inserted. With exactly one insert the
    /// single top-level value is returned on its own, even when that
    /// parameter sat below the prefix (its first segment is dropped).
    pub fn finish(mut self) -> Option<SecretValue> {
        match self.count {
            0 => None,
            1 => self.root.pop().map(|(_, value)| value),
            _ => Some(SecretValue::Tree(self.root)),
        }
    }
}

fn insert_path(node: &mut IndexMap<String, SecretValue>, segments: &[&str], value: SecretValue) {
    match segments {
        [] => {}
        [last] => {
            node.insert((*last).to_string(), value);
        }
        [head, rest @ ..] => {
            let child = node
                .entry((*head).to_string())
                .or_insert_with(|| SecretValue::Tree(IndexMap::new()));
            if !child.is_tree() {
                *child = SecretValue::Tree(IndexMap::new());
            }
            if let SecretValue::Tree(branch) = child {
                insert_path(branch, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn build(prefix: &str, parameters: &[(&str, &str)]) -> Option<SecretValue> {
        let mut builder = TreeBuilder::new(prefix);
        for (name, value) in parameters {
            builder.insert(name, SecretValue::from(*value));
        }
        builder.finish()
    }

    #[test]
    fn test_single_flat_parameter_is_scalar() {
        let value =
            build("/test/MyTestDatabaseSecret", &[("/test/MyTestDatabaseSecret", "secret")]);
        assert_eq!(value, Some(SecretValue::from("secret")));

        let builder = TreeBuilder::new("/test/MyTestDatabaseSecret");
        assert_eq!(builder.segments("/test/MyTestDatabaseSecret"), vec![""]);
    }

    #[test]
    fn test_nested_reconstruction() {
        let value = build(
            "/test/db",
            &[
                ("/test/db/name", "dbName"),
                ("/test/db/extra/test1", "test1"),
                ("/test/db/extra/test2", "test2"),
                ("/test/db/user", "dbUser"),
            ],
        )
        .unwrap();

        let expected = SecretValue::tree([
            ("name", SecretValue::from("dbName")),
            ("extra", SecretValue::tree([("test1", "test1"), ("test2", "test2")])),
            ("user", SecretValue::from("dbUser")),
        ]);
        assert_eq!(value, expected);

        let keys: Vec<&String> = value.as_tree().unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "extra", "user"]);
    }

    #[test]
    fn test_empty_input_is_none() {
        assert_eq!(build("/test/db", &[]), None);
    }

    #[test]
    fn test_single_nested_parameter_unwraps_first_level() {
        // One child below the prefix loses its top-level segment.
        assert_eq!(build("/test/db", &[("/test/db/user", "dbUser")]), Some("dbUser".into()));
        assert_eq!(
            build("/test/db", &[("/test/db/extra/test1", "test1")]),
            Some(SecretValue::tree([("test1", "test1")]))
        );
    }

    #[test]
    fn test_exact_collision_last_write_wins() {
        let value = build("/a", &[("/a/x", "first"), ("/a/y", "other"), ("/a/x", "second")]);
        assert_eq!(value.unwrap().get("x"), Some(&SecretValue::from("second")));
    }

    #[test]
    fn test_branch_replaces_leaf_and_back() {
        let value = build("/a", &[("/a/x", "leaf"), ("/a/x/y", "nested")]).unwrap();
        assert_eq!(value.pointer("x/y"), Some(&SecretValue::from("nested")));

        let value = build("/a", &[("/a/x/y", "nested"), ("/a/x", "leaf"), ("/a/z", "z")]).unwrap();
        assert_eq!(value.get("x"), Some(&SecretValue::from("leaf")));
    }

    #[test]
    fn test_parameter_equal_to_prefix_among_children() {
        let value = build("/a", &[("/a", "root"), ("/a/b", "child")]).unwrap();
        assert_eq!(value.get(""), Some(&SecretValue::from("root")));
        assert_eq!(value.get("b"), Some(&SecretValue::from("child")));
        assert_eq!(value.get("/a"), None);

        let keys: Vec<&String> = value.as_tree().unwrap().keys().collect();
        assert_eq!(keys, vec!["", "b"]);
    }

    #[test]
    fn test_prefix_with_trailing_separator() {
        let builder = TreeBuilder::new("/a/");
        assert_eq!(builder.segments("/a/b/c"), vec!["b", "c"]);
    }

    fn leaf_paths() -> impl Strategy<Value = BTreeMap<(String, String), String>> {
        prop::collection::btree_map(("[a-d]{1,3}", "[e-h]{1,3}"), "[a-z0-9]{1,8}", 2..12)
    }

    proptest! {
        #[test]
        fn prop_every_leaf_is_reachable(leaves in leaf_paths()) {
            let mut builder = TreeBuilder::new("/root");
            for ((branch, leaf), value) in &leaves {
                let name = format!("/root/{}/{}", branch, leaf);
                builder.insert(&name, SecretValue::from(value.as_str()));
            }
            prop_assert_eq!(builder.count(), leaves.len());

            let tree = builder.finish().unwrap();
            for ((branch, leaf), value) in &leaves {
                let path = format!("{}/{}", branch, leaf);
                let found = tree.pointer(&path).and_then(SecretValue::as_str);
                prop_assert_eq!(found, Some(value.as_str()));
            }
        }
    }
}
