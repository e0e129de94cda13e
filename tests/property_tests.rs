//! Property-based tests for core domain types.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use tmod::core::graph::LockGraph;
use tmod::core::repository::{Configuration, LockEntry, Repository};
use tmod::core::types::{GameVersion, ModLoader, ModTarget, Slug};
use tmod::engine::{build_tree, TreeNode};
use tmod::ui::output::render_tree;

/// Strategy for generating valid slugs.
fn valid_slug() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9_.-]{0,30}"
}

/// Strategy for a small lock graph over slugs `m0..mN`, cycles allowed.
fn lock_graph() -> impl Strategy<Value = (BTreeSet<Slug>, BTreeMap<Slug, LockEntry>)> {
    (1usize..8).prop_flat_map(|n| {
        let edges = prop::collection::vec(prop::collection::vec(0..n, 0..4), n);
        let roots = prop::collection::btree_set(0..n, 1..=n);
        (edges, roots).prop_map(move |(edges, roots)| {
            let name = |i: usize| Slug::new(format!("m{}", i)).unwrap();
            let locks = edges
                .into_iter()
                .enumerate()
                .map(|(i, deps)| {
                    let deps = deps.into_iter().map(name).collect();
                    (name(i), LockEntry::new("2024-01-01T00:00:00Z", false, deps))
                })
                .collect();
            let roots = roots.into_iter().map(name).collect();
            (roots, locks)
        })
    })
}

fn depth(node: &TreeNode) -> usize {
    1 + node.children.iter().map(depth).max().unwrap_or(0)
}

proptest! {
    #[test]
    fn valid_slugs_roundtrip(s in valid_slug()) {
        let slug = Slug::new(&s).unwrap();
        prop_assert_eq!(slug.as_str(), s.as_str());
        prop_assert_eq!(slug.to_string(), s);
    }

    #[test]
    fn slugs_with_separators_rejected(a in valid_slug(), b in valid_slug()) {
        let with_slash = format!("{}/{}", a, b);
        let with_backslash = format!("{}\\{}", a, b);
        prop_assert!(Slug::new(with_slash).is_err());
        prop_assert!(Slug::new(with_backslash).is_err());
    }

    #[test]
    fn numeric_targets_are_ids(id in any::<u32>()) {
        prop_assert_eq!(ModTarget::parse(&id.to_string()).unwrap(), ModTarget::Id(id));
    }

    #[test]
    fn dotted_numbers_are_game_versions(parts in prop::collection::vec(0u32..100, 2..4)) {
        let text = parts.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(".");
        let version = GameVersion::new(&text).unwrap();
        prop_assert_eq!(version.as_str(), text.as_str());
    }

    #[test]
    fn single_component_versions_rejected(major in 0u32..100) {
        prop_assert!(GameVersion::new(major.to_string()).is_err());
    }

    #[test]
    fn tree_terminates_and_is_bounded((roots, locks) in lock_graph()) {
        let n = locks.len();
        let repo = Repository::from_parts(
            Configuration::new(GameVersion::new("1.20.1").unwrap(), ModLoader::Forge),
            roots.clone(),
            locks,
        );

        let tree = build_tree(&repo);
        prop_assert_eq!(tree.children.len(), roots.len());
        // The synthetic root, at most n distinct slugs on a path, and one
        // trailing "(cycle)" leaf.
        prop_assert!(depth(&tree) <= n + 2);

        let rendered = render_tree(&tree);
        prop_assert!(rendered.starts_with("tmod\n"));
    }

    #[test]
    fn reachable_set_contains_start((_, locks) in lock_graph()) {
        let graph = LockGraph::from_locks(&locks);
        for slug in locks.keys() {
            let reachable = graph.reachable_from(slug);
            prop_assert!(reachable.contains(slug));
            for dep in graph.dependencies_of(slug) {
                prop_assert!(reachable.contains(dep));
            }
        }
    }
}
