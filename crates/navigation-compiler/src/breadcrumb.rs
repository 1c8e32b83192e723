//! Breadcrumb linking.
//!
//! Every breadcrumb becomes a root item whose children are its ancestors,
//! outermost first, ending with the breadcrumb itself. Each chain is walked
//! independently, so shared ancestors are built once per chain.

use indexmap::{IndexMap, IndexSet};

use crate::compile::CompileOptions;
use crate::error::{CompileError, CompileWarning};
use crate::item::BreadcrumbSpec;
use crate::menu::MenuTreeBuilder;
use crate::plan::{ConstructionInstruction, MethodCall};

/// Links breadcrumb parent chains into ordered trails.
pub struct BreadcrumbLinker<'a> {
    options: &'a CompileOptions,
    items: MenuTreeBuilder<'a>,
}

impl<'a> BreadcrumbLinker<'a> {
    pub fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            items: MenuTreeBuilder::new(options),
        }
    }

    /// Link every breadcrumb of the map, in map order.
    ///
    /// Fails on the first breadcrumb whose chain names an unknown parent or
    /// loops back on itself.
    pub fn link_all(
        &mut self,
        breadcrumbs: &IndexMap<String, BreadcrumbSpec>,
    ) -> Result<IndexMap<String, ConstructionInstruction>, CompileError> {
        let mut linked = IndexMap::with_capacity(breadcrumbs.len());

        for (name, spec) in breadcrumbs {
            let trail = self.link(name, spec, breadcrumbs)?;
            linked.insert(name.clone(), trail);
        }

        Ok(linked)
    }

    fn link<'b>(
        &mut self,
        name: &'b str,
        spec: &'b BreadcrumbSpec,
        breadcrumbs: &'b IndexMap<String, BreadcrumbSpec>,
    ) -> Result<ConstructionInstruction, CompileError> {
        let mut calls = Vec::new();
        let mut visited: IndexSet<&'b str> = IndexSet::new();

        let mut current_name = name;
        let mut current = spec;
        visited.insert(current_name);

        loop {
            let location = format!("breadcrumbs.{}", current_name);
            let node = self.items.build_item_at(&location, current_name, &current.item);
            calls.push(MethodCall::add_child(current_name, node));

            let Some(parent) = current.parent.as_deref() else {
                break;
            };

            let parent_spec = breadcrumbs
                .get(parent)
                .ok_or_else(|| CompileError::MissingParent {
                    parent: parent.to_string(),
                    child: current_name.to_string(),
                })?;

            if !visited.insert(parent) {
                return Err(CompileError::CircularReference {
                    name: current_name.to_string(),
                    path: visited.iter().map(|s| s.to_string()).collect(),
                });
            }

            current_name = parent;
            current = parent_spec;
        }

        // Outermost ancestor first, the breadcrumb itself last.
        calls.reverse();

        tracing::trace!(breadcrumb = %name, depth = calls.len(), "linked breadcrumb");

        let mut root = self
            .items
            .create_menu_item("root", IndexMap::new())
            .with_alias_tag(&self.options.alias_tag, name);
        root.method_calls = calls;

        Ok(root)
    }

    pub fn into_warnings(self) -> Vec<CompileWarning> {
        self.items.into_warnings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ItemNormalizer;
    use serde_json::{json, Value};

    fn breadcrumbs(raw: Value) -> IndexMap<String, BreadcrumbSpec> {
        let normalizer = ItemNormalizer::default();
        raw.as_object()
            .unwrap()
            .iter()
            .map(|(name, value)| {
                (
                    name.clone(),
                    normalizer.normalize_breadcrumb(name, value).unwrap(),
                )
            })
            .collect()
    }

    fn trail(instruction: &ConstructionInstruction) -> Vec<&str> {
        instruction
            .method_calls
            .iter()
            .map(|call| call.child_name().unwrap_or("<unnamed>"))
            .collect()
    }

    #[test]
    fn chain_is_ordered_root_to_leaf() {
        // Leaf listed first to show order does not depend on map order.
        let map = breadcrumbs(json!({
            "b": { "label": "B", "parent": "a" },
            "a": { "label": "A", "parent": "top" },
            "top": { "label": "Top", "parent": null }
        }));
        let options = CompileOptions::default();
        let mut linker = BreadcrumbLinker::new(&options);

        let linked = linker.link_all(&map).unwrap();

        assert_eq!(linked.keys().collect::<Vec<_>>(), ["b", "a", "top"]);
        assert_eq!(trail(&linked["b"]), ["top", "a", "b"]);
        assert_eq!(trail(&linked["a"]), ["top", "a"]);
        assert_eq!(trail(&linked["top"]), ["top"]);
        assert_eq!(linked["b"].tags[&options.alias_tag][0]["alias"], "b");
    }

    #[test]
    fn root_breadcrumb_has_single_call() {
        let map = breadcrumbs(json!({ "home": { "label": "Home" } }));
        let options = CompileOptions::default();
        let linked = BreadcrumbLinker::new(&options).link_all(&map).unwrap();

        assert_eq!(linked["home"].method_calls.len(), 1);
        assert_eq!(linked["home"].factory(), Some(&options.item_factory));
    }

    #[test]
    fn two_node_cycle_is_reported_with_path() {
        let map = breadcrumbs(json!({
            "x": { "parent": "y" },
            "y": { "parent": "x" }
        }));
        let options = CompileOptions::default();

        let err = BreadcrumbLinker::new(&options).link_all(&map).unwrap_err();

        match &err {
            CompileError::CircularReference { path, .. } => {
                assert_eq!(path, &["x".to_string(), "y".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(err.to_string().contains("x -> y"));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let map = breadcrumbs(json!({ "loop": { "parent": "loop" } }));
        let options = CompileOptions::default();

        let err = BreadcrumbLinker::new(&options).link_all(&map).unwrap_err();
        assert!(matches!(err, CompileError::CircularReference { ref name, .. } if name == "loop"));
    }

    #[test]
    fn longer_cycle_reports_every_visited_name() {
        let map = breadcrumbs(json!({
            "leaf": { "parent": "a" },
            "a": { "parent": "b" },
            "b": { "parent": "c" },
            "c": { "parent": "a" }
        }));
        let options = CompileOptions::default();

        let err = BreadcrumbLinker::new(&options).link_all(&map).unwrap_err();
        let CompileError::CircularReference { name, path } = err else {
            panic!("expected circular reference");
        };
        assert_eq!(name, "c");
        assert_eq!(path, ["leaf", "a", "b", "c"]);
    }

    #[test]
    fn unknown_parent_is_reported() {
        let map = breadcrumbs(json!({ "orphan": { "parent": "z" } }));
        let options = CompileOptions::default();

        let err = BreadcrumbLinker::new(&options).link_all(&map).unwrap_err();
        match err {
            CompileError::MissingParent { parent, child } => {
                assert_eq!(parent, "z");
                assert_eq!(child, "orphan");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn references_in_chain_have_no_name_slot() {
        let map = breadcrumbs(json!({
            "account": { "service": "acme.account_crumb" },
            "settings": { "label": "Settings", "parent": "account" }
        }));
        let options = CompileOptions::default();

        let linked = BreadcrumbLinker::new(&options).link_all(&map).unwrap();
        let calls = &linked["settings"].method_calls;

        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0].child(),
            Some(&ConstructionInstruction::service_reference("acme.account_crumb"))
        );
        assert_eq!(calls[0].child_name(), None);
        assert_eq!(calls[1].child_name(), Some("settings"));
    }

    #[test]
    fn breadcrumb_children_are_nested_normally() {
        let map = breadcrumbs(json!({
            "docs": {
                "label": "Docs",
                "children": { "api": { "label": "API" } }
            }
        }));
        let options = CompileOptions::default();

        let linked = BreadcrumbLinker::new(&options).link_all(&map).unwrap();
        let docs = linked["docs"].method_calls[0].child().unwrap();

        assert_eq!(docs.factory(), Some(&options.item_factory));
        assert_eq!(trail(docs), ["api"]);
    }
}
