//! Menu tree construction.
//!
//! Turns normalized item configuration into construction instructions,
//! recursing into children.

use indexmap::IndexMap;
use serde_json::Value;

use crate::compile::CompileOptions;
use crate::config::MenuSpec;
use crate::error::{CompileError, CompileWarning};
use crate::item::ItemConfig;
use crate::plan::{Argument, ConstructionInstruction, FactoryRef, MethodCall};
use crate::schema::ItemNormalizer;
use crate::value::{resolve, resolve_map, ResolvedValue};

/// Builds construction instructions for menu trees.
pub struct MenuTreeBuilder<'a> {
    options: &'a CompileOptions,
    normalizer: ItemNormalizer,
    warnings: Vec<CompileWarning>,
}

impl<'a> MenuTreeBuilder<'a> {
    pub fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            normalizer: ItemNormalizer::new(options.strict_items),
            warnings: Vec::new(),
        }
    }

    /// Build the root instruction of a menu.
    ///
    /// Every entry of `menu.items` is normalized, so this fails on the first
    /// invalid item.
    pub fn build_root(
        &mut self,
        name: &str,
        menu: &MenuSpec,
    ) -> Result<ConstructionInstruction, CompileError> {
        let location = format!("menus.{}", name);

        // Menu-level keys win over the menu's options.
        let mut attributes = resolve_map(&menu.options);
        for (key, value) in &menu.attributes {
            attributes.insert(key.clone(), resolve(value));
        }

        let mut root = self
            .create_menu_item("root", attributes)
            .with_alias_tag(&self.options.alias_tag, name);

        for (item_name, raw) in &menu.items {
            let item_location = format!("{}.items.{}", location, item_name);
            let item = self.normalizer.normalize_item(&item_location, raw)?;
            let child = self.build_item_at(&item_location, item_name, &item);
            root.add_method_call(MethodCall::add_child(item_name, child));
        }

        Ok(root)
    }

    /// Build the instruction for one normalized item.
    pub fn build_item(&mut self, name: &str, item: &ItemConfig) -> ConstructionInstruction {
        self.build_item_at(name, name, item)
    }

    pub(crate) fn build_item_at(
        &mut self,
        location: &str,
        name: &str,
        item: &ItemConfig,
    ) -> ConstructionInstruction {
        self.check_driving_keys(location, item);

        if let Some(service) = &item.service {
            let Some(method) = service.method() else {
                if service.parameters.is_some() {
                    self.warn(
                        "W2031",
                        format!(
                            "service '{}' has parameters but no method; parameters are ignored",
                            service.id
                        ),
                        location,
                    );
                }
                return ConstructionInstruction::service_reference(&service.id);
            };

            let arguments = service
                .parameters
                .as_ref()
                .map(|parameters| {
                    resolve(parameters)
                        .into_arguments()
                        .into_iter()
                        .map(Argument::from)
                        .collect()
                })
                .unwrap_or_default();

            return ConstructionInstruction::factory_call(
                &self.options.service_target_type,
                FactoryRef::new(&service.id, method),
                arguments,
            );
        }

        if let Some(source) = item.expression() {
            return ConstructionInstruction::expression(source);
        }

        let attributes = flatten_attributes(item);

        if item.children.is_empty() {
            return ConstructionInstruction::plain_map(attributes);
        }

        let mut node = self.create_menu_item(name, attributes);
        for (child_name, child) in &item.children {
            let child_location = format!("{}.children.{}", location, child_name);
            let instruction = self.build_item_at(&child_location, child_name, child);
            node.add_method_call(MethodCall::add_child(child_name, instruction));
        }
        node
    }

    /// A factory call creating a menu item named `name`.
    pub(crate) fn create_menu_item(
        &self,
        name: &str,
        mut attributes: IndexMap<String, ResolvedValue>,
    ) -> ConstructionInstruction {
        attributes.shift_remove("children");

        ConstructionInstruction::factory_call(
            &self.options.item_type,
            self.options.item_factory.clone(),
            vec![
                ResolvedValue::string(name).into(),
                ResolvedValue::Mapping(attributes).into(),
            ],
        )
    }

    /// Warnings collected so far.
    pub fn warnings(&self) -> &[CompileWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<CompileWarning> {
        self.warnings
    }

    fn check_driving_keys(&mut self, location: &str, item: &ItemConfig) {
        let keys = item.driving_keys();
        if let [winner, ignored @ ..] = keys.as_slice() {
            if !ignored.is_empty() {
                self.warn(
                    "W2030",
                    format!(
                        "item sets {}; '{}' takes precedence and {} ignored",
                        keys.join(", "),
                        winner,
                        ignored
                            .iter()
                            .map(|k| format!("'{}'", k))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                    location,
                );
            }
        }
    }

    fn warn(&mut self, code: &str, message: String, location: &str) {
        let warning = CompileWarning {
            code: code.to_string(),
            message,
            location: Some(location.to_string()),
        };
        // Breadcrumb ancestors are built once per chain they appear in.
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }
}

/// The item's flat attribute map: resolved options overlaid by the explicit
/// item keys and the flattened route.
fn flatten_attributes(item: &ItemConfig) -> IndexMap<String, ResolvedValue> {
    let mut attributes = resolve_map(&item.options);

    for (key, value) in &item.attributes {
        attributes.insert(key.clone(), ResolvedValue::Literal(value.clone()));
    }

    if let Some(route) = &item.route {
        attributes.insert("route".into(), resolve(&Value::String(route.name.clone())));
        attributes.insert(
            "routeParameters".into(),
            ResolvedValue::Mapping(resolve_map(&route.parameters)),
        );
        attributes.insert("routeAbsolute".into(), resolve(&route.absolute));
    }

    // Driving keys can still arrive through `options`.
    attributes.shift_remove("children");
    attributes.shift_remove("expression");

    attributes
}
