//! Compilation driver.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::breadcrumb::BreadcrumbLinker;
use crate::config::NavigationConfig;
use crate::error::{CompileError, CompileWarning};
use crate::menu::MenuTreeBuilder;
use crate::plan::{CompilationPlan, FactoryRef};
use crate::schema::ItemNormalizer;

/// Options for compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Prefix of every plan-entry key.
    pub namespace: String,
    /// Tag carried by root instructions, with `[{alias: <name>}]`.
    pub alias_tag: String,
    /// Factory creating menu items.
    pub item_factory: FactoryRef,
    /// Target type of menu-item factory calls.
    pub item_type: String,
    /// Target type of service factory calls.
    pub service_target_type: String,
    /// Reject unknown item keys (default: true).
    pub strict_items: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            namespace: "navigation".to_string(),
            alias_tag: "navigation.menu".to_string(),
            item_factory: FactoryRef::new("navigation.menu_factory", "createItem"),
            item_type: "menu_item".to_string(),
            service_target_type: "object".to_string(),
            strict_items: true,
        }
    }
}

impl CompileOptions {
    /// Plan-entry key of a menu (`<namespace>.menu.<name>`).
    pub fn menu_key(&self, name: &str) -> String {
        format!("{}.menu.{}", self.namespace, name)
    }

    /// Plan-entry key of a breadcrumb (`<namespace>.breadcrumbs.<name>`).
    pub fn breadcrumb_key(&self, name: &str) -> String {
        format!("{}.breadcrumbs.{}", self.namespace, name)
    }
}

/// Result of compilation including the plan and any warnings.
#[derive(Debug, Clone, Serialize)]
pub struct CompileResult {
    pub plan: CompilationPlan,
    /// Non-fatal issues, in the order they were found.
    pub warnings: Vec<CompileWarning>,
}

/// Compile a configuration document into a construction plan.
///
/// Menus come first, then breadcrumbs, each in document order. The first
/// error aborts compilation; no partial plan is returned.
pub fn compile(
    config: &NavigationConfig,
    options: &CompileOptions,
) -> Result<CompileResult, CompileError> {
    let mut plan = CompilationPlan::new();

    let mut menus = MenuTreeBuilder::new(options);
    for (name, menu) in &config.menus {
        let root = menus.build_root(name, menu)?;
        tracing::debug!(menu = %name, items = menu.items.len(), "compiled menu");
        plan.insert(options.menu_key(name), root);
    }

    let normalizer = ItemNormalizer::new(options.strict_items);
    let mut breadcrumbs = IndexMap::with_capacity(config.breadcrumbs.len());
    for (name, raw) in &config.breadcrumbs {
        let location = format!("breadcrumbs.{}", name);
        breadcrumbs.insert(name.clone(), normalizer.normalize_breadcrumb(&location, raw)?);
    }

    // Entries interlink, so the whole map is linked at once.
    let mut linker = BreadcrumbLinker::new(options);
    for (name, trail) in linker.link_all(&breadcrumbs)? {
        tracing::debug!(breadcrumb = %name, depth = trail.method_calls.len(), "compiled breadcrumb");
        plan.insert(options.breadcrumb_key(&name), trail);
    }

    let mut warnings = menus.into_warnings();
    warnings.extend(linker.into_warnings());

    for warning in &warnings {
        tracing::warn!(
            code = %warning.code,
            location = warning.location.as_deref().unwrap_or(""),
            "{}",
            warning.message
        );
    }

    tracing::info!(
        menus = config.menus.len(),
        breadcrumbs = breadcrumbs.len(),
        entries = plan.len(),
        warnings = warnings.len(),
        "compilation finished"
    );

    Ok(CompileResult { plan, warnings })
}

/// Compile a configuration document given as a YAML/JSON string.
pub fn compile_str(input: &str, options: &CompileOptions) -> Result<CompileResult, CompileError> {
    let config = NavigationConfig::parse(input)?;
    compile(&config, options)
}

/// Compile a configuration file.
pub fn compile_file(path: &Path, options: &CompileOptions) -> Result<CompileResult, CompileError> {
    let config = NavigationConfig::from_file(path)?;
    compile(&config, options)
}
