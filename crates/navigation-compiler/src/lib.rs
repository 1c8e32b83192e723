//! Compiles navigation configuration into a construction plan.
//!
//! Menus (recursive item trees) and breadcrumbs (parent-linked records) are
//! validated, resolved and turned into typed construction instructions that
//! an external object-assembly container can instantiate.

pub mod artifact;
pub mod breadcrumb;
pub mod compile;
pub mod config;
pub mod error;
pub mod item;
pub mod menu;
pub mod plan;
pub mod schema;
pub mod value;

pub use artifact::{
    build_artifact, load_artifact, write_artifact, write_artifact_file, PlanArtifact,
    SourceDocument, COMPILER_VERSION, PLAN_FORMAT_VERSION,
};
pub use breadcrumb::BreadcrumbLinker;
pub use compile::{compile, compile_file, compile_str, CompileOptions, CompileResult};
pub use config::{MenuSpec, NavigationConfig};
pub use error::{CompileError, CompileWarning};
pub use item::{BreadcrumbSpec, ItemConfig, RouteConfig, ServiceConfig};
pub use menu::MenuTreeBuilder;
pub use plan::{
    Argument, CompilationPlan, ConstructionInstruction, FactoryRef, InstructionKind, MethodCall,
    TagAttributes,
};
pub use schema::{ItemNormalizer, SchemaTree};
pub use value::{resolve, ResolvedValue};
