//! Construction plan model.
//!
//! A plan describes how to build objects without building them: which
//! factory to call with which arguments, and which methods to invoke on the
//! result afterwards. It is consumed by an external assembly container.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::ResolvedValue;

/// Method used to attach a child item to its parent.
pub const ADD_CHILD: &str = "addChild";

/// A deferred factory: call `method` on the object registered as `service`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryRef {
    pub service: String,
    pub method: String,
}

impl FactoryRef {
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
        }
    }
}

/// How the object itself is obtained.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InstructionKind {
    /// Construct through a factory call.
    FactoryCall {
        target_type: String,
        factory: FactoryRef,
        arguments: Vec<Argument>,
    },
    /// Use an object already registered in the container.
    ServiceReference { id: String },
    /// Evaluate an expression to obtain the object.
    ExpressionRef { source: String },
    /// Not an object: a literal attribute map handed to the parent.
    PlainMap {
        attributes: IndexMap<String, ResolvedValue>,
    },
}

/// An argument of a factory or method call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Argument {
    Value(ResolvedValue),
    Instruction(Box<ConstructionInstruction>),
}

impl From<ResolvedValue> for Argument {
    fn from(value: ResolvedValue) -> Self {
        Self::Value(value)
    }
}

impl From<ConstructionInstruction> for Argument {
    fn from(instruction: ConstructionInstruction) -> Self {
        Self::Instruction(Box::new(instruction))
    }
}

/// A method invoked on the constructed object, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodCall {
    pub method: String,
    pub arguments: Vec<Argument>,
}

impl MethodCall {
    /// Attach `child` under `name`.
    ///
    /// References and expressions produce named objects on their own and get
    /// no name slot; every other child is passed as `(name, child)`.
    pub fn add_child(name: &str, child: ConstructionInstruction) -> Self {
        let arguments = match child.kind {
            InstructionKind::ServiceReference { .. } | InstructionKind::ExpressionRef { .. } => {
                vec![child.into()]
            }
            _ => vec![ResolvedValue::string(name).into(), child.into()],
        };

        Self {
            method: ADD_CHILD.to_string(),
            arguments,
        }
    }

    /// The child instruction passed to an `addChild` call.
    pub fn child(&self) -> Option<&ConstructionInstruction> {
        self.arguments.iter().rev().find_map(|arg| match arg {
            Argument::Instruction(child) => Some(child.as_ref()),
            Argument::Value(_) => None,
        })
    }

    /// The name passed to an `addChild` call, if it has a name slot.
    pub fn child_name(&self) -> Option<&str> {
        match self.arguments.as_slice() {
            [Argument::Value(name), Argument::Instruction(_)] => name.as_str(),
            _ => None,
        }
    }
}

/// Attributes of one tag entry (e.g. `{alias: "main"}`).
pub type TagAttributes = IndexMap<String, String>;

/// A description of how to build one object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructionInstruction {
    #[serde(flatten)]
    pub kind: InstructionKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub method_calls: Vec<MethodCall>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub tags: IndexMap<String, Vec<TagAttributes>>,
}

impl ConstructionInstruction {
    pub fn new(kind: InstructionKind) -> Self {
        Self {
            kind,
            method_calls: Vec::new(),
            tags: IndexMap::new(),
        }
    }

    pub fn factory_call(
        target_type: impl Into<String>,
        factory: FactoryRef,
        arguments: Vec<Argument>,
    ) -> Self {
        Self::new(InstructionKind::FactoryCall {
            target_type: target_type.into(),
            factory,
            arguments,
        })
    }

    pub fn service_reference(id: impl Into<String>) -> Self {
        Self::new(InstructionKind::ServiceReference { id: id.into() })
    }

    pub fn expression(source: impl Into<String>) -> Self {
        Self::new(InstructionKind::ExpressionRef {
            source: source.into(),
        })
    }

    pub fn plain_map(attributes: IndexMap<String, ResolvedValue>) -> Self {
        Self::new(InstructionKind::PlainMap { attributes })
    }

    pub fn add_method_call(&mut self, call: MethodCall) {
        self.method_calls.push(call);
    }

    /// Tag the instruction with `{tag: [{alias: <alias>}]}`.
    pub fn with_alias_tag(mut self, tag: &str, alias: &str) -> Self {
        let mut attributes = TagAttributes::new();
        attributes.insert("alias".to_string(), alias.to_string());
        self.tags.entry(tag.to_string()).or_default().push(attributes);
        self
    }

    /// The factory reference, if this is a factory call.
    pub fn factory(&self) -> Option<&FactoryRef> {
        match &self.kind {
            InstructionKind::FactoryCall { factory, .. } => Some(factory),
            _ => None,
        }
    }

    /// Child instructions attached through `addChild`, in order.
    pub fn children(&self) -> impl Iterator<Item = &ConstructionInstruction> {
        self.method_calls
            .iter()
            .filter(|call| call.method == ADD_CHILD)
            .filter_map(MethodCall::child)
    }
}

/// Ordered mapping from plan-entry key to instruction.
///
/// Owns all of its data; nothing refers back into the configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CompilationPlan {
    entries: IndexMap<String, ConstructionInstruction>,
}

impl CompilationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: String, instruction: ConstructionInstruction) {
        self.entries.insert(key, instruction);
    }

    pub fn get(&self, key: &str) -> Option<&ConstructionInstruction> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConstructionInstruction)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for CompilationPlan {
    type Item = (String, ConstructionInstruction);
    type IntoIter = indexmap::map::IntoIter<String, ConstructionInstruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
