//! High-level representation of a GraphQL type system document,
//! as consumed by execution.
//!
//! Compared to an [`ast::Document`] this representation is indexed:
//! types and fields live in maps keyed by name, extensions are folded into
//! the type they extend, and the root operation types are resolved.
//!
//! Schema *validation* is a separate concern and is not performed here;
//! the builder only does the structural mapping execution needs.

use gryphon_parser::ast;
use gryphon_parser::ast::Name;
use gryphon_parser::ast::NamedType;
use gryphon_parser::Node;
use gryphon_parser::SyntaxError;
use indexmap::IndexMap;
use indexmap::IndexSet;

mod from_ast;

pub use self::from_ast::BuildError;

/// Scalar types defined by the GraphQL specification itself.
pub const BUILT_IN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    pub description: Option<String>,

    pub directive_definitions: IndexMap<Name, Node<ast::DirectiveDefinition>>,

    /// All type definitions, including the built-in scalars.
    pub types: IndexMap<NamedType, ExtendedType>,

    pub query_type: Option<NamedType>,
    pub mutation_type: Option<NamedType>,
    pub subscription_type: Option<NamedType>,
}

/// The definition of a named type, with all its extensions folded in.
#[derive(Clone, Debug, PartialEq)]
pub enum ExtendedType {
    Scalar(Node<ScalarType>),
    Object(Node<ObjectType>),
    Interface(Node<InterfaceType>),
    Union(Node<UnionType>),
    Enum(Node<EnumType>),
    InputObject(Node<InputObjectType>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScalarType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: Vec<Node<ast::Directive>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectType {
    pub description: Option<String>,
    pub name: Name,
    pub implements_interfaces: IndexSet<NamedType>,
    pub directives: Vec<Node<ast::Directive>>,

    /// Explicit field definitions, in source order.
    ///
    /// Meta-fields like `__typename` are not stored here,
    /// they are resolved implicitly by the engine.
    pub fields: IndexMap<Name, Node<ast::FieldDefinition>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceType {
    pub description: Option<String>,
    pub name: Name,
    pub implements_interfaces: IndexSet<NamedType>,
    pub directives: Vec<Node<ast::Directive>>,
    pub fields: IndexMap<Name, Node<ast::FieldDefinition>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnionType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: Vec<Node<ast::Directive>>,
    pub members: IndexSet<NamedType>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: Vec<Node<ast::Directive>>,
    pub values: IndexMap<Name, Node<ast::EnumValueDefinition>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputObjectType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: Vec<Node<ast::Directive>>,
    pub fields: IndexMap<Name, Node<ast::InputValueDefinition>>,
}

/// Could not build a [`Schema`] from a type system document.
#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl Schema {
    /// Parse a schema definition language (SDL) document and build a schema
    /// from it.
    pub fn parse(source: &str) -> Result<Self, SchemaError> {
        let document = gryphon_parser::Parser::new(source).parse_document()?;
        Ok(Self::from_document(&document)?)
    }

    /// Build a schema from an already-parsed type system document.
    pub fn from_document(document: &ast::Document) -> Result<Self, BuildError> {
        from_ast::document_to_schema(document)
    }

    /// The name of the root operation type for the given kind of operation,
    /// if the schema supports it.
    pub fn root_operation(&self, operation_type: ast::OperationType) -> Option<&NamedType> {
        match operation_type {
            ast::OperationType::Query => &self.query_type,
            ast::OperationType::Mutation => &self.mutation_type,
            ast::OperationType::Subscription => &self.subscription_type,
        }
        .as_ref()
    }

    pub fn get_object(&self, name: &str) -> Option<&Node<ObjectType>> {
        if let Some(ExtendedType::Object(def)) = self.types.get(name) {
            Some(def)
        } else {
            None
        }
    }

    pub fn get_interface(&self, name: &str) -> Option<&Node<InterfaceType>> {
        if let Some(ExtendedType::Interface(def)) = self.types.get(name) {
            Some(def)
        } else {
            None
        }
    }

    pub fn get_union(&self, name: &str) -> Option<&Node<UnionType>> {
        if let Some(ExtendedType::Union(def)) = self.types.get(name) {
            Some(def)
        } else {
            None
        }
    }

    pub fn get_enum(&self, name: &str) -> Option<&Node<EnumType>> {
        if let Some(ExtendedType::Enum(def)) = self.types.get(name) {
            Some(def)
        } else {
            None
        }
    }

    pub fn get_input_object(&self, name: &str) -> Option<&Node<InputObjectType>> {
        if let Some(ExtendedType::InputObject(def)) = self.types.get(name) {
            Some(def)
        } else {
            None
        }
    }

    /// The definition of a field of a composite type.
    pub fn type_field(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> Option<&Node<ast::FieldDefinition>> {
        match self.types.get(type_name)? {
            ExtendedType::Object(def) => def.fields.get(field_name),
            ExtendedType::Interface(def) => def.fields.get(field_name),
            _ => None,
        }
    }

    /// Returns whether `maybe_subtype` is a member of the given abstract
    /// type: an object (or interface) implementing `abstract_type` if it is
    /// an interface, or one of its members if it is a union.
    pub fn is_subtype(&self, abstract_type: &str, maybe_subtype: &str) -> bool {
        self.types.get(abstract_type).is_some_and(|ty| match ty {
            ExtendedType::Interface(_) => {
                self.types
                    .get(maybe_subtype)
                    .is_some_and(|sub| match sub {
                        ExtendedType::Object(def) => {
                            def.implements_interfaces.contains(abstract_type)
                        }
                        ExtendedType::Interface(def) => {
                            def.implements_interfaces.contains(abstract_type)
                        }
                        _ => false,
                    })
            }
            ExtendedType::Union(def) => def.members.contains(maybe_subtype),
            _ => false,
        })
    }
}

impl ExtendedType {
    pub fn name(&self) -> &Name {
        match self {
            Self::Scalar(def) => &def.name,
            Self::Object(def) => &def.name,
            Self::Interface(def) => &def.name,
            Self::Union(def) => &def.name,
            Self::Enum(def) => &def.name,
            Self::InputObject(def) => &def.name,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Object(_) | Self::Interface(_) | Self::Union(_)
        )
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }

    /// Returns whether values of this type can be serialized directly,
    /// without a sub-selection: scalars and enums.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_))
    }

    /// Returns whether this is one of the scalar types defined by the
    /// GraphQL specification itself.
    pub fn is_built_in(&self) -> bool {
        matches!(self, Self::Scalar(def) if BUILT_IN_SCALARS.contains(&def.name.as_str()))
    }
}
