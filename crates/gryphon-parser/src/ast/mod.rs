//! Abstract syntax tree for documents matching the GraphQL grammar.
//!
//! The top-level type is [`Document`]. Serializing any node through
//! [`std::fmt::Display`] produces text that re-parses to a structurally
//! equal tree.
//!
//! ## Ownership and mutability
//!
//! AST types are thread-safe: they implement [`Send`] and [`Sync`].
//!
//! [`Node`] (a [`triomphe::Arc`] carrying an optional source span) is used
//! for shared ownership. The tree is immutable once parsed; to modify a value
//! behind a [`Node`], use [`Node::make_mut`] for copy-on-write semantics.

use crate::Node;
use ordered_float::OrderedFloat;

mod impls;
mod serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Document>();
    assert_sync::<Document>();
};

/// An identifier
pub type Name = String;

/// Refers to the name of a GraphQL type defined elsewhere
pub type NamedType = Name;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Definition {
    OperationDefinition(Node<OperationDefinition>),
    FragmentDefinition(Node<FragmentDefinition>),
    DirectiveDefinition(Node<DirectiveDefinition>),
    SchemaDefinition(Node<SchemaDefinition>),
    ScalarTypeDefinition(Node<ScalarTypeDefinition>),
    ObjectTypeDefinition(Node<ObjectTypeDefinition>),
    InterfaceTypeDefinition(Node<InterfaceTypeDefinition>),
    UnionTypeDefinition(Node<UnionTypeDefinition>),
    EnumTypeDefinition(Node<EnumTypeDefinition>),
    InputObjectTypeDefinition(Node<InputObjectTypeDefinition>),
    SchemaExtension(Node<SchemaExtension>),
    ScalarTypeExtension(Node<ScalarTypeExtension>),
    ObjectTypeExtension(Node<ObjectTypeExtension>),
    InterfaceTypeExtension(Node<InterfaceTypeExtension>),
    UnionTypeExtension(Node<UnionTypeExtension>),
    EnumTypeExtension(Node<EnumTypeExtension>),
    InputObjectTypeExtension(Node<InputObjectTypeExtension>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OperationDefinition {
    pub operation_type: OperationType,
    pub name: Option<Name>,
    pub variables: Vec<Node<VariableDefinition>>,
    pub directives: Vec<Node<Directive>>,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FragmentDefinition {
    pub name: Name,
    pub type_condition: NamedType,
    /// Non-standard: only populated when the parser was configured with
    /// `experimental_fragment_variables`.
    pub variables: Vec<Node<VariableDefinition>>,
    pub directives: Vec<Node<Directive>>,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DirectiveDefinition {
    pub description: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Node<InputValueDefinition>>,
    pub repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SchemaDefinition {
    pub description: Option<String>,
    pub directives: Vec<Node<Directive>>,
    pub root_operations: Vec<(OperationType, NamedType)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScalarTypeDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub directives: Vec<Node<Directive>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectTypeDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub implements_interfaces: Vec<NamedType>,
    pub directives: Vec<Node<Directive>>,
    pub fields: Vec<Node<FieldDefinition>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InterfaceTypeDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub implements_interfaces: Vec<NamedType>,
    pub directives: Vec<Node<Directive>>,
    pub fields: Vec<Node<FieldDefinition>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnionTypeDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub directives: Vec<Node<Directive>>,
    pub members: Vec<NamedType>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumTypeDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub directives: Vec<Node<Directive>>,
    pub values: Vec<Node<EnumValueDefinition>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InputObjectTypeDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub directives: Vec<Node<Directive>>,
    pub fields: Vec<Node<InputValueDefinition>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SchemaExtension {
    pub directives: Vec<Node<Directive>>,
    pub root_operations: Vec<(OperationType, NamedType)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScalarTypeExtension {
    pub name: Name,
    pub directives: Vec<Node<Directive>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectTypeExtension {
    pub name: Name,
    pub implements_interfaces: Vec<NamedType>,
    pub directives: Vec<Node<Directive>>,
    pub fields: Vec<Node<FieldDefinition>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InterfaceTypeExtension {
    pub name: Name,
    pub implements_interfaces: Vec<NamedType>,
    pub directives: Vec<Node<Directive>>,
    pub fields: Vec<Node<FieldDefinition>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnionTypeExtension {
    pub name: Name,
    pub directives: Vec<Node<Directive>>,
    pub members: Vec<NamedType>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumTypeExtension {
    pub name: Name,
    pub directives: Vec<Node<Directive>>,
    pub values: Vec<Node<EnumValueDefinition>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InputObjectTypeExtension {
    pub name: Name,
    pub directives: Vec<Node<Directive>>,
    pub fields: Vec<Node<InputValueDefinition>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Directive {
    pub name: Name,
    pub arguments: Vec<Node<Argument>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Argument {
    pub name: Name,
    pub value: Node<Value>,
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VariableDefinition {
    pub name: Name,
    pub ty: Node<Type>,
    pub default_value: Option<Node<Value>>,
    pub directives: Vec<Node<Directive>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Named(NamedType),
    NonNullNamed(NamedType),
    List(Box<Type>),
    NonNullList(Box<Type>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub arguments: Vec<Node<InputValueDefinition>>,
    pub ty: Type,
    pub directives: Vec<Node<Directive>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InputValueDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub ty: Node<Type>,
    pub default_value: Option<Node<Value>>,
    pub directives: Vec<Node<Directive>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumValueDefinition {
    pub description: Option<String>,
    pub value: Name,
    pub directives: Vec<Node<Directive>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selection {
    Field(Node<Field>),
    FragmentSpread(Node<FragmentSpread>),
    InlineFragment(Node<InlineFragment>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Node<Argument>>,
    pub directives: Vec<Node<Directive>>,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FragmentSpread {
    pub fragment_name: Name,
    pub directives: Vec<Node<Directive>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InlineFragment {
    pub type_condition: Option<NamedType>,
    pub directives: Vec<Node<Directive>>,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Enum(Name),
    Variable(Name),
    String(
        /// The value after escape sequences are resolved
        String,
    ),
    Float(OrderedFloat<f64>),
    Int(i32),
    /// Integer syntax (without a decimal point) but overflows `i32`.
    /// Valid in contexts where the expected GraphQL type is Float.
    BigInt(
        /// Must only contain ASCII decimal digits
        String,
    ),
    Boolean(bool),
    List(Vec<Node<Value>>),
    Object(Vec<(Name, Node<Value>)>),
}
