//! Inherent method implementations for AST types

use super::*;

macro_rules! directive_methods {
    () => {
        /// Returns an iterator of directives with the given name.
        ///
        /// This method is best for repeatable directives. For non-repeatable directives,
        /// see [`directive_by_name`][Self::directive_by_name] (singular)
        pub fn directives_by_name<'def: 'name, 'name>(
            &'def self,
            name: &'name str,
        ) -> impl Iterator<Item = &'def Node<Directive>> + 'name {
            self.directives.iter().filter(move |dir| dir.name == name)
        }

        /// Returns the first directive with the given name, if any.
        ///
        /// This method is best for non-repeatable directives. For repeatable directives,
        /// see [`directives_by_name`][Self::directives_by_name] (plural)
        pub fn directive_by_name(&self, name: &str) -> Option<&Node<Directive>> {
            self.directives_by_name(name).next()
        }
    };
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator of the document's operation definitions.
    pub fn operations(&self) -> impl Iterator<Item = &Node<OperationDefinition>> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::OperationDefinition(operation) => Some(operation),
            _ => None,
        })
    }

    /// Returns an iterator of the document's fragment definitions.
    pub fn fragments(&self) -> impl Iterator<Item = &Node<FragmentDefinition>> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::FragmentDefinition(fragment) => Some(fragment),
            _ => None,
        })
    }
}

impl Definition {
    /// Returns the name of this definition, if any.
    ///
    /// Operation definitions may be anonymous; schema definitions and
    /// extensions never have a name.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Definition::OperationDefinition(def) => def.name.as_ref(),
            Definition::FragmentDefinition(def) => Some(&def.name),
            Definition::DirectiveDefinition(def) => Some(&def.name),
            Definition::SchemaDefinition(_) | Definition::SchemaExtension(_) => None,
            Definition::ScalarTypeDefinition(def) => Some(&def.name),
            Definition::ObjectTypeDefinition(def) => Some(&def.name),
            Definition::InterfaceTypeDefinition(def) => Some(&def.name),
            Definition::UnionTypeDefinition(def) => Some(&def.name),
            Definition::EnumTypeDefinition(def) => Some(&def.name),
            Definition::InputObjectTypeDefinition(def) => Some(&def.name),
            Definition::ScalarTypeExtension(def) => Some(&def.name),
            Definition::ObjectTypeExtension(def) => Some(&def.name),
            Definition::InterfaceTypeExtension(def) => Some(&def.name),
            Definition::UnionTypeExtension(def) => Some(&def.name),
            Definition::EnumTypeExtension(def) => Some(&def.name),
            Definition::InputObjectTypeExtension(def) => Some(&def.name),
        }
    }

    /// Whether this is an executable definition (operation or fragment).
    pub fn is_executable(&self) -> bool {
        matches!(
            self,
            Definition::OperationDefinition(_) | Definition::FragmentDefinition(_)
        )
    }

    /// Whether this is an extension of another definition.
    pub fn is_extension(&self) -> bool {
        matches!(
            self,
            Definition::SchemaExtension(_)
                | Definition::ScalarTypeExtension(_)
                | Definition::ObjectTypeExtension(_)
                | Definition::InterfaceTypeExtension(_)
                | Definition::UnionTypeExtension(_)
                | Definition::EnumTypeExtension(_)
                | Definition::InputObjectTypeExtension(_)
        )
    }
}

impl OperationDefinition {
    directive_methods!();
}

impl FragmentDefinition {
    directive_methods!();
}

impl SchemaDefinition {
    directive_methods!();
}

impl ScalarTypeDefinition {
    directive_methods!();
}

impl ObjectTypeDefinition {
    directive_methods!();
}

impl InterfaceTypeDefinition {
    directive_methods!();
}

impl UnionTypeDefinition {
    directive_methods!();
}

impl EnumTypeDefinition {
    directive_methods!();
}

impl InputObjectTypeDefinition {
    directive_methods!();
}

impl SchemaExtension {
    directive_methods!();
}

impl ScalarTypeExtension {
    directive_methods!();
}

impl ObjectTypeExtension {
    directive_methods!();
}

impl InterfaceTypeExtension {
    directive_methods!();
}

impl UnionTypeExtension {
    directive_methods!();
}

impl EnumTypeExtension {
    directive_methods!();
}

impl InputObjectTypeExtension {
    directive_methods!();
}

impl Directive {
    pub fn argument_by_name(&self, name: &str) -> Option<&Node<Value>> {
        self.arguments
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }
}

impl OperationType {
    /// Get the name of this operation type as it would appear in GraphQL source code.
    pub fn name(self) -> &'static str {
        match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "query" => Some(OperationType::Query),
            "mutation" => Some(OperationType::Mutation),
            "subscription" => Some(OperationType::Subscription),
            _ => None,
        }
    }
}

impl DirectiveLocation {
    /// Get the name of this directive location as it would appear in GraphQL source code.
    pub fn name(self) -> &'static str {
        match self {
            DirectiveLocation::Query => "QUERY",
            DirectiveLocation::Mutation => "MUTATION",
            DirectiveLocation::Subscription => "SUBSCRIPTION",
            DirectiveLocation::Field => "FIELD",
            DirectiveLocation::FragmentDefinition => "FRAGMENT_DEFINITION",
            DirectiveLocation::FragmentSpread => "FRAGMENT_SPREAD",
            DirectiveLocation::InlineFragment => "INLINE_FRAGMENT",
            DirectiveLocation::VariableDefinition => "VARIABLE_DEFINITION",
            DirectiveLocation::Schema => "SCHEMA",
            DirectiveLocation::Scalar => "SCALAR",
            DirectiveLocation::Object => "OBJECT",
            DirectiveLocation::FieldDefinition => "FIELD_DEFINITION",
            DirectiveLocation::ArgumentDefinition => "ARGUMENT_DEFINITION",
            DirectiveLocation::Interface => "INTERFACE",
            DirectiveLocation::Union => "UNION",
            DirectiveLocation::Enum => "ENUM",
            DirectiveLocation::EnumValue => "ENUM_VALUE",
            DirectiveLocation::InputObject => "INPUT_OBJECT",
            DirectiveLocation::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "QUERY" => Some(DirectiveLocation::Query),
            "MUTATION" => Some(DirectiveLocation::Mutation),
            "SUBSCRIPTION" => Some(DirectiveLocation::Subscription),
            "FIELD" => Some(DirectiveLocation::Field),
            "FRAGMENT_DEFINITION" => Some(DirectiveLocation::FragmentDefinition),
            "FRAGMENT_SPREAD" => Some(DirectiveLocation::FragmentSpread),
            "INLINE_FRAGMENT" => Some(DirectiveLocation::InlineFragment),
            "VARIABLE_DEFINITION" => Some(DirectiveLocation::VariableDefinition),
            "SCHEMA" => Some(DirectiveLocation::Schema),
            "SCALAR" => Some(DirectiveLocation::Scalar),
            "OBJECT" => Some(DirectiveLocation::Object),
            "FIELD_DEFINITION" => Some(DirectiveLocation::FieldDefinition),
            "ARGUMENT_DEFINITION" => Some(DirectiveLocation::ArgumentDefinition),
            "INTERFACE" => Some(DirectiveLocation::Interface),
            "UNION" => Some(DirectiveLocation::Union),
            "ENUM" => Some(DirectiveLocation::Enum),
            "ENUM_VALUE" => Some(DirectiveLocation::EnumValue),
            "INPUT_OBJECT" => Some(DirectiveLocation::InputObject),
            "INPUT_FIELD_DEFINITION" => Some(DirectiveLocation::InputFieldDefinition),
            _ => None,
        }
    }
}

impl From<OperationType> for DirectiveLocation {
    fn from(ty: OperationType) -> Self {
        match ty {
            OperationType::Query => DirectiveLocation::Query,
            OperationType::Mutation => DirectiveLocation::Mutation,
            OperationType::Subscription => DirectiveLocation::Subscription,
        }
    }
}

impl VariableDefinition {
    directive_methods!();
}

impl Type {
    /// Returns a new `Type::Named`, with string type conversion including from `&str`.
    pub fn new_named(name: impl Into<Name>) -> Self {
        Type::Named(name.into())
    }

    /// Returns this type made non-null, if it isn't already.
    pub fn non_null(self) -> Self {
        match self {
            Type::Named(name) => Type::NonNullNamed(name),
            Type::List(inner) => Type::NonNullList(inner),
            Type::NonNullNamed(_) => self,
            Type::NonNullList(_) => self,
        }
    }

    /// Returns a list type whose items are this type.
    pub fn list(self) -> Self {
        Type::List(Box::new(self))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNullNamed(_) | Type::NonNullList(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Type::List(_) | Type::NonNullList(_))
    }

    /// Returns the type inside a list type, or a non-null wrapper, if any.
    pub fn item_type(&self) -> &Type {
        match self {
            Type::Named(_) | Type::NonNullNamed(_) => self,
            Type::List(inner) | Type::NonNullList(inner) => inner,
        }
    }

    /// Returns the inner named type, after unwrapping any non-null or list markers.
    pub fn inner_named_type(&self) -> &NamedType {
        match self {
            Type::Named(name) | Type::NonNullNamed(name) => name,
            Type::List(inner) | Type::NonNullList(inner) => inner.inner_named_type(),
        }
    }
}

impl FieldDefinition {
    directive_methods!();

    pub fn argument_by_name(&self, name: &str) -> Option<&Node<InputValueDefinition>> {
        self.arguments.iter().find(|argument| argument.name == name)
    }
}

impl InputValueDefinition {
    directive_methods!();

    /// Whether a value for this input must be provided:
    /// its type is non-null and it has no default value.
    pub fn is_required(&self) -> bool {
        self.ty.is_non_null() && self.default_value.is_none()
    }
}

impl EnumValueDefinition {
    directive_methods!();
}

impl Selection {
    pub fn as_field(&self) -> Option<&Node<Field>> {
        if let Selection::Field(field) = self {
            Some(field)
        } else {
            None
        }
    }
}

impl Field {
    directive_methods!();

    /// The response key for this field: its alias if there is one,
    /// its name otherwise.
    pub fn response_key(&self) -> &Name {
        self.alias.as_ref().unwrap_or(&self.name)
    }

    pub fn argument_by_name(&self, name: &str) -> Option<&Node<Value>> {
        self.arguments
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }
}

impl FragmentSpread {
    directive_methods!();
}

impl InlineFragment {
    directive_methods!();
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_enum(&self) -> Option<&Name> {
        if let Value::Enum(name) = self {
            Some(name)
        } else {
            None
        }
    }

    pub fn as_variable(&self) -> Option<&Name> {
        if let Value::Variable(name) = self {
            Some(name)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(value) = self {
            Some(value)
        } else {
            None
        }
    }

    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(value.into_inner()),
            Value::Int(value) => Some(f64::from(*value)),
            Value::BigInt(value) => {
                let parsed = value.parse::<f64>().ok()?;
                parsed.is_finite().then_some(parsed)
            }
            _ => None,
        }
    }

    pub fn to_i32(&self) -> Option<i32> {
        if let Value::Int(value) = *self {
            Some(value)
        } else {
            None
        }
    }

    pub fn to_bool(&self) -> Option<bool> {
        if let Value::Boolean(value) = *self {
            Some(value)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&[Node<Value>]> {
        if let Value::List(value) = self {
            Some(value)
        } else {
            None
        }
    }

    pub fn as_object(&self) -> Option<&[(Name, Node<Value>)]> {
        if let Value::Object(value) = self {
            Some(value)
        } else {
            None
        }
    }
}
