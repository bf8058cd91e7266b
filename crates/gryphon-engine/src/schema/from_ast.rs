//! Conversion from a parsed type system document to a [`Schema`].
//!
//! The conversion runs in two phases so that mutually-recursive types work
//! without forward declarations: all named definitions are collected into
//! the registry first, then extensions are folded in. Field types refer to
//! other types by name only, resolved through the registry at execution
//! time.

use crate::schema::EnumType;
use crate::schema::ExtendedType;
use crate::schema::InputObjectType;
use crate::schema::InterfaceType;
use crate::schema::ObjectType;
use crate::schema::ScalarType;
use crate::schema::Schema;
use crate::schema::UnionType;
use crate::schema::BUILT_IN_SCALARS;
use gryphon_parser::ast;
use gryphon_parser::ast::Name;
use gryphon_parser::Node;

/// A structural problem in a type system document.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("executable definitions are not allowed in a type system document")]
    ExecutableDefinition,

    #[error(r#"the type "{name}" is defined multiple times"#)]
    TypeCollision { name: Name },

    #[error(r#"the directive "@{name}" is defined multiple times"#)]
    DirectiveCollision { name: Name },

    #[error("duplicate {operation} root operation type")]
    DuplicateRootOperation { operation: &'static str },

    #[error(r#"cannot extend undefined type "{name}""#)]
    UndefinedTypeExtension { name: Name },

    #[error(r#"the extension of "{name}" does not match the kind of type it was defined as"#)]
    TypeExtensionKindMismatch { name: Name },
}

pub(crate) fn document_to_schema(document: &ast::Document) -> Result<Schema, BuildError> {
    let mut schema = Schema::default();
    for name in BUILT_IN_SCALARS {
        schema.types.insert(
            name.to_owned(),
            ExtendedType::Scalar(Node::new(ScalarType {
                description: None,
                name: name.to_owned(),
                directives: Vec::new(),
            })),
        );
    }

    let mut has_schema_definition = false;
    for definition in &document.definitions {
        match definition {
            ast::Definition::OperationDefinition(_) | ast::Definition::FragmentDefinition(_) => {
                return Err(BuildError::ExecutableDefinition)
            }
            ast::Definition::DirectiveDefinition(def) => {
                if schema
                    .directive_definitions
                    .insert(def.name.clone(), def.clone())
                    .is_some()
                {
                    return Err(BuildError::DirectiveCollision {
                        name: def.name.clone(),
                    });
                }
            }
            ast::Definition::SchemaDefinition(def) => {
                has_schema_definition = true;
                schema.description.clone_from(&def.description);
                for (operation_type, type_name) in &def.root_operations {
                    set_root_operation(&mut schema, *operation_type, type_name.clone())?;
                }
            }
            ast::Definition::ScalarTypeDefinition(def) => {
                let ty = ExtendedType::Scalar(Node::new(ScalarType {
                    description: def.description.clone(),
                    name: def.name.clone(),
                    directives: def.directives.clone(),
                }));
                insert_type(&mut schema, def.name.clone(), ty)?;
            }
            ast::Definition::ObjectTypeDefinition(def) => {
                let ty = ExtendedType::Object(Node::new(ObjectType {
                    description: def.description.clone(),
                    name: def.name.clone(),
                    implements_interfaces: def.implements_interfaces.iter().cloned().collect(),
                    directives: def.directives.clone(),
                    fields: field_map(&def.fields),
                }));
                insert_type(&mut schema, def.name.clone(), ty)?;
            }
            ast::Definition::InterfaceTypeDefinition(def) => {
                let ty = ExtendedType::Interface(Node::new(InterfaceType {
                    description: def.description.clone(),
                    name: def.name.clone(),
                    implements_interfaces: def.implements_interfaces.iter().cloned().collect(),
                    directives: def.directives.clone(),
                    fields: field_map(&def.fields),
                }));
                insert_type(&mut schema, def.name.clone(), ty)?;
            }
            ast::Definition::UnionTypeDefinition(def) => {
                let ty = ExtendedType::Union(Node::new(UnionType {
                    description: def.description.clone(),
                    name: def.name.clone(),
                    directives: def.directives.clone(),
                    members: def.members.iter().cloned().collect(),
                }));
                insert_type(&mut schema, def.name.clone(), ty)?;
            }
            ast::Definition::EnumTypeDefinition(def) => {
                let ty = ExtendedType::Enum(Node::new(EnumType {
                    description: def.description.clone(),
                    name: def.name.clone(),
                    directives: def.directives.clone(),
                    values: def
                        .values
                        .iter()
                        .map(|value| (value.value.clone(), value.clone()))
                        .collect(),
                }));
                insert_type(&mut schema, def.name.clone(), ty)?;
            }
            ast::Definition::InputObjectTypeDefinition(def) => {
                let ty = ExtendedType::InputObject(Node::new(InputObjectType {
                    description: def.description.clone(),
                    name: def.name.clone(),
                    directives: def.directives.clone(),
                    fields: def
                        .fields
                        .iter()
                        .map(|field| (field.name.clone(), field.clone()))
                        .collect(),
                }));
                insert_type(&mut schema, def.name.clone(), ty)?;
            }
            // Extensions are folded in a second pass, once every
            // definition is in the registry.
            _ => {}
        }
    }

    for definition in &document.definitions {
        match definition {
            ast::Definition::SchemaExtension(ext) => {
                for (operation_type, type_name) in &ext.root_operations {
                    set_root_operation(&mut schema, *operation_type, type_name.clone())?;
                }
            }
            ast::Definition::ScalarTypeExtension(ext) => {
                match lookup_extended(&mut schema, &ext.name)? {
                    ExtendedType::Scalar(def) => {
                        def.make_mut().directives.extend(ext.directives.iter().cloned());
                    }
                    _ => return Err(kind_mismatch(&ext.name)),
                }
            }
            ast::Definition::ObjectTypeExtension(ext) => {
                match lookup_extended(&mut schema, &ext.name)? {
                    ExtendedType::Object(def) => {
                        let def = def.make_mut();
                        def.implements_interfaces
                            .extend(ext.implements_interfaces.iter().cloned());
                        def.directives.extend(ext.directives.iter().cloned());
                        def.fields.extend(field_map(&ext.fields));
                    }
                    _ => return Err(kind_mismatch(&ext.name)),
                }
            }
            ast::Definition::InterfaceTypeExtension(ext) => {
                match lookup_extended(&mut schema, &ext.name)? {
                    ExtendedType::Interface(def) => {
                        let def = def.make_mut();
                        def.implements_interfaces
                            .extend(ext.implements_interfaces.iter().cloned());
                        def.directives.extend(ext.directives.iter().cloned());
                        def.fields.extend(field_map(&ext.fields));
                    }
                    _ => return Err(kind_mismatch(&ext.name)),
                }
            }
            ast::Definition::UnionTypeExtension(ext) => {
                match lookup_extended(&mut schema, &ext.name)? {
                    ExtendedType::Union(def) => {
                        let def = def.make_mut();
                        def.directives.extend(ext.directives.iter().cloned());
                        def.members.extend(ext.members.iter().cloned());
                    }
                    _ => return Err(kind_mismatch(&ext.name)),
                }
            }
            ast::Definition::EnumTypeExtension(ext) => {
                match lookup_extended(&mut schema, &ext.name)? {
                    ExtendedType::Enum(def) => {
                        let def = def.make_mut();
                        def.directives.extend(ext.directives.iter().cloned());
                        def.values.extend(
                            ext.values
                                .iter()
                                .map(|value| (value.value.clone(), value.clone())),
                        );
                    }
                    _ => return Err(kind_mismatch(&ext.name)),
                }
            }
            ast::Definition::InputObjectTypeExtension(ext) => {
                match lookup_extended(&mut schema, &ext.name)? {
                    ExtendedType::InputObject(def) => {
                        let def = def.make_mut();
                        def.directives.extend(ext.directives.iter().cloned());
                        def.fields.extend(
                            ext.fields
                                .iter()
                                .map(|field| (field.name.clone(), field.clone())),
                        );
                    }
                    _ => return Err(kind_mismatch(&ext.name)),
                }
            }
            _ => {}
        }
    }

    if !has_schema_definition {
        // https://spec.graphql.org/October2021/#sec-Root-Operation-Types.Default-Root-Operation-Type-Names
        for (operation_type, name) in [
            (ast::OperationType::Query, "Query"),
            (ast::OperationType::Mutation, "Mutation"),
            (ast::OperationType::Subscription, "Subscription"),
        ] {
            if schema.get_object(name).is_some() {
                set_root_operation(&mut schema, operation_type, name.to_owned())?;
            }
        }
    }

    Ok(schema)
}

fn field_map(
    fields: &[Node<ast::FieldDefinition>],
) -> indexmap::IndexMap<Name, Node<ast::FieldDefinition>> {
    fields
        .iter()
        .map(|field| (field.name.clone(), field.clone()))
        .collect()
}

fn insert_type(schema: &mut Schema, name: Name, ty: ExtendedType) -> Result<(), BuildError> {
    if schema.types.insert(name.clone(), ty).is_some() {
        Err(BuildError::TypeCollision { name })
    } else {
        Ok(())
    }
}

fn set_root_operation(
    schema: &mut Schema,
    operation_type: ast::OperationType,
    type_name: Name,
) -> Result<(), BuildError> {
    let root = match operation_type {
        ast::OperationType::Query => &mut schema.query_type,
        ast::OperationType::Mutation => &mut schema.mutation_type,
        ast::OperationType::Subscription => &mut schema.subscription_type,
    };
    if root.is_some() {
        Err(BuildError::DuplicateRootOperation {
            operation: operation_type.name(),
        })
    } else {
        *root = Some(type_name);
        Ok(())
    }
}

fn lookup_extended<'schema>(
    schema: &'schema mut Schema,
    name: &Name,
) -> Result<&'schema mut ExtendedType, BuildError> {
    schema
        .types
        .get_mut(name)
        .ok_or_else(|| BuildError::UndefinedTypeExtension { name: name.clone() })
}

fn kind_mismatch(name: &Name) -> BuildError {
    BuildError::TypeExtensionKindMismatch { name: name.clone() }
}

#[cfg(test)]
mod test {
    use crate::schema::BuildError;
    use crate::schema::Schema;

    #[test]
    fn default_root_operation_types() {
        let schema = Schema::parse(
            "type Query { hello: String }\n\
             type Mutation { setHello(value: String): String }",
        )
        .unwrap();
        assert_eq!(schema.query_type.as_deref(), Some("Query"));
        assert_eq!(schema.mutation_type.as_deref(), Some("Mutation"));
        assert_eq!(schema.subscription_type, None);
    }

    #[test]
    fn explicit_schema_definition_overrides_defaults() {
        let schema = Schema::parse(
            "schema { query: TheQuery }\n\
             type TheQuery { hello: String }",
        )
        .unwrap();
        assert_eq!(schema.query_type.as_deref(), Some("TheQuery"));
        assert_eq!(schema.mutation_type, None);
    }

    #[test]
    fn extensions_fold_into_definitions() {
        let schema = Schema::parse(
            "type Query { hello: String }\n\
             extend type Query { goodbye: String }\n\
             interface Named { name: String }\n\
             extend type Query implements Named { name: String }",
        )
        .unwrap();
        let query = schema.get_object("Query").unwrap();
        assert_eq!(
            query.fields.keys().collect::<Vec<_>>(),
            ["hello", "goodbye", "name"]
        );
        assert!(schema.is_subtype("Named", "Query"));
    }

    #[test]
    fn mutually_recursive_types() {
        let schema = Schema::parse(
            "type Query { posts: [Post] }\n\
             type Post { comments: [Comment] }\n\
             type Comment { post: Post }",
        )
        .unwrap();
        let field = schema.type_field("Comment", "post").unwrap();
        assert_eq!(field.ty.inner_named_type(), "Post");
    }

    #[test]
    fn duplicate_type_definition_is_rejected() {
        let error = Schema::parse("type Thing { a: Int }\ntype Thing { b: Int }").unwrap_err();
        assert!(matches!(
            error,
            crate::schema::SchemaError::Build(BuildError::TypeCollision { .. })
        ));
    }

    #[test]
    fn union_and_interface_membership() {
        let schema = Schema::parse(
            "type Query { any: SearchResult }\n\
             union SearchResult = Photo | Person\n\
             type Photo { url: String }\n\
             type Person { name: String }",
        )
        .unwrap();
        assert!(schema.is_subtype("SearchResult", "Photo"));
        assert!(!schema.is_subtype("SearchResult", "Query"));
    }
}
