//! GraphQL serialization of AST nodes through [`std::fmt::Display`].
//!
//! Output is deterministic: two spaces of indentation, one definition per
//! top-level block, fields one per line. Re-parsing the output yields a tree
//! structurally equal to the original (spans aside).

use super::*;
use std::fmt;
use std::fmt::Display;

struct State<'a, 'b> {
    indent_level: usize,
    output: &'a mut fmt::Formatter<'b>,
}

impl State<'_, '_> {
    fn write(&mut self, str: &str) -> fmt::Result {
        self.output.write_str(str)
    }

    fn new_line(&mut self) -> fmt::Result {
        self.write("\n")?;
        for _ in 0..self.indent_level {
            self.write("  ")?;
        }
        Ok(())
    }

    fn open_brace(&mut self) -> fmt::Result {
        self.write(" {")?;
        self.indent_level += 1;
        Ok(())
    }

    fn close_brace(&mut self) -> fmt::Result {
        self.indent_level -= 1;
        self.new_line()?;
        self.write("}")
    }
}

fn document(state: &mut State<'_, '_>, document: &Document) -> fmt::Result {
    for (index, definition) in document.definitions.iter().enumerate() {
        if index > 0 {
            state.write("\n")?;
            state.new_line()?;
        }
        self::definition(state, definition)?;
    }
    Ok(())
}

fn definition(state: &mut State<'_, '_>, definition: &Definition) -> fmt::Result {
    match definition {
        Definition::OperationDefinition(def) => operation_definition(state, def),
        Definition::FragmentDefinition(def) => fragment_definition(state, def),
        Definition::DirectiveDefinition(def) => directive_definition(state, def),
        Definition::SchemaDefinition(def) => schema_definition(state, def),
        Definition::ScalarTypeDefinition(def) => scalar_type_definition(state, def),
        Definition::ObjectTypeDefinition(def) => object_type_definition(state, def),
        Definition::InterfaceTypeDefinition(def) => interface_type_definition(state, def),
        Definition::UnionTypeDefinition(def) => union_type_definition(state, def),
        Definition::EnumTypeDefinition(def) => enum_type_definition(state, def),
        Definition::InputObjectTypeDefinition(def) => input_object_type_definition(state, def),
        Definition::SchemaExtension(def) => schema_extension(state, def),
        Definition::ScalarTypeExtension(def) => scalar_type_extension(state, def),
        Definition::ObjectTypeExtension(def) => object_type_extension(state, def),
        Definition::InterfaceTypeExtension(def) => interface_type_extension(state, def),
        Definition::UnionTypeExtension(def) => union_type_extension(state, def),
        Definition::EnumTypeExtension(def) => enum_type_extension(state, def),
        Definition::InputObjectTypeExtension(def) => input_object_type_extension(state, def),
    }
}

fn operation_definition(state: &mut State<'_, '_>, def: &OperationDefinition) -> fmt::Result {
    // A query with no name, variables or directives serializes in shorthand.
    let shorthand = def.operation_type == OperationType::Query
        && def.name.is_none()
        && def.variables.is_empty()
        && def.directives.is_empty();
    if !shorthand {
        state.write(def.operation_type.name())?;
        if let Some(name) = &def.name {
            state.write(" ")?;
            state.write(name)?;
        }
        variable_definitions(state, &def.variables)?;
        directives(state, &def.directives)?;
        state.write(" ")?;
    }
    selection_set_block(state, &def.selection_set)
}

fn fragment_definition(state: &mut State<'_, '_>, def: &FragmentDefinition) -> fmt::Result {
    state.write("fragment ")?;
    state.write(&def.name)?;
    variable_definitions(state, &def.variables)?;
    state.write(" on ")?;
    state.write(&def.type_condition)?;
    directives(state, &def.directives)?;
    state.write(" ")?;
    selection_set_block(state, &def.selection_set)
}

fn directive_definition(state: &mut State<'_, '_>, def: &DirectiveDefinition) -> fmt::Result {
    description(state, &def.description)?;
    state.write("directive @")?;
    state.write(&def.name)?;
    input_value_definitions(state, &def.arguments)?;
    if def.repeatable {
        state.write(" repeatable")?;
    }
    state.write(" on ")?;
    for (index, location) in def.locations.iter().enumerate() {
        if index > 0 {
            state.write(" | ")?;
        }
        state.write(location.name())?;
    }
    Ok(())
}

fn schema_definition(state: &mut State<'_, '_>, def: &SchemaDefinition) -> fmt::Result {
    description(state, &def.description)?;
    state.write("schema")?;
    directives(state, &def.directives)?;
    root_operations(state, &def.root_operations)
}

fn schema_extension(state: &mut State<'_, '_>, def: &SchemaExtension) -> fmt::Result {
    state.write("extend schema")?;
    directives(state, &def.directives)?;
    if !def.root_operations.is_empty() {
        root_operations(state, &def.root_operations)?;
    }
    Ok(())
}

fn root_operations(
    state: &mut State<'_, '_>,
    root_operations: &[(OperationType, NamedType)],
) -> fmt::Result {
    state.open_brace()?;
    for (operation_type, name) in root_operations {
        state.new_line()?;
        state.write(operation_type.name())?;
        state.write(": ")?;
        state.write(name)?;
    }
    state.close_brace()
}

fn scalar_type_definition(state: &mut State<'_, '_>, def: &ScalarTypeDefinition) -> fmt::Result {
    description(state, &def.description)?;
    state.write("scalar ")?;
    state.write(&def.name)?;
    directives(state, &def.directives)
}

fn scalar_type_extension(state: &mut State<'_, '_>, def: &ScalarTypeExtension) -> fmt::Result {
    state.write("extend scalar ")?;
    state.write(&def.name)?;
    directives(state, &def.directives)
}

fn object_type_definition(state: &mut State<'_, '_>, def: &ObjectTypeDefinition) -> fmt::Result {
    description(state, &def.description)?;
    state.write("type ")?;
    state.write(&def.name)?;
    implements_interfaces(state, &def.implements_interfaces)?;
    directives(state, &def.directives)?;
    field_definitions(state, &def.fields)
}

fn object_type_extension(state: &mut State<'_, '_>, def: &ObjectTypeExtension) -> fmt::Result {
    state.write("extend type ")?;
    state.write(&def.name)?;
    implements_interfaces(state, &def.implements_interfaces)?;
    directives(state, &def.directives)?;
    if !def.fields.is_empty() {
        field_definitions(state, &def.fields)?;
    }
    Ok(())
}

fn interface_type_definition(
    state: &mut State<'_, '_>,
    def: &InterfaceTypeDefinition,
) -> fmt::Result {
    description(state, &def.description)?;
    state.write("interface ")?;
    state.write(&def.name)?;
    implements_interfaces(state, &def.implements_interfaces)?;
    directives(state, &def.directives)?;
    field_definitions(state, &def.fields)
}

fn interface_type_extension(
    state: &mut State<'_, '_>,
    def: &InterfaceTypeExtension,
) -> fmt::Result {
    state.write("extend interface ")?;
    state.write(&def.name)?;
    implements_interfaces(state, &def.implements_interfaces)?;
    directives(state, &def.directives)?;
    if !def.fields.is_empty() {
        field_definitions(state, &def.fields)?;
    }
    Ok(())
}

fn union_type_definition(state: &mut State<'_, '_>, def: &UnionTypeDefinition) -> fmt::Result {
    description(state, &def.description)?;
    state.write("union ")?;
    state.write(&def.name)?;
    directives(state, &def.directives)?;
    union_members(state, &def.members)
}

fn union_type_extension(state: &mut State<'_, '_>, def: &UnionTypeExtension) -> fmt::Result {
    state.write("extend union ")?;
    state.write(&def.name)?;
    directives(state, &def.directives)?;
    union_members(state, &def.members)
}

fn union_members(state: &mut State<'_, '_>, members: &[NamedType]) -> fmt::Result {
    for (index, member) in members.iter().enumerate() {
        state.write(if index == 0 { " = " } else { " | " })?;
        state.write(member)?;
    }
    Ok(())
}

fn enum_type_definition(state: &mut State<'_, '_>, def: &EnumTypeDefinition) -> fmt::Result {
    description(state, &def.description)?;
    state.write("enum ")?;
    state.write(&def.name)?;
    directives(state, &def.directives)?;
    enum_values(state, &def.values)
}

fn enum_type_extension(state: &mut State<'_, '_>, def: &EnumTypeExtension) -> fmt::Result {
    state.write("extend enum ")?;
    state.write(&def.name)?;
    directives(state, &def.directives)?;
    enum_values(state, &def.values)
}

fn enum_values(state: &mut State<'_, '_>, values: &[Node<EnumValueDefinition>]) -> fmt::Result {
    state.open_brace()?;
    for value in values {
        state.new_line()?;
        description(state, &value.description)?;
        state.write(&value.value)?;
        directives(state, &value.directives)?;
    }
    state.close_brace()
}

fn input_object_type_definition(
    state: &mut State<'_, '_>,
    def: &InputObjectTypeDefinition,
) -> fmt::Result {
    description(state, &def.description)?;
    state.write("input ")?;
    state.write(&def.name)?;
    directives(state, &def.directives)?;
    state.open_brace()?;
    for field in &def.fields {
        state.new_line()?;
        input_value_definition(state, field)?;
    }
    state.close_brace()
}

fn input_object_type_extension(
    state: &mut State<'_, '_>,
    def: &InputObjectTypeExtension,
) -> fmt::Result {
    state.write("extend input ")?;
    state.write(&def.name)?;
    directives(state, &def.directives)?;
    if !def.fields.is_empty() {
        state.open_brace()?;
        for field in &def.fields {
            state.new_line()?;
            input_value_definition(state, field)?;
        }
        state.close_brace()?;
    }
    Ok(())
}

fn implements_interfaces(state: &mut State<'_, '_>, interfaces: &[NamedType]) -> fmt::Result {
    for (index, interface) in interfaces.iter().enumerate() {
        state.write(if index == 0 { " implements " } else { " & " })?;
        state.write(interface)?;
    }
    Ok(())
}

fn field_definitions(
    state: &mut State<'_, '_>,
    fields: &[Node<FieldDefinition>],
) -> fmt::Result {
    state.open_brace()?;
    for field in fields {
        state.new_line()?;
        description(state, &field.description)?;
        state.write(&field.name)?;
        input_value_definitions(state, &field.arguments)?;
        state.write(": ")?;
        ty(state, &field.ty)?;
        directives(state, &field.directives)?;
    }
    state.close_brace()
}

fn input_value_definitions(
    state: &mut State<'_, '_>,
    arguments: &[Node<InputValueDefinition>],
) -> fmt::Result {
    if arguments.is_empty() {
        return Ok(());
    }
    state.write("(")?;
    for (index, argument) in arguments.iter().enumerate() {
        if index > 0 {
            state.write(", ")?;
        }
        input_value_definition(state, argument)?;
    }
    state.write(")")
}

fn input_value_definition(
    state: &mut State<'_, '_>,
    def: &InputValueDefinition,
) -> fmt::Result {
    description(state, &def.description)?;
    state.write(&def.name)?;
    state.write(": ")?;
    ty(state, &def.ty)?;
    if let Some(default) = &def.default_value {
        state.write(" = ")?;
        value(state, default)?;
    }
    directives(state, &def.directives)
}

fn variable_definitions(
    state: &mut State<'_, '_>,
    variables: &[Node<VariableDefinition>],
) -> fmt::Result {
    if variables.is_empty() {
        return Ok(());
    }
    state.write("(")?;
    for (index, variable) in variables.iter().enumerate() {
        if index > 0 {
            state.write(", ")?;
        }
        state.write("$")?;
        state.write(&variable.name)?;
        state.write(": ")?;
        ty(state, &variable.ty)?;
        if let Some(default) = &variable.default_value {
            state.write(" = ")?;
            value(state, default)?;
        }
        directives(state, &variable.directives)?;
    }
    state.write(")")
}

fn selection_set_block(state: &mut State<'_, '_>, selections: &[Selection]) -> fmt::Result {
    state.write("{")?;
    state.indent_level += 1;
    for selection in selections {
        state.new_line()?;
        self::selection(state, selection)?;
    }
    state.close_brace()
}

fn selection(state: &mut State<'_, '_>, selection: &Selection) -> fmt::Result {
    match selection {
        Selection::Field(field) => {
            if let Some(alias) = &field.alias {
                state.write(alias)?;
                state.write(": ")?;
            }
            state.write(&field.name)?;
            arguments(state, &field.arguments)?;
            directives(state, &field.directives)?;
            if !field.selection_set.is_empty() {
                state.write(" ")?;
                selection_set_block(state, &field.selection_set)?;
            }
            Ok(())
        }
        Selection::FragmentSpread(spread) => {
            state.write("...")?;
            state.write(&spread.fragment_name)?;
            directives(state, &spread.directives)
        }
        Selection::InlineFragment(inline) => {
            state.write("...")?;
            if let Some(type_condition) = &inline.type_condition {
                state.write(" on ")?;
                state.write(type_condition)?;
            }
            directives(state, &inline.directives)?;
            state.write(" ")?;
            selection_set_block(state, &inline.selection_set)
        }
    }
}

fn directives(state: &mut State<'_, '_>, directives: &[Node<Directive>]) -> fmt::Result {
    for directive in directives {
        state.write(" @")?;
        state.write(&directive.name)?;
        arguments(state, &directive.arguments)?;
    }
    Ok(())
}

fn arguments(state: &mut State<'_, '_>, arguments: &[Node<Argument>]) -> fmt::Result {
    if arguments.is_empty() {
        return Ok(());
    }
    state.write("(")?;
    for (index, argument) in arguments.iter().enumerate() {
        if index > 0 {
            state.write(", ")?;
        }
        state.write(&argument.name)?;
        state.write(": ")?;
        value(state, &argument.value)?;
    }
    state.write(")")
}

fn value(state: &mut State<'_, '_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => state.write("null"),
        Value::Boolean(true) => state.write("true"),
        Value::Boolean(false) => state.write("false"),
        Value::Enum(name) | Value::BigInt(name) => state.write(name),
        Value::Variable(name) => {
            state.write("$")?;
            state.write(name)
        }
        Value::String(text) => serialize_string(state, text),
        Value::Int(int) => state.write(&int.to_string()),
        Value::Float(float) => {
            let mut text = float.to_string();
            // Keep Float syntax distinguishable from Int syntax.
            if !text.contains(['.', 'e', 'E']) {
                text.push_str(".0");
            }
            state.write(&text)
        }
        Value::List(items) => {
            state.write("[")?;
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    state.write(", ")?;
                }
                self::value(state, item)?;
            }
            state.write("]")
        }
        Value::Object(fields) => {
            state.write("{")?;
            for (index, (name, item)) in fields.iter().enumerate() {
                if index > 0 {
                    state.write(", ")?;
                }
                state.write(name)?;
                state.write(": ")?;
                self::value(state, item)?;
            }
            state.write("}")
        }
    }
}

fn ty(state: &mut State<'_, '_>, ty: &Type) -> fmt::Result {
    match ty {
        Type::Named(name) => state.write(name),
        Type::NonNullNamed(name) => {
            state.write(name)?;
            state.write("!")
        }
        Type::List(inner) => {
            state.write("[")?;
            self::ty(state, inner)?;
            state.write("]")
        }
        Type::NonNullList(inner) => {
            state.write("[")?;
            self::ty(state, inner)?;
            state.write("]!")
        }
    }
}

fn description(state: &mut State<'_, '_>, description: &Option<String>) -> fmt::Result {
    if let Some(description) = description {
        serialize_string(state, description)?;
        state.new_line()?;
    }
    Ok(())
}

fn serialize_string(state: &mut State<'_, '_>, text: &str) -> fmt::Result {
    state.write("\"")?;
    for c in text.chars() {
        match c {
            '"' => state.write("\\\"")?,
            '\\' => state.write("\\\\")?,
            '\u{0008}' => state.write("\\b")?,
            '\u{000C}' => state.write("\\f")?,
            '\n' => state.write("\\n")?,
            '\r' => state.write("\\r")?,
            '\t' => state.write("\\t")?,
            c if c.is_control() => {
                fmt::Display::fmt(&format_args!("\\u{:04X}", c as u32), state.output)?
            }
            c => fmt::Display::fmt(&c, state.output)?,
        }
    }
    state.write("\"")
}

macro_rules! impl_display {
    ($($ty: ty => $function: path,)+) => {
        $(
            impl Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let mut state = State {
                        indent_level: 0,
                        output: f,
                    };
                    $function(&mut state, self)
                }
            }
        )+
    };
}

impl_display! {
    Document => document,
    Definition => definition,
    OperationDefinition => operation_definition,
    FragmentDefinition => fragment_definition,
    DirectiveDefinition => directive_definition,
    SchemaDefinition => schema_definition,
    ScalarTypeDefinition => scalar_type_definition,
    ObjectTypeDefinition => object_type_definition,
    InterfaceTypeDefinition => interface_type_definition,
    UnionTypeDefinition => union_type_definition,
    EnumTypeDefinition => enum_type_definition,
    InputObjectTypeDefinition => input_object_type_definition,
    SchemaExtension => schema_extension,
    ScalarTypeExtension => scalar_type_extension,
    ObjectTypeExtension => object_type_extension,
    InterfaceTypeExtension => interface_type_extension,
    UnionTypeExtension => union_type_extension,
    EnumTypeExtension => enum_type_extension,
    InputObjectTypeExtension => input_object_type_extension,
    Selection => selection,
    Value => value,
    Type => ty,
}

impl Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use crate::ast::Document;
    use crate::Parser;
    use expect_test::expect;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Document {
        Parser::new(source).parse_document().unwrap()
    }

    #[test]
    fn executable_document_snapshot() {
        let document = parse(
            "query Pets($species: String = \"dog\") { \
             pets(species: $species) @include(if: true) { \
             name ...PetFields ... on Dog { goodBoy } } }",
        );
        let expected = expect![[r#"
            query Pets($species: String = "dog") {
              pets(species: $species) @include(if: true) {
                name
                ...PetFields
                ... on Dog {
                  goodBoy
                }
              }
            }"#]];
        expected.assert_eq(&document.to_string());
    }

    #[test]
    fn round_trip_is_stable() {
        let sources = [
            "{ a b: c(d: [1, 2.5, null]) }",
            "mutation M($v: [Int!]! = [0]) { run(arg: $v) @log }",
            "fragment F on T @skip(if: false) { ...G ... { x } }",
            "\"A pet\"\ntype Pet implements Named @tag(name: \"animal\") {\n\
             name: String!\nfriends(limit: Int = 10): [Pet!]\n}",
            "schema { query: Q }\nextend enum E @x { A B }\n\
             directive @d(a: In = {b: RED}) repeatable on SCHEMA | ENUM_VALUE",
        ];
        for source in sources {
            let document = parse(source);
            let printed = document.to_string();
            let reparsed = parse(&printed);
            assert_eq!(document, reparsed, "unstable for {source:?}");
            assert_eq!(printed, reparsed.to_string());
        }
    }
}
