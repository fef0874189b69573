//! Generation of one TypeScript source file from one file descriptor.

use log::debug;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    ServiceDescriptorProto,
};

use crate::ident::{flat_name, flat_name_of_type_name, lower_first, package_prefix};
use crate::locator::resolve_path;
use crate::registry::Registry;

/// Generates the TypeScript source for one input file.
///
/// Generation is three linear phases over the same descriptor: resolve the
/// file's source locations to declaration names, register every message and
/// enum in pre-order, then emit declarations in registration order followed
/// by one client class per service.
pub struct CodeGenerator {
    package: String,
    registry: Registry,
    buf: String,
}

impl CodeGenerator {
    pub fn generate(file: FileDescriptorProto) -> String {
        debug!("file: {:?}, package: {:?}", file.name(), file.package());

        let mut code_gen = CodeGenerator {
            package: file.package().to_owned(),
            registry: Registry::default(),
            buf: String::new(),
        };

        if let Some(source_info) = &file.source_code_info {
            for location in &source_info.location {
                // A lone field number addresses a repeated field as a whole
                // and an odd tail addresses a span inside an element; neither
                // names anything the output surfaces.
                let len = location.path.len();
                if len == 0 || len % 2 != 0 {
                    continue;
                }
                if let Some(name) = resolve_path(&file, &location.path) {
                    code_gen.registry.record_location(name, location);
                }
            }
        }

        for message in &file.message_type {
            code_gen.register_message(&[], message);
        }
        for desc in &file.enum_type {
            debug!("  enum: {:?}", desc.name());
            code_gen
                .registry
                .register_enum(&code_gen.package, &[], desc);
        }

        code_gen.buf.push_str("// tslint:disable\n\n");

        for name in code_gen.registry.names().to_vec() {
            if let Some(message) = code_gen.registry.message(&name).cloned() {
                code_gen.append_message(&name, &message);
            } else if let Some(desc) = code_gen.registry.enum_type(&name).cloned() {
                code_gen.append_enum(&name, &desc);
            }
        }

        for service in &file.service {
            code_gen.append_service(service);
        }
        code_gen.buf.push('\n');

        code_gen.buf
    }

    fn register_message(&mut self, parents: &[String], message: &DescriptorProto) {
        debug!("  message: {:?}", message.name());
        self.registry
            .register_message(&self.package, parents, message);

        let mut chain = parents.to_vec();
        chain.push(message.name().to_owned());
        for nested in &message.nested_type {
            self.register_message(&chain, nested);
        }
        for desc in &message.enum_type {
            debug!("  enum: {:?}", desc.name());
            self.registry.register_enum(&self.package, &chain, desc);
        }
    }

    fn append_message(&mut self, name: &str, message: &DescriptorProto) {
        // Map entries surface only as inline map types in field positions.
        if is_map_entry(message) {
            return;
        }

        self.append_leading_comment(name, 0);
        self.buf.push_str("export interface ");
        self.buf.push_str(name);
        self.buf.push_str(" {\n");
        for field in &message.field {
            let ty = self.field_type(field);
            debug!("    field: {:?}, type: {:?}", field.name(), ty);

            let child = format!("{}.{}", name, field.name());
            self.append_leading_comment(&child, 1);
            self.push_indent(1);
            self.buf.push_str(field.json_name());
            self.buf.push_str("?: ");
            self.buf.push_str(&ty);
            self.buf.push(';');
            self.append_trailing_comment(&child);
        }
        self.buf.push_str("};\n\n");
    }

    fn append_enum(&mut self, name: &str, desc: &EnumDescriptorProto) {
        self.append_leading_comment(name, 0);
        self.buf.push_str("export enum ");
        self.buf.push_str(name);
        self.buf.push_str(" {\n");
        for value in &desc.value {
            let child = format!("{}.{}", name, value.name());
            self.append_leading_comment(&child, 1);
            self.push_indent(1);
            self.buf.push_str(value.name());
            self.buf.push_str(" = \"");
            self.buf.push_str(value.name());
            self.buf.push_str("\",");
            self.append_trailing_comment(&child);
        }
        self.buf.push_str("}\n");
    }

    fn append_service(&mut self, service: &ServiceDescriptorProto) {
        debug!("  service: {:?}", service.name());

        let service_name = flat_name(&self.package, &[service.name()]);
        self.append_leading_comment(&service_name, 0);
        self.buf.push_str("export class ");
        self.buf.push_str(service.name());
        self.buf.push_str(&package_prefix(&self.package));
        self.buf.push_str(" {\n");
        self.buf.push_str("  baseUrl: string;\n");
        self.buf.push_str("  f: typeof fetch;\n");
        self.buf.push_str("  constructor(baseUrl: string, f: typeof fetch) {\n");
        self.buf.push_str("    this.baseUrl = baseUrl;\n");
        self.buf.push_str("    this.f = f;\n");
        self.buf.push_str("  }\n");

        let route_prefix = if self.package.is_empty() {
            service.name().to_owned()
        } else {
            format!("{}.{}", self.package, service.name())
        };
        for method in &service.method {
            debug!("    method: {:?}", method.name());

            let child = format!("{}.{}", service_name, method.name());
            self.append_leading_comment(&child, 1);
            self.push_indent(1);
            self.buf.push_str(&lower_first(method.name()));
            self.buf.push_str("(req: ");
            self.buf
                .push_str(&flat_name_of_type_name(method.input_type()));
            self.buf.push_str("): Promise<");
            self.buf
                .push_str(&flat_name_of_type_name(method.output_type()));
            self.buf.push_str("> {\n");
            self.buf.push_str(&format!(
                "    return this.f(this.baseUrl + \"/twirp/{}/{}\", {{\n",
                route_prefix,
                method.name(),
            ));
            self.buf.push_str("      method: \"POST\",\n");
            self.buf
                .push_str("      headers: {\"Content-Type\": \"application/json\"},\n");
            self.buf.push_str("      body: JSON.stringify(req),\n");
            self.buf.push_str("    }).then((res) => {\n");
            self.buf.push_str("      if (res.ok) {\n");
            self.buf.push_str("        return res.json();\n");
            self.buf.push_str("      }\n");
            self.buf.push_str("      throw res;\n");
            self.buf.push_str("    });\n");
            self.buf.push_str("  }\n");
        }
        self.buf.push_str("}\n");
    }

    /// Projects a field to its TypeScript type expression, including the map
    /// and repeated shapes.
    fn field_type(&self, field: &FieldDescriptorProto) -> String {
        if field.r#type() == Type::Message {
            let entry_name = flat_name_of_type_name(field.type_name());
            if let Some(entry) = self.registry.message(&entry_name) {
                if is_map_entry(entry) {
                    let key = &entry.field[0];
                    let value = &entry.field[1];
                    assert_eq!("key", key.name());
                    assert_eq!("value", value.name());
                    return format!("{{[key: {}]: {}}}", ts_type(key), ts_type(value));
                }
            }
        }

        let ty = ts_type(field);
        if field.label == Some(Label::Repeated as i32) {
            format!("{}[]", ty)
        } else {
            ty
        }
    }

    fn append_leading_comment(&mut self, name: &str, depth: usize) {
        if let Some(location) = self.registry.location(name) {
            let block = comment_block(location.leading_comments(), depth);
            self.buf.push_str(&block);
        }
    }

    /// Finishes the current line, suffixing the trailing comment if the
    /// entity has one.
    fn append_trailing_comment(&mut self, name: &str) {
        let trailing = self
            .registry
            .location(name)
            .map(|location| location.trailing_comments())
            .filter(|comments| !comments.is_empty());
        match trailing {
            Some(comments) => {
                let block = comment_block(comments, 0);
                self.buf.push_str("  ");
                self.buf.push_str(&block);
            }
            None => self.buf.push('\n'),
        }
    }

    fn push_indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.buf.push_str("  ");
        }
    }
}

fn is_map_entry(message: &DescriptorProto) -> bool {
    message
        .options
        .as_ref()
        .and_then(|options| options.map_entry)
        .unwrap_or(false)
}

/// Projects a field's kind to a bare TypeScript type name. All 64-bit
/// integer kinds surface as `string`: the JSON encoding carries them as
/// decimal strings so they survive IEEE-754 number precision. Bytes are
/// base64 strings on the wire.
fn ts_type(field: &FieldDescriptorProto) -> String {
    match field.r#type() {
        Type::Float
        | Type::Double
        | Type::Int32
        | Type::Uint32
        | Type::Sint32
        | Type::Fixed32
        | Type::Sfixed32 => String::from("number"),
        Type::Int64 | Type::Uint64 | Type::Sint64 | Type::Fixed64 | Type::Sfixed64 => {
            String::from("string")
        }
        Type::Bool => String::from("boolean"),
        Type::String | Type::Bytes => String::from("string"),
        Type::Enum => flat_name_of_type_name(field.type_name()),
        Type::Message => match well_known_type(field.type_name()) {
            Some(ty) => ty.to_owned(),
            None => flat_name_of_type_name(field.type_name()),
        },
        Type::Group => panic!("unsupported field kind: {:?}", field.r#type()),
    }
}

/// Hard-coded projections for the well-known types the JSON transport has
/// special shapes for.
fn well_known_type(type_name: &str) -> Option<&'static str> {
    Some(match type_name {
        ".google.protobuf.Timestamp" => "Date",
        ".google.protobuf.Struct" => "{}",
        ".google.protobuf.FieldMask" => "{paths: string[]}",
        ".google.protobuf.DoubleValue"
        | ".google.protobuf.FloatValue"
        | ".google.protobuf.Int32Value"
        | ".google.protobuf.UInt32Value" => "number | null",
        ".google.protobuf.Int64Value"
        | ".google.protobuf.UInt64Value"
        | ".google.protobuf.StringValue"
        | ".google.protobuf.BytesValue" => "string | null",
        ".google.protobuf.BoolValue" => "boolean | null",
        _ => return None,
    })
}

/// Prefixes every line of `comments` with `//` at `depth` levels of two-space
/// indentation. Empty input produces no lines.
fn comment_block(comments: &str, depth: usize) -> String {
    let mut block = String::new();
    for line in comments.trim_end_matches('\n').lines() {
        for _ in 0..depth {
            block.push_str("  ");
        }
        block.push_str("//");
        block.push_str(line);
        block.push('\n');
    }
    block
}
