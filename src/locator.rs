//! Interpretation of `source_code_info` paths against a file descriptor.
//!
//! A location path alternates field numbers and element indices, addressing
//! one node of the file descriptor tree. The locator walks a path and names
//! the declaration (or `declaration.child`) it addresses, so comments can be
//! re-attached to the emitted output.

use prost_types::{EnumDescriptorProto, FileDescriptorProto};

use crate::ident::flat_name;

pub struct FileDescriptorProtoPaths;

impl FileDescriptorProtoPaths {
    pub const MESSAGE_TYPE: i32 = 4;
    pub const ENUM_TYPE: i32 = 5;
    pub const SERVICE: i32 = 6;
}

pub struct DescriptorProtoPaths;

impl DescriptorProtoPaths {
    pub const FIELD: i32 = 2;
    pub const NESTED_TYPE: i32 = 3;
    pub const ENUM_TYPE: i32 = 4;
}

pub struct EnumDescriptorProtoPaths;

impl EnumDescriptorProtoPaths {
    pub const VALUE: i32 = 2;
}

pub struct ServiceDescriptorProtoPaths;

impl ServiceDescriptorProtoPaths {
    pub const METHOD: i32 = 2;
}

/// Cursor over one location path.
struct PathWalker<'a> {
    path: &'a [i32],
    pos: usize,
}

impl<'a> PathWalker<'a> {
    fn new(path: &'a [i32]) -> Self {
        PathWalker { path, pos: 0 }
    }

    fn done(&self) -> bool {
        self.pos == self.path.len()
    }

    /// Advances past the next element iff it equals `field`. Must not be
    /// called on a finished walker.
    fn accept(&mut self, field: i32) -> bool {
        assert!(!self.done(), "walker read past the end of {:?}", self.path);
        if self.path[self.pos] == field {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Reads and advances past the next element. Must not be called on a
    /// finished walker.
    fn next(&mut self) -> i32 {
        assert!(!self.done(), "walker read past the end of {:?}", self.path);
        let element = self.path[self.pos];
        self.pos += 1;
        element
    }
}

/// Resolves a location path to the flat name of the entity it addresses, or
/// `name.child` for a field, enum value or service method. Paths addressing
/// anything the output does not surface (options, oneof declarations,
/// unknown selectors, out-of-range indices) resolve to `None` and their
/// comments are dropped.
///
/// `path` must be of even length; callers filter `source_code_info`
/// accordingly before resolving.
pub fn resolve_path(file: &FileDescriptorProto, path: &[i32]) -> Option<String> {
    debug_assert!(path.len() % 2 == 0);

    let package = file.package();
    let mut walker = PathWalker::new(path);
    if walker.done() {
        return None;
    }
    let mut stack = Vec::new();

    if walker.accept(FileDescriptorProtoPaths::MESSAGE_TYPE) {
        let mut message = file.message_type.get(walker.next() as usize)?;
        stack.push(message.name());
        loop {
            if walker.done() {
                return Some(flat_name(package, &stack));
            }
            if walker.accept(DescriptorProtoPaths::FIELD) {
                let field = message.field.get(walker.next() as usize)?;
                return walker
                    .done()
                    .then(|| format!("{}.{}", flat_name(package, &stack), field.name()));
            } else if walker.accept(DescriptorProtoPaths::NESTED_TYPE) {
                message = message.nested_type.get(walker.next() as usize)?;
                stack.push(message.name());
            } else if walker.accept(DescriptorProtoPaths::ENUM_TYPE) {
                let nested_enum = message.enum_type.get(walker.next() as usize)?;
                stack.push(nested_enum.name());
                return resolve_enum_path(&mut walker, package, &stack, nested_enum);
            } else {
                return None;
            }
        }
    } else if walker.accept(FileDescriptorProtoPaths::ENUM_TYPE) {
        let top_enum = file.enum_type.get(walker.next() as usize)?;
        stack.push(top_enum.name());
        resolve_enum_path(&mut walker, package, &stack, top_enum)
    } else if walker.accept(FileDescriptorProtoPaths::SERVICE) {
        let service = file.service.get(walker.next() as usize)?;
        stack.push(service.name());
        if walker.done() {
            return Some(flat_name(package, &stack));
        }
        if walker.accept(ServiceDescriptorProtoPaths::METHOD) {
            let method = service.method.get(walker.next() as usize)?;
            return walker
                .done()
                .then(|| format!("{}.{}", flat_name(package, &stack), method.name()));
        }
        None
    } else {
        None
    }
}

fn resolve_enum_path(
    walker: &mut PathWalker,
    package: &str,
    stack: &[&str],
    desc: &EnumDescriptorProto,
) -> Option<String> {
    if walker.done() {
        return Some(flat_name(package, stack));
    }
    if walker.accept(EnumDescriptorProtoPaths::VALUE) {
        let value = desc.value.get(walker.next() as usize)?;
        return walker
            .done()
            .then(|| format!("{}.{}", flat_name(package, stack), value.name()));
    }
    None
}

#[cfg(test)]
mod tests {
    use prost_types::{
        DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
        MethodDescriptorProto, ServiceDescriptorProto,
    };

    use super::*;

    fn test_file() -> FileDescriptorProto {
        let inner = DescriptorProto {
            name: Some("Inner".to_owned()),
            field: vec![FieldDescriptorProto {
                name: Some("x".to_owned()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let kind = EnumDescriptorProto {
            name: Some("Kind".to_owned()),
            value: vec![EnumValueDescriptorProto {
                name: Some("A".to_owned()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let outer = DescriptorProto {
            name: Some("Outer".to_owned()),
            field: vec![FieldDescriptorProto {
                name: Some("num".to_owned()),
                ..Default::default()
            }],
            nested_type: vec![inner],
            enum_type: vec![kind],
            ..Default::default()
        };
        let color = EnumDescriptorProto {
            name: Some("Color".to_owned()),
            value: vec![EnumValueDescriptorProto {
                name: Some("RED".to_owned()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let pinger = ServiceDescriptorProto {
            name: Some("Pinger".to_owned()),
            method: vec![MethodDescriptorProto {
                name: Some("Ping".to_owned()),
                ..Default::default()
            }],
            ..Default::default()
        };
        FileDescriptorProto {
            name: Some("test.proto".to_owned()),
            package: Some("acme".to_owned()),
            message_type: vec![outer],
            enum_type: vec![color],
            service: vec![pinger],
            ..Default::default()
        }
    }

    fn resolve(path: &[i32]) -> Option<String> {
        resolve_path(&test_file(), path)
    }

    #[test]
    fn resolves_messages_and_fields() {
        assert_eq!(Some("Acme_Outer".to_owned()), resolve(&[4, 0]));
        assert_eq!(Some("Acme_Outer.num".to_owned()), resolve(&[4, 0, 2, 0]));
        assert_eq!(Some("Acme_Outer_Inner".to_owned()), resolve(&[4, 0, 3, 0]));
        assert_eq!(
            Some("Acme_Outer_Inner.x".to_owned()),
            resolve(&[4, 0, 3, 0, 2, 0]),
        );
    }

    #[test]
    fn resolves_enums_and_values() {
        assert_eq!(Some("Acme_Color".to_owned()), resolve(&[5, 0]));
        assert_eq!(Some("Acme_Color.RED".to_owned()), resolve(&[5, 0, 2, 0]));
        assert_eq!(Some("Acme_Outer_Kind".to_owned()), resolve(&[4, 0, 4, 0]));
        assert_eq!(
            Some("Acme_Outer_Kind.A".to_owned()),
            resolve(&[4, 0, 4, 0, 2, 0]),
        );
    }

    #[test]
    fn resolves_services_and_methods() {
        assert_eq!(Some("Acme_Pinger".to_owned()), resolve(&[6, 0]));
        assert_eq!(Some("Acme_Pinger.Ping".to_owned()), resolve(&[6, 0, 2, 0]));
    }

    #[test]
    fn unrecognized_selectors_resolve_to_none() {
        // empty, syntax, oneof declarations, message options, method options
        assert_eq!(None, resolve(&[]));
        assert_eq!(None, resolve(&[12, 0]));
        assert_eq!(None, resolve(&[4, 0, 8, 0]));
        assert_eq!(None, resolve(&[4, 0, 7, 0]));
        assert_eq!(None, resolve(&[6, 0, 4, 0]));
    }

    #[test]
    fn deeper_paths_than_surfaced_resolve_to_none() {
        assert_eq!(None, resolve(&[4, 0, 2, 0, 1, 0]));
        assert_eq!(None, resolve(&[5, 0, 2, 0, 1, 0]));
        assert_eq!(None, resolve(&[6, 0, 2, 0, 1, 0]));
    }

    #[test]
    fn out_of_range_indices_resolve_to_none() {
        assert_eq!(None, resolve(&[4, 7]));
        assert_eq!(None, resolve(&[4, 0, 2, 7]));
        assert_eq!(None, resolve(&[6, 0, 2, 7]));
    }
}
