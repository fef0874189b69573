//! Per-file index of generated declarations.

use std::collections::HashMap;

use prost_types::source_code_info::Location;
use prost_types::{DescriptorProto, EnumDescriptorProto};

use crate::ident::flat_name;

/// Records every message and enum of one input file under its flat
/// declaration name, in registration order, together with the source
/// locations resolved for those declarations and their children.
///
/// A registry lives for exactly one generator run: populated while walking
/// the file's type trees and source info, consulted read-only during
/// emission.
#[derive(Default)]
pub struct Registry {
    messages: HashMap<String, DescriptorProto>,
    enums: HashMap<String, EnumDescriptorProto>,
    packages: HashMap<String, String>,
    locations: HashMap<String, Location>,
    names: Vec<String>,
}

impl Registry {
    /// Registers a message nested under `parents`. Returns the flat name the
    /// declaration will be emitted under.
    pub fn register_message(
        &mut self,
        package: &str,
        parents: &[String],
        message: &DescriptorProto,
    ) -> String {
        let name = self.register(package, parents, message.name());
        self.messages.insert(name.clone(), message.clone());
        name
    }

    /// Registers an enum nested under `parents`. Returns the flat name the
    /// declaration will be emitted under.
    pub fn register_enum(
        &mut self,
        package: &str,
        parents: &[String],
        desc: &EnumDescriptorProto,
    ) -> String {
        let name = self.register(package, parents, desc.name());
        self.enums.insert(name.clone(), desc.clone());
        name
    }

    fn register(&mut self, package: &str, parents: &[String], short_name: &str) -> String {
        let mut path = parents.to_vec();
        path.push(short_name.to_owned());
        let name = flat_name(package, &path);
        if self.messages.contains_key(&name) || self.enums.contains_key(&name) {
            panic!("flat type name collision: {}", name);
        }
        self.packages.insert(name.clone(), package.to_owned());
        self.names.push(name.clone());
        name
    }

    /// Attaches a source location to a declaration or one of its children.
    /// Re-recording a key with a different location is a contradiction in the
    /// input and aborts.
    pub fn record_location(&mut self, name: String, location: &Location) {
        if let Some(existing) = self.locations.get(&name) {
            if existing != location {
                panic!("conflicting source locations for {}", name);
            }
            return;
        }
        self.locations.insert(name, location.clone());
    }

    pub fn message(&self, name: &str) -> Option<&DescriptorProto> {
        self.messages.get(name)
    }

    pub fn enum_type(&self, name: &str) -> Option<&EnumDescriptorProto> {
        self.enums.get(name)
    }

    pub fn package(&self, name: &str) -> Option<&str> {
        self.packages.get(name).map(String::as_str)
    }

    pub fn location(&self, name: &str) -> Option<&Location> {
        self.locations.get(name)
    }

    /// Flat names in registration order, which is also emission order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
