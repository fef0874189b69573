//! `protoc-gen-twirp-ts` generates TypeScript clients for Twirp services.
//!
//! The crate is the body of a `protoc` plugin. [`compile_request`] consumes a
//! decoded `CodeGeneratorRequest` and produces one generated TypeScript file
//! per input file: a flat `interface` per message, a string `enum` per
//! enumeration, and a client class per service whose methods POST JSON to
//! the service's Twirp routes.

mod code_generator;
mod ident;
mod locator;
mod registry;

use log::debug;
use prost_types::compiler::{code_generator_response, CodeGeneratorRequest, CodeGeneratorResponse};

pub use code_generator::CodeGenerator;

/// Generates a response file for every input file outside the well-known
/// `google/protobuf` tree. Files are processed independently, in request
/// order.
pub fn compile_request(request: CodeGeneratorRequest) -> CodeGeneratorResponse {
    debug!("parameter: {:?}", request.parameter());

    let mut response = CodeGeneratorResponse::default();
    for file in request.proto_file {
        if file.name().starts_with("google/protobuf") {
            continue;
        }
        let content = CodeGenerator::generate(file);
        response.file.push(code_generator_response::File {
            name: Some("out.ts".to_owned()),
            content: Some(content),
            ..Default::default()
        });
    }
    response
}
