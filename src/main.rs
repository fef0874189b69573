use std::io::{Error, ErrorKind, Read, Result, Write};

use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;

fn main() {
    env_logger::init();

    if let Err(error) = fallible_main() {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}

fn fallible_main() -> Result<()> {
    let mut buf = Vec::new();
    std::io::stdin().read_to_end(&mut buf)?;

    let request = CodeGeneratorRequest::decode(buf.as_slice()).map_err(|error| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("invalid CodeGeneratorRequest: {}", error),
        )
    })?;
    let response = protoc_gen_twirp_ts::compile_request(request);

    buf.clear();
    response.encode(&mut buf).map_err(|error| {
        Error::new(
            ErrorKind::InvalidData,
            format!("invalid CodeGeneratorResponse: {}", error),
        )
    })?;
    std::io::stdout().write_all(&buf)?;

    Ok(())
}
