// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Compiles `proto/todo.proto` into the client and server stubs used by
//! both the gRPC backend and the gRPC transport.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Prefer a protoc from the environment, fall back to the vendored one.
    if std::env::var_os("PROTOC").is_none() {
        if let Ok(path) = protoc_bin_vendored::protoc_bin_path() {
            std::env::set_var("PROTOC", path);
        }
    }

    println!("cargo:rerun-if-changed=proto/todo.proto");
    tonic_build::compile_protos("proto/todo.proto")?;
    Ok(())
}
