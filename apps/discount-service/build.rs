//! Build script for compiling Protocol Buffer definitions.
//!
//! Compiles the discount and health protos into Rust code using tonic-build.
//! The generated code is placed in `$OUT_DIR` and included via `tonic::include_proto!`.
//! The encoded descriptor set feeds the reflection service.

use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    println!("cargo:rerun-if-changed=../../proto/discount_code.proto");
    println!("cargo:rerun-if-changed=../../proto/health.proto");
    println!("cargo:rerun-if-changed=../../proto");

    // Server for the binary, client for the end-to-end tests
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .file_descriptor_set_path(out_dir.join("discount_descriptor.bin"))
        .compile_protos(
            &["../../proto/discount_code.proto", "../../proto/health.proto"],
            &["../../proto"],
        )?;

    Ok(())
}
