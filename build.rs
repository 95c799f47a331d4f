fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile the ONNX protobuf subset; initializer payloads use `bytes::Bytes`
    prost_build::Config::new()
        .bytes([".onnx.TensorProto.raw_data"])
        .compile_protos(&["proto/onnx.proto"], &["proto/"])?;

    println!("cargo:rerun-if-changed=proto/onnx.proto");

    Ok(())
}
