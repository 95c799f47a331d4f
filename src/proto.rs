// Include the generated protobuf code
pub mod onnx {
    include!(concat!(env!("OUT_DIR"), "/onnx.rs"));
}

// Re-export the proto types the exporter writes
pub use onnx::{
    // Model structure
    ModelProto,
    GraphProto,
    NodeProto,
    OperatorSetIdProto,

    // Tensors and their types
    TensorProto,
    ValueInfoProto,
    TypeProto,
    TensorShapeProto,

    // Attributes
    AttributeProto,

    // Nested messages, enums and oneofs
    attribute_proto,
    tensor_shape_proto,
    type_proto,
};
