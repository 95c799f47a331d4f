pub mod fields;
pub mod topology;
pub mod tensor;
pub mod operator;
pub mod info_loader;
pub mod graph_builder;

// Re-export key types from the parser module
pub use info_loader::{InfoLoader, ParsedInfo};
pub use graph_builder::GraphBuilder;
pub use operator::parse_operator;
pub use tensor::parse_tensor;
pub use topology::parse_topology;
