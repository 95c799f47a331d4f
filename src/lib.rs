pub mod error;
pub mod model;
pub mod parser;
pub mod ops;
pub mod data;
pub mod proto;
pub mod export;
pub mod config;
pub mod convert;

// Re-export commonly used types
pub use config::ConvertOptions;
pub use convert::{Converter, GraphSummary};
pub use data::{DataRegion, MappedFile};
pub use error::{Error, Result};
pub use export::ModelExporter;
pub use model::{
    Attribute, DataType, Domain, Graph, Initializer, InitializerData, Layout, Node, NodeInput,
    OperatorRecord, TensorDescriptor, TensorIndex, Topology,
};
pub use ops::{decode_operator, OpKind};
pub use parser::{GraphBuilder, InfoLoader, ParsedInfo};
