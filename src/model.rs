use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use strum_macros::{AsRefStr, EnumString};

use crate::error::{Error, Result};

/// Position of a tensor in the parsed tensor table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TensorIndex(usize);

impl TensorIndex {
    pub fn new(index: usize) -> Self {
        TensorIndex(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TensorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Ordered tensor bindings of an operator or of the whole graph.
/// Duplicates are allowed, a tensor may be consumed more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    pub inputs: Vec<TensorIndex>,
    pub outputs: Vec<TensorIndex>,
}

impl Topology {
    /// All indices referenced, outputs first as they appear in the record
    pub fn indices(&self) -> impl Iterator<Item = TensorIndex> + '_ {
        self.outputs.iter().chain(self.inputs.iter()).copied()
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.outputs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", index)?;
        }
        f.write_str(" <-")?;
        for index in &self.inputs {
            write!(f, " {}", index)?;
        }
        Ok(())
    }
}

/// Element types understood by the dump, carrying their ONNX codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr)]
#[repr(i32)]
pub enum DataType {
    Undefined = 0,
    #[strum(serialize = "F32")]
    Float = 1,
    #[strum(serialize = "U8")]
    Uint8 = 2,
    #[strum(serialize = "I8")]
    Int8 = 3,
    #[strum(serialize = "U16")]
    Uint16 = 4,
    #[strum(serialize = "I16")]
    Int16 = 5,
    #[strum(serialize = "I32")]
    Int32 = 6,
    #[strum(serialize = "I64")]
    Int64 = 7,
    #[strum(serialize = "String")]
    String = 8,
    #[strum(serialize = "Bool")]
    Bool = 9,
    #[strum(serialize = "FP16")]
    Float16 = 10,
    #[strum(serialize = "F64")]
    Double = 11,
    #[strum(serialize = "U32")]
    Uint32 = 12,
    #[strum(serialize = "U64")]
    Uint64 = 13,
    #[strum(serialize = "Complex64")]
    Complex64 = 14,
    #[strum(serialize = "Complex128")]
    Complex128 = 15,
    #[strum(serialize = "BF16")]
    BFloat16 = 16,
}

impl DataType {
    /// Map a dump type tag. Unknown tags become `Undefined`, never an error.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or(DataType::Undefined)
    }

    /// ONNX `TensorProto.DataType` code
    pub fn to_proto(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Memory layout tag of a tensor record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `NCHW`
    ChannelsFirst,
    /// `ELSE`
    Opaque,
}

impl Layout {
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"NCHW" => Some(Layout::ChannelsFirst),
            b"ELSE" => Some(Layout::Opaque),
            _ => None,
        }
    }
}

/// One record of the tensor table
#[derive(Debug, Clone, PartialEq)]
pub struct TensorDescriptor {
    pub name: String,
    pub data_type: DataType,
    pub layout: Layout,
    pub offset: u64,
    pub size: u64,
    pub shape: Vec<i64>,
}

impl TensorDescriptor {
    /// Tensors with a payload in the data region are constants
    pub fn is_initializer(&self) -> bool {
        self.size != 0
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }
}

impl fmt::Display for TensorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (dt = {}) {:?} {}..{}",
            self.name,
            self.data_type,
            self.shape,
            self.offset,
            self.offset.saturating_add(self.size)
        )
    }
}

/// Flat storage for every tensor descriptor, addressed by `TensorIndex`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TensorArena {
    tensors: Vec<TensorDescriptor>,
}

impl TensorArena {
    pub fn new(tensors: Vec<TensorDescriptor>) -> Self {
        Self { tensors }
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    pub fn get(&self, index: TensorIndex) -> Option<&TensorDescriptor> {
        self.tensors.get(index.index())
    }

    /// Look up a tensor, failing when the index names no parsed record
    pub fn resolve(&self, index: TensorIndex) -> Result<&TensorDescriptor> {
        self.get(index).ok_or_else(|| {
            Error::InvalidGraph(format!(
                "tensor index {} is out of bounds ({} tensors parsed)",
                index,
                self.tensors.len()
            ))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (TensorIndex, &TensorDescriptor)> {
        self.tensors
            .iter()
            .enumerate()
            .map(|(i, t)| (TensorIndex(i), t))
    }
}

impl Index<TensorIndex> for TensorArena {
    type Output = TensorDescriptor;

    fn index(&self, index: TensorIndex) -> &Self::Output {
        &self.tensors[index.index()]
    }
}

/// One operator line, with its metadata still undecoded
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorRecord<'a> {
    pub name: String,
    pub op_type: String,
    pub meta: &'a [u8],
    pub topology: Topology,
}

/// Node attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Float(f32),
    Int(i64),
    Ints(Vec<i64>),
}

impl From<bool> for Attribute {
    fn from(value: bool) -> Self {
        Attribute::Int(value as i64)
    }
}

impl From<f32> for Attribute {
    fn from(value: f32) -> Self {
        Attribute::Float(value)
    }
}

impl From<i64> for Attribute {
    fn from(value: i64) -> Self {
        Attribute::Int(value)
    }
}

impl From<Vec<i64>> for Attribute {
    fn from(value: Vec<i64>) -> Self {
        Attribute::Ints(value)
    }
}

pub type AttributeSet = BTreeMap<&'static str, Attribute>;

/// Operator-set namespace a node is emitted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Default,
    Extension,
}

/// Constant tensor contents
#[derive(Debug, Clone, PartialEq)]
pub enum InitializerData<'a> {
    /// Borrowed straight from the data region
    Raw(&'a [u8]),
    /// Synthesized by the converter
    Int64(Vec<i64>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Initializer<'a> {
    pub name: String,
    pub data_type: DataType,
    pub dims: Vec<i64>,
    pub data: InitializerData<'a>,
}

/// A node input is either a table tensor or one of the node's own constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeInput {
    Tensor(TensorIndex),
    Extra(usize),
}

/// Node in the output graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub op_type: &'static str,
    pub domain: Domain,
    pub inputs: Vec<NodeInput>,
    pub outputs: Vec<TensorIndex>,
    pub attributes: AttributeSet,
    pub extra_initializers: Vec<Initializer<'static>>,
}

impl Node {
    /// Node reading and writing the given tensors, without attributes
    pub fn new(
        name: &str,
        op_type: &'static str,
        inputs: &[TensorIndex],
        outputs: &[TensorIndex],
    ) -> Self {
        Self {
            name: name.to_string(),
            op_type,
            domain: Domain::Default,
            inputs: inputs.iter().copied().map(NodeInput::Tensor).collect(),
            outputs: outputs.to_vec(),
            attributes: AttributeSet::new(),
            extra_initializers: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: &'static str, value: impl Into<Attribute>) -> Self {
        self.attributes.insert(name, value.into());
        self
    }

    pub fn in_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
}

/// Assembled graph, borrowing initializer payloads from the data region
#[derive(Debug, Clone)]
pub struct Graph<'a> {
    pub name: String,
    pub nodes: Vec<Node>,
    pub inputs: Vec<TensorIndex>,
    pub outputs: Vec<TensorIndex>,
    pub tensors: TensorArena,
    pub initializers: Vec<Initializer<'a>>,
    /// Intermediate values: no payload and not on the graph boundary
    pub value_info: Vec<TensorIndex>,
}

impl<'a> Graph<'a> {
    /// Table initializers followed by every node's synthesized constants
    pub fn all_initializers(&self) -> impl Iterator<Item = &Initializer<'a>> + '_ {
        fn widen<'s, 'a>(init: &'s Initializer<'static>) -> &'s Initializer<'a> {
            init
        }

        self.initializers.iter().chain(
            self.nodes
                .iter()
                .flat_map(|n| n.extra_initializers.iter())
                .map(widen),
        )
    }

    /// Name of a node input, resolving node-local constants
    pub fn input_name<'g>(&'g self, node: &'g Node, input: NodeInput) -> Result<&'g str> {
        match input {
            NodeInput::Tensor(index) => Ok(self.tensors.resolve(index)?.name.as_str()),
            NodeInput::Extra(i) => node
                .extra_initializers
                .get(i)
                .map(|init| init.name.as_str())
                .ok_or_else(|| {
                    Error::InvalidGraph(format!(
                        "node `{}` refers to missing constant #{}",
                        node.name, i
                    ))
                }),
        }
    }
}
