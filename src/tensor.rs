//! Named constant tensor payloads
//!
//! Initialization parameters travel through synthesis as raw byte
//! payloads with shape/dtype metadata. Nothing here interprets the
//! data; the runtime loader does that on the target.

use crate::error::{MetaError, MetaResult};
use std::fmt;

/// Data type of a constant tensor payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DType {
    Bool,
    U8,
    I32,
    I64,
    F32,
    F64,
}

impl DType {
    /// Size of one element in bytes
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::Bool | DType::U8 => 1,
            DType::I32 | DType::F32 => 4,
            DType::I64 | DType::F64 => 8,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::Bool => write!(f, "bool"),
            DType::U8 => write!(f, "u8"),
            DType::I32 => write!(f, "i32"),
            DType::I64 => write!(f, "i64"),
            DType::F32 => write!(f, "f32"),
            DType::F64 => write!(f, "f64"),
        }
    }
}

/// Constant tensor payload (shape, dtype, raw bytes)
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tensor {
    shape: Vec<usize>,
    dtype: DType,
    data: Vec<u8>,
}

impl Tensor {
    /// Create a tensor from raw bytes, checking that the byte length
    /// matches the shape and dtype
    pub fn from_bytes(data: Vec<u8>, shape: Vec<usize>, dtype: DType) -> MetaResult<Self> {
        let expected = shape.iter().product::<usize>() * dtype.size_in_bytes();
        if data.len() != expected {
            return Err(MetaError::InvalidArgument(format!(
                "tensor data length {} does not match shape {:?} of dtype {}",
                data.len(),
                shape,
                dtype
            )));
        }
        Ok(Self { shape, dtype, data })
    }

    /// Create an f32 tensor from a slice
    pub fn from_f32s(values: &[f32], shape: Vec<usize>) -> MetaResult<Self> {
        let mut data = Vec::with_capacity(values.len() * 4);
        for v in values {
            data.extend_from_slice(&v.to_le_bytes());
        }
        Self::from_bytes(data, shape, DType::F32)
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of elements
    pub fn num_elements(&self) -> usize {
        self.shape.iter().product()
    }
}
