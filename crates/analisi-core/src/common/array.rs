//! Dense n-dimensional `f64` arrays and named array sets.
//!
//! Arrays are stored row-major with an explicit shape, which is what the
//! parser emits and what gets serialized for downstream consumers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("block {block} has shape {found:?}, expected {expected:?}")]
    RaggedBlock {
        block: usize,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericArray {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl NumericArray {
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Builds a 2-D array; every row must have the width of the first one.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ShapeError> {
        let columns = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * columns);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != columns {
                return Err(ShapeError::RaggedRow {
                    row,
                    expected: columns,
                    found: values.len(),
                });
            }
            data.extend_from_slice(values);
        }

        Ok(Self {
            shape: vec![rows.len(), columns],
            data,
        })
    }

    /// Stacks equally shaped arrays along a new leading axis.
    pub fn stack(blocks: Vec<NumericArray>) -> Result<Self, ShapeError> {
        let Some(first) = blocks.first() else {
            return Ok(Self {
                shape: vec![0],
                data: Vec::new(),
            });
        };

        let inner_shape = first.shape.clone();
        let mut data = Vec::with_capacity(blocks.len() * first.data.len());
        for (block, array) in blocks.iter().enumerate() {
            if array.shape != inner_shape {
                return Err(ShapeError::RaggedBlock {
                    block,
                    expected: inner_shape,
                    found: array.shape.clone(),
                });
            }
            data.extend_from_slice(&array.data);
        }

        let mut shape = Vec::with_capacity(inner_shape.len() + 1);
        shape.push(blocks.len());
        shape.extend(inner_shape);
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Extent of the leading axis.
    pub fn len(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.shape.len() {
            return None;
        }

        let mut offset = 0;
        for (position, extent) in index.iter().zip(&self.shape) {
            if position >= extent {
                return None;
            }
            offset = offset * extent + position;
        }
        self.data.get(offset).copied()
    }
}

/// Named arrays emitted together under one output slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArrayData {
    arrays: BTreeMap<String, NumericArray>,
}

impl ArrayData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_array(&mut self, name: impl Into<String>, array: NumericArray) {
        self.arrays.insert(name.into(), array);
    }

    pub fn get_array(&self, name: &str) -> Option<&NumericArray> {
        self.arrays.get(name)
    }

    pub fn array_names(&self) -> Vec<&str> {
        self.arrays.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }
}
