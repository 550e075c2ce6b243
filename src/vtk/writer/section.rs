//! Section buffers and the named-field registry.

use std::collections::HashMap;

use crate::util::{Error, Result};
use crate::vtk::encode::{Scalar, ScalarEncoder, Separator};
use crate::vtk::format::{Encoding, FieldShape};

/// Append-only byte buffer with an element counter.
#[derive(Debug, Default)]
pub(crate) struct SectionBuffer {
    bytes: Vec<u8>,
    count: usize,
}

impl SectionBuffer {
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Count `n` more elements.
    #[inline]
    pub fn bump(&mut self, n: usize) {
        self.count += n;
    }

    /// Append raw text, e.g. a field header.
    pub fn push_str(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
    }

    /// Encode one row of values.
    ///
    /// Text rows separate values with spaces and end with a line break;
    /// binary rows are the concatenated images.
    pub fn push_row(&mut self, encoder: &ScalarEncoder, encoding: Encoding, row: &[Scalar]) {
        match encoding {
            Encoding::Binary => {
                for value in row {
                    encoder.write_binary(&mut self.bytes, *value);
                }
            }
            Encoding::Ascii => {
                let last = row.len().saturating_sub(1);
                for (i, value) in row.iter().enumerate() {
                    let sep = if i == last { Separator::Newline } else { Separator::Space };
                    encoder.write_text(&mut self.bytes, *value, sep);
                }
            }
        }
    }
}

/// One named field: header on first sight, then accumulated values.
#[derive(Debug)]
pub(crate) struct FieldData {
    pub name: String,
    pub shape: FieldShape,
    pub section: SectionBuffer,
}

/// Named fields of one domain, kept in registration order.
#[derive(Debug, Default)]
pub(crate) struct FieldRegistry {
    fields: Vec<FieldData>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, name: &str) -> Option<&FieldData> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldData> {
        self.fields.iter()
    }

    /// Check that `name` may receive values of `shape`.
    pub fn check_shape(&self, name: &str, shape: FieldShape) -> Result<()> {
        match self.get(name) {
            Some(field) if field.shape != shape => Err(Error::FieldShapeMismatch {
                name: name.to_string(),
                existing: field.shape.name(),
                requested: shape.name(),
            }),
            _ => Ok(()),
        }
    }

    /// Field `name`, registered with its header the first time it is seen.
    pub fn entry(&mut self, name: &str, shape: FieldShape, precision: &str) -> &mut FieldData {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                let mut section = SectionBuffer::default();
                section.push_str(&shape.header(name, precision));
                let idx = self.fields.len();
                self.fields.push(FieldData { name: name.to_string(), shape, section });
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.fields[idx]
    }
}
