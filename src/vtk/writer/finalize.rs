//! Validation and assembly of the final file.

use std::io::Write;

use super::section::FieldRegistry;
use super::stream::OStream;
use super::{DatasetKind, VtkWriter, WriterState};
use crate::util::{Error, Result};
use crate::vtk::encode::Real;
use crate::vtk::format::{FieldDomain, FieldShape, DEFAULT_FIELD_NAME};

/// Write a section body; binary bodies get a line break so the next keyword
/// starts on its own line.
fn write_section<W: Write>(stream: &mut OStream<W>, body: &[u8], binary: bool) -> Result<()> {
    stream.write_bytes(body)?;
    if binary && !body.is_empty() {
        stream.write_bytes(b"\n")?;
    }
    Ok(())
}

/// Count declared for a field group: the count of its first field.
fn declared_count(registry: &FieldRegistry) -> Option<usize> {
    registry.iter().next().map(|f| f.section.count())
}

/// Every field of a group must cover the whole domain.
fn check_group(registry: &FieldRegistry, domain: FieldDomain, declared: usize) -> Result<()> {
    for field in registry.iter() {
        if field.section.count() != declared {
            return Err(Error::GroupCountMismatch {
                domain: domain.name(),
                name: field.name.clone(),
                count: field.section.count(),
                declared,
            });
        }
    }
    Ok(())
}

fn write_group<W: Write>(
    stream: &mut OStream<W>,
    registry: &FieldRegistry,
    domain: FieldDomain,
    declared: usize,
    binary: bool,
) -> Result<()> {
    if registry.is_empty() {
        return Ok(());
    }
    stream.write_line(&format!("{} {declared}", domain.keyword()))?;
    for field in registry.iter() {
        write_section(stream, field.section.bytes(), binary)?;
    }
    Ok(())
}

impl<T: Real, W: Write> VtkWriter<T, W> {
    /// Write the file and hand back the destination.
    ///
    /// Fails without writing anything when an invariant is broken: a
    /// structured grid without exactly one default field, a poisoned
    /// writer, a cell index past the last point, or a field group whose
    /// counts disagree.
    pub fn finish(mut self) -> Result<W> {
        self.finalize()
    }

    pub(super) fn finalize(&mut self) -> Result<W> {
        match &self.state {
            WriterState::Open => {}
            WriterState::Poisoned(reason) => {
                let err = Error::Poisoned(reason.clone());
                self.stream.discard();
                self.state = WriterState::Closed;
                return Err(err);
            }
            WriterState::Finalizing | WriterState::Closed => return Err(Error::Closed),
        }

        self.state = WriterState::Finalizing;
        let result = self.write_checked();

        match &result {
            Ok(_) => tracing::info!(
                name = self.options.name(),
                points = self.point_count,
                cells = self.cell_count,
                cell_fields = self.cell_fields.len(),
                point_fields = self.point_fields.len(),
                bytes = self.stream.pos(),
                "VTK file written"
            ),
            Err(err) => {
                tracing::error!(name = self.options.name(), error = %err, "VTK file not written");
                self.stream.discard();
            }
        }
        self.state = WriterState::Closed;
        result
    }

    fn write_checked(&mut self) -> Result<W> {
        self.validate()?;
        self.write_sections()?;
        self.stream.into_inner()
    }

    fn validate(&self) -> Result<()> {
        match self.options.dataset() {
            DatasetKind::Unstructured => {
                if let Some(max) = self.max_index {
                    if max >= self.point_count as i64 {
                        return Err(Error::IndexOutOfRange { index: max, point_count: self.point_count });
                    }
                }
                check_group(&self.cell_fields, FieldDomain::Cell, self.cell_count)?;
                check_group(&self.point_fields, FieldDomain::Point, self.point_count)?;
            }
            DatasetKind::StructuredPoints(grid) => {
                if self.default_field_count != 1 {
                    return Err(Error::DefaultFieldCount(self.default_field_count));
                }
                check_group(&self.point_fields, FieldDomain::Point, self.point_count)?;
                if self.point_count as u64 != grid.num_samples() {
                    tracing::warn!(
                        samples = self.point_count,
                        expected = grid.num_samples(),
                        "default field size does not match grid dimensions"
                    );
                }
            }
        }
        Ok(())
    }

    fn write_sections(&mut self) -> Result<()> {
        let binary = self.options.get_encoding().is_binary();
        let stream = &mut self.stream;
        stream.write_bytes(self.header.as_bytes())?;

        match self.options.dataset() {
            DatasetKind::Unstructured => {
                stream.write_line(&format!("POINTS {} {}", self.point_count, T::PRECISION))?;
                write_section(stream, self.points.bytes(), binary)?;
                stream.write_line(&format!("CELLS {} {}", self.cell_count, self.cell_index_word_count))?;
                write_section(stream, self.cells.bytes(), binary)?;
                stream.write_line(&format!("CELL_TYPES {}", self.cell_count))?;
                write_section(stream, self.cell_types.bytes(), binary)?;

                if let Some(declared) = declared_count(&self.cell_fields) {
                    write_group(stream, &self.cell_fields, FieldDomain::Cell, declared, binary)?;
                }
                if let Some(declared) = declared_count(&self.point_fields) {
                    write_group(stream, &self.point_fields, FieldDomain::Point, declared, binary)?;
                }
            }
            DatasetKind::StructuredPoints(_) => {
                stream.write_line(&format!("{} {}", FieldDomain::Point.keyword(), self.point_count))?;
                for field in self.point_fields.iter() {
                    write_section(stream, field.section.bytes(), binary)?;
                }
                stream.write_bytes(FieldShape::Scalar.header(DEFAULT_FIELD_NAME, T::PRECISION).as_bytes())?;
                write_section(stream, self.default_field.bytes(), binary)?;
            }
        }
        Ok(())
    }
}
