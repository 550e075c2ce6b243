//! Legacy VTK writer.
//!
//! A [`VtkWriter`] buffers every section in memory while geometry and fields
//! stream in, then assembles the file in one pass when it is finished. The
//! layout is split by concern:
//! - `geometry` - point and cell appenders
//! - `fields` - named and default field attachment
//! - `finalize` - validation and section assembly
//! - `section` - section buffers and the named-field registry
//! - `stream` - output destination

mod fields;
mod finalize;
mod geometry;
mod options;
mod section;
mod stream;

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;

use crate::util::{Error, Result};
use crate::vtk::encode::{Real, ScalarEncoder};
use crate::vtk::format::FieldDomain;

pub use options::{DatasetKind, GridSpec, WriterOptions};
pub use stream::OStream;

use section::{FieldRegistry, SectionBuffer};

/// Lifecycle of a writer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriterState {
    /// Accepting appends.
    Open,
    /// Assembling the output.
    Finalizing,
    /// Output written, destination released.
    Closed,
    /// An append broke an invariant; finalization will fail.
    Poisoned(String),
}

/// Writer for one legacy VTK file.
///
/// `T` fixes the precision of coordinates and field values (`f32` writes
/// `float`, `f64` writes `double`). `W` is the output destination.
///
/// The file is produced by [`VtkWriter::finish`]. A writer that is dropped
/// without being finished is finalized in `Drop`; a fatal error at that point
/// aborts the process instead of leaving a half-valid file behind.
pub struct VtkWriter<T: Real = f32, W: Write = BufWriter<File>> {
    options: WriterOptions,
    header: String,
    stream: OStream<W>,
    encoder: ScalarEncoder,
    state: WriterState,

    points: SectionBuffer,
    cells: SectionBuffer,
    cell_types: SectionBuffer,
    default_field: SectionBuffer,
    cell_fields: FieldRegistry,
    point_fields: FieldRegistry,

    point_count: usize,
    cell_count: usize,
    cell_index_word_count: usize,
    default_field_count: usize,
    relative_index_base: usize,
    /// Largest point index referenced by any cell.
    max_index: Option<i64>,

    _precision: PhantomData<T>,
}

impl<T: Real> VtkWriter<T, BufWriter<File>> {
    /// Create the file at `path` and bind a writer to it.
    pub fn create(path: impl AsRef<Path>, options: WriterOptions) -> Result<Self> {
        options.validate()?;
        tracing::debug!(path = %path.as_ref().display(), "creating VTK file");
        let stream = OStream::create(path)?;
        Ok(Self::with_stream(stream, options))
    }
}

impl<T: Real, W: Write> VtkWriter<T, W> {
    /// Bind a writer to an arbitrary destination.
    pub fn new(dest: W, options: WriterOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::with_stream(OStream::new(dest), options))
    }

    fn with_stream(stream: OStream<W>, options: WriterOptions) -> Self {
        let header = options.header::<T>();
        tracing::debug!(
            name = options.name(),
            dataset = options.dataset().keyword(),
            encoding = %options.get_encoding(),
            precision = T::PRECISION,
            "VTK writer opened"
        );
        Self {
            options,
            header,
            stream,
            encoder: ScalarEncoder::new(),
            state: WriterState::Open,
            points: SectionBuffer::default(),
            cells: SectionBuffer::default(),
            cell_types: SectionBuffer::default(),
            default_field: SectionBuffer::default(),
            cell_fields: FieldRegistry::default(),
            point_fields: FieldRegistry::default(),
            point_count: 0,
            cell_count: 0,
            cell_index_word_count: 0,
            default_field_count: 0,
            relative_index_base: 0,
            max_index: None,
            _precision: PhantomData,
        }
    }

    #[inline]
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    #[inline]
    pub fn state(&self) -> &WriterState {
        &self.state
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Total words of the `CELLS` section (indices plus one prefix per cell).
    #[inline]
    pub fn cell_index_word_count(&self) -> usize {
        self.cell_index_word_count
    }

    /// Number of default field batches attached.
    #[inline]
    pub fn default_field_count(&self) -> usize {
        self.default_field_count
    }

    #[inline]
    pub fn relative_index_base(&self) -> usize {
        self.relative_index_base
    }

    /// Element count of a named field, if registered.
    pub fn field_len(&self, name: &str, domain: FieldDomain) -> Option<usize> {
        self.registry(domain).get(name).map(|f| f.section.count())
    }

    /// Set the offset added to relatively indexed cells.
    ///
    /// `None` uses the current point count, so the next batch of points can
    /// be addressed from zero.
    pub fn set_relative_index(&mut self, base: Option<usize>) -> &mut Self {
        self.relative_index_base = base.unwrap_or(self.point_count);
        self
    }

    fn ensure_open(&self) -> Result<()> {
        match &self.state {
            WriterState::Open => Ok(()),
            WriterState::Poisoned(reason) => Err(Error::Poisoned(reason.clone())),
            WriterState::Finalizing | WriterState::Closed => Err(Error::Closed),
        }
    }

    fn ensure_unstructured(&self, operation: &'static str) -> Result<()> {
        self.ensure_open()?;
        if self.options.dataset().is_structured() {
            return Err(Error::DatasetMismatch {
                operation,
                dataset: self.options.dataset().keyword(),
            });
        }
        Ok(())
    }

    /// Record a fatal violation; the writer refuses further work.
    fn poison(&mut self, err: Error) -> Error {
        tracing::error!(error = %err, "VTK writer poisoned");
        self.state = WriterState::Poisoned(err.to_string());
        err
    }

    fn registry(&self, domain: FieldDomain) -> &FieldRegistry {
        match domain {
            FieldDomain::Cell => &self.cell_fields,
            FieldDomain::Point => &self.point_fields,
        }
    }
}

impl<T: Real, W: Write> fmt::Debug for VtkWriter<T, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VtkWriter")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("precision", &T::PRECISION)
            .field("points", &self.point_count)
            .field("cells", &self.cell_count)
            .field("cell_words", &self.cell_index_word_count)
            .field("cell_fields", &self.cell_fields.len())
            .field("point_fields", &self.point_fields.len())
            .field("default_fields", &self.default_field_count)
            .field("relative_index_base", &self.relative_index_base)
            .finish()
    }
}

impl<T: Real, W: Write> Drop for VtkWriter<T, W> {
    fn drop(&mut self) {
        if matches!(self.state, WriterState::Closed) {
            return;
        }
        if std::thread::panicking() {
            tracing::warn!(name = self.options.name(), "VTK writer dropped during panic, nothing written");
            self.stream.discard();
            return;
        }
        if let Err(err) = self.finalize() {
            tracing::error!(name = self.options.name(), error = %err, "VTK finalization failed");
            if err.is_fatal() {
                std::process::abort();
            }
        }
    }
}

#[cfg(test)]
mod tests;
