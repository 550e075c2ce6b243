//! Named and default field attachment.

use std::io::Write;

use smallvec::SmallVec;

use super::VtkWriter;
use crate::util::{Error, Result};
use crate::vtk::encode::{Real, Scalar};
use crate::vtk::format::{is_valid_field_name, Encoding, FieldDomain, FieldShape, COLOR_COMPONENTS, SPATIAL_COMPONENTS};
use crate::vtk::sources::{Components, FieldValue};

type Row = SmallVec<[Scalar; COLOR_COMPONENTS]>;

impl<T: Real, W: Write> VtkWriter<T, W> {
    /// Append values to the scalar field `name` of `domain`.
    ///
    /// The field header is written the first time `name` is seen in that
    /// domain; later calls keep appending to the same field. After the call
    /// the field must hold exactly one value per cell (or point): otherwise
    /// the writer is poisoned and [`Error::FieldCountMismatch`] is returned.
    pub fn append_field_data<I>(&mut self, name: &str, domain: FieldDomain, values: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: FieldValue,
    {
        let rows = values
            .into_iter()
            .map(|v| Row::from_slice(&[T::from_f64(v.to_f64()).scalar()]));
        self.attach(name, domain, FieldShape::Scalar, rows)
    }

    /// Append 3-component vectors to the vector field `name` of `domain`.
    pub fn append_vector_field_data<I>(&mut self, name: &str, domain: FieldDomain, vectors: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Components,
    {
        let rows = vectors.into_iter().map(|v| {
            v.padded::<SPATIAL_COMPONENTS>()
                .iter()
                .map(|&c| T::from_f64(c).scalar())
                .collect::<Row>()
        });
        self.attach(name, domain, FieldShape::Vector, rows)
    }

    /// Append colors with components in `[0, 1]` to the color field `name`.
    ///
    /// Colors with fewer than four components are padded to full opacity.
    /// Binary files store each component as an unsigned byte.
    pub fn append_color_field_data<I>(&mut self, name: &str, domain: FieldDomain, colors: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Components,
    {
        let binary = self.options.get_encoding().is_binary();
        let rows = colors.into_iter().map(move |c| {
            let given = c.len().min(COLOR_COMPONENTS);
            (0..COLOR_COMPONENTS)
                .map(|d| match (binary, d < given) {
                    (true, true) => Scalar::U8((c.component(d) * 255.0) as u8),
                    (true, false) => Scalar::U8(u8::MAX),
                    (false, true) => T::from_f64(c.component(d)).scalar(),
                    (false, false) => T::from_f64(1.0).scalar(),
                })
                .collect::<Row>()
        });
        self.attach(name, domain, FieldShape::Color, rows)
    }

    /// Append values to the unnamed field of a structured grid.
    ///
    /// Every value is one grid sample, so the point count grows with it.
    /// Finalization requires exactly one such call.
    pub fn append_default_field<I>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: FieldValue,
    {
        self.ensure_open()?;
        if !self.options.dataset().is_structured() {
            return Err(Error::DatasetMismatch {
                operation: "append_default_field",
                dataset: self.options.dataset().keyword(),
            });
        }

        let encoding = self.options.get_encoding();
        let mut n = 0;
        for v in values {
            let value = [T::from_f64(v.to_f64()).scalar()];
            self.default_field.push_row(&self.encoder, encoding, &value);
            n += 1;
        }
        self.default_field.bump(n);
        self.point_count += n;
        self.default_field_count += 1;
        tracing::trace!(added = n, batches = self.default_field_count, "default field appended");
        Ok(self)
    }

    fn attach<R>(&mut self, name: &str, domain: FieldDomain, shape: FieldShape, rows: R) -> Result<&mut Self>
    where
        R: Iterator<Item = Row>,
    {
        self.ensure_open()?;
        if !is_valid_field_name(name) {
            return Err(Error::InvalidFieldName(name.to_string()));
        }
        if domain == FieldDomain::Cell && self.options.dataset().is_structured() {
            return Err(Error::DatasetMismatch {
                operation: "cell data",
                dataset: self.options.dataset().keyword(),
            });
        }
        self.registry(domain).check_shape(name, shape)?;

        let encoding: Encoding = self.options.get_encoding();
        let (registry, expected) = match domain {
            FieldDomain::Cell => (&mut self.cell_fields, self.cell_count),
            FieldDomain::Point => (&mut self.point_fields, self.point_count),
        };
        let field = registry.entry(name, shape, T::PRECISION);
        let mut n = 0;
        for row in rows {
            field.section.push_row(&self.encoder, encoding, &row);
            n += 1;
        }
        field.section.bump(n);

        let count = field.section.count();
        tracing::trace!(name, domain = domain.name(), shape = shape.name(), added = n, count, "field appended");
        if count != expected {
            let err = Error::FieldCountMismatch {
                name: name.to_string(),
                domain: domain.name(),
                count,
                expected,
            };
            return Err(self.poison(err));
        }
        Ok(self)
    }
}
