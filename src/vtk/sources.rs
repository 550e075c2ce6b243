//! Input element traits and lazy producers.
//!
//! Every appender takes `impl IntoIterator` over one of the element traits
//! below, so raw slices, `Vec`s, glam vectors and the generated sequences in
//! this module all feed the writer the same way. Sequences are consumed
//! once, front to back.

use smallvec::SmallVec;

use crate::util::{DVec2, DVec3, DVec4, IVec2, IVec3, IVec4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec3A, Vec4};

/// A coordinate, vector or color with a small number of components.
pub trait Components {
    fn len(&self) -> usize;

    /// Component `i`, for `i < len()`.
    fn component(&self, i: usize) -> f64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First `N` components, zero padded.
    fn padded<const N: usize>(&self) -> [f64; N] {
        let mut out = [0.0; N];
        for (i, slot) in out.iter_mut().enumerate().take(self.len()) {
            *slot = self.component(i);
        }
        out
    }
}

impl<C: Components + ?Sized> Components for &C {
    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn component(&self, i: usize) -> f64 {
        (**self).component(i)
    }
}

macro_rules! impl_components_glam {
    ($($ty:ty => $n:expr),* $(,)?) => {
        $(
            impl Components for $ty {
                #[inline]
                fn len(&self) -> usize {
                    $n
                }

                #[inline]
                fn component(&self, i: usize) -> f64 {
                    self[i] as f64
                }
            }
        )*
    };
}

impl_components_glam!(
    Vec2 => 2, Vec3 => 3, Vec3A => 3, Vec4 => 4,
    DVec2 => 2, DVec3 => 3, DVec4 => 4,
);

macro_rules! impl_components_array {
    ($($elem:ty),*) => {
        $(
            impl<const N: usize> Components for [$elem; N] {
                #[inline]
                fn len(&self) -> usize {
                    N
                }

                #[inline]
                fn component(&self, i: usize) -> f64 {
                    self[i] as f64
                }
            }

            impl Components for [$elem] {
                #[inline]
                fn len(&self) -> usize {
                    <[$elem]>::len(self)
                }

                #[inline]
                fn component(&self, i: usize) -> f64 {
                    self[i] as f64
                }
            }

            impl Components for Vec<$elem> {
                #[inline]
                fn len(&self) -> usize {
                    Vec::len(self)
                }

                #[inline]
                fn component(&self, i: usize) -> f64 {
                    self[i] as f64
                }
            }
        )*
    };
}

impl_components_array!(f32, f64);

/// An ordered tuple of point indices describing one cell.
pub trait IndexTuple {
    fn len(&self) -> usize;

    /// Index `i`, for `i < len()`.
    fn index(&self, i: usize) -> i64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_indices(&self) -> SmallVec<[i64; 8]> {
        (0..self.len()).map(|i| self.index(i)).collect()
    }
}

impl<T: IndexTuple + ?Sized> IndexTuple for &T {
    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn index(&self, i: usize) -> i64 {
        (**self).index(i)
    }
}

macro_rules! impl_index_glam {
    ($($ty:ty => $n:expr),* $(,)?) => {
        $(
            impl IndexTuple for $ty {
                #[inline]
                fn len(&self) -> usize {
                    $n
                }

                #[inline]
                fn index(&self, i: usize) -> i64 {
                    self[i] as i64
                }
            }
        )*
    };
}

impl_index_glam!(IVec2 => 2, IVec3 => 3, IVec4 => 4, UVec2 => 2, UVec3 => 3, UVec4 => 4);

macro_rules! impl_index_array {
    ($($elem:ty),*) => {
        $(
            impl<const N: usize> IndexTuple for [$elem; N] {
                #[inline]
                fn len(&self) -> usize {
                    N
                }

                #[inline]
                fn index(&self, i: usize) -> i64 {
                    self[i] as i64
                }
            }

            impl IndexTuple for [$elem] {
                #[inline]
                fn len(&self) -> usize {
                    <[$elem]>::len(self)
                }

                #[inline]
                fn index(&self, i: usize) -> i64 {
                    self[i] as i64
                }
            }

            impl IndexTuple for Vec<$elem> {
                #[inline]
                fn len(&self) -> usize {
                    Vec::len(self)
                }

                #[inline]
                fn index(&self, i: usize) -> i64 {
                    self[i] as i64
                }
            }
        )*
    };
}

impl_index_array!(i32, u32, i64, usize);

/// A single scalar field value.
pub trait FieldValue {
    fn to_f64(&self) -> f64;
}

impl<V: FieldValue + ?Sized> FieldValue for &V {
    #[inline]
    fn to_f64(&self) -> f64 {
        (**self).to_f64()
    }
}

macro_rules! impl_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                #[inline]
                fn to_f64(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

impl_field_value!(f32, f64, i8, u8, i16, u16, i32, u32, i64, usize);

impl FieldValue for bool {
    #[inline]
    fn to_f64(&self) -> f64 {
        if *self { 1.0 } else { 0.0 }
    }
}

/// Points from a flat `x0 y0 x1 y1 ...` array, lifted to `z = 0`.
///
/// A trailing odd coordinate is ignored.
pub fn points_2d<V: FieldValue>(flat: &[V]) -> impl Iterator<Item = DVec3> + '_ {
    flat.chunks_exact(2)
        .map(|xy| DVec3::new(xy[0].to_f64(), xy[1].to_f64(), 0.0))
}

/// Generated index tuples for `id` in `ids`.
///
/// With `stride == 0` entry `i` is `id + offset * i`; otherwise it is
/// `id * stride + i`.
pub fn index_tuples<const N: usize>(
    ids: std::ops::Range<i64>,
    stride: i64,
    offset: i64,
) -> impl Iterator<Item = [i64; N]> {
    ids.map(move |id| {
        let mut tuple = [0i64; N];
        for (i, slot) in tuple.iter_mut().enumerate() {
            let i = i as i64;
            *slot = if stride == 0 { id + offset * i } else { id * stride + i };
        }
        tuple
    })
}

/// `value` repeated `count` times.
pub fn repeated<V: Clone>(value: V, count: usize) -> std::iter::Take<std::iter::Repeat<V>> {
    std::iter::repeat(value).take(count)
}

/// Index tuples shifted by a constant.
pub fn offset_indices<I>(tuples: I, delta: i64) -> impl Iterator<Item = SmallVec<[i64; 8]>>
where
    I: IntoIterator,
    I::Item: IndexTuple,
{
    tuples.into_iter().map(move |t| {
        let mut indices = t.to_indices();
        for idx in indices.iter_mut() {
            *idx += delta;
        }
        indices
    })
}

impl IndexTuple for SmallVec<[i64; 8]> {
    #[inline]
    fn len(&self) -> usize {
        SmallVec::len(self)
    }

    #[inline]
    fn index(&self, i: usize) -> i64 {
        self[i]
    }
}

/// Element-wise `a + b` of two coordinate sequences.
///
/// Stops at the shorter sequence.
pub fn sum<A, B>(a: A, b: B) -> impl Iterator<Item = DVec3>
where
    A: IntoIterator,
    A::Item: Components,
    B: IntoIterator,
    B::Item: Components,
{
    scaled_sum(a, b, 1.0)
}

/// Element-wise `a + b * mult` of two coordinate sequences.
pub fn scaled_sum<A, B>(a: A, b: B, mult: f64) -> impl Iterator<Item = DVec3>
where
    A: IntoIterator,
    A::Item: Components,
    B: IntoIterator,
    B::Item: Components,
{
    a.into_iter().zip(b).map(move |(p, d)| {
        DVec3::from_array(p.padded::<3>()) + DVec3::from_array(d.padded::<3>()) * mult
    })
}
