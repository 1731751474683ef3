use std::fmt;
use std::iter::FromIterator;
use std::ops::{Deref, DerefMut};
use std::slice::{Iter, IterMut};

/// A dense, fixed-length vector of `f64`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NdVector {
    data: Vec<f64>,
}

impl NdVector {
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    pub fn zeros(len: usize) -> Self {
        Self::new(vec![0.0; len])
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, f64> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, f64> {
        self.data.iter_mut()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Largest absolute component, 0.0 for an empty vector.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}

impl Deref for NdVector {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.data
    }
}

impl DerefMut for NdVector {
    fn deref_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

impl From<Vec<f64>> for NdVector {
    fn from(value: Vec<f64>) -> Self {
        NdVector::new(value)
    }
}

impl From<NdVector> for Vec<f64> {
    fn from(value: NdVector) -> Self {
        value.data
    }
}

impl FromIterator<f64> for NdVector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        NdVector::new(iter.into_iter().collect())
    }
}

impl fmt::Display for NdVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, value) in self.data.iter().enumerate() {
            write!(f, "{}", value)?;
            if idx + 1 != self.data.len() {
                write!(f, ", ")?;
            }
        }
        write!(f, "]")
    }
}
