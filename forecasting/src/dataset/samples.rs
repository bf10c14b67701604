use std::num::NonZeroUsize;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis, s};

use crate::{ForecastErr, Result};

/// An immutable collection of supervised samples.
///
/// Every row holds `x_size` feature values followed by `y_size` target values,
/// so the whole table is a single `(len, x_size + y_size)` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x_size: usize,
    y_size: usize,
    data: Array2<f32>,
}

impl Dataset {
    /// Creates a new `Dataset` from a flat row-major buffer.
    ///
    /// # Arguments
    /// * `data` - The samples, each one being `x_size` features followed by `y_size` targets.
    /// * `x_size` - The width of a feature vector.
    /// * `y_size` - The width of a target vector.
    ///
    /// # Returns
    /// A new `Dataset` or an error if the buffer can't be split in whole rows.
    pub fn new(data: Vec<f32>, x_size: usize, y_size: usize) -> Result<Self> {
        if x_size == 0 || y_size == 0 {
            return Err(ForecastErr::config(format!(
                "x_size ({x_size}) and y_size ({y_size}) must be greater than 0"
            )));
        }

        let row_size = x_size + y_size;
        if data.len() % row_size != 0 {
            return Err(ForecastErr::config(format!(
                "dataset length ({}) is not divisible by x_size + y_size ({row_size})",
                data.len()
            )));
        }

        let len = data.len() / row_size;
        let data = Array2::from_shape_vec((len, row_size), data)
            .map_err(|e| ForecastErr::config(e.to_string()))?;

        Ok(Self {
            x_size,
            y_size,
            data,
        })
    }

    /// Creates a new `Dataset` from an already parsed table of pre-windowed samples.
    ///
    /// The first `x_size` columns are the features, the remaining ones the targets.
    pub fn from_table(table: Array2<f32>, x_size: usize) -> Result<Self> {
        let ncols = table.ncols();
        if x_size == 0 || x_size >= ncols {
            return Err(ForecastErr::config(format!(
                "x_size ({x_size}) must leave at least one target column out of {ncols}"
            )));
        }

        Ok(Self {
            x_size,
            y_size: ncols - x_size,
            data: table,
        })
    }

    pub(crate) fn from_parts(data: Array2<f32>, x_size: usize, y_size: usize) -> Self {
        Self {
            x_size,
            y_size,
            data,
        }
    }

    /// Returns the amount of samples.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Returns whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the width of a feature vector.
    pub fn x_size(&self) -> usize {
        self.x_size
    }

    /// Returns the width of a target vector.
    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// Gets the sample at `index`.
    ///
    /// # Returns
    /// A tuple of (features, targets) or `IndexOutOfRange` if `index >= len`.
    pub fn get(&self, index: usize) -> Result<(ArrayView1<'_, f32>, ArrayView1<'_, f32>)> {
        let len = self.len();
        if index >= len {
            return Err(ForecastErr::IndexOutOfRange { index, len });
        }

        Ok(self.data.row(index).split_at(Axis(0), self.x_size))
    }

    /// A view of every feature vector, one per row.
    pub fn x(&self) -> ArrayView2<'_, f32> {
        self.data.slice(s![.., ..self.x_size])
    }

    /// A view of every target vector, one per row.
    pub fn y(&self) -> ArrayView2<'_, f32> {
        self.data.slice(s![.., self.x_size..])
    }

    /// A view of the raw `(len, x_size + y_size)` table.
    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }

    /// Gathers the given rows into an owned (features, targets) batch.
    ///
    /// # Errors
    /// `IndexOutOfRange` if any of `indices` is out of range.
    pub fn batch(&self, indices: &[usize]) -> Result<(Array2<f32>, Array2<f32>)> {
        self.check_indices(indices)?;
        Ok(self.gather(indices))
    }

    /// Iterates over minibatches following `order`, the last one possibly being smaller.
    ///
    /// # Arguments
    /// * `order` - The order in which samples are visited.
    /// * `batch_size` - The maximum amount of samples per batch.
    ///
    /// # Errors
    /// `IndexOutOfRange` if any entry of `order` is out of range, checked before any batch is built.
    pub fn batches<'a>(
        &'a self,
        order: &'a [usize],
        batch_size: NonZeroUsize,
    ) -> Result<impl Iterator<Item = (Array2<f32>, Array2<f32>)> + 'a> {
        self.check_indices(order)?;

        Ok(order
            .chunks(batch_size.get())
            .map(move |indices| self.gather(indices)))
    }

    fn gather(&self, indices: &[usize]) -> (Array2<f32>, Array2<f32>) {
        let rows = self.data.select(Axis(0), indices);
        let x = rows.slice(s![.., ..self.x_size]).to_owned();
        let y = rows.slice(s![.., self.x_size..]).to_owned();
        (x, y)
    }

    fn check_indices(&self, indices: &[usize]) -> Result<()> {
        let len = self.len();

        match indices.iter().find(|&&index| index >= len) {
            Some(&index) => Err(ForecastErr::IndexOutOfRange { index, len }),
            None => Ok(()),
        }
    }

    /// Builds a new dataset keeping the rows in `indices`, in that order.
    pub(crate) fn subset(&self, indices: &[usize]) -> Self {
        let data = match indices {
            [] => Array2::zeros((0, self.data.ncols())),
            _ => self.data.select(Axis(0), indices),
        };

        Self::from_parts(data, self.x_size, self.y_size)
    }

    /// Applies `f` to every value, features and targets alike.
    pub fn mapv<F>(&self, f: F) -> Self
    where
        F: Fn(f32) -> f32,
    {
        Self::from_parts(self.data.mapv(f), self.x_size, self.y_size)
    }
}
