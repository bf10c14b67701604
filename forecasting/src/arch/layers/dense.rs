use ndarray::{linalg, prelude::*};

use crate::{ForecastErr, Result, arch::activations::ActFn};

/// A fully connected layer, `a = act_fn(x · W + b)`.
///
/// The layer doesn't own its parameters, it views a slice of `(dim.0 + 1) * dim.1` values:
/// the row-major `(dim.0, dim.1)` weights followed by the `dim.1` biases.
#[derive(Debug, Clone)]
pub struct Dense {
    dim: (usize, usize),
    act_fn: Option<ActFn>,
    size: usize,

    // Forward metadata
    x: Array2<f32>,
    z: Array2<f32>,
}

impl Dense {
    /// Creates a new `Dense` layer.
    ///
    /// # Arguments
    /// * `dim` - The (input, output) widths.
    /// * `act_fn` - The activation applied to the output, `None` for a linear layer.
    pub fn new(dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self {
            dim,
            size: (dim.0 + 1) * dim.1,
            act_fn,
            x: Array2::zeros((0, dim.0)),
            z: Array2::zeros((0, dim.1)),
        }
    }

    /// Returns the amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    pub fn act_fn(&self) -> Option<&ActFn> {
        self.act_fn.as_ref()
    }

    /// Computes the output of the layer without keeping anything for a backward pass.
    pub fn predict(&self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let z = self.weighted_sum(params, x)?;
        Ok(self.activate(z))
    }

    /// Computes the output of the layer, caching its input and weighted sum for `backward`.
    pub fn forward(&mut self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let z = self.weighted_sum(params, x)?;
        let a = self.activate(z.clone());

        self.x = x.to_owned();
        self.z = z;
        Ok(a)
    }

    /// Writes the gradient of this layer's parameters into `grad` and propagates the delta.
    ///
    /// # Arguments
    /// * `params` - The parameters used on the last `forward`.
    /// * `grad` - This layer's slice of the gradient buffer.
    /// * `d` - The derivative of the loss with respect to this layer's output.
    ///
    /// # Returns
    /// The derivative of the loss with respect to this layer's input.
    pub fn backward(
        &self,
        params: &[f32],
        grad: &mut [f32],
        mut d: Array2<f32>,
    ) -> Result<Array2<f32>> {
        if d.dim() != self.z.dim() {
            return Err(ForecastErr::DimensionMismatch {
                what: "backward delta rows",
                got: d.nrows(),
                expected: self.z.nrows(),
            });
        }

        if let Some(act_fn) = &self.act_fn {
            d.zip_mut_with(&self.z, |d, &z| *d *= act_fn.df(z));
        }

        let (mut dw, mut db) = self.view_grad(grad)?;
        linalg::general_mat_mul(1.0, &self.x.t(), &d, 0.0, &mut dw);
        db.assign(&d.sum_axis(Axis(0)));

        let (w, _) = self.view_params(params)?;
        Ok(d.dot(&w.t()))
    }

    fn weighted_sum(&self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>> {
        if x.ncols() != self.dim.0 {
            return Err(ForecastErr::DimensionMismatch {
                what: "layer input width",
                got: x.ncols(),
                expected: self.dim.0,
            });
        }

        let (w, b) = self.view_params(params)?;
        let mut z = x.dot(&w);
        z += &b;
        Ok(z)
    }

    fn activate(&self, z: Array2<f32>) -> Array2<f32> {
        match &self.act_fn {
            Some(act_fn) => z.mapv_into(|z| act_fn.f(z)),
            None => z,
        }
    }

    /// Gives a view of the raw gradient slice as the delta weights and delta biases of this layer.
    fn view_grad<'a>(
        &self,
        grad: &'a mut [f32],
    ) -> Result<(ArrayViewMut2<'a, f32>, ArrayViewMut1<'a, f32>)> {
        self.check_slice("gradient", grad.len())?;

        let w_size = self.size - self.dim.1;
        let (dw_raw, db_raw) = grad.split_at_mut(w_size);
        let dw = ArrayViewMut2::from_shape(self.dim, dw_raw).map_err(shape_err)?;
        let db = ArrayViewMut1::from_shape(self.dim.1, db_raw).map_err(shape_err)?;
        Ok((dw, db))
    }

    /// Gives a view of the raw parameter slice as the weights and biases of this layer.
    fn view_params<'a>(
        &self,
        params: &'a [f32],
    ) -> Result<(ArrayView2<'a, f32>, ArrayView1<'a, f32>)> {
        self.check_slice("parameters", params.len())?;

        let w_size = self.size - self.dim.1;
        let (w_raw, b_raw) = params.split_at(w_size);
        let weights = ArrayView2::from_shape(self.dim, w_raw).map_err(shape_err)?;
        let biases = ArrayView1::from_shape(self.dim.1, b_raw).map_err(shape_err)?;
        Ok((weights, biases))
    }

    fn check_slice(&self, what: &'static str, got: usize) -> Result<()> {
        if got != self.size {
            return Err(ForecastErr::DimensionMismatch {
                what,
                got,
                expected: self.size,
            });
        }

        Ok(())
    }
}

fn shape_err(e: ndarray::ShapeError) -> ForecastErr {
    ForecastErr::config(format!("dense layer shape: {e}"))
}
