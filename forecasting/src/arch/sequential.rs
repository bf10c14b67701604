use ndarray::{Array2, ArrayView2};
use rand::Rng;

use super::{
    Model, ParamInit, ParamStore, PassStats, activations::ActFn, layers::Dense, loss::LossFn,
};
use crate::{ForecastErr, Result, optimization::Optimizer};

/// A sequential model: information flows forward when computing an output and backward when
/// computing the *deltas* of its layers.
#[derive(Debug, Clone)]
pub struct Sequential {
    layers: Vec<Dense>,
    params: ParamStore,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    /// * `params` - The flat parameters of every layer, in layer order.
    ///
    /// # Returns
    /// A new `Sequential` or an error if the layers don't chain or the parameter count is off.
    pub fn new<I>(layers: I, params: Vec<f32>) -> Result<Self>
    where
        I: IntoIterator<Item = Dense>,
    {
        let layers: Vec<Dense> = layers.into_iter().collect();

        if layers.is_empty() {
            return Err(ForecastErr::config("model must have at least one layer"));
        }

        if let Some(i) = layers
            .iter()
            .position(|layer| layer.dim().0 == 0 || layer.dim().1 == 0)
        {
            return Err(ForecastErr::config(format!(
                "layer {i}: widths must be greater than 0, got {:?}",
                layers[i].dim()
            )));
        }

        // Adjacent layers must have compatible dimensions: prev.out == next.in
        for (i, pair) in layers.windows(2).enumerate() {
            let (_, prev_out) = pair[0].dim();
            let (next_in, _) = pair[1].dim();

            if prev_out != next_in {
                return Err(ForecastErr::config(format!(
                    "layer {}: input size ({next_in}) does not match previous layer output size ({prev_out})",
                    i + 1
                )));
            }
        }

        let size: usize = layers.iter().map(Dense::size).sum();
        if params.len() != size {
            return Err(ForecastErr::DimensionMismatch {
                what: "model parameters",
                got: params.len(),
                expected: size,
            });
        }

        Ok(Self {
            layers,
            params: ParamStore::new(params),
        })
    }

    /// Creates a multi-layer perceptron out of the widths of its layers.
    ///
    /// `widths = [n_0, ..., n_k]` builds `k` dense layers, layer `j` mapping `n_j` values to
    /// `n_{j+1}`. Every layer but the last is followed by `act_fn`, the output is linear.
    ///
    /// # Arguments
    /// * `widths` - The input width, the hidden widths and the output width.
    /// * `act_fn` - The activation of the hidden layers.
    /// * `init` - How the weights are drawn, biases start at zero.
    /// * `rng` - A random number generator.
    pub fn mlp<R>(widths: &[usize], act_fn: ActFn, init: ParamInit, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        if widths.len() < 2 {
            return Err(ForecastErr::config(format!(
                "an mlp needs at least an input and an output width, got {widths:?}"
            )));
        }

        let nlayers = widths.len() - 1;
        let mut layers = Vec::with_capacity(nlayers);
        let mut params = Vec::new();

        for (i, pair) in widths.windows(2).enumerate() {
            let (fan_in, fan_out) = (pair[0], pair[1]);
            let layer_act_fn = (i + 1 < nlayers).then_some(act_fn);

            params.extend(init.sample(rng, fan_in, fan_out)?);
            params.extend(std::iter::repeat_n(0., fan_out));
            layers.push(Dense::new((fan_in, fan_out), layer_act_fn));
        }

        Self::new(layers, params)
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Makes a forward pass through the network, keeping what `backward` needs.
    ///
    /// # Arguments
    /// * `x` - The input data, one sample per row.
    ///
    /// # Returns
    /// The prediction for the given input or an error if occurred.
    pub fn forward(&mut self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_input(&x)?;

        let mut front = self.params.front();
        let nlayers = self.layers.len();
        let mut a = x.to_owned();

        for (i, layer) in self.layers.iter_mut().enumerate() {
            let params = front.take(layer.size()).ok_or(ForecastErr::DimensionMismatch {
                what: "layers",
                got: i,
                expected: nlayers,
            })?;

            a = layer.forward(params, a.view())?;
        }

        Ok(a)
    }

    /// Propagates `d`, the derivative of the loss with respect to the last output, back
    /// through every layer, leaving the parameters' gradient in the store.
    fn backward(&mut self, mut d: Array2<f32>) -> Result<()> {
        let nlayers = self.layers.len();

        self.params.zero_grad();
        let mut back = self.params.back();

        for (i, layer) in self.layers.iter().rev().enumerate() {
            let (params, grad) = back.take(layer.size()).ok_or(ForecastErr::DimensionMismatch {
                what: "layers",
                got: i,
                expected: nlayers,
            })?;

            d = layer.backward(params, grad, d)?;
        }

        Ok(())
    }

    fn check_input(&self, x: &ArrayView2<f32>) -> Result<()> {
        let expected = self.input_size();

        if x.ncols() != expected {
            return Err(ForecastErr::DimensionMismatch {
                what: "model input width",
                got: x.ncols(),
                expected,
            });
        }

        Ok(())
    }
}

impl Model for Sequential {
    fn size(&self) -> usize {
        self.params.len()
    }

    /// Returns the flat parameters of every layer, in layer order.
    fn params(&self) -> &[f32] {
        self.params.params()
    }

    fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.dim().0)
    }

    fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.dim().1)
    }

    fn predict(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_input(&x)?;

        let mut front = self.params.front();
        let nlayers = self.layers.len();
        let mut a = x.to_owned();

        for (i, layer) in self.layers.iter().enumerate() {
            let params = front.take(layer.size()).ok_or(ForecastErr::DimensionMismatch {
                what: "layers",
                got: i,
                expected: nlayers,
            })?;

            a = layer.predict(params, a.view())?;
        }

        Ok(a)
    }

    fn backprop<O, L, I>(&mut self, optimizer: &mut O, loss_fn: &L, batches: I) -> Result<PassStats>
    where
        O: Optimizer + ?Sized,
        L: LossFn + ?Sized,
        I: Iterator<Item = (Array2<f32>, Array2<f32>)>,
    {
        let mut stats = PassStats::default();

        for (x, y) in batches {
            let y_pred = self.forward(x.view())?;
            let loss = loss_fn.loss(y_pred.view(), y.view())?;
            let d = loss_fn.loss_prime(y_pred.view(), y.view())?;

            self.backward(d)?;
            self.params.optimize(optimizer)?;
            stats.record(loss, x.nrows());
        }

        if stats.batches() == 0 {
            return Err(ForecastErr::EmptyDataset("training"));
        }

        Ok(stats)
    }

    fn evaluate<L, I>(&self, loss_fn: &L, batches: I) -> Result<PassStats>
    where
        L: LossFn + ?Sized,
        I: Iterator<Item = (Array2<f32>, Array2<f32>)>,
    {
        let mut stats = PassStats::default();

        for (x, y) in batches {
            let y_pred = self.predict(x.view())?;
            stats.record(loss_fn.loss(y_pred.view(), y.view())?, x.nrows());
        }

        if stats.batches() == 0 {
            return Err(ForecastErr::EmptyDataset("evaluation"));
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arch::loss::Mse, optimization::GradientDescent};
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    fn mlp(widths: &[usize]) -> Sequential {
        let mut rng = StdRng::seed_from_u64(5);
        Sequential::mlp(widths, ActFn::tanh(), ParamInit::XavierUniform, &mut rng).unwrap()
    }

    #[test]
    fn mlp_allocates_one_layer_per_width_pair() {
        let model = mlp(&[4, 8, 3, 1]);

        assert_eq!(model.layers().len(), 3);
        assert_eq!(model.size(), (4 + 1) * 8 + (8 + 1) * 3 + (3 + 1) * 1);
        assert_eq!(model.input_size(), 4);
        assert_eq!(model.output_size(), 1);

        let act_fns: Vec<_> = model.layers().iter().map(|l| l.act_fn().is_some()).collect();
        assert_eq!(act_fns, [true, true, false]);
    }

    #[test]
    fn invalid_widths_fail() {
        let mut rng = StdRng::seed_from_u64(0);

        let cases: [&[usize]; 3] = [&[3], &[], &[3, 0, 1]];

        for widths in cases {
            assert!(matches!(
                Sequential::mlp(widths, ActFn::tanh(), ParamInit::default(), &mut rng),
                Err(ForecastErr::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn zero_width_layers_fail() {
        let cases = [
            vec![Dense::new((0, 2), None)],
            vec![Dense::new((2, 0), Some(ActFn::tanh())), Dense::new((0, 1), None)],
        ];

        for layers in cases {
            let size = layers.iter().map(Dense::size).sum();
            assert!(matches!(
                Sequential::new(layers, vec![0.; size]),
                Err(ForecastErr::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn unchained_layers_fail() {
        let layers = [Dense::new((2, 3), None), Dense::new((4, 1), None)];
        assert!(matches!(
            Sequential::new(layers, vec![0.; 9 + 5]),
            Err(ForecastErr::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn predict_is_deterministic() {
        let model = mlp(&[3, 5, 1]);
        let x = array![[0.1_f32, 0.2, 0.3], [-1.0, 0.0, 1.0]];

        let a = model.predict(x.view()).unwrap();
        let b = model.predict(x.view()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dim(), (2, 1));
    }

    #[test]
    fn training_forward_agrees_with_predict() {
        let mut model = mlp(&[3, 5, 2]);
        let x = array![[0.1_f32, 0.2, 0.3]];

        let expected = model.predict(x.view()).unwrap();
        assert_eq!(model.forward(x.view()).unwrap(), expected);
    }

    #[test]
    fn wrong_input_width_fails() {
        let model = mlp(&[3, 5, 1]);
        let x = array![[0.1_f32, 0.2]];

        assert_eq!(
            model.predict(x.view()).unwrap_err(),
            ForecastErr::DimensionMismatch {
                what: "model input width",
                got: 2,
                expected: 3,
            }
        );
    }

    #[test]
    fn hidden_layers_use_tanh_and_output_is_linear() {
        // w1 = [[1]], b1 = [0], w2 = [[2]], b2 = [1]
        let layers = [
            Dense::new((1, 1), Some(ActFn::tanh())),
            Dense::new((1, 1), None),
        ];
        let model = Sequential::new(layers, vec![1., 0., 2., 1.]).unwrap();

        let y = model.predict(array![[0.5_f32]].view()).unwrap();
        assert!((y[[0, 0]] - (2. * 0.5_f32.tanh() + 1.)).abs() < 1e-6);
    }

    #[test]
    fn backprop_reduces_loss_on_a_fixed_batch() {
        let mut model = mlp(&[2, 4, 1]);
        let mut optimizer = GradientDescent::new(0.1);
        let x = array![[0.0_f32, 1.0], [1.0, 0.0], [0.5, 0.5]];
        let y = array![[1.0_f32], [-1.0], [0.0]];

        let first = model
            .backprop(&mut optimizer, &Mse, std::iter::once((x.clone(), y.clone())))
            .unwrap();

        let mut last = first;
        for _ in 0..200 {
            last = model
                .backprop(&mut optimizer, &Mse, std::iter::once((x.clone(), y.clone())))
                .unwrap();
        }

        assert_eq!(first.batches(), 1);
        assert!(last.loss() < first.loss());
    }

    #[test]
    fn evaluate_leaves_parameters_untouched() {
        let model = mlp(&[2, 3, 1]);
        let before = model.params().to_vec();
        let batch = (array![[0.3_f32, 0.1]], array![[2.0_f32]]);

        let stats = model.evaluate(&Mse, std::iter::once(batch)).unwrap();

        assert!(stats.loss() >= 0.);
        assert_eq!(model.params(), &before[..]);
    }
}
