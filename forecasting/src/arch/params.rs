use std::mem;

use crate::{Result, optimization::Optimizer};

/// Owns the parameters of a model and the gradient buffer of its last backward pass.
///
/// Every layer's parameters live contiguously in a single flat buffer, in layer order.
/// Layers borrow their slice through a `FrontIter` on the forward pass and through a
/// `BackIter` (which also lends the matching gradient slice) on the backward pass.
#[derive(Debug, Clone)]
pub struct ParamStore {
    params: Vec<f32>,
    grad: Vec<f32>,
}

impl ParamStore {
    /// Creates a new `ParamStore` with a zeroed gradient.
    pub fn new(params: Vec<f32>) -> Self {
        let grad = vec![0.; params.len()];
        Self { params, grad }
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn params(&self) -> &[f32] {
        &self.params
    }

    pub fn grad(&self) -> &[f32] {
        &self.grad
    }

    /// Resets the gradient buffer, call before each backward pass.
    pub fn zero_grad(&mut self) {
        self.grad.fill(0.);
    }

    /// Creates an iterator over the parameters in layer order.
    pub fn front(&self) -> FrontIter<'_> {
        FrontIter {
            params: &self.params,
        }
    }

    /// Creates an iterator over the parameters and gradients in reverse layer order.
    pub fn back(&mut self) -> BackIter<'_> {
        BackIter {
            params: &self.params,
            grad: &mut self.grad,
        }
    }

    /// Applies one optimizer step with the current gradient.
    pub fn optimize<O>(&mut self, optimizer: &mut O) -> Result<()>
    where
        O: Optimizer + ?Sized,
    {
        optimizer.update_params(&self.grad, &mut self.params)
    }
}

/// The forward parameter iterator.
pub struct FrontIter<'pm> {
    params: &'pm [f32],
}

impl<'pm> FrontIter<'pm> {
    /// Takes the next `n` parameters.
    ///
    /// # Returns
    /// A slice of parameters or `None` if fewer than `n` remain.
    pub fn take(&mut self, n: usize) -> Option<&'pm [f32]> {
        if n > self.params.len() {
            return None;
        }

        let (head, tail) = self.params.split_at(n);
        self.params = tail;
        Some(head)
    }
}

/// The reversed parameter and gradient iterator.
pub struct BackIter<'pm> {
    params: &'pm [f32],
    grad: &'pm mut [f32],
}

impl<'pm> BackIter<'pm> {
    /// Takes the last `n` parameters along with their gradient slice.
    ///
    /// # Returns
    /// A tuple of (params, grad) or `None` if fewer than `n` remain.
    pub fn take(&mut self, n: usize) -> Option<(&'pm [f32], &'pm mut [f32])> {
        let len = self.params.len();
        if n > len {
            return None;
        }

        let (params_head, params_tail) = self.params.split_at(len - n);
        self.params = params_head;

        let grad = mem::take(&mut self.grad);
        let (grad_head, grad_tail) = grad.split_at_mut(len - n);
        self.grad = grad_head;

        Some((params_tail, grad_tail))
    }
}
