use crate::{ScalarGraph, ScalarOp, Value, ValueId};

impl ScalarGraph {
    pub fn add(&self, lhs: ValueId, rhs: ValueId) -> ValueId {
        let data = self.data(lhs) + self.data(rhs);
        self.push(data, ScalarOp::Add, vec![lhs, rhs])
    }

    pub fn mul(&self, lhs: ValueId, rhs: ValueId) -> ValueId {
        let data = self.data(lhs) * self.data(rhs);
        self.push(data, ScalarOp::Mul, vec![lhs, rhs])
    }

    /// `lhs ^ exponent`. The exponent is a constant and receives no gradient;
    /// `0 ^ negative` yields infinity rather than an error.
    pub fn pow(&self, lhs: ValueId, exponent: f64) -> ValueId {
        let data = self.data(lhs).powf(exponent);
        self.push(data, ScalarOp::Pow(exponent), vec![lhs])
    }

    /// `max(0, lhs)`; a NaN input stays NaN.
    pub fn relu(&self, lhs: ValueId) -> ValueId {
        let x = self.data(lhs);
        let data = if x > 0.0 || x.is_nan() { x } else { 0.0 };
        self.push(data, ScalarOp::Relu, vec![lhs])
    }

    pub fn exp(&self, lhs: ValueId) -> ValueId {
        let data = self.data(lhs).exp();
        self.push(data, ScalarOp::Exp, vec![lhs])
    }

    pub fn tanh(&self, lhs: ValueId) -> ValueId {
        let data = self.data(lhs).tanh();
        self.push(data, ScalarOp::Tanh, vec![lhs])
    }

    // derived

    pub fn neg(&self, lhs: ValueId) -> ValueId {
        let minus_one = self.leaf(-1.0).id();
        self.mul(lhs, minus_one)
    }

    pub fn sub(&self, lhs: ValueId, rhs: ValueId) -> ValueId {
        let negated = self.neg(rhs);
        self.add(lhs, negated)
    }

    pub fn div(&self, lhs: ValueId, rhs: ValueId) -> ValueId {
        let reciprocal = self.pow(rhs, -1.0);
        self.mul(lhs, reciprocal)
    }

    /// Left-folded sum of `values`; an empty slice yields a zero constant.
    pub fn sum(&self, values: &[ValueId]) -> ValueId {
        match values.split_first() {
            Some((&first, rest)) => rest.iter().fold(first, |acc, &v| self.add(acc, v)),
            None => self.leaf(0.0).id(),
        }
    }
}

impl<'g> Value<'g> {
    pub fn add(self, rhs: Value<'g>) -> Value<'g> {
        debug_assert!(self.same_graph(&rhs), "operands belong to different graphs");
        self.graph.value(self.graph.add(self.id, rhs.id))
    }

    pub fn mul(self, rhs: Value<'g>) -> Value<'g> {
        debug_assert!(self.same_graph(&rhs), "operands belong to different graphs");
        self.graph.value(self.graph.mul(self.id, rhs.id))
    }

    pub fn pow(self, exponent: f64) -> Value<'g> {
        self.graph.value(self.graph.pow(self.id, exponent))
    }

    pub fn relu(self) -> Value<'g> {
        self.graph.value(self.graph.relu(self.id))
    }

    pub fn exp(self) -> Value<'g> {
        self.graph.value(self.graph.exp(self.id))
    }

    pub fn tanh(self) -> Value<'g> {
        self.graph.value(self.graph.tanh(self.id))
    }

    pub fn neg(self) -> Value<'g> {
        self.mul(self.constant(-1.0))
    }

    pub fn sub(self, rhs: Value<'g>) -> Value<'g> {
        self.add(rhs.neg())
    }

    pub fn div(self, rhs: Value<'g>) -> Value<'g> {
        self.mul(rhs.pow(-1.0))
    }
}
