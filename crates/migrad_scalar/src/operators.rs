use crate::Value;
use paste::paste;
use std::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! impl_binary_operator {
    ($trait:ident) => {
        paste! {
            impl<'g> $trait<Value<'g>> for Value<'g> {
                type Output = Value<'g>;

                fn [<$trait:lower>](self, rhs: Value<'g>) -> Self::Output {
                    Value::[<$trait:lower>](self, rhs)
                }
            }

            impl<'g> $trait<f64> for Value<'g> {
                type Output = Value<'g>;

                fn [<$trait:lower>](self, rhs: f64) -> Self::Output {
                    let rhs = self.constant(rhs);
                    Value::[<$trait:lower>](self, rhs)
                }
            }

            impl<'g> $trait<Value<'g>> for f64 {
                type Output = Value<'g>;

                fn [<$trait:lower>](self, rhs: Value<'g>) -> Self::Output {
                    let lhs = rhs.constant(self);
                    Value::[<$trait:lower>](lhs, rhs)
                }
            }
        }
    };
}

impl_binary_operator!(Add);
impl_binary_operator!(Sub);
impl_binary_operator!(Mul);
impl_binary_operator!(Div);

impl<'g> Neg for Value<'g> {
    type Output = Value<'g>;

    fn neg(self) -> Self::Output {
        Value::neg(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::ScalarGraph;

    #[test]
    fn mixed_operands() {
        let graph = ScalarGraph::new();
        let x = graph.leaf(4.0);

        assert_eq!((x + 1.0).data(), 5.0);
        assert_eq!((1.0 - x).data(), -3.0);
        assert_eq!((x * 2.0).data(), 8.0);
        assert_eq!((2.0 / x).data(), 0.5);
        assert_eq!((-x).data(), -4.0);
    }
}
