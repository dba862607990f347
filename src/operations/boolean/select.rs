/// The type of boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Union,
    Intersection,
    /// A less B.
    Difference,
    Xor,
}

impl BooleanOp {
    /// Decides whether a region belongs to the result, given whether it
    /// belongs to A and to B.
    ///
    /// | in A | in B | Union | Intersection | Difference | Xor |
    /// |------|------|-------|--------------|------------|-----|
    /// | no   | no   | no    | no           | no         | no  |
    /// | yes  | no   | yes   | no           | yes        | yes |
    /// | no   | yes  | yes   | no           | no         | yes |
    /// | yes  | yes  | yes   | yes          | no         | no  |
    #[must_use]
    pub fn keep(self, in_a: bool, in_b: bool) -> bool {
        match self {
            BooleanOp::Union => in_a || in_b,
            BooleanOp::Intersection => in_a && in_b,
            BooleanOp::Difference => in_a && !in_b,
            BooleanOp::Xor => in_a != in_b,
        }
    }

    /// [`BooleanOp::keep`] over a two-operand membership slice.
    pub(crate) fn keep_members(self, members: &[bool]) -> bool {
        match members {
            [a, b] => self.keep(*a, *b),
            _ => false,
        }
    }
}
