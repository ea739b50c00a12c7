//! The Type Classifier: the single predicate every other rewriter in this pass consults.

use crate::ast::TypeDescriptor;

/// True iff `ty` is complex, a vector of complex, or (recursing one level) an array whose
/// element type requires remapping.
pub fn requires_remapping(ty: &TypeDescriptor) -> bool {
    if ty.is_complex() {
        return true;
    }
    if ty.is_vector() {
        return ty
            .element_type()
            .map(|e| e.is_complex())
            .unwrap_or(false);
    }
    if ty.is_array() {
        return ty
            .element_type()
            .map(|e| requires_remapping(&e))
            .unwrap_or(false);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Primitive;

    #[test]
    fn scalar_complex_requires_remapping() {
        assert!(requires_remapping(&TypeDescriptor::primitive(
            Primitive::Complex32
        )));
    }

    #[test]
    fn scalar_float_does_not() {
        assert!(!requires_remapping(&TypeDescriptor::primitive(
            Primitive::Float32
        )));
    }

    #[test]
    fn vector_of_complex_requires_remapping() {
        assert!(requires_remapping(&TypeDescriptor::vector(
            Primitive::Complex64,
            4
        )));
    }

    #[test]
    fn vector_of_float_does_not() {
        assert!(!requires_remapping(&TypeDescriptor::vector(
            Primitive::Float32,
            4
        )));
    }

    #[test]
    fn array_of_vector_of_complex_requires_remapping() {
        let t = TypeDescriptor::array(TypeDescriptor::vector(Primitive::Complex32, 4), 8);
        assert!(requires_remapping(&t));
    }

    #[test]
    fn array_of_complex_scalar_requires_remapping() {
        let t = TypeDescriptor::array(TypeDescriptor::primitive(Primitive::Complex32), 8);
        assert!(requires_remapping(&t));
    }

    #[test]
    fn array_of_float_does_not() {
        let t = TypeDescriptor::array(TypeDescriptor::primitive(Primitive::Float32), 8);
        assert!(!requires_remapping(&t));
    }
}
