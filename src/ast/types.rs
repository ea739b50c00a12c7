//! Type descriptors for the resolved AST.
//!
//! A [`TypeDescriptor`] is an immutable value describing a source-language type. It is the
//! input the complex-lowering pass inspects to decide whether a node needs rewriting; nothing
//! in this module allocates into the [`super::arena::Allocator`].

/// A scalar (non-aggregate) primitive type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
    Complex32,
    Complex64,
}

impl Primitive {
    /// Precision in bits, for the float-family primitives (including complex).
    pub fn precision_bits(self) -> Option<u8> {
        match self {
            Primitive::Float32 | Primitive::Complex32 => Some(32),
            Primitive::Float64 | Primitive::Complex64 => Some(64),
            _ => None,
        }
    }

    /// The real-valued float primitive with the same precision as this complex primitive.
    pub fn real_equivalent(self) -> Option<Primitive> {
        match self {
            Primitive::Complex32 => Some(Primitive::Float32),
            Primitive::Complex64 => Some(Primitive::Float64),
            _ => None,
        }
    }

    pub fn is_complex(self) -> bool {
        matches!(self, Primitive::Complex32 | Primitive::Complex64)
    }
}

/// The shape of a [`TypeDescriptor`], ignoring reference/const qualifiers.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeShape {
    Primitive(Primitive),
    /// A fixed-width SIMD vector of a scalar primitive.
    Vector { element: Primitive, size: u32 },
    /// A fixed-length array of some element type, one level of nesting.
    Array {
        element: Box<TypeDescriptor>,
        length: u32,
    },
}

/// An immutable description of a resolved source-language type.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDescriptor {
    pub shape: TypeShape,
    pub is_reference: bool,
    pub is_const: bool,
}

impl TypeDescriptor {
    pub fn primitive(p: Primitive) -> Self {
        TypeDescriptor {
            shape: TypeShape::Primitive(p),
            is_reference: false,
            is_const: false,
        }
    }

    pub fn vector(element: Primitive, size: u32) -> Self {
        TypeDescriptor {
            shape: TypeShape::Vector { element, size },
            is_reference: false,
            is_const: false,
        }
    }

    pub fn array(element: TypeDescriptor, length: u32) -> Self {
        TypeDescriptor {
            shape: TypeShape::Array {
                element: Box::new(element),
                length,
            },
            is_reference: false,
            is_const: false,
        }
    }

    pub fn as_reference(mut self) -> Self {
        self.is_reference = true;
        self
    }

    pub fn as_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    /// Strip reference and const qualifiers, keeping the underlying shape.
    pub fn stripped(&self) -> TypeDescriptor {
        TypeDescriptor {
            shape: self.shape.clone(),
            is_reference: false,
            is_const: false,
        }
    }

    /// Equality that ignores `const`/reference qualifiers, per the Cast Synthesizer's rule.
    pub fn equals_ignoring_qualifiers(&self, other: &TypeDescriptor) -> bool {
        self.shape == other.shape
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.shape, TypeShape::Primitive(_))
    }

    pub fn is_vector(&self) -> bool {
        matches!(self.shape, TypeShape::Vector { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self.shape, TypeShape::Array { .. })
    }

    /// True for a bare (non-vector) complex scalar.
    pub fn is_complex(&self) -> bool {
        matches!(self.shape, TypeShape::Primitive(p) if p.is_complex())
    }

    pub fn is_complex32(&self) -> bool {
        matches!(self.shape, TypeShape::Primitive(Primitive::Complex32))
    }

    pub fn is_complex64(&self) -> bool {
        matches!(self.shape, TypeShape::Primitive(Primitive::Complex64))
    }

    /// The vector width of this type: the declared size for a vector, 1 for a scalar, and
    /// undefined (`None`) for an array (callers recurse into the element first).
    pub fn vector_width(&self) -> Option<u32> {
        match &self.shape {
            TypeShape::Vector { size, .. } => Some(*size),
            TypeShape::Primitive(_) => Some(1),
            TypeShape::Array { .. } => None,
        }
    }

    pub fn array_length(&self) -> Option<u32> {
        match &self.shape {
            TypeShape::Array { length, .. } => Some(*length),
            _ => None,
        }
    }

    pub fn element_type(&self) -> Option<TypeDescriptor> {
        match &self.shape {
            TypeShape::Array { element, .. } => Some((**element).clone()),
            TypeShape::Vector { element, .. } => Some(TypeDescriptor::primitive(*element)),
            TypeShape::Primitive(_) => None,
        }
    }

    /// `(precisionBits, vectorSize)` if this type requires complex-lowering, recursing one level
    /// into an array element per the Type Classifier's rule. `None` if the type never bottoms
    /// out at a complex primitive.
    pub fn remap_key(&self) -> Option<(u8, u32)> {
        match &self.shape {
            TypeShape::Primitive(p) if p.is_complex() => Some((p.precision_bits().unwrap(), 1)),
            TypeShape::Vector { element, size } if element.is_complex() => {
                Some((element.precision_bits().unwrap(), *size))
            }
            TypeShape::Array { element, .. } => element.remap_key(),
            _ => None,
        }
    }
}
