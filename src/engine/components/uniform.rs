use crate::engine::utils::math::{ Mat3x3, Mat4x4 };

/// Every value shape a uniform can be set to.
///
/// Array variants borrow their data, so building a value never allocates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue<'a> {
    Bool(bool),
    Int(i32),
    Int2([i32; 2]),
    Int3([i32; 3]),
    Int4([i32; 4]),
    UInt(u32),
    UInt2([u32; 2]),
    UInt3([u32; 3]),
    UInt4([u32; 4]),
    Float(f32),
    Float2([f32; 2]),
    Float3([f32; 3]),
    Float4([f32; 4]),
    IntArray(&'a [i32]),
    Int2Array(&'a [[i32; 2]]),
    Int3Array(&'a [[i32; 3]]),
    Int4Array(&'a [[i32; 4]]),
    UIntArray(&'a [u32]),
    UInt2Array(&'a [[u32; 2]]),
    UInt3Array(&'a [[u32; 3]]),
    UInt4Array(&'a [[u32; 4]]),
    FloatArray(&'a [f32]),
    Float2Array(&'a [[f32; 2]]),
    Float3Array(&'a [[f32; 3]]),
    Float4Array(&'a [[f32; 4]]),
    Mat3 {
        values: &'a [Mat3x3],
        transpose: bool,
    },
    Mat4 {
        values: &'a [Mat4x4],
        transpose: bool,
    },
}

impl<'a> UniformValue<'a> {
    /// A row-major matrix from `engine::utils::math`.
    pub fn mat4(value: &'a Mat4x4) -> Self {
        UniformValue::Mat4 { values: std::slice::from_ref(value), transpose: true }
    }

    pub fn mat4_column_major(value: &'a Mat4x4) -> Self {
        UniformValue::Mat4 { values: std::slice::from_ref(value), transpose: false }
    }

    pub fn mat3(value: &'a Mat3x3) -> Self {
        UniformValue::Mat3 { values: std::slice::from_ref(value), transpose: true }
    }

    /// Number of array elements written (1 for scalars and vectors).
    pub fn count(&self) -> usize {
        match self {
            UniformValue::IntArray(v) => v.len(),
            UniformValue::Int2Array(v) => v.len(),
            UniformValue::Int3Array(v) => v.len(),
            UniformValue::Int4Array(v) => v.len(),
            UniformValue::UIntArray(v) => v.len(),
            UniformValue::UInt2Array(v) => v.len(),
            UniformValue::UInt3Array(v) => v.len(),
            UniformValue::UInt4Array(v) => v.len(),
            UniformValue::FloatArray(v) => v.len(),
            UniformValue::Float2Array(v) => v.len(),
            UniformValue::Float3Array(v) => v.len(),
            UniformValue::Float4Array(v) => v.len(),
            UniformValue::Mat3 { values, .. } => values.len(),
            UniformValue::Mat4 { values, .. } => values.len(),
            _ => 1,
        }
    }

    /// GLSL type name of one element, for diagnostics.
    pub fn glsl_type(&self) -> &'static str {
        match self {
            UniformValue::Bool(_) => "bool",
            UniformValue::Int(_) | UniformValue::IntArray(_) => "int",
            UniformValue::Int2(_) | UniformValue::Int2Array(_) => "ivec2",
            UniformValue::Int3(_) | UniformValue::Int3Array(_) => "ivec3",
            UniformValue::Int4(_) | UniformValue::Int4Array(_) => "ivec4",
            UniformValue::UInt(_) | UniformValue::UIntArray(_) => "uint",
            UniformValue::UInt2(_) | UniformValue::UInt2Array(_) => "uvec2",
            UniformValue::UInt3(_) | UniformValue::UInt3Array(_) => "uvec3",
            UniformValue::UInt4(_) | UniformValue::UInt4Array(_) => "uvec4",
            UniformValue::Float(_) | UniformValue::FloatArray(_) => "float",
            UniformValue::Float2(_) | UniformValue::Float2Array(_) => "vec2",
            UniformValue::Float3(_) | UniformValue::Float3Array(_) => "vec3",
            UniformValue::Float4(_) | UniformValue::Float4Array(_) => "vec4",
            UniformValue::Mat3 { .. } => "mat3",
            UniformValue::Mat4 { .. } => "mat4",
        }
    }
}

macro_rules! impl_from_for_uniform {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for UniformValue<'_> {
                fn from(value: $ty) -> Self {
                    UniformValue::$variant(value)
                }
            }
        )*
    };
}

macro_rules! impl_from_slice_for_uniform {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a [$ty]> for UniformValue<'a> {
                fn from(value: &'a [$ty]) -> Self {
                    UniformValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_uniform! {
    bool => Bool,
    i32 => Int,
    [i32; 2] => Int2,
    [i32; 3] => Int3,
    [i32; 4] => Int4,
    u32 => UInt,
    [u32; 2] => UInt2,
    [u32; 3] => UInt3,
    [u32; 4] => UInt4,
    f32 => Float,
    [f32; 2] => Float2,
    [f32; 3] => Float3,
    [f32; 4] => Float4,
}

impl_from_slice_for_uniform! {
    i32 => IntArray,
    [i32; 2] => Int2Array,
    [i32; 3] => Int3Array,
    [i32; 4] => Int4Array,
    u32 => UIntArray,
    [u32; 2] => UInt2Array,
    [u32; 3] => UInt3Array,
    [u32; 4] => UInt4Array,
    f32 => FloatArray,
    [f32; 2] => Float2Array,
    [f32; 3] => Float3Array,
    [f32; 4] => Float4Array,
}

impl<'a> From<&'a Mat4x4> for UniformValue<'a> {
    fn from(value: &'a Mat4x4) -> Self {
        UniformValue::mat4(value)
    }
}

impl<'a> From<&'a Mat3x3> for UniformValue<'a> {
    fn from(value: &'a Mat3x3) -> Self {
        UniformValue::mat3(value)
    }
}
