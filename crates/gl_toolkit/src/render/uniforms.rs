//! Shader uniform values passed across the rendering boundary
//!
//! The toolkit never talks to a graphics API. Cameras and materials describe
//! the uniforms they need as [`UniformValue`]s and hand them to a
//! [`UniformSink`], which the render glue implements over its shader program.
//! The variant decides which upload call the sink makes; nothing is inferred
//! from the size of a buffer at runtime.

use crate::foundation::math::{Mat3, Mat4, Vec3};

/// A single uniform value with a statically known shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// Integer scalar, also used for sampler units
    Int(i32),
    /// Float scalar
    Float(f32),
    /// Three-component float vector
    Vec3(Vec3),
    /// 3x3 float matrix
    Mat3(Mat3),
    /// 4x4 float matrix
    Mat4(Mat4),
}

impl UniformValue {
    /// `(rows, columns)` of the value; scalars are `(1, 1)`, vectors `(3, 1)`
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Self::Int(_) | Self::Float(_) => (1, 1),
            Self::Vec3(_) => (3, 1),
            Self::Mat3(_) => (3, 3),
            Self::Mat4(_) => (4, 4),
        }
    }

    /// Tensor rank: 0 for scalars, 1 for vectors, 2 for matrices
    pub fn rank(&self) -> usize {
        match self {
            Self::Int(_) | Self::Float(_) => 0,
            Self::Vec3(_) => 1,
            Self::Mat3(_) | Self::Mat4(_) => 2,
        }
    }

    /// Float components in column-major order, ready for an untransposed upload
    ///
    /// Returns `None` for integer values.
    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            Self::Int(_) => None,
            Self::Float(value) => Some(std::slice::from_ref(value)),
            Self::Vec3(v) => Some(v.as_slice()),
            Self::Mat3(m) => Some(m.as_slice()),
            Self::Mat4(m) => Some(m.as_slice()),
        }
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<Vec3> for UniformValue {
    fn from(value: Vec3) -> Self {
        Self::Vec3(value)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(value: [f32; 3]) -> Self {
        Self::Vec3(Vec3::from(value))
    }
}

impl From<Mat3> for UniformValue {
    fn from(value: Mat3) -> Self {
        Self::Mat3(value)
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        Self::Mat4(value)
    }
}

/// Receiver of named uniform values, implemented by the render glue
pub trait UniformSink {
    /// Set the uniform called `name` to `value`
    fn set_uniform(&mut self, name: &str, value: UniformValue);
}

/// Sink that records every uniform it receives, latest value wins
impl UniformSink for std::collections::HashMap<String, UniformValue> {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_shapes_and_ranks() {
        assert_eq!(UniformValue::from(1_i32).shape(), (1, 1));
        assert_eq!(UniformValue::from(1.5_f32).rank(), 0);
        assert_eq!(UniformValue::from([1.0_f32, 2.0, 3.0]).shape(), (3, 1));
        assert_eq!(UniformValue::from(Mat3::identity()).shape(), (3, 3));
        assert_eq!(UniformValue::from(Mat4::identity()).rank(), 2);
    }

    #[test]
    fn test_matrix_floats_are_column_major() {
        let m = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        let value = UniformValue::from(m);
        let floats = value.as_floats().unwrap();
        assert_eq!(floats.len(), 16);
        // Translation lives in the last column
        assert_eq!(&floats[12..15], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_int_has_no_float_view() {
        assert!(UniformValue::Int(3).as_floats().is_none());
    }

    #[test]
    fn test_hashmap_sink_keeps_latest_value() {
        let mut sink: HashMap<String, UniformValue> = HashMap::new();
        sink.set_uniform("texture0", UniformValue::Int(0));
        sink.set_uniform("texture0", UniformValue::Int(1));
        assert_eq!(sink.get("texture0"), Some(&UniformValue::Int(1)));
    }
}
