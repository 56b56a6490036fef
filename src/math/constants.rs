/* Copyright 2020 @Yuchen Wong */

pub type Float = f32;
pub type Int = i32;

pub type Vector2f = nalgebra::Vector2<Float>;
pub type Vector3f = nalgebra::Vector3<Float>;

pub const EPSILON: Float = 1e-4;
pub const PI: Float = 3.14159265359;
pub const INV_PI: Float = 0.31830988618;
pub const TWO_PI: Float = 6.28318530718;
pub const INV_FOUR_PI: Float = 0.07957747154;

pub const FLOAT_MAX: Float = std::f32::MAX;
pub const FLOAT_INFINITY: Float = std::f32::INFINITY;

// Half an ulp at 1.0, the unit roundoff of a correctly rounded operation.
pub const MACHINE_EPSILON: Float = std::f32::EPSILON * 0.5;

// Bound on the relative error accumulated by `n` chained floating-point operations.
pub fn gamma(n: Int) -> Float {
    let n = n as Float;
    (n * MACHINE_EPSILON) / (1.0 - n * MACHINE_EPSILON)
}

/* Tests for constants */
