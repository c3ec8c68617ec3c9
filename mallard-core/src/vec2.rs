//! Unsigned 2D vector used for pointer positions and resolutions.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Rem, RemAssign, Sub, SubAssign};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vec2 {
    pub x: u32,
    pub y: u32,
}

impl Vec2 {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

macro_rules! vec2_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait for Vec2 {
            type Output = Vec2;

            fn $method(self, other: Vec2) -> Vec2 {
                Vec2::new(self.x $op other.x, self.y $op other.y)
            }
        }

        impl $assign_trait for Vec2 {
            fn $assign_method(&mut self, other: Vec2) {
                *self = *self $op other;
            }
        }
    };
}

vec2_op!(Add, add, AddAssign, add_assign, +);
vec2_op!(Sub, sub, SubAssign, sub_assign, -);
vec2_op!(Mul, mul, MulAssign, mul_assign, *);
vec2_op!(Div, div, DivAssign, div_assign, /);
vec2_op!(Rem, rem, RemAssign, rem_assign, %);
