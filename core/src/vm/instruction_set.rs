//! statexpr VM Instructions - Fixed 16-bit Format
//!
//! # Instruction Format
//!
//! **ALL instructions are exactly 16 bits (2 bytes)**:
//! ```text
//! ┌────────────┬────────────┐
//! │    Tag     │  Operand   │
//! │  (8 bits)  │  (8 bits)  │
//! └────────────┴────────────┘
//! ```
//!
//! Using `#[repr(C, u8)]`, the enum maps to this 2-byte layout: a one-byte
//! discriminant followed by an optional one-byte payload.
//!
//! # Wide Arguments
//!
//! For indices > 255, use the `WideArg` prefix:
//! ```ignore
//! WideArg(high_byte)      // Sets high byte for next instruction
//! ConstLoad(low_byte)     // Combined: (high << 8) | low = 16-bit index
//! ```
//!
//! # Stack Discipline
//!
//! Stack effect notation: `[..., operand1, operand2] -> [..., result]`.
//! Every value on the stack is an `f64`.

use core::fmt;

/// A single VM instruction (exactly 16 bits)
#[repr(C, u8)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // ========================================================================
    // Stack & Constants (0x01 - 0x0F)
    // ========================================================================
    /// Push constant from pool
    /// Operand: u8 index (WideArg) | Stack: [...] -> [..., value]
    ConstLoad(u8) = 0x01,

    /// Wide argument prefix - modifies next instruction's operand
    ///
    /// The next instruction will use a 16-bit operand:
    /// `(this_operand << 8) | next_operand`
    WideArg(u8) = 0x05,

    /// Push the input value
    /// Stack: [...] -> [..., input]
    LoadInput = 0x0A,

    // ========================================================================
    // Operators (0x20 - 0x2F)
    // ========================================================================
    /// Apply a unary operator adapter
    /// Operand: u8 adapter index (WideArg) | Stack: [..., a] -> [..., op(a)]
    Unary(u8) = 0x20,

    /// Apply a binary operator adapter; `a` is the left operand
    /// Operand: u8 adapter index (WideArg) | Stack: [..., a, b] -> [..., op(a, b)]
    Binary(u8) = 0x21,

    // ========================================================================
    // Calls (0x70 - 0x7F)
    // ========================================================================
    /// Call a function adapter, which knows its argument count
    /// Operand: u8 adapter index (WideArg) | Stack: [..., a1, ..., aN] -> [..., f(a1..aN)]
    Call(u8) = 0x70,

    /// Return the top of the stack
    /// Stack: [..., result] -> []
    Return = 0x72,
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstLoad(idx) => write!(f, "ConstLoad({})", idx),
            Self::WideArg(high) => write!(f, "WideArg(0x{:02X})", high),
            Self::LoadInput => write!(f, "LoadInput"),
            Self::Unary(idx) => write!(f, "Unary({})", idx),
            Self::Binary(idx) => write!(f, "Binary({})", idx),
            Self::Call(idx) => write!(f, "Call({})", idx),
            Self::Return => write!(f, "Return"),
        }
    }
}
