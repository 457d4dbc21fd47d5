//! akbarc-ir - Intermediate representation, lowering, and optimization.
//!
//! The IR is a flat ordered list of three-address-style instructions
//! ([`Instr`]) with name-referenced labels. [`lower`] walks a
//! semantically valid AST and produces the list with fresh temporary and
//! label counters; [`optimize`] runs the constant-folding, dead-code and
//! control-flow passes over it. Both are pure functions of their input,
//! so a pipeline run is deterministic byte for byte.

pub mod ir;
mod lower;
pub mod opt;

pub use ir::{cpp_type_name, is_temp_name, render_float, BinOp, Instr};
pub use lower::{expr_cpp, lower, render_literal};
pub use opt::{fold_constants, optimize, remove_dead_code, simplify_control_flow};
