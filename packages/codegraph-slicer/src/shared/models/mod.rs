//! IR models shared by every feature

pub mod instruction;
pub mod signature;
pub mod stmt;
pub mod types;
pub mod value;

pub use instruction::Instruction;
pub use signature::{FieldSig, MethodSig, Signature};
pub use stmt::{CmpOp, Condition, Stmt};
pub use types::Type;
pub use value::{BinOp, Constant, InvokeExpr, InvokeKind, Local, Value};
