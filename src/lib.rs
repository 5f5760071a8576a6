pub mod alu;
pub mod error;
pub mod instruction;
pub mod machine;
pub mod memory;
pub mod registers;
pub mod trace;
