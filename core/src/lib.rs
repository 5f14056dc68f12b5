mod processor;

pub mod dump;
pub mod monitor;
pub mod snapshot;

pub use processor::ram::{Memory, MemoryError, MAX_MEMORY_SIZE};
pub use processor::register::{
    Flag, Flags, Reg16, Reg8, RegisterError, RegisterName, Registers, SegReg, STACK_TOP,
};
pub use processor::register::{AF, CF, DEFINED_MASK, DF, IF, OF, PF, SF, TF, ZF};
pub use processor::{Machine, MachineConfig, ROW_WIDTH};
