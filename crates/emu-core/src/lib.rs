//! Core traits and types for instruction-stepped emulation.
//!
//! CPU cores access the outside world exclusively through the bus traits
//! defined here. Hosts implement them; cores never cache bus state beyond
//! the instruction currently executing.

mod bus;
mod cpu;

pub use bus::{IoBus, IoMode, MemoryBus, SimpleBus};
pub use cpu::Cpu;
