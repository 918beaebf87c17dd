//! Host side of the standalone Z8000 emulator: flat memory, loopback I/O
//! ports, and the binary loader consumed by the CLI.

mod io;
mod memory;

pub use io::IoPorts;
pub use memory::MemoryRegion;
