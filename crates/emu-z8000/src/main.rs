//! Standalone Z8000 emulator binary.
//!
//! Loads a flat binary image into memory, points the CPU at its reset
//! vector and runs it, with optional instruction/register/bus tracing.

use std::cell::RefCell;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use emu_core::MemoryBus;
use emu_z8000::{IoPorts, MemoryRegion};
use zilog_z8000::Z8000;

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

struct CliArgs {
    binary: PathBuf,
    segmented: bool,
    base: u32,
    entry: Option<u32>,
    trace: bool,
    reg_trace: bool,
    mem_trace: bool,
    io_trace: bool,
    max_cycles: i64,
    dump: bool,
}

fn print_usage(progname: &str) {
    println!("Z8000 Standalone Emulator");
    println!("Usage: {progname} [options] <binary-file>");
    println!();
    println!("Options:");
    println!("  -s, --segmented      Use Z8001 segmented mode (default: Z8002 non-segmented)");
    println!("  -b, --base <addr>    Load address in hex (default: 0x0000)");
    println!("  -e, --entry <addr>   Override entry point (writes to reset vector at addr 4)");
    println!("  -t, --trace          Enable instruction tracing");
    println!("  -r, --regtrace       Enable register tracing (dump after each instruction)");
    println!("  -m, --memtrace       Enable memory access tracing");
    println!("  -i, --iotrace        Enable I/O access tracing");
    println!("  -c, --cycles <n>     Max cycles to execute (default: unlimited)");
    println!("  -d, --dump           Dump memory after execution");
    println!("  -h, --help           Show this help");
    println!();
    println!("Reset Vector (Z8002 - 6 bytes):");
    println!("  0x0000-01: Reserved");
    println!("  0x0002-03: FCW (set bit 14 for system mode)");
    println!("  0x0004-05: PC (16-bit entry point)");
    println!();
    println!("Reset Vector (Z8001 - 8 bytes):");
    println!("  0x0000-01: Reserved");
    println!("  0x0002-03: FCW (set bit 15 for segmented, bit 14 for system mode)");
    println!("  0x0004-07: Segmented PC (seg<<8|0x8000 in high word, offset in low word)");
}

fn parse_hex(s: &str) -> Result<u32, String> {
    let trimmed = s.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(trimmed, 16).map_err(|e| format!("bad hex value '{s}': {e}"))
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let progname = args.first().map_or("emu-z8000", String::as_str).to_string();

    let mut binary = None;
    let mut cli = CliArgs {
        binary: PathBuf::new(),
        segmented: false,
        base: 0,
        entry: None,
        trace: false,
        reg_trace: false,
        mem_trace: false,
        io_trace: false,
        max_cycles: -1,
        dump: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-s" | "--segmented" => cli.segmented = true,
            "-b" | "--base" => {
                i += 1;
                match args.get(i).map(String::as_str).map(parse_hex) {
                    Some(Ok(v)) => cli.base = v,
                    _ => {
                        eprintln!("Error: --base needs a hex address");
                        process::exit(1);
                    }
                }
            }
            "-e" | "--entry" => {
                i += 1;
                match args.get(i).map(String::as_str).map(parse_hex) {
                    Some(Ok(v)) => cli.entry = Some(v),
                    _ => {
                        eprintln!("Error: --entry needs a hex address");
                        process::exit(1);
                    }
                }
            }
            "-t" | "--trace" => cli.trace = true,
            "-r" | "--regtrace" => cli.reg_trace = true,
            "-m" | "--memtrace" => cli.mem_trace = true,
            "-i" | "--iotrace" => cli.io_trace = true,
            "-c" | "--cycles" => {
                i += 1;
                match args.get(i).and_then(|s| s.parse::<i64>().ok()) {
                    Some(v) => cli.max_cycles = v,
                    None => {
                        eprintln!("Error: --cycles needs a number");
                        process::exit(1);
                    }
                }
            }
            "-d" | "--dump" => cli.dump = true,
            "-h" | "--help" => {
                print_usage(&progname);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown argument: {other}");
                print_usage(&progname);
                process::exit(1);
            }
            other => binary = Some(PathBuf::from(other)),
        }
        i += 1;
    }

    let Some(path) = binary else {
        eprintln!("Error: No binary file specified\n");
        print_usage(&progname);
        process::exit(1);
    };
    cli.binary = path;
    cli
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    let cli = parse_args();

    // Z8001 has a 23-bit (8MB) address space, Z8002 a 16-bit (64KB) one.
    let mem_size: usize = if cli.segmented { 0x80_0000 } else { 0x1_0000 };

    let image = match std::fs::read(&cli.binary) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: Cannot open file '{}': {e}", cli.binary.display());
            process::exit(1);
        }
    };

    println!("Z8000 Standalone Emulator");
    println!("=========================");
    println!(
        "CPU: {}",
        if cli.segmented {
            "Z8001 (segmented)"
        } else {
            "Z8002 (non-segmented)"
        }
    );
    println!("Loaded: {} ({} bytes)", cli.binary.display(), image.len());
    println!("Base address: 0x{:04X}", cli.base);

    // One memory region shared by the program, data and stack roles.
    let memory = Rc::new(RefCell::new(MemoryRegion::new(mem_size)));
    memory.borrow_mut().set_trace(cli.mem_trace);

    let io = Rc::new(RefCell::new(IoPorts::new()));
    io.borrow_mut().set_trace(cli.io_trace);

    if let Err(e) = memory.borrow_mut().load(cli.base, &image) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    let mut cpu = if cli.segmented {
        Z8000::z8001()
    } else {
        Z8000::z8002()
    };
    cpu.set_memory(memory.clone());
    cpu.set_io(io);
    cpu.set_trace(cli.trace);
    cpu.set_reg_trace(cli.reg_trace);
    cpu.reset();

    // Optionally rewrite the reset vector with the requested entry point.
    if let Some(entry) = cli.entry {
        println!("Overriding entry point: 0x{entry:04X}");
        let mut mem = memory.borrow_mut();
        if cli.segmented {
            let seg = (entry >> 16) & 0x7f;
            let seg_word = ((seg as u16) << 8) | 0x8000;
            mem.write_word(4, seg_word);
            mem.write_word(6, entry as u16);
            if mem.read_word(2) == 0 {
                mem.write_word(2, 0xC000); // segmented system mode
            }
        } else {
            mem.write_word(4, entry as u16);
            if mem.read_word(2) == 0 {
                mem.write_word(2, 0x4000); // system mode
            }
        }
    }

    {
        let mut mem = memory.borrow_mut();
        if cli.segmented {
            let fcw = mem.read_word(2);
            let seg_word = mem.read_word(4);
            let off_word = mem.read_word(6);
            println!("Reset vector (Z8001):");
            println!("  FCW: 0x{fcw:04X}");
            println!("  PC:  <<{:02X}>>{:04X}", (seg_word >> 8) & 0x7f, off_word);
        } else {
            println!("Reset vector (Z8002):");
            println!("  FCW: 0x{:04X}", mem.read_word(2));
            println!("  PC:  0x{:04X}", mem.read_word(4));
        }
    }

    println!("\nStarting execution...");
    if cli.trace {
        println!("---");
    }

    if let Err(e) = cpu.run(cli.max_cycles) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    if cli.trace {
        println!("---");
    }

    // Final state, printed unconditionally so test scripts can parse it.
    println!();
    cpu.dump_regs();

    println!("\nTotal cycles: {}", cpu.get_cycles());
    println!("Halted: {}", if cpu.halted() { "Yes" } else { "No" });

    if cli.dump {
        println!("\n=== Memory Dump (first 256 bytes from load address) ===");
        memory.borrow().dump(cli.base, 256);
    }
}
