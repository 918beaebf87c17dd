//! End-to-end instruction scenarios driven by embedded JSON test vectors.
//!
//! Each case loads a short program behind the standard reset vector
//! (FCW 0x4000, PC 0x0008), runs until the cycle cap, and checks
//! registers, flags, halt state and memory.

mod common;

use serde::Deserialize;
use zilog_z8000::{F_C, F_PV, F_S, F_Z};

#[derive(Deserialize)]
struct Case {
    name: String,
    #[serde(default)]
    fcw: Option<String>,
    code: Vec<String>,
    #[serde(default)]
    mem_init: Vec<MemInit>,
    expect: Expect,
}

#[derive(Deserialize)]
struct MemInit {
    addr: u32,
    bytes: Vec<u8>,
}

#[derive(Deserialize, Default)]
struct Expect {
    #[serde(default)]
    regs: std::collections::HashMap<String, String>,
    #[serde(default)]
    byte_regs: std::collections::HashMap<String, String>,
    #[serde(default)]
    carry: Option<bool>,
    #[serde(default)]
    zero: Option<bool>,
    #[serde(default)]
    sign: Option<bool>,
    #[serde(default)]
    overflow: Option<bool>,
    #[serde(default)]
    halted: Option<bool>,
    #[serde(default)]
    mem: Vec<MemInit>,
}

fn hex16(s: &str) -> u16 {
    u16::from_str_radix(s.trim_start_matches("0x"), 16).expect("hex word")
}

const CASES: &str = r#"[
  {
    "name": "add word",
    "code": ["2101", "1234", "2102", "1111", "8121", "7A00"],
    "expect": {
      "regs": {"1": "2345"},
      "carry": false, "zero": false, "sign": false, "overflow": false,
      "halted": true
    }
  },
  {
    "name": "byte add carries out",
    "code": ["C8FF", "C901", "8098", "7A00"],
    "expect": {
      "byte_regs": {"1": "00"},
      "carry": true, "zero": true, "sign": false, "overflow": false,
      "halted": true
    }
  },
  {
    "name": "block move ldirb",
    "code": ["2101", "2000", "2102", "1000", "2103", "0010", "BA21", "0310", "7A00"],
    "mem_init": [
      {"addr": 4096, "bytes": [0,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15]}
    ],
    "expect": {
      "regs": {"3": "0000"},
      "halted": true,
      "mem": [{"addr": 8192, "bytes": [0,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15]}]
    }
  },
  {
    "name": "divide long by word",
    "code": ["2104", "0002", "2105", "0100", "2107", "0200", "9B74", "7A00"],
    "expect": {
      "regs": {"4": "0100", "5": "0100"},
      "halted": true
    }
  },
  {
    "name": "logical ops set parity from low byte",
    "code": ["C80F", "C93C", "8698", "7A00"],
    "expect": {
      "byte_regs": {"1": "0C"},
      "zero": false, "sign": false, "overflow": true,
      "halted": true
    }
  },
  {
    "name": "increment never touches carry",
    "code": ["8D81", "2101", "00FF", "A910", "7A00"],
    "expect": {
      "regs": {"1": "0100"},
      "carry": true, "halted": true
    }
  },
  {
    "name": "multiply produces double width result",
    "code": ["2103", "0123", "2105", "0100", "9952", "7A00"],
    "expect": {
      "regs": {"2": "0001", "3": "2300"},
      "halted": true
    }
  }
]"#;

#[test]
fn run_scenarios() {
    let cases: Vec<Case> = serde_json::from_str(CASES).expect("scenario JSON");
    for case in cases {
        let fcw = case.fcw.as_deref().map_or(0x4000, hex16);
        let code: Vec<u16> = case.code.iter().map(|w| hex16(w)).collect();
        let mut sys = common::z8002_with(fcw, 0x0008, &code);
        for init in &case.mem_init {
            sys.mem.borrow_mut().load(init.addr, &init.bytes);
        }

        sys.cpu.run(10_000).expect("run");

        for (reg, value) in &case.expect.regs {
            let n: u8 = reg.parse().unwrap();
            assert_eq!(
                sys.cpu.get_reg(n),
                hex16(value),
                "{}: R{n}",
                case.name
            );
        }
        for (reg, value) in &case.expect.byte_regs {
            let k: u8 = reg.parse().unwrap();
            assert_eq!(
                sys.cpu.get_reg_byte(k),
                hex16(value) as u8,
                "{}: byte reg {k}",
                case.name
            );
        }
        let fcw = sys.cpu.get_fcw();
        if let Some(want) = case.expect.carry {
            assert_eq!(fcw & F_C != 0, want, "{}: carry", case.name);
        }
        if let Some(want) = case.expect.zero {
            assert_eq!(fcw & F_Z != 0, want, "{}: zero", case.name);
        }
        if let Some(want) = case.expect.sign {
            assert_eq!(fcw & F_S != 0, want, "{}: sign", case.name);
        }
        if let Some(want) = case.expect.overflow {
            assert_eq!(fcw & F_PV != 0, want, "{}: overflow", case.name);
        }
        if let Some(want) = case.expect.halted {
            assert_eq!(sys.cpu.halted(), want, "{}: halt state", case.name);
        }
        for check in &case.expect.mem {
            for (i, byte) in check.bytes.iter().enumerate() {
                assert_eq!(
                    sys.mem.borrow().peek(check.addr + i as u32),
                    *byte,
                    "{}: memory at {:#06x}",
                    case.name,
                    check.addr + i as u32
                );
            }
        }
    }
}
