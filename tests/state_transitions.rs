//! Whole-state transition tests.
//!
//! Each vector describes one instruction: full initial CPU/memory state,
//! the expected final state, and the expected cycle count. The harness
//! deserializes the vectors, runs a single `step`, and diffs everything.

use mos6502_core::{Memory, Mos6502};
use serde::Deserialize;

#[derive(Deserialize)]
struct TestCase {
    name: String,
    initial: CpuState,
    #[serde(rename = "final")]
    final_state: CpuState,
    cycles: u32,
}

#[derive(Deserialize)]
struct CpuState {
    pc: u16,
    s: u8,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    ram: Vec<(u16, u8)>,
}

fn setup(cpu: &mut Mos6502, mem: &mut Memory, state: &CpuState) {
    for &(addr, value) in &state.ram {
        mem.write(addr, value);
    }
    cpu.set_pc(state.pc);
    cpu.set_sp(u16::from(state.s));
    cpu.set_a(state.a);
    cpu.set_x(state.x);
    cpu.set_y(state.y);
    cpu.set_status(state.p);
}

/// Diff CPU and memory against the expected state, returning mismatches.
fn compare(cpu: &Mos6502, mem: &Memory, expected: &CpuState) -> Vec<String> {
    let mut errors = Vec::new();

    if cpu.pc() != expected.pc {
        errors.push(format!(
            "PC: got ${:04X}, want ${:04X}",
            cpu.pc(),
            expected.pc
        ));
    }
    let sp = (cpu.sp() & 0x00FF) as u8;
    if sp != expected.s {
        errors.push(format!("S: got ${:02X}, want ${:02X}", sp, expected.s));
    }
    if cpu.a() != expected.a {
        errors.push(format!("A: got ${:02X}, want ${:02X}", cpu.a(), expected.a));
    }
    if cpu.x() != expected.x {
        errors.push(format!("X: got ${:02X}, want ${:02X}", cpu.x(), expected.x));
    }
    if cpu.y() != expected.y {
        errors.push(format!("Y: got ${:02X}, want ${:02X}", cpu.y(), expected.y));
    }
    if cpu.status() != expected.p {
        errors.push(format!(
            "P: got ${:02X} ({:08b}), want ${:02X} ({:08b})",
            cpu.status(),
            cpu.status(),
            expected.p,
            expected.p
        ));
    }
    for &(addr, value) in &expected.ram {
        let got = mem.read(addr);
        if got != value {
            errors.push(format!(
                "ram[${addr:04X}]: got ${got:02X}, want ${value:02X}"
            ));
        }
    }
    errors
}

#[test]
fn state_transition_vectors() {
    let cases: Vec<TestCase> = serde_json::from_str(VECTORS).expect("valid vectors");
    let mut failures = Vec::new();

    for case in &cases {
        let mut cpu = Mos6502::new();
        let mut mem = Memory::new();
        setup(&mut cpu, &mut mem, &case.initial);

        match cpu.step(&mut mem) {
            Ok(cycles) => {
                let mut errors = compare(&cpu, &mem, &case.final_state);
                if cycles != case.cycles {
                    errors.push(format!("cycles: got {}, want {}", cycles, case.cycles));
                }
                if !errors.is_empty() {
                    failures.push(format!("{}: {}", case.name, errors.join("; ")));
                }
            }
            Err(err) => failures.push(format!("{}: unexpected error: {err}", case.name)),
        }
    }

    assert!(
        failures.is_empty(),
        "{} of {} vectors failed:\n{}",
        failures.len(),
        cases.len(),
        failures.join("\n")
    );
}

const VECTORS: &str = r#"[
  {
    "name": "LDA immediate",
    "initial": { "pc": 512, "s": 255, "a": 0, "x": 0, "y": 0, "p": 0,
      "ram": [[512, 169], [513, 66]] },
    "final": { "pc": 514, "s": 255, "a": 66, "x": 0, "y": 0, "p": 0,
      "ram": [[512, 169], [513, 66]] },
    "cycles": 2
  },
  {
    "name": "LDA (zp),Y with page cross",
    "initial": { "pc": 512, "s": 255, "a": 0, "x": 0, "y": 255, "p": 0,
      "ram": [[512, 177], [513, 128], [128, 1], [129, 18], [4864, 153]] },
    "final": { "pc": 514, "s": 255, "a": 153, "x": 0, "y": 255, "p": 128,
      "ram": [[512, 177], [513, 128], [128, 1], [129, 18], [4864, 153]] },
    "cycles": 6
  },
  {
    "name": "STA absolute preserves flags",
    "initial": { "pc": 512, "s": 255, "a": 85, "x": 0, "y": 0, "p": 2,
      "ram": [[512, 141], [513, 52], [514, 18]] },
    "final": { "pc": 515, "s": 255, "a": 85, "x": 0, "y": 0, "p": 2,
      "ram": [[512, 141], [513, 52], [514, 18], [4660, 85]] },
    "cycles": 4
  },
  {
    "name": "INC zp wraps to zero",
    "initial": { "pc": 512, "s": 255, "a": 0, "x": 0, "y": 0, "p": 0,
      "ram": [[512, 230], [513, 16], [16, 255]] },
    "final": { "pc": 514, "s": 255, "a": 0, "x": 0, "y": 0, "p": 2,
      "ram": [[512, 230], [513, 16], [16, 0]] },
    "cycles": 5
  },
  {
    "name": "ASL accumulator shifts into carry",
    "initial": { "pc": 512, "s": 255, "a": 129, "x": 0, "y": 0, "p": 0,
      "ram": [[512, 10]] },
    "final": { "pc": 513, "s": 255, "a": 2, "x": 0, "y": 0, "p": 1,
      "ram": [[512, 10]] },
    "cycles": 2
  },
  {
    "name": "JMP indirect with page-wrap bug",
    "initial": { "pc": 512, "s": 255, "a": 0, "x": 0, "y": 0, "p": 0,
      "ram": [[512, 108], [513, 255], [514, 16], [4351, 52], [4096, 18]] },
    "final": { "pc": 4660, "s": 255, "a": 0, "x": 0, "y": 0, "p": 0,
      "ram": [[512, 108], [513, 255], [514, 16], [4351, 52], [4096, 18]] },
    "cycles": 5
  },
  {
    "name": "JSR pushes return address minus one",
    "initial": { "pc": 512, "s": 255, "a": 0, "x": 0, "y": 0, "p": 0,
      "ram": [[512, 32], [513, 0], [514, 4]] },
    "final": { "pc": 1024, "s": 253, "a": 0, "x": 0, "y": 0, "p": 0,
      "ram": [[512, 32], [513, 0], [514, 4], [511, 2], [510, 2]] },
    "cycles": 6
  },
  {
    "name": "RTS pulls and increments",
    "initial": { "pc": 512, "s": 253, "a": 0, "x": 0, "y": 0, "p": 0,
      "ram": [[512, 96], [510, 2], [511, 2]] },
    "final": { "pc": 515, "s": 255, "a": 0, "x": 0, "y": 0, "p": 0,
      "ram": [[512, 96], [510, 2], [511, 2]] },
    "cycles": 6
  },
  {
    "name": "ADC immediate signed overflow",
    "initial": { "pc": 512, "s": 255, "a": 127, "x": 0, "y": 0, "p": 1,
      "ram": [[512, 105], [513, 1]] },
    "final": { "pc": 514, "s": 255, "a": 129, "x": 0, "y": 0, "p": 192,
      "ram": [[512, 105], [513, 1]] },
    "cycles": 2
  },
  {
    "name": "SBC immediate in decimal mode",
    "initial": { "pc": 512, "s": 255, "a": 50, "x": 0, "y": 0, "p": 9,
      "ram": [[512, 233], [513, 16]] },
    "final": { "pc": 514, "s": 255, "a": 34, "x": 0, "y": 0, "p": 9,
      "ram": [[512, 233], [513, 16]] },
    "cycles": 2
  },
  {
    "name": "BNE taken within page",
    "initial": { "pc": 512, "s": 255, "a": 0, "x": 0, "y": 0, "p": 0,
      "ram": [[512, 208], [513, 16]] },
    "final": { "pc": 530, "s": 255, "a": 0, "x": 0, "y": 0, "p": 0,
      "ram": [[512, 208], [513, 16]] },
    "cycles": 3
  },
  {
    "name": "BRK pushes state and vectors",
    "initial": { "pc": 512, "s": 255, "a": 0, "x": 0, "y": 0, "p": 0,
      "ram": [[512, 0], [65534, 0], [65535, 128]] },
    "final": { "pc": 32768, "s": 252, "a": 0, "x": 0, "y": 0, "p": 4,
      "ram": [[512, 0], [511, 2], [510, 2], [509, 48]] },
    "cycles": 7
  },
  {
    "name": "EOR (zp,X) through a zero-page pointer",
    "initial": { "pc": 512, "s": 255, "a": 15, "x": 4, "y": 0, "p": 0,
      "ram": [[512, 65], [513, 32], [36, 0], [37, 3], [768, 255]] },
    "final": { "pc": 514, "s": 255, "a": 240, "x": 4, "y": 0, "p": 128,
      "ram": [[512, 65], [513, 32], [36, 0], [37, 3], [768, 255]] },
    "cycles": 6
  },
  {
    "name": "CPY immediate with borrow",
    "initial": { "pc": 512, "s": 255, "a": 0, "x": 0, "y": 16, "p": 0,
      "ram": [[512, 192], [513, 32]] },
    "final": { "pc": 514, "s": 255, "a": 0, "x": 0, "y": 16, "p": 128,
      "ram": [[512, 192], [513, 32]] },
    "cycles": 2
  }
]"#;
