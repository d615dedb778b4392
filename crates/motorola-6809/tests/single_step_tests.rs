//! Data-driven single-instruction tests.
//!
//! Each JSON file in `tests/data/` holds a list of cases: an initial CPU and
//! RAM state, the expected state after one `step()`, and the expected cycle
//! count. Registers missing from a case (E, F, MD on the MC6809) default
//! to zero.

use emu_core::{Bus, SimpleBus};
use motorola_6809::flags::ConditionCodes;
use motorola_6809::{Cpu6809, Variant};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// JSON test case format.
#[derive(Deserialize)]
struct TestCase {
    name: String,
    variant: String,
    initial: CpuState,
    #[serde(rename = "final")]
    final_state: CpuState,
    cycles: u32,
}

/// JSON CPU state format.
#[derive(Deserialize)]
struct CpuState {
    pc: u16,
    a: u8,
    b: u8,
    x: u16,
    y: u16,
    u: u16,
    s: u16,
    dp: u8,
    cc: u8,
    #[serde(default)]
    e: u8,
    #[serde(default)]
    f: u8,
    #[serde(default)]
    md: u8,
    ram: Vec<(u16, u8)>,
}

fn variant(name: &str) -> Variant {
    match name {
        "hd6309" => Variant::Hd6309,
        _ => Variant::Mc6809,
    }
}

fn setup(cpu: &mut Cpu6809, bus: &mut SimpleBus, state: &CpuState) {
    for &(addr, value) in &state.ram {
        bus.write(addr, value);
    }
    let r = &mut cpu.regs;
    r.pc = state.pc;
    r.a = state.a;
    r.b = state.b;
    r.x = state.x;
    r.y = state.y;
    r.u = state.u;
    r.s = state.s;
    r.dp = state.dp;
    r.cc = ConditionCodes::new(state.cc);
    r.e = state.e;
    r.f = state.f;
    r.md = state.md;
}

fn check<T: PartialEq + std::fmt::Display>(errors: &mut Vec<String>, name: &str, got: T, want: T) {
    if got != want {
        errors.push(format!("{name}: got {got}, want {want}"));
    }
}

/// Compare the CPU/bus state against expected, returning a list of mismatches.
fn compare(cpu: &Cpu6809, bus: &SimpleBus, expected: &CpuState) -> Vec<String> {
    let mut errors = Vec::new();
    let r = &cpu.regs;
    check(&mut errors, "PC", r.pc, expected.pc);
    check(&mut errors, "A", r.a, expected.a);
    check(&mut errors, "B", r.b, expected.b);
    check(&mut errors, "X", r.x, expected.x);
    check(&mut errors, "Y", r.y, expected.y);
    check(&mut errors, "U", r.u, expected.u);
    check(&mut errors, "S", r.s, expected.s);
    check(&mut errors, "DP", r.dp, expected.dp);
    check(&mut errors, "CC", r.cc.bits(), expected.cc);
    check(&mut errors, "E", r.e, expected.e);
    check(&mut errors, "F", r.f, expected.f);
    check(&mut errors, "MD", r.md, expected.md);
    for &(addr, value) in &expected.ram {
        let got = bus.peek(addr);
        if got != value {
            errors.push(format!("RAM[${addr:04X}]: got ${got:02X}, want ${value:02X}"));
        }
    }
    errors
}

fn run_file(path: &Path) -> Vec<String> {
    let text = fs::read_to_string(path).expect("read test file");
    let cases: Vec<TestCase> = serde_json::from_str(&text).expect("parse test file");
    let mut failures = Vec::new();

    for case in &cases {
        let mut cpu = Cpu6809::new(variant(&case.variant));
        let mut bus = SimpleBus::new();
        setup(&mut cpu, &mut bus, &case.initial);

        let cycles = cpu.step(&mut bus);

        let mut errors = compare(&cpu, &bus, &case.final_state);
        if cycles != case.cycles {
            errors.push(format!("cycles: got {cycles}, want {}", case.cycles));
        }
        if !errors.is_empty() {
            failures.push(format!("{}: {}", case.name, errors.join("; ")));
        }
    }
    failures
}

#[test]
fn single_step_vectors() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data");
    let mut entries: Vec<_> = fs::read_dir(&dir)
        .expect("tests/data exists")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    entries.sort();
    assert!(!entries.is_empty(), "no test vectors in {}", dir.display());

    let failures: Vec<String> = entries.iter().flat_map(|path| run_file(path)).collect();
    assert!(failures.is_empty(), "{} failures:\n{}", failures.len(), failures.join("\n"));
}
