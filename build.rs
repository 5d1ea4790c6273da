use std::fs;
use std::io::Write;
use std::path::Path;

pub static TESTS_DIR: &str = "tests/files";
pub static HEX_EXT: &str = "hex";

fn gentests(testdir: &str, ext: &str, target: &Path) {
    let mut f = fs::File::create(target).unwrap();
    let dir = fs::read_dir(testdir).unwrap();

    for e in dir {
        let p = e.as_ref().unwrap().path();
        let n = p.file_stem().unwrap().to_str().unwrap();
        //
        if p.extension().unwrap() == ext {
            writeln!(f).unwrap();
            writeln!(f, "#[test]").unwrap();
            writeln!(f, "fn test_{n}() {{ check(\"{n}\"); }}").unwrap();
        }
    }
}

/// Generates one `#[test]` per `.hex`/`.expected` golden pair under
/// `tests/files`, included by `tests/golden.rs`.
fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let golden_file = std::path::Path::new(&out_dir).join("golden_tests.rs");
    gentests(TESTS_DIR, HEX_EXT, &golden_file);
    println!("cargo:rerun-if-changed={}", TESTS_DIR);
}
