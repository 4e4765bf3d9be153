use std::env;
use std::fs;

use osprey_vm::harness;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: osprey <file.osp|directory>");
        std::process::exit(1);
    }

    let path = std::path::Path::new(&args[1]);
    let metadata = fs::metadata(path).unwrap_or_else(|err| {
        eprintln!("Failed to read path: {err}");
        std::process::exit(1);
    });

    if metadata.is_dir() {
        if let Err(err) = harness::run_directory(path) {
            eprintln!("Failed to read directory: {err}");
            std::process::exit(1);
        }
    } else {
        let result = harness::run_file(path);
        harness::print_result(&result);
    }
}
