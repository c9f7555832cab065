// crate-specific lint exceptions:
//#![allow()]

use std::{env, process};

use lgn_compiler_tex::COMPILER_INFO;
use lgn_data_compiler::compiler_api::compiler_main;

fn main() {
    process::exit(match compiler_main(env::args(), &COMPILER_INFO) {
        Ok(_) => 0,
        Err(_) => 1,
    });
}
