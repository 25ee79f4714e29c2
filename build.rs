use std::env;

fn main() {
    // Only the firmware build links against ESP-IDF; host builds (tests) skip it
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    println!("cargo:rerun-if-changed=build.rs");
}
