fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds (tests, simulation binary) need no ESP-IDF environment.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
