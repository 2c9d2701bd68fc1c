fn main() {
    // Only the bare-metal image uses the linker script; host builds of the
    // workspace must not see it
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os == "none" {
        let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
        println!("cargo:rustc-link-arg-bins=-T{}/link.x", manifest_dir);
    }

    // Rerun if linker script changes
    println!("cargo:rerun-if-changed=link.x");
}
