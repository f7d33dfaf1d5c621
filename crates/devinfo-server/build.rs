use std::process::Command;

fn main() {
    // 记录编译所用的 rustc 版本，供 / 接口的 system.rust_version 使用
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|raw| raw.trim().to_string())
        .unwrap_or_default();

    println!("cargo:rustc-env=DEVINFO_RUSTC_VERSION={}", version);
    println!("cargo:rerun-if-env-changed=RUSTC");
    println!("cargo:rerun-if-changed=build.rs");
}
