// Build script for the chat bubble mod
// Copies the sample config file next to the build output

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=chat_bubble.toml");

    // OUT_DIR = target/<profile>/build/<crate>-<hash>/out
    let Ok(out_dir) = env::var("OUT_DIR") else {
        return;
    };
    let Some(target_dir) = Path::new(&out_dir).ancestors().nth(3) else {
        return;
    };

    let config_src = Path::new("chat_bubble.toml");
    let config_dst = target_dir.join("chat_bubble.toml");

    if config_src.exists() {
        match fs::copy(config_src, &config_dst) {
            Ok(_) => println!(
                "cargo:warning=Copied config file to {}",
                config_dst.display()
            ),
            Err(e) => println!("cargo:warning=Failed to copy config file: {}", e),
        }
    }
}
