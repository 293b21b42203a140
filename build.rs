use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Copy explorerbar.toml to the output directory so the demo finds its
    // default configuration next to the executable.
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => dir,
        Err(_) => return,
    };
    // OUT_DIR is something like target/debug/build/explorerbar-xxx/out
    let out_path = Path::new(&out_dir);

    // Navigate up: out -> explorerbar-xxx -> build -> debug
    if let Some(profile_dir) = out_path.ancestors().nth(3) {
        let src = Path::new("explorerbar.toml");
        let dst = profile_dir.join("explorerbar.toml");

        println!("cargo:rerun-if-changed=explorerbar.toml");
        if src.exists() {
            if let Err(e) = fs::copy(src, &dst) {
                println!("cargo:warning=Failed to copy explorerbar.toml: {}", e);
            }
        }
    }
}
