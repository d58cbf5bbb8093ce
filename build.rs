use std::path::Path;
extern crate rustsourcebundler;
use rustsourcebundler::Bundler;

// Contest upload takes a single source file; it lands next to the manifest so it
// is not picked up as an extra bin target.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src");
    let mut bundler: Bundler =
        Bundler::new(Path::new("src/bin/main.rs"), Path::new("podbot_bundle.rs"));
    bundler.crate_name("podbot");
    bundler.run();
    Ok(())
}
