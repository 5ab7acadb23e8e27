// The dashboard is embedded from frontend/dist, which only exists after
// `trunk build`. Without it rust-embed fails to compile, so a stub index page
// stands in until the frontend is built.

use std::path::Path;

fn main() {
    let dist = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../frontend/dist");
    let index = dist.join("index.html");

    if !index.exists() {
        std::fs::create_dir_all(&dist).expect("cannot create frontend/dist");
        std::fs::write(
            &index,
            "<!doctype html><title>trialview</title>\
             <p>Dashboard not built. Run <code>trunk build --release</code> in frontend/.</p>\n",
        )
        .expect("cannot write frontend/dist/index.html");
    }

    println!("cargo:rerun-if-changed=../../frontend/dist");
}
