use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

/// Files the demo loads at startup.
const REQUIRED_ASSETS: [&str; 2] = ["plane.obj", "hologram.png"];

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");
    for asset in REQUIRED_ASSETS {
        println!("cargo:rerun-if-changed=assets/{asset}");
    }

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");
    if !assets_src.exists() {
        return Ok(());
    }
    for asset in REQUIRED_ASSETS {
        ensure!(
            assets_src.join(asset).is_file(),
            "missing demo asset assets/{asset}"
        );
    }

    // the binary falls back to this copy when run outside the crate root
    let out_dir = env::var("OUT_DIR")?;
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    copy_items(&[assets_src], out_dir, &copy_options)?;

    Ok(())
}
