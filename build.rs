//! Build script for the Album Ratings API.
//!
//! Copies the `.env.example` configuration template into the local data
//! directory, next to the `.env` file that `config::load_env` reads:
//! - Linux: `~/.local/share/ratings-api/.env.example`
//! - macOS: `~/Library/Application Support/ratings-api/.env.example`
//! - Windows: `%LOCALAPPDATA%/ratings-api/.env.example`
//!
//! The template is a convenience only. Any failure here (missing template,
//! read-only home directory) is reported as a cargo warning and never fails the
//! build.

use std::{env, fs, path::PathBuf};

fn main() {
    // Re-run if the template changes
    println!("cargo:rerun-if-changed=.env.example");

    if let Err(e) = copy_env_template() {
        println!("cargo:warning=could not install .env.example: {e}");
    }
}

fn copy_env_template() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("ratings-api");
    fs::create_dir_all(&out_dir)?;

    let contents = fs::read_to_string(&env_example_path)?;
    fs::write(out_dir.join(".env.example"), contents)?;
    Ok(())
}
