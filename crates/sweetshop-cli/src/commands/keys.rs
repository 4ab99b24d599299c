//! `sweetshop keys generate` - create the server's token signing key.

use std::fs;
use std::path::PathBuf;
use sweetshop_biscuit::KeyPair;

pub fn generate(output: Option<PathBuf>) -> anyhow::Result<()> {
    let keypair = KeyPair::generate()?;

    let Some(output_dir) = output else {
        println!("Private key (keep secure!):");
        println!("{}", keypair.private_key_hex());
        println!();
        println!("Public key:");
        println!("{}", keypair.public_key_hex());
        println!();
        println!("Use --output <dir> to save keys to files.");
        return Ok(());
    };

    fs::create_dir_all(&output_dir)?;
    let private_path = output_dir.join("private.key");
    let public_path = output_dir.join("public.key");
    keypair.save_to_files(&private_path, &public_path)?;

    println!("✔ Generated token signing keypair:");
    println!("  Private key: {}", private_path.display());
    println!("  Public key:  {}", public_path.display());
    println!();
    println!("⚠️  Keep your private key secure! Never commit it to version control.");
    println!();
    println!("Point the server at it with either:");
    println!("  [auth] private_key_file = \"{}\"", private_path.display());
    println!(
        "  export SWEETSHOP_TOKEN_PRIVATE_KEY=$(cat {})",
        private_path.display()
    );
    Ok(())
}
