use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::filter::EnvFilter;

use edge_common::{hash_file, load_keypair, sign_attestation, verify_attestation, Keypair};

/// CLI to hash a file and sign its attestation message offline, printing
/// digest, signature, and signer without contacting the service.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the input file whose content hash will be signed.
    #[clap(long, value_name = "FILE")]
    file_path: PathBuf,

    /// Optional keypair file to sign with; if omitted, a random key is generated.
    #[clap(long, env = "R3L_KEYPAIR")]
    keypair: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let hash = hash_file(&args.file_path)?;

    // Obtain keypair (existing or random)
    let keypair = match &args.keypair {
        Some(path) => load_keypair(path)
            .with_context(|| format!("loading keypair {}", path.display()))?,
        None => Keypair::generate(),
    };

    let signature = sign_attestation(Some(&keypair), hash.hex())?;
    let verified = verify_attestation(keypair.public(), hash.hex(), &signature)?;

    println!("File: {}", args.file_path.display());
    println!("Digest (sha256): {hash}");
    println!("Signature: {}", signature.to_base58());
    println!("Signer: {}", keypair.public_base58());
    println!("Verified: {verified}");

    Ok(())
}
