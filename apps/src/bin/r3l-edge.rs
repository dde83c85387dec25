use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::filter::EnvFilter;
use url::Url;

use edge_common::{
    hash_file, similarity_hash, ClientContext, Keypair, DEFAULT_API_URL, DEFAULT_KEYPAIR_PATH,
};

/// Edge node client: hash files, attest them, query trust verdicts.
#[derive(Parser, Debug)]
#[clap(name = "r3l-edge", author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Register this edge node and obtain an API key.
    Register {
        /// Node name; defaults to a prefix of the public key.
        #[clap(long)]
        name: Option<String>,

        /// Ed25519 keypair file; generated if it does not exist.
        #[clap(long, env = "R3L_KEYPAIR", default_value = DEFAULT_KEYPAIR_PATH)]
        keypair: PathBuf,

        /// Base URL of the trust service.
        #[clap(long, env = "R3L_API_URL", default_value = DEFAULT_API_URL)]
        api: Url,
    },

    /// Hash a file, sign the attestation if a keypair is available, and submit it.
    Attest {
        /// Media file to attest.
        #[clap(value_name = "FILE")]
        file: PathBuf,

        /// Ed25519 keypair file. Attestation goes out unsigned if it can't be loaded.
        #[clap(long, env = "R3L_KEYPAIR", default_value = DEFAULT_KEYPAIR_PATH)]
        keypair: PathBuf,

        /// Base URL of the trust service.
        #[clap(long, env = "R3L_API_URL", default_value = DEFAULT_API_URL)]
        api: Url,

        /// API key issued at registration.
        #[clap(long, env = "R3L_API_KEY")]
        api_key: String,

        /// The file carries C2PA content-provenance metadata.
        #[clap(long)]
        c2pa: bool,

        /// TLSH similarity hash of the file; computed locally when omitted.
        #[clap(long)]
        tlsh: Option<String>,
    },

    /// Print the SHA-256 of a file.
    Hash {
        #[clap(value_name = "FILE")]
        file: PathBuf,
    },

    /// Query the trust verdict for a content hash.
    Query {
        /// Content hash (hex).
        hash: String,

        /// Base URL of the trust service.
        #[clap(long, env = "R3L_API_URL", default_value = DEFAULT_API_URL)]
        api: Url,
    },

    /// Fetch the raw attestation record for a content hash.
    Lookup {
        /// Content hash (hex).
        hash: String,

        /// Base URL of the trust service.
        #[clap(long, env = "R3L_API_URL", default_value = DEFAULT_API_URL)]
        api: Url,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables if present
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment variables from {:?}", path),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => bail!("failed to load .env file: {}", e),
    }

    let cli = Cli::parse();

    match cli.command {
        Cmd::Register { name, keypair, api } => register(name.as_deref(), &keypair, &api),
        Cmd::Attest {
            file,
            keypair,
            api,
            api_key,
            c2pa,
            tlsh,
        } => attest(&file, &keypair, &api, api_key, c2pa, tlsh.as_deref()),
        Cmd::Hash { file } => {
            let hash = hash_file(&file)?;
            println!("{hash}  {}", file.display());
            Ok(())
        }
        Cmd::Query { hash, api } => {
            let resp = ClientContext::new(api.as_str(), "").query_verdict(&hash)?;
            println!("{}", resp.body);
            Ok(())
        }
        Cmd::Lookup { hash, api } => {
            let resp = ClientContext::new(api.as_str(), "").lookup_attestation(&hash)?;
            println!("{}", resp.body);
            Ok(())
        }
    }
}

/// `RUST_LOG` if set and valid, otherwise `info`.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn register(name: Option<&str>, keypair_path: &Path, api: &Url) -> Result<()> {
    let keypair = if keypair_path.exists() {
        info!("Using existing keypair: {}", keypair_path.display());
        edge_common::load_keypair(keypair_path)?
    } else {
        let keypair = Keypair::generate();
        keypair.save(keypair_path)?;
        info!("Generated keypair: {}", keypair_path.display());
        keypair
    };

    let mut ctx = ClientContext::new(api.as_str(), "");
    ctx.attach_keypair(keypair);
    let resp = ctx.register(name)?;
    println!("{}", resp.body);

    let issued = resp.json()?;
    if let Some(api_key) = issued["api_key"].as_str() {
        info!("Save your API key: export R3L_API_KEY={api_key}");
    }
    Ok(())
}

fn attest(
    file: &Path,
    keypair_path: &Path,
    api: &Url,
    api_key: String,
    has_c2pa: bool,
    tlsh: Option<&str>,
) -> Result<()> {
    let hash = hash_file(file).with_context(|| format!("hashing {}", file.display()))?;
    info!("Content hash: {hash}");

    // Compute TLSH locally unless one was supplied
    let tlsh = match tlsh {
        Some(tlsh) => Some(tlsh.to_string()),
        None => similarity_hash(file).unwrap_or_else(|e| {
            warn!("TLSH not computed: {e}");
            None
        }),
    };
    if let Some(tlsh) = &tlsh {
        info!("TLSH: {tlsh}");
    }

    let mut ctx = ClientContext::new(api.as_str(), api_key);
    ctx.try_attach_keypair(keypair_path);

    info!("Submitting attestation...");
    let resp = ctx.submit_attestation(hash.hex(), has_c2pa, tlsh.as_deref())?;
    println!("{}", resp.body);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn logs_info_without_rust_log() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn rust_log_overrides_default() {
        assert_eq!(
            log_filter(Some("debug".to_string())).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(Some("error".to_string())).max_level_hint(),
            Some(LevelFilter::ERROR)
        );
    }
}
