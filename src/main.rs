use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use k256::ProjectivePoint;
use rand::rngs::OsRng;
use serde::Serialize;

use threshold_rs::{
    decode_message, decrypt, encode_message, encrypt, generate_threshold_parameters,
    reconstruct_key, storage, KeyPair, SecretShare,
};

#[derive(Parser)]
#[command(name = "threshold", about = "Verifiable (t,n) threshold cryptosystem over secp256k1")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate threshold parameters and save them under a directory.
    Setup {
        /// Number of shares needed to reconstruct the key.
        #[arg(long)]
        threshold: usize,
        /// Total number of shares to issue.
        #[arg(long)]
        shares: usize,
        #[arg(long, default_value = "./threshold_data")]
        dir: PathBuf,
    },
    /// Reconstruct a private key from a comma separated share file.
    Reconstruct {
        /// File holding one line of comma separated share values, issued at
        /// indices 1, 2, ... in order.
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        threshold: usize,
    },
    /// Encrypt a message under a stored public key.
    Encrypt {
        /// File whose first line is the public key as decimal `x,y`.
        #[arg(long)]
        pkfile: PathBuf,
        #[arg(long)]
        msg: String,
        #[arg(long, default_value = "./ciphertext.txt")]
        outfile: PathBuf,
    },
    /// Decrypt a ciphertext file with a reconstructed key.
    Decrypt {
        /// The private key in decimal, as printed by `reconstruct`.
        #[arg(long)]
        key: String,
        #[arg(long, default_value = "./ciphertext.txt")]
        infile: PathBuf,
    },
    /// Bulk-generate standalone keypairs.
    Keygen {
        #[arg(long, default_value_t = 50)]
        count: usize,
        #[arg(long, default_value = "./keys")]
        dir: PathBuf,
    },
}

#[derive(Serialize)]
struct KeyRecord {
    private: String,
    public_x: String,
    public_y: String,
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Setup {
            threshold,
            shares,
            dir,
        } => {
            let setup = generate_threshold_parameters::<ProjectivePoint, _>(
                threshold, shares, &mut OsRng,
            )?;
            storage::save_params(&dir, &setup)
                .with_context(|| format!("saving parameters under {}", dir.display()))?;
            println!(
                "Saved {} shares and {} commitments under {}",
                shares,
                threshold,
                dir.display()
            );
            println!(
                "Public key: {}",
                storage::point_to_decimal(&setup.key_pair.public().to_affine())?
            );
        }

        Command::Reconstruct { file, threshold } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading shares from {}", file.display()))?;
            let line = text
                .lines()
                .next()
                .context("share file is empty")?;
            let shares = line
                .split(',')
                .enumerate()
                .map(|(i, value)| {
                    Ok(SecretShare {
                        index: i as u32 + 1,
                        value: storage::scalar_from_decimal(value)?,
                    })
                })
                .collect::<Result<Vec<_>, threshold_rs::ThresholdError>>()?;
            let key = reconstruct_key(&shares, threshold)?;
            println!("Reconstructed private key: {}", storage::scalar_to_decimal(&key));
        }

        Command::Encrypt {
            pkfile,
            msg,
            outfile,
        } => {
            let text = fs::read_to_string(&pkfile)
                .with_context(|| format!("reading public key from {}", pkfile.display()))?;
            let record = text.lines().next().context("public key file is empty")?;
            let public_key = ProjectivePoint::from(storage::point_from_decimal(record)?);

            let message = encode_message(msg.as_bytes())?;
            let cipher = encrypt(&public_key, &message, &mut OsRng)?;
            storage::save_ciphertext(&outfile, &cipher)
                .with_context(|| format!("writing ciphertext to {}", outfile.display()))?;
            println!("Wrote ciphertext to {}", outfile.display());
        }

        Command::Decrypt { key, infile } => {
            let secret = storage::scalar_from_decimal(&key)?;
            let cipher = storage::load_ciphertext(&infile)
                .with_context(|| format!("reading ciphertext from {}", infile.display()))?;
            let message = decrypt(&secret, &cipher)?;
            let bytes = decode_message(&message).context("could not decode message")?;
            let text = String::from_utf8(bytes).context("message is not valid UTF-8")?;
            println!("{text}");
        }

        Command::Keygen { count, dir } => {
            fs::create_dir_all(&dir)
                .with_context(|| format!("creating {}", dir.display()))?;

            let mut records = Vec::with_capacity(count);
            let mut private = String::new();
            let mut public = String::new();
            for _ in 0..count {
                let key_pair = KeyPair::<ProjectivePoint>::generate(&mut OsRng);
                let (x, y) = storage::point_coordinates(&key_pair.public().to_affine())?;
                let secret = storage::scalar_to_decimal(key_pair.secret());

                private.push_str(&secret);
                private.push('\n');
                public.push_str(&format!("{x},{y}\n"));
                records.push(KeyRecord {
                    private: secret,
                    public_x: x,
                    public_y: y,
                });
            }

            fs::write(dir.join("private.txt"), private)?;
            fs::write(dir.join("public.txt"), public)?;
            fs::write(dir.join("keys.json"), serde_json::to_string_pretty(&records)?)?;
            println!("Wrote {count} keypairs under {}", dir.display());
        }
    }

    Ok(())
}
