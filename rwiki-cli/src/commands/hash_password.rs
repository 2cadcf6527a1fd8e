//! `rwiki hash-password` - bcrypt a password for ADMIN_PASSWORD_HASH.

use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct HashPasswordArgs {
    /// Password to hash; read from stdin when omitted
    password: Option<String>,

    /// bcrypt cost factor
    #[arg(long, default_value_t = bcrypt::DEFAULT_COST)]
    cost: u32,
}

pub fn run(args: HashPasswordArgs) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read password from stdin")?;
            buf.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if password.is_empty() {
        bail!("password is empty");
    }

    let hash = bcrypt::hash(&password, args.cost).context("bcrypt hashing failed")?;
    println!("{hash}");
    Ok(())
}
