use alloy::signers::local::PrivateKeySigner;
use color_eyre::eyre::{Result, WrapErr, eyre};
use eth_keystore::decrypt_key;
use rpassword::prompt_password;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WalletKind {
    /// Encrypted JSON keystore, unlocked with a password prompt.
    Keystore,
    /// Plain hex private key file.
    RawKey,
}

#[derive(Clone, Debug)]
pub struct WalletDescriptor {
    pub name: String,
    pub path: PathBuf,
    pub kind: WalletKind,
}

impl WalletDescriptor {
    pub fn new(name: impl Into<String>, path: PathBuf, kind: WalletKind) -> Self {
        Self {
            name: name.into(),
            path,
            kind,
        }
    }
}

pub fn default_wallet_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").wrap_err("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".monad").join("wallets"))
}

pub fn resolve_wallet_dir(dir: Option<&str>) -> Result<PathBuf> {
    match dir {
        Some(raw) => {
            let expanded = shellexpand::tilde(raw);
            Ok(PathBuf::from(expanded.into_owned()))
        }
        None => default_wallet_dir(),
    }
}

pub fn list_wallets(dir: &Path) -> Result<Vec<WalletDescriptor>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut wallets = Vec::new();
    for entry in fs::read_dir(dir).wrap_err("Failed to read wallet directory")? {
        let entry = entry.wrap_err("Failed to read wallet entry")?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let kind = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => WalletKind::Keystore,
            Some("key") => WalletKind::RawKey,
            _ => continue,
        };
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| eyre!("Invalid wallet filename {:?}", path))?
            .to_owned();
        wallets.push(WalletDescriptor::new(name, path, kind));
    }
    wallets.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(wallets)
}

pub fn find_wallet(dir: &Path, name: &str) -> Result<WalletDescriptor> {
    let wallets = list_wallets(dir)?;
    wallets
        .into_iter()
        .find(|w| w.name == name)
        .ok_or_else(|| eyre!("Wallet '{name}' not found in {}", dir.to_string_lossy()))
}

pub fn unlock_wallet(descriptor: &WalletDescriptor) -> Result<PrivateKeySigner> {
    match descriptor.kind {
        WalletKind::Keystore => {
            let prompt = format!("Enter password for wallet '{}': ", descriptor.name);
            let password = prompt_password(prompt).wrap_err("Failed to read wallet password")?;
            let secret = decrypt_key(&descriptor.path, password.as_bytes())
                .map_err(|_| eyre!("Invalid password for wallet '{}'", descriptor.name))?;
            PrivateKeySigner::from_slice(&secret)
                .map_err(|_| eyre!("Wallet '{}' contained unsupported key material", descriptor.name))
        }
        WalletKind::RawKey => {
            let raw = fs::read_to_string(&descriptor.path).wrap_err_with(|| {
                format!("Failed to read key file for wallet '{}'", descriptor.name)
            })?;
            let hex_key = raw.trim().trim_start_matches("0x");
            let secret = hex::decode(hex_key)
                .map_err(|_| eyre!("Wallet '{}' is not valid hex", descriptor.name))?;
            PrivateKeySigner::from_slice(&secret)
                .map_err(|_| eyre!("Wallet '{}' contained unsupported key material", descriptor.name))
        }
    }
}
