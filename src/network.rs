use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Parameters of the single supported network. The built-in profile targets
/// the Monad testnet; `--network-file` may substitute another deployment of
/// the same contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkProfile {
    pub chain_id: u64,
    pub name: String,
    pub currency_symbol: String,
    pub currency_decimals: u8,
    pub rpc_url: String,
    pub explorer_url: String,
}

impl NetworkProfile {
    pub fn monad_testnet() -> Self {
        NetworkProfile {
            chain_id: 10143,
            name: String::from("Monad Testnet"),
            currency_symbol: String::from("MON"),
            currency_decimals: 18,
            rpc_url: String::from("https://testnet-rpc.monad.xyz/"),
            explorer_url: String::from("https://testnet.monadexplorer.com"),
        }
    }
}

pub fn load_profile(path: impl AsRef<Path>) -> Result<NetworkProfile> {
    let path = path.as_ref();
    let data = fs::read(path)
        .wrap_err_with(|| format!("Failed to read network profile {}", path.display()))?;
    serde_json::from_slice(&data)
        .wrap_err_with(|| format!("Failed to parse network profile {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monad_testnet__matches_deployment_parameters() {
        let profile = NetworkProfile::monad_testnet();
        assert_eq!(profile.chain_id, 10143);
        assert_eq!(profile.currency_symbol, "MON");
        assert_eq!(profile.currency_decimals, 18);
        assert_eq!(profile.explorer_url, "https://testnet.monadexplorer.com");
    }

    #[test]
    fn profile__parses_from_json() {
        let raw = r#"{
            "chain_id": 1,
            "name": "Somewhere",
            "currency_symbol": "ETH",
            "currency_decimals": 18,
            "rpc_url": "http://localhost:8545",
            "explorer_url": "http://localhost:4000"
        }"#;
        let profile: NetworkProfile = serde_json::from_str(raw).unwrap();
        assert_eq!(profile.chain_id, 1);
        assert_eq!(profile.name, "Somewhere");
    }
}
