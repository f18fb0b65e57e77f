use alloy::primitives::{Address, U256};

pub mod network;

pub mod view;

pub mod wallets;

pub mod vending_types {
    use alloy::sol;

    sol!(
        #[sol(rpc)]
        contract VendingMachine {
            function beliProduk() external payable;
            function hargaProduk() external view returns (uint256);
            function jumlahPembelian(address buyer) external view returns (uint256);
            function owner() external view returns (address);
            function tarikDana() external;
        }
    );
}

/// Verified VendingMachine V.4 deployment on the Monad testnet.
pub const VENDING_MACHINE_ADDRESS: &str = "0x95113fe45A8D5cAeA05a2cfea3B4613A4Fa10fc7";

/// Fixed contribution, 0.5 of the native currency in wei.
pub const CONTRIBUTION_WEI: u128 = 500_000_000_000_000_000;

pub fn contribution_amount() -> U256 {
    U256::from(CONTRIBUTION_WEI)
}

/// Render a raw wei value as a human amount, trailing zeros trimmed.
/// Display only; never feed the result back into arithmetic.
pub fn format_native(value: U256, decimals: u8) -> String {
    let base = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / base;
    let frac = value % base;
    if frac.is_zero() {
        return whole.to_string();
    }
    let mut frac = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    while frac.ends_with('0') {
        frac.pop();
    }
    format!("{whole}.{frac}")
}

/// First ten characters of a 0x-prefixed hash, then an ellipsis.
pub fn short_hash(hash: &str) -> String {
    let prefix: String = hash.chars().take(10).collect();
    format!("{prefix}...")
}

pub fn short_address(address: &Address) -> String {
    let s = address.to_string();
    format!("{}...{}", &s[..6], &s[s.len() - 4..])
}

pub fn explorer_tx_url(explorer_base: &str, tx_hash: &str) -> String {
    format!("{}/tx/{}", explorer_base.trim_end_matches('/'), tx_hash)
}
