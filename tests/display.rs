use alloy::primitives::{U256, address};
use vending_machine::{
    CONTRIBUTION_WEI, contribution_amount, explorer_tx_url, format_native, short_address,
    short_hash,
};

#[test]
fn format_native__renders_half_mon_price() {
    // given: hargaProduk() as read from the contract, in wei
    let harga = U256::from(500_000_000_000_000_000u64);

    assert_eq!(format_native(harga, 18), "0.5");
}

#[test]
fn format_native__trims_whole_values() {
    assert_eq!(
        format_native(U256::from(3_000_000_000_000_000_000u64), 18),
        "3"
    );
    assert_eq!(format_native(U256::ZERO, 18), "0");
}

#[test]
fn format_native__keeps_smallest_unit() {
    assert_eq!(format_native(U256::from(1u64), 18), "0.000000000000000001");
}

#[test]
fn contribution__matches_displayed_price() {
    assert_eq!(contribution_amount(), U256::from(CONTRIBUTION_WEI));
    assert_eq!(format_native(contribution_amount(), 18), "0.5");
}

#[test]
fn short_hash__keeps_first_ten_characters() {
    let hash = "0xabc1234567890defabc1234567890defabc1234567890defabc1234567890de";

    assert_eq!(short_hash(hash), "0xabc12345...");
}

#[test]
fn explorer_tx_url__concatenates_base_and_full_hash() {
    let hash = "0xabc1234567890defabc1234567890defabc1234567890defabc1234567890de";

    assert_eq!(
        explorer_tx_url("https://testnet.monadexplorer.com", hash),
        format!("https://testnet.monadexplorer.com/tx/{hash}")
    );
}

#[test]
fn short_address__keeps_prefix_and_suffix() {
    let address = address!("1234000000000000000000000000000000005678");

    let shortened = short_address(&address);

    assert_eq!(shortened, "0x1234...5678");
}
