use ethers::{types::Address, utils::to_checksum};
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

lazy_static! {
    /// `0x` + 40位十六进制
    pub static ref WALLET_ADDRESS_REGEX: Regex = Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("wallet address regex");
}

/// 仅校验地址格式
pub fn is_wallet_address_format(address: &str) -> bool {
    WALLET_ADDRESS_REGEX.is_match(address)
}

/// 校验以太坊地址。
///
/// 全小写或全大写的地址只检查格式；大小写混合的地址必须符合 EIP-55 校验和。
pub fn is_valid_address(address: &str) -> bool {
    if !is_wallet_address_format(address) {
        return false;
    }

    let parsed = match Address::from_str(address) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    let hex = &address[2..];
    if hex == hex.to_lowercase() || hex == hex.to_uppercase() {
        return true;
    }

    to_checksum(&parsed, None) == address
}

/// 数据库中统一存储小写地址
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}
