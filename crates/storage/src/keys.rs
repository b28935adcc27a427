//! Key layout: `contract_address || tag || discriminator`.

use custodia_types::Address;

pub const SETTING: &[u8] = b"setting";
pub const ADMIN: &[u8] = b"admin";
pub const NODE_INFO: &[u8] = b"nodeinfo";
pub const NODE_SET: &[u8] = b"nodeset";
pub const FILE_INFO: &[u8] = b"fileinfo";
pub const FILE_PROVE: &[u8] = b"fileprove";
pub const READ_PLEDGE: &[u8] = b"readpledge";

fn scoped(contract: &Address, tag: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let len = contract.0.len() + tag.len() + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut key = Vec::with_capacity(len);
    key.extend_from_slice(contract.as_bytes());
    key.extend_from_slice(tag);
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

pub fn settings_key(contract: &Address) -> Vec<u8> {
    scoped(contract, SETTING, &[])
}

pub fn admin_key(contract: &Address) -> Vec<u8> {
    scoped(contract, ADMIN, &[])
}

pub fn node_info_key(contract: &Address, wallet: &Address) -> Vec<u8> {
    scoped(contract, NODE_INFO, &[wallet.as_bytes()])
}

pub fn node_set_key(contract: &Address) -> Vec<u8> {
    scoped(contract, NODE_SET, &[])
}

pub fn file_info_key(contract: &Address, file_hash: &[u8]) -> Vec<u8> {
    scoped(contract, FILE_INFO, &[file_hash])
}

pub fn file_prove_key(contract: &Address, file_hash: &[u8]) -> Vec<u8> {
    scoped(contract, FILE_PROVE, &[file_hash])
}

pub fn read_pledge_key(contract: &Address, downloader: &Address, file_hash: &[u8]) -> Vec<u8> {
    scoped(contract, READ_PLEDGE, &[downloader.as_bytes(), file_hash])
}
