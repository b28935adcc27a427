//! File deals: deposit escrow, lookup and deletion.

use crate::error::{ContractError, Result, StateError};
use crate::host::Host;
use crate::prove::{release_capacity, required_volume};
use crate::state::ContractState;
use custodia_types::{ContractEvent, FileInfo, ProveDetails, StorageType};
use tracing::{debug, info};

/// Blocks challenged per round when the owner does not ask for a number.
pub const DEFAULT_PROVE_BLOCK_NUM: u64 = 32;

fn validate(file: &FileInfo) -> Result<()> {
    if file.storage_type == StorageType::BySpace {
        return Err(StateError::UnsupportedStorageType.into());
    }
    if file.file_hash.is_empty() {
        return Err(StateError::InvalidFileParams("file_hash is empty").into());
    }
    let zero = [
        (file.block_count, "block_count is zero"),
        (file.copy_number, "copy_number is zero"),
        (file.challenge_rate, "challenge_rate is zero"),
        (file.challenge_times, "challenge_times is zero"),
    ];
    if let Some((_, reason)) = zero.iter().find(|(value, _)| *value == 0) {
        return Err(StateError::InvalidFileParams(*reason).into());
    }
    Ok(())
}

/// Open a deal: escrow the owner's deposit and create an empty proof record.
pub fn store_file<H: Host>(
    host: &mut H,
    file: FileInfo,
    default_prove_block_num: u64,
) -> Result<()> {
    let mut state = ContractState::new(host);
    if state.file(&file.file_hash)?.is_some() {
        return Err(ContractError::AlreadyExists("file"));
    }
    validate(&file)?;
    state.require_witness(&file.owner)?;

    let settings = state.settings()?;
    let deposit = settings
        .deposit_for(
            file.block_count,
            file.block_size,
            file.copy_number,
            file.challenge_rate,
            file.challenge_times,
        )
        .ok_or(StateError::Overflow("file deposit"))?;
    let requested = if file.prove_block_num == 0 {
        default_prove_block_num
    } else {
        file.prove_block_num
    };
    let stored = FileInfo {
        deposit,
        rest_deposit: deposit,
        prove_block_num: requested.min(settings.max_prove_block_num),
        block_height: state.height(),
        time_start: state.time(),
        valid_flag: true,
        ..file
    };
    stored
        .expiry_height()
        .ok_or(StateError::Overflow("file expiry height"))?;

    let contract = state.contract();
    state.transfer(&stored.owner, &contract, deposit)?;
    state.put_file(&stored)?;
    state.put_prove_details(&stored.file_hash, &ProveDetails::new(stored.copy_number))?;

    state.emit(ContractEvent::FileStored {
        file_hash: stored.file_hash.clone(),
        owner: stored.owner,
        deposit,
    });
    info!(
        file = %hex::encode(&stored.file_hash),
        owner = %stored.owner,
        deposit,
        copies = stored.copy_number,
        "File stored"
    );
    Ok(())
}

/// Current record; `valid_flag` reflects expiry at the current height.
pub fn get_file_info<H: Host>(host: &mut H, file_hash: &[u8]) -> Result<FileInfo> {
    let state = ContractState::new(host);
    let mut file = state.require_file(file_hash)?;
    if file.is_expired_at(state.height()) {
        file.valid_flag = false;
    }
    debug!(file = %hex::encode(file_hash), valid = file.valid_flag, "File queried");
    Ok(file)
}

pub fn get_prove_details<H: Host>(host: &mut H, file_hash: &[u8]) -> Result<ProveDetails> {
    let state = ContractState::new(host);
    state
        .prove_details(file_hash)?
        .ok_or(ContractError::NotFound("prove details"))
}

/// Close a deal, refunding the unspent deposit to the owner.
///
/// Nodes still holding an active proof record get their reserved capacity
/// back. Read pledges on the file stay settleable.
pub fn delete_file<H: Host>(host: &mut H, file_hash: &[u8]) -> Result<()> {
    let mut state = ContractState::new(host);
    let file = state.require_file(file_hash)?;
    state.require_witness(&file.owner)?;

    let volume = required_volume(&file)?;
    let details = state.prove_details(file_hash)?.unwrap_or_default();
    for detail in details.details.iter().filter(|d| !d.settle_flag) {
        let Some(mut node) = state.node(&detail.wallet_addr)? else {
            continue;
        };
        release_capacity(&mut node, volume);
        state.put_node(&node)?;
        debug!(wallet = %detail.wallet_addr, volume, "Capacity released on delete");
    }

    let contract = state.contract();
    state.transfer(&contract, &file.owner, file.rest_deposit)?;
    state.delete_file(file_hash)?;
    state.delete_prove_details(file_hash)?;

    state.emit(ContractEvent::FileDeleted {
        file_hash: file.file_hash.clone(),
        owner: file.owner,
        refund: file.rest_deposit,
    });
    info!(
        file = %hex::encode(file_hash),
        refund = file.rest_deposit,
        "File deleted"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::GAS_TOKEN;
    use crate::local_host::LocalHost;
    use custodia_types::Address;

    const CONTRACT: Address = Address([0xC0; 20]);
    const OWNER: Address = Address([0x22; 20]);

    fn file(hash: &[u8]) -> FileInfo {
        FileInfo {
            file_hash: hash.to_vec(),
            owner: OWNER,
            file_desc: b"backup.tar".to_vec(),
            block_count: 10,
            block_size: 1,
            copy_number: 1,
            challenge_rate: 100,
            challenge_times: 3,
            deposit: 0,
            rest_deposit: 0,
            pdp_param: Vec::new(),
            prove_block_num: 0,
            block_height: 0,
            time_start: 0,
            valid_flag: false,
            storage_type: StorageType::ByFile,
        }
    }

    fn host() -> LocalHost {
        let mut host = LocalHost::in_memory(CONTRACT);
        host.mint(&GAS_TOKEN, &OWNER, 10_000_000).unwrap();
        host.sign_as(OWNER);
        host.advance_to(5);
        host
    }

    #[test]
    fn store_escrows_deposit() {
        let mut host = host();
        host.execute(|h| store_file(h, file(b"a"), DEFAULT_PROVE_BLOCK_NUM))
            .unwrap();

        let stored = host.execute(|h| get_file_info(h, b"a")).unwrap();
        // (10 * 1 * 1 + 100 * 3 * 1) * 1 * 2000
        assert_eq!(stored.deposit, 620_000);
        assert_eq!(stored.rest_deposit, 620_000);
        assert_eq!(stored.block_height, 5);
        assert_eq!(stored.prove_block_num, 32);
        assert!(stored.valid_flag);
        assert_eq!(host.balance(&GAS_TOKEN, &CONTRACT), 620_000);

        let details = host.execute(|h| get_prove_details(h, b"a")).unwrap();
        assert_eq!(details, ProveDetails::new(1));
    }

    #[test]
    fn duplicate_and_invalid_deals_rejected() {
        let mut host = host();
        host.execute(|h| store_file(h, file(b"a"), DEFAULT_PROVE_BLOCK_NUM))
            .unwrap();
        let dup = host.execute(|h| store_file(h, file(b"a"), DEFAULT_PROVE_BLOCK_NUM));
        assert!(matches!(dup, Err(ContractError::AlreadyExists("file"))));

        let mut by_space = file(b"b");
        by_space.storage_type = StorageType::BySpace;
        let result = host.execute(|h| store_file(h, by_space, DEFAULT_PROVE_BLOCK_NUM));
        assert!(matches!(
            result,
            Err(ContractError::State(StateError::UnsupportedStorageType))
        ));

        let mut no_copies = file(b"c");
        no_copies.copy_number = 0;
        let result = host.execute(|h| store_file(h, no_copies, DEFAULT_PROVE_BLOCK_NUM));
        assert!(matches!(
            result,
            Err(ContractError::State(StateError::InvalidFileParams(_)))
        ));
    }

    #[test]
    fn file_reports_invalid_after_expiry() {
        let mut host = host();
        host.execute(|h| store_file(h, file(b"a"), DEFAULT_PROVE_BLOCK_NUM))
            .unwrap();
        host.advance_to(5 + 300 + 1);
        assert!(!host.execute(|h| get_file_info(h, b"a")).unwrap().valid_flag);
    }

    #[test]
    fn delete_refunds_owner() {
        let mut host = host();
        host.execute(|h| store_file(h, file(b"a"), DEFAULT_PROVE_BLOCK_NUM))
            .unwrap();
        host.execute(|h| delete_file(h, b"a")).unwrap();
        assert_eq!(host.balance(&GAS_TOKEN, &OWNER), 10_000_000);
        assert!(matches!(
            host.execute(|h| get_prove_details(h, b"a")),
            Err(ContractError::NotFound(_))
        ));
    }

    #[test]
    fn delete_needs_owner() {
        let mut host = host();
        host.execute(|h| store_file(h, file(b"a"), DEFAULT_PROVE_BLOCK_NUM))
            .unwrap();
        host.sign_as(Address([0x99; 20]));
        let result = host.execute(|h| delete_file(h, b"a"));
        assert!(matches!(result, Err(ContractError::Unauthorized(a)) if a == OWNER));
    }
}
