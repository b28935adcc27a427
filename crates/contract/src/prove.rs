//! Proof rounds: window checks, verification and per-round payment.
//!
//! Each (node, file) pair moves `NoRecord -> Active -> Settled`. The first
//! accepted proof creates the record and reserves the node's capacity; the
//! last round, or expiry of the file, settles it and releases the capacity.

use crate::error::{ContractError, ProveError, Result, StateError};
use crate::host::Host;
use crate::state::ContractState;
use custodia_crypto::{verify, ProofScheme, VerifyError};
use custodia_types::{ContractEvent, FileInfo, NodeInfo, PdpData, ProveDetail};
use tracing::{debug, info, warn};

pub(crate) fn release_capacity(node: &mut NodeInfo, volume: u64) {
    node.rest_volume = node.rest_volume.saturating_add(volume).min(node.volume);
}

pub(crate) fn required_volume(file: &FileInfo) -> Result<u64> {
    file.required_volume()
        .ok_or(ContractError::State(StateError::Overflow("file volume")))
}

/// Accept one round of proof from a node for a file.
pub fn submit_proof<H: Host>(host: &mut H, pdp: PdpData, scheme: &dyn ProofScheme) -> Result<()> {
    let mut state = ContractState::new(host);
    let wallet = pdp.wallet_addr;
    state.require_witness(&wallet)?;
    let mut file = state.require_file(&pdp.file_hash)?;
    let mut node = state.require_node(&wallet)?;
    let mut details = state
        .prove_details(&pdp.file_hash)?
        .ok_or(ContractError::NotFound("prove details"))?;
    let volume = required_volume(&file)?;
    let height = state.height();

    if !file.valid_flag || file.is_expired_at(height) {
        file.valid_flag = false;
        state.put_file(&file)?;
        let Some(detail) = details.find_mut(&wallet) else {
            return Err(ProveError::FileInvalid.into());
        };
        if detail.settle_flag {
            return Err(ProveError::AlreadySettled.into());
        }
        detail.settle_flag = true;
        let prove_times = detail.prove_times;
        release_capacity(&mut node, volume);
        state.put_node(&node)?;
        state.put_prove_details(&file.file_hash, &details)?;
        state.emit(ContractEvent::ProofSettled {
            file_hash: file.file_hash.clone(),
            wallet,
            prove_times,
        });
        info!(
            file = %hex::encode(&file.file_hash),
            wallet = %wallet,
            prove_times,
            "File expired, proof record settled"
        );
        return Ok(());
    }

    let proven = match details.find(&wallet) {
        Some(detail) => {
            if detail.prove_times >= file.challenge_times {
                return Err(ProveError::ProveExhausted.into());
            }
            if detail.settle_flag {
                return Err(ProveError::AlreadySettled.into());
            }
            detail.prove_times
        }
        None => {
            if details.is_full() {
                return Err(ProveError::CopiesExhausted.into());
            }
            if node.rest_volume < volume {
                return Err(ProveError::InsufficientCapacity {
                    needed: volume,
                    available: node.rest_volume,
                }
                .into());
            }
            0
        }
    };

    let (start, end) = file
        .prove_window(proven)
        .ok_or(StateError::Overflow("proof window"))?;
    if height < start || height > end {
        warn!(wallet = %wallet, height, start, end, "Proof outside its window");
        return Err(ProveError::ProveOutOfWindow { height, start, end }.into());
    }
    if pdp.challenge_height < start || pdp.challenge_height > height {
        return Err(ProveError::ProveOutOfWindow {
            height: pdp.challenge_height,
            start,
            end: height,
        }
        .into());
    }
    let block_hash = state
        .header_hash(pdp.challenge_height)
        .ok_or(ContractError::NotFound("block header"))?;

    verify(
        &wallet,
        &block_hash,
        file.block_count,
        file.prove_block_num,
        &file.pdp_param,
        &pdp.proof,
        scheme,
    )
    .map_err(|err| match err {
        VerifyError::BadParams(reason) => ProveError::BadPdpParams(reason),
        VerifyError::ProofInvalid { index } => ProveError::ProofInvalid { index },
    })?;

    let settings = state.settings()?;
    let profit = settings
        .profit_per_round(file.challenge_rate)
        .ok_or(StateError::Overflow("round profit"))?;
    if file.rest_deposit < profit {
        return Err(ProveError::InsufficientDeposit {
            needed: profit,
            available: file.rest_deposit,
        }
        .into());
    }
    file.rest_deposit -= profit;
    node.profit = node
        .profit
        .checked_add(profit)
        .ok_or(StateError::Overflow("node profit"))?;

    if details.find(&wallet).is_none() {
        node.rest_volume -= volume;
        details.details.push(ProveDetail {
            node_addr: node.node_addr.clone(),
            wallet_addr: wallet,
            prove_times: 0,
            settle_flag: false,
        });
    }
    let detail = details
        .find_mut(&wallet)
        .ok_or(ContractError::NotFound("prove record"))?;
    detail.prove_times += 1;
    let prove_times = detail.prove_times;
    let settled = prove_times == file.challenge_times;
    if settled {
        detail.settle_flag = true;
        release_capacity(&mut node, volume);
    }

    state.put_file(&file)?;
    state.put_node(&node)?;
    state.put_prove_details(&file.file_hash, &details)?;

    state.emit(ContractEvent::ProofAccepted {
        file_hash: file.file_hash.clone(),
        wallet,
        prove_times,
        profit,
    });
    debug!(challenge_height = pdp.challenge_height, "Proof verified");
    info!(
        file = %hex::encode(&file.file_hash),
        wallet = %wallet,
        prove_times,
        profit,
        rest_deposit = file.rest_deposit,
        "Proof accepted"
    );
    if settled {
        state.emit(ContractEvent::ProofSettled {
            file_hash: file.file_hash.clone(),
            wallet,
            prove_times,
        });
        info!(file = %hex::encode(&file.file_hash), wallet = %wallet, "Proof record settled");
    }
    Ok(())
}
