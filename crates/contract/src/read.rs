//! Read escrow and slice-by-slice payment of serving nodes.

use crate::error::{ContractError, Result, SettleError, StateError};
use crate::host::Host;
use crate::state::ContractState;
use custodia_crypto::verify_slice;
use custodia_types::{Address, ContractEvent, ReadPledge, ReadSettleSlice};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Lock the read money for a download plan.
pub fn pledge_read<H: Host>(host: &mut H, pledge: ReadPledge) -> Result<()> {
    let mut state = ContractState::new(host);
    let downloader = pledge.downloader;
    state.require_witness(&downloader)?;

    let file = state.require_file(&pledge.file_hash)?;
    if !file.valid_flag || file.is_expired_at(state.height()) {
        return Err(ContractError::NotFound("valid file"));
    }
    if state.read_pledge(&downloader, &pledge.file_hash)?.is_some() {
        return Err(ContractError::AlreadyExists("read pledge"));
    }
    if pledge.read_plans.is_empty() {
        return Err(StateError::InvalidReadPlan("no nodes in plan".into()).into());
    }

    let mut seen = BTreeSet::new();
    let mut blocks: u64 = 0;
    for plan in &pledge.read_plans {
        if !seen.insert(plan.node_addr) {
            return Err(
                StateError::InvalidReadPlan(format!("node {} listed twice", plan.node_addr)).into(),
            );
        }
        if plan.max_read_block_num == 0 || plan.max_read_block_num > file.block_count {
            return Err(StateError::InvalidReadPlan(format!(
                "node {} may read {} of {} blocks",
                plan.node_addr, plan.max_read_block_num, file.block_count
            ))
            .into());
        }
        if state.node(&plan.node_addr)?.is_none() {
            return Err(ContractError::NotFound("node"));
        }
        blocks = blocks
            .checked_add(plan.max_read_block_num)
            .ok_or(StateError::Overflow("read blocks"))?;
    }

    let settings = state.settings()?;
    let block_price = settings
        .read_fee(1, file.block_size)
        .ok_or(StateError::Overflow("read price"))?;
    let total = blocks
        .checked_mul(block_price)
        .ok_or(StateError::Overflow("read pledge"))?;
    let contract = state.contract();
    state.transfer(&downloader, &contract, total)?;

    let mut read_plans = pledge.read_plans;
    for plan in &mut read_plans {
        plan.have_read_block_num = 0;
    }
    let stored = ReadPledge {
        file_hash: pledge.file_hash,
        downloader,
        block_height: state.height(),
        total_money: total,
        rest_money: total,
        block_price,
        read_plans,
    };
    state.put_read_pledge(&stored)?;

    state.emit(ContractEvent::ReadPledged {
        file_hash: stored.file_hash.clone(),
        downloader,
        total_money: total,
    });
    info!(
        file = %hex::encode(&stored.file_hash),
        downloader = %downloader,
        total,
        nodes = stored.read_plans.len(),
        "Read pledged"
    );
    Ok(())
}

pub fn get_read_pledge<H: Host>(
    host: &mut H,
    downloader: &Address,
    file_hash: &[u8],
) -> Result<ReadPledge> {
    let state = ContractState::new(host);
    let pledge = state
        .read_pledge(downloader, file_hash)?
        .ok_or(ContractError::NotFound("read pledge"))?;
    debug!(downloader = %downloader, rest = pledge.rest_money, "Read pledge queried");
    Ok(pledge)
}

/// Pay a node for the blocks between its last settled slice and `slice.slice_id`.
///
/// Fees use the price recorded in the pledge, so repricing and file deletion
/// leave existing escrow payable.
pub fn settle_read<H: Host>(host: &mut H, slice: ReadSettleSlice) -> Result<()> {
    let mut state = ContractState::new(host);
    state.require_witness(&slice.pay_to)?;

    let mut pledge = state
        .read_pledge(&slice.pay_from, &slice.file_hash)?
        .ok_or(ContractError::NotFound("read pledge"))?;
    let pledge_height = pledge.block_height;
    let rest_money = pledge.rest_money;
    let block_price = pledge.block_price;
    let plan = pledge
        .plan_mut(&slice.pay_to)
        .ok_or(SettleError::PayeeNotInPlan(slice.pay_to))?;
    if slice.slice_id <= plan.have_read_block_num || slice.slice_id > plan.max_read_block_num {
        return Err(SettleError::SliceOutOfRange {
            slice_id: slice.slice_id,
            have: plan.have_read_block_num,
            max: plan.max_read_block_num,
        }
        .into());
    }
    if slice.pledge_height != pledge_height {
        return Err(SettleError::PledgeMismatch {
            expected: pledge_height,
            got: slice.pledge_height,
        }
        .into());
    }
    verify_slice(&slice).map_err(|err| SettleError::BadSignature(err.to_string()))?;

    let blocks = slice.slice_id - plan.have_read_block_num;
    let fee = blocks
        .checked_mul(block_price)
        .ok_or(StateError::Overflow("read fee"))?;
    if fee > rest_money {
        return Err(SettleError::InsufficientEscrow {
            needed: fee,
            available: rest_money,
        }
        .into());
    }

    plan.have_read_block_num = slice.slice_id;
    pledge.rest_money -= fee;

    let mut node = state.require_node(&slice.pay_to)?;
    node.profit = node
        .profit
        .checked_add(fee)
        .ok_or(StateError::Overflow("node profit"))?;
    state.put_node(&node)?;
    state.put_read_pledge(&pledge)?;

    state.emit(ContractEvent::ReadSettled {
        file_hash: slice.file_hash.clone(),
        pay_from: slice.pay_from,
        pay_to: slice.pay_to,
        slice_id: slice.slice_id,
        fee,
    });
    info!(
        file = %hex::encode(&slice.file_hash),
        pay_to = %slice.pay_to,
        slice_id = slice.slice_id,
        fee,
        rest_money = pledge.rest_money,
        "Read slice settled"
    );
    Ok(())
}
