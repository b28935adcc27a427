//! Node registry: pledge-backed registration of storage providers.

use crate::error::{ContractError, Result, StateError};
use crate::host::Host;
use crate::state::ContractState;
use custodia_types::{Address, ContractEvent, NodeInfo, NodeInfoList};
use tracing::{debug, info};

/// Register a node, pulling its pledge into the contract.
pub fn register<H: Host>(host: &mut H, info: NodeInfo) -> Result<()> {
    let mut state = ContractState::new(host);
    let wallet = info.wallet_addr;
    state.require_witness(&wallet)?;
    if state.node(&wallet)?.is_some() {
        return Err(ContractError::AlreadyExists("node"));
    }

    let settings = state.settings()?;
    let pledge = settings
        .pledge_for(info.volume)
        .ok_or(StateError::Overflow("node pledge"))?;
    let contract = state.contract();
    state.transfer(&wallet, &contract, pledge)?;

    let node = NodeInfo {
        pledge,
        profit: 0,
        rest_volume: info.volume,
        ..info
    };
    state.put_node(&node)?;
    let mut set = state.node_set()?;
    set.insert(wallet);
    state.put_node_set(&set)?;

    state.emit(ContractEvent::NodeRegistered {
        wallet,
        volume: node.volume,
        pledge,
    });
    info!(wallet = %wallet, volume = node.volume, pledge, "Node registered");
    Ok(())
}

pub fn query<H: Host>(host: &mut H, wallet: &Address) -> Result<NodeInfo> {
    let state = ContractState::new(host);
    let node = state.require_node(wallet)?;
    debug!(wallet = %wallet, "Node queried");
    Ok(node)
}

/// Change a node's declared capacity or endpoint, settling the pledge delta.
///
/// The record is addressed by `wallet_addr`, so the wallet itself cannot change.
pub fn update<H: Host>(host: &mut H, info: NodeInfo) -> Result<()> {
    let mut state = ContractState::new(host);
    let wallet = info.wallet_addr;
    state.require_witness(&wallet)?;
    let old = state.require_node(&wallet)?;

    let reserved = old.reserved_volume();
    if info.volume < reserved {
        return Err(StateError::CapacityInUse {
            requested: info.volume,
            reserved,
        }
        .into());
    }

    let settings = state.settings()?;
    let pledge = settings
        .pledge_for(info.volume)
        .ok_or(StateError::Overflow("node pledge"))?;
    let contract = state.contract();
    if pledge > old.pledge {
        state.transfer(&wallet, &contract, pledge - old.pledge)?;
    } else if pledge < old.pledge {
        state.transfer(&contract, &wallet, old.pledge - pledge)?;
    }

    let node = NodeInfo {
        pledge,
        profit: old.profit,
        volume: info.volume,
        rest_volume: info.volume - reserved,
        service_time: info.service_time,
        wallet_addr: wallet,
        node_addr: info.node_addr,
    };
    state.put_node(&node)?;
    state.emit(ContractEvent::NodeUpdated {
        wallet,
        volume: node.volume,
        pledge,
    });
    info!(wallet = %wallet, volume = node.volume, pledge, "Node updated");
    Ok(())
}

/// Deregister a node and return its pledge and unclaimed profit.
pub fn cancel<H: Host>(host: &mut H, wallet: &Address) -> Result<()> {
    let mut state = ContractState::new(host);
    state.require_witness(wallet)?;
    let node = state.require_node(wallet)?;

    let refund = node
        .pledge
        .checked_add(node.profit)
        .ok_or(StateError::Overflow("node refund"))?;
    let contract = state.contract();
    state.transfer(&contract, wallet, refund)?;

    state.delete_node(wallet)?;
    let mut set = state.node_set()?;
    set.remove(wallet);
    state.put_node_set(&set)?;

    state.emit(ContractEvent::NodeCancelled {
        wallet: *wallet,
        refund,
    });
    info!(wallet = %wallet, refund, "Node cancelled");
    Ok(())
}

/// Pay out everything the node has earned so far.
pub fn withdraw_profit<H: Host>(host: &mut H, wallet: &Address) -> Result<()> {
    let mut state = ContractState::new(host);
    state.require_witness(wallet)?;
    let mut node = state.require_node(wallet)?;
    if node.profit == 0 {
        return Err(ContractError::InsufficientFunds(format!(
            "node {wallet} has no profit to withdraw"
        )));
    }

    let amount = node.profit;
    let contract = state.contract();
    state.transfer(&contract, wallet, amount)?;
    node.profit = 0;
    state.put_node(&node)?;

    state.emit(ContractEvent::ProfitWithdrawn {
        wallet: *wallet,
        amount,
    });
    info!(wallet = %wallet, amount, "Profit withdrawn");
    Ok(())
}

pub fn list_nodes<H: Host>(host: &mut H) -> Result<NodeInfoList> {
    let state = ContractState::new(host);
    let set = state.node_set()?;
    let mut nodes = Vec::with_capacity(set.len());
    for wallet in set.iter() {
        nodes.push(state.require_node(wallet)?);
    }
    debug!(count = nodes.len(), "Listed nodes");
    Ok(NodeInfoList { nodes })
}
