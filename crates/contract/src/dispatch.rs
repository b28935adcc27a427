//! Method table: external names to typed handlers.

use crate::config::ContractConfig;
use crate::error::{ContractError, Result};
use crate::file::{self, DEFAULT_PROVE_BLOCK_NUM};
use crate::host::Host;
use crate::{node, prove, read, settings};
use custodia_codec::{decode_exact, encode_to_vec, Decode, BYTE_TRUE};
use custodia_crypto::ProofScheme;
use custodia_types::{
    Address, FileInfo, NodeInfo, PdpData, ReadPledge, ReadPledgeQuery, ReadSettleSlice, Settings,
    SettingsInit,
};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Every method the contract answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    FsSettingInit,
    FsSetting,
    GetSetting,
    NodeRegister,
    NodeQuery,
    NodeUpdate,
    NodeCancel,
    GetNodeList,
    StoreFile,
    GetFileInfo,
    NodeWithdrawProfit,
    FileProve,
    GetFileProveDetails,
    ReadFilePledge,
    GetReadPledge,
    FileReadProfitSettle,
    DeleteFile,
}

impl Method {
    pub const ALL: [Method; 17] = [
        Method::FsSettingInit,
        Method::FsSetting,
        Method::GetSetting,
        Method::NodeRegister,
        Method::NodeQuery,
        Method::NodeUpdate,
        Method::NodeCancel,
        Method::GetNodeList,
        Method::StoreFile,
        Method::GetFileInfo,
        Method::NodeWithdrawProfit,
        Method::FileProve,
        Method::GetFileProveDetails,
        Method::ReadFilePledge,
        Method::GetReadPledge,
        Method::FileReadProfitSettle,
        Method::DeleteFile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::FsSettingInit => "FsSettingInit",
            Method::FsSetting => "FsSetting",
            Method::GetSetting => "GetSetting",
            Method::NodeRegister => "NodeRegister",
            Method::NodeQuery => "NodeQuery",
            Method::NodeUpdate => "NodeUpdate",
            Method::NodeCancel => "NodeCancel",
            Method::GetNodeList => "GetNodeList",
            Method::StoreFile => "StoreFile",
            Method::GetFileInfo => "GetFileInfo",
            Method::NodeWithdrawProfit => "NodeWithdrawProfit",
            Method::FileProve => "FileProve",
            Method::GetFileProveDetails => "GetFileProveDetails",
            Method::ReadFilePledge => "ReadFilePledge",
            Method::GetReadPledge => "GetReadPledge",
            Method::FileReadProfitSettle => "FileReadProfitSettle",
            Method::DeleteFile => "DeleteFile",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ContractError;

    fn from_str(name: &str) -> Result<Self> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| ContractError::UnknownMethod(name.to_string()))
    }
}

/// The storage-proof contract bound to a proof scheme.
#[derive(Clone)]
pub struct StorageContract {
    scheme: Arc<dyn ProofScheme>,
    default_prove_block_num: u64,
}

impl StorageContract {
    pub fn new(scheme: Arc<dyn ProofScheme>) -> Self {
        Self {
            scheme,
            default_prove_block_num: DEFAULT_PROVE_BLOCK_NUM,
        }
    }

    pub fn from_config(config: &ContractConfig, scheme: Arc<dyn ProofScheme>) -> Self {
        Self {
            scheme,
            default_prove_block_num: config.default_prove_block_num,
        }
    }

    /// Decode `input`, run `method` against `host` and encode the result.
    pub fn invoke<H: Host>(&self, host: &mut H, method: &str, input: &[u8]) -> Result<Vec<u8>> {
        let method: Method = method.parse()?;
        debug!(%method, input_len = input.len(), "Dispatching call");
        self.call(host, method, input)
    }

    pub fn call<H: Host>(&self, host: &mut H, method: Method, input: &[u8]) -> Result<Vec<u8>> {
        match method {
            Method::FsSettingInit => {
                settings::init_settings(host, arg::<SettingsInit>(input)?)?;
                done()
            }
            Method::FsSetting => {
                settings::update_settings(host, arg::<Settings>(input)?)?;
                done()
            }
            Method::GetSetting => Ok(encode_to_vec(&settings::get_settings(host)?)),
            Method::NodeRegister => {
                node::register(host, arg::<NodeInfo>(input)?)?;
                done()
            }
            Method::NodeQuery => {
                let wallet = arg::<Address>(input)?;
                Ok(encode_to_vec(&node::query(host, &wallet)?))
            }
            Method::NodeUpdate => {
                node::update(host, arg::<NodeInfo>(input)?)?;
                done()
            }
            Method::NodeCancel => {
                node::cancel(host, &arg::<Address>(input)?)?;
                done()
            }
            Method::GetNodeList => Ok(encode_to_vec(&node::list_nodes(host)?)),
            Method::StoreFile => {
                file::store_file(host, arg::<FileInfo>(input)?, self.default_prove_block_num)?;
                done()
            }
            Method::GetFileInfo => {
                let hash = arg::<Vec<u8>>(input)?;
                Ok(encode_to_vec(&file::get_file_info(host, &hash)?))
            }
            Method::NodeWithdrawProfit => {
                node::withdraw_profit(host, &arg::<Address>(input)?)?;
                done()
            }
            Method::FileProve => {
                prove::submit_proof(host, arg::<PdpData>(input)?, self.scheme.as_ref())?;
                done()
            }
            Method::GetFileProveDetails => {
                let hash = arg::<Vec<u8>>(input)?;
                Ok(encode_to_vec(&file::get_prove_details(host, &hash)?))
            }
            Method::ReadFilePledge => {
                read::pledge_read(host, arg::<ReadPledge>(input)?)?;
                done()
            }
            Method::GetReadPledge => {
                let query = arg::<ReadPledgeQuery>(input)?;
                Ok(encode_to_vec(&read::get_read_pledge(
                    host,
                    &query.downloader,
                    &query.file_hash,
                )?))
            }
            Method::FileReadProfitSettle => {
                read::settle_read(host, arg::<ReadSettleSlice>(input)?)?;
                done()
            }
            Method::DeleteFile => {
                file::delete_file(host, &arg::<Vec<u8>>(input)?)?;
                done()
            }
        }
    }
}

fn done() -> Result<Vec<u8>> {
    Ok(BYTE_TRUE.to_vec())
}

fn arg<T: Decode>(input: &[u8]) -> Result<T> {
    Ok(decode_exact(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn unknown_name_rejected() {
        let err = "FsGetNodeList".parse::<Method>().unwrap_err();
        assert!(matches!(err, ContractError::UnknownMethod(name) if name == "FsGetNodeList"));
    }
}
