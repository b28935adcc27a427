#![allow(dead_code)]

use custodia_codec::{decode_exact, encode_to_vec, Decode, Encode};
use custodia_contract::{LocalHost, Result, StorageContract, GAS_TOKEN};
use custodia_crypto::{sign_slice, ProofScheme};
use custodia_types::{
    Address, FileInfo, NodeInfo, PdpData, PdpParams, ReadPlan, ReadPledge, ReadSettleSlice,
    Settings, SettingsInit, StorageType,
};
use ed25519_dalek::SigningKey;
use std::sync::Arc;

pub const CONTRACT: Address = Address([0xC0; 20]);
pub const ADMIN: Address = Address([0xAD; 20]);
pub const NODE_A: Address = Address([0x0A; 20]);
pub const NODE_B: Address = Address([0x0B; 20]);
pub const OWNER: Address = Address([0x0E; 20]);

pub const INITIAL_BALANCE: u64 = 1_000_000;

/// Route contract logs to the test writer; set `RUST_LOG` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Unit pricing so amounts in assertions stay readable.
pub fn unit_settings() -> Settings {
    Settings {
        gas_price: 1,
        storage_rate: 1,
        read_rate: 1,
        challenge_overhead: 1,
        max_prove_block_num: 32,
    }
}

pub fn node_info(wallet: Address, volume: u64) -> NodeInfo {
    NodeInfo {
        pledge: 0,
        profit: 0,
        volume,
        rest_volume: 0,
        service_time: 86_400,
        wallet_addr: wallet,
        node_addr: format!("tcp://{}:30338", wallet.to_hex()).into_bytes(),
    }
}

pub fn pdp_params(blocks: u64) -> Vec<u8> {
    encode_to_vec(&PdpParams {
        version: 1,
        verification_key: vec![0x5A; 32],
        file_id: b"file-id".to_vec(),
        block_commitments: (0..blocks).map(|i| i.to_le_bytes().to_vec()).collect(),
    })
}

/// 10 blocks of 1 KB, one copy, a round every 100 blocks, 3 rounds.
pub fn file_info(hash: &[u8]) -> FileInfo {
    FileInfo {
        file_hash: hash.to_vec(),
        owner: OWNER,
        file_desc: b"archive.tar".to_vec(),
        block_count: 10,
        block_size: 1,
        copy_number: 1,
        challenge_rate: 100,
        challenge_times: 3,
        deposit: 0,
        rest_deposit: 0,
        pdp_param: pdp_params(10),
        prove_block_num: 0,
        block_height: 0,
        time_start: 0,
        valid_flag: true,
        storage_type: StorageType::ByFile,
    }
}

pub fn downloader_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

pub fn address_of(key: &SigningKey) -> Address {
    Address::from_public_key(&key.verifying_key().to_bytes())
}

pub fn signed_slice(
    key: &SigningKey,
    file_hash: &[u8],
    pay_to: Address,
    slice_id: u64,
    pledge_height: u64,
) -> ReadSettleSlice {
    let mut slice = ReadSettleSlice {
        file_hash: file_hash.to_vec(),
        pay_from: address_of(key),
        pay_to,
        slice_pay: slice_id,
        slice_id,
        pledge_height,
        signature: Vec::new(),
        pubkey: Vec::new(),
    };
    sign_slice(&mut slice, key);
    slice
}

/// A contract behind a [`LocalHost`], driven through the method table.
pub struct Harness {
    pub host: LocalHost,
    pub contract: StorageContract,
}

impl Harness {
    pub fn new(scheme: Arc<dyn ProofScheme>) -> Self {
        Self::with_settings(scheme, unit_settings())
    }

    pub fn with_settings(scheme: Arc<dyn ProofScheme>, settings: Settings) -> Self {
        init_tracing();
        let mut host = LocalHost::in_memory(CONTRACT);
        for holder in [NODE_A, NODE_B, OWNER] {
            host.mint(&GAS_TOKEN, &holder, INITIAL_BALANCE).unwrap();
        }
        let mut harness = Self {
            host,
            contract: StorageContract::new(scheme),
        };
        harness
            .call(ADMIN, "FsSettingInit", &SettingsInit { admin: ADMIN, settings })
            .unwrap();
        harness
    }

    pub fn call<T: Encode>(&mut self, signer: Address, method: &str, input: &T) -> Result<Vec<u8>> {
        self.host.sign_as(signer);
        let input = encode_to_vec(input);
        self.host.invoke(&self.contract, method, &input)
    }

    pub fn query<I: Encode, O: Decode>(&mut self, method: &str, input: &I) -> Result<O> {
        self.host.clear_signers();
        let input = encode_to_vec(input);
        let output = self.host.invoke(&self.contract, method, &input)?;
        Ok(decode_exact(&output)?)
    }

    pub fn register(&mut self, wallet: Address, volume: u64) -> Result<Vec<u8>> {
        self.call(wallet, "NodeRegister", &node_info(wallet, volume))
    }

    pub fn store(&mut self, file: &FileInfo) -> Result<Vec<u8>> {
        self.call(file.owner, "StoreFile", file)
    }

    pub fn prove(
        &mut self,
        wallet: Address,
        file_hash: &[u8],
        challenge_height: u64,
    ) -> Result<Vec<u8>> {
        let pdp = PdpData {
            version: 1,
            file_hash: file_hash.to_vec(),
            wallet_addr: wallet,
            proof: b"aggregate-proof".to_vec(),
            challenge_height,
        };
        self.call(wallet, "FileProve", &pdp)
    }

    /// Prove at the current height, using it as the challenge height.
    pub fn prove_now(&mut self, wallet: Address, file_hash: &[u8]) -> Result<Vec<u8>> {
        let height = self.host.height();
        self.prove(wallet, file_hash, height)
    }

    pub fn node(&mut self, wallet: Address) -> NodeInfo {
        self.query("NodeQuery", &wallet).unwrap()
    }

    pub fn file(&mut self, file_hash: &[u8]) -> FileInfo {
        self.query("GetFileInfo", &file_hash.to_vec()).unwrap()
    }

    pub fn balance(&self, holder: &Address) -> u64 {
        self.host.balance(&GAS_TOKEN, holder)
    }

    pub fn pledge_read(
        &mut self,
        downloader: Address,
        file_hash: &[u8],
        plans: &[(Address, u64)],
    ) -> Result<Vec<u8>> {
        let pledge = ReadPledge {
            file_hash: file_hash.to_vec(),
            downloader,
            block_height: 0,
            total_money: 0,
            rest_money: 0,
            block_price: 0,
            read_plans: plans
                .iter()
                .map(|(node, max)| ReadPlan {
                    node_addr: *node,
                    max_read_block_num: *max,
                    have_read_block_num: 0,
                })
                .collect(),
        };
        self.call(downloader, "ReadFilePledge", &pledge)
    }
}
