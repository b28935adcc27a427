mod common;

use common::*;
use custodia_contract::GAS_TOKEN;
use custodia_crypto::AcceptAllScheme;
use custodia_types::{ReadPledge, ReadPledgeQuery};
use proptest::prelude::*;
use std::sync::Arc;

const FILE: &[u8] = b"QmPropertyFile";

fn harness() -> Harness {
    Harness::new(Arc::new(AcceptAllScheme))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn pledge_tracks_volume_across_updates(
        volumes in proptest::collection::vec(1u64..5_000, 1..8)
    ) {
        let mut h = harness();
        h.register(NODE_A, volumes[0]).unwrap();
        for volume in &volumes[1..] {
            h.call(NODE_A, "NodeUpdate", &node_info(NODE_A, *volume)).unwrap();
        }
        let last = *volumes.last().unwrap();
        let node = h.node(NODE_A);
        prop_assert_eq!(node.pledge, last);
        prop_assert_eq!(node.rest_volume, last);
        prop_assert_eq!(h.balance(&CONTRACT), last);
        prop_assert_eq!(h.balance(&NODE_A), INITIAL_BALANCE - last);
    }

    #[test]
    fn deposit_is_conserved(rounds_a in 0u64..=3, rounds_b in 0u64..=3) {
        let mut h = harness();
        h.register(NODE_A, 1000).unwrap();
        h.register(NODE_B, 1000).unwrap();
        let mut file = file_info(FILE);
        file.copy_number = 2;
        h.store(&file).unwrap();

        for round in 0..rounds_a.max(rounds_b) {
            h.host.advance_to(round * 100);
            if round < rounds_a {
                h.prove_now(NODE_A, FILE).unwrap();
            }
            if round < rounds_b {
                h.prove_now(NODE_B, FILE).unwrap();
            }
        }

        let stored = h.file(FILE);
        let paid = h.node(NODE_A).profit + h.node(NODE_B).profit;
        prop_assert_eq!(paid, (rounds_a + rounds_b) * 101);
        prop_assert_eq!(stored.rest_deposit + paid, stored.deposit);
        prop_assert!(stored.rest_deposit <= stored.deposit);
    }

    #[test]
    fn first_proof_only_inside_first_window(height in 0u64..400) {
        let mut h = harness();
        h.register(NODE_A, 1000).unwrap();
        h.store(&file_info(FILE)).unwrap();
        h.host.advance_to(height);

        let before = h.host.store().snapshot();
        let result = h.prove_now(NODE_A, FILE);
        if height <= 100 {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(h.host.store().snapshot(), before);
        }
    }

    #[test]
    fn read_slices_only_move_forward(slices in proptest::collection::vec(0u64..=12, 1..12)) {
        let mut h = harness();
        h.register(NODE_A, 1000).unwrap();
        h.store(&file_info(FILE)).unwrap();
        let key = downloader_key(9);
        let downloader = address_of(&key);
        h.host.mint(&GAS_TOKEN, &downloader, 1_000).unwrap();
        h.pledge_read(downloader, FILE, &[(NODE_A, 10)]).unwrap();
        let query = ReadPledgeQuery { downloader, file_hash: FILE.to_vec() };

        let mut have = 0u64;
        for slice_id in slices {
            let result = h.call(
                NODE_A,
                "FileReadProfitSettle",
                &signed_slice(&key, FILE, NODE_A, slice_id, 0),
            );
            let accepted = slice_id > have && slice_id <= 10;
            prop_assert_eq!(result.is_ok(), accepted);
            if accepted {
                have = slice_id;
            }

            let pledge: ReadPledge = h.query("GetReadPledge", &query).unwrap();
            prop_assert_eq!(pledge.read_plans[0].have_read_block_num, have);
            prop_assert_eq!(pledge.rest_money + h.node(NODE_A).profit, pledge.total_money);
        }
    }
}
