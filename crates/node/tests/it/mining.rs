use crate::harness::TestNode;
use hearth_interfaces::{ChainStore, Pow};
use hearth_node::test_utils::{funded_address, transfer_tx, FakePow};
use std::{
    thread,
    time::{Duration, Instant},
};

#[test]
fn remote_work_roundtrip_seals_a_block() {
    let node = TestNode::new();
    let chain = node.client.chain().clone();
    node.client.inject(&transfer_tx(funded_address(0), 0, funded_address(1), 10).encoded());
    node.client.flush_transactions();
    assert_eq!(node.client.pending_transactions().len(), 1);

    let work = node.client.get_work();
    let proof = FakePow.solve(&work, 0, 1).unwrap();
    assert!(node.client.submit_work(&proof));
    node.client.flush_transactions();

    assert_eq!(chain.number(), 1);
    // the head state tracked the newly mined block
    assert!(node.client.pending_transactions().is_empty());

    // the advertised package was consumed by the accepted proof
    assert!(!node.client.submit_work(&proof));
}

#[test]
fn stale_proofs_are_rejected() {
    let node = TestNode::new();
    node.client.inject(&transfer_tx(funded_address(0), 0, funded_address(1), 10).encoded());
    node.client.flush_transactions();
    let first = node.client.get_work();

    // pending moved on: a second transaction entered the candidate
    node.client.inject(&transfer_tx(funded_address(1), 0, funded_address(2), 20).encoded());
    node.client.flush_transactions();
    let second = node.client.get_work();
    assert_ne!(first.header_hash, second.header_hash);

    let stale = FakePow.solve(&first, 0, 1).unwrap();
    assert!(!node.client.submit_work(&stale));
    let good = FakePow.solve(&second, 0, 1).unwrap();
    assert!(node.client.submit_work(&good));
}

#[test]
fn local_miner_seals_pending_transactions() {
    let node = TestNode::new();
    let chain = node.client.chain().clone();
    node.client.inject(&transfer_tx(funded_address(0), 0, funded_address(1), 10).encoded());
    node.client.start_mining();

    let deadline = Instant::now() + Duration::from_secs(30);
    while chain.number() < 1 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    assert!(chain.number() >= 1, "the local miner never sealed a block");
    assert!(node.client.is_mining());

    // the sealed round eventually lands in the history samples
    let deadline = Instant::now() + Duration::from_secs(30);
    while node.client.mining_history().is_empty() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    assert!(!node.client.mining_history().is_empty());
}

#[test]
fn force_mining_seals_empty_blocks() {
    let node = TestNode::with_config(|config| config.force_mining = true);
    let chain = node.client.chain().clone();
    node.client.start_mining();

    let deadline = Instant::now() + Duration::from_secs(30);
    while chain.number() < 2 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    assert!(chain.number() >= 2, "force mining never advanced the empty chain");

    node.client.stop_mining();
    assert!(!node.client.is_mining());
}

#[test]
fn miners_do_not_run_while_the_host_is_syncing() {
    let node = TestNode::new();
    let chain = node.client.chain().clone();
    node.host.set_syncing(true);
    node.client.inject(&transfer_tx(funded_address(0), 0, funded_address(1), 10).encoded());
    node.client.start_mining();

    thread::sleep(Duration::from_millis(500));
    assert_eq!(chain.number(), 0, "a syncing node must not mine");

    node.host.set_syncing(false);
    let deadline = Instant::now() + Duration::from_secs(30);
    while chain.number() < 1 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(chain.number(), 1);
}

#[test]
fn mining_threads_are_replaced_wholesale() {
    let node = TestNode::new();
    assert_eq!(node.client.mining_threads(), 1);

    node.client.start_mining();
    node.client.set_mining_threads(3);
    assert_eq!(node.client.mining_threads(), 3);
    // reconfiguring stops mining until it is restarted explicitly
    assert!(!node.client.is_mining());

    node.client.set_mining_threads(2);
    assert_eq!(node.client.mining_threads(), 2);
}

#[test]
fn turbo_mining_clamps_the_worker_count() {
    let node = TestNode::with_config(|config| {
        config.turbo_mining = true;
        config.miners = 4;
    });
    assert_eq!(node.client.mining_threads(), 1);
}
