use crate::harness::TestNode;
use hearth_interfaces::{BlockQueue, ChainStore, StateView, StoreAction, TxPool};
use hearth_node::{
    test_utils::{
        funded_address, transfer_tx, transfer_tx_with_log, ChainBuilder, FUNDED_BALANCE,
    },
    VersionChecker,
};
use hearth_primitives::{constants::TX_GAS, Address, Bytes, CallRequest, LogFilter, B256, U256};

#[test]
fn starts_at_genesis_and_announces_the_network() {
    let node = TestNode::with_config(|config| config.network_id = U256::from(42u64));
    assert_eq!(node.client.chain().number(), 0);
    assert_eq!(node.host.network_id(), U256::from(42u64));
    assert!(!node.client.is_mining());
}

#[test]
fn fresh_import_updates_head_pool_and_watches() {
    let node = TestNode::new();
    let chain = node.client.chain().clone();
    let sender = funded_address(0);
    let topic = B256::with_last_byte(0x42);
    let t1 = transfer_tx_with_log(sender, 0, funded_address(1), 50, topic);
    let t1_hash = t1.hash();
    let watch = node.client.watch_logs(LogFilter::new().topic(0, topic));

    let blocks = ChainBuilder::new(&chain)
        .block(|b| { b.push(t1.clone()); })
        .block(|_| {})
        .build();
    for block in &blocks {
        node.queue.push_block(block);
    }
    node.client.flush_transactions();

    assert_eq!(chain.number(), 2);
    assert_eq!(chain.current_hash(), blocks[1].hash());
    assert!(node.pool.is_empty());

    // the head state tracks the chain head after every pass
    assert_eq!(node.client.pending_state_at(0).head_hash(), chain.current_hash());

    let entries = node.client.check_watch(watch).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].block_number, 1);
    assert_eq!(entries[0].transaction_hash, t1_hash);
    assert!(node.host.new_block_notes() >= 1);
}

#[test]
fn pending_application_reaches_watches_and_host() {
    let node = TestNode::new();
    let sender = funded_address(0);
    let topic = B256::with_last_byte(0x07);
    let pending_watch = node.client.watch_pending();
    let log_watch = node.client.watch_logs(LogFilter::new().topic(0, topic));
    let t3 = transfer_tx_with_log(sender, 0, funded_address(2), 10, topic);

    node.client.inject(&t3.encoded());
    node.client.flush_transactions();

    let pending = node.client.pending_transactions();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].hash(), t3.hash());

    let events = node.client.check_watch(pending_watch).unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].is_special());

    let entries = node.client.check_watch(log_watch).unwrap();
    assert_eq!(entries.len(), 1);
    // pending logs are localised to head + 1
    assert_eq!(entries[0].block_number, 1);
    assert_eq!(entries[0].transaction_hash, t3.hash());

    assert!(node.host.new_transaction_notes() >= 1);
}

#[test]
fn rejected_injections_are_dropped_silently() {
    let node = TestNode::new();
    node.client.inject(b"not a transaction");
    node.client.flush_transactions();
    assert!(node.pool.is_empty());
    assert!(node.client.pending_transactions().is_empty());
}

#[test]
fn call_runs_on_a_transient_copy() {
    let node = TestNode::new();
    let funded = funded_address(0);
    let broke = Address::with_last_byte(0x99);

    // the caller has no funds; the transient credit covers value + gas
    let request = CallRequest {
        from: broke,
        to: funded,
        gas: TX_GAS,
        gas_price: U256::from(1u64),
        value: U256::from(50u64),
        data: Bytes::new(),
    };
    let result = node.client.call(&request);
    assert_eq!(result.gas_used, TX_GAS);

    // neither party's real balance moved
    let state = node.client.pending_state_at(0);
    assert_eq!(state.balance(broke), U256::ZERO);
    assert_eq!(state.balance(funded), U256::from(FUNDED_BALANCE));
}

#[test]
fn quiet_passes_produce_no_notifications() {
    let node = TestNode::new();
    let pending_watch = node.client.watch_pending();
    let chain_watch = node.client.watch_chain();

    node.client.inject(&transfer_tx(funded_address(0), 0, funded_address(1), 5).encoded());
    node.client.flush_transactions();
    node.client.check_watch(pending_watch).unwrap();
    node.client.check_watch(chain_watch).unwrap();

    // nothing external happened: repeated passes stay silent
    node.client.flush_transactions();
    node.client.flush_transactions();
    assert!(node.client.check_watch(pending_watch).unwrap().is_empty());
    assert!(node.client.check_watch(chain_watch).unwrap().is_empty());
}

#[test]
fn clear_pending_resets_state_and_pool() {
    let node = TestNode::new();
    let pending_watch = node.client.watch_pending();
    node.client.inject(&transfer_tx(funded_address(0), 0, funded_address(1), 5).encoded());
    node.client.flush_transactions();
    assert_eq!(node.client.pending_transactions().len(), 1);
    node.client.check_watch(pending_watch).unwrap();

    node.client.clear_pending();
    assert!(node.client.pending_transactions().is_empty());
    assert!(node.pool.is_empty());
    let events = node.client.check_watch(pending_watch).unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].is_special());
}

#[test]
fn beneficiary_change_rebuilds_pending_state() {
    let node = TestNode::new();
    let author = Address::with_last_byte(0x55);
    node.client.inject(&transfer_tx(funded_address(0), 0, funded_address(1), 5).encoded());
    node.client.flush_transactions();
    assert_eq!(node.client.pending_transactions().len(), 1);

    node.client.set_beneficiary(author);
    node.client.flush_transactions();
    assert_eq!(node.client.beneficiary(), author);
    // the pending transaction survived the rebuild
    assert_eq!(node.client.pending_transactions().len(), 1);
}

#[test]
fn stale_store_version_triggers_rebuild_and_status_rewrite() {
    let node = TestNode::with_config(|config| {
        // a status record no current release could have written
        std::fs::write(config.db_path.join("status"), b"garbage").unwrap();
    });
    // the store was rebuilt and serves an empty chain
    assert_eq!(node.client.chain().number(), 0);
    // the status record now carries the current constants
    assert_eq!(VersionChecker::new(node.dir.path()).action(), StoreAction::Trust);
}

#[test]
fn kill_chain_rebuilds_and_resumes_mining() {
    let node = TestNode::new();
    let chain = node.client.chain().clone();

    let blocks = ChainBuilder::new(&chain).block(|_| {}).build();
    node.queue.push_block(&blocks[0]);
    node.client.flush_transactions();
    assert_eq!(chain.number(), 1);

    node.client.inject(&transfer_tx(funded_address(0), 0, funded_address(1), 5).encoded());
    node.client.flush_transactions();
    node.client.start_mining();

    node.client.kill_chain().unwrap();

    assert_eq!(chain.number(), 0);
    assert!(node.pool.is_empty());
    assert!(node.queue.is_empty());
    assert!(node.client.pending_transactions().is_empty());
    assert!(node.client.is_mining());
    assert_eq!(node.host.resets(), 1);

    // the rebuilt node keeps serving imports
    let blocks = ChainBuilder::new(&chain).block(|_| {}).build();
    node.queue.push_block(&blocks[0]);
    node.client.flush_transactions();
    assert_eq!(chain.number(), 1);
}
