use crate::harness::TestNode;
use hearth_interfaces::{ChainStore, TxPool};
use hearth_node::test_utils::{funded_address, transfer_tx, ChainBuilder};

#[test]
fn reorg_resurrects_displaced_transactions() {
    let node = TestNode::new();
    let chain = node.client.chain().clone();
    let t1 = transfer_tx(funded_address(0), 0, funded_address(2), 100);
    let t2 = transfer_tx(funded_address(1), 0, funded_address(3), 200);

    // canonical chain: G -> B1(T1) -> B2(T2)
    let main = ChainBuilder::new(&chain)
        .block(|b| { b.push(t1.clone()); })
        .block(|b| { b.push(t2.clone()); })
        .build();
    for block in &main {
        node.queue.push_block(block);
    }
    node.client.flush_transactions();
    assert_eq!(chain.number(), 2);
    assert_eq!(chain.current_hash(), main[1].hash());

    // competing branch from genesis, heavier, carrying only T2
    let branch = ChainBuilder::from_parent(&chain, chain.genesis_hash())
        .block(|b| { b.push(t2.clone()); })
        .block(|_| {})
        .block(|_| {})
        .build();
    for block in &branch {
        node.queue.push_block(block);
    }
    node.client.flush_transactions();

    assert_eq!(chain.number(), 3);
    assert_eq!(chain.current_hash(), branch[2].hash());

    // T1 was mined only on the dead branch: back into the pool
    assert!(node.pool.contains(t1.hash()));
    // T2 is canonical on the new branch: gone from the pool
    assert!(!node.pool.contains(t2.hash()));

    // the resurrected transfer is re-applied to the rebuilt pending state
    let pending = node.client.pending_transactions();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].hash(), t1.hash());
}

#[test]
fn reorg_signals_chain_and_pending_watches() {
    let node = TestNode::new();
    let chain = node.client.chain().clone();
    let chain_watch = node.client.watch_chain();
    let t1 = transfer_tx(funded_address(0), 0, funded_address(2), 100);

    let main = ChainBuilder::new(&chain).block(|b| { b.push(t1.clone()); }).build();
    node.queue.push_block(&main[0]);
    node.client.flush_transactions();
    assert_eq!(node.client.check_watch(chain_watch).unwrap().len(), 1);

    let branch = ChainBuilder::from_parent(&chain, chain.genesis_hash())
        .block(|_| {})
        .block(|_| {})
        .build();
    for block in &branch {
        node.queue.push_block(block);
    }
    node.client.flush_transactions();

    let events = node.client.check_watch(chain_watch).unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].is_special());
    assert!(node.pool.contains(t1.hash()));
}

#[test]
fn losing_side_chain_changes_nothing() {
    let node = TestNode::new();
    let chain = node.client.chain().clone();

    let main = ChainBuilder::new(&chain).block(|_| {}).block(|_| {}).build();
    for block in &main {
        node.queue.push_block(block);
    }
    node.client.flush_transactions();
    let head = chain.current_hash();

    // a single competing block cannot outweigh two
    let branch = ChainBuilder::from_parent(&chain, chain.genesis_hash()).block(|_| {}).build();
    node.queue.push_block(&branch[0]);
    let chain_watch = node.client.watch_chain();
    node.client.flush_transactions();

    assert_eq!(chain.current_hash(), head);
    assert!(node.client.check_watch(chain_watch).unwrap().is_empty());
}
