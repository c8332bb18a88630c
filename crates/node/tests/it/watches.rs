use crate::harness::TestNode;
use hearth_node::{
    filter::WATCH_TTL,
    test_utils::{funded_address, transfer_tx_with_log, ChainBuilder},
    FilterError,
};
use hearth_primitives::{LogFilter, B256};
use std::time::{Duration, Instant};

#[test]
fn idle_watches_are_collected() {
    let node = TestNode::new();
    let watch = node.client.watch_pending();
    // the first poll starts the idle clock
    node.client.check_watch(watch).unwrap();

    // not yet stale
    node.client.collect_stale_watches(Instant::now() + WATCH_TTL - Duration::from_secs(1));
    assert!(node.client.check_watch(watch).is_ok());

    // the poll above restarted the clock; jump past the ttl
    node.client.collect_stale_watches(Instant::now() + WATCH_TTL + Duration::from_secs(5));
    assert!(matches!(node.client.check_watch(watch), Err(FilterError::UnknownWatch(_))));
}

#[test]
fn never_polled_watches_survive_collection() {
    let node = TestNode::new();
    let watch = node.client.watch_chain();
    node.client.collect_stale_watches(Instant::now() + WATCH_TTL + Duration::from_secs(60));
    assert!(node.client.check_watch(watch).is_ok());
}

#[test]
fn peek_keeps_entries_until_checked() {
    let node = TestNode::new();
    let chain = node.client.chain().clone();
    let topic = B256::with_last_byte(0x33);
    let watch = node.client.watch_logs(LogFilter::new().topic(0, topic));

    let tx = transfer_tx_with_log(funded_address(0), 0, funded_address(1), 5, topic);
    let blocks = ChainBuilder::new(&chain).block(|b| { b.push(tx); }).build();
    node.queue.push_block(&blocks[0]);
    node.client.flush_transactions();

    assert_eq!(node.client.peek_watch(watch).unwrap().len(), 1);
    assert_eq!(node.client.peek_watch(watch).unwrap().len(), 1);
    assert_eq!(node.client.check_watch(watch).unwrap().len(), 1);
    assert!(node.client.check_watch(watch).unwrap().is_empty());
}

#[test]
fn uninstalling_frees_the_watch() {
    let node = TestNode::new();
    let watch = node.client.watch_pending();
    assert!(node.client.uninstall_watch(watch));
    assert!(!node.client.uninstall_watch(watch));
    assert!(matches!(node.client.check_watch(watch), Err(FilterError::UnknownWatch(_))));
}

#[test]
fn duplicate_filters_feed_independent_watches() {
    let node = TestNode::new();
    let chain = node.client.chain().clone();
    let topic = B256::with_last_byte(0x44);
    let filter = LogFilter::new().topic(0, topic);
    let first = node.client.watch_logs(filter.clone());
    let second = node.client.watch_logs(filter);

    let tx = transfer_tx_with_log(funded_address(0), 0, funded_address(1), 5, topic);
    let blocks = ChainBuilder::new(&chain).block(|b| { b.push(tx); }).build();
    node.queue.push_block(&blocks[0]);
    node.client.flush_transactions();

    assert_eq!(node.client.check_watch(first).unwrap().len(), 1);
    assert_eq!(node.client.check_watch(second).unwrap().len(), 1);
}
