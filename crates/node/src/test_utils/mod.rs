//! In-memory mock collaborators for testing the client.
//!
//! The mock chain executes a tiny transfer-only state machine: a transaction
//! moves `value` from its sender to its recipient, consuming one nonce, and
//! a transaction whose input is exactly 32 bytes additionally emits a log at
//! the recipient with that word as its only topic. Heaviest total difficulty
//! wins reorgs. Gas is metered nominally but not charged.

use crate::client::Client;
use hearth_interfaces::{
    BlockQueue, CallError, ChainStore, ChainSync, HostHandle, ImportError, ImportRoute, NodeTypes,
    PoolError, Pow, StateView, StoreAction, StoreError, TxPool,
};
use hearth_primitives::{
    constants::{DEFAULT_GAS_PRICE, TX_GAS},
    keccak256, Address, BlockInfo, Bloom, Bytes, CallRequest, ExecutionResult, LogEntry, PowProof,
    Receipt, Transaction, TxHash, WorkPackage, B256, U256,
};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use parking_lot::{Mutex, RwLock};
use std::{
    collections::{HashMap, HashSet, VecDeque},
    path::Path,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

/// Difficulty of every mock block.
pub const MOCK_DIFFICULTY: u64 = 0x20000;

/// Gas limit of every mock block.
pub const MOCK_GAS_LIMIT: u64 = 10_000_000;

/// Number of pre-funded genesis accounts.
pub const FUNDED_ACCOUNTS: usize = 8;

/// Balance each funded genesis account starts with.
pub const FUNDED_BALANCE: u64 = 1_000_000_000;

/// The component bundle backed entirely by the mocks in this module.
#[derive(Debug)]
pub struct MockNode;

impl NodeTypes for MockNode {
    type Chain = MemChain;
    type Pool = MemPool;
    type Queue = MemQueue;
    type Host = MockHost;
    type Pow = FakePow;
}

/// A [`Client`] over the mock bundle.
pub type MockClient = Client<MockNode>;

/// The `index`-th pre-funded genesis account.
pub fn funded_address(index: usize) -> Address {
    assert!(index < FUNDED_ACCOUNTS, "only {FUNDED_ACCOUNTS} funded accounts exist");
    Address::with_last_byte(0xe0 + index as u8)
}

/// A plain transfer, funded and priced so the default pricer accepts it.
pub fn transfer_tx(from: Address, nonce: u64, to: Address, value: u64) -> Transaction {
    Transaction {
        sender: from,
        nonce,
        gas_price: DEFAULT_GAS_PRICE,
        gas: TX_GAS,
        to,
        value: U256::from(value),
        input: Bytes::new(),
        signature: Bytes::from(vec![1u8; 65]),
    }
}

/// A transfer that also emits a log at `to` with `topic` as its only topic.
pub fn transfer_tx_with_log(
    from: Address,
    nonce: u64,
    to: Address,
    value: u64,
    topic: B256,
) -> Transaction {
    let mut tx = transfer_tx(from, nonce, to, value);
    tx.input = Bytes::copy_from_slice(topic.as_slice());
    tx
}

// === accounts ===

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Account {
    balance: U256,
    nonce: u64,
}

fn genesis_accounts() -> HashMap<Address, Account> {
    (0..FUNDED_ACCOUNTS)
        .map(|i| (funded_address(i), Account { balance: U256::from(FUNDED_BALANCE), nonce: 0 }))
        .collect()
}

fn tx_logs(tx: &Transaction) -> Vec<LogEntry> {
    if tx.input.len() == 32 {
        vec![LogEntry {
            address: tx.to,
            topics: vec![B256::from_slice(&tx.input)],
            data: tx.input.clone(),
        }]
    } else {
        Vec::new()
    }
}

fn apply_tx(
    accounts: &mut HashMap<Address, Account>,
    tx: &Transaction,
) -> Result<Receipt, &'static str> {
    let sender = accounts.entry(tx.sender).or_default();
    if tx.nonce != sender.nonce {
        return Err("nonce mismatch")
    }
    if sender.balance < tx.value {
        return Err("insufficient balance")
    }
    sender.balance -= tx.value;
    sender.nonce += 1;
    accounts.entry(tx.to).or_default().balance += tx.value;
    Ok(Receipt::new(B256::ZERO, TX_GAS, tx_logs(tx)))
}

// === blocks ===

/// The mock block format: header fields, the transaction list and the seal.
#[derive(Clone, Debug, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct TestBlock {
    /// Parent hash.
    pub parent_hash: B256,
    /// Block number.
    pub number: u64,
    /// Block difficulty.
    pub difficulty: U256,
    /// Timestamp.
    pub timestamp: u64,
    /// Gas limit.
    pub gas_limit: u64,
    /// Beneficiary of the block reward.
    pub beneficiary: Address,
    /// Transactions in the block.
    pub transactions: Vec<Transaction>,
    /// Seal: mix digest.
    pub mix_hash: B256,
    /// Seal: nonce.
    pub nonce: u64,
}

impl TestBlock {
    /// The block hash, over the sealed encoding.
    pub fn hash(&self) -> B256 {
        keccak256(alloy_rlp::encode(self))
    }

    /// The proof-of-work input: the hash of the block with the seal zeroed.
    pub fn work_hash(&self) -> B256 {
        let mut unsealed = self.clone();
        unsealed.mix_hash = B256::ZERO;
        unsealed.nonce = 0;
        keccak256(alloy_rlp::encode(&unsealed))
    }

    /// The RLP encoding.
    pub fn encoded(&self) -> Bytes {
        alloy_rlp::encode(self).into()
    }

    /// Decodes a block from raw bytes.
    pub fn decode(mut raw: &[u8]) -> Result<Self, alloy_rlp::Error> {
        <Self as alloy_rlp::Decodable>::decode(&mut raw)
    }
}

fn genesis_block() -> TestBlock {
    TestBlock {
        parent_hash: B256::ZERO,
        number: 0,
        difficulty: U256::from(1u64),
        timestamp: 0,
        gas_limit: MOCK_GAS_LIMIT,
        beneficiary: Address::ZERO,
        transactions: Vec::new(),
        mix_hash: B256::ZERO,
        nonce: 0,
    }
}

#[derive(Clone, Debug)]
struct StoredBlock {
    block: TestBlock,
    td: U256,
    receipts: Vec<Receipt>,
    info: BlockInfo,
}

#[derive(Debug)]
struct ChainInner {
    blocks: HashMap<B256, StoredBlock>,
    /// Canonical hashes, indexed by block number.
    canon: Vec<B256>,
    genesis: B256,
}

impl ChainInner {
    fn fresh() -> Self {
        let genesis = genesis_block();
        let hash = genesis.hash();
        let info = BlockInfo {
            hash,
            parent_hash: B256::ZERO,
            number: 0,
            timestamp: genesis.timestamp,
            gas_limit: genesis.gas_limit,
            logs_bloom: Bloom::ZERO,
        };
        let stored =
            StoredBlock { td: genesis.difficulty, receipts: Vec::new(), info, block: genesis };
        Self { blocks: HashMap::from([(hash, stored)]), canon: vec![hash], genesis: hash }
    }

    fn head(&self) -> B256 {
        *self.canon.last().expect("canonical chain is never empty")
    }

    fn accounts_at(&self, hash: B256) -> HashMap<Address, Account> {
        let mut path = Vec::new();
        let mut cursor = hash;
        while cursor != B256::ZERO {
            path.push(cursor);
            cursor = match self.blocks.get(&cursor) {
                Some(stored) => stored.block.parent_hash,
                None => break,
            };
        }
        path.reverse();
        let mut accounts = genesis_accounts();
        for hash in path {
            if let Some(stored) = self.blocks.get(&hash) {
                for tx in &stored.block.transactions {
                    let _ = apply_tx(&mut accounts, tx);
                }
            }
        }
        accounts
    }

    /// Validates, executes and stores a block. Returns its hash; importing a
    /// known block is a no-op.
    fn insert(&mut self, block: TestBlock) -> Result<B256, ImportError> {
        let hash = block.hash();
        if self.blocks.contains_key(&hash) {
            return Ok(hash)
        }
        let Some(parent) = self.blocks.get(&block.parent_hash) else {
            return Err(ImportError::UnknownParent(block.parent_hash));
        };
        if block.number != parent.block.number + 1 {
            return Err(ImportError::Invalid("discontinuous block number".into()));
        }
        let parent_td = parent.td;
        let mut accounts = self.accounts_at(block.parent_hash);
        let mut receipts = Vec::with_capacity(block.transactions.len());
        let mut bloom = Bloom::ZERO;
        for tx in &block.transactions {
            let receipt =
                apply_tx(&mut accounts, tx).map_err(|msg| ImportError::Invalid(msg.into()))?;
            bloom |= receipt.bloom;
            receipts.push(receipt);
        }
        let info = BlockInfo {
            hash,
            parent_hash: block.parent_hash,
            number: block.number,
            timestamp: block.timestamp,
            gas_limit: block.gas_limit,
            logs_bloom: bloom,
        };
        self.blocks.insert(hash, StoredBlock { td: parent_td + block.difficulty, receipts, info, block });
        Ok(hash)
    }

    /// Makes `candidate` the head if it outranks the current head by total
    /// difficulty. Returns the newly canonical hashes, ascending.
    fn maybe_reorg(&mut self, candidate: B256) -> Vec<B256> {
        let head = self.head();
        if candidate == head {
            return Vec::new()
        }
        let candidate_td = match self.blocks.get(&candidate) {
            Some(stored) => stored.td,
            None => return Vec::new(),
        };
        let head_td = self.blocks[&head].td;
        if candidate_td <= head_td {
            return Vec::new()
        }

        let mut new_canon = Vec::new();
        let mut cursor = candidate;
        while cursor != B256::ZERO {
            new_canon.push(cursor);
            cursor = self.blocks[&cursor].block.parent_hash;
        }
        new_canon.reverse();

        let old: HashSet<B256> = self.canon.iter().copied().collect();
        let fresh = new_canon.iter().filter(|hash| !old.contains(*hash)).copied().collect();
        self.canon = new_canon;
        fresh
    }
}

/// An in-memory chain store executing the mock state machine.
#[derive(Clone, Debug)]
pub struct MemChain {
    inner: Arc<RwLock<ChainInner>>,
}

impl MemChain {
    /// A fresh chain holding only the genesis block.
    pub fn in_memory() -> Self {
        Self { inner: Arc::new(RwLock::new(ChainInner::fresh())) }
    }

    /// Hash of the genesis block.
    pub fn genesis_hash(&self) -> B256 {
        self.inner.read().genesis
    }

    /// The canonical hashes, genesis first.
    pub fn canonical_chain(&self) -> Vec<B256> {
        self.inner.read().canon.clone()
    }

    /// The stored block, if known.
    pub fn block(&self, hash: B256) -> Option<TestBlock> {
        self.inner.read().blocks.get(&hash).map(|stored| stored.block.clone())
    }

    fn accounts_at_block(&self, hash: B256) -> Option<HashMap<Address, Account>> {
        let inner = self.inner.read();
        inner.blocks.contains_key(&hash).then(|| inner.accounts_at(hash))
    }
}

impl ChainStore for MemChain {
    type StateDb = MemStateDb;
    type State = MemState;

    fn open(_path: &Path, _action: StoreAction) -> Result<Self, StoreError> {
        Ok(Self::in_memory())
    }

    fn open_db(_path: &Path, _action: StoreAction) -> Result<Self::StateDb, StoreError> {
        Ok(MemStateDb)
    }

    fn reopen(&self, _path: &Path, action: StoreAction) -> Result<(), StoreError> {
        if action == StoreAction::Kill {
            *self.inner.write() = ChainInner::fresh();
        }
        Ok(())
    }

    fn current_hash(&self) -> B256 {
        self.inner.read().head()
    }

    fn number(&self) -> u64 {
        (self.inner.read().canon.len() - 1) as u64
    }

    fn info(&self, hash: B256) -> Option<BlockInfo> {
        self.inner.read().blocks.get(&hash).map(|stored| stored.info.clone())
    }

    fn receipts(&self, hash: B256) -> Vec<Receipt> {
        self.inner
            .read()
            .blocks
            .get(&hash)
            .map(|stored| stored.receipts.clone())
            .unwrap_or_default()
    }

    fn transactions(&self, hash: B256) -> Vec<Bytes> {
        self.inner
            .read()
            .blocks
            .get(&hash)
            .map(|stored| stored.block.transactions.iter().map(Transaction::encoded).collect())
            .unwrap_or_default()
    }

    fn transaction_hashes(&self, hash: B256) -> Vec<TxHash> {
        self.inner
            .read()
            .blocks
            .get(&hash)
            .map(|stored| stored.block.transactions.iter().map(Transaction::hash).collect())
            .unwrap_or_default()
    }

    fn attempt_import(&self, block: &[u8], _db: &Self::StateDb) -> Result<ImportRoute, ImportError> {
        let block = TestBlock::decode(block)?;
        let mut inner = self.inner.write();
        let hash = inner.insert(block)?;
        let canonical = inner.maybe_reorg(hash);
        Ok(ImportRoute { canonical, head: inner.head() })
    }

    fn sync<Q: BlockQueue>(&self, queue: &Q, _db: &Self::StateDb, max: usize) -> ChainSync {
        let raws = queue.drain(max);
        let mut inner = self.inner.write();
        let old_canon = inner.canon.clone();
        for raw in raws {
            let Ok(block) = TestBlock::decode(&raw) else { continue };
            // invalid blocks never become canonical; the batch carries on
            let Ok(hash) = inner.insert(block) else { continue };
            inner.maybe_reorg(hash);
        }
        let old: HashSet<B256> = old_canon.iter().copied().collect();
        let new: HashSet<B256> = inner.canon.iter().copied().collect();
        ChainSync {
            fresh: inner.canon.iter().filter(|hash| !old.contains(*hash)).copied().collect(),
            dead: old_canon.iter().filter(|hash| !new.contains(*hash)).copied().collect(),
            more: !queue.is_empty(),
        }
    }

    fn garbage_collect(&self) {}

    fn genesis_state(&self, _db: &Self::StateDb) -> Self::State {
        let genesis = self.genesis_hash();
        MemState {
            head: genesis,
            head_number: 0,
            head_timestamp: 0,
            beneficiary: Address::ZERO,
            base: genesis_accounts(),
            accounts: genesis_accounts(),
            pending: Vec::new(),
            receipts: Vec::new(),
            committed: None,
        }
    }

    fn state_at(&self, _db: &Self::StateDb, block: B256) -> Option<Self::State> {
        let (parent_accounts, stored) = {
            let inner = self.inner.read();
            let stored = inner.blocks.get(&block)?.clone();
            let parent_accounts = if stored.block.parent_hash == B256::ZERO {
                genesis_accounts()
            } else {
                inner.accounts_at(stored.block.parent_hash)
            };
            (parent_accounts, stored)
        };
        let accounts = self.accounts_at_block(block)?;
        Some(MemState {
            head: block,
            head_number: stored.block.number,
            head_timestamp: stored.block.timestamp,
            beneficiary: stored.block.beneficiary,
            base: parent_accounts,
            accounts,
            pending: stored.block.transactions.clone(),
            receipts: stored.receipts,
            committed: None,
        })
    }
}

/// The mock state database handle. Carries no data: the mock executes by
/// replaying the chain, so the overlay-adoption dance is a no-op here.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemStateDb;

#[derive(Clone, Debug)]
struct Committed {
    block: TestBlock,
    sealed: Option<Bytes>,
}

/// The mock state view: balances and nonces derived by replaying the chain,
/// plus the applied pending transactions.
#[derive(Clone, Debug)]
pub struct MemState {
    head: B256,
    head_number: u64,
    head_timestamp: u64,
    beneficiary: Address,
    /// Accounts at `head`, before pending transactions.
    base: HashMap<Address, Account>,
    /// Accounts with pending transactions applied.
    accounts: HashMap<Address, Account>,
    pending: Vec<Transaction>,
    receipts: Vec<Receipt>,
    committed: Option<Committed>,
}

impl MemState {
    /// Receipts of the applied pending transactions, position-aligned.
    pub fn pending_receipts(&self) -> &[Receipt] {
        &self.receipts
    }
}

impl StateView<MemChain> for MemState {
    fn sync_to_head(&mut self, chain: &MemChain) -> bool {
        let head = chain.current_hash();
        if head == self.head {
            return false
        }
        let Some(info) = chain.info(head) else { return false };
        let Some(accounts) = chain.accounts_at_block(head) else { return false };
        self.head = head;
        self.head_number = info.number;
        self.head_timestamp = info.timestamp;
        self.base = accounts.clone();
        self.accounts = accounts;
        self.pending.clear();
        self.receipts.clear();
        self.committed = None;
        true
    }

    fn head_hash(&self) -> B256 {
        self.head
    }

    fn beneficiary(&self) -> Address {
        self.beneficiary
    }

    fn set_beneficiary(&mut self, address: Address) {
        self.beneficiary = address;
    }

    fn apply_pool<P: TxPool>(
        &mut self,
        _chain: &MemChain,
        pool: &P,
        min_gas_price: U256,
    ) -> Vec<Receipt> {
        let applied: HashSet<TxHash> = self.pending.iter().map(Transaction::hash).collect();
        let mut fresh = Vec::new();
        for tx in pool.transactions() {
            if applied.contains(&tx.hash()) || tx.gas_price < min_gas_price {
                continue
            }
            // transactions that do not fit yet stay in the pool
            if let Ok(receipt) = apply_tx(&mut self.accounts, &tx) {
                self.pending.push(tx);
                self.receipts.push(receipt.clone());
                fresh.push(receipt);
            }
        }
        if !fresh.is_empty() {
            self.committed = None;
        }
        fresh
    }

    fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    fn from_pending(&self, index: usize) -> Self {
        let mut copy = self.clone();
        copy.pending.truncate(index);
        copy.receipts.truncate(index);
        copy.accounts = copy.base.clone();
        for tx in &copy.pending {
            let _ = apply_tx(&mut copy.accounts, tx);
        }
        copy.committed = None;
        copy
    }

    fn balance(&self, address: Address) -> U256 {
        self.accounts.get(&address).map(|account| account.balance).unwrap_or_default()
    }

    fn nonce(&self, address: Address) -> u64 {
        self.accounts.get(&address).map(|account| account.nonce).unwrap_or_default()
    }

    fn add_balance(&mut self, address: Address, amount: U256) {
        self.accounts.entry(address).or_default().balance += amount;
    }

    fn commit_to_mine(&mut self, _chain: &MemChain) -> WorkPackage {
        let block = TestBlock {
            parent_hash: self.head,
            number: self.head_number + 1,
            difficulty: U256::from(MOCK_DIFFICULTY),
            timestamp: self.head_timestamp + 1,
            gas_limit: MOCK_GAS_LIMIT,
            beneficiary: self.beneficiary,
            transactions: self.pending.clone(),
            mix_hash: B256::ZERO,
            nonce: 0,
        };
        let package =
            WorkPackage { header_hash: block.work_hash(), difficulty: block.difficulty };
        self.committed = Some(Committed { block, sealed: None });
        package
    }

    fn self_check(&self, _chain: &MemChain) -> bool {
        let mut accounts = self.base.clone();
        for tx in &self.pending {
            if apply_tx(&mut accounts, tx).is_err() {
                return false
            }
        }
        accounts == self.accounts
    }

    fn complete_mine(&mut self, proof: &PowProof) {
        if let Some(committed) = self.committed.as_mut() {
            committed.block.mix_hash = proof.mix_hash;
            committed.block.nonce = proof.nonce;
            committed.sealed = Some(committed.block.encoded());
        }
    }

    fn sealed_block(&self) -> Option<Bytes> {
        self.committed.as_ref().and_then(|committed| committed.sealed.clone())
    }

    fn call(&mut self, request: &CallRequest) -> Result<ExecutionResult, CallError> {
        let sender = self.accounts.entry(request.from).or_default();
        if sender.balance < request.value {
            return Err(CallError("insufficient balance".into()))
        }
        sender.balance -= request.value;
        self.accounts.entry(request.to).or_default().balance += request.value;
        Ok(ExecutionResult { output: Bytes::new(), gas_used: TX_GAS })
    }
}

// === pool, queue, host, pow ===

#[derive(Debug, Default)]
struct PoolInner {
    order: Vec<Transaction>,
    hashes: HashSet<TxHash>,
}

/// An in-memory transaction pool keeping arrival order.
#[derive(Clone, Debug, Default)]
pub struct MemPool {
    inner: Arc<Mutex<PoolInner>>,
}

impl MemPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pooled transactions.
    pub fn len(&self) -> usize {
        self.inner.lock().order.len()
    }
}

impl TxPool for MemPool {
    fn import(&self, raw: &[u8]) -> Result<TxHash, PoolError> {
        let tx = Transaction::decode(raw)?;
        if tx.signature.is_empty() {
            return Err(PoolError::InvalidSignature)
        }
        let hash = tx.hash();
        let mut inner = self.inner.lock();
        if !inner.hashes.insert(hash) {
            return Err(PoolError::AlreadyKnown)
        }
        inner.order.push(tx);
        Ok(hash)
    }

    fn remove(&self, hash: TxHash) {
        let mut inner = self.inner.lock();
        if inner.hashes.remove(&hash) {
            inner.order.retain(|tx| tx.hash() != hash);
        }
    }

    fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.order.clear();
        inner.hashes.clear();
    }

    fn transactions(&self) -> Vec<Transaction> {
        self.inner.lock().order.clone()
    }

    fn contains(&self, hash: TxHash) -> bool {
        self.inner.lock().hashes.contains(&hash)
    }

    fn is_empty(&self) -> bool {
        self.inner.lock().order.is_empty()
    }
}

/// An in-memory peer block queue.
#[derive(Clone, Debug, Default)]
pub struct MemQueue {
    inner: Arc<Mutex<VecDeque<Bytes>>>,
}

impl MemQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues an encoded block.
    pub fn push_block(&self, block: &TestBlock) {
        self.push(block.encoded());
    }
}

impl BlockQueue for MemQueue {
    fn push(&self, block: Bytes) {
        self.inner.lock().push_back(block);
    }

    fn drain(&self, max: usize) -> Vec<Bytes> {
        let mut inner = self.inner.lock();
        let take = max.min(inner.len());
        inner.drain(..take).collect()
    }

    fn clear(&self) {
        self.inner.lock().clear();
    }

    fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// A host stub counting the notifications it receives.
#[derive(Debug, Default)]
pub struct MockHost {
    new_transactions: AtomicUsize,
    new_blocks: AtomicUsize,
    resets: AtomicUsize,
    syncing: AtomicBool,
    network_id: Mutex<U256>,
}

impl MockHost {
    /// Creates a host stub.
    pub fn new() -> Self {
        Self::default()
    }

    /// How often the node reported new transactions.
    pub fn new_transaction_notes(&self) -> usize {
        self.new_transactions.load(Ordering::SeqCst)
    }

    /// How often the node reported new blocks.
    pub fn new_block_notes(&self) -> usize {
        self.new_blocks.load(Ordering::SeqCst)
    }

    /// How often the node reset the host.
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    /// Pretend the host is (or is not) syncing.
    pub fn set_syncing(&self, syncing: bool) {
        self.syncing.store(syncing, Ordering::SeqCst);
    }

    /// The last network id announced.
    pub fn network_id(&self) -> U256 {
        *self.network_id.lock()
    }
}

impl HostHandle for MockHost {
    fn set_network_id(&self, id: U256) {
        *self.network_id.lock() = id;
    }

    fn note_new_transactions(&self) {
        self.new_transactions.fetch_add(1, Ordering::SeqCst);
    }

    fn note_new_blocks(&self) {
        self.new_blocks.fetch_add(1, Ordering::SeqCst);
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::SeqCst)
    }
}

/// A proof-of-work engine that solves instantly: the proof echoes the work
/// hash, verification checks the echo.
#[derive(Clone, Copy, Debug, Default)]
pub struct FakePow;

impl Pow for FakePow {
    fn solve(&self, work: &WorkPackage, start_nonce: u64, _rounds: u64) -> Option<PowProof> {
        Some(PowProof { mix_hash: work.header_hash, nonce: start_nonce })
    }

    fn verify(&self, work: &WorkPackage, proof: &PowProof) -> bool {
        proof.mix_hash == work.header_hash
    }
}

// === builders ===

/// Collects transactions for one block built by [`ChainBuilder`].
#[derive(Debug, Default)]
pub struct BlockBuilder {
    transactions: Vec<Transaction>,
    difficulty: U256,
}

impl BlockBuilder {
    /// Adds a plain transfer.
    pub fn transfer(
        &mut self,
        from: Address,
        nonce: u64,
        to: Address,
        value: u64,
        gas_price: u64,
    ) -> &mut Self {
        let mut tx = transfer_tx(from, nonce, to, value);
        tx.gas_price = U256::from(gas_price);
        self.transactions.push(tx);
        self
    }

    /// Adds an arbitrary transaction.
    pub fn push(&mut self, tx: Transaction) -> &mut Self {
        self.transactions.push(tx);
        self
    }

    /// Overrides the block difficulty.
    pub fn difficulty(&mut self, difficulty: u64) -> &mut Self {
        self.difficulty = U256::from(difficulty);
        self
    }
}

/// Builds a run of valid blocks on top of a parent, either importing them
/// directly or handing them back for queueing.
#[derive(Debug)]
pub struct ChainBuilder {
    chain: MemChain,
    parent_hash: B256,
    parent_number: u64,
    parent_timestamp: u64,
    blocks: Vec<TestBlock>,
}

impl ChainBuilder {
    /// Starts building on the current canonical head.
    pub fn new(chain: &MemChain) -> Self {
        let head = chain.current_hash();
        Self::from_parent(chain, head)
    }

    /// Starts building on an arbitrary stored block.
    pub fn from_parent(chain: &MemChain, parent: B256) -> Self {
        let info = chain.info(parent).expect("parent block must exist");
        Self {
            chain: chain.clone(),
            parent_hash: parent,
            parent_number: info.number,
            parent_timestamp: info.timestamp,
            blocks: Vec::new(),
        }
    }

    /// Appends one block, populated by the closure.
    pub fn block<R>(mut self, build: impl FnOnce(&mut BlockBuilder) -> R) -> Self {
        let mut builder = BlockBuilder {
            transactions: Vec::new(),
            difficulty: U256::from(MOCK_DIFFICULTY),
        };
        build(&mut builder);
        let block = TestBlock {
            parent_hash: self.parent_hash,
            number: self.parent_number + 1,
            difficulty: builder.difficulty,
            timestamp: self.parent_timestamp + 1,
            gas_limit: MOCK_GAS_LIMIT,
            beneficiary: Address::ZERO,
            transactions: builder.transactions,
            mix_hash: B256::ZERO,
            nonce: 0,
        };
        self.parent_hash = block.hash();
        self.parent_number = block.number;
        self.parent_timestamp = block.timestamp;
        self.blocks.push(block);
        self
    }

    /// The built blocks, oldest first, without importing them.
    pub fn build(self) -> Vec<TestBlock> {
        self.blocks
    }

    /// Imports the built blocks straight into the chain and returns their
    /// hashes.
    pub fn commit(self) -> Vec<B256> {
        let mut hashes = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            self.chain
                .attempt_import(&block.encoded(), &MemStateDb)
                .expect("builder blocks are valid");
            hashes.push(block.hash());
        }
        hashes
    }
}
