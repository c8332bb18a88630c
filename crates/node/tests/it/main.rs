//! Integration tests of the client against the in-memory mocks.

mod harness;

mod client;
mod mining;
mod reorg;
mod watches;
