#![allow(dead_code, unused_imports)]

pub mod fixtures;

pub use fixtures::{HandlerPair, handler_pair, recv_text};
