#![allow(dead_code)]

mod fakes;
mod harness;

pub use fakes::*;
pub use harness::*;
