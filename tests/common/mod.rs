#![allow(dead_code)]

pub mod fixtures;
pub mod mock_source_tree;
pub mod setup;
