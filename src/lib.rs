//! A singly linked list of owned nodes, with a pluggable node allocator
//! and a small script driver that replays list operations.

pub mod allocator;
pub mod linkedlist;
pub mod script;
