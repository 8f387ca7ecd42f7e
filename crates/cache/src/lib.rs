//! # `cryptoiq-cache` - 进程内缓存实现
//!
//! 为 `cryptoiq_core::cache::port::Cache` 提供基于 `DashMap` 的内存实现。

pub mod mem;
