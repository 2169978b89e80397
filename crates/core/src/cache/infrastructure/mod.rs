pub mod memory_cache_store;
