mod memory;
mod provider;

pub use memory::{MemoryChannelStore, MemoryChannelStoreError};
pub use provider::{ChannelStore, ChannelStoreError};
