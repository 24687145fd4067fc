pub mod channel_key;
pub mod replication_channel;
pub mod scratch;
