pub mod owner_authority;
pub mod policy;
