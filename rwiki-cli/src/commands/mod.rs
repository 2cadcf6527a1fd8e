pub mod hash_password;
pub mod maintenance;
pub mod serve;
