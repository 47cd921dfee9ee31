pub mod authority;
pub mod db;
pub mod memory;

pub use authority::HttpAuthority;
pub use db::DbAdapter;
pub use memory::MemoryAdapter;
