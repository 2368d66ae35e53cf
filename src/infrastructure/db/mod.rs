pub mod pool;
pub mod provider;
pub mod schema;
