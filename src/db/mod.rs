pub mod load;
pub mod pool;
pub mod schema;

pub use load::load_dataset;
pub use pool::Db;
