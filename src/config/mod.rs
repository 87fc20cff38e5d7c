/// Database connection and table creation for the SQL store
pub mod database;

/// Store selection and connection settings from `inventario.toml` and the environment
pub mod store;
