//! MySQL/MariaDB driver implementation

mod connection;
mod factory;

pub use connection::MySqlConnection;
pub use factory::MySqlConnectionFactory;
