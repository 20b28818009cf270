pub mod credentials;
pub mod ops_publish;
pub mod terminal;
