pub mod connection;
pub mod test_setup;
