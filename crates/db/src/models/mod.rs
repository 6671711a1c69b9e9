pub mod business_status;
pub mod connection;
pub mod order;
pub mod subscription;
