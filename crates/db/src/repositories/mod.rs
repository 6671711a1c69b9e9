mod business_status_repo;
mod connection_repo;
mod order_repo;
mod subscription_repo;

pub use business_status_repo::BusinessStatusRepo;
pub use connection_repo::ConnectionRepo;
pub use order_repo::OrderRepo;
pub use subscription_repo::SubscriptionRepo;
