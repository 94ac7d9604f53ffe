pub mod memory;
pub mod patient;
pub mod user;

pub use memory::InMemoryPatientRepository;
pub use memory::InMemoryUserRepository;
pub use patient::PostgresPatientRepository;
pub use user::PostgresUserRepository;
