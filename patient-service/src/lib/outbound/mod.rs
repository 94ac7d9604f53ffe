pub mod external;
pub mod repositories;
