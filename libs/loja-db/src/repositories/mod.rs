pub mod product_repo;
pub mod purchase_repo;

pub use product_repo::ProductRepository;
pub use purchase_repo::PurchaseRepository;
