pub mod product;
pub mod purchase;

pub use product::{NewProduct, Product, ProductPatch};
pub use purchase::{NewPurchase, PaymentStatus, Purchase};
